//! Match-3 tile grid with a snake that treats tiles as walls.
//!
//! [`grid::TileGrid`] and [`snake::SnakeEngine`] are the simulation core;
//! [`game::GameState`] composes them for the terminal front end.

pub mod cell;
pub mod config;
pub mod error;
pub mod fruit;
pub mod game;
pub mod grid;
pub mod input;
pub mod renderer;
pub mod snake;
pub mod terminal_runtime;
pub mod timestep;
pub mod ui;
