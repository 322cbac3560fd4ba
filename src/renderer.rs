use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::cell::{Cell, Direction};
use crate::config::{THEME, tile_color};
use crate::game::{GameState, PlayMode};
use crate::ui::hud::{HudInfo, render_hud};
use crate::ui::menu::render_help_menu;

/// Terminal columns used per grid cell.
pub const CELL_WIDTH: u16 = 2;

const GLYPH_EMPTY: &str = " ·";
const GLYPH_TILE: &str = "██";
const GLYPH_FADE: &str = "░░";
const GLYPH_FRUIT: &str = "●●";
const GLYPH_SNAKE_BODY: &str = "▓▓";

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, state: &GameState, hud_info: &HudInfo) {
    let area = frame.area();
    let play_area = render_hud(frame, area, state, hud_info);

    let board = board_area(play_area, state.grid.size());
    let block = Block::bordered().border_style(Style::new().fg(THEME.border_fg));
    let inner = block.inner(board);
    frame.render_widget(block, board);

    render_cells(frame, inner, state);
    render_fades(frame, inner, state);
    if state.play_mode() == PlayMode::Snake {
        render_fruit(frame, inner, state);
        render_snake(frame, inner, state);
    }

    if hud_info.show_help {
        render_help_menu(frame, play_area);
    }
}

/// Centers a bordered board of `size` cells inside `area`.
fn board_area(area: Rect, size: u16) -> Rect {
    let width = size.saturating_mul(CELL_WIDTH).saturating_add(2);
    let height = size.saturating_add(2);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [board] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);

    board
}

fn render_cells(frame: &mut Frame<'_>, inner: Rect, state: &GameState) {
    let size = state.grid.size();
    let show_cursor = state.play_mode() == PlayMode::Clear;
    let buffer = frame.buffer_mut();

    for z in 0..i32::from(size) {
        for x in 0..i32::from(size) {
            let cell = Cell::new(x, z);
            let Some((col, row)) = logical_to_terminal(inner, size, cell) else {
                continue;
            };

            let mut style = Style::new().bg(THEME.field_bg);
            if show_cursor && state.selected == Some(cell) {
                style = style.bg(THEME.selection_bg);
            } else if show_cursor && state.cursor == cell {
                style = style.bg(THEME.cursor_bg);
            }

            match state.grid.color(cell) {
                Some(color_index) => {
                    buffer.set_string(col, row, GLYPH_TILE, style.fg(tile_color(color_index)));
                }
                None => {
                    buffer.set_string(col, row, GLYPH_EMPTY, style.fg(THEME.grid_dot));
                }
            }
        }
    }
}

fn render_fades(frame: &mut Frame<'_>, inner: Rect, state: &GameState) {
    let size = state.grid.size();
    let buffer = frame.buffer_mut();

    for fading in &state.fading {
        let cell = fading.tile.cell;
        if state.grid.has_tile(cell) {
            continue;
        }
        let Some((col, row)) = logical_to_terminal(inner, size, cell) else {
            continue;
        };

        buffer.set_string(
            col,
            row,
            GLYPH_FADE,
            Style::new()
                .fg(tile_color(fading.tile.color_index))
                .bg(THEME.field_bg)
                .add_modifier(Modifier::DIM),
        );
    }
}

fn render_fruit(frame: &mut Frame<'_>, inner: Rect, state: &GameState) {
    let Some(fruit) = state.fruit else {
        return;
    };
    let Some((col, row)) = logical_to_terminal(inner, state.grid.size(), fruit) else {
        return;
    };

    frame.buffer_mut().set_string(
        col,
        row,
        GLYPH_FRUIT,
        Style::new().fg(THEME.fruit).bg(THEME.field_bg),
    );
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, state: &GameState) {
    let size = state.grid.size();
    let head = state.snake.head();
    let buffer = frame.buffer_mut();

    // Tail first so the head wins when segments overlap after a reset.
    let segments = state.snake.body_snapshot();
    for segment in segments.iter().rev() {
        let Some((col, row)) = logical_to_terminal(inner, size, *segment) else {
            continue;
        };

        if *segment == head {
            buffer.set_string(
                col,
                row,
                head_glyph(state.snake.direction()),
                Style::new()
                    .fg(THEME.snake_head)
                    .bg(THEME.snake_body)
                    .add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(
                col,
                row,
                GLYPH_SNAKE_BODY,
                Style::new().fg(THEME.snake_body).bg(THEME.field_bg),
            );
        }
    }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "▲▲",
        Direction::Down => "▼▼",
        Direction::Left => "◀◀",
        Direction::Right => "▶▶",
    }
}

fn logical_to_terminal(inner: Rect, size: u16, cell: Cell) -> Option<(u16, u16)> {
    if !cell.is_within(size) {
        return None;
    }

    let x_offset = u16::try_from(cell.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(cell.z).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::{board_area, logical_to_terminal};
    use crate::cell::Cell;

    #[test]
    fn cells_map_two_columns_wide() {
        let inner = Rect::new(10, 5, 18, 9);

        assert_eq!(logical_to_terminal(inner, 9, Cell::new(0, 0)), Some((10, 5)));
        assert_eq!(logical_to_terminal(inner, 9, Cell::new(8, 8)), Some((26, 13)));
        assert_eq!(logical_to_terminal(inner, 9, Cell::new(9, 0)), None);
    }

    #[test]
    fn cells_outside_a_cramped_area_are_skipped() {
        let inner = Rect::new(0, 0, 6, 2);

        assert_eq!(logical_to_terminal(inner, 9, Cell::new(2, 1)), Some((4, 1)));
        assert_eq!(logical_to_terminal(inner, 9, Cell::new(3, 1)), None);
        assert_eq!(logical_to_terminal(inner, 9, Cell::new(0, 2)), None);
    }

    #[test]
    fn board_is_centered() {
        let board = board_area(Rect::new(0, 0, 80, 24), 9);

        assert_eq!(board.width, 20);
        assert_eq!(board.height, 11);
        assert_eq!(board.x, 30);
    }
}
