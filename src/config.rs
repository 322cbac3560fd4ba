use std::fs;
use std::path::Path;
use std::time::Duration;

use ratatui::style::Color;
use serde::Deserialize;

use crate::error::ConfigError;

/// Length of the body placed by a snake reset.
pub const RESET_BODY_LEN: usize = 3;

/// Smallest grid the configuration accepts for `min_size`: the reset body
/// must fit left of center.
pub const MIN_GRID_SIZE: u16 = 2 * RESET_BODY_LEN as u16 - 1;

/// Step length used when `step_interval_secs` has no usable duration.
const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(140);

/// Score granted per tile removed by a match.
pub const POINTS_PER_MATCHED_TILE: u32 = 10;

/// Score granted per fruit eaten.
pub const POINTS_PER_FRUIT: u32 = 25;

/// Score granted per tile removed by a clear-all.
pub const POINTS_PER_CLEARED_TILE: u32 = 2;

/// Frames a removed tile stays visible while fading out.
pub const TILE_FADE_FRAMES: u8 = 6;

/// Frame pacing of the terminal loop in milliseconds.
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Tile colors, indexed by `color_index`.
pub const PALETTE: &[Color] = &[
    Color::Rgb(255, 92, 122),
    Color::Rgb(92, 200, 255),
    Color::Rgb(255, 214, 92),
    Color::Rgb(136, 232, 120),
    Color::Rgb(196, 128, 255),
    Color::Rgb(255, 160, 72),
];

/// Non-tile colors used by the renderer.
#[derive(Debug)]
pub struct Theme {
    pub field_bg: Color,
    pub grid_dot: Color,
    pub border_fg: Color,
    pub snake_head: Color,
    pub snake_body: Color,
    pub fruit: Color,
    pub cursor_bg: Color,
    pub selection_bg: Color,
    pub fade: Color,
    pub hud_value: Color,
    pub hud_muted: Color,
    pub hud_accent: Color,
}

pub const THEME: Theme = Theme {
    field_bg: Color::Rgb(16, 22, 42),
    grid_dot: Color::Rgb(42, 53, 87),
    border_fg: Color::Rgb(122, 162, 255),
    snake_head: Color::Rgb(240, 255, 240),
    snake_body: Color::Rgb(88, 214, 141),
    fruit: Color::Rgb(255, 200, 87),
    cursor_bg: Color::Rgb(60, 80, 140),
    selection_bg: Color::Rgb(140, 110, 40),
    fade: Color::DarkGray,
    hud_value: Color::White,
    hud_muted: Color::DarkGray,
    hud_accent: Color::Rgb(255, 200, 87),
};

/// Tunable game parameters.
///
/// Every field is optional in a JSON config file; missing fields keep the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub min_size: u16,
    pub max_size: u16,
    pub initial_size: u16,
    /// Number of distinct tile colors in play.
    pub palette_size: u8,
    pub base_len: usize,
    /// Ceiling for the snake's maximum length.
    pub growth_cap: usize,
    pub step_interval_secs: f64,
    /// Share of cells seeded with tiles on reset.
    pub fill_ratio: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_size: 7,
            max_size: 15,
            initial_size: 9,
            palette_size: 4,
            base_len: 6,
            growth_cap: 30,
            step_interval_secs: 0.14,
            fill_ratio: 0.75,
        }
    }
}

impl GameConfig {
    /// Reads a JSON config file and validates it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with a different starting size.
    #[must_use]
    pub fn with_initial_size(self, initial_size: u16) -> Self {
        Self {
            initial_size,
            ..self
        }
    }

    /// Checks every field against its documented constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("min_size", self.min_size),
            ("max_size", self.max_size),
            ("initial_size", self.initial_size),
        ] {
            if value % 2 == 0 {
                return Err(ConfigError::EvenSize { field, value });
            }
        }

        if self.min_size < MIN_GRID_SIZE {
            return Err(ConfigError::SizeOutOfRange {
                field: "min_size",
                value: self.min_size,
                min: MIN_GRID_SIZE,
                max: self.max_size,
            });
        }
        if self.max_size < self.min_size {
            return Err(ConfigError::SizeOutOfRange {
                field: "max_size",
                value: self.max_size,
                min: self.min_size,
                max: u16::MAX,
            });
        }
        if !(self.min_size..=self.max_size).contains(&self.initial_size) {
            return Err(ConfigError::SizeOutOfRange {
                field: "initial_size",
                value: self.initial_size,
                min: self.min_size,
                max: self.max_size,
            });
        }

        let palette_max = u8::try_from(PALETTE.len()).unwrap_or(u8::MAX);
        if self.palette_size == 0 || self.palette_size > palette_max {
            return Err(ConfigError::Palette {
                value: self.palette_size,
                max: palette_max,
            });
        }

        if self.base_len < RESET_BODY_LEN || self.growth_cap < self.base_len {
            return Err(ConfigError::SnakeLength {
                base_len: self.base_len,
                growth_cap: self.growth_cap,
            });
        }

        if self.checked_step_interval().is_none() {
            return Err(ConfigError::StepInterval(self.step_interval_secs));
        }

        if !(0.0..=1.0).contains(&self.fill_ratio) {
            return Err(ConfigError::FillRatio(self.fill_ratio));
        }

        Ok(())
    }

    /// Fixed duration of one snake step.
    #[must_use]
    pub fn step_interval(&self) -> Duration {
        self.checked_step_interval().unwrap_or(DEFAULT_STEP_INTERVAL)
    }

    fn checked_step_interval(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.step_interval_secs)
            .ok()
            .filter(|interval| !interval.is_zero())
    }
}

/// Returns the palette color for a tile, wrapping out-of-range indices.
#[must_use]
pub fn tile_color(color_index: u8) -> Color {
    PALETTE[usize::from(color_index) % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{GameConfig, PALETTE, RESET_BODY_LEN, tile_color};
    use crate::error::ConfigError;
    use crate::game::GameState;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.initial_size, 9);
        assert_eq!((config.min_size, config.max_size), (7, 15));
        assert_eq!(config.palette_size, 4);
        assert_eq!((config.base_len, config.growth_cap), (6, 30));
        assert_eq!(config.step_interval(), Duration::from_millis(140));
    }

    #[test]
    fn even_sizes_are_rejected() {
        let config = GameConfig::default().with_initial_size(10);

        assert!(matches!(
            config.validate(),
            Err(ConfigError::EvenSize {
                field: "initial_size",
                value: 10
            })
        ));
    }

    #[test]
    fn initial_size_must_sit_between_limits() {
        let config = GameConfig::default().with_initial_size(17);

        assert!(matches!(
            config.validate(),
            Err(ConfigError::SizeOutOfRange {
                field: "initial_size",
                ..
            })
        ));
    }

    #[test]
    fn min_size_must_hold_the_reset_body() {
        let tiny = GameConfig {
            min_size: 3,
            initial_size: 3,
            ..GameConfig::default()
        };
        assert!(matches!(
            tiny.validate(),
            Err(ConfigError::SizeOutOfRange {
                field: "min_size",
                value: 3,
                min: 5,
                ..
            })
        ));

        let smallest = GameConfig {
            min_size: 5,
            initial_size: 5,
            ..GameConfig::default()
        };
        assert!(smallest.validate().is_ok());

        let state = GameState::new_with_seed(smallest, 1);
        let body = state.snake.body_snapshot();
        assert_eq!(body.len(), RESET_BODY_LEN);
        assert!(body.iter().all(|cell| cell.is_within(5)));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "initial_size": 11, "palette_size": 5 }"#)
                .expect("partial config should parse");

        assert_eq!(config.initial_size, 11);
        assert_eq!(config.palette_size, 5);
        assert_eq!(config.max_size, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nonsense_values_are_rejected() {
        let zero_palette = GameConfig {
            palette_size: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            zero_palette.validate(),
            Err(ConfigError::Palette { .. })
        ));

        let stalled = GameConfig {
            step_interval_secs: 0.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            stalled.validate(),
            Err(ConfigError::StepInterval(_))
        ));

        for step_interval_secs in [-1.0, f64::NAN, 1e30, 1e-12] {
            let unusable = GameConfig {
                step_interval_secs,
                ..GameConfig::default()
            };
            assert!(
                matches!(unusable.validate(), Err(ConfigError::StepInterval(_))),
                "{step_interval_secs} should be rejected"
            );
            assert!(!unusable.step_interval().is_zero());
        }

        let capped_below_base = GameConfig {
            growth_cap: 4,
            ..GameConfig::default()
        };
        assert!(matches!(
            capped_below_base.validate(),
            Err(ConfigError::SnakeLength { .. })
        ));
    }

    #[test]
    fn tile_color_wraps_around_palette() {
        assert_eq!(tile_color(0), PALETTE[0]);
        let wrapped = u8::try_from(PALETTE.len()).expect("palette fits in u8");
        assert_eq!(tile_color(wrapped), PALETTE[0]);
    }
}
