use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::THEME;
use crate::game::{GameState, PlayMode, ResizeMode};

const HUD_MARGIN_X: u16 = 1;
const ELLIPSIS: char = '…';

/// Front-end values shown alongside the game state.
#[derive(Debug, Clone, Copy, Default)]
pub struct HudInfo {
    /// Whether the help popup is open.
    pub show_help: bool,
}

/// Renders the two HUD rows at the bottom and returns the play area above.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, state: &GameState, info: &HudInfo) -> Rect {
    let [play_area, status_area, message_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let status_area = inset_horizontal(status_area, HUD_MARGIN_X);
    let message_area = inset_horizontal(message_area, HUD_MARGIN_X);

    frame.render_widget(
        Paragraph::new(status_line(state, info)).alignment(Alignment::Left),
        status_area,
    );

    let message = state.message.as_deref().unwrap_or("");
    let message = truncate_to_width(message, usize::from(message_area.width));
    frame.render_widget(
        Paragraph::new(Line::from(message))
            .alignment(Alignment::Left)
            .style(Style::default().fg(THEME.hud_accent)),
        message_area,
    );

    play_area
}

fn status_line(state: &GameState, info: &HudInfo) -> Line<'static> {
    let size = state.grid.size();
    let mode = match state.play_mode() {
        PlayMode::Clear => "Clear",
        PlayMode::Snake => "Snake",
    };
    let resize = match state.resize_mode() {
        ResizeMode::Grow => "Grow",
        ResizeMode::Shrink => "Shrink",
    };

    let mut spans = vec![
        label("Score"),
        value(state.score.to_string()),
        separator(),
        label("Grid"),
        value(format!("{size}x{size}")),
        separator(),
        label("Mode"),
        value(mode.to_owned()),
        separator(),
        label("G"),
        value(resize.to_owned()),
    ];

    if state.play_mode() == PlayMode::Snake {
        spans.push(separator());
        spans.push(label("Length"));
        spans.push(value(format!(
            "{}/{}",
            state.snake.len(),
            state.snake.max_len()
        )));
    }

    spans.push(separator());
    let hint = if info.show_help {
        "any key: close help"
    } else {
        "? help"
    };
    spans.push(Span::styled(hint, Style::default().fg(THEME.hud_muted)));

    Line::from(spans)
}

fn label(text: &'static str) -> Span<'static> {
    Span::styled(format!("{text}: "), Style::default().fg(THEME.hud_muted))
}

fn value(text: String) -> Span<'static> {
    Span::styled(
        text,
        Style::default()
            .fg(THEME.hud_value)
            .add_modifier(Modifier::BOLD),
    )
}

fn separator() -> Span<'static> {
    Span::styled(" │ ", Style::default().fg(Color::DarkGray))
}

/// Cuts `text` to at most `max_width` terminal columns, ending in `…` when cut.
fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_owned();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - ELLIPSIS.width().unwrap_or(1);
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let width = ch.width().unwrap_or(0);
        if used + width > budget {
            break;
        }
        used += width;
        out.push(ch);
    }
    out.push(ELLIPSIS);
    out
}

fn inset_horizontal(area: Rect, margin: u16) -> Rect {
    let total_margin = margin.saturating_mul(2);
    Rect {
        x: area.x.saturating_add(margin),
        y: area.y,
        width: area.width.saturating_sub(total_margin),
        height: area.height,
    }
}

#[cfg(test)]
mod tests {
    use unicode_width::UnicodeWidthStr;

    use super::{HudInfo, status_line, truncate_to_width};
    use crate::config::GameConfig;
    use crate::game::GameState;

    #[test]
    fn short_messages_are_kept() {
        assert_eq!(truncate_to_width("Grid grew!", 20), "Grid grew!");
    }

    #[test]
    fn long_messages_fit_the_row() {
        let cut = truncate_to_width("Shrink blocked: the border ring must be clear", 12);

        assert!(cut.width() <= 12);
        assert!(cut.ends_with('…'));
        assert!(cut.starts_with("Shrink"));
    }

    #[test]
    fn wide_characters_count_double() {
        let cut = truncate_to_width("蛇蛇蛇蛇", 5);

        assert_eq!(cut, "蛇蛇…");
    }

    fn status_text(state: &GameState, info: &HudInfo) -> String {
        status_line(state, info)
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    #[test]
    fn status_line_reports_score_and_grid() {
        let state = GameState::new_with_seed(GameConfig::default(), 9);
        let text = status_text(&state, &HudInfo::default());

        assert!(text.contains("Score: 0"));
        assert!(text.contains("Grid: 9x9"));
        assert!(text.contains("Mode: Clear"));
        assert!(text.ends_with("? help"));
    }

    #[test]
    fn help_hint_follows_popup_state() {
        let state = GameState::new_with_seed(GameConfig::default(), 9);
        let text = status_text(&state, &HudInfo { show_help: true });

        assert!(text.ends_with("any key: close help"));
        assert!(!text.contains("? help"));
    }
}
