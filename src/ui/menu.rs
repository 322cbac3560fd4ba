use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

const HELP_LINES: &[(&str, &str)] = &[
    ("Arrows/WASD", "Move cursor / steer snake"),
    ("Space/Enter", "Select, then swap or move"),
    ("Z", "Place a tile on an empty cell"),
    ("G", "Grow or shrink the grid"),
    ("T", "Toggle grow/shrink"),
    ("M", "Toggle clear/snake mode"),
    ("X", "Clear every tile"),
    ("R", "Reset"),
    ("Q/Esc", "Quit"),
];

/// Draws the key reference as a centered popup.
pub fn render_help_menu(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered_popup(area, 70, 70);
    frame.render_widget(Clear, popup);

    let [title_row, body_row, footer_row] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("MATCH SNAKE"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let body: Vec<Line> = HELP_LINES
        .iter()
        .map(|(key, action)| Line::from(format!("{key:>12}  {action}")))
        .collect();
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Left)
            .block(Block::bordered().title(" keys ")),
        body_row,
    );

    frame.render_widget(
        Paragraph::new(Line::from("Runs of 3+ equal colors clear. [?] closes help"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        footer_row,
    );
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
