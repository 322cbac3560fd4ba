use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub use crate::cell::Direction;

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    /// Select, then swap or move with the selection.
    Action,
    PlaceTile,
    GrowOrShrink,
    ToggleResizeMode,
    TogglePlayMode,
    ClearAll,
    Reset,
    ToggleHelp,
    Quit,
}

/// Maps a terminal key event to a game input, ignoring key releases.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameInput::Quit);
    }

    let input = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => GameInput::Direction(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S') => GameInput::Direction(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A') => GameInput::Direction(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D') => GameInput::Direction(Direction::Right),
        KeyCode::Enter | KeyCode::Char(' ') => GameInput::Action,
        KeyCode::Char('z' | 'Z') => GameInput::PlaceTile,
        KeyCode::Char('g' | 'G') => GameInput::GrowOrShrink,
        KeyCode::Char('t' | 'T') => GameInput::ToggleResizeMode,
        KeyCode::Char('m' | 'M') => GameInput::TogglePlayMode,
        KeyCode::Char('x' | 'X') => GameInput::ClearAll,
        KeyCode::Char('r' | 'R') => GameInput::Reset,
        KeyCode::Char('h' | 'H' | '?') => GameInput::ToggleHelp,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => GameInput::Quit,
        _ => return None,
    };

    Some(input)
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use super::{Direction, GameInput, map_key};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        assert_eq!(
            map_key(press(KeyCode::Up)),
            Some(GameInput::Direction(Direction::Up))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('a'))),
            Some(GameInput::Direction(Direction::Left))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('D'))),
            Some(GameInput::Direction(Direction::Right))
        );
    }

    #[test]
    fn ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), Some(GameInput::Quit));
    }

    #[test]
    fn releases_and_unknown_keys_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char(' '),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };

        assert_eq!(map_key(release), None);
        assert_eq!(map_key(press(KeyCode::Char('p'))), None);
        assert_eq!(map_key(press(KeyCode::Char(' '))), Some(GameInput::Action));
    }
}
