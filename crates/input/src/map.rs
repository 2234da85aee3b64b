//! Key mapping from terminal events to game actions.

use crate::types::{Direction, GameAction, Spin};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to game actions.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    let shifted = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        // Lateral snaps
        KeyCode::Left if shifted => Some(GameAction::Snap(Direction::Left)),
        KeyCode::Right if shifted => Some(GameAction::Snap(Direction::Right)),
        KeyCode::Char('A') => Some(GameAction::Snap(Direction::Left)),
        KeyCode::Char('D') => Some(GameAction::Snap(Direction::Right)),

        // Movement
        KeyCode::Left | KeyCode::Char('a') => Some(GameAction::Shift(Direction::Left)),
        KeyCode::Right | KeyCode::Char('d') => Some(GameAction::Shift(Direction::Right)),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(GameAction::Shift(Direction::Down))
        }

        // Rotation
        KeyCode::Up
        | KeyCode::Char('w')
        | KeyCode::Char('W')
        | KeyCode::Char('x')
        | KeyCode::Char('X') => Some(GameAction::Rotate(Spin::Cw)),
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(GameAction::Rotate(Spin::Ccw)),

        // Actions
        KeyCode::Char(' ') => Some(GameAction::Snap(Direction::Down)),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(GameAction::Pause),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::F(2) => Some(GameAction::NewGame),

        // Toggles
        KeyCode::Char('g') | KeyCode::Char('G') => Some(GameAction::ToggleSpinGrace),
        KeyCode::Char('h') | KeyCode::Char('H') => Some(GameAction::ToggleHoverGrace),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
    ) || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_movement_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Left)),
            Some(GameAction::Shift(Direction::Left))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Right)),
            Some(GameAction::Shift(Direction::Right))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Down)),
            Some(GameAction::Shift(Direction::Down))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('a'))),
            Some(GameAction::Shift(Direction::Left))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('d'))),
            Some(GameAction::Shift(Direction::Right))
        );
    }

    #[test]
    fn test_snap_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char(' '))),
            Some(GameAction::Snap(Direction::Down))
        );
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT)),
            Some(GameAction::Snap(Direction::Left))
        );
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT)),
            Some(GameAction::Snap(Direction::Right))
        );
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(GameAction::Snap(Direction::Left))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('D'))),
            Some(GameAction::Snap(Direction::Right))
        );
    }

    #[test]
    fn test_rotation_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Up)),
            Some(GameAction::Rotate(Spin::Cw))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('x'))),
            Some(GameAction::Rotate(Spin::Cw))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('z'))),
            Some(GameAction::Rotate(Spin::Ccw))
        );
    }

    #[test]
    fn test_session_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('p'))),
            Some(GameAction::Pause)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::F(2))),
            Some(GameAction::NewGame)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('n'))),
            Some(GameAction::NewGame)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('g'))),
            Some(GameAction::ToggleSpinGrace)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('h'))),
            Some(GameAction::ToggleHoverGrace)
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('k'))), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
