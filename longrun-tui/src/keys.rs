//! Key presses and submitted lines mapped to UI actions, with no terminal attached.
use crate::command::{Command, is_command, parse_command};
use crate::input::Edit;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const PAGE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    ScrollUp(usize),
    ScrollDown(usize),
    CancelReveal,
    /// Zero-based suggestion slot (F1 is 0).
    Suggest(usize),
    Submit,
    Edit(Edit),
    Ignore,
}

/// `locked` is set while a reply is being revealed: only quitting,
/// scrolling and cancelling get through.
pub fn map_key(key: KeyEvent, locked: bool) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL)
        | (KeyCode::Char('q'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::PageUp, _) => KeyAction::ScrollUp(PAGE),
        (KeyCode::PageDown, _) => KeyAction::ScrollDown(PAGE),
        (KeyCode::Up, _) => KeyAction::ScrollUp(1),
        (KeyCode::Down, _) => KeyAction::ScrollDown(1),
        (KeyCode::Esc, _) if locked => KeyAction::CancelReveal,
        _ if locked => KeyAction::Ignore,
        (KeyCode::F(n), _) => match n.checked_sub(1) {
            Some(slot) => KeyAction::Suggest(slot as usize),
            None => KeyAction::Ignore,
        },
        (KeyCode::Enter, _) => KeyAction::Submit,
        (KeyCode::Left, _) => KeyAction::Edit(Edit::Left),
        (KeyCode::Right, _) => KeyAction::Edit(Edit::Right),
        (KeyCode::Home, _) => KeyAction::Edit(Edit::Home),
        (KeyCode::End, _) => KeyAction::Edit(Edit::End),
        (KeyCode::Backspace, _) => KeyAction::Edit(Edit::Backspace),
        (KeyCode::Delete, _) => KeyAction::Edit(Edit::Delete),
        (KeyCode::Esc, _) => KeyAction::Edit(Edit::Clear),
        (KeyCode::Char(ch), m) if !m.contains(KeyModifiers::CONTROL) => {
            KeyAction::Edit(Edit::Insert(ch))
        }
        _ => KeyAction::Ignore,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Command(Command),
    /// Sent to the session exactly as shown in the input box.
    Prompt(String),
    Blank,
}

pub fn classify_submit(line: &str) -> Submission {
    if line.trim().is_empty() {
        Submission::Blank
    } else if is_command(line) {
        Submission::Command(parse_command(line))
    } else {
        Submission::Prompt(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn typing_and_enter_when_unlocked() {
        assert_eq!(
            map_key(press(KeyCode::Char('r')), false),
            KeyAction::Edit(Edit::Insert('r'))
        );
        assert_eq!(map_key(press(KeyCode::Enter), false), KeyAction::Submit);
        assert_eq!(map_key(press(KeyCode::Esc), false), KeyAction::Edit(Edit::Clear));
        assert_eq!(
            map_key(press(KeyCode::Backspace), false),
            KeyAction::Edit(Edit::Backspace)
        );
    }

    #[test]
    fn input_is_locked_during_a_reveal() {
        for code in [
            KeyCode::Char('x'),
            KeyCode::Enter,
            KeyCode::Backspace,
            KeyCode::Left,
            KeyCode::F(1),
        ] {
            assert_eq!(map_key(press(code), true), KeyAction::Ignore, "{code:?}");
        }
        assert_eq!(map_key(press(KeyCode::Esc), true), KeyAction::CancelReveal);
        assert_eq!(map_key(press(KeyCode::PageUp), true), KeyAction::ScrollUp(PAGE));
        assert_eq!(map_key(ctrl('c'), true), KeyAction::Quit);
    }

    #[test]
    fn function_keys_pick_suggestion_slots() {
        assert_eq!(map_key(press(KeyCode::F(1)), false), KeyAction::Suggest(0));
        assert_eq!(map_key(press(KeyCode::F(3)), false), KeyAction::Suggest(2));
        assert_eq!(map_key(press(KeyCode::F(0)), false), KeyAction::Ignore);
    }

    #[test]
    fn quit_chords_and_releases() {
        assert_eq!(map_key(ctrl('q'), false), KeyAction::Quit);
        assert_eq!(map_key(ctrl('a'), false), KeyAction::Ignore);

        let mut release = press(KeyCode::Char('a'));
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key(release, false), KeyAction::Ignore);
    }

    #[test]
    fn submitted_lines_route_to_commands_or_prompts() {
        assert_eq!(classify_submit("/stop"), Submission::Command(Command::Stop));
        assert_eq!(classify_submit(" /quit "), Submission::Command(Command::Quit));
        assert_eq!(
            classify_submit("/dance"),
            Submission::Command(Command::Unknown("/dance".into()))
        );
        assert_eq!(classify_submit("   "), Submission::Blank);
        assert_eq!(
            classify_submit(" 3 runs "),
            Submission::Prompt(" 3 runs ".into())
        );
    }
}
