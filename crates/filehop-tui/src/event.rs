//! Key bindings of the terminal host.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use filehop_search::SearchMode;

use crate::controller::Command;

/// What a key press means to the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    // Focus movement
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,

    Accept,
    /// Dismiss the picker.
    Hide,
    /// Trigger the focused item's button.
    ItemButton,
    ToggleHelp,

    /// An entry point handled by the controller.
    Command(Command),

    /// Forward to the input line.
    Edit,
}

impl KeyAction {
    /// Convert a key event to an action. `input_empty` turns `Right` and
    /// `Backspace` into navigation.
    pub fn from_key_event(event: KeyEvent, input_empty: bool) -> Self {
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        match event.code {
            KeyCode::Char('c') if ctrl => KeyAction::Command(Command::Quit),

            KeyCode::Esc => KeyAction::Hide,
            KeyCode::Enter => KeyAction::Accept,

            KeyCode::Up => KeyAction::MoveUp,
            KeyCode::Down => KeyAction::MoveDown,
            KeyCode::Char('p') if ctrl => KeyAction::MoveUp,
            KeyCode::Char('n') if ctrl => KeyAction::MoveDown,
            KeyCode::PageUp => KeyAction::PageUp,
            KeyCode::PageDown => KeyAction::PageDown,

            KeyCode::Tab => KeyAction::Command(Command::TabComplete { forward: true }),
            KeyCode::BackTab => KeyAction::Command(Command::TabComplete { forward: false }),

            KeyCode::Char('l') if ctrl => KeyAction::Command(Command::StepIn),
            KeyCode::Right if input_empty => KeyAction::Command(Command::StepIn),
            KeyCode::Char('h') if ctrl => KeyAction::Command(Command::StepOut),
            KeyCode::Backspace if input_empty => KeyAction::Command(Command::StepOut),

            KeyCode::Char('o') if ctrl => KeyAction::Command(Command::OpenActions),
            KeyCode::Char('r') if ctrl => KeyAction::Command(Command::RenameCurrentOrFocused),
            KeyCode::Char('w') if ctrl => KeyAction::Command(Command::OpenNavigatorWriteMode),
            KeyCode::Char('f') if ctrl => KeyAction::Command(Command::InvokeSearch {
                query: None,
                mode: SearchMode::Names,
            }),
            KeyCode::Char('g') if ctrl => KeyAction::Command(Command::InvokeSearch {
                query: None,
                mode: SearchMode::Content,
            }),
            KeyCode::Char('t') if ctrl => KeyAction::Command(Command::ToggleSearchMode),
            KeyCode::Char('s') if ctrl => KeyAction::Command(Command::ToggleSearchScope),

            KeyCode::Char('d') if ctrl => KeyAction::ItemButton,
            KeyCode::F(1) => KeyAction::ToggleHelp,

            _ => KeyAction::Edit,
        }
    }
}

/// A section of key bindings for the help display.
pub struct HelpSection {
    pub title: &'static str,
    pub bindings: Vec<KeyBinding>,
}

/// Key binding for display in help.
pub struct KeyBinding {
    pub keys: &'static str,
    pub description: &'static str,
}

/// All key bindings organized by section.
pub fn help_sections() -> Vec<HelpSection> {
    vec![
        HelpSection {
            title: "Navigation",
            bindings: vec![
                KeyBinding { keys: "↑/↓ Ctrl-p/n", description: "Move focus" },
                KeyBinding { keys: "Enter", description: "Open or enter the focused item" },
                KeyBinding { keys: "Ctrl-l →", description: "Step into folder (→ on empty input)" },
                KeyBinding { keys: "Ctrl-h ⌫", description: "Step out (⌫ on empty input)" },
                KeyBinding { keys: "Tab/S-Tab", description: "Complete names" },
                KeyBinding { keys: "~/ @/ /", description: "Jump to home, workspace, root" },
            ],
        },
        HelpSection {
            title: "Actions",
            bindings: vec![
                KeyBinding { keys: "Ctrl-o", description: "Action menu" },
                KeyBinding { keys: "Ctrl-r", description: "Rename" },
                KeyBinding { keys: "Ctrl-w", description: "Save a copy of the current file" },
                KeyBinding { keys: "Ctrl-d", description: "Unpin the focused pin" },
            ],
        },
        HelpSection {
            title: "Search",
            bindings: vec![
                KeyBinding { keys: "Ctrl-f", description: "Find files by name" },
                KeyBinding { keys: "Ctrl-g", description: "Find in file contents" },
                KeyBinding { keys: "Ctrl-t", description: "Toggle names/contents" },
                KeyBinding { keys: "Ctrl-s", description: "Toggle folder/workspace scope" },
            ],
        },
        HelpSection {
            title: "General",
            bindings: vec![
                KeyBinding { keys: "F1", description: "Show this help" },
                KeyBinding { keys: "Esc", description: "Close" },
                KeyBinding { keys: "Ctrl-c", description: "Quit" },
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState};

    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_arrows_navigate_only_on_empty_input() {
        let right = key(KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(
            KeyAction::from_key_event(right, true),
            KeyAction::Command(Command::StepIn)
        );
        assert_eq!(KeyAction::from_key_event(right, false), KeyAction::Edit);

        let backspace = key(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(
            KeyAction::from_key_event(backspace, true),
            KeyAction::Command(Command::StepOut)
        );
        assert_eq!(KeyAction::from_key_event(backspace, false), KeyAction::Edit);
    }

    #[test]
    fn test_control_bindings() {
        let search = key(KeyCode::Char('g'), KeyModifiers::CONTROL);
        assert_eq!(
            KeyAction::from_key_event(search, false),
            KeyAction::Command(Command::InvokeSearch {
                query: None,
                mode: SearchMode::Content
            })
        );
        let plain = key(KeyCode::Char('g'), KeyModifiers::NONE);
        assert_eq!(KeyAction::from_key_event(plain, false), KeyAction::Edit);
    }
}
