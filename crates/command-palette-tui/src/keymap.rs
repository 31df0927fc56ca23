use command_palette::{Key, KeyChord, Modifiers, PaletteEvent};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::actions::Action;

/// What the key handler needs to know about the current screen
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyContext {
    pub palette_open: bool,
    pub input_focused: bool,
}

/// Convert a terminal key event into a palette chord
///
/// Returns `None` for keys the chord notation has no name for.
pub fn key_chord(key: &KeyEvent) -> Option<KeyChord> {
    let mut modifiers = Modifiers {
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
        meta: key.modifiers.intersects(KeyModifiers::SUPER | KeyModifiers::META),
    };

    let key = match key.code {
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => {
            // Terminals report shift+p as 'P', sometimes without the flag
            if c.is_ascii_uppercase() {
                modifiers.shift = true;
            }
            Key::Char(c)
        }
        KeyCode::F(n) => Key::F(n),
        KeyCode::Esc => Key::Escape,
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => {
            modifiers.shift = true;
            Key::Tab
        }
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        _ => return None,
    };

    Some(KeyChord::new(modifiers, key))
}

/// Map a key press to an action
///
/// `is_palette_hotkey` decides whether a chord belongs to the palette's
/// registered open hotkeys; it is checked before anything else so the
/// palette opens regardless of focus.
pub fn handle_key<F>(key: KeyEvent, ctx: KeyContext, is_palette_hotkey: F) -> Action
where
    F: Fn(&KeyChord) -> bool,
{
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && matches!(key.code, KeyCode::Char('c')) {
        return Action::Quit;
    }

    if let Some(chord) = key_chord(&key)
        && is_palette_hotkey(&chord)
    {
        return Action::Palette(PaletteEvent::HotKey(chord));
    }

    if ctx.palette_open {
        let event = if ctx.input_focused {
            input_key(&key)
        } else {
            list_key(&key)
        };
        return event.map(Action::Palette).unwrap_or(Action::None);
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        // Keyboard equivalent of the trigger button
        KeyCode::Char('o') => Action::Palette(PaletteEvent::TriggerButton),
        KeyCode::Char('+') => Action::Increment,
        KeyCode::Char('-') => Action::Decrement,
        _ => Action::None,
    }
}

/// Keys while the query input has focus
fn input_key(key: &KeyEvent) -> Option<PaletteEvent> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    let event = match key.code {
        KeyCode::Esc => PaletteEvent::Escape,
        KeyCode::Enter => PaletteEvent::Confirm,
        KeyCode::Down => PaletteEvent::HighlightNext,
        KeyCode::Up => PaletteEvent::HighlightPrev,
        KeyCode::Tab => PaletteEvent::BlurInput,
        KeyCode::Backspace => PaletteEvent::Backspace,
        KeyCode::Char('u') if ctrl => PaletteEvent::ClearQuery,
        KeyCode::Char('n') if ctrl => PaletteEvent::HighlightNext,
        // ctrl+p is a default open hotkey, so only ctrl+k moves up
        KeyCode::Char('k') if ctrl => PaletteEvent::HighlightPrev,
        KeyCode::Char(c) if !ctrl && !alt => PaletteEvent::Input(c),
        _ => return None,
    };
    Some(event)
}

/// Keys while the suggestion list has focus
fn list_key(key: &KeyEvent) -> Option<PaletteEvent> {
    let event = match key.code {
        // The palette ignores Escape without input focus
        KeyCode::Esc => PaletteEvent::Escape,
        KeyCode::Enter => PaletteEvent::Confirm,
        KeyCode::Down | KeyCode::Char('j') => PaletteEvent::HighlightNext,
        KeyCode::Up | KeyCode::Char('k') => PaletteEvent::HighlightPrev,
        KeyCode::Tab | KeyCode::Char('/') | KeyCode::Char('i') => PaletteEvent::FocusInput,
        _ => return None,
    };
    Some(event)
}
