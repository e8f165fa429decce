use std::path::PathBuf;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Message, Model};
use crate::editor::Direction;

impl App {
    pub(super) fn handle_event(event: &Event, model: &Model) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if model.prompt.is_some() {
                    Self::handle_prompt_key(key, model)
                } else {
                    Self::handle_key(key, model)
                }
            }
            Event::Paste(text) => Some(Self::handle_paste(text, model)),
            Event::Resize(w, h) => Some(Message::Resize(*w, *h)),
            _ => None,
        }
    }

    pub(super) fn handle_key(key: &KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL)
            || key.modifiers.contains(KeyModifiers::SUPER);
        let page = model.pane_height().max(1);

        if ctrl {
            return match key.code {
                KeyCode::Char(c) => match c.to_ascii_lowercase() {
                    's' => Some(Message::SaveNow),
                    'l' => Some(Message::LoadSample),
                    'k' => Some(Message::Clear),
                    'y' => Some(Message::CopyHtml),
                    't' => Some(Message::ToggleTheme),
                    'o' => Some(Message::OpenPrompt),
                    'q' | 'c' => Some(Message::Quit),
                    _ => None,
                },
                KeyCode::Home => Some(Message::MoveToStart),
                KeyCode::End => Some(Message::MoveToEnd),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char(c) => Some(Message::InsertChar(c)),
            KeyCode::Tab => Some(Message::InsertText("    ".to_string())),
            KeyCode::Enter => Some(Message::SplitLine),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
            KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
            KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
            KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
            KeyCode::Home => Some(Message::MoveHome),
            KeyCode::End => Some(Message::MoveEnd),
            KeyCode::PageUp => Some(Message::PreviewScrollUp(page)),
            KeyCode::PageDown => Some(Message::PreviewScrollDown(page)),
            _ => None,
        }
    }

    fn handle_prompt_key(key: &KeyEvent, model: &Model) -> Option<Message> {
        match key.code {
            KeyCode::Esc => Some(Message::PromptCancel),
            KeyCode::Enter => {
                let input = model.prompt.as_deref().unwrap_or_default().trim();
                if input.is_empty() {
                    Some(Message::PromptCancel)
                } else {
                    Some(Message::OpenFile(PathBuf::from(input)))
                }
            }
            KeyCode::Backspace => Some(Message::PromptBackspace),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Message::PromptInput(c))
            }
            _ => None,
        }
    }

    /// Terminals deliver a dropped file as a pasted path. Anything that does
    /// not name an existing file is inserted as text.
    fn handle_paste(text: &str, model: &Model) -> Message {
        if model.prompt.is_none()
            && let Some(path) = dropped_file_path(text)
        {
            return Message::OpenFile(path);
        }
        Message::InsertText(text.to_string())
    }
}

/// Interpret pasted text as a dropped file path, if it names an existing file.
pub(super) fn dropped_file_path(text: &str) -> Option<PathBuf> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.contains('\n') {
        return None;
    }
    let unquoted = trimmed
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(trimmed);
    let unprefixed = unquoted.strip_prefix("file://").unwrap_or(unquoted);
    // Shells escape spaces in dropped paths.
    let path = PathBuf::from(unprefixed.replace("\\ ", " "));
    path.is_file().then_some(path)
}
