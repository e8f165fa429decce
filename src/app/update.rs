use std::path::PathBuf;

use crate::app::Model;
use crate::app::model::{SAVE_FEEDBACK_MS, ToastLevel};
use crate::editor::Direction;
use crate::render::SAMPLE;

/// All possible events and actions in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Insert a character at the cursor
    InsertChar(char),
    /// Insert pasted text at the cursor
    InsertText(String),
    /// Split line at cursor (Enter)
    SplitLine,
    /// Delete character before cursor (Backspace)
    DeleteBack,
    /// Delete character at cursor (Delete)
    DeleteForward,
    /// Move cursor in a direction
    MoveCursor(Direction),
    /// Move cursor to beginning of line (Home)
    MoveHome,
    /// Move cursor to end of line (End)
    MoveEnd,
    /// Move cursor to start of buffer (Ctrl+Home)
    MoveToStart,
    /// Move cursor to end of buffer (Ctrl+End)
    MoveToEnd,

    // Document
    /// Replace the text with the built-in sample
    LoadSample,
    /// Replace the text with an empty document
    Clear,
    /// Load a file (picked, dropped, or typed in the prompt)
    OpenFile(PathBuf),
    /// Persist the text right now
    SaveNow,
    /// Copy the Rendered HTML to the clipboard
    CopyHtml,
    /// Switch between light and dark highlighting
    ToggleTheme,

    // Open-file prompt
    /// Show the open-file prompt
    OpenPrompt,
    /// Type into the prompt
    PromptInput(char),
    /// Delete the last prompt character
    PromptBackspace,
    /// Dismiss the prompt
    PromptCancel,

    // Preview
    /// Scroll the preview up by n lines
    PreviewScrollUp(usize),
    /// Scroll the preview down by n lines
    PreviewScrollDown(usize),

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Quit the application
    Quit,
}

/// Apply `msg` to the model.
///
/// Text-changing messages request a render; I/O (reading files, the
/// clipboard) happens afterwards in the side-effect handler.
pub fn update(model: &mut Model, msg: Message) {
    match msg {
        Message::InsertChar(ch) => {
            model.editor.insert_char(ch);
            model.request_render();
        }
        Message::InsertText(text) => {
            if let Some(prompt) = model.prompt.as_mut() {
                prompt.push_str(text.trim());
            } else if !text.is_empty() {
                model.editor.insert_str(&text);
                model.request_render();
            }
        }
        Message::SplitLine => {
            model.editor.split_line();
            model.request_render();
        }
        Message::DeleteBack => {
            if model.editor.delete_back() {
                model.request_render();
            }
        }
        Message::DeleteForward => {
            if model.editor.delete_forward() {
                model.request_render();
            }
        }
        Message::MoveCursor(direction) => model.editor.move_cursor(direction),
        Message::MoveHome => model.editor.move_home(),
        Message::MoveEnd => model.editor.move_end(),
        Message::MoveToStart => model.editor.move_to_start(),
        Message::MoveToEnd => model.editor.move_to_end(),

        Message::LoadSample => {
            model.load_text(SAMPLE);
            model.file_path = None;
        }
        Message::Clear => {
            model.load_text("");
            model.file_path = None;
        }
        Message::OpenFile(_) => {
            model.prompt = None;
        }
        Message::SaveNow => {
            if model.save_now() {
                model.show_toast(ToastLevel::Info, "Saved", SAVE_FEEDBACK_MS);
            } else {
                model.show_toast(ToastLevel::Error, "Save failed", SAVE_FEEDBACK_MS);
            }
        }
        Message::CopyHtml => {}
        Message::ToggleTheme => model.toggle_theme(),

        Message::OpenPrompt => {
            model.prompt = Some(String::new());
        }
        Message::PromptInput(ch) => {
            if let Some(prompt) = model.prompt.as_mut() {
                prompt.push(ch);
            }
        }
        Message::PromptBackspace => {
            if let Some(prompt) = model.prompt.as_mut() {
                prompt.pop();
            }
        }
        Message::PromptCancel => {
            model.prompt = None;
        }

        Message::PreviewScrollUp(n) => {
            model.preview_scroll = model.preview_scroll.saturating_sub(n);
        }
        Message::PreviewScrollDown(n) => {
            model.preview_scroll = model
                .preview_scroll
                .saturating_add(n)
                .min(model.max_preview_scroll());
        }

        Message::Resize(width, height) => {
            model.size = (width, height);
        }
        Message::Quit => {
            model.should_quit = true;
        }
    }
}
