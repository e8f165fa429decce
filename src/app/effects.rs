use std::io::{Write, stdout};

use base64::Engine;
use tracing::warn;

use crate::app::model::{COPY_FEEDBACK_MS, NOTICE_MS};
use crate::app::{App, Message, Model, ToastLevel};

impl App {
    /// Perform the I/O a message asks for, after [`crate::app::update`] ran.
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        match msg {
            Message::OpenFile(path) => match model.load_file(path) {
                Ok(()) => {
                    let name = path
                        .file_name()
                        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());
                    model.show_toast(ToastLevel::Info, format!("Opened {name}"), NOTICE_MS);
                }
                Err(err) => {
                    warn!(path = %path.display(), "{err:#}");
                    model.show_toast(ToastLevel::Error, format!("Open failed: {err}"), NOTICE_MS);
                }
            },
            Message::CopyHtml => match copy_to_clipboard(model.preview.html()) {
                Ok(()) => model.show_toast(ToastLevel::Info, "Copied!", COPY_FEEDBACK_MS),
                Err(err) => {
                    warn!(%err, "clipboard copy failed");
                    model.show_toast(ToastLevel::Error, "Failed", COPY_FEEDBACK_MS);
                }
            },
            _ => {}
        }
    }
}

fn copy_to_clipboard(text: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        if copy_to_pbcopy(text).is_ok() {
            return Ok(());
        }
    }
    copy_to_clipboard_osc52(text)
}

#[cfg(target_os = "macos")]
fn copy_to_pbcopy(text: &str) -> std::io::Result<()> {
    use std::process::{Command, Stdio};

    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other("pbcopy failed"))
    }
}

fn copy_to_clipboard_osc52(text: &str) -> std::io::Result<()> {
    let mut out = stdout();
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}
