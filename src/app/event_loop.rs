use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::debug;

use crate::app::{App, Message, Model, update};

/// Longest the loop sleeps when nothing is scheduled.
const IDLE_POLL_MS: u64 = 250;

impl App {
    /// Run the editor until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop hits an
    /// I/O failure.
    pub fn run(&self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; gitmd requires an interactive terminal")?;
        let size = terminal.size()?;
        let mut model = self.build_model((size.width, size.height));

        let _ = execute!(stdout(), EnableBracketedPaste);
        let result = Self::event_loop(&mut terminal, &mut model);
        let _ = execute!(stdout(), DisableBracketedPaste);
        ratatui::restore();

        // Keep the last keystrokes even if their frame never came.
        model.flush_pending_render();
        result
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let clock = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut needs_draw = true;

        loop {
            // The due cycle runs here, after the previous turn's events were
            // fully handled.
            if model.tick(clock()) {
                needs_draw = true;
            }

            if needs_draw {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_draw = false;
            }

            if model.should_quit {
                break;
            }

            let poll_ms = model
                .time_until_next_tick()
                .map_or(IDLE_POLL_MS, |ms| ms.min(IDLE_POLL_MS));
            if !event::poll(Duration::from_millis(poll_ms))? {
                continue;
            }

            // Drain everything already queued so a burst of keystrokes lands
            // in one turn and one render cycle.
            let mut handled = 0_u32;
            loop {
                model.set_clock(clock());
                if let Some(msg) = Self::handle_event(&event::read()?, model) {
                    Self::dispatch(model, msg);
                    handled += 1;
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
            if handled > 0 {
                debug!(handled, "input turn");
                needs_draw = true;
            }
        }
        Ok(())
    }

    /// Update the model, then perform the message's side effects.
    pub(super) fn dispatch(model: &mut Model, msg: Message) {
        let side_msg = msg.clone();
        update(model, msg);
        Self::handle_message_side_effects(model, &side_msg);
    }
}
