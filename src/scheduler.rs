//! Frame-paced render scheduling.
//!
//! [`RenderScheduler`] holds at most one [`RenderToken`]. Each request
//! cancels the pending token and schedules a new one for the next frame
//! boundary, so any burst of requests inside one frame produces a single
//! render cycle that reads the text as it is when the frame fires.

use tracing::trace;

/// Frame interval used when no other pacing is configured (~60 Hz).
pub const DEFAULT_FRAME_MS: u64 = 16;

/// Handle for a scheduled, not yet executed render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderToken {
    id: u64,
    due_ms: u64,
}

impl RenderToken {
    pub const fn id(self) -> u64 {
        self.id
    }

    /// Frame boundary (in clock milliseconds) at which the cycle fires.
    pub const fn due_ms(self) -> u64 {
        self.due_ms
    }
}

/// Single-slot, cancel-and-replace render scheduler driven by a millisecond clock.
#[derive(Debug)]
pub struct RenderScheduler {
    frame_ms: u64,
    next_id: u64,
    pending: Option<RenderToken>,
    superseded: u64,
}

impl RenderScheduler {
    pub const fn new(frame_ms: u64) -> Self {
        Self {
            frame_ms: if frame_ms == 0 { 1 } else { frame_ms },
            next_id: 0,
            pending: None,
            superseded: 0,
        }
    }

    /// Schedule a render for the next frame boundary after `now_ms`,
    /// cancelling any render that is still pending.
    pub fn request_render(&mut self, now_ms: u64) -> RenderToken {
        if let Some(previous) = self.pending.take() {
            self.superseded += 1;
            trace!(token = previous.id, "pending render superseded");
        }
        self.next_id += 1;
        let token = RenderToken {
            id: self.next_id,
            due_ms: self.next_frame_after(now_ms),
        };
        self.pending = Some(token);
        token
    }

    /// Take the pending token if its frame boundary has been reached.
    pub fn take_due(&mut self, now_ms: u64) -> Option<RenderToken> {
        let token = self.pending?;
        if now_ms >= token.due_ms {
            self.pending = None;
            Some(token)
        } else {
            None
        }
    }

    /// Drop the pending token without running it.
    pub const fn cancel(&mut self) -> Option<RenderToken> {
        self.pending.take()
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub const fn pending(&self) -> Option<RenderToken> {
        self.pending
    }

    /// Milliseconds until the pending token fires, if one is pending.
    pub fn time_until_due(&self, now_ms: u64) -> Option<u64> {
        self.pending.map(|token| token.due_ms.saturating_sub(now_ms))
    }

    /// How many pending tokens were replaced before they fired.
    pub const fn superseded(&self) -> u64 {
        self.superseded
    }

    pub const fn frame_ms(&self) -> u64 {
        self.frame_ms
    }

    const fn next_frame_after(&self, now_ms: u64) -> u64 {
        (now_ms / self.frame_ms)
            .saturating_add(1)
            .saturating_mul(self.frame_ms)
    }
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_MS)
    }
}
