use std::time::Instant;

use ratatui::style::{Color, Style};

/// Severity of a transient status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

impl StatusKind {
    pub(crate) fn style(&self) -> Style {
        match self {
            StatusKind::Success => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Identity of one shown message. Expiry is tracked per id, so two messages of
/// the same kind never remove each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusId(u64);

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub id: StatusId,
    pub kind: StatusKind,
    pub text: String,
    pub expires_at: Instant,
}

/// Ordered list of live status messages, oldest first.
#[derive(Debug, Default)]
pub struct StatusBoard {
    messages: Vec<StatusMessage>,
    next_id: u64,
}

impl StatusBoard {
    pub fn push(
        &mut self,
        kind: StatusKind,
        text: impl Into<String>,
        expires_at: Instant,
    ) -> StatusId {
        self.next_id += 1;
        let id = StatusId(self.next_id);
        self.messages.push(StatusMessage {
            id,
            kind,
            text: text.into(),
            expires_at,
        });
        id
    }

    /// Drop every message whose deadline has passed. Returns how many went.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.messages.len();
        self.messages.retain(|message| message.expires_at > now);
        before - self.messages.len()
    }

    pub fn messages(&self) -> &[StatusMessage] {
        &self.messages
    }
}
