//! Single-slot buffer for links that arrive before navigation is ready.

use crate::link::ParsedLink;

/// `empty | holding(ParsedLink)`; newest link wins, there is no queue.
#[derive(Debug, Default)]
pub struct PendingLinkSlot {
    held: Option<ParsedLink>,
}

impl PendingLinkSlot {
    /// An empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer a link, returning the one it displaced.
    pub fn hold(&mut self, link: ParsedLink) -> Option<ParsedLink> {
        self.held.replace(link)
    }

    /// Consume the buffered link.
    pub fn take(&mut self) -> Option<ParsedLink> {
        self.held.take()
    }

    /// The held link, without consuming it.
    pub fn peek(&self) -> Option<&ParsedLink> {
        self.held.as_ref()
    }

    /// True while a link is waiting.
    pub fn is_holding(&self) -> bool {
        self.held.is_some()
    }
}
