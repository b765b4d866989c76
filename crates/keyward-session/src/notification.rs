// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transient status messages with generation-checked expiry.
//!
//! Each [`Notifier::show`] bumps a generation counter. The event loop later
//! delivers a clear for the generation it was told about; a clear for any
//! older generation is ignored, so the newest message always gets its full
//! display time.

use std::time::{Duration, Instant};

use strum::Display;

/// Severity, used by presentation for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Error,
    Success,
    Info,
}

/// A message currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: Level,
    pub generation: u64,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct Notifier {
    current: Option<Notification>,
    generation: u64,
    ttl: Duration,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: None,
            generation: 0,
            ttl,
        }
    }

    /// Replace the current message. Returns its generation.
    pub fn show(&mut self, message: impl Into<String>, level: Level, now: Instant) -> u64 {
        self.generation += 1;
        self.current = Some(Notification {
            message: message.into(),
            level,
            generation: self.generation,
            expires_at: now + self.ttl,
        });
        self.generation
    }

    /// Clear the message if it is still `generation`. Returns whether it was cleared.
    pub fn clear(&mut self, generation: u64) -> bool {
        match &self.current {
            Some(n) if n.generation == generation => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Generation and deadline of the pending clear, if any.
    pub fn pending_clear(&self) -> Option<(u64, Instant)> {
        self.current.as_ref().map(|n| (n.generation, n.expires_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_millis(1000);

    #[test]
    fn show_sets_expiry_from_ttl() {
        let now = Instant::now();
        let mut n = Notifier::new(TTL);
        let generation = n.show("Credentials copied", Level::Success, now);
        assert_eq!(n.pending_clear(), Some((generation, now + TTL)));
        assert_eq!(n.current().unwrap().message, "Credentials copied");
    }

    #[test]
    fn clear_for_current_generation_applies() {
        let mut n = Notifier::new(TTL);
        let generation = n.show("a", Level::Info, Instant::now());
        assert!(n.clear(generation));
        assert!(n.current().is_none());
        assert!(n.pending_clear().is_none());
    }

    #[test]
    fn stale_clear_is_ignored() {
        let now = Instant::now();
        let mut n = Notifier::new(TTL);
        let first = n.show("first", Level::Info, now);
        let second = n.show("second", Level::Error, now + Duration::from_millis(500));

        assert!(!n.clear(first));
        assert_eq!(n.current().unwrap().message, "second");
        assert!(n.clear(second));
    }

    #[test]
    fn generations_increase() {
        let mut n = Notifier::new(TTL);
        let a = n.show("a", Level::Info, Instant::now());
        let b = n.show("b", Level::Info, Instant::now());
        assert!(b > a);
    }

    #[test]
    fn level_displays_lowercase() {
        assert_eq!(Level::Success.to_string(), "success");
    }
}
