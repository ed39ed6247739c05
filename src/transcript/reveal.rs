use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default pacing of the assistant-text reveal, per character
pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(30);

/// Shared progress of a progressive text reveal.
///
/// Counts revealed characters, monotonically increasing up to the total.
/// Clones share the same counter.
#[derive(Debug, Clone)]
pub struct RevealProgress {
    total: usize,
    shown: Arc<AtomicUsize>,
}

impl RevealProgress {
    /// Progress starting fully hidden
    pub fn hidden(total_chars: usize) -> Self {
        Self {
            total: total_chars,
            shown: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Progress starting fully revealed
    pub fn complete(total_chars: usize) -> Self {
        Self {
            total: total_chars,
            shown: Arc::new(AtomicUsize::new(total_chars)),
        }
    }

    /// Reveal one more character. Saturates at the total.
    pub fn advance(&self) {
        let _ = self
            .shown
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                if n < self.total {
                    Some(n + 1)
                } else {
                    None
                }
            });
    }

    /// Characters revealed so far
    pub fn shown(&self) -> usize {
        self.shown.load(Ordering::SeqCst).min(self.total)
    }

    /// Total characters to reveal
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.shown() >= self.total
    }
}

/// Spawn the detached ticker that reveals one character per interval.
///
/// The ticker runs independently of every other component and is not
/// cancellable: once started it always runs to completion, even if the user
/// has moved on to a new recording.
pub fn spawn_ticker(progress: RevealProgress, interval: Duration) {
    if progress.is_complete() {
        return;
    }

    thread::spawn(move || {
        while !progress.is_complete() {
            progress.advance();
            thread::sleep(interval);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_starts_at_zero() {
        let progress = RevealProgress::hidden(5);
        assert_eq!(progress.shown(), 0);
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_exactly_n_advances_complete_an_n_char_reveal() {
        let progress = RevealProgress::hidden(4);

        for step in 1..=4 {
            progress.advance();
            assert_eq!(progress.shown(), step);
        }
        assert!(progress.is_complete());
    }

    #[test]
    fn test_advance_saturates() {
        let progress = RevealProgress::hidden(2);
        for _ in 0..10 {
            progress.advance();
        }
        assert_eq!(progress.shown(), 2);
    }

    #[test]
    fn test_complete_is_immediately_done() {
        let progress = RevealProgress::complete(7);
        assert!(progress.is_complete());
        assert_eq!(progress.shown(), 7);
    }

    #[test]
    fn test_empty_reveal_is_complete() {
        let progress = RevealProgress::hidden(0);
        assert!(progress.is_complete());
    }

    #[test]
    fn test_ticker_runs_to_completion() {
        let progress = RevealProgress::hidden(10);
        spawn_ticker(progress.clone(), Duration::from_millis(1));

        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while !progress.is_complete() && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        assert!(progress.is_complete());
    }
}
