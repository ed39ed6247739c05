/// The four mutually exclusive interaction phases.
///
/// Exactly one is current at any time; a session starts in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing in flight; the next trigger starts a recording
    Idle,
    /// Microphone capture is active
    Recording,
    /// An upload is awaiting the server's reply
    Processing,
    /// A reply is being spoken
    Playing,
}

impl Phase {
    /// Status line shown to the user for this phase
    pub fn status_text(&self) -> &'static str {
        match self {
            Phase::Idle => "Tap to Speak",
            Phase::Recording => "Listening...",
            Phase::Processing => "Thinking...",
            Phase::Playing => "Speaking... (Tap to Interrupt)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_phase_has_a_distinct_status() {
        let phases = [
            Phase::Idle,
            Phase::Recording,
            Phase::Processing,
            Phase::Playing,
        ];

        for (i, a) in phases.iter().enumerate() {
            for b in &phases[i + 1..] {
                assert_ne!(a.status_text(), b.status_text());
            }
        }
    }

    #[test]
    fn test_idle_invites_speech() {
        assert_eq!(Phase::Idle.status_text(), "Tap to Speak");
    }
}
