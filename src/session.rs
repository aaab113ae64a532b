/// Where a play-through stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Playing,
    Won,
}

/// One play-through: from reset to win, or until the next reset.
#[derive(Clone, Debug, Default)]
pub struct GameSession {
    cleared: u32,
    phase: Phase,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.cleared = 0;
        self.phase = Phase::Playing;
    }

    /// Zero the counter while a reset rebuilds the field.
    pub fn clear_count(&mut self) {
        self.cleared = 0;
    }

    /// Count one cleared heart and return the new total.
    pub fn record_clear(&mut self) -> u32 {
        self.cleared = self.cleared.saturating_add(1);
        self.cleared
    }

    /// Move to `Won`. Returns false if the session was already won.
    pub fn win(&mut self) -> bool {
        if self.phase == Phase::Won {
            return false;
        }
        self.phase = Phase::Won;
        true
    }

    pub fn cleared(&self) -> u32 {
        self.cleared
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_won(&self) -> bool {
        self.phase == Phase::Won
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_is_absorbed_once() {
        let mut s = GameSession::new();
        assert!(s.win());
        assert!(!s.win());
        assert!(s.is_won());
        s.reset();
        assert_eq!(s.phase(), Phase::Playing);
        assert!(s.win());
    }

    #[test]
    fn clears_count_up_until_reset() {
        let mut s = GameSession::new();
        assert_eq!(s.record_clear(), 1);
        assert_eq!(s.record_clear(), 2);
        s.win();
        // clears still count after a win
        assert_eq!(s.record_clear(), 3);
        s.reset();
        assert_eq!(s.cleared(), 0);
    }
}
