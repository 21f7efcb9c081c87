//! Run and batch states.

use std::fmt;

/// Lifecycle of one import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Reading,
    Mapping,
    Validating,
    Importing { batch: usize },
    /// Every record classified; progress snapshot removed.
    Complete,
    /// Stopped before completion; the snapshot for `batch - 1` is kept.
    Failed { batch: usize },
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Complete | RunState::Failed { .. })
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => f.write_str("idle"),
            RunState::Reading => f.write_str("reading"),
            RunState::Mapping => f.write_str("mapping"),
            RunState::Validating => f.write_str("validating"),
            RunState::Importing { batch } => write!(f, "importing batch {}", batch + 1),
            RunState::Complete => f.write_str("complete"),
            RunState::Failed { batch } => write!(f, "failed at batch {}", batch + 1),
        }
    }
}

/// How one batch was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The bulk insert went through on attempt `attempts`.
    Succeeded { attempts: u32 },
    /// Bulk attempts ran out; records were inserted one at a time.
    Degraded { inserted: usize, failed: usize },
}

impl BatchOutcome {
    pub fn is_degraded(self) -> bool {
        matches!(self, BatchOutcome::Degraded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(RunState::Complete.is_terminal());
        assert!(RunState::Failed { batch: 1 }.is_terminal());
        assert!(!RunState::Importing { batch: 0 }.is_terminal());
        assert_eq!(RunState::Importing { batch: 1 }.to_string(), "importing batch 2");
    }
}
