//! Per-run counters collected by the stepper.
//!
//! [`RunMetrics`] accumulates over the lifetime of a
//! [`Stepper`](crate::Stepper); callers read it after a run for
//! reporting.

/// Counters for one reconfiguration run.
#[derive(Clone, Debug, Default)]
pub struct RunMetrics {
    /// Moves committed.
    pub moves: u64,
    /// Moves committed per phase, in the order phases first produced one.
    pub moves_per_phase: Vec<(String, u64)>,
    /// Times a sequence was pulled, including the final exhausted pull.
    pub pulls: u64,
    /// Wall-clock time spent inside `next_move` and commit, in microseconds.
    pub total_us: u64,
}

impl RunMetrics {
    pub(crate) fn record_move(&mut self, phase: &str) {
        self.moves += 1;
        match self.moves_per_phase.iter_mut().find(|(p, _)| p == phase) {
            Some((_, n)) => *n += 1,
            None => self.moves_per_phase.push((phase.to_string(), 1)),
        }
    }

    /// Moves committed by `phase`.
    pub fn moves_in(&self, phase: &str) -> u64 {
        self.moves_per_phase
            .iter()
            .find(|(p, _)| p == phase)
            .map_or(0, |(_, n)| *n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = RunMetrics::default();
        assert_eq!(m.moves, 0);
        assert!(m.moves_per_phase.is_empty());
        assert_eq!(m.pulls, 0);
        assert_eq!(m.total_us, 0);
    }

    #[test]
    fn per_phase_counts_keep_first_seen_order() {
        let mut m = RunMetrics::default();
        m.record_move("gather");
        m.record_move("compact-sorted");
        m.record_move("gather");
        assert_eq!(m.moves, 3);
        assert_eq!(m.moves_in("gather"), 2);
        assert_eq!(m.moves_in("canonicalize"), 0);
        assert_eq!(m.moves_per_phase[0].0, "gather");
    }
}
