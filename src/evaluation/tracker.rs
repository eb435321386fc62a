//! Evaluation dedup tracker
//!
//! In-memory map of in-flight evaluation runs. A module maps to a set of
//! tokens: one per contestant-level run plus a wildcard for a whole-module
//! run. The map is owned by [`crate::state::AppState`] and shared by handle;
//! nothing is persisted, so a restart starts empty.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Token for one in-flight run within a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RunToken {
    /// Whole-module run
    Module,
    /// Single-contestant run
    Contestant(i64),
}

fn token_for(contestant_id: Option<i64>) -> RunToken {
    match contestant_id {
        Some(id) => RunToken::Contestant(id),
        None => RunToken::Module,
    }
}

/// Process-wide tracker of in-flight evaluation runs
#[derive(Debug, Clone, Default)]
pub struct EvaluationTracker {
    in_progress: Arc<Mutex<HashMap<i64, HashSet<RunToken>>>>,
}

impl EvaluationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an evaluation is in flight.
    ///
    /// Without a contestant this asks "is anything running for this module";
    /// with a contestant it asks for that contestant's token specifically, so
    /// a whole-module run does not mask a contestant-level query.
    pub fn is_evaluating(&self, module_id: i64, contestant_id: Option<i64>) -> bool {
        let map = self.in_progress.lock().expect("evaluation tracker poisoned");
        match map.get(&module_id) {
            None => false,
            Some(tokens) => match contestant_id {
                None => !tokens.is_empty(),
                Some(id) => tokens.contains(&RunToken::Contestant(id)),
            },
        }
    }

    /// Atomically claim a run slot.
    ///
    /// The conflict check and the insert happen under one lock acquisition:
    /// two concurrent triggers for the same token can never both succeed. A
    /// module-level claim is refused while any token is active; a
    /// contestant-level claim is refused only while that contestant's token
    /// is active. Returns a guard whose `Drop` releases the slot.
    pub fn try_start(&self, module_id: i64, contestant_id: Option<i64>) -> Option<EvaluationSlot> {
        let mut map = self.in_progress.lock().expect("evaluation tracker poisoned");
        let tokens = map.entry(module_id).or_default();

        let conflict = match contestant_id {
            None => !tokens.is_empty(),
            Some(id) => tokens.contains(&RunToken::Contestant(id)),
        };
        if conflict {
            return None;
        }

        tokens.insert(token_for(contestant_id));

        Some(EvaluationSlot {
            tracker: self.clone(),
            module_id,
            contestant_id,
        })
    }

    fn end(&self, module_id: i64, contestant_id: Option<i64>) {
        let mut map = self.in_progress.lock().expect("evaluation tracker poisoned");
        if let Some(tokens) = map.get_mut(&module_id) {
            tokens.remove(&token_for(contestant_id));
            if tokens.is_empty() {
                map.remove(&module_id);
            }
        }
    }

    #[cfg(test)]
    fn tracked_modules(&self) -> usize {
        self.in_progress.lock().unwrap().len()
    }
}

/// RAII claim on an evaluation run.
///
/// Held by the spawned run for its whole lifetime; dropping it releases the
/// token on every exit path: completion, no-op and panic unwind alike.
#[derive(Debug)]
pub struct EvaluationSlot {
    tracker: EvaluationTracker,
    module_id: i64,
    contestant_id: Option<i64>,
}

impl Drop for EvaluationSlot {
    fn drop(&mut self) {
        self.tracker.end(self.module_id, self.contestant_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_module_level_claim_is_refused() {
        let tracker = EvaluationTracker::new();

        let slot = tracker.try_start(1, None).expect("first claim");
        assert!(tracker.is_evaluating(1, None));
        assert!(tracker.try_start(1, None).is_none());

        drop(slot);
        assert!(!tracker.is_evaluating(1, None));
        assert!(tracker.try_start(1, None).is_some());
    }

    #[test]
    fn duplicate_contestant_claim_is_refused() {
        let tracker = EvaluationTracker::new();

        let _slot = tracker.try_start(1, Some(7)).expect("first claim");
        assert!(tracker.is_evaluating(1, Some(7)));
        assert!(tracker.try_start(1, Some(7)).is_none());

        // A different contestant of the same module is unaffected.
        assert!(!tracker.is_evaluating(1, Some(8)));
        assert!(tracker.try_start(1, Some(8)).is_some());
    }

    #[test]
    fn contestant_run_blocks_module_run_but_not_vice_versa() {
        let tracker = EvaluationTracker::new();

        // Any active token refuses a whole-module claim.
        let slot = tracker.try_start(1, Some(7)).expect("contestant claim");
        assert!(tracker.is_evaluating(1, None));
        assert!(tracker.try_start(1, None).is_none());
        drop(slot);

        // A whole-module run does not hold individual contestant tokens.
        let _module_slot = tracker.try_start(1, None).expect("module claim");
        assert!(!tracker.is_evaluating(1, Some(7)));
    }

    #[test]
    fn released_modules_are_removed_from_the_map() {
        let tracker = EvaluationTracker::new();

        let a = tracker.try_start(1, Some(7)).unwrap();
        let b = tracker.try_start(1, Some(8)).unwrap();
        let c = tracker.try_start(2, None).unwrap();
        assert_eq!(tracker.tracked_modules(), 2);

        drop(a);
        assert_eq!(tracker.tracked_modules(), 2);
        drop(b);
        assert_eq!(tracker.tracked_modules(), 1);
        drop(c);
        assert_eq!(tracker.tracked_modules(), 0);
    }

    #[test]
    fn refused_claim_leaves_tracker_unchanged() {
        let tracker = EvaluationTracker::new();

        let _held = tracker.try_start(1, None).unwrap();
        assert!(tracker.try_start(1, None).is_none());
        assert_eq!(tracker.tracked_modules(), 1);
        assert!(tracker.is_evaluating(1, None));
    }
}
