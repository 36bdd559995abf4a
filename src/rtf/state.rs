//! Group save/restore state.
//!
//! Every `{` saves a copy of the current state and every `}` restores it.
//! A `}` without a matching `{` is tolerated as a no-op but counted, so the
//! caller can tell a lenient recovery apart from a clean parse.

use super::types::FormattingOptions;
use serde::Serialize;

/// State scoped to a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GroupState {
    /// Character and paragraph formatting
    pub formatting: FormattingOptions,
    /// Fallback characters to skip after `\uN` (`\ucN`)
    pub unicode_skip: usize,
}

impl Default for GroupState {
    fn default() -> Self {
        Self {
            formatting: FormattingOptions::default(),
            unicode_skip: 1,
        }
    }
}

/// Stack of saved group states.
#[derive(Debug, Default)]
pub(crate) struct GroupStack {
    saved: Vec<GroupState>,
    unmatched_close: usize,
}

impl GroupStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a copy of `current` on `{`.
    #[inline]
    pub fn push(&mut self, current: &GroupState) {
        self.saved.push(current.clone());
    }

    /// Restore the state saved by the matching `{`.
    ///
    /// Returns `None` and records the event when the stack is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<GroupState> {
        let state = self.saved.pop();
        if state.is_none() {
            self.unmatched_close += 1;
        }
        state
    }

    /// Number of open groups.
    #[inline]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Number of `}` seen with nothing to restore.
    #[inline]
    pub fn unmatched_close(&self) -> usize {
        self.unmatched_close
    }
}

/// Degraded-mode signals collected during a lenient conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Diagnostics {
    /// `}` encountered with no open group
    pub unmatched_close: usize,
    /// Groups still open at end of input
    pub unclosed_groups: usize,
    /// Tables whose last row was never closed by `\row`
    pub unterminated_rows: usize,
}

impl Diagnostics {
    /// Whether the input needed any recovery.
    #[inline]
    pub fn is_degraded(&self) -> bool {
        self.unmatched_close > 0 || self.unclosed_groups > 0 || self.unterminated_rows > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pop_on_empty_is_counted() {
        let mut stack = GroupStack::new();
        assert!(stack.pop().is_none());
        assert!(stack.pop().is_none());
        assert_eq!(stack.unmatched_close(), 2);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_restore_exact_state() {
        let mut stack = GroupStack::new();
        let mut current = GroupState::default();
        current.formatting.italic = true;

        stack.push(&current);
        current.formatting.bold = true;
        current.unicode_skip = 0;

        let restored = stack.pop().unwrap();
        assert!(restored.formatting.italic);
        assert!(!restored.formatting.bold);
        assert_eq!(restored.unicode_skip, 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_balanced_sequence_restores_depth(sizes in prop::collection::vec(0i32..200, 1..20)) {
            let mut stack = GroupStack::new();
            let mut current = GroupState::default();
            let initial = current.clone();

            for size in &sizes {
                stack.push(&current);
                current.formatting.font_size = *size;
            }
            for _ in &sizes {
                current = stack.pop().unwrap();
            }

            prop_assert_eq!(stack.depth(), 0);
            prop_assert_eq!(stack.unmatched_close(), 0);
            prop_assert_eq!(current, initial);
        }
    }

    #[test]
    fn test_diagnostics_degraded() {
        assert!(!Diagnostics::default().is_degraded());
        let diagnostics = Diagnostics {
            unclosed_groups: 1,
            ..Default::default()
        };
        assert!(diagnostics.is_degraded());
    }
}
