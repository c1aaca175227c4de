//! Expanded/collapsed state of itinerary segments.

use std::collections::HashSet;

use crate::domain::SegmentId;

/// The set of segments whose intermediate stops are shown.
///
/// Segment ids are positional, so the set is only meaningful for the
/// itinerary it was built against and must be cleared when a new one loads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionSet {
    expanded: HashSet<SegmentId>,
}

impl ExpansionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`. Returns whether it is now expanded.
    pub fn toggle(&mut self, id: SegmentId) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }

    pub fn contains(&self, id: &SegmentId) -> bool {
        self.expanded.contains(id)
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::LineCode;
    use proptest::prelude::*;

    proptest! {
        /// Toggling the same id twice restores the original membership
        #[test]
        fn double_toggle_is_identity(
            initial in proptest::collection::vec((proptest::char::range('A', 'Z'), 0usize..8), 0..10),
            line in proptest::char::range('A', 'Z'),
            position in 0usize..8,
        ) {
            let mut set = ExpansionSet::new();
            for (c, p) in initial {
                set.toggle(SegmentId::new(LineCode::new(c), p));
            }
            let before = set.clone();

            let target = SegmentId::new(LineCode::new(line), position);
            set.toggle(target);
            set.toggle(target);

            prop_assert_eq!(set, before);
        }
    }
}
