//! Final assembly of free slots collected across windows.

use crate::model::Slot;

/// Deduplicate by (start, end) and sort ascending by start, then end.
///
/// Overlapping windows with the same duration produce identical slots; the
/// result is a set, not a multiset.
pub fn assemble(mut free: Vec<Slot>) -> Vec<Slot> {
    free.sort_unstable();
    free.dedup();
    free
}
