//! Insertion strategies for ordered record sequences.

use super::matcher::{Matcher, Record};

/// Where a new record lands in an ordered sequence.
///
/// The positional variants anchor on the first live record accepted by
/// their matcher. When nothing matches they fall back to appending.
#[derive(Debug, Clone, Default)]
pub enum Placer {
    /// Place at the end of the sequence.
    #[default]
    Append,
    /// Place immediately before the first match.
    Before(Matcher),
    /// Place immediately after the first match.
    After(Matcher),
    /// Tombstone the first match and take over its position.
    Replace(Matcher),
}

impl Placer {
    /// Locate the index at which the new record is inserted.
    ///
    /// `records` is the full sequence including tombstones, so the index
    /// is valid for `Vec::insert`. [`Placer::Replace`] marks the record it
    /// replaces as removed.
    pub fn insertion_index<R: Record>(&self, records: &mut [R]) -> usize {
        match self {
            Placer::Append => records.len(),
            Placer::Before(matcher) => first_match(matcher, records).unwrap_or(records.len()),
            Placer::After(matcher) => {
                first_match(matcher, records).map_or(records.len(), |idx| idx + 1)
            }
            Placer::Replace(matcher) => match first_match(matcher, records) {
                Some(idx) => {
                    records[idx].mark_removed();
                    idx + 1
                }
                None => records.len(),
            },
        }
    }
}

fn first_match<R: Record>(matcher: &Matcher, records: &[R]) -> Option<usize> {
    records.iter().position(|r| matcher.matches_record(r))
}
