//! Next-id derivation for a collection.

use clap::ValueEnum;

use crate::actor_framework::Entity;
use crate::domain::RecordId;

/// How a store picks the id of a newly created record.
///
/// Both policies start at `1` for an empty collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum IdPolicy {
    /// Id of the last record in insertion order, plus one.
    ///
    /// Only the tail is consulted, so deleting the tail and creating again
    /// hands out the deleted id a second time.
    #[default]
    LastPlusOne,
    /// Largest id currently stored, plus one.
    MaxPlusOne,
}

impl IdPolicy {
    pub fn next_id<T: Entity>(self, records: &[T]) -> RecordId {
        let base = match self {
            IdPolicy::LastPlusOne => records.last().map(T::id),
            IdPolicy::MaxPlusOne => records.iter().map(T::id).max(),
        };
        base.map_or(1, |id| id + 1)
    }
}
