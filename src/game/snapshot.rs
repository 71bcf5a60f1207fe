//! Canonical snapshots of the board, used as the legality oracle.
//!
//! A snapshot records, for every train in owner order (seats by index,
//! then the communal train), the sorted list of its current ends. Placing
//! a tile always changes the end set of exactly one train, so diffing the
//! snapshots taken before and after a move tells the controller whether
//! anything was played and where.

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::tiles::Tile;
use crate::trains::{Train, TrainOwner};

/// Order-independent view of every train's ends.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateSnapshot {
    trains: Vec<(TrainOwner, Vec<Tile>)>,
}

impl StateSnapshot {
    /// Capture the ends of the given trains.
    ///
    /// The order trains are supplied in does not matter.
    pub fn capture<'a>(trains: impl IntoIterator<Item = &'a Train>) -> Self {
        let mut trains: Vec<(TrainOwner, Vec<Tile>)> = trains
            .into_iter()
            .map(|train| (train.owner(), train.ends()))
            .collect();
        trains.sort_by_key(|(owner, _)| *owner);
        Self { trains }
    }

    /// Number of trains recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trains.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }

    /// The recorded ends of `owner`'s train.
    #[must_use]
    pub fn ends(&self, owner: TrainOwner) -> Option<&[Tile]> {
        self.trains
            .binary_search_by_key(&owner, |(o, _)| *o)
            .ok()
            .map(|i| self.trains[i].1.as_slice())
    }

    /// Owners whose trains differ between `self` and `after`.
    #[must_use]
    pub fn changed_trains(&self, after: &StateSnapshot) -> Vec<TrainOwner> {
        let mut owners: Vec<TrainOwner> = self
            .trains
            .iter()
            .chain(after.trains.iter())
            .map(|(owner, _)| *owner)
            .collect();
        owners.sort();
        owners.dedup();

        owners
            .into_iter()
            .filter(|owner| self.ends(*owner) != after.ends(*owner))
            .collect()
    }

    /// A compact hash of the snapshot, for logging.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    const ENGINE: Tile = Tile::new(6, 6);

    fn trains() -> (Train, Train, Train) {
        (
            Train::new(PlayerId::new(0), ENGINE),
            Train::new(PlayerId::new(1), ENGINE),
            Train::communal(ENGINE),
        )
    }

    #[test]
    fn test_capture_is_order_independent() {
        let (a, b, c) = trains();

        let one = StateSnapshot::capture([&a, &b, &c]);
        let two = StateSnapshot::capture([&c, &b, &a]);

        assert_eq!(one, two);
        assert_eq!(one.fingerprint(), two.fingerprint());
        assert_eq!(one.len(), 3);
        assert_eq!(one.ends(TrainOwner::Communal), Some(&[ENGINE][..]));
    }

    #[test]
    fn test_changed_trains() {
        let (mut a, b, c) = trains();
        let before = StateSnapshot::capture([&a, &b, &c]);

        a.add_to_end(&ENGINE, Tile::new(6, 1)).unwrap();
        let after = StateSnapshot::capture([&a, &b, &c]);

        assert_ne!(before, after);
        assert_eq!(
            before.changed_trains(&after),
            vec![TrainOwner::Player(PlayerId::new(0))]
        );
        assert!(after.changed_trains(&after).is_empty());
    }

    #[test]
    fn test_marking_does_not_change_snapshot() {
        let (mut a, b, c) = trains();
        let before = StateSnapshot::capture([&a, &b, &c]);

        a.set_marked().unwrap();

        assert_eq!(before, StateSnapshot::capture([&a, &b, &c]));
    }

    #[test]
    fn test_missing_train_counts_as_changed() {
        let (a, b, c) = trains();
        let full = StateSnapshot::capture([&a, &b, &c]);
        let partial = StateSnapshot::capture([&a, &c]);

        assert_eq!(
            full.changed_trains(&partial),
            vec![TrainOwner::Player(PlayerId::new(1))]
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let (a, b, c) = trains();
        let snapshot = StateSnapshot::capture([&a, &b, &c]);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: StateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, back);
    }
}
