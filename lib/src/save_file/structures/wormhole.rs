use std::collections::{HashMap, HashSet};

use super::super::parser::{keys, types::GameId, RecordMap};

/// The bypass type of natural wormholes
const WORMHOLE_TYPE: &str = "wormhole";

/// Two systems linked by a natural wormhole. The smaller id always comes
/// first, so a pair is equal no matter which end it was found from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WormholePair(GameId, GameId);

impl WormholePair {
    pub fn new(a: GameId, b: GameId) -> Self {
        if a <= b {
            WormholePair(a, b)
        } else {
            WormholePair(b, a)
        }
    }

    pub fn first(&self) -> GameId {
        self.0
    }

    pub fn second(&self) -> GameId {
        self.1
    }

    pub fn contains(&self, system: GameId) -> bool {
        self.0 == system || self.1 == system
    }
}

/// Maps bypass ids to the system their natural wormhole sits in
pub fn anchor_bypasses(natural_wormholes: &RecordMap) -> HashMap<GameId, GameId> {
    natural_wormholes
        .iter()
        .filter_map(|w| Some((w.get_id_field(keys::BYPASS)?, w.get_id_field(keys::ORIGIN)?)))
        .collect()
}

/// Pairs up linked wormhole bypasses.
///
/// Both ends of a link are marked as processed once either is seen, so every
/// bypass contributes to at most one pair. Ends that aren't anchored to a
/// system are returned separately.
pub fn pair_wormholes(
    bypasses: &RecordMap,
    anchors: &HashMap<GameId, GameId>,
) -> (Vec<WormholePair>, Vec<GameId>) {
    let mut pairs = Vec::new();
    let mut unanchored = Vec::new();
    let mut seen = HashSet::new();
    let mut processed = HashSet::new();
    for bypass in bypasses {
        let id = bypass.get_id();
        if bypass.get(keys::TYPE) != Some(WORMHOLE_TYPE) || processed.contains(&id) {
            continue;
        }
        let Some(partner) = bypass.get_id_field(keys::LINKED_TO) else {
            continue;
        };
        match (anchors.get(&id), anchors.get(&partner)) {
            (Some(a), Some(b)) => {
                let pair = WormholePair::new(*a, *b);
                if seen.insert(pair) {
                    pairs.push(pair);
                }
            }
            (a, b) => {
                if a.is_none() {
                    unanchored.push(id);
                }
                if b.is_none() {
                    unanchored.push(partner);
                }
            }
        }
        processed.insert(id);
        processed.insert(partner);
    }
    (pairs, unanchored)
}

#[cfg(test)]
mod tests {
    use super::{
        super::super::parser::{RawRecord, RecordKind},
        *,
    };

    fn bypass(id: GameId, kind: &str, linked_to: GameId) -> RawRecord {
        let mut record = RawRecord::new(id, RecordKind::Bypass);
        record.set_field(keys::TYPE, kind);
        record.set_field(keys::LINKED_TO, &linked_to.to_string());
        record
    }

    fn anchor(id: GameId, bypass: GameId, origin: GameId) -> RawRecord {
        let mut record = RawRecord::new(id, RecordKind::WormholeAnchor);
        record.set_field(keys::BYPASS, &bypass.to_string());
        record.set_field(keys::ORIGIN, &origin.to_string());
        record
    }

    #[test]
    fn test_mutual_link() {
        let anchors = anchor_bypasses(&[anchor(0, 10, 57), anchor(1, 11, 3)].into_iter().collect());
        let forward: RecordMap = [bypass(10, "wormhole", 11), bypass(11, "wormhole", 10)]
            .into_iter()
            .collect();
        let reverse: RecordMap = [bypass(11, "wormhole", 10), bypass(10, "wormhole", 11)]
            .into_iter()
            .collect();
        let (pairs, unanchored) = pair_wormholes(&forward, &anchors);
        assert_eq!(pairs, vec![WormholePair::new(3, 57)]);
        assert_eq!(pairs[0].first(), 3);
        assert_eq!(pairs[0].second(), 57);
        assert!(unanchored.is_empty());
        let (reversed, _) = pair_wormholes(&reverse, &anchors);
        assert_eq!(pairs, reversed);
    }

    #[test]
    fn test_duplicate_pair() {
        let anchors = anchor_bypasses(
            &[anchor(0, 1, 5), anchor(1, 2, 6), anchor(2, 3, 5), anchor(3, 4, 6)]
                .into_iter()
                .collect(),
        );
        let bypasses: RecordMap = [
            bypass(1, "wormhole", 2),
            bypass(3, "wormhole", 4),
            bypass(5, "gateway", 6),
        ]
        .into_iter()
        .collect();
        let (pairs, _) = pair_wormholes(&bypasses, &anchors);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_unanchored() {
        let anchors = anchor_bypasses(&[anchor(0, 1, 5)].into_iter().collect());
        let bypasses: RecordMap = [bypass(1, "wormhole", 2), bypass(2, "wormhole", 1)]
            .into_iter()
            .collect();
        let (pairs, unanchored) = pair_wormholes(&bypasses, &anchors);
        assert!(pairs.is_empty());
        assert_eq!(unanchored, vec![2]);
    }
}
