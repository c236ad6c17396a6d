use std::collections::HashMap;

use super::types::{parse_id, GameId, GameString};

/// Field keys shared by the block parsers and the consumers of their output.
pub mod keys {
    pub const TYPE: &str = "type";
    pub const X: &str = "x";
    pub const Y: &str = "y";
    pub const NAME: &str = "name";
    pub const PLANET_CLASS: &str = "planet_class";
    pub const PLANET_SIZE: &str = "planet_size";
    pub const ORBIT: &str = "orbit";
    pub const MOON_OF: &str = "moon_of";
    pub const STAR_CLASS: &str = "star_class";
    pub const RADIUS: &str = "radius";
    pub const ORIGIN: &str = "origin";
    pub const LINKED_TO: &str = "linked_to";
    pub const BYPASS: &str = "bypass";
    pub const PLANET: &str = "planet";
    pub const GRAPHICAL_CULTURE: &str = "graphical_culture";
}

/// The kind of save file entry a [RawRecord] was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RecordKind {
    /// An entry of the `galactic_object` section
    Star,
    /// An entry of the `planets.planet` section
    Planet,
    /// A top level `nebula` block
    Nebula,
    /// An entry of the `bypasses` section
    Bypass,
    /// An entry of the `natural_wormholes` section
    WormholeAnchor,
    /// An entry of the `megastructures` section
    Megastructure,
}

/// A single asteroid belt as it appears in a star record, still unconverted.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBelt {
    pub belt_type: GameString,
    pub radius: GameString,
}

/// A numeric id keyed record, reduced to the fields we care about.
/// Created by the block parsers and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    id: GameId,
    kind: RecordKind,
    fields: HashMap<&'static str, GameString>,
    name_template: Option<GameString>,
    hyperlanes: Vec<GameId>,
    planet_ids: Vec<GameId>,
    belts: Vec<RawBelt>,
}

impl RawRecord {
    pub fn new(id: GameId, kind: RecordKind) -> Self {
        RawRecord {
            id,
            kind,
            fields: HashMap::new(),
            name_template: None,
            hyperlanes: Vec::new(),
            planet_ids: Vec::new(),
            belts: Vec::new(),
        }
    }

    pub(crate) fn set_field(&mut self, key: &'static str, value: &str) {
        self.fields.insert(key, GameString::from(value));
    }

    pub(crate) fn set_name_template(&mut self, template: &str) {
        self.name_template = Some(GameString::from(template));
    }

    pub(crate) fn set_hyperlanes(&mut self, hyperlanes: Vec<GameId>) {
        self.hyperlanes = hyperlanes;
    }

    pub(crate) fn set_planet_ids(&mut self, planet_ids: Vec<GameId>) {
        self.planet_ids = planet_ids;
    }

    pub(crate) fn set_belts(&mut self, belts: Vec<RawBelt>) {
        self.belts = belts;
    }

    pub fn get_id(&self) -> GameId {
        self.id
    }

    pub fn get_kind(&self) -> RecordKind {
        self.kind
    }

    /// Returns the raw value of a field
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|v| v.as_ref())
    }

    /// Returns the raw value of a field as a shared string
    pub fn get_string(&self, key: &str) -> Option<GameString> {
        self.fields.get(key).cloned()
    }

    /// Returns the value of a field parsed as a real number
    pub fn get_real(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// Returns the value of a field parsed as an id. The unset sentinel
    /// yields [None].
    pub fn get_id_field(&self, key: &str) -> Option<GameId> {
        self.get(key).and_then(parse_id)
    }

    /// Returns the position stored in the `coordinate` block, if both axes
    /// are present and numeric.
    pub fn get_position(&self) -> Option<(f64, f64)> {
        Some((self.get_real(keys::X)?, self.get_real(keys::Y)?))
    }

    /// The unparsed content of the `name` block
    pub fn get_name_template(&self) -> Option<&str> {
        self.name_template.as_deref()
    }

    pub fn get_hyperlanes(&self) -> &[GameId] {
        &self.hyperlanes
    }

    pub fn get_planet_ids(&self) -> &[GameId] {
        &self.planet_ids
    }

    pub fn get_belts(&self) -> &[RawBelt] {
        &self.belts
    }
}

/// Records of a single section, keyed by id and kept in the order they
/// appeared in the save file.
#[derive(Debug, Default, Clone)]
pub struct RecordMap {
    records: Vec<RawRecord>,
    index: HashMap<GameId, usize>,
}

impl RecordMap {
    /// Inserts a record. A record with an id already present replaces the
    /// old one in place, keeping the original position.
    pub fn insert(&mut self, record: RawRecord) {
        if let Some(i) = self.index.get(&record.get_id()) {
            self.records[*i] = record;
        } else {
            self.index.insert(record.get_id(), self.records.len());
            self.records.push(record);
        }
    }

    pub fn get(&self, id: &GameId) -> Option<&RawRecord> {
        self.index.get(id).map(|i| &self.records[*i])
    }

    pub fn contains(&self, id: &GameId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in save file order
    pub fn iter(&self) -> std::slice::Iter<'_, RawRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a RecordMap {
    type Item = &'a RawRecord;
    type IntoIter = std::slice::Iter<'a, RawRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl IntoIterator for RecordMap {
    type Item = RawRecord;
    type IntoIter = std::vec::IntoIter<RawRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl Extend<RawRecord> for RecordMap {
    fn extend<T: IntoIterator<Item = RawRecord>>(&mut self, iter: T) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl FromIterator<RawRecord> for RecordMap {
    fn from_iter<T: IntoIterator<Item = RawRecord>>(iter: T) -> Self {
        let mut map = RecordMap::default();
        map.extend(iter);
        map
    }
}
