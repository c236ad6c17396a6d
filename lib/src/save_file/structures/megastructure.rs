use super::super::parser::{
    keys,
    types::{GameId, GameString},
    RawRecord,
};

/// Type substrings of megastructures that are gateways
const GATEWAY_MARKERS: [&str; 2] = ["gateway", "lgate"];

/// A megastructure that has been placed in the galaxy
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Megastructure {
    id: GameId,
    kind: GameString,
    origin: GameId,
    host: Option<GameId>,
    graphical_culture: Option<GameString>,
    position: Option<(f64, f64)>,
}

impl Megastructure {
    /// Creates a megastructure from its record. Returns [None] for records
    /// without a type, or without an origin system, meaning the structure
    /// hasn't been placed yet.
    pub fn from_record(record: &RawRecord) -> Option<Self> {
        Some(Megastructure {
            id: record.get_id(),
            kind: record.get_string(keys::TYPE)?,
            origin: record.get_id_field(keys::ORIGIN)?,
            host: record.get_id_field(keys::PLANET),
            graphical_culture: record.get_string(keys::GRAPHICAL_CULTURE),
            position: record.get_position(),
        })
    }

    pub fn get_id(&self) -> GameId {
        self.id
    }

    /// The type tag, like `habitat_central`
    pub fn get_kind(&self) -> &str {
        &self.kind
    }

    /// The system the megastructure is in
    pub fn get_origin(&self) -> GameId {
        self.origin
    }

    /// The planet the megastructure is attached to. [None] means the
    /// megastructure floats freely in its system.
    pub fn host(&self) -> Option<GameId> {
        self.host
    }

    pub fn get_graphical_culture(&self) -> Option<&str> {
        self.graphical_culture.as_deref()
    }

    /// Position relative to the system, the origin if unknown
    pub fn get_position(&self) -> (f64, f64) {
        self.position.unwrap_or_default()
    }

    /// Gateways are handled by the game itself and never spawned by us
    pub fn is_gateway(&self) -> bool {
        GATEWAY_MARKERS.iter().any(|m| self.kind.contains(m))
    }

    pub(crate) fn clear_host(&mut self) {
        self.host = None;
    }
}
