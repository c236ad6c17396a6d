use super::super::parser::{
    keys,
    types::{GameId, GameString},
    RawRecord,
};

/// Class tag substrings that make a body a star
pub const STAR_CLASS_MARKERS: [&str; 3] = ["_star", "hole", "pulsar"];
/// The class tag of asteroids
pub const ASTEROID_CLASS: &str = "pc_asteroid";

pub const DEFAULT_PLANET_CLASS: &str = "pc_barren";
pub const DEFAULT_PLANET_SIZE: u32 = 10;
pub const DEFAULT_MOON_CLASS: &str = "pc_barren_cold";
pub const DEFAULT_MOON_SIZE: u32 = 5;

/// Returns true if the class tag belongs to a star class body
pub fn is_star_class(class: &str) -> bool {
    STAR_CLASS_MARKERS.iter().any(|m| class.contains(m))
}

/// What a body in a system tree is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BodyKind {
    /// The synthetic root every system tree hangs off
    Center,
    Star,
    Planet,
    Moon,
    Asteroid,
}

impl BodyKind {
    /// Classifies a planet record. The class tag wins over the `moon_of`
    /// reference, so a star orbiting another body is still a star.
    pub fn classify(class: Option<&str>, moon_of: Option<GameId>) -> Self {
        match class {
            Some(class) if is_star_class(class) => BodyKind::Star,
            Some(ASTEROID_CLASS) => BodyKind::Asteroid,
            _ if moon_of.is_some() => BodyKind::Moon,
            _ => BodyKind::Planet,
        }
    }
}

/// A node of a system tree.
/// Owns its children, which are sorted by distance from this body.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CelestialBody {
    id: Option<GameId>,
    kind: BodyKind,
    class: Option<GameString>,
    size: Option<u32>,
    position: Option<(f64, f64)>,
    orbit: Option<f64>,
    moon_of: Option<GameId>,
    megastructure: Option<GameId>,
    name: Option<GameString>,
    nesting_level: usize,
    distance: f64,
    angle: f64,
    children: Vec<CelestialBody>,
}

impl CelestialBody {
    /// Creates the synthetic center of a system, sitting at the origin
    pub fn center() -> Self {
        CelestialBody {
            id: None,
            kind: BodyKind::Center,
            class: None,
            size: None,
            position: Some((0.0, 0.0)),
            orbit: None,
            moon_of: None,
            megastructure: None,
            name: None,
            nesting_level: 0,
            distance: 0.0,
            angle: 0.0,
            children: Vec::new(),
        }
    }

    /// Creates an unattached body from a planet record
    pub fn from_record(record: &RawRecord) -> Self {
        let class = record.get_string(keys::PLANET_CLASS);
        let moon_of = record.get_id_field(keys::MOON_OF);
        CelestialBody {
            id: Some(record.get_id()),
            kind: BodyKind::classify(class.as_deref(), moon_of),
            class,
            size: record.get(keys::PLANET_SIZE).and_then(|s| s.parse().ok()),
            position: record.get_position(),
            orbit: record.get_real(keys::ORBIT),
            moon_of,
            megastructure: None,
            name: record.get_string(keys::NAME),
            nesting_level: 0,
            distance: 0.0,
            angle: 0.0,
            children: Vec::new(),
        }
    }

    /// Sets the distance and angle of every child relative to this body and
    /// sorts them. Without coordinates on both ends the explicit orbit is
    /// used as the distance, with an angle of zero.
    pub(crate) fn place_children(&mut self) {
        let origin = self.position;
        for child in self.children.iter_mut() {
            match (child.position, origin) {
                (Some((x, y)), Some((px, py))) => {
                    let (dx, dy) = (x - px, y - py);
                    child.distance = dx.hypot(dy);
                    child.angle = (-dy).atan2(-dx).to_degrees();
                }
                _ => {
                    child.distance = child.orbit.map_or(0.0, f64::abs);
                    child.angle = 0.0;
                }
            }
        }
        self.children.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.sort_rank().cmp(&b.sort_rank()))
                .then(a.angle.total_cmp(&b.angle))
        });
    }

    /// Stars sitting right on their parent come first, then other stars,
    /// then everything else
    fn sort_rank(&self) -> u8 {
        match self.kind {
            BodyKind::Star if self.distance == 0.0 => 0,
            BodyKind::Star => 1,
            _ => 2,
        }
    }

    pub(crate) fn push_child(&mut self, child: CelestialBody) {
        self.children.push(child);
    }

    pub(crate) fn set_nesting_level(&mut self, level: usize) {
        self.nesting_level = level;
    }

    pub(crate) fn set_name<S: Into<GameString>>(&mut self, name: S) {
        self.name = Some(name.into());
    }

    pub(crate) fn set_megastructure(&mut self, id: GameId) {
        self.megastructure = Some(id);
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<CelestialBody> {
        &mut self.children
    }

    /// The id of the planet record, [None] for the system center
    pub fn get_id(&self) -> Option<GameId> {
        self.id
    }

    pub fn get_kind(&self) -> BodyKind {
        self.kind
    }

    pub fn is_star(&self) -> bool {
        self.kind == BodyKind::Star
    }

    pub fn get_class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn get_size(&self) -> Option<u32> {
        self.size
    }

    /// Absolute position in save file units
    pub fn get_position(&self) -> Option<(f64, f64)> {
        self.position
    }

    /// The raw `orbit` field
    pub fn get_orbit(&self) -> Option<f64> {
        self.orbit
    }

    pub fn get_moon_of(&self) -> Option<GameId> {
        self.moon_of
    }

    /// The megastructure built on this body, if any
    pub fn get_megastructure(&self) -> Option<GameId> {
        self.megastructure
    }

    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Structural depth, zero for the system center
    pub fn get_nesting_level(&self) -> usize {
        self.nesting_level
    }

    /// Distance from the parent body
    pub fn get_distance(&self) -> f64 {
        self.distance
    }

    /// Angle around the parent body, in degrees
    pub fn get_angle(&self) -> f64 {
        self.angle
    }

    pub fn get_children(&self) -> &[CelestialBody] {
        &self.children
    }

    /// Visits this body and all of its descendants, depth first
    pub fn walk<'a, F: FnMut(&'a CelestialBody)>(&'a self, f: &mut F) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }
}
