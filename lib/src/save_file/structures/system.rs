use super::{
    super::parser::{
        types::{GameId, GameString},
        RawBelt,
    },
    CelestialBody, Megastructure,
};

pub const DEFAULT_STAR_CLASS: &str = "sc_g";
pub const DEFAULT_BELT_TYPE: &str = "rocky_asteroid_belt";
pub const DEFAULT_BELT_RADIUS: f64 = 95.0;

/// An asteroid belt around the system center
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AsteroidBelt {
    belt_type: GameString,
    radius: f64,
}

impl AsteroidBelt {
    pub fn get_type(&self) -> &str {
        &self.belt_type
    }

    pub fn get_radius(&self) -> f64 {
        self.radius
    }
}

impl From<&RawBelt> for AsteroidBelt {
    fn from(raw: &RawBelt) -> Self {
        AsteroidBelt {
            belt_type: if raw.belt_type.is_empty() {
                DEFAULT_BELT_TYPE.into()
            } else {
                raw.belt_type.clone()
            },
            radius: raw.radius.parse().unwrap_or(DEFAULT_BELT_RADIUS),
        }
    }
}

/// A star system, with the full tree of bodies in it
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct System {
    id: GameId,
    name: Option<GameString>,
    position: Option<(f64, f64)>,
    star_class: Option<GameString>,
    hyperlanes: Vec<GameId>,
    asteroid_belts: Vec<AsteroidBelt>,
    megastructures: Vec<Megastructure>,
    star_count: usize,
    center: CelestialBody,
}

impl System {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: GameId,
        name: Option<GameString>,
        position: Option<(f64, f64)>,
        star_class: Option<GameString>,
        hyperlanes: Vec<GameId>,
        asteroid_belts: Vec<AsteroidBelt>,
        megastructures: Vec<Megastructure>,
        star_count: usize,
        center: CelestialBody,
    ) -> Self {
        System {
            id,
            name,
            position,
            star_class,
            hyperlanes,
            asteroid_belts,
            megastructures,
            star_count,
            center,
        }
    }

    pub fn get_id(&self) -> GameId {
        self.id
    }

    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The name, or a placeholder derived from the id
    pub fn get_display_name(&self) -> String {
        match &self.name {
            Some(name) => name.to_string(),
            None => format!("Sys_{}", self.id),
        }
    }

    /// Galactic position, the origin if unknown
    pub fn get_position(&self) -> (f64, f64) {
        self.position.unwrap_or_default()
    }

    pub fn get_star_class(&self) -> &str {
        self.star_class.as_deref().unwrap_or(DEFAULT_STAR_CLASS)
    }

    /// Ids of the systems this one has hyperlanes to
    pub fn get_hyperlanes(&self) -> &[GameId] {
        &self.hyperlanes
    }

    pub fn get_asteroid_belts(&self) -> &[AsteroidBelt] {
        &self.asteroid_belts
    }

    /// Megastructures with this system as their origin
    pub fn get_megastructures(&self) -> &[Megastructure] {
        &self.megastructures
    }

    /// Number of star class bodies in the tree
    pub fn get_star_count(&self) -> usize {
        self.star_count
    }

    /// The synthetic root of the body tree
    pub fn get_center(&self) -> &CelestialBody {
        &self.center
    }

    /// The bodies orbiting the system center
    pub fn get_bodies(&self) -> &[CelestialBody] {
        self.center.get_children()
    }
}
