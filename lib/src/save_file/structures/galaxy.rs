use derive_more::Display;

use super::{
    super::parser::{keys, types::GameId, RecordMap},
    body::{is_star_class, ASTEROID_CLASS},
    Diagnostic, Megastructure, Nebula, System, WormholePair,
};

/// How many of each thing the galaxy has
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[display(
    "{systems} systems, {nebulae} nebulas, {stars} stars, {planets} planets, {moons} moons, and {asteroids} asteroids"
)]
pub struct BodyCounts {
    pub systems: usize,
    pub nebulae: usize,
    pub stars: usize,
    pub planets: usize,
    pub moons: usize,
    pub asteroids: usize,
    pub megastructures: usize,
    pub wormhole_pairs: usize,
}

impl BodyCounts {
    /// Classifies every planet record, whether or not it ended up in a system
    pub(crate) fn count_planets(&mut self, planets: &RecordMap) {
        for planet in planets {
            match planet.get(keys::PLANET_CLASS) {
                Some(class) if is_star_class(class) => self.stars += 1,
                Some(ASTEROID_CLASS) => self.asteroids += 1,
                _ if planet.get(keys::MOON_OF).is_some() => self.moons += 1,
                _ => self.planets += 1,
            }
        }
    }
}

/// Everything we extract from a save
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Galaxy {
    systems: Vec<System>,
    nebulae: Vec<Nebula>,
    wormhole_pairs: Vec<WormholePair>,
    megastructures: Vec<Megastructure>,
    counts: BodyCounts,
    diagnostics: Vec<Diagnostic>,
}

impl Galaxy {
    pub(crate) fn new(
        systems: Vec<System>,
        nebulae: Vec<Nebula>,
        wormhole_pairs: Vec<WormholePair>,
        megastructures: Vec<Megastructure>,
        counts: BodyCounts,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Galaxy {
            systems,
            nebulae,
            wormhole_pairs,
            megastructures,
            counts,
            diagnostics,
        }
    }

    pub fn get_systems(&self) -> &[System] {
        &self.systems
    }

    pub fn get_system(&self, id: GameId) -> Option<&System> {
        self.systems.iter().find(|s| s.get_id() == id)
    }

    pub fn get_nebulae(&self) -> &[Nebula] {
        &self.nebulae
    }

    pub fn get_wormhole_pairs(&self) -> &[WormholePair] {
        &self.wormhole_pairs
    }

    pub fn get_megastructures(&self) -> &[Megastructure] {
        &self.megastructures
    }

    pub fn get_counts(&self) -> &BodyCounts {
        &self.counts
    }

    pub fn get_diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The system the player empire starts in. That's the first system whose
    /// name matches, ignoring case, or simply the first system.
    pub fn start_system(&self, name: &str) -> Option<&System> {
        self.systems
            .iter()
            .find(|s| s.get_name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .or_else(|| self.systems.first())
    }
}
