/// A submodule that provides the [CelestialBody] object, a node of a system tree.
mod body;
pub use body::{
    is_star_class, BodyKind, CelestialBody, ASTEROID_CLASS, DEFAULT_MOON_CLASS,
    DEFAULT_MOON_SIZE, DEFAULT_PLANET_CLASS, DEFAULT_PLANET_SIZE, STAR_CLASS_MARKERS,
};

/// A submodule that provides the [System] object.
mod system;
pub use system::{
    AsteroidBelt, System, DEFAULT_BELT_RADIUS, DEFAULT_BELT_TYPE, DEFAULT_STAR_CLASS,
};

/// A submodule that provides the [Megastructure] object.
mod megastructure;
pub use megastructure::Megastructure;

/// A submodule that provides the [WormholePair] object, and the pairing of
/// bypasses into them.
mod wormhole;
pub use wormhole::{anchor_bypasses, pair_wormholes, WormholePair};

/// A submodule that provides the [Nebula] object.
mod nebula;
pub use nebula::{Nebula, DEFAULT_NEBULA_RADIUS};

mod diagnostic;
pub(crate) use diagnostic::report;
pub use diagnostic::Diagnostic;

/// The builder turning flat planet records into system trees
mod hierarchy;
pub use hierarchy::build_systems;

mod galaxy;
pub use galaxy::{BodyCounts, Galaxy};
