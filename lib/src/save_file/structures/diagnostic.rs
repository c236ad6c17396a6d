use derive_more::Display;
use tracing::warn;

use super::super::parser::types::GameId;

/// A referential inconsistency found while building the galaxy. None of
/// these stop the build, the offending reference is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Diagnostic {
    /// A moon references a body that doesn't exist, it orbits the system center instead
    #[display("body {body} is a moon of {parent}, which doesn't exist")]
    MissingMoonParent { body: GameId, parent: GameId },
    /// Following `moon_of` from this body leads back to it
    #[display("body {body} is part of a moon_of cycle")]
    CircularMoonReference { body: GameId },
    /// A moon is listed by a system, but the body it orbits is in no system.
    /// `parent` is the top of the moon's chain, which joins the listing system
    #[display("body {body} orbits {parent}, which no system lists")]
    UnplacedMoonParent { body: GameId, parent: GameId },
    /// A system lists a planet that doesn't exist
    #[display("system {system} lists planet {planet}, which doesn't exist")]
    UnknownPlanet { system: GameId, planet: GameId },
    /// A planet already belongs to another system tree
    #[display("planet {planet} of system {system} already belongs to another system")]
    DuplicatePlanet { system: GameId, planet: GameId },
    /// A megastructure is attached to a planet that doesn't exist
    #[display("megastructure {megastructure} is attached to missing planet {planet}")]
    MissingHostPlanet {
        megastructure: GameId,
        planet: GameId,
    },
    /// A megastructure is in a system that doesn't exist
    #[display("megastructure {megastructure} is in missing system {system}")]
    UnknownOriginSystem {
        megastructure: GameId,
        system: GameId,
    },
    /// A wormhole bypass has no natural wormhole placing it in a system
    #[display("wormhole bypass {bypass} isn't anchored to any system")]
    UnanchoredBypass { bypass: GameId },
}

/// Logs the diagnostic and adds it to the list
pub(crate) fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    warn!("{}", diagnostic);
    diagnostics.push(diagnostic);
}
