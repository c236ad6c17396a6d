use std::rc::Rc;

/// A type alias for a game object id.
/// Stellaris ids are unsigned 32 bit integers, with [UNSET_ID] standing in
/// for "no object".
pub type GameId = u32;

/// The value the game writes into id fields that do not point anywhere yet.
/// Shows up most often as the `origin` of megastructures that are still
/// being constructed outside of the galaxy.
pub const UNSET_ID: GameId = u32::MAX;

/// A type alias for a game string.
/// Roughly meant to represent a raw string from a save file, reference counted so that it exists once in memory.
/// Actually a [Rc] around a [str].
pub type GameString = Rc<str>;

/// Parses a numeric id, returning [None] for the [UNSET_ID] sentinel and
/// for anything that isn't a number.
pub fn parse_id(value: &str) -> Option<GameId> {
    match value.trim().parse::<GameId>() {
        Ok(UNSET_ID) | Err(_) => None,
        Ok(id) => Some(id),
    }
}
