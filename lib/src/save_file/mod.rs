/// Lower level save parsing functionality.
/// Meant to be output structure agnostic, and focused on cutting the
/// gamestate into [records](parser::RawRecord).
pub mod parser;

/// Output structures, like [structures::System] and [structures::Galaxy]
pub mod structures;

/// Module providing a parsed game state
mod game_state;
pub use game_state::GameState;

/// The `meta` document of a save
mod meta;
pub use meta::{read_root_attributes, MetaError, SaveMeta, SUPPORTED_VERSION};

/// Parser I/O and facade
mod save_file;
pub use save_file::{SaveFile, SaveFileError};

#[cfg(test)]
pub(crate) mod fixture;
