/// Core save file parser. Wrapper over the lower level [save_file::parser]
/// module and [save_file::structures].
///
/// ## Getting Started
///
/// The facade for the entire module is the [save_file::SaveFile] struct,
/// which holds the decompressed documents of a save. The gamestate is read
/// into a [save_file::GameState], a set of raw records per section, which
/// is then turned into a [save_file::structures::Galaxy] of system trees.
///
/// ## Example
///
/// ```rust
/// use continuum_lib::{game_data::Localizer, save_file::SaveFile};
///
/// if let Ok(save_file) = SaveFile::open("/path/to/file.sav") {
///     let galaxy = save_file.parse().build_galaxy(&Localizer::default());
///     for system in galaxy.get_systems() {
///         println!("{}: {} bodies", system.get_display_name(), system.get_bodies().len());
///     }
/// }
/// ```
pub mod save_file;

/// A submodule for handling the game data
pub mod game_data;

/// A module for writing the parsed galaxy as a static galaxy mod.
#[cfg(feature = "display")]
pub mod display;
