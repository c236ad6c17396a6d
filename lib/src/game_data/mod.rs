mod localizer;
pub use localizer::{Localize, Localizer};

mod loader;
pub use loader::{GameDataError, GameDataLoader};

/// The recursive resolver for `name` templates.
mod names;
pub use names::{resolve_name, UNKNOWN};

use super::save_file::parser::types::GameString;

/// Everything we need from the game's installation directory
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GameData {
    language: String,
    localizer: Localizer,
}

impl Localize<GameString> for GameData {
    fn lookup<K: AsRef<str>>(&self, key: K) -> Option<GameString> {
        self.localizer.lookup(key)
    }

    fn is_empty(&self) -> bool {
        self.localizer.is_empty()
    }
}

impl GameData {
    pub fn get_localizer(&self) -> &Localizer {
        &self.localizer
    }

    /// The language the data was loaded for, without the `l_` prefix
    pub fn get_language(&self) -> &str {
        &self.language
    }
}
