use std::{error, io, mem, path::Path, path::PathBuf};

use derive_more::{Display, From};
use tracing::info;

use super::{GameData, Localizer};

/// An error that occurred while processing game data
#[derive(Debug, From, Display)]
pub enum GameDataError {
    /// The localisation directory for the language doesn't exist
    #[display("the localisation directory {} is missing", _0.display())]
    MissingDirectory(PathBuf),
    /// The directory exists, but has no files for the language
    #[display("no localisation files were found in {}", _0.display())]
    #[from(ignore)]
    NoFiles(PathBuf),
    #[display("an I/O error occurred: {_0}")]
    IoError(io::Error),
}

impl error::Error for GameDataError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            GameDataError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

// File system stuff

const LOCALIZATION_SUFFIX: &str = "localisation";

/// A loader for game data
pub struct GameDataLoader {
    language: String,
    localizer: Localizer,
}

impl GameDataLoader {
    /// Create a new game data loader for the given language, like `english`
    pub fn new<S: Into<String>>(language: S) -> Self {
        GameDataLoader {
            language: language.into(),
            localizer: Localizer::default(),
        }
    }

    /// Search the given game (or mod) directory for localization data
    pub fn process_path<P: AsRef<Path>>(&mut self, path: P) -> Result<(), GameDataError> {
        let loc_path = path
            .as_ref()
            .join(LOCALIZATION_SUFFIX)
            .join(&self.language);
        if !loc_path.try_exists()? || !loc_path.is_dir() {
            return Err(GameDataError::MissingDirectory(loc_path));
        }
        let suffix = format!("l_{}.yml", self.language);
        if self.localizer.add_from_path(&loc_path, &suffix) == 0 {
            return Err(GameDataError::NoFiles(loc_path));
        }
        info!(
            "loaded {} localisation keys from {}",
            self.localizer.len(),
            loc_path.display()
        );
        Ok(())
    }

    /// Finalize the game data processing
    pub fn finalize(&mut self) -> GameData {
        self.localizer.remove_formatting();
        GameData {
            language: self.language.clone(),
            localizer: mem::take(&mut self.localizer),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{super::Localize, *};

    #[test]
    fn test_load() -> Result<(), Box<dyn std::error::Error>> {
        let install = tempfile::tempdir()?;
        let dir = install.path().join("localisation").join("english");
        fs::create_dir_all(&dir)?;
        fs::write(
            dir.join("names_l_english.yml"),
            "l_english:\n NAME_Sol:0 \"§YSol§!\"\n",
        )?;
        let mut loader = GameDataLoader::new("english");
        loader.process_path(install.path())?;
        let data = loader.finalize();
        assert_eq!(data.lookup("NAME_Sol").unwrap().as_ref(), "Sol");
        assert_eq!(data.get_language(), "english");
        Ok(())
    }

    #[test]
    fn test_missing() -> Result<(), Box<dyn std::error::Error>> {
        let install = tempfile::tempdir()?;
        let mut loader = GameDataLoader::new("german");
        assert!(matches!(
            loader.process_path(install.path()),
            Err(GameDataError::MissingDirectory(_))
        ));
        fs::create_dir_all(install.path().join("localisation").join("german"))?;
        assert!(matches!(
            loader.process_path(install.path()),
            Err(GameDataError::NoFiles(_))
        ));
        Ok(())
    }
}
