use std::{
    env, fs,
    path::{Path, PathBuf},
};

use continuum_lib::save_file::read_root_attributes;
use derive_more::{Display, From};
use keyvalues_parser::{Value, Vdf};

/// The Steam ID for Stellaris.
/// Source: https://steamdb.info/app/281990/
const STELLARIS_ID: &str = "281990";

#[cfg(target_os = "linux")]
const DEFAULT_STEAM_PATHS: [&str; 2] = [".local/share/Steam/steamapps/", ".steam/steam/steamapps/"];
#[cfg(target_os = "windows")]
const DEFAULT_STEAM_PATHS: [&str; 1] = ["C:/Program Files (x86)/Steam/steamapps/"];
#[cfg(target_os = "macos")]
const DEFAULT_STEAM_PATHS: [&str; 1] = ["Library/Application Support/Steam/steamapps/"];
#[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
const DEFAULT_STEAM_PATHS: [&str; 0] = [];

/// The default path from the Steam directory to the libraryfolders.vdf file.
const DEFAULT_VDF_PATH: &str = "libraryfolders.vdf";

/// The default path from the library to the Stellaris directory.
pub const STELLARIS_PATH: &str = "steamapps/common/Stellaris";

/// Where the game keeps saves and settings, relative to the home directory
#[cfg(target_os = "linux")]
const USER_DIR: &str = ".local/share/Paradox Interactive/Stellaris";
#[cfg(not(target_os = "linux"))]
const USER_DIR: &str = "Documents/Paradox Interactive/Stellaris";

const SETTINGS_FILE: &str = "settings.txt";
const LANGUAGE_KEY: &str = "language";
const LANGUAGE_PREFIX: &str = "l_";

#[derive(Debug, Display, From)]
pub enum SteamError {
    /// The Steam directory was not found.
    #[display("Steam directory not found")]
    SteamDirNotFound,
    /// The VDF file was not found.
    #[display("VDF file not found")]
    VdfNotFound,
    /// An error occurred while reading the VDF file.
    #[display("error reading the VDF file: {}", _0)]
    #[from]
    IoError(std::io::Error),
    /// An error occurred while parsing the VDF file.
    #[display("library error parsing VDF file: {}", _0)]
    #[from]
    VdfParseError(keyvalues_parser::error::Error),
    /// An error occurred while processing the VDF file.
    #[display("error processing VDF file: {}", _0)]
    VdfProcessingError(&'static str),
    /// The Stellaris directory was not found.
    #[display("Stellaris directory pointed to not found")]
    StellarisNotFound,
    /// Stellaris is missing from the library.
    #[display("Stellaris missing from library")]
    StellarisMissing,
}

impl std::error::Error for SteamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SteamError::IoError(e) => Some(e),
            SteamError::VdfParseError(e) => Some(e),
            _ => None,
        }
    }
}

#[allow(deprecated)] // home_dir only misbehaves on exotic Windows setups
fn home_dir() -> Option<PathBuf> {
    env::home_dir()
}

/// Finds the Steam library folder that has Stellaris installed
pub fn get_library_path() -> Result<PathBuf, SteamError> {
    let steam_path = DEFAULT_STEAM_PATHS
        .iter()
        .filter_map(|p| {
            let p = Path::new(p);
            if p.is_absolute() {
                Some(p.to_path_buf())
            } else {
                home_dir().map(|h| h.join(p))
            }
        })
        .find(|p| p.exists())
        .ok_or(SteamError::SteamDirNotFound)?;
    let vdf_path = steam_path.join(DEFAULT_VDF_PATH);
    if !vdf_path.exists() {
        return Err(SteamError::VdfNotFound);
    }
    let vdf_contents = fs::read_to_string(&vdf_path)?;
    find_library(&Vdf::parse(&vdf_contents)?)
}

/// Finds the library containing the game in a parsed libraryfolders.vdf
fn find_library(vdf: &Vdf) -> Result<PathBuf, SteamError> {
    let Value::Obj(folders) = &vdf.value else {
        return Err(SteamError::VdfProcessingError(
            "Root of VDF file is not an object",
        ));
    };
    for folder in folders.values().flatten() {
        let Value::Obj(folder) = folder else {
            continue;
        };
        let has_game = folder.get("apps").is_some_and(|apps| {
            apps.iter().any(|app| match app {
                Value::Obj(app) => app.keys().any(|k| k == STELLARIS_ID),
                _ => false,
            })
        });
        if !has_game {
            continue;
        }
        return match folder.get("path").and_then(|p| p.first()) {
            Some(Value::Str(path)) => Ok(PathBuf::from(path.to_string())),
            _ => Err(SteamError::VdfProcessingError("Path is not a string")),
        };
    }
    Err(SteamError::StellarisMissing)
}

/// Get the path to the Stellaris installation within a library
pub fn get_game_path(library_path: &Path) -> Result<PathBuf, SteamError> {
    let path = library_path.join(STELLARIS_PATH);
    if path.exists() {
        Ok(path)
    } else {
        Err(SteamError::StellarisNotFound)
    }
}

/// The directory with the user's saves and settings, if it exists
pub fn get_user_dir() -> Option<PathBuf> {
    home_dir().map(|h| h.join(USER_DIR)).filter(|p| p.is_dir())
}

/// Reads the game language from the user's settings, like `english`
pub fn get_language(user_dir: &Path) -> Option<String> {
    let settings = fs::read(user_dir.join(SETTINGS_FILE)).ok()?;
    let mut attributes = read_root_attributes(settings.as_slice()).ok()?;
    let language = attributes.remove(LANGUAGE_KEY)?;
    Some(
        language
            .strip_prefix(LANGUAGE_PREFIX)
            .unwrap_or(&language)
            .to_owned(),
    )
}
