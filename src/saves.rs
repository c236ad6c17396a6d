use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use continuum_lib::save_file::SaveFile;
use derive_more::Display;
use tracing::warn;

/// The directory with the save folders, within the user directory
pub const SAVE_DIR: &str = "save games";

const SAVE_EXTENSION: &str = "sav";

/// What the version of a save without metadata is shown as
const UNKNOWN_VERSION: &str = "Unknown";
const UNKNOWN_DATE: &str = "Unknown Date";

/// The newest save of a single save folder
#[derive(Debug, Display)]
#[display("{} {}", date.as_deref().unwrap_or(UNKNOWN_DATE), name)]
pub struct SaveEntry {
    name: String,
    path: PathBuf,
    version: Option<String>,
    date: Option<String>,
}

impl SaveEntry {
    fn new(folder: &Path, path: PathBuf) -> Self {
        let (version, date) = match SaveFile::open_meta(&path) {
            Ok(Some(meta)) => (
                meta.get_version().map(str::to_owned),
                meta.get_date().map(str::to_owned),
            ),
            Ok(None) => (None, None),
            Err(e) => {
                warn!("Could not read metadata for {}: {}", path.display(), e);
                (None, None)
            }
        };
        let folder = folder
            .file_name()
            .map_or_else(String::new, |f| f.to_string_lossy().into_owned());
        let file = path
            .file_name()
            .map_or_else(String::new, |f| f.to_string_lossy().into_owned());
        SaveEntry {
            name: format!("{}/{}", folder, file),
            path,
            version,
            date,
        }
    }

    pub fn get_path(&self) -> &Path {
        &self.path
    }

    pub fn get_version(&self) -> &str {
        self.version.as_deref().unwrap_or(UNKNOWN_VERSION)
    }
}

/// Returns the most recently modified save directly inside `folder`
fn newest_save(folder: &Path) -> io::Result<Option<PathBuf>> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().is_none_or(|e| e != SAVE_EXTENSION) {
            continue;
        }
        let modified = fs::metadata(&path)?.modified()?;
        if newest.as_ref().is_none_or(|(time, _)| modified > *time) {
            newest = Some((modified, path));
        }
    }
    Ok(newest.map(|(_, path)| path))
}

/// Finds the newest save of every save folder under `save_dir`
pub fn find_saves(save_dir: &Path) -> Vec<SaveEntry> {
    let mut saves = Vec::new();
    let mut stack = vec![save_dir.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Could not list {}: {}", dir.display(), e);
                continue;
            }
        };
        let mut folders: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_dir())
            .collect();
        folders.sort();
        for folder in folders {
            match newest_save(&folder) {
                Ok(Some(path)) => saves.push(SaveEntry::new(&folder, path)),
                Ok(None) => {}
                Err(e) => warn!("Could not list {}: {}", folder.display(), e),
            }
            stack.push(folder);
        }
    }
    saves
}

/// The numbers in a version string, for ordering
fn version_key(version: &str) -> Vec<u32> {
    version
        .split(|c: char| !c.is_ascii_digit())
        .filter_map(|n| n.parse().ok())
        .collect()
}

/// Groups saves by game version, oldest version first
pub fn group_by_version(saves: Vec<SaveEntry>) -> Vec<(String, Vec<SaveEntry>)> {
    let mut groups: Vec<(String, Vec<SaveEntry>)> = Vec::new();
    for save in saves {
        match groups.iter_mut().find(|(v, _)| v == save.get_version()) {
            Some((_, group)) => group.push(save),
            None => groups.push((save.get_version().to_owned(), vec![save])),
        }
    }
    groups.sort_by_key(|(version, _)| version_key(version));
    groups
}
