use std::{
    collections::HashMap,
    fs, mem,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use super::super::save_file::parser::types::GameString;

/* This is not a yaml parser. The localisation files only look like yaml, and
the only construct we care about is the `key:N "value"` line. Everything
else, the language header included, just ends up as a key without a value
and gets dropped.
https://stellaris.paradoxwikis.com/Localisation_modding
*/

/// An object that localizes strings.
/// It reads localization data from a directory and provides localized strings.
#[derive(Default)]
pub struct Localizer {
    /// Whether at least a single file has been loaded
    initialized: bool,
    data: HashMap<String, GameString>,
}

impl Localizer {
    /// Adds localization data from a directory. Only files whose name ends
    /// with `suffix` are read, subdirectories are searched too.
    /// The path may be invalid, in which case the function will simply do
    /// nothing. Returns the number of files that were loaded.
    pub fn add_from_path<P: AsRef<Path>>(&mut self, path: P, suffix: &str) -> usize {
        let path = path.as_ref();
        if !path.is_dir() {
            return 0;
        }
        // a stack to keep track of the directories
        let mut stack: Vec<PathBuf> = vec![PathBuf::from(path)];
        // a vector to keep track of all the files
        let mut all_files: Vec<PathBuf> = Vec::new();
        while let Some(entry) = stack.pop() {
            if let Ok(entries) = fs::read_dir(entry) {
                for entry in entries.flatten() {
                    if let Ok(file_type) = entry.file_type() {
                        if file_type.is_dir() {
                            stack.push(entry.path());
                        } else if entry.file_name().to_string_lossy().ends_with(suffix) {
                            all_files.push(entry.path());
                        }
                    }
                }
            }
        }
        // later files override earlier ones, so the order must not depend on the file system
        all_files.sort();
        let mut loaded = 0;
        for entry in all_files {
            match fs::read_to_string(&entry) {
                Ok(contents) => {
                    self.add_localization_file(&contents);
                    loaded += 1;
                }
                Err(e) => warn!("could not read {}: {}", entry.display(), e),
            }
        }
        debug!("loaded {} localisation files from {}", loaded, path.display());
        loaded
    }

    pub fn add_localization_file(&mut self, contents: &str) {
        self.initialized = true;
        let mut key = String::new();
        let mut value = String::new();
        let mut past = false;
        let mut quotes = false;
        let mut comment = false;
        for char in contents.trim_start_matches('\u{feff}').chars() {
            if comment && char != '\n' {
                continue;
            }
            match char {
                ' ' | '\t' => {
                    if quotes {
                        value.push(char);
                    }
                }
                '\n' | '\r' => {
                    self.flush(&mut key, &mut value, past, quotes);
                    past = false;
                    quotes = false;
                    comment = false;
                }
                '#' if !past && !quotes => {
                    comment = true;
                }
                ':' => {
                    if quotes {
                        value.push(char);
                    } else {
                        past = true;
                    }
                }
                '"' => {
                    quotes = !quotes;
                }
                _ => {
                    if past {
                        if quotes {
                            value.push(char);
                        }
                    } else {
                        key.push(char);
                    }
                }
            }
        }
        self.flush(&mut key, &mut value, past, quotes);
    }

    /// Stores the pending entry if it is complete, clears it either way
    fn flush(&mut self, key: &mut String, value: &mut String, past: bool, quotes: bool) {
        if past && !quotes && !value.is_empty() && !key.is_empty() {
            self.data
                .insert(mem::take(key), GameString::from(mem::take(value)));
        } else {
            key.clear();
            value.clear();
        }
    }

    /*
    Stellaris colours text with § followed by a single character, and §!
    closes the colour. Neither means anything outside of the game's UI.
    */

    pub fn remove_formatting(&mut self) {
        for (_, value) in self.data.iter_mut() {
            if !value.contains('§') {
                continue;
            }
            let mut new = String::with_capacity(value.len());
            let mut iter = value.chars();
            while let Some(c) = iter.next() {
                if c == '§' {
                    // the colour code, or the ! that closes it
                    iter.next();
                } else {
                    new.push(c);
                }
            }
            *value = GameString::from(new);
        }
    }

    /// Whether any localisation file has been read, even an empty one
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

impl<K: Into<String>, V: AsRef<str>> FromIterator<(K, V)> for Localizer {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Localizer {
            initialized: true,
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), GameString::from(v.as_ref())))
                .collect(),
        }
    }
}

/// An object that can be used to localize strings
pub trait Localize<T: AsRef<str>> {
    /// A simple function that looks up raw value associated with the given localization key
    fn lookup<K: AsRef<str>>(&self, key: K) -> Option<T>;

    fn is_empty(&self) -> bool;
}

impl Localize<GameString> for Localizer {
    fn lookup<K: AsRef<str>>(&self, key: K) -> Option<GameString> {
        self.data.get(key.as_ref()).cloned()
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(feature = "serde")]
mod serialize {
    use super::Localizer;
    use serde::Serialize;

    impl Serialize for Localizer {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            self.data.serialize(serializer)
        }
    }
}
