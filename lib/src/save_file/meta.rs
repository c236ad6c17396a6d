use std::{collections::HashMap, io::Read, sync::LazyLock};

use derive_more::{Display, Error, From};
use jomini::text::{Operator, ReaderError, Token, TokenReader};
use regex::Regex;

/// The oldest game version whose save layout we understand
pub const SUPPORTED_VERSION: (u32, u32) = (4, 0);

static VERSION_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v?(\d+)\.(\d+)").unwrap());

/// An error that occurred while reading a metadata document
#[derive(Debug, From, Display, Error)]
pub enum MetaError {
    /// The text reader failed to tokenize the document
    #[display("failed to read the metadata: {}", _0)]
    ReaderError(ReaderError),
}

/// Reads the scalar `key=value` pairs at the root of a Paradox script
/// document. Nested blocks are stepped over, and a key seen twice keeps
/// the last value.
pub fn read_root_attributes<R: Read>(reader: R) -> Result<HashMap<String, String>, MetaError> {
    let mut tape = TokenReader::new(reader);
    let mut attributes = HashMap::new();
    let mut depth = 0usize;
    let mut key: Option<String> = None;
    let mut past_eq = false;
    while let Some(token) = tape.next()? {
        match token {
            Token::Open => {
                depth += 1;
                key = None;
                past_eq = false;
            }
            Token::Close => {
                depth = depth.saturating_sub(1);
                key = None;
                past_eq = false;
            }
            Token::Operator(op) => past_eq = op == Operator::Equal,
            Token::Unquoted(scalar) | Token::Quoted(scalar) => {
                if depth > 0 {
                    continue;
                }
                if past_eq {
                    if let Some(key) = key.take() {
                        attributes.insert(key, scalar.to_string());
                    }
                    past_eq = false;
                } else {
                    key = Some(scalar.to_string());
                }
            }
        }
    }
    Ok(attributes)
}

/// The `meta` document of a save: what the save menu shows about it.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SaveMeta {
    version: Option<String>,
    date: Option<String>,
    name: Option<String>,
}

impl SaveMeta {
    pub fn read<R: Read>(reader: R) -> Result<Self, MetaError> {
        let mut attributes = read_root_attributes(reader)?;
        Ok(SaveMeta {
            version: attributes.remove("version"),
            date: attributes.remove("date"),
            name: attributes.remove("name"),
        })
    }

    /// The full version string, like `Cepheus v4.0.2`
    pub fn get_version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The in game date the save was made at
    pub fn get_date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The major and minor version numbers, if the version string has them
    pub fn version_number(&self) -> Option<(u32, u32)> {
        let captures = VERSION_NUMBER.captures(self.version.as_deref()?)?;
        Some((captures[1].parse().ok()?, captures[2].parse().ok()?))
    }

    /// Returns false only if we know the save predates [SUPPORTED_VERSION].
    /// Saves with an unknown version are given the benefit of the doubt.
    pub fn is_supported(&self) -> bool {
        self.version_number()
            .map_or(true, |version| version >= SUPPORTED_VERSION)
    }
}
