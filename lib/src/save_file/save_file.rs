use derive_more::{Display, Error, From};
use std::{
    fmt::Debug,
    fs::File,
    io::{self, Cursor, Read, Seek},
    path::Path,
    string::FromUtf8Error,
};
use zip::{read::ZipArchive, result::ZipError};

use super::{
    game_state::GameState,
    meta::{MetaError, SaveMeta},
};

/// The header of an archive within a save file.
const ARCHIVE_HEADER: &[u8; 4] = b"PK\x03\x04";

/// The archive entry holding the game state
const GAMESTATE_ENTRY: &str = "gamestate";
/// The archive entry holding the save metadata
const META_ENTRY: &str = "meta";

/// An error that can occur when opening a save file.
/// Generally things that are the fault of the user, however unintentional those may be
#[derive(Debug, From, Display, Error)]
pub enum SaveFileError {
    /// Something went wrong with stdlib IO.
    IoError(io::Error),
    /// We found a problem
    #[display("{}", _0)]
    ParseError(#[error(not(source))] &'static str),
    /// The archive doesn't have an entry we need
    #[display("the save archive has no {} entry", _0)]
    #[from(ignore)]
    MissingEntry(#[error(not(source))] &'static str),
    /// Something went wrong with decompressing the save file.
    DecompressionError(ZipError),
    /// Decoding bytes failed
    DecodingError(FromUtf8Error),
    /// The metadata document couldn't be read
    MetaError(MetaError),
}

/// Reads an archive entry, if it exists, into a string
fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &'static str,
) -> Result<Option<String>, SaveFileError> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if entry.is_dir() {
        return Err(SaveFileError::ParseError("Save file entry is a directory"));
    }
    let mut contents = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut contents)?;
    Ok(Some(String::from_utf8(contents)?))
}

/// A struct that represents a Stellaris save file.
/// It is just a wrapper around the decompressed documents of the save, so
/// that the rest of the crate doesn't need to care about the archive.
pub struct SaveFile {
    gamestate: String,
    meta: Option<String>,
}

impl SaveFile {
    /// Open a save file.
    /// Internally uses [File::open] to open the file and then [SaveFile::read] to read the contents.
    pub fn open<P: AsRef<Path>>(filename: P) -> Result<SaveFile, SaveFileError> {
        let mut file = File::open(filename)?;
        let metadata = file.metadata()?;
        SaveFile::read(&mut file, Some(metadata.len() as usize))
    }

    /// Create a new SaveFile instance.
    ///
    /// # Compression
    ///
    /// A `.sav` file is a zip archive holding a `gamestate` and a `meta`
    /// entry. Anything that doesn't start with the archive header is taken
    /// to be an uncompressed gamestate, without metadata.
    pub fn read<F: Read>(
        file: &mut F,
        contents_size: Option<usize>,
    ) -> Result<SaveFile, SaveFileError> {
        let mut contents = if let Some(size) = contents_size {
            Vec::with_capacity(size)
        } else {
            Vec::new()
        };
        let read_size = file.read_to_end(&mut contents)?;
        if read_size < ARCHIVE_HEADER.len() {
            return Err(SaveFileError::ParseError("Save file is too small"));
        }
        if !contents.starts_with(ARCHIVE_HEADER) {
            return Ok(SaveFile {
                gamestate: String::from_utf8(contents)?,
                meta: None,
            });
        }
        let mut archive = ZipArchive::new(Cursor::new(contents))?;
        let gamestate = read_entry(&mut archive, GAMESTATE_ENTRY)?
            .ok_or(SaveFileError::MissingEntry(GAMESTATE_ENTRY))?;
        let meta = read_entry(&mut archive, META_ENTRY)?;
        Ok(SaveFile { gamestate, meta })
    }

    /// Reads only the metadata of a save archive, without decompressing the
    /// gamestate. Uncompressed saves have no metadata.
    pub fn open_meta<P: AsRef<Path>>(filename: P) -> Result<Option<SaveMeta>, SaveFileError> {
        let mut file = File::open(filename)?;
        let mut header = [0u8; 4];
        if file.read(&mut header)? < header.len() || header != *ARCHIVE_HEADER {
            return Ok(None);
        }
        file.seek(io::SeekFrom::Start(0))?;
        let mut archive = ZipArchive::new(file)?;
        match read_entry(&mut archive, META_ENTRY)? {
            Some(meta) => Ok(Some(SaveMeta::read(meta.as_bytes())?)),
            None => Ok(None),
        }
    }

    /// The gamestate document
    pub fn get_gamestate(&self) -> &str {
        &self.gamestate
    }

    /// Parses the metadata document, if the save has one
    pub fn read_meta(&self) -> Option<Result<SaveMeta, MetaError>> {
        self.meta.as_ref().map(|meta| SaveMeta::read(meta.as_bytes()))
    }

    /// Reads the sections of the gamestate
    pub fn parse(&self) -> GameState {
        GameState::parse(&self.gamestate)
    }
}
