use clap::Parser;
use dialoguer::{Input, Select};

use std::path::PathBuf;

use super::saves::{group_by_version, SaveEntry};

/// The languages supported by the game.
pub const LANGUAGES: [&str; 10] = [
    "english",
    "braz_por",
    "french",
    "german",
    "japanese",
    "korean",
    "polish",
    "russian",
    "simp_chinese",
    "spanish",
];

/// The language used when none is given and none is configured
pub const DEFAULT_LANGUAGE: &str = LANGUAGES[0];

/// A function to parse the language argument.
fn parse_lang_arg(input: &str) -> Result<&'static str, &'static str> {
    let input = input.strip_prefix("l_").unwrap_or(input);
    LANGUAGES
        .iter()
        .find(|x| **x == input)
        .map_or(Err("Invalid language"), |e| Ok(*e))
}

/// A function to parse the path argument.
fn parse_path_arg(input: &str) -> Result<PathBuf, &'static str> {
    let p = PathBuf::from(input);
    if p.exists() {
        Ok(p)
    } else {
        Err("Invalid path")
    }
}

/// Turns a Stellaris save into a static galaxy mod.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    #[arg(value_parser = parse_path_arg)]
    /// The path to the save file. Picked interactively if absent.
    pub filename: Option<PathBuf>,
    #[arg(short, long, value_parser = parse_path_arg)]
    /// The path to the game installation. Found through Steam if absent.
    pub game_path: Option<PathBuf>,
    #[arg(short, long, value_parser = parse_path_arg)]
    /// The path to the directory with the saves and settings of the game.
    pub user_dir: Option<PathBuf>,
    #[arg(short, long, value_parser = parse_lang_arg)]
    /// The language to use for localization. Read from the game settings if absent.
    pub language: Option<&'static str>,
    #[arg(short, long, default_value = ".", value_parser = parse_path_arg)]
    /// The root directory of the mod to write.
    pub output: PathBuf,
    #[arg(short, long, default_value = "Sol")]
    /// The name of the system the player empire starts in.
    pub start_system: String,
    #[arg(long, default_value = None)]
    /// A path to dump the parsed galaxy to, as json.
    pub dump: Option<PathBuf>,
    #[arg(short, long, default_value_t = false)]
    /// A flag that tells the program not to interact with the user.
    pub no_interaction: bool,
    #[arg(short, long, default_value_t = false)]
    /// A flag that skips the confirmation for saves from older game versions.
    pub force: bool,
}

/// Lets the user pick one of the saves, grouped by game version.
/// Returns [None] if the user quits.
pub fn pick_save(saves: Vec<SaveEntry>) -> Option<PathBuf> {
    let mut items = Vec::with_capacity(saves.len());
    let mut paths = Vec::with_capacity(saves.len());
    for (version, group) in group_by_version(saves) {
        for save in group {
            items.push(format!("[{}] {}", version, save));
            paths.push(save.get_path().to_path_buf());
        }
    }
    items.push("Quit".to_owned());
    let selection = Select::new()
        .with_prompt("Please select a save game to parse")
        .items(&items)
        .default(0)
        .interact()
        .ok()?;
    paths.get(selection).cloned()
}

/// Asks the user for a save path
pub fn ask_save_path() -> Option<PathBuf> {
    Input::<String>::new()
        .with_prompt("Enter the save file path")
        .validate_with(|input: &String| -> Result<(), &str> {
            parse_path_arg(input).map(|_| ())
        })
        .interact_text()
        .ok()
        .map(PathBuf::from)
}
