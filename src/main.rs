use clap::Parser;
use dialoguer::{Confirm, Input};
use human_panic::setup_panic;
use indicatif::{ProgressBar, ProgressStyle};
use std::{
    fs,
    io::{stderr, stdin, stdout, IsTerminal},
    path::PathBuf,
    process::ExitCode,
    time::Duration,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use continuum_lib::{
    display::{create_env, Renderer},
    game_data::GameDataLoader,
    save_file::{SaveFile, SUPPORTED_VERSION},
};

/// A submodule handling the command line arguments and interactive prompts
mod args;
use args::{ask_save_path, pick_save, Args, DEFAULT_LANGUAGE};

/// A submodule for finding the game and the user directories
mod steam;
use steam::{get_game_path, get_language, get_library_path, get_user_dir};

/// A submodule listing the saves of the user
mod saves;
use saves::{find_saves, SAVE_DIR};

/// Prints a message and waits for enter, so that a console window opened
/// just for us doesn't vanish
fn pause(interactive: bool) {
    if interactive {
        let _ = Input::<String>::new()
            .with_prompt("Press enter to exit")
            .allow_empty(true)
            .interact();
    }
}

fn fatal(message: &str, interactive: bool) -> ExitCode {
    eprintln!("FATAL ERROR: {}", message);
    pause(interactive);
    ExitCode::FAILURE
}

/// Main function. This is the entry point of the program.
///
/// # Process
///
/// 1. Finds the save file, asking the user to pick one if it wasn't given
/// 2. Checks the version of the save
/// 3. Loads the localization of the game in the chosen language
/// 4. Parses the save into a [Galaxy](continuum_lib::save_file::structures::Galaxy)
/// 5. Writes the mod files into the output directory, and optionally dumps
///    the galaxy to json
fn main() -> ExitCode {
    setup_panic!();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(stderr)
        .init();
    let args = Args::parse();
    let interactive = stdin().is_terminal() && stdout().is_terminal() && !args.no_interaction;
    println!("--- Continuum Galaxy Parser ---");

    let user_dir = args.user_dir.clone().or_else(get_user_dir);
    let filename = match args.filename.clone() {
        Some(filename) => filename,
        None if interactive => {
            let saves = user_dir
                .as_ref()
                .map(|dir| find_saves(&dir.join(SAVE_DIR)))
                .unwrap_or_default();
            let picked = if saves.is_empty() {
                println!("No save games found.");
                ask_save_path()
            } else {
                pick_save(saves)
            };
            match picked {
                Some(filename) => filename,
                None => {
                    println!("Exiting parser. Goodbye!");
                    return ExitCode::SUCCESS;
                }
            }
        }
        None => return fatal("No save file provided", interactive),
    };

    let spinner_style = ProgressStyle::default_spinner()
        .template("[{elapsed_precise}] {spinner} {msg}")
        .unwrap();
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style.clone());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Reading {}", filename.display()));
    let save = match SaveFile::open(&filename) {
        Ok(save) => save,
        Err(e) => {
            spinner.finish_and_clear();
            return fatal(&format!("Could not read the save file: {}", e), interactive);
        }
    };
    spinner.finish_with_message("Save file read");
    match save.read_meta() {
        Some(Ok(meta)) => {
            if !meta.is_supported() {
                println!("\n--- WARNING ---");
                println!(
                    "This save is for Stellaris version {}, but this parser is designed for version {}.{}+.",
                    meta.get_version().unwrap_or_default(),
                    SUPPORTED_VERSION.0,
                    SUPPORTED_VERSION.1
                );
                println!("Please open and re-save your game in the latest version of Stellaris for best results.");
                if interactive && !args.force {
                    let proceed = Confirm::new()
                        .with_prompt("Do you want to continue anyway?")
                        .default(false)
                        .interact()
                        .unwrap_or(false);
                    if !proceed {
                        println!("Parsing cancelled.");
                        pause(interactive);
                        return ExitCode::SUCCESS;
                    }
                }
            }
        }
        Some(Err(e)) => warn!("Could not read the save metadata, version check skipped: {}", e),
        None => {}
    }

    let game_path = match args.game_path.clone().or_else(|| {
        get_library_path()
            .and_then(|library| get_game_path(&library))
            .map_err(|e| warn!("Error trying to find your Stellaris installation: {}", e))
            .ok()
    }) {
        Some(path) => path,
        None => {
            return fatal(
                "Could not find the Stellaris installation, use --game-path",
                interactive,
            )
        }
    };
    let language = match args.language {
        Some(language) => language.to_owned(),
        None => user_dir
            .as_deref()
            .and_then(get_language)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned()),
    };
    println!("Using language {}", language);
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style.clone());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Loading localization from {}", game_path.display()));
    let mut loader = GameDataLoader::new(language);
    if let Err(e) = loader.process_path(&game_path) {
        spinner.finish_and_clear();
        return fatal(
            &format!("No localization data loaded: {}", e),
            interactive,
        );
    }
    let data = loader.finalize();
    spinner.finish_with_message("Localization loaded");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Parsing the galaxy");
    let galaxy = save.parse().build_galaxy(&data);
    spinner.finish_with_message("Galaxy parsed");
    if galaxy.get_systems().is_empty() {
        return fatal(
            "Could not parse critical galaxy data from the save file.",
            interactive,
        );
    }

    let env = create_env();
    let renderer = Renderer::new(&env, &args.output);
    let written = match renderer.render(&galaxy, &args.start_system) {
        Ok(written) => written,
        Err(e) => return fatal(&format!("Could not write the mod files: {}", e), interactive),
    };
    let counts = galaxy.get_counts();
    println!("\n--- PARSING COMPLETE ---");
    println!("Found {}.", counts);
    println!(
        "Found {} megastructures and {} wormhole pairs.",
        counts.megastructures, counts.wormhole_pairs
    );
    if !galaxy.get_diagnostics().is_empty() {
        println!(
            "{} references in the save could not be resolved and were skipped.",
            galaxy.get_diagnostics().len()
        );
    }
    println!("\nAll required mod files have been generated:");
    for path in &written {
        let relative = path.strip_prefix(&args.output).unwrap_or(path);
        println!("- {}", relative.display());
    }
    if let Some(dump) = &args.dump {
        let dumped = serde_json::to_string_pretty(&galaxy)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(dump, json).map_err(|e| e.to_string()));
        match dumped {
            Ok(()) => println!("Galaxy dumped to {}", dump.display()),
            Err(e) => eprintln!("Could not dump the galaxy: {}", e),
        }
    }
    println!("\nTo load your imported game, you may now select the Continuum galaxy when starting a New Game.");
    if interactive {
        let output: PathBuf = args.output.clone();
        if let Err(e) = open::that(&output) {
            warn!("Could not open {}: {}", output.display(), e);
        }
    }
    pause(interactive);
    ExitCode::SUCCESS
}
