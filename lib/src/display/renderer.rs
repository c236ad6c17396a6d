use std::{
    error, fs, io,
    path::{Path, PathBuf},
};

use derive_more::{Display, From};
use minijinja::{context, Environment};
use serde::Serialize;
use tracing::{debug, info};

use super::{
    super::save_file::structures::Galaxy,
    env::{
        EFFECTS_TEMPLATE_NAME, EVENTS_TEMPLATE_NAME, INITIALIZERS_TEMPLATE_NAME,
        ON_ACTIONS_TEMPLATE_NAME, SCENARIO_TEMPLATE_NAME,
    },
    placement::{initializers, ScenarioContext},
};

/// Top level mod directories we own, and remove before writing
pub const OUTPUT_DIRECTORIES: [&str; 3] = ["map", "common", "events"];

pub const SCENARIO_PATH: &str = "map/setup_scenarios/continuum.txt";
pub const INITIALIZERS_PATH: &str = "common/solar_system_initializers/continuum_initializers.txt";
pub const ON_ACTIONS_PATH: &str = "common/on_actions/~~~continuum_on_actions.txt";
pub const EVENTS_PATH: &str = "events/continuum_wormhole_events.txt";
pub const EFFECTS_PATH: &str = "common/scripted_effects/continuum_wormhole_effects.txt";

/// An error that occurred while writing the mod files
#[derive(Debug, From, Display)]
pub enum RenderError {
    #[display("failed to render a template: {}", _0)]
    TemplateError(minijinja::Error),
    #[display("failed to write the mod files: {}", _0)]
    IoError(io::Error),
}

impl error::Error for RenderError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            RenderError::TemplateError(e) => Some(e),
            RenderError::IoError(e) => Some(e),
        }
    }
}

/// A struct that renders the galaxy into the files of a static galaxy mod.
/// It holds a reference to the [Environment] that is used to render the
/// templates and the root path of the mod.
pub struct Renderer<'a> {
    env: &'a Environment<'a>,
    path: PathBuf,
}

impl<'a> Renderer<'a> {
    /// Create a new Renderer with the given [Environment] and mod root
    pub fn new<P: Into<PathBuf>>(env: &'a Environment<'a>, path: P) -> Self {
        Renderer {
            env,
            path: path.into(),
        }
    }

    /// Returns the root path of the rendered output
    pub fn get_path(&self) -> &Path {
        &self.path
    }

    /// Removes the output of a previous run
    pub fn clean(&self) -> Result<(), RenderError> {
        for dir in OUTPUT_DIRECTORIES {
            let path = self.path.join(dir);
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
                info!("Removed: {}", path.display());
            }
        }
        Ok(())
    }

    fn write<S: Serialize>(
        &self,
        template: &str,
        relative: &str,
        ctx: S,
    ) -> Result<PathBuf, RenderError> {
        let contents = self.env.get_template(template)?.render(ctx)?;
        let path = self.path.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        debug!("wrote {}", path.display());
        Ok(path)
    }

    /// Writes every mod file, replacing the output of a previous run.
    /// `start_system` names the system the player empire starts in.
    /// Returns the paths of the written files.
    pub fn render(&self, galaxy: &Galaxy, start_system: &str) -> Result<Vec<PathBuf>, RenderError> {
        self.clean()?;
        let mut written = Vec::with_capacity(5);
        written.push(self.write(
            SCENARIO_TEMPLATE_NAME,
            SCENARIO_PATH,
            ScenarioContext::new(galaxy),
        )?);
        written.push(self.write(
            INITIALIZERS_TEMPLATE_NAME,
            INITIALIZERS_PATH,
            context! { systems => initializers(galaxy, start_system) },
        )?);
        written.push(self.write(ON_ACTIONS_TEMPLATE_NAME, ON_ACTIONS_PATH, ())?);
        written.push(self.write(
            EVENTS_TEMPLATE_NAME,
            EVENTS_PATH,
            context! { pair_count => galaxy.get_wormhole_pairs().len() },
        )?);
        written.push(self.write(EFFECTS_TEMPLATE_NAME, EFFECTS_PATH, ())?);
        Ok(written)
    }
}
