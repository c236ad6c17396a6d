/// The [minijinja] environment holding the mod file templates
mod env;
pub use env::create_env;

/// A submodule turning system trees into initializer layouts
mod placement;
pub use placement::{
    initializers, BodyContext, InitializerContext, ScenarioContext, MAX_ORBIT,
};

/// A submodule that provides the [Renderer], writing the mod files.
mod renderer;
pub use renderer::{
    RenderError, Renderer, EFFECTS_PATH, EVENTS_PATH, INITIALIZERS_PATH, ON_ACTIONS_PATH,
    OUTPUT_DIRECTORIES, SCENARIO_PATH,
};
