use minijinja::{AutoEscape, Environment};

pub const SCENARIO_TEMPLATE_NAME: &str = "scenario";
pub const INITIALIZERS_TEMPLATE_NAME: &str = "initializers";
pub const ON_ACTIONS_TEMPLATE_NAME: &str = "on_actions";
pub const EVENTS_TEMPLATE_NAME: &str = "events";
pub const EFFECTS_TEMPLATE_NAME: &str = "effects";

const SCENARIO_TEMPLATE: &str = include_str!("../../templates/scenario.txt");
const INITIALIZERS_TEMPLATE: &str = include_str!("../../templates/initializers.txt");
const ON_ACTIONS_TEMPLATE: &str = include_str!("../../templates/on_actions.txt");
const EVENTS_TEMPLATE: &str = include_str!("../../templates/events.txt");
const EFFECTS_TEMPLATE: &str = include_str!("../../templates/effects.txt");

/// Create a new [Environment] with the filters and templates needed for the
/// mod files. The environment will have the following filters:
/// - [unquote] - removes double quotes, which can't appear in a script string
pub fn create_env() -> Environment<'static> {
    let mut env = Environment::new();
    env.add_filter("unquote", unquote);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_template(SCENARIO_TEMPLATE_NAME, SCENARIO_TEMPLATE)
        .unwrap();
    env.add_template(INITIALIZERS_TEMPLATE_NAME, INITIALIZERS_TEMPLATE)
        .unwrap();
    env.add_template(ON_ACTIONS_TEMPLATE_NAME, ON_ACTIONS_TEMPLATE)
        .unwrap();
    env.add_template(EVENTS_TEMPLATE_NAME, EVENTS_TEMPLATE)
        .unwrap();
    env.add_template(EFFECTS_TEMPLATE_NAME, EFFECTS_TEMPLATE)
        .unwrap();
    env
}

/// A filter that removes every double quote from a string
fn unquote(value: String) -> String {
    value.replace('"', "")
}
