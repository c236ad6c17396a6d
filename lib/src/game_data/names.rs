use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::{
    super::save_file::parser::{
        block::{brace_balance, extract},
        types::GameString,
    },
    Localize,
};

/// The name given to anything we couldn't resolve at all
pub const UNKNOWN: &str = "Unknown";
const UNKNOWN_STAR: &str = "Unknown Star";
const UNKNOWN_PLANET: &str = "Unknown Planet";
const UNKNOWN_MOON: &str = "Unknown Moon";

/// How many nested templates we follow before giving up. The game never
/// nests more than three or four levels deep.
const MAX_DEPTH: usize = 8;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).unwrap());
    };
}

pattern!(KEY, r#"\bkey\s*=\s*"([^"]+)""#);
pattern!(VARIABLES, r"variables\s*=\s*\{");
pattern!(NAME_VALUE, r#"key\s*=\s*"NAME"\s*value\s*=\s*\{"#);
pattern!(PARENT_VALUE, r#"key\s*=\s*"PARENT"\s*value\s*=\s*\{"#);
pattern!(NUMERAL_VALUE, r#"key\s*=\s*"NUMERAL"\s*value\s*=\s*\{"#);
pattern!(
    NUMERAL_KEYS,
    r#"key\s*=\s*"NUMERAL"\s*value\s*=\s*\{\s*key\s*=\s*"([^"]+)""#
);
pattern!(PREFIX_VALUE, r#"key\s*=\s*"prefix"\s*value\s*=\s*\{"#);
pattern!(SUFFIX_VALUE, r#"key\s*=\s*"suffix"\s*value\s*=\s*\{"#);
pattern!(SYSTEM_NAME_KEY, r#"key\s*=\s*"SYSTEM_NAME""#);
pattern!(SYSTEM_NAME_VALUE, r#"key\s*=\s*"SYSTEM_NAME"\s*value\s*=\s*\{"#);
pattern!(MULTI_STAR, r"^STAR_NAME_(\d)_OF_(\d)");
pattern!(SYSTEM_SUFFIX, r"(_system|_SYSTEM)$");
pattern!(NAME_PREFIX, r"^(NAME_|SPEC_)");

const HABITAT_KEY: &str = "HABITAT_NAME";
const STAR_NAME_PREFIX: &str = "STAR_NAME_";
const COLONY_NAME_PREFIX: &str = "NEW_COLONY_NAME";
const FORMAT_SUFFIX: &str = "_NAME_FORMAT";
const PLANET_FORMAT: &str = "PLANET_NAME_FORMAT";
const SUBPLANET_FORMAT: &str = "SUBPLANET_NAME_FORMAT";
const ASTEROID_FORMAT: &str = "ASTEROID_NAME_FORMAT";

/// Returns the first key of a template at its own brace depth, or the first
/// key anywhere if every key is nested.
fn template_key(template: &str) -> Option<&str> {
    let mut first = None;
    for captures in KEY.captures_iter(template) {
        let (Some(whole), Some(key)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        if brace_balance(&template[..whole.start()]) == 0 {
            return Some(key.as_str());
        }
        first.get_or_insert(key.as_str());
    }
    first
}

/// The first key of a variable's value block, taken literally
fn literal_variable<'a>(variables: &'a str, pattern: &Regex) -> Option<&'a str> {
    let value = extract(variables, pattern, 0)?;
    KEY.captures(value.content())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// A template is roman style if it is more than one character, or one of
/// the single letter roman numerals the game uses for moons.
fn is_roman_numeral(numeral: &str) -> bool {
    numeral.chars().count() > 1 || matches!(numeral.to_uppercase().as_str(), "I" | "V" | "X")
}

/// Turns an unlocalized key into something readable
fn clean_key(key: &str) -> String {
    let stripped = SYSTEM_SUFFIX.replace(key, "");
    let stripped = NAME_PREFIX.replace(&stripped, "");
    stripped.replace('_', " ")
}

/// Resolves the content of a `name` block into a display name.
///
/// `star_count` is the number of star class bodies in the system the
/// template belongs to, it decides whether multi star names get a letter.
/// `parent_name` is the already resolved name of the body a moon orbits.
///
/// Resolution never fails, anything that can't be resolved falls back to a
/// placeholder like [UNKNOWN].
pub fn resolve_name<L: Localize<GameString>>(
    template: &str,
    localization: &L,
    star_count: Option<usize>,
    parent_name: Option<&str>,
) -> String {
    resolve(template, localization, star_count, parent_name, 0)
}

fn resolve<L: Localize<GameString>>(
    template: &str,
    localization: &L,
    star_count: Option<usize>,
    parent_name: Option<&str>,
    depth: usize,
) -> String {
    if depth > MAX_DEPTH {
        warn!("name template nested deeper than {} levels", MAX_DEPTH);
        return UNKNOWN.to_owned();
    }
    let nested = |inner: &str| resolve(inner, localization, star_count, None, depth + 1);
    if template.contains(HABITAT_KEY) && SYSTEM_NAME_KEY.is_match(template) {
        let system = extract(template, &SYSTEM_NAME_VALUE, 0)
            .map(|block| nested(block.content()))
            .or_else(|| parent_name.map(str::to_owned))
            .unwrap_or_else(|| UNKNOWN.to_owned());
        return format!("{} Habitat Complex", system);
    }
    let Some(key) = template_key(template) else {
        return UNKNOWN.to_owned();
    };
    let key = if key.len() > 1 && key.starts_with('$') && key.ends_with('$') {
        key.trim_matches('$')
    } else {
        key
    };
    let is_family = key.starts_with(STAR_NAME_PREFIX)
        || key.starts_with(COLONY_NAME_PREFIX)
        || key.ends_with(FORMAT_SUFFIX);
    if is_family {
        if let Some(variables) = extract(template, &VARIABLES, 0) {
            let variables = variables.content();
            if key.starts_with(STAR_NAME_PREFIX) || key.starts_with(COLONY_NAME_PREFIX) {
                let Some(base) = extract(variables, &NAME_VALUE, 0) else {
                    return UNKNOWN_STAR.to_owned();
                };
                let base = nested(base.content());
                if key.starts_with(COLONY_NAME_PREFIX) {
                    return format!("{} Prime", base);
                }
                if let (Some(captures), Some(count)) = (MULTI_STAR.captures(key), star_count) {
                    if count > 1 {
                        if let Some(letter) = captures[1]
                            .parse::<usize>()
                            .ok()
                            .and_then(|i| i.checked_sub(1))
                            .and_then(|i| ['A', 'B', 'C'].get(i))
                        {
                            return format!("{} {}", base, letter);
                        }
                    }
                }
                return base;
            }
            match key {
                PLANET_FORMAT => {
                    let parent = extract(variables, &PARENT_VALUE, 0);
                    let numeral = literal_variable(variables, &NUMERAL_VALUE);
                    if let (Some(parent), Some(numeral)) = (parent, numeral) {
                        return format!("{} {}", nested(parent.content()), numeral);
                    }
                    return UNKNOWN_PLANET.to_owned();
                }
                SUBPLANET_FORMAT => {
                    let parent = extract(variables, &PARENT_VALUE, 0);
                    let numeral = NUMERAL_KEYS
                        .captures_iter(variables)
                        .filter_map(|c| c.get(1))
                        .last();
                    let (Some(parent), Some(numeral)) = (parent, numeral) else {
                        return UNKNOWN_MOON.to_owned();
                    };
                    let base = nested(parent.content());
                    let numeral = numeral.as_str();
                    if parent_name
                        .filter(|p| !p.is_empty())
                        .is_some_and(|p| p != base)
                    {
                        return base;
                    }
                    if is_roman_numeral(numeral) {
                        return format!("{} {}", base, numeral);
                    }
                    return format!("{}{}", base, numeral.to_lowercase());
                }
                ASTEROID_FORMAT => {
                    let prefix = literal_variable(variables, &PREFIX_VALUE).unwrap_or_default();
                    let suffix = literal_variable(variables, &SUFFIX_VALUE).unwrap_or_default();
                    return format!("{}{}", prefix, suffix);
                }
                _ => {}
            }
        }
    }
    if let Some(value) = localization.lookup(key) {
        return value.to_string();
    }
    clean_key(key)
}

#[cfg(test)]
mod tests {
    use super::{super::Localizer, *};

    fn localizer() -> Localizer {
        [
            ("NAME_Sol", "Sol"),
            ("NAME_Earth", "Earth"),
            ("NAME_Alpha_Centauri", "Alpha Centauri"),
            ("STAR_NAME_1_OF_2", "$NAME$ A"),
        ]
        .into_iter()
        .collect()
    }

    fn star_template(index: usize, of: usize, base: &str) -> String {
        format!(
            "\n\tkey=\"STAR_NAME_{}_OF_{}\"\n\tvariables=\n\t{{\n\t\t{{\n\t\t\tkey=\"NAME\"\n\t\t\tvalue=\n\t\t\t{{\n\t\t\t\tkey=\"{}\"\n\t\t\t}}\n\t\t}}\n\t}}\n",
            index, of, base
        )
    }

    #[test]
    fn test_literal_key() {
        let loc = localizer();
        assert_eq!(resolve_name("key=\"NAME_Sol\"", &loc, None, None), "Sol");
        assert_eq!(
            resolve_name("\n\t\tkey=\"NAME_Earth\"\n\t\tliteral=yes\n", &loc, Some(3), None),
            "Earth"
        );
        // surrounding noise doesn't matter as long as the key is at the top level
        assert_eq!(
            resolve_name(
                "other={ key=\"NAME_Alpha_Centauri\" } key=\"NAME_Earth\"",
                &loc,
                None,
                Some("parent")
            ),
            "Earth"
        );
    }

    #[test]
    fn test_multi_star_names() {
        let loc = localizer();
        assert_eq!(
            resolve_name(&star_template(1, 2, "NAME_Sol"), &loc, Some(2), None),
            "Sol A"
        );
        assert_eq!(
            resolve_name(&star_template(2, 2, "NAME_Sol"), &loc, Some(2), None),
            "Sol B"
        );
        assert_eq!(
            resolve_name(&star_template(3, 3, "NAME_Sol"), &loc, Some(3), None),
            "Sol C"
        );
    }

    #[test]
    fn test_single_star_name() {
        let loc = localizer();
        assert_eq!(
            resolve_name(&star_template(1, 2, "NAME_Sol"), &loc, Some(1), None),
            "Sol"
        );
        assert_eq!(
            resolve_name(&star_template(1, 2, "NAME_Sol"), &loc, None, None),
            "Sol"
        );
        assert_eq!(
            resolve_name(&star_template(4, 4, "NAME_Sol"), &loc, Some(4), None),
            "Sol"
        );
        assert_eq!(
            resolve_name("key=\"STAR_NAME_1_OF_2\" variables={ }", &loc, Some(2), None),
            "Unknown Star"
        );
    }

    #[test]
    fn test_colony_name() {
        let template = "key=\"NEW_COLONY_NAME_1\" variables={ { key=\"NAME\" value={ key=\"NAME_Earth\" } } }";
        assert_eq!(
            resolve_name(template, &localizer(), None, None),
            "Earth Prime"
        );
    }

    #[test]
    fn test_planet_format() {
        let template = "key=\"PLANET_NAME_FORMAT\"
variables={
\t{ key=\"PARENT\" value={ key=\"NAME_Alpha_Centauri\" } }
\t{ key=\"NUMERAL\" value={ key=\"IV\" } }
}";
        assert_eq!(
            resolve_name(template, &localizer(), Some(1), None),
            "Alpha Centauri IV"
        );
        let missing = "key=\"PLANET_NAME_FORMAT\" variables={ { key=\"PARENT\" value={ key=\"NAME_Sol\" } } }";
        assert_eq!(
            resolve_name(missing, &localizer(), None, None),
            "Unknown Planet"
        );
    }

    fn moon_template(parent: &str, numeral: &str) -> String {
        format!(
            "key=\"SUBPLANET_NAME_FORMAT\" variables={{ {{ key=\"PARENT\" value={{ key=\"{}\" }} }} {{ key=\"NUMERAL\" value={{ key=\"x\" }} }} {{ key=\"NUMERAL\" value={{ key=\"{}\" }} }} }}",
            parent, numeral
        )
    }

    #[test]
    fn test_moon_names() {
        let loc = localizer();
        assert_eq!(
            resolve_name(&moon_template("NAME_Earth", "II"), &loc, None, Some("Earth")),
            "Earth II"
        );
        assert_eq!(
            resolve_name(&moon_template("NAME_Earth", "v"), &loc, None, Some("Earth")),
            "Earth v"
        );
        assert_eq!(
            resolve_name(&moon_template("NAME_Earth", "B"), &loc, None, Some("Earth")),
            "Earthb"
        );
        // no parent name given, the numeral still applies
        assert_eq!(
            resolve_name(&moon_template("NAME_Earth", "A"), &loc, None, None),
            "Eartha"
        );
        // an empty parent name is no name at all
        assert_eq!(
            resolve_name(&moon_template("NAME_Earth", "II"), &loc, None, Some("")),
            "Earth II"
        );
        // the parent is known under a different name
        assert_eq!(
            resolve_name(&moon_template("NAME_Earth", "II"), &loc, None, Some("Terra")),
            "Earth"
        );
        assert_eq!(
            resolve_name("key=\"SUBPLANET_NAME_FORMAT\" variables={ }", &loc, None, None),
            "Unknown Moon"
        );
    }

    #[test]
    fn test_asteroid_format() {
        let loc = localizer();
        let template = "key=\"ASTEROID_NAME_FORMAT\" variables={ { key=\"prefix\" value={ key=\"KX\" } } { key=\"suffix\" value={ key=\"-113\" } } }";
        assert_eq!(resolve_name(template, &loc, None, None), "KX-113");
        let template = "key=\"ASTEROID_NAME_FORMAT\" variables={ { key=\"suffix\" value={ key=\"-9\" } } }";
        assert_eq!(resolve_name(template, &loc, None, None), "-9");
    }

    #[test]
    fn test_habitat() {
        let loc = localizer();
        let template = "key=\"HABITAT_NAME_FORMAT\" variables={ { key=\"SYSTEM_NAME\" value={ key=\"NAME_Sol\" } } }";
        assert_eq!(
            resolve_name(template, &loc, None, None),
            "Sol Habitat Complex"
        );
        let template = "key = \"HABITAT_NAME_FORMAT\"\n\tvariables =\n\t{\n\t\t{\n\t\t\tkey = \"SYSTEM_NAME\"\n\t\t\tvalue = { key = \"NAME_Sol\" }\n\t\t}\n\t}";
        assert_eq!(
            resolve_name(template, &loc, None, None),
            "Sol Habitat Complex"
        );
        let template = "key=\"HABITAT_NAME_FORMAT\" key=\"SYSTEM_NAME\"";
        assert_eq!(
            resolve_name(template, &loc, None, Some("Vega")),
            "Vega Habitat Complex"
        );
    }

    #[test]
    fn test_fallbacks() {
        let loc = localizer();
        assert_eq!(resolve_name("", &loc, None, None), "Unknown");
        assert_eq!(resolve_name("literal=yes", &loc, None, None), "Unknown");
        assert_eq!(
            resolve_name("key=\"NAME_Barnards_Star_system\"", &loc, None, None),
            "Barnards Star"
        );
        assert_eq!(
            resolve_name("key=\"SPEC_Great_Void\"", &loc, None, None),
            "Great Void"
        );
        assert_eq!(resolve_name("key=\"$NAME_Sol$\"", &loc, None, None), "Sol");
        // a format key without variables is looked up like any other key
        assert_eq!(
            resolve_name("key=\"STAR_NAME_1_OF_2\"", &loc, Some(2), None),
            "$NAME$ A"
        );
    }

    #[test]
    fn test_depth_guard() {
        let loc = localizer();
        let mut template = "key=\"NAME_Sol\"".to_owned();
        for _ in 0..3 {
            template = format!(
                "key=\"STAR_NAME_1_OF_1\" variables={{ {{ key=\"NAME\" value={{ {} }} }} }}",
                template
            );
        }
        assert_eq!(resolve_name(&template, &loc, None, None), "Sol");
        for _ in 0..20 {
            template = format!(
                "key=\"STAR_NAME_1_OF_1\" variables={{ {{ key=\"NAME\" value={{ {} }} }} }}",
                template
            );
        }
        assert_eq!(resolve_name(&template, &loc, None, None), "Unknown");
    }
}
