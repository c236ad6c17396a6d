use std::sync::LazyLock;

use regex::Regex;

use super::{
    block::extract,
    record::{keys, RawBelt, RawRecord, RecordKind},
    types::{parse_id, GameId},
};

/* These parsers don't attempt to understand the whole record, they just
look for the handful of fields we need. Fields anchored with ^\s* are only
matched at the start of a line, which in practice keeps us out of nested
blocks that reuse the same key names. The quoted type may also follow the
brace of a record written on a single line. */

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).unwrap());
    };
}

pattern!(NAME_BLOCK, r"name\s*=\s*\{");
pattern!(SIMPLE_NAME, r#"(?m)^\s*name\s*=\s*"([^"]+)""#);
pattern!(COORDINATE_BLOCK, r"coordinate\s*=\s*\{");
pattern!(COORD_X, r"(?:^|\s)x\s*=\s*([-\d.]+)");
pattern!(COORD_Y, r"(?:^|\s)y\s*=\s*([-\d.]+)");
pattern!(COORD_ORIGIN, r"(?:^|\s)origin\s*=\s*(\d+)");
pattern!(UNQUOTED_TYPE, r"(?m)^\s*type\s*=\s*([\w]+)");
pattern!(QUOTED_TYPE, r#"(?m)(?:^|\{)\s*type\s*=\s*"([^"]+)""#);
pattern!(PLANET_CLASS, r#"(?m)^\s*planet_class\s*=\s*"([^"]+)""#);
pattern!(PLANET_SIZE, r"(?m)^\s*planet_size\s*=\s*(\d+)");
pattern!(ORBIT, r"(?m)^\s*orbit\s*=\s*([-\d.]+)");
pattern!(MOON_OF, r"(?m)^\s*moon_of\s*=\s*(\d+)");
pattern!(STAR_CLASS, r#"(?m)^\s*star_class\s*=\s*"([^"]+)""#);
pattern!(RADIUS, r"(?:^|\s)radius\s*=\s*([-\d.]+)");
pattern!(ORIGIN, r"(?m)^\s*origin\s*=\s*(\d+)");
pattern!(LINKED_TO, r"(?m)^\s*linked_to\s*=\s*(\d+)");
pattern!(BYPASS, r"(?m)^\s*bypass\s*=\s*(\d+)");
pattern!(HOST_PLANET, r"(?m)^\s*planet\s*=\s*(\d+)");
pattern!(GRAPHICAL_CULTURE, r#"(?m)^\s*graphical_culture\s*=\s*"([^"]+)""#);
pattern!(HYPERLANE_TARGET, r"(?m)^\s*to\s*=\s*(\d+)");
pattern!(CONTAINED_PLANET, r"(?m)^\s*planet\s*=\s*(\d+)");
pattern!(BELTS_BLOCK, r"asteroid_belts\s*=\s*\{");
pattern!(BELT_TYPE, r#"type\s*=\s*"([^"]+)""#);
pattern!(BELT_RADIUS, r"inner_radius\s*=\s*([-\d.]+)");

/// Returns the first capture of the pattern
fn capture<'a>(text: &'a str, pattern: &Regex) -> Option<&'a str> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Returns the first capture of every match of the pattern
fn capture_all<'a>(text: &'a str, pattern: &Regex) -> Vec<&'a str> {
    pattern
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect()
}

fn capture_ids(text: &str, pattern: &Regex) -> Vec<GameId> {
    capture_all(text, pattern)
        .into_iter()
        .filter_map(parse_id)
        .collect()
}

/// A field key along with the pattern whose first capture is its value
type FieldPattern = (&'static str, &'static LazyLock<Regex>);

/// Copies the first capture of each pattern into the record
fn set_fields(record: &mut RawRecord, body: &str, patterns: &[FieldPattern]) {
    for &(key, pattern) in patterns {
        if let Some(value) = capture(body, pattern) {
            record.set_field(key, value);
        }
    }
}

/// Reads the given fields from within the `coordinate` block
fn set_coordinates(record: &mut RawRecord, body: &str, patterns: &[FieldPattern]) {
    if let Some(coordinate) = extract(body, &COORDINATE_BLOCK, 0) {
        set_fields(record, coordinate.content(), patterns);
    }
}

/// Stores the name block, or the plain `name="..."` value if there is no block
fn set_name(record: &mut RawRecord, body: &str) {
    if let Some(name) = extract(body, &NAME_BLOCK, 0) {
        record.set_name_template(name.content());
    } else if let Some(name) = capture(body, &SIMPLE_NAME) {
        record.set_field(keys::NAME, &name.replace('_', " "));
    }
}

/// Pairs the n-th belt type with the n-th radius. Extra entries on either
/// side are dropped.
fn parse_belts(body: &str) -> Vec<RawBelt> {
    let Some(belts) = extract(body, &BELTS_BLOCK, 0) else {
        return Vec::new();
    };
    let types = capture_all(belts.content(), &BELT_TYPE);
    let radii = capture_all(belts.content(), &BELT_RADIUS);
    types
        .into_iter()
        .zip(radii)
        .map(|(belt_type, radius)| RawBelt {
            belt_type: belt_type.into(),
            radius: radius.into(),
        })
        .collect()
}

/// Shared by stars and planets, the game uses the same layout for both
fn parse_body(id: GameId, kind: RecordKind, body: &str) -> RawRecord {
    let mut record = RawRecord::new(id, kind);
    set_name(&mut record, body);
    set_coordinates(&mut record, body, &[(keys::X, &COORD_X), (keys::Y, &COORD_Y)]);
    set_fields(
        &mut record,
        body,
        &[
            (keys::TYPE, &UNQUOTED_TYPE),
            (keys::PLANET_CLASS, &PLANET_CLASS),
            (keys::PLANET_SIZE, &PLANET_SIZE),
            (keys::ORBIT, &ORBIT),
            (keys::MOON_OF, &MOON_OF),
            (keys::STAR_CLASS, &STAR_CLASS),
        ],
    );
    record
}

/// Parses a `galactic_object` entry
pub fn parse_star(id: GameId, body: &str) -> RawRecord {
    let mut record = parse_body(id, RecordKind::Star, body);
    record.set_belts(parse_belts(body));
    record.set_hyperlanes(capture_ids(body, &HYPERLANE_TARGET));
    record.set_planet_ids(capture_ids(body, &CONTAINED_PLANET));
    record
}

/// Parses a `planets.planet` entry
pub fn parse_planet(id: GameId, body: &str) -> RawRecord {
    parse_body(id, RecordKind::Planet, body)
}

/// Parses a top level `nebula` block. Nebulae have no id of their own, the
/// caller passes the ordinal of the block.
pub fn parse_nebula(id: GameId, body: &str) -> RawRecord {
    let mut record = RawRecord::new(id, RecordKind::Nebula);
    if let Some(name) = extract(body, &NAME_BLOCK, 0) {
        record.set_name_template(name.content());
    }
    set_coordinates(&mut record, body, &[(keys::X, &COORD_X), (keys::Y, &COORD_Y)]);
    set_fields(&mut record, body, &[(keys::RADIUS, &RADIUS)]);
    record
}

/// Parses the simple key value records of the `bypasses`,
/// `natural_wormholes` and `megastructures` sections.
pub fn parse_generic(id: GameId, kind: RecordKind, body: &str) -> RawRecord {
    let mut record = RawRecord::new(id, kind);
    set_fields(
        &mut record,
        body,
        &[
            (keys::TYPE, &QUOTED_TYPE),
            (keys::ORIGIN, &ORIGIN),
            (keys::LINKED_TO, &LINKED_TO),
            (keys::BYPASS, &BYPASS),
            (keys::PLANET, &HOST_PLANET),
            (keys::GRAPHICAL_CULTURE, &GRAPHICAL_CULTURE),
        ],
    );
    // the origin inside the coordinate block is the authoritative one
    set_coordinates(
        &mut record,
        body,
        &[
            (keys::X, &COORD_X),
            (keys::Y, &COORD_Y),
            (keys::ORIGIN, &COORD_ORIGIN),
        ],
    );
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAR: &str = "\t0=
\t{
\t\tcoordinate=
\t\t{
\t\t\tx=-120.5
\t\t\ty=33
\t\t\torigin=4294967295
\t\t}
\t\ttype=star
\t\tname=
\t\t{
\t\t\tkey=\"NAME_Sol\"
\t\t}
\t\tplanet=12
\t\tplanet=13
\t\tstar_class=\"sc_g\"
\t\thyperlane=
\t\t{
\t\t\t{
\t\t\t\tto=4
\t\t\t\tlength=31
\t\t\t}
\t\t\t{
\t\t\t\tto=9
\t\t\t\tlength=12
\t\t\t}
\t\t}
\t\tasteroid_belts=
\t\t{
\t\t\t{
\t\t\t\ttype=\"rocky_asteroid_belt\"
\t\t\t\tinner_radius=95
\t\t\t}
\t\t}
\t}";

    #[test]
    fn test_star() {
        let record = parse_star(0, STAR);
        assert_eq!(record.get_kind(), RecordKind::Star);
        assert_eq!(record.get_position(), Some((-120.5, 33.0)));
        assert_eq!(record.get(keys::TYPE), Some("star"));
        assert_eq!(record.get(keys::STAR_CLASS), Some("sc_g"));
        assert_eq!(record.get_planet_ids(), &[12, 13]);
        assert_eq!(record.get_hyperlanes(), &[4, 9]);
        assert!(record.get_name_template().unwrap().contains("NAME_Sol"));
        assert_eq!(record.get_belts().len(), 1);
        assert_eq!(record.get_belts()[0].radius.as_ref(), "95");
    }

    #[test]
    fn test_planet() {
        let body = "\t\t13=
\t\t{
\t\t\tname=
\t\t\t{
\t\t\t\tkey=\"SUBPLANET_NAME_FORMAT\"
\t\t\t}
\t\t\tplanet_class=\"pc_barren_cold\"
\t\t\tcoordinate=
\t\t\t{
\t\t\t\tx=10
\t\t\t\ty=-2.5
\t\t\t\torigin=0
\t\t\t}
\t\t\torbit=-12
\t\t\tplanet_size=6
\t\t\tmoon_of=12
\t\t}";
        let record = parse_planet(13, body);
        assert_eq!(record.get(keys::PLANET_CLASS), Some("pc_barren_cold"));
        assert_eq!(record.get_real(keys::ORBIT), Some(-12.0));
        assert_eq!(record.get(keys::PLANET_SIZE), Some("6"));
        assert_eq!(record.get_id_field(keys::MOON_OF), Some(12));
        assert_eq!(record.get_position(), Some((10.0, -2.5)));
    }

    #[test]
    fn test_simple_name() {
        let record = parse_planet(1, "\t\t1=\n\t\t{\n\t\t\tname=\"Old_Earth\"\n\t\t}");
        assert!(record.get_name_template().is_none());
        assert_eq!(record.get(keys::NAME), Some("Old Earth"));
    }

    #[test]
    fn test_belt_truncation() {
        let body = "asteroid_belts=
{
\t{ type=\"rocky_asteroid_belt\" inner_radius=95 }
\t{ type=\"icy_asteroid_belt\" inner_radius=120 }
\t{ type=\"rocky_asteroid_belt\" }
}";
        let belts = parse_belts(body);
        assert_eq!(belts.len(), 2);
        assert_eq!(belts[1].belt_type.as_ref(), "icy_asteroid_belt");
        assert_eq!(belts[1].radius.as_ref(), "120");
    }

    #[test]
    fn test_nebula() {
        let body = "nebula=
{
\tcoordinate=
\t{
\t\tx=50
\t\ty=60
\t\torigin=4294967295
\t}
\tname=
\t{
\t\tkey=\"NEBULA_NAME_1\"
\t}
\tradius=45
\tgalactic_object=20
}";
        let record = parse_nebula(0, body);
        assert_eq!(record.get_position(), Some((50.0, 60.0)));
        assert_eq!(record.get_real(keys::RADIUS), Some(45.0));
        assert!(record.get_name_template().unwrap().contains("NEBULA_NAME_1"));
    }

    #[test]
    fn test_generic() {
        let body = "\t5=
\t{
\t\ttype=\"habitat_central\"
\t\tcoordinate=
\t\t{
\t\t\tx=20
\t\t\ty=0
\t\t\torigin=77
\t\t}
\t\tplanet=300
\t\tgraphical_culture=\"mammalian_01\"
\t}";
        let record = parse_generic(5, RecordKind::Megastructure, body);
        assert_eq!(record.get(keys::TYPE), Some("habitat_central"));
        assert_eq!(record.get_id_field(keys::ORIGIN), Some(77));
        assert_eq!(record.get_id_field(keys::PLANET), Some(300));
        assert_eq!(record.get(keys::GRAPHICAL_CULTURE), Some("mammalian_01"));
        assert_eq!(record.get_position(), Some((20.0, 0.0)));
    }

    #[test]
    fn test_bypass() {
        let record = parse_generic(
            8,
            RecordKind::Bypass,
            "\t8={\n\t\ttype=\"wormhole\"\n\t\tlinked_to=9\n\t}",
        );
        assert_eq!(record.get(keys::TYPE), Some("wormhole"));
        assert_eq!(record.get_id_field(keys::LINKED_TO), Some(9));
    }
}
