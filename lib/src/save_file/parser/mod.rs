/// Commonly used types and other abstractions within the parser
pub mod types;

/// A submodule that provides [Block](block::Block) extraction, the primitive
/// every other part of the parser is built on. Locates a brace delimited span
/// by a start pattern and returns its content, respecting nesting.
pub mod block;

/// A submodule that provides the parser output objects.
/// Every keyed entry of the save file is reduced to a [RawRecord], holding
/// just the handful of fields the [structures](crate::save_file::structures)
/// need. Nothing downstream ever looks at the save text again.
mod record;
pub use record::{keys, RawBelt, RawRecord, RecordKind, RecordMap};

/// A submodule that provides the [scan_section] function, which reads every
/// numerically keyed record of a section from a line stream.
mod section;
pub use section::{scan_section, RECORD_HEADER};

/// The per section block parsers
mod fields;
pub use fields::{parse_generic, parse_nebula, parse_planet, parse_star};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_bypasses() {
        let text = "\t\t0=\n\t\t{\n\t\t\ttype=\"wormhole\"\n\t\t\tlinked_to=1\n\t\t\towner=\n\t\t\t{\n\t\t\t\ttype=6\n\t\t\t\tid=0\n\t\t\t}\n\t\t}
\t\t1=\n\t\t{\n\t\t\ttype=\"wormhole\"\n\t\t\tlinked_to=0\n\t\t}
\t\t2=none
\t\t3={ type=\"gateway\" }
\t}";
        let records = scan_section(&mut text.lines(), &RECORD_HEADER, |id, body| {
            parse_generic(id, RecordKind::Bypass, body)
        });
        assert_eq!(records.len(), 3);
        let first = records.get(&0).unwrap();
        assert_eq!(first.get(keys::TYPE), Some("wormhole"));
        assert_eq!(first.get_id_field(keys::LINKED_TO), Some(1));
        assert_eq!(records.get(&3).unwrap().get(keys::TYPE), Some("gateway"));
    }

    #[test]
    fn test_scan_stars() {
        let text = "\t0=\n\t{\n\t\tcoordinate=\n\t\t{\n\t\t\tx=1\n\t\t\ty=2\n\t\t}\n\t\tname=\n\t\t{\n\t\t\tkey=\"NAME_Sol\"\n\t\t}\n\t\tplanet=0\n\t}
\t1=\n\t{\n\t\tcoordinate=\n\t\t{\n\t\t\tx=3\n\t\t\ty=4\n\t\t}\n\t\tplanet=1\n\t\tplanet=2\n\t}\n}";
        let records = scan_section(&mut text.lines(), &RECORD_HEADER, parse_star);
        assert_eq!(records.len(), 2);
        assert_eq!(records.get(&1).unwrap().get_planet_ids(), &[1, 2]);
        assert_eq!(records.get(&1).unwrap().get_position(), Some((3.0, 4.0)));
    }
}
