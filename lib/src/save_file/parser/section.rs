use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::{
    block::brace_balance,
    record::{RawRecord, RecordMap},
    types::GameId,
};

/// The header of a keyed record: a numeric id followed by `=`.
/// The first capture group is the id.
pub static RECORD_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*=").unwrap());

/// The token the game writes in place of a record body for an empty slot.
const NONE_TOKEN: &str = "none";

/// Returns true if the line is the lone closing brace that terminates a section
fn is_section_end(line: &str) -> bool {
    line.trim() == "}"
}

/// Consumes lines until the block opened with `depth` unclosed braces is
/// balanced again. Returns false if the input ran out first.
fn skip_block<'a, I: Iterator<Item = &'a str>>(lines: &mut I, mut depth: i64) -> bool {
    for line in lines {
        depth += brace_balance(line);
        if depth <= 0 {
            return true;
        }
    }
    false
}

/// Reads a single keyed section from a stream of lines.
///
/// The opening brace of the section must already have been consumed. Lines
/// are read until the lone `}` that closes the section. Every line matching
/// `header` starts a record, whose body is the header line plus as many
/// following lines as needed to get the brace depth back to zero. A record
/// written entirely on its header line is taken as is, and a header followed
/// by the `none` token is an explicitly empty slot and gets skipped.
///
/// Each body is handed to `parse` together with the id captured by the
/// header, and the result is stored under that id. Running out of lines
/// before the section is closed is treated as the end of the section.
pub fn scan_section<'a, I, F>(lines: &mut I, header: &Regex, parse: F) -> RecordMap
where
    I: Iterator<Item = &'a str>,
    F: Fn(GameId, &str) -> RawRecord,
{
    let mut records = RecordMap::default();
    while let Some(line) = lines.next() {
        if is_section_end(line) {
            return records;
        }
        let captures = match header.captures(line) {
            Some(c) => c,
            None => {
                // something that isn't a record, it may still open a block we have to step over
                let balance = brace_balance(line);
                if balance > 0 && !skip_block(lines, balance) {
                    break;
                }
                continue;
            }
        };
        let rest = &line[captures.get(0).map_or(0, |m| m.end())..];
        if rest.trim_start().starts_with(NONE_TOKEN) {
            continue;
        }
        let id = &captures[1];
        let mut body = String::from(line);
        let mut depth = brace_balance(line);
        let mut opened = line.contains('{');
        let mut complete = opened && depth <= 0;
        while !complete {
            let next = match lines.next() {
                Some(next) => next,
                None => break,
            };
            if !opened && is_section_end(next) {
                warn!("record {} has no body, section closed", id);
                return records;
            }
            body.push('\n');
            body.push_str(next);
            depth += brace_balance(next);
            opened |= next.contains('{');
            complete = opened && depth <= 0;
        }
        if !complete {
            warn!("record {} is not closed before the end of input", id);
            break;
        }
        match id.parse::<GameId>() {
            Ok(id) => records.insert(parse(id, &body)),
            Err(e) => warn!("skipping record with invalid id {}: {}", id, e),
        }
    }
    warn!(
        "section ended without a closing brace after {} records",
        records.len()
    );
    records
}
