use regex::Regex;

/// A brace delimited span located within a larger piece of save text.
///
/// The span begins where the start pattern matched and ends right after the
/// matching closing brace. The [content](Block::content) is the text strictly
/// between the opening brace and its matching closing brace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    content: &'a str,
    start: usize,
    end: usize,
}

impl<'a> Block<'a> {
    /// The text between the braces, braces excluded
    pub fn content(&self) -> &'a str {
        self.content
    }

    /// Offset of the start pattern match within the searched text
    pub fn start(&self) -> usize {
        self.start
    }

    /// Offset right past the closing brace, exclusive
    pub fn end(&self) -> usize {
        self.end
    }
}

/// Finds the first match of `start` at or after `from`, then the first `{`
/// after that match, and returns the block that brace opens. When the match
/// itself ends with `{`, that brace is the one opening the block.
///
/// Returns [None] when the pattern doesn't occur, when no brace follows it,
/// or when the braces are not balanced before the end of `text`. A truncated
/// span is never returned. The function holds no state, so it is safe to call
/// on the content of a block that was itself extracted.
pub fn extract<'a>(text: &'a str, start: &Regex, from: usize) -> Option<Block<'a>> {
    let haystack = text.get(from..)?;
    let found = start.find(haystack)?;
    let span_start = from + found.start();
    let match_end = from + found.end();
    // a pattern ending in a brace opens the block itself
    let open = if found.as_str().ends_with('{') {
        match_end - 1
    } else {
        match_end + text[match_end..].find('{')?
    };
    let mut depth = 0usize;
    // braces are ascii, so byte offsets are always valid char boundaries
    for (i, c) in text.as_bytes()[open..].iter().enumerate() {
        match c {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    let close = open + i;
                    return Some(Block {
                        content: &text[open + 1..close],
                        start: span_start,
                        end: close + 1,
                    });
                }
            }
            _ => {}
        }
    }
    None
}

/// An iterator over consecutive, non overlapping blocks opened by the same pattern.
pub struct Blocks<'a, 'r> {
    text: &'a str,
    start: &'r Regex,
    offset: usize,
}

impl<'a> Iterator for Blocks<'a, '_> {
    type Item = Block<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let block = extract(self.text, self.start, self.offset)?;
        self.offset = block.end();
        Some(block)
    }
}

/// Returns every block opened by `start` in `text`, in order of appearance.
/// Iteration stops at the first unbalanced block.
pub fn extract_all<'a, 'r>(text: &'a str, start: &'r Regex) -> Blocks<'a, 'r> {
    Blocks {
        text,
        start,
        offset: 0,
    }
}

/// Returns the net brace depth change of a piece of text.
pub fn brace_balance(text: &str) -> i64 {
    text.bytes().fold(0, |acc, c| match c {
        b'{' => acc + 1,
        b'}' => acc - 1,
        _ => acc,
    })
}
