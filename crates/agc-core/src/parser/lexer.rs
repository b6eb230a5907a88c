//! Lexical cleaner — comment stripping and indentation depth
//!
//! Specification files are indentation-structured. Every physical line is
//! cleaned before the block parser looks at it:
//!
//! - everything from the first `##` onward is a comment and is removed
//! - tabs expand to `TAB_WIDTH` spaces
//! - trailing whitespace is stripped
//!
//! Lines that clean to the empty string carry no structure and are skipped.

/// Comment marker, runs to end of line
pub const COMMENT_MARKER: &str = "##";

/// Spaces per indentation level; a tab counts as one level
pub const TAB_WIDTH: usize = 2;

/// A cleaned, non-empty source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number in the source text
    pub number: usize,
    /// Indentation level (leading spaces / `TAB_WIDTH`, rounded down)
    pub depth: usize,
    /// Cleaned text, leading indentation preserved
    pub text: String,
}

impl Line {
    /// Text with indentation removed
    pub fn content(&self) -> &str {
        self.text.trim()
    }
}

/// Returns a comment-free, tab-expanded line with no trailing whitespace
pub fn clean(line: &str) -> String {
    let code = match line.find(COMMENT_MARKER) {
        Some(idx) => &line[..idx],
        None => line,
    };
    code.replace('\t', &" ".repeat(TAB_WIDTH))
        .trim_end()
        .to_string()
}

/// Indentation level of a cleaned line
///
/// A partial indent rounds down to the enclosing level.
pub fn indentation(line: &str) -> usize {
    let spaces = line.len() - line.trim_start_matches(' ').len();
    spaces / TAB_WIDTH
}

/// Clean every line of `text`, dropping those that end up empty
pub fn lines(text: &str) -> Vec<Line> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let cleaned = clean(raw);
            if cleaned.is_empty() {
                return None;
            }
            Some(Line {
                number: idx + 1,
                depth: indentation(&cleaned),
                text: cleaned,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_comment() {
        assert_eq!(clean("  request := FALSE ## initial"), "  request := FALSE");
    }

    #[test]
    fn test_clean_comment_only_line_is_empty() {
        assert_eq!(clean("## waiter/customer model"), "");
        assert_eq!(clean("    ## indented comment"), "");
    }

    #[test]
    fn test_clean_expands_tabs() {
        assert_eq!(clean("\t\tTRUE"), "    TRUE");
    }

    #[test]
    fn test_clean_strips_trailing_whitespace() {
        assert_eq!(clean("  NAME:   \t"), "  NAME:");
    }

    #[test]
    fn test_clean_keeps_single_hash() {
        assert_eq!(clean("  a # b"), "  a # b");
    }

    #[test]
    fn test_indentation_levels() {
        assert_eq!(indentation("CONTRACT:"), 0);
        assert_eq!(indentation("  NAME:"), 1);
        assert_eq!(indentation("    waiter"), 2);
    }

    #[test]
    fn test_indentation_partial_rounds_down() {
        assert_eq!(indentation(" NAME:"), 0);
        assert_eq!(indentation("   waiter"), 1);
        assert_eq!(indentation("     waiter"), 2);
    }

    #[test]
    fn test_lines_skips_blank_and_comments() {
        let text = "CONTRACT:\n\n  ## comment\n  NAME:\n\t\twaiter   \n";
        let lines = lines(text);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[1].number, 4);
        assert_eq!(lines[1].depth, 1);
        assert_eq!(lines[2].number, 5);
        assert_eq!(lines[2].depth, 2);
        assert_eq!(lines[2].content(), "waiter");
    }
}
