//! Line-oriented attribute documents.
//!
//! ```text
//! ignored preamble
//! $course Introduction to Programming
//! $lessons intro loops
//!   functions
//! ```
//!
//! A line starting with `$` opens an attribute named by the identifier that
//! follows; one space separates the name from the first line of the value.
//! Following lines are appended with `\n` until the next `$` line. There is no
//! escape for a continuation line that itself starts with `$`.

use std::collections::HashMap;

const MARKER: char = '$';

/// Parsed attribute document. Names are unique; the last declaration wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    attributes: HashMap<String, String>,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        let mut attributes = HashMap::new();
        let mut current: Option<(String, String)> = None;

        for line in text.lines() {
            if let Some(declaration) = line.strip_prefix(MARKER) {
                if let Some((name, value)) = current.take() {
                    attributes.insert(name, value);
                }
                current = Some(split_declaration(declaration));
            } else if let Some((_, value)) = current.as_mut() {
                // An empty value takes the first continuation line verbatim.
                if !value.is_empty() {
                    value.push('\n');
                }
                value.push_str(line);
            }
        }

        if let Some((name, value)) = current {
            attributes.insert(name, value);
        }

        Self { attributes }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

fn split_declaration(declaration: &str) -> (String, String) {
    let end = declaration
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(declaration.len());
    let (name, rest) = declaration.split_at(end);
    let value = rest.strip_prefix(' ').unwrap_or(rest);
    (name.to_string(), value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_value_with_continuation() {
        let doc = Document::parse("$course Intro\nBody line");
        assert_eq!(doc.get("course"), Some("Intro\nBody line"));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn discards_preamble() {
        let doc = Document::parse("# notes for editors\nmore notes\n$problem Sum\n");
        assert_eq!(doc.get("problem"), Some("Sum"));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn continuation_lines_run_until_next_marker() {
        let text = "$html <p>\nline one\nline two\n$initcode x = 1\n";
        let doc = Document::parse(text);
        assert_eq!(doc.get("html"), Some("<p>\nline one\nline two"));
        assert_eq!(doc.get("initcode"), Some("x = 1"));
    }

    #[test]
    fn empty_value_takes_first_continuation_line() {
        let doc = Document::parse("$lessons\nintro\nloops");
        assert_eq!(doc.get("lessons"), Some("intro\nloops"));
    }

    #[test]
    fn bare_marker_declares_empty_value() {
        let doc = Document::parse("$course\n$lessons a b");
        assert_eq!(doc.get("course"), Some(""));
        assert_eq!(doc.get("lessons"), Some("a b"));
    }

    #[test]
    fn redeclaration_overwrites() {
        let doc = Document::parse("$title First\n$title Second");
        assert_eq!(doc.get("title"), Some("Second"));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn only_one_space_is_consumed() {
        let doc = Document::parse("$code   indented");
        assert_eq!(doc.get("code"), Some("  indented"));
    }

    #[test]
    fn text_without_markers_is_empty() {
        assert!(Document::parse("just prose\nno attributes").is_empty());
        assert!(Document::parse("").is_empty());
    }

    #[test]
    fn handles_crlf_line_endings() {
        let doc = Document::parse("$course Intro\r\n$lessons a\r\n");
        assert_eq!(doc.get("course"), Some("Intro"));
        assert_eq!(doc.get("lessons"), Some("a"));
    }
}
