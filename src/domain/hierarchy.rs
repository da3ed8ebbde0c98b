//! Course, lesson and problem documents.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::path::ResourcePath;

const INDEX_DOCUMENT: &str = "index.hy";
const PROBLEM_EXTENSION: &str = ".hy";

/// Whitespace-separated lesson identifiers on a course document.
pub const LESSONS_ATTRIBUTE: &str = "lessons";
/// Whitespace-separated problem identifiers on a lesson document.
pub const PROBLEMS_ATTRIBUTE: &str = "problems";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Course,
    Lesson,
    Problem,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Course => "course",
            NodeKind::Lesson => "lesson",
            NodeKind::Problem => "problem",
        }
    }

    /// Attribute a document must declare, non-empty, to count as this kind.
    pub fn sentinel(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("request must specify {kind}")]
    Missing { kind: NodeKind },
    #[error("{kind} identifier `{id}` is invalid")]
    Invalid { kind: NodeKind, id: String },
}

/// Identifiers must match `[A-Za-z0-9_.-]+`.
pub fn validate_identifier(kind: NodeKind, id: &str) -> Result<(), IdentifierError> {
    if id.is_empty() {
        return Err(IdentifierError::Missing { kind });
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(IdentifierError::Invalid {
            kind,
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn tokens(list: &str) -> impl Iterator<Item = &str> {
    list.split_whitespace()
}

pub fn lists_token(list: &str, id: &str) -> bool {
    tokens(list).any(|token| token == id)
}

pub fn course_document(course_id: &str) -> ResourcePath {
    ResourcePath::new([course_id, INDEX_DOCUMENT])
}

pub fn lesson_document(course_id: &str, lesson_id: &str) -> ResourcePath {
    ResourcePath::new([course_id, lesson_id, INDEX_DOCUMENT])
}

pub fn problem_document(course_id: &str, lesson_id: &str, problem_id: &str) -> ResourcePath {
    ResourcePath::new([
        course_id.to_string(),
        lesson_id.to_string(),
        format!("{problem_id}{PROBLEM_EXTENSION}"),
    ])
}

/// One lesson of a course outline, with its problems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonOutline {
    pub id: String,
    pub title: String,
    pub valid: bool,
    pub problems: Vec<ProblemOutline>,
}

impl LessonOutline {
    pub fn new(id: impl Into<String>, title: impl Into<String>, problems: Vec<ProblemOutline>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            valid: true,
            problems,
        }
    }

    /// Placeholder for a lesson listed by its course that could not be resolved.
    pub fn invalid(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            title: format!("Invalid lesson \"{id}\""),
            id,
            valid: false,
            problems: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemOutline {
    pub id: String,
    pub title: String,
    pub valid: bool,
}

impl ProblemOutline {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            valid: true,
        }
    }

    /// Placeholder for a problem listed by its lesson that could not be resolved.
    pub fn invalid(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            title: format!("Invalid problem \"{id}\""),
            id,
            valid: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_validation() {
        assert!(validate_identifier(NodeKind::Course, "cs-101_v2.0").is_ok());
        assert_eq!(
            validate_identifier(NodeKind::Lesson, ""),
            Err(IdentifierError::Missing {
                kind: NodeKind::Lesson
            })
        );
        assert_eq!(
            validate_identifier(NodeKind::Problem, "a/b"),
            Err(IdentifierError::Invalid {
                kind: NodeKind::Problem,
                id: "a/b".to_string()
            })
        );
    }

    #[test]
    fn membership_uses_whole_tokens() {
        let list = "intro  loops\n\tfunctions";
        assert!(lists_token(list, "loops"));
        assert!(lists_token(list, "functions"));
        assert!(!lists_token(list, "loop"));
        assert!(!lists_token("", "intro"));
    }

    #[test]
    fn document_paths() {
        assert_eq!(course_document("cs1").display_path(), "cs1/index.hy");
        assert_eq!(
            lesson_document("cs1", "intro").display_path(),
            "cs1/intro/index.hy"
        );
        assert_eq!(
            problem_document("cs1", "intro", "sum").display_path(),
            "cs1/intro/sum.hy"
        );
    }

    #[test]
    fn placeholders_carry_identifier_in_title() {
        let lesson = LessonOutline::invalid("loops");
        assert_eq!(lesson.title, "Invalid lesson \"loops\"");
        assert!(lesson.problems.is_empty());
        assert!(!lesson.valid);

        let problem = ProblemOutline::invalid("sum");
        assert_eq!(problem.title, "Invalid problem \"sum\"");
        assert!(!problem.valid);
    }
}
