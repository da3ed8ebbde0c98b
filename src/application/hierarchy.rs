//! Course → lesson → problem resolution on top of the attribute cache.
//!
//! Every level is a stage returning `Result`; the first failing stage ends the
//! lookup. A child is only resolved when its parent document declares itself
//! as the parent kind and lists the child's identifier.

use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::cache::{AttributeCache, AttributeRequest, AttributeSet, ContentError};
use crate::domain::hierarchy::{
    IdentifierError, LESSONS_ATTRIBUTE, LessonOutline, NodeKind, PROBLEMS_ATTRIBUTE,
    ProblemOutline, course_document, lesson_document, lists_token, problem_document, tokens,
    validate_identifier,
};
use crate::domain::path::ResourcePath;

const SOURCE: &str = "application::hierarchy";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("request must specify {kind}")]
    MissingIdentifier { kind: NodeKind },
    #[error("{kind} identifier `{id}` is invalid")]
    InvalidIdentifier { kind: NodeKind, id: String },
    #[error("{child} `{id}` is not listed in {parent} file")]
    ReferentialIntegrity {
        parent: NodeKind,
        child: NodeKind,
        id: String,
    },
    #[error("{kind} file for `{id}` is not valid")]
    NotSelfDeclared { kind: NodeKind, id: String },
    #[error("{kind} file for `{id}` is missing")]
    DocumentMissing {
        kind: NodeKind,
        id: String,
        #[source]
        source: ContentError,
    },
    #[error(transparent)]
    Content(#[from] ContentError),
}

impl From<IdentifierError> for HierarchyError {
    fn from(error: IdentifierError) -> Self {
        match error {
            IdentifierError::Missing { kind } => Self::MissingIdentifier { kind },
            IdentifierError::Invalid { kind, id } => Self::InvalidIdentifier { kind, id },
        }
    }
}

/// A resolved course, lesson or problem with the attributes the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub id: String,
    pub attributes: AttributeSet,
}

#[derive(Clone)]
pub struct HierarchyResolver {
    attributes: AttributeCache,
}

impl HierarchyResolver {
    pub fn new(attributes: AttributeCache) -> Self {
        Self { attributes }
    }

    pub async fn get_course(
        &self,
        course_id: &str,
        extra: &AttributeRequest,
    ) -> Result<Node, HierarchyError> {
        validate_identifier(NodeKind::Course, course_id)?;

        self.load_node(NodeKind::Course, course_id, course_document(course_id), extra)
            .await
    }

    pub async fn get_lesson(
        &self,
        course_id: &str,
        lesson_id: &str,
        extra: &AttributeRequest,
    ) -> Result<Node, HierarchyError> {
        validate_identifier(NodeKind::Course, course_id)?;
        validate_identifier(NodeKind::Lesson, lesson_id)?;

        self.check_membership(
            NodeKind::Course,
            course_id,
            course_document(course_id),
            NodeKind::Lesson,
            lesson_id,
        )
        .await?;

        self.load_node(
            NodeKind::Lesson,
            lesson_id,
            lesson_document(course_id, lesson_id),
            extra,
        )
        .await
    }

    pub async fn get_problem(
        &self,
        course_id: &str,
        lesson_id: &str,
        problem_id: &str,
        extra: &AttributeRequest,
    ) -> Result<Node, HierarchyError> {
        validate_identifier(NodeKind::Course, course_id)?;
        validate_identifier(NodeKind::Lesson, lesson_id)?;
        validate_identifier(NodeKind::Problem, problem_id)?;

        self.check_membership(
            NodeKind::Course,
            course_id,
            course_document(course_id),
            NodeKind::Lesson,
            lesson_id,
        )
        .await?;
        self.check_membership(
            NodeKind::Lesson,
            lesson_id,
            lesson_document(course_id, lesson_id),
            NodeKind::Problem,
            problem_id,
        )
        .await?;

        self.load_node(
            NodeKind::Problem,
            problem_id,
            problem_document(course_id, lesson_id, problem_id),
            extra,
        )
        .await
    }

    /// Every lesson of the course with its problems. Lessons and problems
    /// that cannot be resolved become placeholders; only a failure to resolve
    /// the course itself is an error.
    pub async fn get_all_problems(
        &self,
        course_id: &str,
    ) -> Result<Vec<LessonOutline>, HierarchyError> {
        let extra = AttributeRequest::new().with_default(LESSONS_ATTRIBUTE, "");
        let course = self.get_course(course_id, &extra).await?;
        let lessons = course.attributes.value(LESSONS_ATTRIBUTE).unwrap_or_default();

        let outlines = join_all(
            tokens(lessons).map(|lesson_id| self.lesson_outline(course_id, lesson_id)),
        )
        .await;
        Ok(outlines)
    }

    async fn lesson_outline(&self, course_id: &str, lesson_id: &str) -> LessonOutline {
        let request = AttributeRequest::new()
            .with(NodeKind::Lesson.sentinel())
            .with_default(PROBLEMS_ATTRIBUTE, "");
        let path = lesson_document(course_id, lesson_id);

        let lesson = match self.attributes.get_properties(&path, &request).await {
            Ok(lesson) => lesson,
            Err(err) => {
                debug!(target_module = SOURCE, course = course_id, lesson = lesson_id, error = %err, "lesson placeholder");
                return LessonOutline::invalid(lesson_id);
            }
        };
        let Some(title) = declared_sentinel(&lesson, NodeKind::Lesson) else {
            return LessonOutline::invalid(lesson_id);
        };

        let problems_list = lesson.value(PROBLEMS_ATTRIBUTE).unwrap_or_default();
        let problems = join_all(
            tokens(problems_list)
                .map(|problem_id| self.problem_outline(course_id, lesson_id, problem_id)),
        )
        .await;

        LessonOutline::new(lesson_id, title, problems)
    }

    async fn problem_outline(
        &self,
        course_id: &str,
        lesson_id: &str,
        problem_id: &str,
    ) -> ProblemOutline {
        let request = AttributeRequest::new().with(NodeKind::Problem.sentinel());
        let path = problem_document(course_id, lesson_id, problem_id);

        match self.attributes.get_properties(&path, &request).await {
            Ok(problem) => match declared_sentinel(&problem, NodeKind::Problem) {
                Some(title) => ProblemOutline::new(problem_id, title),
                None => ProblemOutline::invalid(problem_id),
            },
            Err(err) => {
                debug!(target_module = SOURCE, course = course_id, lesson = lesson_id, problem = problem_id, error = %err, "problem placeholder");
                ProblemOutline::invalid(problem_id)
            }
        }
    }

    /// The parent document must declare itself as `parent` and list `child_id`.
    async fn check_membership(
        &self,
        parent: NodeKind,
        parent_id: &str,
        parent_path: ResourcePath,
        child: NodeKind,
        child_id: &str,
    ) -> Result<(), HierarchyError> {
        let list_attribute = match parent {
            NodeKind::Course => LESSONS_ATTRIBUTE,
            NodeKind::Lesson | NodeKind::Problem => PROBLEMS_ATTRIBUTE,
        };
        let request = AttributeRequest::new()
            .with(parent.sentinel())
            .with_default(list_attribute, "");

        let attributes = self
            .fetch(parent, parent_id, &parent_path, &request)
            .await?;
        if declared_sentinel(&attributes, parent).is_none() {
            return Err(HierarchyError::NotSelfDeclared {
                kind: parent,
                id: parent_id.to_string(),
            });
        }

        let listed = attributes.value(list_attribute).unwrap_or_default();
        if !lists_token(listed, child_id) {
            return Err(HierarchyError::ReferentialIntegrity {
                parent,
                child,
                id: child_id.to_string(),
            });
        }
        Ok(())
    }

    /// Load the node's document with the caller's attributes plus the kind's
    /// sentinel. The sentinel is only visible to the caller if they asked for it.
    async fn load_node(
        &self,
        kind: NodeKind,
        id: &str,
        path: ResourcePath,
        extra: &AttributeRequest,
    ) -> Result<Node, HierarchyError> {
        let sentinel = kind.sentinel();
        let sentinel_added = !extra.contains(sentinel);
        let mut request = extra.clone();
        if sentinel_added {
            request.insert(sentinel, None);
        }

        let mut attributes = self.fetch(kind, id, &path, &request).await?;
        if declared_sentinel(&attributes, kind).is_none() {
            return Err(HierarchyError::NotSelfDeclared {
                kind,
                id: id.to_string(),
            });
        }
        if sentinel_added {
            attributes.remove(sentinel);
        }

        Ok(Node {
            kind,
            id: id.to_string(),
            attributes,
        })
    }

    async fn fetch(
        &self,
        kind: NodeKind,
        id: &str,
        path: &ResourcePath,
        request: &AttributeRequest,
    ) -> Result<AttributeSet, HierarchyError> {
        self.attributes
            .get_properties(path, request)
            .await
            .map_err(|err| match err {
                source @ ContentError::BackingStore { .. } => HierarchyError::DocumentMissing {
                    kind,
                    id: id.to_string(),
                    source,
                },
                other => HierarchyError::Content(other),
            })
    }
}

/// The sentinel value when the document itself declares it non-empty.
fn declared_sentinel(attributes: &AttributeSet, kind: NodeKind) -> Option<&str> {
    attributes
        .found(kind.sentinel())
        .filter(|value| !value.is_empty())
}
