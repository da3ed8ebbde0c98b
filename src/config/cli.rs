use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

use crate::cache::AttributeRequest;

/// Command-line arguments for the Hydra content inspector.
#[derive(Debug, Parser)]
#[command(name = "hydra", version, about = "Hydra course content inspector")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "HYDRA_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the content root directory.
    #[arg(
        long = "content-root",
        global = true,
        value_name = "PATH",
        value_hint = ValueHint::DirPath
    )]
    pub content_root: Option<PathBuf>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        global = true,
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print the requested attributes of one document.
    Attrs(AttrsArgs),
    /// Print file/directory information for a content path.
    Stat(StatArgs),
    /// Resolve a course.
    Course(CourseArgs),
    /// Resolve a lesson of a course.
    Lesson(LessonArgs),
    /// Resolve a problem of a lesson.
    Problem(ProblemArgs),
    /// Print every lesson and problem of a course.
    Outline(OutlineArgs),
}

#[derive(Debug, Args, Clone)]
pub struct AttrsArgs {
    /// Path segments below the content root, e.g. `cs1 intro index.hy`.
    #[arg(value_name = "SEGMENT", required = true, num_args = 1..)]
    pub segments: Vec<String>,

    #[command(flatten)]
    pub names: NameArgs,
}

#[derive(Debug, Args, Clone)]
pub struct StatArgs {
    /// Path segments below the content root.
    #[arg(value_name = "SEGMENT", required = true, num_args = 1..)]
    pub segments: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct CourseArgs {
    #[arg(value_name = "COURSE")]
    pub course: String,

    #[command(flatten)]
    pub names: NameArgs,
}

#[derive(Debug, Args, Clone)]
pub struct LessonArgs {
    #[arg(value_name = "COURSE")]
    pub course: String,

    #[arg(value_name = "LESSON")]
    pub lesson: String,

    #[command(flatten)]
    pub names: NameArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ProblemArgs {
    #[arg(value_name = "COURSE")]
    pub course: String,

    #[arg(value_name = "LESSON")]
    pub lesson: String,

    #[arg(value_name = "PROBLEM")]
    pub problem: String,

    #[command(flatten)]
    pub names: NameArgs,
}

#[derive(Debug, Args, Clone)]
pub struct OutlineArgs {
    #[arg(value_name = "COURSE")]
    pub course: String,
}

#[derive(Debug, Args, Default, Clone)]
pub struct NameArgs {
    /// Attribute to request, optionally with a default (`NAME` or `NAME=DEFAULT`).
    #[arg(long = "name", short = 'n', value_name = "NAME[=DEFAULT]")]
    pub names: Vec<AttributeSpec>,
}

impl NameArgs {
    pub fn to_request(&self) -> AttributeRequest {
        let mut request = AttributeRequest::new();
        for spec in &self.names {
            request.insert(spec.name.clone(), spec.default.clone());
        }
        request
    }
}

/// One `--name` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSpec {
    pub name: String,
    pub default: Option<String>,
}

impl FromStr for AttributeSpec {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (name, default) = match raw.split_once('=') {
            Some((name, default)) => (name, Some(default.to_string())),
            None => (raw, None),
        };
        if name.is_empty() {
            return Err(format!("attribute name missing in `{raw}`"));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(format!("`{name}` is not a valid attribute name"));
        }
        Ok(Self {
            name: name.to_string(),
            default,
        })
    }
}
