use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.content.root = Some(PathBuf::from("/srv/file-root"));
    raw.logging.level = Some("info".to_string());

    let overrides = GlobalOverrides {
        content_root: Some(PathBuf::from("/srv/override")),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.content.root, PathBuf::from("/srv/override"));
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn cache_defaults_match_staleness_window() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert_eq!(settings.cache.check_interval_ms, 5000);
    assert_eq!(settings.cache.inline_value_limit, 120);
    assert_eq!(settings.cache.capacity, 4096);
    assert_eq!(settings.content.root, PathBuf::from("content"));
}

#[test]
fn resolved_cache_settings_match_cache_defaults() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    let resolved = crate::cache::CacheConfig::from(&settings.cache);
    let defaults = crate::cache::CacheConfig::default();
    assert_eq!(resolved.check_interval_ms, defaults.check_interval_ms);
    assert_eq!(resolved.inline_value_limit, defaults.inline_value_limit);
    assert_eq!(resolved.capacity, defaults.capacity);
}

#[test]
fn zero_check_interval_is_rejected() {
    let mut raw = RawSettings::default();
    raw.cache.check_interval_ms = Some(0);
    let err = Settings::from_raw(raw).expect_err("zero interval must fail");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "cache.check_interval_ms",
            ..
        }
    ));
}

#[test]
fn unknown_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = GlobalOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn parse_attrs_arguments() {
    let args = CliArgs::parse_from([
        "hydra",
        "attrs",
        "cs1",
        "index.hy",
        "--name",
        "course",
        "--name",
        "expires=never",
        "--content-root",
        "/srv/content",
    ]);

    assert_eq!(
        args.overrides.content_root.as_deref(),
        Some(std::path::Path::new("/srv/content"))
    );
    match args.command {
        Command::Attrs(attrs) => {
            assert_eq!(attrs.segments, vec!["cs1", "index.hy"]);
            let request = attrs.names.to_request();
            let names: Vec<_> = request.iter().collect();
            assert_eq!(names, vec![("course", None), ("expires", Some("never"))]);
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_problem_arguments() {
    let args = CliArgs::parse_from(["hydra", "problem", "cs1", "intro", "hello", "-n", "html"]);

    match args.command {
        Command::Problem(problem) => {
            assert_eq!(problem.course, "cs1");
            assert_eq!(problem.lesson, "intro");
            assert_eq!(problem.problem, "hello");
            assert_eq!(problem.names.names.len(), 1);
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_outline_with_global_flags() {
    let args = CliArgs::parse_from(["hydra", "--log-json", "true", "outline", "cs1"]);
    assert_eq!(args.overrides.log_json, Some(true));
    assert!(matches!(args.command, Command::Outline(ref outline) if outline.course == "cs1"));
}

#[test]
fn attribute_spec_parsing() {
    assert_eq!(
        "lessons=".parse::<AttributeSpec>().expect("valid spec"),
        AttributeSpec {
            name: "lessons".to_string(),
            default: Some(String::new()),
        }
    );
    assert!("=x".parse::<AttributeSpec>().is_err());
    assert!("bad-name".parse::<AttributeSpec>().is_err());
}
