use std::path::Path;

use super::*;

#[test]
fn defaults_point_at_engine_docs() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.paths.src_dir, Path::new("../engine/docs/src"));
    assert_eq!(settings.paths.build_dir, Path::new("../engine/docs/build"));
    assert_eq!(settings.build.jobs.get(), 1);
    assert!(settings.build.sorted);
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.paths.src_dir = Some(PathBuf::from("from-file/src"));
    raw.logging.level = Some("info".to_string());

    let overrides = BuildOverrides {
        src_dir: Some(PathBuf::from("docs/src")),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.paths.src_dir, Path::new("docs/src"));
    assert_eq!(settings.paths.build_dir, Path::new(DEFAULT_BUILD_DIR));
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = BuildOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_jobs_is_rejected() {
    let mut raw = RawSettings::default();
    raw.build.jobs = Some(0);

    let err = Settings::from_raw(raw).expect_err("zero jobs must fail");
    assert!(matches!(err, LoadError::Invalid { key: "build.jobs", .. }));
}

#[test]
fn jobs_are_clamped() {
    let mut raw = RawSettings::default();
    raw.build.jobs = Some(500);

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.build.jobs.get(), MAX_JOBS);
}

#[test]
fn empty_build_dir_is_rejected() {
    let mut raw = RawSettings::default();
    raw.paths.build_dir = Some(PathBuf::new());

    let err = Settings::from_raw(raw).expect_err("empty path must fail");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "paths.build_dir",
            ..
        }
    ));
}

#[test]
fn invalid_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());

    let err = Settings::from_raw(raw).expect_err("bad level must fail");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "logging.level",
            ..
        }
    ));
}

#[test]
fn parse_path_arguments() {
    let args = CliArgs::parse_from([
        "docs-builder",
        "--src-dir",
        "docs/src",
        "--build-dir",
        "docs/build",
        "--jobs",
        "4",
        "--sorted",
        "false",
    ]);

    assert_eq!(args.overrides.src_dir.as_deref(), Some(Path::new("docs/src")));
    assert_eq!(
        args.overrides.build_dir.as_deref(),
        Some(Path::new("docs/build"))
    );
    assert_eq!(args.overrides.jobs, Some(4));
    assert_eq!(args.overrides.sorted, Some(false));
}

#[test]
fn no_arguments_leave_overrides_empty() {
    let args = CliArgs::parse_from(["docs-builder"]);

    assert!(args.overrides.src_dir.is_none());
    assert!(args.overrides.build_dir.is_none());
    assert!(args.config_file.is_none() || std::env::var_os("DOCS_BUILDER_CONFIG_FILE").is_some());
}
