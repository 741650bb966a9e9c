use spotscan::config::MAX_BLUR_RADIUS;
use spotscan::{AnalyzerConfig, PathsConfig, Settings, SpotscanError};
use std::path::PathBuf;

#[test]
fn test_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.analyzer.blur_radius, 2);
    assert_eq!(settings.analyzer.threshold, 150);
    assert_eq!(settings.analyzer.min_area, 10.0);
    assert_eq!(settings.paths.images_dir, PathBuf::from("images"));
    assert_eq!(settings.paths.visual_dir, PathBuf::from("results").join("visual"));
    assert_eq!(settings.paths.plots_dir, PathBuf::from("results").join("plots"));
    assert_eq!(
        settings.paths.csv_path(),
        PathBuf::from("results").join("analysis_results.csv")
    );
    assert!(settings.validate().is_ok());
}

#[test]
fn test_blur_sigma_from_kernel_size() {
    let sigma = AnalyzerConfig::default().blur_sigma().unwrap();
    assert!((sigma - 1.1).abs() < 1e-6);

    let off = AnalyzerConfig {
        blur_radius: 0,
        ..AnalyzerConfig::default()
    };
    assert_eq!(off.blur_sigma(), None);
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let settings = Settings::from_toml_str(
        r#"
        workers = 3

        [analyzer]
        threshold = 200

        [paths]
        images_dir = "frames"
        "#,
    )
    .unwrap();

    assert_eq!(settings.workers, Some(3));
    assert_eq!(settings.worker_count(), 3);
    assert_eq!(settings.analyzer.threshold, 200);
    assert_eq!(settings.analyzer.min_area, 10.0);
    assert_eq!(settings.paths.images_dir, PathBuf::from("frames"));
    assert_eq!(settings.paths.results_dir, PathBuf::from("results"));
}

#[test]
fn test_load_from_file() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("spotscan.toml");
    std::fs::write(&path, "[analyzer]\nmin_area = 25.0\nblur_radius = 0\n")?;

    let settings = Settings::load(&path)?;
    assert_eq!(settings.analyzer.min_area, 25.0);
    assert_eq!(settings.analyzer.blur_radius, 0);

    Ok(())
}

#[test]
fn test_load_errors() {
    let dir = tempfile::TempDir::new().unwrap();

    let missing = Settings::load(dir.path().join("missing.toml"));
    assert!(matches!(missing, Err(SpotscanError::ConfigRead { .. })));

    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "[analyzer]\nthreshold = 999\n").unwrap();
    assert!(matches!(Settings::load(&bad), Err(SpotscanError::ConfigParse { .. })));

    let huge = dir.path().join("huge.toml");
    std::fs::write(&huge, "[analyzer]\nblur_radius = 4294967295\n").unwrap();
    assert!(matches!(Settings::load(&huge), Err(SpotscanError::InvalidConfig(_))));
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut settings = Settings::default();
    settings.analyzer.min_area = -1.0;
    assert!(matches!(settings.validate(), Err(SpotscanError::InvalidConfig(_))));

    settings.analyzer.min_area = f64::NAN;
    assert!(settings.validate().is_err());

    let settings = Settings {
        workers: Some(0),
        ..Settings::default()
    };
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.analyzer.blur_radius = MAX_BLUR_RADIUS;
    assert!(settings.validate().is_ok());
    settings.analyzer.blur_radius = MAX_BLUR_RADIUS + 1;
    assert!(matches!(settings.validate(), Err(SpotscanError::InvalidConfig(_))));
}

#[test]
fn test_blur_sigma_for_largest_radius() {
    let config = AnalyzerConfig {
        blur_radius: u32::MAX,
        ..AnalyzerConfig::default()
    };
    let sigma = config.blur_sigma().unwrap();
    assert!(sigma.is_finite() && sigma > 0.0);
}

#[test]
fn test_results_dir_override() {
    let paths = PathsConfig::default().with_results_dir(PathBuf::from("out"));
    assert_eq!(paths.results_dir, PathBuf::from("out"));
    assert_eq!(paths.visual_dir, PathBuf::from("out").join("visual"));
    assert_eq!(paths.plots_dir, PathBuf::from("out").join("plots"));
}
