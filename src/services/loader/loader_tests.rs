use super::*;

fn parse(yaml: &str) -> AppConfig {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn built_in_config_is_valid() {
    assert!(validate_config(&AppConfig::default()).is_ok());
}

#[test]
fn validate_rejects_inverted_range_and_bad_increment() {
    let cfg = parse(
        r#"
steppers:
  - { id: a, label: A, minimum: 5, maximum: 1 }
"#,
    );
    let err = validate_config(&cfg).unwrap_err().to_string();
    assert!(err.contains("minimum 5 is greater than maximum 1"), "{err}");

    let cfg = parse(
        r#"
steppers:
  - { id: a, label: A, increment: 0 }
"#,
    );
    let err = validate_config(&cfg).unwrap_err().to_string();
    assert!(err.contains("increment must be a positive number"), "{err}");
}

#[test]
fn validate_rejects_duplicates_colors_and_empty_list() {
    let dup = parse(
        r#"
steppers:
  - { id: a, label: A }
  - { id: a, label: B }
"#,
    );
    assert!(validate_config(&dup)
        .unwrap_err()
        .to_string()
        .contains("duplicate stepper id: a"));

    let color = parse(
        r#"
steppers:
  - { id: a, label: A, indicator: chartreuse-ish }
"#,
    );
    assert!(validate_config(&color)
        .unwrap_err()
        .to_string()
        .contains("unknown indicator color"));

    let empty = parse("steppers: []");
    assert!(validate_config(&empty).is_err());
}

#[test]
fn validate_rejects_clashing_separators() {
    let cfg = parse(
        r#"
steppers:
  - id: a
    label: A
    format: { grouping: true, grouping_separator: ".", decimal_separator: "." }
"#,
    );
    assert!(validate_config(&cfg)
        .unwrap_err()
        .to_string()
        .contains("separators must differ"));
}

#[test]
fn candidates_follow_priority_order() {
    let cwd = Path::new("/work");
    let home = Path::new("/home/u");
    let c = config_candidates(cwd, Some(home));
    assert_eq!(
        c,
        vec![
            PathBuf::from("/work/stepper.yaml"),
            PathBuf::from("/work/.tui/stepper.yaml"),
            PathBuf::from("/home/u/.tui/stepper.yaml"),
        ]
    );
    assert_eq!(config_candidates(cwd, None).len(), 2);
}

#[test]
fn load_from_path_reports_context() {
    let missing = Path::new("/definitely/not/here/stepper.yaml");
    let err = load_config_from_path(missing).unwrap_err();
    assert!(format!("{err:#}").contains("reading config"));

    let dir = std::env::temp_dir().join(format!("stepper-tui-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("stepper.yaml");
    std::fs::write(
        &path,
        "title: Mixer\nsteppers:\n  - { id: v, label: Volume, minimum: 0, maximum: 11 }\n",
    )
    .unwrap();
    let cfg = load_config_from_path(&path).unwrap();
    assert_eq!(cfg.title, "Mixer");
    assert_eq!(cfg.steppers[0].maximum, Some(11.0));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn bundled_demo_config_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join(CONFIG_FILE);
    let cfg = load_config_from_path(&path).unwrap();
    assert_eq!(cfg.title, "Mixer");
    let budget = cfg.steppers.iter().find(|s| s.id == "budget").unwrap();
    assert_eq!(budget.format.decimal_separator, ',');
    assert_eq!(budget.format.parse("1.250,5"), Some(1250.5));
    assert!(!cfg.steppers[3].enabled);
}
