use std::path::PathBuf;

use gitmd::config::{ConfigFlags, ThemeMode, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".gitmdrc");
    let content = r#"
# comment
--ephemeral

--theme light
   
--log-file=gitmd.log
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.ephemeral);
    assert_eq!(flags.theme, Some(ThemeMode::Light));
    assert_eq!(flags.log_file, Some(PathBuf::from("gitmd.log")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".gitmdrc");
    let content = "--ephemeral\n--theme light\n--output file.html\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "gitmd".to_string(),
        "--theme".to_string(),
        "dark".to_string(),
        "--frame-ms".to_string(),
        "40".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.ephemeral, "file flags should remain enabled");
    assert_eq!(effective.frame_ms(), 40, "cli flags should be applied");
    assert_eq!(effective.theme, Some(ThemeMode::Dark), "cli should override theme");
    assert_eq!(
        effective.output,
        Some(PathBuf::from("file.html")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "gitmd".to_string(),
        "--theme=dark".to_string(),
        "--store=snap.json".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.theme, Some(ThemeMode::Dark));
    assert_eq!(flags.store, Some(PathBuf::from("snap.json")));
}

#[test]
fn test_local_overrides_global() {
    let global = ConfigFlags {
        theme: Some(ThemeMode::Light),
        store: Some(PathBuf::from("global.json")),
        ..ConfigFlags::default()
    };
    let local = ConfigFlags {
        store: Some(PathBuf::from("local.json")),
        ..ConfigFlags::default()
    };
    let merged = global.union(&local);
    assert_eq!(merged.theme, Some(ThemeMode::Light));
    assert_eq!(merged.store_path(), PathBuf::from("local.json"));
}
