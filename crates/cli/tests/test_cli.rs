//! Argument parsing and config resolution

use clap::Parser;
use textpro_cli::{load_config, Cli, Commands, OutputFormat};
use textpro_core::TextProConfig;

#[test]
fn test_parses_activate_with_key() {
    let cli = Cli::try_parse_from([
        "textpro",
        "activate",
        "38b1460a-5104-4067-a91d-77b872934d51",
    ])
    .unwrap();
    match cli.command {
        Commands::Activate { key } => assert_eq!(key, "38b1460a-5104-4067-a91d-77b872934d51"),
        _ => panic!("expected activate"),
    }
    assert!(cli.config.is_none());
}

#[test]
fn test_activate_requires_a_key() {
    assert!(Cli::try_parse_from(["textpro", "activate"]).is_err());
}

#[test]
fn test_status_defaults_to_terminal_format() {
    let cli = Cli::try_parse_from(["textpro", "status"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Status {
            format: OutputFormat::Terminal
        }
    ));

    let cli = Cli::try_parse_from(["textpro", "status", "--format", "json"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Status {
            format: OutputFormat::Json
        }
    ));
}

#[test]
fn test_run_takes_feature_and_optional_file() {
    let cli = Cli::try_parse_from(["textpro", "run", "wordCount"]).unwrap();
    match cli.command {
        Commands::Run { feature, file } => {
            assert_eq!(feature, "wordCount");
            assert!(file.is_none());
        }
        _ => panic!("expected run"),
    }

    let cli =
        Cli::try_parse_from(["textpro", "run", "toUpperCase", "--file", "notes.txt"]).unwrap();
    match cli.command {
        Commands::Run { file, .. } => {
            assert_eq!(file.unwrap().to_str(), Some("notes.txt"));
        }
        _ => panic!("expected run"),
    }
}

#[test]
fn test_config_flag_is_global() {
    let cli = Cli::try_parse_from(["textpro", "validate", "--config", "/tmp/x.toml"]).unwrap();
    assert!(matches!(cli.command, Commands::Validate));
    assert_eq!(cli.config.unwrap().to_str(), Some("/tmp/x.toml"));
}

#[test]
fn test_watch_accepts_interval() {
    let cli = Cli::try_parse_from(["textpro", "watch", "--interval", "250"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Watch {
            interval: Some(250)
        }
    ));
}

#[test]
fn test_watch_rejects_zero_interval() {
    assert!(Cli::try_parse_from(["textpro", "watch", "--interval", "0"]).is_err());
    assert!(Cli::try_parse_from(["textpro", "watch", "--interval", "1"]).is_ok());
}

#[test]
fn test_load_config_rejects_zero_tick_interval() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("zero.toml");
    std::fs::write(&path, "[timing]\ntick_interval_ms = 0\n").unwrap();
    assert!(load_config(Some(path.as_path())).is_err());
}

#[test]
fn test_unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["textpro", "review"]).is_err());
}

#[test]
fn test_load_config_reads_explicit_path() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("custom.toml");
    std::fs::write(
        &path,
        r#"
[timing]
environment = "development"

[instance]
name_prefix = "ci"
"#,
    )
    .unwrap();

    let config = load_config(Some(path.as_path())).unwrap();
    assert_eq!(config.instance.name_prefix, "ci");
    assert_eq!(config.timing.offline_limit().as_secs(), 30);
}

#[test]
fn test_load_config_reports_missing_explicit_file() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("absent.toml");
    let err = load_config(Some(missing.as_path())).unwrap_err();
    assert!(format!("{:#}", err).contains("absent.toml"));
}

#[test]
fn test_init_writes_default_config_once() {
    let tmp = tempfile::tempdir().unwrap();
    textpro_cli::commands::init::run(Some(tmp.path())).unwrap();

    let path = tmp.path().join(".textpro.toml");
    let written = TextProConfig::from_file(&path).unwrap();
    assert_eq!(written, TextProConfig::default());

    // Second run leaves the file alone
    std::fs::write(&path, "[instance]\nname_prefix = \"kept\"\n").unwrap();
    textpro_cli::commands::init::run(Some(tmp.path())).unwrap();
    let kept = TextProConfig::from_file(&path).unwrap();
    assert_eq!(kept.instance.name_prefix, "kept");
}
