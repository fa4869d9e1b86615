use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

fn migrate_args(args: &[&str]) -> MigrateArgs {
    let mut argv = vec!["chm", "migrate"];
    argv.extend_from_slice(args);
    match Cli::try_parse_from(argv).unwrap().command {
        Commands::Migrate(args) => args,
        other => panic!("expected migrate, got {other:?}"),
    }
}

#[test]
fn test_multi_statement_pair() {
    assert!(migrate_args(&[]).multi_statement());
    assert!(migrate_args(&["--multi-statement"]).multi_statement());
    assert!(!migrate_args(&["--no-multi-statement"]).multi_statement());
    assert!(migrate_args(&["--no-multi-statement", "--multi-statement"]).multi_statement());
    assert!(!migrate_args(&["--multi-statement", "--no-multi-statement"]).multi_statement());
}

#[test]
fn test_fake_and_dry_run_pairs() {
    let args = migrate_args(&[]);
    assert!(!args.fake());
    assert!(!args.dry_run());

    assert!(migrate_args(&["--fake"]).fake());
    assert!(!migrate_args(&["--no-fake"]).fake());
    assert!(migrate_args(&["--dry-run"]).dry_run());
    assert!(!migrate_args(&["--dry-run", "--no-dry-run"]).dry_run());
    assert!(migrate_args(&["--dry-run=yes"]).dry_run());
    assert!(!migrate_args(&["--dry-run=no"]).dry_run());
}

#[test]
fn test_create_db_if_not_exists_pair() {
    assert!(migrate_args(&[]).create_db_if_not_exists());
    assert!(migrate_args(&["--create-db-if-not-exists"]).create_db_if_not_exists());
    assert!(!migrate_args(&["--no-create-db-if-not-exists"]).create_db_if_not_exists());
}

#[test]
fn test_explicit_migrations() {
    let args = migrate_args(&["--migrations", "001_init", "002_test2"]);
    assert_eq!(args.migrations, vec!["001_init", "002_test2"]);

    let args = migrate_args(&["--migrations", "001_init,3"]);
    assert_eq!(args.migrations, vec!["001_init", "3"]);
}

#[test]
fn test_global_args_after_subcommand() {
    let cli = Cli::try_parse_from([
        "chm",
        "migrate",
        "--db-name",
        "pytest",
        "--cluster-name",
        "company_cluster",
        "--secure",
    ])
    .unwrap();
    assert_eq!(cli.global.db_name.as_deref(), Some("pytest"));
    assert!(cli.global.secure());
    match cli.command {
        Commands::Migrate(args) => {
            assert_eq!(args.cluster_name.as_deref(), Some("company_cluster"))
        }
        other => panic!("expected migrate, got {other:?}"),
    }
}

#[test]
fn test_parse_flag() {
    for truthy in ["1", "true", "TRUE", "yes", "Y"] {
        assert_eq!(parse_flag(truthy), Ok(true));
    }
    for falsy in ["0", "false", "no", "", "maybe"] {
        assert_eq!(parse_flag(falsy), Ok(false));
    }
}

#[test]
fn test_valid_log_levels_any_case() {
    assert_eq!(parse_log_level("WARNING"), Ok(LevelFilter::Warn));
    assert_eq!(parse_log_level("warn"), Ok(LevelFilter::Warn));
    assert_eq!(parse_log_level("InFo"), Ok(LevelFilter::Info));
    assert_eq!(parse_log_level("dEbUg"), Ok(LevelFilter::Debug));
    assert_eq!(parse_log_level("CRITICAL"), Ok(LevelFilter::Error));
    assert_eq!(parse_log_level("trace"), Ok(LevelFilter::Trace));
}

#[test]
fn test_invalid_log_levels() {
    for bad in ["", " ", "FOO", " WARNINGG", "WARNIN", "WARN ", " WARN"] {
        assert!(parse_log_level(bad).is_err(), "accepted {bad:?}");
    }
}

#[test]
fn test_applied_output() {
    let cli = Cli::try_parse_from(["chm", "applied", "--output", "json"]).unwrap();
    match cli.command {
        Commands::Applied(args) => assert_eq!(args.output, AppliedOutput::Json),
        other => panic!("expected applied, got {other:?}"),
    }
}
