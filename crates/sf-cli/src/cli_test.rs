use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_run_defaults() {
    let cli = Cli::try_parse_from(["sf", "run"]).unwrap();
    assert_eq!(cli.global.project_dir, ".");
    assert!(!cli.global.verbose);
    match cli.command {
        Commands::Run(args) => {
            assert!(args.jobs.is_none());
            assert_eq!(args.output, OutputFormat::Text);
            assert!(!args.fail_fast);
        }
        other => panic!("expected run, got {:?}", other),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "sf", "run", "-j", "orders,customers", "-o", "json", "-v", "-p", "proj", "-t", "prod",
    ])
    .unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.project_dir, "proj");
    assert_eq!(cli.global.target.as_deref(), Some("prod"));
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.jobs.as_deref(), Some("orders,customers"));
            assert_eq!(args.output, OutputFormat::Json);
        }
        other => panic!("expected run, got {:?}", other),
    }
}

#[test]
fn test_clean_dry_run() {
    let cli = Cli::try_parse_from(["sf", "clean", "--dry-run"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Clean(CleanArgs { dry_run: true, .. })
    ));
}

#[test]
fn test_ls_rejects_unknown_format() {
    assert!(Cli::try_parse_from(["sf", "ls", "-o", "tree"]).is_err());
}
