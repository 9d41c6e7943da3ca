//! CLI argument parsing tests.

use std::path::PathBuf;

use clap::Parser;
use gerritapi::cli::{Cli, Command};
use gerritapi::DEFAULT_MAX_PAGES;

#[test]
fn test_cli_parses_changes_defaults() {
    let cli = Cli::parse_from(["gerritapi", "-s", "gerrit.example.com", "changes"]);

    assert_eq!(cli.server, "gerrit.example.com");
    assert!(cli.user.is_none());
    assert!(!cli.verify_tls);
    assert_eq!(cli.max_pages, DEFAULT_MAX_PAGES);
    match cli.command {
        Command::Changes { duration, output } => {
            assert_eq!(duration, "24Hours");
            assert_eq!(output, PathBuf::from("new_commits.csv"));
        }
        _ => panic!("Expected Changes command"),
    }
}

#[test]
fn test_cli_parses_credentials_and_duration() {
    let cli = Cli::parse_from([
        "gerritapi",
        "-s",
        "gerrit.example.com",
        "-u",
        "jane",
        "-p",
        "secret",
        "changes",
        "-d",
        "2Days",
        "-o",
        "out.csv",
    ]);

    assert_eq!(cli.user.as_deref(), Some("jane"));
    assert_eq!(cli.password.as_deref(), Some("secret"));
    match cli.command {
        Command::Changes { duration, output } => {
            assert_eq!(duration, "2Days");
            assert_eq!(output, PathBuf::from("out.csv"));
        }
        _ => panic!("Expected Changes command"),
    }
}

#[test]
fn test_cli_parses_global_flags_after_subcommand() {
    let cli = Cli::parse_from([
        "gerritapi",
        "--servername",
        "gerrit.example.com",
        "projects",
        "--active",
        "--json",
        "--max-pages",
        "3",
    ]);

    assert!(cli.json);
    assert_eq!(cli.max_pages, 3);
    assert!(matches!(cli.command, Command::Projects { active: true }));
}

#[test]
fn test_cli_parses_repo_changes() {
    let cli = Cli::parse_from(["gerritapi", "-s", "g", "repo-changes", "platform/build"]);

    match cli.command {
        Command::RepoChanges { repo, .. } => assert_eq!(repo, "platform/build"),
        _ => panic!("Expected RepoChanges command"),
    }
}

#[test]
fn test_cli_parses_accounts() {
    let cli = Cli::parse_from(["gerritapi", "-s", "g", "accounts"]);
    assert!(matches!(cli.command, Command::Accounts));
}
