//! Gerrit API CLI binary.
//!
//! A command-line interface for reading data from a Gerrit server.

use std::path::Path;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use gerritapi::cli::{Cli, Command};
use gerritapi::output::{export_csv, PrettyPrint};
use gerritapi::{
    get_active_accounts, get_active_projects, get_changes_in_period, get_projects,
    get_resolved_changes, AccountDetail, ChangeQuery, Collected, GerritClient, GerritConfig, Get,
    ProjectInfo, Record,
};
use serde::Serialize;
use tabled::{Table, Tabled};
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let mut config = GerritConfig::new(cli.server.clone())
        .with_verify_tls(cli.verify_tls)
        .with_max_pages(cli.max_pages);
    if let (Some(user), Some(password)) = (cli.user.as_deref(), cli.password.as_deref()) {
        config = config.with_credentials(user, password);
    }

    let client = match GerritClient::new(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Pass the Gerrit server name with -s or set GERRIT_SERVER");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &GerritClient, cli: Cli) -> gerritapi::Result<()> {
    match cli.command {
        Command::Changes { duration, output } => {
            let changes = get_changes_in_period(client, &duration, Utc::now()).await?;
            println!("Gerrit commits for given {duration} is: {}\n", changes.items.len());
            export(&changes, &output)
        }
        Command::RepoChanges { repo, output } => {
            let changes = get_resolved_changes(client, &ChangeQuery::Repo(repo.clone())).await;
            println!("Gerrit commits for repository {repo} is: {}\n", changes.items.len());
            export(&changes, &output)
        }
        Command::Projects { active } => {
            if active {
                let names = get_active_projects(client).await;
                report_warnings(&names);
                output_list(&names.items, cli.json, |name| NameRow { name: name.clone() })
            } else {
                let projects = get_projects(client).await;
                report_warnings(&projects);
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&projects.items)?);
                    return Ok(());
                }
                let rows: Vec<ProjectRow> = projects
                    .items
                    .iter()
                    .map(|(name, p)| ProjectRow::new(name, p))
                    .collect();
                println!("{}", Table::new(rows));
                Ok(())
            }
        }
        Command::Project { name } => {
            let project = ProjectInfo::get(client, name).await?;
            output_single(&project, cli.json)
        }
        Command::Accounts => {
            let accounts = get_active_accounts(client).await;
            report_warnings(&accounts);
            output_list(&accounts.items, cli.json, |a| AccountRow::from(a))
        }
    }
}

fn export(changes: &Collected<Vec<Record>>, path: &Path) -> gerritapi::Result<()> {
    export_csv(path, &changes.items)?;
    println!("Gerrit Commits Details are saved in {} file", path.display());
    report_warnings(changes);
    Ok(())
}

fn report_warnings<T>(collected: &Collected<T>) {
    if !collected.is_complete() {
        eprintln!(
            "Warning: {} request(s) failed; results may be incomplete",
            collected.warnings.len()
        );
    }
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> gerritapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_list<T, R, F>(items: &[T], json: bool, to_row: F) -> gerritapi::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} total", items.len());
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct NameRow {
    name: String,
}

#[derive(Tabled)]
struct ProjectRow {
    name: String,
    state: String,
    description: String,
}

impl ProjectRow {
    fn new(name: &str, p: &ProjectInfo) -> Self {
        Self {
            name: name.to_string(),
            state: p.state.map(|s| format!("{s:?}")).unwrap_or_default(),
            description: p.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct AccountRow {
    id: u64,
    name: String,
    username: String,
    email: String,
}

impl From<&AccountDetail> for AccountRow {
    fn from(a: &AccountDetail) -> Self {
        Self {
            id: a.account_id,
            name: a.name.clone().unwrap_or_default(),
            username: a.username.clone().unwrap_or_default(),
            email: a.email.clone().unwrap_or_default(),
        }
    }
}
