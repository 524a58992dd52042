//! prcraft - CLI entry point.

use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use prcraft::commit::{suggest_commit, suggest_from_repo};
use prcraft::git::{
    ChangeSet, DEFAULT_BASE_BRANCH, GitRepo, StagedDiff, parse_commit_blocks, split_messages,
};
use prcraft::issues::{IssueRefs, extract_issues, issues_since};
use prcraft::pr::{describe_branch, generate_description};

/// Derive issue references, commit messages, and PR descriptions from git history.
#[derive(Parser, Debug)]
#[command(name = "prcraft")]
#[command(about = "Derive issue references, commit messages, and PR descriptions from git history")]
#[command(version)]
struct Cli {
    /// Branch to compare the current branch against
    #[arg(long, global = true, env = "PRCRAFT_BASE_BRANCH", default_value = DEFAULT_BASE_BRANCH)]
    base: String,

    /// Path inside the git repository
    #[arg(long, global = true, env = "PRCRAFT_REPO", default_value = ".")]
    repo: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract closed and referenced issue numbers as JSON
    ///
    /// Scans the given message, piped stdin, or the branch's commits, in that order.
    Issues {
        /// Message to scan instead of git history
        message: Vec<String>,
    },

    /// Suggest a conventional commit message for staged changes as JSON
    ///
    /// A unified diff piped on stdin is used instead of the index.
    CommitMessage,

    /// Generate a pull request description
    ///
    /// Raw log text piped on stdin is used instead of the branch's commits.
    PrDescription {
        /// Issue references as JSON, e.g. '{"closes": [1], "references": [2]}'
        #[arg(long)]
        issues: Option<String>,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only results
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    debug!(?cli, "Parsed arguments");

    match &cli.command {
        Command::Issues { message } => run_issues(&cli, message),
        Command::CommitMessage => run_commit_message(&cli),
        Command::PrDescription { issues } => run_pr_description(&cli, issues.as_deref()),
    }
}

fn run_issues(cli: &Cli, message: &[String]) -> Result<()> {
    let refs = if !message.is_empty() {
        extract_issues(&[message.join(" ")])
    } else if let Some(input) = read_piped_stdin()? {
        extract_issues(&split_messages(&input))
    } else {
        match GitRepo::open(&cli.repo) {
            Ok(repo) => issues_since(&repo, &cli.base),
            Err(e) => {
                warn!("{e}. Reporting no issues.");
                IssueRefs::default()
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&refs)?);
    Ok(())
}

fn run_commit_message(cli: &Cli) -> Result<()> {
    let suggestion = if let Some(diff) = read_piped_stdin()? {
        suggest_commit(&StagedDiff::from_unified_diff(&diff))?
    } else {
        let repo = open_repo(cli)?;
        suggest_from_repo(&repo)?
    };

    println!("{}", serde_json::to_string_pretty(&suggestion)?);
    Ok(())
}

fn run_pr_description(cli: &Cli, issues_json: Option<&str>) -> Result<()> {
    let issues = issues_json
        .map(IssueRefs::from_json)
        .transpose()
        .context("Could not read --issues")?;

    let description = if let Some(log) = read_piped_stdin()? {
        let commits = parse_commit_blocks(&log);
        let issues = issues.unwrap_or_else(|| {
            let messages: Vec<String> = commits.iter().map(|c| c.message()).collect();
            extract_issues(&messages)
        });
        generate_description(&commits, &ChangeSet::default(), &issues)?
    } else {
        let repo = open_repo(cli)?;
        describe_branch(&repo, &cli.base, issues)?
    };

    println!("{description}");
    Ok(())
}

fn open_repo(cli: &Cli) -> Result<GitRepo> {
    GitRepo::open(&cli.repo)
        .context("Not a git repository. Run prcraft from within a git repository.")
}

/// Read stdin when it is piped and non-empty.
fn read_piped_stdin() -> Result<Option<String>> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut input = String::new();
    stdin
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;

    Ok((!input.trim().is_empty()).then_some(input))
}
