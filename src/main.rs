use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod config;
mod gh;
mod git;
mod logging;
mod prompts;
mod ship;
mod shipit_io;
mod slug;
mod worktree;

use prompts::CodingAgent;

#[derive(Debug, Parser)]
#[command(name = "shipit")]
#[command(about = "Git/GitHub PR workflow automation")]
#[command(
    long_about = "Git/GitHub PR workflow automation.\n\n`shipit ship` turns the dirty working tree into a branch, commit, push, and PR in one step, deriving the branch name from the commit message. `shipit worktree` manages parallel-development worktrees named the same way."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Ship the working tree: branch, commit, push, open a PR
    Ship(ShipArgs),

    /// Print a branch name generated from the given text
    Branch(BranchArgs),

    /// Pull request helpers
    Pr(PrArgs),

    /// Manage parallel-development worktrees
    Worktree(WorktreeArgs),

    /// Write a starter .shipit/config.toml
    Init,
}

#[derive(Debug, Args)]
struct ShipArgs {
    /// Commit message (prompted for when omitted)
    #[arg(value_name = "message", num_args = 0..)]
    message: Vec<String>,

    /// Base branch for the PR (default: detected from origin/HEAD)
    #[arg(long)]
    base: Option<String>,

    /// Open the PR as a draft
    #[arg(long)]
    draft: bool,

    /// Poll until the PR merges, then clean up the local branch
    #[arg(long)]
    watch: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Append a random suffix to the branch name
    #[arg(long)]
    unique: bool,
}

#[derive(Debug, Args)]
struct BranchArgs {
    /// Text to derive the name from
    #[arg(value_name = "text", num_args = 1..)]
    text: Vec<String>,

    /// Print the short fragment (no timestamp) capped at N words
    #[arg(long, value_name = "N")]
    short: Option<usize>,

    /// Append a random suffix
    #[arg(long)]
    unique: bool,
}

#[derive(Debug, Args)]
struct PrArgs {
    #[command(subcommand)]
    command: PrCommand,
}

#[derive(Debug, Subcommand)]
enum PrCommand {
    /// Poll until the PR for a branch merges
    Watch(WatchArgs),
}

#[derive(Debug, Args)]
struct WatchArgs {
    /// Branch whose PR to watch (default: current branch)
    #[arg(long)]
    branch: Option<String>,

    /// Seconds between polls
    #[arg(long)]
    interval: Option<u64>,
}

#[derive(Debug, Args)]
struct WorktreeArgs {
    #[command(subcommand)]
    command: WorktreeCommand,
}

#[derive(Debug, Subcommand)]
enum WorktreeCommand {
    /// Create a worktree on a fresh branch and launch an agent in it
    New(WorktreeNewArgs),

    /// List managed worktrees
    List,

    /// Remove a worktree and its branch
    Rm(WorktreeRmArgs),
}

#[derive(Debug, Args)]
struct WorktreeNewArgs {
    /// What the worktree is for (prompted for when omitted)
    #[arg(value_name = "description", num_args = 0..)]
    description: Vec<String>,

    /// Coding agent to launch
    #[arg(long, value_enum)]
    agent: Option<CodingAgent>,

    /// Create the worktree without launching an agent
    #[arg(long)]
    no_agent: bool,

    /// Append a random suffix to the worktree name
    #[arg(long)]
    unique: bool,
}

#[derive(Debug, Args)]
struct WorktreeRmArgs {
    /// Worktree branch or directory name
    #[arg(value_name = "name")]
    name: String,

    /// Discard local changes in the worktree
    #[arg(long)]
    force: bool,
}

fn join_words(words: Vec<String>) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ship(args) => ship::run_ship(
            join_words(args.message),
            args.base,
            args.draft,
            args.watch,
            args.yes,
            args.unique,
        ),
        Commands::Branch(args) => {
            let text = args.text.join(" ");
            let name = match args.short {
                Some(max_words) => slug::short_name(&text, max_words),
                None => slug::generate_branch_name(&text),
            };
            let name = if args.unique {
                slug::with_unique_suffix(&name)
            } else {
                name
            };
            println!("{name}");
            Ok(())
        }
        Commands::Pr(args) => match args.command {
            PrCommand::Watch(args) => ship::run_watch(args.branch, args.interval),
        },
        Commands::Worktree(args) => match args.command {
            WorktreeCommand::New(args) => worktree::run_new(
                join_words(args.description),
                args.agent,
                args.no_agent,
                args.unique,
            ),
            WorktreeCommand::List => worktree::run_list(),
            WorktreeCommand::Rm(args) => worktree::run_rm(&args.name, args.force),
        },
        Commands::Init => {
            let git_root = git::git_root()?;
            let path = config::write_template(&git_root)?;
            println!("wrote {}", path.display());
            Ok(())
        }
    }
}
