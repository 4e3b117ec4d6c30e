#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use values_sort::cards::Catalog;
use values_sort::core::{EngineConfig, DEFAULT_MAX_TOP_GROUPS};
use values_sort::deck::Decision;
use values_sort::engine::SessionEngine;
use values_sort::grouping::is_placeholder_name;
use values_sort::persistence::{FileStore, SessionStore};
use values_sort::summary::{can_continue, format_as_text, suggests_bigger_groups, Step};

#[derive(Debug, Parser)]
#[command(name = "values-sort", version, about = "Sort, group and prioritize your personal values")]
struct Cli {
    /// Session file (defaults to the platform data directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Maximum number of groups that can be marked top
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_TOP_GROUPS)]
    max_top: usize,

    /// Seed for generated group and card ids
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show progress through the four steps
    Status,
    /// Keep the current card
    Select,
    /// Skip the current card
    Discard,
    /// Add a custom value card (kept immediately)
    Add { label: String },
    /// Manage groups
    #[command(subcommand)]
    Group(GroupCommand),
    /// Toggle a group's top mark
    Top { group: String },
    /// Write the session as JSON to a file, or stdout
    Export { file: Option<PathBuf> },
    /// Replace the session with an exported file
    Import { file: PathBuf },
    /// Start over
    Reset,
    /// Print the plain-text result summary
    Summary,
}

#[derive(Debug, Subcommand)]
enum GroupCommand {
    /// Create an empty group
    Add,
    /// Rename a group
    Rename { id: String, name: String },
    /// Remove a group, unassigning its cards
    Remove { id: String },
    /// Move a card into a group, or back to unassigned without one
    Move { card: String, group: Option<String> },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn print_status(engine: &SessionEngine<FileStore>) {
    let state = engine.state();

    println!("Step {} - Select", Step::Select.number());
    match engine.current_card() {
        Some(card) => println!("  current: {} ({})", card.label, card.id),
        None => println!("  all cards decided"),
    }
    println!(
        "  {} remaining, {} kept, {} skipped",
        engine.remaining_count(),
        state.selected_card_ids.len(),
        state.discarded_card_ids.len()
    );

    println!("Step {} - Group", Step::Group.number());
    for group in &state.groups {
        let name = if is_placeholder_name(&group.name) {
            format!("{} (unnamed)", group.name)
        } else {
            group.name.clone()
        };
        let top = if state.is_top(&group.id) { " *" } else { "" };
        println!("  [{}] {}{}: {} card(s)", group.id, name, top, group.len());
    }
    let unassigned = engine.unassigned_card_ids();
    if !unassigned.is_empty() {
        println!("  unassigned: {}", unassigned.join(", "));
    }
    if suggests_bigger_groups(state) {
        println!("  hint: several groups hold a single card; consider merging them");
    }

    println!("Step {} - Prioritize", Step::Prioritize.number());
    println!(
        "  {} of {} top groups marked",
        engine.top_groups().len(),
        engine.config().max_top_groups
    );

    for step in [Step::Select, Step::Group, Step::Prioritize] {
        if !can_continue(step, state) {
            println!("Next: finish step {}", step.number());
            return;
        }
    }
    println!("Step {} - Result: run `values-sort summary`", Step::Result.number());
}

fn decide(engine: &mut SessionEngine<FileStore>, decision: Decision) {
    let Some(card) = engine.current_card() else {
        println!("All cards decided.");
        return;
    };
    match decision {
        Decision::Select => {
            engine.select_current();
            println!("Kept {}", card.label);
        }
        Decision::Discard => {
            engine.discard_current();
            println!("Skipped {}", card.label);
        }
    }
    match engine.current_card() {
        Some(next) => println!("Next: {}", next.label),
        None => println!("All cards decided."),
    }
}

fn toggle_top<S: SessionStore>(engine: &mut SessionEngine<S>, group_id: &str) -> Result<()> {
    let was_top = engine.state().is_top(group_id);
    // Stale marks of removed groups can still be cleared
    if !was_top && engine.state().group(group_id).is_none() {
        bail!("no group with id {group_id}");
    }
    let now_top = engine.toggle_top(group_id).is_top(group_id);
    if !was_top && !now_top {
        bail!("at most {} groups can be marked top", engine.config().max_top_groups);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let store = cli.store.map_or_else(FileStore::default, FileStore::new);
    info!(path = %store.path().display(), "using session store");

    let mut config = EngineConfig::default().with_max_top_groups(cli.max_top);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let mut engine = SessionEngine::open(Catalog::builtin().clone(), config, store);

    match cli.command {
        Command::Status => print_status(&engine),
        Command::Select => decide(&mut engine, Decision::Select),
        Command::Discard => decide(&mut engine, Decision::Discard),
        Command::Add { label } => match engine.add_custom_card(&label) {
            Some(card) => println!("Added {} ({})", card.label, card.id),
            None => bail!("card label must not be empty"),
        },
        Command::Group(GroupCommand::Add) => {
            let id = engine.add_group();
            println!("{id}");
        }
        Command::Group(GroupCommand::Rename { id, name }) => {
            if engine.state().group(&id).is_none() {
                bail!("no group with id {id}");
            }
            engine.rename_group(&id, &name);
        }
        Command::Group(GroupCommand::Remove { id }) => {
            engine.remove_group(&id);
        }
        Command::Group(GroupCommand::Move { card, group }) => {
            if !engine.state().is_selected(&card) {
                bail!("card {card} has not been kept");
            }
            engine.move_card(&card, group.as_deref());
        }
        Command::Top { group } => toggle_top(&mut engine, &group)?,
        Command::Export { file } => {
            let json = engine.export_json().context("could not serialize session")?;
            match file {
                Some(path) => fs::write(&path, json)
                    .with_context(|| format!("could not write {}", path.display()))?,
                None => println!("{json}"),
            }
        }
        Command::Import { file } => {
            let json = fs::read_to_string(&file)
                .with_context(|| format!("could not read {}", file.display()))?;
            if engine.import_json(&json).is_none() {
                bail!("{} is not a compatible session file", file.display());
            }
            println!("Imported {}", file.display());
        }
        Command::Reset => {
            engine.reset();
            println!("Session reset.");
        }
        Command::Summary => println!("{}", format_as_text(engine.catalog(), engine.state())),
    }

    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    run(Cli::parse())
}
