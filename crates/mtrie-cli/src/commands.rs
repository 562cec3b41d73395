use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use mtrie_diff::diff_worktree;
use mtrie_fs::{write_tree, FsOptions};
use mtrie_noder::{Action, Changes};
use mtrie_object::{ObjectTree, TreeOptions};
use mtrie_store::{InMemoryObjectStore, ObjectStore};
use mtrie_types::ObjectHash;
use serde::Serialize;

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let fs = CliConfig::resolve(&cli)?;
    match &cli.command {
        Command::Diff(args) => cmd_diff(args, &fs, cli.format),
        Command::LsTree(args) => cmd_ls_tree(args, &fs, cli.format),
        Command::Hash(args) => cmd_hash(args, &fs, cli.format),
    }
}

fn import(dir: &Path, fs: &FsOptions) -> anyhow::Result<(Arc<dyn ObjectStore>, ObjectHash)> {
    let store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());
    let id = write_tree(store.as_ref(), dir, fs)
        .with_context(|| format!("importing {}", dir.display()))?;
    Ok((store, id))
}

#[derive(Serialize)]
struct ChangeRecord<'a> {
    action: String,
    path: &'a str,
}

fn cmd_diff(args: &DiffArgs, fs: &FsOptions, format: OutputFormat) -> anyhow::Result<()> {
    let (store, old) = import(&args.old, fs)?;
    let changes = diff_worktree(&store, old, &args.new, fs, &TreeOptions::default())
        .with_context(|| format!("comparing with {}", args.new.display()))?;

    match format {
        OutputFormat::Json => {
            let records: Vec<ChangeRecord<'_>> = changes
                .iter()
                .map(|c| ChangeRecord {
                    action: c.action.to_string().to_lowercase(),
                    path: &c.path,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Text => print_changes(&changes),
    }
    Ok(())
}

fn print_changes(changes: &Changes) {
    if changes.is_empty() {
        println!("No changes.");
        return;
    }
    for change in changes {
        let tag = match change.action {
            Action::Insert => "A".green().bold(),
            Action::Delete => "D".red().bold(),
            Action::Modify => "M".yellow().bold(),
        };
        println!("{tag} {}", change.path);
    }
    let count = |a: Action| changes.iter().filter(|c| c.action == a).count();
    println!(
        "\n{} inserted, {} deleted, {} modified",
        count(Action::Insert).to_string().green(),
        count(Action::Delete).to_string().red(),
        count(Action::Modify).to_string().yellow(),
    );
}

#[derive(Serialize)]
struct EntryRecord {
    mode: String,
    hash: String,
    path: String,
}

fn cmd_ls_tree(args: &LsTreeArgs, fs: &FsOptions, format: OutputFormat) -> anyhow::Result<()> {
    let (store, id) = import(&args.dir, fs)?;
    let opts = TreeOptions::default()
        .recursive(!args.no_recursive)
        .cycle_protection(args.cycle_protection);
    let caches = opts.session_caches();
    let tree = ObjectTree::load(&store, id, Some(&caches))?;

    let mut records = Vec::new();
    let mut walker = opts.pooled_walker(&caches, tree);
    while let Some((path, entry)) = walker.next_entry()? {
        records.push(EntryRecord {
            mode: entry.mode.to_string(),
            hash: entry.hash.to_hex(),
            path,
        });
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Text => {
            for r in &records {
                println!("{} {} {}", r.mode.dimmed(), r.hash.cyan(), r.path);
            }
        }
    }
    Ok(())
}

fn cmd_hash(args: &HashArgs, fs: &FsOptions, format: OutputFormat) -> anyhow::Result<()> {
    let (_, id) = import(&args.dir, fs)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "tree": id.to_hex() })),
        OutputFormat::Text => println!("{}", id.to_hex().yellow().bold()),
    }
    Ok(())
}
