use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mtrie",
    about = "Structural comparison of directories and content-addressed trees",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with filesystem options
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Extra entry names to skip, in addition to the configured ones
    #[arg(long = "ignore", global = true)]
    pub ignore: Vec<String>,

    /// Drop entries that disappear while being read
    #[arg(long, global = true)]
    pub tolerate_vanished: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show changes between two directories
    Diff(DiffArgs),
    /// List the entries of a directory as a stored tree
    LsTree(LsTreeArgs),
    /// Print the tree hash of a directory
    Hash(HashArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    /// The old side, imported as a stored tree
    pub old: PathBuf,
    /// The new side, read live from disk
    pub new: PathBuf,
}

#[derive(Args)]
pub struct LsTreeArgs {
    pub dir: PathBuf,
    /// Only list the top level
    #[arg(long)]
    pub no_recursive: bool,
    /// Never descend into the same tree twice
    #[arg(long)]
    pub cycle_protection: bool,
}

#[derive(Args)]
pub struct HashArgs {
    pub dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_diff_with_global_flags() {
        let cli = Cli::parse_from([
            "mtrie", "diff", "a", "b", "--format", "json", "--ignore", "target", "-v",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.ignore, ["target"]);
        match cli.command {
            Command::Diff(args) => {
                assert_eq!(args.old, PathBuf::from("a"));
                assert_eq!(args.new, PathBuf::from("b"));
            }
            _ => panic!("expected diff"),
        }
    }

    #[test]
    fn parses_ls_tree() {
        let cli = Cli::parse_from(["mtrie", "ls-tree", ".", "--no-recursive"]);
        match cli.command {
            Command::LsTree(args) => {
                assert!(args.no_recursive);
                assert!(!args.cycle_protection);
            }
            _ => panic!("expected ls-tree"),
        }
    }
}
