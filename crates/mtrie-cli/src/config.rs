use std::path::Path;

use anyhow::Context;
use mtrie_fs::FsOptions;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Contents of the `--config` file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub fs: FsOptions,
}

impl CliConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Filesystem options from the config file, overridden by flags.
    pub fn resolve(cli: &Cli) -> anyhow::Result<FsOptions> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        for name in &cli.ignore {
            if !config.fs.ignore.contains(name) {
                config.fs.ignore.push(name.clone());
            }
        }
        if cli.tolerate_vanished {
            config.fs.tolerate_vanished = true;
        }
        Ok(config.fs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn loads_fs_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mtrie.toml");
        std::fs::write(&path, "[fs]\nignore = [\"target\"]\ntolerate_vanished = true\n").unwrap();
        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.fs.ignore, ["target"]);
        assert!(config.fs.tolerate_vanished);
    }

    #[test]
    fn flags_extend_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mtrie.toml");
        std::fs::write(&path, "[fs]\nignore = [\".git\"]\n").unwrap();
        let cli = Cli::parse_from([
            "mtrie",
            "hash",
            ".",
            "--config",
            path.to_str().unwrap(),
            "--ignore",
            "node_modules",
            "--ignore",
            ".git",
        ]);
        let fs = CliConfig::resolve(&cli).unwrap();
        assert_eq!(fs.ignore, [".git", "node_modules"]);
        assert!(!fs.tolerate_vanished);
    }

    #[test]
    fn defaults_without_config() {
        let cli = Cli::parse_from(["mtrie", "hash", "."]);
        assert_eq!(CliConfig::resolve(&cli).unwrap(), FsOptions::default());
    }

    #[test]
    fn bad_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[fs\n").unwrap();
        assert!(CliConfig::load(&path).is_err());
    }
}
