use std::{env, path::PathBuf};

pub const DEFAULT_INPUT_DIR: &str = "files/input";
pub const DEFAULT_OUTPUT_DIR: &str = "files/output";

pub const INPUT_DIR_ENV: &str = "CAMPAIGN_INPUT_DIR";
pub const OUTPUT_DIR_ENV: &str = "CAMPAIGN_OUTPUT_DIR";

/// Where the run reads archives from and writes the three tables to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Config {
    /// Resolve from the process environment and command line.
    pub fn from_env() -> Self {
        Self::resolve(
            env::args().skip(1),
            env::var(INPUT_DIR_ENV).ok(),
            env::var(OUTPUT_DIR_ENV).ok(),
        )
    }

    /// Positional args win over env values, which win over defaults.
    ///
    /// usage: campaign-extract [INPUT_DIR] [OUTPUT_DIR]
    pub fn resolve<I>(args: I, input_env: Option<String>, output_env: Option<String>) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut cfg = Config::default();
        if let Some(dir) = input_env.filter(|s| !s.is_empty()) {
            cfg.input_dir = PathBuf::from(dir);
        }
        if let Some(dir) = output_env.filter(|s| !s.is_empty()) {
            cfg.output_dir = PathBuf::from(dir);
        }

        let mut args = args.into_iter();
        if let Some(dir) = args.next() {
            cfg.input_dir = PathBuf::from(dir);
        }
        if let Some(dir) = args.next() {
            cfg.output_dir = PathBuf::from(dir);
        }
        cfg
    }
}
