use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Runs a generator against a project directory, previewing or applying
/// the files it creates, updates and deletes.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Generator to run, as `collection:generator` or `generator`
    #[arg(required_unless_present = "list")]
    pub generator: Option<String>,

    /// Options passed to the generator, e.g. `--path=src/index.ts`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub generator_args: Vec<String>,

    /// Print the changes without writing them
    #[arg(long, short)]
    pub dry_run: bool,

    /// Report filesystem errors that are otherwise ignored
    #[arg(long, short)]
    pub verbose: bool,

    /// List the available generators and their options
    #[arg(long)]
    pub list: bool,

    #[arg(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// The root directory of the project
    #[arg(long, short, default_value = ".")]
    pub root: PathBuf,
}
