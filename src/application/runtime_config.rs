use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Generate {
        generator: String,
        generator_args: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub command: Command,
    pub root: PathBuf,
    pub dry_run: bool,
    pub verbose: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        let command = match cli.generator {
            Some(generator) if !cli.list => Command::Generate {
                generator,
                generator_args: cli.generator_args,
            },
            _ => Command::List,
        };
        Self {
            command,
            root: cli.root,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        }
    }
}
