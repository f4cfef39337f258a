use colored::Colorize;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::{Command, RuntimeConfig};
use crate::config::{WorkspaceDefinition, WorkspaceError};
use crate::filesystem::{
    FileChange, FlushError, VirtualTree, configure_color_output, flush_changes, print_changes,
};
use crate::generators::{
    GeneratorError, GeneratorOptions, GeneratorRegistry, GeneratorTrait, LoaderError,
    OptionsError,
};

pub struct Application;

impl Application {
    pub async fn run(runtime_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let runtime_config: RuntimeConfig = runtime_config.into();
        let workspace = WorkspaceDefinition::read(&runtime_config.root)
            .await
            .context(WorkspaceReadSnafu)?;
        debug!("Loaded workspace: {:?}", workspace);

        let registry = GeneratorRegistry::builtin();
        configure_color_output();

        match &runtime_config.command {
            Command::List => {
                Self::print_generators(&registry);
                Ok(())
            }
            Command::Generate {
                generator,
                generator_args,
            } => {
                let changes =
                    Self::generate(&registry, &workspace, generator, generator_args, &runtime_config)
                        .await?;
                if changes.is_empty() {
                    println!("Nothing to be done.");
                } else if runtime_config.dry_run {
                    println!();
                    println!(
                        "{} The dry-run flag means no changes were written.",
                        "NOTE:".yellow().bold()
                    );
                }
                Ok(())
            }
        }
    }

    /// Runs one generator against a fresh virtual tree over the project root,
    /// prints the resulting changes and, unless this is a dry run, writes them.
    pub async fn generate(
        registry: &GeneratorRegistry,
        workspace: &WorkspaceDefinition,
        identifier: &str,
        generator_args: &[String],
        runtime_config: &RuntimeConfig,
    ) -> Result<Vec<FileChange>, ApplicationError> {
        let generator = registry
            .resolve(identifier, workspace.default_collection())
            .context(GeneratorLoadSnafu { generator: identifier })?;
        let options = GeneratorOptions::parse(generator.schema(), generator_args)
            .context(InvalidOptionsSnafu { generator: identifier })?;
        if runtime_config.verbose {
            let rendered: Vec<_> = options
                .iter()
                .map(|(name, value)| format!("--{name}={value:?}"))
                .collect();
            info!("Running '{}' with {}", identifier, rendered.join(" "));
        }

        let mut tree = VirtualTree::new(&runtime_config.root, runtime_config.verbose);
        generator
            .generate(&options, &mut tree)
            .await
            .context(GenerationSnafu { generator: identifier })?;

        let changes = tree.list_changes();
        debug!("Generator '{}' produced {} changes", identifier, changes.len());
        print_changes(&changes);

        if !runtime_config.dry_run {
            flush_changes(tree.root(), &changes).context(ApplySnafu)?;
        }
        Ok(changes)
    }

    fn print_generators(registry: &GeneratorRegistry) {
        for (collection, generators) in registry.collections() {
            println!("{}", collection.bold());
            for generator in generators {
                println!("  {}  {}", generator.name().green(), generator.description());
                for option in generator.schema() {
                    let mut line = format!("      --{}  {}", option.name, option.description);
                    if let Some(default) = option.default {
                        line.push_str(&format!(" (default: {default:?})"));
                    }
                    if option.required {
                        line.push_str(" [required]");
                    }
                    println!("{line}");
                }
            }
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while reading the workspace"))]
    WorkspaceReadError { source: WorkspaceError },
    #[snafu(display("Failed to load generator '{}'", generator))]
    GeneratorLoadError {
        generator: String,
        source: LoaderError,
    },
    #[snafu(display("Invalid options for generator '{}'", generator))]
    InvalidOptionsError {
        generator: String,
        source: OptionsError,
    },
    #[snafu(display("Generator '{}' failed", generator))]
    GenerationError {
        generator: String,
        source: GeneratorError,
    },
    #[snafu(display("Critical failure encountered while writing the changes"))]
    ApplyError { source: FlushError },
}
