use snafu::Snafu;

use crate::filesystem::VirtualTree;
use crate::generators::{FileGenerator, GeneratorOptions, MoveGenerator, OptionSchema, RemoveGenerator};

pub trait GeneratorTrait {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn schema(&self) -> &'static [OptionSchema];
    // Records the generated changes into `tree`; must not touch disk itself
    async fn generate(
        &self,
        options: &GeneratorOptions,
        tree: &mut VirtualTree,
    ) -> Result<(), GeneratorError>;
}

#[derive(Debug, Clone)]
pub enum Generator {
    File(FileGenerator),
    Remove(RemoveGenerator),
    Move(MoveGenerator),
}

impl GeneratorTrait for Generator {
    fn name(&self) -> &'static str {
        match self {
            Generator::File(generator) => generator.name(),
            Generator::Remove(generator) => generator.name(),
            Generator::Move(generator) => generator.name(),
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Generator::File(generator) => generator.description(),
            Generator::Remove(generator) => generator.description(),
            Generator::Move(generator) => generator.description(),
        }
    }

    fn schema(&self) -> &'static [OptionSchema] {
        match self {
            Generator::File(generator) => generator.schema(),
            Generator::Remove(generator) => generator.schema(),
            Generator::Move(generator) => generator.schema(),
        }
    }

    async fn generate(
        &self,
        options: &GeneratorOptions,
        tree: &mut VirtualTree,
    ) -> Result<(), GeneratorError> {
        match self {
            Generator::File(generator) => generator.generate(options, tree).await,
            Generator::Remove(generator) => generator.generate(options, tree).await,
            Generator::Move(generator) => generator.generate(options, tree).await,
        }
    }
}

#[derive(Debug, Snafu)]
pub enum GeneratorError {
    #[snafu(display("Option '{}' was not provided", name))]
    MissingOptionError { name: String },
    #[snafu(display("Path '{}' does not exist", path))]
    MissingPathError { path: String },
    #[snafu(display("Path '{}' already exists", path))]
    PathExistsError { path: String },
    #[snafu(display("Cannot move '{}' into itself ('{}')", from, to))]
    MoveIntoItselfError { from: String, to: String },
}
