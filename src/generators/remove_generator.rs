use tracing::debug;

use crate::filesystem::VirtualTree;
use crate::generators::{GeneratorError, GeneratorOptions, GeneratorTrait, OptionSchema};

const SCHEMA: &[OptionSchema] = &[OptionSchema {
    name: "path",
    description: "File or directory to remove, relative to the project root",
    required: true,
    positional: true,
    default: None,
}];

/// Removes a file or a whole directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveGenerator;

impl GeneratorTrait for RemoveGenerator {
    fn name(&self) -> &'static str {
        "remove"
    }

    fn description(&self) -> &'static str {
        "Remove a file or directory"
    }

    fn schema(&self) -> &'static [OptionSchema] {
        SCHEMA
    }

    async fn generate(
        &self,
        options: &GeneratorOptions,
        tree: &mut VirtualTree,
    ) -> Result<(), GeneratorError> {
        let path = options.require("path")?;
        if !tree.exists(path) {
            return Err(GeneratorError::MissingPathError {
                path: path.to_string(),
            });
        }

        debug!("Removing {}", path);
        tree.delete(path);
        Ok(())
    }
}
