use tracing::debug;

use crate::filesystem::VirtualTree;
use crate::filesystem::path::{is_descendant, join, normalize};
use crate::generators::{GeneratorError, GeneratorOptions, GeneratorTrait, OptionSchema};

const SCHEMA: &[OptionSchema] = &[
    OptionSchema {
        name: "from",
        description: "Existing file or directory to move",
        required: true,
        positional: true,
        default: None,
    },
    OptionSchema {
        name: "to",
        description: "Destination path, which must not exist yet",
        required: true,
        positional: true,
        default: None,
    },
];

/// Moves a file, or a directory with everything below it.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveGenerator;

impl GeneratorTrait for MoveGenerator {
    fn name(&self) -> &'static str {
        "move"
    }

    fn description(&self) -> &'static str {
        "Move a file or directory to a new location"
    }

    fn schema(&self) -> &'static [OptionSchema] {
        SCHEMA
    }

    async fn generate(
        &self,
        options: &GeneratorOptions,
        tree: &mut VirtualTree,
    ) -> Result<(), GeneratorError> {
        let from = options.require("from")?;
        let to = options.require("to")?;

        let (source, target) = (normalize(from), normalize(to));
        if source == target || is_descendant(&target, &source) {
            return Err(GeneratorError::MoveIntoItselfError {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        if !tree.exists(from) {
            return Err(GeneratorError::MissingPathError {
                path: from.to_string(),
            });
        }
        if tree.exists(to) {
            return Err(GeneratorError::PathExistsError {
                path: to.to_string(),
            });
        }

        move_entry(tree, from, to);
        Ok(())
    }
}

fn move_entry(tree: &mut VirtualTree, from: &str, to: &str) {
    if tree.is_file(from) {
        debug!("Moving {} to {}", from, to);
        tree.rename(from, to);
        return;
    }

    for name in tree.children(from) {
        move_entry(tree, &join(from, &name), &join(to, &name));
    }
    tree.delete(from);
}
