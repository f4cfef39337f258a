use tracing::debug;

use crate::filesystem::VirtualTree;
use crate::generators::{GeneratorError, GeneratorOptions, GeneratorTrait, OptionSchema};

const SCHEMA: &[OptionSchema] = &[
    OptionSchema {
        name: "path",
        description: "Path of the file to write, relative to the project root",
        required: true,
        positional: true,
        default: None,
    },
    OptionSchema {
        name: "content",
        description: "Text to write into the file",
        required: false,
        positional: true,
        default: Some(""),
    },
    OptionSchema {
        name: "overwrite",
        description: "Replace the file if it already exists",
        required: false,
        positional: false,
        default: Some("false"),
    },
];

/// Writes a single file with the given content.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileGenerator;

impl GeneratorTrait for FileGenerator {
    fn name(&self) -> &'static str {
        "file"
    }

    fn description(&self) -> &'static str {
        "Create a file with the given content"
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
        let content = options.get("content").unwrap_or_default();

        // Directories are never overwritten, even with --overwrite
        if tree.exists(path) && !(options.flag("overwrite") && tree.is_file(path)) {
            return Err(GeneratorError::PathExistsError {
                path: path.to_string(),
            });
        }

        if tree.read_to_string(path).as_deref() == Some(content) {
            debug!("{} already has the requested content", path);
            return Ok(());
        }

        debug!("Writing {} bytes to {}", content.len(), path);
        tree.write(path, content);
        Ok(())
    }
}
