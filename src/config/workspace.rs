use std::{
    borrow::Cow,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::ext::BestEffortPathExt;

const WORKSPACE_FILE_NAME: &str = "workspace.yaml";

fn get_workspace_file_path(root: &Path) -> PathBuf {
    root.join(WORKSPACE_FILE_NAME)
}

/// Project-level settings read from `workspace.yaml`.
///
/// ```yaml
/// cli:
///   defaultCollection: core
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceDefinition {
    default_collection: Option<String>,
}

impl WorkspaceDefinition {
    /// Reads the workspace file under `root`. A missing file is an empty workspace.
    pub async fn read(root: &Path) -> Result<Self, WorkspaceError> {
        Self::from_path(get_workspace_file_path(root)).await
    }

    pub async fn from_path(path: PathBuf) -> Result<Self, WorkspaceError> {
        debug!("Reading workspace file: {}", path.best_effort_path_display());
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No workspace file found, using defaults");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).context(ReadSnafu {
                    file_path: path.best_effort_path_display(),
                });
            }
        };
        debug!("Successfully read workspace file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        contents.as_str().try_into()
    }

    pub fn default_collection(&self) -> Option<&str> {
        self.default_collection.as_deref()
    }

    fn parse_default_collection(
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<Option<String>, WorkspaceError> {
        let Some(cli) = top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed("cli")))) else {
            return Ok(None);
        };
        if matches!(cli, Yaml::Value(Scalar::Null)) {
            return Ok(None);
        }

        let default_collection = cli
            .as_mapping()
            .ok_or(WorkspaceError::CliNotMap)?
            .get(&Yaml::Value(Scalar::String(Cow::Borrowed(
                "defaultCollection",
            ))))
            .and_then(|value| value.as_str())
            .map(str::to_string);

        Ok(default_collection)
    }
}

impl TryFrom<&str> for WorkspaceDefinition {
    type Error = WorkspaceError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let Some(document) = documents.first() else {
            return Ok(Self::default());
        };

        let top_level = document
            .as_mapping()
            .ok_or(WorkspaceError::TopLevelNotMap)?;

        Ok(WorkspaceDefinition {
            default_collection: Self::parse_default_collection(top_level)?,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum WorkspaceError {
    #[snafu(display("Failed to read the workspace file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("The workspace file is not valid UTF-8: {}", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the workspace file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of the workspace file should be a map"))]
    TopLevelNotMap,
    #[snafu(display("The cli section of the workspace file should be a map"))]
    CliNotMap,
}
