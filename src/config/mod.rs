mod workspace;

pub use workspace::{WorkspaceDefinition, WorkspaceError};
