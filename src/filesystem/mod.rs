//! Staged virtual filesystem.
//!
//! A [`VirtualTree`] records writes, deletions and renames against a project
//! directory without touching disk. The recorded state is turned into a list
//! of [`FileChange`]s, which can be previewed with [`print_changes`] and then
//! applied with [`flush_changes`].

mod changes;
mod flush;
pub mod path;
mod report;
mod virtual_tree;

pub use changes::{ChangeKind, FileChange};
pub use flush::{FlushError, flush_changes};
pub use report::{configure_color_output, print_changes};
pub use virtual_tree::VirtualTree;
