use derive_more::Display;

/// Classification of a pending mutation relative to the real filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ChangeKind {
    #[display("CREATE")]
    Create,
    #[display("UPDATE")]
    Update,
    #[display("DELETE")]
    Delete,
}

/// A classified, ready-to-apply mutation produced by
/// [`VirtualTree::list_changes`](super::VirtualTree::list_changes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Normalized path relative to the tree root
    pub path: String,
    pub kind: ChangeKind,
    /// Bytes to write; always `None` for deletions
    pub content: Option<Vec<u8>>,
}

impl FileChange {
    pub fn create(path: impl Into<String>, content: Option<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Create,
            content,
        }
    }

    pub fn update(path: impl Into<String>, content: Option<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Update,
            content,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Delete,
            content: None,
        }
    }

    /// Number of bytes this change writes.
    pub fn content_len(&self) -> usize {
        self.content.as_ref().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_kind_displays_as_upper_case_tag() {
        assert_eq!(ChangeKind::Create.to_string(), "CREATE");
        assert_eq!(ChangeKind::Update.to_string(), "UPDATE");
        assert_eq!(ChangeKind::Delete.to_string(), "DELETE");
    }

    #[test]
    fn delete_carries_no_content() {
        let change = FileChange::delete("src/old.rs");
        assert_eq!(change.kind, ChangeKind::Delete);
        assert_eq!(change.content, None);
        assert_eq!(change.content_len(), 0);
    }
}
