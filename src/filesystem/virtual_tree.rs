use std::collections::BTreeSet;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use hashlink::LinkedHashMap;
use tracing::{debug, warn};

use crate::ext::BestEffortPathExt;
use crate::filesystem::FileChange;
use crate::filesystem::path::{is_descendant, join, normalize, subtree_prefix};

/// Pending state of a single touched path.
///
/// `content: None` together with `deleted: true` is a tombstone. A live entry
/// with `content: None` only appears when a missing path was renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RecordedChange {
    content: Option<Vec<u8>>,
    deleted: bool,
}

impl RecordedChange {
    fn written(content: Option<Vec<u8>>) -> Self {
        Self {
            content,
            deleted: false,
        }
    }

    fn tombstone() -> Self {
        Self {
            content: None,
            deleted: true,
        }
    }
}

/// An in-memory overlay of pending mutations over a real directory.
///
/// Reads consult the overlay first and fall back to the directory on disk,
/// so every path touched during a generation run is read-after-write
/// consistent while the disk stays untouched. Directories are never recorded
/// on their own: a path is a directory as long as live entries exist below it.
///
/// Filesystem access during `read`, `exists`, `is_file` and `children` fails
/// soft: errors degrade to "not found" and are only reported when the tree
/// was created with `verbose` set.
///
/// ```ignore
/// let mut tree = VirtualTree::new("/tmp/project", false);
/// tree.write("src/index.ts", "export {}");
/// assert!(tree.exists("src"));
/// let changes = tree.list_changes();
/// ```
#[derive(Debug)]
pub struct VirtualTree {
    root: PathBuf,
    verbose: bool,
    recorded_changes: LinkedHashMap<String, RecordedChange>,
}

impl VirtualTree {
    pub fn new(root: impl Into<PathBuf>, verbose: bool) -> Self {
        let root = root.into();
        debug!(
            "Creating virtual tree over {}",
            root.best_effort_path_display()
        );
        Self {
            root,
            verbose,
            recorded_changes: LinkedHashMap::new(),
        }
    }

    /// Returns the real directory this tree is layered over.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the current content of `path`, or `None` when it neither has a
    /// pending write nor a readable file on disk.
    pub fn read(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let key = normalize(path);
        match self.recorded_changes.get(&key) {
            Some(change) => change.content.clone(),
            None if self.is_shadowed(&key) => None,
            None => self.read_host_file(&key),
        }
    }

    /// Like [`read`](Self::read), but also yields `None` for non UTF-8 content.
    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read(path)
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }

    /// Records `content` as the pending content of `path`, replacing any
    /// earlier write or deletion of the same path.
    pub fn write(&mut self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let key = normalize(path);
        debug!("Recording write of {key}");
        self.record(key, RecordedChange::written(Some(content.into())));
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        let key = normalize(path);
        match self.recorded_changes.get(&key) {
            Some(change) if !change.deleted => true,
            _ if self.has_live_descendants(&key) => true,
            Some(_) => false,
            None => !self.is_shadowed(&key) && self.host_metadata(&key).is_some(),
        }
    }

    /// Like [`exists`](Self::exists), but directories do not count. Pending
    /// writes are always files.
    pub fn is_file(&self, path: impl AsRef<Path>) -> bool {
        let key = normalize(path);
        match self.recorded_changes.get(&key) {
            Some(change) => !change.deleted,
            None if self.is_shadowed(&key) => false,
            None => self
                .host_metadata(&key)
                .is_some_and(|metadata| metadata.is_file()),
        }
    }

    /// Marks `path` and every recorded path below it as deleted. The path
    /// does not need to exist.
    pub fn delete(&mut self, path: impl AsRef<Path>) {
        let key = normalize(path);
        debug!("Recording deletion of {key}");

        for (recorded, change) in self.recorded_changes.iter_mut() {
            if is_descendant(recorded, &key) {
                *change = RecordedChange::tombstone();
            }
        }
        self.record(key, RecordedChange::tombstone());
    }

    /// Moves the content of `from` to `to`.
    ///
    /// The source is not validated: renaming a missing path records `to` as a
    /// live entry without content. Check [`exists`](Self::exists) first.
    pub fn rename(&mut self, from: impl AsRef<Path>, to: impl AsRef<Path>) {
        let from = normalize(from);
        let to = normalize(to);
        debug!("Recording rename of {from} to {to}");

        let content = self.read(&from);
        self.delete(&from);
        self.record(to, RecordedChange::written(content));
    }

    /// Returns the sorted names of the live entries directly inside `path`,
    /// merging the directory on disk with pending changes. The disk listing
    /// is skipped once the directory itself has been deleted.
    pub fn children(&self, path: impl AsRef<Path>) -> Vec<String> {
        let dir = normalize(path);
        let dir_deleted = self
            .recorded_changes
            .get(&dir)
            .is_some_and(|change| change.deleted);
        let mut names = if dir_deleted || self.is_shadowed(&dir) {
            BTreeSet::new()
        } else {
            self.read_host_dir(&dir)
        };

        let prefix = subtree_prefix(&dir);
        for recorded in self.recorded_changes.keys() {
            if let Some(rest) = recorded.strip_prefix(prefix.as_str()) {
                if let Some(name) = rest.split('/').next().filter(|name| !name.is_empty()) {
                    names.insert(name.to_string());
                }
            }
        }

        names
            .into_iter()
            .filter(|name| self.exists(join(&dir, name)))
            .collect()
    }

    /// Classifies every recorded path against the real filesystem as it is
    /// now. Deleting a path that never existed on disk yields nothing.
    ///
    /// A write below a directory deleted earlier in the list is a CREATE: by
    /// the time it is flushed, its copy on disk is already gone.
    pub fn list_changes(&self) -> Vec<FileChange> {
        let mut changes = Vec::new();
        let mut deleted: Vec<&str> = Vec::new();

        for (path, change) in self.recorded_changes.iter() {
            let on_disk = self.host_metadata(path).is_some();
            if change.deleted {
                if on_disk {
                    deleted.push(path);
                    changes.push(FileChange::delete(path.clone()));
                }
                continue;
            }

            let removed_before = deleted.iter().any(|dir| is_descendant(path, dir));
            if on_disk && !removed_before {
                changes.push(FileChange::update(path.clone(), change.content.clone()));
            } else {
                changes.push(FileChange::create(path.clone(), change.content.clone()));
            }
        }

        changes
    }

    /// Inserts at the back so the change log lists mutations after the ones
    /// they supersede.
    fn record(&mut self, key: String, change: RecordedChange) {
        self.recorded_changes.insert(key, change);
    }

    fn has_live_descendants(&self, dir: &str) -> bool {
        self.recorded_changes
            .iter()
            .any(|(recorded, change)| !change.deleted && is_descendant(recorded, dir))
    }

    /// Whether the disk copy of `key` is hidden by a deleted ancestor. Only
    /// the nearest recorded ancestor counts.
    fn is_shadowed(&self, key: &str) -> bool {
        let mut ancestor = key;
        while !ancestor.is_empty() {
            ancestor = ancestor.rsplit_once('/').map_or("", |(parent, _)| parent);
            if let Some(change) = self.recorded_changes.get(ancestor) {
                return change.deleted;
            }
        }
        false
    }

    fn host_path(&self, key: &str) -> PathBuf {
        if key.is_empty() {
            self.root.clone()
        } else {
            self.root.join(key)
        }
    }

    fn host_metadata(&self, key: &str) -> Option<Metadata> {
        let host = self.host_path(key);
        fs::metadata(&host)
            .inspect_err(|err| self.report_access_error("stat", &host, err))
            .ok()
    }

    fn read_host_file(&self, key: &str) -> Option<Vec<u8>> {
        let host = self.host_path(key);
        fs::read(&host)
            .inspect_err(|err| self.report_access_error("read", &host, err))
            .ok()
    }

    fn read_host_dir(&self, key: &str) -> BTreeSet<String> {
        let host = self.host_path(key);
        match fs::read_dir(&host) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(err) => {
                self.report_access_error("list", &host, &err);
                BTreeSet::new()
            }
        }
    }

    fn report_access_error(&self, operation: &str, host: &Path, err: &io::Error) {
        if err.kind() == io::ErrorKind::NotFound {
            return;
        }
        if self.verbose {
            warn!(
                "Failed to {operation} {}: {err}",
                host.best_effort_path_display()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::ChangeKind;
    use rstest::*;
    use tempfile::TempDir;

    #[fixture]
    fn project() -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir_all(dir.path().join("src/lib")).expect("Failed to create src/lib");
        fs::write(dir.path().join("src/main.rs"), "fn main() {}").expect("Failed to write main");
        fs::write(dir.path().join("src/lib/util.rs"), "pub fn util() {}")
            .expect("Failed to write util");
        fs::write(dir.path().join("README.md"), "# readme").expect("Failed to write readme");
        dir
    }

    #[rstest]
    fn write_then_read_returns_written_content(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.write("docs/guide.md", "hello");

        assert!(tree.exists("docs/guide.md"));
        assert_eq!(tree.read("docs/guide.md"), Some(b"hello".to_vec()));
        assert!(!project.path().join("docs").exists());
    }

    #[rstest]
    fn read_falls_back_to_disk(project: TempDir) {
        let tree = VirtualTree::new(project.path(), false);
        assert_eq!(tree.read_to_string("src/main.rs").as_deref(), Some("fn main() {}"));
        assert_eq!(tree.read("/README.md"), Some(b"# readme".to_vec()));
    }

    #[rstest]
    fn read_of_missing_or_directory_is_none(project: TempDir) {
        let tree = VirtualTree::new(project.path(), true);
        assert_eq!(tree.read("missing.txt"), None);
        assert_eq!(tree.read("src"), None);
    }

    #[rstest]
    fn read_to_string_rejects_invalid_utf8(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.write("blob.bin", vec![0xff, 0xfe, 0xfd]);
        assert_eq!(tree.read_to_string("blob.bin"), None);
        assert_eq!(tree.read("blob.bin"), Some(vec![0xff, 0xfe, 0xfd]));
    }

    #[rstest]
    fn last_write_wins(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.write("a.txt", "first");
        tree.write("./a.txt", "second");

        assert_eq!(tree.read("a.txt"), Some(b"second".to_vec()));
        assert_eq!(tree.list_changes().len(), 1);
    }

    #[rstest]
    #[case("README.md")]
    #[case("src/main.rs")]
    #[case("never/existed.txt")]
    fn delete_hides_path_regardless_of_disk_state(project: TempDir, #[case] path: &str) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.delete(path);

        assert!(!tree.exists(path));
        assert!(!tree.is_file(path));
        assert_eq!(tree.read(path), None);
    }

    #[rstest]
    fn delete_directory_removes_recorded_subtree(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.write("src/generated/a.rs", "a");
        tree.write("src/generated/deep/b.rs", "b");
        tree.delete("src");

        assert!(!tree.exists("src"));
        assert!(!tree.exists("src/generated/a.rs"));
        assert!(!tree.exists("src/generated/deep/b.rs"));
        assert!(!tree.exists("src/generated"));
        assert!(project.path().join("src/main.rs").exists());
    }

    #[rstest]
    fn delete_does_not_touch_siblings_sharing_a_prefix(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.write("srcgen/a.rs", "a");
        tree.delete("src");

        assert!(tree.exists("srcgen/a.rs"));
    }

    #[rstest]
    fn write_below_deleted_directory_revives_it(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.delete("src");
        tree.write("src/new.rs", "new");

        assert!(tree.exists("src"));
        assert!(tree.exists("src/new.rs"));
        assert!(!tree.exists("src/main.rs"));
        assert_eq!(tree.children("src"), vec!["new.rs".to_string()]);
    }

    #[rstest]
    fn written_children_make_implicit_directories(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.write("packages/app/index.ts", "export {}");

        assert!(tree.exists("packages"));
        assert!(tree.exists("packages/app"));
        assert!(!tree.is_file("packages/app"));
    }

    #[rstest]
    fn is_file_distinguishes_disk_directories(project: TempDir) {
        let tree = VirtualTree::new(project.path(), false);
        assert!(tree.exists("src/lib"));
        assert!(!tree.is_file("src/lib"));
        assert!(tree.is_file("src/lib/util.rs"));
        assert!(!tree.is_file("src/lib/missing.rs"));
    }

    #[rstest]
    fn rename_moves_disk_content(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.rename("src/main.rs", "src/bin/app.rs");

        assert!(!tree.exists("src/main.rs"));
        assert_eq!(tree.read("src/bin/app.rs"), Some(b"fn main() {}".to_vec()));
    }

    #[rstest]
    fn rename_moves_pending_content(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.write("draft.txt", "draft");
        tree.rename("draft.txt", "final.txt");

        assert!(!tree.exists("draft.txt"));
        assert_eq!(tree.read("final.txt"), Some(b"draft".to_vec()));

        let changes = tree.list_changes();
        assert_eq!(changes, vec![FileChange::create("final.txt", Some(b"draft".to_vec()))]);
    }

    #[rstest]
    fn rename_of_missing_source_records_empty_entry(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.rename("ghost.txt", "target.txt");

        assert!(tree.exists("target.txt"));
        assert_eq!(tree.read("target.txt"), None);
        assert_eq!(tree.list_changes(), vec![FileChange::create("target.txt", None)]);
    }

    #[rstest]
    fn children_merges_disk_and_overlay(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.write("src/new.rs", "new");
        tree.write("src/generated/deep/x.rs", "x");
        tree.delete("src/main.rs");

        assert_eq!(
            tree.children("src"),
            vec!["generated".to_string(), "lib".to_string(), "new.rs".to_string()]
        );
    }

    #[rstest]
    fn children_of_virtual_only_directory(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.write("dir/a.txt", "a");
        tree.write("dir/a.txt", "again");

        assert_eq!(tree.children("dir"), vec!["a.txt".to_string()]);
        assert!(tree.children("nowhere").is_empty());
    }

    #[rstest]
    fn children_of_root_lists_top_level_names(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.write("docs/guide.md", "guide");
        tree.delete("README.md");

        assert_eq!(tree.children(""), vec!["docs".to_string(), "src".to_string()]);
        assert_eq!(tree.children("/"), tree.children(""));
    }

    #[rstest]
    fn list_changes_classifies_against_disk(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.write("src/main.rs", "fn main() { run() }");
        tree.write("src/run.rs", "pub fn run() {}");
        tree.delete("README.md");
        tree.delete("never/existed.txt");

        let changes = tree.list_changes();
        assert_eq!(
            changes,
            vec![
                FileChange::update("src/main.rs", Some(b"fn main() { run() }".to_vec())),
                FileChange::create("src/run.rs", Some(b"pub fn run() {}".to_vec())),
                FileChange::delete("README.md"),
            ]
        );
    }

    #[rstest]
    fn list_changes_reflects_disk_at_listing_time(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.write("late.txt", "virtual");
        fs::write(project.path().join("late.txt"), "real").expect("Failed to write late.txt");

        let kinds: Vec<_> = tree.list_changes().iter().map(|change| change.kind).collect();
        assert_eq!(kinds, vec![ChangeKind::Update]);
    }

    #[rstest]
    fn rewrite_after_delete_is_listed_after_the_deletion(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.write("src/lib/util.rs", "changed");
        tree.delete("src");
        tree.write("src/lib/util.rs", "recreated");

        let changes = tree.list_changes();
        let paths: Vec<_> = changes.iter().map(|change| change.path.as_str()).collect();
        assert_eq!(paths, vec!["src", "src/lib/util.rs"]);
        assert_eq!(changes[0].kind, ChangeKind::Delete);
        assert_eq!(changes[1].kind, ChangeKind::Create);
    }

    #[rstest]
    fn deleted_directory_hides_disk_contents(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.delete("src");

        assert!(!tree.exists("src/main.rs"));
        assert!(!tree.is_file("src/lib/util.rs"));
        assert!(!tree.exists("src/lib"));
        assert_eq!(tree.read("src/main.rs"), None);
        assert!(tree.children("src").is_empty());
        assert_eq!(tree.children(""), vec!["README.md".to_string()]);
        assert!(project.path().join("src/main.rs").exists());
    }

    #[rstest]
    fn rewrite_inside_deleted_directory_keeps_siblings_hidden(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.delete("src");
        tree.write("src/lib/extra.rs", "extra");

        assert!(tree.exists("src/lib"));
        assert!(!tree.exists("src/lib/util.rs"));
        assert_eq!(tree.read("src/lib/util.rs"), None);
        assert_eq!(tree.children("src/lib"), vec!["extra.rs".to_string()]);
    }

    #[rstest]
    fn children_skips_names_left_only_by_tombstones(project: TempDir) {
        let mut tree = VirtualTree::new(project.path(), false);
        tree.write("gen/a.rs", "a");
        tree.delete("gen/a.rs");

        assert!(!tree.exists("gen"));
        assert!(!tree.children("").contains(&"gen".to_string()));
    }

    #[test]
    fn empty_directory_end_to_end_listing() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let mut tree = VirtualTree::new(dir.path(), false);
        tree.write("src/index.ts", "export {}");

        assert_eq!(
            tree.list_changes(),
            vec![FileChange::create("src/index.ts", Some(b"export {}".to_vec()))]
        );
        assert_eq!(tree.children(""), vec!["src".to_string()]);
    }
}
