//! Local tree walking for sync
//!
//! Maps every regular file under a root directory to an object key equal
//! to its relative path, joined with `/` on every platform.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Content type used when the extension has no known mapping
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// A regular file found under the sync root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEntry {
    /// Path of the file on disk
    pub path: PathBuf,
    /// Object key the file is uploaded to
    pub key: String,
}

/// Resolve a sync root to an absolute, symlink-free directory path
///
/// A leading `~` is expanded to the home directory.
pub fn resolve_root(path: &Path) -> Result<PathBuf> {
    let expanded = expand_home(path);
    let root = match fs::canonicalize(&expanded) {
        Ok(root) => root,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::PathNotFound(expanded));
        }
        Err(e) => return Err(e.into()),
    };

    if !root.is_dir() {
        return Err(Error::InvalidPath(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    Ok(root)
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Object key for `path` relative to `root`
///
/// Returns None if `path` is not below `root`.
pub fn object_key(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Infer the upload content type from a key's extension
pub fn content_type_for(key: &str) -> String {
    mime_guess::from_path(key)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

/// Walk every regular file below `root`, depth first
///
/// The walk is lazy and single-pass. Sibling order follows the
/// filesystem. Entries that are neither files nor directories are skipped.
/// A directory reached through several paths (symlink aliases) is walked
/// under each of them; only a directory that is already an ancestor on the
/// current descent is skipped, so symlink cycles terminate.
pub fn walk(root: impl Into<PathBuf>) -> Walk {
    let root = root.into();
    Walk {
        start: Some(root.clone()),
        root,
        stack: Vec::new(),
    }
}

/// Iterator returned by [`walk`]
#[derive(Debug)]
pub struct Walk {
    root: PathBuf,
    start: Option<PathBuf>,
    stack: Vec<OpenDir>,
}

/// A directory being read, with its canonical path for cycle checks
#[derive(Debug)]
struct OpenDir {
    path: PathBuf,
    canonical: PathBuf,
    entries: fs::ReadDir,
}

fn local_read_error(path: &Path, source: io::Error) -> Error {
    Error::LocalRead {
        path: path.to_path_buf(),
        source,
    }
}

impl Walk {
    fn enter(&mut self, dir: &Path) -> Result<()> {
        let canonical = fs::canonicalize(dir).map_err(|e| local_read_error(dir, e))?;
        if self.stack.iter().any(|open| open.canonical == canonical) {
            tracing::debug!(path = %dir.display(), "Directory is its own ancestor, skipping");
            return Ok(());
        }
        let entries = fs::read_dir(dir).map_err(|e| local_read_error(dir, e))?;
        self.stack.push(OpenDir {
            path: dir.to_path_buf(),
            canonical,
            entries,
        });
        Ok(())
    }
}

impl Iterator for Walk {
    type Item = Result<SyncEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.start.take() {
            if let Err(e) = self.enter(&root) {
                return Some(Err(e));
            }
        }

        loop {
            let open = self.stack.last_mut()?;
            let entry = match open.entries.next() {
                None => {
                    self.stack.pop();
                    continue;
                }
                Some(Err(e)) => return Some(Err(local_read_error(&open.path, e))),
                Some(Ok(entry)) => entry,
            };

            let path = entry.path();
            // Follows symlinks; dangling links fail here and are skipped
            let metadata = match fs::metadata(&path) {
                Ok(m) => m,
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            if metadata.is_dir() {
                if let Err(e) = self.enter(&path) {
                    return Some(Err(e));
                }
            } else if metadata.is_file() {
                if let Some(key) = object_key(&path, &self.root) {
                    return Some(Ok(SyncEntry { path, key }));
                }
            } else {
                tracing::warn!(path = %path.display(), "Skipping special file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn tree(files: &[&str], dirs: &[&str]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for dir in dirs {
            fs::create_dir_all(temp.path().join(dir)).unwrap();
        }
        for file in files {
            let path = temp.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, file.as_bytes()).unwrap();
        }
        temp
    }

    fn keys(root: &Path) -> BTreeSet<String> {
        walk(root).map(|e| e.unwrap().key).collect()
    }

    #[test]
    fn test_walk_yields_only_regular_files() {
        let temp = tree(
            &["index.html", "assets/style.css", "assets/img/logo.png"],
            &["empty", "assets/also-empty"],
        );
        let root = resolve_root(temp.path()).unwrap();

        let expected: BTreeSet<String> = ["index.html", "assets/style.css", "assets/img/logo.png"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(keys(&root), expected);
    }

    #[test]
    fn test_walk_visits_each_file_once() {
        let temp = tree(&["a", "b/c", "b/d/e", "b/d/f"], &[]);
        let root = resolve_root(temp.path()).unwrap();

        let all: Vec<String> = walk(&root).map(|e| e.unwrap().key).collect();
        let unique: BTreeSet<&String> = all.iter().collect();
        assert_eq!(all.len(), 4);
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_walk_empty_root() {
        let temp = TempDir::new().unwrap();
        assert_eq!(walk(temp.path()).count(), 0);
    }

    #[test]
    fn test_walk_entry_paths_point_at_files() {
        let temp = tree(&["sub/dir/page.html"], &[]);
        let root = resolve_root(temp.path()).unwrap();

        let entries: Vec<SyncEntry> = walk(&root).map(|e| e.unwrap()).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "sub/dir/page.html");
        assert_eq!(fs::read(&entries[0].path).unwrap(), b"sub/dir/page.html");
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_dangling_symlinks() {
        let temp = tree(&["index.html"], &[]);
        std::os::unix::fs::symlink(temp.path().join("missing"), temp.path().join("broken"))
            .unwrap();
        let root = resolve_root(temp.path()).unwrap();

        let expected: BTreeSet<String> = ["index.html".to_string()].into_iter().collect();
        assert_eq!(keys(&root), expected);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_terminates_on_symlink_cycle() {
        let temp = tree(&["a/page.html"], &[]);
        std::os::unix::fs::symlink(temp.path().join("a"), temp.path().join("a/loop")).unwrap();
        let root = resolve_root(temp.path()).unwrap();

        let expected: BTreeSet<String> = ["a/page.html".to_string()].into_iter().collect();
        assert_eq!(keys(&root), expected);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_follows_every_alias_of_a_directory() {
        let temp = tree(&["real/page.html"], &[]);
        std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("alias")).unwrap();
        let root = resolve_root(temp.path()).unwrap();

        let expected: BTreeSet<String> = ["real/page.html", "alias/page.html"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(keys(&root), expected);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_cycle_below_alias_terminates() {
        let temp = tree(&["real/page.html"], &[]);
        std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("alias")).unwrap();
        std::os::unix::fs::symlink(temp.path(), temp.path().join("real/up")).unwrap();
        let root = resolve_root(temp.path()).unwrap();

        let expected: BTreeSet<String> = ["real/page.html", "alias/page.html"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(keys(&root), expected);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_unreadable_directory_names_path() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tree(&["index.html", "locked/secret.html"], &[]);
        let locked = temp.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        let readable = fs::read_dir(&locked).is_ok();
        let root = resolve_root(temp.path()).unwrap();

        let results: Vec<Result<SyncEntry>> = walk(&root).collect();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // Permission bits do not apply to root
        if readable {
            return;
        }
        let err = results
            .into_iter()
            .find_map(|r| r.err())
            .expect("walk should report the unreadable directory");
        match err {
            Error::LocalRead { path, source } => {
                assert!(path.ends_with("locked"));
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_object_key_uses_forward_slashes() {
        let root = Path::new("/srv/site");
        let path = root.join("sub").join("dir").join("page.html");
        assert_eq!(object_key(&path, root).as_deref(), Some("sub/dir/page.html"));
    }

    #[test]
    fn test_object_key_outside_root() {
        assert_eq!(object_key(Path::new("/etc/passwd"), Path::new("/srv/site")), None);
        assert_eq!(object_key(Path::new("/srv/site"), Path::new("/srv/site")), None);
    }

    #[test]
    fn test_content_type_inference() {
        assert_eq!(content_type_for("index.html"), "text/html");
        assert_eq!(content_type_for("style.css"), "text/css");
        assert_eq!(content_type_for("data.json"), "application/json");
        assert_eq!(content_type_for("archive"), "text/plain");
    }

    #[test]
    fn test_content_type_is_not_forced_to_html() {
        assert_eq!(content_type_for("assets/logo.png"), "image/png");
        assert_ne!(content_type_for("assets/app.js"), "text/html");
    }

    #[test]
    fn test_resolve_root_missing() {
        let err = resolve_root(Path::new("/does/not/exist")).unwrap_err();
        assert!(matches!(err, Error::PathNotFound(_)));
    }

    #[test]
    fn test_resolve_root_file_is_invalid() {
        let temp = tree(&["index.html"], &[]);
        let err = resolve_root(&temp.path().join("index.html")).unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
    }

    #[test]
    fn test_resolve_root_is_absolute() {
        let temp = TempDir::new().unwrap();
        let root = resolve_root(temp.path()).unwrap();
        assert!(root.is_absolute());
    }
}
