//! Backend detection by marker directory
//!
//! Starting at the dependency's own path, each directory up to (but excluding) the
//! filesystem root is checked for `.git`, `.hg` and `.bzr`. The nearest marker wins, so a
//! checkout nested inside an unrelated repository is attributed to itself.

use std::path::{Path, PathBuf};

use tracing::trace;

use super::{Repository, VcsKind};
use crate::error::{Result, RevlockError};

/// Identify the backend owning `path`
pub fn detect(path: &Path) -> Result<Repository> {
    let start = absolute(path);

    let mut current: &Path = &start;
    loop {
        // The root itself is never searched
        let Some(parent) = current.parent() else {
            break;
        };

        if let Some(kind) = marker_in(current) {
            trace!(path = %path.display(), found_in = %current.display(), %kind, "detected repository");
            return Ok(Repository::new(kind, path));
        }

        current = parent;
    }

    Err(RevlockError::UnknownRepositoryType {
        path: path.display().to_string(),
    })
}

fn marker_in(dir: &Path) -> Option<VcsKind> {
    VcsKind::ALL
        .into_iter()
        .find(|kind| dir.join(kind.marker()).exists())
}

fn absolute(path: &Path) -> PathBuf {
    if let Ok(canonical) = dunce::canonicalize(path) {
        return canonical;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_detects_marker_in_path_itself() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".hg")).unwrap();

        let repo = detect(temp.path()).unwrap();
        assert_eq!(repo.kind(), VcsKind::Mercurial);
        assert_eq!(repo.work_tree(), temp.path());
    }

    #[test]
    fn test_detects_marker_in_distant_ancestor() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".git")).unwrap();
        let nested = temp.path().join("a/b/c/d/e");
        std::fs::create_dir_all(&nested).unwrap();

        let repo = detect(&nested).unwrap();
        assert_eq!(repo.kind(), VcsKind::Git);
        // Commands still run in the dependency path, not where the marker was found
        assert_eq!(repo.work_tree(), nested.as_path());
    }

    #[test]
    fn test_nearest_marker_wins() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".git")).unwrap();
        let inner = temp.path().join("vendor/inner");
        std::fs::create_dir_all(inner.join(".bzr")).unwrap();

        assert_eq!(detect(&inner).unwrap().kind(), VcsKind::Bazaar);
        assert_eq!(detect(temp.path()).unwrap().kind(), VcsKind::Git);
    }

    #[test]
    fn test_git_preferred_over_hg_at_same_level() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".hg")).unwrap();
        std::fs::create_dir(temp.path().join(".git")).unwrap();

        assert_eq!(detect(temp.path()).unwrap().kind(), VcsKind::Git);
    }

    #[test]
    fn test_unknown_without_marker() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("plain/dir");
        std::fs::create_dir_all(&nested).unwrap();

        let err = detect(&nested).unwrap_err();
        assert!(matches!(err, RevlockError::UnknownRepositoryType { .. }));
    }

    #[test]
    fn test_filesystem_root_terminates() {
        let root = Path::new("/");
        assert!(matches!(
            detect(root),
            Err(RevlockError::UnknownRepositoryType { .. })
        ));
    }
}
