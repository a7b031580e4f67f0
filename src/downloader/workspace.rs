// Scratch directory management
//
// The serve area holds at most one published download at a time. Each
// download request stages into its own uniquely named subdirectory under a
// hidden staging area, so concurrent requests never observe each other's
// partial files; only the publish step touches shared state.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use uuid::Uuid;

const STAGING_SUBDIR: &str = ".staging";

/// Process-wide scratch root: the serve area plus the staging area.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(root.join(STAGING_SUBDIR))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a caller-supplied name against the serve area. Names that
    /// would escape the directory resolve to None, like missing files.
    pub fn resolve_serve_file(&self, filename: &str) -> Option<PathBuf> {
        if !is_plain_file_name(filename) {
            return None;
        }
        let path = self.root.join(filename);
        path.is_file().then_some(path)
    }

    /// Open a fresh staging directory for one download request.
    pub fn begin_staging(&self) -> io::Result<Staging> {
        let dir = self
            .root
            .join(STAGING_SUBDIR)
            .join(Uuid::new_v4().to_string());
        fs::create_dir_all(&dir)?;
        Ok(Staging { dir })
    }

    /// Move a staged file into the serve area, evicting whatever was
    /// published before. Returns the published file name.
    pub fn publish(&self, staged: &Path) -> io::Result<String> {
        let name = staged
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "unnameable staged file"))?
            .to_string();

        self.purge_serve_area();
        fs::rename(staged, self.root.join(&name))?;
        Ok(name)
    }

    /// Best-effort removal of everything published at the top level.
    /// Failures are swallowed; a leftover file only wastes disk.
    fn purge_serve_area(&self) {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.file_name().is_some_and(|n| n == STAGING_SUBDIR) {
                continue;
            }
            let _ = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
        }
    }
}

/// A per-request staging directory, removed on drop.
#[derive(Debug)]
pub struct Staging {
    dir: PathBuf,
}

impl Staging {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Output path template handed to the fetch tool.
    pub fn output_template(&self) -> String {
        format!("{}/%(title)s.%(ext)s", self.dir.display())
    }

    /// Newest file by creation time, falling back to modification time on
    /// filesystems without birth timestamps.
    pub fn newest_file(&self) -> Option<PathBuf> {
        let entries = fs::read_dir(&self.dir).ok()?;
        let mut newest: Option<(SystemTime, PathBuf)> = None;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Ok(meta) = entry.metadata() else { continue };
            let Ok(stamp) = meta.created().or_else(|_| meta.modified()) else {
                continue;
            };
            if newest.as_ref().is_none_or(|(best, _)| stamp > *best) {
                newest = Some((stamp, path));
            }
        }
        newest.map(|(_, path)| path)
    }
}

impl Drop for Staging {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

/// True only for a bare file name: exactly one normal path component, no
/// separators, no `..`, no absolute prefix.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn workspace() -> (tempfile::TempDir, Workspace) {
        let tmp = tempfile::tempdir().unwrap();
        let ws = Workspace::new(tmp.path().to_path_buf()).unwrap();
        (tmp, ws)
    }

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("video.mp4"));
        assert!(is_plain_file_name("Song (Official).mp3"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("../etc/passwd"));
        assert!(!is_plain_file_name("a/b.mp4"));
        assert!(!is_plain_file_name("/etc/passwd"));
    }

    #[test]
    fn test_resolve_serve_file() {
        let (_tmp, ws) = workspace();
        File::create(ws.root().join("clip.mp4")).unwrap();

        assert!(ws.resolve_serve_file("clip.mp4").is_some());
        assert!(ws.resolve_serve_file("missing.mp4").is_none());
        assert!(ws.resolve_serve_file("../clip.mp4").is_none());
        // Directories are not servable even by exact name
        assert!(ws.resolve_serve_file(".staging").is_none());
    }

    #[test]
    fn test_staging_dirs_are_unique_and_removed_on_drop() {
        let (_tmp, ws) = workspace();
        let a = ws.begin_staging().unwrap();
        let b = ws.begin_staging().unwrap();
        assert_ne!(a.dir(), b.dir());

        let path = a.dir().to_path_buf();
        assert!(path.is_dir());
        drop(a);
        assert!(!path.exists());
    }

    #[test]
    fn test_newest_file_picks_latest() {
        let (_tmp, ws) = workspace();
        let staging = ws.begin_staging().unwrap();

        File::create(staging.dir().join("first.mp4")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        File::create(staging.dir().join("second.mp4")).unwrap();

        let newest = staging.newest_file().unwrap();
        assert_eq!(newest.file_name().unwrap(), "second.mp4");
    }

    #[test]
    fn test_newest_file_empty_staging() {
        let (_tmp, ws) = workspace();
        let staging = ws.begin_staging().unwrap();
        assert!(staging.newest_file().is_none());
    }

    #[test]
    fn test_publish_evicts_previous_occupant() {
        let (_tmp, ws) = workspace();

        let staging = ws.begin_staging().unwrap();
        let mut f = File::create(staging.dir().join("old.mp4")).unwrap();
        f.write_all(b"old").unwrap();
        let name = ws.publish(&staging.dir().join("old.mp4")).unwrap();
        assert_eq!(name, "old.mp4");
        drop(staging);

        let staging = ws.begin_staging().unwrap();
        File::create(staging.dir().join("new.mp4")).unwrap();
        let name = ws.publish(&staging.dir().join("new.mp4")).unwrap();
        assert_eq!(name, "new.mp4");
        drop(staging);

        // The serve area holds exactly the last published file
        assert!(ws.resolve_serve_file("new.mp4").is_some());
        assert!(ws.resolve_serve_file("old.mp4").is_none());
        let top_level: Vec<_> = fs::read_dir(ws.root())
            .unwrap()
            .flatten()
            .filter(|e| e.file_name() != STAGING_SUBDIR)
            .collect();
        assert_eq!(top_level.len(), 1);
    }

    #[test]
    fn test_output_template_targets_staging_dir() {
        let (_tmp, ws) = workspace();
        let staging = ws.begin_staging().unwrap();
        let template = staging.output_template();
        assert!(template.starts_with(staging.dir().to_str().unwrap()));
        assert!(template.ends_with("%(title)s.%(ext)s"));
    }
}
