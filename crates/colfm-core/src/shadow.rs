//! Virtual filesystem overlays that expose files as browsable directories.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Reports a navigable shadow directory for a non-directory path.
pub trait ShadowFs {
    fn shadow(&self, path: &Path) -> Option<PathBuf>;
}

/// No overlay: nothing has a shadow.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShadow;

impl ShadowFs for NoShadow {
    fn shadow(&self, _path: &Path) -> Option<PathBuf> {
        None
    }
}

/// An AVFS mount: `<root>/<absolute path>#` is the archive's contents.
#[derive(Debug, Clone)]
pub struct AvfsShadow {
    root: PathBuf,
}

impl AvfsShadow {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Where the shadow of `path` would live under the mount.
    pub fn shadow_path(&self, path: &Path) -> PathBuf {
        let relative = path.strip_prefix("/").unwrap_or(path);
        let mut shadow = OsString::from(self.root.join(relative));
        shadow.push("#");
        PathBuf::from(shadow)
    }
}

impl ShadowFs for AvfsShadow {
    fn shadow(&self, path: &Path) -> Option<PathBuf> {
        if path.starts_with(&self.root) {
            return None;
        }
        let shadow = self.shadow_path(path);
        shadow.is_dir().then_some(shadow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_avfs_shadow_path() {
        let avfs = AvfsShadow::new("/home/u/.avfs");
        assert_eq!(
            avfs.shadow_path(Path::new("/tmp/a.zip")),
            PathBuf::from("/home/u/.avfs/tmp/a.zip#")
        );
    }

    #[test]
    fn test_avfs_requires_mounted_directory() {
        let mount = TempDir::new().unwrap();
        let avfs = AvfsShadow::new(mount.path());
        assert!(avfs.shadow(Path::new("/srv/x.tar")).is_none());

        std::fs::create_dir_all(mount.path().join("srv/x.tar#")).unwrap();
        assert_eq!(
            avfs.shadow(Path::new("/srv/x.tar")),
            Some(mount.path().join("srv/x.tar#"))
        );
        assert!(NoShadow.shadow(Path::new("/srv/x.tar")).is_none());
    }
}
