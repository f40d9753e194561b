//! Directory entries: real files, favorite aliases and placeholders.

use std::fs::Metadata;
use std::os::unix::fs::{FileTypeExt, MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};
use compact_str::CompactString;
use nix::unistd::{Gid, Group, Uid, User};

use crate::marks::MarkSet;
use crate::sort::SortKey;

/// Marker inserted by [`truncate`] where characters were dropped.
pub const ELLIPSIS: char = '…';

/// Columns reserved for the size suffix in detailed formatting.
pub const SIZE_FIELD_WIDTH: usize = 5;

/// Bytes read for a file preview.
const PREVIEW_BYTES: usize = 1024;

/// Classification of a filesystem object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Regular,
    Directory,
    Symlink,
    Socket,
    Pipe,
    BlockDevice,
    CharDevice,
    Unknown,
    Missing,
}

impl EntryKind {
    /// Classify from a non-following stat and, when available, a following one.
    pub fn classify(lstat: Option<&Metadata>, stat: Option<&Metadata>) -> Self {
        let Some(lstat) = lstat else {
            return Self::Missing;
        };
        if lstat.file_type().is_symlink() {
            return Self::Symlink;
        }
        let ft = stat.unwrap_or(lstat).file_type();
        if ft.is_dir() {
            Self::Directory
        } else if ft.is_socket() {
            Self::Socket
        } else if ft.is_fifo() {
            Self::Pipe
        } else if ft.is_block_device() {
            Self::BlockDevice
        } else if ft.is_char_device() {
            Self::CharDevice
        } else if ft.is_file() {
            Self::Regular
        } else {
            Self::Unknown
        }
    }
}

/// Ordering key produced by [`Entry::sort_key`].
///
/// Variant order matters: an entry without any stat sorts first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Unknown,
    Text(u8, CompactString),
    Size(u8, u64),
    Time(SystemTime),
}

/// A real filesystem object.
#[derive(Debug, Clone)]
pub struct FileEntry {
    path: PathBuf,
    name: CompactString,
    lstat: Option<Metadata>,
    stat: Option<Metadata>,
    link_target: Option<PathBuf>,
}

impl FileEntry {
    /// Stat `path` and build an entry. Never fails; missing data stays empty.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| CompactString::from(n.to_string_lossy()))
            .unwrap_or_else(|| CompactString::from(path.to_string_lossy()));
        let mut entry = Self {
            path,
            name,
            lstat: None,
            stat: None,
            link_target: None,
        };
        entry.refresh();
        entry
    }

    /// Re-read metadata from disk.
    pub fn refresh(&mut self) {
        self.lstat = std::fs::symlink_metadata(&self.path).ok();
        self.stat = std::fs::metadata(&self.path).ok();
        self.link_target = match &self.lstat {
            Some(m) if m.file_type().is_symlink() => std::fs::read_link(&self.path).ok(),
            _ => None,
        };
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        EntryKind::classify(self.lstat.as_ref(), self.stat.as_ref())
    }

    /// Following stat, or the link itself when the target is broken.
    fn meta(&self) -> Option<&Metadata> {
        self.stat.as_ref().or(self.lstat.as_ref())
    }

    /// Whether the (followed) target is a directory.
    pub fn is_dir(&self) -> bool {
        self.stat.as_ref().is_some_and(Metadata::is_dir)
    }

    pub fn is_file(&self) -> bool {
        self.stat.as_ref().is_some_and(Metadata::is_file)
    }

    pub fn is_symlink(&self) -> bool {
        self.kind() == EntryKind::Symlink
    }

    pub fn is_executable(&self) -> bool {
        self.meta()
            .is_some_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
    }

    pub fn size(&self) -> Option<u64> {
        self.meta().map(Metadata::len)
    }

    pub fn link_count(&self) -> Option<u64> {
        self.lstat.as_ref().map(MetadataExt::nlink)
    }

    pub fn mtime(&self) -> Option<SystemTime> {
        self.meta().map(|m| unix_time(m.mtime(), m.mtime_nsec()))
    }

    pub fn owner(&self) -> Option<String> {
        let uid = self.lstat.as_ref()?.uid();
        Some(
            User::from_uid(Uid::from_raw(uid))
                .ok()
                .flatten()
                .map(|u| u.name)
                .unwrap_or_else(|| uid.to_string()),
        )
    }

    pub fn group(&self) -> Option<String> {
        let gid = self.lstat.as_ref()?.gid();
        Some(
            Group::from_gid(Gid::from_raw(gid))
                .ok()
                .flatten()
                .map(|g| g.name)
                .unwrap_or_else(|| gid.to_string()),
        )
    }

    /// One-character kind suffix.
    pub fn sigil(&self) -> &'static str {
        if self.is_symlink() {
            "@"
        } else if self.is_dir() {
            "/"
        } else if self.is_executable() {
            "*"
        } else {
            match self.kind() {
                EntryKind::Socket => "=",
                EntryKind::Pipe => "|",
                _ => "",
            }
        }
    }

    pub fn display_width(&self) -> usize {
        self.name.chars().count() + 1
    }

    pub fn format(&self, width: usize, detailed: bool) -> String {
        let label = format!("{}{}", self.name, self.sigil());
        if detailed && !self.is_dir() {
            let name_width = width.saturating_sub(SIZE_FIELD_WIDTH);
            let size = self.size().map(human_size).unwrap_or_default();
            format!(
                "{}{:>w$}",
                pad(&truncate(&label, name_width), name_width),
                size,
                w = SIZE_FIELD_WIDTH
            )
        } else {
            pad(&truncate(&label, width), width)
        }
    }

    pub fn sort_key(&self, key: SortKey) -> SortValue {
        let Some(meta) = self.meta() else {
            return SortValue::Unknown;
        };
        let files_last = u8::from(!self.is_dir());
        match key {
            SortKey::Name => SortValue::Text(files_last, self.name.clone()),
            SortKey::Extension => {
                let ext = self.name.rsplit('.').next().unwrap_or_default();
                SortValue::Text(files_last, CompactString::from(ext))
            }
            SortKey::Size => SortValue::Size(files_last, meta.len()),
            SortKey::Atime => SortValue::Time(unix_time(meta.atime(), meta.atime_nsec())),
            SortKey::Ctime => SortValue::Time(unix_time(meta.ctime(), meta.ctime_nsec())),
            SortKey::Mtime => SortValue::Time(unix_time(meta.mtime(), meta.mtime_nsec())),
        }
    }

    /// `ls -l` style line for the status bar.
    pub fn ls_l(&self) -> String {
        let Some(lstat) = &self.lstat else {
            return "-- not found --".into();
        };
        let link = self
            .link_target
            .as_ref()
            .map(|t| format!(" -> {}", t.display()))
            .unwrap_or_default();
        format!(
            "{} {} {} {} {} {} {}{}",
            mode_string(lstat.mode()),
            lstat.nlink(),
            self.owner().unwrap_or_default(),
            self.group().unwrap_or_default(),
            size_field(lstat),
            self.mtime_field(lstat),
            self.name,
            link
        )
    }

    fn mtime_field(&self, lstat: &Metadata) -> String {
        let stamp = unix_time(lstat.mtime(), lstat.mtime_nsec());
        let reference = self
            .stat
            .as_ref()
            .map(|m| unix_time(m.mtime(), m.mtime_nsec()))
            .unwrap_or(stamp);
        let now = SystemTime::now();
        let half_year = Duration::from_secs(60 * 60 * 24 * 365 / 2);
        let far = match now.duration_since(reference) {
            Ok(age) => age > half_year,
            Err(ahead) => ahead.duration() > Duration::from_secs(15 * 60),
        };
        let local: DateTime<Local> = stamp.into();
        if far {
            local.format("%b %d  %Y").to_string()
        } else {
            local.format("%b %d %H:%M").to_string()
        }
    }

    /// Short text shown in the sidebar.
    pub fn preview(&self) -> String {
        if self.is_dir() {
            match std::fs::read_dir(&self.path) {
                Ok(entries) => format!("Directory {}\n\n{} files", self.name, entries.count()),
                Err(e) => format!("Can't read {}:\n{e}", self.name),
            }
        } else if self.is_file() {
            match read_head(&self.path) {
                Ok(bytes) => bytes
                    .iter()
                    .map(|&b| {
                        if b == b'\n' || b == b' ' || b.is_ascii_graphic() {
                            b as char
                        } else {
                            '.'
                        }
                    })
                    .collect(),
                Err(e) => format!("Can't read {}:\n{e}", self.name),
            }
        } else {
            format!("No preview defined for {}.", self.name)
        }
    }
}

fn read_head(path: &Path) -> std::io::Result<Vec<u8>> {
    use std::io::Read;
    let mut buf = Vec::with_capacity(PREVIEW_BYTES);
    std::fs::File::open(path)?
        .take(PREVIEW_BYTES as u64)
        .read_to_end(&mut buf)?;
    Ok(buf)
}

/// A labeled shortcut to a path.
#[derive(Debug, Clone)]
pub struct FavoriteEntry {
    file: FileEntry,
    label: String,
}

impl FavoriteEntry {
    pub fn new(path: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            file: FileEntry::new(path),
            label: label.into(),
        }
    }

    pub fn file(&self) -> &FileEntry {
        &self.file
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Stand-in row for an empty or unreadable listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyPlaceholder {
    reason: String,
}

impl EmptyPlaceholder {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn label(&self) -> String {
        format!("-- {} --", self.reason)
    }
}

/// One row of a column.
#[derive(Debug, Clone)]
pub enum Entry {
    File(FileEntry),
    Favorite(FavoriteEntry),
    Empty(EmptyPlaceholder),
}

impl Entry {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(FileEntry::new(path))
    }

    pub fn favorite(path: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self::Favorite(FavoriteEntry::new(path, label))
    }

    pub fn empty(reason: impl Into<String>) -> Self {
        Self::Empty(EmptyPlaceholder::new(reason))
    }

    /// The underlying file, if this row refers to one.
    pub fn as_file(&self) -> Option<&FileEntry> {
        match self {
            Self::File(f) => Some(f),
            Self::Favorite(f) => Some(&f.file),
            Self::Empty(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        self.as_file().map(FileEntry::name).unwrap_or_default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.as_file().map(FileEntry::path)
    }

    pub fn kind(&self) -> EntryKind {
        self.as_file()
            .map(FileEntry::kind)
            .unwrap_or(EntryKind::Missing)
    }

    pub fn is_dir(&self) -> bool {
        self.as_file().is_some_and(FileEntry::is_dir)
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Empty(_))
    }

    pub fn is_marked(&self, marks: &MarkSet) -> bool {
        self.path().is_some_and(|p| marks.contains(p))
    }

    pub fn display_width(&self) -> usize {
        match self {
            Self::File(f) => f.display_width(),
            Self::Favorite(f) => f.label.chars().count() + 1,
            Self::Empty(_) => 0,
        }
    }

    pub fn format(&self, width: usize, detailed: bool) -> String {
        match self {
            Self::File(f) => f.format(width, detailed),
            Self::Favorite(f) => pad(&truncate(&f.label, width), width),
            Self::Empty(e) => pad(&truncate(&e.label(), width), width),
        }
    }

    pub fn sort_key(&self, key: SortKey) -> SortValue {
        self.as_file()
            .map(|f| f.sort_key(key))
            .unwrap_or(SortValue::Unknown)
    }

    pub fn ls_l(&self) -> String {
        match self {
            Self::File(f) => f.ls_l(),
            Self::Favorite(f) => f.file.ls_l(),
            Self::Empty(e) => e.label(),
        }
    }

    pub fn preview(&self) -> String {
        self.as_file().map(FileEntry::preview).unwrap_or_default()
    }
}

/// Shorten `text` to at most `width` characters, keeping both ends.
pub fn truncate(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let head = 2 * width / 3;
    let tail = (width / 3).min(width - head - 1);
    let mut out: String = text.chars().take(head).collect();
    out.push(ELLIPSIS);
    out.extend(text.chars().skip(len - tail));
    out
}

/// Left-justify `text` to `width` characters.
pub fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut out = text.to_string();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(len)));
    out
}

/// Binary-prefixed size with a truncated integer magnitude, e.g. `1K`, `3M`.
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 9] = ["B", "K", "M", "G", "T", "P", "E", "Z", "Y"];
    let mut size = bytes;
    let mut unit = 0;
    while size >= 1024 && unit < UNITS.len() - 1 {
        size /= 1024;
        unit += 1;
    }
    format!("{size}{}", UNITS[unit])
}

/// `drwxr-xr-x` style mode string.
pub fn mode_string(mode: u32) -> String {
    const TYPES: &[u8; 16] = b"0pcCd?bB-?l?s???";
    let bit = |mask: u32, c: char| if mode & mask == 0 { '-' } else { c };
    let special = |set: u32, exec: u32, on: char, off: char| {
        match (mode & set != 0, mode & exec != 0) {
            (false, false) => '-',
            (false, true) => 'x',
            (true, false) => off,
            (true, true) => on,
        }
    };
    let mut out = String::with_capacity(10);
    out.push(TYPES[((mode >> 12) & 0x0f) as usize] as char);
    out.push(bit(0o400, 'r'));
    out.push(bit(0o200, 'w'));
    out.push(special(0o4000, 0o100, 's', 'S'));
    out.push(bit(0o040, 'r'));
    out.push(bit(0o020, 'w'));
    out.push(special(0o2000, 0o010, 's', 'S'));
    out.push(bit(0o004, 'r'));
    out.push(bit(0o002, 'w'));
    out.push(special(0o1000, 0o001, 't', 'T'));
    out
}

fn size_field(lstat: &Metadata) -> String {
    let ft = lstat.file_type();
    if ft.is_block_device() || ft.is_char_device() {
        let rdev = lstat.rdev();
        format!("{:3}, {:3}", (rdev >> 8) & 0xff, rdev & 0xff)
    } else {
        human_size(lstat.len())
    }
}

fn unix_time(secs: i64, nsecs: i64) -> SystemTime {
    let nanos = Duration::from_nanos(nsecs.max(0) as u64);
    if secs >= 0 {
        UNIX_EPOCH + Duration::from_secs(secs as u64) + nanos
    } else {
        UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs()) + nanos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_truncate_keeps_ends() {
        assert_eq!(truncate("short", 10), "short");
        let t = truncate("abcdefghijklmnop", 9);
        assert_eq!(t.chars().count(), 9);
        assert!(t.starts_with("abcdef"));
        assert!(t.ends_with("op"));
        assert!(t.contains(ELLIPSIS));
    }

    #[test]
    fn test_truncate_never_exceeds_width() {
        let name = "a-rather-long-file-name-with-many-characters.tar.gz";
        for width in 4..name.len() {
            assert!(truncate(name, width).chars().count() <= width, "width {width}");
        }
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0B");
        assert_eq!(human_size(1023), "1023B");
        assert_eq!(human_size(1536), "1K");
        assert_eq!(human_size(5 * 1024 * 1024 + 1), "5M");
        assert_eq!(human_size(16 * (1 << 50) - 1), "15P");
        assert_eq!(human_size(u64::MAX), "15E");
    }

    #[test]
    fn test_mode_string() {
        assert_eq!(mode_string(0o040755), "drwxr-xr-x");
        assert_eq!(mode_string(0o100644), "-rw-r--r--");
        assert_eq!(mode_string(0o104755), "-rwsr-xr-x");
        assert_eq!(mode_string(0o041777), "drwxrwxrwt");
        assert_eq!(mode_string(0o120777), "lrwxrwxrwx");
    }

    #[test]
    fn test_classify_and_sigils() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("dir")).unwrap();
        fs::write(root.join("plain"), "x").unwrap();
        fs::write(root.join("script"), "#!/bin/sh").unwrap();
        fs::set_permissions(root.join("script"), fs::Permissions::from_mode(0o755)).unwrap();
        std::os::unix::fs::symlink(root.join("nowhere"), root.join("broken")).unwrap();

        let dir = FileEntry::new(root.join("dir"));
        assert_eq!(dir.kind(), EntryKind::Directory);
        assert_eq!(dir.sigil(), "/");

        let plain = FileEntry::new(root.join("plain"));
        assert_eq!(plain.kind(), EntryKind::Regular);
        assert_eq!(plain.sigil(), "");

        assert_eq!(FileEntry::new(root.join("script")).sigil(), "*");

        let broken = FileEntry::new(root.join("broken"));
        assert_eq!(broken.kind(), EntryKind::Symlink);
        assert_eq!(broken.sigil(), "@");
        assert!(!broken.is_dir());
        assert!(broken.ls_l().ends_with(&format!("-> {}", root.join("nowhere").display())));

        let missing = FileEntry::new(root.join("gone"));
        assert_eq!(missing.kind(), EntryKind::Missing);
        assert_eq!(missing.ls_l(), "-- not found --");
        assert_eq!(missing.sort_key(SortKey::Name), SortValue::Unknown);
    }

    #[test]
    fn test_format_detailed_reserves_size_field() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("data.bin"), vec![0u8; 2048]).unwrap();
        let entry = FileEntry::new(temp.path().join("data.bin"));

        let plain = entry.format(12, false);
        assert_eq!(plain, "data.bin    ");

        let detailed = entry.format(16, true);
        assert_eq!(detailed.chars().count(), 16);
        assert!(detailed.starts_with("data.bin"));
        assert!(detailed.ends_with("   2K"));
    }

    #[test]
    fn test_directories_sort_first_for_name() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("zzz")).unwrap();
        fs::write(temp.path().join("aaa"), "").unwrap();
        let dir = FileEntry::new(temp.path().join("zzz"));
        let file = FileEntry::new(temp.path().join("aaa"));
        assert!(dir.sort_key(SortKey::Name) < file.sort_key(SortKey::Name));
        assert!(dir.sort_key(SortKey::Size) < file.sort_key(SortKey::Size));
    }

    #[test]
    fn test_placeholder_is_inert() {
        let empty = Entry::empty("empty");
        let marks = MarkSet::new();
        assert!(empty.is_placeholder());
        assert!(empty.path().is_none());
        assert!(!empty.is_marked(&marks));
        assert_eq!(empty.display_width(), 0);
        assert_eq!(empty.format(12, true), "-- empty -- ");
    }

    #[test]
    fn test_preview_replaces_binary() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("f"), b"hi\x00there\n").unwrap();
        let entry = FileEntry::new(temp.path().join("f"));
        assert_eq!(entry.preview(), "hi.there\n");
    }
}
