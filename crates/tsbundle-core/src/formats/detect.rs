//! Container format detection.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;

/// ZIP local file header signature.
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// ZIP end-of-central-directory signature (an archive with no members).
const ZIP_EMPTY_MAGIC: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];

/// Gzip member header.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Suffixes recognized as containers, longest first.
const SUFFIXES: [(&str, ContainerKind); 3] = [
    (".tar.gz", ContainerKind::TarGz),
    (".tgz", ContainerKind::TarGz),
    (".zip", ContainerKind::Zip),
];

/// Supported container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// ZIP archive.
    Zip,
    /// Gzip-compressed tar archive.
    TarGz,
}

impl ContainerKind {
    /// Classifies a path by its archive suffix (ASCII case-insensitive).
    ///
    /// Returns `None` when the file name carries no recognized suffix or
    /// nothing remains once the suffix is removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use tsbundle_core::formats::ContainerKind;
    ///
    /// assert_eq!(ContainerKind::from_path(Path::new("ts.zip")), Some(ContainerKind::Zip));
    /// assert_eq!(ContainerKind::from_path(Path::new("db.TAR.GZ")), Some(ContainerKind::TarGz));
    /// assert_eq!(ContainerKind::from_path(Path::new("notes.txt")), None);
    /// ```
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        split_suffix(path).map(|(_, kind)| kind)
    }

    /// Identifies a container from its leading bytes.
    #[must_use]
    pub fn sniff(header: &[u8]) -> Option<Self> {
        if header.starts_with(&ZIP_MAGIC) || header.starts_with(&ZIP_EMPTY_MAGIC) {
            Some(Self::Zip)
        } else if header.starts_with(&GZIP_MAGIC) {
            Some(Self::TarGz)
        } else {
            None
        }
    }

    /// Returns a human-readable name for this format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
        }
    }
}

/// Result of inspecting a container on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Format the content will be read as.
    pub kind: ContainerKind,
    /// Format implied by the file name.
    pub named_kind: ContainerKind,
    /// Directory the container extracts into.
    pub extraction_dir: PathBuf,
}

impl Detection {
    /// Returns `true` when the content disagrees with the file name.
    #[must_use]
    pub fn is_mismatch(&self) -> bool {
        self.kind != self.named_kind
    }
}

/// Inspects a container: suffix names it, leading bytes decide the reader.
///
/// # Errors
///
/// Returns `UnsupportedFormat` if the path has no archive suffix,
/// `InvalidArchive` if the content is neither zip nor gzip, and `Io` if the
/// file cannot be read.
pub fn detect(path: &Path) -> Result<Detection> {
    let (stem, named_kind) = split_suffix(path).ok_or_else(|| ExtractionError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let mut header = [0u8; 4];
    let mut file = File::open(path)?;
    let read = read_prefix(&mut file, &mut header)?;

    let kind = ContainerKind::sniff(&header[..read]).ok_or_else(|| {
        ExtractionError::InvalidArchive(format!(
            "{} is neither a zip nor a gzip stream",
            path.display()
        ))
    })?;

    Ok(Detection {
        kind,
        named_kind,
        extraction_dir: path.with_file_name(stem),
    })
}

/// Returns the directory a container extracts into: its file name with the
/// archive suffix removed, next to the container.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tsbundle_core::formats::detect::extraction_dir;
///
/// assert_eq!(
///     extraction_dir(Path::new("/tmp/ts/node1.tar.gz")).unwrap(),
///     Path::new("/tmp/ts/node1")
/// );
/// assert!(extraction_dir(Path::new("readme.md")).is_none());
/// ```
#[must_use]
pub fn extraction_dir(path: &Path) -> Option<PathBuf> {
    split_suffix(path).map(|(stem, _)| path.with_file_name(stem))
}

fn split_suffix(path: &Path) -> Option<(String, ContainerKind)> {
    let name = path.file_name()?.to_str()?;
    SUFFIXES.iter().find_map(|(suffix, kind)| {
        let cut = name.len().checked_sub(suffix.len())?;
        let tail = name.get(cut..)?;
        (cut > 0 && tail.eq_ignore_ascii_case(suffix)).then(|| (name[..cut].to_string(), *kind))
    })
}

fn read_prefix(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}
