//! Test utilities for building in-memory containers.
//!
//! This module provides reusable helpers for creating zip and gzip-tar
//! archives and nested bundles, shared by unit tests, integration tests and
//! the CLI tests.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

/// Creates an in-memory TAR archive from a list of entries.
///
/// Each entry is a tuple of (path, content). Files are created with mode 0o644.
///
/// # Examples
///
/// ```
/// use tsbundle_core::test_utils::create_test_tar;
///
/// let tar_data = create_test_tar(vec![("file.txt", b"hello"), ("dir/nested.txt", b"world")]);
/// ```
#[must_use]
pub fn create_test_tar(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    entries
        .into_iter()
        .fold(TarTestBuilder::new(), |builder, (path, data)| {
            builder.add_file(path, data)
        })
        .build()
}

/// Creates an in-memory gzip-compressed TAR archive.
///
/// # Examples
///
/// ```
/// use tsbundle_core::test_utils::create_test_tar_gz;
///
/// let data = create_test_tar_gz(vec![("backup/msc_audit.json", b"{}")]);
/// assert_eq!(&data[..2], &[0x1f, 0x8b]);
/// ```
#[must_use]
pub fn create_test_tar_gz(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    gzip(&create_test_tar(entries))
}

/// Creates an in-memory ZIP archive from a list of entries.
///
/// Each entry is a tuple of (path, content). Files are stored uncompressed.
///
/// # Examples
///
/// ```
/// use tsbundle_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(vec![("file.txt", b"hello"), ("dir/nested.txt", b"world")]);
/// ```
#[must_use]
pub fn create_test_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    entries
        .into_iter()
        .fold(ZipTestBuilder::new(), |builder, (path, data)| {
            builder.add_file(path, data)
        })
        .build()
}

/// Gzip-compresses a byte buffer.
#[must_use]
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Builder for creating TAR test archives.
///
/// # Examples
///
/// ```
/// use tsbundle_core::test_utils::TarTestBuilder;
///
/// let tar_data = TarTestBuilder::new()
///     .add_file("file.txt", b"content")
///     .add_directory("dir/")
///     .build();
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates a new TAR test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file to the archive.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    /// Adds a regular file whose name is written into the header as-is.
    ///
    /// Unlike [`add_file`](Self::add_file) this accepts `..` components,
    /// producing the kind of entry a hostile or sloppy archiver would.
    /// The name must fit the 100-byte legacy name field.
    #[must_use]
    pub fn add_file_unchecked(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        let name = path.as_bytes();
        header.as_old_mut().name[..name.len()].copy_from_slice(name);
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        self.builder.append(&header, data).unwrap();
        self
    }

    /// Adds a symbolic link pointing at `target`.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o777);
        header.set_entry_type(tar::EntryType::Symlink);
        self.builder.append_link(&mut header, path, target).unwrap();
        self
    }

    /// Adds a directory to the archive.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o755);
        header.set_entry_type(tar::EntryType::Directory);
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Builds and returns the TAR archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }

    /// Builds and returns the archive gzip-compressed.
    #[must_use]
    pub fn build_gz(self) -> Vec<u8> {
        gzip(&self.build())
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating ZIP test archives.
///
/// # Examples
///
/// ```
/// use tsbundle_core::test_utils::ZipTestBuilder;
///
/// let zip_data = ZipTestBuilder::new()
///     .add_file("file.txt", b"content")
///     .add_directory("dir/")
///     .build();
/// ```
pub struct ZipTestBuilder {
    zip: zip::ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Creates a new ZIP test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: zip::ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a regular file to the archive.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        use zip::write::SimpleFileOptions;

        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .unix_permissions(0o644);

        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a deflate-compressed file to the archive.
    #[must_use]
    pub fn add_deflated_file(mut self, path: &str, data: &[u8]) -> Self {
        use zip::write::SimpleFileOptions;

        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a directory to the archive.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        use zip::write::SimpleFileOptions;

        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(path, options).unwrap();
        self
    }

    /// Builds and returns the ZIP archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a tech-support style bundle: an outer zip holding one gzip-tar
/// per database dump, each carrying record files under
/// `<name>_temp/backup/`.
///
/// `dumps` is a list of (dump name, [(record file name, content)]). A dump
/// named `msc-db-json-1` is stored as `msc-db-json-1_temp.tar.gz` and its
/// records land in `msc-db-json-1_temp/msc-db-json-1_temp/backup/` once
/// the bundle is expanded.
///
/// # Examples
///
/// ```
/// use tsbundle_core::test_utils::create_test_bundle;
///
/// let bundle = create_test_bundle(&[("msc-db-json-1", &[("msc_versions.json", b"{}")])]);
/// assert_eq!(&bundle[..2], b"PK");
/// ```
#[must_use]
pub fn create_test_bundle(dumps: &[(&str, &[(&str, &[u8])])]) -> Vec<u8> {
    let mut outer = ZipTestBuilder::new();
    for (dump, files) in dumps {
        let inner_dir = format!("{dump}_temp");
        let mut tar = TarTestBuilder::new();
        for (name, data) in *files {
            tar = tar.add_file(&format!("{inner_dir}/backup/{name}"), data);
        }
        outer = outer.add_file(&format!("{inner_dir}.tar.gz"), &tar.build_gz());
    }
    outer.build()
}
