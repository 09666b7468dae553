//! High-level public API for unpacking and expanding bundles.

use std::fs;
use std::path::Path;
use std::time::Instant;

use log::debug;
use log::warn;

use crate::ExpandConfig;
use crate::ExpansionReport;
use crate::ProgressCallback;
use crate::Result;
use crate::UnpackedContainer;
use crate::expand::Expander;
use crate::formats::ContainerFormat;
use crate::formats::ContainerKind;
use crate::formats::TarGzContainer;
use crate::formats::ZipContainer;
use crate::formats::detect::detect;

/// Unpacks one container into its extraction directory.
///
/// The directory is the container's path with the archive suffix removed
/// (`node.tar.gz` → `node/`). It is created if missing and reused if it
/// already exists; members with the same name are overwritten. The format
/// implied by the suffix is checked against the file's leading bytes and the
/// content wins on disagreement.
///
/// # Errors
///
/// Returns an error if:
/// - The path has no recognized container suffix
/// - The file cannot be read or is neither zip nor gzip
/// - The archive is corrupt
/// - Writing a member fails
///
/// # Examples
///
/// ```no_run
/// use tsbundle_core::ExpandConfig;
/// use tsbundle_core::unpack;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let unpacked = unpack("ts-bundle.zip", &ExpandConfig::default())?;
/// println!("{} files in {}", unpacked.report.files_extracted, unpacked.extraction_dir.display());
/// # Ok(())
/// # }
/// ```
pub fn unpack<P: AsRef<Path>>(
    container_path: P,
    config: &ExpandConfig,
) -> Result<UnpackedContainer> {
    let path = container_path.as_ref();
    let detection = detect(path)?;
    fs::create_dir_all(&detection.extraction_dir)?;

    let mut report = match detection.kind {
        ContainerKind::Zip => ZipContainer::open(path)?.unpack(&detection.extraction_dir, config)?,
        ContainerKind::TarGz => {
            TarGzContainer::open(path)?.unpack(&detection.extraction_dir, config)?
        }
    };

    if detection.is_mismatch() {
        warn!(
            "{} is named {} but holds {}",
            path.display(),
            detection.named_kind.name(),
            detection.kind.name()
        );
        report.add_warning(format!(
            "named {} but read as {}",
            detection.named_kind.name(),
            detection.kind.name()
        ));
    }

    debug!(
        "unpacked {} ({}): {} files, {} directories",
        path.display(),
        detection.kind.name(),
        report.files_extracted,
        report.directories_created
    );

    Ok(UnpackedContainer {
        path: path.to_path_buf(),
        kind: detection.kind,
        extraction_dir: detection.extraction_dir,
        report,
    })
}

/// Unpacks a top-level bundle and every container nested inside it.
///
/// A failure on the bundle itself is returned as an error. Failures on
/// nested containers are recorded in the report and expansion continues.
///
/// # Errors
///
/// Returns an error if the top-level bundle cannot be unpacked.
///
/// # Examples
///
/// ```no_run
/// use tsbundle_core::ExpandConfig;
/// use tsbundle_core::NoopProgress;
/// use tsbundle_core::expand_bundle;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = expand_bundle("ts-bundle.zip", &ExpandConfig::default(), &mut NoopProgress)?;
/// println!("{} containers unpacked", report.containers_unpacked);
/// # Ok(())
/// # }
/// ```
pub fn expand_bundle<P: AsRef<Path>>(
    bundle_path: P,
    config: &ExpandConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<ExpansionReport> {
    let start = Instant::now();
    let path = bundle_path.as_ref();

    progress.on_container_start(path, 0);
    let top = unpack(path, config)?;
    progress.on_container_complete(path, top.report.files_extracted);

    let mut expander = Expander::new(config, progress);
    expander.mark_visited(path);
    expander.report_mut().record(&top, 0);
    expander.walk(&top.extraction_dir, 0);

    let mut report = expander.finish();
    report.root = Some(top.extraction_dir);
    report.duration = start.elapsed();
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ExtractionError;
    use crate::NoopProgress;
    use crate::test_utils::TarTestBuilder;
    use crate::test_utils::create_test_bundle;
    use crate::test_utils::create_test_zip;
    use tempfile::TempDir;

    #[test]
    fn test_unpack_zip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bundle.zip");
        fs::write(&path, create_test_zip(vec![("a/b.txt", b"b")])).unwrap();

        let unpacked = unpack(&path, &ExpandConfig::default()).unwrap();

        assert_eq!(unpacked.kind, ContainerKind::Zip);
        assert_eq!(unpacked.extraction_dir, temp.path().join("bundle"));
        assert_eq!(unpacked.report.files_extracted, 1);
        assert!(temp.path().join("bundle/a/b.txt").is_file());
    }

    #[test]
    fn test_unpack_reuses_existing_dir() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bundle.zip");
        fs::create_dir(temp.path().join("bundle")).unwrap();
        fs::write(temp.path().join("bundle/keep.txt"), "kept").unwrap();
        fs::write(&path, create_test_zip(vec![("new.txt", b"n")])).unwrap();

        unpack(&path, &ExpandConfig::default()).unwrap();

        assert!(temp.path().join("bundle/keep.txt").is_file());
        assert!(temp.path().join("bundle/new.txt").is_file());
    }

    #[test]
    fn test_unpack_mislabeled_tar_gz() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("really-a-tarball.zip");
        let data = TarTestBuilder::new().add_file("f.txt", b"f").build_gz();
        fs::write(&path, data).unwrap();

        let unpacked = unpack(&path, &ExpandConfig::default()).unwrap();

        assert_eq!(unpacked.kind, ContainerKind::TarGz);
        assert!(unpacked.report.has_warnings());
        assert!(temp.path().join("really-a-tarball/f.txt").is_file());
    }

    #[test]
    fn test_unpack_unsupported_suffix() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bundle.7z");
        fs::write(&path, b"7z").unwrap();

        assert!(matches!(
            unpack(&path, &ExpandConfig::default()),
            Err(ExtractionError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_expand_bundle() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ts.zip");
        let bundle = create_test_bundle(&[
            ("msc-db-json-1", &[("msc_versions.json", b"{}")]),
            ("msc-db-json-2", &[("msc_audit.json", b"{}")]),
        ]);
        fs::write(&path, bundle).unwrap();

        let report = expand_bundle(&path, &ExpandConfig::default(), &mut NoopProgress).unwrap();

        assert_eq!(report.root, Some(temp.path().join("ts")));
        assert_eq!(report.containers_unpacked, 3);
        assert_eq!(report.max_depth_reached, 1);
        assert!(!report.has_failures());
        assert!(
            temp.path()
                .join("ts/msc-db-json-1_temp/msc-db-json-1_temp/backup/msc_versions.json")
                .is_file()
        );
    }

    #[test]
    fn test_expand_bundle_missing_is_fatal() {
        let temp = TempDir::new().unwrap();
        let result = expand_bundle(
            temp.path().join("absent.zip"),
            &ExpandConfig::default(),
            &mut NoopProgress,
        );
        assert!(matches!(result, Err(ExtractionError::Io(_))));
    }

    #[test]
    fn test_expand_bundle_corrupt_is_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.zip");
        fs::write(&path, b"PK\x03\x04 truncated").unwrap();

        let result = expand_bundle(&path, &ExpandConfig::default(), &mut NoopProgress);
        assert!(matches!(result, Err(ExtractionError::InvalidArchive(_))));
    }
}
