//! Common trait for container format handlers.

use std::path::Path;

use crate::ExpandConfig;
use crate::Result;
use crate::UnpackReport;

/// Trait for container format handlers.
pub trait ContainerFormat {
    /// Writes every member of the container under `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the container is corrupt or a member cannot be
    /// written.
    fn unpack(&mut self, output_dir: &Path, config: &ExpandConfig) -> Result<UnpackReport>;

    /// Returns the container format name.
    fn format_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestFormat;

    impl ContainerFormat for TestFormat {
        fn unpack(&mut self, _output_dir: &Path, _config: &ExpandConfig) -> Result<UnpackReport> {
            Ok(UnpackReport::new())
        }

        fn format_name(&self) -> &str {
            "test"
        }
    }

    #[test]
    fn test_trait_implementation() {
        let mut format = TestFormat;
        assert_eq!(format.format_name(), "test");
        let report = format
            .unpack(Path::new("unused"), &ExpandConfig::default())
            .ok();
        assert!(report.is_some_and(|r| r.files_extracted == 0));
    }
}
