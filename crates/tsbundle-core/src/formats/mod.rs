//! Container format implementations.

pub mod detect;
pub mod tar;
pub mod traits;
pub mod zip;

// Re-export main types for convenience
pub use detect::ContainerKind;
pub use detect::Detection;
pub use tar::TarGzContainer;
pub use traits::ContainerFormat;
pub use zip::ZipContainer;
