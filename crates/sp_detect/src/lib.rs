//! Working out what's installed in a Minecraft server directory.
//!
//! - [`Archive`]: read-only view of a jar/zip
//! - [`detectors`]: recognizing executables, mods/plugins
//!   and the surrounding environment
//! - [`Registry`]: runs the detectors and resolves ambiguity
//! - [`Scanner`]: walks directories and runs the registry concurrently

mod archive;
pub mod detectors;
mod environment;
mod error;
mod executable;
mod registry;
mod scanner;
pub mod text;

pub use archive::{Archive, ArchiveEntry};
pub use environment::{EnvironmentInfo, McdrEnvironment, ServerProperties};
pub use error::{ArchiveError, DetectError};
pub use executable::ExecutableInfo;
pub use registry::Registry;
pub use scanner::{ScanReport, Scanner};

#[cfg(test)]
pub(crate) mod test_utils {
    use std::{io::Write, path::Path, path::PathBuf};

    use zip::{write::FileOptions, ZipWriter};

    /// Writes a zip with the given `(name, contents)`
    /// entries, in order, to `dir/name`.
    pub fn write_zip(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
        let path = dir.join(name);
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = ZipWriter::new(file);
        for (entry, contents) in entries {
            zip.start_file(*entry, FileOptions::<()>::default()).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        path
    }
}
