use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use sp_core::IntoIoError;
use zip::ZipArchive;

use crate::ArchiveError;

/// A file in an [`Archive`]. Nothing is decompressed
/// until [`Archive::read`] is called with its index.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub index: usize,
    /// Name with any leading `./` or `/` removed.
    pub name: String,
    /// Uncompressed size in bytes.
    pub size: u64,
}

/// A zip container (jar, zip, mcdr, pyz) opened for random access.
pub struct Archive {
    path: PathBuf,
    zip: ZipArchive<BufReader<File>>,
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    /// Opens `path` and reads its central directory.
    ///
    /// # Errors
    /// If the file can't be opened or isn't a valid zip.
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let file = File::open(path).path(path)?;
        let mut zip = ZipArchive::new(BufReader::new(file)).map_err(|error| ArchiveError::Zip {
            error,
            path: path.to_owned(),
        })?;

        let mut entries = Vec::with_capacity(zip.len());
        for index in 0..zip.len() {
            let file = zip.by_index_raw(index).map_err(|error| ArchiveError::Zip {
                error,
                path: path.to_owned(),
            })?;
            if file.is_dir() {
                continue;
            }
            entries.push(ArchiveEntry {
                index,
                name: normalize_entry_name(file.name()).to_owned(),
                size: file.size(),
            });
        }

        Ok(Self {
            path: path.to_owned(),
            zip,
            entries,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every file entry, in central directory order.
    #[must_use]
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Indices of all entries named `name`, in order.
    ///
    /// Usually zero or one, but nothing stops a
    /// zip from containing both `a` and `./a`.
    #[must_use]
    pub fn indices_of(&self, name: &str) -> Vec<usize> {
        self.entries
            .iter()
            .filter(|n| n.name == name)
            .map(|n| n.index)
            .collect()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|n| n.name == name)
    }

    /// Reads the whole entry at `index` into memory.
    ///
    /// # Errors
    /// If the entry is corrupt or can't be decompressed.
    pub fn read(&mut self, index: usize) -> Result<Vec<u8>, ArchiveError> {
        let mut file = self.zip.by_index(index).map_err(|error| ArchiveError::Zip {
            error,
            path: self.path.clone(),
        })?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .map_err(|error| ArchiveError::Entry {
                error,
                name: file.name().to_owned(),
                path: self.path.clone(),
            })?;
        Ok(buf)
    }

    /// Like [`Archive::read`], replacing invalid UTF-8.
    pub fn read_string(&mut self, index: usize) -> Result<String, ArchiveError> {
        let bytes = self.read(index)?;
        Ok(match String::from_utf8(bytes) {
            Ok(n) => n,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        })
    }

    /// Reads the first entry named `name`, if there is one.
    pub fn read_named(&mut self, name: &str) -> Result<Option<String>, ArchiveError> {
        match self.indices_of(name).first() {
            Some(index) => self.read_string(*index).map(Some),
            None => Ok(None),
        }
    }
}

fn normalize_entry_name(name: &str) -> &str {
    let mut name = name;
    loop {
        if let Some(n) = name.strip_prefix("./") {
            name = n;
        } else if let Some(n) = name.strip_prefix('/') {
            name = n;
        } else {
            return name;
        }
    }
}
