// src/extract/mod.rs
pub mod raw_record;

pub use raw_record::{RawRecord, RawRecords, RAW_COLUMNS};

use glob::{glob, Pattern};
use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};
use tracing::debug;
use zip::ZipArchive;

use crate::error::{CampaignError, Result};

/// List every `*.zip` file directly under `input_dir`, sorted by path.
pub fn discover_archives(input_dir: &Path) -> Result<Vec<PathBuf>> {
    if !input_dir.is_dir() {
        return Err(CampaignError::io(
            input_dir,
            io::Error::new(io::ErrorKind::NotFound, "input directory not found"),
        ));
    }

    let pattern = format!(
        "{}/*.zip",
        Pattern::escape(&input_dir.to_string_lossy())
    );
    let mut archives = Vec::new();
    for entry in glob(&pattern)? {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            CampaignError::io(path, e.into_error())
        })?;
        if path.is_file() {
            archives.push(path);
        } else {
            debug!(path = %path.display(), "skipping non-file");
        }
    }
    archives.sort();
    Ok(archives)
}

/// An open ZIP container; dropped (and its handle closed) once processed.
pub struct Archive {
    path: PathBuf,
    inner: ZipArchive<File>,
}

impl Archive {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| CampaignError::io(path, e))?;
        let inner = ZipArchive::new(file).map_err(|source| CampaignError::Archive {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entry names in sorted order, directories excluded.
    pub fn entry_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .file_names()
            .filter(|n| !n.ends_with('/'))
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }

    /// Open entry `name` and stream its rows.
    pub fn records(&mut self, name: &str) -> Result<RawRecords<impl Read + '_>> {
        let entry = self
            .inner
            .by_name(name)
            .map_err(|source| CampaignError::Archive {
                path: self.path.join(name),
                source,
            })?;
        RawRecords::new(entry, name)
    }
}
