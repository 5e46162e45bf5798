use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort an extraction run.
#[derive(Error, Debug)]
pub enum CampaignError {
    /// A raw table is missing one of the columns the derivations read.
    #[error("{entry}: missing required column `{column}`")]
    SchemaMismatch { entry: String, column: &'static str },

    /// A row's `day`/`month` do not form a valid 2022 calendar date.
    #[error("{archive}!{entry} line {line}: {source}")]
    DateParsing {
        archive: PathBuf,
        entry: String,
        line: u64,
        #[source]
        source: InvalidDate,
    },

    /// A file or directory could not be read, created or removed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A ZIP container (or one of its entries) could not be read.
    #[error("failed to read archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// Reading or writing CSV failed.
    #[error("CSV error in {location}: {source}")]
    Csv {
        location: String,
        #[source]
        source: csv::Error,
    },

    #[error("invalid archive pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Day/month pair that names no calendar day.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid contact date: day `{day}`, month `{month}`")]
pub struct InvalidDate {
    pub day: String,
    pub month: String,
}

impl CampaignError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CampaignError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(location: impl Into<String>, source: csv::Error) -> Self {
        CampaignError::Csv {
            location: location.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CampaignError>;
