// src/output/mod.rs
use csv::{Terminator, Writer, WriterBuilder};
use serde::Serialize;
use std::{
    fs::{self, File, OpenOptions},
    io,
    marker::PhantomData,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::error::{CampaignError, Result};
use crate::transform::{CampaignRecord, ClientRecord, EconomicsRecord, SplitRow};

/// A record type that owns one output CSV file.
pub trait OutputRow: Serialize {
    const FILE_NAME: &'static str;
    /// Column names, in serialization order.
    const HEADER: &'static [&'static str];
}

impl OutputRow for ClientRecord {
    const FILE_NAME: &'static str = "client.csv";
    const HEADER: &'static [&'static str] = &[
        "client_id",
        "age",
        "job",
        "marital",
        "education",
        "credit_default",
        "mortgage",
    ];
}

impl OutputRow for CampaignRecord {
    const FILE_NAME: &'static str = "campaign.csv";
    const HEADER: &'static [&'static str] = &[
        "client_id",
        "number_contacts",
        "contact_duration",
        "previous_campaign_contacts",
        "previous_outcome",
        "campaign_outcome",
        "last_contact_date",
    ];
}

impl OutputRow for EconomicsRecord {
    const FILE_NAME: &'static str = "economics.csv";
    const HEADER: &'static [&'static str] =
        &["client_id", "cons_price_idx", "euribor_three_months"];
}

pub const OUTPUT_FILES: [&str; 3] = [
    ClientRecord::FILE_NAME,
    CampaignRecord::FILE_NAME,
    EconomicsRecord::FILE_NAME,
];

/// Create `output_dir` if needed and delete outputs left by a previous run.
pub fn prepare_output_dir(output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir).map_err(|e| CampaignError::io(output_dir, e))?;
    for name in OUTPUT_FILES {
        let path = output_dir.join(name);
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "removed previous output"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(CampaignError::io(path, e)),
        }
    }
    Ok(())
}

/// Append-only CSV writer for one output table.
///
/// The header goes out with the first append, or on `finish` when nothing
/// was appended, so it appears exactly once ahead of all data rows.
pub struct TableWriter<T> {
    path: PathBuf,
    writer: Writer<File>,
    header_written: bool,
    rows: u64,
    _row: PhantomData<T>,
}

impl<T: OutputRow> TableWriter<T> {
    pub fn open(output_dir: &Path) -> Result<Self> {
        let path = output_dir.join(T::FILE_NAME);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| CampaignError::io(&path, e))?;
        let writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(file);

        Ok(Self {
            path,
            writer,
            header_written: false,
            rows: 0,
            _row: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn append(&mut self, row: &T) -> Result<()> {
        self.ensure_header()?;
        self.writer
            .serialize(row)
            .map_err(|e| CampaignError::csv(self.path.display().to_string(), e))?;
        self.rows += 1;
        Ok(())
    }

    /// Write the header if still pending, flush, and return the row count.
    pub fn finish(mut self) -> Result<u64> {
        self.ensure_header()?;
        self.writer
            .flush()
            .map_err(|e| CampaignError::io(&self.path, e))?;
        Ok(self.rows)
    }

    fn ensure_header(&mut self) -> Result<()> {
        if !self.header_written {
            self.writer
                .write_record(T::HEADER)
                .map_err(|e| CampaignError::csv(self.path.display().to_string(), e))?;
            self.header_written = true;
        }
        Ok(())
    }
}

/// Data-row counts per output table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub client: u64,
    pub campaign: u64,
    pub economics: u64,
}

/// The three table writers of one run.
pub struct OutputTables {
    client: TableWriter<ClientRecord>,
    campaign: TableWriter<CampaignRecord>,
    economics: TableWriter<EconomicsRecord>,
}

impl OutputTables {
    pub fn open(output_dir: &Path) -> Result<Self> {
        Ok(Self {
            client: TableWriter::open(output_dir)?,
            campaign: TableWriter::open(output_dir)?,
            economics: TableWriter::open(output_dir)?,
        })
    }

    pub fn append(&mut self, row: &SplitRow) -> Result<()> {
        self.client.append(&row.client)?;
        self.campaign.append(&row.campaign)?;
        self.economics.append(&row.economics)
    }

    pub fn finish(self) -> Result<TableCounts> {
        Ok(TableCounts {
            client: self.client.finish()?,
            campaign: self.campaign.finish()?,
            economics: self.economics.finish()?,
        })
    }
}
