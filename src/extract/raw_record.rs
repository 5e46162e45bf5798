use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use std::io::Read;

use crate::error::{CampaignError, Result};

/// Columns every raw extract must carry, in `RawRecord` field order.
pub const RAW_COLUMNS: [&str; 16] = [
    "client_id",
    "age",
    "job",
    "marital",
    "education",
    "credit_default",
    "mortgage",
    "number_contacts",
    "contact_duration",
    "previous_campaign_contacts",
    "previous_outcome",
    "campaign_outcome",
    "day",
    "month",
    "cons_price_idx",
    "euribor_three_months",
];

/// One row of a campaign extract, exactly as it appears in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub client_id: String,
    pub age: String,
    pub job: String,
    pub marital: String,
    pub education: String,
    pub credit_default: String,
    pub mortgage: String,
    pub number_contacts: String,
    pub contact_duration: String,
    pub previous_campaign_contacts: String,
    pub previous_outcome: String,
    pub campaign_outcome: String,
    pub day: String,
    pub month: String,
    pub cons_price_idx: String,
    pub euribor_three_months: String,
}

/// Position of each `RAW_COLUMNS` name within a file's header.
#[derive(Debug, Clone, Copy)]
struct ColumnMap([usize; RAW_COLUMNS.len()]);

impl ColumnMap {
    fn from_headers(headers: &StringRecord, entry: &str) -> Result<Self> {
        let mut positions = [0usize; RAW_COLUMNS.len()];
        for (slot, column) in positions.iter_mut().zip(RAW_COLUMNS) {
            *slot = headers.iter().position(|h| h == column).ok_or_else(|| {
                CampaignError::SchemaMismatch {
                    entry: entry.to_string(),
                    column,
                }
            })?;
        }
        Ok(ColumnMap(positions))
    }

    fn project(&self, record: &StringRecord) -> RawRecord {
        let field = |i: usize| record.get(self.0[i]).unwrap_or_default().to_string();
        RawRecord {
            client_id: field(0),
            age: field(1),
            job: field(2),
            marital: field(3),
            education: field(4),
            credit_default: field(5),
            mortgage: field(6),
            number_contacts: field(7),
            contact_duration: field(8),
            previous_campaign_contacts: field(9),
            previous_outcome: field(10),
            campaign_outcome: field(11),
            day: field(12),
            month: field(13),
            cons_price_idx: field(14),
            euribor_three_months: field(15),
        }
    }
}

/// Lazy, single-pass sequence of raw records read from one CSV stream.
///
/// The header is validated up front, so a missing column surfaces before any
/// row of the entry is yielded.
pub struct RawRecords<R> {
    entry: String,
    columns: ColumnMap,
    records: StringRecordsIntoIter<R>,
    last_line: u64,
}

impl<R: Read> RawRecords<R> {
    pub fn new(reader: R, entry: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = rdr
            .headers()
            .map_err(|e| CampaignError::csv(entry, e))?
            .clone();
        let columns = ColumnMap::from_headers(&headers, entry)?;

        Ok(Self {
            entry: entry.to_string(),
            columns,
            records: rdr.into_records(),
            last_line: 1,
        })
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Source line of the record most recently yielded.
    pub fn last_line(&self) -> u64 {
        self.last_line
    }
}

impl<R: Read> Iterator for RawRecords<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(CampaignError::csv(self.entry.clone(), e))),
        };
        if let Some(pos) = record.position() {
            self.last_line = pos.line();
        }
        Some(Ok(self.columns.project(&record)))
    }
}
