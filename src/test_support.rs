//! Fixture builders shared by the in-module tests.
use anyhow::Result;
use std::{fs::File, io::Write, path::Path};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

pub const HEADER: &str = "client_id,age,job,marital,education,credit_default,mortgage,\
number_contacts,contact_duration,previous_campaign_contacts,previous_outcome,\
campaign_outcome,day,month,cons_price_idx,euribor_three_months\n";

pub fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,campaign_extract=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Write a ZIP at `path`; names ending in `/` become directory entries.
pub fn write_zip(path: &Path, entries: &[(&str, &str)]) -> Result<()> {
    let mut zip = ZipWriter::new(File::create(path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, content) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options)?;
        } else {
            zip.start_file(*name, options)?;
            zip.write_all(content.as_bytes())?;
        }
    }
    zip.finish()?;
    Ok(())
}

/// Header plus `rows`, one CSV line each.
pub fn campaign_csv(rows: &[&str]) -> String {
    let mut out = String::from(HEADER);
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    out
}
