// src/pipeline.rs
use serde::Serialize;
use std::{path::Path, time::Instant};
use tracing::{debug, error, info, instrument};

use crate::error::{CampaignError, Result};
use crate::extract::{discover_archives, Archive};
use crate::output::{prepare_output_dir, OutputTables, TableCounts};
use crate::transform::split_row;

/// What a completed run processed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub archives: usize,
    pub entries: usize,
    pub rows: u64,
    pub tables: TableCounts,
}

/// Split every archive under `input_dir` into `client.csv`, `campaign.csv`
/// and `economics.csv` under `output_dir`.
///
/// Outputs from earlier runs are removed first. Archives and their entries
/// are processed in name order, and any error aborts the run; rows from
/// entries handled before the failure stay in the output files.
#[instrument(level = "info", skip_all, fields(input = %input_dir.display(), output = %output_dir.display()))]
pub fn run(input_dir: &Path, output_dir: &Path) -> Result<RunSummary> {
    let start = Instant::now();

    prepare_output_dir(output_dir)?;
    let archives = discover_archives(input_dir)?;
    info!("{} archives to process", archives.len());

    let mut tables = OutputTables::open(output_dir)?;
    let mut summary = RunSummary::default();

    for path in &archives {
        let (entries, rows) = process_archive(path, &mut tables)?;
        summary.archives += 1;
        summary.entries += entries;
        summary.rows += rows;
    }

    summary.tables = tables.finish()?;
    info!(
        rows = summary.rows,
        elapsed = ?start.elapsed(),
        "wrote {} archives",
        summary.archives
    );
    Ok(summary)
}

/// Stream every entry of one archive into the output tables.
#[instrument(level = "info", skip_all, fields(archive = %path.display()))]
fn process_archive(path: &Path, tables: &mut OutputTables) -> Result<(usize, u64)> {
    let mut archive = Archive::open(path)?;
    let names = archive.entry_names();
    let mut rows = 0u64;

    for name in &names {
        let mut records = archive.records(name)?;
        let mut entry_rows = 0u64;

        while let Some(raw) = records.next() {
            let raw = raw?;
            let split = split_row(&raw).map_err(|source| {
                let err = CampaignError::DateParsing {
                    archive: path.to_path_buf(),
                    entry: records.entry().to_string(),
                    line: records.last_line(),
                    source,
                };
                error!("row rejected: {}", err);
                err
            })?;
            tables.append(&split)?;
            entry_rows += 1;
        }

        debug!(entry = %name, rows = entry_rows, "entry done");
        rows += entry_rows;
    }

    info!(entries = names.len(), rows, "archive done");
    Ok((names.len(), rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidDate;
    use crate::test_support::{campaign_csv, init_test_logging, write_zip, HEADER};
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    const ROW_A: &str =
        "1,56,housemaid,married,basic.4y,no,no,1,261,0,nonexistent,no,13,may,93.994,4.857";
    const ROW_B: &str =
        "2,37,blue-collar,married,unknown,unknown,yes,2,226,1,success,yes,5,jun,94.465,4.961";
    const ROW_C: &str =
        "3,40,admin.,divorced,university.degree,yes,no,1,151,0,failure,no,30,nov,93.2,1.313";

    fn read(dir: &Path, name: &str) -> Result<String> {
        Ok(fs::read_to_string(dir.join(name))?)
    }

    #[test]
    fn splits_archives_in_name_order() -> Result<()> {
        init_test_logging();
        let input = tempdir()?;
        let output = tempdir()?;
        // written out of order on purpose
        write_zip(
            &input.path().join("bank_2.csv.zip"),
            &[("bank_2.csv", campaign_csv(&[ROW_C]).as_str())],
        )?;
        write_zip(
            &input.path().join("bank_1.csv.zip"),
            &[("bank_1.csv", campaign_csv(&[ROW_A, ROW_B]).as_str())],
        )?;

        let summary = run(input.path(), output.path())?;
        assert_eq!(summary.archives, 2);
        assert_eq!(summary.entries, 2);
        assert_eq!(summary.rows, 3);
        assert_eq!(
            summary.tables,
            TableCounts {
                client: 3,
                campaign: 3,
                economics: 3
            }
        );

        assert_eq!(
            read(output.path(), "client.csv")?,
            "client_id,age,job,marital,education,credit_default,mortgage\n\
             1,56,housemaid,married,basic_4y,0,0\n\
             2,37,blue_collar,married,,0,1\n\
             3,40,admin,divorced,university_degree,1,0\n"
        );
        assert_eq!(
            read(output.path(), "campaign.csv")?,
            "client_id,number_contacts,contact_duration,previous_campaign_contacts,\
             previous_outcome,campaign_outcome,last_contact_date\n\
             1,1,261,0,0,0,2022-05-13\n\
             2,2,226,1,1,1,2022-06-05\n\
             3,1,151,0,0,0,2022-11-30\n"
        );
        assert_eq!(
            read(output.path(), "economics.csv")?,
            "client_id,cons_price_idx,euribor_three_months\n\
             1,93.994,4.857\n\
             2,94.465,4.961\n\
             3,93.2,1.313\n"
        );
        Ok(())
    }

    #[test]
    fn multiple_entries_share_one_header() -> Result<()> {
        let input = tempdir()?;
        let output = tempdir()?;
        write_zip(
            &input.path().join("batch.zip"),
            &[
                ("b.csv", campaign_csv(&[ROW_B]).as_str()),
                ("a.csv", campaign_csv(&[ROW_A]).as_str()),
                ("empty.csv", HEADER),
            ],
        )?;

        let summary = run(input.path(), output.path())?;
        assert_eq!(summary.entries, 3);
        assert_eq!(summary.rows, 2);

        for name in ["client.csv", "campaign.csv", "economics.csv"] {
            let text = read(output.path(), name)?;
            let lines: Vec<&str> = text.lines().collect();
            assert_eq!(lines.len(), 3, "{name}");
            assert!(lines[0].starts_with("client_id,"), "{name}");
            assert!(lines[1].starts_with("1,"), "{name}: a.csv sorts first");
            assert!(lines[2].starts_with("2,"), "{name}");
        }
        let campaign = read(output.path(), "campaign.csv")?;
        assert!(!campaign.lines().next().unwrap().contains("month"));
        Ok(())
    }

    #[test]
    fn empty_input_yields_header_only_files() -> Result<()> {
        let input = tempdir()?;
        let output = tempdir()?;
        fs::write(input.path().join("readme.txt"), "not an archive")?;

        let summary = run(input.path(), &output.path().join("out"))?;
        assert_eq!(summary, RunSummary::default());
        assert_eq!(
            read(&output.path().join("out"), "economics.csv")?,
            "client_id,cons_price_idx,euribor_three_months\n"
        );
        assert_eq!(
            read(&output.path().join("out"), "client.csv")?.lines().count(),
            1
        );
        assert_eq!(
            read(&output.path().join("out"), "campaign.csv")?.lines().count(),
            1
        );
        Ok(())
    }

    #[test]
    fn rerun_is_byte_identical() -> Result<()> {
        let input = tempdir()?;
        let output = tempdir()?;
        write_zip(
            &input.path().join("bank.csv.zip"),
            &[("bank.csv", campaign_csv(&[ROW_A, ROW_B, ROW_C]).as_str())],
        )?;

        run(input.path(), output.path())?;
        let first: Vec<String> = ["client.csv", "campaign.csv", "economics.csv"]
            .iter()
            .map(|n| read(output.path(), n))
            .collect::<Result<_>>()?;
        run(input.path(), output.path())?;
        let second: Vec<String> = ["client.csv", "campaign.csv", "economics.csv"]
            .iter()
            .map(|n| read(output.path(), n))
            .collect::<Result<_>>()?;

        assert_eq!(first, second);
        assert_eq!(first[0].lines().count(), 4);
        Ok(())
    }

    #[test]
    fn missing_column_aborts_run() -> Result<()> {
        let input = tempdir()?;
        let output = tempdir()?;
        let broken = campaign_csv(&[ROW_A]).replacen(",mortgage", ",mortage", 1);
        write_zip(&input.path().join("bank.zip"), &[("bank.csv", broken.as_str())])?;

        let err = run(input.path(), output.path()).unwrap_err();
        assert!(matches!(
            err,
            CampaignError::SchemaMismatch {
                column: "mortgage",
                ..
            }
        ));
        Ok(())
    }

    #[test]
    fn invalid_date_aborts_after_earlier_rows() -> Result<()> {
        let input = tempdir()?;
        let output = tempdir()?;
        let bad = ROW_A.replace("13,may", "31,jun");
        write_zip(
            &input.path().join("a.zip"),
            &[("a.csv", campaign_csv(&[ROW_B]).as_str())],
        )?;
        write_zip(
            &input.path().join("b.zip"),
            &[("b.csv", campaign_csv(&[ROW_C, bad.as_str()]).as_str())],
        )?;

        let err = run(input.path(), output.path()).unwrap_err();
        match err {
            CampaignError::DateParsing {
                archive,
                entry,
                line,
                source,
            } => {
                assert_eq!(archive, input.path().join("b.zip"));
                assert_eq!(entry, "b.csv");
                // header is line 1, ROW_C line 2
                assert_eq!(line, 3);
                assert_eq!(
                    source,
                    InvalidDate {
                        day: "31".into(),
                        month: "jun".into(),
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }

        // a.zip made it to disk; b.zip stopped at its bad row
        assert_eq!(
            read(output.path(), "client.csv")?,
            "client_id,age,job,marital,education,credit_default,mortgage\n\
             2,37,blue_collar,married,,0,1\n\
             3,40,admin,divorced,university_degree,1,0\n"
        );
        let campaign = read(output.path(), "campaign.csv")?;
        assert_eq!(campaign.lines().count(), 3);
        assert!(!campaign.contains("2022-05-13"));
        assert!(!read(output.path(), "economics.csv")?.contains("\n1,"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn unlistable_input_dir_fails_the_run() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let input = tempdir()?;
        let output = tempdir()?;
        write_zip(
            &input.path().join("bank.csv.zip"),
            &[("bank.csv", campaign_csv(&[ROW_A]).as_str())],
        )?;
        fs::set_permissions(input.path(), fs::Permissions::from_mode(0o311))?;
        let listable = fs::read_dir(input.path()).is_ok();
        let result = run(input.path(), output.path());
        fs::set_permissions(input.path(), fs::Permissions::from_mode(0o755))?;

        if listable {
            return Ok(());
        }
        assert!(matches!(result, Err(CampaignError::Io { .. })));
        Ok(())
    }

    #[test]
    fn corrupt_archive_aborts_run() -> Result<()> {
        let input = tempdir()?;
        let output = tempdir()?;
        fs::write(input.path().join("bad.zip"), b"PK not really")?;

        let err = run(input.path(), output.path()).unwrap_err();
        assert!(matches!(err, CampaignError::Archive { .. }));
        Ok(())
    }
}
