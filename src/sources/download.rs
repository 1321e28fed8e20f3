use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, warn};

use super::client::{Proceeding, SejmClient};
use super::layout::DataLayout;

/// Columns written to `deputies.csv`, in order
pub const DEPUTY_COLUMNS: [&str; 14] = [
    "id",
    "firstLastName",
    "firstName",
    "lastName",
    "club",
    "districtName",
    "districtNum",
    "voivodeship",
    "birthDate",
    "birthLocation",
    "profession",
    "educationLevel",
    "email",
    "active",
];

/// What to retrieve
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    /// Only this term; all terms when `None`
    pub term: Option<u32>,
    /// Also fetch the statement list and per-statement HTML
    pub with_html: bool,
    /// Also fetch the deputies table of each term
    pub with_deputies: bool,
}

/// Counters for one retrieval run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub pdfs_saved: usize,
    pub pdfs_existing: usize,
    pub pdfs_missing: usize,
    pub html_saved: usize,
    pub dates_rejected: usize,
    pub failures: usize,
}

/// Outcome of validating a sitting date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCheck {
    Valid,
    Malformed,
    Future,
}

/// A date is retrievable when it is `YYYY-MM-DD` and not after `today`
pub fn check_date(date: &str, today: NaiveDate) -> DateCheck {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) if parsed <= today => DateCheck::Valid,
        Ok(_) => DateCheck::Future,
        Err(_) => DateCheck::Malformed,
    }
}

/// Retrieve terms, proceedings and sitting-day documents into `layout`
///
/// Documents already on disk are not fetched again. A failing sitting day is
/// logged and counted; listing failures abort the run.
pub async fn download_all(
    client: &SejmClient,
    layout: &DataLayout,
    options: &DownloadOptions,
) -> Result<DownloadSummary> {
    let mut summary = DownloadSummary::default();
    let today = chrono::Local::now().date_naive();

    let terms = client.terms().await.context("Failed to list terms")?;
    write_file(&layout.terms_path(), serde_json::to_string_pretty(&terms)?.as_bytes()).await?;

    for term in terms.iter().filter(|t| options.term.is_none_or(|wanted| wanted == t.num)) {
        let term_to = if term.current {
            "present".to_string()
        } else {
            term.to.clone().unwrap_or_default()
        };
        info!("Processing term {} ({} - {})", term.num, term.from, term_to);

        if options.with_deputies {
            if let Err(e) = download_deputies(client, layout, term.num).await {
                warn!("Deputies of term {} failed: {:#}", term.num, e);
                summary.failures += 1;
            }
        }

        let proceedings = client
            .proceedings(term.num)
            .await
            .with_context(|| format!("Failed to list proceedings of term {}", term.num))?;

        for proceeding in &proceedings {
            info!(
                "Processing proceeding {} ({})",
                proceeding.number,
                proceeding.dates.join(", ")
            );
            download_proceeding(client, layout, term.num, proceeding, options, today, &mut summary)
                .await?;
        }
    }

    info!(
        "Retrieval finished: {} PDFs saved, {} already present, {} missing, {} HTML files, {} dates rejected",
        summary.pdfs_saved,
        summary.pdfs_existing,
        summary.pdfs_missing,
        summary.html_saved,
        summary.dates_rejected
    );
    Ok(summary)
}

async fn download_proceeding(
    client: &SejmClient,
    layout: &DataLayout,
    term: u32,
    proceeding: &Proceeding,
    options: &DownloadOptions,
    today: NaiveDate,
    summary: &mut DownloadSummary,
) -> Result<()> {
    let dir = layout.proceeding_dir(term, proceeding.number);
    tokio::fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("Failed to create directory: {:?}", dir))?;

    for date in &proceeding.dates {
        let pdf_path = layout.pdf_path(term, proceeding.number, date);
        let pdf_exists = pdf_path.exists();
        if pdf_exists {
            info!("PDF for {} already exists", date);
            summary.pdfs_existing += 1;
            if !options.with_html {
                continue;
            }
        }

        match check_date(date, today) {
            DateCheck::Valid => {}
            DateCheck::Malformed => {
                warn!("Invalid date format: {}", date);
                summary.dates_rejected += 1;
                continue;
            }
            DateCheck::Future => {
                info!("Date {} is in the future, skipping", date);
                summary.dates_rejected += 1;
                continue;
            }
        }

        if !pdf_exists {
            match client.transcript_pdf(term, proceeding.number, date).await {
                Ok(Some(bytes)) => {
                    write_file(&pdf_path, &bytes).await?;
                    info!("Saved PDF: {:?}", pdf_path);
                    summary.pdfs_saved += 1;
                }
                Ok(None) => {
                    info!("No PDF for {}", date);
                    summary.pdfs_missing += 1;
                }
                Err(e) => {
                    warn!("PDF for {} failed: {:#}", date, e);
                    summary.failures += 1;
                }
            }
        }

        if options.with_html {
            match download_sitting_html(client, layout, term, proceeding.number, date).await {
                Ok(saved) => summary.html_saved += saved,
                Err(e) => {
                    warn!("HTML for {} failed: {:#}", date, e);
                    summary.failures += 1;
                }
            }
        }
    }

    Ok(())
}

/// Fetch the statement list and every statement's HTML; returns files written
async fn download_sitting_html(
    client: &SejmClient,
    layout: &DataLayout,
    term: u32,
    proceeding: u32,
    date: &str,
) -> Result<usize> {
    let list = client.statements(term, proceeding, date).await?;
    write_file(
        &layout.statements_path(term, proceeding, date),
        serde_json::to_string_pretty(&list)?.as_bytes(),
    )
    .await?;

    let mut saved = 0;
    for statement in &list.statements {
        let path = layout.statement_html_path(term, proceeding, date, statement.num);
        if path.exists() {
            continue;
        }
        match client.statement_html(term, proceeding, date, statement.num).await? {
            Some(html) => {
                write_file(&path, html.as_bytes()).await?;
                saved += 1;
            }
            None => warn!("No HTML for statement {} of {}", statement.num, date),
        }
    }

    info!("Saved {} statement files for {}", saved, date);
    Ok(saved)
}

/// Fetch the deputies of a term and write them as CSV
pub async fn download_deputies(client: &SejmClient, layout: &DataLayout, term: u32) -> Result<()> {
    let deputies = client.deputies(term).await?;
    let mut buffer = Vec::new();
    write_deputies_csv(&deputies, &mut buffer)?;

    let path = layout.deputies_path(term);
    write_file(&path, &buffer).await?;
    info!("Saved {} deputies to {:?}", deputies.len(), path);
    Ok(())
}

/// Flatten deputy JSON objects into [`DEPUTY_COLUMNS`]; absent values become empty cells
pub fn write_deputies_csv<W: std::io::Write>(deputies: &[Value], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(DEPUTY_COLUMNS)?;

    for deputy in deputies {
        let record = DEPUTY_COLUMNS.iter().map(|column| match deputy.get(*column) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        });
        csv.write_record(record)?;
    }

    csv.flush()?;
    Ok(())
}

async fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write file: {:?}", path))
}
