use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use log::{debug, info};
use serde::Deserialize;

use std::{
    collections::HashMap,
    fmt::Display,
    fs::File,
    io::{Read, Write},
    path::Path,
};

use crate::{error::SkipReason, groups::Groups, rating::Rating};

/// Kinds of report that can be produced from product data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Average product rating per brand.
    #[default]
    AverageRating,
}

impl Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportKind::AverageRating => f.write_str("average-rating"),
        }
    }
}

/// Running totals for a single brand.
#[derive(Debug)]
struct Brand {
    name: String,
    sum: Rating,
    count: u32,
}

impl Brand {
    fn average(&self) -> Rating {
        (self.sum / self.count).round2()
    }
}

/// One line of the finished report.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub brand: String,
    pub metric: Rating,
}

/// Aggregates product data per brand.
///
/// To create a new, empty `Report`, use [`Report::new`].
///
/// To add brand group configuration, use [`Report::read_groups`].
///
/// To add product data, use [`Report::read_files`] or [`Report::read_csv`].
///
/// To get the ranked results, use [`Report::rows`]; to get a printable table,
/// use the report's [`Display`] implementation.
#[derive(Debug, Default)]
pub struct Report {
    kind: ReportKind,
    groups: Groups,
    brands: Vec<Brand>,
    index: HashMap<String, usize>,
}

impl Report {
    /// Creates a new, empty report of the given kind.
    #[must_use]
    pub fn new(kind: ReportKind) -> Report {
        Report {
            kind,
            ..Self::default()
        }
    }

    /// Reads brand group configuration from `path`. See [`Groups::from_file`]
    /// for the format.
    ///
    /// # Errors
    ///
    /// Returns any errors from reading or parsing the configuration.
    pub fn read_groups(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.groups = Groups::from_file(&path)
            .with_context(|| format!("reading groups from {}", path.as_ref().display()))?;
        debug!("loaded {} brand groups", self.groups.len());
        Ok(())
    }

    /// Reads product data from each of `paths` in turn.
    ///
    /// Files that are not CSV files, or that cannot be opened, are skipped:
    /// a warning naming the file is written to `warnings` and processing
    /// continues with the next file.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered while reading rows from a file
    /// that was opened successfully (for example, a row with too few fields
    /// or a rating that isn't a number), or any error writing a warning.
    /// Data already read from earlier files stays in the report.
    pub fn read_files<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
        warnings: &mut impl Write,
    ) -> Result<()> {
        for path in paths {
            match self.read_csv(path) {
                Ok(rows) => debug!("{}: read {rows} rows", path.as_ref().display()),
                Err(err) => match err.downcast::<SkipReason>() {
                    Ok(reason) => writeln!(warnings, "{reason}")?,
                    Err(err) => return Err(err),
                },
            }
        }
        info!("aggregated {} brands", self.brands.len());
        Ok(())
    }

    /// Reads product data from the CSV file at `path`, and updates the
    /// report. Returns the number of data rows read.
    ///
    /// The first line is a header and is ignored. Fields are read by
    /// position: the brand is the second field and the rating the fourth.
    ///
    /// # Errors
    ///
    /// Returns a [`SkipReason`] if `path` doesn't name a CSV file or cannot
    /// be opened. Returns other errors if the file cannot be read as UTF-8,
    /// is empty, has a blank line after the header, or has a row that
    /// cannot be parsed.
    pub fn read_csv(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let mut file = open_csv(path)?;
        debug!("{}: opened", path.display());
        let mut text = String::new();
        file.read_to_string(&mut text)
            .with_context(|| format!("reading {}", path.display()))?;
        if text.is_empty() {
            bail!("{}: missing header row", path.display());
        }
        if let Some(line) = blank_line(&text) {
            bail!("{}: line {line}: empty row", path.display());
        }
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        let mut records = rdr.records();
        // The reader drops a blank first line, so the header is only there
        // to skip when the first line has content.
        if text.lines().next().is_some_and(|l| !l.is_empty()) {
            records
                .next()
                .transpose()
                .with_context(|| format!("{}: header row", path.display()))?;
        }
        let mut rows = 0;
        for result in records {
            let record = result.with_context(|| format!("reading {}", path.display()))?;
            let line = record.position().map_or(0, csv::Position::line);
            let record: Record = record
                .deserialize(None)
                .with_context(|| format!("{}: line {line}", path.display()))?;
            self.add_record(record);
            rows += 1;
        }
        Ok(rows)
    }

    fn add_record(&mut self, record: Record) {
        let name = match self.groups.brand_group(&record.brand) {
            Some(group) => group.to_string(),
            None => record.brand,
        };
        let idx = match self.index.get(&name) {
            Some(&idx) => idx,
            None => {
                self.brands.push(Brand {
                    name: name.clone(),
                    sum: Rating::default(),
                    count: 0,
                });
                self.index.insert(name, self.brands.len() - 1);
                self.brands.len() - 1
            }
        };
        let brand = &mut self.brands[idx];
        match self.kind {
            ReportKind::AverageRating => brand.sum += record.rating,
        }
        brand.count += 1;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }

    /// Returns the report rows, best-rated brand first.
    ///
    /// Each brand's metric is its average rating rounded to 2 decimal
    /// places. Brands with equal metrics keep the order in which they were
    /// first seen.
    #[must_use]
    pub fn rows(&self) -> Vec<Row> {
        let mut rows: Vec<_> = self
            .brands
            .iter()
            .map(|b| Row {
                brand: b.name.clone(),
                metric: b.average(),
            })
            .collect();
        rows.sort_by(|a, b| b.metric.rank_cmp(&a.metric));
        rows
    }
}

/// Opens `path` for reading, provided its name marks it as a CSV file.
fn open_csv(path: &Path) -> Result<File, SkipReason> {
    let name = path.display().to_string();
    if !name.ends_with("csv") {
        return Err(SkipReason::InvalidFormat(name));
    }
    match File::open(path) {
        Ok(file) if !file.metadata().is_ok_and(|m| m.is_dir()) => Ok(file),
        _ => Err(SkipReason::NotFound(name)),
    }
}

/// Returns the number of the first empty line after the header, ignoring
/// line breaks inside quoted fields.
fn blank_line(text: &str) -> Option<usize> {
    let mut quoted = false;
    for (i, line) in text.lines().enumerate() {
        if i > 0 && !quoted && line.is_empty() {
            return Some(i + 1);
        }
        if line.matches('"').count() % 2 == 1 {
            quoted = !quoted;
        }
    }
    None
}

impl Display for Report {
    /// Renders the rows as a ranked table in the style of `psql`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows = self.rows();
        if rows.is_empty() {
            return Ok(());
        }
        let kind = self.kind.to_string();
        let ranks: Vec<_> = (1..=rows.len()).map(|n| n.to_string()).collect();
        let brands: Vec<_> = rows.iter().map(|r| r.brand.as_str()).collect();
        let metrics = align_decimals(rows.iter().map(|r| r.metric.to_string()).collect());

        let rank_w = column_width("", ranks.iter().map(String::as_str));
        let brand_w = column_width("brand", brands.iter().copied());
        let metric_w = column_width(&kind, metrics.iter().map(String::as_str));
        let (a, b, c) = (rank_w + 2, brand_w + 2, metric_w + 2);

        writeln!(f, "+{:-<a$}+{:-<b$}+{:-<c$}+", "", "", "")?;
        writeln!(f, "| {:>rank_w$} | {:<brand_w$} | {:>metric_w$} |", "", "brand", kind)?;
        writeln!(f, "|{:-<a$}+{:-<b$}+{:-<c$}|", "", "", "")?;
        for ((rank, brand), metric) in ranks.iter().zip(&brands).zip(&metrics) {
            writeln!(f, "| {rank:>rank_w$} | {brand:<brand_w$} | {metric:>metric_w$} |")?;
        }
        writeln!(f, "+{:-<a$}+{:-<b$}+{:-<c$}+", "", "", "")?;
        Ok(())
    }
}

/// Width of a column: its widest cell, but at least two more than its header.
fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.chars().count() + 2)
}

/// Pads numbers on the right so that their decimal points line up.
fn align_decimals(numbers: Vec<String>) -> Vec<String> {
    let after_point = |s: &str| s.find('.').map_or(-1, |p| (s.len() - p - 1) as isize);
    let max = numbers.iter().map(|s| after_point(s.as_str())).max().unwrap_or(0);
    numbers
        .into_iter()
        .map(|s| {
            let pad = (max - after_point(s.as_str())) as usize;
            format!("{s}{:pad$}", "")
        })
        .collect()
}

/// Defines the CSV format for product data. Fields are matched by position,
/// not by header name.
#[derive(Debug, Deserialize)]
pub struct Record {
    pub name: String,
    pub brand: String,
    pub price: String,
    pub rating: Rating,
}
