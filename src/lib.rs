#![doc = include_str!("../README.md")]
use anyhow::Result;

use std::{io, path::Path};

mod error;
mod groups;
mod rating;
mod report;

pub use error::SkipReason;
pub use groups::Groups;
pub use rating::Rating;
pub use report::{Record, Report, ReportKind, Row};

/// Reads product data from `paths` and returns the ranked rows for a report
/// of kind `kind`.
///
/// Skipped files are reported with a warning line on standard output, as
/// described in [`Report::read_files`].
///
/// # Examples
///
/// ```
/// # use ratings::{aggregate, ReportKind};
/// let rows = aggregate(&["testdata/products.csv"], ReportKind::AverageRating).unwrap();
/// assert_eq!(rows[0].brand, "apple");
/// assert_eq!(rows[0].metric.value(), 4.8);
/// ```
///
/// # Errors
///
/// Returns any error from reading rows, as for [`Report::read_files`].
pub fn aggregate<P: AsRef<Path>>(paths: &[P], kind: ReportKind) -> Result<Vec<Row>> {
    let mut report = Report::new(kind);
    report.read_files(paths, &mut io::stdout().lock())?;
    Ok(report.rows())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_fn_returns_empty_rows_when_every_file_is_skipped() {
        let rows = aggregate(&["products.json", "testdata/missing.csv"], ReportKind::AverageRating)
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn aggregate_fn_averages_each_brand_across_files() {
        let rows = aggregate(
            &["testdata/products.csv", "testdata/decimals.csv"],
            ReportKind::AverageRating,
        )
        .unwrap();
        let brands: Vec<_> = rows.iter().map(|r| r.brand.as_str()).collect();
        assert_eq!(brands, vec!["apple", "xiaomi", "samsung", "motorola"]);
        assert_eq!(rows[3].metric, Rating::new(3.75));
    }
}
