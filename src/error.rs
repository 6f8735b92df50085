use thiserror::Error;

/// Reasons an input file is skipped rather than aborting the report.
///
/// The [`Display`](std::fmt::Display) output of each variant is the warning
/// line printed for the skipped file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkipReason {
    #[error("Предупреждение: Файл {0} не является csv, пропускаем...")]
    InvalidFormat(String),

    #[error("Предупреждение: Файл {0} не найден, пропускаем...")]
    NotFound(String),
}
