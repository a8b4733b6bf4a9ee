use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by Indundi Charts.
#[derive(Error, Debug)]
pub enum ChartsError {
    /// A CSV snapshot could not be opened or decoded.
    #[error("Failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A table is missing a column that the requested view needs.
    #[error("Table '{table}' has no column '{column}'")]
    Schema { table: String, column: String },

    /// A `published_at` cell did not match any recognised timestamp format.
    #[error("Invalid timestamp in row {row}: {value:?}")]
    TimestampParse { row: usize, value: String },

    /// No date-stamped snapshot matching `prefix` exists in `dir`.
    #[error("No {prefix}*.csv snapshot found in {dir}")]
    SnapshotNotFound { dir: PathBuf, prefix: String },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChartsError {
    /// Shorthand for a [`ChartsError::Schema`] error.
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::Schema {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Convenience alias used throughout the charts crates.
pub type Result<T> = std::result::Result<T, ChartsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_load() {
        let csv_err = csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        let err = ChartsError::Load {
            path: PathBuf::from("/data/channels_data_2023-03-19.csv"),
            source: csv_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to load"));
        assert!(msg.contains("channels_data_2023-03-19.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_schema() {
        let err = ChartsError::missing_column("channels", "view_count");
        assert_eq!(err.to_string(), "Table 'channels' has no column 'view_count'");
    }

    #[test]
    fn test_error_display_timestamp_parse() {
        let err = ChartsError::TimestampParse {
            row: 7,
            value: "yesterday".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid timestamp in row 7: \"yesterday\"");
    }

    #[test]
    fn test_error_display_snapshot_not_found() {
        let err = ChartsError::SnapshotNotFound {
            dir: PathBuf::from("/empty/dir"),
            prefix: "video_data_".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No video_data_*.csv snapshot found in /empty/dir"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = ChartsError::Config("unknown page".to_string());
        assert_eq!(err.to_string(), "Configuration error: unknown page");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ChartsError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}
