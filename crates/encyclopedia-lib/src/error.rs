use std::path::PathBuf;

use thiserror::Error;

use crate::ids::{AttributeId, ItemId};

/// Convenient result alias for the encyclopedia library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Data directory could not be located at the resolved path.
    #[error("dataset directory not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// A required dataset file failed to load or was never loaded.
    #[error("dataset {name} is not available")]
    DatasetUnavailable { name: String },

    /// A dataset file was present but did not match the expected shape.
    #[error("failed to parse dataset {name}: {source}")]
    DatasetParse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The settings file exists but is not valid JSON for [`crate::Settings`].
    #[error("failed to parse settings file {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for data and settings")]
    ProjectDirsUnavailable,

    /// An item carried an attribute code with no metadata entry.
    #[error("attribute {code} has no metadata entry")]
    UnknownAttribute { code: AttributeId },

    /// Raised when an item id or name could not be found in the loaded items.
    #[error("unknown item: {query}{}", format_suggestions(.suggestions))]
    UnknownItem {
        query: String,
        suggestions: Vec<String>,
    },

    /// Raised when a blueprint has no manufacture record under either its own
    /// id or its product id.
    #[error("no manufacture data for blueprint {id}")]
    ManufactureDataMissing { id: ItemId },

    /// Raised when an item that is not a blueprint is added to the export.
    #[error("item {id} is not a blueprint")]
    NotABlueprint { id: ItemId },

    /// Raised when a calibration code is absent from the modifier table.
    #[error("unknown calibration code {code}")]
    UnknownModifierCode { code: String },

    /// Raised when a modifier type has no meta entry.
    #[error("modifier type {type_name} has no meta entry")]
    UnknownModifierType { type_name: String },

    /// Raised when a value-transform formula cannot be parsed.
    #[error("invalid formula '{formula}': {message}")]
    InvalidFormula { formula: String, message: String },

    /// Raised when the skill training rate is not a finite positive number.
    #[error("training rate must be a finite positive number, got {rate}")]
    InvalidTrainingRate { rate: f64 },

    /// Raised when an unknown sheet format is requested.
    #[error("unsupported sheet format {format}; expected csv, tsv or json")]
    UnsupportedSheetFormat { format: String },

    /// Raised when the export selection is empty.
    #[error("no blueprints selected for export")]
    EmptyExport,

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON serialization errors outside dataset parsing.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for CSV writer errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
