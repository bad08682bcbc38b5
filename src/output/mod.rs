use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Successful result of one transcript request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub video_id: String,
    pub title: String,
    pub filename: String,
    pub transcript: String,
}

/// Failure result of one transcript request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub error: String,
}

impl ErrorRecord {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// Print a record to stdout as a single JSON object
pub fn print_json<T: Serialize>(record: &T) -> Result<()> {
    println!("{}", serde_json::to_string(record)?);
    Ok(())
}
