use anyhow::{Result, bail};
use serde::Serialize;
use std::str::FromStr;

/// Output format for the run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text - one line per notice
    #[default]
    Text,
    /// JSON - machine-parseable
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => bail!("Invalid format '{s}'. Use: text or json"),
        }
    }
}

impl OutputFormat {
    /// Serialize data to the requested format
    pub fn serialize<T: Serialize>(self, data: &T) -> Result<String> {
        match self {
            Self::Json => serde_json::to_string_pretty(data)
                .map_err(|e| anyhow::anyhow!("JSON serialization failed: {e}")),
            Self::Text => {
                // Text format shouldn't use this path - caller renders its own lines
                bail!("Text format should not use serialize()")
            }
        }
    }
}
