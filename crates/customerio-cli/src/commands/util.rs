//! Shared helpers for command handlers.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::CliError;

/// Read a file, or stdin when the path is `-`.
pub fn read_input(path: &Path) -> Result<Vec<u8>, CliError> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().lock().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read(path)?)
}

/// Parse a `--data` style JSON argument, requiring an object.
pub fn parse_object(field: &str, raw: &str) -> Result<serde_json::Value, CliError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| CliError::Validation {
        field: field.into(),
        reason: format!("invalid JSON: {e}"),
    })?;
    if !value.is_object() {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "expected a JSON object".into(),
        });
    }
    Ok(value)
}

/// Convert an optional unix timestamp flag.
pub fn parse_timestamp(field: &str, secs: Option<i64>) -> Result<Option<DateTime<Utc>>, CliError> {
    secs.map(|s| {
        DateTime::from_timestamp(s, 0).ok_or_else(|| CliError::Validation {
            field: field.into(),
            reason: format!("{s} is out of range"),
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objects_only() {
        assert!(parse_object("data", r#"{"a":1}"#).is_ok());
        assert!(matches!(
            parse_object("data", "[1]"),
            Err(CliError::Validation { .. })
        ));
        assert!(matches!(
            parse_object("data", "{nope"),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn timestamps() {
        assert_eq!(parse_timestamp("timestamp", None).unwrap(), None);
        assert_eq!(
            parse_timestamp("timestamp", Some(1_700_000_000))
                .unwrap()
                .map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
        assert!(parse_timestamp("timestamp", Some(i64::MAX)).is_err());
    }
}
