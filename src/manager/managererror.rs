use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("{0}")]
    IOError(#[from] std::io::Error),
    #[error("{0}")]
    JsonParseError(#[from] serde_json::Error),
    #[error("key '{0}' not found")]
    NameNotFoundError(String)
}

impl ManagerError {
    pub fn map_elem_not_found(name: &str) -> ManagerError {
        ManagerError::NameNotFoundError(name.to_owned())
    }
}

/// Deserializes `json_value` into `T`, reporting failures as
/// [`ManagerError::JsonParseError`].
pub fn parse_json_value<T>(json_value: serde_json::Value) -> Result<T, ManagerError> where
    T: DeserializeOwned {
    let obj: T = serde_json::from_value(json_value)?;
    Ok(obj)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        count: u32
    }

    #[test]
    fn test_parse_json_value() {
        let sample: Sample = parse_json_value(json!({ "count": 3 })).expect("valid json");
        assert_eq!(sample.count, 3);

        let error = parse_json_value::<Sample>(json!({ "total": 3 })).unwrap_err();
        assert!(matches!(error, ManagerError::JsonParseError(_)));
        assert!(error.to_string().contains("count"));
    }

    #[test]
    fn test_not_found_message() {
        let error = ManagerError::map_elem_not_found("Ramp");
        assert_eq!(error.to_string(), "key 'Ramp' not found");
    }
}
