//! JSON artifact files shared by the scaler and the cluster models

use crate::error::ArtifactErrorKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Read and decode one artifact file
pub fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactErrorKind> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Encode and write one artifact file, replacing any existing one
pub fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactErrorKind> {
    let json = serde_json::to_vec_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Reject NaN and infinities in a fitted parameter list
pub(crate) fn ensure_finite(what: &str, values: &[f64]) -> Result<(), ArtifactErrorKind> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(ArtifactErrorKind::Invalid(format!(
            "{what}[{idx}] is not a finite number"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        values: Vec<f64>,
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.json");
        let sample = Sample {
            values: vec![1.5, -2.0],
        };

        write_artifact(&path, &sample).unwrap();
        let loaded: Sample = read_artifact(&path).unwrap();
        assert_eq!(loaded, sample);
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result: Result<Sample, _> = read_artifact(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(ArtifactErrorKind::Io(_))));
    }

    #[test]
    fn test_read_garbage_is_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.json");
        fs::write(&path, b"\x80\x04\x95 not json").unwrap();

        let result: Result<Sample, _> = read_artifact(&path);
        assert!(matches!(result, Err(ArtifactErrorKind::Decode(_))));
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite("mean", &[0.0, 1.0]).is_ok());
        assert!(ensure_finite("mean", &[0.0, f64::NAN]).is_err());
    }
}
