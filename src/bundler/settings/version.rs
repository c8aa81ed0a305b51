//! Package version validation.

use crate::bundler::error::{Error, Result};
use std::{fmt, str::FromStr};

/// Dot-separated package version such as `1.2.3` or `2024.10.1.7`.
///
/// Each segment must be a non-empty run of ASCII digits. Segments keep their
/// original text, so formatting a parsed version reproduces the input exactly
/// (`01.2` stays `01.2`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    segments: Vec<String>,
}

impl Version {
    /// Returns the individual segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let segments = s
            .split('.')
            .map(|part| {
                if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
                    Ok(part.to_string())
                } else {
                    Err(Error::Config(format!(
                        "invalid version {s:?}: part {part:?} is not a number"
                    )))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { segments })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::ErrorKind;

    #[test]
    fn round_trips_valid_versions() {
        for v in ["1", "1.2", "1.2.3", "1.2.3.4", "2024.10.01", "0.0.0", "01.002"] {
            let parsed: Version = v.parse().unwrap();
            assert_eq!(parsed.to_string(), v);
        }
        let parsed: Version = "10.20.30".parse().unwrap();
        assert_eq!(parsed.segments(), ["10", "20", "30"]);
    }

    #[test]
    fn rejects_non_numeric_segments() {
        for v in ["1.2.x", "1.2-beta", "v1.0", "1..2", "", "1.2.", "-1.0", "+1.0", "1. 2"] {
            let err = v.parse::<Version>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Config, "{v:?} should be rejected");
        }
    }

    #[test]
    fn error_names_offending_segment() {
        let err = "1.2b.3".parse::<Version>().unwrap_err();
        assert!(err.to_string().contains("\"2b\""));
    }
}
