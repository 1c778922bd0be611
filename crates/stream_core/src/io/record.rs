use serde::{Deserialize, Serialize};

use crate::well607::WORDS;
use crate::SeedVector;

/// Draws taken from one substream of one stream.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DrawRecord {
    pub stream: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    pub substream: u64,
    pub stream_seed: SeedVector<WORDS>,
    pub substream_seed: SeedVector<WORDS>,
    pub values: Vec<f64>,
}

impl DrawRecord {
    pub fn to_ndjson(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string(self)?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::well607::DEFAULT_PACKAGE_SEED;

    fn record(name: Option<&str>) -> DrawRecord {
        DrawRecord {
            stream: 2,
            name: name.map(str::to_string),
            substream: 1,
            stream_seed: DEFAULT_PACKAGE_SEED,
            substream_seed: DEFAULT_PACKAGE_SEED,
            values: vec![0.25, 0.5],
        }
    }

    #[test]
    fn ndjson_line_is_terminated_and_parses() {
        let line = record(Some("prices")).to_ndjson().expect("record serializes");
        assert!(line.ends_with('\n'));
        let value: serde_json::Value =
            serde_json::from_str(line.trim_end()).expect("valid json");
        assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("prices"));
        assert_eq!(value.get("substream").and_then(|v| v.as_u64()), Some(1));
        let seed = value
            .get("stream_seed")
            .and_then(|v| v.as_array())
            .expect("seed is an array");
        assert_eq!(seed.len(), WORDS);
    }

    #[test]
    fn anonymous_streams_omit_name() {
        let line = record(None).to_ndjson().expect("record serializes");
        let value: serde_json::Value =
            serde_json::from_str(line.trim_end()).expect("valid json");
        assert!(value.get("name").is_none());
        let back: DrawRecord = serde_json::from_str(line.trim_end()).expect("round trip");
        assert_eq!(back, record(None));
    }
}
