//! JSON form of path arrays: `[["M", 0, 0], ["L", 10, 10], ["Z"]]`.

use serde::de::Error as _;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::{PathArray, Segment};

impl Serialize for Segment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.params.len() + 1))?;
        seq.serialize_element(&self.cmd.to_string())?;
        for p in &self.params {
            seq.serialize_element(p)?;
        }
        seq.end()
    }
}

/// Numbers are accepted as-is; strings are accepted if they hold a number.
fn param(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

impl<'de> Deserialize<'de> for Segment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<Value>::deserialize(deserializer)?;
        let (first, rest) = items
            .split_first()
            .ok_or_else(|| D::Error::custom("empty path segment"))?;

        let mut chars = first.as_str().unwrap_or_default().chars();
        let cmd = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(D::Error::custom(format!("invalid path command {first}"))),
        };
        let params = rest
            .iter()
            .map(|v| param(v).ok_or_else(|| D::Error::custom(format!("invalid parameter {v}"))))
            .collect::<Result<Vec<_>, _>>()?;

        let seg = Segment::raw(cmd, &params);
        if !seg.is_well_formed() {
            return Err(D::Error::custom(format!(
                "'{cmd}' does not take {} parameter(s)",
                params.len()
            )));
        }
        Ok(seg)
    }
}

impl Serialize for PathArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.segments())
    }
}

impl<'de> Deserialize<'de> for PathArray {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(PathArray::new(Vec::<Segment>::deserialize(deserializer)?))
    }
}
