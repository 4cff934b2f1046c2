//! Trusted request parameters for create and update.
//!
//! Only `event_type`, `public`, `repo_id` and `actor_id` are read; any other
//! key in the submitted body is ignored. Values are coerced leniently so
//! that form-encoded strings (`"true"`, `"10"`) and native JSON values are
//! treated alike. A value that cannot be coerced is treated as absent.

use serde::{Deserialize, Deserializer};

/// Raw, unvalidated event fields as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventParams {
    #[serde(default, deserialize_with = "lenient_string")]
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub public: Option<bool>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub repo_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub actor_id: Option<i64>,
}

/// Any scalar a client might send for one field.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Scalar>::deserialize(d)? {
        Some(Scalar::Text(s)) => Some(s),
        Some(Scalar::Bool(b)) => Some(b.to_string()),
        Some(Scalar::Int(i)) => Some(i.to_string()),
        Some(Scalar::Float(f)) => Some(f.to_string()),
        Some(Scalar::Other(_)) | None => None,
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match Option::<Scalar>::deserialize(d)? {
        Some(Scalar::Bool(b)) => Some(b),
        Some(Scalar::Int(1)) => Some(true),
        Some(Scalar::Int(0)) => Some(false),
        Some(Scalar::Text(s)) => parse_bool(&s),
        _ => None,
    })
}

fn lenient_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(match Option::<Scalar>::deserialize(d)? {
        Some(Scalar::Int(i)) => Some(i),
        Some(Scalar::Text(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "on" => Some(true),
        "false" | "f" | "0" | "off" => Some(false),
        _ => None,
    }
}
