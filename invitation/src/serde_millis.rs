//! `#[serde(with = "crate::serde_millis")]` for `Duration` fields stored as whole milliseconds.
//!
//! Sub-millisecond remainders are dropped on write. A duration too long to fit
//! in a `u64` of milliseconds is an error rather than a silently clamped value.

use std::time::Duration;

use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let millis = u64::try_from(value.as_millis())
        .map_err(|_| S::Error::custom(format!("duration {value:?} overflows u64 milliseconds")))?;
    serializer.serialize_u64(millis)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}
