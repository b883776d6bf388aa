use std::{borrow::Cow, fmt::Display};

use serde::{Deserialize, Serialize};

/// Identifier of a shared buffer. Sessions hand out either integers or
/// strings; both forms are accepted on the wire and never mixed up, so `1`
/// and `"1"` are different buffers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BufferId {
    Number(u64),
    Text(String),
}

impl Display for BufferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferId::Number(number) => write!(f, "{number}"),
            BufferId::Text(text) => write!(f, "{text}"),
        }
    }
}

impl From<u64> for BufferId {
    fn from(value: u64) -> Self { BufferId::Number(value) }
}

impl From<String> for BufferId {
    fn from(value: String) -> Self { BufferId::Text(value) }
}

impl From<&str> for BufferId {
    fn from(value: &str) -> Self { BufferId::Text(value.to_owned()) }
}

impl<'a> From<Cow<'a, str>> for BufferId {
    fn from(value: Cow<'a, str>) -> Self { BufferId::Text(value.into_owned()) }
}
