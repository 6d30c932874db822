use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier assigned by the remote store.
///
/// Collection servers hand out either numbers or strings, so both are accepted and kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(&self.0)
    }
}

impl From<String> for ContactId {
    fn from(val: String) -> Self {
        Self(val)
    }
}

impl From<&str> for ContactId {
    fn from(val: &str) -> Self {
        Self(val.to_owned())
    }
}

impl From<u64> for ContactId {
    fn from(val: u64) -> Self {
        Self(val.to_string())
    }
}

impl<'de> Deserialize<'de> for ContactId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            String(String),
        }

        let val = match Raw::deserialize(deserializer)? {
            Raw::Number(val) => val.into(),
            Raw::String(val) => val.into(),
        };

        Ok(val)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub number: String,
}

/// Unsaved user input submitted to the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Draft {
    pub name: String,
    pub number: String,
}
