//! Id assignment policy for newly inserted ads.

use std::fmt;
use std::str::FromStr;

/// How an insert treats the caller-supplied ad id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdPolicy {
    /// The caller must supply an id that is not already in use.
    #[default]
    Unique,
    /// The caller must supply an id; an existing ad with that id is replaced.
    Overwrite,
    /// Any caller id is ignored; the next id is one past the largest numeric id.
    AutoIncrement,
}

impl IdPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unique => "unique",
            Self::Overwrite => "overwrite",
            Self::AutoIncrement => "auto",
        }
    }
}

impl fmt::Display for IdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unique" => Ok(Self::Unique),
            "overwrite" | "upsert" => Ok(Self::Overwrite),
            "auto" | "sequential" => Ok(Self::AutoIncrement),
            other => Err(format!(
                "unknown id policy '{other}', expected one of: unique, overwrite, auto"
            )),
        }
    }
}
