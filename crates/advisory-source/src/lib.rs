//! Advisory data acquisition.
//!
//! Two sources produce structurally identical record lists: the live P2P
//! earthquake feed and an in-process fixture for offline work. The
//! rendering pipeline only sees the [`AdvisorySource`] trait.

mod fixture;
mod live;

pub use fixture::FixtureSource;
pub use live::{parse_history, LiveSource, LiveSourceConfig, DEFAULT_FEED_URL};

use advisory_common::{AdvisoryRecord, AdvisoryResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A snapshot source of advisory records.
#[async_trait]
pub trait AdvisorySource: Send + Sync {
    /// Fetch the latest snapshot. Records come back in source order.
    async fn fetch(&self) -> AdvisoryResult<Vec<AdvisoryRecord>>;

    /// Short identifier for logs.
    fn name(&self) -> &'static str;
}

/// Which source a refresh reads from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Live,
    Fixture,
}

impl Mode {
    /// Map the UI's "live" checkbox value to a mode.
    pub fn from_live(live: bool) -> Self {
        if live {
            Mode::Live
        } else {
            Mode::Fixture
        }
    }

    pub fn is_live(self) -> bool {
        self == Mode::Live
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Live => "live",
            Mode::Fixture => "fixture",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "live" => Ok(Mode::Live),
            "fixture" | "test" | "offline" => Ok(Mode::Fixture),
            other => Err(format!("unknown mode '{}', expected live or fixture", other)),
        }
    }
}
