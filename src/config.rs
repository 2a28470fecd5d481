/// Session configuration
///
/// ```
/// use loangrid::GridConfig;
///
/// let config = GridConfig::from_json(r#"{"pageSize": 50}"#).unwrap();
/// assert_eq!(config.page_size.get(), 50);
/// assert_eq!(config.fetch_latency_ms, 500);
/// ```

use crate::error::Result;
use crate::pagination::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::Duration;

pub const DEFAULT_FETCH_LATENCY_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Records appended per `load_more`
    pub page_size: NonZeroUsize,
    /// Simulated fetch latency of each batch
    pub fetch_latency_ms: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            page_size: NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN),
            fetch_latency_ms: DEFAULT_FETCH_LATENCY_MS,
        }
    }
}

impl GridConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_page_size(mut self, page_size: NonZeroUsize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_fetch_latency(mut self, latency: Duration) -> Self {
        self.fetch_latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn fetch_latency(&self) -> Duration {
        Duration::from_millis(self.fetch_latency_ms)
    }
}
