//! Connection and indexing configuration.
//!
//! Settings are plain serde structs. The core never reads them from global state:
//! callers load them once (the CLI does so from a JSON file) and pass the values
//! to the components that need them.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SyncError};

/// Host used when no hosts are configured.
pub const DEFAULT_HOST: &str = "127.0.0.1:9200";

/// Port assumed when a host entry carries none.
pub const DEFAULT_PORT: u16 = 9200;

/// Default number of (header, document) pairs per bulk submission.
pub const DEFAULT_BULK_INDEX_LIMIT: usize = 100;

/// Default number of records fetched per cursor page during bulk indexing.
pub const DEFAULT_QUERY_LIMIT: usize = 1000;

/// Default page size for paginated searches.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Configuration for constructing a search-engine connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// `host[:port]` entries.
    #[serde(default = "default_hosts")]
    pub hosts: Vec<String>,

    /// Transport options (e.g. `sniffer_timeout`) forwarded verbatim.
    #[serde(flatten)]
    pub transport: Map<String, Value>,
}

fn default_hosts() -> Vec<String> {
    vec![DEFAULT_HOST.to_string()]
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            hosts: default_hosts(),
            transport: Map::new(),
        }
    }
}

impl ConnectionConfig {
    /// Create a configuration for the given hosts.
    pub fn with_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
            transport: Map::new(),
        }
    }

    /// Set a passthrough transport option.
    pub fn with_transport_option<K: Into<String>, V: Into<Value>>(
        mut self,
        key: K,
        value: V,
    ) -> Self {
        self.transport.insert(key.into(), value.into());
        self
    }

    /// Look up a passthrough transport option.
    pub fn transport_option(&self, key: &str) -> Option<&Value> {
        self.transport.get(key)
    }

    /// Parse every configured host. An empty host list resolves to the default host.
    pub fn host_addrs(&self) -> Result<Vec<HostAddr>> {
        if self.hosts.is_empty() {
            return Ok(vec![HostAddr::parse(DEFAULT_HOST)?]);
        }
        self.hosts.iter().map(|h| HostAddr::parse(h)).collect()
    }
}

/// A parsed `host:port` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostAddr {
    pub host: String,
    pub port: u16,
}

impl HostAddr {
    /// Parse `host[:port]`; the port defaults to [`DEFAULT_PORT`].
    pub fn parse(entry: &str) -> Result<Self> {
        let entry = entry.trim();
        let entry = entry
            .strip_prefix("http://")
            .or_else(|| entry.strip_prefix("https://"))
            .unwrap_or(entry)
            .trim_end_matches('/');

        let (host, port) = match entry.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    SyncError::invalid_argument(format!("invalid port in host entry '{entry}'"))
                })?;
                (host, port)
            }
            None => (entry, DEFAULT_PORT),
        };

        if host.is_empty() {
            return Err(SyncError::invalid_argument(format!(
                "empty host in host entry '{entry}'"
            )));
        }

        Ok(HostAddr {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for HostAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Limits used by the bulk indexer and the query accumulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexingSettings {
    /// Maximum (header, document) pairs per bulk submission.
    pub bulk_index_limit: usize,

    /// Maximum records fetched from a record source at once.
    pub query_limit: usize,

    /// Page size used when a search does not specify one.
    pub default_page_size: usize,
}

impl Default for IndexingSettings {
    fn default() -> Self {
        Self {
            bulk_index_limit: DEFAULT_BULK_INDEX_LIMIT,
            query_limit: DEFAULT_QUERY_LIMIT,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl IndexingSettings {
    /// Reject zero limits, which would make batching meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.bulk_index_limit == 0 {
            return Err(SyncError::config("bulk_index_limit must be greater than 0"));
        }
        if self.query_limit == 0 {
            return Err(SyncError::config("query_limit must be greater than 0"));
        }
        if self.default_page_size == 0 {
            return Err(SyncError::config("default_page_size must be greater than 0"));
        }
        Ok(())
    }
}

/// Top-level settings file layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub connection: ConnectionConfig,
    pub indexing: IndexingSettings,
}

impl Settings {
    /// Load and validate settings from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content).map_err(|e| {
            SyncError::config(format!("failed to parse {}: {e}", path.display()))
        })?;
        settings.indexing.validate()?;
        Ok(settings)
    }
}
