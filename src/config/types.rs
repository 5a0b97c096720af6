use serde::Deserialize;

/// Main configuration structure for Frontier-Crawl
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetcher: FetcherConfig,
    pub engine: EngineConfig,
}

/// Page fetch configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// Upper bound on a whole request, body included (seconds)
    pub timeout_secs: u64,

    /// Upper bound on establishing the connection (seconds)
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// In-process map/reduce engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Number of concurrent mapper jobs per hop
    pub map_jobs: usize,

    /// Hop limit; the crawl stops here even if the frontier is not empty
    pub max_iterations: u32,

    /// How the mapper treats links that already start with `http`
    pub absolute_links: AbsoluteLinkPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            map_jobs: 4,
            max_iterations: 3,
            absolute_links: AbsoluteLinkPolicy::default(),
        }
    }
}

/// Mapper behavior for absolute links found on a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AbsoluteLinkPolicy {
    /// Re-emit the current page's own URL as unvisited (reference behavior)
    #[default]
    EchoBase,

    /// Emit the discovered absolute link itself as unvisited
    Follow,
}
