//! Bridge configuration.

use std::time::Duration;

/// Default upper bound on how long a decision hook blocks the engine thread.
pub const DEFAULT_DECISION_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the bridge.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Maximum time a filter or conflict hook waits for the consumer side.
    ///
    /// `None` blocks forever, matching the engine API's synchronous
    /// contract with no safety net. The default is bounded so a consumer
    /// that never runs the trampoline cannot leak a blocked engine thread.
    pub decision_timeout: Option<Duration>,

    /// Value a replication filter returns when its decision times out.
    ///
    /// The default is `true`: the document replicates as if no filter were
    /// installed, which never loses data.
    pub filter_fallback: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            decision_timeout: Some(DEFAULT_DECISION_TIMEOUT),
            filter_fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.decision_timeout, Some(DEFAULT_DECISION_TIMEOUT));
        assert!(config.filter_fallback);
    }
}
