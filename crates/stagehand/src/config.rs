//! Bridge configuration.

/// Behavior toggles for the bridge.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Ask the host to re-scan after a command mutates asset state.
    pub refresh_after_mutation: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            refresh_after_mutation: true,
        }
    }
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether mutating commands trigger a host refresh.
    pub fn with_refresh_after_mutation(mut self, refresh: bool) -> Self {
        self.refresh_after_mutation = refresh;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_defaults_on() {
        assert!(BridgeConfig::default().refresh_after_mutation);
        assert!(!BridgeConfig::new().with_refresh_after_mutation(false).refresh_after_mutation);
    }
}
