use std::time::Duration;

use crate::{
    error::CryoError,
    query::QueryPolicy,
    search::{SearchConfig, Strategy},
    terms::DEFAULT_TERM_TTL,
};

/// Builder for search configurations, starting from one of the presets
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    /// Create a new builder from the full search preset
    pub fn new() -> Self {
        Self {
            config: SearchConfig::full(),
        }
    }

    /// Full text plus identifier matching, with did-you-mean and fallback
    pub fn full() -> Self {
        Self::new()
    }

    /// Substring plus identifier matching only
    pub fn quick() -> Self {
        Self {
            config: SearchConfig::quick(),
        }
    }

    /// Set the maximum number of fused results, also used per strategy
    pub fn limit(mut self, limit: usize) -> Self {
        self.config.limit = limit;
        self.config.strategy_limit = limit;
        self
    }

    /// Set how many hits each strategy may contribute before fusion
    pub fn strategy_limit(mut self, limit: usize) -> Self {
        self.config.strategy_limit = limit;
        self
    }

    /// Replace the strategy list; order decides which duplicate is kept
    pub fn strategies(mut self, strategies: impl IntoIterator<Item = Strategy>) -> Self {
        self.config.strategies = strategies.into_iter().collect();
        self
    }

    pub fn did_you_mean(mut self, enabled: bool) -> Self {
        self.config.did_you_mean = enabled;
        self
    }

    pub fn closest_match_fallback(mut self, enabled: bool) -> Self {
        self.config.closest_match_fallback = enabled;
        self
    }

    /// Minimum number of characters a query must keep after sanitizing
    pub fn min_query_len(mut self, min_len: usize) -> Self {
        self.config.query_policy.min_len = min_len;
        self
    }

    pub fn reject_unsafe_characters(mut self, enabled: bool) -> Self {
        self.config.query_policy.reject_unsafe = enabled;
        self
    }

    pub fn query_policy(mut self, policy: QueryPolicy) -> Self {
        self.config.query_policy = policy;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> SearchConfig {
        self.config
    }

    /// Build, rejecting configurations that can never return anything
    pub fn try_build(self) -> Result<SearchConfig, CryoError> {
        let config = self.config;
        if config.limit == 0 || config.strategy_limit == 0 {
            return Err(CryoError::ConfigError(
                "Result limits must be at least 1".to_string(),
            ));
        }
        if config.strategies.is_empty() {
            return Err(CryoError::ConfigError(
                "At least one search strategy is required".to_string(),
            ));
        }
        if config.query_policy.min_len == 0 {
            return Err(CryoError::ConfigError(
                "Minimum query length must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }
}

/// Settings for a [`CompoundSearcher`](crate::CompoundSearcher) as a whole
#[derive(Debug, Clone, PartialEq)]
pub struct SearcherConfig {
    pub search: SearchConfig,
    pub quick_search: SearchConfig,
    /// How long a term index snapshot stays fresh
    pub term_ttl: Duration,
}

impl Default for SearcherConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::full(),
            quick_search: SearchConfig::quick(),
            term_ttl: DEFAULT_TERM_TTL,
        }
    }
}
