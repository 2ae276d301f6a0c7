//! Engine settings sourced from the environment.

use serde::{Deserialize, Serialize};

use crate::MatchStrategy;

/// Environment variable selecting the [`MatchStrategy`].
pub const STRATEGY_ENV: &str = "SLOTLIST_AUTHZ_STRATEGY";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthzSettings {
    pub strategy: MatchStrategy,
}

impl AuthzSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`; unknown values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let strategy = match lookup(STRATEGY_ENV) {
            None => MatchStrategy::default(),
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                tracing::warn!(%err, "{STRATEGY_ENV} not understood; using default strategy");
                MatchStrategy::default()
            }),
        };
        Self { strategy }
    }
}
