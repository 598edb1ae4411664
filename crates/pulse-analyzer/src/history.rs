//! Recent Symbols
//!
//! Quick-select chips under the search box: most recent first, at most
//! five, no case-insensitive duplicates.

use serde::{Deserialize, Serialize};

/// Maximum number of remembered symbols
pub const MAX_RECENT: usize = 5;

/// Symbols shown before the user has searched anything
pub const STARTER_SYMBOLS: [&str; 3] = ["SOL/USDT", "PEPE/USDT", "ETH/USDT"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSymbols {
    symbols: Vec<String>,
}

impl Default for RecentSymbols {
    fn default() -> Self {
        Self {
            symbols: STARTER_SYMBOLS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl RecentSymbols {
    /// Empty history
    pub const fn empty() -> Self {
        Self {
            symbols: Vec::new(),
        }
    }

    /// Move `symbol` (upper-cased) to the front, evicting the oldest entry
    /// beyond [`MAX_RECENT`]. Blank input is ignored.
    pub fn record(&mut self, symbol: &str) {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return;
        }

        self.symbols.retain(|s| s.to_uppercase() != symbol);
        self.symbols.insert(0, symbol);
        self.symbols.truncate(MAX_RECENT);
    }

    pub fn contains(&self, symbol: &str) -> bool {
        let symbol = symbol.trim().to_uppercase();
        self.symbols.iter().any(|s| s.to_uppercase() == symbol)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.symbols
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_starter_symbols() {
        let history = RecentSymbols::default();
        assert_eq!(history.as_slice(), ["SOL/USDT", "PEPE/USDT", "ETH/USDT"]);
    }

    #[test]
    fn test_most_recent_first_and_uppercased() {
        let mut history = RecentSymbols::default();
        history.record("btc/usdt");
        assert_eq!(history.as_slice()[0], "BTC/USDT");
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn test_duplicate_moves_to_front() {
        let mut history = RecentSymbols::default();
        history.record("eth/usdt");
        assert_eq!(history.as_slice(), ["ETH/USDT", "SOL/USDT", "PEPE/USDT"]);
        assert!(history.contains(" Eth/Usdt "));
    }

    #[test]
    fn test_capped_at_five() {
        let mut history = RecentSymbols::default();
        for symbol in ["BTC", "DOGE", "WIF", "BONK", "SHIB", "doge"] {
            history.record(symbol);
        }

        assert_eq!(history.len(), MAX_RECENT);
        assert_eq!(history.as_slice(), ["DOGE", "SHIB", "BONK", "WIF", "BTC"]);

        let unique: HashSet<_> = history.iter().map(str::to_uppercase).collect();
        assert_eq!(unique.len(), history.len());
    }

    #[test]
    fn test_blank_ignored() {
        let mut history = RecentSymbols::empty();
        history.record("   ");
        assert!(history.is_empty());
    }
}
