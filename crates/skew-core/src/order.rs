//! Fill direction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Map the boolean `is_buy` flag used by foreign callers.
    pub fn from_is_buy(is_buy: bool) -> Self {
        if is_buy {
            Self::Buy
        } else {
            Self::Sell
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_is_buy() {
        assert_eq!(OrderSide::from_is_buy(true), OrderSide::Buy);
        assert_eq!(OrderSide::from_is_buy(false), OrderSide::Sell);
        assert_eq!(OrderSide::from_is_buy(true).to_string(), "buy");
    }

    #[test]
    fn test_serde_lowercase() {
        let side: OrderSide = serde_json::from_str("\"sell\"").unwrap();
        assert_eq!(side, OrderSide::Sell);
        assert_eq!(serde_json::to_string(&OrderSide::Buy).unwrap(), "\"buy\"");
    }
}
