//! Market vocabulary shared by the generators, stores and the dashboard

use crate::error::MarketError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// FX pairs that signals and alerts are generated for
pub const FX_PAIRS: &[&str] = &[
    "EURUSD", "GBPUSD", "USDJPY", "AUDUSD", "USDCAD", "EURJPY", "GBPJPY",
];

/// Technical indicator labels attached to signals
pub const INDICATORS: &[&str] = &[
    "RSI",
    "MACD",
    "Bollinger Bands",
    "EMA Cross",
    "Stochastic",
    "Fibonacci",
    "Volume Profile",
    "ATR",
];

const GENERIC_BASE_PRICE: f64 = 1.2;
const YEN_BASE_PRICE: f64 = 149.5;

pub fn is_yen_pair(symbol: &str) -> bool {
    symbol.contains("JPY")
}

/// Reference price the generators perturb for a given FX pair
pub fn base_price(symbol: &str) -> f64 {
    if is_yen_pair(symbol) {
        YEN_BASE_PRICE
    } else {
        GENERIC_BASE_PRICE
    }
}

// Enums that travel as fixed lowercase strings.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = MarketError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(MarketError::unknown($kind, other)),
                }
            }
        }
    };
}

wire_enum! {
    /// Trade direction of a signal
    Direction, "direction" {
        Buy => "buy",
        Sell => "sell",
    }
}

wire_enum! {
    /// Chart timeframe a signal was produced on
    Timeframe, "timeframe" {
        M1 => "1m",
        M5 => "5m",
        M15 => "15m",
        H1 => "1h",
        H4 => "4h",
        D1 => "1d",
    }
}

wire_enum! {
    SignalStatus, "signal status" {
        Active => "active",
        Completed => "completed",
    }
}

wire_enum! {
    /// Outcome of a completed signal
    SignalResult, "signal result" {
        Profit => "profit",
        Loss => "loss",
    }
}

wire_enum! {
    /// Alert category; each has its own condition template
    AlertType, "alert type" {
        Price => "price",
        Technical => "technical",
        News => "news",
        AiSignal => "ai_signal",
    }
}

wire_enum! {
    Priority, "priority" {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

impl Priority {
    /// Ranking weight: critical 4, high 3, medium 2, low 1
    pub fn weight(&self) -> u8 {
        match self {
            Priority::Critical => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// Either every value passes, or only one specific value does.
///
/// On the wire this is `"all"` or the wrapped value's own string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::Only(value) => fmt::Display::fmt(value, f),
        }
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(Selection::All)
        } else {
            s.parse().map(Selection::Only)
        }
    }
}

impl<T: fmt::Display> Serialize for Selection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T> Deserialize<'de> for Selection<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_price() {
        assert_eq!(base_price("USDJPY"), 149.5);
        assert_eq!(base_price("GBPJPY"), 149.5);
        assert_eq!(base_price("EURUSD"), 1.2);
    }

    #[test]
    fn test_wire_strings() {
        assert_eq!("ai_signal".parse::<AlertType>().unwrap(), AlertType::AiSignal);
        assert_eq!(Timeframe::M15.to_string(), "15m");
        assert_eq!(
            serde_json::to_string(&Priority::Critical).unwrap(),
            "\"critical\""
        );

        let err = "hold".parse::<Direction>().unwrap_err();
        assert_eq!(err, MarketError::unknown("direction", "hold"));
    }

    #[test]
    fn test_priority_weights_are_ordered() {
        let weights: Vec<u8> = Priority::ALL.iter().map(|p| p.weight()).collect();
        assert_eq!(weights, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_selection() {
        let all: Selection<Direction> = "all".parse().unwrap();
        assert!(all.accepts(&Direction::Buy));
        assert!(all.accepts(&Direction::Sell));

        let only: Selection<Direction> = "sell".parse().unwrap();
        assert!(!only.accepts(&Direction::Buy));
        assert!(only.accepts(&Direction::Sell));

        let json = serde_json::to_string(&Selection::Only(Timeframe::H4)).unwrap();
        assert_eq!(json, "\"4h\"");
        let back: Selection<Timeframe> = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(back, Selection::All);
        assert!(serde_json::from_str::<Selection<Timeframe>>("\"2w\"").is_err());
    }
}
