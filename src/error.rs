use std::fmt;
use thiserror::Error;

/// Part of the market input whose length is checked against `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Prices,
    ValuationRows,
    /// valuation row of the given buyer
    ValuationRow(usize),
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Prices => write!(f, "price vector"),
            Dimension::ValuationRows => write!(f, "valuation matrix"),
            Dimension::ValuationRow(buyer) => write!(f, "valuation row of buyer {}", buyer),
        }
    }
}

/// Errors raised while building a market or clearing it.
///
/// Construction errors (`ShapeMismatch`, `TooManyParticipants`, `PayoffOverflow`) are reported
/// before any round runs. The remaining variants mean that an internal invariant was broken
/// during a clearing call and abort it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClearingError {
    #[error("{dimension} has length {actual}, expected {expected}")]
    ShapeMismatch {
        dimension: Dimension,
        expected: usize,
        actual: usize,
    },

    #[error("market of {participants} participants does not fit the index type")]
    TooManyParticipants { participants: usize },

    #[error("payoff of buyer {buyer} for good {good} overflows the value type")]
    PayoffOverflow { buyer: usize, good: usize },

    #[error("buyer {buyer} is unmatched but no goods remain")]
    NoPreference { buyer: usize },

    #[error(
        "round {round} committed no pairs with {remaining_buyers} buyers and {remaining_goods} goods remaining"
    )]
    ConvergenceFailure {
        round: u32,
        remaining_buyers: usize,
        remaining_goods: usize,
    },

    #[error("round {round} produced {rejected} preferences for buyers or goods that are not in play")]
    StalePreference { round: u32, rejected: usize },

    #[error("round limit {limit} reached with {remaining_buyers} buyers unmatched")]
    RoundLimitExceeded { limit: u32, remaining_buyers: usize },
}
