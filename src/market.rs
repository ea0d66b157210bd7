use crate::error::{ClearingError, Dimension};
use crate::solution::{UnsignedInt, Value};
use tracing::trace;

/// Square market of `n` buyers and `n` goods with posted prices.
///
/// The valuation matrix is checked against `n` on construction and payoffs are computed once, so
/// the clearing rounds never see a malformed market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Market<I: UnsignedInt, V: Value> {
    num: I,
    prices: Vec<V>,
    // memory view of all valuations, one row of n goods per buyer
    valuations: Vec<V>,
    // valuation minus price, same layout as valuations
    payoffs: Vec<V>,
}

impl<I: UnsignedInt, V: Value> Market<I, V> {
    pub fn new(num: usize, prices: Vec<V>, valuations: Vec<Vec<V>>) -> Result<Self, ClearingError> {
        // max value of the index type marks unassigned buyers and goods
        let num_i = I::from_usize(num)
            .filter(|n| *n < I::max_value())
            .ok_or(ClearingError::TooManyParticipants { participants: num })?;

        if prices.len() != num {
            return Err(ClearingError::ShapeMismatch {
                dimension: Dimension::Prices,
                expected: num,
                actual: prices.len(),
            });
        }
        if valuations.len() != num {
            return Err(ClearingError::ShapeMismatch {
                dimension: Dimension::ValuationRows,
                expected: num,
                actual: valuations.len(),
            });
        }
        if let Some((buyer, row)) = valuations
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != num)
        {
            return Err(ClearingError::ShapeMismatch {
                dimension: Dimension::ValuationRow(buyer),
                expected: num,
                actual: row.len(),
            });
        }

        let mut flat = Vec::with_capacity(num * num);
        let mut payoffs = Vec::with_capacity(num * num);
        for (buyer, row) in valuations.into_iter().enumerate() {
            for (good, (value, price)) in row.iter().zip(prices.iter()).enumerate() {
                let payoff = value
                    .checked_sub(price)
                    .ok_or(ClearingError::PayoffOverflow { buyer, good })?;
                payoffs.push(payoff);
            }
            flat.extend(row);
        }
        trace!("market of {} buyers, prices {:?}", num, prices);

        Ok(Market {
            num: num_i,
            prices,
            valuations: flat,
            payoffs,
        })
    }

    /// Builds a market from its rows, taking `n` from the price vector.
    pub fn from_rows(prices: Vec<V>, valuations: Vec<Vec<V>>) -> Result<Self, ClearingError> {
        let num = prices.len();
        Self::new(num, prices, valuations)
    }

    #[inline]
    pub fn num(&self) -> I {
        self.num
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    #[inline]
    pub fn prices(&self) -> &[V] {
        &self.prices
    }

    #[inline]
    pub fn price(&self, good: I) -> V {
        self.prices[good.as_()]
    }

    pub fn valuation_row(&self, buyer: I) -> &[V] {
        let start = buyer.as_() * self.len();
        &self.valuations[start..start + self.len()]
    }

    #[inline]
    pub fn valuation(&self, buyer: I, good: I) -> V {
        self.valuation_row(buyer)[good.as_()]
    }

    /// Payoffs of `buyer` for every good, indexed by good.
    pub fn payoff_row(&self, buyer: I) -> &[V] {
        let start = buyer.as_() * self.len();
        &self.payoffs[start..start + self.len()]
    }

    #[inline]
    pub fn payoff(&self, buyer: I, good: I) -> V {
        self.payoff_row(buyer)[good.as_()]
    }

    /// Highest payoff `buyer` can get from any good, `None` for an empty market.
    pub fn best_payoff(&self, buyer: I) -> Option<V> {
        self.payoff_row(buyer).iter().copied().max()
    }
}
