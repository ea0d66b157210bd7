//! Assignment of buyers to indivisible goods under posted prices.
//!
//! Every round each unmatched buyer asks for the remaining good with the highest payoff
//! (valuation minus price). Goods asked for by a single buyer, or by several, go to the
//! lowest-index claimant; the others retry next round without that good. The loop ends when
//! every buyer holds a good, after at most `n` rounds.
//!
//! Prices are never adjusted, so the result is a feasible assignment at the given prices and not
//! necessarily a market-clearing one. [`Assignment::frustrated_buyers`] reports the difference.
//!
//! ```
//! use market_clearing::{clear_market, Market};
//!
//! let market = Market::<u32, i64>::new(2, vec![0, 0], vec![vec![10, 9], vec![10, 1]]).unwrap();
//! let assignment = clear_market(&market).unwrap();
//! assert_eq!(assignment.get(0), Some((0, 10)));
//! assert_eq!(assignment.get(1), Some((1, 1)));
//! ```
pub mod error;
pub mod input;
pub mod ledger;
pub mod market;
pub mod matcher;
pub mod resolver;
pub mod session;
pub mod solution;
pub mod solver;
pub mod sorted;

pub use crate::error::{ClearingError, Dimension};
pub use crate::input::parse_market;
pub use crate::market::Market;
pub use crate::resolver::{preferred_seller_graph, Preference, PreferenceResolver, ScanResolver};
pub use crate::session::Session;
pub use crate::solution::{Assignment, UnsignedInt, Value};
pub use crate::solver::{MarketClearingSolver, RoundSummary};
pub use crate::sorted::SortedResolver;

#[cfg(feature = "sorted")]
pub type DefaultSolver<I, V> = MarketClearingSolver<I, V, SortedResolver<I>>;
#[cfg(not(feature = "sorted"))]
pub type DefaultSolver<I, V> = MarketClearingSolver<I, V, ScanResolver>;

/// Clears `market` with the default resolver.
pub fn clear_market<I: UnsignedInt, V: Value>(
    market: &Market<I, V>,
) -> Result<Assignment<I, V>, ClearingError> {
    let (mut solver, mut solution) = DefaultSolver::<I, V>::new(market.len());
    solver.solve(market, &mut solution)?;
    Ok(solution)
}
