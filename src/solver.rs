use crate::error::ClearingError;
use crate::ledger::AssignmentLedger;
use crate::market::Market;
use crate::matcher;
use crate::resolver::{Preference, PreferenceResolver};
use crate::solution::{Assignment, UnsignedInt, Value};
use std::convert::TryFrom;
use tracing::{debug, trace};

/// Statistics of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary<I, V> {
    /// 1-based round number
    pub round: u32,
    pub committed: usize,
    pub deferred: usize,
    /// buyers still unmatched after the round
    pub remaining_buyers: usize,
    /// buyer with the highest preferred payoff of the round (lowest index on ties) and that payoff
    pub leading: Option<(I, V)>,
}

/// Solver for the market clearing problem
/// Which assigns N buyers -> N goods, by letting every unmatched buyer ask for its best
/// remaining good each round until nobody is left
#[derive(Clone)]
pub struct MarketClearingSolver<I, V, R>
where
    I: UnsignedInt,
    V: Value,
    R: PreferenceResolver<I, V>,
{
    resolver: R,
    ledger: AssignmentLedger<I>,
    preferences: Vec<Preference<I, V>>,

    pub nrounds: u32,
    pub history: Vec<RoundSummary<I, V>>,
}

impl<I, V, R> MarketClearingSolver<I, V, R>
where
    I: UnsignedInt,
    V: Value,
    R: PreferenceResolver<I, V> + Default,
{
    pub fn new(capacity: usize) -> (Self, Assignment<I, V>) {
        Self::with_resolver(R::default(), capacity)
    }
}

impl<I, V, R> MarketClearingSolver<I, V, R>
where
    I: UnsignedInt,
    V: Value,
    R: PreferenceResolver<I, V>,
{
    pub fn with_resolver(resolver: R, capacity: usize) -> (Self, Assignment<I, V>) {
        (
            Self {
                resolver,
                ledger: AssignmentLedger::with_capacity(capacity),
                preferences: Vec::with_capacity(capacity),
                nrounds: 0,
                history: Vec::with_capacity(capacity),
            },
            Assignment::new(capacity),
        )
    }

    #[inline]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    #[inline]
    pub fn solve(
        &mut self,
        market: &Market<I, V>,
        solution: &mut Assignment<I, V>,
    ) -> Result<(), ClearingError> {
        self.solve_with_params(market, solution, None)
    }

    fn init_solve(&mut self, market: &Market<I, V>, solution: &mut Assignment<I, V>) {
        self.nrounds = 0;
        self.history.clear();
        self.preferences.clear();
        self.ledger.init(market.num());
        solution.reset(market.num());
        self.resolver.prepare(market);
    }

    /// Runs rounds until every buyer holds a good.
    ///
    /// Without `max_rounds` the cap is `n`: every round on a valid market commits at least the
    /// lowest-index claimant, so it is never reached.
    pub fn solve_with_params(
        &mut self,
        market: &Market<I, V>,
        solution: &mut Assignment<I, V>,
        max_rounds: Option<u32>,
    ) -> Result<(), ClearingError> {
        self.init_solve(market, solution);

        let round_limit = if let Some(rounds) = max_rounds {
            rounds
        } else {
            u32::try_from(market.len()).unwrap_or(u32::MAX)
        };

        while !self.ledger.is_exhausted() {
            let remaining_buyers = self.ledger.remaining_buyers().len();
            let remaining_goods = self.ledger.remaining_goods().len();
            if self.nrounds >= round_limit {
                return Err(ClearingError::RoundLimitExceeded {
                    limit: round_limit,
                    remaining_buyers,
                });
            }
            self.nrounds += 1;

            self.preferences.clear();
            self.resolver.resolve(market, &self.ledger, &mut self.preferences);
            if let Some(stuck) = self.preferences.iter().find(|p| p.choice.is_none()) {
                return Err(ClearingError::NoPreference {
                    buyer: stuck.buyer.as_(),
                });
            }
            let leading = leading_preference(&self.preferences);

            let outcome = matcher::commit_round(&mut self.preferences, &mut self.ledger, solution);
            if outcome.rejected > 0 {
                return Err(ClearingError::StalePreference {
                    round: self.nrounds,
                    rejected: outcome.rejected,
                });
            }
            if outcome.committed == 0 {
                return Err(ClearingError::ConvergenceFailure {
                    round: self.nrounds,
                    remaining_buyers,
                    remaining_goods,
                });
            }

            let summary = RoundSummary {
                round: self.nrounds,
                committed: outcome.committed,
                deferred: outcome.deferred,
                remaining_buyers: self.ledger.remaining_buyers().len(),
                leading,
            };
            debug!("{:?}", summary);
            self.history.push(summary);
        }

        debug_assert!(solution.is_complete());
        trace!("OBJECTIVE: {}", solution.total_payoff());
        trace!("buyer_to_good: {:?}", solution.buyer_to_good);
        debug!("cleared {} buyers in {} rounds", market.len(), self.nrounds);
        Ok(())
    }
}

/// Buyer with the highest preferred payoff, the lowest buyer index on ties.
fn leading_preference<I: UnsignedInt, V: Value>(preferences: &[Preference<I, V>]) -> Option<(I, V)> {
    let mut leading: Option<(I, V)> = None;
    for preference in preferences {
        if let Some((_, payoff)) = preference.choice {
            let better = match leading {
                None => true,
                Some((buyer, max_payoff)) => {
                    payoff > max_payoff || (payoff == max_payoff && preference.buyer < buyer)
                }
            };
            if better {
                leading = Some((preference.buyer, payoff));
            }
        }
    }
    leading
}
