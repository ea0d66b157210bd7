use crate::ledger::AssignmentLedger;
use crate::market::Market;
use crate::solution::{UnsignedInt, Value};
use tracing::trace;

/// Good a buyer asks for in the current round, with the payoff it would realize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preference<I, V> {
    pub buyer: I,
    /// `None` when no goods remain for the buyer
    pub choice: Option<(I, V)>,
}

/// Finds the payoff-maximizing remaining good of every remaining buyer.
///
/// Implementations must agree on the tie-break: among goods with equal payoff the one with the
/// lowest index wins.
pub trait PreferenceResolver<I: UnsignedInt, V: Value> {
    /// Called once per clearing call before the first round.
    fn prepare(&mut self, _market: &Market<I, V>) {}

    /// Appends one preference per buyer of `ledger.remaining_buyers()`, in the same order.
    fn resolve(
        &mut self,
        market: &Market<I, V>,
        ledger: &AssignmentLedger<I>,
        preferences: &mut Vec<Preference<I, V>>,
    );
}

/// Scans every remaining good for every remaining buyer, O(n^2) per round.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanResolver;

impl<I: UnsignedInt, V: Value> PreferenceResolver<I, V> for ScanResolver {
    fn resolve(
        &mut self,
        market: &Market<I, V>,
        ledger: &AssignmentLedger<I>,
        preferences: &mut Vec<Preference<I, V>>,
    ) {
        preferences.extend(ledger.remaining_buyers().iter().map(|&buyer| {
            let payoffs = market.payoff_row(buyer);
            let mut choice: Option<(I, V)> = None;
            // goods are ascending, strict comparison keeps the first maximum
            for &good in ledger.remaining_goods() {
                let payoff = payoffs[good.as_()];
                if choice.map_or(true, |(_, max_payoff)| payoff > max_payoff) {
                    choice = Some((good, payoff));
                }
            }
            trace!("buyer {} prefers {:?}", buyer, choice);
            Preference { buyer, choice }
        }));
    }
}

/// Edges `(buyer, good)` of the preferred-seller graph at the posted prices.
///
/// Every buyer is linked to all goods that reach its maximum payoff over the whole market, so
/// tied goods all appear. The lowest tied good is the single edge a first-maximum scan would
/// draw, and the one the buyer asks for in the first round.
/// Edges are ordered by buyer, then by good.
pub fn preferred_seller_graph<I: UnsignedInt, V: Value>(market: &Market<I, V>) -> Vec<(I, I)> {
    let mut edges = Vec::with_capacity(market.len());
    for buyer in num_iter::range(I::zero(), market.num()) {
        let payoffs = market.payoff_row(buyer);
        if let Some(best) = market.best_payoff(buyer) {
            edges.extend(
                num_iter::range(I::zero(), market.num())
                    .filter(|good| payoffs[good.as_()] == best)
                    .map(|good| (buyer, good)),
            );
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::{preferred_seller_graph, Preference, PreferenceResolver, ScanResolver};
    use crate::ledger::AssignmentLedger;
    use crate::market::Market;

    fn ledger_for(market: &Market<u32, i64>) -> AssignmentLedger<u32> {
        let mut ledger = AssignmentLedger::with_capacity(market.len());
        ledger.init(market.num());
        ledger
    }

    #[test]
    fn test_first_maximal_good_wins() {
        let market = Market::<u32, i64>::new(2, vec![0, 2], vec![vec![3, 7], vec![9, 1]]).unwrap();
        // buyer 0: payoffs 3 and 5, buyer 1: payoffs 9 and -1
        let ledger = ledger_for(&market);
        let mut preferences = Vec::new();
        ScanResolver.resolve(&market, &ledger, &mut preferences);
        assert_eq!(
            preferences,
            vec![
                Preference { buyer: 0, choice: Some((1, 5)) },
                Preference { buyer: 1, choice: Some((0, 9)) },
            ]
        );

        let tied = Market::<u32, i64>::new(3, vec![1, 0, 0], vec![vec![5, 4, 4]; 3]).unwrap();
        let ledger = ledger_for(&tied);
        let mut preferences = Vec::new();
        ScanResolver.resolve(&tied, &ledger, &mut preferences);
        assert!(preferences.iter().all(|p| p.choice == Some((0, 4))));
    }

    #[test]
    fn test_retired_goods_are_skipped() {
        let market = Market::<u32, i64>::new(3, vec![0; 3], vec![vec![9, 8, 1]; 3]).unwrap();
        let mut ledger = ledger_for(&market);
        ledger.close_good(0);
        ledger.end_round();
        let mut preferences = Vec::new();
        ScanResolver.resolve(&market, &ledger, &mut preferences);
        assert_eq!(preferences[2].choice, Some((1, 8)));
    }

    #[test]
    fn test_no_goods_left_gives_no_preference() {
        let market = Market::<u32, i64>::new(1, vec![0], vec![vec![1]]).unwrap();
        let mut ledger = ledger_for(&market);
        ledger.close_good(0);
        ledger.end_round();
        let mut preferences = Vec::new();
        ScanResolver.resolve(&market, &ledger, &mut preferences);
        assert_eq!(preferences, vec![Preference { buyer: 0, choice: None }]);
    }

    #[test]
    fn test_preferred_seller_graph_keeps_all_ties() {
        let market = Market::<u32, i64>::new(
            3,
            vec![2, 1, 0],
            vec![vec![5, 4, 3], vec![1, 9, 2], vec![0, 0, 0]],
        )
        .unwrap();
        assert_eq!(
            preferred_seller_graph(&market),
            vec![(0, 0), (0, 1), (0, 2), (1, 1), (2, 2)]
        );
    }

    #[test]
    fn test_preferred_seller_graph_contains_first_round_choices() {
        let market = Market::<u32, i64>::new(
            3,
            vec![2, 1, 0],
            vec![vec![5, 4, 3], vec![1, 9, 2], vec![0, 0, 0]],
        )
        .unwrap();
        let ledger = ledger_for(&market);
        let mut preferences = Vec::new();
        ScanResolver.resolve(&market, &ledger, &mut preferences);

        let edges = preferred_seller_graph(&market);
        for preference in preferences {
            let (good, _) = preference.choice.unwrap();
            let first_edge = edges.iter().find(|(buyer, _)| *buyer == preference.buyer);
            assert_eq!(first_edge, Some(&(preference.buyer, good)));
        }
    }
}
