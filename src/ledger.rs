use crate::solution::{Assignment, UnsignedInt, Value};
use tracing::trace;

/// Remaining buyers and goods of one clearing call.
///
/// Both sets are kept in ascending index order. Commits within a round only close the buyer and
/// the good; they are compacted out of the remaining sets by `end_round`, so the resolver of the
/// next round sees the post-round state.
#[derive(Debug, Clone)]
pub struct AssignmentLedger<I: UnsignedInt> {
    remaining_buyers: Vec<I>,
    remaining_goods: Vec<I>,
    buyer_open: Vec<bool>,
    good_open: Vec<bool>,
    committed: usize,
}

impl<I: UnsignedInt> AssignmentLedger<I> {
    pub fn with_capacity(capacity: usize) -> Self {
        AssignmentLedger {
            remaining_buyers: Vec::with_capacity(capacity),
            remaining_goods: Vec::with_capacity(capacity),
            buyer_open: Vec::with_capacity(capacity),
            good_open: Vec::with_capacity(capacity),
            committed: 0,
        }
    }

    /// Opens every buyer and good of a market of size `num`.
    pub fn init(&mut self, num: I) {
        let num_usize: usize = num.as_();
        self.remaining_buyers.clear();
        self.remaining_buyers.extend(num_iter::range(I::zero(), num));
        self.remaining_goods.clear();
        self.remaining_goods.extend(num_iter::range(I::zero(), num));
        self.buyer_open.clear();
        self.buyer_open.resize(num_usize, true);
        self.good_open.clear();
        self.good_open.resize(num_usize, true);
        self.committed = 0;
    }

    #[inline]
    pub fn remaining_buyers(&self) -> &[I] {
        &self.remaining_buyers
    }

    #[inline]
    pub fn remaining_goods(&self) -> &[I] {
        &self.remaining_goods
    }

    /// Number of buyers, and of goods, the ledger was opened with.
    #[inline]
    pub fn len(&self) -> usize {
        self.buyer_open.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buyer_open.is_empty()
    }

    /// The buyer is in the market and still waiting for a good. False for out of range indices.
    #[inline]
    pub fn is_buyer_open(&self, buyer: I) -> bool {
        self.buyer_open.get(buyer.as_()).copied().unwrap_or(false)
    }

    /// The good has not been committed, including earlier in the current round.
    /// False for out of range indices.
    #[inline]
    pub fn is_good_open(&self, good: I) -> bool {
        self.good_open.get(good.as_()).copied().unwrap_or(false)
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.remaining_buyers.is_empty()
    }

    /// Number of pairs committed since the last `end_round`.
    #[inline]
    pub fn committed_this_round(&self) -> usize {
        self.committed
    }

    /// Records `buyer -> good` with `payoff` and closes both.
    pub fn commit<V: Value>(
        &mut self,
        solution: &mut Assignment<I, V>,
        buyer: I,
        good: I,
        payoff: V,
    ) {
        let buyer_usize: usize = buyer.as_();
        let good_usize: usize = good.as_();
        debug_assert!(self.buyer_open[buyer_usize], "buyer {} committed twice", buyer);
        debug_assert!(self.good_open[good_usize], "good {} committed twice", good);
        debug_assert!(solution.buyer_to_good[buyer_usize] == I::max_value());

        self.buyer_open[buyer_usize] = false;
        self.good_open[good_usize] = false;
        self.committed += 1;

        solution.buyer_to_good[buyer_usize] = good;
        solution.good_to_buyer[good_usize] = buyer;
        solution.payoffs[buyer_usize] = payoff;
        solution.num_unassigned -= I::one();
        trace!("commit buyer {} -> good {} (payoff {})", buyer, good, payoff);
    }

    /// Drops the buyers and goods closed during the round from the remaining sets.
    pub fn end_round(&mut self) {
        let buyer_open = &self.buyer_open;
        self.remaining_buyers.retain(|buyer| buyer_open[buyer.as_()]);
        let good_open = &self.good_open;
        self.remaining_goods.retain(|good| good_open[good.as_()]);
        self.committed = 0;
    }

    #[cfg(test)]
    pub(crate) fn close_good(&mut self, good: I) {
        self.good_open[good.as_()] = false;
    }
}
