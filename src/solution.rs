use crate::market::Market;
use num_traits::{AsPrimitive, FromPrimitive, NumAssign, PrimInt, Signed, Unsigned};
use std::fmt::{self, Debug, Display};

/// Index type for buyers and goods. `max_value()` is reserved as the "unassigned" marker.
pub trait UnsignedInt:
    PrimInt + Unsigned + Display + Debug + AsPrimitive<usize> + FromPrimitive + NumAssign
{
}

impl<T> UnsignedInt for T where
    T: PrimInt + Unsigned + Display + Debug + AsPrimitive<usize> + FromPrimitive + NumAssign
{
}

/// Value type for valuations, prices and payoffs.
pub trait Value: PrimInt + Signed + Display + Debug + AsPrimitive<i128> {}

impl<T> Value for T where T: PrimInt + Signed + Display + Debug + AsPrimitive<i128> {}

///
/// Assignment of buyers to goods with the payoff each buyer realized
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment<I, V>
where
    I: UnsignedInt,
    V: Value,
{
    /// index i gives the good owned by buyer i
    ///
    /// Unassigned buyers are marked by MAX value of the integer type (u32::MAX for u32)
    pub buyer_to_good: Vec<I>,
    /// index j gives the buyer who owns good j
    ///
    /// Unassigned goods are marked by MAX value of the integer type (u32::MAX for u32)
    pub good_to_buyer: Vec<I>,
    /// index i gives the payoff realized by buyer i, zero while buyer i is unassigned
    pub payoffs: Vec<V>,
    /// number of buyers still waiting for a good
    pub num_unassigned: I,
}

impl<I, V> Assignment<I, V>
where
    I: UnsignedInt,
    V: Value,
{
    pub fn new(capacity: usize) -> Assignment<I, V> {
        Assignment::<I, V> {
            buyer_to_good: Vec::with_capacity(capacity),
            good_to_buyer: Vec::with_capacity(capacity),
            payoffs: Vec::with_capacity(capacity),
            num_unassigned: I::max_value(),
        }
    }

    pub(crate) fn reset(&mut self, num: I) {
        let num_usize: usize = num.as_();
        self.buyer_to_good.clear();
        self.buyer_to_good.resize(num_usize, I::max_value());
        self.good_to_buyer.clear();
        self.good_to_buyer.resize(num_usize, I::max_value());
        self.payoffs.clear();
        self.payoffs.resize(num_usize, V::zero());
        self.num_unassigned = num;
    }

    /// Number of buyers the assignment was sized for.
    #[inline]
    pub fn len(&self) -> usize {
        self.buyer_to_good.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buyer_to_good.is_empty()
    }

    /// Every buyer holds exactly one good.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.num_unassigned == I::zero()
    }

    /// Good and payoff of `buyer`, if it has been matched.
    pub fn get(&self, buyer: I) -> Option<(I, V)> {
        let buyer_usize: usize = buyer.as_();
        match self.buyer_to_good.get(buyer_usize) {
            Some(&good) if good != I::max_value() => Some((good, self.payoffs[buyer_usize])),
            _ => None,
        }
    }

    /// Buyer holding `good`, if any.
    pub fn owner(&self, good: I) -> Option<I> {
        self.good_to_buyer
            .get(good.as_())
            .copied()
            .filter(|&buyer| buyer != I::max_value())
    }

    /// Matched `(buyer, good, payoff)` triples in ascending buyer order.
    pub fn iter(&self) -> impl Iterator<Item = (I, I, V)> + '_ {
        num_iter::range(I::zero(), I::from_usize(self.len()).unwrap_or_else(I::max_value))
            .zip(self.buyer_to_good.iter().zip(self.payoffs.iter()))
            .filter(|(_, (&good, _))| good != I::max_value())
            .map(|(buyer, (&good, &payoff))| (buyer, good, payoff))
    }

    /// Sum of realized payoffs over matched buyers.
    pub fn total_payoff(&self) -> i128 {
        self.iter().map(|(_, _, payoff)| payoff.as_()).sum()
    }

    /// Buyers that would strictly prefer some other good at the posted prices.
    ///
    /// The best-response rounds never adjust prices, so a complete assignment is not necessarily
    /// market clearing. Unmatched buyers are always reported.
    pub fn frustrated_buyers(&self, market: &Market<I, V>) -> Vec<I> {
        num_iter::range(I::zero(), market.num())
            .filter(|&buyer| match self.get(buyer) {
                Some((_, payoff)) => market.best_payoff(buyer).map_or(false, |best| best > payoff),
                None => true,
            })
            .collect()
    }

    /// No buyer prefers a good other than the one it received.
    pub fn is_market_clearing(&self, market: &Market<I, V>) -> bool {
        self.len() == market.len() && self.frustrated_buyers(market).is_empty()
    }
}

impl<I, V> Display for Assignment<I, V>
where
    I: UnsignedInt,
    V: Value,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (buyer, good, payoff) in self.iter() {
            let buyer_usize: usize = buyer.as_();
            let good_usize: usize = good.as_();
            writeln!(
                f,
                "Buyer_{} -> House_{} (payoff {})",
                buyer_usize + 1,
                good_usize + 1,
                payoff
            )?;
        }
        Ok(())
    }
}
