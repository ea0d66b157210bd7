use crate::input::parse_market;
use crate::market::Market;
use crate::solution::{Assignment, UnsignedInt, Value};
use crate::solver::RoundSummary;
use crate::DefaultSolver;
use anyhow::{anyhow, Context, Result};
use std::str::FromStr;
use tracing::info;

/// Market loaded by a caller and the outcome of its last clearing.
///
/// Loading a market drops any previous result. `reset` drops both.
#[derive(Debug, Clone)]
pub struct Session<I: UnsignedInt, V: Value> {
    market: Option<Market<I, V>>,
    assignment: Option<Assignment<I, V>>,
    history: Vec<RoundSummary<I, V>>,
}

impl<I: UnsignedInt, V: Value> Default for Session<I, V> {
    fn default() -> Self {
        Session {
            market: None,
            assignment: None,
            history: Vec::new(),
        }
    }
}

impl<I: UnsignedInt, V: Value> Session<I, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, market: Market<I, V>) {
        info!("loaded market of {} buyers", market.len());
        self.market = Some(market);
        self.assignment = None;
        self.history.clear();
    }

    pub fn load_str(&mut self, text: &str) -> Result<()>
    where
        V: FromStr,
        <V as FromStr>::Err: std::error::Error + Send + Sync + 'static,
    {
        let market = parse_market(text)?;
        self.load(market);
        Ok(())
    }

    #[inline]
    pub fn market(&self) -> Option<&Market<I, V>> {
        self.market.as_ref()
    }

    #[inline]
    pub fn assignment(&self) -> Option<&Assignment<I, V>> {
        self.assignment.as_ref()
    }

    /// Rounds of the last successful clearing, empty otherwise.
    #[inline]
    pub fn history(&self) -> &[RoundSummary<I, V>] {
        &self.history
    }

    /// Clears the loaded market and keeps the result.
    pub fn clear_market(&mut self) -> Result<&Assignment<I, V>> {
        self.assignment = None;
        self.history.clear();
        let market = self
            .market
            .as_ref()
            .ok_or_else(|| anyhow!("no market loaded"))?;

        let (mut solver, mut solution) = DefaultSolver::<I, V>::new(market.len());
        solver
            .solve(market, &mut solution)
            .context("market clearing failed")?;
        info!(
            "cleared {} buyers in {} rounds, total payoff {}",
            market.len(),
            solver.nrounds,
            solution.total_payoff()
        );

        self.history = solver.history;
        Ok(self.assignment.insert(solution))
    }

    pub fn reset(&mut self) {
        self.market = None;
        self.assignment = None;
        self.history.clear();
    }
}
