use crate::ledger::AssignmentLedger;
use crate::resolver::Preference;
use crate::solution::{Assignment, UnsignedInt, Value};
use tracing::trace;

/// Pairs committed and buyers left waiting by one round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundOutcome {
    pub committed: usize,
    pub deferred: usize,
    /// entries naming a buyer that is not waiting (out of range, already matched, listed twice)
    /// or a good outside the market; they are skipped
    pub rejected: usize,
}

/// Commits the uncontested part of one round's preferences.
///
/// Buyers are served in ascending index order: the first buyer asking for a good gets it, later
/// claimants of the same good wait for the next round, when that good is no longer offered.
/// This is not a payoff-maximizing resolution of contention.
///
/// Entries for buyers that are not waiting, or for goods outside the market, never commit and
/// are counted as rejected.
pub fn commit_round<I: UnsignedInt, V: Value>(
    preferences: &mut [Preference<I, V>],
    ledger: &mut AssignmentLedger<I>,
    solution: &mut Assignment<I, V>,
) -> RoundOutcome {
    // stable and linear on already ordered input
    preferences.sort_by_key(|preference| preference.buyer);

    let mut outcome = RoundOutcome::default();
    for preference in preferences.iter() {
        if !ledger.is_buyer_open(preference.buyer) {
            trace!("buyer {} is not waiting for a good", preference.buyer);
            outcome.rejected += 1;
            continue;
        }
        match preference.choice {
            Some((good, _)) if good.as_() >= ledger.len() => {
                trace!("buyer {} asks for unknown good {}", preference.buyer, good);
                outcome.rejected += 1;
            }
            Some((good, payoff)) if ledger.is_good_open(good) => {
                ledger.commit(solution, preference.buyer, good, payoff);
                outcome.committed += 1;
            }
            Some((good, _)) => {
                trace!(
                    "buyer {} loses good {} to buyer {:?}",
                    preference.buyer,
                    good,
                    solution.owner(good)
                );
                outcome.deferred += 1;
            }
            None => outcome.deferred += 1,
        }
    }
    ledger.end_round();
    outcome
}

#[cfg(test)]
mod tests {
    use super::{commit_round, RoundOutcome};
    use crate::ledger::AssignmentLedger;
    use crate::resolver::Preference;
    use crate::solution::Assignment;

    fn fresh(n: u32) -> (AssignmentLedger<u32>, Assignment<u32, i64>) {
        let mut ledger = AssignmentLedger::with_capacity(n as usize);
        let mut solution = Assignment::new(n as usize);
        ledger.init(n);
        solution.reset(n);
        (ledger, solution)
    }

    #[test]
    fn test_lowest_buyer_wins_contested_good() {
        let (mut ledger, mut solution) = fresh(3);
        // listed out of order on purpose
        let mut preferences = vec![
            Preference { buyer: 2, choice: Some((0, 8)) },
            Preference { buyer: 0, choice: Some((1, 3)) },
            Preference { buyer: 1, choice: Some((0, 9)) },
        ];
        let outcome = commit_round(&mut preferences, &mut ledger, &mut solution);

        assert_eq!(outcome, RoundOutcome { committed: 2, deferred: 1, rejected: 0 });
        assert_eq!(solution.get(1), Some((0, 9)));
        assert_eq!(solution.get(0), Some((1, 3)));
        assert_eq!(solution.get(2), None);
        assert_eq!(ledger.remaining_buyers(), &[2]);
        assert_eq!(ledger.remaining_goods(), &[2]);
    }

    #[test]
    fn test_missing_choices_are_deferred() {
        let (mut ledger, mut solution) = fresh(1);
        let mut preferences = vec![Preference { buyer: 0, choice: None }];
        let outcome = commit_round(&mut preferences, &mut ledger, &mut solution);
        assert_eq!(outcome, RoundOutcome { committed: 0, deferred: 1, rejected: 0 });
        assert_eq!(ledger.remaining_buyers(), &[0]);
    }

    #[test]
    fn test_buyer_listed_twice_commits_once() {
        let (mut ledger, mut solution) = fresh(2);
        let mut preferences = vec![
            Preference { buyer: 0, choice: Some((0, 5)) },
            Preference { buyer: 0, choice: Some((1, 4)) },
        ];
        let outcome = commit_round(&mut preferences, &mut ledger, &mut solution);

        assert_eq!(outcome, RoundOutcome { committed: 1, deferred: 0, rejected: 1 });
        assert_eq!(solution.buyer_to_good, vec![0, u32::MAX]);
        assert_eq!(solution.good_to_buyer, vec![0, u32::MAX]);
        assert_eq!(solution.num_unassigned, 1);
        assert!(!solution.is_complete());
        assert_eq!(ledger.remaining_buyers(), &[1]);
        assert_eq!(ledger.remaining_goods(), &[1]);
    }

    #[test]
    fn test_matched_and_unknown_indices_are_rejected() {
        let (mut ledger, mut solution) = fresh(2);
        let mut first = vec![Preference { buyer: 1, choice: Some((1, 2)) }];
        commit_round(&mut first, &mut ledger, &mut solution);

        let mut preferences = vec![
            Preference { buyer: 0, choice: Some((7, 3)) },
            Preference { buyer: 1, choice: Some((0, 9)) },
            Preference { buyer: 5, choice: Some((0, 9)) },
        ];
        let outcome = commit_round(&mut preferences, &mut ledger, &mut solution);

        assert_eq!(outcome, RoundOutcome { committed: 0, deferred: 0, rejected: 3 });
        assert_eq!(solution.get(1), Some((1, 2)));
        assert_eq!(solution.num_unassigned, 1);
        assert_eq!(ledger.remaining_goods(), &[0]);
    }
}
