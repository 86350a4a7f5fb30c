//! Who owes who after a session.
//!
//! Each participant's net is `final balance - buy-in`. Debts are matched
//! greedily, the largest debtor paying the largest creditor first, which
//! keeps the number of transfers at most one less than the number of
//! players. All arithmetic is done in whole cents and saturates rather than
//! overflowing, so hand-edited history can't bring settlement down.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{history::CompletedSession, roster::PlayerId, session::entities::Amount};

/// A single payment between two players.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Transfer {
    pub from: PlayerId,
    pub to: PlayerId,
    pub amount: Amount,
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pays {} ${}", self.from, self.to, self.amount)
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Settlement {
    /// Net result per participant, in participant order.
    pub nets: Vec<(PlayerId, Amount)>,
    pub transfers: Vec<Transfer>,
    /// Sum of all nets. Non-zero when the reported balances don't add up to
    /// the money that went in.
    pub imbalance: Amount,
}

impl Settlement {
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.imbalance.to_cents() == 0
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.transfers.is_empty() {
            write!(f, "Nobody owes anything.")?;
        } else {
            let lines: Vec<String> = self.transfers.iter().map(ToString::to_string).collect();
            write!(f, "{}", lines.join("\n"))?;
        }
        if !self.is_balanced() {
            write!(f, "\nBalances are off by ${}", self.imbalance)?;
        }
        Ok(())
    }
}

/// Compute nets and transfers for a completed session.
#[must_use]
pub fn settle(session: &CompletedSession) -> Settlement {
    let buy_in = session.buy_in.to_cents();
    let nets: Vec<(PlayerId, i64)> = session
        .balances()
        .map(|(player, amount)| (player.clone(), amount.to_cents().saturating_sub(buy_in)))
        .collect();

    // Stable sorts keep participant order among equal amounts.
    let mut debtors: Vec<(PlayerId, i64)> = nets
        .iter()
        .filter(|(_, net)| *net < 0)
        .map(|(p, net)| (p.clone(), net.saturating_neg()))
        .collect();
    debtors.sort_by(|a, b| b.1.cmp(&a.1));

    let mut creditors: Vec<(PlayerId, i64)> =
        nets.iter().filter(|(_, net)| *net > 0).cloned().collect();
    creditors.sort_by(|a, b| b.1.cmp(&a.1));

    let mut transfers = Vec::new();
    let (mut d, mut c) = (0, 0);
    while d < debtors.len() && c < creditors.len() {
        let amount = debtors[d].1.min(creditors[c].1);
        transfers.push(Transfer {
            from: debtors[d].0.clone(),
            to: creditors[c].0.clone(),
            amount: Amount::from_cents(amount),
        });
        debtors[d].1 -= amount;
        creditors[c].1 -= amount;
        if debtors[d].1 == 0 {
            d += 1;
        }
        if creditors[c].1 == 0 {
            c += 1;
        }
    }

    let imbalance = nets
        .iter()
        .fold(0i64, |sum, (_, net)| sum.saturating_add(*net));

    Settlement {
        nets: nets
            .into_iter()
            .map(|(p, net)| (p, Amount::from_cents(net)))
            .collect(),
        transfers,
        imbalance: Amount::from_cents(imbalance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn session(buy_in: f64, players: &[(&str, f64)]) -> CompletedSession {
        CompletedSession {
            id: Uuid::new_v4(),
            completed_at: Utc::now(),
            buy_in: Amount::from(buy_in),
            participants: players.iter().map(|(p, _)| PlayerId::from(*p)).collect(),
            final_balances: players
                .iter()
                .map(|(p, b)| (PlayerId::from(*p), Amount::from(*b)))
                .collect(),
        }
    }

    #[test]
    fn test_heads_up_settlement() {
        let settlement = settle(&session(50.0, &[("alice", 60.0), ("bob", 40.0)]));
        assert_eq!(
            settlement.transfers,
            vec![Transfer {
                from: PlayerId::from("bob"),
                to: PlayerId::from("alice"),
                amount: Amount::from(10.0),
            }]
        );
        assert!(settlement.is_balanced());
        assert_eq!(settlement.to_string(), "bob pays alice $10.0");
    }

    #[test]
    fn test_largest_debtor_pays_largest_creditor() {
        let settlement = settle(&session(
            100.0,
            &[("a", 180.0), ("b", 20.0), ("c", 70.0), ("d", 130.0)],
        ));
        let rendered: Vec<String> = settlement.transfers.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["b pays a $80.0", "c pays d $30.0"]
        );
    }

    #[test]
    fn test_even_game_needs_no_transfers() {
        let settlement = settle(&session(20.0, &[("a", 20.0), ("b", 20.0)]));
        assert!(settlement.transfers.is_empty());
        assert_eq!(settlement.to_string(), "Nobody owes anything.");
    }

    #[test]
    fn test_imbalance_is_reported() {
        let settlement = settle(&session(50.0, &[("a", 70.0), ("b", 40.0)]));
        assert_eq!(settlement.imbalance, Amount::from(10.0));
        assert_eq!(
            settlement.to_string(),
            "b pays a $10.0\nBalances are off by $10.0"
        );
    }

    #[test]
    fn test_extreme_stored_balances_do_not_overflow() {
        let settlement = settle(&session(1.0, &[("a", 1e300), ("b", -1e300), ("c", -1e17)]));
        assert_eq!(settlement.nets.len(), 3);
        assert!(!settlement.transfers.is_empty());
        assert!(!settlement.is_balanced());
    }
}
