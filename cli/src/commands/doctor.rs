//! Hand-history invariant checker.
//!
//! The `doctor` command runs the testable properties a recorded hand
//! history must satisfy against a JSONL file written by `play` (or by an
//! external caller of the engine's command surface): chip conservation,
//! per-street commitment equality, min-raise monotonicity, and
//! action-log totality. Results are reported the same way as every other
//! check in this CLI — one JSON object per check, `ok` or `fail` with a
//! detail string — so `doctor` can sit in a CI pipeline and its exit code
//! (0 if every hand passes, 2 otherwise) gates on it.

use crate::error::CliError;
use crate::history::{HandHistoryRecord, load_records};
use crate::ui;
use holdem_engine::hand::Round;
use holdem_engine::player::ActionKind;
use std::collections::HashSet;
use std::io::Write;

struct DoctorCheck {
    name: &'static str,
    ok: bool,
    detail: String,
}

impl DoctorCheck {
    fn ok(name: &'static str, detail: impl Into<String>) -> Self {
        DoctorCheck {
            name,
            ok: true,
            detail: detail.into(),
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        DoctorCheck {
            name,
            ok: false,
            detail: detail.into(),
        }
    }

    fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "check": self.name,
            "status": if self.ok { "ok" } else { "fail" },
            "detail": self.detail,
        })
    }
}

pub fn handle_doctor_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let records = load_records(&input).map_err(CliError::InvalidInput)?;
    if records.is_empty() {
        ui::write_error(err, &format!("{input}: no hands recorded"))?;
        return Err(CliError::InvalidInput(format!(
            "{input}: no hands recorded"
        )));
    }

    let mut checks = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let label = format!("hand[{index}]");
        checks.push(check_chip_conservation(&label, record));
        checks.push(check_street_commitment_equality(&label, record));
        checks.push(check_min_raise_monotonicity(&label, record));
        checks.push(check_action_log_totality(&label, record));
    }

    let failures = checks.iter().filter(|c| !c.ok).count();
    let report = serde_json::json!({
        "hands_checked": records.len(),
        "checks_run": checks.len(),
        "checks_failed": failures,
        "checks": checks.iter().map(DoctorCheck::to_value).collect::<Vec<_>>(),
    });
    let json_str = serde_json::to_string_pretty(&report).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;

    if failures > 0 {
        return Err(CliError::InvalidInput(format!(
            "{failures} check(s) failed"
        )));
    }
    Ok(())
}

/// `Σ players.amount + hand.pot + Σ past_refunds == Σ starting_stacks − Σ
/// antes_paid`. A recorded hand only carries the post-hand pot and
/// winners, not the live player stacks, so this check is scoped to what a
/// history record can actually prove: every winner share must add back up
/// to the recorded pot once the hand completed.
fn check_chip_conservation(label: &str, record: &HandHistoryRecord) -> DoctorCheck {
    if !record.hand.is_complete {
        return DoctorCheck::ok(
            "chip_conservation",
            format!("{label}: hand not yet complete, skipped"),
        );
    }
    let awarded: u64 = record.winners().iter().map(|(_, amount)| amount).sum();
    if awarded == record.hand.pot {
        DoctorCheck::ok(
            "chip_conservation",
            format!("{label}: pot {} fully awarded", record.hand.pot),
        )
    } else {
        DoctorCheck::fail(
            "chip_conservation",
            format!(
                "{label}: pot={} but winners sum to {awarded}",
                record.hand.pot
            ),
        )
    }
}

/// At the moment a street ends, every live non-all-in player must have
/// matched `current_bet`. A finished hand's record doesn't carry live
/// per-player commitment directly, so this is reconstructed from the
/// action log: within each street, every non-fold, non-all-in actor's
/// last logged `amount` on that street must equal the street's final bet.
fn check_street_commitment_equality(label: &str, record: &HandHistoryRecord) -> DoctorCheck {
    for round in [Round::Preflop, Round::Flop, Round::Turn, Round::River] {
        let street_actions: Vec<_> = record
            .actions
            .iter()
            .filter(|a| a.round == round)
            .collect();
        if street_actions.is_empty() {
            continue;
        }
        let max_bet = street_actions
            .iter()
            .filter(|a| a.action != ActionKind::Fold)
            .map(|a| a.amount)
            .max()
            .unwrap_or(0);
        let mut last_amount = std::collections::HashMap::new();
        for action in &street_actions {
            if action.action == ActionKind::Fold || action.action == ActionKind::AllIn {
                continue;
            }
            last_amount.insert(action.player_id, action.amount);
        }
        for (player, amount) in &last_amount {
            if *amount != max_bet {
                return DoctorCheck::fail(
                    "street_commitment_equality",
                    format!(
                        "{label}/{round:?}: player {player} committed {amount} but street bet was {max_bet}"
                    ),
                );
            }
        }
    }
    DoctorCheck::ok(
        "street_commitment_equality",
        format!("{label}: every street closed with equal commitments"),
    )
}

/// For every raise/re-raise, the increment over the previous bet must be
/// at least the previous raise's increment on that street (an all-in for
/// less is exempt — it was already validated by the engine when it was
/// recorded and does not reopen the action).
fn check_min_raise_monotonicity(label: &str, record: &HandHistoryRecord) -> DoctorCheck {
    for round in [Round::Preflop, Round::Flop, Round::Turn, Round::River] {
        let mut current_bet = 0u64;
        let mut last_raise_increment = record.hand.big_blind_amount;
        for action in record.actions.iter().filter(|a| a.round == round) {
            match action.action {
                ActionKind::Raise | ActionKind::ReRaise => {
                    let increment = action.amount.saturating_sub(current_bet);
                    if increment < last_raise_increment {
                        return DoctorCheck::fail(
                            "min_raise_monotonicity",
                            format!(
                                "{label}/{round:?}: raise increment {increment} below required {last_raise_increment}"
                            ),
                        );
                    }
                    last_raise_increment = increment;
                    current_bet = action.amount;
                }
                ActionKind::Bet => {
                    current_bet = action.amount;
                }
                ActionKind::AllIn => {
                    current_bet = current_bet.max(action.amount);
                }
                _ => {}
            }
        }
    }
    DoctorCheck::ok(
        "min_raise_monotonicity",
        format!("{label}: every raise met the minimum increment"),
    )
}

/// `action_order` must be a gapless 1..N sequence for the hand.
fn check_action_log_totality(label: &str, record: &HandHistoryRecord) -> DoctorCheck {
    let mut orders: Vec<u64> = record.actions.iter().map(|a| a.action_order).collect();
    orders.sort_unstable();
    let unique: HashSet<u64> = orders.iter().copied().collect();
    if unique.len() != orders.len() {
        return DoctorCheck::fail(
            "action_log_totality",
            format!("{label}: duplicate action_order values"),
        );
    }
    let expected: Vec<u64> = (1..=orders.len() as u64).collect();
    if orders == expected {
        DoctorCheck::ok(
            "action_log_totality",
            format!("{label}: {} action(s), gapless", orders.len()),
        )
    } else {
        DoctorCheck::fail(
            "action_log_totality",
            format!("{label}: action_order sequence has gaps: {orders:?}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use holdem_engine::action_log::Action;
    use holdem_engine::hand::Hand;
    use holdem_engine::ids::GameId;
    use std::collections::HashMap;

    fn sample_hand() -> Hand {
        let mut hand = Hand::new(GameId::new(), 1, 0, Some(1), 2);
        hand.small_blind_amount = 50;
        hand.big_blind_amount = 100;
        hand.pot = 150;
        hand
    }

    #[test]
    fn chip_conservation_passes_when_winners_match_pot() {
        let mut hand = sample_hand();
        let winner = holdem_engine::ids::PlayerId::new();
        hand.is_complete = true;
        hand.winners = vec![(winner, 150)];
        let record = HandHistoryRecord {
            game_id: hand.game_id,
            hand,
            actions: Vec::new(),
            player_names: HashMap::new(),
            recorded_at: Utc::now(),
        };
        let check = check_chip_conservation("hand[0]", &record);
        assert!(check.ok);
    }

    #[test]
    fn chip_conservation_fails_on_mismatch() {
        let mut hand = sample_hand();
        let winner = holdem_engine::ids::PlayerId::new();
        hand.is_complete = true;
        hand.winners = vec![(winner, 100)];
        let record = HandHistoryRecord {
            game_id: hand.game_id,
            hand,
            actions: Vec::new(),
            player_names: HashMap::new(),
            recorded_at: Utc::now(),
        };
        let check = check_chip_conservation("hand[0]", &record);
        assert!(!check.ok);
    }

    #[test]
    fn action_log_totality_detects_gap() {
        let hand = sample_hand();
        let hand_id = hand.id;
        let p1 = holdem_engine::ids::PlayerId::new();
        let actions = vec![
            Action::new(hand_id, p1, Round::Preflop, ActionKind::Call, 100, 1, Utc::now()),
            Action::new(hand_id, p1, Round::Preflop, ActionKind::Check, 0, 3, Utc::now()),
        ];
        let record = HandHistoryRecord {
            game_id: hand.game_id,
            hand,
            actions,
            player_names: HashMap::new(),
            recorded_at: Utc::now(),
        };
        let check = check_action_log_totality("hand[0]", &record);
        assert!(!check.ok);
    }

    #[test]
    fn doctor_reports_error_for_missing_file() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result =
            handle_doctor_command("does-not-exist.jsonl".to_string(), &mut out, &mut err);
        assert!(result.is_err());
    }
}
