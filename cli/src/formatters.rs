//! Terminal formatting helpers for hand/action/opportunity display.

use holdem_engine::action_log::Action;
use holdem_engine::opportunities::ActionOpportunities;
use holdem_engine::player::ActionKind;

pub fn format_action_kind(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::Bet => "bets",
        ActionKind::Fold => "folds",
        ActionKind::Call => "calls",
        ActionKind::Check => "checks",
        ActionKind::Raise => "raises to",
        ActionKind::ReRaise => "re-raises to",
        ActionKind::AllIn => "is all-in for",
    }
}

/// One-line description of a logged action, e.g. `"alice raises to 300"`.
pub fn format_action(action: &Action, player_name: &str) -> String {
    match action.action {
        ActionKind::Fold | ActionKind::Check => {
            format!("{player_name} {}", format_action_kind(action.action))
        }
        _ => format!(
            "{player_name} {} {}",
            format_action_kind(action.action),
            action.amount
        ),
    }
}

/// Renders the legal-action set for the player on turn as a short prompt
/// listing the commands `play`'s input parser accepts.
pub fn format_opportunities(opp: &ActionOpportunities) -> String {
    let mut choices = Vec::new();
    if opp.can_check {
        choices.push("check".to_string());
    }
    if opp.can_call {
        choices.push(format!("call {}", opp.call_amount));
    }
    if opp.can_bet {
        if let (Some(min), Some(max)) = (opp.min_open_total, opp.max_open_total) {
            choices.push(format!("bet <{min}-{max}>"));
        }
    }
    if opp.can_raise {
        if let (Some(min), Some(max)) = (opp.min_open_total, opp.max_open_total) {
            let verb = match opp.raise_kind_hint {
                Some(ActionKind::ReRaise) => "re-raise",
                _ => "raise",
            };
            choices.push(format!("{verb} <{min}-{max}>"));
        }
    }
    if opp.can_all_in {
        choices.push("allin".to_string());
    }
    if opp.can_fold {
        choices.push("fold".to_string());
    }
    choices.join(", ")
}
