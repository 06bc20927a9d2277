//! Input parsing and validation for interactive commands.
//!
//! Turns a line of terminal input into a [`holdem_engine::player::PlayerActionRequest`]
//! for the `play` command's action prompt.

use holdem_engine::player::PlayerActionRequest;

/// Result of parsing a line of player input during interactive play.
#[derive(Debug, PartialEq)]
pub enum ParseResult {
    /// Valid action request, ready to hand to the engine.
    Action(PlayerActionRequest),
    /// User entered `q`/`quit`.
    Quit,
    /// Unparseable or out-of-range input, with a message to show the user.
    Invalid(String),
}

/// Parses one line of interactive input (case-insensitive):
///
/// - `f`/`fold` → Fold
/// - `c`/`check` → Check
/// - `call` → Call
/// - `bet <amount>` → Bet to `<amount>`
/// - `raise <amount>` → Raise to `<amount>`
/// - `reraise <amount>` → Re-raise to `<amount>`
/// - `allin`/`all-in` → AllIn
/// - `q`/`quit` → Quit
///
/// `<amount>` is always the new *total* the player will have committed
/// this street, matching [`PlayerActionRequest::Bet`]/`Raise`/`ReRaise`'s
/// `amount` field — not the incremental chips pulled from the stack.
pub fn parse_player_action(input: &str) -> ParseResult {
    let input = input.trim().to_lowercase();
    let parts: Vec<&str> = input.split_whitespace().collect();

    let Some(&head) = parts.first() else {
        return ParseResult::Invalid("empty input".to_string());
    };

    if head == "q" || head == "quit" {
        return ParseResult::Quit;
    }

    match head {
        "fold" | "f" => ParseResult::Action(PlayerActionRequest::Fold),
        "check" | "c" => ParseResult::Action(PlayerActionRequest::Check),
        "call" => ParseResult::Action(PlayerActionRequest::Call),
        "allin" | "all-in" => ParseResult::Action(PlayerActionRequest::AllIn),
        "bet" => parse_amount(&parts, "bet")
            .map(|amount| PlayerActionRequest::Bet { amount })
            .map_or_else(ParseResult::Invalid, ParseResult::Action),
        "raise" => parse_amount(&parts, "raise")
            .map(|amount| PlayerActionRequest::Raise { amount })
            .map_or_else(ParseResult::Invalid, ParseResult::Action),
        "reraise" | "re-raise" => parse_amount(&parts, "reraise")
            .map(|amount| PlayerActionRequest::ReRaise { amount })
            .map_or_else(ParseResult::Invalid, ParseResult::Action),
        other => ParseResult::Invalid(format!(
            "unrecognized action '{}'. valid actions: fold, check, call, bet <amount>, raise <amount>, reraise <amount>, allin, q",
            other
        )),
    }
}

fn parse_amount(parts: &[&str], verb: &str) -> Result<u64, String> {
    let Some(raw) = parts.get(1) else {
        return Err(format!("{} requires an amount (e.g. '{} 100')", verb, verb));
    };
    match raw.parse::<u64>() {
        Ok(0) => Err(format!("{} amount must be positive", verb)),
        Ok(amount) => Ok(amount),
        Err(_) => Err(format!("invalid {} amount '{}'", verb, raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fold_and_its_short_form() {
        assert_eq!(parse_player_action("fold"), ParseResult::Action(PlayerActionRequest::Fold));
        assert_eq!(parse_player_action("F"), ParseResult::Action(PlayerActionRequest::Fold));
    }

    #[test]
    fn parses_bet_with_amount() {
        assert_eq!(
            parse_player_action("bet 300"),
            ParseResult::Action(PlayerActionRequest::Bet { amount: 300 })
        );
    }

    #[test]
    fn parses_raise_and_reraise() {
        assert_eq!(
            parse_player_action("raise 600"),
            ParseResult::Action(PlayerActionRequest::Raise { amount: 600 })
        );
        assert_eq!(
            parse_player_action("reraise 1200"),
            ParseResult::Action(PlayerActionRequest::ReRaise { amount: 1200 })
        );
    }

    #[test]
    fn quit_is_case_insensitive() {
        assert_eq!(parse_player_action("q"), ParseResult::Quit);
        assert_eq!(parse_player_action("Quit"), ParseResult::Quit);
    }

    #[test]
    fn bet_without_amount_is_invalid() {
        match parse_player_action("bet") {
            ParseResult::Invalid(msg) => assert!(msg.contains("requires an amount")),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn bet_with_zero_amount_is_invalid() {
        match parse_player_action("bet 0") {
            ParseResult::Invalid(msg) => assert!(msg.contains("positive")),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn unrecognized_action_is_invalid() {
        match parse_player_action("dance") {
            ParseResult::Invalid(msg) => assert!(msg.contains("unrecognized")),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }
}
