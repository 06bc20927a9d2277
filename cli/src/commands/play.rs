//! # Play Command
//!
//! Interactive play against the in-process tournament engine. Every
//! seat is prompted for its own action in turn — there is no AI
//! opponent and no hand evaluation in this crate (both are out of
//! scope for the engine), so when a hand reaches showdown with more
//! than one live player the operator is asked to supply the winners
//! directly, exactly as an external caller would over the command
//! surface.

use crate::config;
use crate::error::CliError;
use crate::formatters::{format_action, format_opportunities};
use crate::history::HandHistoryRecord;
use crate::io_utils::read_stdin_line;
use crate::ui;
use crate::validation::{ParseResult, parse_player_action};
use chrono::Utc;
use holdem_engine::engine::TournamentEngine;
use holdem_engine::hand::Round;
use holdem_engine::ids::PlayerId;
use holdem_engine::memory::InMemoryRepository;
use holdem_engine::snapshot::Snapshot;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::sync::Arc;

#[allow(clippy::too_many_arguments)]
pub fn handle_play_command(
    players: Option<u32>,
    hands: Option<u32>,
    history: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let cfg = config::load().map_err(|e| CliError::Config(e.to_string()))?;
    let player_count = players.unwrap_or(4).max(2);

    let rt = tokio::runtime::Runtime::new().map_err(CliError::Io)?;
    rt.block_on(run_game(
        player_count,
        hands,
        cfg.starting_stack,
        cfg.blind_time_secs,
        history,
        out,
        err,
        stdin,
    ))
}

#[allow(clippy::too_many_arguments)]
async fn run_game(
    player_count: u32,
    hand_limit: Option<u32>,
    starting_stack: u64,
    blind_time_secs: u64,
    history_path: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let repo = Arc::new(InMemoryRepository::new());
    let engine = TournamentEngine::new(repo);
    let names: Vec<String> = (1..=player_count).map(|n| format!("player{n}")).collect();

    let mut snap = engine
        .start_game(blind_time_secs, starting_stack, names)
        .await
        .map_err(|e| CliError::Engine(e.to_string()))?;
    let mut player_names: HashMap<PlayerId, String> = HashMap::new();
    for p in &snap.players {
        player_names.insert(p.id, p.name.clone());
    }

    let mut hands_played: u32 = 0;
    let mut history_file = match &history_path {
        Some(path) => {
            crate::io_utils::ensure_parent_dir(std::path::Path::new(path))
                .map_err(CliError::Config)?;
            Some(
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(CliError::Io)?,
            )
        }
        None => None,
    };

    'hands: loop {
        if let Some(limit) = hand_limit {
            if hands_played >= limit {
                break;
            }
        }
        let game_id = snap.game.id;
        let Some(mut hand) = snap.hand.clone() else {
            break;
        };
        let hand_id = hand.id;
        writeln!(out, "\n=== hand (level {}) ===", hand.level)?;

        loop {
            if hand.is_complete {
                break;
            }
            let Some(opportunities) = snap.opportunities else {
                break;
            };
            let Some(turn_seat) = hand.turn_seat else {
                break;
            };
            let turn_player = snap
                .players
                .iter()
                .find(|p| p.seat == turn_seat)
                .expect("turn seat refers to a seated player");

            writeln!(
                out,
                "pot={} current_bet={} {} to act ({}): [{}]",
                hand.pot,
                hand.current_bet,
                turn_player.name,
                turn_player.amount,
                format_opportunities(&opportunities)
            )?;
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = read_stdin_line(stdin) else {
                break 'hands;
            };
            let request = match parse_player_action(&line) {
                ParseResult::Action(req) => req,
                ParseResult::Quit => break 'hands,
                ParseResult::Invalid(msg) => {
                    ui::write_error(err, &msg)?;
                    continue;
                }
            };

            match engine
                .player_action(game_id, hand_id, turn_player.id, request)
                .await
            {
                Ok(next) => {
                    if let Some(last) = next.hand_actions.last() {
                        let name = next
                            .players
                            .iter()
                            .find(|p| p.id == last.player_id)
                            .map(|p| p.name.as_str())
                            .unwrap_or("?");
                        writeln!(out, "{}", format_action(last, name))?;
                    }
                    hand = next.hand.clone().expect("hand still exists mid-play");
                    snap = next;
                }
                Err(e) => {
                    ui::write_error(err, &e.to_string())?;
                }
            }
        }

        if hand.round == Round::Showdown && hand.winners.is_empty() {
            let live: Vec<_> = snap
                .players
                .iter()
                .filter(|p| p.is_active && p.action != Some(holdem_engine::player::ActionKind::Fold))
                .collect();
            writeln!(
                out,
                "showdown: pot={} among [{}]. enter winners as `name:amount,...`",
                hand.pot,
                live.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ")
            )?;
            write!(out, "winners> ")?;
            out.flush()?;
            let Some(line) = read_stdin_line(stdin) else {
                break;
            };
            let winners = parse_winner_shares(&line, &snap.players);
            hand.complete(winners);
        }

        if let Some(file) = history_file.as_mut() {
            let record = HandHistoryRecord {
                game_id,
                hand: hand.clone(),
                actions: snap.hand_actions.clone(),
                player_names: player_names.clone(),
                recorded_at: Utc::now(),
            };
            writeln!(file, "{}", serde_json::to_string(&record)?).map_err(CliError::Io)?;
        }

        hands_played += 1;
        // A player left at zero chips will be eliminated by `next_hand`
        // itself; check how many would remain active *after* that so we
        // stop before asking the engine to seat a hand it can't deal.
        let remaining = snap
            .players
            .iter()
            .filter(|p| p.is_active && p.amount > 0)
            .count();
        if remaining < 2 {
            break;
        }

        let next_level = snap.game.level;
        snap = engine
            .next_hand(game_id, hand_id, hand.winners.clone(), next_level, vec![])
            .await
            .map_err(|e| CliError::Engine(e.to_string()))?;
    }

    writeln!(out, "\nplayed {hands_played} hand(s)")?;
    engine
        .end_game(snap.game.id)
        .await
        .map_err(|e| CliError::Engine(e.to_string()))?;
    Ok(())
}

/// Parses `"name:amount,name:amount"` into `(PlayerId, amount)` pairs,
/// looking names up against the live roster. Unparseable entries are
/// skipped with a best-effort fallback: if nothing parses, the whole pot
/// goes to the first live, non-folded player (a walk).
fn parse_winner_shares(
    input: &str,
    players: &[holdem_engine::player::Player],
) -> Vec<(PlayerId, u64)> {
    let mut winners = Vec::new();
    for entry in input.split(',') {
        let entry = entry.trim();
        let Some((name, amount)) = entry.split_once(':') else {
            continue;
        };
        let Ok(amount) = amount.trim().parse::<u64>() else {
            continue;
        };
        if let Some(p) = players.iter().find(|p| p.name == name.trim()) {
            winners.push((p.id, amount));
        }
    }
    if winners.is_empty() {
        if let Some(p) = players
            .iter()
            .find(|p| p.is_active && p.action != Some(holdem_engine::player::ActionKind::Fold))
        {
            winners.push((p.id, 0));
        }
    }
    winners
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_engine::ids::GameId;
    use holdem_engine::player::Player;

    #[test]
    fn parses_comma_separated_winner_shares() {
        let p1 = Player::new(GameId::new(), "player1", 1000, 0);
        let p2 = Player::new(GameId::new(), "player2", 1000, 1);
        let players = vec![p1.clone(), p2.clone()];
        let winners = parse_winner_shares("player1:600,player2:400", &players);
        assert_eq!(winners, vec![(p1.id, 600), (p2.id, 400)]);
    }

    #[test]
    fn quit_during_action_prompt_ends_play() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut stdin = std::io::Cursor::new(b"quit\n".to_vec());
        let result = handle_play_command(Some(3), Some(5), None, &mut out, &mut err, &mut stdin);
        assert!(result.is_ok());
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("played"));
    }
}
