pub mod game;
pub mod health;

pub use game::{
    end_game, get_active_game, next_hand, player_action, rebuy, start_game, EndGameResponse,
    NextHandRequest, PlayerActionBody, RebuyRequest, StartGameRequest, WinnerShare,
};
pub use health::health;
