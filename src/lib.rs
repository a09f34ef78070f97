// Library interface for szolanc
// Lets main.rs and the integration tests share the game modules

pub mod cli;
pub mod game_state;
pub mod input;
pub mod logging;
pub mod opponent;
pub mod rules;
pub mod validator;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use game_state::{
    EndReason, GameInterface, GameOutcome, GameSession, GameSettings, Interrupt, Mode,
    Participant, Phase, PlayerState, RunReport, TurnEvent, play_session, run,
};
pub use opponent::{choose_move, opponent_rng};
pub use rules::{DIGRAPHS, Word, leading_unit, normalize, trailing_unit};
pub use validator::{ChainState, Rejection, Verdict, validate};
pub use wordbank::{WordBank, WordBankError, load_wordbank_from_file, load_wordbank_from_str};
