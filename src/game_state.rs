//! Session state machine and the top-level game loop.
//!
//! # State Machine
//! - `AwaitingInput(p)` → `Evaluating(p)` → `AwaitingInput(next)` on acceptance
//! - `Evaluating(p)` → `AwaitingInput(p)` on a non-event or a rejection
//! - Terminal: `Elimination(p)`, `ComputerNoMove`, `Timeout(p)`, `Terminated`
//!
//! The loop talks to the player only through [`GameInterface`], so it runs the
//! same against the console and against scripted input in tests.

use crate::input::ReadOutcome;
use crate::opponent::choose_move;
use crate::rules::Word;
use crate::validator::{ChainState, Rejection, Verdict, validate};
use crate::wordbank::WordBank;
use crate::{debug_log, info_log};
use rand::Rng;
use std::fmt;
use std::time::Duration;

pub const MAX_CONSECUTIVE_ERRORS: u8 = 3;
pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    SinglePlayer { human_first: bool },
    TwoPlayer,
}

impl Default for Mode {
    fn default() -> Self {
        Self::SinglePlayer { human_first: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participant {
    Human(u8),
    Computer,
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Human(n) => write!(f, "Játékos {n}"),
            Self::Computer => f.write_str("Gép"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub participant: Participant,
    pub score: usize,
    pub consecutive_errors: u8,
}

impl PlayerState {
    fn new(participant: Participant) -> Self {
        Self {
            participant,
            score: 0,
            consecutive_errors: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingInput(usize),
    Evaluating(usize),
    Elimination(usize),
    ComputerNoMove,
    Timeout(usize),
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Timeout,
    TooManyErrors,
    ComputerNoMove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub reason: EndReason,
    pub winner: usize,
    pub loser: usize,
    pub rounds: u32,
}

/// What a single move did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// Unparseable or too-short input; same player again, no penalty.
    Ignored,
    Accepted {
        player: usize,
        word: Word,
        points: usize,
    },
    Rejected {
        player: usize,
        word: Word,
        reasons: Vec<Rejection>,
        errors: u8,
    },
    Eliminated {
        player: usize,
    },
    ComputerConceded,
    /// The move was attempted when it was not that side's turn.
    OutOfTurn,
}

/// Why a session stopped before reaching an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Restart,
    Quit,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    mode: Mode,
    chain: ChainState,
    players: Vec<PlayerState>,
    phase: Phase,
    round: u32,
}

impl GameSession {
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        let players = match mode {
            Mode::TwoPlayer => vec![
                PlayerState::new(Participant::Human(1)),
                PlayerState::new(Participant::Human(2)),
            ],
            Mode::SinglePlayer { .. } => vec![
                PlayerState::new(Participant::Human(1)),
                PlayerState::new(Participant::Computer),
            ],
        };
        let first = match mode {
            Mode::SinglePlayer { human_first: false } => 1,
            _ => 0,
        };
        Self {
            mode,
            chain: ChainState::new(),
            players,
            phase: Phase::AwaitingInput(first),
            round: 0,
        }
    }

    /// Starts over with fresh players and an empty chain.
    pub fn reset(&mut self, mode: Mode) {
        let mut chain = std::mem::take(&mut self.chain);
        chain.clear();
        *self = Self {
            chain,
            ..Self::new(mode)
        };
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn chain(&self) -> &ChainState {
        &self.chain
    }

    #[must_use]
    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The player whose move is awaited, if the session is still running.
    #[must_use]
    pub fn active_player(&self) -> Option<usize> {
        match self.phase {
            Phase::AwaitingInput(p) | Phase::Evaluating(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_computer(&self, player: usize) -> bool {
        self.players
            .get(player)
            .is_some_and(|p| p.participant == Participant::Computer)
    }

    fn opponent_of(player: usize) -> usize {
        1 - player
    }

    fn human_turn(&self) -> Option<usize> {
        match self.phase {
            Phase::AwaitingInput(p) if !self.is_computer(p) => Some(p),
            _ => None,
        }
    }

    fn apply_accepted(&mut self, player: usize, word: Word) -> TurnEvent {
        let points = word.char_len();
        let state = &mut self.players[player];
        state.score += points;
        state.consecutive_errors = 0;
        self.chain.record(word.clone());
        self.round += 1;
        self.phase = Phase::AwaitingInput(Self::opponent_of(player));
        debug_log!("Round {} - {} played {:?}", self.round, player, word.as_str());
        TurnEvent::Accepted {
            player,
            word,
            points,
        }
    }

    /// Feeds a human's raw input through validation and updates the session.
    pub fn submit(&mut self, raw: &str, bank: &WordBank) -> TurnEvent {
        let Some(player) = self.human_turn() else {
            return TurnEvent::OutOfTurn;
        };
        self.phase = Phase::Evaluating(player);

        match validate(raw, &self.chain, bank) {
            Verdict::NonEvent => {
                self.phase = Phase::AwaitingInput(player);
                TurnEvent::Ignored
            }
            Verdict::Accepted(word) => self.apply_accepted(player, word),
            Verdict::Rejected { word, reasons } => {
                let state = &mut self.players[player];
                state.consecutive_errors += 1;
                let errors = state.consecutive_errors;
                debug_log!("{} rejected {:?}: {:?}", player, word.as_str(), reasons);
                if errors >= MAX_CONSECUTIVE_ERRORS {
                    info_log!("Player {} eliminated after {} errors", player, errors);
                    self.phase = Phase::Elimination(player);
                    TurnEvent::Eliminated { player }
                } else {
                    self.phase = Phase::AwaitingInput(player);
                    TurnEvent::Rejected {
                        player,
                        word,
                        reasons,
                        errors,
                    }
                }
            }
        }
    }

    /// Lets the computer move. Its words are always legal by construction.
    pub fn play_computer<R: Rng + ?Sized>(&mut self, bank: &WordBank, rng: &mut R) -> TurnEvent {
        let player = match self.phase {
            Phase::AwaitingInput(p) if self.is_computer(p) => p,
            _ => return TurnEvent::OutOfTurn,
        };
        self.phase = Phase::Evaluating(player);
        match choose_move(
            self.chain.required_lead(),
            bank,
            self.chain.used_words(),
            rng,
        ) {
            Some(word) => self.apply_accepted(player, word),
            None => {
                info_log!("Computer has no move after {} rounds", self.round);
                self.phase = Phase::ComputerNoMove;
                TurnEvent::ComputerConceded
            }
        }
    }

    /// The active player ran out of time.
    pub fn time_out(&mut self) {
        if let Some(player) = self.active_player() {
            info_log!("Player {} timed out", player);
            self.phase = Phase::Timeout(player);
        }
    }

    /// Abandons the session without an outcome.
    pub fn terminate(&mut self) {
        self.phase = Phase::Terminated;
    }

    /// The result, once the session has reached a terminal phase with a winner.
    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        let (reason, loser) = match self.phase {
            Phase::Timeout(p) => (EndReason::Timeout, p),
            Phase::Elimination(p) => (EndReason::TooManyErrors, p),
            Phase::ComputerNoMove => (
                EndReason::ComputerNoMove,
                self.players
                    .iter()
                    .position(|p| p.participant == Participant::Computer)?,
            ),
            _ => return None,
        };
        Some(GameOutcome {
            reason,
            winner: Self::opponent_of(loser),
            loser,
            rounds: self.round,
        })
    }
}

/// Everything the loop needs to show the player for one turn.
#[derive(Debug, Clone)]
pub struct TurnPrompt {
    pub mode: Mode,
    pub participant: Participant,
    pub last_word: Option<Word>,
    pub required_lead: Option<String>,
    pub timeout: Duration,
}

/// Console surface of the game. Reads return raw lines; the loop interprets them.
pub trait GameInterface {
    fn display_welcome(&mut self);
    fn read_mode(&mut self) -> ReadOutcome;
    fn read_start_choice(&mut self) -> ReadOutcome;
    fn display_mode_intro(&mut self, mode: Mode);
    fn read_word(&mut self, prompt: &TurnPrompt) -> ReadOutcome;
    fn display_computer_word(&mut self, word: &Word);
    fn display_rejection(&mut self, reasons: &[Rejection], errors: u8);
    fn display_stats(&mut self, players: &[PlayerState]);
    fn display_outcome(&mut self, outcome: &GameOutcome, players: &[PlayerState]);
    fn read_restart(&mut self) -> ReadOutcome;
}

#[derive(Debug, Clone)]
pub struct GameSettings {
    pub turn_timeout: Duration,
    /// Seeds the computer's word choices; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            turn_timeout: DEFAULT_TURN_TIMEOUT,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub outcomes: Vec<GameOutcome>,
    pub restarts: usize,
}

#[must_use]
pub fn is_restart_command(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("r")
}

/// Unwraps a prompt reply, turning the restart command and closed input into interrupts.
/// A timeout comes back as `None`.
fn line_or_interrupt(outcome: ReadOutcome) -> Result<Option<String>, Interrupt> {
    match outcome {
        ReadOutcome::Line(line) if is_restart_command(&line) => Err(Interrupt::Restart),
        ReadOutcome::Line(line) => Ok(Some(line)),
        ReadOutcome::TimedOut => Ok(None),
        ReadOutcome::Closed => Err(Interrupt::Quit),
    }
}

/// Asks for the mode (`2` = two players, anything else = against the computer)
/// and, against the computer, who starts (`i` or empty = the human).
pub fn select_mode<I: GameInterface>(interface: &mut I) -> Result<Mode, Interrupt> {
    let mode = line_or_interrupt(interface.read_mode())?.unwrap_or_default();
    if mode.trim() == "2" {
        return Ok(Mode::TwoPlayer);
    }
    let start = line_or_interrupt(interface.read_start_choice())?
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    Ok(Mode::SinglePlayer {
        human_first: start.is_empty() || start == "i",
    })
}

/// Plays one session until it reaches an outcome or is interrupted.
pub fn play_session<I: GameInterface, R: Rng + ?Sized>(
    session: &mut GameSession,
    bank: &WordBank,
    interface: &mut I,
    rng: &mut R,
    settings: &GameSettings,
) -> Result<GameOutcome, Interrupt> {
    loop {
        if let Some(outcome) = session.outcome() {
            return Ok(outcome);
        }
        let Some(player) = session.active_player() else {
            return Err(Interrupt::Quit);
        };

        if session.is_computer(player) {
            if let TurnEvent::Accepted { word, .. } = session.play_computer(bank, rng) {
                interface.display_computer_word(&word);
                interface.display_stats(session.players());
            }
            continue;
        }

        let prompt = TurnPrompt {
            mode: session.mode(),
            participant: session.players()[player].participant,
            last_word: session.chain().last_word().cloned(),
            required_lead: session.chain().required_lead().map(str::to_string),
            timeout: settings.turn_timeout,
        };
        let line = match line_or_interrupt(interface.read_word(&prompt)) {
            Ok(Some(line)) => line,
            Ok(None) => {
                session.time_out();
                continue;
            }
            Err(interrupt) => {
                session.terminate();
                return Err(interrupt);
            }
        };

        match session.submit(&line, bank) {
            TurnEvent::Accepted { .. } => interface.display_stats(session.players()),
            TurnEvent::Rejected {
                reasons, errors, ..
            } => interface.display_rejection(&reasons, errors),
            TurnEvent::Ignored
            | TurnEvent::Eliminated { .. }
            | TurnEvent::ComputerConceded
            | TurnEvent::OutOfTurn => {}
        }
    }
}

/// Runs sessions back to back until the player declines a restart or input ends.
pub fn run<I: GameInterface, R: Rng + ?Sized>(
    bank: &WordBank,
    interface: &mut I,
    rng: &mut R,
    settings: &GameSettings,
) -> RunReport {
    let mut report = RunReport::default();
    let mut session = GameSession::new(Mode::default());

    loop {
        interface.display_welcome();
        let result = select_mode(interface).and_then(|mode| {
            session.reset(mode);
            info_log!("New session: {:?}, {} words", mode, bank.len());
            interface.display_mode_intro(mode);
            play_session(&mut session, bank, interface, rng, settings)
        });

        match result {
            Ok(outcome) => {
                info_log!("Session over: {:?}", outcome);
                interface.display_outcome(&outcome, session.players());
                report.outcomes.push(outcome);
                match interface.read_restart() {
                    ReadOutcome::Line(line) if is_restart_command(&line) => {
                        report.restarts += 1;
                    }
                    _ => break,
                }
            }
            Err(Interrupt::Restart) => {
                info_log!("Restart requested mid-session");
                report.restarts += 1;
            }
            Err(Interrupt::Quit) => break,
        }
    }
    report
}
