use crate::debug_log;
use crate::game_state::{
    EndReason, GameInterface, GameOutcome, GameSettings, MAX_CONSECUTIVE_ERRORS, Mode,
    Participant, PlayerState, TurnPrompt,
};
use crate::input::{ReadOutcome, TimedReader};
use crate::rules::Word;
use crate::validator::Rejection;
use clap::Parser;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{StyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

/// Szólánc - word-chain game in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a newline-delimited dictionary file
    #[arg(short = 'i', long = "input")]
    pub wordbank_path: Option<PathBuf>,

    /// Seconds each player has to answer
    #[arg(
        short = 't',
        long = "timeout",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Seed for the computer's word choices
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    #[must_use]
    pub fn settings(&self) -> GameSettings {
        GameSettings {
            turn_timeout: Duration::from_secs(self.timeout_secs),
            seed: self.seed,
        }
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// One status line: cumulative scores, plus error counts for anyone who has errors.
#[must_use]
pub fn format_stats(players: &[PlayerState]) -> String {
    let scores: Vec<String> = players
        .iter()
        .map(|p| format!("{}={}", p.participant, p.score))
        .collect();
    let mut line = format!("Pontok: {}", scores.join(", "));

    let errors: Vec<String> = players
        .iter()
        .filter(|p| p.consecutive_errors > 0)
        .map(|p| format!("{}={}", p.participant, p.consecutive_errors))
        .collect();
    if !errors.is_empty() {
        line.push_str(&format!(" | Hibák: {}", errors.join(", ")));
    }
    line
}

#[must_use]
pub fn format_outcome(outcome: &GameOutcome, players: &[PlayerState]) -> String {
    let against_computer = players
        .iter()
        .any(|p| p.participant == Participant::Computer);
    let loser = players[outcome.loser].participant;
    let winner = players[outcome.winner].participant;

    match (outcome.reason, against_computer) {
        (EndReason::Timeout, true) => "Idő lejárt! Vesztettél.".to_string(),
        (EndReason::Timeout, false) => format!("Idő lejárt! {loser} vesztett, {winner} nyert."),
        (EndReason::TooManyErrors, true) => {
            format!("{MAX_CONSECUTIVE_ERRORS} hibát elkövettél. A gép automatikusan nyert!")
        }
        (EndReason::TooManyErrors, false) => format!(
            "{loser} {MAX_CONSECUTIVE_ERRORS} hibát elkövetett. {winner} automatikusan nyert!"
        ),
        (EndReason::ComputerNoMove, _) => "A gép nem talál megfelelő szót. Te nyertél!".to_string(),
    }
}

fn format_turn_prompt(prompt: &TurnPrompt) -> StyledContent<String> {
    let secs = prompt.timeout.as_secs();
    match (prompt.mode, &prompt.last_word, &prompt.required_lead) {
        (Mode::TwoPlayer, _, lead) => {
            let hint = lead
                .as_ref()
                .map(|l| format!(" '{l}' betűvel"))
                .unwrap_or_default();
            let text = format!("\n{}, írj egy szót{hint} ({secs} mp):", prompt.participant);
            match prompt.participant {
                Participant::Human(1) => text.magenta(),
                _ => text.blue(),
            }
        }
        (Mode::SinglePlayer { .. }, Some(word), Some(lead)) => format!(
            "A gép szava: {word}. Te jössz, írj egy szót ami '{lead}' betűvel kezdődik ({secs} mp):"
        )
        .green(),
        (Mode::SinglePlayer { .. }, _, _) => format!("Kezdj egy szóval ({secs} mp):").green(),
    }
}

/// Console implementation of [`GameInterface`]: coloured output to `out`,
/// timed line input from a background reader.
pub struct CliInterface<W: Write> {
    reader: TimedReader,
    out: W,
}

impl<W: Write> CliInterface<W> {
    pub fn new<R: BufRead + Send + 'static>(reader: R, out: W) -> Self {
        Self {
            reader: TimedReader::spawn(reader),
            out,
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn say(&mut self, text: impl Display) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            debug_log!("Console write failed: {}", e);
        }
    }

    fn ask(&mut self, text: impl Display) {
        if let Err(e) = write!(self.out, "{text}").and_then(|()| self.out.flush()) {
            debug_log!("Console write failed: {}", e);
        }
    }
}

impl<W: Write> GameInterface for CliInterface<W> {
    fn display_welcome(&mut self) {
        if let Err(e) = queue!(self.out, Clear(ClearType::All), MoveTo(0, 0)) {
            debug_log!("Clearing the screen failed: {}", e);
        }
        self.say("=== Szólánc ===\n".cyan());
    }

    fn read_mode(&mut self) -> ReadOutcome {
        self.say("Válassz módot: 1) Egyjátékos (géppel)  2) Kétjátékos (helyi)");
        self.ask("Mód (1 vagy 2): ");
        self.reader.read_line(None)
    }

    fn read_start_choice(&mut self) -> ReadOutcome {
        self.ask("Kezdeni akarsz? (i/n) [i = te]: ");
        self.reader.read_line(None)
    }

    fn display_mode_intro(&mut self, mode: Mode) {
        let text = match mode {
            Mode::TwoPlayer => {
                "Kétjátékos mód. Felváltva adtok szavakat. Írj 'R'-t az újrakezdéshez."
            }
            Mode::SinglePlayer { .. } => {
                "Egyjátékos mód. Te és a gép váltjátok egymást. Írj 'R'-t az újrakezdéshez."
            }
        };
        self.say(text.yellow());
    }

    fn read_word(&mut self, prompt: &TurnPrompt) -> ReadOutcome {
        self.say(format_turn_prompt(prompt));
        self.reader.read_line(Some(prompt.timeout))
    }

    fn display_computer_word(&mut self, word: &Word) {
        self.say(format!("A gép azt mondja: {word}").red());
    }

    fn display_rejection(&mut self, reasons: &[Rejection], errors: u8) {
        let reasons: Vec<String> = reasons.iter().map(ToString::to_string).collect();
        self.say(
            format!(
                "Hibás szó: {}. Hibák: {errors}/{MAX_CONSECUTIVE_ERRORS}",
                reasons.join("; ")
            )
            .red(),
        );
    }

    fn display_stats(&mut self, players: &[PlayerState]) {
        self.say(format_stats(players).cyan());
    }

    fn display_outcome(&mut self, outcome: &GameOutcome, players: &[PlayerState]) {
        self.say(format_outcome(outcome, players));
        self.say(format_stats(players).cyan());
        self.say(format!("\nA játék véget ért ({} kör).", outcome.rounds).green());
        if outcome.reason == EndReason::Timeout {
            // The read abandoned at the timeout still owns the next line
            self.say(
                "(Ha késve beírtál egy szót, az elveszett. A következő kérdésnél írd be újra.)"
                    .yellow(),
            );
        }
    }

    fn read_restart(&mut self) -> ReadOutcome {
        self.say("Nyomj 'R'-t az újrakezdéshez, vagy bármi mást a kilépéshez...".green());
        self.reader.read_line(None)
    }
}
