use szolanc::cli::{CliInterface, parse_cli};
use szolanc::wordbank::{load_wordbank_from_file, locate_wordbank};
use szolanc::{logging, opponent_rng, run};
use std::io::{self, BufReader};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = parse_cli();
    logging::init();

    let bank = match locate_wordbank(cli.wordbank_path.as_deref()).and_then(load_wordbank_from_file)
    {
        Ok(bank) => bank,
        Err(e) => {
            log::error!("Dictionary unavailable: {e:?}");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let settings = cli.settings();
    let mut rng = opponent_rng(settings.seed);
    let mut interface = CliInterface::new(BufReader::new(io::stdin()), io::stdout());
    let report = run(&bank, &mut interface, &mut rng, &settings);
    log::info!(
        "Exiting after {} finished games and {} restarts",
        report.outcomes.len(),
        report.restarts
    );
    ExitCode::SUCCESS
}
