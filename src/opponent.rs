use crate::debug_log;
use crate::rules::Word;
use crate::validator::UsedWords;
use crate::wordbank::WordBank;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// RNG used for computer moves. Seeded runs replay the same moves.
#[must_use]
pub fn opponent_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// All unused dictionary words starting with `required_lead` (any word when `None`).
pub fn legal_moves<'a>(
    required_lead: Option<&'a str>,
    bank: &'a WordBank,
    used_words: &'a UsedWords,
) -> impl Iterator<Item = &'a Word> + 'a {
    bank.words().iter().filter(move |w| {
        !used_words.contains(*w) && required_lead.is_none_or(|lead| w.leading_unit() == lead)
    })
}

/// Picks a uniformly random legal move, or `None` when the computer has to concede.
pub fn choose_move<R: Rng + ?Sized>(
    required_lead: Option<&str>,
    bank: &WordBank,
    used_words: &UsedWords,
    rng: &mut R,
) -> Option<Word> {
    let candidates: Vec<&Word> = legal_moves(required_lead, bank, used_words).collect();
    debug_log!(
        "choose_move() - {} candidates for lead {:?}",
        candidates.len(),
        required_lead
    );
    candidates.choose(rng).map(|w| (*w).clone())
}
