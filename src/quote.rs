//! Motivational quote of the session.

use rand::seq::SliceRandom;
use rand::Rng;

pub const QUOTES: [&str; 5] = [
    "A little every day beats putting it off.",
    "Do what you can finish today.",
    "Focus on progress, not perfection.",
    "Today may be hard, but giving up won't make it lighter.",
    "Discipline today = freedom tomorrow.",
];

/// Pick one quote uniformly at random.
pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    QUOTES.choose(rng).copied().unwrap_or(QUOTES[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pick_returns_a_known_quote() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert!(QUOTES.contains(&pick(&mut rng)));
        }
    }
}
