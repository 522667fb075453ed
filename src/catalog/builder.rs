use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::words::{INTRO_ORDER, WORD_TIERS, all_words};
use crate::catalog::{Catalog, Level};
use crate::morse;

pub const MIN_LEVELS: usize = 1001;

const INTRO_REVIEW_CHARS: usize = 6;
const CHAR_REVIEW_LEVELS: usize = 20;
const CHAR_REVIEW_SIZE: usize = 10;
const TIER_CHUNK: usize = 5;
const MIXED_ROUNDS: usize = 20;
const MIXED_CHUNK: usize = 7;
const BACKFILL_SAMPLE: usize = 100;
const BACKFILL_CHUNK: usize = 10;

/// Build the full level catalog. The phase order and level count are fixed;
/// level contents depend on `rng`.
pub fn build_catalog<R: Rng + ?Sized>(rng: &mut R) -> Catalog {
    let mut levels = Vec::new();

    push_intro_levels(&mut levels, rng);
    push_char_review_levels(&mut levels, rng);

    for (prefix, words) in WORD_TIERS {
        let mut shuffled = words.to_vec();
        shuffled.shuffle(rng);
        push_chunked(&mut levels, &shuffled, TIER_CHUNK, prefix);
    }

    let pool = all_words();
    for _ in 0..MIXED_ROUNDS {
        let mut shuffled = pool.clone();
        shuffled.shuffle(rng);
        push_chunked(&mut levels, &shuffled, MIXED_CHUNK, "Mixed Word Review");
    }

    while levels.len() < MIN_LEVELS {
        let mut sample: Vec<&str> = pool
            .choose_multiple(rng, BACKFILL_SAMPLE)
            .copied()
            .collect();
        sample.shuffle(rng);
        push_chunked(&mut levels, &sample, BACKFILL_CHUNK, "Expert Challenge");
    }

    tracing::info!("built catalog with {} levels", levels.len());
    Catalog::from_levels(levels)
}

fn push_intro_levels<R: Rng + ?Sized>(levels: &mut Vec<Level>, rng: &mut R) {
    let order: Vec<char> = INTRO_ORDER.chars().collect();
    for (i, &new_char) in order.iter().enumerate() {
        let learned = &order[..i];
        let mut challenges: Vec<String> = learned
            .choose_multiple(rng, INTRO_REVIEW_CHARS)
            .map(|c| c.to_string())
            .collect();
        challenges.push(new_char.to_string());
        challenges.shuffle(rng);
        levels.push(Level::new(format!("Introducing: {new_char}"), challenges));
    }
}

fn push_char_review_levels<R: Rng + ?Sized>(levels: &mut Vec<Level>, rng: &mut R) {
    for i in 0..CHAR_REVIEW_LEVELS {
        let challenges = morse::ALL_CHARS
            .choose_multiple(rng, CHAR_REVIEW_SIZE)
            .map(|c| c.to_string())
            .collect();
        levels.push(Level::new(format!("Character Review {}", i + 1), challenges));
    }
}

/// Split `words` into consecutive chunks, keeping a short trailing chunk.
fn push_chunked(levels: &mut Vec<Level>, words: &[&str], size: usize, prefix: &str) {
    for (i, chunk) in words.chunks(size).enumerate() {
        let challenges = chunk.iter().map(|w| w.to_string()).collect();
        levels.push(Level::new(format!("{prefix} Practice #{}", i + 1), challenges));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::words::{WORDS_3, WORDS_6_PLUS};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn seeded_catalog(seed: u64) -> Catalog {
        let mut rng = SmallRng::seed_from_u64(seed);
        build_catalog(&mut rng)
    }

    #[test]
    fn test_catalog_meets_minimum() {
        let catalog = seeded_catalog(1);
        assert!(catalog.len() >= MIN_LEVELS);
        assert!(catalog.iter().all(|l| !l.challenges.is_empty()));
    }

    #[test]
    fn test_structure_is_independent_of_seed() {
        let a = seeded_catalog(7);
        let b = seeded_catalog(8);
        assert_eq!(a.len(), b.len());
        let names_a: Vec<&str> = a.iter().map(|l| l.name.as_str()).collect();
        let names_b: Vec<&str> = b.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names_a, names_b);
    }

    #[test]
    fn test_same_seed_same_contents() {
        assert_eq!(seeded_catalog(42).levels(), seeded_catalog(42).levels());
    }

    #[test]
    fn test_intro_levels_follow_order() {
        let catalog = seeded_catalog(3);
        for (i, new_char) in INTRO_ORDER.chars().enumerate() {
            let level = catalog.get(i).unwrap();
            assert_eq!(level.name, format!("Introducing: {new_char}"));
            assert!(level.challenges.contains(&new_char.to_string()));
            assert_eq!(level.challenges.len(), (i + 1).min(INTRO_REVIEW_CHARS + 1));

            // Review characters come only from earlier introductions.
            let learned: Vec<String> = INTRO_ORDER[..=i].chars().map(String::from).collect();
            assert!(level.challenges.iter().all(|c| learned.contains(c)));

            let mut unique = level.challenges.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), level.challenges.len());
        }
    }

    #[test]
    fn test_char_review_levels_are_distinct_samples() {
        let catalog = seeded_catalog(5);
        for n in 0..CHAR_REVIEW_LEVELS {
            let level = catalog.get(36 + n).unwrap();
            assert_eq!(level.name, format!("Character Review {}", n + 1));
            assert_eq!(level.challenges.len(), CHAR_REVIEW_SIZE);
            let mut unique = level.challenges.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), CHAR_REVIEW_SIZE);
        }
    }

    #[test]
    fn test_tier_levels_keep_trailing_chunk() {
        let catalog = seeded_catalog(9);
        // 39 three-letter words at 5 per level: 7 full levels plus one of 4.
        let start = 36 + CHAR_REVIEW_LEVELS;
        let tier: Vec<&Level> = catalog
            .iter()
            .skip(start)
            .take_while(|l| l.name.starts_with("3-Letter Word"))
            .collect();
        assert_eq!(tier.len(), WORDS_3.len().div_ceil(TIER_CHUNK));
        assert_eq!(tier.last().unwrap().challenges.len(), WORDS_3.len() % TIER_CHUNK);
        assert_eq!(tier.last().unwrap().name, "3-Letter Word Practice #8");

        let mut seen: Vec<&str> = tier
            .iter()
            .flat_map(|l| l.challenges.iter().map(String::as_str))
            .collect();
        seen.sort_unstable();
        let mut expected = WORDS_3.to_vec();
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_phase_order() {
        let catalog = seeded_catalog(11);
        let advanced_count = WORDS_6_PLUS.len().div_ceil(TIER_CHUNK);
        let first_mixed = catalog
            .iter()
            .position(|l| l.name.starts_with("Mixed Word Review"))
            .unwrap();
        let last_advanced = catalog
            .levels()
            .iter()
            .rposition(|l| l.name.starts_with("Advanced Word"))
            .unwrap();
        assert_eq!(last_advanced + 1, first_mixed);
        assert_eq!(
            catalog.get(last_advanced).unwrap().name,
            format!("Advanced Word Practice #{advanced_count}")
        );

        let first_expert = catalog
            .iter()
            .position(|l| l.name.starts_with("Expert Challenge"))
            .unwrap();
        assert!(catalog.levels()[first_mixed..first_expert]
            .iter()
            .all(|l| l.name.starts_with("Mixed Word Review")));
        assert!(catalog.levels()[first_expert..]
            .iter()
            .all(|l| l.name.starts_with("Expert Challenge") && l.challenges.len() <= BACKFILL_CHUNK));
    }

    #[test]
    fn test_push_chunked_names_and_sizes() {
        let mut levels = Vec::new();
        push_chunked(&mut levels, &["A", "B", "C", "D", "E", "F", "G"], 3, "Test");
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0].name, "Test Practice #1");
        assert_eq!(levels[2].name, "Test Practice #3");
        assert_eq!(levels[2].challenges, vec!["G".to_string()]);
    }
}
