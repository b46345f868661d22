//! Characteristic sampler - per-profile scenario randomization and answer
//! normalization.
//!
//! All randomness takes an injected [`rand::Rng`] so tests can seed it.

use rand::seq::SliceRandom;
use rand::Rng;

use super::registry::CharacteristicRegistry;

/// Draws `n` distinct characteristic keys uniformly at random, without
/// replacement, via a Fisher-Yates shuffle of the full key set.
pub fn sample_characteristics<R: Rng + ?Sized>(
    registry: &CharacteristicRegistry,
    n: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut keys: Vec<&str> = registry.keys().collect();
    keys.shuffle(rng);
    keys.truncate(n);
    keys.into_iter().map(str::to_owned).collect()
}

/// Returns 1 iff the raw survey answer equals the treated-option sentinel.
pub fn check_answer(raw_answer: i64, treated_sentinel: i64) -> i32 {
    i32::from(raw_answer == treated_sentinel)
}

/// Earnings shown for the base and treated alternative.
pub fn transform_earnings(base_earnings: f64, diff_earnings: f64) -> (f64, f64) {
    (base_earnings, base_earnings + diff_earnings)
}

/// Draws the payment framing fixed at profile creation: a fair coin for
/// monthly vs. one-time payment, and the registry's base earnings amount.
pub fn gen_payment_params<R: Rng + ?Sized>(
    registry: &CharacteristicRegistry,
    rng: &mut R,
) -> (bool, f64) {
    (rng.gen_bool(0.5), registry.example_base_earnings())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::RegistryVersion;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn registry() -> CharacteristicRegistry {
        CharacteristicRegistry::for_version(RegistryVersion::ThreeBinary)
    }

    #[test]
    fn sample_returns_n_distinct_registry_keys() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(7);
        for n in 0..=3 {
            let sampled = sample_characteristics(&registry, n, &mut rng);
            assert_eq!(sampled.len(), n);
            let distinct: HashSet<&String> = sampled.iter().collect();
            assert_eq!(distinct.len(), n);
            for key in &sampled {
                assert!(registry.get(key).is_some());
            }
        }
    }

    #[test]
    fn sample_of_full_set_is_a_permutation() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(11);
        let sampled = sample_characteristics(&registry, 3, &mut rng);
        let expected: HashSet<&str> = registry.keys().collect();
        let actual: HashSet<&str> = sampled.iter().map(String::as_str).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn sample_is_deterministic_under_a_fixed_seed() {
        let registry = registry();
        let first = sample_characteristics(&registry, 2, &mut StdRng::seed_from_u64(42));
        let second = sample_characteristics(&registry, 2, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn sample_order_varies_across_seeds() {
        let registry = registry();
        let draws: HashSet<Vec<String>> = (0..64)
            .map(|seed| sample_characteristics(&registry, 2, &mut StdRng::seed_from_u64(seed)))
            .collect();
        assert!(draws.len() > 1, "shuffle never changed the draw order");
    }

    #[test]
    fn check_answer_matches_only_the_sentinel() {
        assert_eq!(check_answer(1, 1), 1);
        assert_eq!(check_answer(2, 1), 0);
        assert_eq!(check_answer(0, 1), 0);
        assert_eq!(check_answer(-1, 1), 0);
        assert_eq!(check_answer(1, 2), 0);
        assert_eq!(check_answer(2, 2), 1);
    }

    #[test]
    fn transform_earnings_preserves_base_and_applies_diff() {
        for (base, diff) in [(100.0, 5.0), (0.0, -2.5), (37.5, 0.0), (-10.0, 12.0)] {
            let (base_e, treat_e) = transform_earnings(base, diff);
            assert_eq!(base_e, base);
            assert_eq!(treat_e - base_e, diff);
        }
    }

    #[test]
    fn gen_payment_params_uses_registry_base_earnings() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(3);
        let (_, base_earnings) = gen_payment_params(&registry, &mut rng);
        assert_eq!(base_earnings, registry.example_base_earnings());
    }

    #[test]
    fn gen_payment_params_draws_both_schedules() {
        let registry = registry();
        let mut rng = StdRng::seed_from_u64(5);
        let draws: HashSet<bool> = (0..64)
            .map(|_| gen_payment_params(&registry, &mut rng).0)
            .collect();
        assert_eq!(draws.len(), 2);
    }
}
