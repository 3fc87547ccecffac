//! Property-based tests for the sampler, the lighting aggregate and the
//! scorers.
//!
//! # Invariants tested
//!
//! - **Sample size:** `sample` returns `ceil(n / stride)` items.
//! - **Sample order:** sampled items keep their route order.
//! - **Lighting range:** lighting scores stay within `0.0..=1.0`.
//! - **Score range:** rule-based and model-based scores stay within `0.0..=1.0`.

use std::num::NonZeroUsize;

use proptest::prelude::*;
use saferoute_core::test_support::WeightedSumRegressor;
use saferoute_core::{
    FeatureVector, IdentityTransform, LightingPolicy, ModelScorer, RuleBasedScorer, ScoreVector,
    aggregate_readings, sample,
};

fn reading_strategy() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        Just(None),
        Just(Some(f64::NAN)),
        Just(Some(f64::INFINITY)),
        (-1.0e6_f64..1.0e6).prop_map(Some),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn sample_size_is_ceiling(len in 0_usize..500, stride in 1_usize..64) {
        let items: Vec<usize> = (0..len).collect();
        let stride = NonZeroUsize::new(stride).expect("strategy yields non-zero strides");
        let sampled = sample(&items, stride);
        prop_assert_eq!(sampled.len(), len.div_ceil(stride.get()));
        prop_assert!(sampled.windows(2).all(|pair| pair[1] == pair[0] + stride.get()));
        if len > 0 {
            prop_assert_eq!(sampled.first(), Some(&0));
        }
    }

    #[test]
    fn lighting_stays_in_unit_range(
        readings in prop::collection::vec(reading_strategy(), 0..64),
        percentile_variant in any::<bool>(),
    ) {
        let policy = if percentile_variant {
            LightingPolicy::percentile_variant()
        } else {
            LightingPolicy::default()
        };
        let score = aggregate_readings(readings, &policy);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn rule_score_stays_in_unit_range(
        positive in any::<u32>(),
        negative in any::<u32>(),
        lighting in -2.0_f64..2.0,
        length_km in -10.0_f64..100.0,
    ) {
        let features = FeatureVector {
            positive_count: positive,
            negative_count: negative,
            lighting_score: lighting,
        };
        let score = RuleBasedScorer::default().score(&features, length_km);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn model_scores_match_batch_length(
        rows in prop::collection::vec((-5.0_f64..5.0, -5.0_f64..5.0, -5.0_f64..5.0), 0..32),
    ) {
        let scorer = ModelScorer::new(
            IdentityTransform,
            WeightedSumRegressor::new([0.6, -0.25, 0.5], 0.1),
        );
        let batch: Vec<ScoreVector> = rows
            .into_iter()
            .map(|(pos, neg, light)| ScoreVector::new(pos, neg, light))
            .collect();
        let scores = scorer.score_batch(&batch);
        prop_assert_eq!(scores.len(), batch.len());
        prop_assert!(scores.iter().all(|score| (0.0..=1.0).contains(score)));
    }
}
