//! Behavioural tests for [`ModelScorer::rank`].

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use saferoute_core::test_support::WeightedSumRegressor;
use saferoute_core::{IdentityTransform, ModelScorer, RankedRoute, ScoreVector};

type Scorer = ModelScorer<IdentityTransform, WeightedSumRegressor>;

const BRIGHT: ScoreVector = ScoreVector::new(0.85, 0.05, 0.7);

#[fixture]
fn scorer() -> RefCell<Option<Scorer>> {
    RefCell::new(None)
}

#[fixture]
fn ranking() -> RefCell<Vec<RankedRoute>> {
    RefCell::new(Vec::new())
}

#[given("a linear model favouring positive places and light")]
fn linear_model(#[from(scorer)] scorer: &RefCell<Option<Scorer>>) {
    *scorer.borrow_mut() = Some(ModelScorer::new(
        IdentityTransform,
        WeightedSumRegressor::new([0.6, -0.25, 0.5], 0.0),
    ));
}

#[when("I rank a dim route, a bright route and an average route")]
fn rank_three(
    #[from(scorer)] scorer: &RefCell<Option<Scorer>>,
    #[from(ranking)] ranking: &RefCell<Vec<RankedRoute>>,
) {
    let guard = scorer.borrow();
    let scorer = guard.as_ref().expect("scorer must be initialised");
    let batch = [
        ScoreVector::new(0.1, 0.7, 0.2),
        BRIGHT,
        ScoreVector::new(0.5, 0.3, 0.5),
    ];
    *ranking.borrow_mut() = scorer.rank(&batch);
}

#[then("three scores are returned")]
fn three_scores(#[from(ranking)] ranking: &RefCell<Vec<RankedRoute>>) {
    assert_eq!(ranking.borrow().len(), 3);
}

#[then("the bright route ranks first")]
fn bright_first(#[from(ranking)] ranking: &RefCell<Vec<RankedRoute>>) {
    let ranking = ranking.borrow();
    let first = ranking.first().expect("ranking must not be empty");
    assert_eq!(first.index, 1);
    assert_eq!(first.scores, BRIGHT);
}

#[then("the scores are in descending order")]
fn descending(#[from(ranking)] ranking: &RefCell<Vec<RankedRoute>>) {
    let ranking = ranking.borrow();
    assert!(
        ranking
            .windows(2)
            .all(|pair| pair[0].safety_score >= pair[1].safety_score)
    );
    assert!(ranking.iter().all(|route| (0.0..=1.0).contains(&route.safety_score)));
}

#[scenario(path = "tests/features/model_ranking.feature", index = 0)]
fn safest_route_ranks_first(scorer: RefCell<Option<Scorer>>, ranking: RefCell<Vec<RankedRoute>>) {
    let _ = (scorer, ranking);
}
