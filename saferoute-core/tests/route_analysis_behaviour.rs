//! Behavioural tests for [`RouteAnalyzer`] using in-memory collaborators.

use std::cell::RefCell;
use std::num::NonZeroUsize;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use saferoute_core::test_support::{ConstantRaster, StubPlacesProvider};
use saferoute_core::{
    AnalysisConfig, Coordinate, PlaceCandidate, PlacesError, Route, RouteAnalysis, RouteAnalyzer,
};

fn origin() -> Coordinate {
    Coordinate::new(12.9716, 77.5946).expect("valid coordinate")
}

#[fixture]
fn provider() -> RefCell<Option<StubPlacesProvider>> {
    RefCell::new(None)
}

#[fixture]
fn raster() -> RefCell<Option<ConstantRaster>> {
    RefCell::new(None)
}

#[fixture]
fn analysis() -> RefCell<Option<RouteAnalysis>> {
    RefCell::new(None)
}

#[given("a places service returning one police station and one bar")]
fn police_and_bar(#[from(provider)] provider: &RefCell<Option<StubPlacesProvider>>) {
    *provider.borrow_mut() = Some(
        StubPlacesProvider::new()
            .with_results("police", vec![PlaceCandidate::new("police-1", origin())])
            .with_results("bar", vec![PlaceCandidate::new("bar-1", origin())]),
    );
}

#[given("a places service reporting the same place as an ATM and a petrol station")]
fn shared_place(#[from(provider)] provider: &RefCell<Option<StubPlacesProvider>>) {
    let place = PlaceCandidate::new("forecourt", origin());
    *provider.borrow_mut() = Some(
        StubPlacesProvider::new()
            .with_results("atm", vec![place.clone()])
            .with_results("gas_station", vec![place]),
    );
}

#[given("a places service whose police lookups fail and that reports one bar")]
fn failing_police(#[from(provider)] provider: &RefCell<Option<StubPlacesProvider>>) {
    *provider.borrow_mut() = Some(
        StubPlacesProvider::new()
            .with_failure(
                "police",
                PlacesError::Timeout {
                    endpoint: "https://maps.example.test/nearbysearch".to_owned(),
                    timeout_secs: 5,
                },
            )
            .with_results("bar", vec![PlaceCandidate::new("bar-1", origin())]),
    );
}

#[given("a raster returning 30 everywhere")]
fn raster_thirty(#[from(raster)] raster: &RefCell<Option<ConstantRaster>>) {
    *raster.borrow_mut() = Some(ConstantRaster(30.0));
}

#[when("I analyse a route of ten identical points with stride 10")]
fn analyse_ten_points(
    #[from(provider)] provider: &RefCell<Option<StubPlacesProvider>>,
    #[from(raster)] raster: &RefCell<Option<ConstantRaster>>,
    #[from(analysis)] analysis: &RefCell<Option<RouteAnalysis>>,
) {
    let provider = provider.borrow_mut().take().expect("provider must be initialised");
    let raster = raster.borrow_mut().take().expect("raster must be initialised");
    let config = AnalysisConfig {
        stride: NonZeroUsize::new(10).expect("non-zero stride"),
        ..AnalysisConfig::default()
    };
    let analyzer = RouteAnalyzer::new(provider, raster, config).expect("valid config");
    let route = Route::new(vec![origin(); 10]);
    *analysis.borrow_mut() = Some(analyzer.analyze(&route));
}

#[then("exactly 1 point is sampled")]
fn one_sample(#[from(analysis)] analysis: &RefCell<Option<RouteAnalysis>>) {
    let borrowed = analysis.borrow();
    let analysis = borrowed.as_ref().expect("analysis must run");
    assert_eq!(analysis.sampled_points, 1);
}

#[then("the positive count is {positive} and the negative count is {negative}")]
fn counts(
    positive: u32,
    negative: u32,
    #[from(analysis)] analysis: &RefCell<Option<RouteAnalysis>>,
) {
    let borrowed = analysis.borrow();
    let analysis = borrowed.as_ref().expect("analysis must run");
    assert_eq!(analysis.features.positive_count, positive);
    assert_eq!(analysis.features.negative_count, negative);
}

#[then("the lighting score is 0.5")]
fn lighting_half(#[from(analysis)] analysis: &RefCell<Option<RouteAnalysis>>) {
    let borrowed = analysis.borrow();
    let analysis = borrowed.as_ref().expect("analysis must run");
    assert!((analysis.features.lighting_score - 0.5).abs() < 1e-12);
}

macro_rules! register_scenario {
    ($fn_name:ident, $index:literal) => {
        #[scenario(path = "tests/features/route_analysis.feature", index = $index)]
        fn $fn_name(
            provider: RefCell<Option<StubPlacesProvider>>,
            raster: RefCell<Option<ConstantRaster>>,
            analysis: RefCell<Option<RouteAnalysis>>,
        ) {
            let _ = (provider, raster, analysis);
        }
    };
}

register_scenario!(police_and_bar_are_counted, 0);
register_scenario!(shared_place_is_counted_once, 1);
register_scenario!(failing_lookups_are_isolated, 2);
