use photoz_boost::prelude::*;
use photoz_boost::plot::scatter_plot;
use photoz_boost::research::{
    ModelComparison,
    SearchLogger,
    SearchStrategy,
};

mod common;
use common::synthetic_catalog;


#[test]
fn the_four_families_compare_end_to_end() {
    let sample = synthetic_catalog(160, 21);

    let table = ModelComparison::new(&sample)
        .strategy(SearchStrategy::Random { n_iter: 2 })
        .scoring(Scoring::NegNmad)
        .n_folds(3)
        .seeds(vec![1, 2])
        .run();

    assert_eq!(table.rows().len(), 4);
    for row in table.rows() {
        // The catalog is clean; every family should be usable.
        assert!(row.nmad.0 < 0.2, "{}: NMAD {}", row.kind, row.nmad.0);
        assert!(row.search_score <= 0.0);
    }

    let winner = table.best_by_nmad();
    assert!(winner.nmad.0 <= table.rows()[0].nmad.0);
}


#[test]
fn search_outcomes_log_to_csv() {
    let sample = synthetic_catalog(100, 22);

    let grid = ParamGrid::new()
        .param("eta", [0.1, 0.3])
        .param("n_estimators", [10i64, 20]);
    let outcome = GridSearch::init(&sample, grid)
        .n_folds(3)
        .run(|train, params| ModelKind::XgBoost.fit(train, params));

    let path = std::env::temp_dir().join("photoz_comparison_search.csv");
    SearchLogger::new(&path).write(&outcome).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();

    // Header plus one line per candidate.
    assert_eq!(text.lines().count(), 5);
    assert!(text.starts_with("Candidate,Params,MeanScore,StdScore"));
}


#[test]
fn the_diagnostic_plot_is_written() {
    let sample = synthetic_catalog(120, 23);

    let f = ModelKind::XgBoost.fit(&sample, &ParamSet::new());
    let predictions = f.predict_all(&sample);

    let path = std::env::temp_dir().join("photoz_scatter_test.png");
    scatter_plot(
        sample.target(),
        &predictions,
        "XGBoost on the synthetic catalog",
        &path,
    ).unwrap();

    let written = std::fs::metadata(&path).unwrap().len();
    std::fs::remove_file(&path).ok();
    assert!(written > 0);
}
