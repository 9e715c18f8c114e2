use crate::model_selection::SearchOutcome;

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

const HEADER: &str = "Candidate,Params,MeanScore,StdScore\n";


/// Writes the outcome of a hyperparameter search to a CSV file,
/// one line per evaluated candidate.
/// The hyperparameters are stored as a JSON object,
/// so the file survives grid changes between runs.
///
/// # Example
/// ```no_run
/// use photoz_boost::prelude::*;
/// use photoz_boost::research::SearchLogger;
///
/// # let outcome: photoz_boost::SearchOutcome = unimplemented!();
/// SearchLogger::new("search.csv").write(&outcome).unwrap();
/// ```
pub struct SearchLogger<P> {
    path: P,
}


impl<P: AsRef<Path>> SearchLogger<P> {
    /// Create a new instance of `SearchLogger`.
    pub fn new(path: P) -> Self {
        Self { path }
    }


    /// Write every candidate of `outcome` to the file.
    pub fn write(&self, outcome: &SearchOutcome) -> std::io::Result<()> {
        let mut file = File::create(&self.path)?;
        file.write_all(HEADER.as_bytes())?;

        for (i, candidate) in outcome.candidates().iter().enumerate() {
            let params = serde_json::to_string(&candidate.params)
                .expect("Failed to serialize the hyperparameters");
            let line = format!(
                "{i},\"{params}\",{mean},{std}\n",
                params = params.replace('"', "\"\""),
                mean = candidate.mean_score,
                std = candidate.std_score,
            );
            file.write_all(line.as_bytes())?;
        }

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Regressor, Sample};
    use crate::model_selection::{GridSearch, ParamGrid};

    use polars::prelude::*;
    use std::fs;


    struct Constant(f64);
    impl Regressor for Constant {
        fn predict(&self, _sample: &Sample, _row: usize) -> f64 {
            self.0
        }
    }


    #[test]
    fn the_log_has_one_line_per_candidate() {
        let df = df!("mag_r" => &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let target = Series::new("z_spec", &[0.1; 6]);
        let sample = Sample::from_dataframe(df, target).unwrap();

        let grid = ParamGrid::new().param("c", [0.1, 0.3]);
        let outcome = GridSearch::init(&sample, grid)
            .n_folds(3)
            .run(|_train, params| Constant(params.get_float("c", 0.0)));

        let path = std::env::temp_dir().join("photoz_search_log_test.csv");
        SearchLogger::new(&path).write(&outcome).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Candidate,Params,MeanScore,StdScore");
        assert!(lines[1].contains("\"\"c\"\""));
    }
}
