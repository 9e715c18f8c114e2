use std::path::{Path, PathBuf};
use std::io;

use super::sample_struct::Sample;


/// A struct that returns [`Sample`].
/// Using this struct, one can read a photometry table
/// and its redshift target to [`Sample`].
/// The target either lives in a named column of the same CSV file,
/// or in a separate single-column CSV file.
/// # Example
/// The following code reads a magnitude table
/// and a separate redshift file.
/// ```no_run
/// use photoz_boost::SampleReader;
/// let sample = SampleReader::new()
///     .file("photometry.csv")
///     .has_header(true)
///     .target_file("redshift.csv")
///     .read()
///     .unwrap();
/// ```
pub struct SampleReader {
    file: Option<PathBuf>,
    has_header: bool,
    target_column: Option<String>,
    target_file: Option<PathBuf>,
}


impl SampleReader {
    /// Construct a new instance of [`SampleReader`].
    pub fn new() -> Self {
        Self {
            file: None,
            has_header: false,
            target_column: None,
            target_file: None,
        }
    }


    /// Set the flag whether the files have a header row or not.
    /// Default is `false.`
    pub fn has_header(mut self, flag: bool) -> Self {
        self.has_header = flag;
        self
    }


    /// Set the feature-matrix file name.
    pub fn file<P: AsRef<Path>>(mut self, file: P) -> Self {
        self.file = Some(file.as_ref().to_path_buf());
        self
    }


    /// Set the file name of a separate single-column target file.
    pub fn target_file<P: AsRef<Path>>(mut self, file: P) -> Self {
        self.target_file = Some(file.as_ref().to_path_buf());
        self
    }


    /// Set the column name that is used for the redshift target.
    pub fn target_feature<S: AsRef<str>>(mut self, column: S) -> Self {
        self.target_column = Some(column.as_ref().to_string());
        self
    }


    /// Reads the file(s) based on the arguments,
    /// and returns `std::io::Result<Sample>`.
    /// This method consumes `self.`
    pub fn read(self) -> io::Result<Sample> {
        let file = self.file
            .expect("The feature-matrix file name is not set");

        let sample = Sample::from_csv(file, self.has_header)?;

        let sample = match (self.target_file, self.target_column) {
            (Some(path), None) => {
                sample.with_target_from_csv(path, self.has_header)?
            },
            (None, Some(column)) => {
                sample.set_target(column)
            },
            (None, None) => {
                panic!(
                    "The target is not specified. \
                     Use `SampleReader::target_feature` or \
                     `SampleReader::target_file`."
                );
            },
            (Some(_), Some(_)) => {
                panic!(
                    "Both a target column and a target file are given. \
                     Specify exactly one."
                );
            },
        };
        Ok(sample)
    }
}


impl Default for SampleReader {
    fn default() -> Self {
        Self::new()
    }
}
