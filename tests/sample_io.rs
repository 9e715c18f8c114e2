//! Loading a catalog from flat CSV files,
//! the way a survey delivers it:
//! one photometry table and one single-column redshift file.
use photoz_boost::prelude::*;

use std::env;
use std::fs;


const PHOTOMETRY: &str = "\
mag_g,mag_r,mag_i
21.5,21.0,20.6
22.0,21.4,20.9
22.5,21.8,21.2
23.0,22.2,21.5
";

const REDSHIFT: &str = "\
z_spec
0.1
0.3
0.5
0.7
";


#[test]
fn a_photometry_and_redshift_file_pair_loads() {
    let dir = env::temp_dir();
    let photometry = dir.join("photoz_pair_photometry.csv");
    let redshift = dir.join("photoz_pair_redshift.csv");
    fs::write(&photometry, PHOTOMETRY).unwrap();
    fs::write(&redshift, REDSHIFT).unwrap();

    let sample = SampleReader::new()
        .file(&photometry)
        .has_header(true)
        .target_file(&redshift)
        .read()
        .unwrap();

    fs::remove_file(&photometry).ok();
    fs::remove_file(&redshift).ok();

    assert_eq!(sample.shape(), (4, 3));
    assert_eq!(sample.target(), &[0.1, 0.3, 0.5, 0.7][..]);
    assert_eq!(sample["mag_r"][2], 21.8);

    let (x, y) = sample.at(0);
    assert_eq!(x, vec![21.5, 21.0, 20.6]);
    assert_eq!(y, 0.1);
}


#[test]
fn a_named_column_serves_as_the_target() {
    let dir = env::temp_dir();
    let catalog = dir.join("photoz_column_catalog.csv");
    fs::write(
        &catalog,
        "mag_r,z_spec\n21.0,0.1\n21.4,0.3\n21.8,0.5\n",
    ).unwrap();

    let sample = SampleReader::new()
        .file(&catalog)
        .has_header(true)
        .target_feature("z_spec")
        .read()
        .unwrap();

    fs::remove_file(&catalog).ok();

    // The target column leaves the feature matrix.
    assert_eq!(sample.shape(), (3, 1));
    assert_eq!(sample.target(), &[0.1, 0.3, 0.5][..]);
}


#[test]
#[should_panic(expected = "The target file has")]
fn a_short_redshift_file_is_rejected() {
    let dir = env::temp_dir();
    let photometry = dir.join("photoz_short_photometry.csv");
    let redshift = dir.join("photoz_short_redshift.csv");
    fs::write(&photometry, PHOTOMETRY).unwrap();
    fs::write(&redshift, "z_spec\n0.1\n0.3\n").unwrap();

    let _ = SampleReader::new()
        .file(&photometry)
        .has_header(true)
        .target_file(&redshift)
        .read();
}


#[test]
fn a_csv_catalog_trains_an_ensemble() {
    let dir = env::temp_dir();
    let photometry = dir.join("photoz_fit_photometry.csv");
    let redshift = dir.join("photoz_fit_redshift.csv");

    let mut mag = String::from("mag_r\n");
    let mut z = String::from("z_spec\n");
    for i in 0..32 {
        let m = 18.0 + 0.1 * i as f64;
        mag.push_str(&format!("{m}\n"));
        z.push_str(&format!("{}\n", 0.05 * (m - 18.0)));
    }
    fs::write(&photometry, mag).unwrap();
    fs::write(&redshift, z).unwrap();

    let sample = SampleReader::new()
        .file(&photometry)
        .has_header(true)
        .target_file(&redshift)
        .read()
        .unwrap();

    fs::remove_file(&photometry).ok();
    fs::remove_file(&redshift).ok();

    let f = ModelKind::XgBoost.fit(&sample, &ParamSet::new());
    let predictions = f.predict_all(&sample);
    let mse = sample.target()
        .iter()
        .zip(&predictions[..])
        .map(|(y, p)| (y - p).powi(2))
        .sum::<f64>() / 32.0;
    assert!(mse < 0.01);
}
