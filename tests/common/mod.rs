//! A synthetic galaxy catalog for the integration tests:
//! five broad-band magnitudes, each linear in redshift
//! plus Gaussian photometric noise.
use polars::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use photoz_boost::Sample;


const BANDS: [(&str, f64, f64); 5] = [
    ("mag_u", 22.0, 3.0),
    ("mag_g", 21.5, 2.5),
    ("mag_r", 21.0, 2.0),
    ("mag_i", 20.6, 1.6),
    ("mag_z", 20.3, 1.2),
];

const NOISE_SIGMA: f64 = 0.05;


pub fn synthetic_catalog(n_galaxy: usize, seed: u64) -> Sample {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, NOISE_SIGMA).unwrap();

    let mut redshifts = Vec::with_capacity(n_galaxy);
    let mut magnitudes = vec![Vec::with_capacity(n_galaxy); BANDS.len()];

    for _ in 0..n_galaxy {
        let z = rng.gen_range(0.02..1.5);
        redshifts.push(z);
        for (column, (_, zero_point, slope)) in
            magnitudes.iter_mut().zip(BANDS)
        {
            column.push(zero_point + slope * z + noise.sample(&mut rng));
        }
    }

    let columns = BANDS.iter()
        .zip(&magnitudes)
        .map(|((name, _, _), column)| Series::new(name, column))
        .collect::<Vec<_>>();
    let df = DataFrame::new(columns).unwrap();
    let target = Series::new("z_spec", &redshifts);

    Sample::from_dataframe(df, target).unwrap()
}
