//! Diagnostic plot for photometric-redshift estimates.
use plotters::prelude::*;

use crate::metrics::OUTLIER_THRESHOLD;

use std::error::Error;
use std::path::Path;


/// Draw the classical photo-z diagnostic scatter:
/// spectroscopic redshift on the horizontal axis,
/// estimated redshift on the vertical axis,
/// the identity line,
/// and the two outlier boundaries `z ± 0.15 (1 + z)`.
/// Galaxies outside the boundaries are drawn in red.
pub fn scatter_plot<P>(
    target: &[f64],
    predictions: &[f64],
    title: &str,
    path: P,
) -> Result<(), Box<dyn Error>>
    where P: AsRef<Path>,
{
    assert_eq!(target.len(), predictions.len());
    assert!(!target.is_empty(), "Cannot plot an empty catalog");

    let z_max = target.iter()
        .chain(predictions)
        .fold(f64::MIN, |acc, &z| acc.max(z))
        * 1.05;
    let z_min = 0.0_f64.min(
        target.iter()
            .chain(predictions)
            .fold(f64::MAX, |acc, &z| acc.min(z))
    );

    let root = BitMapBackend::new(path.as_ref(), (720, 720))
        .into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption(title, ("sans-serif", 24).into_font())
        .set_all_label_area_size(50)
        .build_cartesian_2d(z_min..z_max, z_min..z_max)?;

    chart.configure_mesh()
        .x_desc("z_spec")
        .y_desc("z_phot")
        .x_label_formatter(&|z| format!("{z:.2}"))
        .y_label_formatter(&|z| format!("{z:.2}"))
        .draw()?;

    chart.draw_series(LineSeries::new(
        [(z_min, z_min), (z_max, z_max)],
        &BLACK,
    ))?
        .label("z_phot = z_spec")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));

    let boundary = |sign: f64| {
        let line = (0..=100)
            .map(move |i| {
                let z = z_min + (z_max - z_min) * i as f64 / 100.0;
                (z, z + sign * OUTLIER_THRESHOLD * (1.0 + z))
            });
        LineSeries::new(line, BLACK.mix(0.4))
    };
    chart.draw_series(boundary(1.0))?;
    chart.draw_series(boundary(-1.0))?
        .label("z ± 0.15 (1 + z)")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], BLACK.mix(0.4))
        });

    chart.draw_series(
        target.iter()
            .zip(predictions)
            .map(|(&z, &p)| {
                let outlier =
                    (p - z).abs() > OUTLIER_THRESHOLD * (1.0 + z);
                let color = if outlier { RED.mix(0.6) } else { BLUE.mix(0.4) };
                Circle::new((z, p), 2, color.filled())
            }),
    )?;

    chart.configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}
