//! Grouped bars: one group per slot, one bar per entity inside it.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

pub(super) struct BarChart<'a> {
    pub caption: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
    pub legend: SeriesLabelPosition,
    pub x_range: (f64, f64),
    /// `(left, width)` of each group on the x axis.
    pub slots: Vec<(f64, f64)>,
    pub entities: &'a [String],
    /// `values[slot][entity]`.
    pub values: &'a [Vec<f64>],
}

/// `[x0, x1)` of bar `e` out of `n` inside the slot.
fn bar_span((left, width): (f64, f64), e: usize, n: usize) -> (f64, f64) {
    let w = width / n.max(1) as f64;
    (left + e as f64 * w, left + (e + 1) as f64 * w)
}

fn value_range(values: &[Vec<f64>]) -> (f64, f64) {
    let (lo, hi) = values
        .iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let hi = if hi > 0.0 { hi * 1.1 } else { hi };
    let lo = if lo < 0.0 { lo * 1.1 } else { lo };
    if hi > lo { (lo, hi) } else { (lo, lo + 1.0) }
}

pub(super) fn draw(
    path: &Path,
    size: (u32, u32),
    chart: &BarChart<'_>,
    x_label: &dyn Fn(&f64) -> String,
) -> Result<(), Box<dyn Error>> {
    let (y_lo, y_hi) = value_range(chart.values);
    let n = chart.entities.len();

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let mut ctx = ChartBuilder::on(&root)
        .caption(chart.caption, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(chart.x_range.0..chart.x_range.1, y_lo..y_hi)?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .x_desc(chart.x_desc)
        .y_desc(chart.y_desc)
        .x_label_formatter(x_label)
        .draw()?;

    for (e, entity) in chart.entities.iter().enumerate() {
        let color = Palette99::pick(e).to_rgba();
        let bars = chart.slots.iter().zip(chart.values).map(move |(&slot, row)| {
            let (x0, x1) = bar_span(slot, e, n);
            Rectangle::new([(x0, 0.0), (x1, row[e])], color.filled())
        });
        ctx.draw_series(bars)?
            .label(entity.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
    }

    ctx.configure_series_labels()
        .position(chart.legend.clone())
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
