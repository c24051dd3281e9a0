//! One line per entity over the shared time index.

use std::error::Error;
use std::path::Path;

use chrono::{NaiveDateTime, TimeDelta};
use plotters::prelude::*;

use crate::panel::VariableView;

use super::padded_range;

pub(super) struct LineChart<'a> {
    pub caption: &'a str,
    pub y_desc: &'a str,
    pub legend: SeriesLabelPosition,
}

/// Hours elapsed since `start`; the x coordinate of every trace.
fn hours_since(start: NaiveDateTime, ts: NaiveDateTime) -> f64 {
    (ts - start).num_seconds() as f64 / 3600.0
}

pub(super) fn draw(
    path: &Path,
    size: (u32, u32),
    chart: &LineChart<'_>,
    view: VariableView<'_>,
) -> Result<(), Box<dyn Error>> {
    let index = view.time_index();
    let (Some(&start), Some(&end)) = (index.first(), index.last()) else {
        return Ok(());
    };
    let x_max = hours_since(start, end).max(1.0 / 60.0);
    let (y_lo, y_hi) = padded_range(view.iter().flat_map(|(_, c)| c.iter().copied()));

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let mut ctx = ChartBuilder::on(&root)
        .caption(chart.caption, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..x_max, y_lo..y_hi)?;

    let time_label = |h: &f64| {
        let ts = start + TimeDelta::seconds((h * 3600.0).round() as i64);
        ts.format("%m-%d %H:%M").to_string()
    };
    ctx.configure_mesh()
        .x_desc("Time")
        .y_desc(chart.y_desc)
        .x_labels(8)
        .x_label_formatter(&time_label)
        .draw()?;

    for (i, (entity, column)) in view.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        let points = index
            .iter()
            .zip(column)
            .map(|(&ts, &v)| (hours_since(start, ts), v));
        ctx.draw_series(LineSeries::new(points, color.stroke_width(1)))?
            .label(entity)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    ctx.configure_series_labels()
        .position(chart.legend.clone())
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn x_axis_is_hours_since_start() {
        let start = NaiveDate::from_ymd_opt(2016, 2, 1)
            .and_then(|d| d.and_hms_opt(23, 0, 0))
            .unwrap();
        assert_eq!(hours_since(start, start), 0.0);
        assert_eq!(hours_since(start, start + TimeDelta::minutes(90)), 1.5);
    }
}
