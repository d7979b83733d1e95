//! PNG line charts via plotters

use super::ChartSink;
use crate::config::ChartConfig;
use crate::error::{Error, Result};
use plotters::prelude::*;
use std::path::Path;

/// Single black line on a white canvas, no axes or labels
#[derive(Debug, Clone)]
pub struct PlottersChart {
    width: u32,
    height: u32,
    stroke_width: u32,
}

impl PlottersChart {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            stroke_width: 3,
        }
    }

    pub fn from_config(config: &ChartConfig) -> Self {
        Self::new(config.width, config.height)
    }
}

impl Default for PlottersChart {
    fn default() -> Self {
        Self::from_config(&ChartConfig::default())
    }
}

fn chart_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Chart(e.to_string())
}

impl ChartSink for PlottersChart {
    fn render(&self, points: &[(f64, f64)], dest: &Path) -> Result<()> {
        if points.is_empty() {
            return Err(Error::Chart("empty series".into()));
        }

        let (x_min, x_max) = bounds(points.iter().map(|p| p.0));
        let (y_min, y_max) = bounds(points.iter().map(|p| p.1));
        // Flat series still need a non-empty range
        let x_pad = if x_max > x_min { 0.0 } else { 1.0 };
        let y_pad = ((y_max - y_min) * 0.05).max(y_max.abs() * 0.01).max(1e-8);

        let root = BitMapBackend::new(dest, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .build_cartesian_2d(x_min..(x_max + x_pad), (y_min - y_pad)..(y_max + y_pad))
            .map_err(chart_err)?;

        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                BLACK.stroke_width(self.stroke_width),
            ))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
        Ok(())
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}
