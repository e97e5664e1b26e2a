//! # Benchmark Reports
//!
//! Raw per-run rows, per-strategy runtime statistics and their output as a coloured table or as
//! CSV.

use std::{
    borrow::Cow,
    fmt,
    io::{self, Write},
    time::Duration,
};

use itertools::Itertools;
use maxsat_reduce::algs::maxsat::Strategy;
use termcolor::{Color, ColorSpec, WriteColor};

/// The measurements of one strategy run on one instance
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    /// The strategy that was run
    pub method: Strategy,
    /// The name of the instance
    pub instance: String,
    /// The iteration of the benchmark, i.e., the index of the instance
    pub iteration: usize,
    /// The CPU time of the run
    pub cpu_time: Duration,
    /// The returned cost
    pub cost: usize,
    /// The number of cardinality probes
    pub probes: usize,
    /// The number of oracle calls
    pub oracle_calls: usize,
}

/// Descriptive statistics of a sample, in the style of a five-number summary
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    /// The sample size
    pub count: usize,
    /// The arithmetic mean
    pub mean: f64,
    /// The sample standard deviation, `NaN` for fewer than two samples
    pub std: f64,
    /// The smallest sample
    pub min: f64,
    /// The first quartile
    pub q25: f64,
    /// The median
    pub q50: f64,
    /// The third quartile
    pub q75: f64,
    /// The largest sample
    pub max: f64,
}

impl Summary {
    /// Summarizes a sample, returns [`None`] for an empty sample
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_samples(samples: &[f64]) -> Option<Summary> {
        if samples.is_empty() {
            return None;
        }
        let sorted: Vec<f64> = samples.iter().copied().sorted_by(f64::total_cmp).collect();
        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count < 2 {
            f64::NAN
        } else {
            let sq_dev: f64 = sorted.iter().map(|x| (x - mean) * (x - mean)).sum();
            (sq_dev / (count - 1) as f64).sqrt()
        };
        Some(Summary {
            count,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            q50: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

/// Quantile of a sorted, non-empty sample with linear interpolation between closest ranks
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Summarizes the CPU times (in seconds) of all rows per strategy, in the order of
/// [`Strategy::ALL`]
#[must_use]
pub fn summarize(rows: &[Row]) -> Vec<(Strategy, Summary)> {
    let mut times = rows
        .iter()
        .map(|row| (row.method, row.cpu_time.as_secs_f64()))
        .into_group_map();
    Strategy::ALL
        .iter()
        .filter_map(|method| {
            let samples = times.remove(method)?;
            Summary::from_samples(&samples).map(|summary| (*method, summary))
        })
        .collect()
}

/// Writes the rows as a table
///
/// # Errors
///
/// If writing fails
pub fn write_table<W: WriteColor>(writer: &mut W, rows: &[Row]) -> io::Result<()> {
    header(writer, |w| {
        writeln!(
            w,
            "{:<24} {:>9} {:>12} {:>6} {:>7}",
            "method", "iteration", "cpu-time [s]", "cost", "probes"
        )
    })?;
    for row in rows {
        writeln!(
            writer,
            "{:<24} {:>9} {:>12.6} {:>6} {:>7}",
            row.method.to_string(),
            row.iteration,
            row.cpu_time.as_secs_f64(),
            row.cost,
            row.probes
        )?;
    }
    Ok(())
}

/// Writes runtime statistics per strategy
///
/// # Errors
///
/// If writing fails
pub fn write_summary<W: WriteColor>(writer: &mut W, rows: &[Row]) -> io::Result<()> {
    header(writer, |w| {
        writeln!(
            w,
            "{:<24} {:>5} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "method", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        )
    })?;
    for (method, summary) in summarize(rows) {
        writer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(writer, "{:<24}", method.to_string())?;
        writer.reset()?;
        writeln!(writer, " {summary}")?;
    }
    Ok(())
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>5} {:>10.6} {:>10.6} {:>10.6} {:>10.6} {:>10.6} {:>10.6} {:>10.6}",
            self.count, self.mean, self.std, self.min, self.q25, self.q50, self.q75, self.max
        )
    }
}

fn header<W, F>(writer: &mut W, content: F) -> io::Result<()>
where
    W: WriteColor,
    F: FnOnce(&mut W) -> io::Result<()>,
{
    writer.set_color(ColorSpec::new().set_bold(true))?;
    content(writer)?;
    writer.reset()
}

/// Writes the raw rows as CSV with a header line
///
/// # Errors
///
/// If writing fails
pub fn write_csv<W: Write>(writer: &mut W, rows: &[Row]) -> io::Result<()> {
    writeln!(
        writer,
        "method,instance,iteration,cpu_time,cost,probes,oracle_calls"
    )?;
    for row in rows {
        writeln!(
            writer,
            "{},{},{},{},{},{},{}",
            csv_field(&row.method.to_string()),
            csv_field(&row.instance),
            row.iteration,
            row.cpu_time.as_secs_f64(),
            row.cost,
            row.probes,
            row.oracle_calls
        )?;
    }
    writer.flush()
}

/// Quotes a CSV field if it contains a separator, a quote or a line break, doubling inner quotes
fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
