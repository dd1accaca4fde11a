//! Single-row results table and its CSV export.

use std::io;
use std::path::Path;

use csv::Writer;
use log::info;

use super::benchmark_errors::BenchmarkResult;

pub const FORWARD_PEAK_MEMORY: &str = "forward.peak_memory(MB)";
pub const FORWARD_LATENCY: &str = "forward.latency(s)";
pub const FORWARD_THROUGHPUT: &str = "forward.throughput(samples/s)";
pub const GENERATE_LATENCY: &str = "generate.latency(s)";
pub const GENERATE_THROUGHPUT: &str = "generate.throughput(tokens/s)";

/// Named metrics of one benchmark run, in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultsTable {
    columns: Vec<(String, f64)>,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, replacing an earlier value in place.
    pub fn insert(&mut self, name: &str, value: f64) {
        match self.columns.iter_mut().find(|(column, _)| column == name) {
            Some((_, existing)) => *existing = value,
            None => self.columns.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| *value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Header plus one row indexed `0`, with an unnamed leading index column.
    pub fn to_csv(&self) -> BenchmarkResult<String> {
        let mut writer = Writer::from_writer(Vec::new());
        self.write_records(&mut writer)?;
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn write_csv(&self, path: &Path) -> BenchmarkResult<()> {
        let mut writer = Writer::from_path(path)?;
        self.write_records(&mut writer)?;
        writer.flush()?;
        info!("\t+ Saved results to {}", path.display());
        Ok(())
    }

    fn write_records<W: io::Write>(&self, writer: &mut Writer<W>) -> csv::Result<()> {
        let header = std::iter::once("").chain(self.column_names());
        writer.write_record(header)?;

        let row = std::iter::once("0".to_string())
            .chain(self.columns.iter().map(|(_, value)| value.to_string()));
        writer.write_record(row)
    }

    pub fn log_summary(&self) {
        for (name, value) in &self.columns {
            info!("\t+ {}: {}", name, value);
        }
    }
}
