//! Dataset sinks
//!
//! A sink receives every dataset the scheduler produces. Sink failures are
//! recoverable: the scheduler logs them and keeps ticking.

use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::Path;

use crate::readings::Dataset;
use crate::simulation::{SimulationError, SimulationResult};

/// Consumer of the per-tick datasets
pub trait DatasetSink: std::fmt::Debug {
    /// Handle one dataset
    fn accept(&mut self, dataset: &Dataset) -> SimulationResult<()>;

    /// Flush buffered output; called once when the scheduler stops
    fn flush(&mut self) -> SimulationResult<()> {
        Ok(())
    }
}

impl<S: DatasetSink + ?Sized> DatasetSink for Box<S> {
    fn accept(&mut self, dataset: &Dataset) -> SimulationResult<()> {
        (**self).accept(dataset)
    }

    fn flush(&mut self) -> SimulationResult<()> {
        (**self).flush()
    }
}

/// Fan-out: every sink sees every dataset, the first failure is reported
impl DatasetSink for Vec<Box<dyn DatasetSink>> {
    fn accept(&mut self, dataset: &Dataset) -> SimulationResult<()> {
        let mut first_error = None;
        for sink in self.iter_mut() {
            if let Err(error) = sink.accept(dataset) {
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn flush(&mut self) -> SimulationResult<()> {
        let mut first_error = None;
        for sink in self.iter_mut() {
            if let Err(error) = sink.flush() {
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Sink that drops every dataset
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DatasetSink for NullSink {
    fn accept(&mut self, _dataset: &Dataset) -> SimulationResult<()> {
        Ok(())
    }
}

/// Prints the live stats panel after every tick
#[derive(Debug)]
pub struct LiveStatsSink<W: Write = Stdout> {
    writer: W,
    iteration: u64,
}

impl LiveStatsSink<Stdout> {
    /// Panel on standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> LiveStatsSink<W> {
    /// Panel written to `writer`
    pub fn new(writer: W) -> Self {
        Self { writer, iteration: 0 }
    }

    /// Underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Render the panel of one dataset
    pub fn render(iteration: u64, dataset: &Dataset) -> String {
        let stats = dataset.stats();
        format!(
            "\n--- Iteration {} ---\n\
             Installation Live Stats - {}\n   \
             Visitors detected: {}\n   \
             Tree movement intensity: {:.3}\n   \
             Total power consumption: {:.1}W\n\
             Data points this cycle: {}\n",
            iteration,
            dataset.timestamp().format("%H:%M:%S"),
            stats.total_visitors_detected,
            stats.average_tree_movement,
            stats.total_power_consumption,
            dataset.data_point_count(),
        )
    }
}

impl<W: Write + std::fmt::Debug> DatasetSink for LiveStatsSink<W> {
    fn accept(&mut self, dataset: &Dataset) -> SimulationResult<()> {
        self.iteration += 1;
        let panel = Self::render(self.iteration, dataset);
        self.writer
            .write_all(panel.as_bytes())
            .map_err(|e| SimulationError::sink_error(format!("live stats: {}", e)))
    }

    fn flush(&mut self) -> SimulationResult<()> {
        self.writer.flush().map_err(|e| SimulationError::sink_error(format!("live stats: {}", e)))
    }
}

/// Writes every dataset as one line of JSON
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    lines_written: u64,
}

impl JsonLinesSink<BufWriter<File>> {
    /// Create (or truncate) a JSON Lines file
    pub fn create<P: AsRef<Path>>(path: P) -> SimulationResult<Self> {
        let file = File::create(path.as_ref()).map_err(|e| {
            SimulationError::sink_error(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// JSON Lines written to `writer`
    pub fn new(writer: W) -> Self {
        Self { writer, lines_written: 0 }
    }

    /// Number of datasets written
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + std::fmt::Debug> DatasetSink for JsonLinesSink<W> {
    fn accept(&mut self, dataset: &Dataset) -> SimulationResult<()> {
        serde_json::to_writer(&mut self.writer, dataset)?;
        self.writer.write_all(b"\n")?;
        self.lines_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> SimulationResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
