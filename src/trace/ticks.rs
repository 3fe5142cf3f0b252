//! Per-tick label trace: one `tick,category,memory_mb,process_count,thread_count` row for every
//! dispatched tick.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::errors::WorkloadError;
use crate::core::sampler::TickSample;

pub struct TickTraceWriter<W: Write> {
    csv_writer: csv::Writer<W>,
}

impl TickTraceWriter<File> {
    pub fn create(path: &Path) -> Result<Self, WorkloadError> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> TickTraceWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            csv_writer: csv::WriterBuilder::new()
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(writer),
        }
    }

    pub fn append(&mut self, sample: &TickSample) -> Result<(), WorkloadError> {
        self.csv_writer.serialize(sample)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), WorkloadError> {
        self.csv_writer.flush()?;
        Ok(())
    }
}

pub fn read_tick_trace_from_str(trace_str: &str) -> Result<Vec<TickSample>, WorkloadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(trace_str.as_bytes());

    let mut samples = vec![];
    for row in csv_reader.deserialize() {
        let sample: TickSample = row?;
        samples.push(sample);
    }
    Ok(samples)
}
