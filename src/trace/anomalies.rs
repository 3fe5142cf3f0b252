//! Ground-truth anomaly file: `start_time,duration` header followed by one row per scheduled
//! interval in discovery order.

use std::io::Write;
use std::path::Path;

use log::info;

use crate::core::anomaly::{AnomalyInterval, Schedule};
use crate::core::errors::WorkloadError;

pub fn write_schedule<W: Write>(writer: W, schedule: &Schedule) -> Result<(), WorkloadError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    // serialize() only emits the header together with the first record
    csv_writer.write_record(["start_time", "duration"])?;
    for interval in schedule.intervals() {
        csv_writer.write_record(&[
            interval.start_tick.to_string(),
            interval.duration.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Overwrites `path` with the schedule.
pub fn write_schedule_to_file(path: &Path, schedule: &Schedule) -> Result<(), WorkloadError> {
    let file = std::fs::File::create(path)?;
    write_schedule(file, schedule)?;
    info!("Wrote {} anomalies to {:?}", schedule.len(), path);
    Ok(())
}

pub fn read_schedule_from_str(trace_str: &str) -> Result<Schedule, WorkloadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(trace_str.as_bytes());

    let mut intervals = vec![];
    for row in csv_reader.deserialize() {
        let interval: AnomalyInterval = row?;
        intervals.push(interval);
    }
    Ok(Schedule::new(intervals))
}

pub fn read_schedule_from_file(path: &Path) -> Result<Schedule, WorkloadError> {
    let trace_str = std::fs::read_to_string(path)?;
    read_schedule_from_str(&trace_str)
}

#[cfg(test)]
mod tests {
    use crate::core::anomaly::{AnomalyInterval, Schedule};

    use super::{read_schedule_from_str, write_schedule};

    #[test]
    fn test_exact_file_layout() {
        let schedule = Schedule::new(vec![
            AnomalyInterval::new(640, 10),
            AnomalyInterval::new(115, 10),
        ]);
        let mut out: Vec<u8> = vec![];
        write_schedule(&mut out, &schedule).unwrap();
        assert_eq!(
            "start_time,duration\n640,10\n115,10\n",
            String::from_utf8(out).unwrap()
        );
    }

    #[test]
    fn test_empty_schedule_has_header_only() {
        let mut out: Vec<u8> = vec![];
        write_schedule(&mut out, &Schedule::default()).unwrap();
        assert_eq!("start_time,duration\n", String::from_utf8(out).unwrap());
    }

    #[test]
    fn test_parsing_ok() {
        let schedule = read_schedule_from_str(
            r#"start_time,duration
320,10
781,10
"#,
        )
        .unwrap();
        assert_eq!(
            schedule,
            Schedule::new(vec![
                AnomalyInterval::new(320, 10),
                AnomalyInterval::new(781, 10)
            ])
        );
    }

    #[test]
    fn test_parsing_malformed_row() {
        assert!(read_schedule_from_str("start_time,duration\nabc,10\n").is_err());
    }
}
