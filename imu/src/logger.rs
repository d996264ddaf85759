//! Durable CSV record of every sample.
//!
//! The file is reopened for each row so a crash can only lose the row in
//! flight.

use imu_traits::{ImuError, Sample, SampleSource};
use log::{debug, error, info};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub const HEADER: &str = "Timestamp, Accel_X (m/s²), Accel_Y (m/s²), Accel_Z (m/s²), Yaw (rad/s), Pitch (rad/s), Roll (rad/s)";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRecord {
    /// Seconds since the pipeline started.
    pub timestamp: f64,
    pub sample: Sample,
}

impl LogRecord {
    fn fields(&self) -> [String; 7] {
        let a = self.sample.acceleration;
        let r = self.sample.rate;
        [
            self.timestamp.to_string(),
            a.x.to_string(),
            a.y.to_string(),
            a.z.to_string(),
            r.yaw.to_string(),
            r.pitch.to_string(),
            r.roll.to_string(),
        ]
    }
}

fn write_error(err: csv::Error) -> ImuError {
    ImuError::WriteError(err.to_string())
}

/// Creates or truncates `path` and writes the header row.
pub fn write_header(path: &Path) -> Result<(), ImuError> {
    let mut file = File::create(path)?;
    writeln!(file, "{}", HEADER)?;
    file.sync_all()?;
    Ok(())
}

/// Appends one row. The file is closed again before returning.
pub fn append_record(path: &Path, record: &LogRecord) -> Result<(), ImuError> {
    let file = OpenOptions::new().append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(record.fields()).map_err(write_error)?;
    writer.flush()?;
    Ok(())
}

#[derive(Debug)]
enum LoggerCommand {
    Stop,
}

/// Periodic sampler that appends one row per tick.
pub struct SampleLogger<S> {
    source: S,
    path: PathBuf,
    period: Duration,
}

impl<S: SampleSource> SampleLogger<S> {
    pub fn new(source: S, path: impl Into<PathBuf>, period: Duration) -> Self {
        Self {
            source,
            path: path.into(),
            period,
        }
    }

    /// Takes one sample and appends it.
    pub fn tick(&mut self, elapsed: Duration) -> Result<LogRecord, ImuError> {
        let sample = self.source.sample()?;
        let record = LogRecord {
            timestamp: elapsed.as_secs_f64(),
            sample,
        };
        append_record(&self.path, &record)?;
        Ok(record)
    }

    fn run(
        mut self,
        start: Instant,
        command_rx: mpsc::Receiver<LoggerCommand>,
    ) -> Result<u64, ImuError> {
        let mut rows = 0u64;
        loop {
            if let Err(e) = self.tick(start.elapsed()) {
                error!("Sample logger stopped after {} rows: {}", rows, e);
                return Err(e);
            }
            rows += 1;

            match command_rx.recv_timeout(self.period) {
                Ok(LoggerCommand::Stop) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
        Ok(rows)
    }
}

impl<S: SampleSource + Send + 'static> SampleLogger<S> {
    /// Runs the logger on its own thread until stopped, timestamping rows
    /// from the moment it starts.
    pub fn spawn(self) -> LoggerHandle {
        self.spawn_from(Instant::now())
    }

    /// Like [`SampleLogger::spawn`], with timestamps measured from `start`.
    pub fn spawn_from(self, start: Instant) -> LoggerHandle {
        let (command_tx, command_rx) = mpsc::channel();
        let path = self.path.display().to_string();
        let join = thread::spawn(move || {
            debug!("Sample logger thread started");
            let result = self.run(start, command_rx);
            debug!("Sample logger thread exiting");
            result
        });
        info!("Logging samples to {}", path);
        LoggerHandle { command_tx, join }
    }
}

/// Dropping the handle disconnects the command channel, which the logger
/// treats as a stop request.
pub struct LoggerHandle {
    command_tx: mpsc::Sender<LoggerCommand>,
    join: JoinHandle<Result<u64, ImuError>>,
}

impl LoggerHandle {
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Stops the logger and waits for it. Returns the number of rows written,
    /// or the error that had already ended it.
    pub fn stop(self) -> Result<u64, ImuError> {
        let LoggerHandle { command_tx, join } = self;
        // The thread may already be gone after a failure.
        let _ = command_tx.send(LoggerCommand::Stop);
        join.join()
            .map_err(|_| ImuError::Other("sample logger panicked".to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imu_traits::{AngularRate, Vector3};
    use std::fs;

    struct Counting(u32);

    impl SampleSource for Counting {
        fn sample(&mut self) -> Result<Sample, ImuError> {
            self.0 += 1;
            let n = self.0 as f64;
            Ok(Sample {
                acceleration: Vector3::new(n, -n, n - 9.81),
                rate: AngularRate {
                    yaw: 0.5 * n,
                    pitch: 0.0,
                    roll: -0.25,
                },
            })
        }
    }

    struct Failing;

    impl SampleSource for Failing {
        fn sample(&mut self) -> Result<Sample, ImuError> {
            Err(ImuError::DeviceError("no ack".to_string()))
        }
    }

    fn temp_csv(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("imu-telemetry-{}-{}.csv", name, std::process::id()))
    }

    #[test]
    fn header_plus_one_row_per_tick() {
        let path = temp_csv("ticks");
        write_header(&path).unwrap();
        let mut logger = SampleLogger::new(Counting(0), &path, Duration::from_millis(100));
        for i in 0..5 {
            logger.tick(Duration::from_millis(100 * i)).unwrap();
        }

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "0,1,-1,-8.81,0.5,0,-0.25");

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 7);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[4][0].parse::<f64>().unwrap(), 0.4);
        assert_eq!(rows[4][1].parse::<f64>().unwrap(), 5.0);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn header_truncates_previous_run() {
        let path = temp_csv("truncate");
        fs::write(&path, "stale\nrows\n").unwrap();
        write_header(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), format!("{}\n", HEADER));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn spawned_logger_stops_on_request() {
        let path = temp_csv("spawn");
        write_header(&path).unwrap();
        let handle = SampleLogger::new(Counting(0), &path, Duration::from_millis(10)).spawn();
        thread::sleep(Duration::from_millis(55));
        let rows = handle.stop().unwrap();
        assert!(rows >= 1);

        let lines = fs::read_to_string(&path).unwrap().lines().count() as u64;
        assert_eq!(lines, rows + 1);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn read_failure_ends_the_logger() {
        let path = temp_csv("failing");
        write_header(&path).unwrap();
        let handle = SampleLogger::new(Failing, &path, Duration::from_millis(10)).spawn();
        assert!(matches!(handle.stop(), Err(ImuError::DeviceError(_))));
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_output_is_a_write_error() {
        let path = temp_csv("missing");
        let _ = fs::remove_file(&path);
        let mut logger = SampleLogger::new(Counting(0), &path, Duration::from_millis(10));
        assert!(matches!(
            logger.tick(Duration::ZERO),
            Err(ImuError::WriteError(_))
        ));
    }

    #[test]
    fn dropping_the_handle_stops_the_logger() {
        let path = temp_csv("drop");
        write_header(&path).unwrap();
        let handle = SampleLogger::new(Counting(0), &path, Duration::from_millis(5)).spawn();
        thread::sleep(Duration::from_millis(20));
        drop(handle);
        thread::sleep(Duration::from_millis(30));

        let settled = fs::read_to_string(&path).unwrap().lines().count();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), settled);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn timestamps_count_from_the_shared_start() {
        let path = temp_csv("start");
        write_header(&path).unwrap();
        let start = Instant::now()
            .checked_sub(Duration::from_secs(2))
            .unwrap();
        let handle =
            SampleLogger::new(Counting(0), &path, Duration::from_millis(10)).spawn_from(start);
        thread::sleep(Duration::from_millis(25));
        handle.stop().unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let first = reader.records().next().unwrap().unwrap();
        let timestamp: f64 = first[0].parse().unwrap();
        assert!(timestamp >= 2.0, "timestamp {} ignores the shared start", timestamp);
        fs::remove_file(&path).unwrap();
    }
}
