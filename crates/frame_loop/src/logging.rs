use crate::config::FrameLoopConfig;
use eyre::WrapErr;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_FILE_CREATED: &str = "Log File Created Successfully";

/// Timestamp format shared by the header line and every event line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// The run log. Truncated once on creation, then reopened in append mode for every event
/// so each line is on disk even if the process dies mid-frame.
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    pub fn create(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let mut file = File::create(&path)?;
        writeln!(
            file,
            "{} {}",
            chrono::Local::now().format(TIMESTAMP_FORMAT),
            LOG_FILE_CREATED
        )?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Writes to the log file, or nowhere if it could not be reopened.
pub struct LogFileWriter(Option<File>);

impl Write for LogFileWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileWriter(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .ok(),
        )
    }
}

/// The fmt layer that writes plain, timestamped lines into `log_file`.
pub fn log_file_layer<S>(log_file: LogFile) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .with_writer(log_file)
}

fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
}

/// Installs the global subscriber: stdout plus the run log.
///
/// If the log file cannot be created the stdout layer is still installed and the error is
/// returned so the caller can tell the user.
pub fn init_logging(config: &FrameLoopConfig) -> eyre::Result<()> {
    let log_file = LogFile::create(&config.log_file)
        .wrap_err_with(|| format!("Log file {:?} could not be created", config.log_file));

    let stdout_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(stdout_layer)
        .with(log_file.as_ref().ok().cloned().map(log_file_layer))
        .try_init()?;

    log_file.map(|_| ())
}
