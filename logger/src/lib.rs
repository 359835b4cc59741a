//! Logging setup for the STCEx binaries.
//!
//! All output goes through the `log` facade. `RUST_LOG` overrides the
//! default filter where the `_with_default` variants are used.

use {
    env_logger::{Builder, Env, Target},
    std::{
        fs::{File, OpenOptions},
        io::{self, Write},
        path::{Path, PathBuf},
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc,
        },
    },
};

fn init(mut builder: Builder) {
    builder.format_timestamp_millis();
    if builder.try_init().is_err() {
        log::debug!("logger already initialized");
    }
}

/// Configures logging with a specific filter, ignoring `RUST_LOG`.
pub fn setup_with(filter: &str) {
    let mut builder = Builder::new();
    builder.parse_filters(filter);
    init(builder);
}

/// Configures logging with `filter` unless `RUST_LOG` is set.
pub fn setup_with_default(filter: &str) {
    init(Builder::from_env(Env::new().default_filter_or(filter)));
}

/// Configures logging with the default filter "error" unless `RUST_LOG` is
/// set.
pub fn setup() {
    setup_with_default("error");
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// A log file that is reopened on the next write after `reopen` is raised,
/// so an external rotation can move the old file away.
struct ReopeningFile {
    path: PathBuf,
    file: File,
    reopen: Arc<AtomicBool>,
}

impl ReopeningFile {
    fn open(path: &Path, reopen: Arc<AtomicBool>) -> io::Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            file: open_append(path)?,
            reopen,
        })
    }
}

impl Write for ReopeningFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.reopen.swap(false, Ordering::Relaxed) {
            self.file.flush()?;
            self.file = open_append(&self.path)?;
        }
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Like [`setup_with_default`], but appends to `logfile`. On unix the file
/// is reopened after SIGUSR1.
pub fn setup_file_with_default(logfile: &Path, filter: &str) -> io::Result<()> {
    let reopen = Arc::new(AtomicBool::new(false));
    #[cfg(unix)]
    signal_hook::flag::register(signal_hook::consts::SIGUSR1, Arc::clone(&reopen))?;

    let file = ReopeningFile::open(logfile, reopen)?;
    let mut builder = Builder::from_env(Env::new().default_filter_or(filter));
    builder.target(Target::Pipe(Box::new(file)));
    init(builder);
    Ok(())
}

#[cfg(test)]
mod tests {
    use {super::*, std::fs};

    #[test]
    fn test_reopening_file_follows_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stcex.log");
        let rotated = dir.path().join("stcex.log.1");
        let reopen = Arc::new(AtomicBool::new(false));
        let mut file = ReopeningFile::open(&path, reopen.clone()).unwrap();

        file.write_all(b"before\n").unwrap();
        fs::rename(&path, &rotated).unwrap();
        reopen.store(true, Ordering::Relaxed);
        file.write_all(b"after\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&rotated).unwrap(), "before\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "after\n");
    }
}
