use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::logger::record::{self, InputEvent};

enum LogSink {
    Plain(BufWriter<File>),
    Gzip(BufWriter<GzEncoder<File>>),
}

/// Streams one tab-separated record per observed interaction event to a
/// destination file, gzip-compressed when the file name ends in `.gz`.
///
/// The elapsed-time clock is anchored to the first logged event, not to
/// construction: the logger is *unanchored* until the first `log` call and
/// *anchored* forever after. Write failures are reported to stderr (with
/// the lost record echoed there) and never abort the host.
pub struct InteractionLogger {
    sink: Option<LogSink>,
    anchor: Option<Instant>,
    write_failures: u64,
    path: PathBuf,
}

impl InteractionLogger {
    /// Open `path` for writing, truncating any existing file. A `.gz`
    /// suffix routes output through a streaming gzip encoder; anything
    /// else is written as plain UTF-8 text.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;

        let is_gz = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
        let sink = if is_gz {
            let encoder = GzEncoder::new(file, Compression::fast());
            LogSink::Gzip(BufWriter::new(encoder))
        } else {
            LogSink::Plain(BufWriter::new(file))
        };

        Ok(Self {
            sink: Some(sink),
            anchor: None,
            write_failures: 0,
            path,
        })
    }

    /// Open a fresh per-session destination under `dir`, named with the
    /// current local time so successive runs never clobber each other.
    pub fn session_default(dir: impl AsRef<Path>) -> io::Result<Self> {
        let name = format!(
            "postedit-{}.log.gz",
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        Self::create(dir.as_ref().join(name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_failures(&self) -> u64 {
        self.write_failures
    }

    /// Append one record for `event`, attributed to the widget named by
    /// `identity`. Anchors the elapsed clock on the first call.
    pub fn log(&mut self, event: &InputEvent, identity: &str) {
        let anchor = *self.anchor.get_or_insert_with(Instant::now);
        let elapsed_ms = anchor.elapsed().as_millis() as u64;
        let line = record::format_line(elapsed_ms, event, identity);

        let result = match self.sink.as_mut() {
            Some(LogSink::Plain(w)) => w.write_all(line.as_bytes()),
            Some(LogSink::Gzip(w)) => w.write_all(line.as_bytes()),
            None => return,
        };

        if let Err(e) = result {
            self.write_failures += 1;
            eprintln!("postedit: interaction log write failed: {e}");
            eprint!("{line}");
        }
    }

    /// Flush and close the writer, then the underlying stream, in that
    /// order. Errors are reported to stderr, never raised: by the time
    /// this runs the session is over and there is nothing left to retry.
    pub fn finish(mut self) {
        self.close_sink();
    }

    fn close_sink(&mut self) {
        let Some(sink) = self.sink.take() else {
            return;
        };
        let report = |what: &str, e: &dyn std::fmt::Display| {
            eprintln!("postedit: interaction log {what} failed: {e}");
        };
        match sink {
            LogSink::Plain(mut w) => {
                if let Err(e) = w.flush() {
                    report("flush", &e);
                }
                match w.into_inner() {
                    Ok(file) => {
                        if let Err(e) = file.sync_all() {
                            report("close", &e);
                        }
                    }
                    Err(e) => report("close", &e),
                }
            }
            LogSink::Gzip(mut w) => {
                if let Err(e) = w.flush() {
                    report("flush", &e);
                }
                match w.into_inner() {
                    Ok(encoder) => match encoder.finish() {
                        Ok(file) => {
                            if let Err(e) = file.sync_all() {
                                report("close", &e);
                            }
                        }
                        Err(e) => report("close", &e),
                    },
                    Err(e) => report("close", &e),
                }
            }
        }
    }
}

impl Drop for InteractionLogger {
    fn drop(&mut self) {
        self.close_sink();
    }
}
