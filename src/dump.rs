//! Thread dump report writing.
//!
//! Serializes a full snapshot — all threads, not only blocked ones — to a
//! timestamped plain-text file under the configured root directory. The
//! formatting is split from the file I/O so the report body can be tested
//! against an in-memory buffer.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use log::warn;

use crate::domain::Timestamp;
use crate::snapshot::ThreadSnapshot;

/// Writes dump files under a fixed root directory.
#[derive(Debug)]
pub struct DumpWriter {
    root: PathBuf,
}

impl DumpWriter {
    /// Create a writer rooted at `root`, creating the directory if absent.
    ///
    /// Creation failure is logged, not fatal; each later write attempt
    /// will fail and be logged individually.
    pub fn new(root: PathBuf) -> Self {
        if let Err(err) = fs::create_dir_all(&root) {
            warn!("failed to create dump directory {}: {err}", root.display());
        }
        Self { root }
    }

    /// Path of the dump file for a cycle starting at `cycle_start`.
    #[must_use]
    pub fn dump_path(&self, cycle_start: Timestamp) -> PathBuf {
        self.root.join(format!("threads_dump_{cycle_start}.txt"))
    }

    /// Write a full report for this cycle's snapshot, create-or-truncate.
    ///
    /// `tracked` is the number of threads currently in the blocked set,
    /// reported in the header.
    ///
    /// # Errors
    /// Any I/O failure; the caller leaves the throttle timestamp untouched
    /// so the write is retried on the next eligible cycle.
    pub fn write_dump(
        &self,
        threads: &[ThreadSnapshot],
        tracked: usize,
        cycle_start: Timestamp,
    ) -> io::Result<PathBuf> {
        let path = self.dump_path(cycle_start);
        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        write_report(&mut writer, threads, tracked)?;
        writer.flush()?;
        Ok(path)
    }
}

/// Format the report body: a header with thread counts, then one block
/// per thread with its identity line and indented stack frames.
///
/// # Errors
/// Propagates writer failures.
pub fn write_report<W: Write>(
    writer: &mut W,
    threads: &[ThreadSnapshot],
    tracked: usize,
) -> io::Result<()> {
    writeln!(writer, "#Threads: {}, #Blocked: {}", threads.len(), tracked)?;
    writeln!(writer)?;

    for thread in threads {
        writeln!(
            writer,
            "Thread:{} '{}' {}prio={} {}",
            thread.tid,
            thread.name,
            if thread.kernel { "kernel " } else { "" },
            thread.priority,
            thread.state,
        )?;
        for frame in &thread.frames {
            writeln!(writer, "        {frame}")?;
        }
        writeln!(writer)?;
    }

    Ok(())
}
