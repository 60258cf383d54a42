//! CSV sink — append-only, header written exactly once per destination
//!
//! Row order reflects task completion order, not input order; that is a
//! documented property of the pipeline, not a defect.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;

/// Durable CSV destination shared by concurrent worker tasks.
///
/// Each [`append`](CsvSink::append) encodes its whole batch (plus the
/// header, if still owed) in memory and writes it under a mutex in one
/// call, so concurrent completions never interleave partial rows or
/// duplicate the header. Appending to a non-empty destination from a prior
/// run skips the header.
pub struct CsvSink {
    state: Mutex<SinkState>,
    path: PathBuf,
}

struct SinkState {
    file: File,
    header_owed: bool,
    rows_written: usize,
}

impl std::fmt::Debug for CsvSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvSink")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl CsvSink {
    /// Open (creating if needed) the destination in append mode.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let header_owed = file.metadata()?.len() == 0;
        Ok(Self {
            state: Mutex::new(SinkState {
                file,
                header_owed,
                rows_written: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    /// Append a batch of rows, returning how many were written.
    ///
    /// An I/O failure loses only this batch; rows already written and
    /// subsequent calls are unaffected.
    pub fn append<S: Serialize>(&self, rows: &[S]) -> io::Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        let mut state = self.state.lock().expect("sink writer panicked");

        let mut encoder = csv::WriterBuilder::new()
            .has_headers(state.header_owed)
            .from_writer(Vec::new());
        for row in rows {
            encoder.serialize(row).map_err(csv_to_io)?;
        }
        let buf = encoder
            .into_inner()
            .map_err(|e| io::Error::other(e.to_string()))?;

        state.file.write_all(&buf)?;
        state.file.flush()?;
        state.header_owed = false;
        state.rows_written += rows.len();
        Ok(rows.len())
    }

    /// Rows written through this handle (excludes prior runs).
    pub fn rows_written(&self) -> usize {
        self.state.lock().expect("sink writer panicked").rows_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn csv_to_io(e: csv::Error) -> io::Error {
    match e.into_kind() {
        csv::ErrorKind::Io(io_err) => io_err,
        other => io::Error::other(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[derive(Serialize)]
    struct Row {
        name: String,
        count: u32,
        note: Option<String>,
    }

    fn row(name: &str, count: u32) -> Row {
        Row {
            name: name.to_string(),
            count,
            note: None,
        }
    }

    #[test]
    fn header_written_once_on_fresh_destination() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let sink = CsvSink::open(&path).unwrap();

        sink.append(&[row("a", 1)]).unwrap();
        sink.append(&[row("b", 2)]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["name,count,note", "a,1,", "b,2,"]);
    }

    #[test]
    fn no_duplicate_header_on_existing_destination() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let sink = CsvSink::open(&path).unwrap();
        sink.append(&[row("a", 1)]).unwrap();
        drop(sink);

        // A later run appends without re-writing the header
        let sink = CsvSink::open(&path).unwrap();
        sink.append(&[row("b", 2)]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let headers = content.lines().filter(|l| *l == "name,count,note").count();
        assert_eq!(headers, 1);
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let sink = CsvSink::open(&path).unwrap();

        assert_eq!(sink.append::<Row>(&[]).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        // Header still owed for the first real batch
        sink.append(&[row("a", 1)]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("name,count,note\n"));
    }

    #[test]
    fn optional_fields_serialize_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let sink = CsvSink::open(&path).unwrap();

        sink.append(&[Row {
            name: "x".to_string(),
            count: 0,
            note: Some("hi".to_string()),
        }])
        .unwrap();
        sink.append(&[row("y", 9)]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("x,0,hi"));
        assert!(content.contains("y,9,"));
    }

    #[test]
    fn concurrent_appends_never_interleave() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let sink = Arc::new(CsvSink::open(&path).unwrap());

        let mut handles = Vec::new();
        for t in 0..8 {
            let sink = sink.clone();
            handles.push(std::thread::spawn(move || {
                let batch: Vec<Row> = (0..50).map(|i| row(&format!("t{t}"), i)).collect();
                sink.append(&batch).unwrap();
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1 + 8 * 50);
        assert_eq!(lines[0], "name,count,note");
        // Every data line is fully formed
        for line in &lines[1..] {
            assert_eq!(line.split(',').count(), 3, "mangled line: {line}");
        }
        assert_eq!(sink.rows_written(), 8 * 50);
    }

    #[test]
    fn rows_written_counts_only_this_handle() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let sink = CsvSink::open(&path).unwrap();
        sink.append(&[row("a", 1), row("b", 2)]).unwrap();
        assert_eq!(sink.rows_written(), 2);
        drop(sink);

        let sink = CsvSink::open(&path).unwrap();
        assert_eq!(sink.rows_written(), 0);
    }
}
