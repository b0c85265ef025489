//! Background loading of psql output.
//!
//! Headers are parsed up front; remaining rows are parsed on a worker thread
//! and delivered in batches over an mpsc channel. While the loader is
//! incomplete the table is shown in its loading state.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, warn};

use crate::parser::{self, Record};

/// Maximum number of rows to batch before sending through the channel
const BATCH_SIZE: usize = 1000;

/// Lines scanned for the header and separator before giving up
const HEADER_SCAN_LINES: usize = 20;

/// Streams rows from a reader on a background thread.
///
/// The thread is cancelled and joined on drop.
pub struct StreamingLoader {
    /// Receives batches of parsed rows from background thread
    receiver: Receiver<Vec<Record>>,
    /// Rows parsed so far (updated by background thread)
    row_count: Arc<AtomicUsize>,
    cancelled: Arc<AtomicBool>,
    /// Set when the background thread finishes
    complete: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<io::Result<()>>>,
    headers: Vec<String>,
}

impl StreamingLoader {
    /// Start loading from stdin.
    pub fn from_stdin() -> io::Result<Option<Self>> {
        Self::from_reader(io::BufReader::new(io::stdin()))
    }

    /// Start loading from any buffered reader.
    ///
    /// Returns:
    /// - `Ok(Some(loader))` if headers were found and parsing started
    /// - `Ok(None)` if the input does not start with a psql header
    /// - `Err(e)` on IO errors while reading the header
    pub fn from_reader<R>(mut reader: R) -> io::Result<Option<Self>>
    where
        R: BufRead + Send + 'static,
    {
        let mut head = Vec::new();
        for _ in 0..HEADER_SCAN_LINES {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            head.push(line);
        }

        let head_refs: Vec<&str> = head.iter().map(|s| s.trim_end_matches(['\r', '\n'])).collect();
        let Some((headers, data_start)) = parser::parse_psql_header(&head_refs) else {
            return Ok(None);
        };
        let column_count = headers.len();

        let (sender, receiver) = mpsc::channel();
        let row_count = Arc::new(AtomicUsize::new(0));
        let cancelled = Arc::new(AtomicBool::new(false));
        let complete = Arc::new(AtomicBool::new(false));

        // Rows already read while looking for the header
        let mut footer_seen = false;
        let mut initial_batch = Vec::new();
        for line in &head_refs[data_start..] {
            if parser::is_footer(line) {
                footer_seen = true;
                break;
            }
            if let Some(row) = parser::parse_psql_line(line, column_count) {
                initial_batch.push(row);
            }
        }
        if !initial_batch.is_empty() {
            row_count.fetch_add(initial_batch.len(), Ordering::Relaxed);
            let _ = sender.send(initial_batch);
        }

        let thread_rows = Arc::clone(&row_count);
        let thread_cancelled = Arc::clone(&cancelled);
        let thread_complete = Arc::clone(&complete);

        let thread_handle = thread::spawn(move || -> io::Result<()> {
            let result = if footer_seen {
                Ok(())
            } else {
                read_rows(reader, column_count, &sender, &thread_rows, &thread_cancelled)
            };

            if let Err(ref e) = result {
                warn!("stopped reading input: {}", e);
            }
            debug!(
                "loader finished after {} rows",
                thread_rows.load(Ordering::Relaxed)
            );
            thread_complete.store(true, Ordering::Release);
            result
        });

        Ok(Some(Self {
            receiver,
            row_count,
            cancelled,
            complete,
            thread_handle: Some(thread_handle),
            headers,
        }))
    }

    /// Drain up to `max_rows` rows without blocking.
    ///
    /// Rows beyond `max_rows` in a partially consumed batch are dropped, so
    /// callers normally pass `usize::MAX`.
    pub fn try_recv_batch(&self, max_rows: usize) -> Vec<Record> {
        let mut rows = Vec::new();
        while rows.len() < max_rows {
            match self.receiver.try_recv() {
                Ok(batch) => {
                    let room = max_rows - rows.len();
                    rows.extend(batch.into_iter().take(room));
                }
                Err(_) => break,
            }
        }
        rows
    }

    /// Total rows parsed so far; non-blocking.
    pub fn total_rows_parsed(&self) -> usize {
        self.row_count.load(Ordering::Relaxed)
    }

    /// Ask the background thread to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// True once all input has been read.
    pub fn is_complete(&self) -> bool {
        self.complete.load(Ordering::Acquire)
    }

    /// Wait for the background thread and return how reading ended.
    ///
    /// Rows parsed before a read error are still delivered; the error is
    /// reported here. Later calls return `Ok(())`.
    pub fn join(&mut self) -> io::Result<()> {
        match self.thread_handle.take() {
            Some(handle) => handle
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("loader thread panicked"))),
            None => Ok(()),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

/// Read data lines until the footer, end of input, cancellation or an error.
///
/// The partial batch is always sent before returning, so rows read before a
/// failing line are not lost.
fn read_rows<R: BufRead>(
    reader: R,
    column_count: usize,
    sender: &Sender<Vec<Record>>,
    row_count: &AtomicUsize,
    cancelled: &AtomicBool,
) -> io::Result<()> {
    let mut batch = Vec::new();
    let mut result = Ok(());
    for line in reader.lines() {
        if cancelled.load(Ordering::Relaxed) {
            break;
        }
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                result = Err(e);
                break;
            }
        };
        if parser::is_footer(&line) {
            break;
        }
        if let Some(row) = parser::parse_psql_line(&line, column_count) {
            batch.push(row);
            if batch.len() >= BATCH_SIZE {
                row_count.fetch_add(batch.len(), Ordering::Relaxed);
                if sender.send(std::mem::take(&mut batch)).is_err() {
                    // Receiver dropped
                    return Ok(());
                }
            }
        }
    }
    if !batch.is_empty() {
        row_count.fetch_add(batch.len(), Ordering::Relaxed);
        let _ = sender.send(batch);
    }
    result
}

impl Drop for StreamingLoader {
    fn drop(&mut self) {
        self.cancel();
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}
