//! Event sources for the replay loop
//!
//! The engine pulls rows one at a time through [`EventFeed`]. Any
//! `FnMut() -> Result<Option<MarketEvent>>` closure is a feed, which keeps
//! ad-hoc generators as cheap as an in-memory vector.

use super::types::MarketEvent;
use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Ordered source of market rows
///
/// `Ok(None)` means the session is exhausted. Errors are upstream failures
/// (I/O, malformed rows) and abort the run.
pub trait EventFeed {
    fn next_event(&mut self) -> Result<Option<MarketEvent>>;
}

impl<F> EventFeed for F
where
    F: FnMut() -> Result<Option<MarketEvent>>,
{
    #[inline]
    fn next_event(&mut self) -> Result<Option<MarketEvent>> {
        self()
    }
}

/// In-memory feed over pre-loaded rows
#[derive(Debug, Clone, Default)]
pub struct VecFeed {
    events: VecDeque<MarketEvent>,
}

impl VecFeed {
    pub fn new(events: Vec<MarketEvent>) -> Self {
        Self {
            events: events.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl EventFeed for VecFeed {
    #[inline]
    fn next_event(&mut self) -> Result<Option<MarketEvent>> {
        Ok(self.events.pop_front())
    }
}

impl From<Vec<MarketEvent>> for VecFeed {
    fn from(events: Vec<MarketEvent>) -> Self {
        Self::new(events)
    }
}

/// Streaming feed over JSON-lines rows
///
/// Blank lines are skipped. Each non-blank line must deserialize into a
/// [`MarketEvent`].
pub struct JsonlFeed<R: BufRead> {
    reader: R,
    line: String,
    line_no: usize,
}

impl<R: BufRead> JsonlFeed<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_no: 0,
        }
    }
}

impl JsonlFeed<BufReader<File>> {
    /// Open a JSON-lines file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open event file {}", path.display()))?;
        info!("Streaming events from {}", path.display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> EventFeed for JsonlFeed<R> {
    fn next_event(&mut self) -> Result<Option<MarketEvent>> {
        loop {
            self.line.clear();
            let read = self
                .reader
                .read_line(&mut self.line)
                .with_context(|| format!("Failed to read event line {}", self.line_no + 1))?;
            if read == 0 {
                debug!("Event stream exhausted after {} lines", self.line_no);
                return Ok(None);
            }
            self.line_no += 1;

            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let event = serde_json::from_str(trimmed)
                .with_context(|| format!("Malformed event on line {}", self.line_no))?;
            return Ok(Some(event));
        }
    }
}

/// Load every row of a JSON-lines file into memory
///
/// The replay driver needs the whole session up front to precompute the
/// volatility table.
pub fn read_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<MarketEvent>> {
    let mut feed = JsonlFeed::open(path)?;
    let mut events = Vec::new();
    while let Some(event) = feed.next_event()? {
        events.push(event);
    }
    info!("Loaded {} events", events.len());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_vec_feed_drains_in_order() {
        let mut feed = VecFeed::new(vec![
            MarketEvent::trade(1, 10, 1, 0, 0),
            MarketEvent::trade(2, 10, 1, 0, 0),
        ]);
        assert_eq!(feed.remaining(), 2);
        assert_eq!(feed.next_event().unwrap().unwrap().ts_event(), 1);
        assert_eq!(feed.next_event().unwrap().unwrap().ts_event(), 2);
        assert!(feed.next_event().unwrap().is_none());
    }

    #[test]
    fn test_closure_is_a_feed() {
        let mut n = 0u64;
        let mut feed = move || -> Result<Option<MarketEvent>> {
            n += 1;
            Ok((n <= 3).then(|| MarketEvent::trade(n, 10, 1, 0, 0)))
        };
        let mut count = 0;
        while feed.next_event().unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn test_jsonl_skips_blank_lines() {
        let input = "\n{\"action\":\"trade\",\"ts_event\":5,\"price\":1,\"size\":2,\"depth\":0}\n\n";
        let mut feed = JsonlFeed::new(Cursor::new(input));
        let ev = feed.next_event().unwrap().unwrap();
        assert_eq!(ev.ts_event(), 5);
        assert!(feed.next_event().unwrap().is_none());
    }

    #[test]
    fn test_jsonl_reports_line_number() {
        let input = "{\"action\":\"trade\",\"ts_event\":5,\"price\":1,\"size\":2,\"depth\":0}\nnot json\n";
        let mut feed = JsonlFeed::new(Cursor::new(input));
        assert!(feed.next_event().is_ok());
        let err = feed.next_event().unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn test_read_jsonl_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\"action\":\"trade\",\"ts_event\":1,\"price\":1,\"size\":2,\"depth\":0}}").unwrap();
        writeln!(file, "{{\"action\":\"trade\",\"ts_event\":2,\"price\":1,\"size\":2,\"depth\":1}}").unwrap();

        let events = read_jsonl(file.path()).unwrap();
        assert_eq!(events.len(), 2);
    }
}
