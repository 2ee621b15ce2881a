use std::collections::VecDeque;

use chrono::{DateTime, Local, SecondsFormat};

use crate::ping::Sample;

pub const DEFAULT_HISTORY_HEIGHT: usize = 5;

/// One completed ping attempt. Never changed after it is created.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub timestamp: DateTime<Local>,
    pub rtt: Sample,
    pub url: String,
}

impl HistoryRecord {
    pub fn new(timestamp: DateTime<Local>, rtt: Sample, url: impl Into<String>) -> Self {
        Self {
            timestamp,
            rtt,
            url: url.into(),
        }
    }

    /// Line written to the output file, newline included.
    pub fn to_persisted_line(&self) -> String {
        format!(
            "{}: [{}]  {}\n",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, false),
            self.url,
            self.rtt
        )
    }

    pub fn display_line(&self) -> String {
        format!(
            "• {} [{}]  {}",
            self.timestamp.format("%H:%M:%S"),
            self.url,
            self.rtt
        )
    }
}

/// Fixed-capacity log of the most recent ping attempts.
#[derive(Debug, Clone)]
pub struct HistoryRing {
    records: VecDeque<HistoryRecord>,
    capacity: usize,
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_HEIGHT)
    }
}

impl HistoryRing {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::new(),
            capacity,
        }
    }

    pub fn append(&mut self, record: HistoryRecord) {
        self.records.push_back(record);
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Retained records, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter()
    }

    /// One entry per display slot; unfilled slots come first as `None`.
    pub fn slots(&self) -> impl Iterator<Item = Option<&HistoryRecord>> {
        let empty = self.capacity - self.records.len();
        std::iter::repeat_n(None, empty).chain(self.records.iter().map(Some))
    }

    /// The last `rows` slots, for a panel that cannot show them all.
    pub fn visible_slots(&self, rows: usize) -> impl Iterator<Item = Option<&HistoryRecord>> {
        let rows = rows.min(self.capacity);
        let shown = rows.min(self.records.len());
        let hidden = self.records.len() - shown;
        std::iter::repeat_n(None, rows - shown).chain(self.records.iter().skip(hidden).map(Some))
    }

    /// Exactly `capacity` lines, most recent last. Empty slots render blank.
    pub fn render(&self) -> Vec<String> {
        self.slots()
            .map(|slot| slot.map(HistoryRecord::display_line).unwrap_or_default())
            .collect()
    }
}
