// Session browsing history, newest first
use chrono::{DateTime, Local, NaiveDate, SecondsFormat, TimeZone, Utc};

use crate::address::Target;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryItem {
    /// Epoch milliseconds of the visit, bumped to stay unique.
    pub id: String,
    pub url: String,
    pub timestamp: DateTime<Utc>,
    /// Hostname of the visited page.
    pub title: String,
}

impl HistoryItem {
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Local wall-clock time, `HH:MM`.
    pub fn time_label(&self) -> String {
        self.timestamp.with_timezone(&Local).format("%H:%M").to_string()
    }
}

/// Entries that share a calendar date.
#[derive(Debug, PartialEq)]
pub struct HistoryGroup<'a> {
    pub date: NaiveDate,
    pub items: Vec<&'a HistoryItem>,
}

#[derive(Debug, Default)]
pub struct HistoryLog {
    items: Vec<HistoryItem>,
    last_id: i64,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, target: &Target) -> &HistoryItem {
        self.record_at(target, Utc::now())
    }

    pub fn record_at(&mut self, target: &Target, timestamp: DateTime<Utc>) -> &HistoryItem {
        let id = timestamp.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        self.items.insert(
            0,
            HistoryItem {
                id: id.to_string(),
                url: target.as_str().to_string(),
                timestamp,
                title: target.hostname().to_string(),
            },
        );
        &self.items[0]
    }

    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn grouped(&self) -> Vec<HistoryGroup<'_>> {
        self.grouped_in(&Local)
    }

    /// Partitions entries by calendar date in `tz`, keeping newest-first order.
    pub fn grouped_in<Tz: TimeZone>(&self, tz: &Tz) -> Vec<HistoryGroup<'_>> {
        let mut groups: Vec<HistoryGroup<'_>> = Vec::new();
        for item in &self.items {
            let date = item.timestamp.with_timezone(tz).date_naive();
            match groups.iter_mut().find(|g| g.date == date) {
                Some(group) => group.items.push(item),
                None => groups.push(HistoryGroup {
                    date,
                    items: vec![item],
                }),
            }
        }
        groups
    }
}
