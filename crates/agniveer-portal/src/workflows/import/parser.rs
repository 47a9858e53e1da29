use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Deserialize)]
pub(crate) struct LeaveRow {
    pub(crate) id: u64,
    pub(crate) leave_type: String,
    pub(crate) start_date: String,
    pub(crate) end_date: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) reason: Option<String>,
    pub(crate) status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScheduleRow {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) test_type: String,
    pub(crate) scheduled_date: String,
    pub(crate) target_type: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) target_value: Option<String>,
    #[serde(default)]
    pub(crate) max_marks: Option<f64>,
    #[serde(default)]
    pub(crate) passing_marks: Option<f64>,
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) results_count: Option<u32>,
}

/// Deserialize every data row, pairing it with the file line it starts on.
pub(crate) fn read_rows<T, R>(mut reader: R) -> Result<Vec<(u64, T)>, csv::Error>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(raw.as_slice());
    let headers = csv_reader.headers()?.clone();
    let mut lines = LineCursor::new(&raw);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = lines.advance_to(record.position().map_or(0, |pos| pos.byte()));
        rows.push((line, record.deserialize::<T>(Some(&headers))?));
    }
    Ok(rows)
}

/// 1-based line of a record's first byte. The reader reports where it resumed
/// after the previous record, which sits before any skipped blank lines.
struct LineCursor<'a> {
    raw: &'a [u8],
    offset: usize,
    line: u64,
}

impl<'a> LineCursor<'a> {
    fn new(raw: &'a [u8]) -> Self {
        Self {
            raw,
            offset: 0,
            line: 1,
        }
    }

    fn advance_to(&mut self, resumed_at: u64) -> u64 {
        let mut start = usize::try_from(resumed_at)
            .unwrap_or(self.raw.len())
            .min(self.raw.len());
        while matches!(self.raw.get(start), Some(b'\r' | b'\n')) {
            start += 1;
        }
        if start > self.offset {
            let newlines = self.raw[self.offset..start]
                .iter()
                .filter(|byte| **byte == b'\n')
                .count();
            self.line += newlines as u64;
            self.offset = start;
        }
        self.line
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Calendar date of a `YYYY-MM-DD` value or an RFC 3339 timestamp. Timestamps
/// keep the date as written; the offset is not applied.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Wall-clock time of a scheduled test. Bare dates start at midnight.
pub(crate) fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
