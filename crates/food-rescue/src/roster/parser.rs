use super::normalizer::{normalize_label, split_list};
use crate::allocation::domain::PickupWindow;
use crate::allocation::intake::CandidateSubmission;
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Pickup window cell that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("row {row}: cannot read pickup window '{value}' (expected 'mon 09:00-17:00')")]
pub struct ScheduleError {
    pub row: usize,
    pub value: String,
}

#[derive(Debug)]
pub(crate) enum RowError {
    Csv(csv::Error),
    Schedule(ScheduleError),
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<CandidateSubmission>, RowError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut submissions = Vec::new();

    for (index, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = record.map_err(RowError::Csv)?;
        // Header is line 1.
        let line = index + 2;
        let schedule = row
            .schedule
            .as_deref()
            .map(|cell| parse_schedule(cell, line))
            .transpose()
            .map_err(RowError::Schedule)?
            .unwrap_or_default();

        submissions.push(CandidateSubmission {
            id: row.id,
            name: row.name.split_whitespace().collect::<Vec<_>>().join(" "),
            accepted_categories: split_list(&row.categories)
                .map(normalize_label)
                .collect(),
            capacity: row.capacity,
            latitude: row.latitude,
            longitude: row.longitude,
            reliability: row.reliability,
            recent_donations: row.recent_donations.unwrap_or(0),
            schedule,
        });
    }

    Ok(submissions)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    id: String,
    #[serde(default)]
    name: String,
    categories: String,
    capacity: i64,
    latitude: f64,
    longitude: f64,
    reliability: f64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    recent_donations: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    schedule: Option<String>,
}

fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn parse_schedule(cell: &str, row: usize) -> Result<Vec<PickupWindow>, ScheduleError> {
    split_list(cell)
        .map(|entry| {
            parse_window(entry).ok_or_else(|| ScheduleError {
                row,
                value: entry.to_string(),
            })
        })
        .collect()
}

fn parse_window(entry: &str) -> Option<PickupWindow> {
    let (day, hours) = entry.trim().split_once(char::is_whitespace)?;
    let day = day.trim().parse::<Weekday>().ok()?;
    let (opens, closes) = hours.trim().split_once('-')?;
    let opens = NaiveTime::parse_from_str(opens.trim(), "%H:%M").ok()?;
    let closes = NaiveTime::parse_from_str(closes.trim(), "%H:%M").ok()?;
    if closes <= opens {
        return None;
    }

    Some(PickupWindow { day, opens, closes })
}

#[cfg(test)]
pub(crate) fn parse_window_for_tests(entry: &str) -> Option<PickupWindow> {
    parse_window(entry)
}
