//! Aggregation over a ridership table.
//!
//! Every function is pure: filtering builds a new table and nothing is
//! mutated. Metrics that need at least one record return
//! `MobilityError::NoData` instead of NaN or a placeholder.
//!
//! Ties on grouped maxima (peak hour, top line, top station) go to the key
//! seen first while scanning the input in order.

use crate::{
    error::{MobilityError, MobilityResult},
    ridership::RidershipRecord,
    types::{Hour, Line, Station},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Selection ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end:   NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A dashboard selection. `None` on a dimension means "all".
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RidershipFilter {
    pub line:    Option<Line>,
    pub station: Option<Station>,
    pub dates:   Option<DateRange>,
}

impl RidershipFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn line_station(line: Line, station: Station) -> Self {
        Self { line: Some(line), station: Some(station), dates: None }
    }

    pub fn matches(&self, record: &RidershipRecord) -> bool {
        self.line.map_or(true, |l| l == record.line)
            && self.station.map_or(true, |s| s == record.station)
            && self.dates.map_or(true, |r| r.contains(record.date))
    }
}

pub fn filter_records(records: &[RidershipRecord], filter: &RidershipFilter) -> Vec<RidershipRecord> {
    records.iter().filter(|r| filter.matches(r)).copied().collect()
}

// ── Scalar metrics ───────────────────────────────────────────────────────────

pub fn total_passengers(records: &[RidershipRecord]) -> u64 {
    records.iter().map(|r| u64::from(r.passengers)).sum()
}

/// Mean of per-date passenger sums.
pub fn daily_average(records: &[RidershipRecord]) -> MobilityResult<f64> {
    let per_day = daily_totals(records);
    if per_day.is_empty() {
        return Err(MobilityError::NoData { metric: "daily_average" });
    }
    let sum: u64 = per_day.iter().map(|(_, total)| total).sum();
    Ok(sum as f64 / per_day.len() as f64)
}

/// Hour with the greatest summed passengers.
pub fn peak_hour(records: &[RidershipRecord]) -> MobilityResult<Hour> {
    first_max(group_sums(records, |r| r.hour)).ok_or(MobilityError::NoData { metric: "peak_hour" })
}

/// Percentage by which the mean at `peak` exceeds the mean of the subset.
pub fn peak_overdemand_pct(records: &[RidershipRecord], peak: Hour) -> MobilityResult<f64> {
    const METRIC: &str = "peak_overdemand_pct";

    let overall = mean_passengers(records.iter()).ok_or(MobilityError::NoData { metric: METRIC })?;
    if overall == 0.0 {
        return Err(MobilityError::NoData { metric: METRIC });
    }
    let at_peak = mean_passengers(records.iter().filter(|r| r.hour == peak))
        .ok_or(MobilityError::NoData { metric: METRIC })?;
    Ok((at_peak / overall - 1.0) * 100.0)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Line,
    Station,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DimensionValue {
    Line(Line),
    Station(Station),
}

impl DimensionValue {
    pub fn line(self) -> Option<Line> {
        match self {
            Self::Line(line) => Some(line),
            Self::Station(_) => None,
        }
    }

    pub fn station(self) -> Option<Station> {
        match self {
            Self::Station(station) => Some(station),
            Self::Line(_) => None,
        }
    }
}

/// Dimension value with the greatest summed passengers.
pub fn top_by(records: &[RidershipRecord], dimension: Dimension) -> MobilityResult<DimensionValue> {
    let top = match dimension {
        Dimension::Line => first_max(group_sums(records, |r| r.line)).map(DimensionValue::Line),
        Dimension::Station => {
            first_max(group_sums(records, |r| r.station)).map(DimensionValue::Station)
        }
    };
    top.ok_or(MobilityError::NoData { metric: "top_by" })
}

// ── Chart series ─────────────────────────────────────────────────────────────

/// (hour, passengers) ascending by hour.
pub fn hourly_totals(records: &[RidershipRecord]) -> Vec<(Hour, u64)> {
    sorted_sums(records, |r| r.hour)
}

/// (date, passengers) ascending by date.
pub fn daily_totals(records: &[RidershipRecord]) -> Vec<(NaiveDate, u64)> {
    sorted_sums(records, |r| r.date)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineStationTotal {
    pub line:       Line,
    pub station:    Station,
    pub passengers: u64,
}

/// Passenger totals per (line, station) pair present in the subset.
pub fn line_station_totals(records: &[RidershipRecord]) -> Vec<LineStationTotal> {
    sorted_sums(records, |r| (r.line, r.station))
        .into_iter()
        .map(|((line, station), passengers)| LineStationTotal { line, station, passengers })
        .collect()
}

/// Five-number summary of a passenger sample.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoxSummary {
    pub count:  usize,
    pub min:    f64,
    pub q1:     f64,
    pub median: f64,
    pub q3:     f64,
    pub max:    f64,
}

impl BoxSummary {
    /// Quartiles use linear interpolation between closest ranks.
    pub fn from_values(values: &[u32]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().map(|v| f64::from(*v)).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let (min, max) = (*sorted.first()?, *sorted.last()?);
        Some(Self {
            count: sorted.len(),
            min,
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max,
        })
    }
}

/// Per-line distribution of hourly passengers at one station, across the
/// whole table. Lines with no records at that station are omitted.
pub fn line_distribution(records: &[RidershipRecord], station: Station) -> Vec<(Line, BoxSummary)> {
    Line::ALL
        .into_iter()
        .filter_map(|line| {
            let values: Vec<u32> = records
                .iter()
                .filter(|r| r.station == station && r.line == line)
                .map(|r| r.passengers)
                .collect();
            BoxSummary::from_values(&values).map(|summary| (line, summary))
        })
        .collect()
}

// ── KPI bundle ───────────────────────────────────────────────────────────────

/// The headline numbers for one selection. A `None` marks a metric with no
/// data for the selection; the total is always defined.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct KpiSummary {
    pub total_passengers:    u64,
    pub daily_average:       Option<f64>,
    pub peak_hour:           Option<Hour>,
    pub peak_overdemand_pct: Option<f64>,
    pub top_line:            Option<Line>,
    pub top_station:         Option<Station>,
}

impl KpiSummary {
    pub fn compute(records: &[RidershipRecord]) -> MobilityResult<Self> {
        let peak_hour = or_no_data(peak_hour(records))?;
        let peak_overdemand_pct = match peak_hour {
            Some(hour) => or_no_data(peak_overdemand_pct(records, hour))?,
            None => None,
        };
        Ok(Self {
            total_passengers: total_passengers(records),
            daily_average: or_no_data(daily_average(records))?,
            peak_hour,
            peak_overdemand_pct,
            top_line: or_no_data(top_by(records, Dimension::Line))?.and_then(DimensionValue::line),
            top_station: or_no_data(top_by(records, Dimension::Station))?
                .and_then(DimensionValue::station),
        })
    }

    pub fn has_data(&self) -> bool {
        self.daily_average.is_some()
    }
}

/// Turn a NoData failure into `None`, passing every other error through.
pub fn or_no_data<T>(result: MobilityResult<T>) -> MobilityResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_no_data() => Ok(None),
        Err(e) => Err(e),
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Sum passengers per key, keys kept in first-encountered order.
/// Key sets here are tiny (hours, lines, stations), so a linear scan wins.
fn group_sums<K, F>(records: &[RidershipRecord], key: F) -> Vec<(K, u64)>
where
    K: PartialEq,
    F: Fn(&RidershipRecord) -> K,
{
    let mut groups: Vec<(K, u64)> = Vec::new();
    for record in records {
        let k = key(record);
        let passengers = u64::from(record.passengers);
        match groups.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, total)) => *total += passengers,
            None => groups.push((k, passengers)),
        }
    }
    groups
}

fn sorted_sums<K, F>(records: &[RidershipRecord], key: F) -> Vec<(K, u64)>
where
    K: Ord,
    F: Fn(&RidershipRecord) -> K,
{
    let mut groups: BTreeMap<K, u64> = BTreeMap::new();
    for record in records {
        *groups.entry(key(record)).or_insert(0) += u64::from(record.passengers);
    }
    groups.into_iter().collect()
}

/// Key with the strictly greatest total; earlier keys win ties.
fn first_max<K>(groups: Vec<(K, u64)>) -> Option<K> {
    let mut best: Option<(K, u64)> = None;
    for (k, total) in groups {
        if best.as_ref().map_or(true, |(_, best_total)| total > *best_total) {
            best = Some((k, total));
        }
    }
    best.map(|(k, _)| k)
}

fn mean_passengers<'a>(records: impl Iterator<Item = &'a RidershipRecord>) -> Option<f64> {
    let (sum, count) = records.fold((0u64, 0usize), |(sum, count), r| {
        (sum + u64::from(r.passengers), count + 1)
    });
    (count > 0).then(|| sum as f64 / count as f64)
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
