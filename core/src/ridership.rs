//! Synthetic ridership generation.
//!
//! One record per (date, hour) in the operating window. The hourly rate
//! follows a daily sine cycle; rush-hour draws are amplified after sampling.
//! Records are emitted date-ascending, then hour-ascending, and every draw
//! for a record happens in the fixed order: passengers, line, station.

use crate::{
    config::RidershipParams,
    rng::StreamRng,
    types::{Hour, Line, Station},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RidershipRecord {
    pub date:       NaiveDate,
    pub hour:       Hour,
    pub line:       Line,
    pub station:    Station,
    pub passengers: u32,
}

/// Expected boardings for `hour`, clamped to be non-negative.
pub fn hourly_rate(params: &RidershipParams, hour: Hour) -> f64 {
    let phase = TAU * (f64::from(hour) - params.phase_hour) / 24.0;
    let rate = params.base_rate * (1.0 + params.daily_amplitude * phase.sin());
    rate.max(0.0)
}

/// Generate the full ridership table for the configured date range.
/// An inverted range yields an empty table.
pub fn generate_ridership(params: &RidershipParams, rng: &mut StreamRng) -> Vec<RidershipRecord> {
    let dates: Vec<NaiveDate> = params
        .start_date
        .iter_days()
        .take_while(|d| *d <= params.end_date)
        .collect();
    let hours = params.first_hour..=params.last_hour;
    let mut records = Vec::with_capacity(dates.len() * hours.clone().count());

    for date in dates {
        for hour in hours.clone() {
            let mut passengers = rng.poisson(hourly_rate(params, hour)) as f64;
            if params.is_peak(hour) {
                passengers *= params.peak_multiplier;
            }
            let line = rng.pick(&Line::ALL);
            let station = rng.pick(&Station::ALL);

            records.push(RidershipRecord {
                date,
                hour,
                line,
                station,
                // Truncates the fractional part of amplified draws.
                passengers: passengers as u32,
            });
        }
    }

    log::debug!(
        "{}: generated {} ridership records for {}..={}",
        rng.name,
        records.len(),
        params.start_date,
        params.end_date
    );
    records
}
