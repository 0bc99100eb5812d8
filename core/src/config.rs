//! Generation parameters for the ridership and demand tables.
//!
//! Every field defaults to the dashboard's stock values, so a config file
//! only needs to name what it overrides.

use crate::{
    error::{MobilityError, MobilityResult},
    types::Hour,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ceiling on the busiest expected hourly rate. Keeps amplified Poisson
/// draws far below `u32::MAX`.
pub const MAX_HOURLY_RATE: f64 = 1e8;

/// Inclusive hour window, e.g. 7..=9 for the morning rush.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HourWindow {
    pub start: Hour,
    pub end:   Hour,
}

impl HourWindow {
    pub const fn new(start: Hour, end: Hour) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: Hour) -> bool {
        self.start <= hour && hour <= self.end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RidershipParams {
    pub start_date:      NaiveDate,
    pub end_date:        NaiveDate,
    pub first_hour:      Hour,
    pub last_hour:       Hour,
    /// Mean hourly boardings before the daily cycle is applied.
    pub base_rate:       f64,
    /// Relative swing of the daily sine cycle.
    pub daily_amplitude: f64,
    pub phase_hour:      f64,
    pub peak_windows:    Vec<HourWindow>,
    pub peak_multiplier: f64,
}

impl Default for RidershipParams {
    fn default() -> Self {
        Self {
            start_date:      ymd(2023, 1, 1),
            end_date:        ymd(2023, 1, 31),
            first_hour:      5,
            last_hour:       22,
            base_rate:       100.0,
            daily_amplitude: 0.5,
            phase_hour:      8.0,
            peak_windows:    vec![HourWindow::new(7, 9), HourWindow::new(17, 19)],
            peak_multiplier: 2.5,
        }
    }
}

impl RidershipParams {
    pub fn with_dates(mut self, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    pub fn is_peak(&self, hour: Hour) -> bool {
        self.peak_windows.iter().any(|w| w.contains(hour))
    }

    pub fn validate(&self) -> MobilityResult<()> {
        if self.last_hour > 23 {
            return Err(invalid(format!("last_hour {} exceeds 23", self.last_hour)));
        }
        if self.first_hour > self.last_hour {
            return Err(invalid(format!(
                "first_hour {} is after last_hour {}",
                self.first_hour, self.last_hour
            )));
        }
        if !(self.base_rate >= 0.0) {
            return Err(invalid(format!("base_rate must be >= 0, got {}", self.base_rate)));
        }
        if !(self.peak_multiplier >= 0.0) {
            return Err(invalid(format!(
                "peak_multiplier must be >= 0, got {}",
                self.peak_multiplier
            )));
        }
        if let Some(w) = self.peak_windows.iter().find(|w| w.start > w.end || w.end > 23) {
            return Err(invalid(format!("bad peak window {}..={}", w.start, w.end)));
        }
        let busiest = self.busiest_hourly_rate();
        if !(busiest <= MAX_HOURLY_RATE) {
            return Err(invalid(format!(
                "busiest hourly rate {busiest} exceeds {MAX_HOURLY_RATE}; passenger counts would overflow"
            )));
        }
        Ok(())
    }

    /// Upper bound on the amplified hourly rate over any hour of the day.
    pub fn busiest_hourly_rate(&self) -> f64 {
        self.base_rate * (1.0 + self.daily_amplitude.abs()) * self.peak_multiplier.max(1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemandParams {
    pub start_date:         NaiveDate,
    pub end_date:           NaiveDate,
    pub baseline:           f64,
    pub seasonal_amplitude: f64,
    /// Length of the seasonal cycle in days.
    pub period_days:        f64,
    pub noise_std:          f64,
    pub holiday_months:     Vec<u32>,
    pub holiday_multiplier: f64,
}

impl Default for DemandParams {
    fn default() -> Self {
        Self {
            start_date:         ymd(2023, 1, 1),
            end_date:           ymd(2023, 12, 31),
            baseline:           5000.0,
            seasonal_amplitude: 1000.0,
            period_days:        365.0,
            noise_std:          500.0,
            holiday_months:     vec![1, 4, 9, 12],
            holiday_multiplier: 1.3,
        }
    }
}

impl DemandParams {
    pub fn is_holiday_month(&self, month: u32) -> bool {
        self.holiday_months.contains(&month)
    }

    pub fn validate(&self) -> MobilityResult<()> {
        if !(self.period_days > 0.0) {
            return Err(invalid(format!("period_days must be > 0, got {}", self.period_days)));
        }
        if !(self.noise_std >= 0.0) {
            return Err(invalid(format!("noise_std must be >= 0, got {}", self.noise_std)));
        }
        if !(self.holiday_multiplier >= 0.0) {
            return Err(invalid(format!(
                "holiday_multiplier must be >= 0, got {}",
                self.holiday_multiplier
            )));
        }
        if let Some(m) = self.holiday_months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(invalid(format!("holiday month {m} is not in 1..=12")));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub ridership: RidershipParams,
    pub demand:    DemandParams,
}

impl DashboardConfig {
    /// Load from a JSON file. Missing fields fall back to the defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DashboardConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        log::debug!("Loaded dashboard config from {path}");
        Ok(config)
    }

    pub fn validate(&self) -> MobilityResult<()> {
        self.ridership.validate()?;
        self.demand.validate()
    }
}

fn invalid(reason: String) -> MobilityError {
    MobilityError::InvalidConfig { reason }
}

// Only called with literal calendar dates.
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
