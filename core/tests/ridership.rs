//! Ridership generation: shape, bounds, ordering, and the rush-hour lift.

use chrono::NaiveDate;
use mobility_core::{
    config::{RidershipParams, MAX_HOURLY_RATE},
    metrics::{peak_hour, peak_overdemand_pct},
    ridership::{generate_ridership, RidershipRecord},
    rng::{RngBank, StreamSlot},
    types::{Line, Station},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn generate(params: &RidershipParams, seed: u64) -> Vec<RidershipRecord> {
    let mut rng = RngBank::new(seed).for_stream(StreamSlot::Ridership);
    generate_ridership(params, &mut rng)
}

fn mean(values: impl Iterator<Item = u32>) -> f64 {
    let (sum, n) = values.fold((0u64, 0u64), |(s, n), v| (s + u64::from(v), n + 1));
    sum as f64 / n as f64
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn one_record_per_date_and_operating_hour() {
    let records = generate(&RidershipParams::default(), 1);
    // 31 days × 18 hours (5..=22)
    assert_eq!(records.len(), 31 * 18);
}

#[test]
fn hours_stay_in_operating_window() {
    let records = generate(&RidershipParams::default(), 2);
    assert!(records.iter().all(|r| (5..=22).contains(&r.hour)));
}

#[test]
fn records_are_ordered_by_date_then_hour() {
    let records = generate(&RidershipParams::default(), 3);
    for pair in records.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            (a.date, a.hour) < (b.date, b.hour),
            "Out of order: {:?} then {:?}",
            (a.date, a.hour),
            (b.date, b.hour)
        );
    }
    assert_eq!(records.first().unwrap().date, date(2023, 1, 1));
    assert_eq!(records.first().unwrap().hour, 5);
    assert_eq!(records.last().unwrap().date, date(2023, 1, 31));
    assert_eq!(records.last().unwrap().hour, 22);
}

#[test]
fn inverted_range_yields_empty_table() {
    let params = RidershipParams::default().with_dates(date(2023, 2, 1), date(2023, 1, 1));
    assert!(generate(&params, 4).is_empty());
}

#[test]
fn every_line_and_station_is_drawn() {
    let records = generate(&RidershipParams::default(), 5);
    for line in Line::ALL {
        assert!(records.iter().any(|r| r.line == line), "{line} never drawn");
    }
    for station in Station::ALL {
        assert!(records.iter().any(|r| r.station == station), "{station} never drawn");
    }
}

#[test]
fn zero_rate_produces_zero_passengers() {
    let params = RidershipParams {
        base_rate: 0.0,
        ..RidershipParams::default()
    };
    let records = generate(&params, 6);
    assert!(records.iter().all(|r| r.passengers == 0));
}

#[test]
fn peak_hours_carry_more_passengers_than_off_peak() {
    // A full year so a single (line, station) pair has a few hundred rows.
    let params = RidershipParams::default().with_dates(date(2023, 1, 1), date(2023, 12, 31));
    let records = generate(&params, 7);
    let pair: Vec<&RidershipRecord> = records
        .iter()
        .filter(|r| r.line == Line::Line2 && r.station == Station::Sur)
        .collect();
    assert!(pair.len() > 100, "Need >100 rows for the pair, got {}", pair.len());

    let peak = mean(pair.iter().filter(|r| params.is_peak(r.hour)).map(|r| r.passengers));
    let off_peak = mean(pair.iter().filter(|r| !params.is_peak(r.hour)).map(|r| r.passengers));

    assert!(
        peak > off_peak * 1.5,
        "Peak mean ({peak:.1}) should clearly exceed off-peak mean ({off_peak:.1})"
    );
}

#[test]
fn peak_multiplier_of_one_removes_the_lift() {
    let params = RidershipParams {
        peak_multiplier: 1.0,
        ..RidershipParams::default().with_dates(date(2023, 1, 1), date(2023, 6, 30))
    };
    let records = generate(&params, 8);
    let at = |hour: u8| mean(records.iter().filter(|r| r.hour == hour).map(|r| r.passengers));

    // Without the multiplier the 8:00 rate is exactly the base rate.
    assert!((at(8) - 100.0).abs() < 5.0, "8:00 mean was {:.1}", at(8));
}

#[test]
fn busiest_accepted_rate_keeps_counts_and_peak_hour_exact() {
    let params = RidershipParams { base_rate: 2.5e7, ..RidershipParams::default() }
        .with_dates(date(2023, 1, 1), date(2023, 1, 1));
    params.validate().unwrap();
    assert!(params.busiest_hourly_rate() <= MAX_HOURLY_RATE);

    let records = generate(&params, 17);
    let max = records.iter().map(|r| r.passengers).max().unwrap();
    assert!(max < u32::MAX / 10, "passenger count {max} is near saturation");

    // 17:00 carries the highest amplified rate: sine lift 1.35 x rush 2.5.
    let peak = peak_hour(&records).unwrap();
    assert_eq!(peak, 17);
    assert!(peak_overdemand_pct(&records, peak).unwrap() > 0.0);
}
