//! Demand series: calendar coverage, holiday flagging and the multiplier.

use chrono::{Datelike, NaiveDate};
use mobility_core::{
    config::DemandParams,
    demand::{generate_demand, seasonal_baseline, DemandRecord, DEMAND_MODEL_CARD},
    rng::{RngBank, StreamSlot},
};

fn generate(params: &DemandParams, seed: u64) -> Vec<DemandRecord> {
    let mut rng = RngBank::new(seed).for_stream(StreamSlot::Demand);
    generate_demand(params, &mut rng)
}

#[test]
fn full_year_has_365_contiguous_unique_days() {
    let records = generate(&DemandParams::default(), 42);
    assert_eq!(records.len(), 365);
    assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    assert_eq!(records[364].date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    for pair in records.windows(2) {
        assert_eq!(
            pair[0].date.succ_opt(),
            Some(pair[1].date),
            "gap between {} and {}",
            pair[0].date,
            pair[1].date
        );
    }
}

#[test]
fn holiday_flag_follows_month() {
    let records = generate(&DemandParams::default(), 7);
    for r in &records {
        let expected = matches!(r.date.month(), 1 | 4 | 9 | 12);
        assert_eq!(r.is_holiday, expected, "wrong flag on {}", r.date);
    }
    // Jan 31 + Apr 30 + Sep 30 + Dec 31
    assert_eq!(records.iter().filter(|r| r.is_holiday).count(), 122);
}

#[test]
fn holiday_records_are_exactly_scaled_by_multiplier() {
    const SEED: u64 = 0xC0FFEE;
    let scaled = generate(&DemandParams::default(), SEED);
    let unscaled = generate(
        &DemandParams { holiday_multiplier: 1.0, ..DemandParams::default() },
        SEED,
    );

    for (a, b) in scaled.iter().zip(unscaled.iter()) {
        assert_eq!(a.date, b.date);
        if a.is_holiday {
            assert_eq!(a.demand, b.demand * 1.3, "holiday {} not scaled by 1.3", a.date);
            assert!((a.demand / 1.3 - b.demand).abs() < 1e-9);
        } else {
            assert_eq!(a.demand, b.demand, "non-holiday {} should be untouched", a.date);
        }
    }
}

#[test]
fn demand_is_never_negative() {
    let params = DemandParams { noise_std: 20_000.0, ..DemandParams::default() };
    let records = generate(&params, 3);
    assert!(records.iter().all(|r| r.demand >= 0.0));
}

#[test]
fn zero_noise_follows_the_seasonal_curve() {
    let params = DemandParams {
        noise_std: 0.0,
        holiday_months: vec![],
        ..DemandParams::default()
    };
    let records = generate(&params, 5);
    for (day, r) in records.iter().enumerate() {
        assert!((r.demand - seasonal_baseline(&params, day)).abs() < 1e-9);
    }
    // Quarter-period is the seasonal high.
    assert!((seasonal_baseline(&params, 0) - 5000.0).abs() < 1e-9);
    assert!(records[91].demand > 5990.0);
}

#[test]
fn inverted_range_yields_empty_series() {
    let params = DemandParams {
        start_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(),
        ..DemandParams::default()
    };
    assert!(generate(&params, 1).is_empty());
}

#[test]
fn model_card_lists_both_models() {
    assert_eq!(DEMAND_MODEL_CARD.models.to_vec(), vec!["ARIMA", "Random Forest"]);
    assert_eq!(DEMAND_MODEL_CARD.rmse_per_day, 850);
}
