//! The dashboard session: the one object a presentation layer talks to.
//!
//! FLOW (per process):
//!   1. Build once with a config and a master seed.
//!   2. Each selection reads the cached ridership table, filters it,
//!      and recomputes every metric and chart series from scratch.
//!   3. Tables regenerate only when the seed or the generation
//!      parameters change.
//!
//! RULES:
//!   - All randomness flows through the RngBank.
//!   - Each table is keyed by (params, seed) in its own cache.
//!   - Views are plain serializable data; nothing in a view borrows the
//!     session.

use crate::{
    cache::GenerationCache,
    config::{DashboardConfig, DemandParams, RidershipParams},
    demand::{generate_demand, DemandModelCard, DemandRecord, DEMAND_MODEL_CARD},
    error::MobilityResult,
    geo::{AccessibilityNotes, StationGeo, ACCESSIBILITY, MAP_CENTER, STATIONS},
    metrics::{
        daily_totals, filter_records, hourly_totals, line_distribution, line_station_totals,
        BoxSummary, KpiSummary, LineStationTotal, RidershipFilter,
    },
    ridership::{generate_ridership, RidershipRecord},
    rng::{RngBank, StreamSlot},
    types::{Hour, Line},
};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub filter:               RidershipFilter,
    pub record_count:         usize,
    pub kpis:                 KpiSummary,
    pub hourly:               Vec<(Hour, u64)>,
    pub daily:                Vec<(NaiveDate, u64)>,
    pub line_station:         Vec<LineStationTotal>,
    /// Per-line spread at the selected station over the whole table.
    /// Absent when no single station is selected.
    pub station_distribution: Option<Vec<(Line, BoxSummary)>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DemandView {
    pub records: Vec<DemandRecord>,
    pub model:   DemandModelCard,
}

#[derive(Debug, Clone, Serialize)]
pub struct StationMarker {
    #[serde(flatten)]
    pub geo:    StationGeo,
    pub radius: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StationsView {
    pub center:        (f64, f64),
    pub markers:       Vec<StationMarker>,
    pub accessibility: AccessibilityNotes,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    pub ridership_generations: u64,
    pub ridership_hits:        u64,
    pub demand_generations:    u64,
    pub demand_hits:           u64,
}

pub struct Dashboard {
    config:          DashboardConfig,
    rng_bank:        RngBank,
    ridership_cache: GenerationCache<(RidershipParams, u64), Vec<RidershipRecord>>,
    demand_cache:    GenerationCache<(DemandParams, u64), Vec<DemandRecord>>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig, seed: u64) -> MobilityResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng_bank:        RngBank::new(seed),
            ridership_cache: GenerationCache::new(),
            demand_cache:    GenerationCache::new(),
        })
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Reseeding invalidates both tables on next access.
    pub fn set_seed(&mut self, seed: u64) {
        log::debug!("dashboard reseeded {} -> {seed}", self.seed());
        self.rng_bank = RngBank::new(seed);
    }

    pub fn set_ridership_params(&mut self, params: RidershipParams) -> MobilityResult<()> {
        params.validate()?;
        self.config.ridership = params;
        Ok(())
    }

    pub fn set_demand_params(&mut self, params: DemandParams) -> MobilityResult<()> {
        params.validate()?;
        self.config.demand = params;
        Ok(())
    }

    /// The ridership table for the current params and seed.
    pub fn ridership(&mut self) -> &[RidershipRecord] {
        let key = (self.config.ridership.clone(), self.rng_bank.master_seed());
        let bank = &self.rng_bank;
        self.ridership_cache.get_or_generate(&key, |(params, _)| {
            let mut rng = bank.for_stream(StreamSlot::Ridership);
            generate_ridership(params, &mut rng)
        })
    }

    /// The demand series for the current params and seed.
    pub fn demand(&mut self) -> &[DemandRecord] {
        let key = (self.config.demand.clone(), self.rng_bank.master_seed());
        let bank = &self.rng_bank;
        self.demand_cache.get_or_generate(&key, |(params, _)| {
            let mut rng = bank.for_stream(StreamSlot::Demand);
            generate_demand(params, &mut rng)
        })
    }

    /// Apply a selection and compute everything the ridership panels show.
    pub fn select(&mut self, filter: &RidershipFilter) -> MobilityResult<DashboardView> {
        let records = self.ridership();
        let subset = filter_records(records, filter);
        let kpis = KpiSummary::compute(&subset)?;
        let station_distribution = filter.station.map(|s| line_distribution(records, s));

        if !kpis.has_data() {
            log::info!("selection {filter:?} matched no records");
        } else {
            log::debug!(
                "selection {filter:?}: {} records, {} passengers",
                subset.len(),
                kpis.total_passengers
            );
        }

        Ok(DashboardView {
            filter: *filter,
            record_count: subset.len(),
            kpis,
            hourly: hourly_totals(&subset),
            daily: daily_totals(&subset),
            line_station: line_station_totals(&subset),
            station_distribution,
        })
    }

    pub fn demand_view(&mut self) -> DemandView {
        DemandView {
            records: self.demand().to_vec(),
            model:   DEMAND_MODEL_CARD,
        }
    }

    pub fn stations_view(&self) -> StationsView {
        StationsView {
            center: MAP_CENTER,
            markers: STATIONS
                .iter()
                .map(|geo| StationMarker { geo: *geo, radius: geo.marker_radius() })
                .collect(),
            accessibility: ACCESSIBILITY,
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            ridership_generations: self.ridership_cache.generations(),
            ridership_hits:        self.ridership_cache.hits(),
            demand_generations:    self.demand_cache.generations(),
            demand_hits:           self.demand_cache.hits(),
        }
    }
}
