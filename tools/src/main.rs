//! mobility-runner: headless driver for the mobility dashboard core.
//!
//! Usage:
//!   mobility-runner --seed 12345 --line line_2 --station centro
//!   mobility-runner --seed 12345 --from 2023-01-05 --to 2023-01-12
//!   mobility-runner --config data/dashboard_config.json --ipc-mode

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use mobility_core::{
    config::DashboardConfig,
    dashboard::{Dashboard, DashboardView},
    metrics::{DateRange, RidershipFilter},
    types::{Line, Station},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Select {
        #[serde(default)]
        line: Option<Line>,
        #[serde(default)]
        station: Option<Station>,
        #[serde(default)]
        dates: Option<DateRange>,
    },
    Demand,
    Stations,
    Reseed {
        seed: u64,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", wall_clock_seed());
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");

    let config = match arg_value(&args, "--config") {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    let mut dashboard = Dashboard::new(config, seed)?;

    if ipc_mode {
        return run_ipc_loop(&mut dashboard);
    }

    let filter = parse_filter(&args)?;
    println!("Mobility dashboard: mobility-runner");
    println!("  seed:      {seed}");
    println!("  line:      {}", describe(filter.line));
    println!("  station:   {}", describe(filter.station));
    if let Some(range) = filter.dates {
        println!("  dates:     {}..={}", range.start, range.end);
    }
    println!();

    let view = dashboard.select(&filter)?;
    print_summary(&view);
    print_demand_summary(&mut dashboard);
    Ok(())
}

fn run_ipc_loop(dashboard: &mut Dashboard) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Select { line, station, dates } => {
                let filter = RidershipFilter { line, station, dates };
                let view = dashboard.select(&filter)?;
                writeln!(stdout, "{}", serde_json::to_string(&view)?)?;
            }
            IpcCommand::Demand => {
                let view = dashboard.demand_view();
                writeln!(stdout, "{}", serde_json::to_string(&view)?)?;
            }
            IpcCommand::Stations => {
                let view = dashboard.stations_view();
                writeln!(stdout, "{}", serde_json::to_string(&view)?)?;
            }
            IpcCommand::Reseed { seed } => {
                dashboard.set_seed(seed);
                writeln!(stdout, "{}", serde_json::json!({ "seed": seed }))?;
            }
        }
        stdout.flush()?;
    }
    log::debug!("ipc loop finished: {:?}", dashboard.cache_stats());
    Ok(())
}

fn print_summary(view: &DashboardView) {
    let kpis = &view.kpis;
    println!("=== RIDERSHIP SUMMARY ===");
    println!("  records:        {}", view.record_count);
    println!("  total:          {}", kpis.total_passengers);
    println!("  daily average:  {}", fmt_or_no_data(kpis.daily_average.map(|v| format!("{v:.0}"))));
    println!(
        "  peak hour:      {}",
        fmt_or_no_data(kpis.peak_hour.map(|h| format!("{h}:00 - {}:00", h + 1)))
    );
    println!(
        "  overdemand:     {}",
        fmt_or_no_data(kpis.peak_overdemand_pct.map(|p| format!("{p:.0}%")))
    );
    println!("  top line:       {}", fmt_or_no_data(kpis.top_line.map(|l| l.to_string())));
    println!("  top station:    {}", fmt_or_no_data(kpis.top_station.map(|s| s.to_string())));

    if !view.hourly.is_empty() {
        println!();
        println!("=== HOURLY FLOW ===");
        for (hour, total) in &view.hourly {
            println!("  {hour:>2}:00  {total}");
        }
    }
}

fn print_demand_summary(dashboard: &mut Dashboard) {
    let demand = dashboard.demand();
    if demand.is_empty() {
        println!();
        println!("=== DEMAND ===");
        println!("  (empty date range)");
        return;
    }
    let mean = demand.iter().map(|r| r.demand).sum::<f64>() / demand.len() as f64;
    let holidays = demand.iter().filter(|r| r.is_holiday).count();
    println!();
    println!("=== DEMAND ===");
    println!("  days:           {}", demand.len());
    println!("  holiday days:   {holidays}");
    println!("  mean demand:    {mean:.0}");
}

fn parse_filter(args: &[String]) -> Result<RidershipFilter> {
    let line = match arg_value(args, "--line") {
        Some(v) if !v.eq_ignore_ascii_case("all") => Some(v.parse::<Line>().map_err(|e| anyhow!(e))?),
        _ => None,
    };
    let station = match arg_value(args, "--station") {
        Some(v) if !v.eq_ignore_ascii_case("all") => {
            Some(v.parse::<Station>().map_err(|e| anyhow!(e))?)
        }
        _ => None,
    };
    let from = arg_value(args, "--from").map(parse_date).transpose()?;
    let to = arg_value(args, "--to").map(parse_date).transpose()?;
    let dates = match (from, to) {
        (None, None) => None,
        (start, end) => Some(DateRange {
            start: start.unwrap_or(NaiveDate::MIN),
            end:   end.unwrap_or(NaiveDate::MAX),
        }),
    };
    Ok(RidershipFilter { line, station, dates })
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| anyhow!("bad date '{s}': {e}"))
}

fn describe<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "all".to_string(), |v| v.to_string())
}

fn fmt_or_no_data(value: Option<String>) -> String {
    value.unwrap_or_else(|| "no data for this selection".to_string())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn wall_clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
