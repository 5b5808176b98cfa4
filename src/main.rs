use std::process::ExitCode;

use clap::Parser;
use flood_dashboard::cli::Args;
use flood_dashboard::metrics::MetricsSummary;
use flood_dashboard::series;
use flood_dashboard::Session;

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    // Schema problems stop here: nothing below runs on a bad file.
    let mut session = Session::load(&args.file)?;

    // Default date-picker range: the full span of the log.
    if let Some((first, last)) = series::time_span(session.full()) {
        log::info!("Readings span {} to {}", first.date(), last.date());
    }

    let range = args.range();
    if range.is_active() {
        session.apply_range(range);
        log::info!(
            "Showing {} of {} readings",
            session.current().len(),
            session.full().len()
        );
    } else if args.start.is_some() || args.end.is_some() {
        log::warn!("Both --start and --end are needed to filter; showing all readings");
    }

    match session.metrics() {
        Ok(summary) if args.json => print_json(&summary)?,
        Ok(summary) => print_kpis(&summary),
        // Metrics failures are scoped to the KPI block.
        Err(e) => log::warn!("Metrics unavailable: {e}"),
    }

    if args.series {
        println!("timestamp,water_level");
        for point in session.water_level_series() {
            println!("{},{}", point.timestamp, point.value);
        }
        println!();
        println!("humidity,temperature");
        for point in session.humidity_temperature_points() {
            println!("{},{}", point.humidity, point.temperature);
        }
    }

    if let Some(dir) = &args.export {
        let path = session.export()?.write_to(dir)?;
        println!("Saved {}", path.display());
    }

    Ok(())
}

fn print_kpis(summary: &MetricsSummary) {
    for kpi in summary.kpis() {
        println!("{:<12} {:>10} ({:+})", kpi.label, kpi.value, kpi.delta);
    }
}

fn print_json(summary: &MetricsSummary) -> anyhow::Result<()> {
    let doc = serde_json::json!({
        "summary": summary,
        "kpis": summary.kpis(),
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
