use std::{fs, path::PathBuf, time::Duration};

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sixdof::{
    build_aircraft,
    components::{AircraftSpec, TrimCondition},
    resources::SimulationConfig,
    simulation::SimulationHandle,
    trim,
    utils::{fps_to_knots, knots_to_fps, rad_to_deg},
};

/// Trims an aircraft for level flight and flies it for a fixed duration.
#[derive(Parser, Debug)]
#[command(name = "sixdof_run")]
#[command(about = "Trim and fly a six-degree-of-freedom aircraft model")]
#[command(version)]
struct Cli {
    /// Aircraft definition (YAML or `key = value` records); Navion if omitted
    #[arg(long)]
    aircraft: Option<PathBuf>,

    /// Simulation configuration YAML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Trim airspeed (kt)
    #[arg(long, default_value_t = 150.0, value_parser = positive_number)]
    airspeed: f64,

    /// Trim altitude (ft)
    #[arg(long, default_value_t = 5_000.0, value_parser = finite_number, allow_negative_numbers = true)]
    altitude: f64,

    /// Simulated time to run (s)
    #[arg(long, default_value_t = 10.0, value_parser = positive_number)]
    duration: f64,

    /// Write the run log as JSON here
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn finite_number(text: &str) -> Result<f64, String> {
    let value: f64 = text
        .parse()
        .map_err(|_| format!("`{}` is not a number", text))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("`{}` must be finite", text))
    }
}

fn positive_number(text: &str) -> Result<f64, String> {
    let value = finite_number(text)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(format!("`{}` must be positive", text))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Cli::parse();

    let spec = match &args.aircraft {
        Some(path) => AircraftSpec::from_file(path)?,
        None => AircraftSpec::navion(),
    };
    let aircraft = build_aircraft(spec)?;

    let condition = TrimCondition::straight_and_level(knots_to_fps(args.airspeed), args.altitude);
    let trimmed = trim(&aircraft, &condition)?;
    if !trimmed.converged {
        error!(
            "No trim for {} at {} kt, residual {:.3e}",
            aircraft.name,
            args.airspeed,
            trimmed.residual_norm()
        );
    }
    info!(
        "Trim: alpha {:.2} deg, elevator {:.2} deg, throttle {:.1}%",
        rad_to_deg(trimmed.trim_state.longitudinal.alpha),
        rad_to_deg(trimmed.controls.elevator()),
        100.0 * trimmed.controls.throttle()
    );

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    config.run_mode = SimulationConfig::analysis(args.duration).run_mode;
    config.pace_real_time = false;

    let mut sim = SimulationHandle::new(aircraft, trimmed.state, trimmed.controls, config)?;
    let timeout = Duration::try_from_secs_f64(args.duration.max(1.0) * 10.0)?;
    sim.start()?;
    let reason = sim.wait_until_stopped(timeout)?;

    if let Some(last) = sim.latest() {
        info!(
            "{:?} after {:.2} s: altitude {:.1} ft, airspeed {:.1} kt, theta {:.2} deg",
            reason,
            last.time,
            last.derived.altitude,
            fps_to_knots(last.derived.true_airspeed),
            rad_to_deg(last.state.theta())
        );
    }

    if let Some(path) = &args.output {
        fs::write(path, sim.log_json()?)?;
        info!("Wrote {} log entries to {}", sim.log_len(), path.display());
    }
    Ok(())
}
