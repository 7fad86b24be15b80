//! Mars Lander entry point
//!
//! Natively this flies a profile with the autopilot and prints a flight
//! report. The browser build is driven through `mars_lander::web` instead.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs::File;
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};
    use std::process::ExitCode;

    use clap::Parser;

    use mars_lander::consts::FRAME_DT;
    use mars_lander::profile::LandingMethod;
    use mars_lander::sim::{Autopilot, Flight, FlightLog, fly};
    use mars_lander::{Difficulty, LanderError, ProfileCatalog, Result, Settings, SpacecraftProfile};

    #[derive(Parser, Debug)]
    #[command(
        author,
        version,
        about = "Fly a Mars entry, descent and landing with the autopilot"
    )]
    struct Cli {
        /// Profile id from the catalog, or a path to a profile JSON file
        #[arg(long)]
        profile: Option<String>,

        /// Directory of extra profile JSON files, searched before the built-ins
        #[arg(long)]
        profiles_dir: Option<PathBuf>,

        /// easy, medium or hard (defaults to the settings file)
        #[arg(long, value_parser = parse_difficulty)]
        difficulty: Option<Difficulty>,

        /// Settings JSON file
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Write the merged settings back to --settings
        #[arg(long, requires = "settings")]
        save_settings: bool,

        /// Fly a custom spacecraft of this total mass (kg)
        #[arg(long)]
        custom_mass: Option<f64>,

        /// Name of the custom spacecraft
        #[arg(long, default_value = "Custom Lander")]
        custom_name: String,

        /// propulsion or airbag
        #[arg(long, value_parser = parse_landing_method, default_value = "propulsion")]
        landing_method: LandingMethod,

        /// Timestep in seconds
        #[arg(long, default_value_t = FRAME_DT)]
        dt: f64,

        /// Give up after this many simulated seconds
        #[arg(long, default_value_t = 1_500.0)]
        max_time: f64,

        /// Write per-tick telemetry as JSON lines
        #[arg(long)]
        trace: Option<PathBuf>,
    }

    fn parse_difficulty(s: &str) -> std::result::Result<Difficulty, String> {
        Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty '{s}'"))
    }

    fn parse_landing_method(s: &str) -> std::result::Result<LandingMethod, String> {
        LandingMethod::from_str(s).ok_or_else(|| format!("unknown landing method '{s}'"))
    }

    fn load_settings(cli: &Cli) -> Result<Settings> {
        let mut settings = match &cli.settings {
            Some(path) => Settings::load_or_default(path),
            None => Settings::default(),
        };
        if let Some(difficulty) = cli.difficulty {
            settings.difficulty = difficulty;
        }
        if let Some(mass) = cli.custom_mass {
            settings.selected_profile = "custom".to_string();
            settings.custom.name = cli.custom_name.clone();
            settings.custom.mass = mass;
            settings.custom.landing_method = cli.landing_method;
        } else if let Some(profile) = &cli.profile {
            settings.selected_profile = profile.clone();
        }
        if cli.save_settings {
            if let Some(path) = &cli.settings {
                settings.save_to(path)?;
            }
        }
        Ok(settings)
    }

    fn select_profile(cli: &Cli, settings: &Settings) -> Result<SpacecraftProfile> {
        let builtin = ProfileCatalog::builtin()?;
        if settings.uses_custom_profile() {
            let custom = &settings.custom;
            return builtin.custom(&custom.name, custom.mass, custom.landing_method);
        }

        let wanted = settings.selected_profile.as_str();
        let path = Path::new(wanted);
        if path.extension().is_some_and(|ext| ext == "json") || path.is_file() {
            let json = std::fs::read_to_string(path).map_err(|e| LanderError::io(path, e))?;
            let mut profile = SpacecraftProfile::from_json(&json)?;
            profile.id = wanted.to_string();
            return Ok(profile);
        }

        if let Some(dir) = &cli.profiles_dir {
            if let Some(profile) = ProfileCatalog::load_dir(dir)?.get(wanted) {
                return Ok(profile.clone());
            }
        }
        builtin.require(wanted).cloned()
    }

    fn write_trace(path: &Path, log: &FlightLog) -> Result<()> {
        let file = File::create(path).map_err(|e| LanderError::io(path, e))?;
        let mut out = BufWriter::new(file);
        for telemetry in &log.trace {
            serde_json::to_writer(&mut out, telemetry).map_err(|e| LanderError::io(path, e.into()))?;
            out.write_all(b"\n").map_err(|e| LanderError::io(path, e))?;
        }
        out.flush().map_err(|e| LanderError::io(path, e))?;
        log::info!("Wrote {} telemetry records to {}", log.trace.len(), path.display());
        Ok(())
    }

    fn print_report(flight: &Flight, settings: &Settings, log: &FlightLog) {
        println!(
            "{} | difficulty {} | {} phases",
            flight.profile().name,
            settings.difficulty.as_str(),
            flight.profile().sequence.len()
        );
        for event in &log.events {
            println!(
                "  T+{:>7.1}s  {:<28} {:>9.0} m {:>8.1} m/s",
                event.time, event.phase_name, event.altitude, event.velocity
            );
        }
        match log.outcome {
            Some(outcome) => {
                println!("{}", outcome.summary());
                println!(
                    "Mission time {:.1}s, fuel remaining {:.1}",
                    flight.state().elapsed_time(),
                    flight.state().fuel_remaining
                );
            }
            None => println!(
                "No touchdown within the time budget ({:.0} m, {:.1} m/s)",
                flight.state().altitude, flight.state().velocity
            ),
        }
    }

    fn run(cli: &Cli) -> Result<bool> {
        let settings = load_settings(cli)?;
        let profile = select_profile(cli, &settings)?;
        let mut flight = Flight::new(profile, settings.flight_options())?;

        let log = fly(&mut flight, &mut Autopilot::new(), cli.dt, cli.max_time);
        if let Some(path) = &cli.trace {
            write_trace(path, &log)?;
        }
        print_report(&flight, &settings, &log);
        Ok(log.outcome.is_some_and(|o| o.success))
    }

    pub fn main() -> ExitCode {
        env_logger::init();
        let cli = Cli::parse();
        log::info!("Mars Lander (native) starting...");

        match run(&cli) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::from(1),
            Err(e) => {
                log::error!("{e}");
                eprintln!("error: {e}");
                ExitCode::from(2)
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is mars_lander::web::start, this is just to satisfy the compiler
}
