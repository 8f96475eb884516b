use springsim::{ScenarioConfig, Scenario};
use springsim::{CsvRecorder, NullRenderer};
use springsim::{bench_convergence, bench_integrators};

use anyhow::{Context, Result};
use clap::Parser;
use ftlog::appender::{FileAppender, Period};
use ftlog::{LevelFilter, LoggerGuard};

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Mass-spring pendulum and cloth simulator", long_about = None)]
struct Args {
    /// Scenario file, looked up in the crate's `scenarios` directory unless it is a path that exists.
    #[arg(short, long, default_value = "pendulum.yaml")]
    file_name: String,

    /// Write particle positions as CSV to this file.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// The name of the log-file to use.
    #[arg(short, long, default_value = "springsim.log")]
    log_name: String,

    /// Run the integrator benchmarks instead of a scenario.
    #[arg(long)]
    bench: bool,

    /// Open the 3D viewer (needs the `vis` feature).
    #[arg(long)]
    view: bool,
}

/// Configures a file logger under `logs/`, with warnings and errors from
/// the appender itself split into a separate file.
fn configure_logger(file_name: &str) -> Result<(LoggerGuard, PathBuf)> {
    let logs_dir = PathBuf::from(".").canonicalize()?.join("logs");
    if !logs_dir.exists() {
        std::fs::create_dir(&logs_dir)?;
    }
    let log_path = logs_dir.join(file_name);
    let err_path = log_path.with_extension("err.log");

    let writer = FileAppender::builder().path(&log_path).rotate(Period::Day).build();

    let guard = ftlog::Builder::new()
        // global max log level
        .max_log_level(LevelFilter::Info)
        // define root appender, pass None would write to stderr
        .root(writer)
        .filter("ftlog::appender", "ftlog-appender", LevelFilter::Warn)
        .appender("ftlog-appender", FileAppender::new(err_path))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to start logger: {e}"))?;

    Ok((guard, log_path))
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let direct = PathBuf::from(file_name);
    let config_path = if direct.exists() {
        direct
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
    };

    let file = File::open(&config_path).with_context(|| format!("opening {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;
    ftlog::info!("loaded scenario {}", config_path.display());

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (_guard, log_path) = configure_logger(&args.log_name)?;
    ftlog::info!("Log file: {log_path:?}");

    if args.bench {
        bench_convergence();
        bench_integrators();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut scenario = Scenario::build_scenario(scenario_cfg)?;

    if args.view {
        #[cfg(feature = "vis")]
        {
            springsim::run_3d(scenario);
            return Ok(());
        }
        #[cfg(not(feature = "vis"))]
        anyhow::bail!("the viewer is not compiled in; rebuild with `--features vis`");
    }

    let summary = match &args.out {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            let mut recorder = CsvRecorder::new(BufWriter::new(file));
            let summary = scenario.run(&mut recorder)?;
            println!("wrote {} frames to {}", recorder.frames(), path.display());
            summary
        }
        None => scenario.run(&mut NullRenderer)?,
    };

    println!("{} steps, t = {:.4}", summary.steps, summary.t);
    Ok(())
}
