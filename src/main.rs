use anyhow::{Context, Result};
use clap::Parser;
use procs_lib::app::App;
use procs_lib::model::config::AppConfig;
use procs_lib::model::metrics::init_logging;
use procs_lib::report::ReportFormat;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 1_000_000)]
    ticks: u64,

    /// Seed for the random source, overriding the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Emit reports as JSON lines
    #[arg(long)]
    json: bool,

    /// Only print the final report
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let mut config = AppConfig::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config))?;
    if args.seed.is_some() {
        config.core.seed = args.seed;
    }

    let mut app = App::new(config)?;
    app.quiet = args.quiet;
    if args.json {
        app.format = ReportFormat::Json;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = app.run(args.ticks, &mut out)?;
    if summary.extinct {
        eprintln!("Population died out after {} ticks.", summary.ticks);
    }

    Ok(())
}
