use anyhow::{Context, Result};
use clap::Parser;
use dotbar::config::ChartConfig;
use dotbar::csv_reader;
use dotbar::data::Dataset;
use dotbar::overrides::{apply_overrides, parse_override};
use dotbar::pipeline::{build_chart, render_chart_with_rng, Outcome, Selection};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

/// Exit status for renders that need more input or have nothing to plot.
const EXIT_NO_CHART: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "dotbar")]
#[command(about = "Bar charts of group means with individual observations overlaid", long_about = None)]
struct Args {
    /// Column whose values define the groups
    #[arg(short, long)]
    group: Option<String>,

    /// Value column(s) pooled into each group (repeat or comma-separate)
    #[arg(short, long, value_delimiter = ',')]
    values: Vec<String>,

    /// Input table (CSV, or JSON array of objects with a .json extension); stdin if omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Chart settings as a JSON object
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override one setting, e.g. --set yTickInterval=2.5 --set title="Run 3"
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Seed for the scatter jitter
    #[arg(long)]
    seed: Option<u64>,

    /// Output PNG path; '-' writes to stdout
    #[arg(short, long, default_value = dotbar::pipeline::EXPORT_FILE_NAME)]
    output: String,

    /// Print the chart description as JSON instead of rendering
    #[arg(long)]
    describe: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let dataset = load_dataset(args.input.as_deref())?;
    let config = load_config(args.config.as_deref(), &args.overrides)?;
    let selection = Selection {
        group_column: args.group.clone(),
        value_columns: args.values.clone(),
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    if args.describe {
        let outcome = build_chart(&dataset, &selection, &config, &mut rng)
            .context("Failed to build chart")?;
        let desc = unwrap_outcome(outcome);
        let json = serde_json::to_string_pretty(&desc).context("Failed to serialize chart")?;
        println!("{}", json);
        return Ok(());
    }

    let outcome = render_chart_with_rng(&dataset, &selection, &config, &mut rng)
        .context("Failed to render chart")?;
    let chart = unwrap_outcome(outcome);

    if args.output == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(&chart.png)
            .context("Failed to write PNG to stdout")?;
        handle.flush().context("Failed to flush stdout")?;
    } else {
        std::fs::write(&args.output, &chart.png)
            .with_context(|| format!("Failed to write {}", args.output))?;
        log::info!("wrote {} ({})", args.output, chart.mime_type());
    }

    Ok(())
}

fn load_dataset(input: Option<&Path>) -> Result<Dataset> {
    let Some(path) = input else {
        let csv_data = csv_reader::read_csv_from_stdin().context("Failed to read CSV from stdin")?;
        return Ok(Dataset::from_csv(csv_data)?);
    };

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let dataset = if is_json {
        let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Dataset::from_json(&value)?
    } else {
        let csv_data = csv_reader::read_csv(BufReader::new(file))
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Dataset::from_csv(csv_data)?
    };
    Ok(dataset)
}

fn load_config(path: Option<&Path>, overrides: &[String]) -> Result<ChartConfig> {
    let config = match path {
        Some(p) => ChartConfig::from_json_file(p)
            .with_context(|| format!("Failed to load config {}", p.display()))?,
        None => ChartConfig::default(),
    };

    let parsed = overrides
        .iter()
        .map(|s| parse_override(s))
        .collect::<dotbar::Result<Vec<_>>>()?;
    Ok(apply_overrides(config, &parsed)?)
}

/// Take the chart out of an outcome, or report why there is none and exit.
fn unwrap_outcome<T>(outcome: Outcome<T>) -> T {
    match outcome {
        Outcome::Ready(v) => v,
        Outcome::NeedsInput(msg) | Outcome::Empty(msg) => {
            eprintln!("{}", msg);
            std::process::exit(EXIT_NO_CHART);
        }
    }
}
