//! uq-quad: quadrature rules for probability weight functions.
//!
//! Emits Gauss-Radau and Leja rules as JSON (or an aligned table) on stdout.
//! Diagnostics and errors go to stderr.

use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use uq_common::{OutputFormat, RecurrenceAlgorithm, SubRule};
use uq_config::{load_settings, ConfigPath, QuadSettings};
use uq_core::exit_codes::ExitCode;
use uq_core::gauss_radau::generate_gauss_radau_with_tolerance;
use uq_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use uq_core::{
    generate_leja, Distribution, Error, FixedPoint, Joint, LejaOptions, Marginal, Order,
    QuadratureRule, RecurrenceOptions, Result,
};

/// Gauss-Radau and Leja quadrature for probability distributions
#[derive(Parser)]
#[command(name = "uq-quad")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Settings file (quad.json); falls back to UQ_QUAD_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Gauss-Radau rule
    Radau(RadauArgs),
    /// Generate a nested Leja rule
    Leja(LejaArgs),
    /// Inspect configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct RadauArgs {
    /// Rule order; each dimension gets 2 * order nodes
    #[arg(long)]
    order: usize,

    /// Marginal distribution, e.g. uniform:-1,1 (repeat per dimension)
    #[arg(long = "dist", required = true)]
    dists: Vec<String>,

    /// Fixed abscissa, one value or one per dimension (default: lower bound)
    #[arg(long, allow_hyphen_values = true)]
    fixed_point: Option<String>,

    /// Auxiliary rule used to discretize the distribution
    #[arg(long, value_enum)]
    rule: Option<SubRule>,

    /// Number of auxiliary points
    #[arg(long)]
    accuracy: Option<usize>,

    /// Recurrence construction
    #[arg(long, value_enum)]
    algorithm: Option<RecurrenceAlgorithm>,
}

#[derive(Args, Debug)]
struct LejaArgs {
    /// Order, shared ("3") or per dimension ("3,2")
    #[arg(long, allow_hyphen_values = true)]
    order: String,

    /// Marginal distribution, e.g. beta:2,5 (repeat per dimension)
    #[arg(long = "dist", required = true)]
    dists: Vec<String>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the resolved settings and where they came from
    Show,
}

fn main() {
    let cli = Cli::parse();

    let cli_level = (cli.global.quiet || cli.global.verbose > 0)
        .then(|| LogLevel::from_verbosity(cli.global.quiet, cli.global.verbose));
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let exit_code = match &cli.command {
        Commands::Radau(args) => run_radau(&cli.global, args),
        Commands::Leja(args) => run_leja(&cli.global, args),
        Commands::Config(args) => match args.command {
            ConfigCommands::Show => run_config_show(&cli.global),
        },
    };

    std::process::exit(exit_code.as_i32());
}

fn run_radau(global: &GlobalOpts, args: &RadauArgs) -> ExitCode {
    let result = load(global).and_then(|(settings, _)| {
        let mut options = RecurrenceOptions::from(&settings.recurrence);
        if let Some(rule) = args.rule {
            options.rule = rule;
        }
        if let Some(accuracy) = args.accuracy {
            options.accuracy = accuracy;
        }
        if let Some(algorithm) = args.algorithm {
            options.algorithm = algorithm;
        }
        let dist = parse_distribution(&args.dists)?;
        let fixed_point = match &args.fixed_point {
            Some(raw) => parse_fixed_point(raw)?,
            None => FixedPoint::Lower,
        };
        generate_gauss_radau_with_tolerance(
            args.order,
            dist.as_ref(),
            &fixed_point,
            &options,
            settings.radau.snap_tolerance,
        )
    });
    finish(global, "radau", result)
}

fn run_leja(global: &GlobalOpts, args: &LejaArgs) -> ExitCode {
    let result = load(global).and_then(|(settings, _)| {
        let options = LejaOptions::from(&settings.leja);
        let order: Order = args.order.parse()?;
        let dist = parse_distribution(&args.dists)?;
        generate_leja(&order, dist.as_ref(), &options)
    });
    finish(global, "leja", result)
}

fn run_config_show(global: &GlobalOpts) -> ExitCode {
    let (settings, config_path) = match load(global) {
        Ok(loaded) => loaded,
        Err(e) => return output_error(global, &e),
    };
    let path = config_path.path.as_ref().map(|p| p.display().to_string());

    match global.format {
        OutputFormat::Json => {
            let response = json!({
                "status": "ok",
                "source": {
                    "path": path,
                    "origin": config_path.source.to_string(),
                    "using_defaults": config_path.path.is_none(),
                },
                "settings": settings,
            });
            print_json(&response);
        }
        OutputFormat::Human => {
            println!("# uq-quad config show");
            println!();
            match path {
                Some(path) => println!("Source: {} ({})", path, config_path.source),
                None => println!("Source: built-in defaults"),
            }
            println!("Schema version: {}", settings.schema_version);
            println!();
            println!("## Recurrence");
            println!("rule:      {}", settings.recurrence.rule);
            println!("accuracy:  {}", settings.recurrence.accuracy);
            println!("algorithm: {}", settings.recurrence.algorithm);
            println!();
            println!("## Leja");
            println!("xtol:             {:e}", settings.leja.xtol);
            println!("max_evaluations:  {}", settings.leja.max_evaluations);
            println!("auxiliary_factor: {}", settings.leja.auxiliary_factor);
            println!("auxiliary_rule:   {}", settings.leja.auxiliary_rule);
            println!();
            println!("## Radau");
            println!("snap_tolerance: {:e}", settings.radau.snap_tolerance);
        }
    }
    ExitCode::Clean
}

fn load(global: &GlobalOpts) -> Result<(QuadSettings, ConfigPath)> {
    load_settings(global.config.as_deref()).map_err(Error::from)
}

/// One `--dist` yields a marginal, several an independent joint.
fn parse_distribution(specs: &[String]) -> Result<Box<dyn Distribution>> {
    let marginals = specs
        .iter()
        .map(|s| s.parse::<Marginal>())
        .collect::<Result<Vec<_>>>()?;
    match <[Marginal; 1]>::try_from(marginals) {
        Ok([marginal]) => Ok(Box::new(marginal)),
        Err(marginals) => Ok(Box::new(Joint::independent(marginals)?)),
    }
}

/// `"0.5"` applies to every dimension, `"0.5,-1"` lists one per dimension.
fn parse_fixed_point(raw: &str) -> Result<FixedPoint> {
    let values = raw
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<f64>()
                .map_err(|_| Error::InvalidArgument(format!("bad fixed point {p:?}")))
        })
        .collect::<Result<Vec<_>>>()?;
    match values[..] {
        [value] => Ok(FixedPoint::Scalar(value)),
        _ => Ok(FixedPoint::PerDimension(values)),
    }
}

fn finish(global: &GlobalOpts, method: &str, result: Result<QuadratureRule>) -> ExitCode {
    match result {
        Ok(rule) => {
            output_rule(global, method, &rule);
            ExitCode::Clean
        }
        Err(e) => output_error(global, &e),
    }
}

fn output_rule(global: &GlobalOpts, method: &str, rule: &QuadratureRule) {
    match global.format {
        OutputFormat::Json => {
            let response = json!({
                "status": "ok",
                "method": method,
                "dim": rule.dim(),
                "nodes": rule.len(),
                "abscissas": rule.abscissas(),
                "weights": rule.weights(),
            });
            print_json(&response);
        }
        OutputFormat::Human => {
            println!(
                "# {} rule: {} node(s) in {} dimension(s)",
                method,
                rule.len(),
                rule.dim()
            );
            let header: Vec<String> = (0..rule.dim())
                .map(|d| format!("{:>22}", format!("x{d}")))
                .collect();
            println!("{:>5} {} {:>22}", "#", header.join(" "), "weight");
            for (i, weight) in rule.weights().iter().enumerate() {
                let coords: Vec<String> = rule
                    .node(i)
                    .iter()
                    .map(|x| format!("{:>22.15e}", x))
                    .collect();
                println!("{:>5} {} {:>22.15e}", i, coords.join(" "), weight);
            }
            println!("sum of weights: {:.15}", rule.weight_sum());
        }
    }
}

/// Report an error on stderr in the selected format.
fn output_error(global: &GlobalOpts, error: &Error) -> ExitCode {
    let exit_code = ExitCode::from(error);
    match global.format {
        OutputFormat::Json => {
            let response = json!({
                "status": "error",
                "exit_code": exit_code.code_name(),
                "error": {
                    "code": error.code(),
                    "category": error.category().to_string(),
                    "message": error.to_string(),
                    "recoverable": error.is_recoverable(),
                }
            });
            match serde_json::to_string_pretty(&response) {
                Ok(text) => eprintln!("{text}"),
                Err(_) => eprintln!("error: {error}"),
            }
        }
        OutputFormat::Human => {
            eprintln!("Error [{}]: {}", error.code(), error);
        }
    }
    exit_code
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("failed to serialize output: {e}"),
    }
}
