//! supower
//!
//! Prints the state of one UPower device as a single JSON object for
//! status-bar custom modules, lists devices, or turns a yes/no property
//! into an exit code for scripts.
//!
//! Exit codes:
//! 0. success, or `--check` found "yes"
//! 1. `--check` found "no"
//! 2. device not found
//! 3. template could not be rendered
//! 4. checked property is not a usable yes/no value
//! 5. UPower could not be reached
//! 6. configuration file could not be loaded

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use supower_config::{SupowerConfig, TemplateConfig};
use supower_core::query::DISPLAY_DEVICE_NAME;
use supower_core::{Action, CoreError, OutputRecord, Query, Report, Templates};
use supower_dbus::UPowerService;
use tracing::{debug, error, info};

/// Exit code when the configuration file cannot be loaded
const EXIT_CONFIG: u8 = 6;

const KEYS_HELP: &str = "\
Templates can use one or more {KEY} or {KEY:SPEC} placeholders:
  {BatteryLevel} {Capacity} {Energy} {EnergyEmpty} {EnergyFull}
  {EnergyFullDesign} {EnergyRate} {HasHistory} {HasStatistics}
  {IconName} {IsPresent} {IsRechargeable} {Luminosity}
  {Model} {NativePath} {Online} {Percentage} {PowerSupply}
  {Serial} {State} {Technology} {Temperature} {TimeToEmpty}
  {TimeToFull} {Type} {UpdateTime} {Vendor} {Voltage}
  {WarningLevel}

Example: supower --model 'MX Master 2S' --tooltip '{State}'";

#[derive(Debug, Parser)]
#[command(name = "supower", version, about = "UPower device status for status bars", after_help = KEYS_HELP)]
struct Cli {
    /// List devices and models
    #[arg(long)]
    list_devices: bool,

    /// Exit 0 if the yes/no PROPERTY is "yes", 1 if it is "no"
    #[arg(long, value_name = "PROPERTY")]
    check: Option<String>,

    /// Device path or model [default: the display device]
    #[arg(long, visible_alias = "model", value_name = "PATH|MODEL")]
    device: Option<String>,

    /// Template for "text" [default: {Model}]
    #[arg(long)]
    text: Option<String>,

    /// Template for "alt" [default: {BatteryLevel}]
    #[arg(long)]
    alt: Option<String>,

    /// Template for "tooltip" [default: similar to upower -i <device>]
    #[arg(long)]
    tooltip: Option<String>,

    /// Template for "class" [default: {BatteryLevel}]
    #[arg(long)]
    class: Option<String>,

    /// Template for "percentage", must render a number [default: {Percentage:.0f}]
    #[arg(long)]
    percentage: Option<String>,

    /// Configuration file [default: ~/.config/supower/config.toml]
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log more to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{e:#}");
            let record = OutputRecord::Failure {
                text: "configuration cannot be loaded".to_string(),
                tooltip: format!("{e:#}"),
            };
            return finish(&record_report(record, EXIT_CONFIG));
        }
    };

    let query = build_query(&cli, &config);
    debug!("{:?}", query);

    let report = match UPowerService::connect() {
        Ok(service) => supower_core::execute(&service, &query),
        Err(e) => {
            let identifier = query.device.as_deref().unwrap_or(DISPLAY_DEVICE_NAME);
            let err = CoreError::from(e);
            error!("{}", err);
            record_report(OutputRecord::failure(identifier, &err), err.exit_code())
        }
    };

    finish(&report)
}

/// Setup logging to stderr; stdout only carries the report
fn setup_logging(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(io::stderr),
        )
        .init();
}

fn load_config(path: Option<&Path>) -> Result<SupowerConfig> {
    match path {
        Some(path) => SupowerConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => SupowerConfig::load_default().context("Failed to load configuration"),
    }
}

/// Combine flags, the configuration file and built-in defaults, in that order
fn build_query(cli: &Cli, config: &SupowerConfig) -> Query {
    let action = if cli.list_devices {
        Action::ListDevices
    } else if let Some(property) = &cli.check {
        Action::Check(property.clone())
    } else {
        Action::Render(templates(cli, &config.templates))
    };

    Query {
        device: cli.device.clone().or_else(|| config.device.clone()),
        action,
    }
}

fn templates(cli: &Cli, config: &TemplateConfig) -> Templates {
    let defaults = Templates::default();
    Templates {
        text: pick(&cli.text, &config.text, defaults.text),
        alt: pick(&cli.alt, &config.alt, defaults.alt),
        tooltip: cli.tooltip.clone().or_else(|| config.tooltip.clone()),
        class: pick(&cli.class, &config.class, defaults.class),
        percentage: pick(&cli.percentage, &config.percentage, defaults.percentage),
    }
}

fn pick(flag: &Option<String>, file: &Option<String>, default: String) -> String {
    flag.as_ref().or(file.as_ref()).cloned().unwrap_or(default)
}

fn record_report(record: OutputRecord, exit_code: u8) -> Report {
    Report::Record { record, exit_code }
}

fn finish(report: &Report) -> ExitCode {
    if let Err(e) = print_report(report) {
        error!("Failed to write output: {e:#}");
    }
    info!("Exiting with {}", report.exit_code());
    ExitCode::from(report.exit_code())
}

fn print_report(report: &Report) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match report {
        Report::Devices(devices) => {
            for (path, model) in devices {
                writeln!(out, "{path}\t{model}")?;
            }
        }
        Report::Checked(code) => debug!("Check result: {}", code),
        Report::Record { record, .. } => {
            let json = record.to_json().context("Failed to serialize output")?;
            writeln!(out, "{json}")?;
        }
    }

    out.flush().context("Failed to flush stdout")
}
