use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use psem_rs::display::{DisplayDimension, DisplayFormatCode, DisplayItem};
use psem_rs::tables::Table2048;
use psem_rs::tou::{overwrite_calendar_config, overwrite_tou_config, read_tou_schedule};
use psem_rs::{init_logger, log_info, RegisterValue, TouReconfigResult, TouSchedule};

#[derive(Parser)]
#[command(name = "psem-cli")]
#[command(about = "Inspect and build ANSI C12.19 meter configuration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a hex dump of the configuration table into a JSON schedule.
    DecodeTou {
        /// File containing the table contents as hex.
        input: PathBuf,
    },
    /// Build configuration table contents from a JSON schedule.
    EncodeTou {
        /// JSON schedule file.
        input: PathBuf,
    },
    /// Render a value the way the meter display would.
    Format {
        /// Display format code, e.g. 0x0052.
        #[arg(value_parser = parse_u16)]
        code: u16,
        /// Dimension byte: total digits in the high nibble, decimals low.
        #[arg(value_parser = parse_u8)]
        dimension: u8,
        /// The raw value to render.
        value: f64,
        /// How to interpret the raw value.
        #[arg(short, long, value_enum, default_value_t = ValueKind::Double)]
        kind: ValueKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ValueKind {
    Uint,
    Int,
    Double,
    Seconds,
}

fn parse_u16(s: &str) -> Result<u16, String> {
    parse_based(s).map_err(|e| e.to_string())
}

fn parse_u8(s: &str) -> Result<u8, String> {
    parse_based(s)
        .map_err(|e| e.to_string())
        .and_then(|v: u16| u8::try_from(v).map_err(|_| "value out of range".to_string()))
}

fn parse_based(s: &str) -> Result<u16, std::num::ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    }
}

fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();
    match cli.command {
        Commands::DecodeTou { input } => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let raw = hex::decode(text.split_whitespace().collect::<String>())
                .context("table contents are not valid hex")?;
            let table = Table2048::parse(&raw).context("parsing configuration table")?;
            let schedule = read_tou_schedule(&table.tou, &table.calendar)
                .context("translating TOU schedule")?;
            println!("{}", serde_json::to_string_pretty(&schedule)?);
        }
        Commands::EncodeTou { input } => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let schedule: TouSchedule =
                serde_json::from_str(&text).context("parsing schedule JSON")?;

            let mut table = Table2048::default();
            let result = overwrite_tou_config(&schedule, &mut table.tou);
            if result != TouReconfigResult::Success {
                anyhow::bail!("TOU encode failed: {result:?}");
            }
            let result = overwrite_calendar_config(&schedule, None, &mut table.calendar);
            if result != TouReconfigResult::Success {
                anyhow::bail!("calendar encode failed: {result:?}");
            }
            log_info(&format!("encoded schedule '{}'", schedule.name));
            println!("{}", hex::encode(table.encode()));
        }
        Commands::Format {
            code,
            dimension,
            value,
            kind,
        } => {
            let mut item = DisplayItem::new(
                psem_rs::Lid(0),
                DisplayFormatCode::new(code),
                DisplayDimension(dimension),
            );
            let raw = match kind {
                ValueKind::Uint => RegisterValue::Uint(value as u32),
                ValueKind::Int => RegisterValue::Int(value as i32),
                ValueKind::Double => RegisterValue::Double(value),
                ValueKind::Seconds => RegisterValue::TimeSeconds(value as u32),
            };
            item.format_data(&raw).context("formatting value")?;
            println!("{}", item.value);
        }
    }

    Ok(())
}
