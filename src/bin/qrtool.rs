use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use qr_age_verify::fields::{parse_birth_date, parse_birth_year};
use qr_age_verify::logging::init_tracing;
use qr_age_verify::synth::SyntheticPayload;
use qr_age_verify::tools::{dataset_iter, dataset_root_from_env, load_image_bytes, reading_rate};
use qr_age_verify::{PipelineConfig, RqrrDecoder, Verifier};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "qrtool", version, about = "QR identity card age verification tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify the age of the holder of a card photo
    Verify {
        #[arg(long)]
        image: PathBuf,
        /// Reference date (YYYY-MM-DD); defaults to the local date
        #[arg(long)]
        today: Option<String>,
        /// Print the boundary JSON record only
        #[arg(long)]
        json: bool,
    },
    /// Report how the symbol was found and which payload generation it holds
    Inspect {
        #[arg(long)]
        image: PathBuf,
    },
    /// Write a synthetic payload for printing test cards
    Synth {
        #[arg(long, value_enum)]
        format: SynthFormat,
        /// Date of birth for legacy, year of birth for compressed
        #[arg(long)]
        birth: String,
        /// Emit compressed payloads as raw gzip instead of decimal digits
        #[arg(long)]
        binary: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Compute the symbol reading rate over a directory of images
    ReadingRate {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SynthFormat {
    Legacy,
    Compressed,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Verify { image, today, json } => verify_cmd(&image, today.as_deref(), json),
        Command::Inspect { image } => inspect_cmd(&image),
        Command::Synth {
            format,
            birth,
            binary,
            out,
        } => synth_cmd(format, &birth, binary, out.as_deref()),
        Command::ReadingRate { root, limit } => reading_rate_cmd(root, limit),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn verifier() -> Verifier {
    Verifier::new().with_config(PipelineConfig::from_env())
}

fn read_image(image: &Path) -> Result<Vec<u8>, String> {
    load_image_bytes(image).map_err(|err| format!("Failed to read {}: {}", image.display(), err))
}

fn verify_cmd(image: &Path, today: Option<&str>, json: bool) -> Result<(), String> {
    let today = match today {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|err| format!("Invalid --today {text:?}: {err}"))?,
        None => Local::now().date_naive(),
    };
    let bytes = read_image(image)?;

    let start = Instant::now();
    let response = verifier().respond(&bytes, today);
    let elapsed = start.elapsed();

    if json {
        println!("{}", response.to_json());
        return Ok(());
    }

    println!("Image: {}", image.display());
    match (response.age, response.is_under_18, response.error) {
        (Some(age), Some(under_18), _) => {
            println!("  age: {age}");
            println!("  under 18: {under_18}");
        }
        (_, _, Some(kind)) => println!("  failed: {kind}"),
        _ => println!("  failed"),
    }
    println!("  time: {:.1}ms", elapsed.as_secs_f64() * 1000.0);
    Ok(())
}

fn inspect_cmd(image: &Path) -> Result<(), String> {
    let bytes = read_image(image)?;
    let (recovered, format) = verifier()
        .inspect(&bytes)
        .map_err(|err| format!("Inspection failed: {err}"))?;

    println!("Image: {}", image.display());
    println!("  transform: {}", recovered.transform);
    println!("  attempts: {}", recovered.attempts);
    println!("  payload bytes: {}", recovered.payload.len());
    println!("  format: {format}");
    Ok(())
}

fn synth_cmd(
    format: SynthFormat,
    birth: &str,
    binary: bool,
    out: Option<&Path>,
) -> Result<(), String> {
    let payload = match format {
        SynthFormat::Legacy => parse_birth_date(birth)
            .map(SyntheticPayload::legacy)
            .ok_or_else(|| format!("Invalid date of birth {birth:?}"))?,
        SynthFormat::Compressed => {
            let payload = parse_birth_year(birth)
                .map(SyntheticPayload::compressed)
                .ok_or_else(|| format!("Invalid year of birth {birth:?}"))?;
            if binary { payload.binary() } else { payload }
        }
    };
    let bytes = payload
        .to_bytes()
        .map_err(|err| format!("Failed to build payload: {err}"))?;

    match out {
        Some(path) => std::fs::write(path, &bytes)
            .map_err(|err| format!("Failed to write {}: {}", path.display(), err))?,
        None => std::io::stdout()
            .write_all(&bytes)
            .map_err(|err| format!("Failed to write payload: {err}"))?,
    }
    Ok(())
}

fn reading_rate_cmd(root: Option<PathBuf>, limit: Option<usize>) -> Result<(), String> {
    let root = root
        .or_else(dataset_root_from_env)
        .ok_or("No dataset root; pass --root or set QR_AGE_DATASET_ROOT")?;

    let config = PipelineConfig::from_env();
    let start = Instant::now();
    let rate = reading_rate(dataset_iter(&root, limit), &RqrrDecoder, &config);
    let elapsed = start.elapsed();

    println!("Dataset: {}", root.display());
    println!(
        "  decoded: {}/{} = {:.2}%",
        rate.decoded,
        rate.total,
        rate.percent()
    );
    println!("  unreadable: {}", rate.unreadable);
    println!("  time: {:.2}s", elapsed.as_secs_f64());
    Ok(())
}
