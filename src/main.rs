use clap::{Parser, ValueEnum};
use hkqr::application::encoder::PayloadEncoder;
use hkqr::config::{EncoderConfig, LanguageCodeMode, Strictness};
use hkqr::interfaces::csv::payload_writer::PayloadWriter;
use hkqr::interfaces::json::payload_reader::PayloadReader;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// One encoded payload per line
    Text,
    /// `record,payload` CSV rows
    Csv,
}

enum Output<W: Write> {
    Text(W),
    Csv(PayloadWriter<W>),
}

impl<W: Write> Output<W> {
    fn write(&mut self, record: usize, encoded: &str) -> Result<()> {
        match self {
            Output::Text(sink) => writeln!(sink, "{}", encoded).into_diagnostic(),
            Output::Csv(writer) => Ok(writer.write_payload(record, encoded)?),
        }
    }

    fn flush(&mut self) -> Result<()> {
        match self {
            Output::Text(sink) => sink.flush().into_diagnostic(),
            Output::Csv(writer) => Ok(writer.flush()?),
        }
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file holding one or more JSON payload descriptions
    input: PathBuf,

    /// JSON encoder configuration file (optional). Flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reject input that would otherwise be dropped or padded
    #[arg(long)]
    strict: bool,

    /// Pad language codes to two characters
    #[arg(long)]
    legacy_language_code: bool,

    /// Append a CRC-16 checksum field (tag 63)
    #[arg(long)]
    checksum: bool,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hkqr=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EncoderConfig::from_path(path)?,
        None => EncoderConfig::default(),
    };
    if cli.strict {
        config.strictness = Strictness::Strict;
    }
    if cli.legacy_language_code {
        config.language_code = LanguageCodeMode::Legacy;
    }
    if cli.checksum {
        config.checksum = true;
    }
    let encoder = PayloadEncoder::new(config);

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = PayloadReader::new(BufReader::new(file));

    let stdout = io::stdout();
    let mut output = match cli.format {
        Format::Text => Output::Text(stdout.lock()),
        Format::Csv => Output::Csv(PayloadWriter::new(stdout.lock())),
    };

    let mut encoded_count = 0;
    for (index, result) in reader.payloads().enumerate() {
        let record = index + 1;
        match result.and_then(|payload| encoder.encode(&payload)) {
            Ok(encoded) => {
                output.write(record, &encoded)?;
                encoded_count += 1;
            }
            Err(e) => {
                eprintln!("Error encoding payload {}: {}", record, e);
            }
        }
    }

    output.flush()?;
    info!(encoded = encoded_count, "done");

    Ok(())
}
