//! The `pdqkit hash` command for hashing a single image.

use anyhow::Context;
use clap::{Args, ValueEnum};
use pdqkit_core::{Config, HashRecord, OutputFormat as CoreOutputFormat, OutputWriter, PdqPipeline};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Input path that means "read the image from stdin".
const STDIN_INPUT: &str = "-";

/// Output format for hash results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `hash,quality,source`
    Text,
    /// JSON object
    Json,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => CoreOutputFormat::Text,
            OutputFormat::Json => CoreOutputFormat::Json,
        }
    }
}

/// Arguments for the `hash` command.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Image file to hash, or `-` to read the image from stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Convert to RGB before hashing, even for grayscale images
    #[arg(long)]
    pub force_rgb: bool,

    /// Output format (defaults to `output.format` from the config file)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the hash command, writing to stdout.
pub fn execute(args: HashArgs, config: &Config) -> anyhow::Result<()> {
    let stdout = io::stdout();
    run(args, config, io::stdin().lock(), stdout.lock())
}

/// Hash one input and write its record to `out`.
pub(crate) fn run<R: Read, W: Write>(
    args: HashArgs,
    config: &Config,
    mut stdin: R,
    out: W,
) -> anyhow::Result<()> {
    let mut config = config.clone();
    config.hashing.force_rgb |= args.force_rgb;
    let pipeline = PdqPipeline::new(&config);

    let (output, source) = if args.input == Path::new(STDIN_INPUT) {
        let mut bytes = Vec::new();
        stdin
            .read_to_end(&mut bytes)
            .context("Failed to read image from stdin")?;
        tracing::debug!("Read {} bytes from stdin", bytes.len());
        let output = pipeline
            .hash_bytes(&bytes)
            .context("Failed to hash image from stdin")?;
        (output, STDIN_INPUT.to_string())
    } else {
        let output = pipeline
            .hash_file(&args.input)
            .with_context(|| format!("Failed to hash {}", args.input.display()))?;
        (output, args.input.display().to_string())
    };

    tracing::info!(quality = output.quality, "Hashed {}", source);

    let format = match args.format {
        Some(format) => format.into(),
        None => CoreOutputFormat::parse(&config.output.format).unwrap_or(CoreOutputFormat::Text),
    };
    let pretty = args.pretty || config.output.pretty;

    let mut writer = OutputWriter::new(out, format, pretty);
    writer.write(&HashRecord::new(output, source))?;
    writer.flush()?;
    Ok(())
}
