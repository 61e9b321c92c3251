use clap::{Parser, Subcommand};
use recstream::{make_serializer, FileFormat, SerializerOptions};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recstream", about = "Stream JSON records into a (compressed) JSON array file")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read newline-delimited JSON records and write them as one JSON array
    Write {
        /// Output file; defaults to <basename>.<extension>
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Format: json, json.gz, json.bz2, json.zip (or gzip, bzip2, zlib).
        /// Inferred from --output when omitted.
        #[arg(short, long)]
        format: Option<String>,
        /// JSON file with serializer options
        #[arg(long)]
        config: Option<PathBuf>,
        /// Compression level 0-9
        #[arg(short, long)]
        level: Option<u32>,
        /// Anchor name for the default output filename
        #[arg(long)]
        basename: Option<String>,
        /// Input files (stdin when empty)
        inputs: Vec<PathBuf>,
    },
    /// List supported formats and their extensions
    Formats,
    /// Print the filename used when no output file is given
    DefaultName {
        #[arg(short, long, default_value = "json")]
        format: String,
        #[arg(long)]
        basename: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {

        // ── Write ────────────────────────────────────────────────────────────
        Commands::Write { output, format, config, level, basename, inputs } => {
            let mut opts = match config {
                Some(path) => SerializerOptions::from_json_file(path)?,
                None       => SerializerOptions::default(),
            };
            if let Some(level) = level { opts.compression_level = level; }
            if let Some(basename) = basename { opts.default_basename = basename; }

            let format = match (&format, &output) {
                (Some(f), _)    => f.parse::<FileFormat>()?,
                (None, Some(p)) => FileFormat::detect(p).unwrap_or_default(),
                (None, None)    => FileFormat::default(),
            };

            let mut out = make_serializer(format, opts);
            let filename = output.as_ref().map(|p| p.to_string_lossy().into_owned()).unwrap_or_default();
            if !out.open_file(&filename) {
                return Err(format!("cannot open output file for format {format}").into());
            }

            let mut count = 0u64;
            let mut write_lines = |reader: &mut dyn BufRead| -> Result<(), Box<dyn std::error::Error>> {
                for line in reader.lines() {
                    let line = line?;
                    if line.trim().is_empty() { continue; }
                    let record: serde_json::Value = serde_json::from_str(&line)?;
                    out.serialize(&record, count > 0)?;
                    count += 1;
                }
                Ok(())
            };

            if inputs.is_empty() {
                write_lines(&mut io::stdin().lock())?;
            } else {
                for path in &inputs {
                    write_lines(&mut BufReader::new(File::open(path)?))?;
                }
            }

            out.close_file()?;
            if let Some(path) = out.path() {
                println!("Wrote {count} record(s) to {}", path.display());
            }
        }

        // ── Formats ──────────────────────────────────────────────────────────
        Commands::Formats => {
            println!("{:<10} {:<8}", "Extension", "Codec");
            for f in FileFormat::ALL {
                println!("{:<10} {:<8}", f.extension(), f.codec().name());
            }
        }

        // ── DefaultName ──────────────────────────────────────────────────────
        Commands::DefaultName { format, basename } => {
            let mut opts = SerializerOptions::default();
            if let Some(basename) = basename { opts.default_basename = basename; }
            let out = make_serializer(format.parse()?, opts);
            println!("{}", out.default_filename());
        }
    }

    Ok(())
}
