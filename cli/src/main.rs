use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser as _;
use webpinspect::parse::chunk_type::RIFF;
use webpinspect::parse::{Chunk, ParsedChunk};
use webpinspect::{Config, Document};

#[derive(clap::Parser)]
struct Args {
    /// Treat the file as a bare chunk stream, without a leading `RIFF....WEBP` file header.
    #[clap(long)]
    raw: bool,

    /// Skip the padding byte following chunks with an odd payload length.
    #[clap(long)]
    pad_odd_chunks: bool,

    /// Path to the WebP file to inspect.
    file: PathBuf,
}

const RIFF_HEADER_LEN: usize = 12;

fn main() -> Result<(), anyhow::Error> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init()
        .context("Error initializing logging")?;

    let args = Args::try_parse().context("Error parsing command line arguments")?;

    let data = fs::read(&args.file).with_context(|| format!("Error reading {}", args.file.display()))?;
    let input = if args.raw { &data[..] } else { strip_riff_header(&data)? };

    let config = Config::builder().pad_odd_chunks(args.pad_odd_chunks).build();
    let document = match webpinspect::parse_with_config(input, &config) {
        Ok(document) => document,
        Err(err) => {
            log_attachments(&err);
            return Err(err).context("Error parsing webp file");
        }
    };

    print_document(&mut io::stdout().lock(), &document).context("Error writing output")?;
    Ok(())
}

/// Validate the `RIFF` file header and return the chunk stream it declares.
fn strip_riff_header(data: &[u8]) -> Result<&[u8], anyhow::Error> {
    anyhow::ensure!(data.len() >= RIFF_HEADER_LEN, "file too short for a RIFF header ({} bytes)", data.len());
    anyhow::ensure!(data[..4] == RIFF.value, "not a {RIFF} file");
    anyhow::ensure!(&data[8..12] == b"WEBP", "not a WebP file");

    let mut riff_len = [0; 4];
    riff_len.copy_from_slice(&data[4..8]);
    let riff_end = 8usize.saturating_add(u32::from_le_bytes(riff_len) as usize);
    if riff_end != data.len() {
        log::warn!("RIFF header declares {riff_end} bytes, file has {}", data.len());
    }
    Ok(&data[RIFF_HEADER_LEN..riff_end.clamp(RIFF_HEADER_LEN, data.len())])
}

/// Log the parser context of `err`, which its `Display` output omits.
fn log_attachments(err: &webpinspect::Error) {
    for attachment in err.attachments() {
        log::error!("{attachment}");
    }
}

fn print_document(out: &mut impl Write, document: &Document) -> io::Result<()> {
    for chunk in document {
        writeln!(out, "{}: {chunk}", chunk.name())?;
        if let Chunk::Frame(frame) = chunk {
            if let Some(alpha) = &frame.data.alpha {
                writeln!(out, "  {}: {alpha}", alpha.name())?;
            }
            let bitstream = &frame.data.bitstream;
            writeln!(out, "  {}: {bitstream}", bitstream.name())?;
        }
    }
    Ok(())
}
