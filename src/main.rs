use clap::{Parser, Subcommand};
use media_convert::{
    CompressRequest, ConvertRequest, FilesystemPicker, Format, MediaDescriptor, MediaPicker,
    PickerOptions, Quality, RustCodec, compress_media, convert_media, naming,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shared flags for commands that write encoded files.
#[derive(clap::Args, Clone)]
struct OutputArgs {
    /// Directory for encoded files (created if missing)
    #[arg(long, default_value_os_t = naming::default_cache_dir())]
    out_dir: PathBuf,
}

#[derive(Parser)]
#[command(name = "media-convert")]
#[command(about = "Convert images between formats or compress them to a size budget")]
#[command(long_about = "\
Convert images between formats or compress them to a size budget

Supported formats: jpg, jpeg, png, webp.

Compression walks a fixed quality ladder (1.0 down to 0.3) and keeps the
first encode that fits the --max-size-kb budget. Inputs that cannot meet the
budget at any quality are warned about and dropped from the output; the
remaining inputs are still processed.

Results are printed as a JSON array of media descriptors.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Re-encode images to a target format
    Convert {
        /// Source image files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Target format (default: jpeg)
        #[arg(long)]
        format: Option<Format>,

        /// Encode quality in [0.0, 1.0] (default: 1.0)
        #[arg(long)]
        quality: Option<f32>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Compress images to fit a size budget
    Compress {
        /// Source image files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Maximum encoded size in kilobytes
        #[arg(long)]
        max_size_kb: u32,

        /// Target format (default: jpg; png is downgraded to jpg)
        #[arg(long)]
        format: Option<Format>,

        /// Fail instead of silently downgrading a lossless target format
        #[arg(long)]
        keep_lossless: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Pick images from a directory, as a stand-in for a platform library picker
    Pick {
        /// Directory to pick from
        dir: PathBuf,

        /// Maximum number of images to pick (0 = unlimited)
        #[arg(long, default_value_t = 1)]
        limit: usize,

        /// Downscale picked images wider than this
        #[arg(long)]
        max_width: Option<u32>,

        /// Downscale picked images taller than this
        #[arg(long)]
        max_height: Option<u32>,

        /// Attach base64 file contents to each descriptor
        #[arg(long)]
        base64: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
}

fn print_descriptors(descriptors: &[MediaDescriptor]) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(descriptors)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let codec = RustCodec::new();

    match cli.command {
        Command::Convert {
            inputs,
            format,
            quality,
            output,
        } => {
            let mut request = ConvertRequest::batch(
                inputs.iter().map(|p| MediaDescriptor::from_path(p)).collect(),
            );
            request.format = format;
            request.quality = quality.map(Quality::new);
            let results = convert_media(&codec, &request, &output.out_dir)?;
            print_descriptors(&results)?;
        }
        Command::Compress {
            inputs,
            max_size_kb,
            format,
            keep_lossless,
            output,
        } => {
            let mut request = CompressRequest::batch(
                inputs.iter().map(|p| MediaDescriptor::from_path(p)).collect(),
                max_size_kb,
            );
            request.format = format;
            request.allow_lossy_fallback = !keep_lossless;
            let results = compress_media(&codec, &request, &output.out_dir)?;
            print_descriptors(&results)?;
        }
        Command::Pick {
            dir,
            limit,
            max_width,
            max_height,
            base64,
            output,
        } => {
            let picker = FilesystemPicker::new(&dir, &output.out_dir, &codec);
            let options = PickerOptions {
                max_width,
                max_height,
                include_base64: base64,
                selection_limit: limit,
                ..PickerOptions::default()
            };
            match picker.pick(&options)? {
                Some(picked) => print_descriptors(&picked)?,
                None => println!("[]"),
            }
        }
    }

    Ok(())
}
