//! rowfilter CLI - scanline filtering and reconstruction utility.
//!
//! Works on the decompressed scanline stream of a PNG-style image: one filter
//! selector byte followed by the filtered bytes of each row.

use clap::{Parser, Subcommand, ValueEnum};
use rowfilter_rs::{
    BitmapRegion, EncoderOptions, FilterStrategy, FilterType, FrameDecoder, FrameEncoder, Pixel,
    PixelFormat, SliceSource,
};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Reverse or apply PNG-style scanline filters
#[derive(Parser)]
#[command(name = "rowfilter")]
#[command(author = "rowfilter-rs contributors")]
#[command(version)]
#[command(about = "Scanline filter reconstruction for PNG-style raster rows", long_about = None)]
#[command(after_help = "EXAMPLES:
    rowfilter decode -i rows.bin -o pixels.raw -w 64 -H 64 -f rgb8
    rowfilter decode -i rows.bin -o image.pnm -w 64 -H 64 -f grey16 --output-format pnm
    rowfilter encode -i pixels.raw -o rows.bin -w 64 -H 64 -f rgba8 --filter paeth
    rowfilter info -i rows.bin -w 64 -H 64 -f rgb8")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct a filtered scanline stream into pixels
    #[command(visible_alias = "d")]
    Decode {
        /// Filtered scanline stream (already decompressed)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path for decoded pixels
        #[arg(short, long)]
        output: PathBuf,

        /// Image width in pixels
        #[arg(short, long)]
        width: u32,

        /// Image height in pixels
        #[arg(short = 'H', long)]
        height: u32,

        /// Pixel layout of the stream
        #[arg(short, long, value_enum)]
        format: FormatArg,

        /// raw (host-order samples) or pnm (PGM/PPM/PAM)
        #[arg(long, default_value = "raw", value_enum)]
        output_format: OutputFormat,
    },

    /// Filter raw pixels (wire byte order) into a scanline stream
    #[command(visible_alias = "e")]
    Encode {
        /// Raw pixel file, 16-bit samples big-endian
        #[arg(short, long)]
        input: PathBuf,

        /// Output scanline stream
        #[arg(short, long)]
        output: PathBuf,

        /// Image width in pixels
        #[arg(short, long)]
        width: u32,

        /// Image height in pixels
        #[arg(short = 'H', long)]
        height: u32,

        /// Pixel layout of the input
        #[arg(short, long, value_enum)]
        format: FormatArg,

        /// Filter applied to every row, or adaptive per-row selection
        #[arg(long, default_value = "adaptive", value_enum)]
        filter: FilterArg,
    },

    /// Reconstruct a stream and report per-filter row counts
    #[command(visible_alias = "i")]
    Info {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        width: u32,

        #[arg(short = 'H', long)]
        height: u32,

        #[arg(short, long, value_enum)]
        format: FormatArg,
    },

    /// List supported pixel formats
    #[command(visible_alias = "l")]
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Packed samples, 16-bit values in host byte order
    Raw,
    /// Netpbm (P5/P6 or P7 for alpha layouts)
    Pnm,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Grey8,
    Grey16,
    GreyAlpha8,
    GreyAlpha16,
    Rgb8,
    Rgb16,
    Rgba8,
    Rgba16,
}

impl From<FormatArg> for PixelFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Grey8 => PixelFormat::Grey8,
            FormatArg::Grey16 => PixelFormat::Grey16,
            FormatArg::GreyAlpha8 => PixelFormat::GreyAlpha8,
            FormatArg::GreyAlpha16 => PixelFormat::GreyAlpha16,
            FormatArg::Rgb8 => PixelFormat::Rgb8,
            FormatArg::Rgb16 => PixelFormat::Rgb16,
            FormatArg::Rgba8 => PixelFormat::Rgba8,
            FormatArg::Rgba16 => PixelFormat::Rgba16,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterArg {
    None,
    Sub,
    Up,
    Average,
    Paeth,
    Adaptive,
}

impl From<FilterArg> for FilterStrategy {
    fn from(f: FilterArg) -> Self {
        match f {
            FilterArg::None => FilterStrategy::Fixed(FilterType::None),
            FilterArg::Sub => FilterStrategy::Fixed(FilterType::Sub),
            FilterArg::Up => FilterStrategy::Fixed(FilterType::Up),
            FilterArg::Average => FilterStrategy::Fixed(FilterType::Average),
            FilterArg::Paeth => FilterStrategy::Fixed(FilterType::Paeth),
            FilterArg::Adaptive => FilterStrategy::Adaptive,
        }
    }
}

fn log_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn init_logging(verbose: u8) {
    env_logger::Builder::from_default_env()
        .filter_level(log_level(verbose))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Decode {
            input,
            output,
            width,
            height,
            format,
            output_format,
        } => decode_stream(
            &input,
            &output,
            BitmapRegion::new(width, height),
            format.into(),
            output_format,
        ),
        Commands::Encode {
            input,
            output,
            width,
            height,
            format,
            filter,
        } => encode_pixels(
            &input,
            &output,
            BitmapRegion::new(width, height),
            format.into(),
            filter,
        ),
        Commands::Info {
            input,
            width,
            height,
            format,
        } => show_info(&input, BitmapRegion::new(width, height), format.into()),
        Commands::List => list_formats(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn decode_stream(
    input: &PathBuf,
    output: &PathBuf,
    region: BitmapRegion,
    format: PixelFormat,
    output_format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let mut decoder = FrameDecoder::new(SliceSource::new(&data), region, format)?;

    match output_format {
        OutputFormat::Raw => {
            let bytes = decoder.decode_to_bytes()?;
            fs::write(output, &bytes)?;
        }
        OutputFormat::Pnm => {
            let count = region.pixel_count().ok_or("region too large")?;
            let mut pixels = vec![Pixel::default(); count];
            decoder.decode(&mut pixels)?;
            write_pnm(output, &pixels, region, format)?;
        }
    }

    println!(
        "✓ Reconstructed {}x{} {} image to {:?}",
        region.width(),
        region.height(),
        format.name(),
        output
    );
    Ok(())
}

fn encode_pixels(
    input: &PathBuf,
    output: &PathBuf,
    region: BitmapRegion,
    format: PixelFormat,
    filter: FilterArg,
) -> Result<(), Box<dyn std::error::Error>> {
    let pixels = fs::read(input)?;
    let encoder = FrameEncoder::new(EncoderOptions {
        strategy: filter.into(),
    });
    let encoded = encoder.encode(&pixels, region, format)?;
    fs::write(output, &encoded)?;
    println!(
        "✓ Filtered {}x{} {} image to {:?} ({:?})",
        region.width(),
        region.height(),
        format.name(),
        output,
        filter
    );
    Ok(())
}

fn show_info(
    input: &PathBuf,
    region: BitmapRegion,
    format: PixelFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let mut decoder = FrameDecoder::new(SliceSource::new(&data), region, format)?;
    while decoder.next_row()?.is_some() {}

    println!("File: {:?}", input);
    println!("Size: {} bytes", data.len());
    println!();
    println!("  Dimensions: {}x{}", region.width(), region.height());
    println!("  Format:     {}", format.name());
    println!("  Row bytes:  {}", decoder.row_bytes());
    println!("  Rows:       {}", decoder.rows_decoded());
    for (filter, count) in FilterType::ALL.iter().zip(decoder.filter_counts()) {
        println!("    {:<8} {}", filter.name(), count);
    }
    let trailing = decoder.into_source().remaining().len();
    if trailing > 0 {
        println!("  Trailing:   {} bytes", trailing);
    }
    Ok(())
}

fn list_formats() -> Result<(), Box<dyn std::error::Error>> {
    println!("Supported pixel formats:");
    println!();
    for format in PixelFormat::ALL {
        println!(
            "  {:<14} {} sample(s) x {} byte(s) = {} bytes/pixel",
            format.name(),
            format.sample_count(),
            format.sample_width(),
            format.bytes_per_pixel()
        );
    }
    println!();
    println!("Filters: None (0), Sub (1), Up (2), Average (3), Paeth (4)");
    Ok(())
}

fn write_pnm(
    path: &PathBuf,
    pixels: &[Pixel],
    region: BitmapRegion,
    format: PixelFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = fs::File::create(path)?;
    let maxval = if format.sample_width() == 2 { 65535 } else { 255 };

    match format.sample_count() {
        1 => writeln!(file, "P5\n{} {}\n{}", region.width(), region.height(), maxval)?,
        3 => writeln!(file, "P6\n{} {}\n{}", region.width(), region.height(), maxval)?,
        depth => {
            let tuple_type = if depth == 2 { "GRAYSCALE_ALPHA" } else { "RGB_ALPHA" };
            writeln!(file, "P7")?;
            writeln!(file, "WIDTH {}", region.width())?;
            writeln!(file, "HEIGHT {}", region.height())?;
            writeln!(file, "DEPTH {}", depth)?;
            writeln!(file, "MAXVAL {}", maxval)?;
            writeln!(file, "TUPLTYPE {}", tuple_type)?;
            writeln!(file, "ENDHDR")?;
        }
    }

    // Netpbm stores 16-bit samples big-endian, same as the wire order.
    let mut body = Vec::with_capacity(pixels.len() * format.bytes_per_pixel());
    for p in pixels {
        p.write_wire(&mut body);
    }
    file.write_all(&body)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_maps_to_level() {
        assert_eq!(log_level(0), log::LevelFilter::Warn);
        assert_eq!(log_level(1), log::LevelFilter::Debug);
        assert_eq!(log_level(2), log::LevelFilter::Trace);
        assert_eq!(log_level(9), log::LevelFilter::Trace);
    }

    #[test]
    fn test_verbose_flag_is_global() {
        let cli = Cli::try_parse_from(["rowfilter", "list", "-vv"]).expect("parse");
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::List));
    }
}
