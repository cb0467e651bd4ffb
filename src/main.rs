use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use sukashi::{Editor, FitMode, WatermarkOptions};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print dimensions and MIME type of an image
    Info { file: PathBuf },

    /// Generate a thumbnail
    Thumb {
        input: PathBuf,
        output: PathBuf,

        #[arg(short = 'W', long, default_value_t = 300)]
        width: u32,

        #[arg(short = 'H', long, default_value_t = 300)]
        height: u32,

        /// Fit mode: contain, cover, scale-down, fill or none
        #[arg(short, long, default_value = "cover")]
        mode: String,

        /// Target format extension, e.g. jpg or png
        #[arg(short, long, default_value = "jpg")]
        format: String,

        #[arg(short, long, default_value_t = 90)]
        quality: u8,
    },

    /// Overlay a repeating rotated text watermark
    Watermark {
        input: PathBuf,
        output: PathBuf,

        /// Watermark text
        text: String,

        #[arg(long)]
        font_file: Option<PathBuf>,

        #[arg(long, default_value_t = 36.0)]
        font_size: f32,

        /// Watermark opacity, 0.0 (invisible) to 1.0 (solid)
        #[arg(long, default_value_t = 0.2)]
        opacity: f32,

        /// Rotation in degrees, counter-clockwise
        #[arg(long, default_value_t = 30.0)]
        rotate: f64,

        /// Horizontal spacing between tiles in pixels
        #[arg(long, default_value_t = 100)]
        gap_x: u32,

        /// Vertical spacing between tiles in pixels
        #[arg(long, default_value_t = 20)]
        gap_y: u32,

        #[arg(short, long, default_value_t = 90)]
        quality: u8,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Info { file } => {
            let info = Editor::open(&file)?.info();
            println!("{} {}x{} {}", file.display(), info.width, info.height, info.mime);
        }
        Commands::Thumb {
            input,
            output,
            width,
            height,
            mode,
            format,
            quality,
        } => {
            let mode: FitMode = mode.parse()?;
            Editor::open(&input)?
                .thumb(width, height, mode, &format)?
                .save_as(&output, quality)?;
            info!("wrote thumbnail to {}", output.display());
        }
        Commands::Watermark {
            input,
            output,
            text,
            font_file,
            font_size,
            opacity,
            rotate,
            gap_x,
            gap_y,
            quality,
        } => {
            let mut options = WatermarkOptions {
                font_size,
                rotate,
                gap: (gap_x, gap_y),
                ..WatermarkOptions::default()
            };
            if let Some(font_file) = font_file {
                options.font_file = font_file;
            }
            options.font_color[3] = (opacity.clamp(0.0, 1.0) * 255.0) as u8;

            Editor::open(&input)?
                .add_repeat_text_watermark(&text, &options)?
                .save_as(&output, quality)?;
            info!("wrote watermarked image to {}", output.display());
        }
    }

    Ok(())
}
