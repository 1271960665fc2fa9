//! # Paperang CLI
//!
//! Command-line interface for Paperang pocket thermal printers.
//!
//! ## Usage
//!
//! ```bash
//! # Print an image (threshold) and feed one line
//! paperang --address 00:15:83:12:34:56 print cat.png
//!
//! # Dithered, with more feed
//! paperang print --dither --feed 3 photo.jpg
//!
//! # Outlines only
//! paperang print --edge photo.jpg
//!
//! # Preview the encoded bitmap without a printer
//! paperang print --png preview.png photo.jpg
//!
//! # Printer housekeeping
//! paperang self-test
//! paperang set density 80
//! paperang query battery
//! ```
//!
//! The address may also come from `PAPERANG_ADDRESS` or the settings file.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use paperang::{
    PaperangError, Printer, Settings,
    hooks::Hooks,
    raster::{self, Bitmap, Conversion},
};

/// Paperang - Pocket thermal printer utility
#[derive(Parser, Debug)]
#[command(name = "paperang")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON settings file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Bluetooth address of the printer (XX:XX:XX:XX:XX:XX)
    #[arg(short, long, global = true, env = "PAPERANG_ADDRESS")]
    address: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print an image file
    Print {
        /// Image to print
        image: PathBuf,

        /// Use Atkinson dithering instead of a threshold
        #[arg(short, long)]
        dither: bool,

        /// Print only the image's edge outlines
        #[arg(short, long, conflicts_with = "dither")]
        edge: bool,

        /// Lines fed after printing
        #[arg(short, long)]
        feed: Option<u16>,

        /// Print width in dots
        #[arg(long, value_parser = clap::value_parser!(u16).range(8..))]
        width: Option<u16>,

        /// Heat density to set before printing
        #[arg(long)]
        density: Option<u8>,

        /// Save the encoded bitmap as PNG instead of printing
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,
    },

    /// Print the printer's self-test page
    SelfTest,

    /// Feed paper
    Feed {
        /// Dot lines to feed
        lines: f32,

        /// Interpret the amount as millimeters
        #[arg(long)]
        mm: bool,
    },

    /// Feed paper up to the print head
    FeedToHead {
        lines: u16,
    },

    /// Change a printer setting
    Set {
        setting: Setting,
        value: u16,
    },

    /// Read a value from the printer and print the raw reply
    Query {
        value: Query,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Setting {
    Density,
    PaperType,
    PowerOff,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Query {
    Battery,
    Density,
    PowerOff,
    Serial,
    Hardware,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), PaperangError> {
    let cli = Cli::parse();
    let mut settings = Settings::load_or_default(cli.config.as_deref())?;
    if cli.address.is_some() {
        settings.address = cli.address;
    }

    match cli.command {
        Commands::Print {
            image,
            dither,
            edge,
            feed,
            width,
            density,
            png,
        } => {
            if let Some(width) = width {
                settings.width = width;
            }
            if let Some(feed) = feed {
                settings.feed = feed;
            }
            if density.is_some() {
                settings.density = density;
            }
            let conversion = if dither {
                Conversion::Dither
            } else if edge {
                Conversion::Edge
            } else {
                Conversion::Threshold
            };

            if let Some(png) = png {
                let config = settings.printer_config();
                let bitmap = raster::encode_image(
                    &raster::load_image(&image)?,
                    config.width_dots as u32,
                    conversion,
                );
                save_png(&png, &bitmap)?;
                println!("Saved to {}", png.display());
                return Ok(());
            }

            let mut printer = connect(&settings)?;
            printer.print_image(&image, conversion)?;
            printer.session_mut().feed_line(settings.feed)?;
            printer.disconnect();
            println!(
                "Successfully sent {} to the printer{}. Feed lines: {}.",
                image.display(),
                match conversion {
                    Conversion::Dither => " with dithered processing",
                    Conversion::Edge => " as edge outlines",
                    Conversion::Threshold => "",
                },
                settings.feed
            );

            if let Some(dir) = &settings.hooks_dir {
                let failed = Hooks::discover(dir)?.run_all();
                if failed > 0 {
                    return Err(PaperangError::Hook(format!("{} hook(s) failed", failed)));
                }
            }
        }

        Commands::SelfTest => {
            connect(&settings)?.print_self_test()?;
        }

        Commands::Feed { lines, mm } => {
            let mut printer = connect(&settings)?;
            let lines = if mm {
                printer.config().mm_to_dots(lines)
            } else {
                lines.round() as u16
            };
            printer.session_mut().feed_line(lines)?;
        }

        Commands::FeedToHead { lines } => {
            connect(&settings)?.session_mut().feed_to_head_line(lines)?;
        }

        Commands::Set { setting, value } => {
            let mut printer = connect(&settings)?;
            let session = printer.session_mut();
            let reply = match setting {
                Setting::Density => session.set_heat_density(narrow(value)?)?,
                Setting::PaperType => session.set_paper_type(narrow(value)?)?,
                Setting::PowerOff => session.set_power_off_time(value)?,
            };
            println!("{}", hex(&reply));
        }

        Commands::Query { value } => {
            let mut printer = connect(&settings)?;
            let session = printer.session_mut();
            let reply = match value {
                Query::Battery => session.query_battery_status()?,
                Query::Density => session.query_heat_density()?,
                Query::PowerOff => session.query_power_off_time()?,
                Query::Serial => session.query_serial_number()?,
                Query::Hardware => session.query_hardware_info()?,
            };
            println!("{}", hex(&reply));
        }
    }

    Ok(())
}

/// Connect and apply the persistent settings from the file.
fn connect(settings: &Settings) -> Result<Printer, PaperangError> {
    let mut printer = Printer::new(settings.address.clone(), settings.printer_config())
        .with_paper_type(settings.paper_type);
    printer.connect()?;

    if let Some(density) = settings.density {
        printer.session_mut().set_heat_density(density)?;
    }
    if let Some(time) = settings.power_off {
        printer.session_mut().set_power_off_time(time)?;
    }
    info!("Printer ready.");
    Ok(printer)
}

fn narrow(value: u16) -> Result<u8, PaperangError> {
    u8::try_from(value)
        .map_err(|_| PaperangError::Settings(format!("{} does not fit in one byte", value)))
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" ")
}

/// Save a bitmap as a black and white PNG
fn save_png(path: &Path, bitmap: &Bitmap) -> Result<(), PaperangError> {
    use image::{GrayImage, Luma};

    let width_bytes = bitmap.width_bytes();
    let img = GrayImage::from_fn(bitmap.width as u32, bitmap.height as u32, |x, y| {
        let byte = bitmap.data[y as usize * width_bytes + x as usize / 8];
        let is_black = (byte >> (7 - x % 8)) & 1 == 1;
        Luma([if is_black { 0u8 } else { 255u8 }])
    });

    img.save(path)
        .map_err(|e| PaperangError::Image(format!("Failed to save PNG: {}", e)))?;

    Ok(())
}
