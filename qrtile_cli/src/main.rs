use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use image::{Rgba, RgbaImage};
use tracing::{debug, info};

use qrtile_core::{BytesContent, Ecl, SecurityType, StringContent, Version, WifiContent};
use qrtile_encode::{Encoder, QrCode, SolidBlock};

#[derive(Parser)]
#[command(name = "qrtile")]
#[command(version)]
#[command(propagate_version = true)]
#[command(about = "Render QR codes in the terminal or as images", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    #[command(flatten)]
    style: Style,
    #[arg(long, global = true, default_value = "warn", help = "Log level, overridden by RUST_LOG")]
    log_level: tracing::Level,
}

#[derive(Subcommand)]
enum Command {
    /// Encode text as is.
    Text { text: String },
    /// Encode raw bytes as base64.
    Bytes {
        #[arg(help = "Input file or stdin if unspecified")]
        file: Option<PathBuf>,
    },
    /// Encode the credentials of a Wi-Fi network.
    Wifi {
        #[arg(long)]
        ssid: String,
        #[arg(long, help = "Password, omit for an open network")]
        password: Option<String>,
        #[arg(long, default_value = "wpa", value_parser = parse_security)]
        security: SecurityType,
        #[arg(long)]
        hidden: bool,
    },
}

#[derive(Args)]
struct Style {
    #[arg(long, global = true, value_enum, default_value_t = EclArg::H)]
    ecl: EclArg,
    #[arg(
        long,
        global = true,
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=40),
        help = "Force the QR version (1-40), 0 for automatic"
    )]
    qr_version: u8,
    #[arg(long, global = true, help = "Quiet zone size in modules")]
    margin: Option<usize>,
    #[arg(long, global = true, help = "Disable the quiet zone, whatever --margin says")]
    no_border: bool,
    #[arg(long, global = true)]
    invert: bool,
    #[arg(long, global = true, value_parser = parse_color, help = "Foreground color as RRGGBB[AA]")]
    fg: Option<Rgba<u8>>,
    #[arg(long, global = true, value_parser = parse_color, help = "Background color as RRGGBB[AA]")]
    bg: Option<Rgba<u8>>,
    #[arg(long, global = true, help = "Image drawn in place of every dark module (images only)")]
    block: Option<PathBuf>,
    #[arg(long, global = true, value_parser = parse_size, help = "Image size as WIDTHxHEIGHT (images only)")]
    size: Option<(u32, u32)>,
    #[arg(
        short,
        long,
        global = true,
        help = "Output file or stdout if unspecified",
        long_help = "Output file or stdout if unspecified. The output format is determined based on the extension. \
        Supported extensions are:\n\
        * text: .txt\n\
        * images: .png"
    )]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum EclArg {
    L,
    M,
    Q,
    H,
}

impl From<EclArg> for Ecl {
    fn from(value: EclArg) -> Self {
        match value {
            EclArg::L => Ecl::L,
            EclArg::M => Ecl::M,
            EclArg::Q => Ecl::Q,
            EclArg::H => Ecl::H,
        }
    }
}

enum Output {
    Stdout,
    Text(PathBuf),
    Png(PathBuf),
}

fn determine_output_kind(path: Option<PathBuf>) -> Result<Output> {
    let Some(path) = path else {
        return Ok(Output::Stdout);
    };
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("txt") => Ok(Output::Text(path)),
        Some("png") => Ok(Output::Png(path)),
        Some(invalid) => Err(anyhow::Error::msg(format!(
            "invalid output extension '{}'",
            invalid
        ))),
        None => Err(anyhow::Error::msg("requested output has no extension")),
    }
}

/// Reject image-only options when the output is text.
fn check_image_options(output: &Output, style: &Style) -> Result<()> {
    if matches!(output, Output::Png(_)) {
        return Ok(());
    }
    let image_only: Vec<&str> = [
        style.block.is_some().then_some("--block"),
        style.size.is_some().then_some("--size"),
    ]
    .into_iter()
    .flatten()
    .collect();
    if image_only.is_empty() {
        Ok(())
    } else {
        Err(anyhow::Error::msg(format!(
            "{} can only be used with a .png output",
            image_only.join(" and ")
        )))
    }
}

fn parse_security(s: &str) -> Result<SecurityType, String> {
    s.parse().map_err(|err| format!("{err}"))
}

fn parse_color(s: &str) -> Result<Rgba<u8>, String> {
    let hex = s.trim_start_matches('#');
    if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
        return Err(format!("'{s}' is not a RRGGBB or RRGGBBAA color"));
    }
    let channel = |k: usize| {
        u8::from_str_radix(&hex[2 * k..2 * k + 2], 16)
            .map_err(|_| format!("'{s}' is not a RRGGBB or RRGGBBAA color"))
    };
    let alpha = if hex.len() == 8 { channel(3)? } else { u8::MAX };
    Ok(Rgba([channel(0)?, channel(1)?, channel(2)?, alpha]))
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (width, height) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("'{s}' is not of the form WIDTHxHEIGHT"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|_| format!("'{s}' is not of the form WIDTHxHEIGHT"))
    };
    Ok((parse(width)?, parse(height)?))
}

fn configure(style: &Style) -> Encoder {
    let mut encoder = Encoder::new()
        .with_ecl(style.ecl.into())
        .with_border(!style.no_border)
        .inverted(style.invert);
    // Version 0 stands for automatic selection.
    if let Some(version) = Version::new(style.qr_version) {
        encoder = encoder.with_version(version);
    }
    if let Some(margin) = style.margin {
        encoder = encoder.with_margin(margin);
    }
    if let Some(fg) = style.fg {
        encoder = encoder.with_foreground(fg);
    }
    if let Some(bg) = style.bg {
        encoder = encoder.with_background(bg);
    }
    encoder
}

fn render_png(code: &QrCode, style: &Style) -> Result<RgbaImage> {
    let image = match &style.block {
        Some(path) => {
            let block = image::open(path)
                .with_context(|| format!("cannot open block image {}", path.display()))?
                .to_rgba8();
            match style.size {
                Some((width, height)) => code.to_resized_image_with_block(&block, width, height),
                None => code.to_image_with_block(&block),
            }
        }
        None => match style.size {
            Some((width, height)) => code.to_resized_image(width, height),
            None => code.to_image(),
        },
    };
    Ok(image)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(cli.log_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Before doing anything, make sure the requested output is valid.
    let output = determine_output_kind(cli.style.output.clone())?;
    check_image_options(&output, &cli.style)?;
    let encoder = configure(&cli.style);
    let encoder = match cli.command {
        Command::Text { text } => encoder.with_content(StringContent::new(text)),
        Command::Bytes { file } => {
            let mut bytes = Vec::new();
            match file {
                Some(path) => {
                    File::open(&path)
                        .with_context(|| format!("cannot open {}", path.display()))?
                        .read_to_end(&mut bytes)?;
                }
                None => {
                    std::io::stdin().read_to_end(&mut bytes)?;
                }
            };
            debug!(len = bytes.len(), "read input bytes");
            encoder.with_content(BytesContent::new(bytes))
        }
        Command::Wifi {
            ssid,
            password,
            security,
            hidden,
        } => {
            let wifi = match password {
                Some(password) => WifiContent::new(ssid, password, security, hidden),
                None => WifiContent::no_password(ssid, hidden),
            };
            encoder.with_content(wifi)
        }
    };
    let code = encoder.build()?;
    info!(width = code.width(), height = code.height(), "built QR code");

    match output {
        Output::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(code.to_small_string().as_bytes())?;
        }
        Output::Text(path) => {
            let f = File::create(&path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            let mut writer = BufWriter::new(f);
            writer.write_all(code.to_block_string(&SolidBlock).as_bytes())?;
            writer.flush()?;
        }
        Output::Png(path) => {
            render_png(&code, &cli.style)?
                .save(&path)
                .with_context(|| format!("cannot write {}", path.display()))?;
        }
    }
    Ok(())
}
