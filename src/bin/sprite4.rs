use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sprite4", version)]
struct Cli {
    /// Log codec and compositor details to stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the header of an SP4 file.
    Info(InfoArgs),
    /// Convert between SP4 and PPM (chosen by file extension).
    Convert(ConvertArgs),
    /// Resize every frame of an SP4 file.
    Scale(ScaleArgs),
    /// Darken every frame of an SP4 file.
    Fade(FadeArgs),
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input SP4 path.
    path: PathBuf,

    /// Print JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input `.sp4` or `.ppm` path.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output `.sp4` or `.ppm` path.
    #[arg(long)]
    out: PathBuf,

    /// Write ASCII (`P3`) instead of binary (`P6`) PPM.
    #[arg(long, default_value_t = false)]
    ascii: bool,
}

#[derive(Parser, Debug)]
struct ScaleArgs {
    /// Input SP4 path.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output SP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Scale factor (> 0).
    #[arg(long)]
    factor: f32,
}

#[derive(Parser, Debug)]
struct FadeArgs {
    /// Input SP4 path.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output SP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Fade amount in percent (1..=100).
    #[arg(long)]
    alpha: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FileKind {
    Sp4,
    Ppm,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Convert(args) => cmd_convert(args),
        Command::Scale(args) => cmd_scale(args),
        Command::Fade(args) => cmd_fade(args),
    }
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let info = sprite4::load_sp4_info(&args.path)
        .with_context(|| format!("read SP4 header '{}'", args.path.display()))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("size: {}x{}", info.width, info.height);
        println!("frames: {}", info.frame_count);
        println!("durations: {:?}", info.durations);
        println!("default durations: {}", info.has_default_durations);
    }
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let buf = match file_kind(&args.in_path)? {
        FileKind::Sp4 => sprite4::load_sp4_buffer(&args.in_path, sprite4::PixelFormat::Rgba8),
        FileKind::Ppm => sprite4::load_ppm(&args.in_path),
    }
    .with_context(|| format!("read '{}'", args.in_path.display()))?;

    let written = match file_kind(&args.out)? {
        FileKind::Sp4 => sprite4::save_sp4_buffer(&args.out, &buf),
        FileKind::Ppm => {
            let encoding = if args.ascii {
                sprite4::PpmEncoding::Ascii
            } else {
                sprite4::PpmEncoding::Binary
            };
            sprite4::save_ppm(&args.out, &buf, encoding)
        }
    };
    written.with_context(|| format!("write '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_scale(args: ScaleArgs) -> anyhow::Result<()> {
    let spr = sprite4::load_sp4_sprite(&args.in_path)
        .with_context(|| format!("read SP4 '{}'", args.in_path.display()))?;
    let scaled = sprite4::scale_sprite(&spr, args.factor)
        .with_context(|| format!("scale by {}", args.factor))?;
    sprite4::save_sp4_sprite(&args.out, &scaled)
        .with_context(|| format!("write SP4 '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        scaled.width(),
        scaled.height()
    );
    Ok(())
}

fn cmd_fade(args: FadeArgs) -> anyhow::Result<()> {
    let mut spr = sprite4::load_sp4_sprite(&args.in_path)
        .with_context(|| format!("read SP4 '{}'", args.in_path.display()))?;
    for frame in 0..spr.frame_count() {
        spr.set_current_frame(frame);
        sprite4::fade_sprite(&mut spr, args.alpha)
            .with_context(|| format!("fade frame {frame}"))?;
    }
    spr.set_current_frame(0);
    sprite4::save_sp4_sprite(&args.out, &spr)
        .with_context(|| format!("write SP4 '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn file_kind(path: &Path) -> anyhow::Result<FileKind> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("sp4") => Ok(FileKind::Sp4),
        Some("ppm") => Ok(FileKind::Ppm),
        _ => anyhow::bail!(
            "unsupported file type '{}' (expected .sp4 or .ppm)",
            path.display()
        ),
    }
}
