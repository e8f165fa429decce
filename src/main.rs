//! gitmd - A terminal markdown editor with a live, sanitized HTML preview.
//!
//! # Usage
//!
//! ```bash
//! gitmd                      # restore the last session
//! gitmd notes.md             # open a file
//! gitmd --output preview.html notes.md
//! gitmd --export notes.md > notes.html
//! ```

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use gitmd::app::{App, export_html};
use gitmd::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use gitmd::highlight::{HighlightBackground, background_from_colorfgbg, detect_background};

/// A terminal markdown editor with live HTML preview
#[derive(Parser, Debug)]
#[command(name = "gitmd", version, about, long_about = None)]
struct Cli {
    /// Markdown file to open instead of the last session
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Syntax highlight theme background (light or dark)
    #[arg(long, value_enum, default_value = "auto")]
    theme: ThemeMode,

    /// Mirror the preview into this HTML page (or write --export output here)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Snapshot store file
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Render frame interval in milliseconds
    #[arg(long, value_name = "MS")]
    frame_ms: Option<u64>,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Keep the snapshot in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Render FILE once to HTML and exit
    #[arg(long, requires = "file")]
    export: bool,

    /// Save current command-line flags as defaults in .gitmdrc
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in .gitmdrc
    #[arg(long)]
    clear: bool,
}

// Query the terminal background using OSC 11.
// We talk to /dev/tty so the terminal responds even when stdout is piped.
#[cfg(not(unix))]
fn query_terminal_background() -> std::io::Result<Option<(u8, u8, u8)>> {
    Ok(None)
}

#[cfg(unix)]
fn query_terminal_background() -> std::io::Result<Option<(u8, u8, u8)>> {
    use std::io::Read;
    use std::sync::mpsc;

    let (tx, rx) = mpsc::channel();

    let mut io = OpenOptions::new().read(true).write(true).open("/dev/tty")?;
    let reader = io.try_clone()?;

    // OSC 11 query: ESC ] 11 ; ? BEL
    io.write_all(b"\x1b]11;?\x07")?;
    io.flush()?;

    std::thread::spawn(move || {
        let mut reader = reader;
        let mut buf = [0u8; 256];
        let mut collected: Vec<u8> = Vec::new();
        loop {
            match reader.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    collected.extend_from_slice(&buf[..n]);
                    if collected.contains(&b'\x07') || collected.windows(2).any(|w| w == b"\x1b\\")
                    {
                        let _ = tx.send(collected);
                        break;
                    }
                }
            }
        }
    });

    let reply = rx
        .recv_timeout(Duration::from_millis(75))
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
    Ok(reply.as_deref().and_then(parse_osc11_reply))
}

fn theme_from_rgb(r: u8, g: u8, b: u8) -> HighlightBackground {
    let luma = 0.0722f32.mul_add(
        f32::from(b),
        0.2126f32.mul_add(f32::from(r), 0.7152 * f32::from(g)),
    );
    if luma >= 140.0 {
        HighlightBackground::Light
    } else {
        HighlightBackground::Dark
    }
}

fn parse_osc11_reply(reply: &str) -> Option<(u8, u8, u8)> {
    // Expect: ESC ] 11 ; rgb:RRRR/GGGG/BBBB BEL or ST
    let start = reply.find("rgb:")?;
    let data = &reply[start + 4..];
    let mut parts = data.split(['/', '\x07', '\x1b']);
    let r = parts.next()?;
    let g = parts.next()?;
    let b = parts.next()?;
    Some((
        parse_osc_component(r)?,
        parse_osc_component(g)?,
        parse_osc_component(b)?,
    ))
}

fn parse_osc_component(s: &str) -> Option<u8> {
    let hex = s.trim();
    if hex.len() >= 4 {
        let v = u16::from_str_radix(&hex[..4], 16).ok()?;
        u8::try_from(v >> 8).ok()
    } else if hex.len() == 2 {
        u8::from_str_radix(hex, 16).ok()
    } else {
        None
    }
}

// A usable COLORFGBG skips the OSC 11 query. A terminal that never answers
// leaves the reader thread blocked on /dev/tty until the process exits.
fn resolve_background(
    mode: ThemeMode,
    interactive: bool,
    colorfgbg: Option<&str>,
) -> HighlightBackground {
    let hint = colorfgbg.and_then(background_from_colorfgbg);
    match (mode, hint) {
        (ThemeMode::Auto, Some(hint)) => hint,
        (ThemeMode::Auto, None) if interactive => {
            let _raw = enable_raw_mode();
            let detected = query_terminal_background();
            let _ = disable_raw_mode();
            detected
                .ok()
                .flatten()
                .map_or_else(detect_background, |(r, g, b)| theme_from_rgb(r, g, b))
        }
        (mode, _) => mode.background(),
    }
}

/// `RUST_LOG` directives, defaulting to WARN when none are given.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives.unwrap_or_default())
}

/// Logs go to the log file when one is configured. Without one, the TUI
/// discards them (the terminal is in raw mode) and `--export` uses stderr.
fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let writer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None if interactive => BoxMakeWriter::new(std::io::sink),
        None => BoxMakeWriter::new(std::io::stderr),
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(
            std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        ))
        .with_ansi(log_file.is_none() && !interactive)
        .with_writer(writer)
        .init();
    Ok(())
}

fn export(source_path: &Path, output: Option<&Path>, background: HighlightBackground) -> Result<()> {
    let bytes = std::fs::read(source_path)
        .with_context(|| format!("Failed to read {}", source_path.display()))?;
    let page = export_html(&String::from_utf8_lossy(&bytes), background)?;
    match output {
        Some(path) => {
            let mut file =
                File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            file.write_all(page.as_bytes())?;
        }
        None => std::io::stdout().lock().write_all(page.as_bytes())?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let interactive = !cli.export;
    let log_file = effective
        .log_file
        .clone()
        .or_else(|| std::env::var_os("GITMD_LOG").map(PathBuf::from));
    init_tracing(log_file.as_deref(), interactive)?;

    let background = resolve_background(
        effective.theme.unwrap_or(ThemeMode::Auto),
        interactive,
        std::env::var("COLORFGBG").ok().as_deref(),
    );

    if cli.export {
        let Some(source) = cli.file.as_deref() else {
            anyhow::bail!("--export needs a FILE to render");
        };
        return export(source, effective.output.as_deref(), background);
    }

    if let Some(path) = cli.file.as_deref()
        && !path.is_file()
    {
        anyhow::bail!("File not found: {}", path.display());
    }

    let app = App::new()
        .with_file(cli.file)
        .with_store_path(Some(effective.store_path()))
        .with_ephemeral(effective.ephemeral)
        .with_page_output(effective.output.clone())
        .with_background(background)
        .with_frame_ms(effective.frame_ms());

    app.run().context("Application error")
}
