//! Saved command-line defaults and platform paths.
//!
//! Defaults are stored as flags, one `--flag=value` per line, in a global
//! config file and an optional `.gitmdrc` in the working directory. Flags are
//! merged global, then local, then command line, with later sources winning.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::highlight::{HighlightBackground, detect_background};
use crate::scheduler::DEFAULT_FRAME_MS;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    /// Resolve to a concrete background, detecting it for [`ThemeMode::Auto`].
    pub fn background(self) -> HighlightBackground {
        match self {
            Self::Auto => detect_background(),
            Self::Light => HighlightBackground::Light,
            Self::Dark => HighlightBackground::Dark,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub ephemeral: bool,
    pub theme: Option<ThemeMode>,
    pub output: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub frame_ms: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            ephemeral: self.ephemeral || other.ephemeral,
            theme: other.theme.or(self.theme),
            output: other.output.clone().or_else(|| self.output.clone()),
            store: other.store.clone().or_else(|| self.store.clone()),
            frame_ms: other.frame_ms.or(self.frame_ms),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }

    pub fn frame_ms(&self) -> u64 {
        self.frame_ms.unwrap_or(DEFAULT_FRAME_MS)
    }

    pub fn store_path(&self) -> PathBuf {
        self.store.clone().unwrap_or_else(default_store_path)
    }
}

/// Platform data directory for gitmd, falling back to the working directory.
fn data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("gitmd");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("gitmd");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("gitmd");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".local").join("share").join("gitmd");
        }
    }

    PathBuf::from(".gitmd")
}

pub fn global_config_path() -> PathBuf {
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("gitmd").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("gitmd").join("config");
        }
        PathBuf::from(".gitmdrc")
    }

    #[cfg(any(target_os = "windows", target_os = "macos"))]
    {
        data_dir().join("config")
    }
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".gitmdrc")
}

/// Where the snapshot store lives unless `--store` says otherwise.
pub fn default_store_path() -> PathBuf {
    data_dir().join("storage.json")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(line_tokens)
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

// One flag per line; everything after the flag name is its value, so paths
// may contain spaces.
fn line_tokens(line: &str) -> Vec<String> {
    match line.find(|c: char| c == '=' || c.is_whitespace()) {
        Some(at) => {
            let (name, rest) = line.split_at(at);
            let value = rest.strip_prefix('=').unwrap_or(rest).trim();
            if value.is_empty() {
                vec![name.to_string()]
            } else {
                vec![name.to_string(), value.to_string()]
            }
        }
        None => vec![line.to_string()],
    }
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# gitmd defaults (saved with --save)".to_string()];
    if flags.ephemeral {
        lines.push("--ephemeral".to_string());
    }
    if let Some(theme) = flags.theme {
        let theme_str = match theme {
            ThemeMode::Auto => "auto",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        };
        lines.push(format!("--theme={theme_str}"));
    }
    if let Some(path) = &flags.output {
        lines.push(format!("--output={}", path.display()));
    }
    if let Some(path) = &flags.store {
        lines.push(format!("--store={}", path.display()));
    }
    if let Some(frame_ms) = flags.frame_ms {
        lines.push(format!("--frame-ms={frame_ms}"));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file={}", path.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract the savable flags from raw argument tokens. Unknown tokens are ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        let takes_value = matches!(
            name,
            "--theme" | "--output" | "--store" | "--frame-ms" | "--log-file"
        );
        let value = if takes_value && inline_value.is_none() {
            i += 1;
            tokens.get(i).map(String::as_str)
        } else {
            inline_value
        };

        match (name, value) {
            ("--ephemeral", None) => flags.ephemeral = true,
            ("--theme", Some(v)) => flags.theme = parse_theme(v),
            ("--output", Some(v)) => flags.output = Some(PathBuf::from(v)),
            ("--store", Some(v)) => flags.store = Some(PathBuf::from(v)),
            ("--frame-ms", Some(v)) => flags.frame_ms = v.parse().ok(),
            ("--log-file", Some(v)) => flags.log_file = Some(PathBuf::from(v)),
            _ => {}
        }
        i += 1;
    }
    flags
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "auto" => Some(ThemeMode::Auto),
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}
