//! Colored status lines on stdout.
//!
//! Color is on when stdout is a TTY, unless `NO_COLOR` is set or the
//! `--color` flag overrides it.

use clap::ValueEnum;
use once_cell::sync::OnceCell;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

static COLOR_MODE: OnceCell<ColorMode> = OnceCell::new();

pub fn set_color_mode(mode: ColorMode) {
    let _ = COLOR_MODE.set(mode);
}

fn color_enabled_for(mode: ColorMode, no_color: bool, is_tty: bool) -> bool {
    if no_color {
        return false;
    }
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => is_tty,
    }
}

pub fn color_enabled_stdout() -> bool {
    color_enabled_for(
        COLOR_MODE.get().copied().unwrap_or_default(),
        std::env::var_os("NO_COLOR").is_some(),
        atty::is(atty::Stream::Stdout),
    )
}

/// Wrap `text` in an ANSI SGR sequence when `enabled`.
pub fn paint(enabled: bool, sgr: &str, text: &str) -> String {
    if enabled {
        format!("\x1b[{}m{}\x1b[0m", sgr, text)
    } else {
        text.to_string()
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Level {
    Info,
    Ok,
    Warn,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Info => "[INFO]",
            Level::Ok => "[OK]",
            Level::Warn => "[WARN]",
            Level::Error => "[ERROR]",
        }
    }

    fn sgr(self) -> &'static str {
        match self {
            Level::Info => "34;1",
            Level::Ok => "32;1",
            Level::Warn => "33;1",
            Level::Error => "31;1",
        }
    }
}

pub fn format_line(level: Level, msg: &str, color: bool) -> String {
    format!("{} {}", paint(color, level.sgr(), level.tag()), msg)
}

pub fn status(level: Level, msg: &str) {
    println!("{}", format_line(level, msg, color_enabled_stdout()));
}

pub fn info(msg: &str) {
    status(Level::Info, msg);
}

pub fn ok(msg: &str) {
    status(Level::Ok, msg);
}

pub fn warn(msg: &str) {
    status(Level::Warn, msg);
}

pub fn error(msg: &str) {
    status(Level::Error, msg);
}
