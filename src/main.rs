// SPDX-License-Identifier: MIT
//
// artloop — a looping ASCII-art animation with a prompt under it.
//
// This is the binary that wires the crates together:
//
//   artloop-art  → scaling, coloring, frame cache
//   artloop-term → raw mode, resize signal, key parsing, output
//
// Startup resolves configuration (file → environment → flags), loads the
// frames, and hands the terminal to the render loop. When the loop ends
// the terminal is restored first; only then does a submitted command run
// in the user's shell, whose exit code becomes ours.

mod config;
mod frames;
mod logging;
mod panel;
mod prompt;
mod render_loop;
mod shell;

use std::io::Write;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, bail};
use artloop_art::LazyFrameCache;
use artloop_term::terminal;
use clap::Parser;

use crate::config::Config;
use crate::render_loop::{LoopSettings, Outcome, RenderLoop, TtyConsole};

#[derive(Parser, Debug)]
#[command(name = "artloop", version, about = "Looping ASCII-art animation with a shell prompt")]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/artloop/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Frames file, frames separated by `%%` lines
    #[arg(long, value_name = "PATH")]
    frames: Option<PathBuf>,

    /// Frames per second (≤ 0 uses a 50 ms delay)
    #[arg(long, allow_negative_numbers = true)]
    fps: Option<i32>,

    /// Disable all color
    #[arg(long)]
    no_color: bool,

    /// Hide the info panel
    #[arg(long)]
    no_panel: bool,

    /// Write logs to this file (filter with ARTLOOP_LOG)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Render one frame to stdout and exit
    #[arg(long, value_name = "INDEX")]
    print_frame: Option<usize>,

    /// Width for --print-frame (default: terminal width)
    #[arg(long, requires = "print_frame")]
    width: Option<usize>,

    /// Height for --print-frame (default: terminal height - 1)
    #[arg(long, requires = "print_frame")]
    height: Option<usize>,
}

impl Cli {
    /// Flags win over the file and the environment.
    fn apply(&self, config: &mut Config) {
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(frames) = &self.frames {
            config.frames = Some(frames.clone());
        }
        if self.no_color {
            config.colors.enabled = false;
        }
        if self.no_panel {
            config.panel.enabled = false;
        }
    }
}

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("artloop: {e:#}");
            process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.log_file.as_deref())?;

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env()?;
    cli.apply(&mut config);
    tracing::info!(fps = config.fps, frames = ?config.frames, "starting");

    let frames = frames::load(config.frames.as_deref())?;

    if let Some(index) = cli.print_frame {
        print_frame(&frames, &config, index, cli.width, cli.height)?;
        return Ok(0);
    }

    if !terminal::is_tty() {
        bail!("stdin is not a terminal (use --print-frame to render without one)");
    }
    animate(&frames, &config)
}

/// Run the animation; then run the submitted command, if any.
fn animate(frames: &[String], config: &Config) -> Result<i32> {
    let settings = LoopSettings {
        fps: config.fps,
        colors: config.color_preferences(),
        prompt_symbol: config.prompt.symbol.clone(),
        panel_enabled: config.panel.enabled,
        panel_title: config.panel.title.clone(),
    };
    let info = panel::collect(terminal::size_or_fallback(), frames.len(), config.fps);

    let console = TtyConsole::open().context("failed to set up the terminal")?;
    let mut render = RenderLoop::new(console, frames, info, settings);
    let result = render.run();
    let restored = render.into_console().close();

    let outcome = result.context("render loop failed")?;
    restored.context("failed to restore the terminal")?;

    match outcome {
        Outcome::Command(line) if !line.trim().is_empty() => shell::run(&config.shell(), &line),
        Outcome::Command(_) | Outcome::Quit => Ok(0),
    }
}

/// Scale and color one frame for a `width` × `height` target and print it.
fn print_frame(
    frames: &[String],
    config: &Config,
    index: usize,
    width: Option<usize>,
    height: Option<usize>,
) -> Result<()> {
    if index >= frames.len() {
        bail!("frame {index} out of range ({} frames)", frames.len());
    }
    let size = terminal::size_or_fallback();
    let width = width.unwrap_or_else(|| usize::from(size.cols));
    let height = height.unwrap_or_else(|| usize::from(size.rows).saturating_sub(1).max(1));

    let mut cache = LazyFrameCache::new(frames, width, height, config.color_preferences());
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", cache.get(index)).context("failed to write frame")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_parses_all_flags() {
        let cli = Cli::try_parse_from([
            "artloop",
            "--fps",
            "-1",
            "--no-color",
            "--no-panel",
            "--print-frame",
            "2",
            "--width",
            "40",
            "--height",
            "10",
        ])
        .unwrap();
        assert_eq!(cli.fps, Some(-1));
        assert_eq!(cli.print_frame, Some(2));
        assert_eq!((cli.width, cli.height), (Some(40), Some(10)));
    }

    #[test]
    fn width_requires_print_frame() {
        assert!(Cli::try_parse_from(["artloop", "--width", "40"]).is_err());
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from(["artloop", "--fps", "5", "--frames", "/x.frames", "--no-color"]).unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.fps, 5);
        assert_eq!(config.frames, Some(PathBuf::from("/x.frames")));
        assert!(!config.colors.enabled);
        assert!(config.panel.enabled);
    }

    #[test]
    fn print_frame_rejects_bad_index() {
        let frames = vec!["x".to_owned()];
        let err = print_frame(&frames, &Config::default(), 1, Some(2), Some(2)).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
