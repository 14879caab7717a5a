use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use word2pic::config::RenderMode;
use word2pic::popup::{EV_GENERATE, EV_INPUT, EV_SAVE, EV_SELECT_STYLE, EV_SUMMARIZE};
use word2pic::{AppConfig, Outcome, Popup, StyleProfile};

#[derive(Parser)]
#[command(name = "word2pic", version, about = "Render text onto styled PNG cards")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Render a card locally and save it
    Render {
        /// Text to render, or `-` to read stdin
        #[arg(short, long)]
        text: String,
        #[arg(short, long, default_value = "simple")]
        style: String,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        font_size: Option<u32>,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Summarize text with the remote provider
    Summarize {
        #[arg(short, long)]
        text: String,
    },
    /// Generate using the configured mode (local card or remote picture)
    Generate {
        #[arg(short, long)]
        text: String,
        #[arg(short, long, default_value = "simple")]
        style: String,
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// List the built-in styles
    Styles,
}

fn read_text(arg: &str) -> anyhow::Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read text from stdin")?;
    Ok(buf)
}

fn open_popup(config: AppConfig) -> anyhow::Result<Popup> {
    let mut popup = Popup::from_config(config).context("failed to set up popup")?;
    popup.open().context("failed to restore saved state")?;
    Ok(popup)
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Rendered { width, height, line_count } => {
            println!("rendered {}x{} ({} line(s))", width, height, line_count)
        }
        Outcome::Saved(path) => println!("{}", path.display()),
        Outcome::RemoteImage { url } => println!("{}", url),
        Outcome::Summarized(summary) => println!("{}", summary),
        other => log::debug!("{:?}", other),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env().context("invalid configuration")?;

    match cli.command {
        Cmd::Styles => {
            for p in StyleProfile::all() {
                println!(
                    "{:<10} bg {} text {} padding {:>2} {:?}",
                    p.id,
                    p.background.to_hex(),
                    p.text_color.to_hex(),
                    p.padding,
                    p.decoration
                );
            }
        }
        Cmd::Render { text, style, width, font_size, out } => {
            config.mode = RenderMode::Local;
            config.width = width.unwrap_or(config.width);
            config.font_size = font_size.unwrap_or(config.font_size);
            let mut popup = open_popup(config)?;
            popup.dispatch(EV_INPUT, Some(read_text(&text)?.as_str()))?;
            popup.dispatch(EV_SELECT_STYLE, Some(style.as_str()))?;
            report(&popup.dispatch(EV_GENERATE, None)?);
            report(&popup.dispatch(EV_SAVE, Some(out.to_string_lossy().as_ref()))?);
        }
        Cmd::Summarize { text } => {
            let mut popup = open_popup(config)?;
            popup.dispatch(EV_INPUT, Some(read_text(&text)?.as_str()))?;
            report(&popup.dispatch(EV_SUMMARIZE, None)?);
        }
        Cmd::Generate { text, style, out } => {
            let mut popup = open_popup(config)?;
            popup.dispatch(EV_INPUT, Some(read_text(&text)?.as_str()))?;
            popup.dispatch(EV_SELECT_STYLE, Some(style.as_str()))?;
            let outcome = popup.dispatch(EV_GENERATE, None)?;
            report(&outcome);
            match (popup.mode(), outcome) {
                (RenderMode::Local, Outcome::Rendered { .. }) => {
                    report(&popup.dispatch(EV_SAVE, Some(out.to_string_lossy().as_ref()))?);
                }
                (RenderMode::Remote, Outcome::RemoteImage { .. }) => {}
                (mode, other) => bail!("unexpected {:?} result in {:?} mode", other, mode),
            }
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run(Cli::parse()) {
        eprintln!("word2pic: {:#}", e);
        std::process::exit(1);
    }
}
