//! Line-oriented terminal front-end.
//!
//! Reads one command per line, applies it to a [`WorkflowController`] and
//! re-renders the view after every command.

use std::path::PathBuf;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;
use crate::commands::{CompressOutcome, WorkflowController};
use crate::processing::Compressor;
use crate::utils::load_payload;
use crate::view::render;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(PathBuf),
    Preset(String),
    Quality(u8),
    Compress,
    Download(Option<PathBuf>),
    Reset,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match verb.to_lowercase().as_str() {
            "open" if !rest.is_empty() => Ok(Self::Open(PathBuf::from(rest))),
            "open" => Err("usage: open <path>".to_string()),
            "preset" => Ok(Self::Preset(rest.to_string())),
            "quality" => rest
                .parse::<u8>()
                .map(Self::Quality)
                .map_err(|_| "usage: quality <1-100>".to_string()),
            "compress" => Ok(Self::Compress),
            "download" if rest.is_empty() => Ok(Self::Download(None)),
            "download" => Ok(Self::Download(Some(PathBuf::from(rest)))),
            "reset" => Ok(Self::Reset),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

const HELP: &str = "commands: open <path> | preset <low|medium|high|custom> | quality <1-100> | compress | download [dir] | reset | quit";

/// Runs commands from `input` until it ends or `quit` is read.
pub async fn run<C, R, W>(
    controller: &WorkflowController<C>,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    C: Compressor,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    output
        .write_all(render(&controller.snapshot()).to_string().as_bytes())
        .await?;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let message = match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => apply(controller, command).await,
            Err(e) => Some(e),
        };

        if let Some(message) = message {
            output.write_all(format!("{message}\n").as_bytes()).await?;
        }
        output
            .write_all(render(&controller.snapshot()).to_string().as_bytes())
            .await?;
        output.flush().await?;
    }

    Ok(())
}

/// Applies one command, returning a message to print, if any.
async fn apply<C: Compressor>(controller: &WorkflowController<C>, command: Command) -> Option<String> {
    debug!("Command: {:?}", command);
    match command {
        Command::Open(path) => match load_payload(&path).await {
            Ok(payload) => {
                controller.select_file(payload);
                None
            }
            Err(e) => Some(e.to_string()),
        },
        Command::Preset(name) => {
            (!controller.set_preset_name(&name)).then(|| "open an image first".to_string())
        }
        Command::Quality(percent) => {
            (!controller.set_custom_quality(percent)).then(|| "open an image first".to_string())
        }
        Command::Compress => match controller.compress().await {
            CompressOutcome::Skipped => Some("nothing to compress".to_string()),
            CompressOutcome::Compressed(_) | CompressOutcome::Failed => None,
        },
        Command::Download(dir) => {
            let dir = dir.unwrap_or_else(|| PathBuf::from("."));
            match controller.download(&dir).await {
                Ok(path) => Some(format!("saved {}", path.display())),
                Err(e) => Some(e.to_string()),
            }
        }
        Command::Reset => {
            controller.reset();
            None
        }
        Command::Help => Some(HELP.to_string()),
        Command::Quit => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!("open a b.png".parse::<Command>(), Ok(Command::Open(PathBuf::from("a b.png"))));
        assert_eq!("PRESET high".parse::<Command>(), Ok(Command::Preset("high".into())));
        assert_eq!("quality 35".parse::<Command>(), Ok(Command::Quality(35)));
        assert_eq!("  compress ".parse::<Command>(), Ok(Command::Compress));
        assert_eq!("download".parse::<Command>(), Ok(Command::Download(None)));
        assert_eq!("download out".parse::<Command>(), Ok(Command::Download(Some("out".into()))));
        assert_eq!("exit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn rejects_bad_input() {
        assert!("open".parse::<Command>().is_err());
        assert!("quality loud".parse::<Command>().is_err());
        assert!("quality 300".parse::<Command>().is_err());
        assert!("fly".parse::<Command>().is_err());
    }
}
