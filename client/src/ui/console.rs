//! Interactive console plumbing.

use async_channel::Receiver;
use async_trait::async_trait;
use lib_core::UserPrompt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

pub const HELP: &str = "\
Commands:
  connect          connect the wallet and load the ballot
  vote <index>     vote for the candidate at <index>
  refresh          reload candidates, vote count and winner
  disconnect       disconnect the wallet
  status           show the current view
  help             show this help
  quit             exit";

/// One console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect,
    Vote(u64),
    Refresh,
    Disconnect,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Parse a line. `Ok(None)` for blank input.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            return Ok(None);
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "connect" => Command::Connect,
            "vote" => {
                let index = parts.next().ok_or_else(|| "usage: vote <index>".to_string())?;
                let index = index
                    .parse::<u64>()
                    .map_err(|_| format!("not a candidate index: {}", index))?;
                Command::Vote(index)
            }
            "refresh" => Command::Refresh,
            "disconnect" => Command::Disconnect,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command: {} (type `help`)", other)),
        };

        if parts.next().is_some() {
            return Err(format!("too many arguments for `{}`", word));
        }
        Ok(Some(command))
    }
}

/// Forward stdin lines over a channel so the command loop and the
/// confirmation prompt can share one reader.
pub fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = async_channel::unbounded();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
        debug!("stdin closed");
    });
    rx
}

/// [`UserPrompt`] backed by the console.
pub struct ConsolePrompt {
    auto_confirm: bool,
    lines: Receiver<String>,
}

impl ConsolePrompt {
    pub fn new(lines: Receiver<String>, auto_confirm: bool) -> Self {
        Self { auto_confirm, lines }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl UserPrompt for ConsolePrompt {
    async fn confirm(&self, prompt: &str) -> bool {
        if self.auto_confirm {
            println!("{} [y/N] y", prompt);
            return true;
        }
        println!("{} [y/N]", prompt);
        match self.lines.recv().await {
            Ok(answer) => is_yes(&answer),
            Err(_) => false,
        }
    }

    fn notify(&self, message: &str) {
        println!("* {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("connect"), Ok(Some(Command::Connect)));
        assert_eq!(Command::parse("  VOTE 2 "), Ok(Some(Command::Vote(2))));
        assert_eq!(Command::parse("exit"), Ok(Some(Command::Quit)));
        assert_eq!(Command::parse(""), Ok(None));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("vote").is_err());
        assert!(Command::parse("vote -1").is_err());
        assert!(Command::parse("vote 1 2").is_err());
        assert!(Command::parse("dance").is_err());
    }

    #[tokio::test]
    async fn test_prompt_reads_answer() {
        let (tx, rx) = async_channel::unbounded();
        let prompt = ConsolePrompt::new(rx, false);

        tx.send("Yes".to_string()).await.unwrap();
        assert!(prompt.confirm("Disconnect wallet?").await);

        tx.send("".to_string()).await.unwrap();
        assert!(!prompt.confirm("Disconnect wallet?").await);

        drop(tx);
        assert!(!prompt.confirm("Disconnect wallet?").await);
    }

    #[tokio::test]
    async fn test_auto_confirm() {
        let (_tx, rx) = async_channel::unbounded::<String>();
        assert!(ConsolePrompt::new(rx, true).confirm("Disconnect wallet?").await);
    }
}
