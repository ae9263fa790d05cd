//! Terminal adapter for human turns.
//!
//! Shows the message being answered, then reads one line. EOF or `/quit`
//! cancels the episode.

use arena_application::{HumanInputError, HumanInputPort};
use arena_domain::unescape;
use async_trait::async_trait;
use colored::Colorize;
use std::io::{self, BufRead, BufReader, Stdin, Write};
use std::sync::{Arc, Mutex};

const QUIT_COMMANDS: [&str; 2] = ["/quit", "/q"];

/// Reads human replies line by line from any buffered source.
pub struct LineHumanInput<R> {
    reader: Arc<Mutex<R>>,
    echo_prompt: bool,
}

/// The interactive adapter used by the binary
pub type StdinHumanInput = LineHumanInput<BufReader<Stdin>>;

impl StdinHumanInput {
    pub fn stdin() -> Self {
        Self {
            reader: Arc::new(Mutex::new(BufReader::new(io::stdin()))),
            echo_prompt: true,
        }
    }
}

impl<R: BufRead + Send + 'static> LineHumanInput<R> {
    /// Read from `reader` without printing prompts.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: Arc::new(Mutex::new(reader)),
            echo_prompt: false,
        }
    }

    fn show_prompt(participant: &str, previous_message: &str) {
        if !previous_message.is_empty() {
            println!("{}", unescape(previous_message).dimmed());
        }
        print!("{} ", format!("{}>", participant).green().bold());
        let _ = io::stdout().flush();
    }
}

/// Interpret one raw line. `None` means the source is exhausted.
fn parse_reply(line: Option<String>) -> Result<String, HumanInputError> {
    let Some(line) = line else {
        return Err(HumanInputError::Cancelled);
    };
    let reply = line.trim_end_matches(['\r', '\n']).to_string();
    if QUIT_COMMANDS.contains(&reply.trim()) {
        return Err(HumanInputError::Cancelled);
    }
    Ok(reply)
}

#[async_trait]
impl<R: BufRead + Send + 'static> HumanInputPort for LineHumanInput<R> {
    async fn request_input(
        &self,
        participant: &str,
        previous_message: &str,
    ) -> Result<String, HumanInputError> {
        if self.echo_prompt {
            Self::show_prompt(participant, previous_message);
        }

        let reader = Arc::clone(&self.reader);
        let line = tokio::task::spawn_blocking(move || -> Result<Option<String>, HumanInputError> {
            let mut guard = reader
                .lock()
                .map_err(|_| HumanInputError::IoError("input reader poisoned".to_string()))?;
            let mut line = String::new();
            match guard.read_line(&mut line) {
                Ok(0) => Ok(None),
                Ok(_) => Ok(Some(line)),
                Err(e) => Err(HumanInputError::IoError(format!("Failed to read input: {}", e))),
            }
        })
        .await
        .map_err(|e| HumanInputError::IoError(e.to_string()))??;

        parse_reply(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_reply() {
        assert_eq!(
            parse_reply(Some("I'll donate $5\n".to_string())),
            Ok("I'll donate $5".to_string())
        );
        assert_eq!(parse_reply(Some("\r\n".to_string())), Ok(String::new()));
        assert_eq!(parse_reply(None), Err(HumanInputError::Cancelled));
        assert_eq!(
            parse_reply(Some("/quit\n".to_string())),
            Err(HumanInputError::Cancelled)
        );
    }

    #[tokio::test]
    async fn test_reads_lines_in_order() {
        let input = LineHumanInput::from_reader(Cursor::new("first\nsecond\n"));
        assert_eq!(input.request_input("donor", "").await.unwrap(), "first");
        assert_eq!(
            input.request_input("donor", "Hello").await.unwrap(),
            "second"
        );
        assert_eq!(
            input.request_input("donor", "").await,
            Err(HumanInputError::Cancelled)
        );
    }
}
