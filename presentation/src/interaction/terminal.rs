//! Terminal answers to information requests.
//!
//! When a request cannot be resolved automatically the user sees:
//!
//! ```text
//! ── Information needed (security-1, CRITICAL) ──
//! security asks: Who owns the auth service?
//!
//! Type an answer, /skip to pass, /abandon to stop the deliberation.
//! council>
//! ```
//!
//! | Input | Reply |
//! |-------|-------|
//! | any text | [`UserReply::Answer`] |
//! | `/skip`, empty line | [`UserReply::Skip`] |
//! | `/abandon`, EOF | [`UserReply::Unavailable`] |

use async_trait::async_trait;
use colored::Colorize;
use council_application::ports::user_channel::{
    UserChannelError, UserChannelPort, UserPrompt, UserReply,
};
use std::io::{self, BufRead, Write};
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

type LineResult = Result<String, String>;

/// Reads answers from stdin; prompts go to stderr so stdout stays clean for output.
///
/// A single reader thread owns the input for the channel's whole life and
/// hands lines over one by one. An `ask` that is given up on (timeout,
/// cancellation) leaves the next line for the next `ask`.
pub struct TerminalUserChannel {
    lines: Mutex<mpsc::UnboundedReceiver<LineResult>>,
    cancellation: Option<CancellationToken>,
}

impl TerminalUserChannel {
    pub fn new() -> Self {
        Self::from_reader(io::BufReader::new(io::stdin()))
    }

    /// Read answers from any line source instead of stdin
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        // A plain thread: a blocking read must not hold up runtime shutdown
        std::thread::spawn(move || Self::read_lines(reader, tx));

        Self {
            lines: Mutex::new(rx),
            cancellation: None,
        }
    }

    /// Stop waiting for input when the token fires
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Forward lines until EOF, a read error or nobody listening
    fn read_lines<R: BufRead>(mut reader: R, tx: mpsc::UnboundedSender<LineResult>) {
        loop {
            let mut input = String::new();
            match reader.read_line(&mut input) {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(Ok(input)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(format!("Failed to read input: {}", e)));
                    break;
                }
            }
        }
    }

    fn display_prompt(prompt: &UserPrompt) {
        let request = &prompt.request;
        let tag = if request.is_critical() {
            format!("{}, {}", request.id, "CRITICAL".red().bold())
        } else {
            request.id.clone()
        };

        eprintln!();
        if prompt.is_retry() {
            eprintln!(
                "{}",
                format!(
                    "This question must be answered to continue (attempt {}).",
                    prompt.attempt
                )
                .yellow()
            );
        } else {
            eprintln!(
                "{}",
                format!("── Information needed ({}) ──", tag).cyan().bold()
            );
        }
        eprintln!("{} asks: {}", request.requested_by.bold(), request.description);
        eprintln!();
        eprintln!(
            "Type an answer, {} to pass, {} to stop the deliberation.",
            "/skip".green(),
            "/abandon".red()
        );
        eprint!("{} ", "council>".magenta().bold());
    }

    /// Next line, or `None` once the input is closed
    async fn next_line(&self) -> Result<Option<String>, UserChannelError> {
        let mut lines = self.lines.lock().await;
        match lines.recv().await {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(e)) => Err(UserChannelError::IoError(e)),
            None => Ok(None),
        }
    }
}

impl Default for TerminalUserChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Map one line of input (`None` on EOF) to a reply
pub fn interpret_input(line: Option<&str>) -> UserReply {
    let Some(line) = line else {
        return UserReply::Unavailable;
    };

    match line.trim() {
        "" => UserReply::Skip,
        command if command.eq_ignore_ascii_case("/skip") => UserReply::Skip,
        command if command.eq_ignore_ascii_case("/abandon") => UserReply::Unavailable,
        answer => UserReply::Answer(answer.to_string()),
    }
}

#[async_trait]
impl UserChannelPort for TerminalUserChannel {
    async fn ask(&self, prompt: &UserPrompt) -> Result<UserReply, UserChannelError> {
        Self::display_prompt(prompt);
        io::stderr()
            .flush()
            .map_err(|e| UserChannelError::IoError(format!("Failed to flush stderr: {}", e)))?;

        let line = match &self.cancellation {
            Some(token) => tokio::select! {
                _ = token.cancelled() => return Err(UserChannelError::Cancelled),
                line = self.next_line() => line,
            },
            None => self.next_line().await,
        }?;

        Ok(interpret_input(line.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::InfoRequest;
    use std::io::{BufReader, Cursor, Read};
    use std::sync::mpsc as std_mpsc;
    use std::time::Duration;

    /// Blocks like a terminal until the test types a line
    struct TypedInput {
        keys: std_mpsc::Receiver<String>,
        pending: Vec<u8>,
    }

    impl Read for TypedInput {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.pending.is_empty() {
                match self.keys.recv() {
                    Ok(line) => self.pending = line.into_bytes(),
                    Err(_) => return Ok(0),
                }
            }
            let n = buf.len().min(self.pending.len());
            buf[..n].copy_from_slice(&self.pending[..n]);
            self.pending.drain(..n);
            Ok(n)
        }
    }

    fn typed_input() -> (std_mpsc::Sender<String>, BufReader<TypedInput>) {
        let (tx, rx) = std_mpsc::channel();
        let input = TypedInput {
            keys: rx,
            pending: Vec::new(),
        };
        (tx, BufReader::new(input))
    }

    fn prompt(raw: &str) -> UserPrompt {
        UserPrompt::new(InfoRequest::from_entry("product", 0, raw))
    }

    // ==================== Line Interpretation ====================

    #[test]
    fn test_answers_are_trimmed() {
        assert_eq!(
            interpret_input(Some("  Team Atlas \n")),
            UserReply::Answer("Team Atlas".to_string())
        );
    }

    #[test]
    fn test_skip_commands() {
        assert_eq!(interpret_input(Some("/skip\n")), UserReply::Skip);
        assert_eq!(interpret_input(Some("/SKIP")), UserReply::Skip);
        assert_eq!(interpret_input(Some("\n")), UserReply::Skip);
    }

    #[test]
    fn test_abandon_and_eof() {
        assert_eq!(interpret_input(Some("/abandon\n")), UserReply::Unavailable);
        assert_eq!(interpret_input(None), UserReply::Unavailable);
    }

    #[test]
    fn test_other_slash_text_is_an_answer() {
        assert_eq!(
            interpret_input(Some("/usr/local is the prefix")),
            UserReply::Answer("/usr/local is the prefix".to_string())
        );
    }

    // ==================== Input Reader ====================

    #[tokio::test]
    async fn test_sequential_asks_read_consecutive_lines_then_eof() {
        let channel = TerminalUserChannel::from_reader(Cursor::new("/skip\nQ3\n"));

        assert_eq!(channel.ask(&prompt("a?")).await.unwrap(), UserReply::Skip);
        assert_eq!(
            channel.ask(&prompt("b?")).await.unwrap(),
            UserReply::Answer("Q3".to_string())
        );
        assert_eq!(channel.ask(&prompt("c?")).await.unwrap(), UserReply::Unavailable);
        assert_eq!(channel.ask(&prompt("d?")).await.unwrap(), UserReply::Unavailable);
    }

    #[tokio::test]
    async fn test_abandoned_ask_does_not_swallow_next_line() {
        let (keys, input) = typed_input();
        let channel = TerminalUserChannel::from_reader(input);

        let first = tokio::time::timeout(Duration::from_millis(50), channel.ask(&prompt("a?"))).await;
        assert!(first.is_err());

        keys.send("Team Atlas\n".to_string()).unwrap();
        let reply = tokio::time::timeout(Duration::from_secs(5), channel.ask(&prompt("b?")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, UserReply::Answer("Team Atlas".to_string()));
    }

    #[tokio::test]
    async fn test_cancellation_stops_waiting() {
        let (_keys, input) = typed_input();
        let token = CancellationToken::new();
        let channel = TerminalUserChannel::from_reader(input).with_cancellation(token.clone());

        token.cancel();
        let err = channel.ask(&prompt("a?")).await.unwrap_err();
        assert!(matches!(err, UserChannelError::Cancelled));
    }
}
