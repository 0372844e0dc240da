//! User channel port for answering unresolved information requests.
//!
//! When the information gatherer cannot resolve a request automatically,
//! the deliberation asks a human through this port.
//!
//! # Architecture
//!
//! Following the Ports and Adapters pattern:
//! - **Port**: [`UserChannelPort`] - defined here in application layer
//! - **Adapter**: `TerminalUserChannel` - implemented in presentation layer
//!
//! # Flow
//!
//! ```text
//! Round N: personas ask for information
//!        ↓
//! GatherInformationUseCase (search / metrics store)
//!        ↓
//! still missing
//!        ↓
//! UserChannelPort::ask()  (bounded by answer_timeout)
//!        ↓
//! Answer / Skip / Unavailable
//! ```
//!
//! # Built-in Implementations
//!
//! - [`NoAnswerChannel`] - Always reports [`UserReply::Unavailable`]
//! - [`PresetAnswerChannel`] - Answers from a fixed map, unavailable otherwise
//!
//! For interactive use, see `TerminalUserChannel` in the presentation layer.

use async_trait::async_trait;
use council_domain::InfoRequest;
use std::collections::HashMap;
use thiserror::Error;

/// What the human did with one prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserReply {
    /// An answer (possibly empty)
    Answer(String),
    /// Explicitly skipped
    Skip,
    /// Nobody can answer: EOF, explicit abandon, headless, or timeout
    Unavailable,
}

/// Error type for user channel operations.
///
/// These errors represent failures of the channel itself,
/// not decisions made by the user.
#[derive(Error, Debug, Clone)]
pub enum UserChannelError {
    /// User cancelled the operation (e.g., via Ctrl+C).
    #[error("Operation cancelled")]
    Cancelled,
    /// Input/output error (e.g., terminal read failure).
    #[error("I/O error: {0}")]
    IoError(String),
}

/// One prompt shown to the human
#[derive(Debug, Clone)]
pub struct UserPrompt {
    pub request: InfoRequest,
    /// 1 on first display, incremented on every re-prompt of a critical request
    pub attempt: usize,
}

impl UserPrompt {
    pub fn new(request: InfoRequest) -> Self {
        Self {
            request,
            attempt: 1,
        }
    }

    pub fn is_retry(&self) -> bool {
        self.attempt > 1
    }
}

/// Port for asking a human about one request.
///
/// Implementations are responsible for:
/// 1. Displaying the request (description, requester, type, priority)
/// 2. Collecting the answer
/// 3. Reporting skip / unavailable distinctly from an answer
///
/// # Implementations
///
/// - **Interactive (CLI)**: `TerminalUserChannel` in presentation layer
/// - **Headless**: [`NoAnswerChannel`]
/// - **Scripted**: [`PresetAnswerChannel`]
#[async_trait]
pub trait UserChannelPort: Send + Sync {
    async fn ask(&self, prompt: &UserPrompt) -> Result<UserReply, UserChannelError>;
}

/// Channel for headless runs: nobody ever answers.
///
/// Non-critical requests are omitted; a critical one abandons the run.
pub struct NoAnswerChannel;

#[async_trait]
impl UserChannelPort for NoAnswerChannel {
    async fn ask(&self, _prompt: &UserPrompt) -> Result<UserReply, UserChannelError> {
        Ok(UserReply::Unavailable)
    }
}

/// Channel answering from a fixed map.
///
/// Keys are matched against the request id first, then the description.
/// A blank preset counts as no answer.
#[derive(Debug, Clone, Default)]
pub struct PresetAnswerChannel {
    answers: HashMap<String, String>,
}

impl PresetAnswerChannel {
    pub fn new(answers: HashMap<String, String>) -> Self {
        Self { answers }
    }

    pub fn with_answer(mut self, key: impl Into<String>, answer: impl Into<String>) -> Self {
        self.answers.insert(key.into(), answer.into());
        self
    }
}

#[async_trait]
impl UserChannelPort for PresetAnswerChannel {
    async fn ask(&self, prompt: &UserPrompt) -> Result<UserReply, UserChannelError> {
        let request = &prompt.request;
        let answer = self
            .answers
            .get(&request.id)
            .or_else(|| self.answers.get(&request.description));

        Ok(match answer {
            Some(answer) if !answer.trim().is_empty() => UserReply::Answer(answer.clone()),
            _ => UserReply::Unavailable,
        })
    }
}
