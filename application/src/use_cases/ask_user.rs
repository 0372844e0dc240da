//! Ask User use case.
//!
//! The single human-in-the-loop step of a deliberation: every request the
//! information gatherer left unresolved is shown to a human through the
//! [`UserChannelPort`].
//!
//! - **Critical** requests re-prompt until a non-empty answer arrives. If the
//!   channel reports that nobody can answer, the deliberation is abandoned.
//! - **Normal** requests accept a skip, an empty answer or no answer at all;
//!   they are then simply left out of the result.

use crate::ports::user_channel::{UserChannelError, UserChannelPort, UserPrompt, UserReply};
use crate::use_cases::shared::with_optional_timeout;
use council_domain::InfoRequest;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that end the human exchange early
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AskUserError {
    #[error("Critical request {request_id} was not answered; deliberation abandoned")]
    Abandoned { request_id: String },

    #[error("Operation cancelled")]
    Cancelled,
}

/// Use case for collecting human answers to unresolved requests.
pub struct AskUserUseCase {
    channel: Arc<dyn UserChannelPort>,
    answer_timeout: Option<Duration>,
}

impl AskUserUseCase {
    pub fn new(channel: Arc<dyn UserChannelPort>, answer_timeout: Option<Duration>) -> Self {
        Self {
            channel,
            answer_timeout,
        }
    }

    /// Ask about each missing request in order.
    ///
    /// Returns request id → answer for every request that got one.
    pub async fn ask_for_information(
        &self,
        missing: &[InfoRequest],
    ) -> Result<HashMap<String, String>, AskUserError> {
        let mut answers = HashMap::new();

        for request in missing {
            if let Some(answer) = self.ask_one(request).await? {
                answers.insert(request.id.clone(), answer);
            }
        }

        info!(
            "Human answered {} of {} open requests",
            answers.len(),
            missing.len()
        );
        Ok(answers)
    }

    async fn ask_one(&self, request: &InfoRequest) -> Result<Option<String>, AskUserError> {
        let mut prompt = UserPrompt::new(request.clone());

        loop {
            let reply = self.wait_for_reply(&prompt).await?;

            match reply {
                UserReply::Answer(answer) if !answer.trim().is_empty() => {
                    return Ok(Some(answer.trim().to_string()));
                }
                UserReply::Unavailable if request.is_critical() => {
                    warn!("No answer available for critical request {}", request.id);
                    return Err(AskUserError::Abandoned {
                        request_id: request.id.clone(),
                    });
                }
                // Skip or empty answer on a critical request: ask again
                _ if request.is_critical() => {
                    debug!("Critical request {} needs an answer; re-prompting", request.id);
                    prompt.attempt += 1;
                    // Channels that reply without awaiting must not starve the runtime
                    tokio::task::yield_now().await;
                }
                _ => {
                    debug!("Request {} skipped", request.id);
                    return Ok(None);
                }
            }
        }
    }

    async fn wait_for_reply(&self, prompt: &UserPrompt) -> Result<UserReply, AskUserError> {
        match with_optional_timeout(self.answer_timeout, self.channel.ask(prompt)).await {
            None => {
                info!(
                    "No answer to {} within {:?}",
                    prompt.request.id, self.answer_timeout
                );
                Ok(UserReply::Unavailable)
            }
            Some(Ok(reply)) => Ok(reply),
            Some(Err(UserChannelError::Cancelled)) => Err(AskUserError::Cancelled),
            Some(Err(e)) => {
                warn!("User channel failed for {}: {}", prompt.request.id, e);
                Ok(UserReply::Unavailable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::user_channel::{NoAnswerChannel, PresetAnswerChannel};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays replies in order, then reports unavailable
    struct ScriptedChannel {
        replies: Mutex<VecDeque<Result<UserReply, UserChannelError>>>,
        prompts: Mutex<Vec<(String, usize)>>,
    }

    impl ScriptedChannel {
        fn new(replies: Vec<Result<UserReply, UserChannelError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<(String, usize)> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UserChannelPort for ScriptedChannel {
        async fn ask(&self, prompt: &UserPrompt) -> Result<UserReply, UserChannelError> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.request.id.clone(), prompt.attempt));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(UserReply::Unavailable))
        }
    }

    struct HangingChannel;

    #[async_trait]
    impl UserChannelPort for HangingChannel {
        async fn ask(&self, _prompt: &UserPrompt) -> Result<UserReply, UserChannelError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(UserReply::Answer("too late".to_string()))
        }
    }

    fn answer(text: &str) -> Result<UserReply, UserChannelError> {
        Ok(UserReply::Answer(text.to_string()))
    }

    fn normal(index: usize, text: &str) -> InfoRequest {
        InfoRequest::from_entry("product", index, text)
    }

    fn critical(index: usize, text: &str) -> InfoRequest {
        InfoRequest::from_entry("security", index, &format!("CRITICAL: {}", text))
    }

    #[tokio::test]
    async fn test_answers_collected_by_id() {
        let channel = Arc::new(ScriptedChannel::new(vec![answer(" Team Atlas "), answer("Q3")]));
        let use_case = AskUserUseCase::new(channel, None);

        let answers = use_case
            .ask_for_information(&[normal(0, "Who owns billing?"), normal(1, "What is the deadline?")])
            .await
            .unwrap();

        assert_eq!(answers.len(), 2);
        assert_eq!(answers["product-1"], "Team Atlas");
        assert_eq!(answers["product-2"], "Q3");
    }

    #[tokio::test]
    async fn test_normal_requests_may_be_skipped() {
        let channel = Arc::new(ScriptedChannel::new(vec![
            Ok(UserReply::Skip),
            answer(""),
            Ok(UserReply::Unavailable),
        ]));
        let use_case = AskUserUseCase::new(channel.clone(), None);

        let answers = use_case
            .ask_for_information(&[normal(0, "a?"), normal(1, "b?"), normal(2, "c?")])
            .await
            .unwrap();

        assert!(answers.is_empty());
        assert_eq!(channel.prompts().len(), 3);
    }

    #[tokio::test]
    async fn test_critical_reprompts_until_answered() {
        let channel = Arc::new(ScriptedChannel::new(vec![
            Ok(UserReply::Skip),
            answer("   "),
            answer("Platform team"),
        ]));
        let use_case = AskUserUseCase::new(channel.clone(), None);

        let answers = use_case
            .ask_for_information(&[critical(0, "Who owns the auth service?")])
            .await
            .unwrap();

        assert_eq!(answers["security-1"], "Platform team");
        let attempts: Vec<_> = channel.prompts().into_iter().map(|(_, a)| a).collect();
        assert_eq!(attempts, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_critical_unavailable_abandons() {
        let use_case = AskUserUseCase::new(Arc::new(NoAnswerChannel), None);

        let err = use_case
            .ask_for_information(&[normal(0, "a?"), critical(0, "Who signs off?")])
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AskUserError::Abandoned {
                request_id: "security-1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_timeout_counts_as_unavailable() {
        let use_case =
            AskUserUseCase::new(Arc::new(HangingChannel), Some(Duration::from_millis(20)));

        let answers = use_case
            .ask_for_information(&[normal(0, "Who owns billing?")])
            .await
            .unwrap();
        assert!(answers.is_empty());

        let err = use_case
            .ask_for_information(&[critical(0, "Who signs off?")])
            .await
            .unwrap_err();
        assert!(matches!(err, AskUserError::Abandoned { .. }));
    }

    #[tokio::test]
    async fn test_channel_errors() {
        let channel = Arc::new(ScriptedChannel::new(vec![
            Err(UserChannelError::IoError("broken pipe".to_string())),
            Err(UserChannelError::Cancelled),
        ]));
        let use_case = AskUserUseCase::new(channel, None);

        let err = use_case
            .ask_for_information(&[normal(0, "a?"), normal(1, "b?")])
            .await
            .unwrap_err();
        assert_eq!(err, AskUserError::Cancelled);
    }

    #[tokio::test]
    async fn test_preset_channel_headless_run() {
        let channel = PresetAnswerChannel::default().with_answer("security-1", "Platform team");
        let use_case = AskUserUseCase::new(Arc::new(channel), Some(Duration::from_secs(1)));

        let answers = use_case
            .ask_for_information(&[critical(0, "Who owns the auth service?"), normal(0, "b?")])
            .await
            .unwrap();

        assert_eq!(answers.len(), 1);
        assert_eq!(answers["security-1"], "Platform team");
    }

    #[tokio::test]
    async fn test_blank_preset_for_critical_request_abandons() {
        let channel = PresetAnswerChannel::default().with_answer("security-1", "");
        let use_case = AskUserUseCase::new(Arc::new(channel), Some(Duration::from_secs(1)));

        let result = tokio::time::timeout(
            Duration::from_secs(3),
            use_case.ask_for_information(&[critical(0, "Who owns the auth service?")]),
        )
        .await
        .expect("blank preset must not spin");

        assert_eq!(
            result.unwrap_err(),
            AskUserError::Abandoned {
                request_id: "security-1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_reprompt_loop_yields_to_outer_timeout() {
        /// Refuses instantly, forever
        struct SkippingChannel;

        #[async_trait]
        impl UserChannelPort for SkippingChannel {
            async fn ask(&self, _prompt: &UserPrompt) -> Result<UserReply, UserChannelError> {
                Ok(UserReply::Skip)
            }
        }

        let use_case = AskUserUseCase::new(Arc::new(SkippingChannel), None);
        let outcome = tokio::time::timeout(
            Duration::from_millis(50),
            use_case.ask_for_information(&[critical(0, "Who signs off?")]),
        )
        .await;
        assert!(outcome.is_err());
    }
}
