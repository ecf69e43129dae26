//! Ephemeral per-form input state and the submit/reset lifecycle. Each
//! controller validates, transforms the draft into its wire payload, makes
//! one transport call, and funnels the outcome into the notification bus
//! and the session store. Transport errors never escape a controller.

use std::sync::Arc;

use tracing::debug;

use shared::protocol::{FeedbackPayload, MentorRequestPayload, RecognitionPayload};

use crate::store::{SessionStore, ASSISTANT_PROMPT};

/// Fixed company-values list; the first entry is the recognition draft's
/// default value.
pub const RECOGNITION_VALUES: [&str; 5] =
    ["Care", "Collaboration", "Courage", "Commitment", "Creativity"];

pub const MENTOR_FALLBACK_REPLY: &str = "Mentor request submitted.";
pub const RECOGNITION_FALLBACK_REPLY: &str = "Recognition captured.";
pub const FEEDBACK_FALLBACK_REPLY: &str = "Reflection captured.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Request acknowledged; the draft was reset to its empty shape.
    Submitted,
    /// Validation no-op: nothing sent, nothing notified, draft untouched.
    Skipped,
    /// Request failed; the draft is untouched so the input is not lost.
    Failed,
}

/// Comma-separated free text to an ordered list: split, trim, drop empties.
pub fn split_strengths(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentorDraft {
    pub mentor_email: String,
    pub message: String,
}

pub struct MentorRequestController {
    store: Arc<SessionStore>,
    pub draft: MentorDraft,
}

impl MentorRequestController {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self {
            store,
            draft: MentorDraft::default(),
        }
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(mentee_email) = self.store.selected_email().await else {
            return SubmitOutcome::Skipped;
        };
        if self.draft.mentor_email.is_empty() {
            return SubmitOutcome::Skipped;
        }

        let payload = MentorRequestPayload {
            mentee_email,
            mentor_email: self.draft.mentor_email.clone(),
            message: self.draft.message.clone(),
        };

        match self.store.api().request_mentor(&payload).await {
            Ok(ack) => {
                self.draft = MentorDraft::default();
                self.store.bus().success("Mentor request drafted.");
                let reply = ack
                    .tips
                    .map(|tips| tips.join(" \n"))
                    .unwrap_or_else(|| MENTOR_FALLBACK_REPLY.to_string());
                self.store.set_assistant_reply(reply).await;
                SubmitOutcome::Submitted
            }
            Err(err) => {
                debug!(%err, "mentor request failed");
                self.store.bus().error("Could not submit mentor request.");
                SubmitOutcome::Failed
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionDraft {
    pub recipient_email: String,
    pub value: String,
    pub message: String,
}

impl Default for RecognitionDraft {
    fn default() -> Self {
        Self {
            recipient_email: String::new(),
            value: RECOGNITION_VALUES[0].to_string(),
            message: String::new(),
        }
    }
}

pub struct RecognitionController {
    store: Arc<SessionStore>,
    pub draft: RecognitionDraft,
}

impl RecognitionController {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self {
            store,
            draft: RecognitionDraft::default(),
        }
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(sender_email) = self.store.selected_email().await else {
            return SubmitOutcome::Skipped;
        };
        if self.draft.recipient_email.is_empty() || self.draft.message.is_empty() {
            return SubmitOutcome::Skipped;
        }

        let payload = RecognitionPayload {
            sender_email,
            recipient_email: self.draft.recipient_email.clone(),
            psa_value: self.draft.value.clone(),
            message: self.draft.message.clone(),
        };

        match self.store.api().submit_recognition(&payload).await {
            Ok(ack) => {
                self.draft = RecognitionDraft::default();
                self.store.bus().success("Recognition drafted successfully.");
                let reply = ack
                    .share_copy
                    .unwrap_or_else(|| RECOGNITION_FALLBACK_REPLY.to_string());
                self.store.set_assistant_reply(reply).await;
                SubmitOutcome::Submitted
            }
            Err(err) => {
                debug!(%err, "recognition submission failed");
                self.store.bus().error("Recognition submission failed.");
                SubmitOutcome::Failed
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackDraft {
    pub focus: String,
    /// Comma-separated in the form; split at submit time.
    pub strengths: String,
}

pub struct FeedbackController {
    store: Arc<SessionStore>,
    pub draft: FeedbackDraft,
}

impl FeedbackController {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self {
            store,
            draft: FeedbackDraft::default(),
        }
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(email) = self.store.selected_email().await else {
            return SubmitOutcome::Skipped;
        };
        if self.draft.focus.is_empty() {
            return SubmitOutcome::Skipped;
        }

        let payload = FeedbackPayload {
            email,
            focus_area: self.draft.focus.clone(),
            strengths: split_strengths(&self.draft.strengths),
        };

        match self.store.api().submit_feedback(&payload).await {
            Ok(ack) => {
                self.draft = FeedbackDraft::default();
                self.store.bus().success("Feedback reflection saved.");
                let reply = ack
                    .reflection_prompt
                    .unwrap_or_else(|| FEEDBACK_FALLBACK_REPLY.to_string());
                self.store.set_assistant_reply(reply).await;
                SubmitOutcome::Submitted
            }
            Err(err) => {
                debug!(%err, "feedback submission failed");
                self.store.bus().error("Feedback submission failed.");
                SubmitOutcome::Failed
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatDraft {
    pub message: String,
}

pub struct ChatController {
    store: Arc<SessionStore>,
    pub draft: ChatDraft,
}

impl ChatController {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self {
            store,
            draft: ChatDraft::default(),
        }
    }

    /// The message is trimmed before the emptiness check; the input is
    /// cleared only on success. A selection is optional here; the email is
    /// attached to the query only when one exists.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let q = self.draft.message.trim().to_string();
        if q.is_empty() {
            return SubmitOutcome::Skipped;
        }

        let email = self.store.selected_email().await;

        match self.store.api().send_chat(&q, email.as_deref()).await {
            Ok(ack) => {
                self.draft.message.clear();
                self.store.bus().success("Assistant reply received.");
                let reply = ack
                    .reply
                    .unwrap_or_else(|| ASSISTANT_PROMPT.to_string());
                self.store.set_assistant_reply(reply).await;
                SubmitOutcome::Submitted
            }
            Err(err) => {
                debug!(%err, "chat request failed");
                self.store.bus().error("The assistant is unavailable right now.");
                SubmitOutcome::Failed
            }
        }
    }
}
