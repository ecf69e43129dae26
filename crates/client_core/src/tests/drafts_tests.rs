use std::{
    sync::{Arc, Mutex as StdMutex},
    time::Duration,
};

use async_trait::async_trait;

use shared::protocol::{
    ChatReply, CourseQuery, CourseSearchResponse, FeedbackAck, FeedbackPayload, HealthResponse,
    LeadershipResponse, MentorRequestAck, MentorRequestPayload, MentorsResponse, PlanCatalogue,
    RecognitionAck, RecognitionPayload,
};

use crate::{
    drafts::{
        ChatController, ChatDraft, FeedbackController, FeedbackDraft, MentorDraft,
        MentorRequestController, RecognitionController, SubmitOutcome, FEEDBACK_FALLBACK_REPLY,
        RECOGNITION_FALLBACK_REPLY,
    },
    notify::{Notification, NotificationBus, Severity, Subscription},
    store::{SessionStore, ASSISTANT_PROMPT},
    transport::{GrowthApi, TransportError},
};

fn scripted_error() -> TransportError {
    TransportError::Status {
        status: 500,
        status_text: "Internal Server Error".to_string(),
        body: "scripted failure".to_string(),
    }
}

/// Write-side double: each submit-style operation answers with its scripted
/// ack (None means failure) and records the payload it received.
#[derive(Default)]
struct ScriptedWriteApi {
    mentor_ack: Option<MentorRequestAck>,
    recognition_ack: Option<RecognitionAck>,
    feedback_ack: Option<FeedbackAck>,
    chat_ack: Option<ChatReply>,
    mentor_requests: StdMutex<Vec<MentorRequestPayload>>,
    recognitions: StdMutex<Vec<RecognitionPayload>>,
    feedback: StdMutex<Vec<FeedbackPayload>>,
    chats: StdMutex<Vec<(String, Option<String>)>>,
}

#[async_trait]
impl GrowthApi for ScriptedWriteApi {
    async fn fetch_plans(&self, _email: Option<&str>) -> Result<PlanCatalogue, TransportError> {
        Ok(PlanCatalogue::new())
    }

    async fn fetch_mentors(
        &self,
        email: &str,
        _limit: u32,
    ) -> Result<MentorsResponse, TransportError> {
        Ok(MentorsResponse {
            email: email.to_string(),
            mentors: Vec::new(),
        })
    }

    async fn request_mentor(
        &self,
        payload: &MentorRequestPayload,
    ) -> Result<MentorRequestAck, TransportError> {
        self.mentor_requests.lock().unwrap().push(payload.clone());
        self.mentor_ack.clone().ok_or_else(scripted_error)
    }

    async fn search_courses(
        &self,
        _query: &CourseQuery,
    ) -> Result<CourseSearchResponse, TransportError> {
        Err(scripted_error())
    }

    async fn submit_recognition(
        &self,
        payload: &RecognitionPayload,
    ) -> Result<RecognitionAck, TransportError> {
        self.recognitions.lock().unwrap().push(payload.clone());
        self.recognition_ack.clone().ok_or_else(scripted_error)
    }

    async fn submit_feedback(
        &self,
        payload: &FeedbackPayload,
    ) -> Result<FeedbackAck, TransportError> {
        self.feedback.lock().unwrap().push(payload.clone());
        self.feedback_ack.clone().ok_or_else(scripted_error)
    }

    async fn fetch_leadership(&self, _limit: u32) -> Result<LeadershipResponse, TransportError> {
        Ok(LeadershipResponse { items: Vec::new() })
    }

    async fn send_chat(&self, q: &str, email: Option<&str>) -> Result<ChatReply, TransportError> {
        self.chats
            .lock()
            .unwrap()
            .push((q.to_string(), email.map(str::to_string)));
        self.chat_ack.clone().ok_or_else(scripted_error)
    }

    async fn health(&self) -> Result<HealthResponse, TransportError> {
        Ok(HealthResponse {
            status: "ok".to_string(),
        })
    }
}

fn collector(bus: &Arc<NotificationBus>) -> (Arc<StdMutex<Vec<Notification>>>, Subscription) {
    let seen = Arc::new(StdMutex::new(Vec::new()));
    let subscription = bus.subscribe({
        let seen = Arc::clone(&seen);
        move |notification: &Notification| {
            seen.lock().unwrap().push(notification.clone());
        }
    });
    (seen, subscription)
}

async fn store_with(
    api: ScriptedWriteApi,
    selected: Option<&str>,
) -> (Arc<ScriptedWriteApi>, Arc<SessionStore>, Arc<NotificationBus>) {
    let api = Arc::new(api);
    let bus = NotificationBus::new();
    let store = SessionStore::new(Arc::clone(&api) as Arc<dyn GrowthApi>, Arc::clone(&bus));
    if let Some(email) = selected {
        store.select_employee(email).await;
        // Let the background mentor fetch settle before the test proceeds.
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    (api, store, bus)
}

#[tokio::test]
async fn mentor_submit_resets_draft_and_joins_tips_into_the_reply() {
    let (api, store, bus) = store_with(
        ScriptedWriteApi {
            mentor_ack: Some(MentorRequestAck {
                tips: Some(vec!["Set objectives.".to_string(), "Agree cadence.".to_string()]),
            }),
            ..ScriptedWriteApi::default()
        },
        Some("a@x.com"),
    )
    .await;
    let (notifications, _sub) = collector(&bus);

    let mut controller = MentorRequestController::new(Arc::clone(&store));
    controller.draft.mentor_email = "mentor@x.com".to_string();
    controller.draft.message = "Would value your support.".to_string();

    assert_eq!(controller.submit().await, SubmitOutcome::Submitted);
    assert_eq!(controller.draft, MentorDraft::default());

    let sent = api.mentor_requests.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].mentee_email, "a@x.com");
    assert_eq!(sent[0].mentor_email, "mentor@x.com");

    let notifications = notifications.lock().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].severity, Severity::Success);
    assert_eq!(notifications[0].text, "Mentor request drafted.");

    assert_eq!(
        store.snapshot().await.assistant_reply,
        "Set objectives. \nAgree cadence."
    );
}

#[tokio::test]
async fn mentor_submit_failure_preserves_the_draft() {
    let (_api, store, bus) = store_with(ScriptedWriteApi::default(), Some("a@x.com")).await;
    let (notifications, _sub) = collector(&bus);

    let mut controller = MentorRequestController::new(Arc::clone(&store));
    controller.draft.mentor_email = "mentor@x.com".to_string();
    controller.draft.message = "Please keep this text.".to_string();

    assert_eq!(controller.submit().await, SubmitOutcome::Failed);
    assert_eq!(controller.draft.mentor_email, "mentor@x.com");
    assert_eq!(controller.draft.message, "Please keep this text.");

    let notifications = notifications.lock().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].severity, Severity::Error);
    assert_eq!(notifications[0].text, "Could not submit mentor request.");
}

#[tokio::test]
async fn mentor_submit_without_selection_is_a_noop() {
    let (api, store, bus) = store_with(ScriptedWriteApi::default(), None).await;
    let (notifications, _sub) = collector(&bus);

    let mut controller = MentorRequestController::new(Arc::clone(&store));
    controller.draft.mentor_email = "mentor@x.com".to_string();

    assert_eq!(controller.submit().await, SubmitOutcome::Skipped);
    assert!(api.mentor_requests.lock().unwrap().is_empty());
    assert!(notifications.lock().unwrap().is_empty());
}

#[tokio::test]
async fn mentor_submit_with_empty_mentor_email_is_a_noop() {
    let (api, store, bus) = store_with(ScriptedWriteApi::default(), Some("a@x.com")).await;
    let (notifications, _sub) = collector(&bus);

    let mut controller = MentorRequestController::new(Arc::clone(&store));
    controller.draft.message = "message without a mentor".to_string();

    assert_eq!(controller.submit().await, SubmitOutcome::Skipped);
    assert!(api.mentor_requests.lock().unwrap().is_empty());
    assert!(notifications.lock().unwrap().is_empty());
}

#[tokio::test]
async fn recognition_submit_falls_back_when_share_copy_is_absent() {
    let (api, store, _bus) = store_with(
        ScriptedWriteApi {
            recognition_ack: Some(RecognitionAck { share_copy: None }),
            ..ScriptedWriteApi::default()
        },
        Some("a@x.com"),
    )
    .await;

    let mut controller = RecognitionController::new(Arc::clone(&store));
    controller.draft.recipient_email = "peer@x.com".to_string();
    controller.draft.value = "Courage".to_string();
    controller.draft.message = "Shipped the migration.".to_string();

    assert_eq!(controller.submit().await, SubmitOutcome::Submitted);
    // Reset restores the first company value.
    assert_eq!(controller.draft.value, "Care");
    assert!(controller.draft.recipient_email.is_empty());

    let sent = api.recognitions.lock().unwrap();
    assert_eq!(sent[0].sender_email, "a@x.com");
    assert_eq!(sent[0].psa_value, "Courage");

    assert_eq!(
        store.snapshot().await.assistant_reply,
        RECOGNITION_FALLBACK_REPLY
    );
}

#[tokio::test]
async fn recognition_requires_recipient_and_message() {
    let (api, store, bus) = store_with(ScriptedWriteApi::default(), Some("a@x.com")).await;
    let (notifications, _sub) = collector(&bus);

    let mut controller = RecognitionController::new(Arc::clone(&store));
    controller.draft.recipient_email = "peer@x.com".to_string();

    assert_eq!(controller.submit().await, SubmitOutcome::Skipped);
    assert!(api.recognitions.lock().unwrap().is_empty());
    assert!(notifications.lock().unwrap().is_empty());
}

#[tokio::test]
async fn feedback_submit_splits_strengths_into_an_ordered_list() {
    let (api, store, _bus) = store_with(
        ScriptedWriteApi {
            feedback_ack: Some(FeedbackAck {
                reflection_prompt: None,
            }),
            ..ScriptedWriteApi::default()
        },
        Some("a@x.com"),
    )
    .await;

    let mut controller = FeedbackController::new(Arc::clone(&store));
    controller.draft.focus = "stakeholder communication".to_string();
    controller.draft.strengths = "cloud architecture,  mentoring ,".to_string();

    assert_eq!(controller.submit().await, SubmitOutcome::Submitted);
    assert_eq!(controller.draft, FeedbackDraft::default());

    let sent = api.feedback.lock().unwrap();
    assert_eq!(
        sent[0].strengths,
        vec!["cloud architecture".to_string(), "mentoring".to_string()]
    );
    assert_eq!(sent[0].focus_area, "stakeholder communication");

    assert_eq!(
        store.snapshot().await.assistant_reply,
        FEEDBACK_FALLBACK_REPLY
    );
}

#[tokio::test]
async fn chat_whitespace_only_message_is_a_noop() {
    let (api, store, bus) = store_with(ScriptedWriteApi::default(), Some("a@x.com")).await;
    let (notifications, _sub) = collector(&bus);

    let mut controller = ChatController::new(Arc::clone(&store));
    controller.draft.message = "   ".to_string();

    assert_eq!(controller.submit().await, SubmitOutcome::Skipped);
    assert!(api.chats.lock().unwrap().is_empty());
    assert!(notifications.lock().unwrap().is_empty());
}

#[tokio::test]
async fn chat_trims_the_message_and_clears_input_only_on_success() {
    let (api, store, _bus) = store_with(
        ScriptedWriteApi {
            chat_ack: Some(ChatReply {
                reply: Some("Try a five-minute break.".to_string()),
            }),
            ..ScriptedWriteApi::default()
        },
        Some("a@x.com"),
    )
    .await;

    let mut controller = ChatController::new(Arc::clone(&store));
    controller.draft.message = "  how do I handle stress?  ".to_string();

    assert_eq!(controller.submit().await, SubmitOutcome::Submitted);
    assert_eq!(controller.draft, ChatDraft::default());

    let sent = api.chats.lock().unwrap();
    assert_eq!(sent[0].0, "how do I handle stress?");
    assert_eq!(sent[0].1.as_deref(), Some("a@x.com"));

    assert_eq!(
        store.snapshot().await.assistant_reply,
        "Try a five-minute break."
    );
}

#[tokio::test]
async fn chat_failure_keeps_the_typed_message() {
    let (_api, store, bus) = store_with(ScriptedWriteApi::default(), Some("a@x.com")).await;
    let (notifications, _sub) = collector(&bus);

    let mut controller = ChatController::new(Arc::clone(&store));
    controller.draft.message = "  still here  ".to_string();

    assert_eq!(controller.submit().await, SubmitOutcome::Failed);
    assert_eq!(controller.draft.message, "  still here  ");

    let notifications = notifications.lock().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].text, "The assistant is unavailable right now.");
}

#[tokio::test]
async fn chat_works_without_a_selection_and_falls_back_on_missing_reply() {
    let (api, store, _bus) = store_with(
        ScriptedWriteApi {
            chat_ack: Some(ChatReply { reply: None }),
            ..ScriptedWriteApi::default()
        },
        None,
    )
    .await;

    let mut controller = ChatController::new(Arc::clone(&store));
    controller.draft.message = "hello".to_string();

    assert_eq!(controller.submit().await, SubmitOutcome::Submitted);

    let sent = api.chats.lock().unwrap();
    assert_eq!(sent[0].1, None);

    assert_eq!(store.snapshot().await.assistant_reply, ASSISTANT_PROMPT);
}
