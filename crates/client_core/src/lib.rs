//! Client-side orchestration core for the employee growth dashboard: issues
//! the interdependent API requests, keeps session state consistent when
//! responses race or fail, and broadcasts transient status notifications to
//! decoupled views.

pub mod config;
pub mod drafts;
pub mod notify;
pub mod store;
pub mod transport;

pub use config::{load_settings, normalize_base_url, Settings};
pub use drafts::{
    ChatController, ChatDraft, FeedbackController, FeedbackDraft, MentorDraft,
    MentorRequestController, RecognitionController, RecognitionDraft, SubmitOutcome,
};
pub use notify::{Notification, NotificationBus, NotificationTray, Severity, Subscription};
pub use store::{
    CourseFilterInput, LoadPhase, SessionEvent, SessionSnapshot, SessionStore,
};
pub use transport::{GrowthApi, HttpGrowthApi, Transport, TransportError};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod lib_tests;

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod store_tests;

#[cfg(test)]
#[path = "tests/drafts_tests.rs"]
mod drafts_tests;
