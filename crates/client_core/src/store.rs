//! Session state: the selected employee, the loaded plan catalogue, and the
//! per-feature result sets, with the dependent/parallel load protocol and
//! stale-response suppression.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use shared::{
    domain::{CourseResult, EmployeePlan, LeadershipEntry, MentorMatch},
    protocol::{CourseQuery, PlanCatalogue},
};

use crate::{notify::NotificationBus, transport::GrowthApi};

pub const MENTOR_LIMIT: u32 = 3;
pub const LEADERSHIP_LIMIT: u32 = 6;
/// Seed text for the assistant reply panel, also the chat fallback.
pub const ASSISTANT_PROMPT: &str =
    "Ask the assistant about roles, skills, mentors, or well-being.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    NotLoaded,
    Loading,
    Loaded,
    Failed,
}

/// One data category. The last resolved value survives `Loading` and
/// `Failed`, so a refresh in flight or a failed refresh never blanks data
/// already on screen.
#[derive(Debug, Clone)]
struct CategoryState<T> {
    phase: LoadPhase,
    value: T,
    last_error: Option<String>,
}

impl<T: Default> Default for CategoryState<T> {
    fn default() -> Self {
        Self {
            phase: LoadPhase::NotLoaded,
            value: T::default(),
            last_error: None,
        }
    }
}

impl<T> CategoryState<T> {
    fn begin(&mut self) {
        self.phase = LoadPhase::Loading;
    }

    fn resolve(&mut self, value: T) {
        self.phase = LoadPhase::Loaded;
        self.value = value;
        self.last_error = None;
    }

    fn fail(&mut self, error: String) {
        self.phase = LoadPhase::Failed;
        self.last_error = Some(error);
    }
}

/// Change feed for subscribed views; a re-render trigger, not a data
/// carrier. Views pull the data they need via [`SessionStore::snapshot`].
#[derive(Debug, Clone)]
pub enum SessionEvent {
    PlansLoaded,
    PlansFailed,
    SelectionChanged(String),
    MentorsUpdated,
    CoursesUpdated,
    LeadershipUpdated,
    AssistantReplyChanged,
}

/// Raw filter text as typed by the user; numeric fields are parsed (and
/// silently omitted when unparseable) when the search is issued.
#[derive(Debug, Clone, Default)]
pub struct CourseFilterInput {
    pub skill: String,
    pub difficulty: String,
    pub min_hours: String,
    pub max_hours: String,
}

impl CourseFilterInput {
    pub fn to_query(&self) -> CourseQuery {
        CourseQuery {
            skill: non_empty(&self.skill),
            difficulty: non_empty(&self.difficulty),
            min_hours: parse_hours(&self.min_hours),
            max_hours: parse_hours(&self.max_hours),
            ..CourseQuery::default()
        }
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_hours(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

struct SessionState {
    plans: CategoryState<PlanCatalogue>,
    selected_email: Option<String>,
    mentors: CategoryState<Vec<MentorMatch>>,
    courses: CategoryState<Vec<CourseResult>>,
    leadership: CategoryState<Vec<LeadershipEntry>>,
    assistant_reply: String,
}

#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub plans_phase: LoadPhase,
    pub selected_email: Option<String>,
    pub active_plan: Option<EmployeePlan>,
    pub mentors_phase: LoadPhase,
    pub mentors: Vec<MentorMatch>,
    pub courses_phase: LoadPhase,
    pub courses: Vec<CourseResult>,
    pub leadership_phase: LoadPhase,
    pub leadership: Vec<LeadershipEntry>,
    pub assistant_reply: String,
}

pub struct SessionStore {
    api: Arc<dyn GrowthApi>,
    bus: Arc<NotificationBus>,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn GrowthApi>, bus: Arc<NotificationBus>) -> Arc<Self> {
        let (events, _) = broadcast::channel(1024);
        Arc::new(Self {
            api,
            bus,
            inner: Mutex::new(SessionState {
                plans: CategoryState::default(),
                selected_email: None,
                mentors: CategoryState::default(),
                courses: CategoryState::default(),
                leadership: CategoryState::default(),
                assistant_reply: ASSISTANT_PROMPT.to_string(),
            }),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) fn api(&self) -> &Arc<dyn GrowthApi> {
        &self.api
    }

    pub(crate) fn bus(&self) -> &Arc<NotificationBus> {
        &self.bus
    }

    /// Catalogue first (blocking); on success the first entry in catalogue
    /// iteration order becomes the active selection, then the mentor and
    /// leadership fetches run concurrently with no mutual ordering. A
    /// catalogue failure is terminal: no automatic retry.
    pub async fn initial_load(self: &Arc<Self>) {
        {
            self.inner.lock().await.plans.begin();
        }

        match self.api.fetch_plans(None).await {
            Ok(catalogue) => {
                info!(employees = catalogue.len(), "plan catalogue loaded");
                let first_email = catalogue.keys().next().cloned();
                {
                    let mut state = self.inner.lock().await;
                    state.plans.resolve(catalogue);
                    state.selected_email = first_email.clone();
                }
                let _ = self.events.send(SessionEvent::PlansLoaded);

                if let Some(email) = first_email {
                    let _ = self
                        .events
                        .send(SessionEvent::SelectionChanged(email.clone()));
                    futures::future::join(
                        self.refresh_mentors(email),
                        self.refresh_leadership(),
                    )
                    .await;
                }
            }
            Err(err) => {
                error!(%err, "plan catalogue load failed");
                {
                    self.inner.lock().await.plans.fail(err.to_string());
                }
                self.bus.error("Failed to load plans. Check API status.");
                let _ = self.events.send(SessionEvent::PlansFailed);
            }
        }
    }

    /// Updates the selection immediately and issues a mentor fetch for the
    /// new email in the background. Previous mentor results stay on screen
    /// until that fetch resolves.
    pub async fn select_employee(self: &Arc<Self>, email: impl Into<String>) {
        let email = email.into();
        {
            self.inner.lock().await.selected_email = Some(email.clone());
        }
        let _ = self
            .events
            .send(SessionEvent::SelectionChanged(email.clone()));

        let store = Arc::clone(self);
        tokio::spawn(async move {
            store.refresh_mentors(email).await;
        });
    }

    /// Fetch mentors for `email`. The result (success or failure) is
    /// applied only if `email` is still the active selection when the
    /// response arrives; a superseded response is dropped without touching
    /// state or notifying.
    pub async fn refresh_mentors(self: &Arc<Self>, email: String) {
        {
            self.inner.lock().await.mentors.begin();
        }

        let result = self.api.fetch_mentors(&email, MENTOR_LIMIT).await;

        let mut state = self.inner.lock().await;
        if state.selected_email.as_deref() != Some(email.as_str()) {
            debug!(origin = %email, "dropping mentor response for superseded selection");
            return;
        }

        match result {
            Ok(response) => {
                state.mentors.resolve(response.mentors);
                drop(state);
                let _ = self.events.send(SessionEvent::MentorsUpdated);
            }
            Err(err) => {
                warn!(%err, email = %email, "mentor fetch failed");
                state.mentors.fail(err.to_string());
                drop(state);
                self.bus.error("Unable to load mentors right now.");
                let _ = self.events.send(SessionEvent::MentorsUpdated);
            }
        }
    }

    /// Course search has no "current selection" concept: the latest
    /// *resolved* search overwrites the display, even if it was not the
    /// latest issued. On failure the previous list stays.
    pub async fn search_courses(self: &Arc<Self>, filters: &CourseFilterInput) {
        let query = filters.to_query();
        {
            self.inner.lock().await.courses.begin();
        }

        match self.api.search_courses(&query).await {
            Ok(response) => {
                let count = response.items.len();
                {
                    self.inner.lock().await.courses.resolve(response.items);
                }
                self.bus.info(format!("Found {count} courses."));
                let _ = self.events.send(SessionEvent::CoursesUpdated);
            }
            Err(err) => {
                warn!(%err, "course search failed");
                {
                    self.inner.lock().await.courses.fail(err.to_string());
                }
                self.bus
                    .error("Course search failed. Try adjusting filters.");
                let _ = self.events.send(SessionEvent::CoursesUpdated);
            }
        }
    }

    /// Best-effort secondary widget, independent of the employee selection.
    /// Failures are logged, never surfaced to the user.
    pub async fn refresh_leadership(self: &Arc<Self>) {
        {
            self.inner.lock().await.leadership.begin();
        }

        match self.api.fetch_leadership(LEADERSHIP_LIMIT).await {
            Ok(response) => {
                {
                    self.inner.lock().await.leadership.resolve(response.items);
                }
                let _ = self.events.send(SessionEvent::LeadershipUpdated);
            }
            Err(err) => {
                warn!(%err, "leadership board fetch failed");
                self.inner.lock().await.leadership.fail(err.to_string());
            }
        }
    }

    /// Wholesale replacement of a single catalogue entry via
    /// `GET /plans?email=`.
    pub async fn refresh_plan(self: &Arc<Self>, email: &str) {
        match self.api.fetch_plans(Some(email)).await {
            Ok(mut catalogue) => {
                let Some(plan) = catalogue.remove(email) else {
                    debug!(email, "plan refetch returned no entry");
                    return;
                };
                {
                    self.inner
                        .lock()
                        .await
                        .plans
                        .value
                        .insert(email.to_string(), plan);
                }
                let _ = self.events.send(SessionEvent::PlansLoaded);
            }
            Err(err) => {
                warn!(%err, email, "plan refetch failed");
                self.bus.error("Could not refresh the selected plan.");
            }
        }
    }

    pub async fn set_assistant_reply(&self, reply: impl Into<String>) {
        {
            self.inner.lock().await.assistant_reply = reply.into();
        }
        let _ = self.events.send(SessionEvent::AssistantReplyChanged);
    }

    pub async fn selected_email(&self) -> Option<String> {
        self.inner.lock().await.selected_email.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.lock().await;
        SessionSnapshot {
            plans_phase: state.plans.phase,
            selected_email: state.selected_email.clone(),
            active_plan: state
                .selected_email
                .as_ref()
                .and_then(|email| state.plans.value.get(email).cloned()),
            mentors_phase: state.mentors.phase,
            mentors: state.mentors.value.clone(),
            courses_phase: state.courses.phase,
            courses: state.courses.value.clone(),
            leadership_phase: state.leadership.phase,
            leadership: state.leadership.value.clone(),
            assistant_reply: state.assistant_reply.clone(),
        }
    }
}
