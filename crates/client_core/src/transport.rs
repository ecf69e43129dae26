//! Thin HTTP wrapper with uniform error normalization, plus the typed
//! endpoint surface of the growth API.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

use shared::protocol::{
    ChatReply, CourseQuery, CourseSearchResponse, FeedbackAck, FeedbackPayload, HealthResponse,
    LeadershipResponse, MentorRequestAck, MentorRequestPayload, MentorsResponse, PlanCatalogue,
    RecognitionAck, RecognitionPayload,
};

#[derive(Debug, Error)]
pub enum TransportError {
    /// Non-success HTTP status; the response body is captured as text.
    #[error("{status} {status_text}: {body}")]
    Status {
        status: u16,
        status_text: String,
        body: String,
    },
    /// DNS, connection, or timeout failure before a status was received.
    #[error("request failed: {message}")]
    Network { message: String },
    /// The response arrived but was not the expected JSON shape.
    #[error("invalid response payload: {message}")]
    Decode { message: String },
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Drops pairs whose value is absent or empty; everything else is already
/// stringified by the caller. Callers pass sparse filter sets and rely on
/// absent keys never reaching the wire.
pub fn build_query(params: &[(&str, Option<String>)]) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(key, value)| match value {
            Some(v) if !v.is_empty() => Some(((*key).to_string(), v.clone())),
            _ => None,
        })
        .collect()
}

pub struct Transport {
    http: Client,
    base_url: String,
}

impl Transport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exactly one attempt; no retry. Touches nothing but the network;
    /// callers translate the result into state changes and notifications.
    pub async fn request_json(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, Option<String>)],
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.http.request(method, &url);
        let query = build_query(query);
        if !query.is_empty() {
            request = request.query(&query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|err| TransportError::Network {
            message: err.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                status_text: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
                body,
            });
        }

        let text = response.text().await.map_err(|err| TransportError::Network {
            message: err.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|err| TransportError::Decode {
            message: err.to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, Option<String>)],
    ) -> Result<T, TransportError> {
        let value = self.request_json(Method::GET, endpoint, query, None).await?;
        decode(value)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        let body = serde_json::to_value(body).map_err(|err| TransportError::Decode {
            message: err.to_string(),
        })?;
        let value = self
            .request_json(Method::POST, endpoint, &[], Some(&body))
            .await?;
        decode(value)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, TransportError> {
    serde_json::from_value(value).map_err(|err| TransportError::Decode {
        message: err.to_string(),
    })
}

/// Typed surface over the growth API, one operation per consumed endpoint.
/// A trait so the store and draft controllers can be driven by scripted
/// doubles in tests.
#[async_trait]
pub trait GrowthApi: Send + Sync {
    async fn fetch_plans(&self, email: Option<&str>) -> Result<PlanCatalogue, TransportError>;
    async fn fetch_mentors(&self, email: &str, limit: u32)
        -> Result<MentorsResponse, TransportError>;
    async fn request_mentor(
        &self,
        payload: &MentorRequestPayload,
    ) -> Result<MentorRequestAck, TransportError>;
    async fn search_courses(
        &self,
        query: &CourseQuery,
    ) -> Result<CourseSearchResponse, TransportError>;
    async fn submit_recognition(
        &self,
        payload: &RecognitionPayload,
    ) -> Result<RecognitionAck, TransportError>;
    async fn submit_feedback(
        &self,
        payload: &FeedbackPayload,
    ) -> Result<FeedbackAck, TransportError>;
    async fn fetch_leadership(&self, limit: u32) -> Result<LeadershipResponse, TransportError>;
    async fn send_chat(&self, q: &str, email: Option<&str>) -> Result<ChatReply, TransportError>;
    async fn health(&self) -> Result<HealthResponse, TransportError>;
}

pub struct HttpGrowthApi {
    transport: Transport,
}

impl HttpGrowthApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            transport: Transport::new(base_url),
        }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}

#[async_trait]
impl GrowthApi for HttpGrowthApi {
    async fn fetch_plans(&self, email: Option<&str>) -> Result<PlanCatalogue, TransportError> {
        self.transport
            .get("/plans", &[("email", email.map(str::to_string))])
            .await
    }

    async fn fetch_mentors(
        &self,
        email: &str,
        limit: u32,
    ) -> Result<MentorsResponse, TransportError> {
        self.transport
            .get(
                "/mentors",
                &[
                    ("email", Some(email.to_string())),
                    ("limit", Some(limit.to_string())),
                ],
            )
            .await
    }

    async fn request_mentor(
        &self,
        payload: &MentorRequestPayload,
    ) -> Result<MentorRequestAck, TransportError> {
        self.transport.post("/mentors/request", payload).await
    }

    async fn search_courses(
        &self,
        query: &CourseQuery,
    ) -> Result<CourseSearchResponse, TransportError> {
        self.transport
            .get(
                "/courses",
                &[
                    ("q", query.q.clone()),
                    ("skill", query.skill.clone()),
                    ("difficulty", query.difficulty.clone()),
                    ("min_hours", query.min_hours.map(|v| v.to_string())),
                    ("max_hours", query.max_hours.map(|v| v.to_string())),
                    ("limit", query.limit.map(|v| v.to_string())),
                ],
            )
            .await
    }

    async fn submit_recognition(
        &self,
        payload: &RecognitionPayload,
    ) -> Result<RecognitionAck, TransportError> {
        self.transport.post("/recognitions", payload).await
    }

    async fn submit_feedback(
        &self,
        payload: &FeedbackPayload,
    ) -> Result<FeedbackAck, TransportError> {
        self.transport.post("/feedback", payload).await
    }

    async fn fetch_leadership(&self, limit: u32) -> Result<LeadershipResponse, TransportError> {
        self.transport
            .get("/leadership", &[("limit", Some(limit.to_string()))])
            .await
    }

    async fn send_chat(&self, q: &str, email: Option<&str>) -> Result<ChatReply, TransportError> {
        self.transport
            .get(
                "/chat",
                &[
                    ("q", Some(q.to_string())),
                    ("email", email.map(str::to_string)),
                ],
            )
            .await
    }

    async fn health(&self) -> Result<HealthResponse, TransportError> {
        self.transport.get("/health", &[]).await
    }
}
