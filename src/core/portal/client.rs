//! Blocking portal API client
//!
//! All calls are synchronous; bodies are read in fixed-size chunks solely
//! to drive a progress bar. Non-success statuses abort the operation with
//! a dedicated error; nothing is retried.

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;

use crate::core::error::{PortalError, Result};
use crate::core::models::course::{
    OfferedSection, OfferedSectionDto, PrerequisiteRelation, PrerequisiteRelationDto,
    RegisteredAttempt, RegisteredAttemptDto,
};
use crate::core::portal::auth::{self, CachedToken};
use crate::{debug, warn};

/// API path of the token endpoint
const AUTH_TOKEN_PATH: &str = "/v2/account/token";

fn offered_courses_path(student_id: &str) -> String {
    format!("/api/v1/registration/{student_id}/all-offer-courses")
}

fn registered_courses_path(student_id: &str) -> String {
    format!("/api/v1/registration/student-registered-courses/{student_id}/all")
}

fn prerequisite_courses_path(student_id: &str) -> String {
    format!("/api/v1/registration/{student_id}/pre-requisite-courses")
}

/// An authenticated portal session
struct Session {
    student_id: String,
    token: String,
}

/// Client for the university portal API
pub struct PortalClient {
    http: reqwest::blocking::Client,
    base_url: String,
    token_cache: PathBuf,
    session: Option<Session>,
}

impl PortalClient {
    /// Create a client against `base_url`, caching tokens at `token_cache`
    #[must_use]
    pub fn new(base_url: &str, token_cache: PathBuf) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token_cache,
            session: None,
        }
    }

    /// Authenticate a student, preferring an unexpired cached token.
    ///
    /// Returns `Ok(true)` on success and `Ok(false)` when the portal
    /// rejects the credentials (recoverable; the caller may reprompt).
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decode failures
    pub fn authenticate(&mut self, student_id: &str, password: &str) -> Result<bool> {
        if let Some(cached) = auth::load_cached_token(&self.token_cache) {
            if cached.is_valid_for(student_id) {
                debug!("Reusing cached auth token for student {student_id}");
                self.session = Some(Session {
                    student_id: student_id.to_string(),
                    token: cached.token,
                });
                return Ok(true);
            }
        }

        let url = format!("{}{AUTH_TOKEN_PATH}", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "email": student_id, "password": password }))
            .send()?;
        // The token endpoint reports bad credentials in the body, so the
        // status is not validated here.
        let body = read_body_with_progress(response, "Fetching auth token")?;
        let payload: Value = serde_json::from_slice(&body)?;

        let Some((token, expires)) = parse_token_payload(&payload) else {
            return Ok(false);
        };

        if let Some(expires) = expires {
            let cached = CachedToken {
                student_id: student_id.to_string(),
                token: token.clone(),
                expires,
            };
            if let Err(e) = auth::store_cached_token(&self.token_cache, &cached) {
                warn!("Failed to cache auth token: {e}");
            }
        }

        self.session = Some(Session {
            student_id: student_id.to_string(),
            token,
        });
        Ok(true)
    }

    /// Fetch every offered course section for the authenticated student
    ///
    /// # Errors
    ///
    /// Returns an error when unauthenticated or on HTTP/decode failures
    pub fn fetch_offered_sections(&self) -> Result<Vec<OfferedSection>> {
        let path = offered_courses_path(&self.session()?.student_id);
        let payload = self.fetch_json(&path, "Fetching offered courses")?;
        let dtos: Vec<OfferedSectionDto> =
            serde_json::from_value(extract(&payload, "/data/eligibleOfferCourses"))?;
        Ok(dtos.into_iter().map(OfferedSection::from_wire).collect())
    }

    /// Fetch the student's full registered-course history
    ///
    /// # Errors
    ///
    /// Returns an error when unauthenticated or on HTTP/decode failures
    pub fn fetch_registered_attempts(&self) -> Result<Vec<RegisteredAttempt>> {
        let path = registered_courses_path(&self.session()?.student_id);
        let payload = self.fetch_json(&path, "Fetching registered courses")?;
        let dtos: Vec<RegisteredAttemptDto> = serde_json::from_value(extract(&payload, "/data"))?;
        Ok(dtos.into_iter().map(RegisteredAttempt::from_wire).collect())
    }

    /// Fetch the prerequisite relations recorded for the student
    ///
    /// # Errors
    ///
    /// Returns an error when unauthenticated or on HTTP/decode failures
    pub fn fetch_prerequisites(&self) -> Result<Vec<PrerequisiteRelation>> {
        let path = prerequisite_courses_path(&self.session()?.student_id);
        let payload = self.fetch_json(&path, "Fetching prerequisites")?;
        let dtos: Vec<PrerequisiteRelationDto> = serde_json::from_value(extract(&payload, "/data"))?;
        Ok(dtos
            .into_iter()
            .map(PrerequisiteRelation::from_wire)
            .collect())
    }

    fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(PortalError::Auth)
    }

    fn fetch_json(&self, path: &str, message: &str) -> Result<Value> {
        let token = &self.session()?.token;
        let url = format!("{}{path}", self.base_url);
        debug!("GET {url}");

        let response = self.http.get(&url).bearer_auth(token).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = read_body_with_progress(response, message)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Pull `access_token` and `expires` out of a token-endpoint payload.
/// `None` means the response carries no usable token data (bad
/// credentials).
fn parse_token_payload(payload: &Value) -> Option<(String, Option<DateTime<Utc>>)> {
    let data = payload.get("data")?.as_array()?.first()?;
    let token = data.get("access_token")?.as_str()?.to_string();
    let expires = data
        .get("expires")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc));
    Some((token, expires))
}

/// Field lookup that treats a missing field as an empty record list
fn extract(payload: &Value, pointer: &str) -> Value {
    payload
        .pointer(pointer)
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()))
}

/// Read a response body in fixed chunks, driving a progress bar sized by
/// content-length when the server sends one
fn read_body_with_progress(
    mut response: reqwest::blocking::Response,
    message: &str,
) -> Result<Vec<u8>> {
    let bar = response
        .content_length()
        .map_or_else(ProgressBar::new_spinner, ProgressBar::new);
    bar.set_style(progress_style());
    bar.set_message(message.to_string());

    let mut body = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        let n = response.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
        bar.inc(n as u64);
    }
    bar.finish_and_clear();
    Ok(body)
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_payload_parsing() {
        let payload = json!({
            "data": [{
                "access_token": "tok123",
                "expires": "2030-01-01T00:00:00+06:00"
            }]
        });

        let (token, expires) = parse_token_payload(&payload).unwrap();
        assert_eq!(token, "tok123");
        assert!(expires.unwrap() > Utc::now());
    }

    #[test]
    fn test_token_payload_without_data_is_rejected() {
        assert!(parse_token_payload(&json!({"data": []})).is_none());
        assert!(parse_token_payload(&json!({"message": "bad credentials"})).is_none());
        assert!(parse_token_payload(&json!({"data": [{"expires": "x"}]})).is_none());
    }

    #[test]
    fn test_token_payload_with_unparsable_expiry_still_yields_token() {
        let payload = json!({
            "data": [{ "access_token": "tok123", "expires": "soon" }]
        });
        let (token, expires) = parse_token_payload(&payload).unwrap();
        assert_eq!(token, "tok123");
        assert!(expires.is_none());
    }

    #[test]
    fn test_extract_defaults_to_empty_list() {
        let payload = json!({"data": {"eligibleOfferCourses": [1, 2]}});
        assert_eq!(
            extract(&payload, "/data/eligibleOfferCourses"),
            json!([1, 2])
        );
        assert_eq!(extract(&payload, "/data/other"), json!([]));
    }

    #[test]
    fn test_endpoint_paths_embed_student_id() {
        assert_eq!(
            offered_courses_path("123"),
            "/api/v1/registration/123/all-offer-courses"
        );
        assert_eq!(
            registered_courses_path("123"),
            "/api/v1/registration/student-registered-courses/123/all"
        );
        assert_eq!(
            prerequisite_courses_path("123"),
            "/api/v1/registration/123/pre-requisite-courses"
        );
    }
}
