use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const LOGIN: &str = "/auth/login";
pub const REFRESH: &str = "/auth/refresh";
pub const ME: &str = "/auth/me";
pub const REGISTER: &str = "/auth/register";
pub const APPOINTMENTS: &str = "/appointments/";
pub const APPOINTMENT: &str = "/appointments/{appointment_id}";
pub const DOCTORS: &str = "/doctors/";
pub const DOCTOR: &str = "/doctors/{doctor_id}";
pub const PATIENT: &str = "/patients/{patient_id}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Patient,
    Doctor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            "admin" => Ok(Role::Admin),
            other => Err(format!(
                "Unknown role '{other}' (expected patient, doctor or admin)"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Tokens issued by login and refresh. Either token may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenPair {
    /// Access token, unless missing or empty.
    pub fn access(&self) -> Option<&str> {
        non_empty(&self.access_token)
    }

    /// Refresh token, unless missing or empty.
    pub fn refresh(&self) -> Option<&str> {
        non_empty(&self.refresh_token)
    }

    pub fn has_token(&self) -> bool {
        self.access().is_some() || self.refresh().is_some()
    }
}

fn non_empty(token: &Option<String>) -> Option<&str> {
    token.as_deref().filter(|t| !t.is_empty())
}

/// Response of `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserInfo {
    pub role: Role,
    pub user_id: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
}

/// A registered user as returned by the backend. The password never comes back.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Profile fields a patient may change. Unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PatientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl PatientUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone_number.is_none()
            && self.dob.is_none()
            && self.address.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Appointment {
    pub appointment_id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    #[serde(deserialize_with = "timestamp")]
    pub appointment_date: DateTime<Utc>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentCreate {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Reschedule or change the status of a booking. Unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppointmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Query for `GET /appointments/`. The server narrows results to what the
/// caller's role may see before these filters apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFilter {
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub status: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl AppointmentFilter {
    /// Encoded query string with a leading `?`, or empty when nothing is set.
    pub fn query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();

        if let Some(id) = self.patient_id {
            pairs.push(("patient_id", id.to_string()));
        }
        if let Some(id) = self.doctor_id {
            pairs.push(("doctor_id", id.to_string()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("start_date", start.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date", end.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        if let Some(skip) = self.skip {
            pairs.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }

        query_string(&pairs)
    }
}

pub(crate) fn query_string(pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return String::new();
    }

    let encoded: Vec<String> = pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect();
    format!("?{}", encoded.join("&"))
}

/// Datetimes come back with an offset, or naive (UTC) from stores that drop it.
fn timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| invalid_timestamp(&raw))
}

fn optional_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| invalid_timestamp(&raw)),
        None => Ok(None),
    }
}

fn invalid_timestamp<E: serde::de::Error>(raw: &str) -> E {
    E::custom(format!("invalid datetime '{raw}'"))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[path = "endpoints_test.rs"]
mod endpoints_test;
