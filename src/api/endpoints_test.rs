use super::*;
use chrono::TimeZone;
use serde_json::json;

#[test]
fn test_empty_tokens_count_as_missing() {
    let tokens = TokenPair {
        access_token: Some(String::new()),
        refresh_token: Some(String::new()),
        token_type: Some("bearer".to_string()),
    };

    assert_eq!(tokens.access(), None);
    assert_eq!(tokens.refresh(), None);
    assert!(!tokens.has_token());
}

#[test]
fn test_one_token_is_enough() {
    let tokens = TokenPair {
        access_token: Some(String::new()),
        refresh_token: Some("R1".to_string()),
        token_type: None,
    };

    assert_eq!(tokens.refresh(), Some("R1"));
    assert!(tokens.has_token());
}

#[test]
fn test_empty_filter_has_no_query() {
    assert_eq!(AppointmentFilter::default().query_string(), "");
}

#[test]
fn test_filter_query_is_encoded() {
    let filter = AppointmentFilter {
        doctor_id: Some(7),
        status: Some("no show".to_string()),
        start_date: Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()),
        limit: Some(10),
        ..Default::default()
    };

    assert_eq!(
        filter.query_string(),
        "?doctor_id=7&status=no%20show&start_date=2024-05-01T09%3A00%3A00Z&limit=10"
    );
}

#[test]
fn test_appointment_accepts_naive_and_offset_datetimes() {
    let appointment: Appointment = serde_json::from_value(json!({
        "appointment_id": 3,
        "patient_id": 1,
        "doctor_id": 2,
        "appointment_date": "2024-05-01T09:00:00",
        "status": "scheduled",
        "created_at": "2024-04-20T12:30:00.123456+02:00"
    }))
    .unwrap();

    assert_eq!(
        appointment.appointment_date,
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    );
    assert_eq!(
        appointment.created_at.map(|t| t.timestamp()),
        Some(Utc.with_ymd_and_hms(2024, 4, 20, 10, 30, 0).unwrap().timestamp())
    );
    assert_eq!(appointment.status.as_deref(), Some("scheduled"));
}

#[test]
fn test_appointment_status_and_created_at_optional() {
    let appointment: Appointment = serde_json::from_value(json!({
        "appointment_id": 3,
        "patient_id": 1,
        "doctor_id": 2,
        "appointment_date": "2024-05-01T09:00:00Z",
        "status": null
    }))
    .unwrap();

    assert_eq!(appointment.status, None);
    assert_eq!(appointment.created_at, None);
}

#[test]
fn test_appointment_rejects_bad_datetime() {
    let result = serde_json::from_value::<Appointment>(json!({
        "appointment_id": 3,
        "patient_id": 1,
        "doctor_id": 2,
        "appointment_date": "tomorrow"
    }));

    assert!(result.is_err());
}

#[test]
fn test_updates_send_only_set_fields() {
    let update = AppointmentUpdate {
        status: Some("cancelled".to_string()),
        ..Default::default()
    };
    assert_eq!(
        serde_json::to_value(&update).unwrap(),
        json!({"status": "cancelled"})
    );

    let update = PatientUpdate {
        phone_number: Some("555-0100".to_string()),
        ..Default::default()
    };
    assert!(!update.is_empty());
    assert!(PatientUpdate::default().is_empty());
    assert_eq!(
        serde_json::to_value(&update).unwrap(),
        json!({"phone_number": "555-0100"})
    );
}
