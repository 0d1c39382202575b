//! Integration tests for the provider HTTP client against a mock provider.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde_json::json;
use slot_provider::{
    Clock, Gender, GatewayError, NewAppointment, NewPatient, PatientId, ProviderClient,
    ProviderConfig, ProviderGateway, RetryPolicy,
};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Clock that only moves when told to.
struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(
            Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap(),
        )))
    }

    fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

fn config(server: &MockServer) -> ProviderConfig {
    ProviderConfig {
        base_url: server.uri(),
        client_id: "client".into(),
        client_secret: "secret".into(),
        refresh_token: "refresh".into(),
        doctor_id: "42".into(),
        office_id: "7".into(),
        exam_room: "1".into(),
        attempt_limit: 3,
    }
}

fn client(server: &MockServer, attempt_limit: u32) -> ProviderClient {
    ProviderClient::with_parts(
        config(server),
        RetryPolicy::immediate(attempt_limit),
        ManualClock::new(),
    )
    .unwrap()
}

async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/o/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": token })))
        .mount(server)
        .await;
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

#[tokio::test]
async fn office_hours_are_read_from_first_office() {
    let server = MockServer::start().await;
    mount_token(&server, "t").await;
    Mock::given(method("GET"))
        .and(path("/api/offices"))
        .and(query_param("doctor", "42"))
        .and(header("authorization", "Bearer t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "start_time": "09:00:00", "end_time": "22:00:00" },
                { "start_time": "07:00:00", "end_time": "12:00:00" }
            ],
            "next": null
        })))
        .mount(&server)
        .await;

    let hours = client(&server, 3).office_hours().await.unwrap();

    assert_eq!(hours.opens, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    assert_eq!(hours.closes, NaiveTime::from_hms_opt(22, 0, 0).unwrap());
}

#[tokio::test]
async fn empty_office_list_fails_after_retries() {
    let server = MockServer::start().await;
    mount_token(&server, "t").await;
    Mock::given(method("GET"))
        .and(path("/api/offices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [], "next": null })))
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server, 2).office_hours().await.unwrap_err();

    assert!(matches!(err, GatewayError::NoOffice { attempts: 3 }));
    assert!(err.is_unavailable());
}

#[tokio::test]
async fn appointments_follow_pagination() {
    let server = MockServer::start().await;
    mount_token(&server, "t").await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "last_billed_date": "2026-03-03 11:00", "duration": 45 }],
            "next": null
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .and(query_param("date_range", "2026-03-02/2026-03-08"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "last_billed_date": "2026-03-02 09:30", "duration": "30" },
                { "last_billed_date": "2026-03-02 15:30", "duration": "120" }
            ],
            "next": format!("{}/api/appointments?page=2", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    let appointments = client(&server, 3)
        .appointments(day(), NaiveDate::from_ymd_opt(2026, 3, 8).unwrap())
        .await
        .unwrap();

    assert_eq!(appointments.len(), 3);
    assert!(appointments.iter().all(|a| a.is_booked()));
    assert_eq!(appointments[1].duration_minutes(), 120);
    assert_eq!(
        appointments[2].start(),
        NaiveDate::from_ymd_opt(2026, 3, 3)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap()
    );
}

#[tokio::test]
async fn pagination_stops_when_a_page_repeats() {
    let server = MockServer::start().await;
    mount_token(&server, "t").await;
    let page_two = format!("{}/api/appointments?page=2", server.uri());
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "last_billed_date": "2026-03-03 11:00", "duration": 45 }],
            "next": page_two
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .and(query_param("date_range", "2026-03-02/2026-03-08"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "last_billed_date": "2026-03-02 09:30", "duration": 30 }],
            "next": page_two
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, 3)
        .appointments(day(), NaiveDate::from_ymd_opt(2026, 3, 8).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::InvalidRecord(ref m) if m.contains("page=2")));
}

#[tokio::test]
async fn unauthorized_refreshes_token_and_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/o/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "stale" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/o/token/"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "fresh" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [], "next": null })))
        .expect(1)
        .mount(&server)
        .await;

    let appointments = client(&server, 3).appointments(day(), day()).await.unwrap();

    assert!(appointments.is_empty());
}

#[tokio::test]
async fn server_errors_stop_at_attempt_limit() {
    let server = MockServer::start().await;
    mount_token(&server, "t").await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server, 2).appointments(day(), day()).await.unwrap_err();

    match err {
        GatewayError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn transient_server_error_recovers() {
    let server = MockServer::start().await;
    mount_token(&server, "t").await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "last_billed_date": "2026-03-02 09:30", "duration": "30" }],
            "next": null
        })))
        .mount(&server)
        .await;

    let appointments = client(&server, 3).appointments(day(), day()).await.unwrap();

    assert_eq!(appointments.len(), 1);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    mount_token(&server, "t").await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, 3).appointments(day(), day()).await.unwrap_err();

    assert!(matches!(err, GatewayError::Status { status: 403, .. }));
    assert!(!err.is_unavailable());
}

#[tokio::test]
async fn token_endpoint_rejection_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/o/token/"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
        .mount(&server)
        .await;

    let err = client(&server, 3).office_hours().await.unwrap_err();

    assert!(matches!(err, GatewayError::Auth { status: 400, .. }));
}

#[tokio::test]
async fn expired_token_is_exchanged_again() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/o/token/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "t", "expires_in": 3600 })),
        )
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [], "next": null })))
        .expect(3)
        .mount(&server)
        .await;
    let clock = ManualClock::new();
    let client =
        ProviderClient::with_parts(config(&server), RetryPolicy::immediate(3), clock.clone())
            .unwrap();

    client.appointments(day(), day()).await.unwrap();
    client.appointments(day(), day()).await.unwrap();
    clock.advance(Duration::hours(2));
    client.appointments(day(), day()).await.unwrap();
}

#[tokio::test]
async fn patient_and_appointment_are_posted_as_forms() {
    let server = MockServer::start().await;
    mount_token(&server, "t").await;
    Mock::given(method("POST"))
        .and(path("/api/patients"))
        .and(body_string_contains("first_name=Ada"))
        .and(body_string_contains("cell_phone=%2B1234567890"))
        .and(body_string_contains("gender=Female"))
        .and(body_string_contains("doctor=42"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1001 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .and(body_string_contains("patient=1001"))
        .and(body_string_contains("scheduled_time=2026-03-02+10%3A30"))
        .and(body_string_contains("duration=30"))
        .and(body_string_contains("office=7"))
        .and(body_string_contains("exam_room=1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    let client = client(&server, 3);

    let patient_id = client
        .create_patient(&NewPatient {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
            email: "ada@example.com".into(),
            phone: "+1234567890".into(),
            gender: Gender::Female,
        })
        .await
        .unwrap();
    assert_eq!(patient_id, PatientId("1001".into()));

    client
        .create_appointment(&NewAppointment {
            patient_id,
            scheduled_time: day().and_hms_opt(10, 30, 0).unwrap(),
            duration_minutes: 30,
        })
        .await
        .unwrap();
}
