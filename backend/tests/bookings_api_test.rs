//! End-to-end tests for the booking routes
//!
//! These drive the full router (extractors, error envelopes, middleware)
//! against a temporary SQLite database.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use clinic_bookings::create_router;
use clinic_bookings::db::BookingDb;
use clinic_bookings::models::{Employee, ObjectId, Service};
use clinic_bookings::state::AppState;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const BASE: &str = "/api/bookings";

struct TestApp {
    router: Router,
    employee: Employee,
    service: Service,
    _temp_dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("api.db");
        let db = BookingDb::new(db_path.to_str().unwrap(), 1)
            .await
            .expect("Failed to create test database");

        let employee = Employee::new("Alice Reception", Some("receptionist".to_string()));
        let service = Service::new("Dental Cleaning", Some(80.0));
        db.insert_employee(&employee).await.unwrap();
        db.insert_service(&service).await.unwrap();

        Self {
            router: create_router(AppState::new(db), BASE),
            employee,
            service,
            _temp_dir: temp_dir,
        }
    }

    fn booking_body(&self, patient: &str, date: &str, time: &str) -> Value {
        json!({
            "receptionistId": self.employee.id.as_str(),
            "receptionistName": self.employee.name,
            "serviceId": self.service.id.as_str(),
            "serviceName": self.service.name,
            "assignedStaffName": "Dr. Lee",
            "patientName": patient,
            "bookingDate": date,
            "bookingTime": time,
            "status": "Pending"
        })
    }

    /// Send a request and return the status and the body (`Value::Null` when empty)
    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create(&self, patient: &str, date: &str, time: &str) -> Value {
        let (status, body) = self
            .send(Method::POST, BASE, Some(self.booking_body(patient, date, time)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body
    }

    async fn count(&self) -> i64 {
        let (status, body) = self.send(Method::GET, &format!("{}/count", BASE), None).await;
        assert_eq!(status, StatusCode::OK);
        body["count"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_list_defaults_to_ten_by_date_time() {
    let app = TestApp::new().await;
    for day in (1..=11).rev() {
        app.create("Patient", &format!("2024-06-{:02}", day), "14:00")
            .await;
    }
    app.create("Early Bird", "2024-06-01", "08:00").await;

    let (status, body) = app.send(Method::GET, BASE, None).await;
    assert_eq!(status, StatusCode::OK);
    let bookings = body.as_array().unwrap();
    assert_eq!(bookings.len(), 10);
    assert_eq!(bookings[0]["patientName"], "Early Bird");
    assert_eq!(bookings[1]["bookingDate"], "2024-06-01");
    assert_eq!(bookings[9]["bookingDate"], "2024-06-09");
}

#[tokio::test]
async fn test_list_query_parameters() {
    let app = TestApp::new().await;
    for (name, day) in [("Cat", 1), ("Amy", 2), ("Bob", 3)] {
        app.create(name, &format!("2024-07-0{}", day), "09:00").await;
    }

    let uri = format!("{}?limit=2&page=1&sort=patientName&order=-1", BASE);
    let (status, body) = app.send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["patientName"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Cat", "Bob"]);

    let uri = format!("{}?limit=-5&page=0&order=sideways", BASE);
    let (status, body) = app.send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[0]["patientName"], "Cat");
}

#[tokio::test]
async fn test_list_orders_times_within_a_day() {
    let app = TestApp::new().await;
    app.create("Ten", "2024-03-15", "10:00").await;
    app.create("Nine", "2024-03-15", "9:00").await;
    app.create("Afternoon", "2024-03-15", "1:30 PM").await;

    let (status, body) = app.send(Method::GET, BASE, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["patientName"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Nine", "Ten", "Afternoon"]);
    assert_eq!(body[0]["bookingTime"], "09:00");
    assert_eq!(body[2]["bookingTime"], "13:30");
}

#[tokio::test]
async fn test_repeated_query_keys_use_first_value() {
    let app = TestApp::new().await;
    for day in 1..=7 {
        app.create("Patient", &format!("2024-08-0{}", day), "09:00").await;
    }

    let uri = format!("{}?limit=5&limit=abc", BASE);
    let (status, body) = app.send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);

    let uri = format!("{}?limit=abc&limit=5", BASE);
    let (status, body) = app.send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 7);

    let uri = format!("{}/search?patient=pat&patient=nobody", BASE);
    let (status, body) = app.send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_create_rejects_invalid_time() {
    let app = TestApp::new().await;
    let body = app.booking_body("John Doe", "2024-03-15", "half past nine");

    let (status, response) = app.send(Method::POST, BASE, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response,
        json!({ "message": "\"bookingTime\" must be a valid time" })
    );
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn test_create_returns_stored_record() {
    let app = TestApp::new().await;
    let created = app.create("John Doe", "2024-03-15", "10:30").await;

    assert!(ObjectId::is_valid(created["_id"].as_str().unwrap()));
    assert!(created["bookingId"].as_str().unwrap().starts_with('b'));
    assert_eq!(created["serviceName"], "Dental Cleaning");
    assert!(created["updated"].is_string());
    assert_eq!(app.count().await, 1);

    let uri = format!("{}/{}", BASE, created["_id"].as_str().unwrap());
    let (status, fetched) = app.send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["bookingId"], created["bookingId"]);
}

#[tokio::test]
async fn test_create_with_unknown_service_is_rejected() {
    let app = TestApp::new().await;
    let mut body = app.booking_body("John Doe", "2024-03-15", "10:30");
    body["serviceId"] = json!(ObjectId::new().as_str());

    let (status, response) = app.send(Method::POST, BASE, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, json!({ "message": "Service Not Found!" }));
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn test_create_with_invalid_payload() {
    let app = TestApp::new().await;
    let (status, response) = app
        .send(Method::POST, BASE, Some(json!({ "patientName": "Nobody" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "\"receptionistId\" is required");

    let (status, response) = app.send(Method::POST, BASE, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["message"].is_string());
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn test_get_unknown_and_malformed_ids() {
    let app = TestApp::new().await;

    let uri = format!("{}/{}", BASE, ObjectId::new());
    let (status, body) = app.send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Booking Not Found!" }));

    let uri = format!("{}/not-an-id", BASE);
    let (status, body) = app.send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Invalid ID." }));
}

#[tokio::test]
async fn test_search() {
    let app = TestApp::new().await;
    app.create("John Doe", "2024-03-15", "10:30").await;
    app.create("Jane Roe", "2024-03-16", "10:30").await;

    let (status, body) = app.send(Method::GET, &format!("{}/search", BASE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let uri = format!("{}/search?patient=JOHN", BASE);
    let (_, body) = app.send(Method::GET, &uri, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["patientName"], "John Doe");

    let uri = format!("{}/search?service=dental&patient=roe", BASE);
    let (_, body) = app.send(Method::GET, &uri, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let uri = format!("{}/search?service=surgery&patient=roe", BASE);
    let (_, body) = app.send(Method::GET, &uri, None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_update() {
    let app = TestApp::new().await;
    let created = app.create("John Doe", "2024-03-15", "10:30").await;
    let uri = format!("{}/{}", BASE, created["_id"].as_str().unwrap());

    let (status, updated) = app
        .send(
            Method::PUT,
            &uri,
            Some(json!({ "status": "Confirmed", "bookingId": "bHIJACKED" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(updated["status"], "Confirmed");
    assert_eq!(updated["bookingId"], created["bookingId"]);
    assert_eq!(updated["patientName"], "John Doe");

    let missing = format!("{}/{}", BASE, ObjectId::new());
    let (status, body) = app
        .send(Method::PUT, &missing, Some(json!({ "status": "Confirmed" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Booking Update Failed" }));

    let (status, _) = app
        .send(Method::PUT, &uri, Some(json!({ "status": 7 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, cleared) = app
        .send(Method::PUT, &uri, Some(json!({ "assignedStaffName": null })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(cleared.get("assignedStaffName").is_none());
    assert_eq!(cleared["status"], "Confirmed");

    let (status, _) = app
        .send(Method::PUT, &uri, Some(json!({ "patientName": null })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_then_fetch_is_not_found() {
    let app = TestApp::new().await;
    let created = app.create("John Doe", "2024-03-15", "10:30").await;
    let uri = format!("{}/{}", BASE, created["_id"].as_str().unwrap());

    let (status, body) = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, Value::Null);

    let (status, _) = app.send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Deletion Failed" }));

    let (status, _) = app
        .send(Method::DELETE, &format!("{}/xyz", BASE), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_custom_base_path() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("api.db");
    let db = BookingDb::new(db_path.to_str().unwrap(), 1).await.unwrap();
    let router = create_router(AppState::new(db), "/bookings");

    let request = Request::builder()
        .uri("/bookings/count")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
