//! Entity services against a mock HTTP backend.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schooldesk_lib::controllers::{DeleteState, ListController};
use schooldesk_lib::models::{
    AdmissionStatus, BillStatus, BulkPaymentUpdate, EntityId, PaymentUpdate, PublishStatus, Role,
    SessionState, Tab,
};
use schooldesk_lib::services::{
    AdmissionService, ApiClient, BillService, BookListService, Config, JobPostService,
    JobPostTransition, MemorySession, StaticToken,
};
use schooldesk_lib::{Dashboard, DashboardError};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), Arc::new(StaticToken::new("secret-token"))).unwrap()
}

fn signed_out(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), Arc::new(MemorySession::default())).unwrap()
}

fn admission_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "first_name": "Chidi",
        "last_name": "Okeke",
        "email": "chidi@example.com",
        "class_applied": "JSS1",
        "status": status,
        "created_at": "2024-09-03T08:00:00Z"
    })
}

fn booklist_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": "JSS1 Core Texts",
        "class": "JSS1",
        "status": status,
        "items": [
            {"title": "New General Mathematics", "quantity": 2, "unit_price": "1500.00"},
            {"title": "Basic Science", "unit_price": 900}
        ]
    })
}

fn jobpost_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Mathematics Teacher",
        "department": "Sciences",
        "status": status
    })
}

fn bill_json(id: i64, paid: f64) -> serde_json::Value {
    json!({
        "id": id,
        "bill_number": format!("B-{id:04}"),
        "student": 40 + id,
        "student_name": "Aisha Bello",
        "amount": "50000.00",
        "amount_paid": paid,
        "balance": 50000.0 - paid,
        "status": if paid > 0.0 { "partial" } else { "unpaid" }
    })
}

#[tokio::test]
async fn list_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admissions/"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([admission_json(1, "pending")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let admissions = AdmissionService::new(client(&server))
        .list_admissions(Tab::All)
        .await
        .unwrap();

    assert_eq!(admissions.len(), 1);
    assert_eq!(admissions[0].applied_class, "JSS1");
    assert_eq!(admissions[0].status, AdmissionStatus::Pending);
}

#[tokio::test]
async fn missing_token_never_reaches_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = AdmissionService::new(signed_out(&server))
        .list_admissions(Tab::All)
        .await
        .unwrap_err();

    assert!(matches!(err, DashboardError::Authentication(_)));
}

#[tokio::test]
async fn expired_session_counts_as_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let session = MemorySession::new(SessionState {
        access_token: Some("stale".to_string()),
        role: Role::Admin,
        expires_at: Some(Utc::now().timestamp() - 5),
        ..Default::default()
    });
    let api = ApiClient::new(&server.uri(), Arc::new(session)).unwrap();

    let err = BookListService::new(api)
        .delete_booklist(&EntityId::Number(3))
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::Authentication(_)));
}

#[tokio::test]
async fn text_ids_stay_inside_their_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/booklists/..%2Fstudents%2F5%3Fforce=1/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    BookListService::new(client(&server))
        .delete_booklist(&EntityId::Text("../students/5?force=1".to_string()))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn tab_maps_to_status_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobposts/"))
        .and(query_param("status", "scheduled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [jobpost_json(7, "scheduled")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let posts = JobPostService::new(client(&server))
        .list_jobposts(Tab::Scheduled)
        .await
        .unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].status, PublishStatus::Scheduled);
}

#[tokio::test]
async fn backend_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/booklists/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "detail": "You do not have permission to perform this action."
        })))
        .mount(&server)
        .await;

    let err = BookListService::new(client(&server))
        .list_booklists(Tab::All)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        DashboardError::Request {
            status: 403,
            message: "You do not have permission to perform this action.".to_string(),
        }
    );
}

#[tokio::test]
async fn unexpected_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admissions/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = AdmissionService::new(client(&server))
        .get_admission(&EntityId::Number(1))
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::Decode(_)));
}

#[tokio::test]
async fn booklist_amounts_accept_strings_and_numbers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/booklists/5/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(booklist_json(5, "draft")))
        .mount(&server)
        .await;

    let list = BookListService::new(client(&server))
        .get_booklist(&EntityId::Number(5))
        .await
        .unwrap();

    assert_eq!(list.class_name, "JSS1");
    assert_eq!(list.item_count(), 2);
    assert_eq!(list.total_price(), 3900.0);
}

#[tokio::test]
async fn publish_transition_adopts_server_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/booklists/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([booklist_json(5, "draft")])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/booklists/5/publish/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(booklist_json(5, "published")))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = ListController::new(BookListService::new(client(&server)));
    screen.refresh(Tab::Draft).await;
    screen
        .transition(&EntityId::Number(5), schooldesk_lib::services::Publish)
        .await
        .unwrap();

    let row = screen.get(&EntityId::Number(5)).unwrap();
    assert_eq!(row.status, PublishStatus::Published);
}

#[tokio::test]
async fn admission_status_change_is_a_put() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/admissions/1/"))
        .and(body_json(json!({"status": "approved"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(admission_json(1, "approved")))
        .expect(1)
        .mount(&server)
        .await;

    let updated = AdmissionService::new(client(&server))
        .set_status(&EntityId::Number(1), AdmissionStatus::Approved)
        .await
        .unwrap();
    assert_eq!(updated.status, AdmissionStatus::Approved);
}

#[tokio::test]
async fn schedule_posts_future_publish_time() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jobposts/7/schedule/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jobpost_json(7, "scheduled")))
        .expect(1)
        .mount(&server)
        .await;

    let service = JobPostService::new(client(&server));
    let at = Utc::now() + Duration::days(2);
    let post = service.schedule_jobpost(&EntityId::Number(7), at).await.unwrap();
    assert_eq!(post.status, PublishStatus::Scheduled);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("publish_at").is_some());
}

#[tokio::test]
async fn schedule_in_the_past_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut screen = ListController::new(JobPostService::new(client(&server)));
    let err = screen
        .transition(
            &EntityId::Number(7),
            JobPostTransition::Schedule(Utc::now() - Duration::hours(1)),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DashboardError::Validation(_)));
    assert!(screen.error().is_some());
}

#[tokio::test]
async fn failed_delete_keeps_row_and_returns_to_idle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bills/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([bill_json(1, 0.0), bill_json(2, 100.0)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/bills/2/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = ListController::new(BillService::new(client(&server)));
    screen.refresh(Tab::All).await;
    assert_eq!(screen.total_count(), 2);

    screen.request_delete(&EntityId::Number(2), Role::Accountant).unwrap();
    let err = screen.confirm_and_remove().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(screen.total_count(), 2);
    assert_eq!(screen.error(), Some("Internal Server Error"));
    assert!(matches!(screen.delete_state(), DeleteState::Idle));
}

#[tokio::test]
async fn successful_delete_removes_row() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bills/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([bill_json(1, 0.0), bill_json(2, 100.0)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/bills/1/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = ListController::new(BillService::new(client(&server)));
    screen.refresh(Tab::All).await;
    screen.request_delete(&EntityId::Number(1), Role::Admin).unwrap();
    screen.confirm_and_remove().await.unwrap();

    assert_eq!(screen.total_count(), 1);
    assert_eq!(screen.raw()[0].status, BillStatus::Partial);
}

#[tokio::test]
async fn bulk_payment_update_posts_all_rows() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bills/bulk-payment-update/"))
        .and(body_json(json!({
            "updates": [
                {"bill_id": 1, "amount_paid": 2000.0},
                {"bill_id": 2, "amount_paid": 500.0}
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([bill_json(1, 2000.0), bill_json(2, 600.0)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let update = BulkPaymentUpdate {
        updates: vec![
            PaymentUpdate { bill_id: EntityId::Number(1), amount_paid: 2000.0 },
            PaymentUpdate { bill_id: EntityId::Number(2), amount_paid: 500.0 },
        ],
    };
    let bills = BillService::new(client(&server))
        .bulk_payment_update(&update)
        .await
        .unwrap();

    assert_eq!(bills.len(), 2);
    assert_eq!(bills[1].amount_paid, 600.0);
}

#[tokio::test]
async fn empty_bulk_update_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = BillService::new(client(&server))
        .bulk_payment_update(&BulkPaymentUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::Validation(_)));
}

#[tokio::test]
async fn bill_detail_fetches_receipts_alongside() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bills/2/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bill_json(2, 100.0)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/payment-receipts/"))
        .and(query_param("bill", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 11,
            "receipt_number": "R-0011",
            "bill": 2,
            "student_name": "Aisha Bello",
            "amount": "100.00",
            "payment_method": "transfer",
            "paid_at": "2024-09-12"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let (bill, receipts) = BillService::new(client(&server))
        .bill_with_receipts(&EntityId::Number(2))
        .await
        .unwrap();

    assert_eq!(bill.student_id, EntityId::Number(42));
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].bill_id, EntityId::Number(2));
    assert_eq!(receipts[0].amount, 100.0);
}

#[tokio::test]
async fn recalculate_balances_reports_count() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bills/recalculate-balances/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "updated_count": 14,
            "detail": "Balances recalculated"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let summary = BillService::new(client(&server))
        .recalculate_balances()
        .await
        .unwrap();
    assert_eq!(summary.updated, 14);
    assert_eq!(summary.message.as_deref(), Some("Balances recalculated"));
}

#[tokio::test]
async fn dashboard_screens_share_one_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admissions/"))
        .and(query_param("status", "pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [admission_json(1, "pending"), admission_json(2, "pending")]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/students/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        api_base_url: Some(server.uri()),
        request_log: true,
    };
    let dashboard = Dashboard::new(&config, Arc::new(StaticToken::new("secret-token"))).unwrap();

    let mut admissions = dashboard.admissions();
    admissions.refresh(Tab::Pending).await;
    assert_eq!(admissions.total_count(), 2);

    let mut students = dashboard.students();
    students.refresh(Tab::All).await;
    assert_eq!(students.total_count(), 0);
    assert!(students.error().is_none());
}
