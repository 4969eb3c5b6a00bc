use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use contato_intake::{
    ContactStore, IntakeError, StoreHandle,
    db::Submission,
    router::{IntakeState, intake_router},
};
use serde_json::{Value, json};
use tower::ServiceExt;

/// In-memory stand-in for the MySQL store.
#[derive(Default)]
struct MemoryStore {
    rows: Mutex<Vec<Submission>>,
    fail_writes: AtomicBool,
    fail_probe: AtomicBool,
}

impl MemoryStore {
    fn rows(&self) -> Vec<Submission> {
        self.rows.lock().expect("rows lock").clone()
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn probe(&self) -> Result<(), IntakeError> {
        if self.fail_probe.load(Ordering::SeqCst) {
            return Err(IntakeError::Probe("connection refused".into()));
        }
        Ok(())
    }

    async fn insert(&self, submission: &Submission) -> Result<(), IntakeError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(sqlx::Error::Protocol("table contatos doesn't exist".into()).into());
        }
        self.rows.lock().expect("rows lock").push(submission.clone());
        Ok(())
    }
}

fn app_with(store: Option<Arc<MemoryStore>>) -> Router {
    let handle = store.map(|s| s as StoreHandle);
    intake_router(IntakeState::new(handle), None)
}

fn post_contato(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/contato")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("failed to build request")
}

async fn read_json(resp: axum::response::Response) -> Value {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&body).expect("response body was not json")
}

#[tokio::test]
async fn contato_stores_valid_submission() {
    let store = Arc::new(MemoryStore::default());
    let app = app_with(Some(store.clone()));

    let payload = json!({ "nome": "Ana", "email": "ana@x.com", "mensagem": "Oi" });
    let resp = app
        .oneshot(post_contato(payload.to_string()))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        read_json(resp).await,
        json!({ "mensagem": "Mensagem enviada com sucesso!" })
    );
    assert_eq!(
        store.rows(),
        vec![Submission {
            nome: "Ana".into(),
            email: "ana@x.com".into(),
            mensagem: "Oi".into(),
        }]
    );
}

#[tokio::test]
async fn contato_rejects_empty_fields_without_writing() {
    let store = Arc::new(MemoryStore::default());
    let app = app_with(Some(store.clone()));

    for payload in [
        json!({ "nome": "", "email": "a@b.com", "mensagem": "hi" }),
        json!({ "nome": "Ana", "mensagem": "hi" }),
        json!({ "nome": "Ana", "email": "a@b.com", "mensagem": "  " }),
    ] {
        let resp = app
            .clone()
            .oneshot(post_contato(payload.to_string()))
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(resp).await,
            json!({ "mensagem": "Preencha todos os campos!" })
        );
    }
    assert!(store.rows().is_empty());
}

#[tokio::test]
async fn contato_rejects_malformed_body_as_validation_error() {
    let app = app_with(Some(Arc::new(MemoryStore::default())));

    let resp = app
        .clone()
        .oneshot(post_contato("{not json"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let no_content_type = Request::builder()
        .method("POST")
        .uri("/contato")
        .body(Body::from(r#"{"nome":"a","email":"b","mensagem":"c"}"#))
        .expect("failed to build request");
    let resp = app.oneshot(no_content_type).await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn contato_validates_before_checking_store() {
    let app = app_with(None);

    let resp = app
        .oneshot(post_contato(json!({ "nome": "" }).to_string()))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn contato_without_store_reports_unavailable() {
    let app = app_with(None);

    let payload = json!({ "nome": "Ana", "email": "ana@x.com", "mensagem": "Oi" });
    let resp = app
        .oneshot(post_contato(payload.to_string()))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_json(resp).await,
        json!({ "mensagem": "Banco ainda não configurado." })
    );
}

#[tokio::test]
async fn contato_hides_driver_error_on_failed_insert() {
    let store = Arc::new(MemoryStore::default());
    store.fail_writes.store(true, Ordering::SeqCst);
    let app = app_with(Some(store.clone()));

    let payload = json!({ "nome": "Ana", "email": "ana@x.com", "mensagem": "Oi" });
    let resp = app
        .oneshot(post_contato(payload.to_string()))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(resp).await;
    assert_eq!(body, json!({ "mensagem": "Erro ao salvar no banco" }));
    assert!(!body.to_string().contains("doesn't exist"));
    assert!(store.rows().is_empty());
}

#[tokio::test]
async fn contato_returns_413_for_oversized_body() {
    let store = Arc::new(MemoryStore::default());
    let app = app_with(Some(store.clone()));

    let oversized = "a".repeat(contato_intake::middleware::CONTACT_BODY_LIMIT + 1024);
    let payload = json!({ "nome": "Ana", "email": "ana@x.com", "mensagem": oversized });
    let resp = app
        .oneshot(post_contato(payload.to_string()))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(store.rows().is_empty());
}

#[tokio::test]
async fn root_answers_without_store() {
    let app = app_with(None);
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    assert!(std::str::from_utf8(&body).expect("utf-8").starts_with("Servidor rodando"));
}

async fn get_health(app: Router) -> (StatusCode, Value) {
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    let status = resp.status();
    (status, read_json(resp).await)
}

#[tokio::test]
async fn health_reflects_store_state_and_is_always_200() {
    let (status, body) = get_health(app_with(None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "db": "disconnected" }));

    let store = Arc::new(MemoryStore::default());
    let (status, body) = get_health(app_with(Some(store.clone()))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "db": "connected" }));

    store.fail_probe.store(true, Ordering::SeqCst);
    let (status, body) = get_health(app_with(Some(store))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "db": "error" }));
}

#[tokio::test]
async fn cors_allow_list_answers_preflight_for_listed_origin_only() {
    let origins = vec!["https://site.example".to_string()];
    let app = intake_router(IntakeState::new(None), Some(&origins));

    let preflight = |origin: &'static str| {
        Request::builder()
            .method("OPTIONS")
            .uri("/contato")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .expect("failed to build request")
    };

    let resp = app
        .clone()
        .oneshot(preflight("https://site.example"))
        .await
        .expect("request failed");
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("https://site.example")
    );

    let resp = app
        .oneshot(preflight("https://evil.example"))
        .await
        .expect("request failed");
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
