use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{booking, budget, user, vendor, wedding};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/wedding", post(wedding::wedding_new).get(wedding::get))
        .route("/wedding/{id}", patch(wedding::update))
        .route("/vendor", post(vendor::vendor_new).get(vendor::get))
        .route("/vendor/bookings", get(booking::vendor_list))
        .route("/booking", post(booking::booking_new))
        .route("/bookings", get(booking::list))
        .route(
            "/booking/{id}",
            get(booking::get)
                .patch(booking::update)
                .delete(booking::delete),
        )
        .route("/booking/{id}/status", post(booking::update_status))
        .route("/booking/{id}/payment", post(booking::update_payment))
        .route("/budget", get(budget::list).post(budget::line_new))
        .route("/budget/sync", post(budget::sync))
        .route(
            "/budget/{id}",
            get(budget::get)
                .patch(budget::update)
                .delete(budget::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request as HttpRequest, header};
    use base64::Engine as _;
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::{ConnectionTrait, Database, Statement};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let backend = db.get_database_backend();
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec!["alice".into(), "password".into()],
        ))
        .await
        .unwrap();
        let engine = Engine::builder()
            .database(db.clone())
            .build()
            .await
            .unwrap();
        router(ServerState {
            engine: Arc::new(engine),
            db,
        })
    }

    fn basic_auth(username: &str, password: &str) -> String {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
        format!("Basic {encoded}")
    }

    async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = HttpRequest::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, basic_auth("alice", "password"));
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    fn wedding_body() -> Value {
        json!({
            "bride_name": "Priya",
            "groom_name": "Rahul",
            "wedding_date": "2027-02-14",
            "city": "Jaipur",
            "total_budget_minor": 2_000_000,
        })
    }

    #[tokio::test]
    async fn rejects_bad_credentials() {
        let router = test_router().await;
        let request = HttpRequest::builder()
            .method("GET")
            .uri("/wedding")
            .header(header::AUTHORIZATION, basic_auth("alice", "wrong"))
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wedding_roundtrip() {
        let router = test_router().await;

        let (status, created) = send(&router, "POST", "/wedding", Some(wedding_body())).await;
        assert_eq!(status, StatusCode::OK);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, fetched) = send(&router, "GET", "/wedding", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["id"].as_str().unwrap(), id);
        assert_eq!(fetched["bride_name"], "Priya");
        assert!(fetched["days_until"].is_i64());
    }

    #[tokio::test]
    async fn missing_wedding_is_404() {
        let router = test_router().await;
        let (status, _) = send(&router, "GET", "/wedding", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn confirmed_booking_shows_up_in_the_budget() {
        let router = test_router().await;
        send(&router, "POST", "/wedding", Some(wedding_body())).await;

        let (status, created) = send(
            &router,
            "POST",
            "/booking",
            Some(json!({
                "vendor_name": "Lens & Light",
                "service_type": "photography",
                "event_date": "2027-02-14",
                "total_amount_minor": 50_000,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let booking_id = created["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &router,
            "PATCH",
            &format!("/booking/{booking_id}"),
            Some(json!({ "status": "confirmed" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, budget) = send(&router, "GET", "/budget", None).await;
        assert_eq!(status, StatusCode::OK);
        let lines = budget["lines"].as_array().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["category"], "photography");
        assert_eq!(lines[0]["actual_cost_minor"], 50_000);
        assert_eq!(budget["summary"]["total_actual_minor"], 50_000);
    }

    #[tokio::test]
    async fn budget_sync_reports_counts() {
        let router = test_router().await;
        send(&router, "POST", "/wedding", Some(wedding_body())).await;
        send(
            &router,
            "POST",
            "/booking",
            Some(json!({
                "vendor_name": "Marigold Decor",
                "service_type": "decorator",
                "event_date": "2027-02-14",
                "status": "confirmed",
                "total_amount_minor": 40_000,
            })),
        )
        .await;

        let (status, report) = send(&router, "POST", "/budget/sync", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["synced_count"], 1);
        assert_eq!(report["total_confirmed"], 1);
        assert!(report.get("errors").is_none());
    }

    #[tokio::test]
    async fn duplicate_budget_category_is_409() {
        let router = test_router().await;
        send(&router, "POST", "/wedding", Some(wedding_body())).await;

        let line = json!({ "category": "venue", "estimated_cost_minor": 100_000 });
        let (status, _) = send(&router, "POST", "/budget", Some(line.clone())).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&router, "POST", "/budget", Some(line)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
