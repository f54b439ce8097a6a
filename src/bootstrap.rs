//! Application wiring: pool, registry, migrations and the module lifecycle.

use anyhow::Context;
use axum::Router;
use libris_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use sqlx::SqlitePool;

use crate::modules;

/// A connected, migrated application ready to serve.
pub struct App {
    pub db: SqlitePool,
    pub registry: ModuleRegistry,
}

impl App {
    pub fn router(&self, settings: &Settings) -> Router {
        libris_http::build_router(&self.registry, settings)
    }
}

/// Register the database core module followed by every library module.
pub fn build_registry(db: &SqlitePool, settings: &Settings) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register_core(libris_db::create_module(db.clone()));
    modules::register_all(&mut registry, db, settings);
    registry
}

/// Apply pending migrations from every registered module.
pub async fn migrate(db: &SqlitePool, registry: &ModuleRegistry) -> anyhow::Result<usize> {
    libris_db::migrate(db, &registry.collect_migrations())
        .await
        .context("failed to apply migrations")
}

/// Connect, initialize modules and migrate.
pub async fn prepare(settings: &Settings) -> anyhow::Result<App> {
    let db = libris_db::connect(&settings.database).await?;
    let registry = build_registry(&db, settings);

    let ctx = InitCtx {
        settings,
        db: &db,
    };
    registry.init_core_modules(&ctx).await?;
    registry.init_custom_modules(&ctx).await?;

    let applied = migrate(&db, &registry).await?;
    tracing::info!(applied, "database schema up to date");

    Ok(App { db, registry })
}

/// Run the whole application until a shutdown signal arrives.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let app = prepare(&settings).await?;
    let ctx = InitCtx {
        settings: &settings,
        db: &app.db,
    };
    app.registry.start_core_modules(&ctx).await?;
    app.registry.start_custom_modules(&ctx).await?;

    let served = libris_http::start_server(&app.registry, &settings).await;

    app.registry.stop_custom_modules().await?;
    app.registry.stop_core_modules().await?;
    served
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use libris_kernel::settings::DatabaseSettings;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> Router {
        let settings = Settings {
            database: DatabaseSettings::in_memory(),
            ..Settings::default()
        };
        let app = prepare(&settings).await.unwrap();
        app.router(&settings)
    }

    async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(body) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };
        let response = router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn lending_round_trip() {
        let app = app().await;

        let (status, book) = call(
            &app,
            "POST",
            "/api/catalog/books",
            Some(json!({ "book_id": 12, "title": "Middlemarch", "author": "George Eliot", "publisher": "Blackwood", "isbn": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(book["quantity"], 1);
        assert_eq!(book["isbn"], Value::Null);

        let (status, member) = call(&app, "POST", "/api/members", Some(json!({ "name": "Ada" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(member["balance"], 1000);
        let member_id = member["member_id"].as_i64().unwrap();

        let (status, receipt) = call(
            &app,
            "POST",
            "/api/lending/checkout/12",
            Some(json!({ "member_id": member_id.to_string() })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(receipt["member"]["balance"], 500);
        assert_eq!(receipt["member"]["is_borrowing"], true);
        assert_eq!(receipt["book"]["borrower_id"], member_id);
        assert_eq!(receipt["transaction"]["direction"], "checkout");

        let (_, out) = call(&app, "GET", "/api/catalog/books?status=checked_out", None).await;
        assert_eq!(out.as_array().unwrap().len(), 1);
        let (_, eligible) = call(&app, "GET", "/api/members?eligible=true", None).await;
        assert!(eligible.as_array().unwrap().is_empty());

        let (status, summary) = call(&app, "POST", "/api/lending/return/12", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["late_fee"]["amount"], 0);
        assert_eq!(summary["member"]["is_borrowing"], false);
        assert_eq!(summary["book"]["times_issued"], 1);

        let (status, ledger) = call(&app, "GET", "/api/ledger/transactions", None).await;
        assert_eq!(status, StatusCode::OK);
        let directions: Vec<&str> = ledger
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["direction"].as_str().unwrap())
            .collect();
        assert_eq!(directions, ["return", "checkout"]);
    }

    #[tokio::test]
    async fn errors_carry_codes() {
        let app = app().await;

        let (status, body) = call(&app, "POST", "/api/catalog/books", Some(json!({ "book_id": "x1" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "validation_error");
        assert_eq!(body["error"]["details"][0]["field"], "book_id");
        assert!(body["error"]["trace_id"].is_string());
        assert!(body["error"]["timestamp"].is_string());

        let (status, body) = call(&app, "GET", "/api/members/5", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "member_not_found");
        assert_eq!(body["error"]["message"], "Not a member!");

        call(&app, "POST", "/api/catalog/books", Some(json!({ "book_id": "3", "title": "Emma" }))).await;
        let (status, body) = call(&app, "POST", "/api/catalog/books", Some(json!({ "book_id": "3", "title": "Emma" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "duplicate_book");

        let (status, body) = call(&app, "POST", "/api/lending/return/3", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "book_not_checked_out");

        let (status, body) = call(&app, "POST", "/api/lending/checkout/3", Some(json!({ "member_id": 9 }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "member_not_found");
    }

    #[tokio::test]
    async fn members_api_adjusts_and_deletes() {
        let app = app().await;
        let (_, member) = call(&app, "POST", "/api/members", Some(json!({ "name": "Grace  Hopper", "balance": "40" }))).await;
        assert_eq!(member["name"], "Grace Hopper");

        let (status, member) = call(&app, "POST", "/api/members/1/balance", Some(json!({ "amount": "-50" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(member["balance"], -10);

        let (status, body) = call(&app, "POST", "/api/members/1/balance", Some(json!({ "amount": "lots" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["details"][0]["field"], "amount");

        let (_, rich) = call(&app, "POST", "/api/members", Some(json!({ "name": "Midas", "balance": "9223372036854775000" }))).await;
        let (status, body) = call(&app, "POST", "/api/members/2/balance", Some(json!({ "amount": "+1000" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["details"][0]["field"], "amount");
        let (status, roster) = call(&app, "GET", "/api/members", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(roster[1]["balance"], rich["balance"]);

        let (status, _) = call(&app, "DELETE", "/api/members/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, "GET", "/api/members/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn docs_and_pages_share_the_router() {
        let app = app().await;

        let (status, spec) = call(&app, "GET", "/docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(spec["paths"]["/api/lending/checkout/{book_id}"]["post"].is_object());
        assert!(spec["paths"]["/api/members"]["get"].is_object());
        assert!(spec["components"]["schemas"]["Member"].is_object());

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("<h1>Catalog</h1>"));
    }
}
