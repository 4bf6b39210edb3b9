//! End-to-end flows against a real PostgreSQL database.
//!
//! Set `TEST_DATABASE_URL` to run them; without a reachable database every
//! test returns early.

mod common;

use std::time::Duration;

use axum::http::{Request, StatusCode};
use axum::{body::Body, Router};
use body_health::api::routes::create_routes;
use body_health::config::{run_migrations, AdminSeed, DatabaseSeeder};
use body_health::models::{CreatePlanRequest, Plan};
use body_health::services::{EmailService, PlanService, SubscriptionService};
use common::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tempfile::TempDir;
use uuid::Uuid;

async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = match PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&url)
        .await
    {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("skipping database test: {err}");
            return None;
        }
    };
    run_migrations(&pool).await.expect("migrations");
    Some(pool)
}

fn app(pool: &PgPool, upload_dir: &TempDir) -> Router {
    create_routes(
        pool.clone(),
        &test_config(upload_dir.path()),
        EmailService::log_only(SUPPORT_EMAIL),
    )
}

fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4().simple())
}

fn authed(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"));
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request")
}

async fn register_client(app: &Router, email: &str) -> Value {
    let response = send(
        app.clone(),
        json_request(
            "POST",
            "/api/auth/register/client",
            json!({
                "name": "Bruno Lima",
                "email": email,
                "password": "secret123",
                "password_confirmation": "secret123",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn login(app: &Router, role: &str, email: &str, password: &str) -> (StatusCode, Value) {
    let response = send(
        app.clone(),
        json_request(
            "POST",
            &format!("/api/auth/login/{role}"),
            json!({ "email": email, "password": password }),
        ),
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

async fn register_trainer(app: &Router, email: &str) -> String {
    let registration = MultipartBody::new()
        .text("name", "Carla Souza")
        .text("email", email)
        .text("password", "secret123")
        .text("password_confirmation", "secret123")
        .text("specialty", "Personal Trainer")
        .text("tax_id", "111.444.777-35")
        .file("registry_photo", "cref.png", "image/png", b"\x89PNG\r\n")
        .into_request("/api/auth/register/professional");
    let response = send(app.clone(), registration).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_plan(pool: &PgPool, prefix: &str, duration_days: i32) -> Plan {
    PlanService::new(pool.clone())
        .create(CreatePlanRequest {
            name: format!("{prefix} {}", Uuid::new_v4().simple()),
            description: String::new(),
            price: 89.9,
            duration_days,
        })
        .await
        .unwrap()
}

async fn post_json(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    let response = send(app.clone(), authed("POST", uri, token, Some(body))).await;
    let status = response.status();
    (status, body_json(response).await)
}

async fn status_of(app: &Router, method: &str, uri: &str, token: &str, body: Option<Value>) -> StatusCode {
    send(app.clone(), authed(method, uri, token, body)).await.status()
}

#[tokio::test]
async fn test_client_account_lifecycle() {
    let Some(pool) = test_pool().await else { return };
    let dir = TempDir::new().unwrap();
    let app = app(&pool, &dir);
    let email = unique_email("client");

    let registered = register_client(&app, &email.to_uppercase()).await;
    assert_eq!(registered["user"]["email"], email.as_str());
    assert_eq!(registered["user"]["role"], "client");

    let duplicate = send(
        app.clone(),
        json_request(
            "POST",
            "/api/auth/register/client",
            json!({
                "name": "Bruno Lima",
                "email": email,
                "password": "secret123",
                "password_confirmation": "secret123",
            }),
        ),
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(duplicate).await["fields"]["email"],
        "This email is already registered."
    );

    let (status, _) = login(&app, "admin", &email, "secret123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = login(&app, "client", &email, "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, session) = login(&app, "client", &email, "secret123").await;
    assert_eq!(status, StatusCode::OK);
    let token = session["access_token"].as_str().unwrap().to_string();

    let profile = send(app.clone(), get("/api/auth/profile", Some(&token))).await;
    assert_eq!(profile.status(), StatusCode::OK);
    assert_eq!(body_json(profile).await["email"], email.as_str());

    let forbidden = send(app.clone(), get("/api/admin/dashboard", Some(&token))).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let logout = send(app.clone(), authed("POST", "/api/auth/logout", &token, None)).await;
    assert_eq!(logout.status(), StatusCode::OK);

    let after_logout = send(app.clone(), get("/api/auth/profile", Some(&token))).await;
    assert_eq!(after_logout.status(), StatusCode::UNAUTHORIZED);

    let refresh = send(
        app.clone(),
        json_request(
            "POST",
            "/api/auth/refresh",
            json!({ "refresh_token": session["refresh_token"] }),
        ),
    )
    .await;
    assert_eq!(refresh.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password() {
    let Some(pool) = test_pool().await else { return };
    let dir = TempDir::new().unwrap();
    let app = app(&pool, &dir);
    let email = unique_email("password");

    let registered = register_client(&app, &email).await;
    let token = registered["access_token"].as_str().unwrap();

    let wrong = send(
        app.clone(),
        authed(
            "POST",
            "/api/auth/change-password",
            token,
            Some(json!({
                "current_password": "not-it",
                "new_password": "another1",
                "new_password_confirmation": "another1",
            })),
        ),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(wrong).await["fields"]["current_password"],
        "Current password is incorrect."
    );

    let changed = send(
        app.clone(),
        authed(
            "POST",
            "/api/auth/change-password",
            token,
            Some(json!({
                "current_password": "secret123",
                "new_password": "another1",
                "new_password_confirmation": "another1",
            })),
        ),
    )
    .await;
    assert_eq!(changed.status(), StatusCode::OK);

    let (status, _) = login(&app, "client", &email, "another1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_subscription_replaces_active_plan() {
    let Some(pool) = test_pool().await else { return };
    let dir = TempDir::new().unwrap();
    let app = app(&pool, &dir);

    let plans = PlanService::new(pool.clone());
    let monthly = plans
        .create(CreatePlanRequest {
            name: format!("Monthly {}", Uuid::new_v4().simple()),
            description: String::new(),
            price: 89.9,
            duration_days: 30,
        })
        .await
        .unwrap();
    let annual = plans
        .create(CreatePlanRequest {
            name: format!("Annual {}", Uuid::new_v4().simple()),
            description: String::new(),
            price: 799.9,
            duration_days: 365,
        })
        .await
        .unwrap();

    let registered = register_client(&app, &unique_email("subscriber")).await;
    let token = registered["access_token"].as_str().unwrap();

    for plan_id in [monthly.id, annual.id] {
        let response = send(
            app.clone(),
            authed(
                "POST",
                "/api/subscriptions",
                token,
                Some(json!({ "plan_id": plan_id })),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let listed = send(app.clone(), get("/api/subscriptions", Some(token))).await;
    let listed = body_json(listed).await;
    let subscriptions = listed.as_array().unwrap();
    assert_eq!(subscriptions.len(), 2);
    let active: Vec<_> = subscriptions
        .iter()
        .filter(|s| s["status"] == "active")
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["plan_id"], annual.id.to_string());

    let cancelled = send(
        app.clone(),
        authed("POST", "/api/subscriptions/cancel", token, None),
    )
    .await;
    assert_eq!(cancelled.status(), StatusCode::OK);
    assert_eq!(body_json(cancelled).await["status"], "cancelled");
}

#[tokio::test]
async fn test_professional_review_and_trainer_area() {
    let Some(pool) = test_pool().await else { return };
    let dir = TempDir::new().unwrap();
    let app = app(&pool, &dir);

    let admin = AdminSeed {
        name: "Review Admin".to_string(),
        email: unique_email("admin"),
        password: "admin123".to_string(),
    };
    assert!(DatabaseSeeder::new(pool.clone()).seed_admin(&admin).await.unwrap());
    let (_, admin_session) = login(&app, "admin", &admin.email, &admin.password).await;
    let admin_token = admin_session["access_token"].as_str().unwrap().to_string();

    let professional_email = unique_email("trainer");
    let registration = MultipartBody::new()
        .text("name", "Carla Souza")
        .text("email", &professional_email)
        .text("password", "secret123")
        .text("password_confirmation", "secret123")
        .text("specialty", "Personal Trainer")
        .text("tax_id", "111.444.777-35")
        .file("registry_photo", "cref.png", "image/png", b"\x89PNG\r\n")
        .into_request("/api/auth/register/professional");
    let response = send(app.clone(), registration).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let registered = body_json(response).await;
    assert_eq!(registered["user"]["professional_status"], "pending");
    let professional_id = registered["user"]["id"].as_str().unwrap().to_string();

    let approved = send(
        app.clone(),
        authed(
            "POST",
            &format!("/api/admin/professionals/{professional_id}/approve"),
            &admin_token,
            None,
        ),
    )
    .await;
    assert_eq!(approved.status(), StatusCode::OK);
    assert_eq!(body_json(approved).await["status"], "approved");

    let (status, session) = login(&app, "professional", &professional_email, "secret123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["user"]["professional_status"], "approved");
    let trainer_token = session["access_token"].as_str().unwrap().to_string();

    let client = register_client(&app, &unique_email("trainee")).await;
    let client_id = client["user"]["id"].clone();

    let link_request = || {
        authed(
            "POST",
            "/api/trainer/clients",
            &trainer_token,
            Some(json!({ "client_id": client_id, "started_on": "2024-03-01" })),
        )
    };
    let linked = send(app.clone(), link_request()).await;
    assert_eq!(linked.status(), StatusCode::CREATED);
    let link_id = body_json(linked).await["id"].as_str().unwrap().to_string();

    let duplicate = send(app.clone(), link_request()).await;
    assert_eq!(duplicate.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let assessment = send(
        app.clone(),
        authed(
            "POST",
            "/api/trainer/assessments",
            &trainer_token,
            Some(json!({
                "trainer_client_id": link_id,
                "assessed_on": "2024-03-02",
                "weight_kg": 70.0,
                "height_m": 1.75,
            })),
        ),
    )
    .await;
    assert_eq!(assessment.status(), StatusCode::CREATED);
    assert_eq!(body_json(assessment).await["bmi"], 22.9);

    let details = send(
        app.clone(),
        get(&format!("/api/trainer/clients/{link_id}"), Some(&trainer_token)),
    )
    .await;
    assert_eq!(details.status(), StatusCode::OK);
    let details = body_json(details).await;
    assert_eq!(details["last_assessment_on"], "2024-03-02");
    assert_eq!(details["assessments"].as_array().unwrap().len(), 1);

    let dashboard = send(app.clone(), get("/api/trainer/dashboard", Some(&trainer_token))).await;
    let dashboard = body_json(dashboard).await;
    assert_eq!(dashboard["total_clients"], 1);
    assert_eq!(dashboard["total_assessments"], 1);

    // The client's own token cannot reach the trainer area.
    let client_token = client["access_token"].as_str().unwrap();
    let forbidden = send(app.clone(), get("/api/trainer/clients", Some(client_token))).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let unlinked = send(
        app.clone(),
        authed(
            "DELETE",
            &format!("/api/trainer/clients/{link_id}"),
            &trainer_token,
            None,
        ),
    )
    .await;
    assert_eq!(unlinked.status(), StatusCode::NO_CONTENT);

    let gone = send(
        app.clone(),
        get(&format!("/api/trainer/clients/{link_id}"), Some(&trainer_token)),
    )
    .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_forgot_password_without_smtp_keeps_password() {
    let Some(pool) = test_pool().await else { return };
    let dir = TempDir::new().unwrap();
    let app = app(&pool, &dir);
    let email = unique_email("forgetful");
    register_client(&app, &email).await;

    let response = send(
        app.clone(),
        json_request("POST", "/api/auth/forgot-password", json!({ "email": email })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = login(&app, "client", &email, "secret123").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_concurrent_subscribes_leave_one_active() {
    let Some(pool) = test_pool().await else { return };
    let dir = TempDir::new().unwrap();
    let app = app(&pool, &dir);
    let plan = create_plan(&pool, "Monthly", 30).await;
    let subscriptions = SubscriptionService::new(pool.clone());

    for _ in 0..5 {
        let registered = register_client(&app, &unique_email("rush")).await;
        let client_id: Uuid = registered["user"]["id"].as_str().unwrap().parse().unwrap();

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let subscriptions = subscriptions.clone();
                let plan = plan.clone();
                tokio::spawn(async move { subscriptions.subscribe(client_id, &plan).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM subscriptions WHERE client_id = $1 AND status = 'active'",
        )
        .bind(client_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(active, 1);
    }
}

#[tokio::test]
async fn test_lapsed_subscription_cannot_be_cancelled() {
    let Some(pool) = test_pool().await else { return };
    let dir = TempDir::new().unwrap();
    let app = app(&pool, &dir);
    let plan = create_plan(&pool, "Weekly", 7).await;

    let registered = register_client(&app, &unique_email("lapsed")).await;
    let token = registered["access_token"].as_str().unwrap();
    let (status, subscription) =
        post_json(&app, "/api/subscriptions", token, json!({ "plan_id": plan.id })).await;
    assert_eq!(status, StatusCode::CREATED);

    sqlx::query(
        "UPDATE subscriptions SET starts_at = NOW() - INTERVAL '8 days', ends_at = NOW() - INTERVAL '1 day'
         WHERE id = $1",
    )
    .bind(Uuid::parse_str(subscription["id"].as_str().unwrap()).unwrap())
    .execute(&pool)
    .await
    .unwrap();

    let cancel = status_of(&app, "POST", "/api/subscriptions/cancel", token, None).await;
    assert_eq!(cancel, StatusCode::NOT_FOUND);

    let listed = body_json(send(app.clone(), get("/api/subscriptions", Some(token))).await).await;
    assert_eq!(listed[0]["status"], "expired");
}

#[tokio::test]
async fn test_trainer_cannot_reach_another_trainers_records() {
    let Some(pool) = test_pool().await else { return };
    let dir = TempDir::new().unwrap();
    let app = app(&pool, &dir);

    let owner = register_trainer(&app, &unique_email("owner")).await;
    let intruder = register_trainer(&app, &unique_email("intruder")).await;
    let client = register_client(&app, &unique_email("followed")).await;

    let (status, link) = post_json(
        &app,
        "/api/trainer/clients",
        &owner,
        json!({ "client_id": client["user"]["id"], "started_on": "2024-03-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let link_id = link["id"].as_str().unwrap().to_string();

    let training_body = json!({
        "trainer_client_id": link_id,
        "name": "Hypertrophy A",
        "goal": "Hypertrophy",
        "difficulty": "beginner",
    });
    let (_, training) = post_json(&app, "/api/trainer/trainings", &owner, training_body.clone()).await;
    let training_id = training["id"].as_str().unwrap().to_string();

    let assessment_body = json!({
        "trainer_client_id": link_id,
        "assessed_on": "2024-03-02",
        "weight_kg": 70.0,
        "height_m": 1.75,
    });
    let (_, assessment) =
        post_json(&app, "/api/trainer/assessments", &owner, assessment_body.clone()).await;
    let assessment_id = assessment["id"].as_str().unwrap().to_string();

    let progress_body = json!({
        "trainer_client_id": link_id,
        "recorded_on": "2024-03-10",
        "weight_kg": 69.5,
        "energy": 8,
    });
    let (_, progress) = post_json(&app, "/api/trainer/progress", &owner, progress_body.clone()).await;
    let progress_id = progress["id"].as_str().unwrap().to_string();

    let link_update = json!({ "started_on": "2024-03-01", "status": "inactive" });
    let training_update = json!({
        "name": "Taken over",
        "goal": "Strength",
        "difficulty": "advanced",
        "days_per_week": 5,
        "status": "paused",
    });

    let foreign = [
        ("GET", format!("/api/trainer/clients/{link_id}"), None),
        ("PUT", format!("/api/trainer/clients/{link_id}"), Some(link_update)),
        ("DELETE", format!("/api/trainer/clients/{link_id}"), None),
        ("GET", format!("/api/trainer/trainings/{training_id}"), None),
        ("PUT", format!("/api/trainer/trainings/{training_id}"), Some(training_update)),
        ("DELETE", format!("/api/trainer/trainings/{training_id}"), None),
        ("GET", format!("/api/trainer/assessments/{assessment_id}"), None),
        ("DELETE", format!("/api/trainer/assessments/{assessment_id}"), None),
        ("DELETE", format!("/api/trainer/progress/{progress_id}"), None),
        ("POST", "/api/trainer/trainings".to_string(), Some(training_body)),
        ("POST", "/api/trainer/assessments".to_string(), Some(assessment_body)),
        ("POST", "/api/trainer/progress".to_string(), Some(progress_body)),
    ];
    for (method, uri, body) in foreign {
        let status = status_of(&app, method, &uri, &intruder, body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
    }

    for uri in [
        "/api/trainer/clients",
        "/api/trainer/trainings",
        "/api/trainer/assessments",
        "/api/trainer/progress",
    ] {
        let listed = body_json(send(app.clone(), get(uri, Some(&intruder))).await).await;
        assert_eq!(listed.as_array().unwrap().len(), 0, "{uri}");
    }

    // Nothing the intruder tried touched the owner's records.
    let details = send(
        app.clone(),
        get(&format!("/api/trainer/clients/{link_id}"), Some(&owner)),
    )
    .await;
    assert_eq!(details.status(), StatusCode::OK);
    let details = body_json(details).await;
    assert_eq!(details["client"]["status"], "active");
    assert_eq!(details["training_plans"][0]["name"], "Hypertrophy A");
    assert_eq!(details["assessments"].as_array().unwrap().len(), 1);
    assert_eq!(details["progress"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_trainings_and_progress_lifecycle() {
    let Some(pool) = test_pool().await else { return };
    let dir = TempDir::new().unwrap();
    let app = app(&pool, &dir);

    let trainer = register_trainer(&app, &unique_email("coach")).await;
    let client = register_client(&app, &unique_email("athlete")).await;
    let (_, link) = post_json(
        &app,
        "/api/trainer/clients",
        &trainer,
        json!({ "client_id": client["user"]["id"], "started_on": "2024-03-01" }),
    )
    .await;
    let link_id = link["id"].as_str().unwrap().to_string();

    let mut training_ids = Vec::new();
    for name in ["Adaptation", "Hypertrophy B"] {
        let (status, training) = post_json(
            &app,
            "/api/trainer/trainings",
            &trainer,
            json!({
                "trainer_client_id": link_id,
                "name": name,
                "goal": "Hypertrophy",
                "difficulty": "intermediate",
                "days_per_week": 4,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        training_ids.push(training["id"].as_str().unwrap().to_string());
    }

    let (status, blank) = post_json(
        &app,
        "/api/trainer/trainings",
        &trainer,
        json!({
            "trainer_client_id": link_id,
            "name": "   ",
            "goal": "Hypertrophy",
            "difficulty": "beginner",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        blank["fields"]["name"],
        "Name must have between 1 and 100 characters."
    );

    let listed = body_json(send(app.clone(), get("/api/trainer/trainings", Some(&trainer))).await).await;
    let names: Vec<_> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Hypertrophy B", "Adaptation"]);
    assert_eq!(listed[0]["client_name"], "Bruno Lima");

    let updated = send(
        app.clone(),
        authed(
            "PUT",
            &format!("/api/trainer/trainings/{}", training_ids[0]),
            &trainer,
            Some(json!({
                "name": "  Adaptation II  ",
                "goal": "Conditioning",
                "difficulty": "beginner",
                "days_per_week": 3,
                "status": "completed",
            })),
        ),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated = body_json(updated).await;
    assert_eq!(updated["name"], "Adaptation II");
    assert_eq!(updated["status"], "completed");

    let training_uri = format!("/api/trainer/trainings/{}", training_ids[1]);
    assert_eq!(
        status_of(&app, "DELETE", &training_uri, &trainer, None).await,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        status_of(&app, "GET", &training_uri, &trainer, None).await,
        StatusCode::NOT_FOUND
    );

    let mut progress_ids = Vec::new();
    for (recorded_on, weight) in [("2024-03-01", 72.0), ("2024-04-01", 70.5)] {
        let (status, entry) = post_json(
            &app,
            "/api/trainer/progress",
            &trainer,
            json!({
                "trainer_client_id": link_id,
                "recorded_on": recorded_on,
                "weight_kg": weight,
                "mood": "motivated",
                "energy": 7,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        progress_ids.push(entry["id"].as_str().unwrap().to_string());
    }

    let (status, tired) = post_json(
        &app,
        "/api/trainer/progress",
        &trainer,
        json!({ "trainer_client_id": link_id, "recorded_on": "2024-04-02", "energy": 11 }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(tired["fields"]["energy"], "Energy must be between 1 and 10.");

    let listed = body_json(send(app.clone(), get("/api/trainer/progress", Some(&trainer))).await).await;
    let dates: Vec<_> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["recorded_on"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-04-01", "2024-03-01"]);

    let progress_uri = format!("/api/trainer/progress/{}", progress_ids[0]);
    assert_eq!(
        status_of(&app, "DELETE", &progress_uri, &trainer, None).await,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        status_of(&app, "DELETE", &progress_uri, &trainer, None).await,
        StatusCode::NOT_FOUND
    );
}
