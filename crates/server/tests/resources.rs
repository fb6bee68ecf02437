use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Datelike, Utc};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    server::app(engine, db, server::AuthConfig::new("test-secret", 7))
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn register(app: &Router, name: &str, email: &str) -> String {
    let payload = json!({ "name": name, "email": email, "password": "secret123" });
    let (status, body) = send(app, request("POST", "/register", None, Some(&payload))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

/// Looks up one of the categories every fresh account starts with.
async fn seeded_category(app: &Router, token: &str, name: &str) -> String {
    let (status, body) = send(app, request("GET", "/categories", Some(token), None)).await;
    assert_eq!(status, StatusCode::OK);
    body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .find(|category| category["name"] == name)
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn transaction_crud_flows_through_the_balance() {
    let app = app().await;
    let token = register(&app, "Alice", "alice@example.com").await;
    let salary = seeded_category(&app, &token, "Salary").await;
    let food = seeded_category(&app, &token, "Food & Dining").await;
    let date = Utc::now().date_naive();

    let income = json!({
        "amount": 1000.0,
        "date": date,
        "category_id": salary,
        "type": "income",
        "description": "August pay",
    });
    let (status, body) =
        send(&app, request("POST", "/transactions", Some(&token), Some(&income))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["transaction"]["category_name"], "Salary");
    assert_eq!(body["transaction"]["description"], "August pay");

    let expense = json!({
        "amount": 200.5,
        "date": date,
        "category_id": food,
        "type": "expense",
    });
    let (status, body) =
        send(&app, request("POST", "/transactions", Some(&token), Some(&expense))).await;
    assert_eq!(status, StatusCode::CREATED);
    let expense_id = body["transaction"]["id"].as_str().unwrap().to_string();
    assert!(body["transaction"]["description"].is_null());

    let (_, body) = send(&app, request("GET", "/solde", Some(&token), None)).await;
    assert_eq!(body["solde"]["current_balance"].as_f64().unwrap(), 799.5);

    let (_, body) = send(&app, request("GET", "/transactions", Some(&token), None)).await;
    assert_eq!(body["transactions"].as_array().unwrap().len(), 2);

    let update = json!({
        "amount": 150.0,
        "date": date,
        "category_id": food,
        "type": "expense",
    });
    let uri = format!("/transactions/{expense_id}");
    let (status, body) = send(&app, request("PUT", &uri, Some(&token), Some(&update))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transaction"]["amount"].as_f64().unwrap(), 150.0);

    let (_, body) = send(&app, request("GET", "/solde", Some(&token), None)).await;
    assert_eq!(body["solde"]["current_balance"].as_f64().unwrap(), 850.0);

    let (status, body) = send(&app, request("DELETE", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (_, body) = send(&app, request("GET", "/solde", Some(&token), None)).await;
    assert_eq!(body["solde"]["current_balance"].as_f64().unwrap(), 1000.0);

    let (status, _) = send(&app, request("GET", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn transaction_filters_narrow_the_list() {
    let app = app().await;
    let token = register(&app, "Alice", "alice@example.com").await;
    let salary = seeded_category(&app, &token, "Salary").await;
    let food = seeded_category(&app, &token, "Food & Dining").await;

    for (amount, date, category, kind) in [
        (1500.0, "2026-03-10", &salary, "income"),
        (60.0, "2026-03-25", &food, "expense"),
        (45.0, "2026-04-02", &food, "expense"),
    ] {
        let payload =
            json!({ "amount": amount, "date": date, "category_id": category, "type": kind });
        let (status, _) =
            send(&app, request("POST", "/transactions", Some(&token), Some(&payload))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, request("GET", "/transactions", Some(&token), None)).await;
    let all = body["transactions"].as_array().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0]["date"], "2026-04-02");

    let (_, body) =
        send(&app, request("GET", "/transactions?month=3&year=2026", Some(&token), None)).await;
    assert_eq!(body["transactions"].as_array().unwrap().len(), 2);

    let (_, body) =
        send(&app, request("GET", "/transactions?type=income", Some(&token), None)).await;
    let incomes = body["transactions"].as_array().unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0]["amount"].as_f64().unwrap(), 1500.0);

    let uri = format!("/transactions?category_id={food}");
    let (_, body) = send(&app, request("GET", &uri, Some(&token), None)).await;
    assert_eq!(body["transactions"].as_array().unwrap().len(), 2);

    // A month filter without a year is ignored.
    let (_, body) = send(&app, request("GET", "/transactions?month=3", Some(&token), None)).await;
    assert_eq!(body["transactions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn transaction_guards_cover_validation_and_ownership() {
    let app = app().await;
    let token = register(&app, "Alice", "alice@example.com").await;
    let food = seeded_category(&app, &token, "Food & Dining").await;
    let date = Utc::now().date_naive();

    let zero = json!({ "amount": 0.0, "date": date, "category_id": food, "type": "expense" });
    let (status, body) =
        send(&app, request("POST", "/transactions", Some(&token), Some(&zero))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "amount");
    assert_eq!(body["errors"][0]["message"], "Amount must be a positive number");

    let foreign = json!({
        "amount": 10.0,
        "date": date,
        "category_id": Uuid::new_v4().to_string(),
        "type": "expense",
    });
    let (status, body) =
        send(&app, request("POST", "/transactions", Some(&token), Some(&foreign))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid category.");

    let missing = Uuid::new_v4();
    let uri = format!("/transactions/{missing}");
    let (status, body) = send(&app, request("GET", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Transaction not found.");
}

#[tokio::test]
async fn categories_are_seeded_and_editable() {
    let app = app().await;
    let token = register(&app, "Alice", "alice@example.com").await;

    let (status, body) = send(&app, request("GET", "/categories", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"].as_array().unwrap().len(), 13);

    let (_, body) = send(&app, request("GET", "/categories?type=income", Some(&token), None)).await;
    let incomes = body["categories"].as_array().unwrap();
    assert_eq!(incomes.len(), 4);
    assert!(incomes.iter().all(|category| category["type"] == "income"));

    let payload = json!({ "name": "Groceries", "type": "expense" });
    let (status, body) =
        send(&app, request("POST", "/categories", Some(&token), Some(&payload))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["category"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["category"]["name"], "Groceries");

    let (status, body) =
        send(&app, request("POST", "/categories", Some(&token), Some(&payload))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Category with this name already exists.");

    let uri = format!("/categories/{id}");
    let rename = json!({ "name": "Household", "type": "expense" });
    let (status, body) = send(&app, request("PUT", &uri, Some(&token), Some(&rename))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"]["name"], "Household");

    let (status, body) = send(&app, request("DELETE", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    let (status, body) = send(&app, request("GET", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category not found.");
}

#[tokio::test]
async fn used_categories_cannot_be_deleted() {
    let app = app().await;
    let token = register(&app, "Alice", "alice@example.com").await;
    let food = seeded_category(&app, &token, "Food & Dining").await;

    let expense = json!({
        "amount": 25.0,
        "date": Utc::now().date_naive(),
        "category_id": food,
        "type": "expense",
    });
    let (status, _) =
        send(&app, request("POST", "/transactions", Some(&token), Some(&expense))).await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/categories/{food}");
    let (status, body) = send(&app, request("DELETE", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cannot delete category. It is used in transactions.");

    // Blank names never reach the engine.
    let blank = json!({ "name": "   ", "type": "expense" });
    let (status, body) =
        send(&app, request("POST", "/categories", Some(&token), Some(&blank))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "name");
    assert_eq!(body["errors"][0]["message"], "Category name is required");
}

#[tokio::test]
async fn budget_lifecycle_reports_status() {
    let app = app().await;
    let token = register(&app, "Alice", "alice@example.com").await;
    let food = seeded_category(&app, &token, "Food & Dining").await;
    let today = Utc::now().date_naive();
    let (month, year) = (today.month(), today.year());

    let payload = json!({ "amount": 300.0, "month": month, "year": year, "category_id": food });
    let (status, body) =
        send(&app, request("POST", "/budgets", Some(&token), Some(&payload))).await;
    assert_eq!(status, StatusCode::CREATED);
    let scoped = body["budget"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["budget"]["category_name"], "Food & Dining");
    assert_eq!(body["budget"]["spent"].as_f64().unwrap(), 0.0);
    assert_eq!(body["budget"]["remaining"].as_f64().unwrap(), 300.0);
    assert_eq!(body["budget"]["percentage"].as_f64().unwrap(), 0.0);

    let expense = json!({
        "amount": 120.0,
        "date": today,
        "category_id": food,
        "type": "expense",
    });
    let (status, _) =
        send(&app, request("POST", "/transactions", Some(&token), Some(&expense))).await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/budgets/{scoped}");
    let (_, body) = send(&app, request("GET", &uri, Some(&token), None)).await;
    assert_eq!(body["budget"]["spent"].as_f64().unwrap(), 120.0);
    assert_eq!(body["budget"]["remaining"].as_f64().unwrap(), 180.0);
    assert_eq!(body["budget"]["percentage"].as_f64().unwrap(), 40.0);

    // The period/category slot is taken now.
    let (status, body) =
        send(&app, request("POST", "/budgets", Some(&token), Some(&payload))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Budget for this period and category already exists.");

    // An overall budget for the same month is a different slot and counts
    // every expense of the period.
    let overall_payload = json!({ "amount": 500.0, "month": month, "year": year });
    let (status, body) =
        send(&app, request("POST", "/budgets", Some(&token), Some(&overall_payload))).await;
    assert_eq!(status, StatusCode::CREATED);
    let overall = body["budget"]["id"].as_str().unwrap().to_string();
    assert!(body["budget"]["category_id"].is_null());
    assert_eq!(body["budget"]["spent"].as_f64().unwrap(), 120.0);

    let (_, body) = send(&app, request("GET", "/budgets", Some(&token), None)).await;
    assert_eq!(body["budgets"].as_array().unwrap().len(), 2);

    let uri = format!("/budgets?month={month}&year={year}");
    let (_, body) = send(&app, request("GET", &uri, Some(&token), None)).await;
    assert_eq!(body["budgets"].as_array().unwrap().len(), 2);

    // Period filters only apply as a month+year pair.
    let other_month = month % 12 + 1;
    let uri = format!("/budgets?month={other_month}&year={year}");
    let (_, body) = send(&app, request("GET", &uri, Some(&token), None)).await;
    assert!(body["budgets"].as_array().unwrap().is_empty());

    let uri = format!("/budgets?month={other_month}");
    let (_, body) = send(&app, request("GET", &uri, Some(&token), None)).await;
    assert_eq!(body["budgets"].as_array().unwrap().len(), 2);

    // Shrinking the budget below its spending pushes the status negative.
    let update = json!({ "amount": 80.0, "month": month, "year": year });
    let uri = format!("/budgets/{overall}");
    let (status, body) = send(&app, request("PUT", &uri, Some(&token), Some(&update))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["budget"]["remaining"].as_f64().unwrap(), -40.0);
    assert_eq!(body["budget"]["percentage"].as_f64().unwrap(), 150.0);

    let (status, body) = send(&app, request("DELETE", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    let (status, body) = send(&app, request("GET", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Budget not found.");

    let bad = json!({ "amount": 10.0, "month": 13, "year": 1999 });
    let (status, body) = send(&app, request("POST", "/budgets", Some(&token), Some(&bad))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|err| err["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["month", "year"]);
}

#[tokio::test]
async fn initial_balance_shifts_the_solde() {
    let app = app().await;
    let token = register(&app, "Alice", "alice@example.com").await;

    let (status, body) = send(&app, request("GET", "/solde", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["solde"]["initial_balance"].as_f64().unwrap(), 0.0);
    assert_eq!(body["solde"]["current_balance"].as_f64().unwrap(), 0.0);

    let rebase = json!({ "initial_balance": 500.0 });
    let (status, body) =
        send(&app, request("PUT", "/solde/initial", Some(&token), Some(&rebase))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["solde"]["current_balance"].as_f64().unwrap(), 500.0);

    let salary = seeded_category(&app, &token, "Salary").await;
    let income = json!({
        "amount": 100.0,
        "date": Utc::now().date_naive(),
        "category_id": salary,
        "type": "income",
    });
    let (status, _) =
        send(&app, request("POST", "/transactions", Some(&token), Some(&income))).await;
    assert_eq!(status, StatusCode::CREATED);

    // Re-basing keeps the recorded history on top of the new floor.
    let rebase = json!({ "initial_balance": 200.0 });
    let (_, body) =
        send(&app, request("PUT", "/solde/initial", Some(&token), Some(&rebase))).await;
    assert_eq!(body["solde"]["initial_balance"].as_f64().unwrap(), 200.0);
    assert_eq!(body["solde"]["current_balance"].as_f64().unwrap(), 300.0);

    let (status, body) =
        send(&app, request("POST", "/solde/recalculate", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["solde"]["current_balance"].as_f64().unwrap(), 300.0);
}

#[tokio::test]
async fn dashboard_aggregates_the_current_month() {
    let app = app().await;
    let token = register(&app, "Alice", "alice@example.com").await;
    let salary = seeded_category(&app, &token, "Salary").await;
    let food = seeded_category(&app, &token, "Food & Dining").await;
    let today = Utc::now().date_naive();

    for payload in [
        json!({ "amount": 1000.0, "date": today, "category_id": salary, "type": "income" }),
        json!({ "amount": 200.0, "date": today, "category_id": food, "type": "expense" }),
    ] {
        let (status, _) =
            send(&app, request("POST", "/transactions", Some(&token), Some(&payload))).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let budget = json!({
        "amount": 400.0,
        "month": today.month(),
        "year": today.year(),
        "category_id": food,
    });
    let (status, _) = send(&app, request("POST", "/budgets", Some(&token), Some(&budget))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, request("GET", "/dashboard", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["balance"].as_f64().unwrap(), 800.0);
    assert_eq!(body["initialBalance"].as_f64().unwrap(), 0.0);
    assert_eq!(body["totalIncome"].as_f64().unwrap(), 1000.0);
    assert_eq!(body["totalExpense"].as_f64().unwrap(), 200.0);
    assert_eq!(body["monthlyIncome"].as_f64().unwrap(), 1000.0);
    assert_eq!(body["monthlyExpense"].as_f64().unwrap(), 200.0);
    assert_eq!(body["currentMonth"].as_u64().unwrap(), u64::from(today.month()));
    assert_eq!(body["currentYear"].as_i64().unwrap(), i64::from(today.year()));

    let by_category = body["expensesByCategory"].as_array().unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0]["category"], "Food & Dining");
    assert_eq!(by_category[0]["amount"].as_f64().unwrap(), 200.0);

    let evolution = body["monthlyEvolution"].as_array().unwrap();
    assert_eq!(evolution.len(), 6);
    let latest = &evolution[5];
    assert_eq!(latest["month"], today.format("%b").to_string());
    assert_eq!(latest["year"].as_i64().unwrap(), i64::from(today.year()));
    assert_eq!(latest["income"].as_f64().unwrap(), 1000.0);
    assert_eq!(latest["expense"].as_f64().unwrap(), 200.0);
    assert_eq!(evolution[0]["income"].as_f64().unwrap(), 0.0);

    let recent = body["recentTransactions"].as_array().unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0]["type"], "expense");
    assert_eq!(recent[0]["category_name"], "Food & Dining");

    let budgets = body["categoryBudgets"].as_array().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0]["category_name"], "Food & Dining");
    assert_eq!(budgets[0]["spent"].as_f64().unwrap(), 200.0);
    assert_eq!(budgets[0]["percentage"].as_f64().unwrap(), 50.0);
}

#[tokio::test]
async fn tenants_cannot_reach_each_others_rows() {
    let app = app().await;
    let alice = register(&app, "Alice", "alice@example.com").await;
    let bob = register(&app, "Bob", "bob@example.com").await;

    let food = seeded_category(&app, &alice, "Food & Dining").await;
    let expense = json!({
        "amount": 30.0,
        "date": Utc::now().date_naive(),
        "category_id": food,
        "type": "expense",
    });
    let (status, body) =
        send(&app, request("POST", "/transactions", Some(&alice), Some(&expense))).await;
    assert_eq!(status, StatusCode::CREATED);
    let tx = body["transaction"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(&app, request("GET", "/transactions", Some(&bob), None)).await;
    assert!(body["transactions"].as_array().unwrap().is_empty());

    let uri = format!("/transactions/{tx}");
    let (status, _) = send(&app, request("GET", &uri, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/categories/{food}");
    let (status, _) = send(&app, request("DELETE", &uri, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Another tenant's category is a bad reference, not a reachable row.
    let (status, body) =
        send(&app, request("POST", "/transactions", Some(&bob), Some(&expense))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid category.");

    // Alice's side is untouched by any of it.
    let (_, body) = send(&app, request("GET", "/solde", Some(&alice), None)).await;
    assert_eq!(body["solde"]["current_balance"].as_f64().unwrap(), -30.0);
}
