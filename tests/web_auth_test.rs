//! Integration tests for registration, login, logout and sessions.

mod common;

use axum::http::StatusCode;
use common::TestClient;

#[tokio::test]
async fn test_home_page_is_public() {
    let mut client = TestClient::new();
    let response = client.get("/").await;
    response.assert_ok();
    assert!(response.body.contains("href=\"/login/\""));
    assert!(response.body.contains("href=\"/users/create/\""));
    assert!(!response.body.contains("href=\"/tasks/\""));
}

#[tokio::test]
async fn test_register_then_login_shows_notices() {
    let mut client = TestClient::new();
    client.register("ann", "pass123").await;

    let page = client.get("/login/").await;
    page.assert_ok();
    assert!(page.body.contains("User successfully registered."));

    // Notices are shown once.
    let again = client.get("/login/").await;
    assert!(!again.body.contains("User successfully registered."));

    client.login("ann", "pass123").await;
    let home = client.get("/").await;
    assert!(home.body.contains("You are logged in."));
    assert!(home.body.contains("href=\"/tasks/\""));
    assert!(home.body.contains("action=\"/logout/\""));
}

#[tokio::test]
async fn test_login_with_wrong_password_rerenders_form() {
    let mut client = TestClient::new();
    client.register("ann", "pass123").await;

    let response = client
        .post("/login/", &[("username", "ann"), ("password", "nope")])
        .await;
    response.assert_ok();
    assert!(response.body.contains("Please enter a correct username and password."));
    assert!(response.body.contains("value=\"ann\""));

    let tasks = client.get("/tasks/").await;
    tasks.assert_redirect("/login/");
}

#[tokio::test]
async fn test_login_rotates_session_token() {
    let mut client = TestClient::new();
    client.register("ann", "pass123").await;
    let anonymous = client.session_token().unwrap();

    client.login("ann", "pass123").await;
    let authenticated = client.session_token().unwrap();
    assert_ne!(anonymous, authenticated);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let mut client = TestClient::new();
    client.sign_up("ann").await;

    let response = client.post("/logout/", &[]).await;
    response.assert_redirect("/");
    let home = client.follow(&response).await;
    assert!(home.body.contains("You are unlogged."));
    assert!(home.body.contains("href=\"/login/\""));

    client.get("/tasks/").await.assert_redirect("/login/");
}

#[tokio::test]
async fn test_authenticated_user_is_sent_home_from_login_and_registration() {
    let mut client = TestClient::new();
    client.sign_up("ann").await;

    client.get("/login/").await.assert_redirect("/");
    client.get("/users/create/").await.assert_redirect("/");
}

#[tokio::test]
async fn test_registration_validation_errors() {
    let mut client = TestClient::new();
    client.register("ann", "pass123").await;

    let mismatch = client
        .post(
            "/users/create/",
            &[
                ("first_name", "Bob"),
                ("last_name", "Ray"),
                ("username", "bob"),
                ("password1", "pass123"),
                ("password2", "pass124"),
            ],
        )
        .await;
    mismatch.assert_ok();
    assert!(mismatch.body.contains("The two password fields didn"));

    let taken = client
        .post(
            "/users/create/",
            &[
                ("first_name", "Other"),
                ("last_name", "Ann"),
                ("username", "ann"),
                ("password1", "pass123"),
                ("password2", "pass123"),
            ],
        )
        .await;
    taken.assert_ok();
    assert!(taken.body.contains("A user with that username already exists."));

    let short = client
        .post(
            "/users/create/",
            &[
                ("first_name", "Bob"),
                ("last_name", "Ray"),
                ("username", "bob"),
                ("password1", "ab"),
                ("password2", "ab"),
            ],
        )
        .await;
    short.assert_ok();
    assert!(short.body.contains("This password is too short."));

    let users = client.get("/users/").await;
    assert!(!users.body.contains("bob"));
}

#[tokio::test]
async fn test_language_follows_accept_language() {
    let mut client = TestClient::new();
    let response = client.get_with_language("/", "ru-RU,ru;q=0.9,en;q=0.8").await;
    response.assert_ok();
    assert!(response.body.contains("lang=\"ru\""));

    let fallback = client.get_with_language("/", "de-DE").await;
    assert!(fallback.body.contains("lang=\"en\""));
}

#[tokio::test]
async fn test_unknown_paths_are_not_found() {
    let mut client = TestClient::new();
    assert_eq!(client.get("/nowhere/").await.status, StatusCode::NOT_FOUND);

    client.sign_up("ann").await;
    assert_eq!(client.get("/tasks/abc/").await.status, StatusCode::NOT_FOUND);
    assert_eq!(client.get("/tasks/42/").await.status, StatusCode::NOT_FOUND);
}
