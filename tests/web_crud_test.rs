//! Integration tests for the create/update/delete pages.

mod common;

use axum::http::StatusCode;
use common::TestClient;

#[tokio::test]
async fn test_status_lifecycle() {
    let mut client = TestClient::new();
    client.sign_up("ann").await;

    client.get("/statuses/create/").await.assert_ok();

    let response = client.post("/statuses/create/", &[("name", "  new  ")]).await;
    response.assert_redirect("/statuses/");
    let list = client.follow(&response).await;
    assert!(list.body.contains("Status successfully created."));
    assert!(list.body.contains("<td>new</td>"));

    let duplicate = client.post("/statuses/create/", &[("name", "new")]).await;
    duplicate.assert_ok();
    assert!(duplicate.body.contains("An entry with this name already exists."));

    let empty = client.post("/statuses/create/", &[("name", "   ")]).await;
    empty.assert_ok();
    assert!(empty.body.contains("This field is required."));

    let form = client.get("/statuses/1/update/").await;
    form.assert_ok();
    assert!(form.body.contains("value=\"new\""));

    // Saving an unchanged name is not a duplicate of itself.
    client
        .post("/statuses/1/update/", &[("name", "new")])
        .await
        .assert_redirect("/statuses/");
    client
        .post("/statuses/1/update/", &[("name", "in progress")])
        .await
        .assert_redirect("/statuses/");
    let list = client.get("/statuses/").await;
    assert!(list.body.contains("Status successfully changed."));
    assert!(list.body.contains("<td>in progress</td>"));

    let confirm = client.get("/statuses/1/delete/").await;
    confirm.assert_ok();
    assert!(confirm.body.contains("in progress"));

    client
        .post("/statuses/1/delete/", &[])
        .await
        .assert_redirect("/statuses/");
    assert_eq!(
        client.get("/statuses/1/update/").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_label_lifecycle() {
    let mut client = TestClient::new();
    client.sign_up("ann").await;

    client
        .post("/labels/create/", &[("name", "bug")])
        .await
        .assert_redirect("/labels/");
    client
        .post("/labels/1/update/", &[("name", "defect")])
        .await
        .assert_redirect("/labels/");
    let list = client.get("/labels/").await;
    assert!(list.body.contains("Label successfully changed."));
    assert!(list.body.contains("<td>defect</td>"));

    let too_long = "x".repeat(101);
    let response = client.post("/labels/create/", &[("name", too_long.as_str())]).await;
    response.assert_ok();
    assert!(response.body.contains("at most 100 characters"));

    client
        .post("/labels/1/delete/", &[])
        .await
        .assert_redirect("/labels/");
    let list = client.get("/labels/").await;
    assert!(list.body.contains("Label successfully deleted."));
    assert!(!list.body.contains("<td>defect</td>"));
}

#[tokio::test]
async fn test_status_and_label_names_are_escaped() {
    let mut client = TestClient::new();
    client.sign_up("ann").await;
    client
        .post("/statuses/create/", &[("name", "<b>bold</b>")])
        .await
        .assert_redirect("/statuses/");
    let list = client.get("/statuses/").await;
    assert!(list.body.contains("&lt;b&gt;bold&lt;/b&gt;"));
    assert!(!list.body.contains("<b>bold</b>"));
}

#[tokio::test]
async fn test_task_lifecycle() {
    let mut ann = TestClient::new();
    ann.sign_up("ann").await;
    let mut bob = ann.fork();
    bob.sign_up("bob").await;

    ann.post("/statuses/create/", &[("name", "new")]).await;
    ann.post("/statuses/create/", &[("name", "done")]).await;
    ann.post("/labels/create/", &[("name", "bug")]).await;
    ann.post("/labels/create/", &[("name", "urgent")]).await;

    let form = ann.get("/tasks/create/").await;
    form.assert_ok();
    assert!(form.body.contains("<option value=\"1\">new</option>"));
    assert!(form.body.contains("bob-first bob-last"));

    let response = ann
        .post(
            "/tasks/create/",
            &[
                ("name", "fix login"),
                ("description", "it breaks"),
                ("status", "1"),
                ("executor", "2"),
                ("labels", "1"),
                ("labels", "2"),
            ],
        )
        .await;
    response.assert_redirect("/tasks/");
    let list = ann.follow(&response).await;
    assert!(list.body.contains("Task successfully created."));
    assert!(list.body.contains("<a href=\"/tasks/1/\">fix login</a>"));

    let detail = ann.get("/tasks/1/").await;
    detail.assert_ok();
    assert!(detail.body.contains("it breaks"));
    assert!(detail.body.contains("<li>bug</li>"));
    assert!(detail.body.contains("<li>urgent</li>"));
    assert!(detail.body.contains("bob-first bob-last"));

    let edit = ann.get("/tasks/1/update/").await;
    edit.assert_ok();
    assert!(edit.body.contains("value=\"fix login\""));
    assert!(edit.body.contains("<option value=\"2\" selected>urgent</option>"));

    ann.post(
        "/tasks/1/update/",
        &[
            ("name", "fix login"),
            ("description", "fixed"),
            ("status", "2"),
            ("executor", ""),
            ("labels", "2"),
        ],
    )
    .await
    .assert_redirect("/tasks/");
    let detail = ann.get("/tasks/1/").await;
    assert!(detail.body.contains("fixed"));
    assert!(detail.body.contains("<dd>done</dd>"));
    assert!(!detail.body.contains("<li>bug</li>"));
    assert!(detail.body.contains("<li>urgent</li>"));
    assert!(!detail.body.contains("bob-first bob-last"));

    ann.get("/tasks/1/delete/").await.assert_ok();
    ann.post("/tasks/1/delete/", &[])
        .await
        .assert_redirect("/tasks/");
    assert_eq!(ann.get("/tasks/1/").await.status, StatusCode::NOT_FOUND);

    // Labels are free again once the task is gone.
    ann.post("/labels/2/delete/", &[])
        .await
        .assert_redirect("/labels/");
    assert!(ann
        .get("/labels/")
        .await
        .body
        .contains("Label successfully deleted."));
}

#[tokio::test]
async fn test_task_validation_errors() {
    let mut client = TestClient::new();
    client.sign_up("ann").await;
    client.post("/statuses/create/", &[("name", "new")]).await;
    client
        .post("/tasks/create/", &[("name", "taken"), ("status", "1")])
        .await
        .assert_redirect("/tasks/");

    let missing = client.post("/tasks/create/", &[("name", "")]).await;
    missing.assert_ok();
    assert_eq!(missing.body.matches("This field is required.").count(), 2);

    let bad_choice = client
        .post(
            "/tasks/create/",
            &[("name", "other"), ("status", "99"), ("labels", "abc")],
        )
        .await;
    bad_choice.assert_ok();
    assert_eq!(bad_choice.body.matches("Select a valid choice.").count(), 2);
    assert!(bad_choice.body.contains("value=\"other\""));

    let duplicate = client
        .post("/tasks/create/", &[("name", "taken"), ("status", "1")])
        .await;
    duplicate.assert_ok();
    assert!(duplicate.body.contains("An entry with this name already exists."));
}

#[tokio::test]
async fn test_user_updates_own_profile() {
    let mut client = TestClient::new();
    client.sign_up("ann").await;

    let form = client.get("/users/1/update/").await;
    form.assert_ok();
    assert!(form.body.contains("value=\"ann\""));
    let blank_password = "type=\"password\" name=\"password1\" id=\"id_password1\" value=\"\"";
    assert!(form.body.contains(blank_password));

    // Both password fields are required on every save.
    let no_password = client
        .post(
            "/users/1/update/",
            &[
                ("first_name", "Ann"),
                ("last_name", "Lee"),
                ("username", "ann"),
            ],
        )
        .await;
    no_password.assert_ok();
    assert!(no_password.body.contains("This field is required."));

    client
        .post(
            "/users/1/update/",
            &[
                ("first_name", "Ann"),
                ("last_name", "Lee"),
                ("username", "annlee"),
                ("password1", "newpass"),
                ("password2", "newpass"),
            ],
        )
        .await
        .assert_redirect("/users/");
    let users = client.get("/users/").await;
    assert!(users.body.contains("User successfully changed."));
    assert!(users.body.contains("Ann Lee"));

    let mut other = client.fork();
    other.login("annlee", "newpass").await;
}

#[tokio::test]
async fn test_user_deletes_own_account() {
    let mut client = TestClient::new();
    client.sign_up("ann").await;

    client.get("/users/1/delete/").await.assert_ok();
    let response = client.post("/users/1/delete/", &[]).await;
    response.assert_redirect("/users/");
    let users = client.follow(&response).await;
    assert!(users.body.contains("User successfully deleted."));
    assert!(!users.body.contains("ann-first ann-last"));

    // The session no longer carries an identity.
    client.get("/tasks/").await.assert_redirect("/login/");
}
