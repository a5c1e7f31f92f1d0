mod common;

use axum::http::StatusCode;
use common::TestApp;
use snippetbox::db::{snippets, users};

#[tokio::test]
async fn home_page_lists_latest_snippets() {
    let mut app = TestApp::spawn().await;

    let response = app.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("There's nothing to see here"));

    snippets::insert(&app.pool, "An old silent pond", "A frog jumps into the pond", 7)
        .await
        .unwrap();

    let response = app.get("/").await;
    assert!(response.body.contains("An old silent pond"));
    assert!(response.body.contains(r#"href="/snippet/view/1""#));
}

#[tokio::test]
async fn anonymous_navigation_offers_signup_and_login() {
    let mut app = TestApp::spawn().await;

    let body = app.get("/").await.body;

    assert!(body.contains(r#"href="/user/signup""#));
    assert!(body.contains(r#"href="/user/login""#));
    assert!(!body.contains("Logout"));
    assert!(!body.contains(r#"href="/snippet/create""#));
}

#[tokio::test]
async fn signup_login_create_and_view() {
    let mut app = TestApp::spawn().await;

    let response = app.sign_up("Alice", "alice@example.com", "pa55word!").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/user/login"));

    let login_page = app.get("/user/login").await;
    assert!(login_page.body.contains("Your signup was successful. Please log in."));

    let anonymous_cookie = app.cookie.clone();
    let response = app.log_in("alice@example.com", "pa55word!").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/snippet/create"));
    assert!(app.cookie.is_some());
    assert_ne!(app.cookie, anonymous_cookie, "login must renew the session token");

    let response = app
        .submit(
            "/snippet/create",
            "/snippet/create",
            &[
                ("title", "O snail"),
                ("content", "Climb Mount Fuji, but slowly, slowly!"),
                ("expires", "7"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/snippet/view/1"));

    let view = app.get("/snippet/view/1").await;
    assert_eq!(view.status, StatusCode::OK);
    assert!(view.body.contains("O snail"));
    assert!(view.body.contains("Climb Mount Fuji, but slowly, slowly!"));
    assert!(view.body.contains("Snippet successfully created!"));
    assert!(view.body.contains("Logout"));

    // The flash is shown once
    let again = app.get("/snippet/view/1").await;
    assert!(!again.body.contains("Snippet successfully created!"));
}

#[tokio::test]
async fn invalid_snippet_is_redisplayed_and_not_stored() {
    let mut app = TestApp::spawn().await;
    app.logged_in().await;

    let response = app
        .submit(
            "/snippet/create",
            "/snippet/create",
            &[("title", "Kept title"), ("content", ""), ("expires", "30")],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("This field must equal 1, 7 or 365"));
    assert!(response.body.contains("This field cannot be blank"));
    assert!(response.body.contains(r#"value="Kept title""#));
    assert_eq!(snippets::count(&app.pool).await.unwrap(), 0);
}

#[tokio::test]
async fn snippet_without_expiry_is_a_validation_error() {
    let mut app = TestApp::spawn().await;
    app.logged_in().await;

    let response = app
        .submit(
            "/snippet/create",
            "/snippet/create",
            &[("title", "No expiry"), ("content", "Nothing picked")],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("This field must equal 1, 7 or 365"));
    assert_eq!(snippets::count(&app.pool).await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_email_is_a_field_error() {
    let mut app = TestApp::spawn().await;

    let first = app.sign_up("Alice", "alice@example.com", "pa55word!").await;
    assert_eq!(first.status, StatusCode::SEE_OTHER);

    let second = app.sign_up("Another Alice", "alice@example.com", "different1").await;
    assert_eq!(second.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(second.body.contains("Email address is already in use"));
    assert!(second.body.contains(r#"value="Another Alice""#));
}

#[tokio::test]
async fn invalid_signup_keeps_the_password_out_of_the_page() {
    let mut app = TestApp::spawn().await;

    let response = app.sign_up("", "not-an-email", "short!!").await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("This field must be a valid email address"));
    assert!(response.body.contains("This field must be at least 8 characters long"));
    assert!(!response.body.contains("short!!"));
}

#[tokio::test]
async fn wrong_password_is_a_generic_error() {
    let mut app = TestApp::spawn().await;
    app.sign_up("Alice", "alice@example.com", "pa55word!").await;

    let before = app.cookie.clone();
    let response = app.log_in("alice@example.com", "wrong-password").await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Email or password is incorrect"));
    assert_eq!(app.cookie, before);

    let response = app.get("/snippet/create").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn logout_renews_the_session_and_forgets_the_user() {
    let mut app = TestApp::spawn().await;
    app.logged_in().await;

    let logged_in_cookie = app.cookie.clone();
    let response = app.submit("/", "/user/logout", &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
    assert_ne!(app.cookie, logged_in_cookie);

    let home = app.get("/").await;
    assert!(home.body.contains("logged out successfully"));
    assert!(!home.body.contains("Logout"));

    let response = app.get("/snippet/create").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/user/login"));
}

#[tokio::test]
async fn stolen_pre_login_cookie_is_useless_after_login() {
    let mut app = TestApp::spawn().await;
    app.get("/user/login").await;
    let pre_login = app.cookie.clone();

    app.logged_in().await;

    app.cookie = pre_login;
    let response = app.get("/snippet/create").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn session_of_a_deleted_user_becomes_anonymous() {
    let mut app = TestApp::spawn().await;
    app.logged_in().await;

    let user_id = users::authenticate(&app.pool, "alice@example.com", "pa55word!")
        .await
        .unwrap();
    users::delete(&app.pool, user_id).await.unwrap();

    let before = app.cookie.clone();
    let home = app.get("/").await;
    assert_eq!(home.status, StatusCode::OK);
    assert!(!home.body.contains("Logout"));
    assert_ne!(app.cookie, before, "stale session must be renewed");

    let response = app.get("/snippet/create").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/user/login"));
}
