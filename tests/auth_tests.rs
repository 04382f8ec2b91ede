// tests/auth_tests.rs

mod common;

use common::{register_user, spawn_app};

#[tokio::test]
async fn welcome_route_works() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(&format!("{}/", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Welcome to the Certification Exam API");
}

#[tokio::test]
async fn unknown_path_is_404() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn openapi_document_is_served() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(&format!("{}/api-docs/openapi.json", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let doc: serde_json::Value = response.json().await.unwrap();
    assert!(doc["paths"]["/api/auth/register"].is_object());
    assert!(doc["paths"]["/api/exams/attempts"].is_object());
}

#[tokio::test]
async fn register_works() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let unique_name = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);

    // Act
    let response = client
        .post(&format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": unique_name,
            "email": format!("{}@example.com", unique_name),
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["token_type"], "bearer");
    assert!(body["user_id"].as_str().is_some());
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn register_fails_validation() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act: not an email address
    let response = client
        .post(&format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": "valid_name",
            "email": "not-an-email",
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 400);

    // Act: password too short
    let response = client
        .post(&format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": "valid_name",
            "email": "valid@example.com",
            "password": "short"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn duplicate_username_or_email_conflicts() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (username, _token) = register_user(&client, &address).await;

    // Act: same username, fresh email
    let response = client
        .post(&format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": username,
            "email": "different@example.com",
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 409);

    // Act: fresh username, taken email
    let response = client
        .post(&format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": "somebody_else",
            "email": format!("{}@example.com", username),
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn login_issues_token_that_grants_access() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (username, _) = register_user(&client, &address).await;

    // Act: login
    let response = client
        .post(&format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "username": username,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Login failed");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let token = body["access_token"].as_str().expect("Token not found");

    // Act: use the token on a protected route
    let response = client
        .get(&format!("{}/api/exams/certifications", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn credential_failures_are_indistinguishable() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (username, _) = register_user(&client, &address).await;

    // Act: wrong password for an existing user
    let wrong_password = client
        .post(&format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "username": username,
            "password": "not-the-password"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Act: user that does not exist at all
    let missing_user = client
        .post(&format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "username": "no_such_user",
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert: same status, same body
    assert_eq!(wrong_password.status().as_u16(), 401);
    assert_eq!(missing_user.status().as_u16(), 401);
    let first: serde_json::Value = wrong_password.json().await.unwrap();
    let second: serde_json::Value = missing_user.json().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn protected_routes_reject_bad_tokens() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (_, token) = register_user(&client, &address).await;

    // Act: no Authorization header
    let missing = client
        .get(&format!("{}/api/exams/certifications", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Act: token with a flipped signature
    let tampered = client
        .get(&format!("{}/api/exams/certifications", address))
        .header("Authorization", format!("Bearer {}x", token))
        .send()
        .await
        .expect("Failed to execute request");

    // Act: not a JWT at all
    let garbage = client
        .get(&format!("{}/api/exams/certifications", address))
        .header("Authorization", "Bearer definitely.not.ajwt")
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(missing.status().as_u16(), 401);
    assert_eq!(tampered.status().as_u16(), 401);
    assert_eq!(garbage.status().as_u16(), 401);
}

#[tokio::test]
async fn deactivate_flow() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (username, token) = register_user(&client, &address).await;

    // 1. Deactivate the account
    let response = client
        .delete(&format!("{}/api/auth/deactivate", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Deactivate failed");
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("has been deactivated")
    );

    // 2. Logging in again is now a credential failure
    let response = client
        .post(&format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "username": username,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Login failed");
    assert_eq!(response.status().as_u16(), 401);

    // 3. Deactivating twice is an error, not a no-op. The token itself is
    //    still cryptographically valid; the account state is what refuses.
    let response = client
        .delete(&format!("{}/api/auth/deactivate", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Deactivate failed");
    assert_eq!(response.status().as_u16(), 401);
}
