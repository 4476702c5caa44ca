/// Authentication service tests
/// Tests JWT generation, password hashing, token validation
mod common;

use common::{fixtures, TestApp};
use jsonwebtoken::{encode, EncodingKey, Header};
use purestream_core::{NewUser, UserId};
use purestream_server::services::auth::{AuthService, Claims};

const SECRET: &str = "test-secret-key";

fn create_test_auth_service() -> AuthService {
    AuthService::new(SECRET.to_string(), 7).with_bcrypt_cost(4)
}

/// Test password hashing produces valid bcrypt hashes
#[test]
fn test_password_hashing() {
    let auth_service = create_test_auth_service();

    let hash = auth_service.hash_password(fixtures::TEST_PASSWORD).unwrap();

    assert!(hash.starts_with("$2b$") || hash.starts_with("$2a$"));
    assert_eq!(hash.len(), 60);

    let hash2 = auth_service.hash_password(fixtures::TEST_PASSWORD).unwrap();
    assert_ne!(hash, hash2, "Hashes should differ due to random salt");
}

#[test]
fn test_password_verification() {
    let auth_service = create_test_auth_service();
    let hash = auth_service.hash_password(fixtures::TEST_PASSWORD).unwrap();

    assert!(auth_service
        .verify_password(fixtures::TEST_PASSWORD, &hash)
        .unwrap());
    assert!(!auth_service.verify_password("WrongPassword", &hash).unwrap());
}

/// An unparseable hash is an error, not a failed match
#[test]
fn test_password_verification_invalid_hash() {
    let auth_service = create_test_auth_service();

    let result = auth_service.verify_password("password", "not-a-valid-hash");
    assert!(result.is_err());
}

#[test]
fn test_token_round_trip() {
    let auth_service = create_test_auth_service();
    let user_id = UserId::new("user-123");

    let token = auth_service.create_token(&user_id).unwrap();

    assert_eq!(auth_service.verify_token(&token).unwrap(), user_id);
}

#[test]
fn test_token_validation_invalid_signature() {
    let issuer = AuthService::new("other-secret".to_string(), 7);
    let token = issuer.create_token(&UserId::new("user-123")).unwrap();

    assert!(create_test_auth_service().verify_token(&token).is_err());
}

#[test]
fn test_token_validation_malformed() {
    let auth_service = create_test_auth_service();

    assert!(auth_service.verify_token("").is_err());
    assert!(auth_service.verify_token("not.a.token").is_err());
}

#[test]
fn test_expired_token_is_rejected() {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: "user-123".to_string(),
        exp: now - 3600,
        iat: now - 7200,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    assert!(create_test_auth_service().verify_token(&token).is_err());
}

/// Test the full flow against stored credentials
#[tokio::test]
async fn test_complete_authentication_flow() {
    let app = TestApp::new().await;
    let auth_service = &app.auth_service;

    let password_hash = auth_service.hash_password(fixtures::TEST_PASSWORD).unwrap();
    let user = purestream_storage::users::create(
        &app.pool,
        NewUser {
            username: fixtures::TEST_USERNAME.to_string(),
            email: fixtures::TEST_EMAIL.to_string(),
            password_hash,
        },
    )
    .await
    .unwrap();

    let credentials = purestream_storage::users::get_credentials_by_email(&app.pool, fixtures::TEST_EMAIL)
        .await
        .unwrap()
        .expect("credentials stored");
    assert!(auth_service
        .verify_password(fixtures::TEST_PASSWORD, &credentials.password_hash)
        .unwrap());

    let token = auth_service.create_token(&credentials.user.id).unwrap();
    assert_eq!(auth_service.verify_token(&token).unwrap(), user.id);
}
