// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! POST /api/siws/verify

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use serde_json::{json, Value};
use siws_vault::api::{create_app, AppState, VerifyRequest};
use siws_vault::siws::{SignInAccount, SignInChallenge, SignInMessage, SignInResponse};
use std::sync::Arc;
use tower::ServiceExt;

fn sign(key: &SigningKey, challenge: &SignInChallenge) -> SignInResponse {
    let address = bs58::encode(key.verifying_key().as_bytes()).into_string();
    let message = SignInMessage::for_challenge(challenge, &address)
        .format()
        .into_bytes();
    SignInResponse {
        account: SignInAccount {
            address,
            public_key: key.verifying_key().as_bytes().to_vec(),
        },
        signature: key.sign(&message).to_bytes().to_vec(),
        signed_message: message,
        signature_type: None,
    }
}

async fn post_verify(state: Arc<AppState>, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/siws/verify")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = create_app(state).oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn signed_request(state: &AppState) -> VerifyRequest {
    let key = SigningKey::generate(&mut OsRng);
    let input = state.generator.generate();
    let output = sign(&key, &input);
    VerifyRequest { input, output }
}

#[tokio::test]
async fn test_valid_sign_in_verifies() {
    let state = Arc::new(AppState::new_for_test());
    let request = signed_request(&state);

    let (status, body) = post_verify(state, serde_json::to_vec(&request).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "verified": true }));
}

#[tokio::test]
async fn test_replayed_sign_in_is_rejected() {
    let state = Arc::new(AppState::new_for_test());
    let body = serde_json::to_vec(&signed_request(&state)).unwrap();

    let (_, first) = post_verify(state.clone(), body.clone()).await;
    assert_eq!(first["verified"], true);

    let (status, second) = post_verify(state.clone(), body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["verified"], false);
    assert_eq!(state.ledger.len().await, 1);
}

#[tokio::test]
async fn test_failed_verification_is_not_recorded() {
    let state = Arc::new(AppState::new_for_test());
    let mut request = signed_request(&state);
    request.output.signature[0] ^= 0x01;

    let (status, body) = post_verify(state.clone(), serde_json::to_vec(&request).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verified"], false);
    assert!(state.ledger.is_empty().await);
}

#[tokio::test]
async fn test_foreign_domain_is_not_verified() {
    let state = Arc::new(AppState::new_for_test());
    let key = SigningKey::generate(&mut OsRng);
    let mut input = state.generator.generate();
    input.domain = "evil.example.com".to_string();
    let output = sign(&key, &input);

    let body = serde_json::to_vec(&VerifyRequest { input, output }).unwrap();
    let (_, body) = post_verify(state, body).await;
    assert_eq!(body["verified"], false);
}

#[tokio::test]
async fn test_byte_out_of_range_is_bad_request() {
    let state = Arc::new(AppState::new_for_test());
    let mut body = serde_json::to_value(signed_request(&state)).unwrap();
    body["output"]["account"]["publicKey"][0] = json!(256);

    let (status, body) = post_verify(state, serde_json::to_vec(&body).unwrap()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let state = Arc::new(AppState::new_for_test());
    let mut body = serde_json::to_value(signed_request(&state)).unwrap();
    body.as_object_mut().unwrap().remove("output");

    let (status, _) = post_verify(state, serde_json::to_vec(&body).unwrap()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unparseable_body_is_bad_request() {
    let state = Arc::new(AppState::new_for_test());
    let (status, body) = post_verify(state, b"{not json".to_vec()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "body");
}

#[tokio::test]
async fn test_internal_error_response_shape() {
    use axum::response::IntoResponse;
    use siws_vault::api::{http_server::ApiErrorResponse, ApiError, ErrorResponse};

    let response =
        ApiErrorResponse(ApiError::InternalError("verification task failed".to_string()))
            .into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error_type, "internal_error");
    assert_eq!(error.message, "verification task failed");
    assert!(error.request_id.is_some());
}
