// Authorization and error-envelope behavior that needs no database: every
// rejection here happens before any query could run.
mod common;

use anyhow::Result;
use serde_json::json;

#[tokio::test]
async fn root_descriptor_is_public() -> Result<()> {
    let res = common::send(common::request("GET", "/", None, None)).await;
    assert_eq!(res.status().as_u16(), 200);

    let body = common::json_body(res).await;
    assert_eq!(body["success"], json!(true));
    Ok(())
}

#[tokio::test]
async fn detail_without_token_is_unauthorized() -> Result<()> {
    let res = common::send(common::request("GET", "/drinks-detail", None, None)).await;
    common::assert_error_envelope(res, 401).await;
    Ok(())
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() -> Result<()> {
    let req = axum::http::Request::builder()
        .method("GET")
        .uri("/drinks-detail")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())?;
    let res = common::send(req).await;
    common::assert_error_envelope(res, 401).await;
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_unauthorized() -> Result<()> {
    let res = common::send(common::request(
        "GET",
        "/drinks-detail",
        Some("not.a.token"),
        None,
    ))
    .await;
    common::assert_error_envelope(res, 401).await;
    Ok(())
}

#[tokio::test]
async fn token_signed_with_wrong_secret_is_unauthorized() -> Result<()> {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = common::base_claims(Some(vec!["get:drinks-detail".to_string()]));
    let forged = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"not-the-configured-secret"),
    )?;

    let res = common::send(common::request("GET", "/drinks-detail", Some(&forged), None)).await;
    common::assert_error_envelope(res, 401).await;
    Ok(())
}

#[tokio::test]
async fn expired_token_is_unauthorized() -> Result<()> {
    let mut claims = common::base_claims(Some(vec!["get:drinks-detail".to_string()]));
    claims.exp = common::now_epoch() - 7200;
    let token = common::sign(&claims);

    let res = common::send(common::request("GET", "/drinks-detail", Some(&token), None)).await;
    common::assert_error_envelope(res, 401).await;
    Ok(())
}

#[tokio::test]
async fn token_for_another_audience_is_unauthorized() -> Result<()> {
    let mut claims = common::base_claims(Some(vec!["get:drinks-detail".to_string()]));
    claims.aud = "someone-else".to_string();
    let token = common::sign(&claims);

    let res = common::send(common::request("GET", "/drinks-detail", Some(&token), None)).await;
    common::assert_error_envelope(res, 401).await;
    Ok(())
}

#[tokio::test]
async fn token_without_permissions_claim_is_bad_request() -> Result<()> {
    let token = common::sign(&common::base_claims(None));

    let res = common::send(common::request("GET", "/drinks-detail", Some(&token), None)).await;
    common::assert_error_envelope(res, 400).await;
    Ok(())
}

#[tokio::test]
async fn read_permission_cannot_write() -> Result<()> {
    let token = common::token(&["get:drinks-detail"]);
    let body = json!({ "title": "Flat White", "recipe": [{ "name": "milk", "color": "white", "parts": 1 }] });

    let res = common::send(common::request("POST", "/drinks", Some(&token), Some(body))).await;
    common::assert_error_envelope(res, 403).await;
    Ok(())
}

#[tokio::test]
async fn write_permissions_are_route_specific() -> Result<()> {
    // delete:drinks does not grant patch:drinks
    let token = common::token(&["delete:drinks"]);
    let res = common::send(common::request(
        "PATCH",
        "/drinks/1",
        Some(&token),
        Some(json!({ "title": "Renamed" })),
    ))
    .await;
    common::assert_error_envelope(res, 403).await;
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_enveloped_404() -> Result<()> {
    let res = common::send(common::request("GET", "/espressos", None, None)).await;
    let body = common::assert_error_envelope(res, 404).await;
    assert_eq!(body["message"], json!("resource not found"));
    Ok(())
}

#[tokio::test]
async fn wrong_method_is_enveloped_405() -> Result<()> {
    let res = common::send(common::request("PUT", "/drinks", None, None)).await;
    let body = common::assert_error_envelope(res, 405).await;
    assert_eq!(body["message"], json!("method not allowed"));
    Ok(())
}

#[tokio::test]
async fn post_without_title_is_unprocessable() -> Result<()> {
    let token = common::token(&["post:drinks"]);
    let body = json!({ "recipe": [{ "name": "espresso", "color": "brown", "parts": 1 }] });

    let res = common::send(common::request("POST", "/drinks", Some(&token), Some(body))).await;
    common::assert_error_envelope(res, 422).await;
    Ok(())
}

#[tokio::test]
async fn post_with_malformed_json_is_enveloped() -> Result<()> {
    let token = common::token(&["post:drinks"]);
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/drinks")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))?;

    let res = common::send(req).await;
    let status = res.status().as_u16();
    assert!(status == 400 || status == 422, "unexpected status {}", status);
    let body = common::json_body(res).await;
    assert_eq!(body["success"], json!(false));
    Ok(())
}

#[tokio::test]
async fn patch_nonnumeric_id_is_not_found() -> Result<()> {
    let token = common::token(&["patch:drinks"]);
    let res = common::send(common::request(
        "PATCH",
        "/drinks/latte",
        Some(&token),
        Some(json!({})),
    ))
    .await;
    common::assert_error_envelope(res, 404).await;
    Ok(())
}

#[tokio::test]
async fn delete_nonnumeric_id_is_not_found() -> Result<()> {
    let token = common::token(&["delete:drinks"]);
    let res = common::send(common::request("DELETE", "/drinks/latte", Some(&token), None)).await;
    common::assert_error_envelope(res, 404).await;
    Ok(())
}
