//! Builder, batch stream, concurrency and config loading

mod common;

use common::*;
use futures::StreamExt;
use serde_json::json;
use tokenmint::{Algorithm, ConfigError, MintConfig, TokenError, TokenMint};
use tokio::task::JoinSet;

fn rs256_builder() -> tokenmint::TokenBuilder {
    TokenMint::builder()
        .with_algorithm(Algorithm::Rs256)
        .with_key_id("k1")
        .with_signing_key_id("keyA")
        .with_private_key(private_key())
}

#[tokio::test]
async fn builder_matches_synchronous_assembler() {
    let token = rs256_builder()
        .sign(payload())
        .await
        .expect("builder should mint");

    let expected =
        tokenmint::generate_token(&header("RS256"), &payload(), "", Some(&key_handle()))
            .expect("assembler should mint");
    assert_eq!(token, expected);
    assert_eq!(rs256_builder().sign_blocking(&payload()), Ok(expected));
}

#[tokio::test]
async fn builder_surfaces_validation_errors() {
    let err = TokenMint::builder()
        .with_algorithm(Algorithm::Ps256)
        .sign(payload())
        .await
        .unwrap_err();
    assert_eq!(err, TokenError::MissingKeyId);

    let err = rs256_builder().sign(json!([1, 2, 3])).await.unwrap_err();
    assert_eq!(err, TokenError::InvalidPayloadType("array".to_string()));
}

#[tokio::test]
async fn on_result_handler_receives_outcome() {
    let segments = rs256_builder()
        .on_result(|result| match result {
            Ok(token) => token.segments().len(),
            Err(_) => 0,
        })
        .sign(payload())
        .await;
    assert_eq!(segments, 3);
}

#[tokio::test]
async fn on_error_handler_maps_failures() {
    let err = TokenMint::builder()
        .with_header_field("alg", "HS256")
        .with_key_id("k1")
        .on_error(|e| TokenError::signing(format!("wrapped: {e}")))
        .sign(payload())
        .await
        .unwrap_err();

    match err {
        TokenError::SigningFailure(msg) => {
            assert!(msg.starts_with("wrapped: Invalid algorithm HS256"));
        }
        other => panic!("expected mapped error, got {other:?}"),
    }
}

#[tokio::test]
async fn batch_stream_is_ordered_and_survives_bad_items() {
    let payloads = vec![
        json!({"sub": "u1"}),
        json!("not an object"),
        json!({"sub": "u3"}),
    ];

    let results: Vec<_> = rs256_builder()
        .with_batch_buffer(1)
        .sign_batch(payloads)
        .collect()
        .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert_eq!(
        results[1],
        Err(TokenError::InvalidPayloadType("string".to_string()))
    );
    let third = results[2].as_ref().expect("third payload should mint");
    assert_eq!(decode_segment(third.segments()[1]), br#"{"sub":"u3"}"#);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_calls_share_one_key_handle() {
    let builder = rs256_builder();
    let mut tasks = JoinSet::new();

    for i in 0..32 {
        let builder = builder.clone();
        tasks.spawn(async move { builder.sign(json!({"sub": format!("u{i}")})).await });
    }

    let mut minted = 0;
    while let Some(joined) = tasks.join_next().await {
        let token = joined.expect("task should not panic").expect("token should mint");
        assert_eq!(token.segments().len(), 3);
        minted += 1;
    }
    assert_eq!(minted, 32);
}

#[tokio::test]
async fn config_file_drives_the_builder() {
    let dir = std::env::temp_dir().join(format!("tokenmint-{}", uuid::Uuid::new_v4()));
    tokio::fs::create_dir_all(&dir).await.expect("temp dir");
    let key_path = dir.join("key.pem");
    tokio::fs::write(&key_path, PKCS8_PEM).await.expect("write key");

    let config_path = dir.join("mint.json");
    let config = json!({
        "algorithm": "PS256",
        "key_id": "k1",
        "signing_key_id": "keyA",
        "private_key_path": key_path,
        "headers": {"cty": "load-test"}
    });
    tokio::fs::write(&config_path, config.to_string())
        .await
        .expect("write config");

    let config = MintConfig::load(&config_path).await.expect("config loads");
    assert_eq!(config.batch_buffer, 32);

    let builder = config.builder().await.expect("builder from config");
    let keys: Vec<&str> = builder.header().keys().map(String::as_str).collect();
    assert_eq!(keys, ["cty", "alg", "kid"]);

    let token = builder.sign(payload()).await.expect("config builder mints");
    assert_eq!(
        decode_segment(token.segments()[0]),
        br#"{"cty":"load-test","alg":"PS256","kid":"k1","typ":"JWT"}"#
    );

    tokio::fs::remove_dir_all(&dir).await.expect("cleanup");
}

#[tokio::test]
async fn config_errors_are_reported() {
    assert!(MintConfig::from_json(r#"{"algorithm": "RS256"}"#).is_err());

    let config =
        MintConfig::from_json(r#"{"key_id": "k1", "private_key_path": "/nonexistent/key.pem"}"#)
            .expect("config parses");
    assert_eq!(config.algorithm, "RS256");
    assert!(matches!(
        config.builder().await,
        Err(ConfigError::Io { .. })
    ));
}
