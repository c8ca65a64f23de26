//! Shared fixtures for integration tests

#![allow(dead_code)]

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rsa::{RsaPrivateKey, RsaPublicKey, pkcs1::DecodeRsaPrivateKey};
use serde_json::{Value, json};
use std::sync::{Arc, OnceLock};
use tokenmint::{PrivateKeyMaterial, Token};

pub const PKCS1_PEM: &str = include_str!("../fixtures/rsa2048_pkcs1.pem");
pub const PKCS8_PEM: &str = include_str!("../fixtures/rsa2048_pkcs8.pem");
pub const WEAK_PKCS1_PEM: &str = include_str!("../fixtures/rsa512_pkcs1.pem");

pub fn private_key() -> Arc<RsaPrivateKey> {
    static KEY: OnceLock<Arc<RsaPrivateKey>> = OnceLock::new();
    KEY.get_or_init(|| {
        Arc::new(RsaPrivateKey::from_pkcs1_pem(PKCS1_PEM).expect("fixture key should parse"))
    })
    .clone()
}

pub fn public_key() -> RsaPublicKey {
    RsaPublicKey::from(private_key().as_ref())
}

pub fn key_handle() -> PrivateKeyMaterial {
    PrivateKeyMaterial::Handle(private_key())
}

pub fn header(alg: &str) -> Value {
    json!({"alg": alg, "kid": "k1"})
}

pub fn payload() -> Value {
    json!({"sub": "u1"})
}

pub fn decode_segment(segment: &str) -> Vec<u8> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .expect("segment should be unpadded base64url")
}

pub fn signature_bytes(token: &Token) -> Vec<u8> {
    decode_segment(token.segments()[2])
}
