/// Integration tests for the token lifecycle
///
/// This test module covers:
/// - Issue / decode round trips for both roles
/// - Expiry, tampering and role mismatch
/// - Revocation idempotence under concurrency
/// - Fail-closed behaviour when the blacklist is unavailable
use async_trait::async_trait;
use auth_tokens::{
    InMemoryRevocationStore, RevocationStore, TokenClassifier, TokenCodec, TokenError,
    TokenResult, TokenSettings, TokenType, TokenValidator,
};
use mockall::mock;
use serde_json::{json, Value};
use std::sync::Arc;

// Test secret - FOR TESTING ONLY
const TEST_SECRET: &[u8] = b"y9K$mP2vRx#TnZ@s4Yw!cGf7Dh&e3Xa6Wq8Lj5BtNu1Zp0MkYhVgCxFbAsSdQwEr";

mock! {
    pub FailingStore {}

    #[async_trait]
    impl RevocationStore for FailingStore {
        async fn contains(&self, token: &str) -> TokenResult<bool>;
        async fn revoke(&self, token: &str) -> TokenResult<()>;
    }
}

fn classifier() -> Arc<TokenClassifier> {
    Arc::new(TokenClassifier::new(
        TokenCodec::new(TEST_SECRET),
        TokenSettings {
            access_ttl_minutes: 15,
            refresh_ttl_minutes: 60 * 24 * 7,
        },
    ))
}

fn sample_claims() -> Vec<Value> {
    vec![
        json!({"user_id": 7}),
        json!({"id": 42, "username": "alice"}),
        json!({"nested": {"roles": ["admin", "ops"], "flags": [true, false]}, "n": null}),
        json!({}),
    ]
}

fn flip_char(c: char) -> char {
    if c == 'A' {
        'B'
    } else {
        'A'
    }
}

// ============================================================================
// Codec / Classifier
// ============================================================================

#[test]
fn test_round_trip_for_every_role() {
    let classifier = classifier();

    for claims in sample_claims() {
        for token_type in [TokenType::Access, TokenType::Refresh] {
            let token = classifier.issue(&claims, token_type, 5).unwrap();
            let decoded = classifier.decode_as(&token, token_type).unwrap();
            assert_eq!(decoded.data, claims, "claims must survive unchanged");
        }
    }
}

#[test]
fn test_type_discrimination() {
    let classifier = classifier();

    for claims in sample_claims() {
        let access = classifier.issue_access(&claims).unwrap();
        let refresh = classifier.issue_refresh(&claims).unwrap();

        assert!(matches!(
            classifier.decode_as(&access, TokenType::Refresh),
            Err(TokenError::WrongType { .. })
        ));
        assert!(matches!(
            classifier.decode_as(&refresh, TokenType::Access),
            Err(TokenError::WrongType { .. })
        ));
    }
}

#[test]
fn test_wire_payload_layout() {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    let classifier = classifier();
    let token = classifier.issue_refresh(&json!({"user_id": 7})).unwrap();

    let segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments.len(), 3, "JWT should have 3 parts separated by dots");

    let payload: Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[1]).unwrap()).unwrap();
    assert_eq!(payload["data"], json!({"user_id": 7}));
    assert_eq!(payload["token_type"], json!("refresh"));
    assert!(payload["exp"].is_i64());
}

#[test]
fn test_key_change_invalidates_tokens() {
    let token = classifier().issue_access(&json!({"user_id": 7})).unwrap();

    let rotated = TokenClassifier::new(
        TokenCodec::new(b"J8Kq2mPvRx4TnZs9YwLcGf7DhBe3Xa6W"),
        TokenSettings::default(),
    );
    assert_eq!(
        rotated.decode_as(&token, TokenType::Access),
        Err(TokenError::Malformed)
    );
}

// ============================================================================
// Validator
// ============================================================================

#[tokio::test]
async fn test_expiry_boundary() {
    let classifier = classifier();
    let validator = TokenValidator::new(classifier.clone(), Arc::new(InMemoryRevocationStore::new()));

    for ttl in [0, -1, -60 * 24] {
        let token = classifier.issue(&json!({"user_id": 7}), TokenType::Access, ttl).unwrap();
        assert_eq!(
            validator.validate(&token, TokenType::Access).await,
            Err(TokenError::Expired)
        );
        assert!(validator.is_well_formed(&token));
    }
}

#[tokio::test]
async fn test_tamper_detection_on_every_signature_position() {
    let classifier = classifier();
    let validator = TokenValidator::new(classifier.clone(), Arc::new(InMemoryRevocationStore::new()));
    let token = classifier.issue_access(&json!({"user_id": 7})).unwrap();
    let (head, signature) = token.rsplit_once('.').unwrap();

    for position in 0..signature.len() {
        let mut chars: Vec<char> = signature.chars().collect();
        chars[position] = flip_char(chars[position]);
        let tampered = format!("{}.{}", head, chars.into_iter().collect::<String>());

        assert_eq!(
            classifier.codec().decode(&tampered),
            Err(TokenError::Malformed),
            "position {}",
            position
        );
        assert!(!validator.is_well_formed(&tampered), "position {}", position);
        assert_eq!(
            validator.validate(&tampered, TokenType::Access).await,
            Err(TokenError::Malformed)
        );
    }
}

#[tokio::test]
async fn test_post_revocation_validation() {
    let classifier = classifier();
    let validator = TokenValidator::new(classifier.clone(), Arc::new(InMemoryRevocationStore::new()));
    let token = classifier.issue_access(&json!({"user_id": 7})).unwrap();

    assert!(validator.validate(&token, TokenType::Access).await.is_ok());

    validator.revoke(&token).await.unwrap();

    assert_eq!(
        validator.validate(&token, TokenType::Access).await,
        Err(TokenError::Revoked)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_revocation_is_idempotent() {
    let classifier = classifier();
    let store = Arc::new(InMemoryRevocationStore::new());
    let validator = TokenValidator::new(classifier.clone(), store.clone());
    let token = classifier.issue_refresh(&json!({"user_id": 7})).unwrap();

    let first = {
        let (validator, token) = (validator.clone(), token.clone());
        tokio::spawn(async move { validator.revoke(&token).await })
    };
    let second = {
        let (validator, token) = (validator.clone(), token.clone());
        tokio::spawn(async move { validator.revoke(&token).await })
    };

    assert!(first.await.unwrap().is_ok());
    assert!(second.await.unwrap().is_ok());
    assert_eq!(store.len(), 1);
    assert!(store.contains(&token).await.unwrap());
}

#[tokio::test]
async fn test_fail_closed_under_storage_fault() {
    let mut store = MockFailingStore::new();
    store
        .expect_contains()
        .returning(|_| Err(TokenError::StorageUnavailable("timed out".into())));

    let classifier = classifier();
    let validator = TokenValidator::new(classifier.clone(), Arc::new(store));

    for claims in sample_claims() {
        for token_type in [TokenType::Access, TokenType::Refresh] {
            let token = classifier.issue(&claims, token_type, 5).unwrap();
            let result = validator.validate(&token, token_type).await;

            assert!(result.is_err(), "a store fault must never validate a token");
            assert!(!result.unwrap_err().is_credential_failure());
        }
    }
}
