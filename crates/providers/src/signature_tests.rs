use super::*;

#[test]
fn test_sign_sha256_produces_verifiable_header() {
    let body = br#"{"zen":"Keep it logically awesome."}"#;
    let signature = sign_sha256("s3cr3t", body);

    assert!(signature.starts_with("sha256="));
    assert_eq!(signature.len(), "sha256=".len() + 64);
    assert!(verify_sha256("s3cr3t", &signature, body).is_ok());
}

#[test]
fn test_verify_sha256_rejects_other_secret() {
    let body = b"payload";
    let signature = sign_sha256("other", body);

    assert_eq!(
        verify_sha256("s3cr3t", &signature, body),
        Err(InvalidReason::SignatureMismatch)
    );
}

#[test]
fn test_verify_sha256_rejects_tampered_body() {
    let signature = sign_sha256("s3cr3t", b"original");

    assert_eq!(
        verify_sha256("s3cr3t", &signature, b"tampered"),
        Err(InvalidReason::SignatureMismatch)
    );
}

#[test]
fn test_verify_sha256_rejects_malformed_headers() {
    let no_prefix = verify_sha256("s3cr3t", "abcdef", b"body");
    assert!(matches!(no_prefix, Err(InvalidReason::MalformedSignature { .. })));

    let sha1 = verify_sha256("s3cr3t", "sha1=abcdef", b"body");
    assert!(matches!(sha1, Err(InvalidReason::MalformedSignature { .. })));

    let not_hex = verify_sha256("s3cr3t", "sha256=zzzz", b"body");
    assert!(matches!(not_hex, Err(InvalidReason::MalformedSignature { .. })));
}

#[test]
fn test_verify_token_accepts_matching_value() {
    let secret = WebhookSecret::new("token-123");
    let request = WebhookRequest::new([("X-Gitlab-Token", "token-123")], "");

    assert!(verify_token(&secret, &request, "X-Gitlab-Token").is_ok());
}

#[test]
fn test_verify_token_rejects_missing_and_wrong_values() {
    let secret = WebhookSecret::new("token-123");

    let missing = WebhookRequest::new(Vec::<(String, String)>::new(), "");
    assert_eq!(
        verify_token(&secret, &missing, "X-Gitlab-Token"),
        Err(InvalidReason::MissingSignature {
            header: "X-Gitlab-Token"
        })
    );

    let wrong = WebhookRequest::new([("X-Gitlab-Token", "token-124")], "");
    assert_eq!(
        verify_token(&secret, &wrong, "X-Gitlab-Token"),
        Err(InvalidReason::SignatureMismatch)
    );

    let prefix = WebhookRequest::new([("X-Gitlab-Token", "token")], "");
    assert_eq!(
        verify_token(&secret, &prefix, "X-Gitlab-Token"),
        Err(InvalidReason::SignatureMismatch)
    );
}

#[test]
fn test_verify_token_is_skipped_without_secret() {
    let request = WebhookRequest::new(Vec::<(String, String)>::new(), "");

    assert!(verify_token(&WebhookSecret::default(), &request, "X-Hook-UUID").is_ok());
}

#[test]
fn test_constant_time_eq() {
    assert!(constant_time_eq(b"abc", b"abc"));
    assert!(!constant_time_eq(b"abc", b"abd"));
    assert!(!constant_time_eq(b"abc", b"ab"));
    assert!(!constant_time_eq(b"", b"a"));
}
