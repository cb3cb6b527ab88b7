use super::*;
use crate::signature::sign_sha256;

const SECRET: &str = "s3cr3t";

const PUSH_BODY: &str = r#"{
    "ref": "refs/heads/main",
    "before": "6113728f27ae82c7b1a177c8d03f9e96e0adf246",
    "after": "0000000000000000000000000000000000000001",
    "repository": { "id": 1296269, "full_name": "octocat/Hello-World" },
    "pusher": { "name": "octocat", "email": "octocat@github.com" },
    "head_commit": { "id": "0d1a26e67d8f5eaf1f6ba5c57fc3c7d91ac0fd1c", "message": "Update README" }
}"#;

fn signed_request(event: &str, body: &str) -> WebhookRequest {
    WebhookRequest::new(
        [
            ("X-GitHub-Event".to_string(), event.to_string()),
            (
                "X-GitHub-Delivery".to_string(),
                "72d3162e-cc78-11e3-81ab-4c9367dc0958".to_string(),
            ),
            (
                "X-Hub-Signature-256".to_string(),
                sign_sha256(SECRET, body.as_bytes()),
            ),
        ],
        body.as_bytes().to_vec(),
    )
}

fn decoder() -> GithubDecoder {
    GithubDecoder::new(WebhookSecret::new(SECRET))
}

#[test]
fn test_signed_push_is_decoded() {
    let event = decoder().decode(&signed_request("push", PUSH_BODY));

    let WebhookEvent::Push(push) = event else {
        panic!("expected push event");
    };
    assert_eq!(push.provider, ProviderKind::Github);
    assert_eq!(push.git_ref.as_deref(), Some("refs/heads/main"));
    assert_eq!(push.repository.as_deref(), Some("octocat/Hello-World"));
    assert_eq!(push.pusher.as_deref(), Some("octocat"));
    assert_eq!(
        push.head_commit.as_deref(),
        Some("0d1a26e67d8f5eaf1f6ba5c57fc3c7d91ac0fd1c")
    );
    assert_eq!(
        push.delivery.as_ref().map(|d| d.as_str()),
        Some("72d3162e-cc78-11e3-81ab-4c9367dc0958")
    );
}

#[test]
fn test_head_commit_falls_back_to_after_for_branch_deletion() {
    let body = r#"{"ref":"refs/heads/old","after":"abc123","head_commit":null}"#;

    let WebhookEvent::Push(push) = decoder().decode(&signed_request("push", body)) else {
        panic!("expected push event");
    };
    assert_eq!(push.head_commit.as_deref(), Some("abc123"));
    assert!(push.repository.is_none());
}

#[test]
fn test_pull_request_with_valid_signature_is_other() {
    let body = r#"{"action":"opened","number":1}"#;
    let event = decoder().decode(&signed_request("pull_request", body));

    assert_eq!(
        event,
        WebhookEvent::Other(trigger::EventKind::new("pull_request").unwrap())
    );
}

#[test]
fn test_wrong_signature_is_invalid() {
    let request = WebhookRequest::new(
        [
            ("X-GitHub-Event", "push".to_string()),
            ("X-Hub-Signature-256", sign_sha256("not-the-secret", PUSH_BODY.as_bytes())),
        ],
        PUSH_BODY.as_bytes().to_vec(),
    );

    assert_eq!(
        decoder().decode(&request),
        WebhookEvent::Invalid(InvalidReason::SignatureMismatch)
    );
}

#[test]
fn test_missing_signature_is_invalid() {
    let request = WebhookRequest::new([("X-GitHub-Event", "push")], PUSH_BODY.as_bytes().to_vec());

    assert_eq!(
        decoder().decode(&request),
        WebhookEvent::Invalid(InvalidReason::MissingSignature {
            header: GithubDecoder::SIGNATURE_HEADER
        })
    );
}

#[test]
fn test_forged_pull_request_is_invalid_not_other() {
    let request = WebhookRequest::new(
        [
            ("X-GitHub-Event", "pull_request"),
            ("X-Hub-Signature-256", "sha256=00"),
        ],
        "{}",
    );

    assert_eq!(
        decoder().decode(&request),
        WebhookEvent::Invalid(InvalidReason::SignatureMismatch)
    );
}

#[test]
fn test_missing_event_header_is_invalid() {
    let request = WebhookRequest::new(
        [("X-Hub-Signature-256", sign_sha256(SECRET, PUSH_BODY.as_bytes()))],
        PUSH_BODY.as_bytes().to_vec(),
    );

    assert_eq!(
        decoder().decode(&request),
        WebhookEvent::Invalid(InvalidReason::MissingEventHeader {
            header: GithubDecoder::EVENT_HEADER
        })
    );
}

#[test]
fn test_signed_push_with_malformed_body_is_invalid() {
    let body = r#"{"repository":{"full_name":"octocat/Hello-World"}}"#;
    let event = decoder().decode(&signed_request("push", body));

    assert!(matches!(
        event,
        WebhookEvent::Invalid(InvalidReason::MalformedPayload { .. })
    ));
}

#[test]
fn test_empty_secret_skips_signature_check() {
    let decoder = GithubDecoder::new(WebhookSecret::default());
    let request = WebhookRequest::new([("X-GitHub-Event", "push")], PUSH_BODY.as_bytes().to_vec());

    assert!(decoder.decode(&request).is_push());
}

#[test]
fn test_delivery_is_read_without_validating_the_request() {
    let forged = WebhookRequest::new(
        [
            ("X-GitHub-Event", "push"),
            ("X-GitHub-Delivery", "72d3162e-cc78-11e3-81ab-4c9367dc0958"),
            ("X-Hub-Signature-256", "sha256=00"),
        ],
        PUSH_BODY.as_bytes().to_vec(),
    );

    assert_eq!(
        decoder().delivery(&forged).map(|d| d.as_str().to_string()),
        Some("72d3162e-cc78-11e3-81ab-4c9367dc0958".to_string())
    );
    assert!(decoder()
        .delivery(&WebhookRequest::new([("X-GitHub-Event", "push")], Vec::new()))
        .is_none());
}
