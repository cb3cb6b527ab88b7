use super::*;
use crate::ExecutionUser;

fn config() -> TriggerConfig {
    TriggerConfig {
        address: "127.0.0.1:8080".to_string(),
        route_path: TriggerConfig::DEFAULT_ROUTE_PATH.to_string(),
        secret: WebhookSecret::new("s3cr3t"),
        service: "github".to_string(),
        playbook: PlaybookSpec::new("./main.yaml", "./hosts", ExecutionUser::new("root").unwrap()),
        tool: PathBuf::from("/usr/bin/ansible-playbook"),
        run_timeout: None,
        log_sink: LogSink::Stdout,
    }
}

#[test]
fn test_default_config_is_valid() {
    assert!(config().validate().is_ok());
}

#[test]
fn test_route_path_must_be_absolute() {
    let mut cfg = config();
    cfg.route_path = "webhooks".to_string();

    let err = cfg.validate().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidRoutePath { ref path, .. } if path == "webhooks"));
}

#[test]
fn test_route_path_with_router_syntax_is_rejected() {
    for path in ["/:hook", "/*rest", "/hooks/{id}", "/hooks/{*rest}", "/hooks/}", "/a/:b/c"] {
        let mut cfg = config();
        cfg.route_path = path.to_string();

        let err = cfg.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidRoutePath { path: ref p, .. } if p == path),
            "{path} was accepted"
        );
    }
}

#[test]
fn test_literal_nested_route_path_is_accepted() {
    let mut cfg = config();
    cfg.route_path = "/hooks/deploy-site.v2".to_string();

    assert!(cfg.validate().is_ok());
}

#[test]
fn test_empty_paths_are_rejected() {
    let mut cfg = config();
    cfg.playbook = PlaybookSpec::new("", "./hosts", ExecutionUser::new("root").unwrap());
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::Empty { setting: "playbook path" })
    ));

    let mut cfg = config();
    cfg.playbook = PlaybookSpec::new("./main.yaml", "", ExecutionUser::new("root").unwrap());
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::Empty { setting: "inventory path" })
    ));

    let mut cfg = config();
    cfg.address = "  ".to_string();
    assert!(matches!(cfg.validate(), Err(ConfigError::Empty { setting: "address" })));
}

#[test]
fn test_bare_port_listens_on_all_interfaces() {
    let mut cfg = config();
    cfg.address = ":8080".to_string();
    assert_eq!(cfg.listen_address(), "0.0.0.0:8080");

    cfg.address = "127.0.0.1:9000".to_string();
    assert_eq!(cfg.listen_address(), "127.0.0.1:9000");
}

#[test]
fn test_secret_is_redacted_in_debug_output() {
    let cfg = config();
    let debug = format!("{cfg:?}");

    assert!(!debug.contains("s3cr3t"));
    assert!(debug.contains("<redacted>"));
    assert_eq!(format!("{:?}", WebhookSecret::default()), "WebhookSecret(<empty>)");
}
