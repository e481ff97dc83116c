use super::{
    parse_tag, parse_tag_list, ClientConfig, DEFAULT_HOST, DEFAULT_PORT, HOST_ENV_VAR,
    PORT_ENV_VAR, TAGS_ENV_VAR,
};
use anyhow::Error;
use std::env;

#[test]
fn test_defaults() {
    let config = ClientConfig::default();
    assert_eq!(config.host, DEFAULT_HOST);
    assert_eq!(config.port, DEFAULT_PORT);
    assert!(config.tags.is_empty());
    assert_eq!(config.addr(), "localhost:8092");
}

#[test]
fn test_from_json_partial() -> Result<(), Error> {
    let config = ClientConfig::from_json_str(r#"{"port": 9000, "tags": {"host": "host-001"}}"#)?;
    assert_eq!(
        config,
        ClientConfig::new(DEFAULT_HOST, 9000).with_tags([("host", "host-001")])
    );
    Ok(())
}

#[test]
fn test_from_json_rejects_unknown_keys() {
    assert!(ClientConfig::from_json_str(r#"{"hots": "example.com"}"#).is_err());
}

#[test]
fn test_from_path() -> Result<(), Error> {
    let path = env::temp_dir().join(format!("telegraf-client-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"host": "metrics.internal", "port": 8094}"#)?;
    let config = ClientConfig::from_path(&path);
    std::fs::remove_file(&path)?;

    assert_eq!(config?, ClientConfig::new("metrics.internal", 8094));
    Ok(())
}

#[test]
fn test_from_missing_path() {
    assert!(ClientConfig::from_path("/nonexistent/telegraf.json").is_err());
}

#[test]
fn test_parse_tag() -> Result<(), Error> {
    assert_eq!(
        parse_tag("host=server-01")?,
        ("host".to_string(), "server-01".to_string())
    );
    assert_eq!(
        parse_tag("query=a=b")?,
        ("query".to_string(), "a=b".to_string())
    );
    assert!(parse_tag("novalue").is_err());
    assert!(parse_tag("=value").is_err());
    Ok(())
}

#[test]
fn test_parse_tag_list() -> Result<(), Error> {
    let tags = parse_tag_list("host=server-01, region=us-west,")?;
    assert_eq!(tags.len(), 2);
    assert_eq!(tags.get("region").map(String::as_str), Some("us-west"));
    assert!(parse_tag_list("").map(|tags| tags.is_empty())?);
    assert!(parse_tag_list("host").is_err());
    Ok(())
}

#[test]
fn test_merge_env() -> Result<(), Error> {
    // The only test touching these variables, so it does not race others.
    env::set_var(HOST_ENV_VAR, "collector.internal");
    env::set_var(PORT_ENV_VAR, "8125");
    env::set_var(TAGS_ENV_VAR, "host=host-001,region=us-west");

    let config = ClientConfig::default()
        .with_tags([("region", "eu-north"), ("team", "core")])
        .merge_env();

    env::set_var(PORT_ENV_VAR, "not-a-port");
    let bad_port = ClientConfig::from_env();

    env::remove_var(HOST_ENV_VAR);
    env::remove_var(PORT_ENV_VAR);
    env::remove_var(TAGS_ENV_VAR);

    let config = config?;
    assert_eq!(config.host, "collector.internal");
    assert_eq!(config.port, 8125);
    assert_eq!(config.tags.get("host").map(String::as_str), Some("host-001"));
    assert_eq!(config.tags.get("region").map(String::as_str), Some("us-west"));
    assert_eq!(config.tags.get("team").map(String::as_str), Some("core"));
    assert!(bad_port.is_err());
    Ok(())
}
