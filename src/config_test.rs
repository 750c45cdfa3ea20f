use super::*;

#[test]
fn defaults_when_nothing_is_set() {
    let config = ServerConfig::from_lookup(|_| None).expect("config");
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.widget, WidgetConfig::default());
}

#[test]
fn reads_port_and_widget_settings() {
    let config = ServerConfig::from_lookup(|key| match key {
        "PORT" => Some("8080".to_owned()),
        "TELEGRAM_BOT_NAME" => Some("prod_bot".to_owned()),
        _ => None,
    })
    .expect("config");
    assert_eq!(config.port, 8080);
    assert_eq!(config.widget.bot_name, "prod_bot");
}

#[test]
fn invalid_port_is_an_error() {
    let result = ServerConfig::from_lookup(|key| (key == "PORT").then(|| "not-a-port".to_owned()));
    assert_eq!(result, Err(ConfigError::InvalidPort("not-a-port".to_owned())));
}

#[test]
fn port_out_of_range_is_an_error() {
    let result = ServerConfig::from_lookup(|key| (key == "PORT").then(|| "70000".to_owned()));
    assert!(matches!(result, Err(ConfigError::InvalidPort(_))));
}
