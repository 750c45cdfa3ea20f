use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_demo_bot() {
    let config = WidgetConfig::default();
    assert_eq!(config.bot_id, 8_016_901_412);
    assert_eq!(config.bot_name, "betsson_test_bot");
    assert_eq!(config.corner_radius, 20);
    assert_eq!(config.request_access, None);
    assert_eq!(config.button_size, ButtonSize::Large);
    assert!(config.use_pic);
}

#[test]
fn from_lookup_with_nothing_set_is_default() {
    assert_eq!(WidgetConfig::from_lookup(|_| None), WidgetConfig::default());
}

#[test]
fn from_lookup_reads_every_field() {
    let config = WidgetConfig::from_lookup(lookup_from(&[
        ("TELEGRAM_BOT_ID", "123"),
        ("TELEGRAM_BOT_NAME", " my_bot "),
        ("TELEGRAM_CORNER_RADIUS", "4"),
        ("TELEGRAM_REQUEST_WRITE", "yes"),
        ("TELEGRAM_BUTTON_SIZE", "Small"),
        ("TELEGRAM_USE_PIC", "off"),
    ]));
    assert_eq!(config.bot_id, 123);
    assert_eq!(config.bot_name, "my_bot");
    assert_eq!(config.corner_radius, 4);
    assert_eq!(config.request_access, Some(RequestAccess::Write));
    assert_eq!(config.button_size, ButtonSize::Small);
    assert!(!config.use_pic);
}

#[test]
fn from_lookup_ignores_unparsable_values() {
    let config = WidgetConfig::from_lookup(lookup_from(&[
        ("TELEGRAM_BOT_ID", "abc"),
        ("TELEGRAM_BOT_NAME", "   "),
        ("TELEGRAM_CORNER_RADIUS", "-1"),
        ("TELEGRAM_REQUEST_WRITE", "maybe"),
        ("TELEGRAM_BUTTON_SIZE", "huge"),
        ("TELEGRAM_USE_PIC", "perhaps"),
    ]));
    assert_eq!(config, WidgetConfig::default());
}

#[test]
fn auth_options_without_write_access() {
    let options = WidgetConfig::default().auth_options();
    assert_eq!(
        options,
        serde_json::json!({
            "bot_id": 8_016_901_412_i64,
            "bot_name": "betsson_test_bot",
            "request_access": false,
            "button_size": "large",
            "radius": 20,
            "usePic": true,
        })
    );
}

#[test]
fn auth_options_with_write_access() {
    let config = WidgetConfig { request_access: Some(RequestAccess::Write), ..WidgetConfig::default() };
    assert_eq!(config.auth_options()["request_access"], "write");
}

#[test]
fn button_size_parse_round_trips() {
    for size in [ButtonSize::Large, ButtonSize::Medium, ButtonSize::Small] {
        assert_eq!(ButtonSize::parse(size.as_str()), Some(size));
    }
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn from_page_is_default_outside_browser() {
    assert_eq!(WidgetConfig::from_page(), WidgetConfig::default());
}

#[test]
fn meta_tags_carry_every_setting_to_the_page() {
    let config = WidgetConfig {
        bot_id: 42,
        bot_name: "other_bot".to_owned(),
        corner_radius: 6,
        request_access: Some(RequestAccess::Write),
        button_size: ButtonSize::Medium,
        use_pic: false,
    };
    let tags = config.meta_tags();
    assert_eq!(tags.len(), META_KEYS.len());
    assert!(tags.contains(&("telegram-corner-radius", "6".to_owned())));
    assert!(tags.contains(&("telegram-request-write", "true".to_owned())));

    let read_back = WidgetConfig::from_meta(|name| {
        tags.iter().find(|(tag, _)| *tag == name).map(|(_, content)| content.clone())
    });
    assert_eq!(read_back, config);
}

#[test]
fn from_meta_reads_tag_names_not_env_keys() {
    let config = WidgetConfig::from_meta(lookup_from(&[
        ("TELEGRAM_CORNER_RADIUS", "1"),
        ("telegram-button-size", "small"),
    ]));
    assert_eq!(config.corner_radius, DEFAULT_CORNER_RADIUS);
    assert_eq!(config.button_size, ButtonSize::Small);
}
