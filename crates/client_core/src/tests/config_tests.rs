use super::*;

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_when_file_is_missing() {
    let settings = load_settings_from(Path::new("/nonexistent/events.toml"), no_env);
    assert_eq!(settings, ClientSettings::default());
    assert_eq!(settings.geocoding_api_key, None);
}

#[test]
fn file_values_then_env_overrides() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("events_client_settings_{suffix}.toml"));
    fs::write(
        &path,
        "catalog_url = \"http://catalog.local:9000/\"\nrequest_timeout_secs = 4\ngeocoding_api_key = \"file-key\"\n",
    )
    .expect("write settings");

    let env_values = HashMap::from([
        ("GOOGLE_GEOCODING_API_KEY", "env-key".to_string()),
        ("IPINFO_TOKEN", "tok".to_string()),
    ]);
    let settings = load_settings_from(&path, |key| env_values.get(key).cloned());

    assert_eq!(settings.catalog_url, "http://catalog.local:9000");
    assert_eq!(settings.request_timeout_secs, 4);
    assert_eq!(settings.geocoding_api_key.as_deref(), Some("env-key"));
    assert_eq!(settings.ipinfo_token, "tok");

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn blank_geocoding_key_means_not_configured() {
    let settings = load_settings_from(Path::new("/nonexistent/events.toml"), |key| {
        (key == "GOOGLE_GEOCODING_API_KEY").then(|| "   ".to_string())
    });
    assert_eq!(settings.geocoding_api_key, None);
}

#[test]
fn unparseable_timeout_override_is_ignored() {
    let settings = load_settings_from(Path::new("/nonexistent/events.toml"), |key| {
        (key == "APP__REQUEST_TIMEOUT_SECS").then(|| "soon".to_string())
    });
    assert_eq!(settings.request_timeout_secs, 15);
}
