use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use toml::Value;

use trolley_core::config::{AppConfig, LoadOptions};

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    let fields: [(&str, String, &[&str]); 7] = [
        ("services.base_url", config.services.base_url.clone(), &["TROLLEY_SERVICES_BASE_URL"]),
        (
            "services.timeout_secs",
            config.services.timeout_secs.to_string(),
            &["TROLLEY_SERVICES_TIMEOUT_SECS"],
        ),
        ("store.database_url", config.store.database_url.clone(), &["TROLLEY_STORE_DATABASE_URL"]),
        (
            "store.max_connections",
            config.store.max_connections.to_string(),
            &["TROLLEY_STORE_MAX_CONNECTIONS"],
        ),
        (
            "store.timeout_secs",
            config.store.timeout_secs.to_string(),
            &["TROLLEY_STORE_TIMEOUT_SECS"],
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            &["TROLLEY_LOGGING_LEVEL", "TROLLEY_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format).to_ascii_lowercase(),
            &["TROLLEY_LOGGING_FORMAT", "TROLLEY_LOG_FORMAT"],
        ),
    ];

    for (key, value, env_vars) in fields {
        let source =
            field_source(key, env_vars, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(format!("{key} = {value}  [{source}]"));
    }

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("trolley.toml"), PathBuf::from("config/trolley.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key: &str,
    env_vars: &[&str],
    file_doc: Option<&Value>,
    file_path: Option<&Path>,
) -> String {
    if env_vars.iter().any(|var| env::var(var).map(|v| !v.trim().is_empty()).unwrap_or(false)) {
        return "env".to_string();
    }

    if let (Some(doc), Some(path)) = (file_doc, file_path) {
        if file_contains_key(doc, key) {
            return format!("file:{}", path.display());
        }
    }

    "default".to_string()
}

fn file_contains_key(doc: &Value, dotted_key: &str) -> bool {
    let mut current = doc;
    for part in dotted_key.split('.') {
        match current.get(part) {
            Some(next) => current = next,
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::file_contains_key;

    #[test]
    fn finds_nested_keys_in_a_config_doc() {
        let doc: Value = r#"
[services]
base_url = "http://file:3333"
"#
        .parse()
        .expect("parse toml");

        assert!(file_contains_key(&doc, "services.base_url"));
        assert!(!file_contains_key(&doc, "services.timeout_secs"));
        assert!(!file_contains_key(&doc, "logging.level"));
    }
}
