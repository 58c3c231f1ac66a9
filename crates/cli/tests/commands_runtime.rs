use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use trolley_cli::commands::{cart, migrate, ops};

#[test]
fn migrate_returns_success_with_valid_env() {
    with_env(&[("TROLLEY_STORE_DATABASE_URL", "sqlite::memory:")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_returns_config_failure_on_bad_database_url() {
    with_env(&[("TROLLEY_STORE_DATABASE_URL", "postgres://nope")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn cart_renders_empty_on_a_fresh_store() {
    with_env(
        &[
            ("TROLLEY_STORE_DATABASE_URL", "sqlite::memory:"),
            ("TROLLEY_STORE_MAX_CONNECTIONS", "1"),
        ],
        || {
            let result = cart::run();
            assert_eq!(result.exit_code, 0, "expected cart render to succeed");
            assert_eq!(result.output, "cart is empty");
        },
    );
}

#[test]
fn remove_of_absent_product_reports_not_in_cart() {
    with_env(
        &[
            ("TROLLEY_STORE_DATABASE_URL", "sqlite::memory:"),
            ("TROLLEY_STORE_MAX_CONNECTIONS", "1"),
        ],
        || {
            let result = ops::run(ops::CartOp::Remove(3));
            assert_eq!(result.exit_code, 1, "expected cart operation failure code");

            let payload = parse_payload(&result.output);
            assert_eq!(payload["command"], "remove");
            assert_eq!(payload["status"], "error");
            assert_eq!(payload["error_class"], "not_in_cart");
            assert_eq!(payload["message"], "The product is not in the cart.");
        },
    );
}

#[test]
fn set_amount_of_zero_is_a_silent_noop() {
    with_env(
        &[
            ("TROLLEY_STORE_DATABASE_URL", "sqlite::memory:"),
            ("TROLLEY_STORE_MAX_CONNECTIONS", "1"),
        ],
        || {
            let result = ops::run(ops::CartOp::SetAmount(1, 0));
            assert_eq!(result.exit_code, 0, "expected no-op success");

            let payload = parse_payload(&result.output);
            assert_eq!(payload["command"], "set-amount");
            assert_eq!(payload["status"], "ok");
            let message = payload["message"].as_str().unwrap_or("");
            assert!(message.contains("cart left unchanged"));
        },
    );
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "TROLLEY_SERVICES_BASE_URL",
        "TROLLEY_SERVICES_TIMEOUT_SECS",
        "TROLLEY_STORE_DATABASE_URL",
        "TROLLEY_STORE_MAX_CONNECTIONS",
        "TROLLEY_STORE_TIMEOUT_SECS",
        "TROLLEY_LOGGING_LEVEL",
        "TROLLEY_LOGGING_FORMAT",
        "TROLLEY_LOG_LEVEL",
        "TROLLEY_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, previous) in previous_values {
        match previous {
            Some(value) => env::set_var(key, value),
            None => env::remove_var(key),
        }
    }
}
