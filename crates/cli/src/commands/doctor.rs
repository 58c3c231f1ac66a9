use serde::Serialize;

use crate::commands::CommandResult;
use trolley_core::config::{AppConfig, LoadOptions};
use trolley_core::ProductCatalog;
use trolley_services::StorefrontClient;
use trolley_store::{connect_with_settings, migrations};

#[derive(Debug, Serialize)]
struct Check {
    name: &'static str,
    status: &'static str,
    detail: String,
}

impl Check {
    fn ok(name: &'static str, detail: impl Into<String>) -> Self {
        Self { name, status: "ok", detail: detail.into() }
    }

    fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        Self { name, status: "fail", detail: detail.into() }
    }
}

pub fn run(json: bool) -> CommandResult {
    let mut checks = Vec::new();

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(Check::ok("config", "configuration loaded and validated"));
            Some(config)
        }
        Err(error) => {
            checks.push(Check::fail("config", error.to_string()));
            None
        }
    };

    if let Some(config) = &config {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build();
        match runtime {
            Ok(runtime) => runtime.block_on(async {
                match connect_with_settings(
                    &config.store.database_url,
                    config.store.max_connections,
                    config.store.timeout_secs,
                )
                .await
                {
                    Ok(pool) => match migrations::run_pending(&pool).await {
                        Ok(()) => {
                            checks.push(Check::ok("store", "snapshot store reachable and migrated"));
                        }
                        Err(error) => checks.push(Check::fail("store", error.to_string())),
                    },
                    Err(error) => checks.push(Check::fail("store", error.to_string())),
                }

                match StorefrontClient::new(&config.services) {
                    Ok(client) => match client.products().await {
                        Ok(products) => checks.push(Check::ok(
                            "catalog",
                            format!("catalog reachable with {} product(s)", products.len()),
                        )),
                        Err(error) => checks.push(Check::fail("catalog", error.to_string())),
                    },
                    Err(error) => checks.push(Check::fail("catalog", error.to_string())),
                }
            }),
            Err(error) => checks.push(Check::fail("runtime", error.to_string())),
        }
    }

    let failed = checks.iter().any(|check| check.status == "fail");
    let output = if json {
        serde_json::to_string(&checks).unwrap_or_else(|error| {
            format!("{{\"error\":\"doctor serialization failed: {error}\"}}")
        })
    } else {
        checks
            .iter()
            .map(|check| format!("{:<8} {}  {}", check.name, check.status, check.detail))
            .collect::<Vec<_>>()
            .join("\n")
    };

    CommandResult { exit_code: u8::from(failed), output }
}
