// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use accel_plane::config::{load_config, FrameworkConfig, RuntimeBuilder};
use accel_plane::framework::FrameworkBuilder;
use anyhow::Context;
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [config.yaml|config.toml]", args[0]);
        std::process::exit(1);
    }

    let config = match args.get(1) {
        Some(path) => load_config(path).with_context(|| format!("loading {}", path))?,
        None => FrameworkConfig::default(),
    };

    let framework = RuntimeBuilder::from_config(FrameworkBuilder::new(), &config)?;
    framework.start_serving()?;

    let report = framework.stats().collect().await?;
    let view = serde_json::json!({
        "phase": framework.phase(),
        "driver": framework.selected_driver(),
        "modules": framework.enumerate_modules(),
        "assignments": framework.assignments(),
        "options": framework.options(),
        "crypto_keys": framework.crypto_keys(),
        "stats": {
            "operations": framework.operation_summaries(&report),
            "global": report.stats.global,
            "unresponsive": report.unresponsive,
        },
    });

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
