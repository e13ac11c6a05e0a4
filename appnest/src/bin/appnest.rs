//! Command-line entry point: reads one webhook body from stdin, runs the
//! pipeline against the configured Albert and Grist endpoints, and prints
//! the assembly response as JSON.

use std::io::Read;
use std::sync::Arc;

use anyhow::Context as _;
use serde_json::Value;

use appnest::agents::AlbertClient;
use appnest::config::PipelineConfig;
use appnest::events::{init_tracing, set_event_sink, LoggingEventSink};
use appnest::grist::GristClient;
use appnest::runner::PipelineRunner;

fn config_from_env() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    if let Ok(url) = std::env::var("GRIST_BASE_URL") {
        config = config.with_grist_base_url(url);
    }
    if let Ok(endpoint) = std::env::var("ALBERT_ENDPOINT") {
        config = config.with_agent_endpoint(endpoint);
    }
    if let Ok(model) = std::env::var("ALBERT_MODEL") {
        config = config.with_agent_model(model);
    }
    if let Ok(key) = std::env::var("ALBERT_API_KEY") {
        config = config.with_agent_api_key(key);
    }
    if let Ok(key) = std::env::var("GRIST_API_KEY") {
        config = config.with_grist_api_key(key);
    }
    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    set_event_sink(Arc::new(LoggingEventSink::debug()));

    let config = config_from_env();

    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("reading webhook body from stdin")?;
    let body: Value = serde_json::from_str(&raw).context("webhook body is not valid JSON")?;

    let mut agent = AlbertClient::new(
        config.agent_endpoint.clone(),
        config.agent_model.clone(),
    );
    if let Some(key) = &config.agent_api_key {
        agent = agent.with_api_key(key.clone());
    }

    let mut docs = GristClient::new(config.grist_base_url.clone());
    if let Some(key) = &config.grist_api_key {
        docs = docs.with_api_key(key.clone());
    }

    let runner = PipelineRunner::new(Arc::new(agent), Arc::new(docs), config);
    let response = runner
        .handle_webhook(&body)
        .await
        .context("pipeline run failed")?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
