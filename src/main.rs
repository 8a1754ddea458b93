use anyhow::Context;
use event_monitor::config::MonitorConfig;
use event_monitor::{replay, server, EventEngine};
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("event_monitor=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    match std::env::args().nth(1).as_deref() {
        Some("serve") => {
            let config = MonitorConfig::from_env()?;
            server::serve(&config, Arc::new(EventEngine::new())).await
        }
        Some(input_path) => {
            let file = File::open(input_path)
                .with_context(|| format!("couldn't open {input_path}"))?;
            let reader = BufReader::new(file);
            let engine = EventEngine::new();
            let summary = replay::replay(&engine, reader, std::io::stdout()).await?;
            let histories = engine.shutdown().await;
            info!(
                users = histories.len(),
                events = summary.events,
                rejected = summary.rejected,
                alerted = summary.alerted,
                "replay finished"
            );
            Ok(())
        }
        None => anyhow::bail!("usage: event-monitor <events.jsonl> | event-monitor serve"),
    }
}
