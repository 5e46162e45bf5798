use anyhow::{Context, Result};
use campaign_extract::{pipeline, Config};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    // ─── 2) configure dirs ───────────────────────────────────────────
    let cfg = Config::from_env();
    info!(
        input = %cfg.input_dir.display(),
        output = %cfg.output_dir.display(),
        "startup"
    );

    // ─── 3) extract → transform → append ─────────────────────────────
    let summary = pipeline::run(&cfg.input_dir, &cfg.output_dir).with_context(|| {
        format!(
            "splitting archives from {} into {}",
            cfg.input_dir.display(),
            cfg.output_dir.display()
        )
    })?;

    info!(
        summary = %serde_json::to_string(&summary).context("serializing run summary")?,
        "all done"
    );
    Ok(())
}
