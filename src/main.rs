use anyhow::{Context, Result};
use portfolio_renderer::bootstrap::{Outcome, bootstrap};
use portfolio_renderer::config::Config;
use portfolio_renderer::http_client::HttpTransport;
use portfolio_renderer::page::ReadyState;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    #[cfg(debug_assertions)]
    tracing_subscriber::fmt()
        .compact()
        .with_ansi(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .without_time()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "portfolio_renderer=debug,reqwest=info,hyper=info",
                )
            }),
        )
        .init();
    #[cfg(not(debug_assertions))]
    tracing_subscriber::fmt()
        .compact()
        .with_ansi(true)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .without_time()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "portfolio_renderer=info,reqwest=warn,hyper=warn",
                )
            }),
        )
        .init();
    let config = Config::from_env()?;
    let url = config.page_url().await?;
    let transport = HttpTransport::new().context("failed to build http client")?;
    let state = ReadyState::open(config.page.clone(), url);
    let (page, outcome) = bootstrap(state, &transport, &config.data)
        .await
        .with_context(|| format!("failed to open page {}", config.page.display()))?;
    if outcome == Outcome::Degraded {
        warn!("portfolio data unavailable, writing fallback page");
    }
    let html = page.to_html();
    match config.output {
        Some(ref path) => {
            tokio::fs::write(path, html.as_bytes())
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(html.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}
