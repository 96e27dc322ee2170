use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use pixel_debate_server::analyzer::GeminiAnalyzer;
use pixel_debate_server::config::Args;
use pixel_debate_server::router;
use pixel_debate_server::state::AppState;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixel_debate_server=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let analyzer = GeminiAnalyzer::new(
        args.gemini_api_key.clone(),
        args.gemini_model.clone(),
        Some(args.gemini_base_url.as_str()),
    );
    if !analyzer.has_api_key() {
        warn!("GEMINI_API_KEY is not set, every analysis will fail");
    }
    info!(model = analyzer.model(), "Gemini analyzer ready");

    let public_dir = args.public_dir();
    let app = router(
        AppState::new(Arc::new(analyzer)),
        public_dir.clone(),
        args.max_body_bytes,
    );

    let port = args.port;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    if let Some((cert, key)) = args.tls_paths() {
        let tls = RustlsConfig::from_pem_file(cert, key)
            .await
            .context("Failed to load TLS certificate")?;
        info!(public_dir = %public_dir.display(), "Pixel Debate running at https://localhost:{port}");
        axum_server::bind_rustls(addr, tls)
            .serve(app.into_make_service())
            .await
            .context("Server crashed")?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        info!(public_dir = %public_dir.display(), "Pixel Debate running at http://localhost:{port}");
        axum::serve(listener, app).await.context("Server crashed")?;
    }
    Ok(())
}
