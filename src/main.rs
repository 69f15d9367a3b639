use std::path::Path;

use qr_shortener::config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick the environment file before anything reads the environment.
    let selection = config::select_env_file(Path::new("."))?;
    if let Some(file) = &selection.file {
        dotenvy::from_path(file)?;
    } else {
        dotenvy::dotenv().ok();
    }

    let cfg = config::load_from_env()?;

    init_tracing(&cfg);

    if let Some(environment) = &selection.environment {
        tracing::info!("Environment: {environment}");
    }
    cfg.print_summary();

    qr_shortener::server::run(cfg).await
}

fn init_tracing(cfg: &qr_shortener::config::Config) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.log_level.clone()));

    if cfg.log_format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
