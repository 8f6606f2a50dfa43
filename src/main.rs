// --- Gestión BPO - servicio HTTP ---

use gestion_bpo::{api, run_server, Config};
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = Config::from_env();
    init_tracing(config.log_json);

    tracing::info!(bind = %config.bind, "=== Gestión BPO (API) ===");
    let backend = api::desde_config(&config)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    run_server(&config, backend).await
}
