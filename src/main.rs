use currency_converter::config::ServerConfig;
use currency_converter::server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // init tracing from env CONVERTER_LOG or RUST_LOG
    let filter = std::env::var("CONVERTER_LOG")
        .unwrap_or_else(|_| std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()));
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cfg = match ServerConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(err = ?e, "failed to load configuration");
            std::process::exit(1);
        }
    };
    info!(
        data_file = %cfg.data_file.display(),
        port = cfg.port,
        "currency converter starting up"
    );

    if let Err(e) = server::serve(cfg).await {
        error!(err = ?e, "server stopped with error");
        std::process::exit(1);
    }
}
