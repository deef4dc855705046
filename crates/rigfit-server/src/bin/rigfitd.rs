use rigfit_server::{RecommendServer, ServerConfig, ServerError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), ServerError> {
    let filter = EnvFilter::try_from_env("RIGFIT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig::from_env();
    let server = RecommendServer::from_config(&config)?;
    server.serve_http(&config.addr)?;
    Ok(())
}
