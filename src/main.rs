use std::sync::Arc;

use maths_tutor_mcp::{
    build_app,
    config::{Config, TransportKind},
    domain::tools::ToolRegistry,
    logging,
    mcp::{server::Dispatcher, stdio::serve_stdio},
    AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::load()?;
    let registry = ToolRegistry::standard(config.pass_threshold)?;
    let dispatcher = Arc::new(Dispatcher::new(registry));

    info!(
        transport = ?config.transport,
        pass_threshold = config.pass_threshold,
        "server starting"
    );

    match config.transport {
        TransportKind::Stdio => serve_stdio(&dispatcher).await?,
        TransportKind::Http => {
            let bind_socket = config.bind_socket()?;
            let listener = tokio::net::TcpListener::bind(bind_socket).await?;
            info!(
                bind_addr = %config.bind_addr,
                bind_port = config.bind_port,
                "listening for MCP requests over HTTP"
            );
            axum::serve(listener, build_app(AppState::new(dispatcher)).into_make_service()).await?;
        }
    }

    Ok(())
}
