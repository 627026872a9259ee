//! Newline-delimited JSON-RPC over stdin/stdout
//!
//! One message per line. Requests are processed to completion before the next
//! line is read. Malformed lines get an error line back; only EOF or a broken
//! output stream ends the loop.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::errors::AppError;
use crate::mcp::rpc::Response;
use crate::mcp::server::Dispatcher;

pub async fn serve_stdio(dispatcher: &Dispatcher) -> std::io::Result<()> {
    info!("listening for MCP requests on stdin");
    serve_lines(
        dispatcher,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;
    info!("stdin closed, shutting down");
    Ok(())
}

pub async fn serve_lines<R, W>(dispatcher: &Dispatcher, mut reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer).await? == 0 {
            debug!("received EOF");
            return Ok(());
        }

        let response = match std::str::from_utf8(&buffer) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => dispatcher.process_message(line.trim()),
            Err(err) => Some(Response::error(
                serde_json::Value::Null,
                &AppError::parse(err.to_string()),
            )),
        };

        let Some(response) = response else {
            continue;
        };

        let encoded = match serde_json::to_string(&response) {
            Ok(encoded) => encoded,
            Err(err) => {
                error!(error = %err, "failed to serialize response");
                continue;
            }
        };

        writer.write_all(encoded.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
}
