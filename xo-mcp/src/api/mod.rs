// API module for the MCP server
//
// Newline-delimited JSON-RPC 2.0 over stdin/stdout. Standard output carries
// protocol messages only; logs go to standard error.

pub mod handlers;

use std::sync::Arc;

use log::{debug, error, info, warn};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::errors::ServerError;
use crate::tools::ToolRegistry;
use handlers::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
};

/// Serve the MCP protocol on the process's standard streams
pub async fn run_stdio(registry: Arc<ToolRegistry>) -> Result<(), ServerError> {
    let mut stdout = tokio::io::stdout();
    serve(tokio::io::stdin(), &mut stdout, registry).await
}

/// Serve the MCP protocol until `reader` reaches end of input
///
/// Every `tools/call` runs as its own task, so a slow call does not hold up
/// the others; responses are written in completion order. Calls still in
/// flight at end of input are awaited before returning.
pub async fn serve<R, W>(
    reader: R,
    writer: &mut W,
    registry: Arc<ToolRegistry>,
) -> Result<(), ServerError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    // Kept across turns: a read cancelled by another branch leaves its bytes here
    let mut line = Vec::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();
    let mut calls = JoinSet::new();
    let mut input_error = None;

    loop {
        tokio::select! {
            read = reader.read_until(b'\n', &mut line) => match read {
                Ok(_) if line.is_empty() => break,
                Ok(_) => {
                    handle_bytes(&line, &registry, &tx, &mut calls);
                    line.clear();
                }
                Err(e) => {
                    error!("Failed to read from input: {}", e);
                    input_error = Some(e);
                    break;
                }
            },
            Some(response) = rx.recv() => write_response(writer, &response).await?,
            Some(joined) = calls.join_next(), if !calls.is_empty() => log_join(joined),
        }
    }

    info!("Input closed, waiting for {} in-flight call(s)", calls.len());
    drop(tx);
    loop {
        tokio::select! {
            response = rx.recv() => match response {
                Some(response) => write_response(writer, &response).await?,
                None => break,
            },
            Some(joined) = calls.join_next(), if !calls.is_empty() => log_join(joined),
        }
    }
    while let Some(joined) = calls.join_next().await {
        log_join(joined);
    }

    match input_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// A raw input line; bytes that are not UTF-8 get a parse error and the
/// session goes on
fn handle_bytes(
    bytes: &[u8],
    registry: &Arc<ToolRegistry>,
    tx: &mpsc::UnboundedSender<JsonRpcResponse>,
    calls: &mut JoinSet<()>,
) {
    match std::str::from_utf8(bytes) {
        Ok(line) => handle_line(line, registry, tx, calls),
        Err(e) => {
            warn!("Discarding input line that is not UTF-8: {}", e);
            let error = JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", e));
            send(tx, JsonRpcResponse::error(Value::Null, error));
        }
    }
}

fn handle_line(
    line: &str,
    registry: &Arc<ToolRegistry>,
    tx: &mpsc::UnboundedSender<JsonRpcResponse>,
    calls: &mut JoinSet<()>,
) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    debug!("Received: {}", line);

    let message: Value = match serde_json::from_str(line) {
        Ok(message) => message,
        Err(e) => {
            warn!("Failed to parse JSON-RPC message: {}", e);
            let error = JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", e));
            send(tx, JsonRpcResponse::error(Value::Null, error));
            return;
        }
    };

    let request: JsonRpcRequest = match serde_json::from_value(message.clone()) {
        Ok(request) => request,
        Err(e) => {
            let id = message.get("id").cloned().unwrap_or(Value::Null);
            let error = JsonRpcError::new(INVALID_REQUEST, format!("Invalid request: {}", e));
            send(tx, JsonRpcResponse::error(id, error));
            return;
        }
    };

    if let Err(error) = request.check_version() {
        match request.id {
            Some(id) => send(tx, JsonRpcResponse::error(id, error)),
            None => warn!("Ignoring notification: {}", error.message),
        }
        return;
    }

    let JsonRpcRequest { method, params, id, .. } = request;
    let id = match id {
        Some(id) => id,
        None => {
            handle_notification(&method);
            return;
        }
    };

    match method.as_str() {
        "initialize" => send(tx, JsonRpcResponse::result(id, handlers::initialize())),
        "ping" => send(tx, JsonRpcResponse::result(id, json!({}))),
        "tools/list" => send(
            tx,
            JsonRpcResponse::result(id, handlers::tools::list_tools(registry.clone())),
        ),
        "tools/call" => {
            let registry = registry.clone();
            let tx = tx.clone();
            calls.spawn(async move {
                let response = match handlers::tools::call_tool(registry, params).await {
                    Ok(result) => JsonRpcResponse::result(id, result),
                    Err(err) => JsonRpcResponse::error(id, err),
                };
                send(&tx, response);
            });
        }
        method => send(
            tx,
            JsonRpcResponse::error(
                id,
                JsonRpcError::new(METHOD_NOT_FOUND, format!("Method not found: {}", method)),
            ),
        ),
    }
}

fn handle_notification(method: &str) {
    match method {
        "notifications/initialized" => info!("Client initialized"),
        method => debug!("Ignoring notification {}", method),
    }
}

fn send(tx: &mpsc::UnboundedSender<JsonRpcResponse>, response: JsonRpcResponse) {
    if tx.send(response).is_err() {
        error!("Response dropped: output closed");
    }
}

async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> Result<(), ServerError>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(response)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
}

fn log_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        error!("tools/call task failed: {}", e);
    }
}
