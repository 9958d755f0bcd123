//! Newline-delimited JSON-RPC loop over standard input and output.

use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use super::protocol::{
    CallToolParams, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR, Request, Response, initialize_result,
};
use super::tools::ToolHandler;

pub const SERVER_NAME: &str = "gcm";

pub struct Server {
    tools: ToolHandler,
}

impl Server {
    pub fn new(tools: ToolHandler) -> Self {
        Self { tools }
    }

    /// Serve requests from stdin until it closes.
    pub async fn serve_stdio(&self) -> std::io::Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Read one message per line and write one response per line.
    /// Notifications get no response.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(&line).await {
                let mut out = serde_json::to_vec(&response)?;
                out.push(b'\n');
                writer.write_all(&out).await?;
                writer.flush().await?;
            }
        }

        debug!("Input closed, shutting down");
        Ok(())
    }

    /// Handle one raw message.
    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!("Unparseable message: {}", e);
                return Some(Response::error(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: Request = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                return Some(Response::error(
                    id,
                    INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ));
            }
        };

        self.handle(request).await
    }

    /// Dispatch a parsed request.
    pub async fn handle(&self, request: Request) -> Option<Response> {
        debug!("Received {}", request.method);

        if request.is_notification() {
            // notifications/initialized and friends need no reply
            return None;
        }
        let id = request.id.unwrap_or(Value::Null);

        let response = match request.method.as_str() {
            "initialize" => Response::success(
                id,
                initialize_result(SERVER_NAME, env!("CARGO_PKG_VERSION")),
            ),
            "ping" => Response::success(id, json!({})),
            "tools/list" => Response::success(id, json!({ "tools": ToolHandler::definitions() })),
            "tools/call" => match serde_json::from_value::<CallToolParams>(request.params) {
                Ok(params) => {
                    let result = self.tools.call(&params.name, &params.arguments).await;
                    match serde_json::to_value(result) {
                        Ok(value) => Response::success(id, value),
                        Err(e) => Response::error(id, INTERNAL_ERROR, e.to_string()),
                    }
                }
                Err(e) => Response::error(id, INVALID_PARAMS, format!("Invalid params: {}", e)),
            },
            other => Response::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", other)),
        };

        Some(response)
    }
}
