//! MCP tool server exposing the retrieval service as one tool.
//!
//! Framing, version negotiation and request dispatch are handled by `rmcp`;
//! this handler only lists the tool and answers calls. Requests run
//! concurrently against the shared service.
use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParams, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParams,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler, ServiceExt};
use serde_json::Value;

use localrag_core::config::ServerSettings;
use localrag_core::Error;
use crate::service::RetrievalService;
use crate::tools::{call_error, call_result, retrieve_tool, RetrieveArgs};

#[derive(Clone)]
pub struct McpServer {
    service: Arc<RetrievalService>,
    settings: ServerSettings,
}

impl McpServer {
    pub fn new(service: Arc<RetrievalService>, settings: ServerSettings) -> Self { Self { service, settings } }

    async fn retrieve(&self, arguments: Option<rmcp::model::JsonObject>) -> CallToolResult {
        let args: RetrieveArgs = match serde_json::from_value(Value::Object(arguments.unwrap_or_default())) {
            Ok(args) => args,
            Err(e) => return call_error(&Error::InvalidInput(format!("invalid arguments: {}", e))),
        };
        match self.service.retrieve(&args.query, args.k).await {
            Ok(docs) => call_result(docs),
            Err(e) => {
                tracing::warn!(kind = e.kind(), error = %e, "tool call failed");
                call_error(&e)
            }
        }
    }

    /// Serve on stdin/stdout until the client disconnects.
    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        tracing::info!(name = %self.settings.name, tool = %self.settings.tool_name, "serving MCP on stdio");
        let running = self.serve(rmcp::transport::stdio()).await?;
        let reason = running.waiting().await?;
        tracing::info!(?reason, "MCP session closed");
        Ok(())
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.settings.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(format!("Call '{}' to search the local offline document index.", self.settings.tool_name)),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(vec![retrieve_tool(&self.settings.tool_name)]))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        if request.name != self.settings.tool_name {
            return Err(ErrorData::invalid_params(format!("Unknown tool: {}", request.name), None));
        }
        Ok(self.retrieve(request.arguments).await)
    }
}
