//! MCP server implementation for the academic workflow engine
//!
//! Exposes the phase state machine to the chat agent (the session
//! orchestrator) as MCP tools. Handler implementations live in the handlers
//! module.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use std::sync::Arc;

use crate::catalog::PhaseCatalog;
use crate::handlers;
use crate::params::*;
use crate::store::WorkflowRegistry;

/// The academic workflow MCP server
#[derive(Clone)]
pub struct AcademicWorkflowServer {
    registry: WorkflowRegistry,
    catalog: Arc<PhaseCatalog>,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router - Each tool delegates to its handler
// ============================================================================

#[tool_router]
impl AcademicWorkflowServer {
    pub fn new() -> Result<Self, anyhow::Error> {
        // Catalog integrity is checked once here; lookups never re-validate
        let catalog = PhaseCatalog::academic()?;
        tracing::info!(phases = catalog.max_phases(), "phase catalog validated");

        Ok(Self {
            registry: WorkflowRegistry::new(),
            catalog: Arc::new(catalog),
            tool_router: Self::tool_router(),
        })
    }

    // ========================================================================
    // Session Lifecycle
    // ========================================================================

    #[tool(description = "Start the academic workflow for a session (idempotent)")]
    async fn start_workflow(
        &self,
        Parameters(params): Parameters<StartWorkflowParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::start_workflow(&self.registry, &self.catalog, params).await
    }

    #[tool(description = "Fetch the raw workflow state for a session")]
    async fn get_workflow(
        &self,
        Parameters(params): Parameters<GetWorkflowParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::get_workflow(&self.registry, params).await
    }

    #[tool(description = "End a session's workflow and discard its state")]
    async fn end_workflow(
        &self,
        Parameters(params): Parameters<EndWorkflowParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::end_workflow(&self.registry, params).await
    }

    // ========================================================================
    // Tool Gate
    // ========================================================================

    #[tool(description = "Record a tool as used in a phase (defaults to current)")]
    async fn record_tool_use(
        &self,
        Parameters(params): Parameters<RecordToolUseParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::record_tool_use(&self.registry, &self.catalog, params).await
    }

    #[tool(description = "Check whether a tool is admitted at the current phase")]
    async fn check_tool(
        &self,
        Parameters(params): Parameters<CheckToolParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::check_tool(&self.registry, &self.catalog, params).await
    }

    // ========================================================================
    // Phase Transitions
    // ========================================================================

    #[tool(description = "Claim the current phase complete (requires its tools used)")]
    async fn mark_phase_complete(
        &self,
        Parameters(params): Parameters<MarkPhaseCompleteParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::mark_phase_complete(&self.registry, &self.catalog, params).await
    }

    #[tool(description = "Advance to the next phase (requires current phase complete)")]
    async fn advance_phase(
        &self,
        Parameters(params): Parameters<AdvancePhaseParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::advance_phase(&self.registry, &self.catalog, params).await
    }

    // ========================================================================
    // Read-only Views
    // ========================================================================

    #[tool(description = "Derived progress view: current phase, percent, remaining tools")]
    async fn workflow_progress(
        &self,
        Parameters(params): Parameters<WorkflowProgressParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::workflow_progress(&self.registry, &self.catalog, params).await
    }

    #[tool(description = "List the phase catalog (names, tools, criteria)")]
    async fn list_phases(
        &self,
        Parameters(params): Parameters<ListPhasesParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::list_phases(&self.catalog, params).await
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for AcademicWorkflowServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Academic writing workflow engine. Tracks each chat session through the \
                 8-phase authoring sequence (topic definition through finalization), gates \
                 phase-specific tools, and reports progress. Record tool uses as they \
                 happen, claim a phase complete once its required tools have run, then \
                 advance explicitly."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
