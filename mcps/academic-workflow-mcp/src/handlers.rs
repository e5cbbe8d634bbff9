//! Handler implementations for academic-workflow-mcp tools
//!
//! Each handler converts MCP params into store/engine calls and maps the
//! workflow error taxonomy onto MCP errors: recoverable rejections become
//! invalid_params, CorruptState becomes internal_error.

use mcp_common::{
    internal_error, invalid_params, json_success, CallToolResult, IntoMcpError, McpError,
    ResultExt,
};
use serde_json::json;

use crate::catalog::PhaseCatalog;
use crate::engine;
use crate::gate;
use crate::params::*;
use crate::store::WorkflowRegistry;
use crate::types::{GateDecision, PhaseListResponse, ToolUseResponse, WorkflowError, WorkflowKind};

impl IntoMcpError for WorkflowError {
    fn into_mcp_error(self) -> McpError {
        let message = self.to_string();
        match self {
            WorkflowError::CorruptState(_) => internal_error(message),
            _ => invalid_params(message),
        }
    }
}

// ============================================================================
// Session Lifecycle
// ============================================================================

pub async fn start_workflow(
    registry: &WorkflowRegistry,
    catalog: &PhaseCatalog,
    params: StartWorkflowParams,
) -> Result<CallToolResult, McpError> {
    if params.session_id.is_empty() {
        return Err(invalid_params("session_id cannot be empty"));
    }

    let kind = match params.workflow_type.as_deref() {
        Some(raw) => raw.parse::<WorkflowKind>().to_mcp_err()?,
        None => catalog.kind(),
    };
    if kind != catalog.kind() {
        return Err(
            WorkflowError::UnsupportedWorkflowType(kind.to_string()).into_mcp_error(),
        );
    }

    let state = registry
        .create(&params.session_id, kind, catalog.max_phases())
        .await;

    json_success(&state)
}

pub async fn get_workflow(
    registry: &WorkflowRegistry,
    params: GetWorkflowParams,
) -> Result<CallToolResult, McpError> {
    let state = registry.get(&params.session_id).await.to_mcp_err()?;
    json_success(&state)
}

pub async fn end_workflow(
    registry: &WorkflowRegistry,
    params: EndWorkflowParams,
) -> Result<CallToolResult, McpError> {
    let removed = registry.remove(&params.session_id).await;

    json_success(&json!({
        "session_id": params.session_id,
        "removed": removed,
        "message": if removed {
            format!("Workflow for session {} discarded", params.session_id)
        } else {
            format!("No workflow found for session {}", params.session_id)
        }
    }))
}

// ============================================================================
// Tool Gate
// ============================================================================

pub async fn record_tool_use(
    registry: &WorkflowRegistry,
    catalog: &PhaseCatalog,
    params: RecordToolUseParams,
) -> Result<CallToolResult, McpError> {
    let requested = params.phase;
    let tool_id = params.tool_id.clone();

    let (state, (phase, newly_recorded)) = registry
        .mutate(&params.session_id, |state| {
            let ordinal = requested.unwrap_or(state.current_phase);
            let newly = gate::record_tool_use(state, catalog, ordinal, &tool_id)?;
            Ok((ordinal, newly))
        })
        .await
        .to_mcp_err()?;

    let remaining = engine::required_tools_remaining(&state, catalog).to_mcp_err()?;

    json_success(&ToolUseResponse {
        session_id: params.session_id,
        phase,
        tool_id: params.tool_id,
        newly_recorded,
        required_tools_remaining: remaining.into_iter().collect(),
    })
}

pub async fn check_tool(
    registry: &WorkflowRegistry,
    catalog: &PhaseCatalog,
    params: CheckToolParams,
) -> Result<CallToolResult, McpError> {
    let state = registry.get(&params.session_id).await.to_mcp_err()?;
    let admitted = gate::is_tool_admitted(&state, catalog, &params.tool_id).to_mcp_err()?;

    let reason = if admitted {
        if catalog.gated_tools().contains(params.tool_id.as_str()) {
            format!("required by the current phase {}", state.current_phase)
        } else {
            "not phase-gated".to_string()
        }
    } else {
        format!("not available in phase {}", state.current_phase)
    };

    json_success(&GateDecision {
        session_id: params.session_id,
        tool_id: params.tool_id,
        current_phase: state.current_phase,
        admitted,
        reason,
    })
}

// ============================================================================
// Phase Transitions
// ============================================================================

pub async fn mark_phase_complete(
    registry: &WorkflowRegistry,
    catalog: &PhaseCatalog,
    params: MarkPhaseCompleteParams,
) -> Result<CallToolResult, McpError> {
    let (state, ()) = registry
        .mutate(&params.session_id, |state| {
            engine::mark_complete(state, catalog, params.phase)
        })
        .await
        .to_mcp_err()?;

    let view = engine::workflow_view(&state, catalog).to_mcp_err()?;
    json_success(&view)
}

pub async fn advance_phase(
    registry: &WorkflowRegistry,
    catalog: &PhaseCatalog,
    params: AdvancePhaseParams,
) -> Result<CallToolResult, McpError> {
    let (state, ()) = registry
        .mutate(&params.session_id, |state| engine::advance(state, catalog))
        .await
        .to_mcp_err()?;

    let view = engine::workflow_view(&state, catalog).to_mcp_err()?;
    json_success(&view)
}

// ============================================================================
// Read-only Views
// ============================================================================

pub async fn workflow_progress(
    registry: &WorkflowRegistry,
    catalog: &PhaseCatalog,
    params: WorkflowProgressParams,
) -> Result<CallToolResult, McpError> {
    let state = registry.get(&params.session_id).await.to_mcp_err()?;
    let view = engine::workflow_view(&state, catalog).to_mcp_err()?;
    json_success(&view)
}

pub async fn list_phases(
    catalog: &PhaseCatalog,
    _params: ListPhasesParams,
) -> Result<CallToolResult, McpError> {
    json_success(&PhaseListResponse {
        workflow_type: catalog.kind(),
        total: catalog.phases().len(),
        phases: catalog.phases().to_vec(),
    })
}
