//! Parameter definitions for academic-workflow-mcp tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Session Lifecycle
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StartWorkflowParams {
    /// Chat session id (assigned by the orchestrator)
    pub session_id: String,
    /// Workflow type; defaults to "academic-8-phase"
    #[serde(default)]
    pub workflow_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetWorkflowParams {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EndWorkflowParams {
    pub session_id: String,
}

// ============================================================================
// Tool Gate
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RecordToolUseParams {
    pub session_id: String,
    /// Tool id being reported as used
    pub tool_id: String,
    /// Phase to log against; defaults to the current phase
    #[serde(default)]
    pub phase: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CheckToolParams {
    pub session_id: String,
    /// Tool id the agent wants to invoke
    pub tool_id: String,
}

// ============================================================================
// Phase Transitions
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MarkPhaseCompleteParams {
    pub session_id: String,
    /// Ordinal being claimed complete; must be the current phase
    pub phase: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AdvancePhaseParams {
    pub session_id: String,
}

// ============================================================================
// Read-only Views
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WorkflowProgressParams {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListPhasesParams {}
