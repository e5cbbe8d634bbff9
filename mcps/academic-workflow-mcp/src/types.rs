//! Core type definitions for the academic workflow engine
//!
//! This module contains the phase catalog entry type, the per-session
//! workflow state, the error taxonomy, and the response types returned
//! by the MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Workflow kind discriminator.
///
/// Only `academic-8-phase` drives this engine. Other kinds are added as new
/// catalogs; the engine contract stays the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum WorkflowKind {
    #[serde(rename = "academic-8-phase")]
    Academic8Phase,
}

impl WorkflowKind {
    pub fn as_str(&self) -> &str {
        match self {
            WorkflowKind::Academic8Phase => "academic-8-phase",
        }
    }
}

impl FromStr for WorkflowKind {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "academic-8-phase" => Ok(WorkflowKind::Academic8Phase),
            other => Err(WorkflowError::UnsupportedWorkflowType(other.to_string())),
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in the phase catalog
///
/// Immutable reference data: ordinal, display strings, the tools that must
/// be used before the phase can be claimed complete, and the checklist the
/// orchestrator works through before claiming it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PhaseDefinition {
    /// 1-indexed ordinal, unique within the catalog
    pub phase: u8,

    /// Display name
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Tools that must be recorded as used in this phase before completion
    pub required_tools: BTreeSet<String>,

    /// Ordered deliverables the phase is expected to produce
    pub expected_outputs: Vec<String>,

    /// Ordered checklist; must be non-empty (validated at startup)
    pub completion_criteria: Vec<String>,
}

impl PhaseDefinition {
    /// Create a new phase definition
    pub fn new(phase: u8, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            phase,
            name: name.into(),
            description: description.into(),
            required_tools: BTreeSet::new(),
            expected_outputs: Vec::new(),
            completion_criteria: Vec::new(),
        }
    }

    /// Add a required tool
    pub fn with_tool(mut self, tool_id: impl Into<String>) -> Self {
        self.required_tools.insert(tool_id.into());
        self
    }

    /// Add an expected output
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.expected_outputs.push(output.into());
        self
    }

    /// Add a completion criterion
    pub fn with_criterion(mut self, criterion: impl Into<String>) -> Self {
        self.completion_criteria.push(criterion.into());
        self
    }
}

/// Partial progress within a single phase
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PhaseProgress {
    /// Whether any work has been recorded for this phase
    pub started: bool,

    /// RFC3339 timestamp of the first recorded tool use, if any
    pub started_at: Option<String>,

    /// Tool ids recorded as used in this phase (one log per phase)
    pub tools_used: BTreeSet<String>,
}

/// Per-session workflow state
///
/// Single source of truth for a session. Mutated only through the store's
/// scoped mutation; readers get owned snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WorkflowState {
    /// Session this workflow belongs to
    pub session_id: String,

    /// Workflow kind driving the catalog
    pub workflow_type: WorkflowKind,

    /// Active phase cursor, 1-indexed, monotonic non-decreasing
    pub current_phase: u8,

    /// Total number of phases for this kind
    pub max_phases: u8,

    /// Ordinals claimed complete; always a subset of [1, current_phase]
    pub completed_phases: BTreeSet<u8>,

    /// Per-phase partial progress, keyed by ordinal
    pub phase_progress: BTreeMap<u8, PhaseProgress>,

    /// RFC3339 timestamp of workflow creation
    pub created_at: String,
}

impl WorkflowState {
    /// Create a fresh workflow at phase 1 with no recorded progress
    pub fn new(session_id: impl Into<String>, kind: WorkflowKind, max_phases: u8) -> Self {
        Self {
            session_id: session_id.into(),
            workflow_type: kind,
            current_phase: 1,
            max_phases,
            completed_phases: BTreeSet::new(),
            phase_progress: BTreeMap::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// True while the cursor still points at a catalog phase
    pub fn is_active(&self) -> bool {
        self.current_phase >= 1 && self.current_phase <= self.max_phases
    }

    /// True once the final phase has been claimed complete
    pub fn is_finished(&self) -> bool {
        self.current_phase == self.max_phases && self.completed_phases.contains(&self.max_phases)
    }

    /// Tools recorded as used in the given phase
    pub fn tools_used_in(&self, ordinal: u8) -> BTreeSet<String> {
        self.phase_progress
            .get(&ordinal)
            .map(|p| p.tools_used.clone())
            .unwrap_or_default()
    }
}

/// Workflow engine errors
///
/// Everything except `CorruptState` is recoverable by the caller. A failed
/// operation never leaves partial mutation behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("Phase {phase} is not marked complete")]
    PhaseNotComplete { phase: u8 },

    #[error("Workflow already finished: no phases remain")]
    WorkflowFinished,

    #[error("Wrong phase: requested {requested}, current phase is {current}")]
    WrongPhase { requested: u8, current: u8 },

    #[error("Required tools not yet used in phase {phase}: {}", .missing.join(", "))]
    ToolsIncomplete { phase: u8, missing: Vec<String> },

    #[error("Corrupt workflow state: {0}")]
    CorruptState(String),

    #[error("Unknown session: {0}")]
    UnknownSession(String),

    #[error("Unsupported workflow type: {0}")]
    UnsupportedWorkflowType(String),
}

// ============================================================================
// Response types
// ============================================================================

/// Full derived view of a workflow, returned by state-reading tools
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WorkflowView {
    pub session_id: String,
    pub workflow_type: WorkflowKind,
    pub current_phase: u8,
    pub max_phases: u8,
    pub completed_phases: Vec<u8>,
    pub percent_complete: u8,
    pub is_active: bool,
    pub is_finished: bool,
    /// Catalog entry for the current phase
    pub phase: PhaseDefinition,
    /// Current-phase required tools not yet recorded as used
    pub required_tools_remaining: Vec<String>,
}

/// Result of recording a tool use
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolUseResponse {
    pub session_id: String,
    pub phase: u8,
    pub tool_id: String,
    /// False when the tool was already recorded for this phase
    pub newly_recorded: bool,
    pub required_tools_remaining: Vec<String>,
}

/// Gate decision for a requested tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GateDecision {
    pub session_id: String,
    pub tool_id: String,
    pub current_phase: u8,
    pub admitted: bool,
    pub reason: String,
}

/// Catalog dump for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PhaseListResponse {
    pub workflow_type: WorkflowKind,
    pub total: usize,
    pub phases: Vec<PhaseDefinition>,
}
