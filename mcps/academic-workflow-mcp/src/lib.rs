//! Academic Workflow MCP Library
//!
//! Phase state machine for AI-assisted academic writing sessions. Tracks a
//! multi-turn authoring session through a fixed 8-phase sequence, gates
//! which agent tools are valid at each phase, validates completion claims,
//! and derives progress views for the agent and the UI.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use academic_workflow_mcp::catalog::PhaseCatalog;
//! use academic_workflow_mcp::store::WorkflowRegistry;
//! use academic_workflow_mcp::{engine, gate};
//!
//! let catalog = PhaseCatalog::academic()?;
//! let registry = WorkflowRegistry::new();
//! // create a session workflow, record tool uses, mark complete, advance
//! ```
//!
//! # Architecture
//!
//! - `types` - state, catalog entry, and error definitions
//! - `catalog` - the built-in 8-phase table, validated at startup
//! - `store` - session-keyed state registry with scoped mutation
//! - `engine` - phase transitions and derived views
//! - `gate` - per-phase tool usage log and admit/deny decisions
//! - `params` / `handlers` / `server` - the MCP tool surface

pub mod catalog;
pub mod engine;
pub mod gate;
pub mod handlers;
pub mod params;
pub mod server;
pub mod store;
#[cfg(test)]
mod tests;
pub mod types;

// Re-export main server type
pub use server::AcademicWorkflowServer;

// Re-export core domain types for direct API usage
pub use types::{
    PhaseDefinition, PhaseProgress, WorkflowError, WorkflowKind, WorkflowState, WorkflowView,
};
