//! Tool-gate evaluator
//!
//! Tracks which tools each phase has used and decides whether a requested
//! tool is admitted at the current phase. The gate is a whitelist-by-phase:
//! tools listed in some phase's requirements are admitted only while their
//! phase is active; tools no phase lists are always admitted.

use crate::catalog::PhaseCatalog;
use crate::engine;
use crate::types::{WorkflowError, WorkflowState};

/// Record a tool use against a phase's usage log
///
/// Usage is phase-scoped: each phase owns its own log, and a tool recorded
/// in an earlier phase never counts toward a later phase's requirements.
/// The phase must be at or behind the cursor; recording ahead of the cursor
/// is rejected with `WrongPhase`. Idempotent per phase and tool; returns
/// whether the use was newly recorded.
pub fn record_tool_use(
    state: &mut WorkflowState,
    catalog: &PhaseCatalog,
    ordinal: u8,
    tool_id: &str,
) -> Result<bool, WorkflowError> {
    if ordinal == 0 || ordinal > state.current_phase {
        return Err(WorkflowError::WrongPhase {
            requested: ordinal,
            current: state.current_phase,
        });
    }
    if catalog.definition_of(ordinal).is_none() {
        return Err(WorkflowError::CorruptState(format!(
            "phase {} has no catalog entry (session {})",
            ordinal, state.session_id
        )));
    }

    let progress = state.phase_progress.entry(ordinal).or_default();
    if !progress.started {
        progress.started = true;
        progress.started_at = Some(chrono::Utc::now().to_rfc3339());
    }

    let newly_recorded = progress.tools_used.insert(tool_id.to_string());
    if newly_recorded {
        tracing::debug!(
            session_id = %state.session_id,
            phase = ordinal,
            tool_id,
            "tool use recorded"
        );
    }
    Ok(newly_recorded)
}

/// Decide whether a tool is admitted at the current phase
///
/// True iff the tool is required by the current phase, or it is not gated by
/// any phase in the catalog. The gate restricts phase-specific tools only;
/// it does not sandbox the agent.
pub fn is_tool_admitted(
    state: &WorkflowState,
    catalog: &PhaseCatalog,
    tool_id: &str,
) -> Result<bool, WorkflowError> {
    let definition = engine::current_phase_view(state, catalog)?;

    if definition.required_tools.contains(tool_id) {
        return Ok(true);
    }
    Ok(!catalog.gated_tools().contains(tool_id))
}
