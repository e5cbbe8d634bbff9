//! Phase transition engine
//!
//! Validates and applies phase completion and advancement, and derives the
//! read-only views the agent and the UI consume. Transitions validate fully
//! before touching state; the store commits the result only on success.
//!
//! There is no regression operation. Once a phase is completed it stays
//! completed even if the session later revisits its content; progress is
//! monotonic and re-work does not erase prior credit.

use std::collections::BTreeSet;

use crate::catalog::PhaseCatalog;
use crate::types::{PhaseDefinition, WorkflowError, WorkflowState, WorkflowView};

/// Mark the active phase complete
///
/// Only the phase under the cursor may be claimed (`WrongPhase` otherwise,
/// including for already-completed earlier ordinals), and every required
/// tool of that phase must have been recorded as used (`ToolsIncomplete`
/// names the gaps). Does not advance the cursor; "done" and "move on" are
/// separate steps so the orchestrator can confirm before proceeding.
/// Re-claiming the already-completed current phase is a no-op success.
pub fn mark_complete(
    state: &mut WorkflowState,
    catalog: &PhaseCatalog,
    ordinal: u8,
) -> Result<(), WorkflowError> {
    if ordinal != state.current_phase {
        tracing::warn!(
            session_id = %state.session_id,
            requested = ordinal,
            current = state.current_phase,
            "completion claim rejected: wrong phase"
        );
        return Err(WorkflowError::WrongPhase {
            requested: ordinal,
            current: state.current_phase,
        });
    }

    let definition = definition_or_corrupt(state, catalog, ordinal)?;

    let used = state.tools_used_in(ordinal);
    let missing: Vec<String> = definition
        .required_tools
        .iter()
        .filter(|tool| !used.contains(*tool))
        .cloned()
        .collect();
    if !missing.is_empty() {
        tracing::warn!(
            session_id = %state.session_id,
            phase = ordinal,
            missing = ?missing,
            "completion claim rejected: required tools not used"
        );
        return Err(WorkflowError::ToolsIncomplete {
            phase: ordinal,
            missing,
        });
    }

    state.completed_phases.insert(ordinal);
    tracing::debug!(session_id = %state.session_id, phase = ordinal, "phase marked complete");
    Ok(())
}

/// Advance the cursor to the next phase
///
/// Requires the current phase to be marked complete and the workflow not to
/// be at its final phase. Increments the cursor by exactly 1.
pub fn advance(state: &mut WorkflowState, catalog: &PhaseCatalog) -> Result<(), WorkflowError> {
    if !state.completed_phases.contains(&state.current_phase) {
        return Err(WorkflowError::PhaseNotComplete {
            phase: state.current_phase,
        });
    }
    if state.current_phase >= state.max_phases {
        return Err(WorkflowError::WorkflowFinished);
    }

    let next = state.current_phase + 1;
    // Referential integrity: the cursor must always resolve in the catalog
    definition_or_corrupt(state, catalog, next)?;

    state.current_phase = next;
    tracing::debug!(session_id = %state.session_id, phase = next, "advanced to next phase");
    Ok(())
}

/// Catalog entry for the phase under the cursor
pub fn current_phase_view<'a>(
    state: &WorkflowState,
    catalog: &'a PhaseCatalog,
) -> Result<&'a PhaseDefinition, WorkflowError> {
    catalog
        .definition_of(state.current_phase)
        .ok_or_else(|| corrupt(state, state.current_phase))
}

/// Percent of phases completed, rounded to the nearest integer
pub fn percent_complete(state: &WorkflowState) -> u8 {
    if state.max_phases == 0 {
        return 0;
    }
    let ratio = state.completed_phases.len() as f64 / state.max_phases as f64;
    (ratio * 100.0).round() as u8
}

/// Current-phase required tools not yet recorded as used
///
/// Empty once the workflow is finished.
pub fn required_tools_remaining(
    state: &WorkflowState,
    catalog: &PhaseCatalog,
) -> Result<BTreeSet<String>, WorkflowError> {
    if state.is_finished() {
        return Ok(BTreeSet::new());
    }

    let definition = current_phase_view(state, catalog)?;
    let used = state.tools_used_in(state.current_phase);
    Ok(definition
        .required_tools
        .iter()
        .filter(|tool| !used.contains(*tool))
        .cloned()
        .collect())
}

/// Assemble the full derived view returned by state-reading tools
pub fn workflow_view(
    state: &WorkflowState,
    catalog: &PhaseCatalog,
) -> Result<WorkflowView, WorkflowError> {
    let phase = current_phase_view(state, catalog)?.clone();
    let remaining = required_tools_remaining(state, catalog)?;

    Ok(WorkflowView {
        session_id: state.session_id.clone(),
        workflow_type: state.workflow_type,
        current_phase: state.current_phase,
        max_phases: state.max_phases,
        completed_phases: state.completed_phases.iter().copied().collect(),
        percent_complete: percent_complete(state),
        is_active: state.is_active(),
        is_finished: state.is_finished(),
        phase,
        required_tools_remaining: remaining.into_iter().collect(),
    })
}

fn definition_or_corrupt<'a>(
    state: &WorkflowState,
    catalog: &'a PhaseCatalog,
    ordinal: u8,
) -> Result<&'a PhaseDefinition, WorkflowError> {
    catalog
        .definition_of(ordinal)
        .ok_or_else(|| corrupt(state, ordinal))
}

fn corrupt(state: &WorkflowState, ordinal: u8) -> WorkflowError {
    // Unreachable while the invariants hold; fatal for the session, never
    // auto-repaired. Log the full state for diagnosis.
    tracing::error!(
        session_id = %state.session_id,
        ordinal,
        state = ?state,
        "phase ordinal has no catalog entry"
    );
    WorkflowError::CorruptState(format!(
        "phase {} has no catalog entry (session {})",
        ordinal, state.session_id
    ))
}
