//! Scenario tests for the workflow engine and tool surface

#[cfg(test)]
#[allow(clippy::module_inception)]
mod tests {
    use crate::catalog::PhaseCatalog;
    use crate::handlers;
    use crate::params::*;
    use crate::store::WorkflowRegistry;
    use crate::types::{WorkflowError, WorkflowKind};
    use crate::{engine, gate};

    fn catalog() -> PhaseCatalog {
        PhaseCatalog::academic().unwrap()
    }

    async fn start_session(registry: &WorkflowRegistry, catalog: &PhaseCatalog, id: &str) {
        registry
            .create(id, catalog.kind(), catalog.max_phases())
            .await;
    }

    async fn run_phase_tools(
        registry: &WorkflowRegistry,
        catalog: &PhaseCatalog,
        id: &str,
        ordinal: u8,
    ) {
        let tools: Vec<String> = catalog
            .definition_of(ordinal)
            .unwrap()
            .required_tools
            .iter()
            .cloned()
            .collect();
        for tool in tools {
            registry
                .mutate(id, |state| gate::record_tool_use(state, catalog, ordinal, &tool))
                .await
                .unwrap();
        }
    }

    // Scenario A: fresh session
    #[tokio::test]
    async fn fresh_session_starts_at_phase_one() {
        let catalog = catalog();
        let registry = WorkflowRegistry::new();
        start_session(&registry, &catalog, "s-a").await;

        let state = registry.get("s-a").await.unwrap();
        assert_eq!(state.current_phase, 1);
        assert!(state.completed_phases.is_empty());
        assert_eq!(engine::percent_complete(&state), 0);
        assert_eq!(state.workflow_type, WorkflowKind::Academic8Phase);
        assert!(state.is_active());
    }

    // Scenario B: complete phase 1 after its tools
    #[tokio::test]
    async fn completing_phase_one_yields_thirteen_percent() {
        let catalog = catalog();
        let registry = WorkflowRegistry::new();
        start_session(&registry, &catalog, "s-b").await;

        run_phase_tools(&registry, &catalog, "s-b", 1).await;
        let (state, ()) = registry
            .mutate("s-b", |state| engine::mark_complete(state, &catalog, 1))
            .await
            .unwrap();

        assert_eq!(state.completed_phases.iter().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(engine::percent_complete(&state), 13);
        // Completion does not advance the cursor
        assert_eq!(state.current_phase, 1);
    }

    // Scenario C: completion claim before tools fails and mutates nothing
    #[tokio::test]
    async fn premature_completion_claim_is_rejected() {
        let catalog = catalog();
        let registry = WorkflowRegistry::new();
        start_session(&registry, &catalog, "s-c").await;

        let err = registry
            .mutate("s-c", |state| engine::mark_complete(state, &catalog, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::ToolsIncomplete { phase: 1, .. }));

        let state = registry.get("s-c").await.unwrap();
        assert!(state.completed_phases.is_empty());
        assert_eq!(state.current_phase, 1);
    }

    // Scenario D: advance after completion, then stall at phase 2
    #[tokio::test]
    async fn advance_moves_cursor_then_requires_next_completion() {
        let catalog = catalog();
        let registry = WorkflowRegistry::new();
        start_session(&registry, &catalog, "s-d").await;

        run_phase_tools(&registry, &catalog, "s-d", 1).await;
        registry
            .mutate("s-d", |state| engine::mark_complete(state, &catalog, 1))
            .await
            .unwrap();
        let (state, ()) = registry
            .mutate("s-d", |state| engine::advance(state, &catalog))
            .await
            .unwrap();
        assert_eq!(state.current_phase, 2);

        let err = registry
            .mutate("s-d", |state| engine::advance(state, &catalog))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::PhaseNotComplete { phase: 2 }));
    }

    // Scenario E: finished workflow
    #[tokio::test]
    async fn finished_workflow_is_terminal() {
        let catalog = catalog();
        let registry = WorkflowRegistry::new();
        start_session(&registry, &catalog, "s-e").await;

        for ordinal in 1..=8 {
            run_phase_tools(&registry, &catalog, "s-e", ordinal).await;
            registry
                .mutate("s-e", |state| engine::mark_complete(state, &catalog, ordinal))
                .await
                .unwrap();
            if ordinal < 8 {
                registry
                    .mutate("s-e", |state| engine::advance(state, &catalog))
                    .await
                    .unwrap();
            }
        }

        let state = registry.get("s-e").await.unwrap();
        assert!(state.is_finished());
        assert_eq!(engine::percent_complete(&state), 100);
        assert!(engine::required_tools_remaining(&state, &catalog)
            .unwrap()
            .is_empty());

        let err = registry
            .mutate("s-e", |state| engine::advance(state, &catalog))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::WorkflowFinished));
    }

    // Invariant: completed set stays within [1, cursor] across a full run
    #[tokio::test]
    async fn completed_phases_never_lead_the_cursor() {
        let catalog = catalog();
        let registry = WorkflowRegistry::new();
        start_session(&registry, &catalog, "s-inv").await;

        let mut last_percent = 0;
        for ordinal in 1..=8 {
            run_phase_tools(&registry, &catalog, "s-inv", ordinal).await;
            let (state, ()) = registry
                .mutate("s-inv", |state| engine::mark_complete(state, &catalog, ordinal))
                .await
                .unwrap();

            assert!(state
                .completed_phases
                .iter()
                .all(|&p| p >= 1 && p <= state.current_phase));

            let percent = engine::percent_complete(&state);
            assert!(percent >= last_percent);
            last_percent = percent;

            if ordinal < 8 {
                registry
                    .mutate("s-inv", |state| engine::advance(state, &catalog))
                    .await
                    .unwrap();
            }
        }
    }

    // ========================================================================
    // Handler-level tests (error mapping and responses)
    // ========================================================================

    #[tokio::test]
    async fn start_workflow_handler_is_idempotent() {
        let catalog = catalog();
        let registry = WorkflowRegistry::new();

        let params = StartWorkflowParams {
            session_id: "chat-1".to_string(),
            workflow_type: None,
        };
        handlers::start_workflow(&registry, &catalog, params.clone())
            .await
            .unwrap();

        // Make progress, then start again: state must survive
        registry
            .mutate("chat-1", |state| {
                gate::record_tool_use(state, &catalog, 1, "brainstorm_topics")
            })
            .await
            .unwrap();
        handlers::start_workflow(&registry, &catalog, params)
            .await
            .unwrap();

        let state = registry.get("chat-1").await.unwrap();
        assert!(state.tools_used_in(1).contains("brainstorm_topics"));
    }

    #[tokio::test]
    async fn start_workflow_rejects_unknown_type() {
        let catalog = catalog();
        let registry = WorkflowRegistry::new();

        let err = handlers::start_workflow(
            &registry,
            &catalog,
            StartWorkflowParams {
                session_id: "chat-2".to_string(),
                workflow_type: Some("five-paragraph".to_string()),
            },
        )
        .await
        .unwrap_err();
        assert!(err.message.contains("Unsupported workflow type"));
    }

    #[tokio::test]
    async fn handlers_reject_unknown_sessions() {
        let catalog = catalog();
        let registry = WorkflowRegistry::new();

        let err = handlers::workflow_progress(
            &registry,
            &catalog,
            WorkflowProgressParams {
                session_id: "ghost".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(err.message.contains("Unknown session"));

        let err = handlers::advance_phase(
            &registry,
            &catalog,
            AdvancePhaseParams {
                session_id: "ghost".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(err.message.contains("Unknown session"));
    }

    #[tokio::test]
    async fn record_tool_use_handler_defaults_to_current_phase() {
        let catalog = catalog();
        let registry = WorkflowRegistry::new();
        start_session(&registry, &catalog, "chat-3").await;

        handlers::record_tool_use(
            &registry,
            &catalog,
            RecordToolUseParams {
                session_id: "chat-3".to_string(),
                tool_id: "assess_scope".to_string(),
                phase: None,
            },
        )
        .await
        .unwrap();

        let state = registry.get("chat-3").await.unwrap();
        assert!(state.tools_used_in(1).contains("assess_scope"));
    }

    #[tokio::test]
    async fn end_workflow_handler_discards_state() {
        let catalog = catalog();
        let registry = WorkflowRegistry::new();
        start_session(&registry, &catalog, "chat-4").await;

        let result = handlers::end_workflow(
            &registry,
            EndWorkflowParams {
                session_id: "chat-4".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(!result.is_error.unwrap_or(false));
        assert!(registry.get("chat-4").await.is_err());

        // Ending an already-ended session succeeds and reports removed=false
        let result = handlers::end_workflow(
            &registry,
            EndWorkflowParams {
                session_id: "chat-4".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(!result.is_error.unwrap_or(false));
    }

    #[tokio::test]
    async fn corrupt_cursor_surfaces_as_internal_error() {
        let catalog = catalog();
        let registry = WorkflowRegistry::new();
        start_session(&registry, &catalog, "chat-6").await;

        // Force a cursor with no catalog entry; views must fail hard
        registry
            .mutate("chat-6", |state| {
                state.current_phase = 42;
                Ok(())
            })
            .await
            .unwrap();

        let err = handlers::workflow_progress(
            &registry,
            &catalog,
            WorkflowProgressParams {
                session_id: "chat-6".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(err.message.contains("Corrupt workflow state"));
    }

    #[tokio::test]
    async fn list_phases_handler_returns_catalog() {
        let catalog = catalog();
        let result = handlers::list_phases(&catalog, ListPhasesParams {})
            .await
            .unwrap();
        assert!(!result.is_error.unwrap_or(false));
    }

    #[tokio::test]
    async fn check_tool_handler_reports_gate_decision() {
        let catalog = catalog();
        let registry = WorkflowRegistry::new();
        start_session(&registry, &catalog, "chat-5").await;

        // A phase-2 tool at phase 1 is denied but the call itself succeeds
        let result = handlers::check_tool(
            &registry,
            &catalog,
            CheckToolParams {
                session_id: "chat-5".to_string(),
                tool_id: "search_scholar".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(!result.is_error.unwrap_or(false));
    }
}
