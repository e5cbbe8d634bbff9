//! Phase catalog: the static, ordered definition of the workflow phases
//!
//! The catalog is immutable reference data, built once at server startup and
//! validated before use. Lookups never re-validate.

use std::collections::BTreeSet;

use crate::types::{PhaseDefinition, WorkflowError, WorkflowKind};

/// Validated, ordered phase table for one workflow kind
#[derive(Debug, Clone)]
pub struct PhaseCatalog {
    kind: WorkflowKind,
    phases: Vec<PhaseDefinition>,
}

impl PhaseCatalog {
    /// Build the built-in academic 8-phase catalog
    pub fn academic() -> Result<Self, WorkflowError> {
        Self::from_phases(WorkflowKind::Academic8Phase, academic_phases())
    }

    /// Validate and wrap a phase table
    ///
    /// Ordinals must form the contiguous sequence 1..=n with no gaps or
    /// duplicates, and every phase must carry at least one completion
    /// criterion. A phase with no criteria is a data error, not a
    /// trivially-completable phase.
    pub fn from_phases(
        kind: WorkflowKind,
        phases: Vec<PhaseDefinition>,
    ) -> Result<Self, WorkflowError> {
        if phases.is_empty() {
            return Err(WorkflowError::CorruptState(
                "phase catalog is empty".to_string(),
            ));
        }

        for (index, def) in phases.iter().enumerate() {
            let expected = (index + 1) as u8;
            if def.phase != expected {
                return Err(WorkflowError::CorruptState(format!(
                    "phase catalog ordinal mismatch: expected {} at position {}, found {}",
                    expected, index, def.phase
                )));
            }
            if def.completion_criteria.is_empty() {
                return Err(WorkflowError::CorruptState(format!(
                    "phase {} ({}) has no completion criteria",
                    def.phase, def.name
                )));
            }
        }

        Ok(Self { kind, phases })
    }

    /// The workflow kind this catalog drives
    pub fn kind(&self) -> WorkflowKind {
        self.kind
    }

    /// Number of phases
    pub fn max_phases(&self) -> u8 {
        self.phases.len() as u8
    }

    /// Look up a phase by ordinal
    pub fn definition_of(&self, ordinal: u8) -> Option<&PhaseDefinition> {
        if ordinal == 0 {
            return None;
        }
        self.phases.get((ordinal - 1) as usize)
    }

    /// All phases in order
    pub fn phases(&self) -> &[PhaseDefinition] {
        &self.phases
    }

    /// Union of every phase's required tools
    ///
    /// Tools outside this set are not phase-gated and are always admitted.
    pub fn gated_tools(&self) -> BTreeSet<&str> {
        self.phases
            .iter()
            .flat_map(|def| def.required_tools.iter().map(String::as_str))
            .collect()
    }
}

/// The built-in academic writing phases
///
/// Tool ids name agent-invokable actions; each phase lists the ones that
/// must run before the orchestrator may claim the phase complete.
fn academic_phases() -> Vec<PhaseDefinition> {
    vec![
        PhaseDefinition::new(
            1,
            "Topic Definition",
            "Choose and narrow the paper topic within the assignment constraints",
        )
        .with_tool("brainstorm_topics")
        .with_tool("assess_scope")
        .with_output("Topic statement")
        .with_output("Scope and audience summary")
        .with_criterion("Topic selected and narrowed to a workable scope")
        .with_criterion("Assignment constraints and audience identified"),
        PhaseDefinition::new(
            2,
            "Literature Review",
            "Survey existing scholarship and collect sources",
        )
        .with_tool("search_scholar")
        .with_tool("summarize_source")
        .with_tool("save_reference")
        .with_output("Annotated bibliography")
        .with_output("Source summary notes")
        .with_criterion("Key sources identified and summarized")
        .with_criterion("References saved with full citation data"),
        PhaseDefinition::new(
            3,
            "Research Question",
            "Formulate the thesis or research question the paper argues",
        )
        .with_tool("draft_thesis")
        .with_tool("evaluate_thesis")
        .with_output("Thesis statement")
        .with_criterion("Thesis is specific, arguable, and grounded in the reviewed literature"),
        PhaseDefinition::new(
            4,
            "Outline",
            "Structure the argument into sections and map evidence to claims",
        )
        .with_tool("build_outline")
        .with_output("Section-level outline with evidence mapping")
        .with_criterion("Every major claim has a section and supporting sources")
        .with_criterion("Outline reviewed against the thesis"),
        PhaseDefinition::new(
            5,
            "Drafting",
            "Write the full first draft section by section",
        )
        .with_tool("generate_draft")
        .with_tool("expand_section")
        .with_output("Complete first draft")
        .with_criterion("All outline sections drafted")
        .with_criterion("Draft meets the target length"),
        PhaseDefinition::new(
            6,
            "Evidence & Citations",
            "Integrate quotations and data, and build the bibliography",
        )
        .with_tool("insert_citation")
        .with_tool("format_bibliography")
        .with_output("Draft with in-text citations")
        .with_output("Formatted bibliography")
        .with_criterion("Every borrowed claim carries a citation")
        .with_criterion("Bibliography formatted in the required style"),
        PhaseDefinition::new(
            7,
            "Revision",
            "Revise for argument strength, clarity, and flow",
        )
        .with_tool("check_grammar")
        .with_tool("analyze_readability")
        .with_output("Revised draft")
        .with_criterion("Grammar and style issues resolved")
        .with_criterion("Argument reads coherently from introduction to conclusion"),
        PhaseDefinition::new(
            8,
            "Finalization",
            "Final integrity checks and formatting for submission",
        )
        .with_tool("check_plagiarism")
        .with_tool("format_document")
        .with_output("Submission-ready document")
        .with_criterion("Originality check passed")
        .with_criterion("Document formatted to the submission requirements"),
    ]
}
