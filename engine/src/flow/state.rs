//! The flow snapshot owned by [`super::FlowStore`].

use reframe_types::{
    AnchoredFrame, ClarityReflection, PrimerExercise, ReliefSubStage, Stage, Theme, Toast,
    WillingnessScore, WorkshopData,
};

/// Everything the stages render from. Only `journal` and `theme` survive a
/// module reset, and only they are persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowState {
    pub current_stage: Stage,
    pub willingness_score: WillingnessScore,
    pub openness_primer_attempts: u32,
    pub openness_primer_exercise: PrimerExercise,
    pub relief_sub_stage: ReliefSubStage,
    pub workshop: WorkshopData,
    pub clarity: ClarityReflection,
    /// Append-only. Entries are never removed by the flow.
    pub journal: Vec<AnchoredFrame>,
    pub exit_message: Option<String>,
    pub final_reinforcement_message: Option<String>,
    pub toast: Toast,
    pub theme: Theme,
}

impl FlowState {
    /// Fresh state that keeps the given journal and theme.
    #[must_use]
    pub fn with_persisted(journal: Vec<AnchoredFrame>, theme: Theme) -> Self {
        Self {
            journal,
            theme,
            ..Self::default()
        }
    }
}
