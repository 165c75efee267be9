use crate::{FlowId, FlowPhase, ResultSlot};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub slots: Vec<SlotView>,
    pub flows: Vec<FlowRowView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotView {
    pub slot: ResultSlot,
    /// Endpoint path most recently displayed in this slot, if any.
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRowView {
    pub flow_id: FlowId,
    pub file: String,
    pub phase: FlowPhase,
}
