use std::collections::BTreeMap;

use crate::view_model::{AppViewModel, FlowRowView, SlotView};

pub type FlowId = u64;

/// One of the three result images produced by a prediction.
///
/// Each slot owns the fixed endpoint path it is fetched from; the paths
/// are part of the server contract and never vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResultSlot {
    Primary,
    Segmentation,
    Depth,
}

impl ResultSlot {
    pub const ALL: [ResultSlot; 3] = [
        ResultSlot::Primary,
        ResultSlot::Segmentation,
        ResultSlot::Depth,
    ];

    pub fn endpoint_path(self) -> &'static str {
        match self {
            ResultSlot::Primary => "/currentimage",
            ResultSlot::Segmentation => "/outsemseg",
            ResultSlot::Depth => "/outdepth",
        }
    }
}

/// Opaque success/failure signal from the upload request. The response
/// body is never inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Accepted,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Displayed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    Uploading,
    Fetching,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FlowState {
    file: String,
    phase: FlowPhase,
    // Slot results still outstanding while in FlowPhase::Fetching.
    pending_slots: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    next_flow_id: FlowId,
    flows: BTreeMap<FlowId, FlowState>,
    // The three display slots. Overlapping flows race to write these;
    // the last-resolving fetch wins.
    slot_sources: BTreeMap<ResultSlot, String>,
    input_closed: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            slots: ResultSlot::ALL
                .iter()
                .map(|&slot| SlotView {
                    slot,
                    source: self.slot_sources.get(&slot).cloned(),
                })
                .collect(),
            flows: self
                .flows
                .iter()
                .map(|(&flow_id, flow)| FlowRowView {
                    flow_id,
                    file: flow.file.clone(),
                    phase: flow.phase,
                })
                .collect(),
            dirty: self.dirty,
        }
    }

    /// True once stdin has closed and no flow is still in flight.
    pub fn finished(&self) -> bool {
        self.input_closed && self.flows.is_empty()
    }

    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    pub(crate) fn begin_flow(&mut self, file: String) -> FlowId {
        self.next_flow_id += 1;
        let flow_id = self.next_flow_id;
        self.flows.insert(
            flow_id,
            FlowState {
                file,
                phase: FlowPhase::Uploading,
                pending_slots: 0,
            },
        );
        self.dirty = true;
        flow_id
    }

    /// Moves an uploading flow into the fetching phase. Returns false for
    /// unknown flows or flows already past the upload.
    pub(crate) fn mark_fetching(&mut self, flow_id: FlowId) -> bool {
        match self.flows.get_mut(&flow_id) {
            Some(flow) if flow.phase == FlowPhase::Uploading => {
                flow.phase = FlowPhase::Fetching;
                flow.pending_slots = ResultSlot::ALL.len();
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    /// Drops a flow whose upload failed. Returns false for unknown flows
    /// or flows already fetching.
    pub(crate) fn fail_flow(&mut self, flow_id: FlowId) -> bool {
        match self.flows.get(&flow_id) {
            Some(flow) if flow.phase == FlowPhase::Uploading => {
                self.flows.remove(&flow_id);
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    /// Records one slot result for a fetching flow. A displayed result
    /// overwrites the slot source unconditionally; a failed one leaves
    /// the prior source untouched. The flow is dropped once all three
    /// slots have resolved.
    pub(crate) fn apply_fetch(
        &mut self,
        flow_id: FlowId,
        slot: ResultSlot,
        outcome: FetchOutcome,
    ) -> bool {
        let Some(flow) = self.flows.get_mut(&flow_id) else {
            return false;
        };
        if flow.phase != FlowPhase::Fetching || flow.pending_slots == 0 {
            return false;
        }
        flow.pending_slots -= 1;
        if flow.pending_slots == 0 {
            self.flows.remove(&flow_id);
        }
        if outcome == FetchOutcome::Displayed {
            self.slot_sources
                .insert(slot, slot.endpoint_path().to_string());
        }
        self.dirty = true;
        true
    }

    pub(crate) fn close_input(&mut self) {
        self.input_closed = true;
        self.dirty = true;
    }
}
