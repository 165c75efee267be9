#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User selected a picture to run a prediction on.
    FilePicked(String),
    /// The upload request for a flow resolved.
    UploadFinished {
        flow_id: crate::FlowId,
        outcome: crate::UploadOutcome,
    },
    /// One of the three result fetches for a flow resolved.
    ResultFetched {
        flow_id: crate::FlowId,
        slot: crate::ResultSlot,
        outcome: crate::FetchOutcome,
    },
    /// The input source reached end of file; no further picks will arrive.
    InputClosed,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
