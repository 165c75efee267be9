//! Predict core: pure flow state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, ALERT_TEXT, INDICATOR_TEXT};
pub use msg::Msg;
pub use state::{AppState, FetchOutcome, FlowId, FlowPhase, ResultSlot, UploadOutcome};
pub use update::update;
pub use view_model::{AppViewModel, FlowRowView, SlotView};
