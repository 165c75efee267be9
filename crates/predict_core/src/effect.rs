/// Text shown by the loading indicator while an upload is in flight.
pub const INDICATOR_TEXT: &str = "computing...";

/// Fixed, non-descriptive message surfaced when an upload fails.
pub const ALERT_TEXT: &str = "prediction request failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show the external loading indicator with the given text.
    ShowIndicator { text: String },
    /// Clear the external loading indicator.
    HideIndicator,
    /// Start the multipart upload for a flow.
    BeginUpload { flow_id: crate::FlowId, file: String },
    /// Fetch one result slot for a flow.
    FetchResult {
        flow_id: crate::FlowId,
        slot: crate::ResultSlot,
    },
    /// Surface a blocking, user-visible notification.
    Alert { message: String },
}
