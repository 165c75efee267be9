use crate::{AppState, Effect, Msg, ResultSlot, UploadOutcome, ALERT_TEXT, INDICATOR_TEXT};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilePicked(raw) => {
            let file = raw.trim();
            if file.is_empty() {
                return (state, Vec::new());
            }
            // Every pick starts a fully independent flow. Overlapping
            // flows are not de-duplicated and race for the slots.
            let file = file.to_owned();
            let flow_id = state.begin_flow(file.clone());
            vec![
                Effect::ShowIndicator {
                    text: INDICATOR_TEXT.to_string(),
                },
                Effect::BeginUpload { flow_id, file },
            ]
        }
        Msg::UploadFinished { flow_id, outcome } => match outcome {
            UploadOutcome::Accepted => {
                if !state.mark_fetching(flow_id) {
                    return (state, Vec::new());
                }
                let mut effects = Vec::with_capacity(1 + ResultSlot::ALL.len());
                effects.push(Effect::HideIndicator);
                for slot in ResultSlot::ALL {
                    effects.push(Effect::FetchResult { flow_id, slot });
                }
                effects
            }
            UploadOutcome::Failed => {
                // No HideIndicator on failure; only a successful upload
                // clears the indicator.
                if !state.fail_flow(flow_id) {
                    return (state, Vec::new());
                }
                vec![Effect::Alert {
                    message: ALERT_TEXT.to_string(),
                }]
            }
        },
        Msg::ResultFetched {
            flow_id,
            slot,
            outcome,
        } => {
            state.apply_fetch(flow_id, slot, outcome);
            Vec::new()
        }
        Msg::InputClosed => {
            state.close_input();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
