use std::io::Write;
use std::sync::mpsc;
use std::thread;

use chrono::Utc;
use flow_logging::{flow_info, flow_warn};
use predict_core::{Effect, FetchOutcome, Msg, UploadOutcome};
use predict_engine::{EngineConfig, EngineEvent, EngineHandle};

use crate::config::AppConfig;

/// Translates core effects into engine commands and indicator/alert
/// output, and pumps engine events back into the message channel.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: &AppConfig, msg_tx: mpsc::Sender<Msg>) -> Self {
        let engine_config = EngineConfig::new(config.base_url.clone(), config.output_dir.clone());
        let (engine, events) = EngineHandle::new(engine_config);
        spawn_event_pump(events, msg_tx);
        Self { engine }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ShowIndicator { text } => {
                    show_indicator(&text);
                }
                Effect::HideIndicator => {
                    hide_indicator();
                }
                Effect::BeginUpload { flow_id, file } => {
                    flow_info!("flow {} submitting {}", flow_id, file);
                    self.engine.submit(flow_id, file);
                }
                Effect::FetchResult { flow_id, slot } => {
                    self.engine.fetch_slot(flow_id, slot);
                }
                Effect::Alert { message } => {
                    // Terminal stand-in for a blocking alert dialog.
                    eprintln!("!!! {message}");
                }
            }
        }
    }
}

fn show_indicator(text: &str) {
    let mut stderr = std::io::stderr();
    let _ = write!(stderr, "\r{text}");
    let _ = stderr.flush();
}

fn hide_indicator() {
    let mut stderr = std::io::stderr();
    // Overwrite the indicator text and return the cursor.
    let _ = write!(stderr, "\r{:width$}\r", "", width = 20);
    let _ = stderr.flush();
}

fn spawn_event_pump(events: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Ok(event) = events.recv() {
            let msg = match event {
                EngineEvent::UploadCompleted { flow_id, result } => {
                    let outcome = match result {
                        Ok(receipt) => {
                            flow_info!(
                                "flow {} prediction accepted (status {}) at {}",
                                flow_id,
                                receipt.status,
                                Utc::now().to_rfc3339()
                            );
                            UploadOutcome::Accepted
                        }
                        Err(err) => {
                            flow_warn!("flow {} upload failed: {}", flow_id, err);
                            UploadOutcome::Failed
                        }
                    };
                    Msg::UploadFinished { flow_id, outcome }
                }
                EngineEvent::ResultCompleted {
                    flow_id,
                    slot,
                    result,
                } => {
                    let outcome = match result {
                        Ok(written) => {
                            flow_info!(
                                "flow {} slot {:?} displayed from {} ({} bytes)",
                                flow_id,
                                slot,
                                written.path.display(),
                                written.byte_len
                            );
                            FetchOutcome::Displayed
                        }
                        Err(err) => {
                            // Per-slot failures are log-only; the slot
                            // keeps whatever it showed before.
                            flow_warn!("flow {} no image data for {:?}: {}", flow_id, slot, err);
                            FetchOutcome::Failed
                        }
                    };
                    Msg::ResultFetched {
                        flow_id,
                        slot,
                        outcome,
                    }
                }
            };
            if msg_tx.send(msg).is_err() {
                break;
            }
        }
    });
}
