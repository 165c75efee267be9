use std::io::BufRead;
use std::sync::mpsc;
use std::thread;

use flow_logging::flow_info;
use predict_core::{update, AppState, AppViewModel, FlowPhase, Msg};

use crate::config::AppConfig;
use crate::effects::EffectRunner;
use crate::logging;

/// Runs the viewer: each stdin line is a picked picture path; the loop
/// exits once stdin closes and every in-flight flow has resolved.
pub fn run() {
    let config = AppConfig::from_env();
    logging::initialize(config.log_destination);
    flow_info!(
        "predict viewer starting (server {}, output {})",
        config.base_url,
        config.output_dir.display()
    );
    println!("pick a picture: enter a file path per line (ctrl-d to quit)");

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(&config, msg_tx.clone());
    spawn_stdin_picker(msg_tx);

    let mut state = AppState::new();
    for msg in msg_rx.iter() {
        let (next, effects) = update(std::mem::take(&mut state), msg);
        state = next;
        runner.run(effects);
        if state.consume_dirty() {
            render(&state.view());
        }
        if state.finished() {
            break;
        }
    }
    flow_info!("predict viewer exiting");
}

fn spawn_stdin_picker(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if msg_tx.send(Msg::FilePicked(line)).is_err() {
                return;
            }
        }
        let _ = msg_tx.send(Msg::InputClosed);
    });
}

fn render(view: &AppViewModel) {
    for slot_view in &view.slots {
        let source = slot_view.source.as_deref().unwrap_or("-");
        println!("{:>12}: {}", format!("{:?}", slot_view.slot), source);
    }
    for flow in &view.flows {
        let phase = match flow.phase {
            FlowPhase::Uploading => "uploading",
            FlowPhase::Fetching => "fetching results",
        };
        println!("  flow {} ({}): {}", flow.flow_id, flow.file, phase);
    }
}
