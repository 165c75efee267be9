use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use flow_logging::flow_warn;

use crate::fetch::{FetchSettings, ReqwestFetcher, ResultFetcher};
use crate::persist::AtomicImageWriter;
use crate::upload::{ReqwestUploader, UploadSettings, Uploader};
use crate::{EngineEvent, FailureKind, FlowId, ResultSlot, SlotOutcome, TransferError};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub base_url: String,
    pub output_dir: PathBuf,
    pub upload: UploadSettings,
    pub fetch: FetchSettings,
}

impl EngineConfig {
    pub fn new(base_url: impl Into<String>, output_dir: PathBuf) -> Self {
        Self {
            base_url: base_url.into(),
            output_dir,
            upload: UploadSettings::default(),
            fetch: FetchSettings::default(),
        }
    }
}

enum EngineCommand {
    Submit { flow_id: FlowId, file: PathBuf },
    FetchSlot { flow_id: FlowId, slot: ResultSlot },
}

/// Handle to the IO worker thread. Commands are spawned independently on
/// the runtime, so slot fetches and overlapping flows run concurrently
/// with no ordering guarantee.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> (Self, mpsc::Receiver<EngineEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let uploader = Arc::new(ReqwestUploader::new(
            config.base_url.clone(),
            config.upload.clone(),
        ));
        let fetcher = Arc::new(ReqwestFetcher::new(
            config.base_url.clone(),
            config.fetch.clone(),
        ));
        let writer = Arc::new(AtomicImageWriter::new(config.output_dir.clone()));

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    flow_warn!("engine runtime failed to start: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let uploader = uploader.clone();
                let fetcher = fetcher.clone();
                let writer = writer.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(uploader.as_ref(), fetcher.as_ref(), &writer, command, event_tx)
                        .await;
                });
            }
        });

        (Self { cmd_tx }, event_rx)
    }

    pub fn submit(&self, flow_id: FlowId, file: impl Into<PathBuf>) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            flow_id,
            file: file.into(),
        });
    }

    pub fn fetch_slot(&self, flow_id: FlowId, slot: ResultSlot) {
        let _ = self.cmd_tx.send(EngineCommand::FetchSlot { flow_id, slot });
    }
}

async fn handle_command(
    uploader: &dyn Uploader,
    fetcher: &dyn ResultFetcher,
    writer: &Arc<AtomicImageWriter>,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Submit { flow_id, file } => {
            let result = uploader.upload(flow_id, &file).await;
            let _ = event_tx.send(EngineEvent::UploadCompleted { flow_id, result });
        }
        EngineCommand::FetchSlot { flow_id, slot } => {
            let result = match fetcher.fetch(flow_id, slot).await {
                Ok(image) => persist_image(writer, slot, image).await,
                Err(err) => Err(err),
            };
            let _ = event_tx.send(EngineEvent::ResultCompleted {
                flow_id,
                slot,
                result,
            });
        }
    }
}

async fn persist_image(
    writer: &Arc<AtomicImageWriter>,
    slot: ResultSlot,
    image: crate::FetchedImage,
) -> Result<SlotOutcome, TransferError> {
    let writer = writer.clone();
    let content_type = image.metadata.content_type.clone();
    let byte_len = image.metadata.byte_len;
    let written = tokio::task::spawn_blocking(move || writer.write(slot, &image.bytes))
        .await
        .map_err(|err| TransferError::new(FailureKind::Persist, err.to_string()))?;
    match written {
        Ok(path) => Ok(SlotOutcome {
            path,
            byte_len,
            content_type,
        }),
        Err(err) => Err(TransferError::new(FailureKind::Persist, err.to_string())),
    }
}
