//! Predict engine: HTTP upload/fetch IO and result persistence.
mod engine;
mod fetch;
mod persist;
mod types;
mod upload;

pub use engine::{EngineConfig, EngineHandle};
pub use fetch::{FetchSettings, ReqwestFetcher, ResultFetcher};
pub use persist::{ensure_output_dir, slot_filename, AtomicImageWriter, PersistError};
pub use types::{
    EngineEvent, FailureKind, FetchMetadata, FetchedImage, SlotOutcome, TransferError,
    UploadReceipt, UPLOAD_FIELD, UPLOAD_PATH,
};
pub use upload::{ReqwestUploader, UploadSettings, Uploader};

pub use predict_core::{FlowId, ResultSlot};
