pub mod signing;
pub mod upload;

pub use signing::SigningService;
pub use upload::{IngestError, IngestStage, ThumbnailService, VideoIngestService};
