//! Application state shared by all handlers.

use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::{Remuxer, StreamProbe};
use tubely_storage::Storage;

use crate::auth::JwtService;
use crate::services::{SigningService, ThumbnailService, VideoIngestService};

pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoRepository>,
    pub jwt: JwtService,
    pub ingest: VideoIngestService,
    pub thumbnails: ThumbnailService,
    pub signer: SigningService,
}

impl AppState {
    /// Wire the services from their collaborators.
    ///
    /// The probe and remuxer are injected so tests can run without ffmpeg installed.
    pub fn new(
        config: Config,
        videos: Arc<dyn VideoRepository>,
        storage: Arc<dyn Storage>,
        probe: Arc<dyn StreamProbe>,
        remuxer: Arc<dyn Remuxer>,
    ) -> Self {
        let jwt = JwtService::new(config.jwt_secret(), config.jwt_issuer());
        let ingest = VideoIngestService::new(
            &config.media,
            probe,
            remuxer,
            storage.clone(),
            videos.clone(),
        );
        let thumbnails = ThumbnailService::new(&config.media, storage.clone(), videos.clone());
        let signer = SigningService::new(storage, config.presigned_url_expiry());

        Self {
            config,
            videos,
            jwt,
            ingest,
            thumbnails,
            signer,
        }
    }
}
