//! Test helpers: build AppState and router for integration tests.
//!
//! The router is the production one. Collaborators are swapped for in-process fakes: an
//! in-memory datastore whose writes can be made to fail, an in-memory object store that signs with a recognisable URL, and
//! fake ffprobe/ffmpeg implementations, so no database, network or media tools are needed.

#![allow(dead_code)]

pub mod auth;
pub mod datastore;
pub mod media;
pub mod storage;

use axum_test::TestServer;
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::setup::routes;
use tubely_api::AppState;
use tubely_core::models::{CreateVideoParams, Video};
use tubely_core::{BaseConfig, Config, MediaConfig, StorageBackend, StorageConfig};
use tubely_db::VideoRepository;
use tubely_processing::StreamInfo;
use tubely_storage::Storage;
use uuid::Uuid;

use datastore::TestVideoRepository;
use media::{FakeProbe, FakeRemuxer};
use storage::MemoryObjectStore;

pub const TEST_BUCKET: &str = "tubely-videos";
pub const PRESIGNED_EXPIRY_SECS: u64 = 300;

pub fn test_config(staging_dir: &TempDir) -> Config {
    Config {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
            log_format: "compact".to_string(),
            jwt_secret: auth::TEST_JWT_SECRET.to_string(),
            jwt_issuer: auth::TEST_JWT_ISSUER.to_string(),
            database_url: None,
            db_max_connections: 1,
            db_timeout_seconds: 5,
        },
        storage: StorageConfig {
            backend: StorageBackend::S3,
            s3_bucket: Some(TEST_BUCKET.to_string()),
            s3_region: Some("us-east-1".to_string()),
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: None,
            local_storage_base_url: None,
            presigned_url_expiry_secs: PRESIGNED_EXPIRY_SECS,
        },
        media: MediaConfig {
            staging_dir: Some(staging_dir.path().to_path_buf()),
            ..MediaConfig::default()
        },
    }
}

/// Test application: server plus handles on every fake collaborator.
pub struct TestApp {
    pub server: TestServer,
    pub videos: Arc<TestVideoRepository>,
    pub store: Arc<MemoryObjectStore>,
    pub probe: Arc<FakeProbe>,
    pub remuxer: Arc<FakeRemuxer>,
    pub staging_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Seed a draft video record owned by `user_id`.
    pub async fn create_video(&self, user_id: Uuid) -> Video {
        self.videos
            .create_video(CreateVideoParams {
                user_id,
                title: "Boots".to_string(),
                description: "A pair of boots".to_string(),
            })
            .await
            .expect("Failed to seed video")
    }

    pub async fn stored_video(&self, video_id: Uuid) -> Video {
        self.videos
            .get_video(video_id)
            .await
            .expect("Failed to read video")
            .expect("Video missing")
    }

    /// Number of entries left in the staging directory.
    pub fn staged_file_count(&self) -> usize {
        std::fs::read_dir(self.staging_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Builder for a [`TestApp`] with non-default fakes or limits.
pub struct TestAppBuilder {
    probe: FakeProbe,
    remuxer: FakeRemuxer,
    storage: Option<Arc<dyn Storage>>,
    configure: Box<dyn FnOnce(&mut Config)>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            probe: FakeProbe::returning(StreamInfo {
                width: 1920,
                height: 1080,
            }),
            remuxer: FakeRemuxer::working(),
            storage: None,
            configure: Box::new(|_| {}),
        }
    }
}

impl TestAppBuilder {
    pub fn probe(mut self, probe: FakeProbe) -> Self {
        self.probe = probe;
        self
    }

    pub fn remuxer(mut self, remuxer: FakeRemuxer) -> Self {
        self.remuxer = remuxer;
        self
    }

    /// Replace the in-memory object store (e.g. with `LocalStorage`).
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn configure(mut self, configure: impl FnOnce(&mut Config) + 'static) -> Self {
        self.configure = Box::new(configure);
        self
    }

    pub fn build(self) -> TestApp {
        let staging_dir = TempDir::new().expect("Failed to create staging dir");
        let mut config = test_config(&staging_dir);
        (self.configure)(&mut config);

        let videos = Arc::new(TestVideoRepository::new());
        let store = Arc::new(MemoryObjectStore::new(TEST_BUCKET));
        let probe = Arc::new(self.probe);
        let remuxer = Arc::new(self.remuxer);
        let storage: Arc<dyn Storage> = self
            .storage
            .unwrap_or_else(|| store.clone() as Arc<dyn Storage>);

        let state = Arc::new(AppState::new(
            config.clone(),
            videos.clone(),
            storage,
            probe.clone(),
            remuxer.clone(),
        ));
        let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
        let server = TestServer::new(app).expect("Failed to create test server");

        TestApp {
            server,
            videos,
            store,
            probe,
            remuxer,
            staging_dir,
        }
    }
}

/// Test app with default fakes: a 1920x1080 probe and a working remuxer.
pub fn spawn_app() -> TestApp {
    TestAppBuilder::default().build()
}
