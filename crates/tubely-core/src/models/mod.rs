pub mod video;

pub use video::{CreateVideoParams, Video, VideoResponse};
