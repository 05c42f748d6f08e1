//! Tubely Processing Library
//!
//! Everything that happens to an upload between the HTTP body and object storage:
//! content-type validation, asset naming, local staging, stream inspection and the
//! fast-start remux. External tools (ffprobe, ffmpeg) sit behind the [`StreamProbe`] and
//! [`Remuxer`] traits so callers can substitute fakes.

pub mod error;
pub mod naming;
pub mod staging;
pub mod validator;
pub mod video;

pub use error::MediaToolError;
pub use naming::asset_filename;
pub use staging::{StagedFile, StagingArea};
pub use validator::{MediaValidator, ValidationError};
pub use video::{
    AspectClass, FfmpegRemuxer, FfprobeProbe, MediaToolConfig, Remuxer, StreamInfo, StreamProbe,
};
