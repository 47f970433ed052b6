pub mod backend;
pub mod cpal_backend;
pub mod error;
pub mod resampler;
pub mod session;
pub mod wav_sink;

pub use backend::{AudioBackend, PlaybackHandle, RecorderSettings, RecordingHandle};
pub use cpal_backend::CpalBackend;
pub use error::{AudioError, AudioResult};
pub use session::RecordingSession;
