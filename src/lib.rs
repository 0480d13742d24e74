pub mod app;
pub mod audio;
pub mod audio_io;
pub mod buffer;
pub mod error;
pub mod ledger;
pub mod selection;
pub mod splice;
pub mod wave;
pub mod workflow;

pub use app::{SpliceWaveApp, StartupConfig};
pub use buffer::SampleBuffer;
pub use error::SpliceError;
pub use ledger::UsedFileLedger;
pub use selection::Selection;
pub use splice::SpliceResult;
