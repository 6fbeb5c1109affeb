//! Hand tracking input: frame capture, landmark replay and gesture
//! classification.

pub mod capture;
pub mod classifier;
pub mod landmark;
pub mod pipeline;
pub mod replay;

pub use capture::{CaptureWorker, FrameMailbox, FrameSource, HandDetector, PassthroughDetector};
pub use classifier::{GestureClassifier, GestureConfig, classify};
pub use landmark::{Finger, Hand, HandJoint, LANDMARK_COUNT, Landmark};
pub use pipeline::GestureInput;
pub use replay::LandmarkReplay;
