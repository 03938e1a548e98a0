pub mod capture;
pub mod wav;

pub use capture::{AudioCapture, MicCapture};
pub use wav::encode_wav;
