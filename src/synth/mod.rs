// Click synthesis: timbres, voices, and the frame-accurate voice pool
// that runs inside the audio callback.

pub mod message;
pub mod pool;
pub mod sound;
pub mod voice;

pub use sound::Sound;
pub use voice::ClickSpec;
