pub mod audio;
pub mod framing;
pub mod realtime;
pub mod stt;
pub mod translator;
