//! Session type and audio resolution

pub mod audio_match;
pub mod session_type;

pub use audio_match::AudioPool;
pub use session_type::{ResolvedType, SessionType, SessionTypeTable};
