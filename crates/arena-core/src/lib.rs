pub mod codec;
pub mod config;
pub mod engine;
pub mod types;

pub use codec::{CodecError, decode_moves, encode_moves};
pub use config::ArenaConfig;
pub use engine::GameEngine;
pub use types::*;
