// Game engine: item generation, the lookahead queue and the session state
// machine. The terminal front-end in main.rs is one consumer of `Game`.

pub mod config;
pub mod engine;
pub mod generator;
pub mod model;
pub mod render;
pub mod session;
