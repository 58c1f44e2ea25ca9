pub mod game;
pub mod queue;
