pub mod decision;
pub mod powerup;
pub mod rules;
pub mod state;
pub mod summary;
