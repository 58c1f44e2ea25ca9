pub mod details;
pub mod item_card;
pub mod menu;
pub mod progress_bar;
pub mod summary;
