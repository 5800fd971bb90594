pub mod cursor;
pub mod interactions;
pub mod merger;
pub mod optimistic;
pub mod profile;
pub mod tracker;
