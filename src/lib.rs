pub mod app;
pub mod board;
pub mod card;
pub mod collate;
pub mod config;
pub mod grid;
pub mod persist;
pub mod score;
pub mod state;
pub mod storage;
