//! CT Tactics - turn-based tactical combat core

pub mod battle;
pub mod command;
pub mod core;
pub mod data;
