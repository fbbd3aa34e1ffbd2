//! Adapter implementations of the completion backend port.

pub mod scripted;
