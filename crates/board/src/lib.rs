//! Sales board — live sale broadcast with history replay.

pub mod api;
pub mod auth;
pub mod broadcast;
pub mod config;
