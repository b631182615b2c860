// src/lib.rs

//! lotwatch: vehicle inventory change tracker

pub mod diff;
pub mod error;
pub mod fetch;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod scheduler;
pub mod tracker;
