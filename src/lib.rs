//! Demo sandbox state engine
//!
//! Composes page content, layout, background, glass and industry skins from
//! several override sources, and persists each demo's draft to per-browser
//! style key/value storage with debounced writes and schema versioning.

#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod content;
pub mod demos;
pub mod effects;
pub mod funnel;
pub mod industry;
pub mod sandbox;
pub mod storage;
