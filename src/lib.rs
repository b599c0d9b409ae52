//! Topic-to-prose generation: prompt construction, pluggable AI text
//! providers, and the session state machine a front end drives.

pub mod api;
pub mod config;
pub mod constants;
pub mod content;
pub mod error;
pub mod export;
pub mod prompt;
pub mod state;
