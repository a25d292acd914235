//! Hearken Library
//!
//! Wake-word activated voice assistant: session state machine, command
//! dispatch, and the speech, lookup and logging adapters around them.

pub mod asr;
pub mod assistant;
pub mod audio;
pub mod browser;
pub mod command_log;
pub mod commands;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod processor;
pub mod responses;
pub mod session;
pub mod tts;
