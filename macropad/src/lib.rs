//! Input event engine for macropads.
//!
//! Buttons, rotary dials and a scanned key matrix are sampled once per poll
//! period. Each source owns a small state machine which turns raw samples
//! into press/release edges or dial turns, and every edge runs the one
//! [`Action`](macropad_types::action::Action) configured for it.
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![no_std]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
pub(crate) mod fmt;

pub mod button;
pub mod config;
pub mod dial;
pub mod dispatcher;
pub mod engine;
pub mod event;
pub mod expander;
pub mod hid;
pub mod input_device;
pub mod matrix;
pub mod mixer;

pub use engine::Macropad;
pub use macropad_types as types;
