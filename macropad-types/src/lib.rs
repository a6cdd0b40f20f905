//! # Macropad Types
//!
//! Fundamental type definitions shared by the macropad input engine and its
//! board wiring.
//!
//! ## Modules
//!
//! - [`action`] - Actions bound to buttons, dial detents and matrix cells
//! - [`keycode`] - HID keyboard page and consumer page key symbols
//! - [`modifier`] - Modifier byte of the boot keyboard report
//! - [`layout`] - US layout table used to type text

#![no_std]

pub mod action;
pub mod keycode;
pub mod layout;
pub mod modifier;
