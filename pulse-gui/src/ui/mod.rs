//! # UI Module
//!
//! View composition for the Pulse readout and its command surface.

pub mod main_display;
