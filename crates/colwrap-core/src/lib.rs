#![forbid(unsafe_code)]

//! Core: escape-sequence scanning and display width for colwrap.
//!
//! # Role in colwrap
//! `colwrap-core` is the measurement layer. It knows how wide a string is
//! on a terminal and where the invisible ANSI escape sequences inside it
//! start and stop. It knows nothing about lines, segments or wrapping.
//!
//! # Primary responsibilities
//! - **ansi**: locate CSI/OSC/DCS and two-byte escape sequences, strip them.
//! - **text_width**: cell width of graphemes and strings, with an
//!   ambiguous-width (CJK) policy taken from the locale or the environment.
//!
//! # How it fits in the system
//! `colwrap-text` segments and packs text. It calls into this crate for
//! every visual-width measurement and to keep escape sequences atomic.

pub mod ansi;
pub mod text_width;
