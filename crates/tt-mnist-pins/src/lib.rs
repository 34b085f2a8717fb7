//! Pin contract model for the Tiny Tapeout MNIST accelerator.
//!
//! This crate has **no dependencies** and **no device access**. It is a pure
//! model of the wrapper's synchronous pin interface: which bits live on which
//! bus, how pixels are packed, how the status byte decodes, and the edge
//! counts the streaming protocol is built from.
//!
//! # Crate organisation
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`pins`] | Bus widths and bit definitions (`ui_in`, `uio_in`, `uo_out`, `ena`, `rst_n`) |
//! | [`frame`] | Image geometry: 64 pixels, 8×8, 2-bit intensity, 16 batches of 4 |
//! | [`batch`] | [`PixelBatch`]: 4 pixels packed into one input-bus byte |
//! | [`words`] | [`ControlWord`], [`StatusWord`], [`InputPins`] |
//! | [`timing`] | Protocol edge counts and the 5,000-cycle completion budget |
//!
//! # Pin map
//!
//! ```text
//! ui_in[7:0]   input bus    lane i = bits [2i+1:2i] = pixel 4k+i
//! uio_in[0]    control      start (level-sensitive)
//! uo_out[3:0]  status       predicted class (0..=9 meaningful)
//! uo_out[4]    status       done
//! uo_out[5]    status       busy
//! ena          enable       held high
//! rst_n        reset        active low, 2 edges per vector run
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod frame;
pub mod pins;
pub mod timing;
pub mod words;

pub use batch::PixelBatch;
pub use words::{ControlWord, InputPins, StatusWord};
