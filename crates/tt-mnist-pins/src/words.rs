//! Control, status and whole-pin-set words.

use crate::batch::PixelBatch;
use crate::pins::{control, status};
use std::fmt;

/// Control byte presented on `uio_in`. Only bit 0 (`start`) is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ControlWord(u8);

impl ControlWord {
    /// Start deasserted, reserved bits zero.
    pub const IDLE: Self = Self(0);
    /// Start asserted.
    pub const START: Self = Self(control::START);

    /// Build a control word from the start level.
    #[must_use]
    pub const fn with_start(start: bool) -> Self {
        if start {
            Self::START
        } else {
            Self::IDLE
        }
    }

    /// Decode a raw control byte; reserved bits are dropped.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw & control::DEFINED)
    }

    /// Raw bus value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Level of the start bit.
    #[must_use]
    pub const fn start(self) -> bool {
        self.0 & control::START != 0
    }
}

/// Status byte read from `uo_out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatusWord(u8);

impl StatusWord {
    /// Decode a raw output byte.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Compose a status byte. `prediction` is truncated to 4 bits.
    #[must_use]
    pub const fn compose(prediction: u8, done: bool, busy: bool) -> Self {
        let mut raw = prediction & status::PREDICTION_MASK;
        if done {
            raw |= status::DONE;
        }
        if busy {
            raw |= status::BUSY;
        }
        Self(raw)
    }

    /// Raw bus value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Predicted class, bits 0–3 (0..=15; only 0..=9 are meaningful).
    #[must_use]
    pub const fn prediction(self) -> u8 {
        self.0 & status::PREDICTION_MASK
    }

    /// Bit 4.
    #[must_use]
    pub const fn done(self) -> bool {
        self.0 & status::DONE != 0
    }

    /// Bit 5. Informational only; nothing in the protocol waits on it.
    #[must_use]
    pub const fn busy(self) -> bool {
        self.0 & status::BUSY != 0
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:02x} (prediction={} done={} busy={})",
            self.0,
            self.prediction(),
            u8::from(self.done()),
            u8::from(self.busy())
        )
    }
}

/// Every input pin of the wrapper, as presented before a rising edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputPins {
    /// `ena`: held high while the design is selected.
    pub enable: bool,
    /// `rst_n`: active-low reset.
    pub reset_n: bool,
    /// `ui_in`: pixel batch.
    pub input: PixelBatch,
    /// `uio_in`: control word.
    pub control: ControlWord,
}

impl InputPins {
    /// Pins as the reset sequence sets them: enabled, in reset, buses zero.
    pub const RESET: Self = Self {
        enable: true,
        reset_n: false,
        input: PixelBatch::ZERO,
        control: ControlWord::IDLE,
    };

    /// True when the device is enabled and out of reset.
    #[must_use]
    pub const fn running(&self) -> bool {
        self.enable && self.reset_n
    }
}

impl Default for InputPins {
    fn default() -> Self {
        Self::RESET
    }
}
