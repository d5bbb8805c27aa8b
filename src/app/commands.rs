//! Operator mode selection.
//!
//! The operator picks a top-level mode (0 = manual, 1 = automatic) and,
//! for manual mode, a sub-mode (0 = single-shot, 1 = continuous).
//! Automatic mode always measures continuously.  Codes outside `{0, 1}`
//! are rejected rather than silently ignored.

use core::fmt;

use crate::error::ModeError;

const MODE_MANUAL: i32 = 0;
const MODE_AUTOMATIC: i32 = 1;
const SUB_SINGLE_SHOT: i32 = 0;
const SUB_CONTINUOUS: i32 = 1;

/// The control mode the dispatcher runs this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    ManualSingleShot = 0,
    ManualContinuous = 1,
    Automatic = 2,
}

impl Mode {
    /// Build a mode from the operator's integer codes.
    ///
    /// Automatic mode does not need a sub-mode; if one is given it must
    /// still be in range.
    pub fn from_codes(mode: i32, sub_mode: Option<i32>) -> Result<Self, ModeError> {
        match sub_mode {
            Some(sub) if sub != SUB_SINGLE_SHOT && sub != SUB_CONTINUOUS => {
                return Err(ModeError::InvalidSubMode(sub));
            }
            _ => {}
        }

        match (mode, sub_mode) {
            (MODE_AUTOMATIC, _) => Ok(Self::Automatic),
            (MODE_MANUAL, Some(SUB_SINGLE_SHOT)) => Ok(Self::ManualSingleShot),
            (MODE_MANUAL, Some(_)) => Ok(Self::ManualContinuous),
            (MODE_MANUAL, None) => Err(ModeError::MissingSubMode),
            (other, _) => Err(ModeError::InvalidMode(other)),
        }
    }

    /// Parse a console line such as `"0 1"` or `"1"`.
    ///
    /// Whitespace and commas both separate the codes.
    pub fn parse(line: &str) -> Result<Self, ModeError> {
        let mut codes = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|tok| !tok.is_empty())
            .map(|tok| tok.parse::<i32>().map_err(|_| ModeError::Malformed));

        let mode = codes.next().ok_or(ModeError::Malformed)??;
        let sub_mode = codes.next().transpose()?;
        if codes.next().is_some() {
            return Err(ModeError::Malformed);
        }
        Self::from_codes(mode, sub_mode)
    }

    /// Whether this mode drives the continuous transition table.
    pub fn uses_continuous_table(self) -> bool {
        !matches!(self, Self::ManualSingleShot)
    }

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::ManualSingleShot),
            1 => Some(Self::ManualContinuous),
            2 => Some(Self::Automatic),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ManualSingleShot => "manual/single-shot",
            Self::ManualContinuous => "manual/continuous",
            Self::Automatic => "automatic",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
