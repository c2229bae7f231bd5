use crate::boundary::BoundaryWarning;
use crate::error::{RevStampError, Result};

/// Largest value a version segment can hold (ushort max).
pub const MAX_REVISION: i64 = 65535;

/// Parses user supplied revision text.
///
/// # Returns
/// * `Ok(i64)` - The value, not yet range checked
/// * `Err` - If the text is not an integer
pub fn parse_revision(input: &str) -> Result<i64> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| RevStampError::invalid_revision("Revision value is not a number."))
}

/// Checks a revision against the legal range `0..=65535`.
///
/// Returns a [`BoundaryWarning::RevisionAtLimit`] when the value is exactly
/// the maximum, since the next increment will fail.
pub fn check_revision(value: i64) -> Result<Option<BoundaryWarning>> {
    if value < 0 {
        Err(RevStampError::invalid_revision(
            "Revision value must be 0 or greater.",
        ))
    } else if value > MAX_REVISION {
        Err(RevStampError::invalid_revision(
            "Revision value exceeded maximum allowable limit.",
        ))
    } else if value == MAX_REVISION {
        Ok(Some(BoundaryWarning::RevisionAtLimit { revision: value }))
    } else {
        Ok(None)
    }
}

/// Computes the revision that follows `current`, the digits of a version segment.
pub fn next_revision(current: &str) -> Result<i64> {
    parse_revision(current)?
        .checked_add(1)
        .ok_or_else(|| RevStampError::invalid_revision("Revision value is not a number."))
}
