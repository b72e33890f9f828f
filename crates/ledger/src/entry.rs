//! Raw entry input and margin derivation.

use api_types::BoxType;
use api_types::box_entry::BoxEntryNew;
use chrono::NaiveDate;

use crate::error::{LedgerError, Result};

/// Reference sale price per box, in MAD.
///
/// Process-wide constant: entries store the value in effect when they were
/// written; changing it never recomputes stored rows.
pub const UNIT_COST: f64 = 640.0;

/// The four user-supplied fields of an entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawEntry {
    pub date: NaiveDate,
    pub box_type: BoxType,
    pub number_of_boxes: i64,
    pub total_cost: f64,
}

impl RawEntry {
    /// Rejects inputs the margin derivation is undefined for.
    pub fn validate(&self) -> Result<()> {
        if self.number_of_boxes <= 0 {
            return Err(LedgerError::InvalidEntry(
                "number of boxes must be > 0".to_string(),
            ));
        }
        if !self.total_cost.is_finite() || self.total_cost < 0.0 {
            return Err(LedgerError::InvalidEntry(
                "total cost must be a finite amount >= 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Computes the derived fields and builds the full record to persist.
    pub fn derive(&self) -> Result<BoxEntryNew> {
        self.validate()?;

        let count = self.number_of_boxes as f64;
        Ok(BoxEntryNew {
            date: self.date,
            box_type: self.box_type,
            number_of_boxes: self.number_of_boxes,
            total_cost: self.total_cost,
            unit_cost: UNIT_COST,
            unit_margin: UNIT_COST - self.total_cost / count,
            total_margin: UNIT_COST * count - self.total_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(number_of_boxes: i64, total_cost: f64) -> RawEntry {
        RawEntry {
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            box_type: BoxType::NormalBox,
            number_of_boxes,
            total_cost,
        }
    }

    #[test]
    fn margins_match_the_reference_example() {
        let derived = raw(10, 5000.0).derive().unwrap();
        assert_eq!(derived.unit_cost, 640.0);
        assert_eq!(derived.unit_margin, 140.0);
        assert_eq!(derived.total_margin, 1400.0);
    }

    #[test]
    fn margins_are_exact_for_fractional_unit_cost() {
        let derived = raw(3, 1000.0).derive().unwrap();
        assert_eq!(derived.unit_margin, 640.0 - 1000.0 / 3.0);
        assert_eq!(derived.total_margin, 640.0 * 3.0 - 1000.0);
    }

    #[test]
    fn zero_count_is_rejected_before_derivation() {
        let err = raw(0, 100.0).derive().unwrap_err();
        assert!(matches!(err, LedgerError::InvalidEntry(_)));
    }

    #[test]
    fn bad_cost_is_rejected() {
        assert!(raw(1, -5.0).derive().is_err());
        assert!(raw(1, f64::NAN).derive().is_err());
        assert!(raw(1, f64::INFINITY).derive().is_err());
    }
}
