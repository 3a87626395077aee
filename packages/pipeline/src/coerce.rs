//! Numeric coercion for measure cells.

/// Parses a measure cell, substituting 0 for anything that is not a
/// finite, non-negative number (blank, text, `NaN`, `inf`, negatives).
#[must_use]
pub fn coerce_measure(cell: &str) -> f64 {
    match cell.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        Ok(value) => {
            log::debug!("Measure {value} out of range, using 0");
            0.0
        }
        Err(_) => {
            if !cell.trim().is_empty() {
                log::debug!("Non-numeric measure {cell:?}, using 0");
            }
            0.0
        }
    }
}

/// Cell values read as "no value" in a label column: empty, plus the
/// usual spreadsheet and dataframe NA spellings. Matched exactly.
pub const MISSING_LABELS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a label cell holds no value.
#[must_use]
pub fn is_missing_label(cell: &str) -> bool {
    MISSING_LABELS.contains(&cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::float_cmp)]
    #[test]
    fn parses_numbers() {
        assert_eq!(coerce_measure("12"), 12.0);
        assert_eq!(coerce_measure(" 3.5 "), 3.5);
        assert_eq!(coerce_measure("1e2"), 100.0);
        assert_eq!(coerce_measure("0"), 0.0);
    }

    #[allow(clippy::float_cmp)]
    #[test]
    fn invalid_values_become_zero() {
        for cell in ["", "   ", "n/a", "twelve", "1,234", "NaN", "inf", "-4"] {
            assert_eq!(coerce_measure(cell), 0.0, "{cell:?}");
        }
    }

    #[test]
    fn na_spellings_are_missing_labels() {
        for cell in ["", "NA", "N/A", "NaN", "null", "None", "<NA>"] {
            assert!(is_missing_label(cell), "{cell:?}");
        }
    }

    #[test]
    fn real_labels_are_not_missing() {
        for cell in ["2023-05", "May 2023", " ", "none yet", "Nan Madol"] {
            assert!(!is_missing_label(cell), "{cell:?}");
        }
    }
}
