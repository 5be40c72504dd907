//! Split calculator: divides a total compensation between the covering walker
//! and the original owner.
//!
//! Amounts are integer minor currency units (cents). The covering side is
//! floored and the original side takes the remainder, so the two halves always
//! reconcile exactly to the total.

/// Result of splitting a total compensation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    /// Amount owed to the covering walker (cents)
    pub covering: i64,
    /// Amount retained by the original owner (cents)
    pub original: i64,
}

/// Split `total_compensation` according to the covering walker's percentage.
///
/// Pure and total for `covering_percentage` in 0-100; out-of-range percentages
/// are rejected upstream by the share ledger, never here.
pub fn calculate_split(total_compensation: i64, covering_percentage: u8) -> Split {
    let covering = total_compensation * i64::from(covering_percentage) / 100;
    let original = total_compensation - covering;
    Split { covering, original }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_splits() {
        assert_eq!(
            calculate_split(5000, 0),
            Split {
                covering: 0,
                original: 5000
            }
        );
        assert_eq!(
            calculate_split(5000, 100),
            Split {
                covering: 5000,
                original: 0
            }
        );
        assert_eq!(
            calculate_split(5000, 60),
            Split {
                covering: 3000,
                original: 2000
            }
        );
    }

    #[test]
    fn test_zero_total() {
        assert_eq!(
            calculate_split(0, 50),
            Split {
                covering: 0,
                original: 0
            }
        );
    }

    #[test]
    fn test_remainder_goes_to_original_owner() {
        // 1/3 of 100 cents floors to 33, leaving 67 for the owner
        let split = calculate_split(100, 33);
        assert_eq!(split.covering, 33);
        assert_eq!(split.original, 67);

        // odd totals never lose a cent
        let split = calculate_split(999, 50);
        assert_eq!(split.covering, 499);
        assert_eq!(split.original, 500);
    }

    #[test]
    fn test_split_reconciliation() {
        // covering + original == total for every percentage over a spread of totals
        for total in [0i64, 1, 7, 99, 100, 101, 2500, 5000, 9999, 1_000_003] {
            for percentage in 0..=100u8 {
                let split = calculate_split(total, percentage);
                assert_eq!(
                    split.covering + split.original,
                    total,
                    "split of {} at {}% must reconcile",
                    total,
                    percentage
                );
                assert!(split.covering >= 0);
                assert!(split.original >= 0);
            }
        }
    }
}
