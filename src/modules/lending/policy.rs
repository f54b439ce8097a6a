//! Fee rules: the deposit held at checkout and the late fee charged at return.

use libris_kernel::settings::LendingSettings;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LendingPolicy {
    opening_balance: i64,
    deposit: i64,
    overdraft_floor: i64,
    daily_late_fee: i64,
}

/// Late fee for one loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LateFee {
    /// Whole days the book was out; partial days do not count
    pub days: i64,
    pub amount: i64,
}

impl LendingPolicy {
    pub fn opening_balance(&self) -> i64 {
        self.opening_balance
    }

    pub fn deposit(&self) -> i64 {
        self.deposit
    }

    pub fn overdraft_floor(&self) -> i64 {
        self.overdraft_floor
    }

    /// A member may borrow while their balance is at or above the floor.
    pub fn may_borrow(&self, balance: i64) -> bool {
        balance >= self.overdraft_floor
    }

    pub fn late_fee(&self, checked_out_at: OffsetDateTime, returned_at: OffsetDateTime) -> LateFee {
        let days = (returned_at - checked_out_at).whole_days().max(0);
        LateFee {
            days,
            amount: days.saturating_mul(self.daily_late_fee),
        }
    }
}

impl From<&LendingSettings> for LendingPolicy {
    fn from(settings: &LendingSettings) -> Self {
        Self {
            opening_balance: settings.opening_balance,
            deposit: settings.deposit,
            overdraft_floor: settings.overdraft_floor,
            daily_late_fee: settings.daily_late_fee,
        }
    }
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self::from(&LendingSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::datetime, Duration};

    #[test]
    fn floor_is_inclusive() {
        let policy = LendingPolicy::default();
        assert!(policy.may_borrow(1000));
        assert!(policy.may_borrow(-500));
        assert!(!policy.may_borrow(-501));
        assert!(!policy.may_borrow(-600));
    }

    #[test]
    fn late_fee_counts_whole_days() {
        let policy = LendingPolicy::default();
        let out = datetime!(2024-03-01 10:00 UTC);

        assert_eq!(policy.late_fee(out, out + Duration::hours(23)).amount, 0);
        assert_eq!(
            policy.late_fee(out, out + Duration::days(3)),
            LateFee { days: 3, amount: 30 }
        );
        assert_eq!(
            policy.late_fee(out, out + Duration::days(3) + Duration::hours(23)),
            LateFee { days: 3, amount: 30 }
        );
    }

    #[test]
    fn clock_skew_never_credits() {
        let policy = LendingPolicy::default();
        let out = datetime!(2024-03-05 10:00 UTC);
        assert_eq!(
            policy.late_fee(out, out - Duration::days(2)),
            LateFee { days: 0, amount: 0 }
        );
    }

    #[test]
    fn rules_follow_settings() {
        let policy = LendingPolicy::from(&LendingSettings {
            opening_balance: 50,
            deposit: 20,
            overdraft_floor: 0,
            daily_late_fee: 3,
        });
        assert_eq!(policy.deposit(), 20);
        assert!(!policy.may_borrow(-1));
        let out = datetime!(2024-01-01 00:00 UTC);
        assert_eq!(policy.late_fee(out, out + Duration::days(2)).amount, 6);
    }
}
