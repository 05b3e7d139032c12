//! Fine calculation.
//!
//! Pure functions over dates and the configured per-day rate. The same
//! calculation serves display (open borrowing, `as_of` = now) and
//! settlement (return date fixed, result persisted). Amounts are integer
//! cents in storage; [`to_amount`] converts at the API boundary.
//!
//! Growth is linear with no ceiling. Capping settled fines is a policy
//! decision that belongs to a payment/waiver flow, not to the calculator.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Whole calendar days late; zero for on-time and early returns.
pub fn days_overdue(due_date: DateTime<Utc>, as_of: DateTime<Utc>) -> i64 {
    (as_of.date_naive() - due_date.date_naive()).num_days().max(0)
}

/// Fine in cents for a return (or display) at `as_of`.
pub fn fine_cents(due_date: DateTime<Utc>, as_of: DateTime<Utc>, rate_cents_per_day: i64) -> i64 {
    days_overdue(due_date, as_of) * rate_cents_per_day
}

/// Cents to a two-decimal currency amount.
pub fn to_amount(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 15, 30, 0).unwrap()
    }

    #[test]
    fn on_time_return_is_free() {
        assert_eq!(fine_cents(at(2024, 1, 10), at(2024, 1, 10), 50), 0);
    }

    #[test]
    fn early_return_is_free() {
        assert_eq!(fine_cents(at(2024, 1, 10), at(2024, 1, 9), 50), 0);
    }

    #[test]
    fn three_days_late() {
        assert_eq!(fine_cents(at(2024, 1, 10), at(2024, 1, 13), 50), 150);
    }

    #[test]
    fn late_across_month_boundary() {
        assert_eq!(days_overdue(at(2024, 1, 30), at(2024, 2, 2)), 3);
    }

    #[test]
    fn same_day_ignores_time_of_day() {
        let due = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
        let returned = Utc.with_ymd_and_hms(2024, 1, 10, 23, 59, 0).unwrap();
        assert_eq!(days_overdue(due, returned), 0);
    }

    #[test]
    fn amount_conversion() {
        assert_eq!(to_amount(150).to_string(), "1.50");
        assert_eq!(to_amount(0).to_string(), "0.00");
    }
}
