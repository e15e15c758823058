use crate::error::{BankError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::iter;

/// Interest contributions below this amount are dropped, per deposit.
pub const MIN_INTEREST_CONTRIBUTION: Decimal = dec!(1);

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// A movement paired with its timestamp and its position in the ledger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    /// Zero-based insertion index.
    pub index: usize,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
}

/// The ordered list of signed movements of one account.
///
/// Amounts and timestamps are kept in two parallel sequences that can only
/// grow together through [`Ledger::append`], so they always have the same
/// length. Every summary is derived from the movements on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    movements: Vec<Decimal>,
    dates: Vec<DateTime<Utc>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from existing parallel sequences.
    pub fn from_parts(movements: Vec<Decimal>, dates: Vec<DateTime<Utc>>) -> Result<Self> {
        if movements.len() != dates.len() {
            return Err(BankError::ValidationError(format!(
                "{} movements but {} movement dates",
                movements.len(),
                dates.len()
            )));
        }
        Ok(Self { movements, dates })
    }

    pub fn movements(&self) -> &[Decimal] {
        &self.movements
    }

    pub fn dates(&self) -> &[DateTime<Utc>] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.movements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    /// Records a movement. No policy is applied here; callers validate first.
    pub fn append(&mut self, amount: Decimal, date: DateTime<Utc>) {
        self.movements.push(amount);
        self.dates.push(date);
    }

    /// Fails if adding `amount` would push a summary out of the `Decimal` range.
    pub fn check_append(&self, amount: Decimal, rate: Decimal) -> Result<()> {
        let movements = self.movements.iter().copied().chain(iter::once(amount));
        if summaries_fit(movements, rate) {
            Ok(())
        } else {
            Err(BankError::TotalsOverflow(amount))
        }
    }

    /// [`Ledger::append`] guarded by [`Ledger::check_append`].
    pub fn try_append(&mut self, amount: Decimal, date: DateTime<Utc>, rate: Decimal) -> Result<()> {
        self.check_append(amount, rate)?;
        self.append(amount, date);
        Ok(())
    }

    /// Whether every summary of the stored movements is representable at `rate`.
    pub fn totals_fit(&self, rate: Decimal) -> bool {
        summaries_fit(self.movements.iter().copied(), rate)
    }

    pub fn balance(&self) -> Decimal {
        self.movements.iter().sum()
    }

    pub fn total_income(&self) -> Decimal {
        self.movements.iter().filter(|m| **m > Decimal::ZERO).sum()
    }

    /// Sum of withdrawals. The result is zero or negative.
    pub fn total_expenses(&self) -> Decimal {
        self.movements.iter().filter(|m| **m < Decimal::ZERO).sum()
    }

    /// Interest earned on deposits at `rate` percent.
    ///
    /// The minimum applies to each deposit's contribution, not to the total:
    /// a deposit earning less than [`MIN_INTEREST_CONTRIBUTION`] adds nothing.
    pub fn total_interest(&self, rate: Decimal) -> Decimal {
        self.movements
            .iter()
            .filter(|m| **m > Decimal::ZERO)
            .map(|deposit| *deposit * rate / dec!(100))
            .filter(|interest| *interest >= MIN_INTEREST_CONTRIBUTION)
            .sum()
    }

    /// Returns the movements in ascending order without touching stored order.
    pub fn sorted_view(&self) -> Vec<Decimal> {
        let mut view = self.movements.clone();
        view.sort();
        view
    }

    /// Movements in insertion order, each with its own date.
    pub fn entries(&self) -> impl Iterator<Item = Entry> + '_ {
        self.movements
            .iter()
            .zip(self.dates.iter())
            .enumerate()
            .map(|(index, (amount, date))| Entry {
                index,
                amount: *amount,
                date: *date,
            })
    }

    /// Same order as [`Ledger::sorted_view`], but entries keep their dates.
    pub fn sorted_entries(&self) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self.entries().collect();
        entries.sort_by(|a, b| a.amount.cmp(&b.amount));
        entries
    }
}

// Mirrors the folds in the summary methods, so a `true` here means none of
// them can overflow.
fn summaries_fit(movements: impl Iterator<Item = Decimal> + Clone, rate: Decimal) -> bool {
    let sums = |keep: fn(&Decimal) -> bool| {
        movements
            .clone()
            .filter(keep)
            .try_fold(Decimal::ZERO, |total, m| total.checked_add(m))
            .is_some()
    };
    let interest = movements
        .clone()
        .filter(|m| *m > Decimal::ZERO)
        .try_fold(Decimal::ZERO, |total, deposit| {
            let earned = deposit.checked_mul(rate)?.checked_div(dec!(100))?;
            if earned >= MIN_INTEREST_CONTRIBUTION {
                total.checked_add(earned)
            } else {
                Some(total)
            }
        });

    sums(|_: &Decimal| true)
        && sums(|m: &Decimal| *m > Decimal::ZERO)
        && sums(|m: &Decimal| *m < Decimal::ZERO)
        && interest.is_some()
}

/// Whole days between two instants, rounded to the nearest day.
pub fn days_since(date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (now - date).num_milliseconds().abs();
    (millis + MILLIS_PER_DAY / 2) / MILLIS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, day, 12, 0, 0).unwrap()
    }

    fn ledger_of(amounts: &[Decimal]) -> Ledger {
        let mut ledger = Ledger::new();
        for (i, amount) in amounts.iter().enumerate() {
            ledger.append(*amount, at(1 + i as u32));
        }
        ledger
    }

    #[test]
    fn test_empty_ledger_summaries() {
        let ledger = Ledger::new();
        assert_eq!(ledger.balance(), Decimal::ZERO);
        assert_eq!(ledger.total_income(), Decimal::ZERO);
        assert_eq!(ledger.total_expenses(), Decimal::ZERO);
        assert_eq!(ledger.total_interest(dec!(1.2)), Decimal::ZERO);
        assert!(ledger.sorted_view().is_empty());
    }

    #[test]
    fn test_from_parts_rejects_length_mismatch() {
        let result = Ledger::from_parts(vec![dec!(10), dec!(20)], vec![at(1)]);
        assert!(matches!(result, Err(BankError::ValidationError(_))));
    }

    #[test]
    fn test_append_keeps_sequences_aligned() {
        let mut ledger = Ledger::new();
        ledger.append(dec!(100), at(1));
        ledger.append(dec!(-40), at(2));

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.movements(), &[dec!(100), dec!(-40)]);
        assert_eq!(ledger.dates(), &[at(1), at(2)]);
        assert_eq!(ledger.balance(), dec!(60));
    }

    #[test]
    fn test_income_and_expenses() {
        let ledger = ledger_of(&[dec!(5000), dec!(3400), dec!(-150), dec!(-790)]);
        assert_eq!(ledger.total_income(), dec!(8400));
        assert_eq!(ledger.total_expenses(), dec!(-940));
        assert_eq!(
            ledger.total_income() + ledger.total_expenses(),
            ledger.balance()
        );
    }

    #[test]
    fn test_interest_drops_small_contributions() {
        // 50 * 1.2% = 0.6 is dropped, 200 * 1.2% = 2.4 is kept
        let ledger = ledger_of(&[dec!(50), dec!(200)]);
        assert_eq!(ledger.total_interest(dec!(1.2)), dec!(2.4));
    }

    #[test]
    fn test_interest_threshold_is_inclusive() {
        // 100 * 1% is exactly the minimum
        let ledger = ledger_of(&[dec!(100), dec!(-500)]);
        assert_eq!(ledger.total_interest(dec!(1)), dec!(1));
    }

    #[test]
    fn test_small_deposits_earn_nothing_even_in_aggregate() {
        let ledger = ledger_of(&[dec!(50), dec!(50), dec!(50), dec!(50)]);
        assert_eq!(ledger.total_interest(dec!(1.2)), Decimal::ZERO);
    }

    #[test]
    fn test_try_append_refuses_overflowing_balance() {
        let mut ledger = Ledger::new();
        ledger.try_append(Decimal::MAX, at(1), dec!(1)).unwrap();

        let result = ledger.try_append(Decimal::MAX, at(2), dec!(1));
        assert!(matches!(result, Err(BankError::TotalsOverflow(a)) if a == Decimal::MAX));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.balance(), Decimal::MAX);
    }

    #[test]
    fn test_check_append_covers_expenses_and_interest() {
        let ledger = ledger_of(&[Decimal::MIN]);
        assert!(ledger.check_append(dec!(-1), dec!(1)).is_err());
        assert!(ledger.check_append(dec!(1), dec!(1)).is_ok());

        // The deposit fits, its interest at this rate does not
        let ledger = ledger_of(&[Decimal::MAX / dec!(2)]);
        assert!(ledger.totals_fit(dec!(1)));
        assert!(!ledger.totals_fit(dec!(3)));
    }

    #[test]
    fn test_sorted_view_does_not_mutate() {
        let ledger = ledger_of(&[dec!(300), dec!(-20), dec!(45.5), dec!(-700)]);
        let first = ledger.sorted_view();
        let second = ledger.sorted_view();

        assert_eq!(first, vec![dec!(-700), dec!(-20), dec!(45.5), dec!(300)]);
        assert_eq!(first, second);
        assert_eq!(
            ledger.movements(),
            &[dec!(300), dec!(-20), dec!(45.5), dec!(-700)]
        );
    }

    #[test]
    fn test_sorted_entries_keep_their_dates() {
        let ledger = ledger_of(&[dec!(300), dec!(-20)]);
        let sorted = ledger.sorted_entries();

        assert_eq!(sorted[0].amount, dec!(-20));
        assert_eq!(sorted[0].date, at(2));
        assert_eq!(sorted[0].index, 1);
        assert_eq!(sorted[1].amount, dec!(300));
        assert_eq!(sorted[1].date, at(1));
    }

    #[test]
    fn test_days_since_rounds_to_nearest_day() {
        let now = at(10);
        assert_eq!(days_since(now, now), 0);
        assert_eq!(days_since(now - Duration::hours(11), now), 0);
        assert_eq!(days_since(now - Duration::hours(12), now), 1);
        assert_eq!(days_since(now - Duration::hours(36), now), 2);
        assert_eq!(days_since(at(3), now), 7);
    }

    #[test]
    fn test_days_since_is_absolute() {
        assert_eq!(days_since(at(10), at(3)), 7);
        assert_eq!(days_since(at(3), at(10)), 7);
    }
}
