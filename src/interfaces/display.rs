//! Text rendering of dashboards.
//!
//! Amounts and dates follow the account's locale for the handful of locales
//! in [`LocaleStyle::for_locale`]. Any other locale gets comma grouping, a
//! decimal point and the ISO currency code after the number.

use crate::application::dashboard::{Dashboard, MovementKind};
use crate::domain::ledger::days_since;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write;
use std::time::Duration;

/// Where the currency goes relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyPosition {
    /// `$1,234.56`
    SymbolBefore,
    /// `1.234,56 €`
    SymbolAfter,
    /// `1,234.56 EUR`
    CodeAfter,
}

/// Number and date conventions of one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleStyle {
    pub group: char,
    pub decimal: char,
    pub currency: CurrencyPosition,
    /// `chrono` pattern for a calendar date.
    pub date: &'static str,
}

impl LocaleStyle {
    const NEUTRAL: Self = Self {
        group: ',',
        decimal: '.',
        currency: CurrencyPosition::CodeAfter,
        date: "%d/%m/%Y",
    };

    /// Looks up a BCP 47 tag such as `pt-PT`, falling back on its language.
    pub fn for_locale(locale: &str) -> Self {
        let language = locale.split(['-', '_']).next().unwrap_or_default();
        match (locale, language) {
            ("en-US", _) => Self {
                group: ',',
                decimal: '.',
                currency: CurrencyPosition::SymbolBefore,
                date: "%m/%d/%Y",
            },
            (_, "en") => Self {
                currency: CurrencyPosition::SymbolBefore,
                ..Self::NEUTRAL
            },
            (_, "pt") => Self {
                group: ' ',
                decimal: ',',
                currency: CurrencyPosition::SymbolAfter,
                date: "%d/%m/%Y",
            },
            (_, "de") => Self {
                group: '.',
                decimal: ',',
                currency: CurrencyPosition::SymbolAfter,
                date: "%d.%m.%Y",
            },
            _ => Self::NEUTRAL,
        }
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "EUR" => Some("€"),
        "USD" => Some("$"),
        "GBP" => Some("£"),
        _ => None,
    }
}

/// Renders `amount` rounded to cents in the conventions of `locale`.
pub fn format_currency(amount: Decimal, currency: &str, locale: &str) -> String {
    let style = LocaleStyle::for_locale(locale);
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let digits = format!("{:.2}", rounded.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut number = String::with_capacity(digits.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            number.push(style.group);
        }
        number.push(c);
    }
    number.push(style.decimal);
    number.push_str(fraction);

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    match (style.currency, currency_symbol(currency)) {
        (CurrencyPosition::SymbolBefore, Some(symbol)) => format!("{sign}{symbol}{number}"),
        (CurrencyPosition::SymbolAfter, Some(symbol)) => format!("{sign}{number} {symbol}"),
        _ => format!("{sign}{number} {currency}"),
    }
}

/// "Today", "Yesterday", "N days ago" within a week, the date otherwise.
pub fn movement_date_label(date: DateTime<Utc>, now: DateTime<Utc>, locale: &str) -> String {
    match days_since(date, now) {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        days @ 2..=7 => format!("{days} days ago"),
        _ => date.format(LocaleStyle::for_locale(locale).date).to_string(),
    }
}

/// Date and time the balance was read at, e.g. `10/06/2021, 12:00`.
pub fn current_date_label(now: DateTime<Utc>, locale: &str) -> String {
    let style = LocaleStyle::for_locale(locale);
    format!("{}, {}", now.format(style.date), now.format("%H:%M"))
}

/// Countdown as `mm:ss`.
pub fn timer_label(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn render_dashboard(dashboard: &Dashboard, now: DateTime<Utc>) -> String {
    let currency = dashboard.currency.as_str();
    let locale = dashboard.locale.as_str();
    let money = |amount| format_currency(amount, currency, locale);
    let mut out = String::new();

    let _ = writeln!(out, "{}", dashboard.welcome);
    let _ = writeln!(out, "Current balance: {}", money(dashboard.balance));
    let _ = writeln!(out, "As of {}", current_date_label(now, locale));

    // Newest movement on top.
    for row in dashboard.rows.iter().rev() {
        let kind = match row.kind {
            MovementKind::Deposit => "deposit",
            MovementKind::Withdrawal => "withdrawal",
        };
        let _ = writeln!(
            out,
            "  {:>3} {:<10} {:<12} {:>16}",
            row.number,
            kind,
            movement_date_label(row.date, now, locale),
            money(row.amount)
        );
    }

    let _ = writeln!(
        out,
        "In {}  Out {}  Interest {}",
        money(dashboard.income),
        money(dashboard.expenses),
        money(dashboard.interest)
    );
    if let Some(remaining) = dashboard.remaining {
        let _ = writeln!(out, "You will be logged out in {}", timer_label(remaining));
    }
    out
}
