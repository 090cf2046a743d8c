use std::{fmt, iter::Sum, ops::Neg};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Number of minor units (paise) in one rupee.
const MINOR_PER_MAJOR: i64 = 100;
/// Largest amount, in rupees, an entry may hold (either sign).
const MAX_MAJOR: i64 = 10_000_000_000_000;

/// Signed money amount represented as **integer paise**.
///
/// Use this type for **all** monetary values in the ledger (entry amounts,
/// carried balances, totals) to avoid floating-point drift.
///
/// The sign carries the column:
/// - negative = debit
/// - zero or positive = credit
///
/// On the wire an amount is a plain JSON number in rupees (`1000`, `-50.5`),
/// the shape the exported ledger documents use.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(1_234_56);
/// assert_eq!(amount.minor(), 123456);
/// assert_eq!(amount.to_string(), "₹1,234.56");
/// ```
///
/// Amounts are bounded by [`Money::MAX`]; sums saturate instead of
/// overflowing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);
    pub const MAX: Money = Money(MAX_MAJOR * MINOR_PER_MAJOR);

    /// Creates a new amount from integer paise.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Creates a new amount from whole rupees.
    #[must_use]
    pub const fn from_major(major: i64) -> Self {
        Self(major.saturating_mul(MINOR_PER_MAJOR))
    }

    /// Returns the raw value in paise.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// `minor` paise, or `None` beyond [`Money::MAX`] in either direction.
    #[must_use]
    pub const fn bounded(minor: i64) -> Option<Self> {
        if minor.unsigned_abs() > Self::MAX.0.unsigned_abs() {
            None
        } else {
            Some(Self(minor))
        }
    }

    /// Checked addition (returns `None` past [`Money::MAX`]).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).and_then(Money::bounded)
    }

    /// Checked subtraction (returns `None` past [`Money::MAX`]).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).and_then(Money::bounded)
    }

    #[must_use]
    pub const fn saturating_add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }

    /// Formats the absolute value with Indian digit grouping and 0–2 fraction
    /// digits, without the currency symbol: `123456.5` becomes `1,23,456.5`.
    #[must_use]
    pub fn grouped(self) -> String {
        let abs = self.0.unsigned_abs();
        let rupees = (abs / MINOR_PER_MAJOR as u64).to_string();
        let paise = abs % MINOR_PER_MAJOR as u64;

        let mut out = String::with_capacity(rupees.len() + rupees.len() / 2 + 4);
        let (head, tail) = if rupees.len() > 3 {
            rupees.split_at(rupees.len() - 3)
        } else {
            ("", rupees.as_str())
        };
        // Indian grouping: the last three digits, then pairs.
        let lead = head.len() % 2;
        for (idx, ch) in head.chars().enumerate() {
            if idx > 0 && (idx + 2 - lead) % 2 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        if !head.is_empty() {
            out.push(',');
        }
        out.push_str(tail);

        if paise != 0 {
            let fraction = format!("{paise:02}");
            out.push('.');
            out.push_str(fraction.trim_end_matches('0'));
        }
        out
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}₹{}", self.grouped())
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % MINOR_PER_MAJOR == 0 {
            serializer.serialize_i64(self.0 / MINOR_PER_MAJOR)
        } else {
            serializer.serialize_f64(self.0 as f64 / MINOR_PER_MAJOR as f64)
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl de::Visitor<'_> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an amount in rupees")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(MINOR_PER_MAJOR)
            .and_then(Money::bounded)
            .ok_or_else(|| E::custom("amount too large"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        let v = i64::try_from(v).map_err(|_| E::custom("amount too large"))?;
        self.visit_i64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        let minor = (v * MINOR_PER_MAJOR as f64).round();
        if !minor.is_finite() || minor.abs() > Money::MAX.0 as f64 {
            return Err(E::custom("amount out of range"));
        }
        Ok(Money(minor as i64))
    }
}
