//! Number value type.

use core::cmp::Ordering;
use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{Hash, Hasher};

#[derive(Clone, Copy)]
enum Repr {
    /// Every integer that fits in an `i64` is stored here, signed or not.
    I64(i64),
    /// Only integers above `i64::MAX`.
    U64(u64),
    F64(f64),
}

/// A number value: a signed integer, an unsigned integer, or a float.
///
/// Integers compare equal regardless of the type they were created from
/// (`VNumber::from(3u8) == VNumber::from(3i64)`). Integers and floats never
/// compare equal, even when the float is integral: `1` and `1.0` are different
/// values, which keeps type preservation observable.
#[derive(Clone, Copy)]
pub struct VNumber(Repr);

/// Equality/hash key. Floats are keyed by their bits with `-0.0` folded onto `0.0`.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Key {
    Int(i128),
    Float(u64),
}

impl VNumber {
    /// Creates a number from a signed integer.
    #[must_use]
    pub const fn from_i64(v: i64) -> Self {
        VNumber(Repr::I64(v))
    }

    /// Creates a number from an unsigned integer.
    #[must_use]
    pub const fn from_u64(v: u64) -> Self {
        if v <= i64::MAX as u64 {
            VNumber(Repr::I64(v as i64))
        } else {
            VNumber(Repr::U64(v))
        }
    }

    /// Creates a number from a float.
    #[must_use]
    pub const fn from_f64(v: f64) -> Self {
        VNumber(Repr::F64(v))
    }

    /// Returns the value as an `i64`, if it is an integer that fits.
    #[must_use]
    pub const fn to_i64(&self) -> Option<i64> {
        match self.0 {
            Repr::I64(v) => Some(v),
            Repr::U64(_) | Repr::F64(_) => None,
        }
    }

    /// Returns the value as a `u64`, if it is a non-negative integer.
    #[must_use]
    pub const fn to_u64(&self) -> Option<u64> {
        match self.0 {
            Repr::I64(v) if v >= 0 => Some(v as u64),
            Repr::U64(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value as an `f64`. Large integers may lose precision.
    #[must_use]
    pub const fn to_f64(&self) -> f64 {
        match self.0 {
            Repr::I64(v) => v as f64,
            Repr::U64(v) => v as f64,
            Repr::F64(v) => v,
        }
    }

    /// Returns `true` if this number was created from an integer.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        !self.is_float()
    }

    /// Returns `true` if this number was created from a float.
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self.0, Repr::F64(_))
    }

    fn key(&self) -> Key {
        match self.0 {
            Repr::I64(v) => Key::Int(v as i128),
            Repr::U64(v) => Key::Int(v as i128),
            Repr::F64(v) if v == 0.0 => Key::Float(0f64.to_bits()),
            Repr::F64(v) => Key::Float(v.to_bits()),
        }
    }
}

impl PartialEq for VNumber {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for VNumber {}

impl Hash for VNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for VNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.0, other.0) {
            (Repr::F64(_), _) | (_, Repr::F64(_)) => self.to_f64().partial_cmp(&other.to_f64()),
            _ => Some(self.key().cmp(&other.key())),
        }
    }
}

impl Display for VNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Repr::I64(v) => write!(f, "{v}"),
            Repr::U64(v) => write!(f, "{v}"),
            // Keep a fractional part on integral floats so `1.0` never reads as `1`.
            Repr::F64(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{v:.1}")
            }
            Repr::F64(v) => write!(f, "{v}"),
        }
    }
}

impl Debug for VNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for VNumber {
                fn from(v: $t) -> Self {
                    VNumber::from_i64(v as i64)
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for VNumber {
                fn from(v: $t) -> Self {
                    VNumber::from_u64(v as u64)
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for VNumber {
    fn from(v: f32) -> Self {
        VNumber::from_f64(f64::from(v))
    }
}

impl From<f64> for VNumber {
    fn from(v: f64) -> Self {
        VNumber::from_f64(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(n: VNumber) -> u64 {
        let mut h = DefaultHasher::new();
        n.hash(&mut h);
        h.finish()
    }

    #[test]
    fn integers_compare_across_signedness() {
        assert_eq!(VNumber::from(3u8), VNumber::from(3i64));
        assert_eq!(hash_of(VNumber::from(3u8)), hash_of(VNumber::from(3i64)));
        assert_eq!(VNumber::from(u64::MAX).to_u64(), Some(u64::MAX));
        assert_eq!(VNumber::from(u64::MAX).to_i64(), None);
    }

    #[test]
    fn floats_and_integers_stay_distinct() {
        assert_ne!(VNumber::from(1i64), VNumber::from(1.0f64));
        assert_eq!(VNumber::from(0.0f64), VNumber::from(-0.0f64));
        assert!(VNumber::from(1.5f64).is_float());
        assert!(VNumber::from(-7i32).is_integer());
    }

    #[test]
    fn display_keeps_float_marker() {
        assert_eq!(VNumber::from(42i64).to_string(), "42");
        assert_eq!(VNumber::from(1.0f64).to_string(), "1.0");
        assert_eq!(VNumber::from(0.75f64).to_string(), "0.75");
        assert_eq!(VNumber::from(u64::MAX).to_string(), "18446744073709551615");
    }

    #[test]
    fn ordering_mixes_kinds() {
        assert!(VNumber::from(1i64) < VNumber::from(1.5f64));
        assert!(VNumber::from(u64::MAX) > VNumber::from(-1i64));
    }
}
