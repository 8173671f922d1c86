//! Percentage weights.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A recipient's percentage share, always in `1..=100`.
///
/// Deserialization goes through [`Weight::new`], so a stored record can
/// never yield an out-of-range weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Weight(u8);

impl Weight {
    /// The sum every live condition set must reach exactly.
    pub const TOTAL: u8 = 100;

    /// Returns `None` for 0 or anything above [`Weight::TOTAL`].
    pub fn new(value: u8) -> Option<Self> {
        if value == 0 || value > Self::TOTAL {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Weight {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("weight {value} outside 1..={}", Self::TOTAL))
    }
}

impl From<Weight> for u8 {
    fn from(weight: Weight) -> Self {
        weight.0
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        assert!(Weight::new(0).is_none());
        assert!(Weight::new(101).is_none());
        assert_eq!(Weight::new(1).unwrap().get(), 1);
        assert_eq!(Weight::new(100).unwrap().get(), 100);
    }

    #[test]
    fn decoding_rejects_out_of_range_weights() {
        for raw in [0u8, 101, 255] {
            let bytes = bincode::serialize(&raw).unwrap();
            assert!(bincode::deserialize::<Weight>(&bytes).is_err(), "weight {raw}");
        }
        let bytes = bincode::serialize(&Weight::new(35).unwrap()).unwrap();
        assert_eq!(bytes, vec![35]);
        assert_eq!(bincode::deserialize::<Weight>(&bytes).unwrap().get(), 35);
    }
}
