// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

/// Which addresses of a network are counted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountPolicy {
    /// every address, network and broadcast included: `2^host_bits`
    #[default]
    Total,
    /// network and broadcast addresses excluded: `2^host_bits - 2`, floored at 0
    Usable,
}

impl CountPolicy {
    /// Count the addresses of a network which has `host_bits` variable bits.
    pub fn count(self, host_bits: u32) -> BigUint {
        let total: BigUint = BigUint::one() << host_bits;
        match self {
            CountPolicy::Total => total,
            CountPolicy::Usable => {
                let reserved: BigUint = BigUint::from(2u8);
                if total > reserved {
                    total - reserved
                } else {
                    BigUint::zero()
                }
            }
        }
    }
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total() {
        assert_eq!(CountPolicy::Total.count(0), BigUint::from(1u8));
        assert_eq!(CountPolicy::Total.count(8), BigUint::from(256u16));
        assert_eq!(CountPolicy::Total.count(32), BigUint::from(1u64 << 32));
        assert_eq!(
            CountPolicy::Total.count(128).to_string(),
            "340282366920938463463374607431768211456"
        );
    }

    #[test]
    fn test_usable_floors_at_zero() {
        assert_eq!(CountPolicy::Usable.count(8), BigUint::from(254u16));
        assert_eq!(CountPolicy::Usable.count(1), BigUint::zero());
        assert_eq!(CountPolicy::Usable.count(0), BigUint::zero());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&CountPolicy::Usable).unwrap(), "\"usable\"");
        let p: CountPolicy = serde_json::from_str("\"total\"").unwrap();
        assert_eq!(p, CountPolicy::Total);
        assert_eq!(CountPolicy::default(), CountPolicy::Total);
    }
}
