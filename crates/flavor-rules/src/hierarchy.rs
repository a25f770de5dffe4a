use flavor_core::errors::{ErrorInfo, FlavorError};
use serde::{Deserialize, Serialize};

/// Generation hierarchy `p_i = 3^(i-1)` together with the cluster numbers.
///
/// Every prediction in this crate is a closed-form expression over
/// `{p_1, p_2, p_3, 13, 11}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationHierarchy {
    /// Generation powers `[p_1, p_2, p_3]`.
    pub p: [i64; 3],
    /// Cluster number (1 + 12 gauge bosons).
    pub cluster: i64,
    /// Secondary cluster number (`cluster - 2`).
    pub cluster_secondary: i64,
}

impl GenerationHierarchy {
    /// Base of the generation powers.
    pub const BASE: i64 = 3;
    /// Primary cluster number.
    pub const CLUSTER: i64 = 13;

    /// The hierarchy every published formula is written against.
    pub const fn standard() -> Self {
        Self {
            p: [1, Self::BASE, Self::BASE * Self::BASE],
            cluster: Self::CLUSTER,
            cluster_secondary: Self::CLUSTER - 2,
        }
    }

    /// Returns `p_gen` for generation 1, 2 or 3.
    pub fn p(&self, gen: u32) -> Result<i64, FlavorError> {
        match gen {
            1..=3 => Ok(self.p[(gen - 1) as usize]),
            _ => Err(FlavorError::InvalidParameter(
                ErrorInfo::new(
                    "invalid-generation",
                    format!("generation must be 1, 2, or 3, got {gen}"),
                )
                .with_context("generation", gen.to_string()),
            )),
        }
    }

    pub(crate) fn p1(&self) -> i64 {
        self.p[0]
    }

    pub(crate) fn p2(&self) -> i64 {
        self.p[1]
    }

    pub(crate) fn p3(&self) -> i64 {
        self.p[2]
    }
}

impl Default for GenerationHierarchy {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn powers_follow_base_three() {
        let h = GenerationHierarchy::standard();
        assert_eq!(h.p(1).unwrap(), 1);
        assert_eq!(h.p(2).unwrap(), 3);
        assert_eq!(h.p(3).unwrap(), 9);
        assert_eq!(h.cluster_secondary, 11);
    }

    #[test]
    fn out_of_range_generation_is_invalid() {
        let h = GenerationHierarchy::standard();
        for gen in [0, 4] {
            let err = h.p(gen).unwrap_err();
            assert!(matches!(err, FlavorError::InvalidParameter(_)));
        }
    }
}
