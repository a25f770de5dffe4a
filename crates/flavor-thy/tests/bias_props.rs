mod common;

use flavor_thy::{judge, Policy};
use proptest::prelude::*;

use common::pdg_comparisons;

proptest! {
    #[test]
    fn sign_census_accounts_for_every_nonzero_deviation(signs in proptest::collection::vec(any::<bool>(), 9)) {
        let mut comparisons = pdg_comparisons().unwrap();
        for (result, positive) in comparisons.iter_mut().zip(&signs) {
            let magnitude = result.deviation.absolute.max(1e-9);
            result.deviation.signed = if *positive { magnitude } else { -magnitude };
        }
        let verdict = judge(&comparisons, &Policy::default()).unwrap();
        let positives = signs.iter().filter(|s| **s).count();
        prop_assert_eq!(verdict.systematic_bias.positive, positives);
        prop_assert_eq!(verdict.systematic_bias.negative, 9 - positives);
        prop_assert_eq!(verdict.systematic_bias.flagged, positives >= 7 || 9 - positives >= 7);
        // Bias alone never changes the status.
        prop_assert_eq!(verdict.status.as_str(), "supported");
    }
}
