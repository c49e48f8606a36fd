//! Property-based tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_config;
use crate::config::schema::*;
use proptest::prelude::*;

fn arb_valid_spec() -> impl Strategy<Value = TrainSpec> {
    (
        1usize..64,    // batch_size
        1e-6f64..1.0,  // lr
        1usize..300,   // n_epochs
        1usize..5,     // half window
        1usize..10,    // snapshots
    )
        .prop_map(|(batch_size, lr, n_epochs, half, snapshots)| {
            let mut spec = TrainSpec::default();
            spec.data.batch_size = batch_size;
            spec.data.n_frames = 2 * half + 1;
            spec.optimizer.lr = lr;
            spec.training.n_epochs = n_epochs;
            spec.checkpoint.snapshots = snapshots;
            spec
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_spec_passes(spec in arb_valid_spec()) {
        prop_assert!(validate_config(&spec).is_ok());
    }

    #[test]
    fn prop_start_past_end_rejected(n_epochs in 1usize..300, extra in 1usize..50) {
        let mut spec = TrainSpec::default();
        spec.training.n_epochs = n_epochs;
        spec.training.start_epoch = n_epochs + extra;
        let is_start_error = matches!(
            validate_config(&spec),
            Err(ValidationError::InvalidStartEpoch { .. })
        );
        prop_assert!(is_start_error);
    }

    #[test]
    fn prop_even_centered_window_rejected(half in 1usize..10) {
        let mut spec = TrainSpec::default();
        spec.data.n_frames = 2 * half;
        prop_assert_eq!(
            validate_config(&spec),
            Err(ValidationError::EvenCenteredWindow(2 * half))
        );
    }
}
