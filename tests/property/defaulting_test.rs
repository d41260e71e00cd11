// tests/property/defaulting_test.rs

//! Invariants of the defaulting pass over arbitrary partial records.

use nodelet_config::NodeletConfiguration;
use nodelet_config::apply_defaults;
use proptest::prelude::*;
use std::time::Duration;

prop_compose! {
    /// A partially-set record: each covered field is independently either
    /// left at its unset sentinel or given an explicit value. The covered
    /// fields span every sentinel kind (duration, string, plain numeric,
    /// optional numeric and bool, sequence) plus the two special rules.
    fn arb_partial_config()(
        sync_secs in prop::option::of(1u64..600),
        address in prop::option::of("[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}"),
        port in prop::option::of(1u16..u16::MAX),
        registry_pull_qps in prop::option::of(0i32..100),
        registry_burst in prop::option::of(1i32..100),
        fail_swap_on in prop::option::of(any::<bool>()),
        update_secs in prop::option::of(1u64..600),
        report_secs in prop::option::of(1u64..600),
        pod_pids_limit in prop::option::of(-100i64..100),
        max_pods in prop::option::of(1i32..500),
        enforce in prop::option::of(prop::collection::vec("[a-z-]{3,12}", 1..3)),
    ) -> NodeletConfiguration {
        let mut cfg = NodeletConfiguration::default();
        if let Some(secs) = sync_secs {
            cfg.sync_frequency = Duration::from_secs(secs);
        }
        if let Some(address) = address {
            cfg.address = address;
        }
        if let Some(port) = port {
            cfg.port = port;
        }
        cfg.registry_pull_qps = registry_pull_qps;
        if let Some(burst) = registry_burst {
            cfg.registry_burst = burst;
        }
        cfg.fail_swap_on = fail_swap_on;
        if let Some(secs) = update_secs {
            cfg.node_status_update_frequency = Duration::from_secs(secs);
        }
        if let Some(secs) = report_secs {
            cfg.node_status_report_frequency = Duration::from_secs(secs);
        }
        cfg.pod_pids_limit = pod_pids_limit;
        if let Some(max_pods) = max_pods {
            cfg.max_pods = max_pods;
        }
        if let Some(enforce) = enforce {
            cfg.enforce_node_allocatable = enforce;
        }
        cfg
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn defaulting_is_idempotent(cfg in arb_partial_config()) {
        let mut once = cfg.clone();
        apply_defaults(&mut once);
        let mut twice = once.clone();
        apply_defaults(&mut twice);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn one_pass_fully_populates(cfg in arb_partial_config()) {
        let mut cfg = cfg;
        apply_defaults(&mut cfg);

        prop_assert!(!cfg.sync_frequency.is_zero());
        prop_assert!(!cfg.address.is_empty());
        prop_assert!(cfg.port != 0);
        prop_assert!(cfg.registry_pull_qps.is_some());
        prop_assert!(cfg.registry_burst != 0);
        prop_assert!(cfg.fail_swap_on.is_some());
        prop_assert!(!cfg.node_status_update_frequency.is_zero());
        prop_assert!(!cfg.node_status_report_frequency.is_zero());
        prop_assert!(matches!(cfg.pod_pids_limit, Some(limit) if limit >= -1));
        prop_assert!(cfg.max_pods != 0);
        prop_assert!(!cfg.enforce_node_allocatable.is_empty());
        prop_assert!(cfg.eviction_hard.is_some());
    }

    #[test]
    fn explicit_values_survive(cfg in arb_partial_config()) {
        let before = cfg.clone();
        let mut after = cfg;
        apply_defaults(&mut after);

        if !before.sync_frequency.is_zero() {
            prop_assert_eq!(before.sync_frequency, after.sync_frequency);
        }
        if !before.address.is_empty() {
            prop_assert_eq!(&before.address, &after.address);
        }
        if before.port != 0 {
            prop_assert_eq!(before.port, after.port);
        }
        // Present-but-zero is an explicit setting for optional fields.
        if let Some(qps) = before.registry_pull_qps {
            prop_assert_eq!(after.registry_pull_qps, Some(qps));
        }
        if before.registry_burst != 0 {
            prop_assert_eq!(before.registry_burst, after.registry_burst);
        }
        if let Some(fail_swap_on) = before.fail_swap_on {
            prop_assert_eq!(after.fail_swap_on, Some(fail_swap_on));
        }
        if !before.node_status_report_frequency.is_zero() {
            prop_assert_eq!(
                before.node_status_report_frequency,
                after.node_status_report_frequency
            );
        }
        if !before.node_status_update_frequency.is_zero() {
            prop_assert_eq!(
                before.node_status_update_frequency,
                after.node_status_update_frequency
            );
        }
        // The one exception to preservation: negative pid limits normalize.
        match before.pod_pids_limit {
            Some(limit) if limit >= 0 => prop_assert_eq!(after.pod_pids_limit, Some(limit)),
            _ => prop_assert_eq!(after.pod_pids_limit, Some(-1)),
        }
        if before.max_pods != 0 {
            prop_assert_eq!(before.max_pods, after.max_pods);
        }
        if !before.enforce_node_allocatable.is_empty() {
            prop_assert_eq!(
                &before.enforce_node_allocatable,
                &after.enforce_node_allocatable
            );
        }
    }

    #[test]
    fn report_frequency_inherits_explicit_update_frequency(update_secs in 1u64..600) {
        let mut cfg = NodeletConfiguration::default();
        cfg.node_status_update_frequency = Duration::from_secs(update_secs);

        apply_defaults(&mut cfg);

        prop_assert_eq!(
            cfg.node_status_report_frequency,
            Duration::from_secs(update_secs)
        );
    }
}
