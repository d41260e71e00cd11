// src/defaults.rs

//! The defaulting pass: fills every unset field of a [`NodeletConfiguration`]
//! with its documented default.
//!
//! Every rule is "if unset, then set", so a single pass fully populates the
//! record and a second pass is a no-op. The rules are mutually independent
//! with one exception: the node-status report frequency inherits an
//! explicitly configured update frequency, so that rule must run while the
//! update frequency still holds its pre-default value.

use crate::config::{
    AUTHORIZATION_MODE_WEBHOOK, CGROUP_DRIVER_CGROUPFS, CHANGE_DETECTION_STRATEGY_WATCH,
    CPU_MANAGER_POLICY_NONE, HAIRPIN_MODE_PROMISCUOUS_BRIDGE, NodeletConfiguration,
    TOPOLOGY_MANAGER_POLICY_NONE,
};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use std::time::Duration;

pub const DEFAULT_SYNC_FREQUENCY: Duration = Duration::from_secs(60);
pub const DEFAULT_FILE_CHECK_FREQUENCY: Duration = Duration::from_secs(20);
pub const DEFAULT_HTTP_CHECK_FREQUENCY: Duration = Duration::from_secs(20);

pub const DEFAULT_ADDRESS: &str = "0.0.0.0";
/// Port for the agent's main server on each host. May be overridden per node.
pub const DEFAULT_PORT: u16 = 10250;
pub const DEFAULT_HEALTHZ_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_HEALTHZ_PORT: u16 = 10248;
pub const DEFAULT_STREAMING_IDLE_TIMEOUT: Duration = Duration::from_secs(4 * 60 * 60);

pub const DEFAULT_WEBHOOK_CACHE_TTL: Duration = Duration::from_secs(2 * 60);
pub const DEFAULT_CACHE_AUTHORIZED_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_CACHE_UNAUTHORIZED_TTL: Duration = Duration::from_secs(30);

pub const DEFAULT_REGISTRY_PULL_QPS: i32 = 5;
pub const DEFAULT_REGISTRY_BURST: i32 = 10;
pub const DEFAULT_EVENT_RECORD_QPS: i32 = 5;
pub const DEFAULT_EVENT_BURST: i32 = 10;
pub const DEFAULT_KUBE_API_QPS: i32 = 5;
pub const DEFAULT_KUBE_API_BURST: i32 = 10;
pub const DEFAULT_CONTENT_TYPE: &str = "application/vnd.kubernetes.protobuf";

pub const DEFAULT_NODE_STATUS_REPORT_FREQUENCY: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_NODE_STATUS_UPDATE_FREQUENCY: Duration = Duration::from_secs(10);
pub const DEFAULT_NODE_LEASE_DURATION_SECONDS: i32 = 40;

pub const DEFAULT_IMAGE_MINIMUM_GC_AGE: Duration = Duration::from_secs(2 * 60);
// Below the dm.min_free_space the device mapper storage driver reserves.
pub const DEFAULT_IMAGE_GC_HIGH_THRESHOLD_PERCENT: i32 = 85;
pub const DEFAULT_IMAGE_GC_LOW_THRESHOLD_PERCENT: i32 = 80;

pub const DEFAULT_VOLUME_STATS_AGG_PERIOD: Duration = Duration::from_secs(60);

/// OOM score adjustment for the agent process itself.
pub const DEFAULT_OOM_SCORE_ADJ: i32 = -999;
// Keep in step with DEFAULT_NODE_STATUS_UPDATE_FREQUENCY.
pub const DEFAULT_CPU_MANAGER_RECONCILE_PERIOD: Duration = Duration::from_secs(10);
pub const DEFAULT_CPU_CFS_QUOTA_PERIOD: Duration = Duration::from_millis(100);
/// Sentinel meaning "fall back to the node-allocatable pid limit".
pub const DEFAULT_POD_PIDS_LIMIT: i64 = -1;
pub const DEFAULT_MAX_PODS: i32 = 110;
pub const DEFAULT_MAX_OPEN_FILES: i64 = 1_000_000;

pub const DEFAULT_RUNTIME_REQUEST_TIMEOUT: Duration = Duration::from_secs(2 * 60);
pub const DEFAULT_CONTAINER_LOG_MAX_SIZE: &str = "10Mi";
pub const DEFAULT_CONTAINER_LOG_MAX_FILES: i32 = 5;

/// System default DNS resolver configuration.
pub const DEFAULT_RESOLVER_CONFIG: &str = "/etc/resolv.conf";
pub const DEFAULT_IPTABLES_MASQUERADE_BIT: i32 = 14;
pub const DEFAULT_IPTABLES_DROP_BIT: i32 = 15;

pub const DEFAULT_EVICTION_PRESSURE_TRANSITION_PERIOD: Duration = Duration::from_secs(5 * 60);

lazy_static! {
    /// Hard eviction thresholds applied when the operator configures none.
    pub static ref DEFAULT_EVICTION_HARD: IndexMap<String, String> = IndexMap::from([
        ("memory.available".to_string(), "100Mi".to_string()),
        ("nodefs.available".to_string(), "10%".to_string()),
        ("nodefs.inodesFree".to_string(), "5%".to_string()),
        ("imagefs.available".to_string(), "15%".to_string()),
    ]);

    /// Cgroup subtrees node-allocatable enforcement applies to by default.
    pub static ref DEFAULT_ENFORCE_NODE_ALLOCATABLE: Vec<String> = vec!["pods".to_string()];
}

/// Fills every unset field of `cfg` with its documented default.
///
/// Total and idempotent: any combination of set and unset fields is valid
/// input, fields already holding a value are left alone, and after one pass
/// no field remains unset. The one rule that is a normalization rather than
/// a plain default is `pod_pids_limit`, which also rewrites negative values.
pub fn apply_defaults(cfg: &mut NodeletConfiguration) {
    if cfg.sync_frequency.is_zero() {
        cfg.sync_frequency = DEFAULT_SYNC_FREQUENCY;
    }
    if cfg.file_check_frequency.is_zero() {
        cfg.file_check_frequency = DEFAULT_FILE_CHECK_FREQUENCY;
    }
    if cfg.http_check_frequency.is_zero() {
        cfg.http_check_frequency = DEFAULT_HTTP_CHECK_FREQUENCY;
    }
    if cfg.address.is_empty() {
        cfg.address = DEFAULT_ADDRESS.to_string();
    }
    if cfg.port == 0 {
        cfg.port = DEFAULT_PORT;
    }
    if cfg.authentication.anonymous.enabled.is_none() {
        cfg.authentication.anonymous.enabled = Some(false);
    }
    if cfg.authentication.webhook.enabled.is_none() {
        cfg.authentication.webhook.enabled = Some(true);
    }
    if cfg.authentication.webhook.cache_ttl.is_zero() {
        cfg.authentication.webhook.cache_ttl = DEFAULT_WEBHOOK_CACHE_TTL;
    }
    if cfg.authorization.mode.is_empty() {
        cfg.authorization.mode = AUTHORIZATION_MODE_WEBHOOK.to_string();
    }
    if cfg.authorization.webhook.cache_authorized_ttl.is_zero() {
        cfg.authorization.webhook.cache_authorized_ttl = DEFAULT_CACHE_AUTHORIZED_TTL;
    }
    if cfg.authorization.webhook.cache_unauthorized_ttl.is_zero() {
        cfg.authorization.webhook.cache_unauthorized_ttl = DEFAULT_CACHE_UNAUTHORIZED_TTL;
    }
    if cfg.registry_pull_qps.is_none() {
        cfg.registry_pull_qps = Some(DEFAULT_REGISTRY_PULL_QPS);
    }
    if cfg.registry_burst == 0 {
        cfg.registry_burst = DEFAULT_REGISTRY_BURST;
    }
    if cfg.event_record_qps.is_none() {
        cfg.event_record_qps = Some(DEFAULT_EVENT_RECORD_QPS);
    }
    if cfg.event_burst == 0 {
        cfg.event_burst = DEFAULT_EVENT_BURST;
    }
    if cfg.enable_debugging_handlers.is_none() {
        cfg.enable_debugging_handlers = Some(true);
    }
    if cfg.healthz_port.is_none() {
        cfg.healthz_port = Some(DEFAULT_HEALTHZ_PORT);
    }
    if cfg.healthz_bind_address.is_empty() {
        cfg.healthz_bind_address = DEFAULT_HEALTHZ_BIND_ADDRESS.to_string();
    }
    if cfg.oom_score_adj.is_none() {
        cfg.oom_score_adj = Some(DEFAULT_OOM_SCORE_ADJ);
    }
    if cfg.streaming_connection_idle_timeout.is_zero() {
        cfg.streaming_connection_idle_timeout = DEFAULT_STREAMING_IDLE_TIMEOUT;
    }
    // An explicitly configured update frequency doubles as the report
    // frequency default, so this rule must read `node_status_update_frequency`
    // before the rule below assigns its default.
    if cfg.node_status_report_frequency.is_zero() {
        cfg.node_status_report_frequency = if cfg.node_status_update_frequency.is_zero() {
            DEFAULT_NODE_STATUS_REPORT_FREQUENCY
        } else {
            cfg.node_status_update_frequency
        };
    }
    if cfg.node_status_update_frequency.is_zero() {
        cfg.node_status_update_frequency = DEFAULT_NODE_STATUS_UPDATE_FREQUENCY;
    }
    if cfg.node_lease_duration_seconds == 0 {
        cfg.node_lease_duration_seconds = DEFAULT_NODE_LEASE_DURATION_SECONDS;
    }
    if cfg.image_minimum_gc_age.is_zero() {
        cfg.image_minimum_gc_age = DEFAULT_IMAGE_MINIMUM_GC_AGE;
    }
    if cfg.image_gc_high_threshold_percent.is_none() {
        cfg.image_gc_high_threshold_percent = Some(DEFAULT_IMAGE_GC_HIGH_THRESHOLD_PERCENT);
    }
    if cfg.image_gc_low_threshold_percent.is_none() {
        cfg.image_gc_low_threshold_percent = Some(DEFAULT_IMAGE_GC_LOW_THRESHOLD_PERCENT);
    }
    if cfg.volume_stats_agg_period.is_zero() {
        cfg.volume_stats_agg_period = DEFAULT_VOLUME_STATS_AGG_PERIOD;
    }
    if cfg.cgroups_per_qos.is_none() {
        cfg.cgroups_per_qos = Some(true);
    }
    if cfg.cgroup_driver.is_empty() {
        cfg.cgroup_driver = CGROUP_DRIVER_CGROUPFS.to_string();
    }
    if cfg.cpu_manager_policy.is_empty() {
        cfg.cpu_manager_policy = CPU_MANAGER_POLICY_NONE.to_string();
    }
    if cfg.cpu_manager_reconcile_period.is_zero() {
        cfg.cpu_manager_reconcile_period = DEFAULT_CPU_MANAGER_RECONCILE_PERIOD;
    }
    if cfg.topology_manager_policy.is_empty() {
        cfg.topology_manager_policy = TOPOLOGY_MANAGER_POLICY_NONE.to_string();
    }
    if cfg.runtime_request_timeout.is_zero() {
        cfg.runtime_request_timeout = DEFAULT_RUNTIME_REQUEST_TIMEOUT;
    }
    if cfg.hairpin_mode.is_empty() {
        cfg.hairpin_mode = HAIRPIN_MODE_PROMISCUOUS_BRIDGE.to_string();
    }
    if cfg.max_pods == 0 {
        cfg.max_pods = DEFAULT_MAX_PODS;
    }
    // Absent and negative both mean "use the node-allocatable pid limit".
    if cfg.pod_pids_limit.is_none_or(|limit| limit < 0) {
        cfg.pod_pids_limit = Some(DEFAULT_POD_PIDS_LIMIT);
    }
    if cfg.resolver_config.is_empty() {
        cfg.resolver_config = DEFAULT_RESOLVER_CONFIG.to_string();
    }
    if cfg.cpu_cfs_quota.is_none() {
        cfg.cpu_cfs_quota = Some(true);
    }
    if cfg.cpu_cfs_quota_period.is_none() {
        cfg.cpu_cfs_quota_period = Some(DEFAULT_CPU_CFS_QUOTA_PERIOD);
    }
    if cfg.max_open_files == 0 {
        cfg.max_open_files = DEFAULT_MAX_OPEN_FILES;
    }
    if cfg.content_type.is_empty() {
        cfg.content_type = DEFAULT_CONTENT_TYPE.to_string();
    }
    if cfg.kube_api_qps.is_none() {
        cfg.kube_api_qps = Some(DEFAULT_KUBE_API_QPS);
    }
    if cfg.kube_api_burst == 0 {
        cfg.kube_api_burst = DEFAULT_KUBE_API_BURST;
    }
    if cfg.serialize_image_pulls.is_none() {
        cfg.serialize_image_pulls = Some(true);
    }
    if cfg.eviction_hard.is_none() {
        cfg.eviction_hard = Some(DEFAULT_EVICTION_HARD.clone());
    }
    if cfg.eviction_pressure_transition_period.is_zero() {
        cfg.eviction_pressure_transition_period = DEFAULT_EVICTION_PRESSURE_TRANSITION_PERIOD;
    }
    if cfg.enable_controller_attach_detach.is_none() {
        cfg.enable_controller_attach_detach = Some(true);
    }
    if cfg.make_iptables_util_chains.is_none() {
        cfg.make_iptables_util_chains = Some(true);
    }
    if cfg.iptables_masquerade_bit.is_none() {
        cfg.iptables_masquerade_bit = Some(DEFAULT_IPTABLES_MASQUERADE_BIT);
    }
    if cfg.iptables_drop_bit.is_none() {
        cfg.iptables_drop_bit = Some(DEFAULT_IPTABLES_DROP_BIT);
    }
    if cfg.fail_swap_on.is_none() {
        cfg.fail_swap_on = Some(true);
    }
    if cfg.container_log_max_size.is_empty() {
        cfg.container_log_max_size = DEFAULT_CONTAINER_LOG_MAX_SIZE.to_string();
    }
    if cfg.container_log_max_files.is_none() {
        cfg.container_log_max_files = Some(DEFAULT_CONTAINER_LOG_MAX_FILES);
    }
    if cfg.config_map_and_secret_change_detection_strategy.is_empty() {
        cfg.config_map_and_secret_change_detection_strategy =
            CHANGE_DETECTION_STRATEGY_WATCH.to_string();
    }
    if cfg.enforce_node_allocatable.is_empty() {
        cfg.enforce_node_allocatable = DEFAULT_ENFORCE_NODE_ALLOCATABLE.clone();
    }
}
