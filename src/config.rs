// src/config.rs

//! The node-agent configuration record and its serde model.
//!
//! A freshly constructed (or partially deserialized) record holds the unset
//! sentinel in every field the operator did not touch: the zero duration for
//! timings, the empty string for names and addresses, literal `0` for plain
//! numeric fields, `None` for optional ones, and an empty list for sequences.
//! One pass of [`crate::defaults::apply_defaults`] replaces every remaining
//! sentinel with its documented default; validation and consumption happen
//! outside this crate.

use crate::defaults;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Kind string under which the record's defaulting function is registered.
pub const NODELET_CONFIGURATION_KIND: &str = "NodeletConfiguration";

// Recognized values for the enumerated policy fields below. The empty string
// means "not configured"; defaulting never leaves it behind.

pub const AUTHORIZATION_MODE_ALWAYS_ALLOW: &str = "AlwaysAllow";
pub const AUTHORIZATION_MODE_WEBHOOK: &str = "Webhook";

pub const CGROUP_DRIVER_CGROUPFS: &str = "cgroupfs";
pub const CGROUP_DRIVER_SYSTEMD: &str = "systemd";

pub const CPU_MANAGER_POLICY_NONE: &str = "none";
pub const CPU_MANAGER_POLICY_STATIC: &str = "static";

pub const TOPOLOGY_MANAGER_POLICY_NONE: &str = "None";
pub const TOPOLOGY_MANAGER_POLICY_BEST_EFFORT: &str = "best-effort";
pub const TOPOLOGY_MANAGER_POLICY_RESTRICTED: &str = "restricted";
pub const TOPOLOGY_MANAGER_POLICY_SINGLE_NUMA_NODE: &str = "single-numa-node";

pub const HAIRPIN_MODE_PROMISCUOUS_BRIDGE: &str = "promiscuous-bridge";
pub const HAIRPIN_MODE_HAIRPIN_VETH: &str = "hairpin-veth";
pub const HAIRPIN_MODE_NONE: &str = "none";

pub const CHANGE_DETECTION_STRATEGY_GET: &str = "Get";
pub const CHANGE_DETECTION_STRATEGY_CACHE: &str = "Cache";
pub const CHANGE_DETECTION_STRATEGY_WATCH: &str = "Watch";

/// Runtime settings for a single node agent.
///
/// The field groups are mutually independent; the per-field defaulting rules
/// live in [`crate::defaults`]. Durations (de)serialize as humantime strings
/// (`"20s"`, `"5m"`), and every field is optional in the wire form so a
/// partial document deserializes to a partially-set record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeletConfiguration {
    // --- Pod config sources ---
    /// Maximum period between synchronization of running containers and the
    /// desired pod set.
    #[serde(with = "humantime_serde")]
    pub sync_frequency: Duration,
    /// How often the manifest directory is checked for new or changed pods.
    #[serde(with = "humantime_serde")]
    pub file_check_frequency: Duration,
    /// How often the HTTP manifest source is polled.
    #[serde(with = "humantime_serde")]
    pub http_check_frequency: Duration,

    // --- Serving ---
    /// IP address for the agent's main server to bind to.
    pub address: String,
    /// Port for the agent's main (HTTPS) server.
    pub port: u16,
    /// IP address for the healthz server to bind to.
    pub healthz_bind_address: String,
    /// Port for the localhost healthz endpoint.
    pub healthz_port: Option<u16>,
    /// Enables the log, exec and attach debugging handlers.
    pub enable_debugging_handlers: Option<bool>,
    /// Maximum time a streaming connection (exec, attach, port-forward) may
    /// stay idle before it is closed.
    #[serde(with = "humantime_serde")]
    pub streaming_connection_idle_timeout: Duration,

    // --- Authentication / authorization ---
    pub authentication: NodeletAuthentication,
    pub authorization: NodeletAuthorization,

    // --- Client-side rate limits ---
    /// Limit on image registry pulls per second. Present-but-zero means
    /// unlimited, so an explicit `0` is preserved.
    pub registry_pull_qps: Option<i32>,
    /// Burst allowance for registry pulls while below `registry_pull_qps`.
    pub registry_burst: i32,
    /// Limit on event creations per second.
    pub event_record_qps: Option<i32>,
    /// Burst allowance for event creation.
    pub event_burst: i32,
    /// QPS to use while talking to the cluster API server.
    pub kube_api_qps: Option<i32>,
    /// Burst to allow while talking to the cluster API server.
    pub kube_api_burst: i32,
    /// Content type of requests sent to the API server.
    pub content_type: String,

    // --- Node status ---
    /// How often the agent posts node status when no change is detected.
    #[serde(with = "humantime_serde")]
    pub node_status_report_frequency: Duration,
    /// How often the agent computes node status (and posts it if changed).
    #[serde(with = "humantime_serde")]
    pub node_status_update_frequency: Duration,
    /// Duration, in seconds, of the node lease the agent renews.
    pub node_lease_duration_seconds: i32,

    // --- Image lifecycle ---
    /// Minimum age of an unused image before it is garbage collected.
    #[serde(with = "humantime_serde")]
    pub image_minimum_gc_age: Duration,
    /// Disk usage percentage that always triggers image garbage collection.
    pub image_gc_high_threshold_percent: Option<i32>,
    /// Disk usage percentage below which image garbage collection never runs.
    pub image_gc_low_threshold_percent: Option<i32>,
    /// Pulls images one at a time when set.
    pub serialize_image_pulls: Option<bool>,

    // --- Volumes ---
    /// Interval between volume disk usage calculations.
    #[serde(with = "humantime_serde")]
    pub volume_stats_agg_period: Duration,
    /// Hands attach/detach of volumes scheduled to this node over to the
    /// central controller, disabling the agent's own attach/detach logic.
    pub enable_controller_attach_detach: Option<bool>,

    // --- Resource management ---
    /// oom-score-adj applied to the agent process itself.
    pub oom_score_adj: Option<i32>,
    /// Places container cgroups under per-QOS cgroup hierarchies.
    pub cgroups_per_qos: Option<bool>,
    /// Driver the agent uses to manipulate cgroups on the host.
    pub cgroup_driver: String,
    /// CPU manager policy name.
    pub cpu_manager_policy: String,
    /// Interval between CPU manager reconciliation passes.
    #[serde(with = "humantime_serde")]
    pub cpu_manager_reconcile_period: Duration,
    /// Topology manager policy name.
    pub topology_manager_policy: String,
    /// Enables CPU CFS quota enforcement for containers with CPU limits.
    pub cpu_cfs_quota: Option<bool>,
    /// CPU CFS quota period value.
    #[serde(with = "humantime_serde")]
    pub cpu_cfs_quota_period: Option<Duration>,
    /// Maximum number of pids per pod. Absent and negative both mean "use the
    /// node-allocatable pid limit"; see the defaulting rules.
    pub pod_pids_limit: Option<i64>,
    /// Maximum number of pods runnable on this node.
    pub max_pods: i32,
    /// Maximum number of files the agent process may open.
    pub max_open_files: i64,
    /// Swap being enabled on the node is treated as a startup failure.
    pub fail_swap_on: Option<bool>,

    // --- Container runtime ---
    /// Timeout for all runtime requests except long-running ones.
    #[serde(with = "humantime_serde")]
    pub runtime_request_timeout: Duration,
    /// Size at which a container log file is rotated, e.g. "10Mi".
    pub container_log_max_size: String,
    /// Maximum number of rotated log files retained per container.
    pub container_log_max_files: Option<i32>,

    // --- Pod networking ---
    /// How the agent makes hairpin packets work.
    pub hairpin_mode: String,
    /// Resolver configuration file used as the basis of container DNS.
    pub resolver_config: String,
    /// Installs the iptables utility chains the agent's rules hook into.
    pub make_iptables_util_chains: Option<bool>,
    /// fwmark bit reserved for SNAT.
    pub iptables_masquerade_bit: Option<i32>,
    /// fwmark bit reserved for dropping packets.
    pub iptables_drop_bit: Option<i32>,

    // --- Eviction ---
    /// Hard eviction thresholds, signal name to quantity or percentage.
    pub eviction_hard: Option<IndexMap<String, String>>,
    /// How long a pressure condition persists after dropping below its
    /// threshold.
    #[serde(with = "humantime_serde")]
    pub eviction_pressure_transition_period: Duration,

    // --- Misc ---
    /// Strategy used to watch config maps and secrets for changes.
    pub config_map_and_secret_change_detection_strategy: String,
    /// Cgroup subtrees on which node-allocatable limits are enforced.
    pub enforce_node_allocatable: Vec<String>,
}

impl NodeletConfiguration {
    /// An all-unset record put through one defaulting pass. This is the
    /// configuration a node agent runs with when the operator supplies
    /// nothing at all.
    pub fn defaulted() -> Self {
        let mut cfg = Self::default();
        defaults::apply_defaults(&mut cfg);
        cfg
    }
}

/// How requests to the agent's endpoints are authenticated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeletAuthentication {
    pub anonymous: AnonymousAuthentication,
    pub webhook: WebhookAuthentication,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AnonymousAuthentication {
    /// Allows requests with no credentials at all; such requests are treated
    /// as anonymous.
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct WebhookAuthentication {
    /// Authenticates bearer tokens through the token-review API.
    pub enabled: Option<bool>,
    /// How long authentication responses are cached.
    #[serde(with = "humantime_serde")]
    pub cache_ttl: Duration,
}

/// How authenticated requests to the agent's endpoints are authorized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeletAuthorization {
    /// One of the `AUTHORIZATION_MODE_*` constants.
    pub mode: String,
    pub webhook: WebhookAuthorization,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct WebhookAuthorization {
    /// How long "authorized" responses are cached.
    #[serde(with = "humantime_serde")]
    pub cache_authorized_ttl: Duration,
    /// How long "unauthorized" responses are cached.
    #[serde(with = "humantime_serde")]
    pub cache_unauthorized_ttl: Duration,
}
