//! Synthetic cluster data. Everything here is static and deterministic so that
//! every call returns the same rows.

use crate::model::{CustomResourceDef, NamespaceScope};
use chrono::{DateTime, Duration, TimeZone, Utc};

pub const NAMESPACES: &[&str] = &["default", "payments", "monitoring", "kube-system"];
pub const CONTEXTS: &[Context] = &[
    Context {
        name: "kind-dev",
        cluster: "kind-dev",
        user: "kind-dev-admin",
        server: "https://127.0.0.1:6443",
    },
    Context {
        name: "staging-eu",
        cluster: "staging-eu-west-1",
        user: "oidc-staging",
        server: "https://staging.eu.k8s.internal",
    },
    Context {
        name: "prod-us",
        cluster: "prod-us-east-2",
        user: "oidc-prod",
        server: "https://prod.us.k8s.internal",
    },
];

#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub name: &'static str,
    pub cluster: &'static str,
    pub user: &'static str,
    pub server: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Workload {
    pub name: &'static str,
    pub namespace: &'static str,
    pub tag: &'static str,
    pub status: &'static str,
    pub ready: &'static str,
    pub age: &'static str,
    pub replicas: usize,
    pub containers: &'static [(&'static str, &'static str)],
    pub tier: &'static str,
}

impl Workload {
    pub fn api_kind(&self) -> &'static str {
        match self.tag {
            "DEP" => "Deployment",
            "STS" => "StatefulSet",
            "DS" => "DaemonSet",
            "CJ" => "CronJob",
            "JOB" => "Job",
            _ => "Workload",
        }
    }

    pub fn images(&self) -> String {
        self.containers
            .iter()
            .map(|(_, image)| *image)
            .collect::<Vec<_>>()
            .join(",")
    }
}

pub const WORKLOADS: &[Workload] = &[
    Workload {
        name: "api-gateway",
        namespace: "default",
        tag: "DEP",
        status: "Running",
        ready: "3/3",
        age: "12d",
        replicas: 3,
        containers: &[
            ("gateway", "ghcr.io/podji/gateway:1.8.2"),
            ("envoy", "envoyproxy/envoy:v1.30.1"),
        ],
        tier: "edge",
    },
    Workload {
        name: "web-frontend",
        namespace: "default",
        tag: "DEP",
        status: "Degraded",
        ready: "1/2",
        age: "4d",
        replicas: 2,
        containers: &[("web", "ghcr.io/podji/web:3.2.0")],
        tier: "frontend",
    },
    Workload {
        name: "redis",
        namespace: "default",
        tag: "STS",
        status: "Running",
        ready: "1/1",
        age: "40d",
        replicas: 1,
        containers: &[("redis", "redis:7.2-alpine")],
        tier: "cache",
    },
    Workload {
        name: "log-shipper",
        namespace: "default",
        tag: "DS",
        status: "Running",
        ready: "3/3",
        age: "30d",
        replicas: 3,
        containers: &[("fluent-bit", "fluent/fluent-bit:3.0.4")],
        tier: "platform",
    },
    Workload {
        name: "nightly-report",
        namespace: "default",
        tag: "CJ",
        status: "Suspended",
        ready: "0/0",
        age: "9d",
        replicas: 0,
        containers: &[("report", "ghcr.io/podji/report:0.4.1")],
        tier: "batch",
    },
    Workload {
        name: "db-migrate",
        namespace: "default",
        tag: "JOB",
        status: "Completed",
        ready: "1/1",
        age: "2h",
        replicas: 1,
        containers: &[("migrate", "ghcr.io/podji/migrate:2024.05")],
        tier: "batch",
    },
    Workload {
        name: "payments-api",
        namespace: "payments",
        tag: "DEP",
        status: "CrashLoopBackOff",
        ready: "0/2",
        age: "6h",
        replicas: 2,
        containers: &[
            ("api", "ghcr.io/podji/payments:5.0.0-rc1"),
            ("vault-agent", "hashicorp/vault:1.16"),
        ],
        tier: "backend",
    },
    Workload {
        name: "ledger",
        namespace: "payments",
        tag: "STS",
        status: "Pending",
        ready: "0/1",
        age: "15m",
        replicas: 1,
        containers: &[("ledger", "ghcr.io/podji/ledger:1.1.0")],
        tier: "backend",
    },
    Workload {
        name: "prometheus",
        namespace: "monitoring",
        tag: "STS",
        status: "Running",
        ready: "1/1",
        age: "21d",
        replicas: 1,
        containers: &[
            ("prometheus", "quay.io/prometheus/prometheus:v2.52.0"),
            ("config-reloader", "quay.io/prometheus-operator/prometheus-config-reloader:v0.74.0"),
        ],
        tier: "observability",
    },
    Workload {
        name: "grafana",
        namespace: "monitoring",
        tag: "DEP",
        status: "Progressing",
        ready: "1/2",
        age: "30m",
        replicas: 2,
        containers: &[("grafana", "grafana/grafana:11.0.0")],
        tier: "observability",
    },
    Workload {
        name: "node-exporter",
        namespace: "monitoring",
        tag: "DS",
        status: "Running",
        ready: "3/3",
        age: "21d",
        replicas: 3,
        containers: &[("node-exporter", "quay.io/prometheus/node-exporter:v1.8.1")],
        tier: "observability",
    },
    Workload {
        name: "coredns",
        namespace: "kube-system",
        tag: "DEP",
        status: "Running",
        ready: "2/2",
        age: "90d",
        replicas: 2,
        containers: &[("coredns", "registry.k8s.io/coredns/coredns:v1.11.1")],
        tier: "platform",
    },
    Workload {
        name: "kube-proxy",
        namespace: "kube-system",
        tag: "DS",
        status: "Running",
        ready: "3/3",
        age: "90d",
        replicas: 3,
        containers: &[("kube-proxy", "registry.k8s.io/kube-proxy:v1.30.0")],
        tier: "platform",
    },
];

#[derive(Debug, Clone)]
pub struct Pod {
    pub name: String,
    pub namespace: &'static str,
    pub workload: &'static Workload,
    pub status: &'static str,
    pub ready: String,
    pub restarts: u32,
    pub age: &'static str,
    pub node: &'static str,
    pub ip: String,
}

#[derive(Debug, Clone, Copy)]
pub struct Service {
    pub name: &'static str,
    pub namespace: &'static str,
    pub kind: &'static str,
    pub cluster_ip: &'static str,
    pub ports: &'static str,
    pub selector: &'static str,
    pub age: &'static str,
}

pub const SERVICES: &[Service] = &[
    Service {
        name: "api-gateway",
        namespace: "default",
        kind: "ClusterIP",
        cluster_ip: "10.96.12.4",
        ports: "80/TCP,443/TCP",
        selector: "api-gateway",
        age: "12d",
    },
    Service {
        name: "web-frontend",
        namespace: "default",
        kind: "LoadBalancer",
        cluster_ip: "10.96.40.2",
        ports: "80:31080/TCP",
        selector: "web-frontend",
        age: "4d",
    },
    Service {
        name: "redis",
        namespace: "default",
        kind: "ClusterIP",
        cluster_ip: "10.96.7.9",
        ports: "6379/TCP",
        selector: "redis",
        age: "40d",
    },
    Service {
        name: "payments-api",
        namespace: "payments",
        kind: "ClusterIP",
        cluster_ip: "10.96.88.17",
        ports: "8080/TCP",
        selector: "payments-api",
        age: "6h",
    },
    Service {
        name: "ledger-headless",
        namespace: "payments",
        kind: "ClusterIP",
        cluster_ip: "None",
        ports: "5432/TCP",
        selector: "ledger",
        age: "15m",
    },
    Service {
        name: "prometheus",
        namespace: "monitoring",
        kind: "ClusterIP",
        cluster_ip: "10.96.3.30",
        ports: "9090/TCP",
        selector: "prometheus",
        age: "21d",
    },
    Service {
        name: "grafana",
        namespace: "monitoring",
        kind: "NodePort",
        cluster_ip: "10.96.3.41",
        ports: "3000:30300/TCP",
        selector: "grafana",
        age: "30m",
    },
    Service {
        name: "kube-dns",
        namespace: "kube-system",
        kind: "ClusterIP",
        cluster_ip: "10.96.0.10",
        ports: "53/UDP,53/TCP",
        selector: "coredns",
        age: "90d",
    },
];

#[derive(Debug, Clone, Copy)]
pub struct ConfigObject {
    pub name: &'static str,
    pub namespace: &'static str,
    pub secret: bool,
    pub keys: &'static [&'static str],
    pub consumers: &'static [&'static str],
    pub age: &'static str,
}

pub const CONFIG_OBJECTS: &[ConfigObject] = &[
    ConfigObject {
        name: "gateway-routes",
        namespace: "default",
        secret: false,
        keys: &["routes.yaml", "ratelimit.yaml"],
        consumers: &["api-gateway"],
        age: "12d",
    },
    ConfigObject {
        name: "web-settings",
        namespace: "default",
        secret: false,
        keys: &["settings.json"],
        consumers: &["web-frontend"],
        age: "4d",
    },
    ConfigObject {
        name: "gateway-tls",
        namespace: "default",
        secret: true,
        keys: &["tls.crt", "tls.key"],
        consumers: &["api-gateway"],
        age: "12d",
    },
    ConfigObject {
        name: "redis-auth",
        namespace: "default",
        secret: true,
        keys: &["password"],
        consumers: &["redis", "api-gateway"],
        age: "40d",
    },
    ConfigObject {
        name: "payments-config",
        namespace: "payments",
        secret: false,
        keys: &["application.yaml"],
        consumers: &["payments-api", "ledger"],
        age: "6h",
    },
    ConfigObject {
        name: "payments-db",
        namespace: "payments",
        secret: true,
        keys: &["username", "password", "url"],
        consumers: &["payments-api", "ledger"],
        age: "6h",
    },
    ConfigObject {
        name: "prometheus-rules",
        namespace: "monitoring",
        secret: false,
        keys: &["alerts.yaml", "recording.yaml"],
        consumers: &["prometheus"],
        age: "21d",
    },
    ConfigObject {
        name: "grafana-admin",
        namespace: "monitoring",
        secret: true,
        keys: &["admin-user", "admin-password"],
        consumers: &["grafana"],
        age: "30m",
    },
    ConfigObject {
        name: "coredns",
        namespace: "kube-system",
        secret: false,
        keys: &["Corefile"],
        consumers: &["coredns"],
        age: "90d",
    },
];

#[derive(Debug, Clone, Copy)]
pub struct Claim {
    pub name: &'static str,
    pub namespace: &'static str,
    pub status: &'static str,
    pub capacity: &'static str,
    pub storage_class: &'static str,
    pub mounted_by: &'static str,
    pub age: &'static str,
}

pub const CLAIMS: &[Claim] = &[
    Claim {
        name: "data-redis-0",
        namespace: "default",
        status: "Bound",
        capacity: "8Gi",
        storage_class: "standard",
        mounted_by: "redis",
        age: "40d",
    },
    Claim {
        name: "data-ledger-0",
        namespace: "payments",
        status: "Pending",
        capacity: "50Gi",
        storage_class: "fast-ssd",
        mounted_by: "ledger",
        age: "15m",
    },
    Claim {
        name: "prometheus-db",
        namespace: "monitoring",
        status: "Bound",
        capacity: "100Gi",
        storage_class: "standard",
        mounted_by: "prometheus",
        age: "21d",
    },
    Claim {
        name: "grafana-storage",
        namespace: "monitoring",
        status: "Bound",
        capacity: "10Gi",
        storage_class: "standard",
        mounted_by: "grafana",
        age: "30m",
    },
];

#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub name: &'static str,
    pub status: &'static str,
    pub roles: &'static str,
    pub version: &'static str,
    pub age: &'static str,
}

pub const NODES: &[Node] = &[
    Node {
        name: "control-plane-1",
        status: "Ready",
        roles: "control-plane",
        version: "v1.30.0",
        age: "90d",
    },
    Node {
        name: "worker-a",
        status: "Ready",
        roles: "worker",
        version: "v1.30.0",
        age: "90d",
    },
    Node {
        name: "worker-b",
        status: "NotReady",
        roles: "worker",
        version: "v1.30.0",
        age: "45d",
    },
];

#[derive(Debug, Clone)]
pub struct EventRecord {
    pub namespace: &'static str,
    pub object: String,
    pub kind: &'static str,
    pub severity: &'static str,
    pub reason: &'static str,
    pub message: String,
    pub age: &'static str,
}

impl EventRecord {
    pub fn name(&self) -> String {
        format!("{}.{}", self.object, self.reason.to_ascii_lowercase())
    }

    pub fn line(&self) -> String {
        format!(
            "{:<5} {:<8} {:<18} {}/{}: {}",
            self.age, self.severity, self.reason, self.kind, self.object, self.message
        )
    }
}

pub fn custom_resources() -> Vec<CustomResourceDef> {
    [
        ("certificates", "cert-manager.io", "v1", "Certificate", true),
        ("clusterissuers", "cert-manager.io", "v1", "ClusterIssuer", false),
        ("servicemonitors", "monitoring.coreos.com", "v1", "ServiceMonitor", true),
        (
            "kustomizations",
            "kustomize.toolkit.fluxcd.io",
            "v1",
            "Kustomization",
            true,
        ),
    ]
    .into_iter()
    .map(|(plural, group, version, kind, namespaced)| CustomResourceDef {
        name: format!("{plural}.{group}"),
        group: group.to_string(),
        version: version.to_string(),
        kind: kind.to_string(),
        plural: plural.to_string(),
        namespaced,
    })
    .collect()
}

pub fn in_scope(namespace: &str, scope: &NamespaceScope) -> bool {
    match scope {
        NamespaceScope::All => true,
        NamespaceScope::Named(name) => name == namespace,
    }
}

pub fn workloads(scope: &NamespaceScope) -> Vec<&'static Workload> {
    WORKLOADS
        .iter()
        .filter(|workload| in_scope(workload.namespace, scope))
        .collect()
}

pub fn workload(namespace: &str, name: &str) -> Option<&'static Workload> {
    WORKLOADS
        .iter()
        .find(|workload| workload.namespace == namespace && workload.name == name)
}

/// The workload whose name prefixes the pod name.
pub fn pod_owner(namespace: &str, pod: &str) -> Option<&'static Workload> {
    WORKLOADS
        .iter()
        .filter(|workload| workload.namespace == namespace)
        .filter(|workload| {
            pod.strip_prefix(workload.name)
                .is_some_and(|rest| rest.starts_with('-'))
        })
        .max_by_key(|workload| workload.name.len())
}

const POD_SUFFIXES: &[&str] = &["7c9d5-x2kqp", "7c9d5-m8wzt", "7c9d5-q4jrd"];
const NODE_NAMES: &[&str] = &["worker-a", "worker-b", "control-plane-1"];

pub fn pods_of(workload: &'static Workload) -> Vec<Pod> {
    let count = workload.containers.len();
    (0..workload.replicas)
        .map(|index| {
            let suffix = match workload.tag {
                "STS" => index.to_string(),
                "DS" => ["h7x2p", "k3n9v", "z8c4w"][index % 3].to_string(),
                "JOB" => "8fk2l".to_string(),
                _ => POD_SUFFIXES[index % POD_SUFFIXES.len()].to_string(),
            };
            let last = index + 1 == workload.replicas;
            let status = match workload.status {
                "CrashLoopBackOff" => "CrashLoopBackOff",
                "Pending" => "Pending",
                "Completed" => "Completed",
                "Degraded" if last => "CrashLoopBackOff",
                "Progressing" if last => "ContainerCreating",
                _ => "Running",
            };
            let ready_containers = if status == "Running" { count } else { 0 };
            let restarts = match status {
                "CrashLoopBackOff" => 14 + index as u32 * 3,
                "Running" if workload.tag == "DS" => index as u32,
                _ => 0,
            };
            Pod {
                name: format!("{}-{suffix}", workload.name),
                namespace: workload.namespace,
                workload,
                status,
                ready: format!("{ready_containers}/{count}"),
                restarts,
                age: workload.age,
                node: if status == "Pending" {
                    "<none>"
                } else {
                    NODE_NAMES[index % NODE_NAMES.len()]
                },
                ip: if status == "Pending" {
                    "<none>".to_string()
                } else {
                    format!("10.244.{}.{}", index + 1, 10 + workload.name.len())
                },
            }
        })
        .collect()
}

pub fn pods(scope: &NamespaceScope) -> Vec<Pod> {
    workloads(scope).into_iter().flat_map(pods_of).collect()
}

pub fn pod(namespace: &str, name: &str) -> Option<Pod> {
    let owner = pod_owner(namespace, name)?;
    pods_of(owner).into_iter().find(|pod| pod.name == name)
}

pub fn services(scope: &NamespaceScope) -> Vec<&'static Service> {
    SERVICES
        .iter()
        .filter(|service| in_scope(service.namespace, scope))
        .collect()
}

pub fn service(namespace: &str, name: &str) -> Option<&'static Service> {
    SERVICES
        .iter()
        .find(|service| service.namespace == namespace && service.name == name)
}

pub fn config_objects(scope: &NamespaceScope, secret: bool) -> Vec<&'static ConfigObject> {
    CONFIG_OBJECTS
        .iter()
        .filter(|object| object.secret == secret && in_scope(object.namespace, scope))
        .collect()
}

pub fn config_object(namespace: &str, name: &str, secret: bool) -> Option<&'static ConfigObject> {
    CONFIG_OBJECTS.iter().find(|object| {
        object.secret == secret && object.namespace == namespace && object.name == name
    })
}

pub fn claims(scope: &NamespaceScope) -> Vec<&'static Claim> {
    CLAIMS
        .iter()
        .filter(|claim| in_scope(claim.namespace, scope))
        .collect()
}

pub fn claim(namespace: &str, name: &str) -> Option<&'static Claim> {
    CLAIMS
        .iter()
        .find(|claim| claim.namespace == namespace && claim.name == name)
}

pub fn node(name: &str) -> Option<&'static Node> {
    NODES.iter().find(|node| node.name == name)
}

pub fn events(scope: &NamespaceScope) -> Vec<EventRecord> {
    let mut records = Vec::new();
    for workload in workloads(scope) {
        records.extend(workload_events(workload));
        for pod in pods_of(workload) {
            records.extend(pod_events(&pod));
        }
    }
    for claim in claims(scope) {
        if claim.status == "Pending" {
            records.push(EventRecord {
                namespace: claim.namespace,
                object: claim.name.to_string(),
                kind: "PersistentVolumeClaim",
                severity: "Warning",
                reason: "ProvisioningFailed",
                message: format!(
                    "storageclass.storage.k8s.io \"{}\" not found",
                    claim.storage_class
                ),
                age: claim.age,
            });
        }
    }
    records
}

fn workload_events(workload: &Workload) -> Vec<EventRecord> {
    let event = |severity, reason, message: String, age| EventRecord {
        namespace: workload.namespace,
        object: workload.name.to_string(),
        kind: workload.api_kind(),
        severity,
        reason,
        message,
        age,
    };
    match workload.status {
        "Progressing" => vec![event(
            "Normal",
            "ScalingReplicaSet",
            format!("Scaled up replica set {}-7c9d5 to {}", workload.name, workload.replicas),
            "2m",
        )],
        "Suspended" => vec![event(
            "Normal",
            "SuspendedCronJob",
            "Cron job is suspended, skipping schedule".to_string(),
            "1d",
        )],
        "Completed" => vec![event(
            "Normal",
            "Completed",
            "Job completed".to_string(),
            "2h",
        )],
        _ => Vec::new(),
    }
}

fn pod_events(pod: &Pod) -> Vec<EventRecord> {
    let event = |severity, reason, message: String, age| EventRecord {
        namespace: pod.namespace,
        object: pod.name.clone(),
        kind: "Pod",
        severity,
        reason,
        message,
        age,
    };
    match pod.status {
        "CrashLoopBackOff" => vec![
            event(
                "Normal",
                "Pulled",
                format!("Container image \"{}\" already present on machine", pod.workload.containers[0].1),
                "3m",
            ),
            event(
                "Warning",
                "BackOff",
                format!("Back-off restarting failed container {}", pod.workload.containers[0].0),
                "45s",
            ),
        ],
        "Pending" => vec![event(
            "Warning",
            "FailedScheduling",
            "0/3 nodes are available: 3 Insufficient memory.".to_string(),
            "1m",
        )],
        "ContainerCreating" => vec![event(
            "Normal",
            "Pulling",
            format!("Pulling image \"{}\"", pod.workload.containers[0].1),
            "20s",
        )],
        "Running" if pod.restarts > 0 => vec![event(
            "Warning",
            "Unhealthy",
            "Readiness probe failed: HTTP probe failed with statuscode: 503".to_string(),
            "5m",
        )],
        "Running" => vec![event(
            "Normal",
            "Started",
            format!("Started container {}", pod.workload.containers[0].0),
            pod.age,
        )],
        _ => Vec::new(),
    }
}

/// Events whose object is `name` or one of the pods it owns.
pub fn events_for(namespace: &str, name: &str) -> Vec<EventRecord> {
    events(&NamespaceScope::Named(namespace.to_string()))
        .into_iter()
        .filter(|record| {
            record.object == name
                || record
                    .object
                    .strip_prefix(name)
                    .is_some_and(|rest| rest.starts_with('-'))
        })
        .collect()
}

const LOG_SPAN_MINUTES: i64 = 400;
const LOG_STEP_MINUTES: i64 = 9;

/// Reference instant for every synthetic timestamp.
pub fn log_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 14, 9, 30, 0)
        .single()
        .unwrap_or_default()
}

pub fn log_lines(
    pod: &Pod,
    container: &str,
    previous: bool,
    since_minutes: Option<u64>,
) -> Vec<String> {
    if previous {
        if pod.restarts == 0 {
            return vec![format!(
                "previous terminated container \"{container}\" in pod \"{}\" not found",
                pod.name
            )];
        }
        let end = log_epoch() - Duration::minutes(4);
        return vec![
            format_log(end - Duration::seconds(3), "INFO", container, "starting"),
            format_log(
                end - Duration::seconds(1),
                "ERROR",
                container,
                "failed to connect to database: connection refused",
            ),
            format_log(end, "FATAL", container, "exiting with status 1"),
        ];
    }

    let epoch = log_epoch();
    (0..=LOG_SPAN_MINUTES / LOG_STEP_MINUTES)
        .rev()
        .enumerate()
        .filter(|(_, step)| {
            since_minutes.is_none_or(|since| (step * LOG_STEP_MINUTES) as u64 <= since)
        })
        .map(|(seq, step)| {
            format_log(
                epoch - Duration::minutes(step * LOG_STEP_MINUTES),
                level_for(pod.status, seq),
                container,
                message_for(pod.workload.tier, seq),
            )
        })
        .collect()
}

/// The line appended on the `seq`-th follow tick.
pub fn follow_line(pod: &Pod, container: &str, seq: u64) -> String {
    let at = log_epoch() + Duration::seconds(seq as i64);
    format_log(
        at,
        level_for(pod.status, seq as usize),
        container,
        message_for(pod.workload.tier, seq as usize),
    )
}

fn format_log(at: DateTime<Utc>, level: &str, container: &str, message: &str) -> String {
    format!(
        "{} {level:<5} [{container}] {message}",
        at.format("%Y-%m-%dT%H:%M:%SZ")
    )
}

fn level_for(status: &str, seq: usize) -> &'static str {
    match status {
        "CrashLoopBackOff" if seq % 3 == 0 => "ERROR",
        "Running" | "Completed" if seq % 11 == 7 => "WARN",
        _ => "INFO",
    }
}

fn message_for(tier: &str, seq: usize) -> &'static str {
    let messages: &[&str] = match tier {
        "edge" => &[
            "GET /healthz 200 1ms",
            "POST /v1/orders 201 38ms",
            "GET /v1/catalog 200 12ms",
            "upstream payments-api returned 503, retrying",
        ],
        "frontend" => &[
            "rendered / in 24ms",
            "cache miss for /products",
            "served static bundle main.js",
        ],
        "cache" => &[
            "DB saved on disk",
            "Background saving started",
            "1 changes in 60 seconds. Saving...",
        ],
        "backend" => &[
            "processing batch of 50 transactions",
            "failed to connect to database: connection refused",
            "retrying in 5s",
        ],
        "observability" => &[
            "scrape completed for 42 targets",
            "compacting block range",
            "dashboard provisioning finished",
        ],
        "batch" => &["job started", "processed 1200 rows", "job finished"],
        _ => &["sync loop finished", "watching for changes"],
    };
    messages[seq % messages.len()]
}

#[cfg(test)]
mod tests {
    use super::{events_for, log_lines, pod, pod_owner, pods, pods_of, workload, workloads};
    use crate::model::NamespaceScope;

    fn named(namespace: &str) -> NamespaceScope {
        NamespaceScope::Named(namespace.to_string())
    }

    #[test]
    fn namespace_scope_filters_workloads() {
        assert!(
            workloads(&named("payments"))
                .iter()
                .all(|workload| workload.namespace == "payments")
        );
        assert!(workloads(&NamespaceScope::All).len() > workloads(&named("default")).len());
    }

    #[test]
    fn pods_are_named_after_their_workload() {
        let redis = workload("default", "redis").expect("redis fixture");
        let pods = pods_of(redis);
        assert_eq!(pods.len(), 1);
        assert_eq!(pods[0].name, "redis-0");
        assert_eq!(
            pod_owner("default", "redis-0").map(|owner| owner.name),
            Some("redis")
        );
        assert!(pod("default", "redis-0").is_some());
        assert!(pod_owner("default", "redisx-0").is_none());
    }

    #[test]
    fn crashlooping_workloads_produce_warning_events() {
        let events = events_for("payments", "payments-api");
        assert!(events.iter().any(|event| event.reason == "BackOff"));
        assert!(pods(&named("payments")).iter().any(|pod| pod.restarts > 0));
    }

    #[test]
    fn since_window_limits_log_lines() {
        let gateway = workload("default", "api-gateway").expect("gateway fixture");
        let pod = &pods_of(gateway)[0];
        let all = log_lines(pod, "gateway", false, None);
        let hour = log_lines(pod, "gateway", false, Some(60));
        let minute = log_lines(pod, "gateway", false, Some(1));
        assert!(all.len() > hour.len());
        assert!(hour.len() > minute.len());
        assert_eq!(minute.len(), 1);
        assert!(all[0].starts_with("2024-05-14T"));
    }
}
