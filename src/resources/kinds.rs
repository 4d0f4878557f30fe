use super::fixtures::{self, Pod, Workload};
use super::{LogRequest, ResourceType, base_row, describe_common, to_yaml};
use crate::model::{
    ContainerRow, CustomResourceDef, DetailData, NamespaceScope, ResourceItem, SortMode,
    TableColumn,
};
use serde_json::json;
use std::collections::BTreeMap;

#[allow(clippy::too_many_arguments)]
fn make_item(
    name: &str,
    namespace: &str,
    status: &str,
    ready: &str,
    restarts: &str,
    age: &str,
    kind: &str,
    labels: &[(&str, &str)],
) -> ResourceItem {
    ResourceItem {
        name: name.to_string(),
        status: status.to_string(),
        ready: ready.to_string(),
        restarts: restarts.to_string(),
        age: age.to_string(),
        kind: kind.to_string(),
        namespace: namespace.to_string(),
        labels: labels
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
    }
}

fn metadata(item: &ResourceItem) -> serde_json::Value {
    let mut meta = json!({ "name": item.name });
    if !item.namespace.is_empty() {
        meta["namespace"] = json!(item.namespace);
    }
    if !item.labels.is_empty() {
        meta["labels"] = json!(item.labels);
    }
    meta
}

fn event_lines(namespace: &str, name: &str) -> Vec<String> {
    fixtures::events_for(namespace, name)
        .iter()
        .map(fixtures::EventRecord::line)
        .collect()
}

fn container_rows(workload: &Workload, pod_status: &str, restarts: u32) -> Vec<ContainerRow> {
    workload
        .containers
        .iter()
        .enumerate()
        .map(|(index, (name, image))| {
            let (state, reason) = match pod_status {
                "Running" => ("Running", ""),
                "Completed" => ("Terminated", "Completed"),
                "CrashLoopBackOff" if index == 0 => ("Waiting", "CrashLoopBackOff"),
                "CrashLoopBackOff" => ("Running", ""),
                "ContainerCreating" => ("Waiting", "ContainerCreating"),
                _ => ("Waiting", "PodInitializing"),
            };
            ContainerRow {
                name: name.to_string(),
                image: image.to_string(),
                state: state.to_string(),
                restarts: (if index == 0 { restarts } else { 0 }).to_string(),
                reason: reason.to_string(),
            }
        })
        .collect()
}

fn pod_item(pod: &Pod) -> ResourceItem {
    make_item(
        &pod.name,
        pod.namespace,
        pod.status,
        &pod.ready,
        &pod.restarts.to_string(),
        pod.age,
        "PO",
        &[("app", pod.workload.name), ("tier", pod.workload.tier)],
    )
}

fn pod_for(item: &ResourceItem) -> Option<Pod> {
    fixtures::pod(&item.namespace, &item.name)
}

fn workload_for(item: &ResourceItem) -> Option<&'static Workload> {
    fixtures::workload(&item.namespace, &item.name)
}

fn pod_logs(pod: &Pod, request: &LogRequest) -> Vec<String> {
    let container = request
        .container
        .clone()
        .unwrap_or_else(|| pod.workload.containers[0].0.to_string());
    fixtures::log_lines(pod, &container, request.previous, request.since_minutes)
}

/// Workloads, either every controller type merged or one type only.
#[derive(Debug, Clone)]
pub struct WorkloadKind {
    name: &'static str,
    tag: &'static str,
    only: Option<&'static str>,
    hotkey: Option<char>,
    aliases: &'static [&'static str],
    group: &'static str,
}

impl WorkloadKind {
    pub fn all() -> Self {
        Self {
            name: "workloads",
            tag: "Workload",
            only: None,
            hotkey: Some('W'),
            aliases: &["wl", "workload"],
            group: "apps",
        }
    }

    pub fn deployments() -> Self {
        Self {
            name: "deployments",
            tag: "DEP",
            only: Some("DEP"),
            hotkey: Some('D'),
            aliases: &["deploy", "deployment", "dep"],
            group: "apps",
        }
    }

    pub fn statefulsets() -> Self {
        Self {
            name: "statefulsets",
            tag: "STS",
            only: Some("STS"),
            hotkey: None,
            aliases: &["sts", "statefulset"],
            group: "apps",
        }
    }

    pub fn daemonsets() -> Self {
        Self {
            name: "daemonsets",
            tag: "DS",
            only: Some("DS"),
            hotkey: None,
            aliases: &["ds", "daemonset"],
            group: "apps",
        }
    }

    pub fn cronjobs() -> Self {
        Self {
            name: "cronjobs",
            tag: "CJ",
            only: Some("CJ"),
            hotkey: None,
            aliases: &["cj", "cronjob"],
            group: "batch",
        }
    }

    pub fn jobs() -> Self {
        Self {
            name: "jobs",
            tag: "JOB",
            only: Some("JOB"),
            hotkey: None,
            aliases: &["job"],
            group: "batch",
        }
    }
}

impl ResourceType for WorkloadKind {
    fn name(&self) -> &str {
        self.name
    }

    fn tag(&self) -> &str {
        self.tag
    }

    fn hotkey(&self) -> Option<char> {
        self.hotkey
    }

    fn aliases(&self) -> &[&'static str] {
        self.aliases
    }

    fn group(&self) -> &str {
        self.group
    }

    fn items(&self, namespace: &NamespaceScope) -> Vec<ResourceItem> {
        fixtures::workloads(namespace)
            .into_iter()
            .filter(|workload| self.only.is_none_or(|tag| workload.tag == tag))
            .map(|workload| {
                let restarts = fixtures::pods_of(workload)
                    .iter()
                    .map(|pod| pod.restarts)
                    .sum::<u32>();
                make_item(
                    workload.name,
                    workload.namespace,
                    workload.status,
                    workload.ready,
                    &restarts.to_string(),
                    workload.age,
                    workload.tag,
                    &[("app", workload.name), ("tier", workload.tier)],
                )
            })
            .collect()
    }

    fn sort_modes(&self) -> Vec<SortMode> {
        if self.only.is_none() {
            vec![
                SortMode::Name,
                SortMode::Status,
                SortMode::Kind,
                SortMode::Age,
                SortMode::Problem,
            ]
        } else {
            vec![
                SortMode::Name,
                SortMode::Status,
                SortMode::Age,
                SortMode::Problem,
            ]
        }
    }

    fn columns(&self) -> Vec<TableColumn> {
        vec![
            TableColumn::new("name", "NAME", 28, true),
            TableColumn::new("kind", "KIND", 5, self.only.is_none()),
            TableColumn::new("status", "STATUS", 18, true),
            TableColumn::new("ready", "READY", 7, true),
            TableColumn::new("restarts", "RESTARTS", 9, true),
            TableColumn::new("age", "AGE", 6, true),
            TableColumn::new("images", "IMAGES", 40, true).wide(),
        ]
    }

    fn row(&self, item: &ResourceItem) -> BTreeMap<String, String> {
        let mut row = base_row(item);
        if let Some(workload) = workload_for(item) {
            row.insert("images".to_string(), workload.images());
        }
        row
    }

    fn detail(&self, item: &ResourceItem) -> DetailData {
        let Some(workload) = workload_for(item) else {
            return DetailData {
                summary: format!("{} not found", item.name),
                ..DetailData::default()
            };
        };
        let conditions = match workload.status {
            "Running" | "Completed" => vec!["Available=True".to_string()],
            "Suspended" => vec!["Suspended=True".to_string()],
            "Progressing" => vec![
                "Available=False  MinimumReplicasUnavailable".to_string(),
                "Progressing=True  ReplicaSetUpdated".to_string(),
            ],
            _ => vec!["Available=False  MinimumReplicasUnavailable".to_string()],
        };
        let restarts = item.restarts.parse::<u32>().unwrap_or(0);
        let pod_status = fixtures::pods_of(workload)
            .first()
            .map_or(workload.status, |pod| pod.status);
        DetailData {
            summary: format!(
                "{} {} · {} ready · {}",
                workload.api_kind(),
                workload.name,
                workload.ready,
                workload.status
            ),
            containers: container_rows(workload, pod_status, restarts),
            conditions,
            events: event_lines(&item.namespace, &item.name),
            labels: item.label_lines(),
        }
    }

    fn logs(&self, item: &ResourceItem, request: &LogRequest) -> Vec<String> {
        match workload_for(item).and_then(|workload| fixtures::pods_of(workload).into_iter().next())
        {
            Some(pod) => pod_logs(&pod, request),
            None => vec![format!("no pods running for {}", item.name)],
        }
    }

    fn follow_line(&self, item: &ResourceItem, container: &str, seq: u64) -> Option<String> {
        let pod = fixtures::pods_of(workload_for(item)?).into_iter().next()?;
        Some(fixtures::follow_line(&pod, container, seq))
    }

    fn yaml(&self, item: &ResourceItem) -> String {
        let Some(workload) = workload_for(item) else {
            return to_yaml(&json!({ "metadata": metadata(item) }));
        };
        let containers = workload
            .containers
            .iter()
            .map(|(name, image)| json!({ "name": name, "image": image }))
            .collect::<Vec<_>>();
        let api_version = if workload.tag == "CJ" || workload.tag == "JOB" {
            "batch/v1"
        } else {
            "apps/v1"
        };
        to_yaml(&json!({
            "apiVersion": api_version,
            "kind": workload.api_kind(),
            "metadata": metadata(item),
            "spec": {
                "replicas": workload.replicas,
                "selector": { "matchLabels": { "app": workload.name } },
                "template": { "spec": { "containers": containers } },
            },
            "status": { "ready": workload.ready, "phase": workload.status },
        }))
    }

    fn describe(&self, item: &ResourceItem) -> String {
        let Some(workload) = workload_for(item) else {
            return describe_common(self.name, item, &[]);
        };
        describe_common(
            workload.api_kind(),
            item,
            &[
                ("Replicas", format!("{} desired | {} ready", workload.replicas, workload.ready)),
                ("Selector", format!("app={}", workload.name)),
                ("Images", workload.images()),
            ],
        )
    }

    fn pods(&self, item: &ResourceItem) -> Vec<ResourceItem> {
        workload_for(item)
            .map(|workload| fixtures::pods_of(workload).iter().map(pod_item).collect())
            .unwrap_or_default()
    }

    fn empty_message(&self, namespace: &NamespaceScope) -> Option<String> {
        Some(format!("No {} in {}.", self.name, scope_phrase(namespace)))
    }
}

fn scope_phrase(namespace: &NamespaceScope) -> String {
    match namespace {
        NamespaceScope::All => "any namespace".to_string(),
        NamespaceScope::Named(name) => format!("namespace {name}"),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PodKind;

impl ResourceType for PodKind {
    fn name(&self) -> &str {
        "pods"
    }

    fn tag(&self) -> &str {
        "PO"
    }

    fn hotkey(&self) -> Option<char> {
        Some('P')
    }

    fn aliases(&self) -> &[&'static str] {
        &["po", "pod"]
    }

    fn items(&self, namespace: &NamespaceScope) -> Vec<ResourceItem> {
        fixtures::pods(namespace).iter().map(pod_item).collect()
    }

    fn sort_modes(&self) -> Vec<SortMode> {
        vec![
            SortMode::Name,
            SortMode::Status,
            SortMode::Age,
            SortMode::Problem,
        ]
    }

    fn columns(&self) -> Vec<TableColumn> {
        vec![
            TableColumn::new("name", "NAME", 34, true),
            TableColumn::new("status", "STATUS", 18, true),
            TableColumn::new("ready", "READY", 7, true),
            TableColumn::new("restarts", "RESTARTS", 9, true),
            TableColumn::new("age", "AGE", 6, true),
            TableColumn::new("node", "NODE", 16, true).wide(),
            TableColumn::new("ip", "IP", 14, false).wide(),
        ]
    }

    fn row(&self, item: &ResourceItem) -> BTreeMap<String, String> {
        let mut row = base_row(item);
        if let Some(pod) = pod_for(item) {
            row.insert("node".to_string(), pod.node.to_string());
            row.insert("ip".to_string(), pod.ip);
        }
        row
    }

    fn detail(&self, item: &ResourceItem) -> DetailData {
        let Some(pod) = pod_for(item) else {
            return DetailData {
                summary: format!("{} not found", item.name),
                ..DetailData::default()
            };
        };
        let ready = pod.status == "Running";
        DetailData {
            summary: format!(
                "Pod {} · {} · node {} · {} restarts",
                pod.name, pod.status, pod.node, pod.restarts
            ),
            containers: container_rows(pod.workload, pod.status, pod.restarts),
            conditions: vec![
                format!("PodScheduled={}", if pod.node == "<none>" { "False" } else { "True" }),
                format!("ContainersReady={}", if ready { "True" } else { "False" }),
                format!("Ready={}", if ready { "True" } else { "False" }),
            ],
            events: event_lines(pod.namespace, &pod.name),
            labels: item.label_lines(),
        }
    }

    fn logs(&self, item: &ResourceItem, request: &LogRequest) -> Vec<String> {
        match pod_for(item) {
            Some(pod) => pod_logs(&pod, request),
            None => vec![format!("pod {} not found", item.name)],
        }
    }

    fn follow_line(&self, item: &ResourceItem, container: &str, seq: u64) -> Option<String> {
        pod_for(item).map(|pod| fixtures::follow_line(&pod, container, seq))
    }

    fn yaml(&self, item: &ResourceItem) -> String {
        let Some(pod) = pod_for(item) else {
            return to_yaml(&json!({ "metadata": metadata(item) }));
        };
        let containers = pod
            .workload
            .containers
            .iter()
            .map(|(name, image)| json!({ "name": name, "image": image }))
            .collect::<Vec<_>>();
        to_yaml(&json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": metadata(item),
            "spec": { "nodeName": pod.node, "containers": containers },
            "status": { "phase": pod.status, "podIP": pod.ip, "restartCount": pod.restarts },
        }))
    }

    fn describe(&self, item: &ResourceItem) -> String {
        let Some(pod) = pod_for(item) else {
            return describe_common("Pod", item, &[]);
        };
        describe_common(
            "Pod",
            item,
            &[
                ("Node", pod.node.to_string()),
                ("IP", pod.ip.clone()),
                (
                    "Controlled By",
                    format!("{}/{}", pod.workload.api_kind(), pod.workload.name),
                ),
                ("Restarts", pod.restarts.to_string()),
            ],
        )
    }

    fn pods(&self, item: &ResourceItem) -> Vec<ResourceItem> {
        vec![item.clone()]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ServiceKind;

impl ResourceType for ServiceKind {
    fn name(&self) -> &str {
        "services"
    }

    fn tag(&self) -> &str {
        "SVC"
    }

    fn hotkey(&self) -> Option<char> {
        Some('S')
    }

    fn aliases(&self) -> &[&'static str] {
        &["svc", "service"]
    }

    fn items(&self, namespace: &NamespaceScope) -> Vec<ResourceItem> {
        fixtures::services(namespace)
            .into_iter()
            .map(|service| {
                make_item(
                    service.name,
                    service.namespace,
                    "Active",
                    "-",
                    "-",
                    service.age,
                    "SVC",
                    &[("app", service.selector)],
                )
            })
            .collect()
    }

    fn columns(&self) -> Vec<TableColumn> {
        vec![
            TableColumn::new("name", "NAME", 28, true),
            TableColumn::new("type", "TYPE", 13, true),
            TableColumn::new("cluster-ip", "CLUSTER-IP", 14, true),
            TableColumn::new("ports", "PORTS", 18, true),
            TableColumn::new("selector", "SELECTOR", 20, false).wide(),
            TableColumn::new("age", "AGE", 6, true),
        ]
    }

    fn row(&self, item: &ResourceItem) -> BTreeMap<String, String> {
        let mut row = base_row(item);
        if let Some(service) = fixtures::service(&item.namespace, &item.name) {
            row.insert("type".to_string(), service.kind.to_string());
            row.insert("cluster-ip".to_string(), service.cluster_ip.to_string());
            row.insert("ports".to_string(), service.ports.to_string());
            row.insert("selector".to_string(), format!("app={}", service.selector));
        }
        row
    }

    fn detail(&self, item: &ResourceItem) -> DetailData {
        let summary = match fixtures::service(&item.namespace, &item.name) {
            Some(service) => format!(
                "{} service {} · {} · selects app={}",
                service.kind, service.cluster_ip, service.ports, service.selector
            ),
            None => format!("{} not found", item.name),
        };
        DetailData {
            summary,
            events: event_lines(&item.namespace, &item.name),
            labels: item.label_lines(),
            ..DetailData::default()
        }
    }

    fn yaml(&self, item: &ResourceItem) -> String {
        let spec = fixtures::service(&item.namespace, &item.name).map(|service| {
            json!({
                "type": service.kind,
                "clusterIP": service.cluster_ip,
                "ports": service.ports.split(',').collect::<Vec<_>>(),
                "selector": { "app": service.selector },
            })
        });
        to_yaml(&json!({
            "apiVersion": "v1",
            "kind": "Service",
            "metadata": metadata(item),
            "spec": spec,
        }))
    }

    fn describe(&self, item: &ResourceItem) -> String {
        let extra = fixtures::service(&item.namespace, &item.name)
            .map(|service| {
                vec![
                    ("Type", service.kind.to_string()),
                    ("IP", service.cluster_ip.to_string()),
                    ("Port", service.ports.to_string()),
                    ("Selector", format!("app={}", service.selector)),
                ]
            })
            .unwrap_or_default();
        describe_common("Service", item, &extra)
    }
}

/// ConfigMaps and Secrets share one shape.
#[derive(Debug, Clone, Copy)]
pub struct ConfigKind {
    secret: bool,
}

impl ConfigKind {
    pub fn configmaps() -> Self {
        Self { secret: false }
    }

    pub fn secrets() -> Self {
        Self { secret: true }
    }

    fn api_kind(&self) -> &'static str {
        if self.secret { "Secret" } else { "ConfigMap" }
    }
}

impl ResourceType for ConfigKind {
    fn name(&self) -> &str {
        if self.secret { "secrets" } else { "configmaps" }
    }

    fn tag(&self) -> &str {
        if self.secret { "SEC" } else { "CM" }
    }

    fn hotkey(&self) -> Option<char> {
        Some(if self.secret { 'K' } else { 'C' })
    }

    fn aliases(&self) -> &[&'static str] {
        if self.secret {
            &["secret", "sec"]
        } else {
            &["cm", "configmap", "config"]
        }
    }

    fn items(&self, namespace: &NamespaceScope) -> Vec<ResourceItem> {
        fixtures::config_objects(namespace, self.secret)
            .into_iter()
            .map(|object| {
                make_item(
                    object.name,
                    object.namespace,
                    "Active",
                    &object.keys.len().to_string(),
                    "-",
                    object.age,
                    self.tag(),
                    &[],
                )
            })
            .collect()
    }

    fn columns(&self) -> Vec<TableColumn> {
        vec![
            TableColumn::new("name", "NAME", 28, true),
            TableColumn::new("data", "DATA", 5, true),
            TableColumn::new("consumers", "USED BY", 28, true),
            TableColumn::new("age", "AGE", 6, true),
        ]
    }

    fn row(&self, item: &ResourceItem) -> BTreeMap<String, String> {
        let mut row = base_row(item);
        row.insert("data".to_string(), item.ready.clone());
        if let Some(object) = fixtures::config_object(&item.namespace, &item.name, self.secret) {
            row.insert("consumers".to_string(), object.consumers.join(","));
        }
        row
    }

    fn detail(&self, item: &ResourceItem) -> DetailData {
        let keys = fixtures::config_object(&item.namespace, &item.name, self.secret)
            .map(|object| object.keys.join(", "))
            .unwrap_or_default();
        DetailData {
            summary: format!("{} {} · keys: {keys}", self.api_kind(), item.name),
            events: event_lines(&item.namespace, &item.name),
            labels: item.label_lines(),
            ..DetailData::default()
        }
    }

    fn yaml(&self, item: &ResourceItem) -> String {
        let data = fixtures::config_object(&item.namespace, &item.name, self.secret)
            .map(|object| {
                object
                    .keys
                    .iter()
                    .map(|key| {
                        let value = if self.secret { "<redacted>" } else { "..." };
                        (key.to_string(), value.to_string())
                    })
                    .collect::<BTreeMap<_, _>>()
            })
            .unwrap_or_default();
        to_yaml(&json!({
            "apiVersion": "v1",
            "kind": self.api_kind(),
            "metadata": metadata(item),
            "data": data,
        }))
    }

    fn describe(&self, item: &ResourceItem) -> String {
        let keys = fixtures::config_object(&item.namespace, &item.name, self.secret)
            .map(|object| object.keys.join(", "))
            .unwrap_or_default();
        describe_common(self.api_kind(), item, &[("Data", keys)])
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StorageKind;

impl ResourceType for StorageKind {
    fn name(&self) -> &str {
        "persistentvolumeclaims"
    }

    fn tag(&self) -> &str {
        "PVC"
    }

    fn hotkey(&self) -> Option<char> {
        Some('V')
    }

    fn aliases(&self) -> &[&'static str] {
        &["pvc", "pvcs", "claims"]
    }

    fn items(&self, namespace: &NamespaceScope) -> Vec<ResourceItem> {
        fixtures::claims(namespace)
            .into_iter()
            .map(|claim| {
                make_item(
                    claim.name,
                    claim.namespace,
                    claim.status,
                    claim.capacity,
                    "-",
                    claim.age,
                    "PVC",
                    &[("app", claim.mounted_by)],
                )
            })
            .collect()
    }

    fn sort_modes(&self) -> Vec<SortMode> {
        vec![SortMode::Name, SortMode::Status, SortMode::Age]
    }

    fn columns(&self) -> Vec<TableColumn> {
        vec![
            TableColumn::new("name", "NAME", 28, true),
            TableColumn::new("status", "STATUS", 10, true),
            TableColumn::new("capacity", "CAPACITY", 9, true),
            TableColumn::new("storageclass", "STORAGECLASS", 13, true),
            TableColumn::new("age", "AGE", 6, true),
        ]
    }

    fn row(&self, item: &ResourceItem) -> BTreeMap<String, String> {
        let mut row = base_row(item);
        row.insert("capacity".to_string(), item.ready.clone());
        if let Some(claim) = fixtures::claim(&item.namespace, &item.name) {
            row.insert("storageclass".to_string(), claim.storage_class.to_string());
        }
        row
    }

    fn yaml(&self, item: &ResourceItem) -> String {
        let class = fixtures::claim(&item.namespace, &item.name)
            .map(|claim| claim.storage_class)
            .unwrap_or_default();
        to_yaml(&json!({
            "apiVersion": "v1",
            "kind": "PersistentVolumeClaim",
            "metadata": metadata(item),
            "spec": {
                "storageClassName": class,
                "resources": { "requests": { "storage": item.ready } },
            },
            "status": { "phase": item.status },
        }))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NodeKind;

impl ResourceType for NodeKind {
    fn name(&self) -> &str {
        "nodes"
    }

    fn tag(&self) -> &str {
        "NO"
    }

    fn hotkey(&self) -> Option<char> {
        Some('O')
    }

    fn aliases(&self) -> &[&'static str] {
        &["no", "node"]
    }

    fn namespaced(&self) -> bool {
        false
    }

    fn items(&self, _namespace: &NamespaceScope) -> Vec<ResourceItem> {
        fixtures::NODES
            .iter()
            .map(|node| make_item(node.name, "", node.status, "-", "-", node.age, "NO", &[]))
            .collect()
    }

    fn sort_modes(&self) -> Vec<SortMode> {
        vec![SortMode::Name, SortMode::Status, SortMode::Problem]
    }

    fn columns(&self) -> Vec<TableColumn> {
        vec![
            TableColumn::new("name", "NAME", 24, true),
            TableColumn::new("status", "STATUS", 10, true),
            TableColumn::new("roles", "ROLES", 14, true),
            TableColumn::new("version", "VERSION", 9, true),
            TableColumn::new("age", "AGE", 6, true),
        ]
    }

    fn row(&self, item: &ResourceItem) -> BTreeMap<String, String> {
        let mut row = base_row(item);
        if let Some(node) = fixtures::node(&item.name) {
            row.insert("roles".to_string(), node.roles.to_string());
            row.insert("version".to_string(), node.version.to_string());
        }
        row
    }

    fn yaml(&self, item: &ResourceItem) -> String {
        let version = fixtures::node(&item.name)
            .map(|node| node.version)
            .unwrap_or_default();
        to_yaml(&json!({
            "apiVersion": "v1",
            "kind": "Node",
            "metadata": metadata(item),
            "status": {
                "nodeInfo": { "kubeletVersion": version },
                "conditions": [{ "type": "Ready", "status": item.status == "Ready" }],
            },
        }))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EventKind;

impl ResourceType for EventKind {
    fn name(&self) -> &str {
        "events"
    }

    fn tag(&self) -> &str {
        "EV"
    }

    fn hotkey(&self) -> Option<char> {
        Some('E')
    }

    fn aliases(&self) -> &[&'static str] {
        &["ev", "event"]
    }

    fn items(&self, namespace: &NamespaceScope) -> Vec<ResourceItem> {
        fixtures::events(namespace)
            .iter()
            .map(|record| {
                make_item(
                    &record.name(),
                    record.namespace,
                    record.severity,
                    record.reason,
                    "-",
                    record.age,
                    "EV",
                    &[],
                )
            })
            .collect()
    }

    fn sort_modes(&self) -> Vec<SortMode> {
        vec![SortMode::Age, SortMode::Name, SortMode::Status]
    }

    fn columns(&self) -> Vec<TableColumn> {
        vec![
            TableColumn::new("name", "NAME", 36, true),
            TableColumn::new("status", "TYPE", 8, true),
            TableColumn::new("reason", "REASON", 18, true),
            TableColumn::new("age", "AGE", 6, true),
            TableColumn::new("message", "MESSAGE", 50, true).wide(),
        ]
    }

    fn row(&self, item: &ResourceItem) -> BTreeMap<String, String> {
        let mut row = base_row(item);
        row.insert("reason".to_string(), item.ready.clone());
        if let Some(record) = find_event(item) {
            row.insert("message".to_string(), record.message);
        }
        row
    }

    fn events(&self, item: &ResourceItem) -> Vec<String> {
        find_event(item).map(|record| record.line()).into_iter().collect()
    }

    fn yaml(&self, item: &ResourceItem) -> String {
        let record = find_event(item);
        to_yaml(&json!({
            "apiVersion": "v1",
            "kind": "Event",
            "metadata": metadata(item),
            "type": item.status,
            "reason": item.ready,
            "involvedObject": record.as_ref().map(|record| json!({
                "kind": record.kind,
                "name": record.object,
            })),
            "message": record.map(|record| record.message),
        }))
    }
}

fn find_event(item: &ResourceItem) -> Option<fixtures::EventRecord> {
    fixtures::events(&NamespaceScope::Named(item.namespace.clone()))
        .into_iter()
        .find(|record| record.name() == item.name)
}

#[derive(Debug, Clone, Copy)]
pub struct NamespaceKind;

impl ResourceType for NamespaceKind {
    fn name(&self) -> &str {
        "namespaces"
    }

    fn tag(&self) -> &str {
        "NS"
    }

    fn aliases(&self) -> &[&'static str] {
        &["ns", "namespace"]
    }

    fn namespaced(&self) -> bool {
        false
    }

    fn items(&self, _namespace: &NamespaceScope) -> Vec<ResourceItem> {
        fixtures::NAMESPACES
            .iter()
            .map(|name| {
                let age = if *name == "payments" { "6h" } else { "90d" };
                make_item(name, "", "Active", "-", "-", age, "NS", &[])
            })
            .collect()
    }

    fn describe(&self, item: &ResourceItem) -> String {
        let workloads = fixtures::workloads(&NamespaceScope::Named(item.name.clone())).len();
        describe_common(
            "Namespace",
            item,
            &[("Workloads", workloads.to_string())],
        )
    }

    fn events(&self, item: &ResourceItem) -> Vec<String> {
        fixtures::events(&NamespaceScope::Named(item.name.clone()))
            .iter()
            .map(fixtures::EventRecord::line)
            .collect()
    }

    fn yaml(&self, item: &ResourceItem) -> String {
        to_yaml(&json!({
            "apiVersion": "v1",
            "kind": "Namespace",
            "metadata": metadata(item),
            "status": { "phase": item.status },
        }))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ContextKind;

impl ResourceType for ContextKind {
    fn name(&self) -> &str {
        "contexts"
    }

    fn tag(&self) -> &str {
        "CTX"
    }

    fn aliases(&self) -> &[&'static str] {
        &["ctx", "context"]
    }

    fn namespaced(&self) -> bool {
        false
    }

    fn items(&self, _namespace: &NamespaceScope) -> Vec<ResourceItem> {
        fixtures::CONTEXTS
            .iter()
            .map(|context| make_item(context.name, "", "Available", "-", "-", "-", "CTX", &[]))
            .collect()
    }

    fn columns(&self) -> Vec<TableColumn> {
        vec![
            TableColumn::new("name", "NAME", 20, true),
            TableColumn::new("cluster", "CLUSTER", 20, true),
            TableColumn::new("user", "USER", 18, true),
            TableColumn::new("server", "SERVER", 34, true).wide(),
        ]
    }

    fn row(&self, item: &ResourceItem) -> BTreeMap<String, String> {
        let mut row = base_row(item);
        if let Some(context) = find_context(&item.name) {
            row.insert("cluster".to_string(), context.cluster.to_string());
            row.insert("user".to_string(), context.user.to_string());
            row.insert("server".to_string(), context.server.to_string());
        }
        row
    }

    fn events(&self, _item: &ResourceItem) -> Vec<String> {
        Vec::new()
    }

    fn yaml(&self, item: &ResourceItem) -> String {
        let context = find_context(&item.name);
        to_yaml(&json!({
            "name": item.name,
            "context": {
                "cluster": context.map(|context| context.cluster),
                "user": context.map(|context| context.user),
            },
        }))
    }
}

fn find_context(name: &str) -> Option<&'static fixtures::Context> {
    fixtures::CONTEXTS.iter().find(|context| context.name == name)
}

/// A custom resource known only by its definition.
#[derive(Debug, Clone)]
pub struct CrdKind {
    def: CustomResourceDef,
}

impl CrdKind {
    pub fn new(def: CustomResourceDef) -> Self {
        Self { def }
    }
}

impl ResourceType for CrdKind {
    fn name(&self) -> &str {
        &self.def.plural
    }

    fn tag(&self) -> &str {
        &self.def.kind
    }

    fn group(&self) -> &str {
        &self.def.group
    }

    fn version(&self) -> &str {
        &self.def.version
    }

    fn namespaced(&self) -> bool {
        self.def.namespaced
    }

    fn builtin(&self) -> bool {
        false
    }

    fn items(&self, _namespace: &NamespaceScope) -> Vec<ResourceItem> {
        Vec::new()
    }

    fn yaml(&self, item: &ResourceItem) -> String {
        to_yaml(&json!({
            "apiVersion": format!("{}/{}", self.def.group, self.def.version),
            "kind": self.def.kind,
            "metadata": metadata(item),
        }))
    }

    fn empty_message(&self, namespace: &NamespaceScope) -> Option<String> {
        if !self.def.namespaced {
            return Some(format!("No {} resources found.", self.def.kind));
        }
        Some(format!(
            "No {} resources found in {}.",
            self.def.kind,
            scope_phrase(namespace)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigKind, CrdKind, EventKind, PodKind, ServiceKind, WorkloadKind};
    use crate::model::{CustomResourceDef, NamespaceScope};
    use crate::resources::{LogRequest, ResourceType};

    fn default_ns() -> NamespaceScope {
        NamespaceScope::Named("default".to_string())
    }

    #[test]
    fn workload_subsets_filter_by_tag() {
        let all = WorkloadKind::all().items(&default_ns());
        let deployments = WorkloadKind::deployments().items(&default_ns());
        assert!(all.len() > deployments.len());
        assert!(deployments.iter().all(|item| item.kind == "DEP"));
        assert!(WorkloadKind::cronjobs().items(&default_ns()).len() == 1);
    }

    #[test]
    fn multi_container_pods_list_every_container() {
        let pods = PodKind.items(&default_ns());
        let gateway = pods
            .iter()
            .find(|item| item.name.starts_with("api-gateway-"))
            .expect("gateway pod");
        assert_eq!(PodKind.containers(gateway), vec!["gateway", "envoy"]);
        let logs = PodKind.logs(
            gateway,
            &LogRequest {
                container: Some("envoy".to_string()),
                ..LogRequest::default()
            },
        );
        assert!(logs.iter().all(|line| line.contains("[envoy]")));
    }

    #[test]
    fn workloads_expose_their_pods() {
        let workloads = WorkloadKind::all().items(&default_ns());
        let gateway = workloads
            .iter()
            .find(|item| item.name == "api-gateway")
            .expect("gateway");
        assert_eq!(WorkloadKind::all().pods(gateway).len(), 3);
        assert!(WorkloadKind::all().yaml(gateway).contains("kind: Deployment"));
    }

    #[test]
    fn rows_carry_kind_specific_columns() {
        let services = ServiceKind.items(&default_ns());
        let row = ServiceKind.row(&services[0]);
        assert_eq!(row.get("type").map(String::as_str), Some("ClusterIP"));
        assert!(row.contains_key("label:app"));

        let secrets = ConfigKind::secrets().items(&default_ns());
        assert!(ConfigKind::secrets().yaml(&secrets[0]).contains("<redacted>"));
    }

    #[test]
    fn event_rows_include_message() {
        let payments = NamespaceScope::Named("payments".to_string());
        let events = EventKind.items(&payments);
        assert!(!events.is_empty());
        assert!(EventKind.row(&events[0]).contains_key("message"));
    }

    #[test]
    fn crd_kind_reports_empty_state() {
        let kind = CrdKind::new(CustomResourceDef {
            name: "certificates.cert-manager.io".to_string(),
            group: "cert-manager.io".to_string(),
            version: "v1".to_string(),
            kind: "Certificate".to_string(),
            plural: "certificates".to_string(),
            namespaced: true,
        });
        assert!(kind.items(&default_ns()).is_empty());
        assert_eq!(
            kind.empty_message(&default_ns()),
            Some("No Certificate resources found in namespace default.".to_string())
        );
        assert!(!kind.builtin());
    }
}
