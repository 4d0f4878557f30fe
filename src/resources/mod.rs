pub mod fixtures;
pub mod kinds;
pub mod relations;

use crate::model::{
    CustomResourceDef, DetailData, NamespaceScope, ResourceItem, SortMode, StatusClass,
    TableColumn, age_seconds,
};
use kinds::{
    ConfigKind, ContextKind, CrdKind, EventKind, NamespaceKind, NodeKind, PodKind, ServiceKind,
    StorageKind, WorkloadKind,
};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Which slice of a container's output to produce.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct LogRequest {
    pub container: Option<String>,
    pub previous: bool,
    pub since_minutes: Option<u64>,
}

/// The capability set every kind exposes to the views.
pub trait ResourceType: Debug + Send + Sync {
    /// Human plural name; also the column store key.
    fn name(&self) -> &str;

    /// Short tag shown in the breadcrumb, e.g. `[PO]`.
    fn tag(&self) -> &str;

    fn hotkey(&self) -> Option<char> {
        None
    }

    fn aliases(&self) -> &[&'static str] {
        &[]
    }

    fn group(&self) -> &str {
        ""
    }

    fn version(&self) -> &str {
        "v1"
    }

    fn namespaced(&self) -> bool {
        true
    }

    fn builtin(&self) -> bool {
        true
    }

    fn items(&self, namespace: &NamespaceScope) -> Vec<ResourceItem>;

    fn sort_modes(&self) -> Vec<SortMode> {
        vec![SortMode::Name, SortMode::Age]
    }

    fn sort(&self, items: &mut [ResourceItem], mode: SortMode) {
        sort_items(items, mode);
    }

    fn columns(&self) -> Vec<TableColumn> {
        vec![
            TableColumn::new("name", "NAME", 32, true),
            TableColumn::new("status", "STATUS", 18, true),
            TableColumn::new("age", "AGE", 6, true),
        ]
    }

    fn row(&self, item: &ResourceItem) -> BTreeMap<String, String> {
        base_row(item)
    }

    fn detail(&self, item: &ResourceItem) -> DetailData {
        DetailData {
            summary: format!("{} {} is {}", self.tag(), item.name, item.status),
            labels: item.label_lines(),
            ..DetailData::default()
        }
    }

    fn logs(&self, item: &ResourceItem, request: &LogRequest) -> Vec<String> {
        let _ = request;
        vec![format!("{} {} does not produce logs", self.name(), item.name)]
    }

    /// The line appended on a follow tick, when this kind can follow logs.
    fn follow_line(&self, item: &ResourceItem, container: &str, seq: u64) -> Option<String> {
        let _ = (item, container, seq);
        None
    }

    fn events(&self, item: &ResourceItem) -> Vec<String> {
        fixtures::events_for(&item.namespace, &item.name)
            .iter()
            .map(fixtures::EventRecord::line)
            .collect()
    }

    fn yaml(&self, item: &ResourceItem) -> String;

    fn describe(&self, item: &ResourceItem) -> String {
        describe_common(self.name(), item, &[])
    }

    /// Pods backing an item, for the log pod picker.
    fn pods(&self, item: &ResourceItem) -> Vec<ResourceItem> {
        let _ = item;
        Vec::new()
    }

    fn containers(&self, item: &ResourceItem) -> Vec<String> {
        self.detail(item)
            .containers
            .into_iter()
            .map(|container| container.name)
            .collect()
    }

    fn empty_message(&self, namespace: &NamespaceScope) -> Option<String> {
        let _ = namespace;
        None
    }
}

pub fn sort_items(items: &mut [ResourceItem], mode: SortMode) {
    match mode {
        SortMode::Name => items.sort_by(|a, b| a.name.cmp(&b.name)),
        SortMode::Status => items.sort_by(|a, b| a.status.cmp(&b.status).then(a.name.cmp(&b.name))),
        SortMode::Age => items.sort_by(|a, b| {
            age_seconds(&a.age)
                .cmp(&age_seconds(&b.age))
                .then(a.name.cmp(&b.name))
        }),
        SortMode::Kind => items.sort_by(|a, b| a.kind.cmp(&b.kind).then(a.name.cmp(&b.name))),
        SortMode::Problem => items.sort_by(|a, b| {
            StatusClass::classify(&a.status)
                .cmp(&StatusClass::classify(&b.status))
                .then(a.name.cmp(&b.name))
        }),
    }
}

pub fn base_row(item: &ResourceItem) -> BTreeMap<String, String> {
    let mut row = BTreeMap::from([
        ("name".to_string(), item.name.clone()),
        ("namespace".to_string(), item.namespace.clone()),
        ("status".to_string(), item.status.clone()),
        ("ready".to_string(), item.ready.clone()),
        ("restarts".to_string(), item.restarts.clone()),
        ("age".to_string(), item.age.clone()),
        ("kind".to_string(), item.kind.clone()),
    ]);
    for (key, value) in &item.labels {
        row.insert(format!("label:{key}"), value.clone());
    }
    row
}

pub fn describe_common(kind: &str, item: &ResourceItem, extra: &[(&str, String)]) -> String {
    let mut lines = vec![
        format!("{:<14}{}", "Name:", item.name),
        format!(
            "{:<14}{}",
            "Namespace:",
            if item.namespace.is_empty() {
                "<cluster>"
            } else {
                &item.namespace
            }
        ),
        format!("{:<14}{}", "Kind:", kind),
        format!("{:<14}{}", "Status:", item.status),
        format!("{:<14}{}", "Age:", item.age),
    ];
    if item.labels.is_empty() {
        lines.push(format!("{:<14}<none>", "Labels:"));
    } else {
        for (index, label) in item.label_lines().iter().enumerate() {
            let header = if index == 0 { "Labels:" } else { "" };
            lines.push(format!("{header:<14}{label}"));
        }
    }
    for (key, value) in extra {
        lines.push(format!("{:<14}{}", format!("{key}:"), value));
    }
    lines.join("\n")
}

/// Renders a JSON document as YAML text.
pub fn to_yaml(value: &serde_json::Value) -> String {
    serde_yaml::to_string(value).unwrap_or_else(|err| format!("# failed to render yaml: {err}"))
}

#[derive(Debug)]
pub struct Registry {
    kinds: Vec<Arc<dyn ResourceType>>,
    primary: Arc<dyn ResourceType>,
    namespace_kind: Arc<dyn ResourceType>,
    context_kind: Arc<dyn ResourceType>,
    custom: Vec<CustomResourceDef>,
    namespaces: Vec<String>,
    contexts: Vec<String>,
}

impl Registry {
    pub fn stub() -> Self {
        let primary: Arc<dyn ResourceType> = Arc::new(WorkloadKind::all());
        let namespace_kind: Arc<dyn ResourceType> = Arc::new(NamespaceKind);
        let kinds: Vec<Arc<dyn ResourceType>> = vec![
            primary.clone(),
            Arc::new(PodKind),
            Arc::new(WorkloadKind::deployments()),
            Arc::new(WorkloadKind::statefulsets()),
            Arc::new(WorkloadKind::daemonsets()),
            Arc::new(WorkloadKind::cronjobs()),
            Arc::new(WorkloadKind::jobs()),
            Arc::new(ServiceKind),
            Arc::new(ConfigKind::configmaps()),
            Arc::new(ConfigKind::secrets()),
            Arc::new(StorageKind),
            Arc::new(NodeKind),
            Arc::new(EventKind),
            namespace_kind.clone(),
        ];
        Self {
            kinds,
            primary,
            namespace_kind,
            context_kind: Arc::new(ContextKind),
            custom: fixtures::custom_resources(),
            namespaces: fixtures::NAMESPACES.iter().map(|ns| ns.to_string()).collect(),
            contexts: fixtures::CONTEXTS
                .iter()
                .map(|context| context.name.to_string())
                .collect(),
        }
    }

    pub fn all(&self) -> &[Arc<dyn ResourceType>] {
        &self.kinds
    }

    pub fn primary(&self) -> Arc<dyn ResourceType> {
        self.primary.clone()
    }

    pub fn by_hotkey(&self, key: char) -> Option<Arc<dyn ResourceType>> {
        self.kinds
            .iter()
            .find(|kind| kind.hotkey() == Some(key))
            .cloned()
    }

    pub fn by_name(&self, name: &str) -> Option<Arc<dyn ResourceType>> {
        self.kinds.iter().find(|kind| kind.name() == name).cloned()
    }

    /// Maps a plural name, alias or CRD name onto a kind.
    pub fn resolve(&self, token: &str) -> Option<Arc<dyn ResourceType>> {
        let token = token.trim().to_ascii_lowercase();
        if token.is_empty() {
            return None;
        }
        if let Some(kind) = self.kinds.iter().find(|kind| {
            kind.name() == token || kind.aliases().iter().any(|alias| *alias == token)
        }) {
            return Some(kind.clone());
        }
        self.custom
            .iter()
            .find(|crd| {
                crd.name == token || crd.plural == token || crd.kind.to_ascii_lowercase() == token
            })
            .map(|crd| self.custom_kind(crd))
    }

    pub fn custom_resources(&self) -> &[CustomResourceDef] {
        &self.custom
    }

    pub fn custom_kind(&self, crd: &CustomResourceDef) -> Arc<dyn ResourceType> {
        Arc::new(CrdKind::new(crd.clone()))
    }

    pub fn namespace_kind(&self) -> Arc<dyn ResourceType> {
        self.namespace_kind.clone()
    }

    pub fn context_kind(&self) -> Arc<dyn ResourceType> {
        self.context_kind.clone()
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    pub fn contexts(&self) -> &[String] {
        &self.contexts
    }

    pub fn default_namespace(&self) -> &str {
        self.namespaces.first().map_or("default", String::as_str)
    }

    pub fn default_context(&self) -> &str {
        self.contexts.first().map_or("default", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::{Registry, sort_items};
    use crate::model::{ResourceItem, SortMode};

    fn item(name: &str, status: &str, age: &str) -> ResourceItem {
        ResourceItem {
            name: name.to_string(),
            status: status.to_string(),
            age: age.to_string(),
            ..ResourceItem::default()
        }
    }

    fn names(items: &[ResourceItem]) -> Vec<&str> {
        items.iter().map(|item| item.name.as_str()).collect()
    }

    #[test]
    fn problem_sort_orders_by_severity_then_name() {
        let mut items = vec![
            item("zeta", "Running", "1d"),
            item("beta", "Suspended", "1d"),
            item("alpha", "Running", "1d"),
            item("gamma", "CrashLoopBackOff", "1d"),
            item("delta", "Pending", "1d"),
            item("omega", "Terminating", "1d"),
            item("eps", "NotReady", "1d"),
        ];
        sort_items(&mut items, SortMode::Problem);
        assert_eq!(
            names(&items),
            vec!["gamma", "eps", "delta", "alpha", "zeta", "beta", "omega"]
        );
    }

    #[test]
    fn age_sort_puts_newest_first() {
        let mut items = vec![
            item("old", "Running", "40d"),
            item("new", "Running", "15m"),
            item("mid", "Running", "6h"),
        ];
        sort_items(&mut items, SortMode::Age);
        assert_eq!(names(&items), vec!["new", "mid", "old"]);
    }

    #[test]
    fn hotkeys_are_unique() {
        let registry = Registry::stub();
        let mut keys = registry
            .all()
            .iter()
            .filter_map(|kind| kind.hotkey())
            .collect::<Vec<_>>();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
        assert_eq!(
            registry.by_hotkey('P').map(|kind| kind.name().to_string()),
            Some("pods".to_string())
        );
    }

    #[test]
    fn aliases_and_crds_resolve() {
        let registry = Registry::stub();
        let name = |token: &str| registry.resolve(token).map(|kind| kind.name().to_string());
        assert_eq!(name("po"), Some("pods".to_string()));
        assert_eq!(name("SVC"), Some("services".to_string()));
        assert_eq!(name("deploy"), Some("deployments".to_string()));
        assert_eq!(name("certificates"), Some("certificates".to_string()));
        assert_eq!(name("nope"), None);
        assert_eq!(registry.primary().tag(), "Workload");
    }
}
