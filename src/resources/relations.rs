use super::fixtures::{self, Workload};
use super::{LogRequest, Registry, ResourceType};
use crate::model::{DetailData, NamespaceScope, ResourceItem, SortMode, TableColumn};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Relation {
    Pods,
    Jobs,
    Services,
    Config,
    Storage,
    Events,
    Backends,
    Consumers,
    MountedBy,
    Owner,
}

impl Relation {
    pub fn title(self) -> &'static str {
        match self {
            Self::Pods => "pods",
            Self::Jobs => "jobs",
            Self::Services => "services",
            Self::Config => "config",
            Self::Storage => "storage",
            Self::Events => "events",
            Self::Backends => "backends",
            Self::Consumers => "consumers",
            Self::MountedBy => "mounted-by",
            Self::Owner => "owner",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelationEntry {
    pub relation: Relation,
    pub label: String,
    pub count: usize,
    pub description: String,
}

/// Relation categories for a source item, in display order.
pub fn relations_for(kind: &dyn ResourceType, item: &ResourceItem) -> Vec<Relation> {
    match kind.name() {
        "workloads" | "deployments" | "statefulsets" | "daemonsets" | "cronjobs" | "jobs" => {
            let mut relations = vec![Relation::Events, Relation::Pods];
            if item.kind == "CJ" {
                relations.push(Relation::Jobs);
            }
            relations.extend([Relation::Services, Relation::Config, Relation::Storage]);
            relations
        }
        "services" => vec![Relation::Backends, Relation::Events],
        "configmaps" | "secrets" => vec![Relation::Consumers, Relation::Events],
        "persistentvolumeclaims" => vec![Relation::MountedBy, Relation::Events],
        "pods" => vec![Relation::Owner, Relation::Events],
        _ => vec![Relation::Events],
    }
}

pub fn entries_for(
    registry: &Registry,
    kind: &dyn ResourceType,
    item: &ResourceItem,
) -> Vec<RelationEntry> {
    relations_for(kind, item)
        .into_iter()
        .map(|relation| {
            let count = if relation == Relation::Events {
                kind.events(item).len()
            } else {
                related_items(registry, relation, item).len()
            };
            RelationEntry {
                relation,
                label: relation.title().to_string(),
                count,
                description: describe_relation(relation, item),
            }
        })
        .collect()
}

fn describe_relation(relation: Relation, item: &ResourceItem) -> String {
    let name = &item.name;
    match relation {
        Relation::Pods => format!("pods managed by {name}"),
        Relation::Jobs => format!("jobs spawned by {name}"),
        Relation::Services => format!("services selecting app={name}"),
        Relation::Config => format!("configmaps and secrets used by {name}"),
        Relation::Storage => format!("volume claims mounted by {name}"),
        Relation::Events => format!("recent events for {name}"),
        Relation::Backends => format!("pods behind {name}"),
        Relation::Consumers => format!("workloads reading {name}"),
        Relation::MountedBy => format!("workloads mounting {name}"),
        Relation::Owner => format!("controller that owns {name}"),
    }
}

fn scope_of(item: &ResourceItem) -> NamespaceScope {
    NamespaceScope::Named(item.namespace.clone())
}

fn workload_items(registry: &Registry, item: &ResourceItem, names: &[&str]) -> Vec<ResourceItem> {
    registry
        .primary()
        .items(&scope_of(item))
        .into_iter()
        .filter(|candidate| names.contains(&candidate.name.as_str()))
        .collect()
}

fn pods_of_workload(registry: &Registry, item: &ResourceItem, workload: &str) -> Vec<ResourceItem> {
    registry
        .by_name("pods")
        .map(|pods| {
            pods.items(&scope_of(item))
                .into_iter()
                .filter(|pod| {
                    fixtures::pod_owner(&pod.namespace, &pod.name)
                        .is_some_and(|owner| owner.name == workload)
                })
                .collect()
        })
        .unwrap_or_default()
}

fn kind_items(
    registry: &Registry,
    kind: &str,
    item: &ResourceItem,
    keep: impl Fn(&ResourceItem) -> bool,
) -> Vec<ResourceItem> {
    registry
        .by_name(kind)
        .map(|kind| {
            kind.items(&scope_of(item))
                .into_iter()
                .filter(|candidate| keep(candidate))
                .collect()
        })
        .unwrap_or_default()
}

fn consumes(workload: &str, object: &fixtures::ConfigObject) -> bool {
    object.consumers.contains(&workload)
}

pub fn related_items(registry: &Registry, relation: Relation, item: &ResourceItem) -> Vec<ResourceItem> {
    match relation {
        Relation::Pods | Relation::Backends => {
            let workload = if relation == Relation::Backends {
                fixtures::service(&item.namespace, &item.name).map(|service| service.selector)
            } else {
                Some(item.name.as_str())
            };
            workload
                .map(|workload| pods_of_workload(registry, item, workload))
                .unwrap_or_default()
        }
        Relation::Jobs => cron_jobs(item),
        Relation::Services => kind_items(registry, "services", item, |service| {
            fixtures::service(&service.namespace, &service.name)
                .is_some_and(|fixture| fixture.selector == item.name)
        }),
        Relation::Config => {
            let mut items = kind_items(registry, "configmaps", item, |object| {
                fixtures::config_object(&object.namespace, &object.name, false)
                    .is_some_and(|fixture| consumes(&item.name, fixture))
            });
            items.extend(kind_items(registry, "secrets", item, |object| {
                fixtures::config_object(&object.namespace, &object.name, true)
                    .is_some_and(|fixture| consumes(&item.name, fixture))
            }));
            items
        }
        Relation::Storage => kind_items(registry, "persistentvolumeclaims", item, |claim| {
            fixtures::claim(&claim.namespace, &claim.name)
                .is_some_and(|fixture| fixture.mounted_by == item.name)
        }),
        Relation::Consumers => {
            let secret = item.kind == "SEC";
            let names = fixtures::config_object(&item.namespace, &item.name, secret)
                .map(|object| object.consumers.to_vec())
                .unwrap_or_default();
            workload_items(registry, item, &names)
        }
        Relation::MountedBy => {
            let names = fixtures::claim(&item.namespace, &item.name)
                .map(|claim| vec![claim.mounted_by])
                .unwrap_or_default();
            workload_items(registry, item, &names)
        }
        Relation::Owner => {
            let names = fixtures::pod_owner(&item.namespace, &item.name)
                .map(|owner| vec![owner.name])
                .unwrap_or_default();
            workload_items(registry, item, &names)
        }
        Relation::Events => Vec::new(),
    }
}

fn cron_jobs(item: &ResourceItem) -> Vec<ResourceItem> {
    let Some(workload) = fixtures::workload(&item.namespace, &item.name) else {
        return Vec::new();
    };
    ["28617120", "28615680", "28614240"]
        .iter()
        .enumerate()
        .map(|(index, run)| job_run(workload, run, index))
        .collect()
}

fn job_run(workload: &Workload, run: &str, index: usize) -> ResourceItem {
    ResourceItem {
        name: format!("{}-{run}", workload.name),
        status: "Completed".to_string(),
        ready: "1/1".to_string(),
        restarts: "0".to_string(),
        age: format!("{}d", index + 9),
        kind: "JOB".to_string(),
        namespace: workload.namespace.to_string(),
        labels: BTreeMap::from([("job-name".to_string(), workload.name.to_string())]),
    }
}

/// A synthetic kind listing one relation's items. Everything else is
/// delegated to the kind the items actually belong to.
#[derive(Debug)]
pub struct RelatedKind {
    relation: Relation,
    items: Vec<ResourceItem>,
    target: Arc<dyn ResourceType>,
    kinds: Vec<Arc<dyn ResourceType>>,
}

impl RelatedKind {
    pub fn new(registry: &Registry, relation: Relation, source: &ResourceItem) -> Self {
        let target = match relation {
            Relation::Pods | Relation::Backends => registry.by_name("pods"),
            Relation::Jobs => registry.by_name("jobs"),
            Relation::Services => registry.by_name("services"),
            Relation::Storage => registry.by_name("persistentvolumeclaims"),
            Relation::Config => registry.by_name("configmaps"),
            _ => None,
        }
        .unwrap_or_else(|| registry.primary());
        Self {
            relation,
            items: related_items(registry, relation, source),
            target,
            kinds: registry.all().to_vec(),
        }
    }

    /// The kind whose tag matches the row; relation lists may mix kinds.
    fn owner_kind(&self, item: &ResourceItem) -> &dyn ResourceType {
        self.kinds
            .iter()
            .find(|kind| kind.tag() == item.kind)
            .unwrap_or(&self.target)
            .as_ref()
    }
}

impl ResourceType for RelatedKind {
    fn name(&self) -> &str {
        self.relation.title()
    }

    fn tag(&self) -> &str {
        self.target.tag()
    }

    fn builtin(&self) -> bool {
        false
    }

    fn items(&self, _namespace: &NamespaceScope) -> Vec<ResourceItem> {
        self.items.clone()
    }

    fn sort_modes(&self) -> Vec<SortMode> {
        vec![SortMode::Name, SortMode::Status, SortMode::Problem]
    }

    fn columns(&self) -> Vec<TableColumn> {
        vec![
            TableColumn::new("name", "NAME", 34, true),
            TableColumn::new("kind", "KIND", 5, true),
            TableColumn::new("status", "STATUS", 18, true),
            TableColumn::new("ready", "READY", 7, true),
            TableColumn::new("age", "AGE", 6, true),
        ]
    }

    fn detail(&self, item: &ResourceItem) -> DetailData {
        self.owner_kind(item).detail(item)
    }

    fn logs(&self, item: &ResourceItem, request: &LogRequest) -> Vec<String> {
        self.owner_kind(item).logs(item, request)
    }

    fn follow_line(&self, item: &ResourceItem, container: &str, seq: u64) -> Option<String> {
        self.owner_kind(item).follow_line(item, container, seq)
    }

    fn events(&self, item: &ResourceItem) -> Vec<String> {
        self.owner_kind(item).events(item)
    }

    fn yaml(&self, item: &ResourceItem) -> String {
        self.owner_kind(item).yaml(item)
    }

    fn describe(&self, item: &ResourceItem) -> String {
        self.owner_kind(item).describe(item)
    }

    fn pods(&self, item: &ResourceItem) -> Vec<ResourceItem> {
        self.owner_kind(item).pods(item)
    }

    fn containers(&self, item: &ResourceItem) -> Vec<String> {
        self.owner_kind(item).containers(item)
    }

    fn empty_message(&self, _namespace: &NamespaceScope) -> Option<String> {
        Some(format!("No related {}.", self.relation.title()))
    }
}
