use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

pub const ALL_NAMESPACES: &str = "(all)";

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum NamespaceScope {
    All,
    Named(String),
}

impl NamespaceScope {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value == ALL_NAMESPACES || value.is_empty() {
            Self::All
        } else {
            Self::Named(value.to_string())
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::All => ALL_NAMESPACES.to_string(),
            Self::Named(namespace) => namespace.clone(),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl Display for NamespaceScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "{ALL_NAMESPACES}"),
            Self::Named(namespace) => write!(f, "{namespace}"),
        }
    }
}

/// Uniform row descriptor shared by every kind.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ResourceItem {
    pub name: String,
    pub status: String,
    pub ready: String,
    pub restarts: String,
    pub age: String,
    pub kind: String,
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
}

impl ResourceItem {
    /// Filtering only looks at the name so matches stay predictable.
    pub fn filter_value(&self) -> &str {
        &self.name
    }

    pub fn label_lines(&self) -> Vec<String> {
        self.labels
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ContainerRow {
    pub name: String,
    pub image: String,
    pub state: String,
    pub restarts: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct DetailData {
    pub summary: String,
    pub containers: Vec<ContainerRow>,
    pub conditions: Vec<String>,
    pub events: Vec<String>,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TableColumn {
    pub id: String,
    pub name: String,
    pub width: usize,
    pub default: bool,
    pub wide_only: bool,
}

impl TableColumn {
    pub fn new(id: &str, name: &str, width: usize, default: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            width,
            default,
            wide_only: false,
        }
    }

    pub fn wide(mut self) -> Self {
        self.wide_only = true;
        self
    }

    pub fn label(key: &str) -> Self {
        Self {
            id: format!("label:{key}"),
            name: key.to_ascii_uppercase(),
            width: key.chars().count().clamp(12, 20),
            default: false,
            wide_only: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Scope {
    Resources,
    Namespace,
    Context,
}

impl Scope {
    /// Next step outward on the scope ring; the context scope is terminal.
    pub fn advance(self) -> Option<Self> {
        match self {
            Self::Resources => Some(Self::Namespace),
            Self::Namespace => Some(Self::Context),
            Self::Context => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Resources => "resources",
            Self::Namespace => "namespace",
            Self::Context => "context",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum PickerKind {
    Namespace,
    Context,
}

impl PickerKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Namespace => "namespaces",
            Self::Context => "contexts",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum SortMode {
    Name,
    Status,
    Age,
    Kind,
    Problem,
}

impl SortMode {
    pub fn title(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Status => "status",
            Self::Age => "age",
            Self::Kind => "kind",
            Self::Problem => "problem",
        }
    }
}

/// Severity buckets in problem-sort order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum StatusClass {
    Failed,
    Warning,
    Pending,
    Healthy,
    Suspended,
    Other,
}

impl StatusClass {
    pub fn classify(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "failed" | "crashloop" | "crashloopbackoff" | "error" | "imagepullbackoff"
            | "errimagepull" | "oomkilled" => Self::Failed,
            "degraded" | "warning" | "notready" => Self::Warning,
            "pending" | "progressing" | "unknown" | "containercreating" => Self::Pending,
            "healthy" | "running" | "ready" | "active" | "bound" | "available" | "normal"
            | "completed" | "succeeded" => Self::Healthy,
            "suspended" => Self::Suspended,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CustomResourceDef {
    pub name: String,
    pub group: String,
    pub version: String,
    pub kind: String,
    pub plural: String,
    pub namespaced: bool,
}

/// Parses compact ages such as `45s`, `12m`, `3h`, `40d` or `2d4h`.
pub fn age_seconds(age: &str) -> u64 {
    let mut total = 0u64;
    let mut digits = String::new();
    for ch in age.trim().chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        // Digits only, so a parse error means overflow.
        let value = if digits.is_empty() {
            0
        } else {
            digits.parse::<u64>().unwrap_or(u64::MAX)
        };
        digits.clear();
        let unit = match ch {
            's' => 1,
            'm' => 60,
            'h' => 3_600,
            'd' => 86_400,
            'y' => 31_536_000,
            _ => 0,
        };
        total = total.saturating_add(value.saturating_mul(unit));
    }
    total
}

#[cfg(test)]
mod tests {
    use super::{NamespaceScope, Scope, StatusClass, TableColumn, age_seconds};

    #[test]
    fn namespace_sentinel_round_trips_through_label() {
        assert_eq!(NamespaceScope::parse("(all)"), NamespaceScope::All);
        assert_eq!(NamespaceScope::All.label(), "(all)");
        assert_eq!(
            NamespaceScope::parse(" payments "),
            NamespaceScope::Named("payments".to_string())
        );
    }

    #[test]
    fn scope_ring_stops_at_context() {
        assert_eq!(Scope::Resources.advance(), Some(Scope::Namespace));
        assert_eq!(Scope::Namespace.advance(), Some(Scope::Context));
        assert_eq!(Scope::Context.advance(), None);
    }

    #[test]
    fn status_classes_follow_problem_order() {
        assert!(StatusClass::classify("CrashLoopBackOff") < StatusClass::classify("Degraded"));
        assert!(StatusClass::classify("NotReady") < StatusClass::classify("Pending"));
        assert!(StatusClass::classify("Progressing") < StatusClass::classify("Running"));
        assert!(StatusClass::classify("Ready") < StatusClass::classify("Suspended"));
        assert_eq!(StatusClass::classify("Terminating"), StatusClass::Other);
    }

    #[test]
    fn label_columns_clamp_width() {
        let short = TableColumn::label("app");
        assert_eq!(short.id, "label:app");
        assert_eq!(short.name, "APP");
        assert_eq!(short.width, 12);
        assert!(!short.default);

        let long = TableColumn::label("app.kubernetes.io/component-name");
        assert_eq!(long.width, 20);
    }

    #[test]
    fn ages_parse_into_seconds() {
        assert_eq!(age_seconds("45s"), 45);
        assert_eq!(age_seconds("12m"), 720);
        assert_eq!(age_seconds("2d4h"), 2 * 86_400 + 4 * 3_600);
        assert_eq!(age_seconds("-"), 0);
    }

    #[test]
    fn oversized_ages_saturate() {
        assert_eq!(age_seconds("600000000000y"), u64::MAX);
        assert_eq!(age_seconds("99999999999999999999s"), u64::MAX);
        assert_eq!(age_seconds("584942417355y584942417355y"), u64::MAX);
        assert_eq!(age_seconds("1y"), 31_536_000);
    }
}
