use crate::columns::ColumnStore;
use crate::model::NamespaceScope;
use crate::resources::Registry;
use std::sync::Arc;

/// Process-wide inputs handed to every view on each turn.
///
/// Only the host mutates `namespace` and `context`; views read them.
#[derive(Debug, Clone)]
pub struct Session {
    pub namespace: NamespaceScope,
    pub context: String,
    pub registry: Arc<Registry>,
    pub columns: Arc<ColumnStore>,
}

impl Session {
    pub fn new(registry: Arc<Registry>, columns: Arc<ColumnStore>) -> Self {
        let namespace = NamespaceScope::Named(registry.default_namespace().to_string());
        let context = registry.default_context().to_string();
        Self {
            namespace,
            context,
            registry,
            columns,
        }
    }

    /// A stub-backed session with the fixture defaults.
    #[cfg(test)]
    pub fn stub() -> Self {
        Self::new(Arc::new(Registry::stub()), Arc::new(ColumnStore::new()))
    }

    pub fn with_namespace(mut self, namespace: NamespaceScope) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }
}
