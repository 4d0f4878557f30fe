use crate::model::TableColumn;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

const NAME_COLUMN: &str = "name";

/// Per-kind visible column choices, shared by every view for the whole session.
///
/// Writers replace a kind's entry in one step under the write lock, so readers
/// see either the previous list or the new one.
#[derive(Debug, Default)]
pub struct ColumnStore {
    entries: RwLock<HashMap<String, Vec<String>>>,
}

impl ColumnStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: &str, pool: &[TableColumn]) -> Vec<TableColumn> {
        let stored = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(kind)
            .cloned();

        let mut columns = match stored {
            None => pool.iter().filter(|column| column.default).cloned().collect(),
            Some(ids) => ids
                .iter()
                .filter_map(|id| resolve_column(id, pool))
                .collect::<Vec<_>>(),
        };

        if let Some(index) = columns.iter().position(|column| column.id == NAME_COLUMN) {
            if index != 0 {
                let name = columns.remove(index);
                columns.insert(0, name);
            }
        } else {
            let name = pool
                .iter()
                .find(|column| column.id == NAME_COLUMN)
                .cloned()
                .unwrap_or_else(|| TableColumn::new(NAME_COLUMN, "NAME", 32, true));
            columns.insert(0, name);
        }
        columns
    }

    pub fn set(&self, kind: &str, visible_ids: Vec<String>) {
        let mut ids = Vec::with_capacity(visible_ids.len() + 1);
        ids.push(NAME_COLUMN.to_string());
        for id in visible_ids {
            if id != NAME_COLUMN && !ids.contains(&id) {
                ids.push(id);
            }
        }

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind.to_string(), ids);
    }

    pub fn reset(&self, kind: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(kind);
    }

    pub fn is_custom(&self, kind: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(kind)
    }
}

fn resolve_column(id: &str, pool: &[TableColumn]) -> Option<TableColumn> {
    if let Some(column) = pool.iter().find(|column| column.id == id) {
        return Some(column.clone());
    }
    id.strip_prefix("label:")
        .filter(|key| !key.is_empty())
        .map(TableColumn::label)
}

#[cfg(test)]
mod tests {
    use super::ColumnStore;
    use crate::model::TableColumn;

    fn pool() -> Vec<TableColumn> {
        vec![
            TableColumn::new("name", "NAME", 32, true),
            TableColumn::new("status", "STATUS", 18, true),
            TableColumn::new("ready", "READY", 7, true),
            TableColumn::new("restarts", "RESTARTS", 9, false),
            TableColumn::new("age", "AGE", 6, true),
        ]
    }

    fn ids(columns: &[TableColumn]) -> Vec<&str> {
        columns.iter().map(|column| column.id.as_str()).collect()
    }

    #[test]
    fn defaults_follow_pool_order() {
        let store = ColumnStore::new();
        let columns = store.get("pods", &pool());
        assert_eq!(ids(&columns), vec!["name", "status", "ready", "age"]);
        assert!(!store.is_custom("pods"));
    }

    #[test]
    fn set_injects_name_first() {
        let store = ColumnStore::new();
        store.set("pods", vec!["age".to_string(), "restarts".to_string()]);
        let columns = store.get("pods", &pool());
        assert_eq!(ids(&columns), vec!["name", "age", "restarts"]);
        assert!(store.is_custom("pods"));

        store.set("pods", vec!["status".to_string(), "name".to_string()]);
        assert_eq!(store.get("pods", &pool())[0].id, "name");
    }

    #[test]
    fn reset_reverts_to_defaults() {
        let store = ColumnStore::new();
        let defaults = store.get("pods", &pool());
        store.set("pods", vec!["restarts".to_string()]);
        store.reset("pods");
        assert_eq!(store.get("pods", &pool()), defaults);
        assert!(!store.is_custom("pods"));
    }

    #[test]
    fn label_ids_synthesize_columns_and_unknown_ids_drop() {
        let store = ColumnStore::new();
        store.set(
            "pods",
            vec![
                "label:app".to_string(),
                "bogus".to_string(),
                "status".to_string(),
            ],
        );
        let columns = store.get("pods", &pool());
        assert_eq!(ids(&columns), vec!["name", "label:app", "status"]);
        assert_eq!(columns[1].name, "APP");
        assert!(!columns[1].default);
    }

    #[test]
    fn entries_are_per_kind() {
        let store = ColumnStore::new();
        store.set("pods", vec!["age".to_string()]);
        assert!(!store.is_custom("services"));
        assert_eq!(store.get("services", &pool()).len(), 4);
    }

    #[test]
    fn concurrent_readers_always_see_name_first() {
        let store = ColumnStore::new();
        let pool = pool();
        std::thread::scope(|scope| {
            for writer in 0..4 {
                let store = &store;
                scope.spawn(move || {
                    for round in 0..200 {
                        if (round + writer) % 3 == 0 {
                            store.reset("pods");
                        } else {
                            store.set("pods", vec!["age".to_string(), "ready".to_string()]);
                        }
                    }
                });
            }
            for _ in 0..4 {
                let store = &store;
                let pool = &pool;
                scope.spawn(move || {
                    for _ in 0..200 {
                        let columns = store.get("pods", pool);
                        assert_eq!(columns[0].id, "name");
                        assert!(columns.len() == 3 || columns.len() == 4);
                    }
                });
            }
        });
    }
}
