//! Stack views.
//!
//! Every view implements [`View`]. A view never touches the stack itself; it
//! returns an [`Update`] describing the transition it wants and the host
//! applies it.

mod browser;
mod column_picker;
mod detail;
mod help;
mod list;
mod logs;
mod overlay;
mod pickers;
mod related;
mod table;
mod text;

pub use browser::ResourceBrowser;
pub use column_picker::ColumnPicker;
pub use detail::DetailView;
pub use help::HelpView;
pub use list::ListView;
pub use logs::LogsView;
pub use overlay::OverlayPicker;
pub use pickers::{ContainerPicker, PodPicker};
pub use related::RelatedView;
pub use text::{TextKind, TextView};

use crate::input::{Event, Msg};
use crate::model::ResourceItem;
use crate::resources::ResourceType;
use crate::session::Session;
use ratatui::text::Text;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Action {
    None,
    Push,
    Pop,
    Replace,
}

/// Deferred work for the runtime. Its result comes back as an [`Event::Msg`]
/// on a later turn.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Effect {
    Quit,
    Emit(Msg),
    After { delay: Duration, msg: Msg },
}

pub struct Update {
    pub action: Action,
    pub next: Option<Box<dyn View>>,
    pub effect: Option<Effect>,
}

impl Update {
    pub fn none() -> Self {
        Self {
            action: Action::None,
            next: None,
            effect: None,
        }
    }

    pub fn push(view: impl View + 'static) -> Self {
        Self {
            action: Action::Push,
            next: Some(Box::new(view)),
            effect: None,
        }
    }

    pub fn pop() -> Self {
        Self {
            action: Action::Pop,
            next: None,
            effect: None,
        }
    }

    pub fn replace(view: impl View + 'static) -> Self {
        Self {
            action: Action::Replace,
            next: Some(Box::new(view)),
            effect: None,
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }
}

/// The item a view points at; the item shortcuts act on it.
#[derive(Debug, Clone)]
pub struct Selection {
    pub kind: Arc<dyn ResourceType>,
    pub item: ResourceItem,
}

pub trait View {
    fn update(&mut self, event: &Event, session: &Session) -> Update;

    fn render(&self) -> Text<'static>;

    fn breadcrumb(&self) -> String;

    fn footer(&self) -> Text<'static>;

    fn set_size(&mut self, width: u16, height: u16);

    /// While true the host hands every key to the view untouched.
    fn suppress_global_keys(&self) -> bool {
        false
    }

    fn next_breadcrumb(&self) -> Option<String> {
        None
    }

    /// The item the shortcut keys act on.
    fn selection(&self) -> Option<Selection> {
        None
    }
}

/// Logs for an item: picks a pod, then a container, when there is a choice.
pub fn open_logs(session: &Session, kind: Arc<dyn ResourceType>, item: ResourceItem) -> Update {
    let pods = kind.pods(&item);
    if pods.len() > 1 {
        let pod_kind = session.registry.by_name("pods").unwrap_or(kind);
        return Update::push(PodPicker::new(pod_kind, pods));
    }
    let containers = kind.containers(&item);
    if containers.len() > 1 {
        return Update::push(ContainerPicker::new(kind, item, containers));
    }
    let container = containers.into_iter().next();
    Update::push(LogsView::new(kind, item, container))
}

/// The shortcuts shared by lists and detail: yaml, describe, events, logs, related.
pub fn item_shortcut(rune: char, session: &Session, selection: Selection) -> Option<Update> {
    let Selection { kind, item } = selection;
    let update = match rune {
        'y' => Update::push(TextView::new(kind, item, TextKind::Yaml)),
        'd' => Update::push(TextView::new(kind, item, TextKind::Describe)),
        'e' => Update::push(TextView::new(kind, item, TextKind::Events)),
        'o' => open_logs(session, kind, item),
        'r' => Update::push(RelatedView::new(session, kind, item)),
        _ => return None,
    };
    Some(update)
}
