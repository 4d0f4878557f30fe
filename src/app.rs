use crate::input::{Event, Key, Msg};
use crate::model::{NamespaceScope, PickerKind, Scope};
use crate::resources::ResourceType;
use crate::session::Session;
use crate::ui::reserved_rows;
use crate::views::{
    Action, Effect, HelpView, ListView, OverlayPicker, ResourceBrowser, Update, View,
};
use std::sync::Arc;
use tracing::{debug, info};

/// The resources-scope root saved while the namespace or context scope is active.
struct ScopeEntry {
    scope: Scope,
    top: Box<dyn View>,
}

/// Owns the view stack and the scope ring, routes every event and applies the
/// transitions views ask for.
pub struct App {
    session: Session,
    root: Box<dyn View>,
    stack: Vec<Box<dyn View>>,
    root_kind: Arc<dyn ResourceType>,
    scope: Scope,
    history: Vec<ScopeEntry>,
    width: u16,
    height: u16,
    error_msg: String,
}

impl App {
    #[cfg(test)]
    pub fn new(session: Session) -> Self {
        let root_kind = session.registry.primary();
        Self::with_kind(session, root_kind)
    }

    pub fn with_kind(session: Session, root_kind: Arc<dyn ResourceType>) -> Self {
        let root = Box::new(ListView::new(root_kind.clone(), &session));
        Self::assemble(session, root, root_kind)
    }

    /// A host around an arbitrary root view; the root tag comes from the primary kind.
    #[cfg(test)]
    pub fn with_root(session: Session, root: Box<dyn View>) -> Self {
        let root_kind = session.registry.primary();
        Self::assemble(session, root, root_kind)
    }

    fn assemble(session: Session, root: Box<dyn View>, root_kind: Arc<dyn ResourceType>) -> Self {
        Self {
            session,
            root,
            stack: Vec::new(),
            root_kind,
            scope: Scope::Resources,
            history: Vec::new(),
            width: 0,
            height: 0,
            error_msg: String::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn depth(&self) -> usize {
        1 + self.stack.len()
    }

    #[cfg(test)]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[cfg(test)]
    pub fn history_scope(&self, index: usize) -> Option<Scope> {
        self.history.get(index).map(|entry| entry.scope)
    }

    pub fn error_msg(&self) -> &str {
        &self.error_msg
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn top(&self) -> &dyn View {
        match self.stack.last() {
            Some(view) => view.as_ref(),
            None => self.root.as_ref(),
        }
    }

    fn top_mut(&mut self) -> &mut dyn View {
        match self.stack.last_mut() {
            Some(view) => view.as_mut(),
            None => self.root.as_mut(),
        }
    }

    #[cfg(test)]
    pub fn top_breadcrumb(&self) -> String {
        self.top().breadcrumb()
    }

    pub fn crumbs(&self) -> Vec<String> {
        std::iter::once(self.root.as_ref())
            .chain(self.stack.iter().map(|view| view.as_ref()))
            .map(|view| view.breadcrumb())
            .collect()
    }

    pub fn root_tag(&self) -> String {
        match self.scope {
            Scope::Resources => self.root_kind.tag().to_string(),
            Scope::Namespace => "Namespace".to_string(),
            Scope::Context => "Context".to_string(),
        }
    }

    /// Width and height left for the top view's body.
    fn body_size(&self) -> (u16, u16) {
        if self.height == 0 {
            let width = if self.width == 0 { 80 } else { self.width };
            return (width, 20);
        }
        let footer_lines = self.top().footer().lines.len();
        let reserved = reserved_rows(!self.error_msg.is_empty(), footer_lines);
        let body = usize::from(self.height).saturating_sub(reserved).max(1);
        (self.width, u16::try_from(body).unwrap_or(u16::MAX))
    }

    fn resize_top(&mut self) {
        let (width, height) = self.body_size();
        self.top_mut().set_size(width, height);
    }

    /// Routes one event. The returned effect is for the runtime to carry out.
    pub fn handle_event(&mut self, event: Event) -> Option<Effect> {
        match event {
            Event::Resize { width, height } => {
                self.width = width;
                self.height = height;
                self.resize_top();
                None
            }
            Event::Key(key) => self.handle_key(key),
            Event::Msg(Msg::Selected { kind, value }) => {
                self.apply_selection(kind, &value);
                None
            }
            Event::Msg(msg) => self.deliver(Event::Msg(msg)),
        }
    }

    fn handle_key(&mut self, key: Key) -> Option<Effect> {
        self.error_msg.clear();
        let suppressed = self.top().suppress_global_keys();

        if !suppressed && key.is_any(&["q", "ctrl+c"]) {
            info!("quit requested");
            return Some(Effect::Quit);
        }
        if suppressed {
            return self.deliver(Event::Key(key));
        }
        if key.is_space() {
            return self.deliver(Event::key("pgdown"));
        }
        if key.is_any(&["backspace", "left", "ctrl+h"]) {
            if self.depth() > 1 {
                self.pop();
            } else {
                self.advance_scope();
            }
            return None;
        }
        if let Some(rune) = key.rune() {
            if let Some(kind) = self.session.registry.by_hotkey(rune) {
                self.reset_to(kind);
                return None;
            }
            match rune {
                '?' => return self.reconcile(Update::push(HelpView::new())),
                ':' => return self.reconcile(Update::push(ResourceBrowser::new(&self.session))),
                'n' => {
                    let picker = OverlayPicker::for_session(PickerKind::Namespace, &self.session);
                    return self.reconcile(Update::push(picker));
                }
                'x' => {
                    let picker = OverlayPicker::for_session(PickerKind::Context, &self.session);
                    return self.reconcile(Update::push(picker));
                }
                _ => {}
            }
        }
        self.deliver(Event::Key(key))
    }

    fn deliver(&mut self, event: Event) -> Option<Effect> {
        let top = match self.stack.last_mut() {
            Some(view) => view.as_mut(),
            None => self.root.as_mut(),
        };
        let update = top.update(&event, &self.session);
        self.reconcile(update)
    }

    fn reconcile(&mut self, update: Update) -> Option<Effect> {
        let Update {
            action,
            next,
            effect,
        } = update;
        match (action, next) {
            (Action::None, Some(next)) => self.replace_top(next, false),
            (Action::None, None) => {}
            (Action::Push, Some(next)) => {
                debug!(view = %next.breadcrumb(), depth = self.depth() + 1, "push");
                self.stack.push(next);
                self.resize_top();
            }
            (Action::Replace, Some(next)) => {
                debug!(view = %next.breadcrumb(), "replace");
                self.replace_top(next, true);
            }
            (Action::Pop, _) => self.pop(),
            (action, None) => debug!(?action, "update without a view ignored"),
        }
        effect
    }

    fn replace_top(&mut self, next: Box<dyn View>, resize: bool) {
        match self.stack.last_mut() {
            Some(top) => *top = next,
            None => self.root = next,
        }
        if resize {
            self.resize_top();
        }
    }

    fn pop(&mut self) {
        if self.stack.pop().is_some() {
            debug!(depth = self.depth(), "pop");
            self.resize_top();
            return;
        }
        let Some(entry) = self.history.pop() else {
            debug!("pop at root ignored");
            return;
        };
        debug!(scope = ?entry.scope, "scope restored");
        self.scope = entry.scope;
        self.root = entry.top;
        self.resize_top();
    }

    fn advance_scope(&mut self) {
        let Some(next) = self.scope.advance() else {
            self.error_msg = format!("Already at the {} scope; esc to go back.", self.scope.title());
            return;
        };
        let picker = match next {
            Scope::Namespace => PickerKind::Namespace,
            _ => PickerKind::Context,
        };
        let view = Box::new(ListView::scope_picker(picker, &self.session));
        let outgoing = std::mem::replace(&mut self.root, view);
        self.history.push(ScopeEntry {
            scope: self.scope,
            top: outgoing,
        });
        debug!(from = self.scope.title(), to = next.title(), "scope advanced");
        self.scope = next;
        self.resize_top();
    }

    fn reset_to(&mut self, kind: Arc<dyn ResourceType>) {
        debug!(kind = kind.name(), "jump to kind");
        self.root = Box::new(ListView::new(kind.clone(), &self.session));
        self.root_kind = kind;
        self.stack.clear();
        self.history.clear();
        self.scope = Scope::Resources;
        self.resize_top();
    }

    fn apply_selection(&mut self, kind: PickerKind, value: &str) {
        let changed = match kind {
            PickerKind::Namespace => {
                let namespace = NamespaceScope::parse(value);
                let changed = namespace != self.session.namespace;
                self.session.namespace = namespace;
                changed
            }
            PickerKind::Context => {
                let changed = value != self.session.context;
                self.session.context = value.to_string();
                changed
            }
        };
        info!(?kind, value, changed, "scope selection applied");
        if changed {
            self.root = Box::new(ListView::new(self.root_kind.clone(), &self.session));
            self.stack.clear();
        } else if !self.history.is_empty() {
            let entry = self.history.swap_remove(0);
            self.root = entry.top;
            self.stack.clear();
        }
        self.history.clear();
        self.scope = Scope::Resources;
        self.resize_top();
    }
}

#[cfg(test)]
mod tests {
    use super::App;
    use crate::input::{Event, Msg};
    use crate::model::{PickerKind, Scope};
    use crate::session::Session;
    use crate::ui::{compose, line_text};
    use crate::views::{Effect, Update, View};
    use ratatui::text::{Line, Text};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// A scripted view that records the keys it receives.
    struct Scripted {
        name: &'static str,
        body: Vec<String>,
        footer: Vec<String>,
        suppress: bool,
        keys: Rc<RefCell<Vec<String>>>,
        script: Rc<RefCell<Vec<Update>>>,
    }

    impl Scripted {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                body: Vec::new(),
                footer: vec!["footer".to_string()],
                suppress: false,
                keys: Rc::default(),
                script: Rc::default(),
            }
        }
    }

    impl View for Scripted {
        fn update(&mut self, event: &Event, _session: &Session) -> Update {
            if let Some(key) = event.as_key() {
                self.keys.borrow_mut().push(key.to_string());
            }
            let mut script = self.script.borrow_mut();
            if script.is_empty() {
                Update::none()
            } else {
                script.remove(0)
            }
        }

        fn render(&self) -> Text<'static> {
            Text::from(self.body.iter().cloned().map(Line::from).collect::<Vec<_>>())
        }

        fn breadcrumb(&self) -> String {
            self.name.to_string()
        }

        fn footer(&self) -> Text<'static> {
            Text::from(self.footer.iter().cloned().map(Line::from).collect::<Vec<_>>())
        }

        fn set_size(&mut self, _width: u16, _height: u16) {}

        fn suppress_global_keys(&self) -> bool {
            self.suppress
        }
    }

    fn frame_lines(app: &App) -> Vec<String> {
        compose(app).lines.iter().map(line_text).collect()
    }

    fn press(app: &mut App, key: &str) -> Option<Effect> {
        app.handle_event(Event::key(key))
    }

    #[test]
    fn layout_clamps_to_small_heights() {
        let mut view = Scripted::new("view");
        view.body = vec!["row".to_string(); 20];
        let mut app = App::with_root(Session::stub(), Box::new(view));
        app.handle_event(Event::Resize {
            width: 80,
            height: 6,
        });
        let lines = frame_lines(&app);
        assert!(lines.len() <= 6);
        assert!(lines[0].contains("Context:") && lines[0].contains("Namespace:"));
        assert!(lines[1].contains("[Workload]"));
    }

    #[test]
    fn footer_is_pinned_to_the_last_rows() {
        let mut view = Scripted::new("view");
        view.body = vec!["line 1".to_string(), "line 2".to_string()];
        view.footer = vec!["status".to_string(), "q quit".to_string()];
        let mut app = App::with_root(Session::stub(), Box::new(view));
        app.handle_event(Event::Resize {
            width: 80,
            height: 8,
        });
        let lines = frame_lines(&app);
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[6], "status");
        assert_eq!(lines[7], "q quit");
    }

    #[test]
    fn space_becomes_pgdown() {
        let view = Scripted::new("view");
        let keys = view.keys.clone();
        let mut app = App::with_root(Session::stub(), Box::new(view));
        press(&mut app, " ");
        assert_eq!(keys.borrow().as_slice(), ["pgdown"]);
    }

    #[test]
    fn space_passes_through_when_globals_are_suppressed() {
        let mut view = Scripted::new("view");
        view.suppress = true;
        let keys = view.keys.clone();
        let mut app = App::with_root(Session::stub(), Box::new(view));
        press(&mut app, " ");
        assert_eq!(press(&mut app, "q"), None);
        assert_eq!(keys.borrow().as_slice(), [" ", "q"]);
    }

    #[test]
    fn quit_keys_terminate() {
        let mut app = App::new(Session::stub());
        assert_eq!(press(&mut app, "q"), Some(Effect::Quit));
        assert_eq!(press(&mut app, "ctrl+c"), Some(Effect::Quit));
        assert_eq!(app.depth(), 1);
    }

    #[test]
    fn left_at_root_walks_the_scope_ring() {
        let mut app = App::new(Session::stub());
        assert_eq!(app.scope(), Scope::Resources);

        press(&mut app, "left");
        assert_eq!(app.scope(), Scope::Namespace);
        assert_eq!(app.crumbs()[0], "namespaces");

        press(&mut app, "left");
        assert_eq!(app.scope(), Scope::Context);
        assert_eq!(app.crumbs()[0], "contexts");

        press(&mut app, "left");
        assert_eq!(app.scope(), Scope::Context);
        assert_eq!(app.crumbs()[0], "contexts");
        assert_eq!(app.error_msg(), "Already at the context scope; esc to go back.");
        assert_eq!(app.depth(), 1);
    }

    #[test]
    fn scope_history_keeps_the_outgoing_scope() {
        let mut app = App::new(Session::stub());
        press(&mut app, "left");
        assert_eq!(app.scope(), Scope::Namespace);
        assert_eq!(app.history_len(), 1);
        assert_eq!(app.history_scope(0), Some(Scope::Resources));
    }

    #[test]
    fn scope_root_still_opens_item_views() {
        let mut app = App::new(Session::stub());
        press(&mut app, "left");
        let depth = app.depth();
        press(&mut app, "y");
        assert_eq!(app.scope(), Scope::Namespace);
        assert_eq!(app.depth(), depth + 1);
        assert_eq!(app.top_breadcrumb(), "yaml");
    }

    #[test]
    fn pop_from_the_scope_root_restores_the_saved_list() {
        let mut app = App::new(Session::stub());
        press(&mut app, "left");
        press(&mut app, "left");
        press(&mut app, "esc");
        assert_eq!(app.scope(), Scope::Namespace);
        assert_eq!(app.crumbs(), vec!["namespaces"]);
        press(&mut app, "esc");
        assert_eq!(app.scope(), Scope::Resources);
        assert_eq!(app.crumbs(), vec!["workloads"]);
        press(&mut app, "esc");
        assert_eq!(app.depth(), 1);
        assert_eq!(app.history_len(), 0);
    }

    #[test]
    fn selecting_a_namespace_rebuilds_the_root() {
        let mut app = App::new(Session::stub());
        press(&mut app, "left");
        let effect = press(&mut app, "enter");
        let Some(Effect::Emit(msg)) = effect else {
            panic!("expected a selection, got {effect:?}");
        };
        assert_eq!(
            msg,
            Msg::Selected {
                kind: PickerKind::Namespace,
                value: "default".to_string(),
            }
        );
        app.handle_event(Event::Msg(msg));
        assert_eq!(app.scope(), Scope::Resources);
        assert_eq!(app.history_len(), 0);
        assert_eq!(app.crumbs(), vec!["workloads"]);

        press(&mut app, "n");
        assert_eq!(app.top_breadcrumb(), "namespaces");
        for key in ["p", "a", "y"] {
            press(&mut app, key);
        }
        let Some(Effect::Emit(msg)) = press(&mut app, "enter") else {
            panic!("expected a selection");
        };
        assert_eq!(app.depth(), 1);
        app.handle_event(Event::Msg(msg));
        assert_eq!(app.session().namespace.label(), "payments");
        assert_eq!(app.depth(), 1);
    }

    #[test]
    fn push_then_pop_keeps_the_same_view() {
        let view = Scripted::new("root");
        let keys = view.keys.clone();
        let script = view.script.clone();
        let mut app = App::with_root(Session::stub(), Box::new(view));
        let child = Scripted::new("child");
        child.script.borrow_mut().push(Update::pop());
        script.borrow_mut().push(Update::push(child));

        press(&mut app, "enter");
        assert_eq!(app.depth(), 2);
        assert_eq!(app.crumbs(), vec!["root", "child"]);
        press(&mut app, "enter");
        assert_eq!(app.depth(), 1);
        press(&mut app, "j");
        assert_eq!(keys.borrow().as_slice(), ["enter", "j"]);
    }

    #[test]
    fn pop_at_depth_one_is_ignored() {
        let view = Scripted::new("root");
        view.script.borrow_mut().push(Update::pop());
        let mut app = App::with_root(Session::stub(), Box::new(view));
        press(&mut app, "esc");
        assert_eq!(app.depth(), 1);
        assert_eq!(app.top_breadcrumb(), "root");
    }

    #[test]
    fn hotkeys_reset_the_stack() {
        let mut app = App::new(Session::stub());
        press(&mut app, "left");
        press(&mut app, "?");
        assert_eq!(app.depth(), 2);
        press(&mut app, "P");
        press(&mut app, "P");
        assert_eq!(app.depth(), 1);
        assert_eq!(app.scope(), Scope::Resources);
        assert_eq!(app.history_len(), 0);
        assert_eq!(app.crumbs(), vec!["pods"]);
        assert_eq!(app.root_tag(), "PO");
    }

    #[test]
    fn overlays_keep_space_literal() {
        let mut app = App::new(Session::stub());
        app.handle_event(Event::Resize {
            width: 100,
            height: 30,
        });
        press(&mut app, "x");
        assert_eq!(app.top_breadcrumb(), "contexts");
        assert!(app.top().suppress_global_keys());
        press(&mut app, " ");
        let footer = line_text(&app.top().footer().lines[0]);
        assert_eq!(footer, "Showing 0-0 of 0 [filtered]");
        press(&mut app, "esc");
        assert_eq!(app.depth(), 1);
    }

    #[test]
    fn frames_match_the_height_after_every_resize() {
        let mut app = App::new(Session::stub());
        press(&mut app, "enter");
        for height in [1, 2, 3, 5, 8, 13, 40] {
            app.handle_event(Event::Resize { width: 90, height });
            assert_eq!(compose(&app).lines.len(), usize::from(height), "height {height}");
        }
        press(&mut app, "left");
        press(&mut app, "left");
        app.handle_event(Event::Resize {
            width: 90,
            height: 4,
        });
        assert_eq!(compose(&app).lines.len(), 4);
    }

    #[test]
    fn browser_and_help_are_pushed() {
        let mut app = App::new(Session::stub());
        press(&mut app, ":");
        assert_eq!(app.top_breadcrumb(), "resources");
        press(&mut app, "backspace");
        press(&mut app, "?");
        assert_eq!(app.top_breadcrumb(), "help");
        assert_eq!(app.depth(), 2);
    }
}
