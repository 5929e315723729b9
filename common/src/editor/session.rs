//! Editor session: the live component tree, its history and the current selection.
//!
//! The UI drives the session with [`EditorMsg`] values and re-renders whenever
//! [`EditorSession::update`] returns `true`. Each message that changes the tree is applied
//! first and then recorded as exactly one history snapshot. Messages that leave the tree
//! untouched (unknown ids, invalid targets) and pure selection changes record nothing.

use crate::editor::blocks::BlockKind;
use crate::editor::history::History;
use crate::editor::tree::{self, ComponentPatch, Direction};
use crate::model::component::{Component, ComponentType};
use crate::model::template::EmailBody;

#[derive(Debug, Clone)]
pub enum EditorMsg {
    /// Inserts a preset block into the selected container, or at root.
    AddBlock(BlockKind),
    /// Inserts a copy of an arbitrary node into the selected container, or at root.
    Add(Component),
    Update { id: String, patch: ComponentPatch },
    Delete(String),
    Duplicate(String),
    Move { id: String, direction: Direction },
    /// New root order as a permutation of root ids (drag and drop).
    Reorder(Vec<String>),
    /// Appends `{{key}}` to the selected text node.
    InsertVariable(String),
    Select(Option<String>),
    Undo,
    Redo,
    /// Empties the canvas.
    Clear,
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    components: Vec<Component>,
    history: History,
    selected: Option<String>,
}

impl EditorSession {
    pub fn new(components: Vec<Component>) -> Self {
        Self {
            history: History::new(components.clone()),
            components,
            selected: None,
        }
    }

    /// Opens a persisted template body, tree or legacy HTML.
    pub fn from_body(body: &str) -> Self {
        Self::new(EmailBody::parse(body).into_components())
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selected(&self) -> Option<&Component> {
        self.selected
            .as_deref()
            .and_then(|id| tree::find_by_id(&self.components, id))
    }

    /// Serialized tree as stored in a template's `body`.
    pub fn to_body(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.components)
    }

    /// Applies `msg`. Returns whether anything visible changed.
    pub fn update(&mut self, msg: EditorMsg) -> bool {
        match msg {
            EditorMsg::AddBlock(kind) => self.add(&kind.instantiate()),
            EditorMsg::Add(component) => self.add(&component),
            EditorMsg::Update { id, patch } => {
                let next = tree::update_by_id(&self.components, &id, &patch);
                self.commit(next)
            }
            EditorMsg::Delete(id) => {
                let next = tree::delete_by_id(&self.components, &id);
                self.commit(next)
            }
            EditorMsg::Duplicate(id) => {
                let next = tree::duplicate_by_id(&self.components, &id);
                self.commit(next)
            }
            EditorMsg::Move { id, direction } => {
                let next = tree::move_within_siblings(&self.components, &id, direction);
                self.commit(next)
            }
            EditorMsg::Reorder(order) => {
                let next = tree::reorder(&self.components, &order);
                self.commit(next)
            }
            EditorMsg::InsertVariable(key) => self.insert_variable(&key),
            EditorMsg::Select(id) => {
                let id = id.filter(|id| tree::find_by_id(&self.components, id).is_some());
                let changed = self.selected != id;
                self.selected = id;
                changed
            }
            EditorMsg::Undo => match self.history.undo() {
                Some(snapshot) => {
                    self.components = snapshot.to_vec();
                    self.drop_stale_selection();
                    true
                }
                None => false,
            },
            EditorMsg::Redo => match self.history.redo() {
                Some(snapshot) => {
                    self.components = snapshot.to_vec();
                    self.drop_stale_selection();
                    true
                }
                None => false,
            },
            EditorMsg::Clear => {
                self.selected = None;
                self.commit(Vec::new())
            }
        }
    }

    fn add(&mut self, component: &Component) -> bool {
        let next = match self.selected() {
            Some(target) if target.is_container() => {
                tree::insert_into_container(&self.components, &target.id, component)
            }
            _ => tree::insert_at_root(&self.components, component),
        };
        self.commit(next)
    }

    fn insert_variable(&mut self, key: &str) -> bool {
        let Some(target) = self.selected() else {
            return false;
        };
        if target.component_type != ComponentType::Text {
            return false;
        }
        let patch = ComponentPatch::content(format!("{}{{{{{}}}}}", target.content, key));
        let id = target.id.clone();
        let next = tree::update_by_id(&self.components, &id, &patch);
        self.commit(next)
    }

    /// Installs `next` and records it, unless it equals the current tree. A selection the
    /// new tree no longer contains is cleared.
    fn commit(&mut self, next: Vec<Component>) -> bool {
        if next == self.components {
            return false;
        }
        self.components = next;
        self.history.record(self.components.clone());
        self.drop_stale_selection();
        true
    }

    fn drop_stale_selection(&mut self) {
        if let Some(id) = &self.selected {
            if tree::find_by_id(&self.components, id).is_none() {
                self.selected = None;
            }
        }
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
