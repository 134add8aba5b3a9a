//! Stack navigation state and its persistence.
//!
//! # Responsibility
//! - Model the dashboard/form/detail stack with navigate, back and reset.
//! - Persist and restore the stack through the key-value store.
//!
//! # Invariants
//! - The stack is never empty; its root survives `go_back`.
//! - A route name appears at most once; navigating to a name already on the
//!   stack pops back to it.
//! - A missing or unreadable persisted state restores as `None`.

use crate::model::note::Note;
use crate::storage::kv_store::KeyValueStore;
use crate::storage::StorageResult;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Key under which the navigation stack is stored.
pub const NAVIGATION_STATE_KEY: &str = "NAVIGATION_STATE_V1";

/// Screen plus the note it was opened with.
///
/// Routes carry note snapshots, which can go stale when storage changes
/// underneath an open screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "params")]
pub enum Route {
    Dashboard,
    Form { note: Option<Note> },
    Note { note: Note },
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Form { .. } => "Form",
            Self::Note { .. } => "Note",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredStack")]
pub struct NavigationStack {
    routes: Vec<Route>,
}

#[derive(Deserialize)]
struct StoredStack {
    routes: Vec<Route>,
}

impl TryFrom<StoredStack> for NavigationStack {
    type Error = &'static str;

    fn try_from(value: StoredStack) -> Result<Self, Self::Error> {
        if value.routes.is_empty() {
            return Err("navigation stack has no routes");
        }
        Ok(Self {
            routes: value.routes,
        })
    }
}

impl Default for NavigationStack {
    fn default() -> Self {
        Self::new(Route::Dashboard)
    }
}

impl NavigationStack {
    pub fn new(initial: Route) -> Self {
        Self {
            routes: vec![initial],
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn current(&self) -> &Route {
        // `routes` is never empty.
        &self.routes[self.routes.len() - 1]
    }

    pub fn can_go_back(&self) -> bool {
        self.routes.len() > 1
    }

    /// Pops back to an existing route of the same name, replacing its
    /// params, or pushes `route`.
    pub fn navigate(&mut self, route: Route) {
        match self
            .routes
            .iter()
            .position(|existing| existing.name() == route.name())
        {
            Some(index) => {
                self.routes.truncate(index);
                self.routes.push(route);
            }
            None => self.routes.push(route),
        }
    }

    /// Pops the current route. Returns `false` at the root.
    pub fn go_back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.routes.pop();
        true
    }

    /// Replaces the whole stack with `route`.
    pub fn reset(&mut self, route: Route) {
        self.routes.clear();
        self.routes.push(route);
    }

    /// Parses the persisted form, rejecting stacks without routes.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Reads and writes the navigation stack under `NAVIGATION_STATE_KEY`.
pub struct NavigationStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> NavigationStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Restores the persisted stack, if one is stored and readable.
    pub fn restore(&self) -> Option<NavigationStack> {
        let raw = match self.store.get_item(NAVIGATION_STATE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(
                    "event=nav_restore module=view status=degraded error_code=store_read_failed error={}",
                    err
                );
                return None;
            }
        };

        match NavigationStack::from_json(raw.as_str()) {
            Ok(stack) => {
                debug!(
                    "event=nav_restore module=view status=ok depth={}",
                    stack.routes.len()
                );
                Some(stack)
            }
            Err(err) => {
                warn!(
                    "event=nav_restore module=view status=degraded error_code=parse_failed error={}",
                    err
                );
                None
            }
        }
    }

    /// Persists `stack`, replacing the previous state.
    pub fn persist(&self, stack: &NavigationStack) -> StorageResult<()> {
        let encoded = stack.to_json()?;
        self.store.set_item(NAVIGATION_STATE_KEY, encoded.as_str())?;
        debug!(
            "event=nav_persist module=view status=ok depth={}",
            stack.routes.len()
        );
        Ok(())
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove_item(NAVIGATION_STATE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::{NavigationStack, Route};
    use crate::model::note::{Importance, Note, NoteId};

    fn note() -> Note {
        Note {
            id: NoteId::new("1"),
            title: "t".to_string(),
            content: String::new(),
            date_time: "2024-01-01T00:00:00.000Z".to_string(),
            importance: Importance::Normal,
        }
    }

    #[test]
    fn navigate_pushes_new_names_and_pops_back_to_existing_ones() {
        let mut stack = NavigationStack::default();
        stack.navigate(Route::Note { note: note() });
        stack.navigate(Route::Form { note: Some(note()) });
        assert_eq!(stack.routes().len(), 3);

        stack.navigate(Route::Dashboard);
        assert_eq!(stack.routes(), &[Route::Dashboard]);
    }

    #[test]
    fn go_back_keeps_root() {
        let mut stack = NavigationStack::default();
        stack.navigate(Route::Form { note: None });
        assert!(stack.go_back());
        assert!(!stack.go_back());
        assert_eq!(stack.current(), &Route::Dashboard);
    }

    #[test]
    fn deserializing_empty_stack_is_rejected() {
        assert!(NavigationStack::from_json(r#"{"routes":[]}"#).is_err());

        let restored = NavigationStack::from_json(r#"{"routes":[{"name":"Dashboard"}]}"#).unwrap();
        assert_eq!(restored.current(), &Route::Dashboard);
    }

    #[test]
    fn reset_replaces_stack() {
        let mut stack = NavigationStack::default();
        stack.navigate(Route::Note { note: note() });
        stack.reset(Route::Dashboard);
        assert!(!stack.can_go_back());
    }
}
