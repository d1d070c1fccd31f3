use crate::dashboard::model::{Position, Size, WidgetId, WidgetInstance, WidgetKind, ADD_POSITION};
use crate::dashboard::persistence::{LayoutSource, LayoutStore};
use crate::dashboard::widgets::merge_json;
use serde_json::Value;

/// Owner of the authoritative widget collection.
///
/// Every mutation targets exactly one instance by id and is applied in call
/// order. Position and size changes are refused for locked instances.
pub struct Board {
    widgets: Vec<WidgetInstance>,
    store: LayoutStore,
    dirty: bool,
    warnings: Vec<String>,
    source: LayoutSource,
}

impl Board {
    /// Load the collection from `store`, falling back to the default layout.
    pub fn load(store: LayoutStore) -> Self {
        let loaded = store.load();
        Self {
            widgets: loaded.widgets,
            store,
            dirty: false,
            warnings: loaded.warnings,
            source: loaded.source,
        }
    }

    /// Start from an explicit collection without reading the store.
    pub fn with_widgets(store: LayoutStore, widgets: Vec<WidgetInstance>) -> Self {
        let mut widgets = widgets;
        let warnings = crate::dashboard::persistence::sanitize(&mut widgets);
        Self {
            widgets,
            store,
            dirty: false,
            warnings,
            source: LayoutSource::Saved,
        }
    }

    pub fn widgets(&self) -> &[WidgetInstance] {
        &self.widgets
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn get(&self, id: &WidgetId) -> Option<&WidgetInstance> {
        self.widgets.iter().find(|w| &w.id == id)
    }

    pub fn contains(&self, id: &WidgetId) -> bool {
        self.get(id).is_some()
    }

    /// True when the collection changed since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn source(&self) -> LayoutSource {
        self.source
    }

    fn find_mut(&mut self, id: &WidgetId) -> Option<&mut WidgetInstance> {
        self.widgets.iter_mut().find(|w| &w.id == id)
    }

    /// Append a new widget of `kind` at the add position with the kind's
    /// default size.
    pub fn add_widget(&mut self, kind: WidgetKind) -> WidgetId {
        let mut widget = WidgetInstance::new(kind, ADD_POSITION);
        while self.contains(&widget.id) {
            widget.id = WidgetId::generate();
        }
        let id = widget.id.clone();
        tracing::debug!(id = %id, kind = %widget.kind, "widget added");
        self.widgets.push(widget);
        self.dirty = true;
        id
    }

    /// Remove by id. Removing an absent id is a no-op returning `false`.
    pub fn remove_widget(&mut self, id: &WidgetId) -> bool {
        let before = self.widgets.len();
        self.widgets.retain(|w| &w.id != id);
        let removed = self.widgets.len() != before;
        if removed {
            tracing::debug!(id = %id, "widget removed");
            self.dirty = true;
        }
        removed
    }

    pub fn update_position(&mut self, id: &WidgetId, position: Position) -> bool {
        let Some(widget) = self.find_mut(id) else {
            return false;
        };
        if widget.is_locked {
            return false;
        }
        if widget.position == position {
            return true;
        }
        widget.position = position;
        self.dirty = true;
        true
    }

    /// Set the size, raising each dimension to its floor.
    pub fn update_size(&mut self, id: &WidgetId, size: Size) -> bool {
        let Some(widget) = self.find_mut(id) else {
            return false;
        };
        if widget.is_locked {
            return false;
        }
        let size = size.clamped();
        if widget.size == size {
            return true;
        }
        widget.size = size;
        self.dirty = true;
        true
    }

    /// Flip the lock flag, returning the new value.
    pub fn toggle_lock(&mut self, id: &WidgetId) -> Option<bool> {
        let widget = self.find_mut(id)?;
        widget.is_locked = !widget.is_locked;
        let locked = widget.is_locked;
        self.dirty = true;
        Some(locked)
    }

    /// Flip the background flag, returning the new value.
    pub fn toggle_background(&mut self, id: &WidgetId) -> Option<bool> {
        let widget = self.find_mut(id)?;
        widget.background_disabled = !widget.background_disabled;
        let disabled = widget.background_disabled;
        self.dirty = true;
        Some(disabled)
    }

    /// Merge `partial` into the widget's data, keeping keys it does not name.
    /// Only JSON objects are accepted; anything else is refused with `false`.
    pub fn merge_data(&mut self, id: &WidgetId, partial: &Value) -> bool {
        if !partial.is_object() {
            tracing::warn!(id = %id, "ignoring non-object data update");
            return false;
        }
        let Some(widget) = self.find_mut(id) else {
            return false;
        };
        let merged = merge_json(&widget.data, partial);
        if merged != widget.data {
            widget.data = merged;
            self.dirty = true;
        }
        true
    }

    /// Write the full collection through the layout store. A failed write
    /// leaves the board dirty so the user can try again.
    pub fn save_layout(&mut self) -> anyhow::Result<()> {
        match self.store.save(&self.widgets) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                tracing::error!("layout save failed: {e:#}");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::model::{MIN_HEIGHT, MIN_WIDTH};
    use crate::dashboard::persistence::MemoryStore;
    use serde_json::json;

    fn empty_board() -> Board {
        Board::with_widgets(LayoutStore::new(MemoryStore::new()), Vec::new())
    }

    #[test]
    fn ids_stay_distinct_across_adds_and_removes() {
        let mut board = empty_board();
        let mut expected = 0usize;
        let mut ids = Vec::new();
        for i in 0..40 {
            if i % 3 == 2 {
                let victim = ids.remove(0);
                assert!(board.remove_widget(&victim));
                assert!(!board.remove_widget(&victim));
                expected -= 1;
            } else {
                ids.push(board.add_widget(WidgetKind::ADDABLE[i % WidgetKind::ADDABLE.len()].clone()));
                expected += 1;
            }
        }
        assert_eq!(board.len(), expected);
        let mut seen: Vec<_> = board.widgets().iter().map(|w| w.id.clone()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), board.len());
    }

    #[test]
    fn add_appends_with_kind_default_size() {
        let mut board = empty_board();
        let a = board.add_widget(WidgetKind::Clock);
        let b = board.add_widget(WidgetKind::Link);
        assert_eq!(board.widgets()[0].id, a);
        assert_eq!(board.widgets()[1].id, b);
        assert_eq!(board.get(&b).unwrap().size, WidgetKind::Link.default_size());
        assert_eq!(board.get(&b).unwrap().position, ADD_POSITION);
        assert!(board.is_dirty());
    }

    #[test]
    fn size_never_drops_below_floor() {
        let mut board = empty_board();
        let id = board.add_widget(WidgetKind::Search);
        for (w, h) in [(-5000, -5000), (0, 0), (279, 149), (281, 151), (i32::MIN, 10)] {
            board.update_size(&id, Size::new(w, h));
            let size = board.get(&id).unwrap().size;
            assert!(size.width >= MIN_WIDTH && size.height >= MIN_HEIGHT);
        }
    }

    #[test]
    fn locked_widget_ignores_geometry_updates() {
        let mut board = empty_board();
        let id = board.add_widget(WidgetKind::Clock);
        let before = board.get(&id).unwrap().clone();
        assert_eq!(board.toggle_lock(&id), Some(true));
        assert!(!board.update_position(&id, Position::new(999, 999)));
        assert!(!board.update_size(&id, Size::new(900, 900)));
        let after = board.get(&id).unwrap();
        assert_eq!(after.position, before.position);
        assert_eq!(after.size, before.size);
        assert_eq!(board.toggle_lock(&id), Some(false));
        assert!(board.update_position(&id, Position::new(1, 2)));
    }

    #[test]
    fn toggles_are_involutions() {
        let mut board = empty_board();
        let id = board.add_widget(WidgetKind::Tabs);
        board.toggle_lock(&id);
        board.toggle_lock(&id);
        board.toggle_background(&id);
        board.toggle_background(&id);
        let w = board.get(&id).unwrap();
        assert!(!w.is_locked);
        assert!(!w.background_disabled);
        assert_eq!(board.toggle_lock(&WidgetId::from("nope")), None);
    }

    #[test]
    fn background_toggle_is_independent_of_lock() {
        let mut board = empty_board();
        let id = board.add_widget(WidgetKind::Clock);
        board.toggle_lock(&id);
        assert_eq!(board.toggle_background(&id), Some(true));
        assert!(board.get(&id).unwrap().is_locked);
    }

    #[test]
    fn merge_data_keeps_unrelated_keys() {
        let mut board = empty_board();
        let id = board.add_widget(WidgetKind::Link);
        board.merge_data(&id, &json!({"title": "Docs", "pinned": true}));
        board.merge_data(&id, &json!({"title": "Rust", "url": "https://rust-lang.org"}));
        assert_eq!(
            board.get(&id).unwrap().data,
            json!({"title": "Rust", "url": "https://rust-lang.org", "pinned": true})
        );
    }

    #[test]
    fn merge_data_refuses_non_objects() {
        let mut board = empty_board();
        let id = board.add_widget(WidgetKind::Link);
        board.merge_data(&id, &json!({"title": "Docs", "url": "https://docs.rs"}));
        board.save_layout().unwrap();
        let before = board.get(&id).unwrap().data.clone();
        assert!(!board.merge_data(&id, &json!("oops")));
        assert!(!board.merge_data(&id, &Value::Null));
        assert!(!board.merge_data(&id, &json!([1])));
        assert_eq!(board.get(&id).unwrap().data, before);
        assert!(!board.is_dirty());
    }

    #[test]
    fn merge_data_into_non_object_data_keeps_round_trip() {
        let store = LayoutStore::new(MemoryStore::new());
        let mut w = WidgetInstance::new(WidgetKind::Link, Position::new(0, 0));
        w.data = Value::Null;
        let id = w.id.clone();
        let mut board = Board::with_widgets(store, vec![w]);
        assert!(board.merge_data(&id, &json!({"title": "Docs"})));
        assert_eq!(board.get(&id).unwrap().data, json!({"title": "Docs"}));

        let blob = crate::dashboard::persistence::serialize_layout(board.widgets()).unwrap();
        let (reloaded, _) = crate::dashboard::persistence::parse_layout(&blob).unwrap();
        assert_eq!(reloaded, board.widgets());
    }

    #[test]
    fn save_clears_dirty_flag() {
        let mut board = empty_board();
        board.add_widget(WidgetKind::Clock);
        board.save_layout().unwrap();
        assert!(!board.is_dirty());
    }

    #[test]
    fn failed_save_keeps_board_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a dir").unwrap();
        let store = LayoutStore::new(crate::dashboard::persistence::FileStore::new(
            blocker.join("nested"),
        ));
        let mut board = Board::with_widgets(store, Vec::new());
        board.add_widget(WidgetKind::Clock);
        assert!(board.save_layout().is_err());
        assert!(board.is_dirty());
    }
}
