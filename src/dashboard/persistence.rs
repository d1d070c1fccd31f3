use crate::dashboard::model::{Position, Size, WidgetId, WidgetInstance, WidgetKind};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Key the layout blob lives under.
pub const LAYOUT_KEY: &str = "dark-knight-dashboard-layout";

/// Newest envelope version this build reads and the one it writes.
pub const LAYOUT_VERSION: u32 = 1;

/// Durable string slots addressed by key.
pub trait KeyValueStore: Send {
    fn read(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
        }
    }

    fn write(&self, key: &str, value: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create layout dir {}", self.dir.display()))?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).with_context(|| format!("write {}", tmp.display()))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("finalize {}", path.display()))?;
        Ok(())
    }
}

/// In-process slots. Clones share the same storage, which lets a fresh
/// session observe what an earlier one saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        if let Ok(mut slots) = store.slots.lock() {
            slots.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store poisoned"))?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store poisoned"))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Where a loaded layout came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutSource {
    /// Parsed from the slot.
    Saved,
    /// Nothing was stored yet.
    Default,
    /// The stored blob could not be used and was replaced by the default.
    Recovered,
}

#[derive(Debug, Clone)]
pub struct LoadedLayout {
    pub widgets: Vec<WidgetInstance>,
    pub warnings: Vec<String>,
    pub source: LayoutSource,
}

/// Loads and saves the widget collection through a key-value slot.
pub struct LayoutStore {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl LayoutStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self::with_key(backend, LAYOUT_KEY)
    }

    pub fn with_key(backend: impl KeyValueStore + 'static, key: &str) -> Self {
        Self {
            backend: Box::new(backend),
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Never fails: a missing or unusable blob yields the default layout.
    pub fn load(&self) -> LoadedLayout {
        let content = match self.backend.read(&self.key) {
            Ok(Some(content)) if !content.trim().is_empty() => content,
            Ok(_) => {
                tracing::info!(key = %self.key, "no saved layout; using default");
                return LoadedLayout {
                    widgets: WidgetInstance::default_layout(),
                    warnings: Vec::new(),
                    source: LayoutSource::Default,
                };
            }
            Err(e) => {
                tracing::error!(key = %self.key, "failed to read layout: {e:#}");
                return Self::recovered();
            }
        };

        match parse_layout(&content) {
            Ok((widgets, warnings)) => {
                for w in &warnings {
                    tracing::warn!("{w}");
                }
                tracing::debug!(count = widgets.len(), "layout loaded");
                LoadedLayout {
                    widgets,
                    warnings,
                    source: LayoutSource::Saved,
                }
            }
            Err(e) => {
                tracing::error!(key = %self.key, "failed to parse layout: {e:#}");
                Self::recovered()
            }
        }
    }

    fn recovered() -> LoadedLayout {
        LoadedLayout {
            widgets: WidgetInstance::default_layout(),
            warnings: Vec::new(),
            source: LayoutSource::Recovered,
        }
    }

    /// Replace the stored blob with a full snapshot of `widgets`.
    pub fn save(&self, widgets: &[WidgetInstance]) -> anyhow::Result<()> {
        let json = serialize_layout(widgets)?;
        self.backend
            .write(&self.key, &json)
            .with_context(|| format!("save layout under '{}'", self.key))?;
        tracing::info!(count = widgets.len(), key = %self.key, "layout saved");
        Ok(())
    }
}

#[derive(Serialize)]
struct LayoutSnapshot<'a> {
    version: u32,
    widgets: &'a [WidgetInstance],
}

pub fn serialize_layout(widgets: &[WidgetInstance]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&LayoutSnapshot {
        version: LAYOUT_VERSION,
        widgets,
    })?)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredWidget {
    #[serde(default)]
    id: Option<WidgetId>,
    #[serde(rename = "type")]
    kind: WidgetKind,
    #[serde(default)]
    position: Position,
    #[serde(default)]
    size: Option<Size>,
    #[serde(default)]
    is_locked: bool,
    #[serde(default)]
    background_disabled: bool,
    #[serde(default)]
    data: Value,
}

impl StoredWidget {
    fn into_instance(self) -> WidgetInstance {
        let size = self.size.unwrap_or_else(|| self.kind.default_size());
        let data = if self.data.is_null() {
            Value::Object(Default::default())
        } else {
            self.data
        };
        WidgetInstance {
            id: self.id.unwrap_or_else(WidgetId::generate),
            kind: self.kind,
            position: self.position,
            size,
            is_locked: self.is_locked,
            background_disabled: self.background_disabled,
            data,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredLayout {
    Versioned {
        version: u32,
        widgets: Vec<StoredWidget>,
    },
    Legacy(Vec<StoredWidget>),
}

/// Parse a stored blob, migrating older shapes and repairing broken
/// invariants. Repairs are reported as warnings.
pub fn parse_layout(content: &str) -> anyhow::Result<(Vec<WidgetInstance>, Vec<String>)> {
    let stored: StoredLayout = serde_json::from_str(content).context("parse layout json")?;
    let mut warnings = Vec::new();
    let stored = match stored {
        StoredLayout::Versioned { version, widgets } => {
            if version > LAYOUT_VERSION {
                bail!("layout version {version} is newer than supported {LAYOUT_VERSION}");
            }
            widgets
        }
        StoredLayout::Legacy(widgets) => {
            warnings.push("unversioned layout migrated".to_string());
            widgets
        }
    };
    let mut widgets: Vec<WidgetInstance> =
        stored.into_iter().map(StoredWidget::into_instance).collect();
    warnings.extend(sanitize(&mut widgets));
    Ok((widgets, warnings))
}

/// Enforce unique ids and the size floor.
pub fn sanitize(widgets: &mut [WidgetInstance]) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();
    for widget in widgets.iter_mut() {
        if !seen.insert(widget.id.clone()) {
            let fresh = WidgetId::generate();
            warnings.push(format!(
                "duplicate widget id '{}' reassigned to '{}'",
                widget.id, fresh
            ));
            seen.insert(fresh.clone());
            widget.id = fresh;
        }
        if !widget.size.is_within_floor() {
            warnings.push(format!(
                "widget '{}' size {}x{} raised to the minimum",
                widget.id, widget.size.width, widget.size.height
            ));
            widget.size = widget.size.clamped();
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::model::{DEFAULT_LAYOUT_POSITION, MIN_HEIGHT, MIN_WIDTH};
    use serde_json::json;

    #[test]
    fn missing_optional_fields_get_defaults() {
        let blob = json!([
            {"id": "widget-1", "type": "Clock", "position": {"x": 100, "y": 100}, "isLocked": false},
            {"id": "widget-2", "type": "Link", "position": {"x": 5, "y": 6}}
        ])
        .to_string();
        let (widgets, _) = parse_layout(&blob).unwrap();
        assert_eq!(widgets.len(), 2);
        assert_eq!(widgets[0].size, WidgetKind::Clock.default_size());
        assert_eq!(widgets[1].size, WidgetKind::Link.default_size());
        assert!(!widgets[1].is_locked);
        assert!(!widgets[1].background_disabled);
        assert_eq!(widgets[1].data, json!({}));
    }

    #[test]
    fn legacy_array_is_migrated_with_warning() {
        let blob = json!([{"id": "a", "type": "Tabs", "position": {"x": 0, "y": 0}}]).to_string();
        let (widgets, warnings) = parse_layout(&blob).unwrap();
        assert_eq!(widgets[0].kind, WidgetKind::Tabs);
        assert!(warnings.iter().any(|w| w.contains("unversioned")));
    }

    #[test]
    fn newer_version_is_rejected() {
        let blob = json!({"version": LAYOUT_VERSION + 1, "widgets": []}).to_string();
        assert!(parse_layout(&blob).is_err());
    }

    #[test]
    fn duplicate_ids_are_reassigned() {
        let blob = json!({"version": 1, "widgets": [
            {"id": "same", "type": "Clock", "position": {"x": 0, "y": 0}},
            {"id": "same", "type": "Search", "position": {"x": 10, "y": 0}}
        ]})
        .to_string();
        let (widgets, warnings) = parse_layout(&blob).unwrap();
        assert_eq!(widgets[0].id.as_str(), "same");
        assert_ne!(widgets[1].id.as_str(), "same");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn undersized_widgets_are_clamped_on_load() {
        let blob = json!({"version": 1, "widgets": [
            {"id": "a", "type": "Clock", "position": {"x": 0, "y": 0}, "size": {"width": 10, "height": 10}}
        ]})
        .to_string();
        let (widgets, warnings) = parse_layout(&blob).unwrap();
        assert_eq!(widgets[0].size, Size::new(MIN_WIDTH, MIN_HEIGHT));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn unknown_kinds_survive_round_trip() {
        let blob = json!({"version": 1, "widgets": [
            {"id": "a", "type": "Weather", "position": {"x": 0, "y": 0}}
        ]})
        .to_string();
        let (widgets, _) = parse_layout(&blob).unwrap();
        assert_eq!(widgets[0].kind, WidgetKind::Other("Weather".into()));
        let again = serialize_layout(&widgets).unwrap();
        assert!(again.contains("\"Weather\""));
    }

    #[test]
    fn absent_blob_loads_default_clock() {
        let store = LayoutStore::new(MemoryStore::new());
        let loaded = store.load();
        assert_eq!(loaded.source, LayoutSource::Default);
        assert_eq!(loaded.widgets.len(), 1);
        assert_eq!(loaded.widgets[0].kind, WidgetKind::Clock);
        assert_eq!(loaded.widgets[0].position, DEFAULT_LAYOUT_POSITION);
        assert!(!loaded.widgets[0].is_locked);
    }

    #[test]
    fn corrupt_blob_recovers_to_default() {
        let store = LayoutStore::new(MemoryStore::with_entry(LAYOUT_KEY, "{not json"));
        let loaded = store.load();
        assert_eq!(loaded.source, LayoutSource::Recovered);
        assert_eq!(loaded.widgets.len(), 1);
        assert_eq!(loaded.widgets[0].kind, WidgetKind::Clock);
    }

    #[test]
    fn empty_saved_layout_stays_empty() {
        let backend = MemoryStore::new();
        let store = LayoutStore::new(backend.clone());
        store.save(&[]).unwrap();
        let loaded = LayoutStore::new(backend).load();
        assert_eq!(loaded.source, LayoutSource::Saved);
        assert!(loaded.widgets.is_empty());
    }

    #[test]
    fn file_store_writes_under_key_name() {
        let dir = tempfile::tempdir().unwrap();
        let fs = FileStore::new(dir.path());
        fs.write("k", "v").unwrap();
        assert_eq!(fs.read("k").unwrap().as_deref(), Some("v"));
        assert!(dir.path().join("k.json").exists());
        assert!(!dir.path().join("k.json.tmp").exists());
        assert_eq!(fs.read("missing").unwrap(), None);
    }
}
