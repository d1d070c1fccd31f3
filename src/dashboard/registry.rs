use crate::dashboard::model::{Size, WidgetKind};
use crate::dashboard::widgets::{
    ClockWidget, CountdownWidget, LinkWidget, SearchWidget, TabsWidget, TasksWidget, UnknownWidget,
    Widget,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Add-menu entry for one registered kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetMetadata {
    pub kind: WidgetKind,
    pub name: String,
    pub icon: String,
    pub default_size: Size,
}

/// Descriptor for building widgets from JSON `data`.
#[derive(Clone)]
pub struct WidgetDescriptor {
    ctor: Arc<dyn Fn(&Value) -> Box<dyn Widget> + Send + Sync>,
    default_data: Arc<dyn Fn() -> Value + Send + Sync>,
    name: String,
    icon: String,
}

impl WidgetDescriptor {
    pub fn new<T: Widget + 'static, C: DeserializeOwned + Serialize + Default + 'static>(
        build: fn(C) -> T,
    ) -> Self {
        Self {
            ctor: Arc::new(move |v| {
                let cfg = serde_json::from_value::<C>(v.clone()).unwrap_or_default();
                Box::new(build(cfg))
            }),
            default_data: Arc::new(|| serde_json::to_value(C::default()).unwrap_or_else(|_| json!({}))),
            name: String::new(),
            icon: String::new(),
        }
    }

    pub fn with_menu(mut self, name: &str, icon: &str) -> Self {
        self.name = name.to_string();
        self.icon = icon.to_string();
        self
    }

    pub fn default_data(&self) -> Value {
        (self.default_data)()
    }

    pub fn create(&self, data: &Value) -> Box<dyn Widget> {
        (self.ctor)(data)
    }

    pub fn metadata(&self, kind: &WidgetKind) -> WidgetMetadata {
        WidgetMetadata {
            kind: kind.clone(),
            name: if self.name.is_empty() {
                kind.to_string()
            } else {
                self.name.clone()
            },
            icon: self.icon.clone(),
            default_size: kind.default_size(),
        }
    }
}

/// Static kind → widget body lookup. Read-only once built.
#[derive(Clone, Default)]
pub struct WidgetRegistry {
    map: HashMap<WidgetKind, WidgetDescriptor>,
}

impl WidgetRegistry {
    pub fn with_defaults() -> Self {
        let mut reg = Self::default();
        reg.register(
            WidgetKind::Clock,
            WidgetDescriptor::new(ClockWidget::new).with_menu("Clock", "🕐"),
        );
        reg.register(
            WidgetKind::Search,
            WidgetDescriptor::new(SearchWidget::new).with_menu("Search Bar", "🔍"),
        );
        reg.register(
            WidgetKind::Tabs,
            WidgetDescriptor::new(TabsWidget::new).with_menu("Link Tabs", "🗂"),
        );
        reg.register(
            WidgetKind::Countdown,
            WidgetDescriptor::new(CountdownWidget::new).with_menu("Day End Countdown", "⏳"),
        );
        reg.register(
            WidgetKind::Link,
            WidgetDescriptor::new(LinkWidget::new).with_menu("Link", "🔗"),
        );
        reg.register(
            WidgetKind::Tasks,
            WidgetDescriptor::new(TasksWidget::new).with_menu("Tasks", "✅"),
        );
        reg
    }

    pub fn register(&mut self, kind: WidgetKind, descriptor: WidgetDescriptor) {
        self.map.insert(kind, descriptor);
    }

    pub fn contains(&self, kind: &WidgetKind) -> bool {
        self.map.contains_key(kind)
    }

    /// Build the body for `kind`. Unregistered kinds get the inert
    /// placeholder; this never fails.
    pub fn create(&self, kind: &WidgetKind, data: &Value) -> Box<dyn Widget> {
        let Some(descriptor) = self.map.get(kind) else {
            tracing::debug!(kind = %kind, "no widget registered; using placeholder");
            return Box::new(UnknownWidget::new(kind.as_str()));
        };
        if data.is_null() {
            descriptor.create(&descriptor.default_data())
        } else {
            descriptor.create(data)
        }
    }

    /// Add-menu entries in fixed order.
    pub fn menu(&self) -> Vec<WidgetMetadata> {
        WidgetKind::ADDABLE
            .iter()
            .filter_map(|kind| self.metadata_for(kind))
            .collect()
    }

    pub fn metadata_for(&self, kind: &WidgetKind) -> Option<WidgetMetadata> {
        self.map.get(kind).map(|d| d.metadata(kind))
    }

    pub fn default_data(&self, kind: &WidgetKind) -> Option<Value> {
        self.map.get(kind).map(|d| d.default_data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::model::WidgetId;
    use crate::dashboard::widgets::WidgetContext;
    use eframe::egui;

    #[test]
    fn menu_lists_kinds_in_fixed_order() {
        let reg = WidgetRegistry::with_defaults();
        let names: Vec<_> = reg.menu().into_iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            vec!["Clock", "Search Bar", "Link Tabs", "Day End Countdown", "Link", "Tasks"]
        );
    }

    #[test]
    fn menu_carries_default_sizes() {
        let reg = WidgetRegistry::with_defaults();
        for entry in reg.menu() {
            assert_eq!(entry.default_size, entry.kind.default_size());
            assert!(!entry.icon.is_empty());
        }
    }

    #[test]
    fn unregistered_kind_renders_placeholder() {
        let reg = WidgetRegistry::with_defaults();
        let kind = WidgetKind::Other("Weather".into());
        assert!(!reg.contains(&kind));
        let mut widget = reg.create(&kind, &json!({}));
        let id = WidgetId::from("widget-x");
        egui::__run_test_ui(|ui| {
            assert!(widget.render(ui, &WidgetContext::new(&id)).is_none());
        });
    }

    #[test]
    fn garbage_data_falls_back_to_defaults() {
        let reg = WidgetRegistry::with_defaults();
        for kind in WidgetKind::ADDABLE {
            let _ = reg.create(&kind, &json!("not an object"));
            let _ = reg.create(&kind, &Value::Null);
        }
        assert_eq!(reg.default_data(&WidgetKind::Tabs).unwrap()["tabs"][0]["name"], "Code");
        assert_eq!(reg.default_data(&WidgetKind::Tasks).unwrap(), json!({"tasks": []}));
    }

    #[test]
    fn empty_registry_offers_nothing() {
        assert!(WidgetRegistry::default().menu().is_empty());
    }
}
