use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Smallest width a widget may ever have, in pixels.
pub const MIN_WIDTH: i32 = 280;
/// Smallest height a widget may ever have, in pixels.
pub const MIN_HEIGHT: i32 = 150;

/// Where newly added widgets are placed.
pub const ADD_POSITION: Position = Position { x: 50, y: 50 };
/// Where the built-in default layout places its clock.
pub const DEFAULT_LAYOUT_POSITION: Position = Position { x: 100, y: 100 };

/// Opaque widget identifier. Assigned once, never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    pub fn generate() -> Self {
        Self(format!("widget-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WidgetId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for WidgetId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Widget type tag. `Other` keeps tags written by newer builds so they
/// survive a load/save cycle; it is never offered in the add menu.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetKind {
    Clock,
    Search,
    Tabs,
    Countdown,
    Link,
    Tasks,
    Other(String),
}

impl WidgetKind {
    /// Kinds offered by the add menu, in menu order.
    pub const ADDABLE: [WidgetKind; 6] = [
        WidgetKind::Clock,
        WidgetKind::Search,
        WidgetKind::Tabs,
        WidgetKind::Countdown,
        WidgetKind::Link,
        WidgetKind::Tasks,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            WidgetKind::Clock => "Clock",
            WidgetKind::Search => "Search",
            WidgetKind::Tabs => "Tabs",
            WidgetKind::Countdown => "Countdown",
            WidgetKind::Link => "Link",
            WidgetKind::Tasks => "Tasks",
            WidgetKind::Other(tag) => tag,
        }
    }

    pub fn default_size(&self) -> Size {
        match self {
            WidgetKind::Clock => Size::new(320, 180),
            WidgetKind::Search => Size::new(400, 150),
            WidgetKind::Tabs => Size::new(360, 200),
            WidgetKind::Countdown => Size::new(300, 160),
            WidgetKind::Link => Size::new(MIN_WIDTH, MIN_HEIGHT),
            WidgetKind::Tasks => Size::new(340, 300),
            WidgetKind::Other(_) => Size::new(320, 180),
        }
    }
}

impl From<String> for WidgetKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "Clock" => WidgetKind::Clock,
            "Search" => WidgetKind::Search,
            "Tabs" => WidgetKind::Tabs,
            "Countdown" => WidgetKind::Countdown,
            "Link" => WidgetKind::Link,
            "Tasks" => WidgetKind::Tasks,
            _ => WidgetKind::Other(tag),
        }
    }
}

impl From<WidgetKind> for String {
    fn from(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Raise each dimension to its floor.
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.max(MIN_WIDTH),
            height: self.height.max(MIN_HEIGHT),
        }
    }

    pub fn is_within_floor(self) -> bool {
        self.width >= MIN_WIDTH && self.height >= MIN_HEIGHT
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(MIN_WIDTH, MIN_HEIGHT)
    }
}

/// One placed widget on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetInstance {
    pub id: WidgetId,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub position: Position,
    pub size: Size,
    pub is_locked: bool,
    pub background_disabled: bool,
    pub data: Value,
}

impl WidgetInstance {
    pub fn new(kind: WidgetKind, position: Position) -> Self {
        Self {
            id: WidgetId::generate(),
            size: kind.default_size(),
            kind,
            position,
            is_locked: false,
            background_disabled: false,
            data: Value::Object(Default::default()),
        }
    }

    /// The layout used when nothing usable has been saved yet.
    pub fn default_layout() -> Vec<Self> {
        vec![Self::new(WidgetKind::Clock, DEFAULT_LAYOUT_POSITION)]
    }
}

/// Typed view of a Link widget's `data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

/// One button in the Tabs widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabLink {
    pub name: String,
    pub url: String,
}

impl TabLink {
    fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

fn default_tabs() -> Vec<TabLink> {
    vec![
        TabLink::new("Code", "https://github.com"),
        TabLink::new("Design", "https://dribbble.com"),
        TabLink::new("Social", "https://twitter.com"),
        TabLink::new("News", "https://news.ycombinator.com"),
    ]
}

/// Typed view of a Tabs widget's `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabsData {
    #[serde(default = "default_tabs")]
    pub tabs: Vec<TabLink>,
}

impl Default for TabsData {
    fn default() -> Self {
        Self {
            tabs: default_tabs(),
        }
    }
}

pub const DEFAULT_SEARCH_ENGINE: &str = "https://www.google.com/search";

fn default_engine() -> String {
    DEFAULT_SEARCH_ENGINE.to_string()
}

/// Typed view of a Search widget's `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchData {
    #[serde(default = "default_engine")]
    pub engine: String,
    #[serde(default = "default_true")]
    pub suggestions: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SearchData {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            suggestions: true,
        }
    }
}

/// One entry of a Tasks widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Typed view of a Tasks widget's `data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksData {
    #[serde(default)]
    pub tasks: Vec<Task>,
}
