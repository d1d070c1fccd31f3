pub mod board;
pub mod canvas;
pub mod interaction;
pub mod model;
pub mod persistence;
pub mod registry;
pub mod trash;
pub mod widgets;

pub use board::Board;
pub use canvas::{Canvas, CanvasOutput};
pub use interaction::{InteractionController, InteractionEnd, PointerButton, PointerSnapshot};
pub use model::{Position, Size, WidgetId, WidgetInstance, WidgetKind};
pub use persistence::{FileStore, KeyValueStore, LayoutSource, LayoutStore, MemoryStore};
pub use registry::{WidgetDescriptor, WidgetMetadata, WidgetRegistry};
pub use trash::{TrashVisual, TrashZone};
pub use widgets::{Widget, WidgetAction, WidgetContext};
