use crate::dashboard::board::Board;
use crate::dashboard::model::{Position, Size, WidgetId};
use crate::dashboard::trash::TrashZone;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// The single pointer interaction in progress, if any. Dragging and
/// resizing are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging {
        id: WidgetId,
        pointer_anchor: Position,
        position_anchor: Position,
    },
    Resizing {
        id: WidgetId,
        pointer_anchor: Position,
        size_anchor: Size,
    },
}

/// Reported once when an interaction finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionEnd {
    Dragged { id: WidgetId, deleted: bool },
    Resized { id: WidgetId },
}

/// Position for a drag frame. Depends only on the anchors so repeated
/// frames never accumulate error.
pub fn dragged_position(pointer_anchor: Position, position_anchor: Position, pointer: Position) -> Position {
    position_anchor.offset(
        pointer.x.saturating_sub(pointer_anchor.x),
        pointer.y.saturating_sub(pointer_anchor.y),
    )
}

/// Size for a resize frame, clamped to the floor.
pub fn resized_size(pointer_anchor: Position, size_anchor: Size, pointer: Position) -> Size {
    Size::new(
        size_anchor
            .width
            .saturating_add(pointer.x.saturating_sub(pointer_anchor.x)),
        size_anchor
            .height
            .saturating_add(pointer.y.saturating_sub(pointer_anchor.y)),
    )
    .clamped()
}

/// Pointer state sampled once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerSnapshot {
    /// Canvas-relative pointer position, `None` once the pointer left the window.
    pub pos: Option<Position>,
    pub primary_down: bool,
    pub window_focused: bool,
}

/// Turns pointer events into board mutations.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: Interaction,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Interaction {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, Interaction::Idle)
    }

    /// Arms the trash zone.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, Interaction::Dragging { .. })
    }

    pub fn active_id(&self) -> Option<&WidgetId> {
        match &self.state {
            Interaction::Idle => None,
            Interaction::Dragging { id, .. } | Interaction::Resizing { id, .. } => Some(id),
        }
    }

    fn can_begin(&self, board: &Board, id: &WidgetId, button: PointerButton) -> bool {
        if button != PointerButton::Primary || !self.is_idle() {
            return false;
        }
        matches!(board.get(id), Some(w) if !w.is_locked)
    }

    pub fn begin_drag(
        &mut self,
        board: &Board,
        id: &WidgetId,
        pointer: Position,
        button: PointerButton,
    ) -> bool {
        if !self.can_begin(board, id, button) {
            return false;
        }
        let Some(widget) = board.get(id) else {
            return false;
        };
        tracing::trace!(id = %id, "drag started");
        self.state = Interaction::Dragging {
            id: id.clone(),
            pointer_anchor: pointer,
            position_anchor: widget.position,
        };
        true
    }

    pub fn begin_resize(
        &mut self,
        board: &Board,
        id: &WidgetId,
        pointer: Position,
        button: PointerButton,
    ) -> bool {
        if !self.can_begin(board, id, button) {
            return false;
        }
        let Some(widget) = board.get(id) else {
            return false;
        };
        tracing::trace!(id = %id, "resize started");
        self.state = Interaction::Resizing {
            id: id.clone(),
            pointer_anchor: pointer,
            size_anchor: widget.size,
        };
        true
    }

    /// Commit the frame for `pointer`. Returns whether the board changed.
    pub fn pointer_moved(&mut self, board: &mut Board, pointer: Position) -> bool {
        match &self.state {
            Interaction::Idle => false,
            Interaction::Dragging {
                id,
                pointer_anchor,
                position_anchor,
            } => {
                let next = dragged_position(*pointer_anchor, *position_anchor, pointer);
                board.update_position(id, next)
            }
            Interaction::Resizing {
                id,
                pointer_anchor,
                size_anchor,
            } => {
                let next = resized_size(*pointer_anchor, *size_anchor, pointer);
                board.update_size(id, next)
            }
        }
    }

    /// Pointer released at `pointer`. A drag released over the trash zone
    /// removes the dragged widget. Anything else keeps the last frame.
    pub fn release(
        &mut self,
        board: &mut Board,
        pointer: Position,
        trash: &TrashZone,
    ) -> Option<InteractionEnd> {
        self.pointer_moved(board, pointer);
        let armed = self.is_dragging();
        match std::mem::take(&mut self.state) {
            Interaction::Idle => None,
            Interaction::Dragging { id, .. } => {
                let deleted = trash.accepts_drop(armed, pointer) && board.remove_widget(&id);
                if deleted {
                    tracing::info!(id = %id, "widget dropped on trash");
                }
                Some(InteractionEnd::Dragged { id, deleted })
            }
            Interaction::Resizing { id, .. } => Some(InteractionEnd::Resized { id }),
        }
    }

    /// Advance the active interaction from a per-frame pointer sample.
    ///
    /// Runs every frame regardless of which widget is under the pointer so a
    /// lost button-up or focus change can never leave a drag stuck.
    pub fn step(
        &mut self,
        board: &mut Board,
        pointer: PointerSnapshot,
        trash: &TrashZone,
    ) -> Option<InteractionEnd> {
        if self.is_idle() {
            return None;
        }
        if !pointer.window_focused {
            return self.cancel();
        }
        match (pointer.pos, pointer.primary_down) {
            (Some(pos), true) => {
                self.pointer_moved(board, pos);
                None
            }
            (Some(pos), false) => self.release(board, pos, trash),
            (None, true) => None,
            (None, false) => self.cancel(),
        }
    }

    /// End without a final frame, e.g. when the window loses focus. The
    /// trash zone never fires from here.
    pub fn cancel(&mut self) -> Option<InteractionEnd> {
        match std::mem::take(&mut self.state) {
            Interaction::Idle => None,
            Interaction::Dragging { id, .. } => {
                tracing::debug!(id = %id, "drag cancelled");
                Some(InteractionEnd::Dragged { id, deleted: false })
            }
            Interaction::Resizing { id, .. } => {
                tracing::debug!(id = %id, "resize cancelled");
                Some(InteractionEnd::Resized { id })
            }
        }
    }
}
