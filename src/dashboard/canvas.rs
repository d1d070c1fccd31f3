use crate::ai::AiWorker;
use crate::dashboard::board::Board;
use crate::dashboard::interaction::{
    InteractionController, InteractionEnd, PointerButton, PointerSnapshot,
};
use crate::dashboard::model::{Position, Size, WidgetId, WidgetInstance, WidgetKind};
use crate::dashboard::registry::WidgetRegistry;
use crate::dashboard::trash::{TrashVisual, TrashZone};
use crate::dashboard::widgets::{Widget, WidgetAction, WidgetContext};
use eframe::egui;
use serde_json::Value;
use std::collections::HashMap;

const HEADER_HEIGHT: f32 = 28.0;
const RESIZE_HANDLE: f32 = 14.0;
const BODY_MARGIN: f32 = 8.0;
const CORNER_RADIUS: f32 = 8.0;
/// Horizontal strip of a widget that always stays on the canvas.
const REACHABLE_WIDTH: i32 = 96;

struct RuntimeWidget {
    kind: WidgetKind,
    data: Value,
    widget: Box<dyn Widget>,
}

#[derive(Debug, Clone, PartialEq)]
enum CanvasCommand {
    BeginDrag {
        id: WidgetId,
        shown_at: Position,
        pointer: Position,
        button: PointerButton,
    },
    BeginResize {
        id: WidgetId,
        shown_at: Position,
        pointer: Position,
        button: PointerButton,
    },
    ToggleLock(WidgetId),
    ToggleBackground(WidgetId),
    Delete(WidgetId),
    Act(WidgetId, WidgetAction),
}

/// What happened on the canvas this frame that the app shell acts on.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CanvasOutput {
    /// URLs widgets asked to open.
    pub open_urls: Vec<String>,
    pub ended: Option<InteractionEnd>,
}

/// Canvas-relative integer position of a screen point.
pub fn to_canvas_position(origin: egui::Pos2, point: egui::Pos2) -> Position {
    Position::new(
        (point.x - origin.x).round() as i32,
        (point.y - origin.y).round() as i32,
    )
}

/// Where a widget is drawn: its stored position, pulled back just enough
/// that the header's grip and buttons stay on a canvas of `canvas` size.
pub fn reachable_position(position: Position, size: Size, canvas: egui::Vec2) -> Position {
    let keep_w = REACHABLE_WIDTH.min(size.width);
    let min_x = keep_w - size.width;
    let max_x = (canvas.x.floor() as i32 - keep_w).max(min_x);
    let max_y = (canvas.y.floor() as i32 - HEADER_HEIGHT as i32).max(0);
    Position::new(position.x.clamp(min_x, max_x), position.y.clamp(0, max_y))
}

fn widget_rect(origin: egui::Pos2, position: Position, size: Size) -> egui::Rect {
    egui::Rect::from_min_size(
        origin + egui::vec2(position.x as f32, position.y as f32),
        egui::vec2(size.width as f32, size.height as f32),
    )
}

fn pressed_button(ui: &egui::Ui) -> PointerButton {
    ui.input(|i| {
        if i.pointer.primary_down() {
            PointerButton::Primary
        } else if i.pointer.secondary_down() {
            PointerButton::Secondary
        } else {
            PointerButton::Middle
        }
    })
}

/// Free-form surface hosting one framed container per widget instance.
///
/// Bodies are built once per id and reused across frames; a change to an
/// instance's stored `data` is forwarded through `on_data_updated`.
pub struct Canvas {
    registry: WidgetRegistry,
    runtime: HashMap<WidgetId, RuntimeWidget>,
    interaction: InteractionController,
}

impl Canvas {
    pub fn new(registry: WidgetRegistry) -> Self {
        Self {
            registry,
            runtime: HashMap::new(),
            interaction: InteractionController::new(),
        }
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    /// Number of live widget bodies.
    pub fn runtime_len(&self) -> usize {
        self.runtime.len()
    }

    fn sync_runtime(&mut self, board: &Board) {
        self.runtime.retain(|id, _| board.contains(id));
        for w in board.widgets() {
            match self.runtime.get_mut(&w.id) {
                Some(rt) if rt.kind == w.kind => {
                    if rt.data != w.data {
                        rt.widget.on_data_updated(&w.data);
                        rt.data = w.data.clone();
                    }
                }
                _ => {
                    let widget = self.registry.create(&w.kind, &w.data);
                    self.runtime.insert(
                        w.id.clone(),
                        RuntimeWidget {
                            kind: w.kind.clone(),
                            data: w.data.clone(),
                            widget,
                        },
                    );
                }
            }
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, board: &mut Board, ai: Option<&AiWorker>) -> CanvasOutput {
        let (canvas_rect, _) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
        self.sync_runtime(board);

        let mut commands = Vec::new();
        let active = self.interaction.active_id().cloned();
        // Snapshot so bodies can render while commands queue up for the board.
        let widgets: Vec<WidgetInstance> = board.widgets().to_vec();
        for w in &widgets {
            let is_active = active.as_ref() == Some(&w.id);
            self.container_ui(ui, canvas_rect, w, is_active, ai, &mut commands);
        }

        let mut out = CanvasOutput::default();
        for cmd in commands {
            self.apply(board, cmd, &mut out);
        }

        let trash = TrashZone::for_canvas(canvas_rect.height().round() as i32);
        let pointer = ui.input(|i| PointerSnapshot {
            pos: i
                .pointer
                .latest_pos()
                .map(|p| to_canvas_position(canvas_rect.min, p)),
            primary_down: i.pointer.primary_down(),
            window_focused: i.focused,
        });
        self.trash_ui(ui, canvas_rect, &trash, pointer.pos);
        if self.interaction.is_dragging() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        }
        if let Some(end) = self.interaction.step(board, pointer, &trash) {
            if let InteractionEnd::Dragged { id, deleted: true } = &end {
                self.runtime.remove(id);
            }
            out.ended = Some(end);
        }
        out
    }

    fn apply(&mut self, board: &mut Board, cmd: CanvasCommand, out: &mut CanvasOutput) {
        match cmd {
            CanvasCommand::BeginDrag {
                id,
                shown_at,
                pointer,
                button,
            } => {
                board.update_position(&id, shown_at);
                self.interaction.begin_drag(board, &id, pointer, button);
            }
            CanvasCommand::BeginResize {
                id,
                shown_at,
                pointer,
                button,
            } => {
                board.update_position(&id, shown_at);
                self.interaction.begin_resize(board, &id, pointer, button);
            }
            CanvasCommand::ToggleLock(id) => {
                board.toggle_lock(&id);
            }
            CanvasCommand::ToggleBackground(id) => {
                board.toggle_background(&id);
            }
            CanvasCommand::Delete(id) => {
                if board.remove_widget(&id) {
                    self.runtime.remove(&id);
                }
            }
            CanvasCommand::Act(_, WidgetAction::OpenUrl(url)) => out.open_urls.push(url),
            CanvasCommand::Act(id, WidgetAction::UpdateData(partial)) => {
                board.merge_data(&id, &partial);
            }
        }
    }

    fn container_ui(
        &mut self,
        ui: &mut egui::Ui,
        canvas_rect: egui::Rect,
        w: &WidgetInstance,
        is_active: bool,
        ai: Option<&AiWorker>,
        commands: &mut Vec<CanvasCommand>,
    ) {
        // The active widget follows the pointer unclamped so anchors stay exact.
        let shown_at = if is_active {
            w.position
        } else {
            reachable_position(w.position, w.size, canvas_rect.size())
        };
        let rect = widget_rect(canvas_rect.min, shown_at, w.size);
        let clip = rect.intersect(canvas_rect);
        let visuals = ui.visuals().clone();
        let painter = ui.painter().with_clip_rect(clip);
        if !w.background_disabled {
            painter.rect(
                rect,
                CORNER_RADIUS,
                visuals.window_fill,
                visuals.window_stroke,
            );
        }
        if is_active {
            painter.rect_stroke(rect, CORNER_RADIUS, visuals.selection.stroke);
        }

        let header = egui::Rect::from_min_size(rect.min, egui::vec2(rect.width(), HEADER_HEIGHT));
        let mut header_ui = ui.child_ui_with_id_source(
            header.shrink2(egui::vec2(BODY_MARGIN, 2.0)),
            egui::Layout::right_to_left(egui::Align::Center),
            ("widget-header", w.id.as_str()),
        );
        header_ui.set_clip_rect(clip);
        if !is_active {
            if !w.is_locked
                && header_ui
                    .small_button("🗑")
                    .on_hover_text("Remove widget")
                    .clicked()
            {
                commands.push(CanvasCommand::Delete(w.id.clone()));
            }
            let bg_hint = if w.background_disabled {
                "Show background"
            } else {
                "Hide background"
            };
            if header_ui.small_button("◐").on_hover_text(bg_hint).clicked() {
                commands.push(CanvasCommand::ToggleBackground(w.id.clone()));
            }
            let (lock_icon, lock_hint) = if w.is_locked {
                ("🔒", "Unlock")
            } else {
                ("🔓", "Lock in place")
            };
            if header_ui.small_button(lock_icon).on_hover_text(lock_hint).clicked() {
                commands.push(CanvasCommand::ToggleLock(w.id.clone()));
            }
        }

        if !w.is_locked {
            let grip_max_x = header_ui.min_rect().min.x.min(header.max.x);
            let grip = egui::Rect::from_min_max(header.min, egui::pos2(grip_max_x, header.max.y));
            let resp = ui.interact(
                grip.intersect(clip),
                egui::Id::new(("widget-grip", w.id.as_str())),
                egui::Sense::drag(),
            );
            if resp.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
            }
            painter.text(
                grip.left_center() + egui::vec2(BODY_MARGIN, 0.0),
                egui::Align2::LEFT_CENTER,
                "⠿",
                egui::FontId::proportional(16.0),
                visuals.weak_text_color(),
            );
            if resp.drag_started() {
                if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
                    commands.push(CanvasCommand::BeginDrag {
                        id: w.id.clone(),
                        shown_at,
                        pointer: to_canvas_position(canvas_rect.min, origin),
                        button: pressed_button(ui),
                    });
                }
            }
        }

        let body_rect = egui::Rect::from_min_max(
            egui::pos2(rect.min.x, rect.min.y + HEADER_HEIGHT),
            rect.max,
        )
        .shrink(BODY_MARGIN);
        if let Some(rt) = self.runtime.get_mut(&w.id) {
            let mut body = ui.child_ui_with_id_source(
                body_rect,
                egui::Layout::top_down(egui::Align::Min),
                ("widget-body", w.id.as_str()),
            );
            body.set_clip_rect(body_rect.intersect(clip));
            let mut ctx = WidgetContext::new(&w.id);
            if let Some(ai) = ai {
                ctx = ctx.with_ai(ai);
            }
            if let Some(action) = rt.widget.render(&mut body, &ctx) {
                commands.push(CanvasCommand::Act(w.id.clone(), action));
            }
        }

        if !w.is_locked {
            let handle = egui::Rect::from_min_size(
                rect.max - egui::vec2(RESIZE_HANDLE, RESIZE_HANDLE),
                egui::vec2(RESIZE_HANDLE, RESIZE_HANDLE),
            );
            let resp = ui.interact(
                handle.intersect(clip),
                egui::Id::new(("widget-resize", w.id.as_str())),
                egui::Sense::drag(),
            );
            if resp.hovered() || resp.dragged() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeNwSe);
            }
            painter.line_segment(
                [
                    handle.left_bottom() + egui::vec2(3.0, -3.0),
                    handle.right_top() + egui::vec2(-3.0, 3.0),
                ],
                visuals.widgets.noninteractive.fg_stroke,
            );
            if resp.drag_started() {
                if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
                    commands.push(CanvasCommand::BeginResize {
                        id: w.id.clone(),
                        shown_at,
                        pointer: to_canvas_position(canvas_rect.min, origin),
                        button: pressed_button(ui),
                    });
                }
            }
        }
    }

    fn trash_ui(
        &self,
        ui: &egui::Ui,
        canvas_rect: egui::Rect,
        trash: &TrashZone,
        pointer: Option<Position>,
    ) {
        let visual = trash.visual_state(self.interaction.is_dragging(), pointer);
        if visual == TrashVisual::Hidden {
            return;
        }
        let r = trash.rect();
        let rect = egui::Rect::from_min_size(
            canvas_rect.min + egui::vec2(r.x as f32, r.y as f32),
            egui::vec2(r.w as f32, r.h as f32),
        );
        let painter = ui.ctx().layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("dashboard-trash"),
        ));
        let (radius, fill) = match visual {
            TrashVisual::Hot => (rect.width() * 0.6, egui::Color32::from_rgb(200, 40, 40)),
            _ => (rect.width() * 0.5, egui::Color32::from_rgba_unmultiplied(120, 30, 30, 180)),
        };
        painter.circle_filled(rect.center(), radius, fill);
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "🗑",
            egui::FontId::proportional(26.0),
            egui::Color32::WHITE,
        );
    }
}
