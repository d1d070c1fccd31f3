use super::{typed_data, Widget, WidgetAction, WidgetContext};
use crate::dashboard::model::{Task, TasksData};
use eframe::egui;
use serde_json::{json, Value};

/// Checklist of short tasks kept in the widget's own `data`.
#[derive(Default)]
pub struct TasksWidget {
    data: TasksData,
    draft: String,
}

impl TasksWidget {
    pub fn new(data: TasksData) -> Self {
        Self {
            data,
            draft: String::new(),
        }
    }

    fn next_id(&self) -> u64 {
        self.data.tasks.iter().map(|t| t.id).max().map_or(1, |id| id + 1)
    }

    fn changed(&self) -> Option<WidgetAction> {
        Some(WidgetAction::UpdateData(json!({ "tasks": self.data.tasks })))
    }

    /// Append the draft as a new open task. Blank drafts are ignored.
    fn add_task(&mut self) -> Option<WidgetAction> {
        let text = self.draft.trim();
        if text.is_empty() {
            return None;
        }
        let task = Task {
            id: self.next_id(),
            text: text.to_string(),
            completed: false,
        };
        self.data.tasks.push(task);
        self.draft.clear();
        self.changed()
    }

    fn toggle(&mut self, id: u64) -> Option<WidgetAction> {
        let task = self.data.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        self.changed()
    }

    fn delete(&mut self, id: u64) -> Option<WidgetAction> {
        let before = self.data.tasks.len();
        self.data.tasks.retain(|t| t.id != id);
        if self.data.tasks.len() == before {
            return None;
        }
        self.changed()
    }
}

enum RowAction {
    Toggle(u64),
    Delete(u64),
}

impl Widget for TasksWidget {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &WidgetContext<'_>) -> Option<WidgetAction> {
        let mut out = None;
        ui.horizontal(|ui| {
            let width = ui.available_width() - 28.0 - ui.spacing().item_spacing.x;
            let edit = ui.add(
                egui::TextEdit::singleline(&mut self.draft)
                    .id(ctx.ui_id("tasks-draft"))
                    .hint_text("Add a new task...")
                    .desired_width(width),
            );
            let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("➕").on_hover_text("Add task").clicked() || submitted {
                out = self.add_task();
            }
        });

        if self.data.tasks.is_empty() {
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                ui.weak("Your task list is empty.");
                ui.small("Add a task to get started!");
            });
            return out;
        }

        let mut row_action = None;
        egui::ScrollArea::vertical()
            .id_source(ctx.ui_id("tasks-scroll"))
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for task in &self.data.tasks {
                    ui.horizontal(|ui| {
                        let mut done = task.completed;
                        if ui.checkbox(&mut done, "").changed() {
                            row_action = Some(RowAction::Toggle(task.id));
                        }
                        let text = if task.completed {
                            egui::RichText::new(&task.text).strikethrough().weak()
                        } else {
                            egui::RichText::new(&task.text)
                        };
                        if ui
                            .add(egui::Label::new(text).sense(egui::Sense::click()))
                            .clicked()
                        {
                            row_action = Some(RowAction::Toggle(task.id));
                        }
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("🗑").on_hover_text("Delete task").clicked() {
                                row_action = Some(RowAction::Delete(task.id));
                            }
                        });
                    });
                }
            });

        match row_action {
            Some(RowAction::Toggle(id)) => self.toggle(id).or(out),
            Some(RowAction::Delete(id)) => self.delete(id).or(out),
            None => out,
        }
    }

    fn on_data_updated(&mut self, data: &Value) {
        self.data = typed_data(data);
    }
}
