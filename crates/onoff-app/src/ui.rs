//! UI components using egui.

use egui::{
    Align2, Color32, Context, CornerRadius, CursorIcon, Frame, Margin, Sense, Stroke, Vec2,
};
use onoff_core::OnOffButton;
use peniko::Color;

const PANEL_BG: Color32 = Color32::from_rgb(250, 250, 250);
const BORDER: Color32 = Color32::from_rgb(226, 232, 240);
const TEXT_MUTED: Color32 = Color32::from_rgb(100, 116, 139);

/// Stroke colors offered as swatches.
const SWATCHES: &[(Color32, &str)] = &[
    (Color32::WHITE, "White"),
    (Color32::from_rgb(59, 130, 246), "Blue"),
    (Color32::from_rgb(16, 185, 129), "Emerald"),
    (Color32::from_rgb(245, 158, 11), "Amber"),
    (Color32::from_rgb(239, 68, 68), "Red"),
    (Color32::from_rgb(168, 85, 247), "Purple"),
];

const LINE_WIDTH_RANGE: std::ops::RangeInclusive<f64> = 0.5..=12.0;

/// UI state that persists across frames.
#[derive(Debug, Clone)]
pub struct UiState {
    pub line_width: f64,
    pub ring_alpha: f64,
    pub stroke_color: Color32,
    pub checked: bool,
    pub show_layer_bounds: bool,
    pub controls_visible: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            ring_alpha: 0.5,
            stroke_color: Color32::WHITE,
            checked: true,
            show_layer_bounds: false,
            controls_visible: true,
        }
    }
}

impl UiState {
    /// Mirror the button's current properties into the controls.
    pub fn sync_from(&mut self, button: &OnOffButton) {
        self.line_width = button.line_width();
        self.ring_alpha = button.ring_alpha();
        self.stroke_color = to_color32(button.stroke_color());
        self.checked = button.is_checked();
    }
}

/// Actions triggered by UI interactions.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SetLineWidth(f64),
    SetRingAlpha(f64),
    SetStrokeColor(Color32),
    SetChecked(bool),
    ShowLayerBounds(bool),
}

impl UiAction {
    /// Apply the action to the button. Returns false for view-only actions.
    pub fn apply(&self, button: &mut OnOffButton) -> bool {
        match *self {
            UiAction::SetLineWidth(width) => button.set_line_width(width),
            UiAction::SetRingAlpha(alpha) => button.set_ring_alpha(alpha),
            UiAction::SetStrokeColor(color) => button.set_stroke_color(to_peniko(color)),
            UiAction::SetChecked(checked) => button.set_checked(checked),
            UiAction::ShowLayerBounds(_) => return false,
        }
        true
    }
}

/// Render the control panel and return the action it triggered, if any.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    if !ui_state.controls_visible {
        return None;
    }

    let mut action = None;

    egui::Area::new(egui::Id::new("controls"))
        .anchor(Align2::LEFT_TOP, Vec2::new(12.0, 12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.spacing_mut().item_spacing = Vec2::new(6.0, 6.0);

                section_label(ui, "Line width");
                if ui
                    .add(egui::Slider::new(&mut ui_state.line_width, LINE_WIDTH_RANGE))
                    .changed()
                {
                    action = Some(UiAction::SetLineWidth(ui_state.line_width));
                }

                section_label(ui, "Ring alpha");
                if ui
                    .add(egui::Slider::new(&mut ui_state.ring_alpha, 0.0..=1.0))
                    .changed()
                {
                    action = Some(UiAction::SetRingAlpha(ui_state.ring_alpha));
                }

                section_label(ui, "Stroke");
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(2.0, 0.0);
                    for &(color, name) in SWATCHES {
                        let selected = ui_state.stroke_color == color;
                        if color_swatch(ui, color, name, selected) {
                            ui_state.stroke_color = color;
                            action = Some(UiAction::SetStrokeColor(color));
                        }
                    }
                });

                ui.separator();

                if ui.checkbox(&mut ui_state.checked, "Checked").changed() {
                    action = Some(UiAction::SetChecked(ui_state.checked));
                }
                if ui
                    .checkbox(&mut ui_state.show_layer_bounds, "Layer bounds")
                    .changed()
                {
                    action = Some(UiAction::ShowLayerBounds(ui_state.show_layer_bounds));
                }
            });
        });

    action
}

fn panel_frame() -> Frame {
    Frame::new()
        .fill(PANEL_BG)
        .corner_radius(CornerRadius::same(8))
        .stroke(Stroke::new(1.0, BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(8))
}

fn section_label(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(text).size(10.0).color(TEXT_MUTED));
}

/// Circular color swatch with an inner ring when selected.
fn color_swatch(ui: &mut egui::Ui, color: Color32, name: &str, selected: bool) -> bool {
    let (rect, response) = ui.allocate_exact_size(Vec2::splat(20.0), Sense::click());

    if ui.is_rect_visible(rect) {
        let center = rect.center();
        let radius = rect.width().min(rect.height()) / 2.0;
        ui.painter().circle_filled(center, radius, color);
        ui.painter().circle_stroke(center, radius, Stroke::new(1.0, BORDER));
        if selected {
            ui.painter()
                .circle_stroke(center, radius - 3.0, Stroke::new(2.0, Color32::from_gray(30)));
        }
    }

    let clicked = response.clicked();
    response.on_hover_text(name).on_hover_cursor(CursorIcon::PointingHand);
    clicked
}

fn to_color32(color: Color) -> Color32 {
    let rgba = color.to_rgba8();
    Color32::from_rgba_unmultiplied(rgba.r, rgba.g, rgba.b, rgba.a)
}

fn to_peniko(color: Color32) -> Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color::from_rgba8(r, g, b, a)
}
