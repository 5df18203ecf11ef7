use crate::config::Theme;
use macroquad::prelude::*;

const ROW_HEIGHT: f32 = 30.0;
const WHEEL_STEP: f32 = 60.0;

/// Immediate-mode dropdown menu.
///
/// Draw it after everything else so the open list overlays the window.
#[derive(Debug, Clone)]
pub struct Dropdown {
    options: Vec<String>,
    selected: usize,
    open: bool,
    width: f32,
    scroll_offset: f32,
}

impl Dropdown {
    pub fn new(options: Vec<String>, width: f32) -> Self {
        Self {
            options,
            selected: 0,
            open: false,
            width,
            scroll_offset: 0.0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Draw at `(x, y)` and handle clicks when `accept_input` is set.
    /// Returns the newly picked index when the selection changed.
    pub fn show(&mut self, x: f32, y: f32, accept_input: bool) -> Option<usize> {
        let header = Rect::new(x, y, self.width, ROW_HEIGHT);
        let mouse: Vec2 = mouse_position().into();
        let hovered = accept_input && header.contains(mouse);

        draw_rectangle(header.x, header.y, header.w, header.h, if hovered { Theme::PANEL } else { Theme::BACKGROUND });
        draw_rectangle_lines(header.x, header.y, header.w, header.h, 1.0, Theme::FOREGROUND);
        if let Some(label) = self.options.get(self.selected) {
            draw_text(label, x + 8.0, y + 21.0, Theme::LABEL_FONT, Theme::FOREGROUND);
        }
        draw_text(if self.open { "^" } else { "v" }, x + self.width - 18.0, y + 21.0, Theme::LABEL_FONT, Theme::FOREGROUND);

        if !self.open {
            if hovered && is_mouse_button_pressed(MouseButton::Left) {
                self.open = true;
                self.scroll_offset = 0.0;
            }
            return None;
        }

        let list_top = y + ROW_HEIGHT;
        let visible_h = (screen_height() - list_top - 10.0).min(self.options.len() as f32 * ROW_HEIGHT);
        let list = Rect::new(x, list_top, self.width, visible_h);
        let total_h = self.options.len() as f32 * ROW_HEIGHT;

        if accept_input && list.contains(mouse) {
            let (_wx, wy) = mouse_wheel();
            let max_scroll = (total_h - visible_h).max(0.0);
            self.scroll_offset = (self.scroll_offset - wy * WHEEL_STEP).clamp(0.0, max_scroll);
        }

        draw_rectangle(list.x, list.y, list.w, list.h, Theme::BACKGROUND);
        let first = (self.scroll_offset / ROW_HEIGHT).floor() as usize;
        let last = (((self.scroll_offset + visible_h) / ROW_HEIGHT).ceil() as usize).min(self.options.len());

        let mut picked = None;
        for i in first..last {
            let row_y = list_top + i as f32 * ROW_HEIGHT - self.scroll_offset;
            if row_y < list_top - 0.5 || row_y + ROW_HEIGHT > list_top + visible_h + 0.5 {
                continue;
            }
            let row = Rect::new(x, row_y, self.width, ROW_HEIGHT);
            let row_hovered = accept_input && row.contains(mouse);
            let (bg, fg) = if row_hovered || i == self.selected {
                (Theme::FOREGROUND, Theme::BACKGROUND)
            } else {
                (Theme::BACKGROUND, Theme::FOREGROUND)
            };
            draw_rectangle(row.x, row.y, row.w, row.h, bg);
            draw_text(&self.options[i], x + 8.0, row_y + 21.0, Theme::LABEL_FONT, fg);
            if row_hovered && is_mouse_button_pressed(MouseButton::Left) {
                picked = Some(i);
            }
        }
        draw_rectangle_lines(list.x, list.y, list.w, list.h, 1.0, Theme::FOREGROUND);

        if accept_input && is_mouse_button_pressed(MouseButton::Left) {
            // Any click closes the list; a click on a row also picks it.
            self.open = false;
            if let Some(i) = picked {
                if i != self.selected {
                    self.selected = i;
                    return Some(i);
                }
            }
        }
        None
    }
}
