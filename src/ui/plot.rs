use crate::chart::{ChartPlot, ChartView, NO_DATA};
use crate::config::Theme;
use macroquad::prelude::*;
use std::f32::consts::FRAC_PI_2;

const GRID_LINES: usize = 5;
const MARGIN_LEFT: f32 = 90.0;
const MARGIN_RIGHT: f32 = 20.0;
const MARGIN_TOP: f32 = 40.0;
const MARGIN_BOTTOM: f32 = 50.0;

/// Clear `area` and draw `view` into it.
pub fn draw_chart(view: &ChartView, area: Rect) {
    draw_rectangle(area.x, area.y, area.w, area.h, Theme::BACKGROUND);
    draw_rectangle_lines(area.x, area.y, area.w, area.h, 1.0, Theme::GRID);

    match view {
        ChartView::Plot(plot) => draw_plot(plot, area),
        ChartView::NoData => {
            let size = 32u16;
            let dims = measure_text(NO_DATA, None, size, 1.0);
            draw_text(
                NO_DATA,
                area.x + (area.w - dims.width) / 2.0,
                area.y + (area.h + dims.offset_y) / 2.0,
                size as f32,
                Theme::PLACEHOLDER,
            );
        }
    }
}

fn draw_plot(plot: &ChartPlot, area: Rect) {
    let inner = Rect::new(
        area.x + MARGIN_LEFT,
        area.y + MARGIN_TOP,
        area.w - MARGIN_LEFT - MARGIN_RIGHT,
        area.h - MARGIN_TOP - MARGIN_BOTTOM,
    );

    // Title
    let title_dims = measure_text(&plot.title, None, Theme::LABEL_FONT as u16, 1.0);
    draw_text(
        &plot.title,
        area.x + (area.w - title_dims.width) / 2.0,
        area.y + 26.0,
        Theme::LABEL_FONT,
        Theme::FOREGROUND,
    );

    // 8% padding; a flat series gets a band around its value.
    let range = plot.max_close - plot.min_close;
    let padding = if range > 0.0 { range * 0.08 } else { plot.max_close.abs().max(1.0) * 0.05 };
    let min_val = plot.min_close - padding;
    let max_val = plot.max_close + padding;
    let val_range = max_val - min_val;

    // Grid and price labels
    for i in 0..=GRID_LINES {
        let frac = i as f32 / GRID_LINES as f32;
        let gy = inner.y + frac * inner.h;
        let gx = inner.x + frac * inner.w;
        draw_line(inner.x, gy, inner.x + inner.w, gy, 1.0, Theme::GRID);
        draw_line(gx, inner.y, gx, inner.y + inner.h, 1.0, Theme::GRID);

        let price = max_val - frac as f64 * val_range;
        let label = format!("{:.2}", price);
        let dims = measure_text(&label, None, Theme::SMALL_FONT as u16, 1.0);
        draw_text(&label, inner.x - dims.width - 8.0, gy + 5.0, Theme::SMALL_FONT, Theme::FOREGROUND);
    }
    draw_rectangle_lines(inner.x, inner.y, inner.w, inner.h, 1.5, Theme::FOREGROUND);

    // Series, x positioned by time
    let first_ts = plot.points.first().map(|p| p.timestamp.timestamp()).unwrap_or(0);
    let last_ts = plot.points.last().map(|p| p.timestamp.timestamp()).unwrap_or(0);
    let span = (last_ts - first_ts).max(1) as f64;

    let to_screen = |ts: i64, close: f64| -> Vec2 {
        let fx = if last_ts > first_ts { (ts - first_ts) as f64 / span } else { 0.5 };
        let fy = (close - min_val) / val_range;
        vec2(
            inner.x + fx as f32 * inner.w,
            inner.y + inner.h - fy as f32 * inner.h,
        )
    };

    let screen: Vec<Vec2> = plot
        .points
        .iter()
        .map(|p| to_screen(p.timestamp.timestamp(), p.close))
        .collect();
    if let [only] = screen.as_slice() {
        draw_circle(only.x, only.y, 3.0, Theme::FOREGROUND);
    }
    for pair in screen.windows(2) {
        draw_line(pair[0].x, pair[0].y, pair[1].x, pair[1].y, 2.0, Theme::FOREGROUND);
    }

    // Date labels at both ends of the x axis
    if let (Some(first), Some(last)) = (plot.points.first(), plot.points.last()) {
        let label_y = inner.y + inner.h + 20.0;
        draw_text(
            &first.timestamp.format("%Y-%m-%d").to_string(),
            inner.x,
            label_y,
            Theme::SMALL_FONT,
            Theme::FOREGROUND,
        );
        let end = last.timestamp.format("%Y-%m-%d").to_string();
        let dims = measure_text(&end, None, Theme::SMALL_FONT as u16, 1.0);
        draw_text(&end, inner.x + inner.w - dims.width, label_y, Theme::SMALL_FONT, Theme::FOREGROUND);
    }

    // Axis labels
    let x_dims = measure_text(plot.x_label, None, Theme::SMALL_FONT as u16, 1.0);
    draw_text(
        plot.x_label,
        inner.x + (inner.w - x_dims.width) / 2.0,
        area.y + area.h - 8.0,
        Theme::SMALL_FONT,
        Theme::FOREGROUND,
    );
    let y_dims = measure_text(plot.y_label, None, Theme::SMALL_FONT as u16, 1.0);
    draw_text_ex(
        plot.y_label,
        area.x + 18.0,
        inner.y + (inner.h + y_dims.width) / 2.0,
        TextParams {
            font_size: Theme::SMALL_FONT as u16,
            rotation: -FRAC_PI_2,
            color: Theme::FOREGROUND,
            ..Default::default()
        },
    );

    // Legend
    let legend_dims = measure_text(&plot.legend, None, Theme::SMALL_FONT as u16, 1.0);
    let lx = inner.x + 10.0;
    let ly = inner.y + 10.0;
    draw_rectangle(lx, ly, legend_dims.width + 46.0, 24.0, Theme::PANEL);
    draw_rectangle_lines(lx, ly, legend_dims.width + 46.0, 24.0, 1.0, Theme::GRID);
    draw_line(lx + 6.0, ly + 12.0, lx + 30.0, ly + 12.0, 2.0, Theme::FOREGROUND);
    draw_text(&plot.legend, lx + 36.0, ly + 17.0, Theme::SMALL_FONT, Theme::FOREGROUND);
}
