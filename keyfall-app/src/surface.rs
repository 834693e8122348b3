use egui::{pos2, vec2, Color32, Painter, Rect};
use keyfall_ports::render::{RectPx, RenderSurface, Rgba};

/// Draws into an egui painter, offset to the painter's allocated rect.
pub struct EguiSurface<'a> {
    painter: &'a Painter,
    origin: egui::Pos2,
}

impl<'a> EguiSurface<'a> {
    pub fn new(painter: &'a Painter, area: Rect) -> Self {
        Self {
            painter,
            origin: area.min,
        }
    }
}

/// Turns edge smoothing back on for views drawn outside the playfield.
pub fn restore_antialiasing(ctx: &egui::Context) {
    ctx.tessellation_options_mut(|options| options.feathering = true);
}

impl RenderSurface for EguiSurface<'_> {
    fn set_antialiasing(&mut self, enabled: bool) {
        self.painter
            .ctx()
            .tessellation_options_mut(|options| options.feathering = enabled);
    }

    fn fill_rect(&mut self, rect: RectPx, color: Rgba) {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        let min = pos2(self.origin.x + rect.x, self.origin.y + rect.y);
        self.painter.rect_filled(
            Rect::from_min_size(min, vec2(rect.width, rect.height)),
            0.0,
            Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Context, LayerId};

    #[test]
    fn menu_gets_smoothing_back_after_a_degraded_frame() {
        let ctx = Context::default();
        let area = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 100.0));
        let painter = Painter::new(ctx.clone(), LayerId::background(), area);

        EguiSurface::new(&painter, area).set_antialiasing(false);
        assert!(!ctx.tessellation_options(|options| options.feathering));

        restore_antialiasing(&ctx);
        assert!(ctx.tessellation_options(|options| options.feathering));
    }
}
