//! Zoom/pan state of the main view and the minimap.
//!
//! Screen coordinates are `world * zoom + pan`. The scene itself never sees
//! screen coordinates; everything here converts at the boundary.

use crate::config::ViewConfig;
use crate::geom::{inflate, is_null, point, rect, union_rects, vector, Point, Rect, Size, Transform, Vector};
use crate::render::level_of_detail;
use crate::scene::SceneEvent;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f32,
    pan: Vector,
    size: Size,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Size::zero())
    }
}

impl Viewport {
    pub fn new(size: Size) -> Self {
        Self {
            zoom: 1.0,
            pan: vector(0.0, 0.0),
            size,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Vector {
        self.pan
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        point(p.x * self.zoom + self.pan.x, p.y * self.zoom + self.pan.y)
    }

    pub fn screen_to_world(&self, p: Point) -> Point {
        point((p.x - self.pan.x) / self.zoom, (p.y - self.pan.y) / self.zoom)
    }

    pub fn world_rect_to_screen(&self, r: &Rect) -> Rect {
        let origin = self.world_to_screen(r.origin);
        rect(
            origin.x,
            origin.y,
            r.size.width * self.zoom,
            r.size.height * self.zoom,
        )
    }

    pub fn screen_rect_to_world(&self, r: &Rect) -> Rect {
        let origin = self.screen_to_world(r.origin);
        rect(
            origin.x,
            origin.y,
            r.size.width / self.zoom,
            r.size.height / self.zoom,
        )
    }

    /// World to screen transform.
    pub fn transform(&self) -> Transform {
        Transform::scale(self.zoom, self.zoom).then_translate(self.pan)
    }

    pub fn level_of_detail(&self) -> f32 {
        level_of_detail(&self.transform())
    }

    /// The part of the world currently on screen.
    pub fn visible_world_rect(&self) -> Rect {
        self.screen_rect_to_world(&Rect::from_size(self.size))
    }

    /// Zoom and pan so `target` fills the view, keeping its aspect ratio and
    /// `margin` pixels of padding. Empty targets or views are ignored.
    pub fn fit_in_view(&mut self, target: &Rect, margin: f32) {
        if is_null(target) || self.size.is_empty() {
            return;
        }
        let avail_w = (self.size.width - 2.0 * margin).max(1.0);
        let avail_h = (self.size.height - 2.0 * margin).max(1.0);
        let zx = if target.size.width > 0.0 {
            avail_w / target.size.width
        } else {
            f32::INFINITY
        };
        let zy = if target.size.height > 0.0 {
            avail_h / target.size.height
        } else {
            f32::INFINITY
        };
        let zoom = zx.min(zy);
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
        }
        self.center_on(target.center());
    }

    /// Scale by `factor` keeping the world point under `anchor` fixed.
    pub fn scale_about(&mut self, anchor: Point, factor: f32) {
        let zoom = self.zoom * factor;
        if !(zoom.is_finite() && zoom > 0.0) {
            tracing::trace!(factor, "ignoring invalid zoom factor");
            return;
        }
        let world = self.screen_to_world(anchor);
        self.zoom = zoom;
        self.pan = vector(anchor.x - world.x * zoom, anchor.y - world.y * zoom);
    }

    /// Pan by a screen-space delta.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.pan += vector(dx, dy);
    }

    /// Put the world point `world` at the center of the view.
    pub fn center_on(&mut self, world: Point) {
        self.pan = vector(
            self.size.width / 2.0 - world.x * self.zoom,
            self.size.height / 2.0 - world.y * self.zoom,
        );
    }
}

/// Fixed-size overview of the whole scene with a band marking the main view.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimap {
    view: Viewport,
    band: Option<Rect>,
}

impl Minimap {
    pub fn new(edge: f32) -> Self {
        Self {
            view: Viewport::new(Size::new(edge, edge)),
            band: None,
        }
    }

    pub fn view(&self) -> &Viewport {
        &self.view
    }

    /// Band geometry in minimap pixels, `None` while hidden.
    pub fn band(&self) -> Option<Rect> {
        self.band
    }

    pub fn zoom_to_fit(&mut self, scene_rect: &Rect, config: &ViewConfig) {
        let target = inflate(*scene_rect, config.minimap_margin);
        self.view.fit_in_view(&target, config.fit_margin);
    }

    /// Show the band only while the main view does not show the whole scene.
    pub fn adjust_rubber_band(&mut self, main: &Viewport, scene_rect: &Rect) {
        let visible = main.visible_world_rect();
        self.band = if visible.contains_rect(scene_rect) {
            None
        } else {
            Some(self.view.world_rect_to_screen(&visible))
        };
    }

    /// Recenter the main view on the world point under `pos` (minimap
    /// pixels). Does nothing while the band is hidden.
    pub fn center_on(&mut self, pos: Point, main: &mut Viewport) {
        let Some(band) = self.band else {
            return;
        };
        main.center_on(self.view.screen_to_world(pos));
        let half = vector(band.size.width / 2.0, band.size.height / 2.0);
        self.band = Some(Rect::new(pos - half, band.size));
    }
}

/// Keeps the main view and the minimap in step with the scene.
#[derive(Debug, Clone)]
pub struct ViewportController {
    main: Viewport,
    minimap: Minimap,
    scene_rect: Rect,
    config: ViewConfig,
}

impl ViewportController {
    pub fn new(size: Size, config: ViewConfig) -> Self {
        Self {
            main: Viewport::new(size),
            minimap: Minimap::new(config.minimap_size),
            scene_rect: Rect::zero(),
            config,
        }
    }

    pub fn main(&self) -> &Viewport {
        &self.main
    }

    pub fn minimap(&self) -> &Minimap {
        &self.minimap
    }

    pub fn scene_rect(&self) -> Rect {
        self.scene_rect
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Recompute the scene rect from the items bounds.
    pub fn set_items_rect(&mut self, items_rect: &Rect) {
        self.scene_rect = if is_null(items_rect) {
            Rect::zero()
        } else {
            inflate(*items_rect, self.config.scene_margin)
        };
    }

    /// React to a scene notification. Returns whether the views changed.
    pub fn handle_event(&mut self, event: &SceneEvent, items_rect: &Rect) -> bool {
        match event {
            SceneEvent::ScaleChanged(_) => {
                self.set_items_rect(items_rect);
                self.minimap.zoom_to_fit(&self.scene_rect, &self.config);
            }
            SceneEvent::LayoutChanged => {
                self.set_items_rect(items_rect);
                self.main.fit_in_view(&self.scene_rect, self.config.fit_margin);
                self.minimap.zoom_to_fit(&self.scene_rect, &self.config);
            }
            _ => return false,
        }
        self.adjust_band();
        tracing::trace!(?event, zoom = self.main.zoom, "viewport refit");
        true
    }

    pub fn zoom_to_fit(&mut self) {
        self.main.fit_in_view(&self.scene_rect, self.config.fit_margin);
        self.adjust_band();
    }

    /// Mouse wheel: each `wheel_step` of delta doubles the zoom.
    pub fn wheel(&mut self, delta_y: f32, anchor: Point) {
        let factor = 2f32.powf(delta_y / self.config.wheel_step);
        self.main.scale_about(anchor, factor);
        self.adjust_band();
    }

    pub fn scale_view(&mut self, factor: f32) {
        let center = point(self.main.size.width / 2.0, self.main.size.height / 2.0);
        self.main.scale_about(center, factor);
        self.adjust_band();
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.main.translate(dx, dy);
        self.adjust_band();
    }

    pub fn resize(&mut self, size: Size) {
        self.main.set_size(size);
        self.adjust_band();
    }

    /// Click or drag in the minimap.
    pub fn minimap_center_on(&mut self, pos: Point) {
        self.minimap.center_on(pos, &mut self.main);
    }

    /// Grow the scene rect to include `r`, as a drag past the border does.
    pub fn include_rect(&mut self, r: &Rect) {
        self.scene_rect = union_rects(self.scene_rect, *r);
        self.adjust_band();
    }

    fn adjust_band(&mut self) {
        self.minimap.adjust_rubber_band(&self.main, &self.scene_rect);
    }
}
