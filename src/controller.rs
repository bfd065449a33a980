//! High-level controller tying a [`NetworkScene`] to a Slint window.
//!
//! The [`NetworkView`] owns the scene, the viewport state and an inbox of
//! scene events, and hands out the callbacks a `.slint` front end needs.
//!
//! # Example
//!
//! ```ignore
//! use slint_network_view::{NetworkScene, NetworkView};
//! use slint_network_view::geom::Size;
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let view = NetworkView::new(NetworkScene::new(), Size::new(800.0, 600.0));
//!
//!     view.edit(|scene| {
//!         scene.create_nodes(&[0, 1], &[], &[], &[], &[]);
//!         scene.create_edges(&[0], &[0], &[1], &[1.0]);
//!     });
//!
//!     window.on_compute_edge_path(view.edge_path_callback());
//!     window.on_node_moved(view.node_moved_callback());
//!     window.on_wheel(view.wheel_callback());
//!
//!     window.run().unwrap();
//! }
//! ```

use crate::geom::{point, rect, vector, Point, Size};
use crate::hit_test::{find_edge_at, find_node_at};
use crate::scene::{ItemRef, NetworkScene, RenderItem, SceneEvent, Selector};
use crate::viewport::ViewportController;
use slint::{Model, SharedString, VecModel};
use std::cell::RefCell;
use std::rc::Rc;

/// Default pick distance for edges, in screen pixels.
const HOVER_DISTANCE: f32 = 5.0;

/// Clonable handle over the scene and its view.
///
/// Scene edits made through [`NetworkView::edit`] are followed by a
/// [`NetworkView::sync`], so the viewport reacts to scale and layout changes.
#[derive(Clone)]
pub struct NetworkView {
    scene: Rc<RefCell<NetworkScene>>,
    viewport: Rc<RefCell<ViewportController>>,
    inbox: Rc<RefCell<Vec<SceneEvent>>>,
    hover_distance: Rc<RefCell<f32>>,
}

impl NetworkView {
    pub fn new(mut scene: NetworkScene, size: Size) -> Self {
        let viewport = ViewportController::new(size, scene.config().view);
        let inbox = Rc::new(RefCell::new(Vec::new()));
        let sink = inbox.clone();
        scene.on_event(move |event| sink.borrow_mut().push(*event));
        Self {
            scene: Rc::new(RefCell::new(scene)),
            viewport: Rc::new(RefCell::new(viewport)),
            inbox,
            hover_distance: Rc::new(RefCell::new(HOVER_DISTANCE)),
        }
    }

    pub fn scene(&self) -> Rc<RefCell<NetworkScene>> {
        self.scene.clone()
    }

    pub fn viewport(&self) -> Rc<RefCell<ViewportController>> {
        self.viewport.clone()
    }

    /// Set the edge pick distance in screen pixels (default: 5.0).
    pub fn set_hover_distance(&self, distance: f32) {
        *self.hover_distance.borrow_mut() = distance;
    }

    /// Run `f` on the scene, then [`sync`](Self::sync).
    pub fn edit<R>(&self, f: impl FnOnce(&mut NetworkScene) -> R) -> R {
        let result = f(&mut self.scene.borrow_mut());
        self.sync();
        result
    }

    /// Feed pending scene events to the viewport. Returns how many were
    /// handled.
    pub fn sync(&self) -> usize {
        let events: Vec<SceneEvent> = self.inbox.borrow_mut().drain(..).collect();
        if events.is_empty() {
            return 0;
        }
        let items = self.scene.borrow().items_bounding_rect();
        let mut viewport = self.viewport.borrow_mut();
        events
            .iter()
            .filter(|event| viewport.handle_event(event, &items))
            .count()
    }

    // === Callback factories ===

    /// Returns a callback for `compute-edge-path`: screen-space SVG commands
    /// for an edge, empty when the index is unknown.
    pub fn edge_path_callback(&self) -> impl Fn(i32) -> SharedString {
        let view = self.clone();
        move |index| view.edge_path(index)
    }

    /// Returns a callback for `node-moved(index, dx, dy)` with a screen-space
    /// drag delta.
    pub fn node_moved_callback(&self) -> impl Fn(i32, f32, f32) {
        let view = self.clone();
        move |index, dx, dy| view.drag_node(index, dx, dy)
    }

    /// Returns a callback for `wheel(delta-y, x, y)`.
    pub fn wheel_callback(&self) -> impl Fn(f32, f32, f32) {
        let viewport = self.viewport.clone();
        move |delta_y, x, y| viewport.borrow_mut().wheel(delta_y, point(x, y))
    }

    // === Direct handlers ===

    pub fn edge_path(&self, index: i32) -> SharedString {
        let Ok(index) = usize::try_from(index) else {
            return SharedString::default();
        };
        let scene = self.scene.borrow();
        let Some(edge) = scene.edge(index) else {
            return SharedString::default();
        };
        let viewport = self.viewport.borrow();
        let main = viewport.main();
        edge.path()
            .transformed(main.zoom(), main.pan())
            .to_svg_commands()
            .into()
    }

    /// Move a node by a screen-space delta. Locked scenes and immovable
    /// nodes ignore it.
    pub fn drag_node(&self, index: i32, dx: f32, dy: f32) {
        let Ok(index) = usize::try_from(index) else {
            return;
        };
        let zoom = self.viewport.borrow().main().zoom();
        let mut scene = self.scene.borrow_mut();
        if scene.is_locked() {
            return;
        }
        let Some(node) = scene.node(index) else {
            return;
        };
        if !node.flags().movable {
            return;
        }
        let pos = node.pos() + vector(dx / zoom, dy / zoom);
        scene.move_node(index, pos);
    }

    // === Screen-space hit-testing facades ===

    fn to_world(&self, x: f32, y: f32) -> Point {
        self.viewport.borrow().main().screen_to_world(point(x, y))
    }

    /// Topmost node under a screen position.
    pub fn node_at_screen(&self, x: f32, y: f32) -> Option<usize> {
        let world = self.to_world(x, y);
        let scene = self.scene.borrow();
        let selection = scene.node_selection();
        find_node_at(world, scene.nodes(), |i| selection.contains(i))
    }

    /// Closest edge within the hover distance of a screen position.
    pub fn edge_at_screen(&self, x: f32, y: f32) -> Option<usize> {
        let world = self.to_world(x, y);
        let zoom = self.viewport.borrow().main().zoom();
        let distance = *self.hover_distance.borrow() / zoom;
        let scene = self.scene.borrow();
        let samples = scene.config().render.hit_samples;
        find_edge_at(world, scene.edges(), distance, samples)
    }

    /// Click at a screen position: nodes win over edges, empty space clears
    /// unless `shift` is held.
    pub fn click_at_screen(&self, x: f32, y: f32, shift: bool) -> Option<ItemRef> {
        let item = self
            .node_at_screen(x, y)
            .map(ItemRef::Node)
            .or_else(|| self.edge_at_screen(x, y).map(ItemRef::Edge));
        self.scene.borrow_mut().handle_click(item, shift);
        item
    }

    /// Select everything intersecting a screen-space rubber band.
    pub fn rubber_band_select(&self, sx: f32, sy: f32, sw: f32, sh: f32, extend: bool) {
        let area = self
            .viewport
            .borrow()
            .main()
            .screen_rect_to_world(&rect(sx, sy, sw, sh));
        self.scene.borrow_mut().select_in_rect(&area, extend);
    }

    /// Mirror the node selection into a Slint model.
    pub fn sync_selection_to_model(&self, model: &VecModel<i32>) {
        self.scene.borrow().node_selection().sync_to_model(model);
    }

    /// Take the node selection from a Slint model. Negative rows, unknown
    /// nodes and inert nodes are skipped.
    pub fn sync_selection_from_model(&self, model: &VecModel<i32>) {
        let ids: Vec<usize> = model.iter().filter_map(|row| usize::try_from(row).ok()).collect();
        self.scene
            .borrow_mut()
            .set_nodes_selection(Selector::Index(&ids));
    }

    /// Paint plan for what the main view currently shows.
    pub fn render_plan(&self) -> Vec<RenderItem> {
        let (lod, visible) = {
            let viewport = self.viewport.borrow();
            (viewport.main().level_of_detail(), viewport.main().visible_world_rect())
        };
        self.scene.borrow().render_plan(lod, Some(&visible))
    }
}
