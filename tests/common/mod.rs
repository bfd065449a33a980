//! Common test utilities for integration tests.

#![allow(dead_code)]

use slint::{Image, Rgba8Pixel, SharedPixelBuffer};
use slint_network_view::geom::{point, Point};
use slint_network_view::{MoleculeDescriptor, NetworkScene, SceneEvent};
use std::cell::RefCell;
use std::rc::Rc;

/// Records every event a scene emits.
#[derive(Default, Clone)]
pub struct EventTracker {
    pub events: Rc<RefCell<Vec<SceneEvent>>>,
}

impl EventTracker {
    /// Register a new tracker as a listener on `scene`.
    pub fn attach(scene: &mut NetworkScene) -> Self {
        let tracker = Self::default();
        let sink = tracker.events.clone();
        scene.on_event(move |event| sink.borrow_mut().push(*event));
        tracker
    }

    pub fn events(&self) -> Vec<SceneEvent> {
        self.events.borrow().clone()
    }

    pub fn count(&self, matches: impl Fn(&SceneEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| matches(e)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

/// `n` nodes in a row, 100 units apart, with the default radius.
pub fn row_scene(n: usize) -> NetworkScene {
    let mut scene = NetworkScene::new();
    let indices: Vec<usize> = (0..n).collect();
    let positions: Vec<Point> = (0..n).map(|i| point(i as f32 * 100.0, 0.0)).collect();
    scene.create_nodes(&indices, &[], &positions, &[], &[]);
    scene
}

/// A row of `n` nodes chained by `n - 1` edges `i -> i + 1`.
pub fn chain_scene(n: usize) -> NetworkScene {
    let mut scene = row_scene(n);
    let m = n.saturating_sub(1);
    let indices: Vec<usize> = (0..m).collect();
    let sources: Vec<usize> = (0..m).collect();
    let dests: Vec<usize> = (1..=m).collect();
    scene.create_edges(&indices, &sources, &dests, &vec![1.0; m]);
    scene
}

/// Positions on a square-ish grid with `spacing` between neighbours.
pub fn grid_positions(n: usize, spacing: f32) -> Vec<Point> {
    let cols = (n as f32).sqrt().ceil().max(1.0) as usize;
    (0..n)
        .map(|i| point((i % cols) as f32 * spacing, (i / cols) as f32 * spacing))
        .collect()
}

/// Molecule renderer producing a blank square of the requested size.
pub fn blank_renderer(_descriptor: &MoleculeDescriptor, size: u32) -> Option<Image> {
    if size == 0 {
        return None;
    }
    Some(Image::from_rgba8(SharedPixelBuffer::<Rgba8Pixel>::new(size, size)))
}
