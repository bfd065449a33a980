//! Display-independent paint plans.
//!
//! Instead of painting into a surface, items describe what to draw as a list
//! of [`DrawCommand`]s in item coordinates. Hosts replay the list with
//! whatever drawing API they have; tests inspect it directly.

use slint::{Color, Image, SharedString};

use crate::config::RenderConfig;
use crate::edge::Edge;
use crate::geom::{centered_rect, point, Point, Rect, Transform};
use crate::node::{Node, Outline};
use crate::path::EdgePath;
use crate::style::{NetworkStyle, Pen, PenStyle};
use crate::text::Font;

#[derive(Debug, Clone, PartialEq)]
pub enum ClipShape {
    Ellipse(Rect),
    Polygon(Vec<Point>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    /// Ellipse inscribed in `rect`, stroked with `pen` when given.
    FillEllipse {
        rect: Rect,
        color: Color,
        pen: Option<Pen>,
    },
    FillPolygon {
        points: Vec<Point>,
        color: Color,
        pen: Option<Pen>,
    },
    /// Pie sector of the ellipse inscribed in `rect`. Angles are in degrees,
    /// counter-clockwise from three o'clock.
    FillPie {
        rect: Rect,
        start_deg: f32,
        span_deg: f32,
        color: Color,
    },
    PushClip(ClipShape),
    PopClip,
    StrokePath {
        path: EdgePath,
        pen: Pen,
    },
    /// Text centered in `rect`.
    DrawText {
        rect: Rect,
        text: SharedString,
        font: Font,
        color: Color,
    },
    DrawImage {
        rect: Rect,
        image: Image,
    },
}

/// Scene-level inputs shared by every item of one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub lod: f32,
    pub selected: bool,
    pub style: &'a NetworkStyle,
    pub pie_colors: &'a [Color],
    pub pie_visible: bool,
    pub pixmap_visible: bool,
    pub config: &'a RenderConfig,
}

impl<'a> RenderContext<'a> {
    pub fn with_selected(self, selected: bool) -> Self {
        Self { selected, ..self }
    }
}

/// Scale factor of a view transform, as used for level-of-detail decisions.
pub fn level_of_detail(transform: &Transform) -> f32 {
    transform.determinant().abs().sqrt()
}

pub fn node_render_plan(node: &Node, ctx: &RenderContext<'_>) -> Vec<DrawCommand> {
    if !node.is_visible() || !node.flags().has_contents {
        return Vec::new();
    }

    let (fill, pen, text_color) = if ctx.selected {
        let pen = *ctx.style.node_pen(true);
        match ctx.style.node_fill(true) {
            Some(fill) => (
                fill,
                pen,
                ctx.style.node_text_color(true).unwrap_or(node.text_color()),
            ),
            None => (node.fill(), pen, node.text_color()),
        }
    } else {
        (node.fill(), *node.pen(), node.text_color())
    };

    let outline = &node.shape().outline;
    if ctx.lod < ctx.config.lod_simplified {
        return vec![DrawCommand::FillRect {
            rect: outline.rect(),
            color: fill,
        }];
    }

    let stroke = (pen.style != PenStyle::None).then_some(pen);
    let mut plan = vec![fill_outline(outline, fill, stroke)];

    if let Some(overlay) = node.overlay_brush() {
        plan.push(fill_outline(outline, overlay, None));
    }

    if ctx.pie_visible && !node.pie().is_empty() {
        let clip = outline.scaled(ctx.config.pie_inset);
        let reach = max_reach(&clip);
        let pie_rect = centered_rect(point(0.0, 0.0), reach, reach);
        plan.push(DrawCommand::PushClip(match clip {
            Outline::Ellipse { radius } => {
                ClipShape::Ellipse(centered_rect(point(0.0, 0.0), radius, radius))
            }
            Outline::Polygon(points) => ClipShape::Polygon(points),
        }));
        for (i, (start_deg, span_deg)) in node.pie_sectors().into_iter().enumerate() {
            let Some(&color) = ctx.pie_colors.get(i) else {
                continue;
            };
            plan.push(DrawCommand::FillPie {
                rect: pie_rect,
                start_deg,
                span_deg,
                color,
            });
        }
        plan.push(DrawCommand::PopClip);
    }

    if ctx.lod > ctx.config.lod_decorations {
        match node.pixmap().filter(|_| ctx.pixmap_visible) {
            Some(image) => plan.push(DrawCommand::DrawImage {
                rect: node.image_rect(),
                image: image.clone(),
            }),
            None if !node.label().is_empty() => plan.push(DrawCommand::DrawText {
                rect: node.label_rect(),
                text: node.label().clone(),
                font: node.font().clone(),
                color: text_color,
            }),
            None => {}
        }
    }

    plan
}

pub fn edge_render_plan(edge: &Edge, ctx: &RenderContext<'_>) -> Vec<DrawCommand> {
    if ctx.lod < ctx.config.lod_simplified
        || !edge.is_visible()
        || edge.source().is_none()
        || edge.dest().is_none()
        || edge.path().is_empty()
        || edge.is_degenerate()
    {
        return Vec::new();
    }
    let pen = if ctx.selected {
        Pen {
            width: edge.width(),
            ..*ctx.style.edge_pen(true)
        }
    } else {
        edge.pen()
    };
    vec![DrawCommand::StrokePath {
        path: *edge.path(),
        pen,
    }]
}

fn fill_outline(outline: &Outline, color: Color, pen: Option<Pen>) -> DrawCommand {
    match outline {
        Outline::Ellipse { radius } => DrawCommand::FillEllipse {
            rect: centered_rect(point(0.0, 0.0), *radius, *radius),
            color,
            pen,
        },
        Outline::Polygon(points) => DrawCommand::FillPolygon {
            points: points.clone(),
            color,
            pen,
        },
    }
}

/// Distance from the origin to the farthest point of an outline.
fn max_reach(outline: &Outline) -> f32 {
    match outline {
        Outline::Ellipse { radius } => *radius,
        Outline::Polygon(points) => points
            .iter()
            .map(|p| p.to_vector().length())
            .fold(0.0, f32::max),
    }
}
