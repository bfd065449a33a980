//! Paint attributes per item state and import of stylesheet records.
//!
//! A [`NetworkStyle`] is a plain value owned by the scene; there is no shared
//! mutable default. [`default_style`] builds the stock look and
//! [`NetworkStyle::from_sheet`] builds one from an already-parsed stylesheet.

use serde::{Deserialize, Serialize};
use slint::Color;

use crate::error::StyleError;
use crate::text::Font;

pub const LIGHT_GRAY: Color = Color::from_argb_u8(255, 192, 192, 192);
pub const DARK_GRAY: Color = Color::from_argb_u8(255, 128, 128, 128);
pub const BLACK: Color = Color::from_argb_u8(255, 0, 0, 0);
pub const WHITE: Color = Color::from_argb_u8(255, 255, 255, 255);
pub const RED: Color = Color::from_argb_u8(255, 255, 0, 0);
pub const YELLOW: Color = Color::from_argb_u8(255, 255, 255, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PenStyle {
    #[default]
    Solid,
    Dash,
    Dot,
    /// Nothing is stroked.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub width: f32,
    pub style: PenStyle,
}

impl Pen {
    pub const fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: PenStyle::Solid,
        }
    }

    pub const fn with_style(mut self, style: PenStyle) -> Self {
        self.style = style;
        self
    }

    /// Width that actually contributes to item bounds.
    pub fn effective_width(&self) -> f32 {
        if self.style == PenStyle::None {
            0.0
        } else {
            self.width
        }
    }
}

impl Default for Pen {
    fn default() -> Self {
        Pen::new(BLACK, 1.0)
    }
}

/// Normal and selected paint attributes for nodes, edges and the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkStyle {
    name: String,
    node_fill: Color,
    node_fill_selected: Option<Color>,
    node_text: Color,
    node_text_selected: Option<Color>,
    node_pen: Pen,
    node_pen_selected: Pen,
    node_font: Font,
    node_font_selected: Font,
    edge_pen: Pen,
    edge_pen_selected: Pen,
    background: Color,
}

impl NetworkStyle {
    /// Bare style: no selected fill or text color, so selected nodes keep
    /// their own.
    pub fn base() -> Self {
        Self {
            name: String::new(),
            node_fill: LIGHT_GRAY,
            node_fill_selected: None,
            node_text: BLACK,
            node_text_selected: None,
            node_pen: Pen::new(BLACK, 1.0),
            node_pen_selected: Pen::new(BLACK, 1.0),
            node_font: Font::default(),
            node_font_selected: Font::default(),
            edge_pen: Pen::new(DARK_GRAY, 1.0),
            edge_pen_selected: Pen::new(RED, 1.0),
            background: WHITE,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Node fill. The selected variant may be unset.
    pub fn node_fill(&self, selected: bool) -> Option<Color> {
        if selected {
            self.node_fill_selected
        } else {
            Some(self.node_fill)
        }
    }

    /// Set a node fill. `None` only clears the selected variant; the normal
    /// fill always has a value.
    pub fn set_node_fill(&mut self, selected: bool, color: Option<Color>) {
        if selected {
            self.node_fill_selected = color;
        } else if let Some(color) = color {
            self.node_fill = color;
        }
    }

    pub fn node_text_color(&self, selected: bool) -> Option<Color> {
        if selected {
            self.node_text_selected
        } else {
            Some(self.node_text)
        }
    }

    pub fn set_node_text_color(&mut self, selected: bool, color: Option<Color>) {
        if selected {
            self.node_text_selected = color;
        } else if let Some(color) = color {
            self.node_text = color;
        }
    }

    pub fn node_pen(&self, selected: bool) -> &Pen {
        if selected {
            &self.node_pen_selected
        } else {
            &self.node_pen
        }
    }

    pub fn set_node_pen(&mut self, selected: bool, pen: Pen) {
        if selected {
            self.node_pen_selected = pen;
        } else {
            self.node_pen = pen;
        }
    }

    pub fn node_font(&self, selected: bool) -> &Font {
        if selected {
            &self.node_font_selected
        } else {
            &self.node_font
        }
    }

    pub fn set_node_font(&mut self, selected: bool, font: Font) {
        if selected {
            self.node_font_selected = font;
        } else {
            self.node_font = font;
        }
    }

    pub fn edge_pen(&self, selected: bool) -> &Pen {
        if selected {
            &self.edge_pen_selected
        } else {
            &self.edge_pen
        }
    }

    pub fn set_edge_pen(&mut self, selected: bool, pen: Pen) {
        if selected {
            self.edge_pen_selected = pen;
        } else {
            self.edge_pen = pen;
        }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Build a style from a stylesheet record.
    ///
    /// Unset entries keep the values of [`NetworkStyle::base`].
    pub fn from_sheet(sheet: &StyleSheet) -> Result<Self, StyleError> {
        let mut style = Self::base();
        style.node_font = Font::new("Arial", 10.0 * PT_TO_PX);
        style.node_font_selected = style.node_font.clone();
        if let Some(name) = &sheet.name {
            style.name = name.clone();
        }

        for (selected, value) in sheet.node.background_color.entries() {
            style.set_node_fill(selected, Some(parse_color(value)?));
        }
        for (selected, value) in sheet.node.color.entries() {
            style.set_node_text_color(selected, Some(parse_color(value)?));
        }
        for (selected, rule) in sheet.node.border.entries() {
            let pen = rule.apply(*style.node_pen(selected))?;
            style.set_node_pen(selected, pen);
        }
        for (selected, rule) in sheet.node.font.entries() {
            let font = rule.apply(style.node_font(selected).clone())?;
            style.set_node_font(selected, font);
        }
        for (selected, value) in sheet.edge.color.entries() {
            let mut pen = *style.edge_pen(selected);
            pen.color = parse_color(value)?;
            style.set_edge_pen(selected, pen);
        }
        for (selected, value) in sheet.edge.style.entries() {
            let mut pen = *style.edge_pen(selected);
            pen.style = parse_border_style(value)?;
            style.set_edge_pen(selected, pen);
        }
        if let Some(value) = &sheet.scene.background_color {
            style.background = parse_color(value)?;
        }
        Ok(style)
    }
}

impl Default for NetworkStyle {
    fn default() -> Self {
        default_style()
    }
}

/// The stock style: light gray nodes turning yellow when selected, dark gray
/// edges turning red.
pub fn default_style() -> NetworkStyle {
    let font = Font::new("Arial", 10.0 * PT_TO_PX);
    NetworkStyle {
        name: "default".to_string(),
        node_fill_selected: Some(YELLOW),
        node_text_selected: Some(BLACK),
        node_font: font.clone(),
        node_font_selected: font,
        ..NetworkStyle::base()
    }
}

const PT_TO_PX: f32 = 4.0 / 3.0;

// ============================================================================
// Stylesheet record
// ============================================================================

/// A value given for the normal and/or the selected state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateValues<T> {
    pub normal: Option<T>,
    pub selected: Option<T>,
}

impl<T> Default for StateValues<T> {
    fn default() -> Self {
        Self {
            normal: None,
            selected: None,
        }
    }
}

impl<T> StateValues<T> {
    /// Set entries as `(selected, value)` pairs, normal first.
    fn entries(&self) -> impl Iterator<Item = (bool, &T)> {
        self.normal
            .iter()
            .map(|v| (false, v))
            .chain(self.selected.iter().map(|v| (true, v)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BorderRule {
    pub width: Option<f32>,
    pub style: Option<String>,
    pub color: Option<String>,
}

impl BorderRule {
    fn apply(&self, mut pen: Pen) -> Result<Pen, StyleError> {
        if let Some(width) = self.width {
            pen.width = width.max(0.0);
        }
        if let Some(style) = &self.style {
            pen.style = parse_border_style(style)?;
        }
        if let Some(color) = &self.color {
            pen.color = parse_color(color)?;
        }
        Ok(pen)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FontRule {
    pub family: Option<String>,
    pub size: Option<f32>,
    /// `pt` (default) or `px`.
    pub unit: Option<String>,
    pub weight: Option<String>,
    /// `normal`, `italic` or `oblique`.
    pub style: Option<String>,
    /// `normal` or `small-caps`.
    pub variant: Option<String>,
}

impl FontRule {
    fn apply(&self, mut font: Font) -> Result<Font, StyleError> {
        if let Some(family) = &self.family {
            font.family = family.clone();
        }
        if let Some(size) = self.size.filter(|s| *s > 0.0) {
            font.pixel_size = match self.unit.as_deref() {
                Some("px") => size,
                _ => size * PT_TO_PX,
            };
        }
        if let Some(weight) = &self.weight {
            font.weight = parse_font_weight(weight)?;
        }
        if let Some(style) = &self.style {
            font.italic = matches!(style.as_str(), "italic" | "oblique");
        }
        if let Some(variant) = &self.variant {
            font.small_caps = variant == "small-caps";
        }
        Ok(font)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NodeRules {
    pub background_color: StateValues<String>,
    pub color: StateValues<String>,
    pub border: StateValues<BorderRule>,
    pub font: StateValues<FontRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EdgeRules {
    pub color: StateValues<String>,
    pub style: StateValues<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SceneRules {
    pub background_color: Option<String>,
}

/// Already-parsed stylesheet, keyed like the CSS it came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSheet {
    pub name: Option<String>,
    pub node: NodeRules,
    pub edge: EdgeRules,
    pub scene: SceneRules,
}

// ============================================================================
// Value parsing
// ============================================================================

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", BLACK),
    ("white", WHITE),
    ("red", RED),
    ("yellow", YELLOW),
    ("green", Color::from_argb_u8(255, 0, 128, 0)),
    ("lime", Color::from_argb_u8(255, 0, 255, 0)),
    ("blue", Color::from_argb_u8(255, 0, 0, 255)),
    ("cyan", Color::from_argb_u8(255, 0, 255, 255)),
    ("magenta", Color::from_argb_u8(255, 255, 0, 255)),
    ("orange", Color::from_argb_u8(255, 255, 165, 0)),
    ("purple", Color::from_argb_u8(255, 128, 0, 128)),
    ("gray", Color::from_argb_u8(255, 160, 160, 164)),
    ("grey", Color::from_argb_u8(255, 160, 160, 164)),
    ("lightgray", LIGHT_GRAY),
    ("lightgrey", LIGHT_GRAY),
    ("darkgray", DARK_GRAY),
    ("darkgrey", DARK_GRAY),
    ("darkgreen", Color::from_argb_u8(255, 0, 100, 0)),
    ("darkblue", Color::from_argb_u8(255, 0, 0, 139)),
    ("darkred", Color::from_argb_u8(255, 139, 0, 0)),
    ("transparent", Color::from_argb_u8(0, 0, 0, 0)),
];

/// Parse `#rgb`, `#rrggbb`, `#aarrggbb`, `rgb(r, g, b)`, `rgba(r, g, b, a)`
/// or a color name.
pub fn parse_color(value: &str) -> Result<Color, StyleError> {
    let v = value.trim().to_ascii_lowercase();
    let invalid = || StyleError::InvalidColor(value.to_string());

    if let Some(hex) = v.strip_prefix('#') {
        let digits = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        return match hex.len() {
            3 => {
                let expand = |i: usize| digits(&hex[i..i + 1].repeat(2));
                Ok(Color::from_rgb_u8(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Color::from_rgb_u8(
                digits(&hex[0..2])?,
                digits(&hex[2..4])?,
                digits(&hex[4..6])?,
            )),
            8 => Ok(Color::from_argb_u8(
                digits(&hex[0..2])?,
                digits(&hex[2..4])?,
                digits(&hex[4..6])?,
                digits(&hex[6..8])?,
            )),
            _ => Err(invalid()),
        };
    }

    if let Some(args) = v
        .strip_prefix("rgba(")
        .or_else(|| v.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        let channel = |s: &str| s.parse::<u8>().map_err(|_| invalid());
        return match parts.as_slice() {
            [r, g, b] => Ok(Color::from_rgb_u8(channel(r)?, channel(g)?, channel(b)?)),
            [r, g, b, a] => {
                let alpha = a.parse::<f32>().map_err(|_| invalid())?.clamp(0.0, 1.0);
                Ok(Color::from_argb_u8(
                    (alpha * 255.0).round() as u8,
                    channel(r)?,
                    channel(g)?,
                    channel(b)?,
                ))
            }
            _ => Err(invalid()),
        };
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == v)
        .map(|(_, c)| *c)
        .ok_or_else(invalid)
}

/// CSS font weight: keywords or a number rounded to the nearest hundred.
pub fn parse_font_weight(value: &str) -> Result<u16, StyleError> {
    match value.trim() {
        "normal" => Ok(400),
        "bold" => Ok(700),
        "bolder" => Ok(800),
        "lighter" => Ok(300),
        other => {
            let n: f32 = other
                .parse()
                .map_err(|_| StyleError::InvalidFontWeight(value.to_string()))?;
            let rounded = ((n / 100.0).round() * 100.0).clamp(100.0, 900.0);
            Ok(rounded as u16)
        }
    }
}

pub fn parse_border_style(value: &str) -> Result<PenStyle, StyleError> {
    match value.trim() {
        "solid" => Ok(PenStyle::Solid),
        "dashed" => Ok(PenStyle::Dash),
        "dotted" => Ok(PenStyle::Dot),
        "none" => Ok(PenStyle::None),
        _ => Err(StyleError::InvalidBorderStyle(value.to_string())),
    }
}
