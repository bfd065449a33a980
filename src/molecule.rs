//! Contract with the chemical-structure depiction collaborator.
//!
//! Rendering molecules is left to the host. This module only classifies the
//! descriptor text and decodes base64 payloads.

use base64::Engine as _;
use slint::Image;

use crate::error::DescriptorError;

/// How the text of a pixmap column should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixmapFormat {
    #[default]
    Smiles,
    Inchi,
    Base64,
    Svg,
    /// Sniff the format from a prefix; unrecognized text is SMILES.
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoleculeDescriptor {
    Smiles(String),
    Inchi(String),
    Svg(Vec<u8>),
    /// Already-encoded image bytes (PNG, JPEG, ...).
    Encoded(Vec<u8>),
}

const BASE64_PREFIX: &str = "b64=";

impl MoleculeDescriptor {
    pub fn classify(text: &str, format: PixmapFormat) -> Result<Self, DescriptorError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DescriptorError::Empty);
        }

        let is_svg = text.starts_with("<?xml") || text.starts_with("<svg");
        let descriptor = match format {
            PixmapFormat::Base64 => Self::Encoded(decode(
                text.strip_prefix(BASE64_PREFIX).unwrap_or(text),
            )?),
            PixmapFormat::Auto if text.starts_with(BASE64_PREFIX) => {
                Self::Encoded(decode(&text[BASE64_PREFIX.len()..])?)
            }
            PixmapFormat::Svg => Self::Svg(text.as_bytes().to_vec()),
            PixmapFormat::Auto if is_svg => Self::Svg(text.as_bytes().to_vec()),
            PixmapFormat::Inchi => Self::Inchi(text.to_string()),
            PixmapFormat::Auto if text.starts_with("InChI=") => Self::Inchi(text.to_string()),
            PixmapFormat::Smiles | PixmapFormat::Auto => Self::Smiles(text.to_string()),
        };
        Ok(descriptor)
    }
}

fn decode(payload: &str) -> Result<Vec<u8>, DescriptorError> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload)?;
    if bytes.is_empty() {
        return Err(DescriptorError::Empty);
    }
    Ok(bytes)
}

/// Turns a descriptor into an image of `size` pixels square.
///
/// Implementations return `None` on any failure, including a zero size.
pub trait MoleculeRenderer {
    fn render(&self, descriptor: &MoleculeDescriptor, size: u32) -> Option<Image>;
}

/// Renders nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl MoleculeRenderer for NullRenderer {
    fn render(&self, _descriptor: &MoleculeDescriptor, _size: u32) -> Option<Image> {
        None
    }
}

impl<F> MoleculeRenderer for F
where
    F: Fn(&MoleculeDescriptor, u32) -> Option<Image>,
{
    fn render(&self, descriptor: &MoleculeDescriptor, size: u32) -> Option<Image> {
        self(descriptor, size)
    }
}
