//! Vector surface producing SVG or single-page PDF documents.
//!
//! Drawing calls are collected as device-space elements; [`VectorSurface::finish`]
//! serializes them. Both formats use a y-down page whose size equals the
//! canvas size in pixels (PDF points).
//!
//! PDF output is a single page. Text uses the standard Helvetica font and
//! alpha is ignored.

use std::fmt::{self, Write as _};

use glam::DVec2;

use super::{DevicePath, PathSegment, StrokeStyle, Surface, SurfaceKind, TextStyle, TransformStack};
use crate::color::Color;
use crate::instruction::TextAlign;
use crate::RenderError;

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorFormat {
    Svg,
    Pdf,
}

#[derive(Debug, Clone, PartialEq)]
enum VectorElement {
    Paint(Color),
    Fill { path: DevicePath, color: Color },
    Stroke { path: DevicePath, style: StrokeStyle },
    Text { text: String, position: DVec2, style: TextStyle },
}

/// Collects drawing calls for a vector document.
#[derive(Debug, Clone)]
pub struct VectorSurface {
    format: VectorFormat,
    width: u32,
    height: u32,
    transform: TransformStack,
    elements: Vec<VectorElement>,
}

impl VectorSurface {
    pub fn new(format: VectorFormat, width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::SurfaceCreation { width, height });
        }
        Ok(Self {
            format,
            width,
            height,
            transform: TransformStack::default(),
            elements: Vec::new(),
        })
    }

    pub fn format(&self) -> VectorFormat {
        self.format
    }

    /// Number of drawing calls collected so far.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Serialize the collected elements as a complete document.
    pub fn finish(&self) -> Result<Vec<u8>, RenderError> {
        let encoded = match self.format {
            VectorFormat::Svg => self.to_svg().map(String::into_bytes),
            VectorFormat::Pdf => self.to_pdf(),
        };
        encoded.map_err(|e| RenderError::ImageEncoding(e.to_string()))
    }

    // -- SVG ------------------------------------------------------------------

    fn to_svg(&self) -> Result<String, fmt::Error> {
        let mut svg = String::new();
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        )?;
        for element in &self.elements {
            match element {
                VectorElement::Paint(color) => writeln!(
                    svg,
                    r#"  <rect x="0" y="0" width="{}" height="{}" {}/>"#,
                    self.width,
                    self.height,
                    svg_paint("fill", *color)
                )?,
                VectorElement::Fill { path, color } => writeln!(
                    svg,
                    r#"  <path d="{}" {} stroke="none"/>"#,
                    svg_path_data(path)?,
                    svg_paint("fill", *color)
                )?,
                VectorElement::Stroke { path, style } => {
                    let dash = match style.dash {
                        Some((on, off)) => format!(r#" stroke-dasharray="{on:.2} {off:.2}""#),
                        None => String::new(),
                    };
                    writeln!(
                        svg,
                        r#"  <path d="{}" fill="none" {} stroke-width="{:.2}"{}/>"#,
                        svg_path_data(path)?,
                        svg_paint("stroke", style.color),
                        style.width,
                        dash
                    )?;
                }
                VectorElement::Text { text, position, style } => {
                    let anchor = match style.align {
                        TextAlign::Left => "start",
                        TextAlign::Center => "middle",
                        TextAlign::Right => "end",
                    };
                    writeln!(
                        svg,
                        r#"  <text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{:.2}" text-anchor="{}" {}>{}</text>"#,
                        position.x,
                        position.y,
                        style.size,
                        anchor,
                        svg_paint("fill", style.color),
                        escape_xml(text)
                    )?;
                }
            }
        }
        writeln!(svg, "</svg>")?;
        Ok(svg)
    }

    // -- PDF ------------------------------------------------------------------

    fn content_stream(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        // Flip to a y-down page so device coordinates can be used directly.
        writeln!(out, "1 0 0 -1 0 {} cm", self.height)?;
        for element in &self.elements {
            writeln!(out, "q")?;
            match element {
                VectorElement::Paint(color) => {
                    writeln!(out, "{} rg", pdf_rgb(*color))?;
                    writeln!(out, "0 0 {} {} re f", self.width, self.height)?;
                }
                VectorElement::Fill { path, color } => {
                    writeln!(out, "{} rg", pdf_rgb(*color))?;
                    write_pdf_path(&mut out, path)?;
                    writeln!(out, "f")?;
                }
                VectorElement::Stroke { path, style } => {
                    writeln!(out, "{} RG", pdf_rgb(style.color))?;
                    writeln!(out, "{:.3} w", style.width)?;
                    if let Some((on, off)) = style.dash {
                        writeln!(out, "[{on:.3} {off:.3}] 0 d")?;
                    }
                    write_pdf_path(&mut out, path)?;
                    writeln!(out, "S")?;
                }
                VectorElement::Text { text, position, style } => {
                    // Helvetica averages roughly half an em per glyph.
                    let approx_width = 0.5 * style.size * text.chars().count() as f64;
                    let x = position.x
                        - match style.align {
                            TextAlign::Left => 0.0,
                            TextAlign::Center => approx_width / 2.0,
                            TextAlign::Right => approx_width,
                        };
                    writeln!(out, "{} rg", pdf_rgb(style.color))?;
                    writeln!(
                        out,
                        "BT /F1 {:.2} Tf 1 0 0 -1 {:.3} {:.3} Tm ({}) Tj ET",
                        style.size,
                        x,
                        position.y,
                        escape_pdf_string(text)
                    )?;
                }
            }
            writeln!(out, "Q")?;
        }
        Ok(out)
    }

    fn to_pdf(&self) -> Result<Vec<u8>, fmt::Error> {
        let content = self.content_stream()?;
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Contents 4 0 R \
                 /Resources << /Font << /F1 5 0 R >> >> >>",
                self.width, self.height
            ),
            format!("<< /Length {} >>\nstream\n{}endstream", content.len(), content),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            writeln!(pdf, "{} 0 obj\n{}\nendobj", i + 1, body)?;
        }
        let xref_offset = pdf.len();
        writeln!(pdf, "xref\n0 {}", objects.len() + 1)?;
        pdf.push_str("0000000000 65535 f \n");
        for offset in offsets {
            write!(pdf, "{offset:010} 00000 n \n")?;
        }
        writeln!(
            pdf,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF",
            objects.len() + 1,
            xref_offset
        )?;
        Ok(pdf.into_bytes())
    }
}

impl Surface for VectorSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn kind(&self) -> SurfaceKind {
        match self.format {
            VectorFormat::Svg => SurfaceKind::Svg,
            VectorFormat::Pdf => SurfaceKind::Pdf,
        }
    }

    fn transform(&self) -> &TransformStack {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut TransformStack {
        &mut self.transform
    }

    fn paint(&mut self, color: Color) {
        self.elements.push(VectorElement::Paint(color));
    }

    fn fill_path(&mut self, path: &DevicePath, color: Color) {
        if !path.is_empty() {
            self.elements.push(VectorElement::Fill {
                path: path.clone(),
                color,
            });
        }
    }

    fn stroke_path(&mut self, path: &DevicePath, style: &StrokeStyle) {
        if !path.is_empty() {
            self.elements.push(VectorElement::Stroke {
                path: path.clone(),
                style: *style,
            });
        }
    }

    fn fill_text(&mut self, text: &str, position: DVec2, style: &TextStyle) {
        self.elements.push(VectorElement::Text {
            text: text.to_string(),
            position,
            style: *style,
        });
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn svg_paint(attr: &str, color: Color) -> String {
    let color = color.normalized();
    if color.a < 1.0 {
        format!(r#"{attr}="{}" {attr}-opacity="{:.3}""#, color.to_hex_rgb(), color.a)
    } else {
        format!(r#"{attr}="{}""#, color.to_hex_rgb())
    }
}

fn svg_path_data(path: &DevicePath) -> Result<String, fmt::Error> {
    let mut d = String::new();
    for segment in &path.segments {
        match segment {
            PathSegment::MoveTo(p) => write!(d, "M{:.2},{:.2}", p.x, p.y)?,
            PathSegment::LineTo(p) => write!(d, "L{:.2},{:.2}", p.x, p.y)?,
            PathSegment::CubicTo(a, b, c) => {
                write!(d, "C{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}", a.x, a.y, b.x, b.y, c.x, c.y)?
            }
            PathSegment::Close => d.push('Z'),
        }
    }
    Ok(d)
}

fn write_pdf_path(out: &mut String, path: &DevicePath) -> fmt::Result {
    for segment in &path.segments {
        match segment {
            PathSegment::MoveTo(p) => writeln!(out, "{:.3} {:.3} m", p.x, p.y)?,
            PathSegment::LineTo(p) => writeln!(out, "{:.3} {:.3} l", p.x, p.y)?,
            PathSegment::CubicTo(a, b, c) => writeln!(
                out,
                "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c",
                a.x, a.y, b.x, b.y, c.x, c.y
            )?,
            PathSegment::Close => writeln!(out, "h")?,
        }
    }
    Ok(())
}

fn pdf_rgb(color: Color) -> String {
    let c = color.normalized();
    format!("{:.4} {:.4} {:.4}", c.r, c.g, c.b)
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a PDF literal string. Helvetica only covers ASCII here, so any
/// other character becomes `?`.
fn escape_pdf_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}
