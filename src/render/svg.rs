use std::fmt::Write as _;

use crate::{
    diagram::model::{EdgeStyle, NodeKey, NodeKind},
    projection::{EdgeStatus, NodeStatus, Projection},
};

/// Canvas options for [`render_svg`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SvgOpts {
    /// Canvas width in px.
    pub width: u32,
    /// Canvas height in px.
    pub height: u32,
}

impl Default for SvgOpts {
    fn default() -> Self {
        Self {
            width: 800,
            height: 460,
        }
    }
}

const BACKGROUND: &str = "#0f172a";
const CAPTION: &str = "#22d3ee";

fn node_color(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::Completed => "#34d399",
        NodeStatus::Active => "#22d3ee",
        NodeStatus::Processing => "#38bdf8",
        NodeStatus::Idle => "#64748b",
    }
}

fn edge_stroke(status: EdgeStatus) -> (&'static str, f64) {
    match status {
        EdgeStatus::Completed => ("#10b981", 2.5),
        EdgeStatus::Active => ("#14b8a6", 3.0),
        EdgeStatus::Idle => ("#475569", 1.5),
    }
}

fn node_radius(kind: NodeKind) -> f64 {
    match kind {
        NodeKind::Agent => 28.0,
        NodeKind::Primary => 22.0,
        NodeKind::Service => 18.0,
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Draw one projection frame as a standalone SVG document.
///
/// Node positions are percentages of the canvas. Edges whose endpoints do not resolve are
/// absent from the projection and therefore not drawn.
pub fn render_svg<I: NodeKey>(projection: &Projection<'_, I>, opts: SvgOpts) -> String {
    let w = f64::from(opts.width);
    let h = f64::from(opts.height);
    let sx = w / 100.0;
    let sy = h / 100.0;

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        opts.width, opts.height, opts.width, opts.height
    );
    let _ = writeln!(
        out,
        r#"  <rect x="0" y="0" width="{w}" height="{h}" fill="{BACKGROUND}"/>"#
    );

    for edge in projection.edges() {
        let (stroke, width) = edge_stroke(edge.status);
        let opacity = if edge.status == EdgeStatus::Idle { 0.4 } else { 1.0 };
        let dash = match edge.edge.style {
            EdgeStyle::Dashed => r#" stroke-dasharray="6 4""#,
            EdgeStyle::Solid => "",
        };
        let _ = writeln!(
            out,
            r#"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{stroke}" stroke-width="{width}" stroke-opacity="{opacity}"{dash}/>"#,
            edge.from.x * sx,
            edge.from.y * sy,
            edge.to.x * sx,
            edge.to.y * sy,
        );
    }

    for view in projection.nodes() {
        let color = node_color(view.status);
        let r = node_radius(view.node.kind);
        let cx = view.position.x * sx;
        let cy = view.position.y * sy;
        let fill_opacity = match view.status {
            NodeStatus::Idle => 0.15,
            _ => 0.35,
        };
        let _ = writeln!(
            out,
            r#"  <circle cx="{cx:.1}" cy="{cy:.1}" r="{r}" fill="{color}" fill-opacity="{fill_opacity}" stroke="{color}" stroke-width="2"/>"#
        );
        let _ = writeln!(
            out,
            r#"  <text x="{cx:.1}" y="{:.1}" fill="{color}" font-family="sans-serif" font-size="13" text-anchor="middle">{}</text>"#,
            cy + r + 16.0,
            escape(&view.node.label)
        );
        if let Some(sublabel) = &view.node.sublabel {
            let _ = writeln!(
                out,
                r##"  <text x="{cx:.1}" y="{:.1}" fill="#94a3b8" font-family="sans-serif" font-size="10" text-anchor="middle">{}</text>"##,
                cy + r + 30.0,
                escape(sublabel)
            );
        }
    }

    let label = projection.stage_label();
    if !label.is_empty() {
        let _ = writeln!(
            out,
            r#"  <text x="{:.1}" y="24" fill="{CAPTION}" font-family="sans-serif" font-size="15" text-anchor="middle">{}</text>"#,
            w / 2.0,
            escape(label)
        );
    }

    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
