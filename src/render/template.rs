use std::fmt::Write as _;

use crate::foundation::core::Metric;
use crate::layout::geometry::GraphDescriptor;

/// Colors, sizes and fonts of an activity graph.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GraphStyle {
    pub background: [u8; 3],
    pub label_color: [u8; 3],
    pub value_color: [u8; 3],
    pub axis_color: [u8; 3],
    pub poly_color: [u8; 3],
    pub marker_radius: f64,
    pub poly_stroke_width: f64,
    pub axis_stroke_width: f64,
    /// Font size of captions (subject, period, axis names).
    pub label_font_size: f64,
    /// Font size of the `N%` values.
    pub value_font_size: f64,
    pub font_family: String,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            background: [255, 255, 255],
            label_color: [88, 96, 105],
            value_color: [149, 157, 165],
            axis_color: [108, 178, 103],
            poly_color: [123, 201, 111],
            marker_radius: 6.0,
            poly_stroke_width: 10.0,
            axis_stroke_width: 4.0,
            label_font_size: 24.0,
            value_font_size: 22.0,
            font_family: "DejaVu Sans, Arial, Helvetica, sans-serif".to_string(),
        }
    }
}

/// Emit the SVG document for one graph.
pub fn graph_svg(graph: &GraphDescriptor, style: &GraphStyle) -> String {
    let geo = &graph.geometry;
    let rec = &graph.record;
    let c = &geo.canvas;
    let (w, h) = (c.width, c.height);
    let (mid, f, margin) = (c.center, c.factor, c.axis_margin);

    let mut s = String::with_capacity(4096);
    // Writing into a String cannot fail.
    let _ = writeln!(
        s,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = writeln!(
        s,
        r#"<rect x="0" y="0" width="{w}" height="{h}" fill="{}"/>"#,
        hex(style.background)
    );

    let _ = writeln!(
        s,
        r#"<path d="{}" fill="{poly}" stroke="{poly}" stroke-width="{}" stroke-linejoin="round"/>"#,
        geo.quad_path().to_svg(),
        style.poly_stroke_width,
        poly = hex(style.poly_color),
    );

    let axis = hex(style.axis_color);
    let _ = writeln!(
        s,
        r#"<g stroke="{axis}" stroke-width="{}" stroke-linecap="round"><line x1="{margin:.2}" y1="{mid:.2}" x2="{:.2}" y2="{mid:.2}"/><line x1="{mid:.2}" y1="{margin:.2}" x2="{mid:.2}" y2="{:.2}"/></g>"#,
        style.axis_stroke_width,
        w - margin,
        w - margin,
    );

    let r = style.marker_radius;
    for metric in Metric::ALL {
        if rec.metric(metric) == 0 {
            continue;
        }
        let p = geo.vertex(metric);
        let _ = writeln!(
            s,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{r}" fill="{}" stroke="{axis}" stroke-width="{}"/>"#,
            p.x,
            p.y,
            hex(style.background),
            r / 2.0,
        );
    }

    let label = TextStyle {
        size: style.label_font_size,
        color: style.label_color,
        family: &style.font_family,
    };
    let value = TextStyle {
        size: style.value_font_size,
        color: style.value_color,
        family: &style.font_family,
    };

    text(&mut s, &label, mid, h - 1.25 * f, rec.subject.as_str());
    text(&mut s, &label, mid, h - 0.75 * f, rec.period.as_str());

    for metric in Metric::ALL {
        let (caption_at, value_at) = match metric {
            Metric::CodeReviews => ((mid, 1.5 * f), (mid, f)),
            Metric::Issues => ((w - 1.25 * f, mid + 0.25 * f), (w - 1.25 * f, mid - 0.25 * f)),
            Metric::PullRequests => ((mid, w - 1.25 * f), (mid, w - 1.75 * f)),
            Metric::Commits => ((1.25 * f, mid + 0.25 * f), (1.25 * f, mid - 0.25 * f)),
        };
        text(&mut s, &label, caption_at.0, caption_at.1, metric.caption());
        text(
            &mut s,
            &value,
            value_at.0,
            value_at.1,
            &format!("{}%", rec.metric(metric)),
        );
    }

    s.push_str("</svg>\n");
    s
}

struct TextStyle<'a> {
    size: f64,
    color: [u8; 3],
    family: &'a str,
}

fn text(s: &mut String, style: &TextStyle<'_>, x: f64, y: f64, content: &str) {
    let _ = writeln!(
        s,
        r#"<text x="{x:.2}" y="{y:.2}" font-family="{}" font-size="{}" fill="{}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
        escape_xml(style.family),
        style.size,
        hex(style.color),
        escape_xml(content),
    );
}

fn hex([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/template.rs"]
mod tests;
