//! SVG generation from a scene

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::graph::{FamilyGraph, Relation};
use crate::layout::{BoundingBox, NodeMetrics, Point};
use crate::parser::ast::{display_name, union_members, Document};

use super::config::SvgConfig;
use super::resources::ResourceTracker;
use super::scene::{Placement, Scene};

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    styles: Vec<String>,
    elements: Vec<String>,
    connections: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            styles: vec![],
            elements: vec![],
            connections: vec![],
            indent: 1,
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Add the default stylesheet: box chrome plus one stroke color per
    /// relationship class.
    pub fn add_default_styles(&mut self) {
        let p = self.prefix();
        self.styles.push(format!(
            "\
.{p}box {{ fill: #ffffff; stroke: #333333; stroke-width: 1.5; rx: 6; }}
.{p}name {{ font-family: sans-serif; font-size: 13px; text-anchor: middle; }}
.{p}lifespan {{ font-family: sans-serif; font-size: 11px; fill: #666666; text-anchor: middle; }}
.{p}line {{ stroke-width: 2; }}
.{p}line.{p}root {{ stroke: #b8860b; }}
.{p}line.{p}ancestor {{ stroke: #c0392b; }}
.{p}line.{p}descendant {{ stroke: #2980b9; }}
.{p}line.{p}blood {{ stroke: #27ae60; }}
.{p}line.{p}other {{ stroke: #95a5a6; }}
.{p}person.{p}root .{p}box {{ stroke: #b8860b; stroke-width: 3; }}"
        ));
    }

    /// Add a classified connection line
    pub fn add_connection_line(&mut self, from: Point, to: Point, relation: Relation) {
        let p = self.prefix();
        self.connections.push(format!(
            r#"{}<line class="{p}line {p}{}" x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
            self.indent_str(),
            relation.css_class(),
            from.x,
            from.y,
            to.x,
            to.y
        ));
    }

    /// Open a translated group element
    pub fn start_group(&mut self, classes: &[String], x: f64, y: f64) {
        let class_attr = if classes.is_empty() {
            String::new()
        } else {
            format!(r#" class="{}""#, classes.join(" "))
        };
        self.elements.push(format!(
            r#"{}<g{} transform="translate({} {})">"#,
            self.indent_str(),
            class_attr,
            x,
            y
        ));
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Add a tooltip to the current group
    pub fn add_title(&mut self, text: &str) {
        self.elements.push(format!(
            "{}<title>{}</title>",
            self.indent_str(),
            escape_xml(text)
        ));
    }

    /// Add a rectangle element
    pub fn add_rect(&mut self, x: f64, y: f64, w: f64, h: f64, classes: &[String]) {
        self.elements.push(format!(
            r#"{}<rect class="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
            self.indent_str(),
            classes.join(" "),
            x,
            y,
            w,
            h
        ));
    }

    /// Add a multi-line text element, one tspan per line
    pub fn add_text_lines(&mut self, lines: &[&str], x: f64, y: f64, classes: &[String]) {
        let mut text = format!(
            r#"{}<text class="{}" x="{}" y="{}">"#,
            self.indent_str(),
            classes.join(" "),
            x,
            y
        );
        for (i, line) in lines.iter().enumerate() {
            let dy = if i == 0 { "0" } else { "1.15em" };
            text.push_str(&format!(
                r#"<tspan x="{}" dy="{}">{}</tspan>"#,
                x,
                dy,
                escape_xml(line)
            ));
        }
        text.push_str("</text>");
        self.elements.push(text);
    }

    /// Add an embedded image as a data URI
    pub fn add_image(&mut self, data_uri: &str, x: f64, y: f64, width: f64) {
        self.elements.push(format!(
            r#"{}<image href="{}" x="{}" y="{}" width="{}"/>"#,
            self.indent_str(),
            data_uri,
            x,
            y,
            width
        ));
    }

    /// Build the final SVG string
    pub fn build(self, viewbox: BoundingBox) -> String {
        let padding = self.config.viewbox_padding;
        let vb_x = viewbox.x - padding;
        let vb_y = viewbox.y - padding;
        let vb_w = viewbox.width + 2.0 * padding;
        let vb_h = viewbox.height + 2.0 * padding;

        let nl = self.newline();
        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
            vb_x, vb_y, vb_w, vb_h
        ));
        svg.push_str(nl);

        if !self.styles.is_empty() {
            svg.push_str("  <style>");
            svg.push_str(nl);
            for style in &self.styles {
                svg.push_str(style);
                svg.push_str(nl);
            }
            svg.push_str("  </style>");
            svg.push_str(nl);
        }

        // Lines first, boxes over them.
        for conn in &self.connections {
            svg.push_str(conn);
            svg.push_str(nl);
        }
        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Render a scene to an SVG string
pub fn render_svg(
    scene: &Scene,
    doc: &Document,
    graph: &FamilyGraph,
    metrics: &dyn NodeMetrics,
    config: &SvgConfig,
) -> String {
    let mut tracker = ResourceTracker::new();
    render_svg_with_tracker(scene, doc, graph, metrics, config, &mut tracker)
}

/// Render a scene to an SVG string, counting photo loads in `tracker`
pub fn render_svg_with_tracker(
    scene: &Scene,
    doc: &Document,
    graph: &FamilyGraph,
    metrics: &dyn NodeMetrics,
    config: &SvgConfig,
    tracker: &mut ResourceTracker,
) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    builder.add_default_styles();

    for connection in &scene.connections {
        builder.add_connection_line(connection.from, connection.to, connection.relation);
    }
    for placement in &scene.placements {
        render_person(&mut builder, placement, doc, graph, metrics, config, tracker);
    }
    tracker.finish_requests();

    builder.build(scene.bounds)
}

fn render_person(
    builder: &mut SvgBuilder,
    placement: &Placement,
    doc: &Document,
    graph: &FamilyGraph,
    metrics: &dyn NodeMetrics,
    config: &SvgConfig,
    tracker: &mut ResourceTracker,
) {
    let name = placement.name.as_str();
    let prefix = builder.prefix();
    let half_width = metrics.half_width(name);
    let half_height = metrics.half_height(name);

    let classes = vec![
        format!("{prefix}person"),
        format!("{prefix}{}", placement.relation.css_class()),
    ];
    builder.start_group(&classes, placement.center.x, placement.center.y);

    let tooltip = tooltip_lines(name, doc, graph).join("\n");
    if !tooltip.is_empty() {
        builder.add_title(&tooltip);
    }

    builder.add_rect(
        -half_width,
        -half_height,
        2.0 * half_width,
        2.0 * half_height,
        &[format!("{prefix}box")],
    );

    let name_lines: Vec<&str> = display_name(name).split_whitespace().collect();
    builder.add_text_lines(
        &name_lines,
        0.0,
        -half_height + 14.0,
        &[format!("{prefix}name")],
    );

    let entry = doc.get(name);
    if let Some(path) = entry.and_then(|e| e.photo()) {
        if let Some(dir) = &config.photo_dir {
            tracker.record_requested();
            match fs::read(dir.join(path)) {
                Ok(bytes) => {
                    let data_uri =
                        format!("data:{};base64,{}", photo_mime(path), BASE64.encode(bytes));
                    builder.add_image(&data_uri, -35.0, -half_height + 18.0, 70.0);
                }
                Err(_) => {
                    // A missing photo falls back to the plain box.
                }
            }
            tracker.record_completed();
        }
    }

    if let Some(text) = entry.and_then(lifespan_text) {
        builder.add_text_lines(
            &[text.as_str()],
            0.0,
            half_height - 8.0,
            &[format!("{prefix}lifespan")],
        );
    }

    builder.end_group();
}

/// Hover text: own notes, then marriage notes as "With <partner>: ...".
fn tooltip_lines(name: &str, doc: &Document, graph: &FamilyGraph) -> Vec<String> {
    let mut lines: Vec<String> = doc
        .get(name)
        .map(|entry| entry.notes().map(str::to_string).collect())
        .unwrap_or_default();

    let mut marriage = |union: Option<&str>, partner_is_left: bool| {
        let Some(union) = union else { return };
        let Some((left, right)) = union_members(union) else {
            return;
        };
        let partner = if partner_is_left { left } else { right };
        let Some(entry) = doc.get(union) else { return };
        let notes: Vec<&str> = entry.notes().collect();
        if notes.is_empty() {
            return;
        }
        lines.push(format!(
            "With {}: {}",
            display_name(partner),
            notes.join(" ")
        ));
    };
    marriage(graph.left_union(name), true);
    marriage(graph.right_union(name), false);
    lines
}

/// "1914–1997", "1914–", "–1997", or nothing.
fn lifespan_text(entry: &crate::parser::Entry) -> Option<String> {
    let (birth, death) = entry.lifespan()?;
    match (birth, death) {
        (None, None) => None,
        (birth, death) => Some(format!(
            "{}\u{2013}{}",
            birth.unwrap_or(""),
            death.unwrap_or("")
        )),
    }
}

fn photo_mime(path: &str) -> &'static str {
    match Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "image/png",
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{validate, visible_set, Filter};
    use crate::layout::{compute, FixedMetrics, LayoutConfig, LayoutContext};
    use crate::parser::parse;
    use crate::renderer::scene::build_scene;

    fn render_family(source: &str, root: &str, config: &SvgConfig) -> String {
        let doc = parse(source).expect("should parse");
        let graph = FamilyGraph::build(&doc);
        validate(&graph).expect("should validate");
        let visible = visible_set(&graph, root, Filter::everyone());
        let layout_config = LayoutConfig::default();
        let metrics = FixedMetrics::default();
        let ctx = LayoutContext::new(&graph, &visible, &metrics, &layout_config);
        let layout = compute(root, &ctx).expect("should lay out");
        let scene = build_scene(&graph, &layout, root, &metrics, layout_config.padding);
        render_svg(&scene, &doc, &graph, &metrics, config)
    }

    const FAMILY: &str = "\
Abe + Mona
 n: met at the fair
 c: Homer
Homer
 l: 1956-
 n: likes donuts
";

    #[test]
    fn test_renders_boxes_and_lines() {
        let svg = render_family(FAMILY, "Homer", &SvgConfig::default());
        assert!(svg.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(svg.contains("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("fam-person"));
        assert!(svg.contains("fam-line"));
        assert!(svg.contains(">Homer<"));
        assert!(svg.contains(">Abe<"));
    }

    #[test]
    fn test_root_class_marks_the_root() {
        let svg = render_family(FAMILY, "Homer", &SvgConfig::default());
        assert!(svg.contains("fam-person fam-root"));
        assert!(svg.contains("fam-person fam-ancestor"));
    }

    #[test]
    fn test_lifespan_uses_en_dash() {
        let svg = render_family(FAMILY, "Homer", &SvgConfig::default());
        assert!(svg.contains("1956\u{2013}"));
    }

    #[test]
    fn test_notes_become_tooltips() {
        let svg = render_family(FAMILY, "Homer", &SvgConfig::default());
        assert!(svg.contains("<title>likes donuts</title>"));
        // Marriage note folded into the partner's tooltip.
        assert!(svg.contains("With Mona: met at the fair"));
    }

    #[test]
    fn test_no_photo_dir_means_no_images() {
        let svg = render_family("A + B\n c: C\nC\n p: c.png\n", "A", &SvgConfig::default());
        assert!(!svg.contains("<image"));
    }

    #[test]
    fn test_photo_is_embedded_as_data_uri() {
        let dir = std::env::temp_dir().join("stemma-svg-test");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("c.png"), b"not really a png").unwrap();
        let config = SvgConfig::default().with_photo_dir(&dir);
        let svg = render_family("A + B\n c: C\nC\n p: c.png\n", "A", &config);
        assert!(svg.contains("data:image/png;base64,"));
    }

    #[test]
    fn test_missing_photo_still_completes_tracker() {
        let doc = parse("A + B\n c: C\nC\n p: nowhere.png\n").unwrap();
        let graph = FamilyGraph::build(&doc);
        validate(&graph).unwrap();
        let visible = visible_set(&graph, "A", Filter::everyone());
        let layout_config = LayoutConfig::default();
        let metrics = FixedMetrics::default();
        let ctx = LayoutContext::new(&graph, &visible, &metrics, &layout_config);
        let layout = compute("A", &ctx).unwrap();
        let scene = build_scene(&graph, &layout, "A", &metrics, layout_config.padding);
        let config = SvgConfig::default().with_photo_dir("/definitely/not/here");
        let mut tracker = ResourceTracker::new();
        render_svg_with_tracker(&scene, &doc, &graph, &metrics, &config, &mut tracker);
        assert_eq!(tracker.requested(), 1);
        assert_eq!(tracker.completed(), 1);
        assert!(tracker.is_settled());
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & c"), "a &lt; b &amp; c");
    }

    #[test]
    fn test_photo_mime_by_extension() {
        assert_eq!(photo_mime("x.jpg"), "image/jpeg");
        assert_eq!(photo_mime("x.PNG"), "image/png");
        assert_eq!(photo_mime("x"), "image/png");
    }
}
