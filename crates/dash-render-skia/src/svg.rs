// File: crates/dash-render-skia/src/svg.rs
// Summary: Standalone SVG rendering of a chart spec, with per-date hover text.
// Notes:
// - Geometry comes from the same `Frame` as the PNG renderer so both outputs line up.
// - Unified hover is approximated with one transparent column per date carrying a
//   `<title>` that lists every trace value on that date.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::NaiveDate;
use dash_core::format::escape;
use dash_core::{ChartSpec, Dash, HoverMode, LegendPlacement, TraceKind};

use crate::layout::{text_width, Frame};
use crate::types::RenderOptions;

const FONT: &str = "Segoe UI, Arial, Helvetica, sans-serif";

pub fn render_svg(spec: &ChartSpec, opts: &RenderOptions) -> String {
    let theme = &opts.theme;
    let frame = Frame::new(spec, opts);
    let p = frame.plot;
    let (w, h) = (opts.width, opts.height);
    let mut s = String::with_capacity(16 * 1024);

    let _ = writeln!(
        s,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{FONT}">"#
    );
    let _ = writeln!(s, "<title>{}</title>", escape(&spec.title));
    let _ = writeln!(s, r#"<rect width="{w}" height="{h}" fill="{}"/>"#, theme.background.css());
    let _ = writeln!(
        s,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
        p.left,
        p.top,
        p.width(),
        p.height(),
        theme.plot_background.css()
    );
    let _ = writeln!(
        s,
        r#"<defs><clipPath id="plot"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath></defs>"#,
        p.left,
        p.top,
        p.width(),
        p.height()
    );

    // Grid
    if spec.y_axis.show_grid {
        let grid = theme.grid.css();
        s.push_str("<g class=\"grid\">\n");
        for t in &frame.x_ticks {
            let _ = writeln!(s, r#"<line x1="{0:.1}" y1="{1}" x2="{0:.1}" y2="{2}" stroke="{grid}"/>"#, t.px, p.top, p.bottom);
        }
        for t in &frame.y_ticks {
            let _ = writeln!(s, r#"<line x1="{1}" y1="{0:.1}" x2="{2}" y2="{0:.1}" stroke="{grid}"/>"#, t.px, p.left, p.right);
        }
        if frame.y.vmin < 0.0 && frame.y.vmax > 0.0 {
            let y0 = frame.y.to_px(0.0);
            let _ = writeln!(
                s,
                r#"<line x1="{1}" y1="{0:.1}" x2="{2}" y2="{0:.1}" stroke="{3}"/>"#,
                y0,
                p.left,
                p.right,
                theme.tick.css()
            );
        }
        s.push_str("</g>\n");
    }

    // Traces: bars under lines.
    s.push_str("<g clip-path=\"url(#plot)\">\n");
    for t in frame.traces.iter().filter(|t| t.trace.kind == TraceKind::Bar) {
        let trace = t.trace;
        let _ = writeln!(
            s,
            r#"<g class="bars" fill="{}" fill-opacity="{:.2}"><title>{}</title>"#,
            trace.color.css(),
            trace.opacity,
            escape(&trace.name)
        );
        for b in &t.bars {
            let _ = writeln!(
                s,
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}"/>"#,
                b.left,
                b.top,
                (b.right - b.left).max(0.5),
                (b.bottom - b.top).max(0.5)
            );
        }
        s.push_str("</g>\n");
    }
    for t in frame.traces.iter().filter(|t| t.trace.kind == TraceKind::Line) {
        let trace = t.trace;
        let dash = if trace.dash == Dash::Dashed { r#" stroke-dasharray="8 5""# } else { "" };
        for run in t.runs.iter().filter(|r| !r.is_empty()) {
            let mut points = String::with_capacity(run.len() * 14);
            for (x, y) in run {
                let _ = write!(points, "{x:.1},{y:.1} ");
            }
            let _ = writeln!(
                s,
                r#"<polyline class="line" fill="none" stroke="{}" stroke-opacity="{:.2}" stroke-width="{}"{dash} points="{}"><title>{}</title></polyline>"#,
                trace.color.css(),
                trace.opacity,
                trace.width,
                points.trim_end(),
                escape(&trace.name)
            );
        }
    }
    s.push_str("</g>\n");

    // Axes and tick labels
    let axis = theme.axis_line.css();
    let tick = theme.tick.css();
    let label = theme.axis_label.css();
    let _ = writeln!(s, r#"<g class="axes" stroke="{axis}" stroke-width="1.5">"#);
    let _ = writeln!(s, r#"<line x1="{0}" y1="{1}" x2="{2}" y2="{1}"/>"#, p.left, p.bottom, p.right);
    let _ = writeln!(s, r#"<line x1="{0}" y1="{1}" x2="{0}" y2="{2}"/>"#, p.left, p.top, p.bottom);
    if frame.y2.is_some() {
        let _ = writeln!(s, r#"<line x1="{0}" y1="{1}" x2="{0}" y2="{2}"/>"#, p.right, p.top, p.bottom);
    }
    s.push_str("</g>\n");

    let _ = writeln!(s, r#"<g class="ticks" font-size="12" fill="{tick}">"#);
    for t in &frame.x_ticks {
        let _ = writeln!(s, r#"<text x="{:.1}" y="{}" text-anchor="middle">{}</text>"#, t.px, p.bottom + 20, escape(&t.label));
    }
    for t in &frame.y_ticks {
        let _ = writeln!(s, r#"<text x="{}" y="{:.1}" text-anchor="end">{}</text>"#, p.left - 8, t.px + 4.0, escape(&t.label));
    }
    for t in &frame.y2_ticks {
        let _ = writeln!(s, r#"<text x="{}" y="{:.1}">{}</text>"#, p.right + 8, t.px + 4.0, escape(&t.label));
    }
    s.push_str("</g>\n");

    // Titles
    let _ = writeln!(
        s,
        r#"<text x="{}" y="28" font-size="18" font-weight="bold" fill="{}">{}</text>"#,
        p.left,
        theme.title.css(),
        escape(&spec.title)
    );
    let _ = writeln!(
        s,
        r#"<text x="{}" y="{}" font-size="13" text-anchor="middle" fill="{label}">{}</text>"#,
        (p.left + p.right) / 2,
        p.bottom + 42,
        escape(&spec.x_axis.title)
    );
    let _ = writeln!(s, r#"<text x="8" y="{}" font-size="13" fill="{label}">{}</text>"#, p.top - 8, escape(&spec.y_axis.title));
    if let Some(y2) = &spec.y2_axis {
        let _ = writeln!(
            s,
            r#"<text x="{}" y="{}" font-size="13" text-anchor="end" fill="{label}">{}</text>"#,
            w - 8,
            p.top - 8,
            escape(&y2.title)
        );
    }

    if spec.legend == LegendPlacement::TopRight {
        write_legend(&mut s, spec, p.right as f32, p.top as f32 - 30.0, &label);
    }

    if spec.hover == HoverMode::Unified {
        write_hover_columns(&mut s, spec, &frame, opts.max_points);
    }

    s.push_str("</svg>\n");
    s
}

fn write_legend(s: &mut String, spec: &ChartSpec, right: f32, y: f32, color: &str) {
    let widths: Vec<f32> = spec.traces.iter().map(|t| 40.0 + text_width(&t.name, 12.0)).collect();
    let mut x = right - widths.iter().sum::<f32>();
    let _ = writeln!(s, r#"<g class="legend" font-size="12" fill="{color}">"#);
    for (trace, w) in spec.traces.iter().zip(&widths) {
        match trace.kind {
            TraceKind::Line => {
                let dash = if trace.dash == Dash::Dashed { r#" stroke-dasharray="5 3""# } else { "" };
                let _ = writeln!(
                    s,
                    r#"<line x1="{x:.1}" y1="{0:.1}" x2="{1:.1}" y2="{0:.1}" stroke="{2}" stroke-width="2"{dash}/>"#,
                    y - 4.0,
                    x + 20.0,
                    trace.color.css()
                );
            }
            TraceKind::Bar => {
                let _ = writeln!(
                    s,
                    r#"<rect x="{:.1}" y="{:.1}" width="12" height="12" fill="{}" fill-opacity="{:.2}"/>"#,
                    x + 4.0,
                    y - 10.0,
                    trace.color.css(),
                    trace.opacity.max(0.4)
                );
            }
        }
        let _ = writeln!(s, r#"<text x="{:.1}" y="{y:.1}">{}</text>"#, x + 26.0, escape(&trace.name));
        x += w;
    }
    s.push_str("</g>\n");
}

/// Transparent full-height columns, one per date (thinned to `max_points`), whose
/// `<title>` lists every trace's value on that date.
fn write_hover_columns(s: &mut String, spec: &ChartSpec, frame: &Frame, max_points: usize) {
    let mut by_date: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
    for trace in &spec.traces {
        for (d, v) in trace.points() {
            by_date
                .entry(d)
                .or_default()
                .push(format!("{}: {}", trace.name, trace.value_format.render(v)));
        }
    }
    if by_date.is_empty() {
        return;
    }
    let stride = by_date.len().div_ceil(max_points.max(1)).max(1);
    let col_w = (frame.x.day_px() * stride as f32).max(1.0);
    let p = frame.plot;

    s.push_str("<g class=\"hover\" fill=\"transparent\">\n");
    for (d, lines) in by_date.iter().step_by(stride) {
        let cx = frame.x.to_px(*d);
        let _ = writeln!(
            s,
            r#"<rect x="{:.1}" y="{}" width="{:.1}" height="{}"><title>{}&#10;{}</title></rect>"#,
            cx - col_w * 0.5,
            p.top,
            col_w,
            p.height(),
            d.format("%Y-%m-%d"),
            escape(&lines.join("\n")).replace('\n', "&#10;")
        );
    }
    s.push_str("</g>\n");
}
