//! Bundle serializers
//!
//! The bundle is plain data; these turn it into text. `D3Serializer` writes a
//! CSS style sheet plus d3 (v3) scripts, `JsonSerializer` writes the bundle
//! as-is. Every name the d3 output introduces into the host document is
//! built from a figure, axes or element id, so bundles with distinct figure
//! ids can share a page.

use crate::error::{AxisKind, SceneError, SceneResult};
use crate::export::{AxesHandler, Bundle};
use crate::ir::{AxesId, ElementId, Instruction, StyleRule, StyleTarget};
use std::collections::{BTreeSet, HashMap};
use std::fmt::{Display, Write};

pub trait BundleSerializer {
    fn serialize(&self, bundle: &Bundle) -> SceneResult<String>;
}

// =============================================================================
// JSON
// =============================================================================

#[derive(Debug, Default)]
pub struct JsonSerializer {
    pub pretty: bool,
}

impl BundleSerializer for JsonSerializer {
    fn serialize(&self, bundle: &Bundle) -> SceneResult<String> {
        let out = if self.pretty {
            serde_json::to_string_pretty(bundle)
        } else {
            serde_json::to_string(bundle)
        };
        out.map_err(|e| SceneError::Serialization(e.to_string()))
    }
}

// =============================================================================
// d3
// =============================================================================

/// Script names introduced per figure, per axes and per element
const FIGURE_NAMES: &[&str] = &["func", "figure"];
const AXES_NAMES: &[&str] = &[
    "width",
    "height",
    "x",
    "y",
    "zoom",
    "zoomed",
    "baseaxes",
    "axes",
    "bg",
    "clip",
    "create_xAxis",
    "create_yAxis",
    "xAxis",
    "yAxis",
];
const ELEMENT_NAMES: &[&str] = &["data", "line", "g", "points", "text"];

fn name(kind: &str, id: impl Display) -> String {
    format!("{}_{}", kind, id)
}

fn axis_factory(axis: AxisKind) -> &'static str {
    match axis {
        AxisKind::X => "create_xAxis",
        AxisKind::Y => "create_yAxis",
    }
}

fn axis_var(axis: AxisKind) -> &'static str {
    match axis {
        AxisKind::X => "xAxis",
        AxisKind::Y => "yAxis",
    }
}

/// Extent the grid ticks run across: the axes height for x, width for y
fn grid_extent(axis: AxisKind) -> &'static str {
    match axis {
        AxisKind::X => "height",
        AxisKind::Y => "width",
    }
}

/// JS string literal that is also safe inside an HTML `<script>` element
fn js_string(s: &str) -> SceneResult<String> {
    let json = serde_json::to_string(s).map_err(|e| SceneError::Serialization(e.to_string()))?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029"))
}

/// Marker placement callback in the axes' current scales
fn translate_fn(axes_id: &AxesId) -> String {
    format!(
        "function(d) {{ return \"translate(\" + {}(d[0]) + \",\" + {}(d[1]) + \")\"; }}",
        name("x", axes_id),
        name("y", axes_id)
    )
}

fn js_points(points: &[(f64, f64)]) -> String {
    let inner: Vec<String> = points.iter().map(|(x, y)| format!("[{}, {}]", x, y)).collect();
    format!("[{}]", inner.join(", "))
}

/// Writes the style sheet and scripts for the d3 host runtime
#[derive(Debug, Default)]
pub struct D3Serializer;

impl D3Serializer {
    fn scope(&self, bundle: &Bundle) -> String {
        format!("div#{}", name("figure", &bundle.figure_id))
    }

    /// Selector list for one rule, scoped to the figure's container
    pub fn selector(&self, bundle: &Bundle, target: &StyleTarget) -> String {
        let scope = self.scope(bundle);
        match target {
            StyleTarget::AxisLines { axes_id } => {
                let class = name("axes", axes_id);
                format!("{scope} .{class}.axis line, {scope} .{class}.axis path")
            }
            StyleTarget::AxisText { axes_id } => {
                format!("{scope} .{}.axis text", name("axes", axes_id))
            }
            StyleTarget::GridTicks { axes_id, axis } => {
                format!("{scope} .{}.{}.grid .tick", name("axes", axes_id), axis)
            }
            StyleTarget::GridDomain { axes_id, axis } => {
                format!("{scope} .{}.{}.grid path", name("axes", axes_id), axis)
            }
            StyleTarget::LinePath { element_id } => {
                format!("{scope} path.{}", name("line", element_id))
            }
            StyleTarget::LineMarkers { element_id } => {
                format!("{scope} path.{}", name("points", element_id))
            }
            StyleTarget::Text { element_id } => {
                format!("{scope} text.{}", name("text", element_id))
            }
        }
    }

    fn rule(&self, bundle: &Bundle, rule: &StyleRule) -> String {
        let mut out = format!("{} {{\n", self.selector(bundle, &rule.target));
        for d in &rule.declarations {
            let _ = writeln!(out, "    {}: {};", d.property, d.value);
        }
        out.push_str("}\n");
        out
    }

    pub fn style_sheet(&self, bundle: &Bundle) -> String {
        bundle
            .style
            .iter()
            .map(|r| self.rule(bundle, r))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Initial-draw statements; expects `canvas`, `figwidth` and `figheight`
    /// in scope
    pub fn init_script(&self, bundle: &Bundle) -> SceneResult<String> {
        let handlers: HashMap<&AxesId, &AxesHandler> =
            bundle.update.iter().map(|h| (&h.axes_id, h)).collect();
        let mut out = String::new();
        for instruction in &bundle.init {
            self.init_instruction(&mut out, instruction, &handlers)?;
        }
        Ok(out)
    }

    /// Start the zoom behaviour at the exported transform; the behaviour
    /// keeps the base scales as its reference
    fn resume_zoom(&self, out: &mut String, axes_id: &AxesId, handler: &AxesHandler) {
        let (tx, ty) = handler.transform.translate();
        let current = &handler.scales;
        let _ = write!(
            out,
            r#"
    {zoom}.translate([{tx}, {ty}]).scale({k});
    {x}.domain([{xd0}, {xd1}]);
    {y}.domain([{yd0}, {yd1}]);
"#,
            zoom = name("zoom", axes_id),
            k = handler.transform.scale(),
            x = name("x", axes_id),
            y = name("y", axes_id),
            xd0 = current.x.domain.0,
            xd1 = current.x.domain.1,
            yd0 = current.y.domain.0,
            yd1 = current.y.domain.1,
        );
    }

    fn init_instruction(
        &self,
        out: &mut String,
        instruction: &Instruction,
        handlers: &HashMap<&AxesId, &AxesHandler>,
    ) -> SceneResult<()> {
        match instruction {
            Instruction::Frame {
                axes_id,
                origin,
                size,
                background,
            } => {
                let handler = handlers
                    .get(axes_id)
                    .ok_or_else(|| SceneError::UnknownAxes(axes_id.to_string()))?;
                let s = &handler.base_scales;
                let v = |kind: &str| name(kind, axes_id);
                let _ = write!(
                    out,
                    r#"
    var {width} = {w};
    var {height} = {h};

    var {x} = d3.scale.linear()
                 .domain([{xd0}, {xd1}])
                 .range([0, {width}]);
    var {y} = d3.scale.linear()
                 .domain([{yd0}, {yd1}])
                 .range([{height}, 0]);

    var {zoom} = d3.behavior.zoom()
                 .x({x})
                 .y({y})
                 .on("zoom", {zoomed});

    var {baseaxes} = canvas.append('g')
            .attr('transform', 'translate({ox},{oy})')
            .attr('width', {width})
            .attr('height', {height})
            .attr('class', 'main')
            .call({zoom});

    {baseaxes}.append("svg:rect")
            .attr("width", {width})
            .attr("height", {height})
            .attr("class", "{bg}")
            .attr("fill", "{background}");

    var {create_x} = function(){{
        return d3.svg.axis().scale({x}).orient('bottom').ticks({ticks});
    }};
    var {create_y} = function(){{
        return d3.svg.axis().scale({y}).orient('left').ticks({ticks});
    }};

    {baseaxes}.append("svg:clipPath")
            .attr("id", "{clip}")
            .append("svg:rect")
            .attr("x", 0)
            .attr("y", 0)
            .attr("width", {width})
            .attr("height", {height});

    var {axes} = {baseaxes}.append('g')
            .attr("clip-path", "url(#{clip})");
"#,
                    width = v("width"),
                    height = v("height"),
                    w = size.0,
                    h = size.1,
                    x = v("x"),
                    y = v("y"),
                    xd0 = s.x.domain.0,
                    xd1 = s.x.domain.1,
                    yd0 = s.y.domain.0,
                    yd1 = s.y.domain.1,
                    zoom = v("zoom"),
                    zoomed = v("zoomed"),
                    baseaxes = v("baseaxes"),
                    ox = origin.0,
                    oy = origin.1,
                    bg = v("bg"),
                    background = background,
                    create_x = v("create_xAxis"),
                    create_y = v("create_yAxis"),
                    ticks = s.tick_count,
                    clip = v("clip"),
                    axes = v("axes"),
                );
                if !handler.transform.is_identity() {
                    self.resume_zoom(out, axes_id, handler);
                }
            }
            Instruction::Axis { axes_id, axis, .. } => {
                let translate = match axis {
                    AxisKind::X => format!("'translate(0,' + {} + ')'", name("height", axes_id)),
                    AxisKind::Y => "'translate(0,0)'".to_string(),
                };
                let var = name(axis_var(*axis), axes_id);
                let _ = write!(
                    out,
                    r#"
    var {var} = {factory}();
    {baseaxes}.append('g')
            .attr('transform', {translate})
            .attr('class', '{class} {axis} axis')
            .call({var});
"#,
                    factory = name(axis_factory(*axis), axes_id),
                    baseaxes = name("baseaxes", axes_id),
                    class = name("axes", axes_id),
                );
            }
            Instruction::Data { element_id, points } => {
                let data = name("data", element_id);
                let _ = write!(out, "\n    var {} = {};\n", data, js_points(points));
            }
            Instruction::Path { element_id, axes_id, .. } => {
                let _ = write!(
                    out,
                    r#"
    var {line} = d3.svg.line()
            .x(function(d) {{ return {x}(d[0]); }})
            .y(function(d) {{ return {y}(d[1]); }})
            .interpolate("linear");
    {axes}.append("svg:path")
            .attr("d", {line}({data}))
            .attr('class', '{line}');
"#,
                    line = name("line", element_id),
                    x = name("x", axes_id),
                    y = name("y", axes_id),
                    axes = name("axes", axes_id),
                    data = name("data", element_id),
                );
            }
            Instruction::Markers {
                element_id,
                axes_id,
                glyph,
                size,
                ..
            } => {
                let _ = write!(
                    out,
                    r#"
    var {g} = {axes}.append("svg:g");
    {g}.selectAll(".{points}")
            .data({data})
            .enter().append("svg:path")
            .attr('class', '{points}')
            .attr("d", d3.svg.symbol().type("{glyph}").size({size}))
            .attr("transform", {translate});
"#,
                    g = name("g", element_id),
                    axes = name("axes", axes_id),
                    points = name("points", element_id),
                    data = name("data", element_id),
                    glyph = glyph.name(),
                    translate = translate_fn(axes_id),
                );
            }
            Instruction::GridLines { axes_id, axis, .. } => {
                let transform = match axis {
                    AxisKind::X => format!(
                        "\n            .attr(\"transform\", \"translate(0,\" + {} + \")\")",
                        name("height", axes_id)
                    ),
                    AxisKind::Y => String::new(),
                };
                let _ = write!(
                    out,
                    r#"
    {axes}.append("g")
            .attr("class", "{class} {axis} grid"){transform}
            .call({factory}().tickSize(-{extent}, 0, 0).tickFormat(""));
"#,
                    axes = name("axes", axes_id),
                    class = name("axes", axes_id),
                    factory = name(axis_factory(*axis), axes_id),
                    extent = name(grid_extent(*axis), axes_id),
                );
            }
            Instruction::Text {
                element_id,
                content,
                position: (x, y),
                rotation,
            } => {
                let _ = write!(
                    out,
                    r#"
    canvas.append("text")
            .text({content})
            .attr("class", "{class}")
            .attr("x", {x})
            .attr("y", {y})
            .attr("transform", "rotate({rotation},{x},{y})");
"#,
                    content = js_string(content)?,
                    class = name("text", element_id),
                );
            }
        }
        Ok(())
    }

    /// One `zoomed_{axes}` function; the host zoom behaviour calls it with
    /// the axes' scales already rescaled
    pub fn handler(&self, handler: &AxesHandler) -> String {
        let axes_id = &handler.axes_id;
        let mut body = String::new();
        for instruction in &handler.instructions {
            match instruction {
                Instruction::Axis { axis, .. } => {
                    let _ = writeln!(
                        body,
                        "        {}.select(\".{}.axis\").call({});",
                        name("baseaxes", axes_id),
                        axis,
                        name(axis_var(*axis), axes_id)
                    );
                }
                Instruction::Path { element_id, .. } => {
                    let _ = writeln!(
                        body,
                        "        {}.select(\".{}\").attr(\"d\", {}({}));",
                        name("axes", axes_id),
                        name("line", element_id),
                        name("line", element_id),
                        name("data", element_id)
                    );
                }
                Instruction::Markers { element_id, .. } => {
                    let _ = writeln!(
                        body,
                        "        {}.selectAll(\".{}\").attr(\"transform\", {});",
                        name("axes", axes_id),
                        name("points", element_id),
                        translate_fn(axes_id)
                    );
                }
                Instruction::GridLines { axis, .. } => {
                    let _ = writeln!(
                        body,
                        "        {}.select(\".{}.grid\").call({}().tickSize(-{}, 0, 0)\
                         .tickFormat(\"\"));",
                        name("axes", axes_id),
                        axis,
                        name(axis_factory(*axis), axes_id),
                        name(grid_extent(*axis), axes_id)
                    );
                }
                // Frame, data and text never change on zoom
                Instruction::Frame { .. }
                | Instruction::Data { .. }
                | Instruction::Text { .. } => {}
            }
        }
        format!("\n    function {}() {{\n{}    }}\n", name("zoomed", axes_id), body)
    }

    pub fn update_script(&self, bundle: &Bundle) -> String {
        bundle.update.iter().map(|h| self.handler(h)).collect()
    }

    /// Standalone HTML fragment: d3 import, style sheet, container and the
    /// figure function, started once d3 has loaded
    pub fn page(&self, bundle: &Bundle) -> SceneResult<String> {
        let figure_id = &bundle.figure_id;
        Ok(format!(
            r#"<script type="text/javascript" src="{d3_url}"></script>
<style>
{style}</style>

<div id="{div}"></div>

<script type="text/javascript">
{func} = function(figure){{

    var figwidth = {width};
    var figheight = {height};

    var canvas = figure.append('svg:svg')
            .attr('width', figwidth)
            .attr('height', figheight)
            .attr('class', 'canvas');
{init}{update}
}};

setTimeout(function(){{ {func}(d3.select('#{div}')) }}, 0);
</script>
"#,
            d3_url = bundle.d3_url,
            style = self.style_sheet(bundle),
            div = name("figure", figure_id),
            func = name("func", figure_id),
            width = bundle.width_px,
            height = bundle.height_px,
            init = self.init_script(bundle)?,
            update = self.update_script(bundle),
        ))
    }

    /// Every class, element id and script name this serializer introduces
    /// into the host document for `bundle`
    pub fn identifiers(&self, bundle: &Bundle) -> BTreeSet<String> {
        let mut names: BTreeSet<String> =
            FIGURE_NAMES.iter().map(|k| name(k, &bundle.figure_id)).collect();
        let mut elements: BTreeSet<&ElementId> = BTreeSet::new();
        for handler in &bundle.update {
            names.extend(AXES_NAMES.iter().map(|k| name(k, &handler.axes_id)));
        }
        for instruction in &bundle.init {
            match instruction {
                Instruction::Data { element_id, .. }
                | Instruction::Path { element_id, .. }
                | Instruction::Markers { element_id, .. }
                | Instruction::GridLines { element_id, .. }
                | Instruction::Text { element_id, .. } => {
                    elements.insert(element_id);
                }
                Instruction::Frame { .. } | Instruction::Axis { .. } => {}
            }
        }
        for element_id in elements {
            names.extend(ELEMENT_NAMES.iter().map(|k| name(k, element_id)));
        }
        names
    }
}

impl BundleSerializer for D3Serializer {
    fn serialize(&self, bundle: &Bundle) -> SceneResult<String> {
        self.page(bundle)
    }
}
