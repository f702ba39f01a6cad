//! Component tree to layout XML
//!
//! Each component kind maps to one Android view element. Containers are the
//! only recursive case; their children are rendered one indentation level
//! deeper. Nesting past the configured maximum is cut off with a marker
//! comment rather than recursing further.

use crate::model::{Component, Container, Orientation};
use crate::xml::{self, ElementWriter};

/// Default maximum container nesting
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Drawable referenced by every image placeholder
pub const PLACEHOLDER_DRAWABLE: &str = "@drawable/placeholder";

/// Renders component trees with a nesting limit
#[derive(Debug, Clone, Copy)]
pub struct ComponentRenderer {
    max_depth: usize,
}

impl Default for ComponentRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl ComponentRenderer {
    /// Create a renderer; `max_depth` is clamped to at least 1
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Render one component (and its subtree) at `indent_level`
    pub fn render(&self, component: &Component, indent_level: usize) -> String {
        let mut out = String::new();
        self.write(&mut out, component, indent_level, 1);
        out
    }

    /// Append a component's markup to `out`; `depth` is 1 for the component
    /// passed in by the caller
    pub(crate) fn write(&self, out: &mut String, component: &Component, level: usize, depth: usize) {
        match component {
            Component::Text(props) => {
                let mut el = ElementWriter::open(out, level, "TextView");
                el.attr("layout_width", "wrap_content")
                    .attr("layout_height", "wrap_content")
                    .attr("text", props.content.as_deref().unwrap_or("Text"))
                    .attr_opt("gravity", props.text_align.as_deref())
                    .attr_opt("textSize", props.font_size.as_deref());
                if props.is_bold() {
                    el.attr("textStyle", "bold");
                }
                el.attr_opt("textColor", props.color.as_deref())
                    .attr_opt("layout_margin", props.margin.as_deref());
                el.close();
            }
            Component::Button(props) => {
                let mut el = ElementWriter::open(out, level, "Button");
                el.attr("layout_width", "wrap_content")
                    .attr("layout_height", "wrap_content")
                    .attr("text", props.content.as_deref().unwrap_or("Button"))
                    .attr_opt("backgroundTint", props.background_color.as_deref())
                    .attr_opt("textColor", props.color.as_deref())
                    .attr_opt("layout_margin", props.margin.as_deref());
                el.close();
            }
            Component::Container(container) => self.write_container(out, container, level, depth),
            Component::Input(props) => {
                let mut el = ElementWriter::open(out, level, "EditText");
                el.attr("layout_width", "match_parent")
                    .attr("layout_height", "wrap_content")
                    .attr("hint", props.placeholder.as_deref().unwrap_or("Enter text"))
                    .attr("inputType", props.input_type.android_value())
                    .attr_opt("layout_margin", props.margin.as_deref());
                el.close();
            }
            Component::Image(props) => {
                let mut el = ElementWriter::open(out, level, "ImageView");
                el.attr("layout_width", "wrap_content")
                    .attr("layout_height", "wrap_content")
                    .attr("layout_gravity", "center")
                    .attr("src", PLACEHOLDER_DRAWABLE)
                    .attr("contentDescription", props.alt.as_deref().unwrap_or("Image"))
                    .attr_opt("layout_margin", props.margin.as_deref())
                    .attr_opt("layout_width", props.width.as_deref())
                    .attr_opt("layout_height", props.height.as_deref());
                el.close();
            }
            Component::List(props) => {
                let mut el = ElementWriter::open(out, level, "ListView");
                el.attr("layout_width", "match_parent")
                    .attr("layout_height", "wrap_content")
                    .attr_opt("layout_margin", props.margin.as_deref());
                el.close();
            }
            Component::WebView(props) => {
                let mut el = ElementWriter::open(out, level, "WebView");
                el.attr("layout_width", "match_parent")
                    .attr("layout_height", "match_parent")
                    .attr_opt("layout_margin", props.margin.as_deref());
                el.close();
            }
            Component::Navigation(props) => {
                let mut el = ElementWriter::open(out, level, "LinearLayout");
                el.attr("layout_width", "match_parent")
                    .attr("layout_height", "wrap_content")
                    .attr("orientation", Orientation::Horizontal.as_str())
                    .attr("background", "#f0f0f0")
                    .attr("padding", "8dp");
                let tag = el.open_body();

                for (index, item) in props.items().iter().enumerate() {
                    let mut button = ElementWriter::open(out, level + 1, "Button");
                    button
                        .attr("layout_width", "0dp")
                        .attr("layout_height", "wrap_content")
                        .attr("layout_weight", "1")
                        .attr("text", &item.label)
                        .attr("id", &format!("@+id/nav_{}", index))
                        .raw_attr("style", "?android:attr/buttonBarButtonStyle");
                    button.close();
                }

                xml::close_tag(out, level, tag);
            }
            Component::Unknown(kind) => {
                xml::comment(out, level, &format!("Unknown component type: {}", kind));
                let mut el = ElementWriter::open(out, level, "TextView");
                el.attr("layout_width", "wrap_content")
                    .attr("layout_height", "wrap_content")
                    .attr("text", &format!("Component: {}", kind));
                el.close();
            }
        }
    }

    fn write_container(&self, out: &mut String, container: &Container, level: usize, depth: usize) {
        let props = &container.props;
        let mut el = ElementWriter::open(out, level, "LinearLayout");
        el.attr("layout_width", "match_parent")
            .attr("layout_height", "wrap_content")
            .attr("orientation", props.layout.as_str())
            .attr_opt("padding", props.padding.as_deref())
            .attr_opt("background", props.background_color.as_deref())
            .attr_opt("layout_margin", props.margin.as_deref());
        let tag = el.open_body();

        if !container.children.is_empty() {
            if depth >= self.max_depth {
                tracing::warn!(
                    depth,
                    max_depth = self.max_depth,
                    omitted = container.children.len(),
                    "Container nesting limit reached; children omitted"
                );
                xml::comment(
                    out,
                    level + 1,
                    &format!("Nesting limit of {} reached; children omitted", self.max_depth),
                );
            } else {
                for child in &container.children {
                    self.write(out, child, level + 1, depth + 1);
                }
            }
        }

        xml::close_tag(out, level, tag);
    }
}

/// Render a component with the default nesting limit
pub fn render_component(component: &Component, indent_level: usize) -> String {
    ComponentRenderer::default().render(component, indent_level)
}
