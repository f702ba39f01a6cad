//! Per-screen layout documents

use super::component::ComponentRenderer;
use crate::model::Screen;
use crate::xml::{self, ElementWriter};

/// Render a screen's layout: its components inside a full-screen vertical
/// `LinearLayout`, or a centred label with the app name when it has none
pub fn render_layout(screen: &Screen, app_name: &str, components: &ComponentRenderer) -> String {
    let mut out = String::from(xml::PROLOG);
    out.push_str("<LinearLayout xmlns:android=\"http://schemas.android.com/apk/res/android\"\n");
    out.push_str("    android:layout_width=\"match_parent\"\n");
    out.push_str("    android:layout_height=\"match_parent\"\n");
    out.push_str("    android:orientation=\"vertical\">\n\n");

    if screen.components.is_empty() {
        let mut el = ElementWriter::open(&mut out, 1, "TextView");
        el.attr("layout_width", "wrap_content")
            .attr("layout_height", "wrap_content")
            .attr("layout_gravity", "center")
            .attr("text", app_name)
            .attr("layout_margin", "16dp")
            .attr("textSize", "24sp");
        el.close();
    } else {
        for component in &screen.components {
            components.write(&mut out, component, 1, 1);
        }
    }

    out.push_str("</LinearLayout>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, Orientation};
    use crate::render::component::render_component;

    #[test]
    fn test_empty_screen_shows_app_name() {
        let out = render_layout(&Screen::new("Home", vec![]), "Pocket Recipes", &ComponentRenderer::default());
        assert!(out.starts_with(xml::PROLOG));
        assert_eq!(out.matches("<TextView").count(), 1);
        assert!(out.contains("android:layout_gravity=\"center\""));
        assert!(out.contains("android:text=\"Pocket Recipes\""));
        assert!(out.ends_with("</LinearLayout>\n"));
    }

    #[test]
    fn test_components_rendered_at_level_one() {
        let screen = Screen::new(
            "Home",
            vec![
                Component::text("Hello"),
                Component::container(Orientation::Horizontal, vec![Component::button("Go")]),
            ],
        );
        let out = render_layout(&screen, "App", &ComponentRenderer::default());

        let expected = format!(
            "{}{}",
            render_component(&screen.components[0], 1),
            render_component(&screen.components[1], 1)
        );
        assert!(out.contains(&expected));
        assert!(!out.contains("android:text=\"App\""));
    }

    #[test]
    fn test_depth_counts_from_top_level() {
        let screen = Screen::new(
            "Deep",
            vec![Component::container(
                Orientation::Vertical,
                vec![Component::container(Orientation::Vertical, vec![Component::text("x")])],
            )],
        );
        let out = render_layout(&screen, "App", &ComponentRenderer::new(2));
        assert!(out.contains("Nesting limit of 2 reached"));
    }
}
