//! Project rendering
//!
//! Turns a [`Project`] into the set of text documents making up an Android
//! Gradle project. Rendering is pure: the same project always produces the
//! same documents, and nothing touches the filesystem until
//! [`crate::writer::write_project`] is called.

pub mod component;
pub mod layout;
pub mod manifest;
pub mod resources;
pub mod sources;

pub use component::{render_component, ComponentRenderer, DEFAULT_MAX_DEPTH};
pub use layout::render_layout;
pub use manifest::render_manifest;

use std::collections::BTreeMap;
use std::path::PathBuf;
use zeroapp_core::error::{Error, Result};

use crate::model::{layout_name, Project, Screen};
use sources::SourceTemplates;

/// Activity source generated for a secondary screen
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityStub {
    pub class_name: String,
    pub source: String,
}

/// Everything generated for one project, keyed the way it is laid out on disk
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedProject {
    pub package: String,
    pub manifest: String,
    /// Layout name (`activity_main`, `activity_<id>`) to document
    pub layouts: BTreeMap<String, String>,
    pub strings: String,
    pub colors: String,
    pub styles: String,
    pub placeholder: String,
    pub main_activity: String,
    /// Screen id to activity stub
    pub activities: BTreeMap<String, ActivityStub>,
    pub root_build_gradle: String,
    pub app_build_gradle: String,
    pub settings_gradle: String,
    pub gradle_properties: String,
}

/// A file to write, relative to the project root
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

impl GeneratedFile {
    fn new(path: impl Into<PathBuf>, contents: &str) -> Self {
        Self {
            path: path.into(),
            contents: contents.to_string(),
        }
    }
}

impl RenderedProject {
    /// Flatten into the project's file list
    pub fn files(&self) -> Vec<GeneratedFile> {
        let main = PathBuf::from("app/src/main");
        let res = main.join("res");
        let java = self
            .package
            .split('.')
            .filter(|s| !s.is_empty())
            .fold(main.join("java"), |dir, segment| dir.join(segment));

        let mut files = vec![
            GeneratedFile::new("build.gradle", &self.root_build_gradle),
            GeneratedFile::new("settings.gradle", &self.settings_gradle),
            GeneratedFile::new("gradle.properties", &self.gradle_properties),
            GeneratedFile::new("app/build.gradle", &self.app_build_gradle),
            GeneratedFile::new(main.join("AndroidManifest.xml"), &self.manifest),
            GeneratedFile::new(res.join("values/strings.xml"), &self.strings),
            GeneratedFile::new(res.join("values/colors.xml"), &self.colors),
            GeneratedFile::new(res.join("values/styles.xml"), &self.styles),
            GeneratedFile::new(res.join("drawable/placeholder.xml"), &self.placeholder),
            GeneratedFile::new(java.join("MainActivity.java"), &self.main_activity),
        ];

        for (name, layout) in &self.layouts {
            files.push(GeneratedFile::new(res.join("layout").join(format!("{}.xml", name)), layout));
        }

        for stub in self.activities.values() {
            files.push(GeneratedFile::new(
                java.join(format!("{}.java", stub.class_name)),
                &stub.source,
            ));
        }

        files
    }
}

/// Renders whole projects
pub struct Renderer {
    templates: SourceTemplates,
    components: ComponentRenderer,
}

impl Renderer {
    /// Renderer with the default nesting limit
    pub fn new() -> Result<Self> {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Renderer with a custom nesting limit
    pub fn with_max_depth(max_depth: usize) -> Result<Self> {
        Ok(Self {
            templates: SourceTemplates::new()?,
            components: ComponentRenderer::new(max_depth),
        })
    }

    pub fn components(&self) -> &ComponentRenderer {
        &self.components
    }

    /// Render the layout for one screen
    pub fn render_screen(&self, project: &Project, screen: &Screen) -> String {
        render_layout(screen, &project.name, &self.components)
    }

    /// Render every document for `project`
    ///
    /// Fails only when the project has no `mainScreen`; field-level problems
    /// are the validator's job.
    pub fn render(&self, project: &Project) -> Result<RenderedProject> {
        let main_screen = project.main_screen().ok_or_else(|| {
            Error::invalid_input("Project has no mainScreen")
                .with_suggestion("Add a screen with the id \"mainScreen\"")
        })?;

        let mut layouts = BTreeMap::new();
        layouts.insert(layout_name(crate::model::MAIN_SCREEN_ID), self.render_screen(project, main_screen));

        let mut activities = BTreeMap::new();
        for (id, screen) in project.secondary_screens() {
            layouts.insert(layout_name(id), self.render_screen(project, screen));
            activities.insert(
                id.to_string(),
                ActivityStub {
                    class_name: screen.activity_name(),
                    source: self.templates.screen_activity(project, id, screen)?,
                },
            );
        }

        tracing::debug!(
            package = %project.package,
            screens = project.screens.len(),
            "Rendered project"
        );

        Ok(RenderedProject {
            package: project.package.clone(),
            manifest: render_manifest(project),
            layouts,
            strings: resources::render_strings(project),
            colors: resources::COLORS_XML.to_string(),
            styles: resources::STYLES_XML.to_string(),
            placeholder: resources::PLACEHOLDER_XML.to_string(),
            main_activity: self.templates.main_activity(project)?,
            activities,
            root_build_gradle: self.templates.root_build_gradle(project)?,
            app_build_gradle: self.templates.app_build_gradle(project)?,
            settings_gradle: sources::SETTINGS_GRADLE.to_string(),
            gradle_properties: sources::GRADLE_PROPERTIES.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, Orientation};
    use proptest::prelude::*;

    fn project() -> Project {
        Project::new("Shop", "com.example.shop")
            .with_screen(
                "mainScreen",
                Screen::new("Home", vec![Component::text("Welcome"), Component::button("Browse")]),
            )
            .with_screen("cart", Screen::new("Cart", vec![]))
            .with_screen("checkout", Screen::new("Check Out!", vec![]))
    }

    #[test]
    fn test_render_requires_main_screen() {
        let renderer = Renderer::new().unwrap();
        let p = Project::new("Shop", "com.example.shop").with_screen("cart", Screen::new("Cart", vec![]));
        let err = renderer.render(&p).unwrap_err();
        assert!(err.code.is_client_error());
    }

    #[test]
    fn test_one_layout_per_screen_one_stub_per_secondary() {
        let rendered = Renderer::new().unwrap().render(&project()).unwrap();

        let layouts: Vec<_> = rendered.layouts.keys().map(String::as_str).collect();
        assert_eq!(layouts, ["activity_cart", "activity_checkout", "activity_main"]);
        assert_eq!(rendered.activities.len(), 2);
        assert_eq!(rendered.activities["checkout"].class_name, "CheckOutActivity");
        assert!(rendered.manifest.contains(".CheckOutActivity"));
    }

    #[test]
    fn test_file_layout() {
        let rendered = Renderer::new().unwrap().render(&project()).unwrap();
        let paths: Vec<String> = rendered
            .files()
            .iter()
            .map(|f| f.path.to_string_lossy().replace('\\', "/"))
            .collect();

        for expected in [
            "build.gradle",
            "settings.gradle",
            "gradle.properties",
            "app/build.gradle",
            "app/src/main/AndroidManifest.xml",
            "app/src/main/res/values/strings.xml",
            "app/src/main/res/values/colors.xml",
            "app/src/main/res/values/styles.xml",
            "app/src/main/res/drawable/placeholder.xml",
            "app/src/main/res/layout/activity_main.xml",
            "app/src/main/res/layout/activity_cart.xml",
            "app/src/main/java/com/example/shop/MainActivity.java",
            "app/src/main/res/layout/activity_checkout.xml",
            "app/src/main/java/com/example/shop/CartActivity.java",
            "app/src/main/java/com/example/shop/CheckOutActivity.java",
        ] {
            assert!(paths.iter().any(|p| p == expected), "missing {}", expected);
        }
        assert_eq!(paths.len(), 10 + rendered.layouts.len() + rendered.activities.len());
        assert_eq!(paths.len(), 15);
    }

    #[test]
    fn test_main_layout_contains_components() {
        let rendered = Renderer::new().unwrap().render(&project()).unwrap();
        let main = &rendered.layouts["activity_main"];
        assert!(main.contains("android:text=\"Welcome\""));
        assert!(main.contains("<Button"));
        assert!(rendered.layouts["activity_cart"].contains("android:text=\"Shop\""));
    }

    fn leaf() -> impl Strategy<Value = Component> {
        prop_oneof![
            "[a-zA-Z &<>\"']{0,12}".prop_map(Component::text),
            "[a-zA-Z ]{0,12}".prop_map(Component::button),
            "[a-z]{1,8}".prop_map(Component::Unknown),
        ]
    }

    fn tree() -> impl Strategy<Value = Component> {
        leaf().prop_recursive(4, 24, 4, |inner| {
            (prop::bool::ANY, prop::collection::vec(inner, 0..4)).prop_map(|(horizontal, children)| {
                let orientation = if horizontal {
                    Orientation::Horizontal
                } else {
                    Orientation::Vertical
                };
                Component::container(orientation, children)
            })
        })
    }

    proptest! {
        #[test]
        fn prop_render_is_deterministic(components in prop::collection::vec(tree(), 0..5)) {
            let p = Project::new("App", "com.example.app")
                .with_screen("mainScreen", Screen::new("Home", components));
            let renderer = Renderer::new().unwrap();
            let first = renderer.render(&p).unwrap();
            let second = renderer.render(&p).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_layout_tags_balance(components in prop::collection::vec(tree(), 1..5)) {
            let screen = Screen::new("Home", components);
            let out = render_layout(&screen, "App", &ComponentRenderer::default());
            let opened = out.matches("<LinearLayout").count();
            let closed = out.matches("</LinearLayout>").count();
            prop_assert_eq!(opened, closed);
        }
    }
}
