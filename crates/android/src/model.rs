//! Project description model
//!
//! The inbound JSON describes an app as a map of screens, each holding a tree
//! of UI components:
//!
//! ```json
//! {
//!   "name": "My App",
//!   "package": "com.example.myapp",
//!   "version": "1.0.0",
//!   "screens": {
//!     "mainScreen": {
//!       "name": "Home",
//!       "components": [
//!         { "type": "text", "properties": { "content": "Hello" } },
//!         { "type": "container", "properties": { "layout": "horizontal" },
//!           "children": [ { "type": "button" } ] }
//!       ]
//!     }
//!   }
//! }
//! ```
//!
//! Components deserialize into the closed [`Component`] enum. Kinds outside
//! the known set become [`Component::Unknown`] instead of failing.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Identifier of the entry screen, rendered as `MainActivity`
pub const MAIN_SCREEN_ID: &str = "mainScreen";

/// Version used when the project does not declare one
pub const DEFAULT_VERSION: &str = "1.0.0";

/// An app to generate
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    /// Display name, also the `app_name` string resource
    #[serde(default)]
    pub name: String,

    /// Reverse-domain application id, e.g. `com.example.app`
    #[serde(default)]
    pub package: String,

    #[serde(default, deserialize_with = "scalar")]
    version: Option<String>,

    /// Screens keyed by identifier; sorted so output order is stable
    #[serde(default)]
    pub screens: BTreeMap<String, Screen>,
}

impl Project {
    /// Create a project with no screens
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            version: None,
            screens: BTreeMap::new(),
        }
    }

    /// Set the version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Add or replace a screen
    pub fn with_screen(mut self, id: impl Into<String>, screen: Screen) -> Self {
        self.screens.insert(id.into(), screen);
        self
    }

    /// Declared version, or [`DEFAULT_VERSION`]
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_VERSION)
    }

    /// The entry screen, if present
    pub fn main_screen(&self) -> Option<&Screen> {
        self.screens.get(MAIN_SCREEN_ID)
    }

    /// Every screen except the entry screen, in identifier order
    pub fn secondary_screens(&self) -> impl Iterator<Item = (&str, &Screen)> {
        self.screens
            .iter()
            .filter(|(id, _)| id.as_str() != MAIN_SCREEN_ID)
            .map(|(id, screen)| (id.as_str(), screen))
    }

    /// Package split into directory segments
    pub fn package_segments(&self) -> impl Iterator<Item = &str> {
        self.package.split('.').filter(|s| !s.is_empty())
    }
}

/// Layout resource name for a screen (`activity_main` for the entry screen)
pub fn layout_name(screen_id: &str) -> String {
    if screen_id == MAIN_SCREEN_ID {
        "activity_main".to_string()
    } else {
        format!("activity_{}", screen_id)
    }
}

/// One app view
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Screen {
    /// Display name
    #[serde(default)]
    pub name: String,

    /// Top-level components, in order
    #[serde(default, deserialize_with = "nullable_vec")]
    pub components: Vec<Component>,
}

impl Screen {
    /// Create a screen
    pub fn new(name: impl Into<String>, components: Vec<Component>) -> Self {
        Self {
            name: name.into(),
            components,
        }
    }

    /// Java class name: the display name stripped to ASCII alphanumerics plus `Activity`
    pub fn activity_name(&self) -> String {
        let mut class: String = self
            .name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        class.push_str("Activity");
        class
    }

    /// Deepest component nesting on this screen (0 when empty)
    pub fn depth(&self) -> usize {
        self.components.iter().map(Component::depth).max().unwrap_or(0)
    }
}

/// A UI element
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawComponent")]
pub enum Component {
    /// Static label
    Text(TextProps),
    /// Push button
    Button(ButtonProps),
    /// Linear group of child components
    Container(Container),
    /// Single-line text entry
    Input(InputProps),
    /// Image placeholder
    Image(ImageProps),
    /// List placeholder
    List(ListProps),
    /// Embedded web content
    WebView(WebViewProps),
    /// Horizontal bar of navigation buttons
    Navigation(NavigationProps),
    /// A kind this generator does not know; carries the kind name verbatim
    Unknown(String),
}

impl Component {
    /// Text label with the given content
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(TextProps {
            content: Some(content.into()),
            ..TextProps::default()
        })
    }

    /// Button with the given label
    pub fn button(content: impl Into<String>) -> Self {
        Self::Button(ButtonProps {
            content: Some(content.into()),
            ..ButtonProps::default()
        })
    }

    /// Container laid out in `orientation`
    pub fn container(orientation: Orientation, children: Vec<Component>) -> Self {
        Self::Container(Container {
            props: ContainerProps {
                layout: orientation,
                ..ContainerProps::default()
            },
            children,
        })
    }

    /// The kind name as it appears in the `type` field
    pub fn kind(&self) -> &str {
        match self {
            Self::Text(_) => "text",
            Self::Button(_) => "button",
            Self::Container(_) => "container",
            Self::Input(_) => "input",
            Self::Image(_) => "image",
            Self::List(_) => "list",
            Self::WebView(_) => "webview",
            Self::Navigation(_) => "navigation",
            Self::Unknown(kind) => kind,
        }
    }

    /// Nesting depth: 1 for leaves, one more than the deepest child for containers
    pub fn depth(&self) -> usize {
        match self {
            Self::Container(container) => {
                1 + container.children.iter().map(Component::depth).max().unwrap_or(0)
            }
            _ => 1,
        }
    }
}

/// Container payload: its properties and ordered children
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Container {
    pub props: ContainerProps,
    pub children: Vec<Component>,
}

/// `text` properties
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextProps {
    /// Label text; `Text` when absent
    #[serde(deserialize_with = "scalar")]
    pub content: Option<String>,
    /// Passed through as `android:gravity`
    #[serde(deserialize_with = "scalar")]
    pub text_align: Option<String>,
    /// Passed through as `android:textSize`, e.g. `18sp`
    #[serde(deserialize_with = "scalar")]
    pub font_size: Option<String>,
    /// Only `bold` has an effect
    #[serde(deserialize_with = "scalar")]
    pub font_weight: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub color: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub margin: Option<String>,
}

impl TextProps {
    pub fn is_bold(&self) -> bool {
        self.font_weight.as_deref() == Some("bold")
    }
}

/// `button` properties
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonProps {
    /// Button label; `Button` when absent
    #[serde(deserialize_with = "scalar")]
    pub content: Option<String>,
    /// Rendered as `android:backgroundTint`
    #[serde(deserialize_with = "scalar")]
    pub background_color: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub color: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub margin: Option<String>,
}

/// `container` properties
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerProps {
    #[serde(deserialize_with = "orientation")]
    pub layout: Orientation,
    #[serde(deserialize_with = "scalar")]
    pub padding: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub background_color: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub margin: Option<String>,
}

/// Direction of a linear layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    /// Only the exact value `horizontal` selects a horizontal layout
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("horizontal") => Self::Horizontal,
            _ => Self::Vertical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }
}

/// `input` properties
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputProps {
    /// Hint text; `Enter text` when absent
    #[serde(deserialize_with = "scalar")]
    pub placeholder: Option<String>,
    #[serde(deserialize_with = "input_type")]
    pub input_type: InputType,
    #[serde(deserialize_with = "scalar")]
    pub margin: Option<String>,
}

/// Keyboard flavour of an input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    Email,
    Password,
    Number,
    Phone,
    #[default]
    Text,
}

impl InputType {
    /// Unrecognised names fall back to plain text
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("email") => Self::Email,
            Some("password") => Self::Password,
            Some("number") => Self::Number,
            Some("phone") => Self::Phone,
            _ => Self::Text,
        }
    }

    /// Value of `android:inputType`
    pub fn android_value(&self) -> &'static str {
        match self {
            Self::Email => "textEmailAddress",
            Self::Password => "textPassword",
            Self::Number => "number",
            Self::Phone => "phone",
            Self::Text => "text",
        }
    }
}

/// `image` properties
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageProps {
    /// Content description; `Image` when absent
    #[serde(deserialize_with = "scalar")]
    pub alt: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub margin: Option<String>,
    /// Overrides the default `wrap_content` width
    #[serde(deserialize_with = "scalar")]
    pub width: Option<String>,
    /// Overrides the default `wrap_content` height
    #[serde(deserialize_with = "scalar")]
    pub height: Option<String>,
}

/// `list` properties
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListProps {
    #[serde(deserialize_with = "scalar")]
    pub margin: Option<String>,
}

/// `webview` properties
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebViewProps {
    /// Accepted for completeness; page loading belongs in activity code and
    /// is not part of the layout
    #[serde(deserialize_with = "scalar")]
    pub url: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub margin: Option<String>,
}

/// `navigation` properties
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationProps {
    #[serde(deserialize_with = "nullable_opt_vec")]
    pub items: Option<Vec<NavItem>>,
}

impl NavigationProps {
    /// Declared items, or Home / About / Contact
    pub fn items(&self) -> Vec<NavItem> {
        match &self.items {
            Some(items) => items.clone(),
            None => vec![
                NavItem::new("Home", Some(MAIN_SCREEN_ID)),
                NavItem::new("About", None),
                NavItem::new("Contact", None),
            ],
        }
    }
}

/// One navigation bar entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawNavItem")]
pub struct NavItem {
    pub label: String,
    /// Target screen identifier
    pub screen: Option<String>,
}

impl NavItem {
    pub fn new(label: impl Into<String>, screen: Option<&str>) -> Self {
        Self {
            label: label.into(),
            screen: screen.map(String::from),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNavItem {
    Label(String),
    Entry {
        #[serde(default, deserialize_with = "scalar")]
        label: Option<String>,
        #[serde(default, deserialize_with = "scalar")]
        screen: Option<String>,
    },
}

impl From<RawNavItem> for NavItem {
    fn from(raw: RawNavItem) -> Self {
        match raw {
            RawNavItem::Label(label) => Self { label, screen: None },
            RawNavItem::Entry { label, screen } => Self {
                label: label.unwrap_or_default(),
                screen,
            },
        }
    }
}

/// Wire shape of a component before dispatch on `type`
#[derive(Deserialize)]
struct RawComponent {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    properties: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    children: Option<Vec<Component>>,
}

impl TryFrom<RawComponent> for Component {
    type Error = String;

    fn try_from(raw: RawComponent) -> Result<Self, Self::Error> {
        let kind = raw.kind.unwrap_or_else(|| "unspecified".to_string());
        let props = serde_json::Value::Object(raw.properties.unwrap_or_default());

        fn parse<T: serde::de::DeserializeOwned>(
            kind: &str,
            props: serde_json::Value,
        ) -> Result<T, String> {
            serde_json::from_value(props)
                .map_err(|e| format!("invalid properties for {} component: {}", kind, e))
        }

        let component = match kind.as_str() {
            "text" => Self::Text(parse(&kind, props)?),
            "button" => Self::Button(parse(&kind, props)?),
            "container" => Self::Container(Container {
                props: parse(&kind, props)?,
                children: raw.children.unwrap_or_default(),
            }),
            "input" => Self::Input(parse(&kind, props)?),
            "image" => Self::Image(parse(&kind, props)?),
            "list" => Self::List(parse(&kind, props)?),
            "webview" => Self::WebView(parse(&kind, props)?),
            "navigation" => Self::Navigation(parse(&kind, props)?),
            _ => Self::Unknown(kind),
        };
        Ok(component)
    }
}

/// A property value as it may arrive from a form builder
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Num(serde_json::Number),
    Bool(bool),
}

/// Accept strings, numbers and booleans as text; `null` and `""` are absent
fn scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value
        .map(|v| match v {
            Scalar::Str(s) => s,
            Scalar::Num(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        })
        .filter(|s| !s.is_empty()))
}

fn orientation<'de, D>(deserializer: D) -> Result<Orientation, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Orientation::from_name(scalar(deserializer)?.as_deref()))
}

fn input_type<'de, D>(deserializer: D) -> Result<InputType, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(InputType::from_name(scalar(deserializer)?.as_deref()))
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_opt_vec<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer)
}
