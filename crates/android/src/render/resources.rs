//! `res/values` and `res/drawable` documents

use crate::model::Project;
use crate::xml;

/// Fixed colour palette
pub const COLORS_XML: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <color name="colorPrimary">#4285F4</color>
    <color name="colorPrimaryDark">#3367D6</color>
    <color name="colorAccent">#F4B400</color>
    <color name="textColorPrimary">#212121</color>
    <color name="textColorSecondary">#757575</color>
</resources>
"##;

/// `AppTheme`, referenced from the manifest
pub const STYLES_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <style name="AppTheme" parent="Theme.AppCompat.Light.DarkActionBar">
        <item name="colorPrimary">@color/colorPrimary</item>
        <item name="colorPrimaryDark">@color/colorPrimaryDark</item>
        <item name="colorAccent">@color/colorAccent</item>
    </style>
</resources>
"#;

/// Grey box backing `@drawable/placeholder`
pub const PLACEHOLDER_XML: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<shape xmlns:android="http://schemas.android.com/apk/res/android"
    android:shape="rectangle">
    <solid android:color="#E0E0E0" />
    <size
        android:width="96dp"
        android:height="96dp" />
</shape>
"##;

/// `strings.xml`: the app name plus a `screen_<id>` entry per secondary screen
pub fn render_strings(project: &Project) -> String {
    let mut out = String::from(xml::PROLOG);
    out.push_str("<resources>\n");
    out.push_str(&format!(
        "    <string name=\"app_name\">{}</string>\n",
        xml::escape_string_resource(&project.name)
    ));

    for (id, screen) in project.secondary_screens() {
        out.push_str(&format!(
            "    <string name=\"screen_{}\">{}</string>\n",
            id,
            xml::escape_string_resource(&screen.name)
        ));
    }

    out.push_str("</resources>\n");
    out
}
