//! `AndroidManifest.xml`

use crate::model::Project;
use crate::xml;

/// Render the manifest: `MainActivity` is the launcher, every other screen is
/// a plain activity named after its sanitized display name
pub fn render_manifest(project: &Project) -> String {
    let mut out = String::from(xml::PROLOG);
    out.push_str("<manifest xmlns:android=\"http://schemas.android.com/apk/res/android\"\n");
    out.push_str(&format!("    package=\"{}\"\n", xml::escape(&project.package)));
    out.push_str("    android:versionCode=\"1\"\n");
    out.push_str(&format!(
        "    android:versionName=\"{}\">\n\n",
        xml::escape(project.version())
    ));

    out.push_str("    <application\n");
    out.push_str("        android:allowBackup=\"true\"\n");
    out.push_str("        android:icon=\"@mipmap/ic_launcher\"\n");
    out.push_str("        android:label=\"@string/app_name\"\n");
    out.push_str("        android:supportsRtl=\"true\"\n");
    out.push_str("        android:theme=\"@style/AppTheme\">\n\n");

    out.push_str("        <activity\n");
    out.push_str("            android:name=\".MainActivity\"\n");
    out.push_str("            android:exported=\"true\">\n");
    out.push_str("            <intent-filter>\n");
    out.push_str("                <action android:name=\"android.intent.action.MAIN\" />\n");
    out.push_str("                <category android:name=\"android.intent.category.LAUNCHER\" />\n");
    out.push_str("            </intent-filter>\n");
    out.push_str("        </activity>\n\n");

    for (_, screen) in project.secondary_screens() {
        out.push_str(&format!(
            "        <activity android:name=\".{}\" />\n\n",
            screen.activity_name()
        ));
    }

    out.push_str("    </application>\n\n");
    out.push_str("</manifest>\n");
    out
}
