//! Java activity stubs and Gradle build files
//!
//! These documents are mostly boilerplate with a few substitutions, so they
//! are kept as Handlebars templates. HTML escaping is disabled and strict mode
//! is on: a missing field fails the render instead of emitting an empty string.

use handlebars::Handlebars;
use serde_json::json;
use zeroapp_core::error::{Error, Result};

use crate::model::{layout_name, Project, Screen};

const MAIN_ACTIVITY: &str = "main_activity";
const SCREEN_ACTIVITY: &str = "screen_activity";
const ROOT_BUILD_GRADLE: &str = "root_build_gradle";
const APP_BUILD_GRADLE: &str = "app_build_gradle";

const ACTIVITY_TEMPLATE: &str = r#"package {{package}};

import android.os.Bundle;
import androidx.appcompat.app.AppCompatActivity;

/**
 * {{summary}}
 * Generated by ZeroApp Builder
 */
public class {{class_name}} extends AppCompatActivity {

    @Override
    protected void onCreate(Bundle savedInstanceState) {
        super.onCreate(savedInstanceState);
        setContentView(R.layout.{{layout}});

        // Initialize UI components
        initializeComponents();
    }

    private void initializeComponents() {
        // Component initialization will be generated here
    }
}
"#;

const ROOT_BUILD_GRADLE_TEMPLATE: &str = r#"// Top-level build file for {{name}}
buildscript {
    repositories {
        google()
        mavenCentral()
    }
    dependencies {
        classpath 'com.android.tools.build:gradle:{{agp_version}}'
    }
}

allprojects {
    repositories {
        google()
        mavenCentral()
    }
}

task clean(type: Delete) {
    delete rootProject.buildDir
}
"#;

const APP_BUILD_GRADLE_TEMPLATE: &str = r#"plugins {
    id 'com.android.application'
}

android {
    compileSdkVersion {{sdk.compile}}

    defaultConfig {
        applicationId "{{package}}"
        minSdkVersion {{sdk.min}}
        targetSdkVersion {{sdk.target}}
        versionCode 1
        versionName "{{version}}"
    }

    buildTypes {
        release {
            minifyEnabled false
            proguardFiles getDefaultProguardFile('proguard-android-optimize.txt'), 'proguard-rules.pro'
        }
    }

    compileOptions {
        sourceCompatibility JavaVersion.VERSION_1_8
        targetCompatibility JavaVersion.VERSION_1_8
    }
}

dependencies {
{{#each dependencies}}
    implementation '{{this}}'
{{/each}}
}
"#;

/// `settings.gradle`
pub const SETTINGS_GRADLE: &str = "include \":app\"\n";

/// `gradle.properties`
pub const GRADLE_PROPERTIES: &str =
    "org.gradle.jvmargs=-Xmx2048m\nandroid.useAndroidX=true\nandroid.enableJetifier=true\n";

/// Android Gradle plugin version pinned in the root build file
pub const AGP_VERSION: &str = "7.0.4";

const COMPILE_SDK: u32 = 31;
const MIN_SDK: u32 = 21;
const TARGET_SDK: u32 = 31;

const APP_DEPENDENCIES: &[&str] = &[
    "androidx.appcompat:appcompat:1.4.0",
    "com.google.android.material:material:1.4.0",
    "androidx.constraintlayout:constraintlayout:2.1.2",
];

/// Registered source templates
pub struct SourceTemplates {
    registry: Handlebars<'static>,
}

impl SourceTemplates {
    /// Compile every template
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);

        for (name, source) in [
            (MAIN_ACTIVITY, ACTIVITY_TEMPLATE),
            (SCREEN_ACTIVITY, ACTIVITY_TEMPLATE),
            (ROOT_BUILD_GRADLE, ROOT_BUILD_GRADLE_TEMPLATE),
            (APP_BUILD_GRADLE, APP_BUILD_GRADLE_TEMPLATE),
        ] {
            registry
                .register_template_string(name, source)
                .map_err(|e| Error::template(format!("Invalid template {}: {}", name, e)))?;
        }

        Ok(Self { registry })
    }

    fn render(&self, name: &str, data: &serde_json::Value) -> Result<String> {
        self.registry
            .render(name, data)
            .map_err(|e| Error::template(format!("Failed to render {}: {}", name, e)))
    }

    /// `MainActivity.java`, bound to `activity_main`
    pub fn main_activity(&self, project: &Project) -> Result<String> {
        self.render(
            MAIN_ACTIVITY,
            &json!({
                "package": project.package,
                "summary": format!("Main Activity for {}", java_comment(&project.name)),
                "class_name": "MainActivity",
                "layout": "activity_main",
            }),
        )
    }

    /// Activity stub for a secondary screen
    pub fn screen_activity(&self, project: &Project, id: &str, screen: &Screen) -> Result<String> {
        self.render(
            SCREEN_ACTIVITY,
            &json!({
                "package": project.package,
                "summary": format!("Activity for {} screen", java_comment(&screen.name)),
                "class_name": screen.activity_name(),
                "layout": layout_name(id),
            }),
        )
    }

    /// Top-level `build.gradle`
    pub fn root_build_gradle(&self, project: &Project) -> Result<String> {
        self.render(
            ROOT_BUILD_GRADLE,
            &json!({
                "name": single_line(&project.name),
                "agp_version": AGP_VERSION,
            }),
        )
    }

    /// `app/build.gradle`
    pub fn app_build_gradle(&self, project: &Project) -> Result<String> {
        self.render(
            APP_BUILD_GRADLE,
            &json!({
                "package": project.package,
                "version": gradle_string(project.version()),
                "sdk": { "compile": COMPILE_SDK, "min": MIN_SDK, "target": TARGET_SDK },
                "dependencies": APP_DEPENDENCIES,
            }),
        )
    }
}

/// Keep user text from terminating a `/** */` block
fn java_comment(text: &str) -> String {
    single_line(text).replace("*/", "*\\/")
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

fn gradle_string(text: &str) -> String {
    single_line(text).replace('\\', "\\\\").replace('"', "\\\"")
}
