//! Project validation
//!
//! Errors reject the project outright; warnings describe output that will be
//! generated but is probably not what the author meant.

use std::collections::BTreeMap;
use zeroapp_core::validation::{ValidationResult, Validator};

use crate::model::{Project, MAIN_SCREEN_ID};

/// Reverse-domain application id
pub const PACKAGE_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$";

/// Screen identifiers end up in file and resource names
pub const SCREEN_ID_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_]*$";

/// Activity class generated for the entry screen
const MAIN_ACTIVITY: &str = "MainActivity";

/// Check a project before rendering it
pub fn validate_project(project: &Project, max_depth: usize) -> ValidationResult {
    let mut validator = Validator::new()
        .required("name", &project.name)
        .required("package", &project.package)
        .pattern("package", &project.package, PACKAGE_PATTERN, "a reverse-domain identifier such as com.example.app")
        .custom("screens", || {
            (!project.screens.contains_key(MAIN_SCREEN_ID))
                .then(|| format!("A screen with id \"{}\" is required", MAIN_SCREEN_ID))
        })
        .warn_if(
            "version",
            semver::Version::parse(project.version()).is_err(),
            "Version is not of the form x.y.z",
        );

    for id in project.screens.keys() {
        validator = validator.pattern(
            &format!("screens.{}", id),
            id,
            SCREEN_ID_PATTERN,
            "a letter followed by letters, digits or underscores",
        );
    }

    let mut classes: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for (id, screen) in project.secondary_screens() {
        let class = screen.activity_name();
        let field = format!("screens.{}.name", id);
        validator = validator
            .warn_if(
                &field,
                class == "Activity",
                "Screen name has no letters or digits; its activity will be named \"Activity\"",
            )
            .custom(&field, || {
                (class == MAIN_ACTIVITY).then(|| {
                    format!(
                        "Screen name \"{}\" maps to {}, which belongs to the main screen",
                        screen.name, MAIN_ACTIVITY
                    )
                })
            });
        classes.entry(class).or_default().push(id);
    }
    for (class, ids) in &classes {
        validator = validator.warn_if(
            "screens",
            ids.len() > 1,
            &format!("Screens {} all map to activity {}", ids.join(", "), class),
        );
    }

    for (id, screen) in &project.screens {
        let depth = screen.depth();
        validator = validator.warn_if(
            &format!("screens.{}.components", id),
            depth > max_depth,
            &format!(
                "Components nest {} levels deep; anything past level {} is omitted",
                depth, max_depth
            ),
        );
    }

    validator.validate()
}
