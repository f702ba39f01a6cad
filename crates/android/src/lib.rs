//! Android project generation for ZeroApp Builder
//!
//! This crate turns a JSON app description into an Android Gradle project:
//! - [`model`]: the project description and its closed set of UI components
//! - [`render`]: layout, manifest, resource and source documents
//! - [`validate`]: checks run before anything is written
//! - [`keystore`]: `keytool` signing keystores, with a placeholder fallback
//! - [`package`]: the mock APK zip
//! - [`pipeline`]: all of the above as one build
//!
//! # Example
//!
//! ```rust
//! use zeroapp_android::model::{Component, Project, Screen};
//! use zeroapp_android::render::Renderer;
//!
//! let project = Project::new("Hello", "com.example.hello")
//!     .with_screen("mainScreen", Screen::new("Home", vec![Component::text("Hi")]));
//!
//! let rendered = Renderer::new().unwrap().render(&project).unwrap();
//! assert!(rendered.layouts["activity_main"].contains("android:text=\"Hi\""));
//! ```

#![warn(clippy::all)]

pub mod keystore;
pub mod model;
pub mod package;
pub mod pipeline;
pub mod render;
pub mod validate;
pub mod writer;
pub mod xml;

pub use keystore::{KeystoreGenerator, KeystoreOutcome};
pub use model::{Component, Project, Screen};
pub use pipeline::{ApkBuilder, BuildOutcome, BuildRequest};
pub use render::{render_component, Renderer};
