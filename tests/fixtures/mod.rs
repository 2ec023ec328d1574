//! Test fixtures shared by the integration tests
//!
//! - `cave/`: a two-source story that compiles clean
//! - `broken/`: sources with reference errors and syntax errors
//! - `template.html`: a bundle template with the default placeholder

#![allow(dead_code)]

use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Sources for the cave story, in merge order
pub fn cave_sources() -> Vec<PathBuf> {
    let dir = fixtures_dir().join("cave");
    vec![dir.join("world.ini"), dir.join("hero.ini")]
}

/// Source with every kind of reference error
pub fn dangling_source() -> PathBuf {
    fixtures_dir().join("broken/dangling.ini")
}

/// Source that repeats a section header
pub fn syntax_error_source() -> PathBuf {
    fixtures_dir().join("broken/syntax.ini")
}

/// HTML template carrying the default placeholder
pub fn template_path() -> PathBuf {
    fixtures_dir().join("template.html")
}
