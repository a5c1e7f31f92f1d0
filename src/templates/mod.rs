//! # Template Cache
//!
//! Every page is compiled once at startup into its own template set:
//!
//! ```text
//! html/base.html            shared layout, defines the blocks pages fill in
//! html/partials/*.html      shared fragments, included by the layout
//! html/pages/<page>.html    one page body, `{% extends "base.html" %}`
//! ```
//!
//! The cache maps the page file name (`"home.html"`) to a `minijinja`
//! environment holding exactly those templates plus the custom functions from
//! [`functions`]. It is immutable after construction and shared behind an
//! `Arc`, so concurrent requests read it without locking.
//!
//! ## Rendering
//! [`TemplateCache::render`] executes the page into a `String` before
//! anything is written to the response. A failing template therefore turns
//! into a clean 500 instead of a half-written page.

pub mod data;
pub mod functions;

pub use data::TemplateData;

use crate::error::{AppError, AppResult};
use anyhow::{bail, Context};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use minijinja::Environment;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const BASE_LAYOUT: &str = "base.html";
const PARTIALS_DIR: &str = "partials";
const PAGES_DIR: &str = "pages";

pub struct TemplateCache {
    sets: HashMap<String, Environment<'static>>,
}

impl TemplateCache {
    /// Discover and compile every page template under `dir`
    ///
    /// # Errors
    /// Fails if the layout is missing, a file cannot be read, or any template
    /// does not compile. There is no partially built cache.
    pub fn new(dir: &Path) -> anyhow::Result<Self> {
        let base = read_template(&dir.join(BASE_LAYOUT))?;

        let mut partials = Vec::new();
        for path in html_files(&dir.join(PARTIALS_DIR))? {
            let name = format!("{}/{}", PARTIALS_DIR, file_name(&path)?);
            partials.push((name, read_template(&path)?));
        }

        let mut sets = HashMap::new();
        for path in html_files(&dir.join(PAGES_DIR))? {
            let name = file_name(&path)?;
            let page = read_template(&path)?;

            let mut env = Environment::new();
            functions::register(&mut env);
            env.add_template_owned(BASE_LAYOUT, base.clone())
                .with_context(|| format!("compiling {} for page {}", BASE_LAYOUT, name))?;
            for (partial_name, source) in &partials {
                env.add_template_owned(partial_name.clone(), source.clone())
                    .with_context(|| format!("compiling {} for page {}", partial_name, name))?;
            }
            env.add_template_owned(name.clone(), page)
                .with_context(|| format!("compiling page {}", name))?;

            tracing::debug!("Compiled template set {}", name);
            sets.insert(name, env);
        }

        if sets.is_empty() {
            bail!("no page templates found in {}", dir.join(PAGES_DIR).display());
        }

        Ok(Self { sets })
    }

    /// Fail unless every page in `pages` was compiled
    pub fn ensure_pages(&self, pages: &[&str]) -> anyhow::Result<()> {
        let missing: Vec<&str> = pages
            .iter()
            .copied()
            .filter(|page| !self.contains(page))
            .collect();

        if !missing.is_empty() {
            bail!("missing page templates: {}", missing.join(", "));
        }
        Ok(())
    }

    pub fn contains(&self, page: &str) -> bool {
        self.sets.contains_key(page)
    }

    pub fn pages(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Render `page` with `data` and respond with `status`
    pub fn render<T: Serialize>(&self, status: StatusCode, page: &str, data: &T) -> AppResult<Response> {
        let env = self
            .sets
            .get(page)
            .ok_or_else(|| AppError::Internal(format!("the template {} does not exist", page)))?;

        // Buffer first: nothing reaches the client unless rendering succeeded
        let body = env.get_template(page)?.render(data)?;

        Ok((status, Html(body)).into_response())
    }
}

fn html_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("html") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_template(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading template {}", path.display()))
}

fn file_name(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
        .with_context(|| format!("invalid template file name {}", path.display()))
}
