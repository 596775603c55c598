//! Filesystem asset discovery.
//!
//! # Responsibilities
//! - Read files into [`Resource`]s and register them
//! - Derive uri and content type from file names
//! - Walk `static/` trees, marking `private` branches restricted
//!
//! # Design Decisions
//! - A file that cannot be read or typed is logged and skipped; siblings still register
//! - Worklist walk, no recursion
//! - Uri templates: `{0}` is the file name up to the first `.`, `{1}` the rest

use std::fs;
use std::path::{Path, PathBuf};

use crate::assets::mime::ContentType;
use crate::error::RegistrationError;
use crate::observability::metrics;
use crate::registry::{Resource, ResourceRegistry};

/// Serving options shared by every discovery mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeOptions {
    pub restricted: bool,
    pub cache_seconds: u32,
    pub compressed: bool,
}

/// Host one file at an explicit uri.
#[derive(Debug, Clone)]
pub struct HostFile {
    pub path: PathBuf,
    pub uri: String,
    pub content_type: ContentType,
    pub options: ServeOptions,
}

impl HostFile {
    pub fn new(path: impl Into<PathBuf>, uri: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            uri: uri.into(),
            content_type: ContentType::default(),
            options: ServeOptions::default(),
        }
    }
}

/// Host every file directly inside a directory.
#[derive(Debug, Clone)]
pub struct HostDir {
    pub path: PathBuf,
    /// Prefix (`<uri>/<name>`) or `{0}`/`{1}` template.
    pub uri: String,
    /// Overrides the extension-derived type for every file.
    pub content_type: Option<ContentType>,
    pub options: ServeOptions,
}

/// Host a `static/` tree.
#[derive(Debug, Clone, Default)]
pub struct HostStatic {
    pub path: PathBuf,
    /// Replaces the default `/static/<relative path>` uri.
    pub uri_template: Option<String>,
    pub cache_seconds: u32,
    pub compressed: bool,
}

/// Split `app.min.js` into `("app", "min.js")`.
fn split_name(file_name: &str) -> (&str, &str) {
    match file_name.split_once('.') {
        Some((name, ext)) => (name, ext),
        None => (file_name, ""),
    }
}

fn expand_template(template: &str, name: &str, ext: &str) -> String {
    template.replace("{0}", name).replace("{1}", ext)
}

fn read_resource(path: &Path, uri: String) -> Result<Resource, RegistrationError> {
    let data = fs::read(path).map_err(|source| RegistrationError::ResourceLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Resource::new(uri, data))
}

fn content_type_for(uri: &str, tag: &str) -> Result<ContentType, RegistrationError> {
    ContentType::from_tag(tag).ok_or_else(|| RegistrationError::UnknownContentType {
        uri: uri.to_string(),
        tag: tag.to_string(),
    })
}

fn register(registry: &mut ResourceRegistry, kind: &'static str, resource: Resource) {
    tracing::debug!(
        uri = %resource.uri,
        content_type = %resource.content_type,
        restricted = resource.restricted,
        bytes = resource.data.len(),
        "Resource registered"
    );
    metrics::record_registration(kind, "ok");
    registry.register(resource);
}

fn skip(kind: &'static str, error: &RegistrationError) {
    tracing::warn!(kind, error = %error, "Registration skipped");
    metrics::record_registration(kind, "skipped");
}

pub fn host_file(registry: &mut ResourceRegistry, input: HostFile) -> Result<(), RegistrationError> {
    let result = read_resource(&input.path, input.uri).map(|res| {
        res.with_content_type(input.content_type)
            .restricted(input.options.restricted)
            .cache_seconds(input.options.cache_seconds)
            .compressed(input.options.compressed)
    });

    match result {
        Ok(resource) => {
            register(registry, "file", resource);
            Ok(())
        }
        Err(e) => {
            skip("file", &e);
            Err(e)
        }
    }
}

/// Register each regular file in `input.path`. Returns how many were registered.
pub fn host_dir(registry: &mut ResourceRegistry, input: HostDir) -> Result<usize, RegistrationError> {
    let entries = fs::read_dir(&input.path).map_err(|source| {
        let e = RegistrationError::ResourceLoad {
            path: input.path.clone(),
            source,
        };
        skip("dir", &e);
        e
    })?;

    let mut count = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let (name, ext) = split_name(&file_name);

        let uri = if input.uri.contains('{') {
            expand_template(&input.uri, name, ext)
        } else {
            format!("{}/{}", input.uri.trim_end_matches('/'), name)
        };

        let typed = match input.content_type {
            Some(ty) => Ok(ty),
            None => content_type_for(&uri, ext),
        };
        let result = typed.and_then(|ty| {
            read_resource(&path, uri).map(|res| {
                res.with_content_type(ty)
                    .restricted(input.options.restricted)
                    .cache_seconds(input.options.cache_seconds)
                    .compressed(input.options.compressed)
            })
        });

        match result {
            Ok(resource) => {
                register(registry, "dir", resource);
                count += 1;
            }
            Err(e) => skip("dir", &e),
        }
    }

    tracing::info!(path = ?input.path, count, "Directory hosted");
    Ok(count)
}

/// Walk every sub-directory of a `static` root. Returns how many files were registered.
pub fn host_static(registry: &mut ResourceRegistry, input: HostStatic) -> Result<usize, RegistrationError> {
    if !input.path.ends_with("static") {
        let e = RegistrationError::NotStaticRoot(input.path.clone());
        skip("static", &e);
        return Err(e);
    }

    let top = fs::read_dir(&input.path).map_err(|source| {
        let e = RegistrationError::ResourceLoad {
            path: input.path.clone(),
            source,
        };
        skip("static", &e);
        e
    })?;

    // Top-level files are not served; only folders are walked.
    let mut pending: Vec<PathBuf> = top
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();

    let mut count = 0;
    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) => {
                skip("static", &RegistrationError::ResourceLoad { path: dir, source });
                continue;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().into_owned();
            if file_name.starts_with("tsconfig") {
                continue;
            }
            let (name, ext) = split_name(&file_name);

            let relative = path
                .strip_prefix(&input.path)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            let uri = match &input.uri_template {
                Some(template) => expand_template(template, name, ext),
                None => format!("/static/{}", relative),
            };
            // Only the folders count; a file named `private-*` stays public.
            let restricted = dir
                .strip_prefix(&input.path)
                .unwrap_or(&dir)
                .to_string_lossy()
                .contains("private");

            let result = content_type_for(&uri, ext).and_then(|ty| {
                read_resource(&path, uri).map(|res| {
                    res.with_content_type(ty)
                        .restricted(restricted)
                        .cache_seconds(input.cache_seconds)
                        .compressed(input.compressed)
                })
            });

            match result {
                Ok(resource) => {
                    register(registry, "static", resource);
                    count += 1;
                }
                Err(e) => skip("static", &e),
            }
        }
    }

    tracing::info!(path = ?input.path, count, "Static tree hosted");
    Ok(count)
}
