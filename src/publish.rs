//! Persistence boundary: renders the assembled tree into path-prefixed
//! items and hands them to a `Destination`. "Already exists" is expected on
//! re-runs and swallowed; everything else is fatal.

use crate::catalog::model::{Category, Component, Root};
use crate::error::{AssemblerError, Result};
use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};

/// One renderable unit: a destination-relative path plus raw content.
#[derive(Debug, Clone)]
pub struct Item {
    pub path: String,
    pub data: Vec<u8>,
}

/// Persistence collaborator. Implementations must refuse to overwrite and
/// signal `AlreadyExists` instead, so re-runs stay idempotent.
#[async_trait]
pub trait Destination: Send + Sync {
    async fn create(&self, item: &Item) -> Result<()>;
}

/// In-memory destination for development and testing.
#[derive(Default)]
pub struct InMemoryDestination {
    items: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryDestination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        let items = self.items.lock().unwrap();
        let mut paths: Vec<String> = items.keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.items.lock().unwrap().get(path).cloned()
    }
}

#[async_trait]
impl Destination for InMemoryDestination {
    async fn create(&self, item: &Item) -> Result<()> {
        let mut items = self.items.lock().unwrap();
        if items.contains_key(&item.path) {
            return Err(AssemblerError::AlreadyExists(item.path.clone()));
        }
        items.insert(item.path.clone(), item.data.clone());
        debug!("created {}", item.path);
        Ok(())
    }
}

/// File-system destination rooted at a directory. An existing file with
/// identical content is `AlreadyExists`; an existing file with different
/// content is a hard error, since silent overwrites would mask drift.
pub struct FileDestination {
    root: PathBuf,
}

impl FileDestination {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileDestination { root: root.into() }
    }
}

#[async_trait]
impl Destination for FileDestination {
    async fn create(&self, item: &Item) -> Result<()> {
        let path = self.root.join(&item.path);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        match tokio::fs::read(&path).await {
            Ok(existing) => {
                if content_key(&existing) == content_key(&item.data) {
                    Err(AssemblerError::AlreadyExists(item.path.clone()))
                } else {
                    Err(AssemblerError::Destination(format!(
                        "{} exists with different content",
                        item.path
                    )))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tokio::fs::write(&path, &item.data).await?;
                debug!("wrote {}", path.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn content_key(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Resource slugs: path and dot characters become underscores, spaces and
/// apostrophes become dashes.
pub fn make_slug(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '/' | '.' => '_',
            ' ' | '\'' => '-',
            other => other,
        })
        .collect()
}

#[derive(Debug, Default, Serialize)]
pub struct PublishStats {
    pub written: usize,
    pub skipped_existing: usize,
}

/// Renders and stores the whole tree for one locale.
#[instrument(skip(dst, root), fields(locale = %locale))]
pub async fn publish_locale(
    dst: &dyn Destination,
    locale: &str,
    root: &Root,
) -> Result<PublishStats> {
    let mut stats = PublishStats::default();
    for cat in &root.sub {
        publish_category(dst, vec![locale.to_string()], cat, &mut stats).await?;
    }
    info!(
        "published {}: {} items written, {} already present",
        locale, stats.written, stats.skipped_existing
    );
    Ok(stats)
}

fn publish_category<'a>(
    dst: &'a dyn Destination,
    prefix: Vec<String>,
    cat: &'a Category,
    stats: &'a mut PublishStats,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + Send + 'a>> {
    Box::pin(async move {
        let mut path = prefix;
        path.push(cat.id.clone());

        create_tolerant(dst, render_category(&path, cat)?, stats).await?;
        for cmp in &cat.components {
            create_tolerant(dst, render_component(&path, cmp)?, stats).await?;
        }
        for sub in &cat.sub {
            publish_category(dst, path.clone(), sub, stats).await?;
        }
        Ok(())
    })
}

/// Swallows the one expected failure mode on re-runs.
async fn create_tolerant(dst: &dyn Destination, item: Item, stats: &mut PublishStats) -> Result<()> {
    match dst.create(&item).await {
        Ok(()) => {
            stats.written += 1;
            Ok(())
        }
        Err(e) if e.is_already_exists() => {
            debug!("already exists: {}", item.path);
            stats.skipped_existing += 1;
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[derive(Serialize)]
struct CategoryHeader<'a> {
    id: &'a str,
    index: f64,
    meta: &'a crate::catalog::model::Meta,
}

fn render_category(path: &[String], cat: &Category) -> Result<Item> {
    let header = CategoryHeader { id: &cat.id, index: cat.index, meta: &cat.meta };
    let body = toml::to_string(&header)
        .map_err(|e| AssemblerError::Destination(format!("category header: {e}")))?;
    Ok(Item {
        path: format!("{}/.category.toml", path.join("/")),
        data: body.into_bytes(),
    })
}

fn render_component(path: &[String], cmp: &Component) -> Result<Item> {
    let dir = path.join("/");
    match cmp {
        Component::Segment(seg) => {
            let header = CategoryHeader { id: &seg.id, index: seg.index.value(), meta: &seg.meta };
            let front = toml::to_string(&header)
                .map_err(|e| AssemblerError::Destination(format!("segment header: {e}")))?;
            let data = format!("+++\n{front}+++\n\n{}", seg.body);
            Ok(Item {
                path: format!("{dir}/s_{}.md", make_slug(&seg.id)),
                data: data.into_bytes(),
            })
        }
        Component::Checklist(list) => Ok(Item {
            path: format!("{dir}/c_{}.json", make_slug(&list.id)),
            data: serde_json::to_vec_pretty(list)?,
        }),
        Component::Image(img) => Ok(Item {
            path: format!("{dir}/{}", img.id),
            data: img.data.clone(),
        }),
        Component::Form(form) => Ok(Item {
            path: format!("{dir}/f_{}.json", make_slug(&form.id)),
            data: serde_json::to_vec_pretty(form)?,
        }),
    }
}
