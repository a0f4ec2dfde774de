//! Legacy cross-reference rewriting and post-assembly validation.

pub mod table;

use crate::catalog::model::Root;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::warn;

/// Scheme marker carried by every in-content cross-reference.
pub const LINK_PREFIX: &str = "handbook://";

static LINK_FINDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("{LINK_PREFIX}[^)\\s]*")).expect("link regex"));

static IMG_FINDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\)]*\]\s*\(([^\)]+)\)").expect("image regex"));

/// Rewrites legacy references to their canonical paths and accumulates every
/// reference seen, deduplicated, for the post-assembly validation pass.
///
/// Rewriting never fails: a path missing from the historical table is left
/// as-is and logged, since content routinely lags the table during authoring.
#[derive(Debug, Default)]
pub struct LinkRewriter {
    seen: BTreeSet<String>,
}

impl LinkRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rewrite(&mut self, text: &str) -> String {
        LINK_FINDER
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let link = &caps[0];
                let fixed = match table::LINK_FIX.get(&link[LINK_PREFIX.len()..]) {
                    Some(canonical) => format!("{LINK_PREFIX}{canonical}"),
                    None => {
                        warn!("link not found in mapping table: {}", link);
                        link.to_string()
                    }
                };
                self.seen.insert(fixed.clone());
                fixed
            })
            .into_owned()
    }

    pub fn seen(&self) -> &BTreeSet<String> {
        &self.seen
    }

    pub fn into_seen(self) -> BTreeSet<String> {
        self.seen
    }
}

/// Image paths referenced inline from a markdown body, deduplicated by base
/// filename, in order of first appearance.
pub fn image_refs(body: &str) -> Vec<String> {
    let mut done = BTreeSet::new();
    let mut list = Vec::new();
    for caps in IMG_FINDER.captures_iter(body) {
        let name = base_name(&caps[1]).to_string();
        if done.insert(name.clone()) {
            list.push(name);
        }
    }
    list
}

fn base_name(p: &str) -> &str {
    p.rsplit('/').next().unwrap_or(p)
}

/// One reference that failed to resolve against the assembled tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedLink {
    pub link: String,
    pub segment: String,
    /// Children of the deepest category reached, for debugging.
    pub known: Vec<String>,
}

impl std::fmt::Display for UnresolvedLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: category not found: {} (known: {})",
            self.link,
            self.segment,
            self.known.join(", ")
        )
    }
}

/// Resolves every accumulated reference against the finished tree. A path
/// segment with a file extension is a terminal leaf: resolution stops there,
/// successfully, once the containing category chain has matched. Failures
/// are reported, never fatal.
pub fn check_links(root: &Root, links: &BTreeSet<String>) -> Vec<UnresolvedLink> {
    let mut unresolved = Vec::new();
    for link in links {
        let path = link.strip_prefix(LINK_PREFIX).unwrap_or(link);
        let mut children = &root.sub;
        let mut known: Vec<String> = root.child_ids();
        'segments: for part in path.split('/') {
            if Path::new(part).extension().is_some() {
                break 'segments;
            }
            match children.iter().find(|c| c.id == part) {
                Some(cat) => {
                    known = cat.child_ids();
                    children = &cat.sub;
                }
                None => {
                    unresolved.push(UnresolvedLink {
                        link: link.clone(),
                        segment: part.to_string(),
                        known,
                    });
                    break 'segments;
                }
            }
        }
    }
    unresolved
}
