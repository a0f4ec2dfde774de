use crate::catalog::model::{Category, Component, Index, Segment};
use crate::error::{AssemblerError, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::debug;

/// Fixed bucket layout: (id, title), display index = position + 1.
pub const TOOL_BUCKETS: [(&str, &str); 6] = [
    ("messaging", "Messaging"),
    ("encryption", "Encryption"),
    ("pgp", "PGP"),
    ("tor", "Tor"),
    ("files", "Files"),
    ("other", "Other"),
];

pub const GLOSSARY_BUCKETS: [(&str, &str); 6] = [
    ("a-d", "A-D"),
    ("e-h", "E-H"),
    ("i-l", "I-L"),
    ("m-p", "M-P"),
    ("q-t", "Q-T"),
    ("u-z", "U-Z"),
];

/// Closed-world table: every publishable tool identifier and the bucket slot
/// it belongs to. Must be kept in sync with the content set by the content
/// maintainers; an id outside this table aborts the run.
static TOOL_TABLE: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for id in ["mailvelope", "obscuracam", "pidgin", "psiphon", "signal-for-android", "signal-for-ios"] {
        m.insert(id, 0);
    }
    for id in ["encrypt-your-iphone", "k9-apg", "keepassxc"] {
        m.insert(id, 1);
    }
    for id in ["pgp-for-linux", "pgp-for-mac-os-x", "pgp-for-windows"] {
        m.insert(id, 2);
    }
    for id in ["tor-for-linux", "tor-for-mac-os-x", "tor-for-windows", "orbot-and-orfox"] {
        m.insert(id, 3);
    }
    for id in ["cobian-backup", "recuva", "veracrypt"] {
        m.insert(id, 4);
    }
    for id in ["android", "facebook"] {
        m.insert(id, 5);
    }
    m
});

/// Startup check for the closed-world table: every slot must point at one of
/// the six buckets. Run once before the walk so a bad table edit fails as a
/// structural error instead of mid-assembly.
pub fn verify_tool_table() -> Result<()> {
    for (id, &slot) in TOOL_TABLE.iter() {
        if slot >= TOOL_BUCKETS.len() {
            return Err(AssemblerError::UnknownToolId {
                id: format!("{id} -> slot {slot}"),
                category_path: "tool classification table".to_string(),
            });
        }
    }
    debug!("tool table verified: {} identifiers across {} buckets", TOOL_TABLE.len(), TOOL_BUCKETS.len());
    Ok(())
}

fn install_buckets(cat: &mut Category, layout: &[(&str, &str); 6]) {
    if !cat.sub.is_empty() {
        return;
    }
    cat.sub = layout
        .iter()
        .enumerate()
        .map(|(i, (id, title))| Category::new(*id, (i + 1) as f64, *title))
        .collect();
}

/// Re-files one tools subcategory into its topical bucket. The subcategory's
/// lone segment takes over the subcategory's own title and index before the
/// tier components are spliced into the bucket.
pub fn split_tools(cat: &mut Category, mut sub: Category) -> Result<()> {
    let tier = match sub.sub.first_mut() {
        Some(t) => t,
        None => return Err(AssemblerError::EmptyCategory { id: sub.id }),
    };
    let slot = {
        let seg = match tier.components.first_mut() {
            Some(Component::Segment(s)) => s,
            _ => return Err(AssemblerError::EmptyCategory { id: sub.id }),
        };
        seg.meta = sub.meta.clone();
        seg.index = Index::Value(sub.index);
        match TOOL_TABLE.get(seg.id.as_str()) {
            Some(&slot) => slot,
            None => {
                return Err(AssemblerError::UnknownToolId {
                    id: seg.id.clone(),
                    category_path: format!("{}/{}", cat.id, sub.id),
                })
            }
        }
    };
    install_buckets(cat, &TOOL_BUCKETS);
    cat.sub[slot].components.append(&mut tier.components);
    Ok(())
}

/// Re-files one glossary subcategory's segments into the six alphabetic
/// range buckets. Within a bucket, segments keep arrival order and get a
/// fresh sequential index.
pub fn split_glossary(cat: &mut Category, mut sub: Category) -> Result<()> {
    install_buckets(cat, &GLOSSARY_BUCKETS);
    let tier = match sub.sub.first_mut() {
        Some(t) => t,
        None => return Err(AssemblerError::EmptyCategory { id: sub.id }),
    };
    for cmp in tier.components.drain(..) {
        let mut seg = match cmp {
            Component::Segment(s) => s,
            other => {
                // glossary tiers only carry segments
                debug!("glossary: skipping non-segment component {}", other.id());
                continue;
            }
        };
        let slot = glossary_slot(&seg, &cat.id)?;
        seg.index = Index::Value((cat.sub[slot].components.len() + 1) as f64);
        cat.sub[slot].components.push(Component::Segment(seg));
    }
    Ok(())
}

fn glossary_slot(seg: &Segment, category_path: &str) -> Result<usize> {
    let first = seg.id.chars().next().unwrap_or('\0');
    let slot = match first {
        'a'..='d' => 0,
        'e'..='h' => 1,
        'i'..='l' => 2,
        'm'..='p' => 3,
        'q'..='t' => 4,
        'u'..='z' => 5,
        _ => {
            return Err(AssemblerError::GlossaryOutOfRange {
                id: seg.id.clone(),
                category_path: category_path.to_string(),
            })
        }
    };
    Ok(slot)
}
