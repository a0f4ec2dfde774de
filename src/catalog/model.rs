use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered metadata map attached to categories and components.
pub type Meta = BTreeMap<String, String>;

/// Display index of a component.
///
/// Segments under re-bucketed categories are created `Unassigned` and only
/// receive their final position in a later renumbering pass, once bucket
/// classification has settled the emission order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Index {
    Unassigned,
    Value(f64),
}

impl Index {
    pub fn value(&self) -> f64 {
        match self {
            Index::Unassigned => 0.0,
            Index::Value(v) => *v,
        }
    }

    pub fn is_unassigned(&self) -> bool {
        matches!(self, Index::Unassigned)
    }
}

/// Fixed difficulty tiers, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Advanced,
    Expert,
}

impl Difficulty {
    /// Parse a source tier identifier. Unknown identifiers are not an error:
    /// they keep index 0 and sort first.
    pub fn parse(id: &str) -> Option<Self> {
        match id {
            "beginner" => Some(Difficulty::Beginner),
            "advanced" => Some(Difficulty::Advanced),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            Difficulty::Beginner => 1.0,
            Difficulty::Advanced => 2.0,
            Difficulty::Expert => 3.0,
        }
    }
}

/// A named node in the content tree. May carry components and/or
/// sub-categories. Sibling ids are unique; `index` drives display order only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub index: f64,
    pub meta: Meta,
    pub components: Vec<Component>,
    pub sub: Vec<Category>,
}

impl Category {
    pub fn new(id: impl Into<String>, index: f64, title: impl Into<String>) -> Self {
        let mut meta = Meta::new();
        meta.insert("title".to_string(), title.into());
        Category {
            id: id.into(),
            index,
            meta,
            components: Vec::new(),
            sub: Vec::new(),
        }
    }

    pub fn child(&self, id: &str) -> Option<&Category> {
        self.sub.iter().find(|c| c.id == id)
    }

    /// Ids of direct sub-categories, for diagnostics.
    pub fn child_ids(&self) -> Vec<String> {
        self.sub.iter().map(|c| c.id.clone()).collect()
    }
}

/// The assembled tree for one locale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Root {
    pub sub: Vec<Category>,
}

impl Root {
    pub fn child(&self, id: &str) -> Option<&Category> {
        self.sub.iter().find(|c| c.id == id)
    }

    pub fn child_ids(&self) -> Vec<String> {
        self.sub.iter().map(|c| c.id.clone()).collect()
    }
}

/// A typed leaf attached to a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Component {
    Segment(Segment),
    Checklist(Checklist),
    Image(Image),
    Form(Form),
}

impl Component {
    pub fn id(&self) -> &str {
        match self {
            Component::Segment(s) => &s.id,
            Component::Checklist(c) => &c.id,
            Component::Image(i) => &i.id,
            Component::Form(f) => &f.id,
        }
    }
}

/// A titled text-body component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub index: Index,
    pub meta: Meta,
    pub body: String,
}

/// An ordered list of checkable/label entries, possibly nested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checklist {
    pub id: String,
    pub index: f64,
    pub entries: Vec<CheckEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckEntry {
    pub text: String,
    /// A non-checkable heading rather than a checkable item.
    pub label: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CheckEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub data: Vec<u8>,
}

/// A standalone form: ordered screens of typed items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    pub id: String,
    pub meta: Meta,
    pub screens: Vec<FormScreen>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormScreen {
    pub meta: Meta,
    pub items: Vec<FormItem>,
}

/// A single form field. Type-specific fields (options, lines, hint, label)
/// live in the free-form metadata map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormItem {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub meta: serde_json::Map<String, serde_json::Value>,
}
