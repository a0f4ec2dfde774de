use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A top-level category or subcategory as exposed by the content repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub id: String,
    pub name: String,
}

/// A difficulty tier as exposed by the content repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierEntry {
    pub id: String,
    #[serde(default)]
    pub description: String,
}

/// A single lesson item: title plus markdown body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEntry {
    pub id: String,
    pub title: String,
    pub body: String,
}

/// One checklist entry from the source, before link rewriting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckEntrySource {
    pub text: String,
    #[serde(default)]
    pub no_check: bool,
}

/// A named form definition: screens of typed items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSource {
    pub id: String,
    pub name: String,
    pub screens: Vec<ScreenSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenSource {
    pub name: String,
    pub items: Vec<FormItemSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormItemSource {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub lines: u32,
    #[serde(default)]
    pub hint: String,
    #[serde(default)]
    pub label: String,
}

/// Content-reading collaborator. Exposes one locale's worth of ordered raw
/// content; how it got there (git, disk, an export) is not this crate's
/// concern. All lists preserve source order.
pub trait ContentSource: Send + Sync {
    fn categories(&self, locale: &str) -> Vec<CategoryEntry>;
    fn subcategories(&self, locale: &str, category: &str) -> Vec<CategoryEntry>;
    fn tiers(&self, locale: &str, category: &str, subcategory: &str) -> Vec<TierEntry>;
    fn items(&self, locale: &str, category: &str, subcategory: &str, tier: &str)
        -> Vec<ItemEntry>;
    fn checks(&self, locale: &str, category: &str, subcategory: &str, tier: &str)
        -> Vec<CheckEntrySource>;
    fn forms(&self, locale: &str) -> Vec<FormSource>;
    /// Named binary asset (icons, inline images). `None` when missing.
    fn asset(&self, name: &str) -> Option<Vec<u8>>;
}

/// In-memory content snapshot, deserializable from a JSON export. Used by
/// the CLI (fed a snapshot file) and throughout the tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemorySource {
    #[serde(default)]
    pub locales: HashMap<String, LocaleContent>,
    #[serde(default)]
    pub assets: HashMap<String, Vec<u8>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocaleContent {
    pub categories: Vec<CategoryContent>,
    #[serde(default)]
    pub forms: Vec<FormSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryContent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<SubcategoryContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubcategoryContent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tiers: Vec<TierContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierContent {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub items: Vec<ItemEntry>,
    #[serde(default)]
    pub checks: Vec<CheckEntrySource>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(data: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn add_asset(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.assets.insert(name.into(), data);
    }

    fn locale(&self, locale: &str) -> Option<&LocaleContent> {
        self.locales.get(locale)
    }

    fn subcategory(&self, locale: &str, category: &str, sub: &str) -> Option<&SubcategoryContent> {
        self.locale(locale)?
            .categories
            .iter()
            .find(|c| c.id == category)?
            .subcategories
            .iter()
            .find(|s| s.id == sub)
    }

    fn tier(&self, locale: &str, category: &str, sub: &str, tier: &str) -> Option<&TierContent> {
        self.subcategory(locale, category, sub)?
            .tiers
            .iter()
            .find(|t| t.id == tier)
    }
}

impl ContentSource for InMemorySource {
    fn categories(&self, locale: &str) -> Vec<CategoryEntry> {
        self.locale(locale)
            .map(|l| {
                l.categories
                    .iter()
                    .map(|c| CategoryEntry { id: c.id.clone(), name: c.name.clone() })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn subcategories(&self, locale: &str, category: &str) -> Vec<CategoryEntry> {
        self.locale(locale)
            .and_then(|l| l.categories.iter().find(|c| c.id == category))
            .map(|c| {
                c.subcategories
                    .iter()
                    .map(|s| CategoryEntry { id: s.id.clone(), name: s.name.clone() })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn tiers(&self, locale: &str, category: &str, subcategory: &str) -> Vec<TierEntry> {
        self.subcategory(locale, category, subcategory)
            .map(|s| {
                s.tiers
                    .iter()
                    .map(|t| TierEntry { id: t.id.clone(), description: t.description.clone() })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn items(
        &self,
        locale: &str,
        category: &str,
        subcategory: &str,
        tier: &str,
    ) -> Vec<ItemEntry> {
        self.tier(locale, category, subcategory, tier)
            .map(|t| t.items.clone())
            .unwrap_or_default()
    }

    fn checks(
        &self,
        locale: &str,
        category: &str,
        subcategory: &str,
        tier: &str,
    ) -> Vec<CheckEntrySource> {
        self.tier(locale, category, subcategory, tier)
            .map(|t| t.checks.clone())
            .unwrap_or_default()
    }

    fn forms(&self, locale: &str) -> Vec<FormSource> {
        self.locale(locale).map(|l| l.forms.clone()).unwrap_or_default()
    }

    fn asset(&self, name: &str) -> Option<Vec<u8>> {
        self.assets.get(name).cloned()
    }
}
