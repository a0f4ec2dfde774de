use crate::catalog::buckets;
use crate::catalog::model::{
    Category, CheckEntry, Checklist, Component, Difficulty, Form, FormItem, FormScreen, Image,
    Index, Meta, Root, Segment,
};
use crate::catalog::source::{ContentSource, FormSource};
use crate::error::Result;
use crate::links::{self, LinkRewriter};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// Reserved top-level category identifiers with special restructuring rules.
pub const ABOUT_CATEGORY: &str = "about";
pub const TOOLS_CATEGORY: &str = "tools";
pub const GLOSSARY_CATEGORY: &str = "glossary";
pub const FORMS_CATEGORY: &str = "forms";

/// Checklists always sort after every segment in a tier.
const CHECKLIST_INDEX: f64 = 100.0;

#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    pub split_tools: bool,
    pub split_glossary: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions { split_tools: true, split_glossary: false }
    }
}

/// Per-locale summary of one assembly run.
#[derive(Debug, Serialize)]
pub struct BuildReport {
    pub locale: String,
    pub categories: usize,
    pub segments: usize,
    pub checklists: usize,
    pub images: usize,
    pub forms: usize,
    pub missing_icons: Vec<String>,
    pub missing_images: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// The finished tree for one locale, together with the accumulated
/// cross-reference set and the run summary.
#[derive(Debug)]
pub struct AssembledLocale {
    pub locale: String,
    pub root: Root,
    pub links: BTreeSet<String>,
    pub report: BuildReport,
}

/// Walks one locale of the flat content repository and assembles the
/// ordered category tree, applying the per-category restructuring rules.
pub struct CatalogBuilder<'a, S: ContentSource> {
    source: &'a S,
    options: BuildOptions,
}

impl<'a, S: ContentSource> CatalogBuilder<'a, S> {
    pub fn new(source: &'a S, options: BuildOptions) -> Self {
        CatalogBuilder { source, options }
    }

    #[instrument(skip(self), fields(locale = %locale))]
    pub fn build_locale(&self, locale: &str) -> Result<AssembledLocale> {
        buckets::verify_tool_table()?;
        let started_at = Utc::now();
        let mut rewriter = LinkRewriter::new();
        let mut report = BuildReport {
            locale: locale.to_string(),
            categories: 0,
            segments: 0,
            checklists: 0,
            images: 0,
            forms: 0,
            missing_icons: Vec::new(),
            missing_images: Vec::new(),
            started_at,
            finished_at: started_at,
        };

        let mut root = Root::default();
        for (i, entry) in self.source.categories(locale).iter().enumerate() {
            let cat = self.build_category(locale, &entry.id, &entry.name, i, &mut rewriter, &mut report)?;
            root.sub.push(cat);
        }
        root.sub.push(self.build_forms(locale, &mut report));

        assign_pending_indices(&mut root);

        report.categories = root.sub.len();
        report.finished_at = Utc::now();
        info!(
            "assembled {}: {} categories, {} segments, {} images",
            locale, report.categories, report.segments, report.images
        );

        Ok(AssembledLocale {
            locale: locale.to_string(),
            root,
            links: rewriter.into_seen(),
            report,
        })
    }

    fn build_category(
        &self,
        locale: &str,
        id: &str,
        name: &str,
        position: usize,
        rewriter: &mut LinkRewriter,
        report: &mut BuildReport,
    ) -> Result<Category> {
        let mut cat = Category::new(id, (position + 1) as f64, name);
        self.attach_icon(&mut cat, None, report);
        if cat.id == GLOSSARY_CATEGORY {
            cat.meta.insert("template".to_string(), "glossary".to_string());
        }

        for (i, sentry) in self.source.subcategories(locale, id).iter().enumerate() {
            let mut sub = Category::new(&sentry.id, (i + 1) as f64, &sentry.name);
            self.attach_icon(&mut sub, Some(&cat), report);

            for tier in self.source.tiers(locale, id, &sentry.id) {
                let diff =
                    self.build_tier(locale, &cat.id, &sentry.id, &tier.id, &tier.description, rewriter, report);
                sub.sub.push(diff);
            }

            match cat.id.as_str() {
                ABOUT_CATEGORY => {
                    // single expected tier; its components are spliced
                    // directly into the category, no wrapper node
                    if let Some(mut tier) = sub.sub.into_iter().next() {
                        cat.components.append(&mut tier.components);
                    }
                }
                TOOLS_CATEGORY => {
                    if self.options.split_tools {
                        buckets::split_tools(&mut cat, sub)?;
                        continue;
                    }
                    splice_promoted(&mut cat, sub);
                }
                GLOSSARY_CATEGORY => {
                    if self.options.split_glossary {
                        buckets::split_glossary(&mut cat, sub)?;
                        continue;
                    }
                    splice_renumbered(&mut cat, sub);
                }
                _ => cat.sub.push(sub),
            }
        }
        Ok(cat)
    }

    fn build_tier(
        &self,
        locale: &str,
        category: &str,
        subcategory: &str,
        tier: &str,
        description: &str,
        rewriter: &mut LinkRewriter,
        report: &mut BuildReport,
    ) -> Category {
        // unknown tiers keep index 0 and sort first
        let index = Difficulty::parse(tier).map(|d| d.weight()).unwrap_or(0.0);
        let mut diff = Category::new(tier, index, capitalize(tier));
        diff.meta.insert("description".to_string(), description.to_string());

        for (i, item) in self.source.items(locale, category, subcategory, tier).iter().enumerate() {
            let id = strip_variant_suffix(&item.id);
            // repair broken markdown link syntax before scanning
            let body = item.body.replace("] (", "](");
            let body = rewriter.rewrite(&body);

            let index = if category == TOOLS_CATEGORY || category == GLOSSARY_CATEGORY {
                // true order is only known after bucket classification
                Index::Unassigned
            } else {
                Index::Value((i + 1) as f64)
            };
            let mut meta = Meta::new();
            meta.insert("title".to_string(), item.title.clone());
            diff.components.push(Component::Segment(Segment {
                id: id.to_string(),
                index,
                meta,
                body: body.clone(),
            }));
            report.segments += 1;

            diff.components.extend(self.inline_images(&item.id, &body, report));
        }

        let checks = self.source.checks(locale, category, subcategory, tier);
        if !checks.is_empty() {
            let entries = checks
                .into_iter()
                .map(|c| CheckEntry {
                    text: rewriter.rewrite(&c.text),
                    label: c.no_check,
                    children: Vec::new(),
                })
                .collect();
            diff.components.push(Component::Checklist(Checklist {
                id: "checklist".to_string(),
                index: CHECKLIST_INDEX,
                entries,
            }));
            report.checklists += 1;
        }
        diff
    }

    /// Icon lookup by filename convention: `<id>.png`, or
    /// `<parent>_<id>.png` for subcategories. Missing icons are logged and
    /// skipped.
    fn attach_icon(&self, cat: &mut Category, parent: Option<&Category>, report: &mut BuildReport) {
        let name = match parent {
            Some(p) => format!("{}_{}.png", p.id, cat.id),
            None => format!("{}.png", cat.id),
        };
        match self.source.asset(&name) {
            Some(data) => {
                cat.meta.insert("icon".to_string(), name.clone());
                cat.components.push(Component::Image(Image { id: name, data }));
            }
            None => {
                warn!("icon not found: {}", name);
                report.missing_icons.push(name);
            }
        }
    }

    /// Image components for every inline image reference the body carries.
    /// Unresolvable references are logged and omitted.
    fn inline_images(&self, item_id: &str, body: &str, report: &mut BuildReport) -> Vec<Component> {
        let mut list = Vec::new();
        for name in links::image_refs(body) {
            match self.source.asset(&name) {
                Some(data) => {
                    list.push(Component::Image(Image { id: name, data }));
                    report.images += 1;
                }
                None => {
                    warn!("image not found: {} (referenced by {})", name, item_id);
                    report.missing_images.push(name);
                }
            }
        }
        list
    }

    fn build_forms(&self, locale: &str, report: &mut BuildReport) -> Category {
        let mut cat = Category {
            id: FORMS_CATEGORY.to_string(),
            index: 0.0,
            meta: Meta::new(),
            components: Vec::new(),
            sub: Vec::new(),
        };
        for form in self.source.forms(locale) {
            cat.components.push(Component::Form(convert_form(form)));
            report.forms += 1;
        }
        debug!("built forms category with {} forms", report.forms);
        cat
    }
}

/// Non-split tools rule: the lone segment takes the subcategory's own title
/// and index, then the first tier's components are spliced into the parent.
fn splice_promoted(cat: &mut Category, mut sub: Category) {
    let Some(mut tier) = sub.sub.drain(..).next() else { return };
    if let Some(Component::Segment(seg)) = tier.components.first_mut() {
        seg.meta = sub.meta.clone();
        seg.index = Index::Value(sub.index);
    }
    cat.components.append(&mut tier.components);
}

/// Non-split glossary rule: splice the first tier's components into the
/// parent, renumbering every segment sequentially from 1.
fn splice_renumbered(cat: &mut Category, mut sub: Category) {
    let Some(tier) = sub.sub.drain(..).next() else { return };
    let mut idx = 1.0;
    for mut cmp in tier.components {
        if let Component::Segment(seg) = &mut cmp {
            seg.index = Index::Value(idx);
            idx += 1.0;
        }
        cat.components.push(cmp);
    }
}

/// Second phase of the two-phase indexing: walk every category in emission
/// order and replace `Index::Unassigned` with the next counter value,
/// leaving already-assigned indices untouched.
fn assign_pending_indices(root: &mut Root) {
    for cat in &mut root.sub {
        assign_category(cat);
    }
}

fn assign_category(cat: &mut Category) {
    let mut counter = 1.0;
    for cmp in &mut cat.components {
        if let Component::Segment(seg) = cmp {
            if seg.index.is_unassigned() {
                seg.index = Index::Value(counter);
                counter += 1.0;
            }
        }
    }
    for sub in &mut cat.sub {
        assign_category(sub);
    }
}

fn convert_form(src: FormSource) -> Form {
    let mut meta = Meta::new();
    meta.insert("title".to_string(), src.name);
    let screens = src
        .screens
        .into_iter()
        .map(|s| {
            let mut meta = Meta::new();
            meta.insert("title".to_string(), s.name);
            let items = s.items.into_iter().map(convert_form_item).collect();
            FormScreen { meta, items }
        })
        .collect();
    Form { id: src.id, meta, screens }
}

fn convert_form_item(src: crate::catalog::source::FormItemSource) -> FormItem {
    let mut meta = serde_json::Map::new();
    if !src.options.is_empty() {
        let options: Vec<serde_json::Value> = src
            .options
            .iter()
            .map(|o| {
                let o = o.trim();
                serde_json::json!({ "value": o, "label": o })
            })
            .collect();
        meta.insert("options".to_string(), serde_json::Value::Array(options));
    }
    if src.lines != 0 {
        meta.insert("lines".to_string(), serde_json::json!(src.lines));
    }
    if !src.hint.is_empty() {
        meta.insert("hint".to_string(), serde_json::json!(src.hint));
    }
    if !src.label.is_empty() {
        meta.insert("label".to_string(), serde_json::json!(src.label));
    }
    FormItem { name: src.name, item_type: src.item_type, meta }
}

/// Language-variant suffixes ("-0"/"-1") are an authoring artifact, not part
/// of the canonical item id.
fn strip_variant_suffix(id: &str) -> &str {
    if id.ends_with("-0") || id.ends_with("-1") {
        &id[..id.len() - 2]
    } else {
        id
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::source::{
        CategoryContent, CheckEntrySource, InMemorySource, ItemEntry, LocaleContent,
        SubcategoryContent, TierContent,
    };

    fn item(id: &str, title: &str, body: &str) -> ItemEntry {
        ItemEntry { id: id.to_string(), title: title.to_string(), body: body.to_string() }
    }

    fn tier(id: &str, items: Vec<ItemEntry>) -> TierContent {
        TierContent {
            id: id.to_string(),
            description: format!("{id} lessons"),
            items,
            checks: Vec::new(),
        }
    }

    fn subcategory(id: &str, name: &str, tiers: Vec<TierContent>) -> SubcategoryContent {
        SubcategoryContent { id: id.to_string(), name: name.to_string(), tiers }
    }

    fn category(id: &str, name: &str, subs: Vec<SubcategoryContent>) -> CategoryContent {
        CategoryContent { id: id.to_string(), name: name.to_string(), subcategories: subs }
    }

    fn source_with(categories: Vec<CategoryContent>) -> InMemorySource {
        let mut src = InMemorySource::new();
        src.locales.insert(
            "en".to_string(),
            LocaleContent { categories, forms: Vec::new() },
        );
        src
    }

    fn segments_of(cat: &Category) -> Vec<&Segment> {
        cat.components
            .iter()
            .filter_map(|c| match c {
                Component::Segment(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn about_category_collapses_subcategory_wrapper() {
        let src = source_with(vec![category(
            "about",
            "About",
            vec![subcategory(
                "intro",
                "Intro",
                vec![tier("beginner", vec![item("hello", "Hello", "hi"), item("bye", "Bye", "bye")])],
            )],
        )]);
        let built = CatalogBuilder::new(&src, BuildOptions::default())
            .build_locale("en")
            .unwrap();
        let about = built.root.child("about").unwrap();
        assert!(about.sub.is_empty(), "no wrapper node expected");
        let segs = segments_of(about);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].id, "hello");
        assert_eq!(segs[1].id, "bye");
    }

    #[test]
    fn default_category_keeps_subcategory_node() {
        let src = source_with(vec![category(
            "travel",
            "Travel",
            vec![subcategory(
                "borders",
                "Borders",
                vec![tier("beginner", vec![item("basics", "Basics", "b")])],
            )],
        )]);
        let built = CatalogBuilder::new(&src, BuildOptions::default())
            .build_locale("en")
            .unwrap();
        let travel = built.root.child("travel").unwrap();
        let borders = travel.child("borders").unwrap();
        assert_eq!(borders.index, 1.0);
        let beginner = borders.child("beginner").unwrap();
        assert_eq!(beginner.index, 1.0);
        assert_eq!(beginner.meta.get("title").unwrap(), "Beginner");
        assert_eq!(beginner.meta.get("description").unwrap(), "beginner lessons");
        assert_eq!(segments_of(beginner).len(), 1);
    }

    #[test]
    fn unknown_tier_gets_index_zero() {
        let src = source_with(vec![category(
            "travel",
            "Travel",
            vec![subcategory(
                "borders",
                "Borders",
                vec![tier("intro", vec![]), tier("expert", vec![])],
            )],
        )]);
        let built = CatalogBuilder::new(&src, BuildOptions::default())
            .build_locale("en")
            .unwrap();
        let borders = built.root.child("travel").unwrap().child("borders").unwrap();
        assert_eq!(borders.child("intro").unwrap().index, 0.0);
        assert_eq!(borders.child("expert").unwrap().index, 3.0);
    }

    #[test]
    fn split_tools_buckets_carry_subcategory_indices() {
        let subs = ["signal-for-android", "pidgin", "veracrypt"]
            .iter()
            .map(|id| {
                subcategory(id, id, vec![tier("beginner", vec![item(id, id, "body")])])
            })
            .collect();
        let src = source_with(vec![category("tools", "Tools", subs)]);
        let built = CatalogBuilder::new(&src, BuildOptions { split_tools: true, split_glossary: false })
            .build_locale("en")
            .unwrap();
        let tools = built.root.child("tools").unwrap();
        let messaging = tools.child("messaging").unwrap();
        // promoted segments keep their subcategory's source position
        let indices: Vec<f64> = segments_of(messaging).iter().map(|s| s.index.value()).collect();
        assert_eq!(indices, vec![1.0, 2.0]);
        let files = tools.child("files").unwrap();
        assert_eq!(segments_of(files)[0].index.value(), 3.0);
    }

    #[test]
    fn pending_indices_assigned_in_emission_order_without_gaps() {
        let mut cat = Category::new("tools", 1.0, "Tools");
        for (id, index) in [
            ("first", Index::Unassigned),
            ("pinned", Index::Value(9.0)),
            ("second", Index::Unassigned),
            ("third", Index::Unassigned),
        ] {
            cat.components.push(Component::Segment(Segment {
                id: id.to_string(),
                index,
                meta: Meta::new(),
                body: String::new(),
            }));
        }
        assign_category(&mut cat);
        let indices: Vec<f64> = segments_of(&cat).iter().map(|s| s.index.value()).collect();
        // sentinel segments get 1, 2, 3 in order; pinned index is untouched
        assert_eq!(indices, vec![1.0, 9.0, 2.0, 3.0]);
    }

    #[test]
    fn tools_without_split_promotes_first_segment() {
        let src = source_with(vec![category(
            "tools",
            "Tools",
            vec![subcategory(
                "signal-for-android",
                "Signal for Android",
                vec![tier("beginner", vec![item("signal-for-android", "Signal", "body")])],
            )],
        )]);
        let built = CatalogBuilder::new(&src, BuildOptions { split_tools: false, split_glossary: false })
            .build_locale("en")
            .unwrap();
        let tools = built.root.child("tools").unwrap();
        assert!(tools.sub.is_empty());
        let segs = segments_of(tools);
        assert_eq!(segs[0].meta.get("title").unwrap(), "Signal for Android");
        assert_eq!(segs[0].index, Index::Value(1.0));
    }

    #[test]
    fn glossary_without_split_renumbers_from_one() {
        let src = source_with(vec![category(
            "glossary",
            "Glossary",
            vec![subcategory(
                "terms",
                "Terms",
                vec![tier(
                    "beginner",
                    vec![item("adware", "Adware", "a"), item("botnet", "Botnet", "b")],
                )],
            )],
        )]);
        let built = CatalogBuilder::new(&src, BuildOptions { split_tools: true, split_glossary: false })
            .build_locale("en")
            .unwrap();
        let glossary = built.root.child("glossary").unwrap();
        assert_eq!(glossary.meta.get("template").unwrap(), "glossary");
        let indices: Vec<f64> = segments_of(glossary).iter().map(|s| s.index.value()).collect();
        assert_eq!(indices, vec![1.0, 2.0]);
    }

    #[test]
    fn variant_suffix_is_stripped_and_link_syntax_repaired() {
        let src = source_with(vec![category(
            "travel",
            "Travel",
            vec![subcategory(
                "borders",
                "Borders",
                vec![tier("beginner", vec![item("crossing-0", "Crossing", "[a] (handbook://lesson/borders)")])],
            )],
        )]);
        let built = CatalogBuilder::new(&src, BuildOptions::default())
            .build_locale("en")
            .unwrap();
        let beginner = built.root.child("travel").unwrap().child("borders").unwrap().child("beginner").unwrap();
        let seg = segments_of(beginner)[0];
        assert_eq!(seg.id, "crossing");
        assert_eq!(seg.body, "[a](handbook://travel/borders)");
        assert!(built.links.contains("handbook://travel/borders"));
    }

    #[test]
    fn checklist_is_rewritten_and_forced_last() {
        let mut tier = tier("beginner", vec![item("basics", "Basics", "b")]);
        tier.checks = vec![
            CheckEntrySource { text: "read handbook://lesson/email".to_string(), no_check: false },
            CheckEntrySource { text: "Heading".to_string(), no_check: true },
        ];
        let src = source_with(vec![category(
            "travel",
            "Travel",
            vec![subcategory("borders", "Borders", vec![tier])],
        )]);
        let built = CatalogBuilder::new(&src, BuildOptions::default())
            .build_locale("en")
            .unwrap();
        let beginner = built.root.child("travel").unwrap().child("borders").unwrap().child("beginner").unwrap();
        match beginner.components.last().unwrap() {
            Component::Checklist(c) => {
                assert_eq!(c.id, "checklist");
                assert_eq!(c.index, 100.0);
                assert_eq!(c.entries[0].text, "read handbook://communications/email");
                assert!(!c.entries[0].label);
                assert!(c.entries[1].label);
            }
            other => panic!("expected checklist last, got {}", other.id()),
        }
    }

    #[test]
    fn icons_and_inline_images_attach_from_assets() {
        let mut src = source_with(vec![category(
            "travel",
            "Travel",
            vec![subcategory(
                "borders",
                "Borders",
                vec![tier("beginner", vec![item("basics", "Basics", "![map](img/map.png)")])],
            )],
        )]);
        src.add_asset("travel.png", vec![1, 2, 3]);
        src.add_asset("travel_borders.png", vec![4]);
        src.add_asset("map.png", vec![5, 6]);
        let built = CatalogBuilder::new(&src, BuildOptions::default())
            .build_locale("en")
            .unwrap();
        let travel = built.root.child("travel").unwrap();
        assert_eq!(travel.meta.get("icon").unwrap(), "travel.png");
        let borders = travel.child("borders").unwrap();
        assert_eq!(borders.meta.get("icon").unwrap(), "travel_borders.png");
        let beginner = borders.child("beginner").unwrap();
        assert!(beginner
            .components
            .iter()
            .any(|c| matches!(c, Component::Image(i) if i.id == "map.png")));
        assert!(built.report.missing_icons.is_empty());
        assert!(built.report.missing_images.is_empty());
    }

    #[test]
    fn missing_icon_and_image_are_reported_not_fatal() {
        let src = source_with(vec![category(
            "travel",
            "Travel",
            vec![subcategory(
                "borders",
                "Borders",
                vec![tier("beginner", vec![item("basics", "Basics", "![map](img/map.png)")])],
            )],
        )]);
        let built = CatalogBuilder::new(&src, BuildOptions::default())
            .build_locale("en")
            .unwrap();
        assert!(built.report.missing_icons.contains(&"travel.png".to_string()));
        assert!(built.report.missing_images.contains(&"map.png".to_string()));
    }

    #[test]
    fn forms_category_is_appended_last() {
        let mut src = source_with(vec![category("travel", "Travel", vec![])]);
        src.locales.get_mut("en").unwrap().forms = vec![FormSource {
            id: "incident".to_string(),
            name: "Incident Report".to_string(),
            screens: vec![crate::catalog::source::ScreenSource {
                name: "Details".to_string(),
                items: vec![crate::catalog::source::FormItemSource {
                    name: "severity".to_string(),
                    item_type: "single_choice".to_string(),
                    options: vec![" low ".to_string(), "high".to_string()],
                    lines: 0,
                    hint: "pick one".to_string(),
                    label: String::new(),
                }],
            }],
        }];
        let built = CatalogBuilder::new(&src, BuildOptions::default())
            .build_locale("en")
            .unwrap();
        let forms = built.root.sub.last().unwrap();
        assert_eq!(forms.id, "forms");
        match &forms.components[0] {
            Component::Form(f) => {
                assert_eq!(f.meta.get("title").unwrap(), "Incident Report");
                let item = &f.screens[0].items[0];
                assert_eq!(item.item_type, "single_choice");
                let options = item.meta.get("options").unwrap().as_array().unwrap();
                assert_eq!(options[0]["value"], "low");
                assert_eq!(item.meta.get("hint").unwrap(), "pick one");
                assert!(item.meta.get("lines").is_none());
            }
            other => panic!("expected form, got {}", other.id()),
        }
    }
}
