use anyhow::Result;
use handbook_assembler::catalog::source::InMemorySource;
use handbook_assembler::catalog::{BuildOptions, CatalogBuilder, Component};
use handbook_assembler::links;
use handbook_assembler::publish::{publish_locale, FileDestination, InMemoryDestination};
use tempfile::tempdir;

fn snapshot() -> InMemorySource {
    let data = serde_json::json!({
        "locales": {
            "en": {
                "categories": [
                    {
                        "id": "about",
                        "name": "About",
                        "subcategories": [{
                            "id": "intro",
                            "name": "Intro",
                            "tiers": [{
                                "id": "beginner",
                                "description": "Getting started",
                                "items": [
                                    { "id": "welcome", "title": "Welcome", "body": "Hello" },
                                    { "id": "credits", "title": "Credits", "body": "Thanks" }
                                ]
                            }]
                        }]
                    },
                    {
                        "id": "communications",
                        "name": "Communications",
                        "subcategories": [{
                            "id": "email",
                            "name": "Email",
                            "tiers": [{
                                "id": "beginner",
                                "description": "Email basics",
                                "items": [{
                                    "id": "basics-0",
                                    "title": "Basics",
                                    "body": "See [tips] (handbook://lesson/email/1) and ![diagram](img/flow.png)"
                                }],
                                "checks": [
                                    { "text": "Enable 2FA", "no_check": false },
                                    { "text": "Setup", "no_check": true }
                                ]
                            }, {
                                "id": "advanced",
                                "description": "Further email",
                                "items": [{
                                    "id": "headers",
                                    "title": "Headers",
                                    "body": "Read handbook://lesson/nowhere for more"
                                }]
                            }]
                        }]
                    },
                    {
                        "id": "tools",
                        "name": "Tools",
                        "subcategories": [
                            {
                                "id": "signal-for-android",
                                "name": "Signal for Android",
                                "tiers": [{
                                    "id": "beginner",
                                    "items": [{ "id": "signal-for-android", "title": "Signal", "body": "chat" }]
                                }]
                            },
                            {
                                "id": "veracrypt",
                                "name": "VeraCrypt",
                                "tiers": [{
                                    "id": "beginner",
                                    "items": [{ "id": "veracrypt", "title": "VeraCrypt", "body": "disk" }]
                                }]
                            }
                        ]
                    }
                ],
                "forms": [{
                    "id": "incident",
                    "name": "Incident Report",
                    "screens": [{
                        "name": "Details",
                        "items": [{ "name": "notes", "type": "text_area", "lines": 4 }]
                    }]
                }]
            }
        },
        "assets": {
            "communications.png": [1, 2],
            "flow.png": [3, 4, 5]
        }
    });
    serde_json::from_value(data).unwrap()
}

#[test]
fn full_assembly_restructures_and_accumulates_links() -> Result<()> {
    let source = snapshot();
    let builder = CatalogBuilder::new(&source, BuildOptions::default());
    let built = builder.build_locale("en")?;

    // "about" collapsed: two segments, no subcategory wrapper
    let about = built.root.child("about").unwrap();
    assert!(about.sub.is_empty());
    assert_eq!(
        about
            .components
            .iter()
            .filter(|c| matches!(c, Component::Segment(_)))
            .count(),
        2
    );

    // default category keeps the hierarchy; checklist rides last
    let beginner = built
        .root
        .child("communications")
        .unwrap()
        .child("email")
        .unwrap()
        .child("beginner")
        .unwrap();
    assert!(matches!(beginner.components.last().unwrap(), Component::Checklist(_)));
    assert!(beginner
        .components
        .iter()
        .any(|c| matches!(c, Component::Image(i) if i.id == "flow.png")));

    // tools split into topical buckets
    let tools = built.root.child("tools").unwrap();
    assert_eq!(tools.sub.len(), 6);
    assert_eq!(tools.child("messaging").unwrap().components.len(), 1);
    assert_eq!(tools.child("files").unwrap().components.len(), 1);

    // forms category appended last
    assert_eq!(built.root.sub.last().unwrap().id, "forms");

    // the mapped link was rewritten and recorded; the unmapped one kept
    assert!(built.links.contains("handbook://communications/email/advanced"));
    assert!(built.links.contains("handbook://lesson/nowhere"));

    // validation resolves the rewritten link and reports the stale one
    let unresolved = links::check_links(&built.root, &built.links);
    let bad: Vec<&str> = unresolved.iter().map(|u| u.link.as_str()).collect();
    assert_eq!(bad, vec!["handbook://lesson/nowhere"]);

    Ok(())
}

#[tokio::test]
async fn publish_twice_is_idempotent_in_memory() -> Result<()> {
    let source = snapshot();
    let builder = CatalogBuilder::new(&source, BuildOptions::default());
    let built = builder.build_locale("en")?;

    let dst = InMemoryDestination::new();
    let first = publish_locale(&dst, "en", &built.root).await?;
    assert!(first.written > 0);
    assert_eq!(first.skipped_existing, 0);

    let second = publish_locale(&dst, "en", &built.root).await?;
    assert_eq!(second.written, 0);
    assert_eq!(second.skipped_existing, first.written);
    Ok(())
}

#[tokio::test]
async fn publish_twice_is_idempotent_on_disk() -> Result<()> {
    let source = snapshot();
    let builder = CatalogBuilder::new(&source, BuildOptions::default());
    let built = builder.build_locale("en")?;

    let tmp = tempdir()?;
    let dst = FileDestination::new(tmp.path());
    let first = publish_locale(&dst, "en", &built.root).await?;
    let second = publish_locale(&dst, "en", &built.root).await?;
    assert_eq!(second.written, 0);
    assert_eq!(second.skipped_existing, first.written);

    assert!(tmp.path().join("en/tools/messaging/.category.toml").exists());
    assert!(tmp
        .path()
        .join("en/communications/email/beginner/s_basics.md")
        .exists());
    Ok(())
}
