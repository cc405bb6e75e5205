//! End to end through the built-in category and tag sources.

use std::sync::Arc;

use hashtag_category::CategoryHashtagDataSource;
use hashtag_core::catalog::{Catalog, Category, Tag};
use hashtag_core::guardian::Guardian;
use hashtag_core::registry::RegistryBuilder;
use hashtag_core::types::HashtagType;
use hashtag_engine::{HashtagAutocompleteService, DEFAULT_COMPOSER_CONTEXT};
use hashtag_tag::TagHashtagDataSource;

fn category(id: u64, name: &str, slug: &str, parent: Option<u64>, topic_count: u64) -> Category {
    Category {
        id,
        name: name.to_string(),
        slug: slug.to_string(),
        description: None,
        color: "FFFFFF".to_string(),
        parent_category_id: parent,
        read_restricted: false,
        allowed_group_ids: vec![],
        topic_count,
    }
}

fn tag(id: u64, name: &str, topic_count: u64) -> Tag {
    Tag { id, name: name.to_string(), description: None, topic_count, staff_only: false }
}

fn forum(tagging_enabled: bool) -> HashtagAutocompleteService {
    let mut private = category(3, "Private", "private", None, 99);
    private.read_restricted = true;
    private.allowed_group_ids = vec![42];
    let catalog = Arc::new(Catalog::new(
        vec![
            category(1, "General", "general", None, 10),
            category(2, "Feedback", "feedback", Some(1), 4),
            private,
        ],
        vec![tag(1, "general", 7), tag(2, "feedback", 3), tag(3, "general-help", 2)],
    ));
    let registry = RegistryBuilder::new(
        CategoryHashtagDataSource::new(Arc::clone(&catalog)),
        TagHashtagDataSource::new(catalog, tagging_enabled),
    )
    .build();
    HashtagAutocompleteService::new(registry)
}

fn composer_order(svc: &HashtagAutocompleteService) -> Vec<HashtagType> {
    svc.ordered_types_for_context(DEFAULT_COMPOSER_CONTEXT)
}

#[test]
fn typed_category_lookup_round_trips() {
    let svc = forum(true);
    let order = composer_order(&svc);
    let result = svc
        .lookup(&Guardian::anonymous(), &["general::category".to_string()], &order)
        .unwrap();
    let categories = &result[&HashtagType::Category];
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].reference(), "general::category");
    assert_eq!(categories[0].relative_url, "/c/general/1");
}

#[test]
fn search_suffixes_lower_priority_duplicates() {
    let svc = forum(true);
    let order = composer_order(&svc);
    let results = svc.search(&Guardian::anonymous(), "general", &order, 5).unwrap();
    let pairs: Vec<(Option<HashtagType>, &str)> =
        results.iter().map(|i| (i.kind.clone(), i.reference())).collect();
    assert_eq!(
        pairs,
        vec![
            (Some(HashtagType::Category), "general"),
            (Some(HashtagType::Tag), "general::tag"),
            (Some(HashtagType::Tag), "general-help"),
        ]
    );

    let resolved = svc
        .lookup(
            &Guardian::anonymous(),
            &["general::category".to_string(), "general::tag".to_string()],
            &order,
        )
        .unwrap();
    assert_eq!(resolved[&HashtagType::Category][0].id, 1);
    assert_eq!(resolved[&HashtagType::Tag][0].secondary_text.as_deref(), Some("x7"));
}

#[test]
fn search_refs_resolve_to_the_same_items() {
    let svc = forum(true);
    let staff = Guardian::staff(1);
    let composer = composer_order(&svc);
    let tags_first = vec![HashtagType::Tag, HashtagType::Category];
    for order in [composer, tags_first] {
        for term in ["general", "feedback", "e", ""] {
            for item in svc.search(&staff, term, &order, 10).unwrap() {
                let found = svc.lookup(&staff, &[item.reference().to_string()], &order).unwrap();
                let resolved: Vec<(HashtagType, u64)> = found
                    .iter()
                    .flat_map(|(kind, items)| items.iter().map(move |i| (kind.clone(), i.id)))
                    .collect();
                assert_eq!(
                    resolved,
                    vec![(item.kind.clone().unwrap(), item.id)],
                    "ref {} for term {:?}",
                    item.reference(),
                    term
                );
            }
        }
    }
}

#[test]
fn subcategory_suffix_keeps_parent_path() {
    let svc = forum(true);
    let order = composer_order(&svc);
    let results = svc.search(&Guardian::anonymous(), "feedback", &order, 5).unwrap();
    let refs: Vec<&str> = results.iter().map(|i| i.reference()).collect();
    assert_eq!(refs, vec!["feedback", "feedback::tag"]);

    let via_path = svc
        .lookup(&Guardian::anonymous(), &["general:feedback".to_string()], &order)
        .unwrap();
    assert_eq!(via_path[&HashtagType::Category][0].id, 2);
}

#[test]
fn restricted_categories_follow_the_guardian() {
    let svc = forum(true);
    let order = composer_order(&svc);
    assert!(svc.search(&Guardian::anonymous(), "priv", &order, 5).unwrap().is_empty());
    let member = Guardian::for_user(7, vec![42]);
    let results = svc.search(&member, "priv", &order, 5).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].slug, "private");
}

#[test]
fn tagging_disabled_hides_tags() {
    let svc = forum(false);
    assert_eq!(composer_order(&svc), vec![HashtagType::Category]);
    let results = svc
        .search(&Guardian::anonymous(), "general", &[HashtagType::Category, HashtagType::Tag], 5)
        .unwrap();
    assert!(results.iter().all(|i| i.is_kind(&HashtagType::Category)));
    assert_eq!(results[0].reference(), "general");
}

#[test]
fn find_by_ids_rehydrates_typed_items() {
    let svc = forum(true);
    let items = svc.find_by_ids(&Guardian::anonymous(), &HashtagType::Tag, &[3, 1]).unwrap();
    let slugs: Vec<&str> = items.iter().map(|i| i.slug.as_str()).collect();
    assert_eq!(slugs, vec!["general-help", "general"]);
    assert!(items.iter().all(|i| i.is_kind(&HashtagType::Tag)));
}

#[test]
fn icon_map_lists_enabled_sources() {
    let svc = forum(true);
    let icons = svc.data_source_icon_map();
    assert_eq!(icons[&HashtagType::Category], "folder");
    assert_eq!(icons[&HashtagType::Tag], "tag");
}
