use pretty_assertions::assert_eq;
use wikiwom_config::{Namespace, WikiConfig};
use wikiwom_engine::{WomDocument, WomError, WomKind};

fn build(text: &str) -> WomDocument {
    WomDocument::parse(text, WikiConfig::default(), "Categories").unwrap()
}

#[test]
fn n_duplicates_merge_into_one_category_with_n_analogs() {
    let mut doc = build("[[Category:A]] [[category:a]]\n\n[[Category:A|sort]]");
    let [category] = doc.categories()[..] else {
        panic!("expected exactly one category");
    };
    let links = doc.category_analogs(category).unwrap();
    assert_eq!(links.len(), 3);
    assert_eq!(doc.as_ast_node(category).unwrap(), Some(links[2]));

    doc.rename_category("a", "B").unwrap();

    assert_eq!(doc.category_analogs(category).unwrap(), vec![links[2]]);
    let root = doc.ast().root();
    for dropped in &links[..2] {
        assert_eq!(doc.ast().find_container(root, *dropped).unwrap(), None);
    }
    assert_eq!(doc.to_wikitext().unwrap(), " \n\n[[Category:B|sort]]");
}

#[test]
fn merged_name_is_spelled_like_the_last_link() {
    let doc = build("[[Category:Foo]] [[category:FOO]]");
    let category = doc.category("foo").unwrap();
    assert_eq!(doc.category_name(category).unwrap(), "FOO");
}

#[test]
fn renaming_to_the_current_name_changes_nothing() {
    let source = "[[Category:A]] [[Category:A]]";
    let mut doc = build(source);
    doc.rename_category("A", "A").unwrap();
    assert_eq!(doc.to_wikitext().unwrap(), source);
    let category = doc.category("A").unwrap();
    assert_eq!(doc.category_analogs(category).unwrap().len(), 2);
}

#[test]
fn changing_only_the_case_is_allowed() {
    let mut doc = build("[[Category:Foo]]");
    doc.rename_category("foo", "FOO").unwrap();
    assert_eq!(doc.to_wikitext().unwrap(), "[[Category:FOO]]");
    assert!(doc.has_category("Foo"));
}

#[test]
fn collisions_leave_the_page_alone() {
    let source = "[[Category:Foo]] [[Category:Bar]]";
    let mut doc = build(source);
    let before = doc.categories();

    assert_eq!(
        doc.add_category("foo"),
        Err(WomError::NameCollision("foo".to_string()))
    );
    assert_eq!(
        doc.rename_category("Foo", "bar"),
        Err(WomError::NameCollision("bar".to_string()))
    );

    assert_eq!(doc.categories(), before);
    assert_eq!(doc.to_wikitext().unwrap(), source);
    assert!(doc.has_category("Foo"));
    assert_eq!(doc.category_name(doc.category("foo").unwrap()).unwrap(), "Foo");
}

#[test]
fn invalid_names_are_rejected() {
    let mut doc = build("[[Category:Foo]]");
    assert!(matches!(
        doc.add_category("a|b"),
        Err(WomError::Validation(_))
    ));
    assert!(matches!(
        doc.rename_category("Foo", "x:y"),
        Err(WomError::Validation(_))
    ));
    assert_eq!(doc.to_wikitext().unwrap(), "[[Category:Foo]]");
}

#[test]
fn generic_child_operations_refuse_categories() {
    let mut doc = build("text [[Category:Foo]]");
    let page = doc.page();
    let body = doc.body();
    let category = doc.category("Foo").unwrap();
    assert_eq!(doc.kind(category).unwrap(), WomKind::Category);

    assert!(matches!(
        doc.append_child(body, category),
        Err(WomError::UnsupportedOperation(_))
    ));
    assert!(matches!(
        doc.remove_child(page, category),
        Err(WomError::UnsupportedOperation(_))
    ));
    let text = doc.create_text("x").unwrap();
    assert!(matches!(
        doc.append_child(category, text),
        Err(WomError::UnsupportedOperation(_))
    ));
}

#[test]
fn removing_a_category_deletes_every_link() {
    let mut doc = build("a [[Category:Foo]] b [[category:foo]]");
    let category = doc.remove_category("FOO").unwrap();

    assert_eq!(doc.to_wikitext().unwrap(), "a  b ");
    assert!(!doc.has_category("Foo"));
    assert_eq!(doc.parent(category).unwrap(), None);
    assert_eq!(doc.as_ast_node(category).unwrap(), None);

    doc.set_category_name(category, "Elsewhere").unwrap();
    assert_eq!(doc.to_wikitext().unwrap(), "a  b ");
    assert!(!doc.has_category("Elsewhere"));
}

#[test]
fn removing_a_subtree_keeps_its_categories() {
    let mut doc = build("Text [[Category:Foo]] more\n\nOther");
    let body = doc.body();
    let first = doc.children(body).unwrap()[0];

    doc.remove_child(body, first).unwrap();

    assert_eq!(doc.to_wikitext().unwrap(), "\n\nOther[[Category:Foo]]");
    let category = doc.category("Foo").unwrap();
    let [link] = doc.category_analogs(category).unwrap()[..] else {
        panic!("expected one link");
    };
    let content = doc.ast().page_content();
    assert!(doc.ast().list(content).unwrap().contains(&link));
}

#[test]
fn replacing_a_subtree_keeps_its_categories() {
    let mut doc = build("[[Category:Foo]] '''x [[Category:Bar]]'''");
    let bold = doc.elements_by_name("b").unwrap()[0];
    let paragraph = doc.parent(bold).unwrap().unwrap();
    let text = doc.create_text("y").unwrap();

    doc.replace_child(paragraph, text, bold).unwrap();

    assert_eq!(
        doc.to_wikitext().unwrap(),
        "[[Category:Foo]] y[[Category:Bar]]"
    );
    assert!(doc.has_category("Bar"));
}

#[test]
fn links_inside_promoted_elements_stay_tracked() {
    let mut doc = build("''x [[Category:Foo]]''");
    let italics = doc.elements_by_name("i").unwrap()[0];
    doc.set_attribute(italics, "class", "c").unwrap();
    assert_eq!(
        doc.to_wikitext().unwrap(),
        "<i class=\"c\">x [[Category:Foo]]</i>"
    );

    doc.rename_category("Foo", "Bar").unwrap();
    assert_eq!(
        doc.to_wikitext().unwrap(),
        "<i class=\"c\">x [[Category:Bar]]</i>"
    );

    let paragraph = doc.parent(italics).unwrap().unwrap();
    doc.remove_child(paragraph, italics).unwrap();
    assert_eq!(doc.to_wikitext().unwrap(), "[[Category:Bar]]");
}

#[test]
fn added_categories_use_the_configured_prefix() {
    let mut config = WikiConfig::default();
    config.category_namespace = 100;
    config.namespaces.push(Namespace {
        id: 100,
        name: "Kategorie".to_string(),
        aliases: vec![],
    });
    let mut doc = WomDocument::parse("[[Kategorie:Alt]]", config, "Seite").unwrap();
    assert!(doc.has_category("Alt"));

    doc.add_category("Neu").unwrap();
    assert_eq!(
        doc.to_wikitext().unwrap(),
        "[[Kategorie:Alt]][[Kategorie:Neu]]"
    );
}

#[test]
fn underscores_and_spaces_name_the_same_category() {
    let mut doc = build("[[Category:Foo_bar]]");
    assert!(doc.has_category("Foo_bar"));
    assert!(doc.has_category("foo bar"));
    assert_eq!(doc.category("Foo_bar"), doc.category("Foo bar"));

    assert_eq!(
        doc.add_category("Foo_bar"),
        Err(WomError::NameCollision("Foo bar".to_string()))
    );
    assert_eq!(doc.categories().len(), 1);
    assert_eq!(doc.to_wikitext().unwrap(), "[[Category:Foo_bar]]");
}

#[test]
fn renaming_onto_an_underscored_spelling_collides() {
    let mut doc = build("[[Category:Foo bar]] [[Category:Baz]]");
    assert_eq!(
        doc.rename_category("Baz", "foo_bar"),
        Err(WomError::NameCollision("foo bar".to_string()))
    );
    assert_eq!(doc.categories().len(), 2);
    assert_eq!(
        doc.to_wikitext().unwrap(),
        "[[Category:Foo bar]] [[Category:Baz]]"
    );
}

#[test]
fn added_names_survive_a_reparse() {
    let mut doc = build("text");
    doc.add_category("New_topic").unwrap();
    let text = doc.to_wikitext().unwrap();
    assert_eq!(text, "text[[Category:New topic]]");

    let reparsed = build(&text);
    assert_eq!(reparsed.categories().len(), 1);
    assert!(reparsed.has_category("New topic"));
}

#[test]
fn fragments_cannot_be_part_of_a_category_name() {
    let mut doc = build("[[Category:A]]");
    assert!(matches!(
        doc.add_category("A#b"),
        Err(WomError::Validation(_))
    ));
    assert!(matches!(
        doc.rename_category("A", "B#c"),
        Err(WomError::Validation(_))
    ));
    assert_eq!(doc.categories().len(), 1);
    assert_eq!(doc.to_wikitext().unwrap(), "[[Category:A]]");
}
