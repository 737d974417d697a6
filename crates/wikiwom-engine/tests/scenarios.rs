use pretty_assertions::assert_eq;
use wikiwom_config::WikiConfig;
use wikiwom_engine::WomDocument;
use wikiwom_syntax::printer::print;
use wikiwom_syntax::{NodeId, NodeKind};

fn build(text: &str) -> WomDocument {
    WomDocument::parse(text, WikiConfig::default(), "Scenario").unwrap()
}

fn is_category_link(doc: &WomDocument, id: NodeId) -> bool {
    match doc.ast().kind(id) {
        Ok(NodeKind::InternalLink { target, .. }) => doc
            .config()
            .parse_target(target)
            .is_ok_and(|target| doc.config().is_category(&target)),
        _ => false,
    }
}

/// Number of category links held by every container that holds any.
fn category_links_per_container(doc: &WomDocument) -> Vec<(NodeId, usize)> {
    let ast = doc.ast();
    ast.descendants(ast.root())
        .unwrap()
        .into_iter()
        .filter_map(|id| ast.list(id).ok().map(|items| (id, items)))
        .map(|(id, items)| {
            let count = items.iter().filter(|i| is_category_link(doc, **i)).count();
            (id, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect()
}

#[test]
fn duplicate_category_links_merge_and_collapse_on_rename() {
    let mut doc = build("Intro [[Category:Foo]]\n\nMore [[category:foo]] text\n");

    assert!(doc.has_category("Foo"));
    assert_eq!(doc.categories().len(), 1);
    let category = doc.category("foo").unwrap();
    let links = doc.category_analogs(category).unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(category_links_per_container(&doc).len(), 2);

    doc.rename_category("Foo", "Bar").unwrap();

    assert!(doc.has_category("Bar"));
    assert!(!doc.has_category("Foo"));
    assert_eq!(doc.category_analogs(category).unwrap(), vec![links[1]]);
    assert_eq!(doc.as_ast_node(category).unwrap(), Some(links[1]));
    for (_, count) in category_links_per_container(&doc) {
        assert!(count <= 1);
    }
    let root = doc.ast().root();
    assert_eq!(doc.ast().find_container(root, links[0]).unwrap(), None);
    assert_eq!(
        doc.to_wikitext().unwrap(),
        "Intro \n\nMore [[Category:Bar]] text\n"
    );
}

#[test]
fn styling_native_italics_switches_to_an_i_element() {
    let mut doc = build("Some ''x'' here");
    let italics = doc.elements_by_name("i").unwrap()[0];
    let native = doc.as_ast_node(italics).unwrap().unwrap();
    assert!(matches!(doc.ast().kind(native).unwrap(), NodeKind::Italics { .. }));
    assert!(!doc.is_generic(italics).unwrap());

    assert_eq!(doc.set_attribute(italics, "style", "color:red").unwrap(), None);

    let generic = doc.as_ast_node(italics).unwrap().unwrap();
    assert_ne!(generic, native);
    assert!(matches!(
        doc.ast().kind(generic).unwrap(),
        NodeKind::XmlElement { name, .. } if name == "i"
    ));
    assert_eq!(
        print(doc.ast(), generic).unwrap(),
        "<i style=\"color:red\">x</i>"
    );
    assert_eq!(
        doc.to_wikitext().unwrap(),
        "Some <i style=\"color:red\">x</i> here"
    );

    let text = doc.create_text("y").unwrap();
    doc.append_child(italics, text).unwrap();

    assert_eq!(
        print(doc.ast(), generic).unwrap(),
        "<i style=\"color:red\">xy</i>"
    );
    assert_eq!(print(doc.ast(), native).unwrap(), "''''");
}
