use pretty_assertions::assert_eq;
use rstest::rstest;
use wikiwom_config::WikiConfig;
use wikiwom_engine::{BuildOptions, UnsupportedElements, WomDocument, WomError, WomKind};
use wikiwom_syntax::{NodeKind, parse};

fn build(text: &str) -> WomDocument {
    WomDocument::parse(text, WikiConfig::default(), "Structure").unwrap()
}

#[rstest]
#[case("")]
#[case("plain text")]
#[case("Hello '''world'''\n\n----\n")]
#[case("a ''b '''c''' d'' e")]
#[case("line one\nline two\n\n\nafter gap")]
#[case("[[Main Page]] and [[Help:Contents|the ''help'']]")]
#[case("<div  class='x'>''a''&amp;b</div >\n")]
#[case("<p align=center>x</p>\n<hr noshade />")]
#[case("x<!-- note -->y &#65; &#x42; &nbsp;")]
#[case("[[Category:Foo]]\n[[category:foo|sort]]\n")]
#[case("[[File:x.png]] [[a{b]] unclosed ''italics")]
#[case("'''bold\nbroken")]
fn unedited_documents_print_unchanged(#[case] input: &str) {
    let doc = build(input);
    assert_eq!(doc.to_wikitext().unwrap(), input);
}

#[test]
fn wom_outline() {
    let doc = build("Hello '''world'''\n<div class=\"x\">[[Main Page|home]]</div>\n[[Category:Foo]]");
    insta::assert_snapshot!(doc.dump().trim_end(), @r#"
    page title="Structure"
      body
        p
          #text "Hello "
          b
            #text "world"
        #text "\n"
        div class="x" (xml)
          link target="Main Page"
            #text "home"
        #text "\n"
        p
      category name="Foo"
    "#);
}

#[test]
fn content_model_violations_change_nothing() {
    let mut doc = build("x '''b''' y\n----");
    let bold = doc.elements_by_name("b").unwrap()[0];
    let hr = doc.elements_by_name("hr").unwrap()[0];
    let text = doc.children(bold).unwrap()[0];
    let before = doc.to_wikitext().unwrap();

    let paragraph = doc.create_paragraph().unwrap();
    let more = doc.create_text("z").unwrap();
    let attempts = [
        doc.append_child(bold, paragraph),
        doc.prepend_child(hr, more),
        doc.append_child(text, more),
    ];
    for attempt in attempts {
        assert!(matches!(attempt, Err(WomError::ContentModel(_))));
    }

    assert_eq!(doc.children(bold).unwrap(), &[text]);
    assert!(doc.children(hr).unwrap().is_empty());
    assert_eq!(doc.parent(paragraph).unwrap(), None);
    assert_eq!(doc.parent(more).unwrap(), None);
    assert_eq!(doc.to_wikitext().unwrap(), before);
}

#[test]
fn links_cannot_nest() {
    let mut doc = build("[[Main Page|home]]");
    let link = doc.elements_by_name("link").unwrap()[0];
    let inner = doc.create_page_link("Help:Contents").unwrap();
    assert!(matches!(
        doc.append_child(link, inner),
        Err(WomError::ContentModel(_))
    ));
}

#[test]
fn page_children_are_fixed() {
    let mut doc = build("x");
    let page = doc.page();
    let body = doc.body();
    let paragraph = doc.create_paragraph().unwrap();
    assert!(matches!(
        doc.append_child(page, paragraph),
        Err(WomError::UnsupportedOperation(_))
    ));
    assert!(matches!(
        doc.remove_child(page, body),
        Err(WomError::UnsupportedOperation(_))
    ));
}

#[test]
fn insertions_follow_the_reference_node() {
    let mut doc = build("b");
    let body = doc.body();
    let paragraph = doc.children(body).unwrap()[0];
    let existing = doc.children(paragraph).unwrap()[0];

    let a = doc.create_text("a").unwrap();
    let c = doc.create_text("c").unwrap();
    let bold = doc.create_bold().unwrap();
    let inner = doc.create_text("!").unwrap();
    doc.insert_before(paragraph, a, existing).unwrap();
    doc.insert_after(paragraph, c, existing).unwrap();
    doc.append_child(paragraph, bold).unwrap();
    doc.append_child(bold, inner).unwrap();

    assert_eq!(doc.to_wikitext().unwrap(), "abc'''!'''");
    assert_eq!(doc.children(paragraph).unwrap(), &[a, existing, c, bold]);
}

#[test]
fn reference_must_be_a_child() {
    let mut doc = build("a\n\nb");
    let body = doc.body();
    let paragraphs = doc.elements_by_name("p").unwrap();
    let foreign = doc.children(paragraphs[1]).unwrap()[0];
    let text = doc.create_text("x").unwrap();
    let before = doc.to_wikitext().unwrap();

    assert!(matches!(
        doc.insert_before(paragraphs[0], text, foreign),
        Err(WomError::Validation(_))
    ));
    assert!(matches!(
        doc.remove_child(body, foreign),
        Err(WomError::Validation(_))
    ));
    assert_eq!(doc.to_wikitext().unwrap(), before);
    assert_eq!(doc.parent(text).unwrap(), None);
}

#[test]
fn attached_nodes_must_be_removed_before_moving() {
    let mut doc = build("a ''b''");
    let body = doc.body();
    let italics = doc.elements_by_name("i").unwrap()[0];
    assert!(matches!(
        doc.append_child(body, italics),
        Err(WomError::UnsupportedOperation(_))
    ));

    let paragraph = doc.parent(italics).unwrap().unwrap();
    doc.remove_child(paragraph, italics).unwrap();
    doc.append_child(body, italics).unwrap();
    assert_eq!(doc.to_wikitext().unwrap(), "a ''b''");
    assert_eq!(doc.parent(italics).unwrap(), Some(body));
}

#[test]
fn nodes_cannot_be_inserted_into_themselves() {
    let mut doc = build("");
    let outer = doc.create_bold().unwrap();
    let inner = doc.create_italics().unwrap();
    doc.append_child(outer, inner).unwrap();
    assert!(matches!(
        doc.append_child(inner, outer),
        Err(WomError::UnsupportedOperation(_) | WomError::Validation(_))
    ));
}

#[test]
fn replacing_a_child() {
    let mut doc = build("keep\n\nold");
    let body = doc.body();
    let old = *doc.children(body).unwrap().last().unwrap();
    let hr = doc.create_horizontal_rule().unwrap();

    doc.replace_child(body, hr, old).unwrap();

    assert_eq!(doc.to_wikitext().unwrap(), "keep\n\n\n----\n");
    assert_eq!(doc.parent(old).unwrap(), None);
    assert_eq!(doc.kind(*doc.children(body).unwrap().last().unwrap()).unwrap(), WomKind::HorizontalRule);
}

#[test]
fn empty_xml_elements_open_up_for_children() {
    let mut doc = build("<div class=\"box\"/>");
    let div = doc.elements_by_name("div").unwrap()[0];
    let text = doc.create_text("inside").unwrap();
    doc.append_child(div, text).unwrap();
    assert_eq!(
        doc.to_wikitext().unwrap(),
        "<div class=\"box\">inside</div>"
    );
}

#[test]
fn editing_text_and_references() {
    let mut doc = build("a &amp; b");
    let paragraph = doc.elements_by_name("p").unwrap()[0];
    let reference = doc.children(paragraph).unwrap()[1];
    assert_eq!(doc.text_content(reference).unwrap(), "&");

    doc.set_text(reference, "and").unwrap();
    assert_eq!(doc.to_wikitext().unwrap(), "a and b");

    let first = doc.children(paragraph).unwrap()[0];
    doc.set_text(first, "one ").unwrap();
    assert_eq!(doc.to_wikitext().unwrap(), "one and b");
}

#[test]
fn editing_comments() {
    let mut doc = build("x<!-- old -->y");
    let comment = doc.elements_by_name("#comment").unwrap()[0];

    doc.set_comment_text(comment, " new ").unwrap();
    assert_eq!(doc.to_wikitext().unwrap(), "x<!-- new -->y");

    assert!(matches!(
        doc.set_comment_text(comment, "a--b"),
        Err(WomError::Validation(_))
    ));
    assert_eq!(doc.text_content(comment).unwrap(), " new ");
}

#[test]
fn unsupported_elements_carry_their_node() {
    let ast = parse("<table>x</table>");
    let err = WomDocument::from_ast(ast, WikiConfig::default(), "T").unwrap_err();
    let WomError::UnsupportedElement { node, name } = err else {
        panic!("expected an unsupported element error");
    };
    assert_eq!(name, "table");

    let ast = parse("<table>x</table>");
    assert!(matches!(
        ast.kind(node).unwrap(),
        NodeKind::XmlElement { name, .. } if name == "table"
    ));

    let options = BuildOptions {
        unsupported_elements: UnsupportedElements::Preserve,
    };
    let doc = WomDocument::from_ast_with(ast, WikiConfig::default(), "T", &options).unwrap();
    assert_eq!(doc.to_wikitext().unwrap(), "<table>x</table>");
}
