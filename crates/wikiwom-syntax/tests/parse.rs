//! Parser behaviour over whole documents.

use pretty_assertions::assert_eq;
use rstest::rstest;
use wikiwom_syntax::printer::print_document;
use wikiwom_syntax::{Ast, NodeId, NodeKind, parse};

fn page_items(ast: &Ast) -> Vec<NodeId> {
    ast.list(ast.page_content()).unwrap().to_vec()
}

fn kinds(ast: &Ast, ids: &[NodeId]) -> Vec<&'static str> {
    ids.iter().map(|id| ast.kind(*id).unwrap().name()).collect()
}

#[rstest]
#[case::empty("")]
#[case::plain("just text")]
#[case::paragraphs("one\ntwo\n\nthree\n")]
#[case::emphasis("''i'' '''b''' '''''bi'''''")]
#[case::unclosed_emphasis("''open\nnext '''line")]
#[case::rule("a\n----\nb\n-----x")]
#[case::links("[[Main Page]] [[Target|shown ''text'']] [[Category:Foo|key]]")]
#[case::unclosed_link("[[no close\n]]")]
#[case::tags("<b class=\"x\" id='y' hidden>bold</b > <br/> <hr>")]
#[case::block_div("<div align=center>\n\ninside\n\n</div>\nafter")]
#[case::stray_tags("</i> < b> <unclosed")]
#[case::comments("a<!-- c -->b<!--- d ---> <!-- open")]
#[case::references("&amp; &#65; &#x41; &bogus; &#xZZ; & x")]
#[case::attribute_references("<i title=\"a &quot;b&quot; &#60;\">x</i>")]
#[case::crlf("a\r\nb\r\n\r\nc")]
#[case::unicode("Ünïcødé ''ñ'' [[Köln]]")]
fn roundtrip_preserves_text(#[case] input: &str) {
    let ast = parse(input);
    assert_eq!(print_document(&ast).unwrap(), input);
}

#[test]
fn paragraphs_and_blank_lines() {
    let ast = parse("Hello '''world'''\n\n----\n");
    insta::assert_snapshot!(ast.dump(ast.root()).trim_end(), @r#"
    page
      list
        paragraph
          list
            text "Hello "
            bold
              list
                text "world"
        newline "\n"
        newline "\n"
        hr
        newline "\n"
    "#);
}

#[test]
fn single_line_breaks_stay_inside_paragraph() {
    let ast = parse("one\ntwo");
    let items = page_items(&ast);
    assert_eq!(kinds(&ast, &items), vec!["paragraph"]);
    let NodeKind::Paragraph { content } = ast.kind(items[0]).unwrap() else {
        panic!("expected paragraph");
    };
    let inner = ast.list(*content).unwrap();
    assert_eq!(kinds(&ast, inner), vec!["text", "newline", "text"]);
}

#[test]
fn block_tags_sit_in_page_content() {
    let ast = parse("<div>a</div>\n<p>b</p>");
    let items = page_items(&ast);
    assert_eq!(
        kinds(&ast, &items),
        vec!["xml-element", "newline", "xml-element"]
    );
}

#[test]
fn category_links_keep_their_target() {
    let ast = parse("[[Category:Foo]] text [[category:foo|sort]]");
    let targets: Vec<String> = ast
        .descendants(ast.root())
        .unwrap()
        .into_iter()
        .filter_map(|id| match ast.kind(id).unwrap() {
            NodeKind::InternalLink { target, .. } => Some(target.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(targets, vec!["Category:Foo", "category:foo"]);
}

#[test]
fn element_attributes_are_parsed() {
    let ast = parse("<i style=\"color:red\">x</i>");
    insta::assert_snapshot!(ast.dump(ast.root()).trim_end(), @r#"
    page
      list
        paragraph
          list
            xml-element <i>
              list
                xml-attribute style
                  list
                    text "color:red"
              list
                text "x"
    "#);
}

#[test]
fn unknown_entities_are_text() {
    let ast = parse("&bogus;");
    let refs = ast
        .descendants(ast.root())
        .unwrap()
        .into_iter()
        .filter(|id| matches!(ast.kind(*id).unwrap(), NodeKind::XmlEntityRef { .. }))
        .count();
    assert_eq!(refs, 0);
}

#[test]
fn char_refs_keep_their_spelling() {
    let ast = parse("&#x41;");
    let id = ast
        .descendants(ast.root())
        .unwrap()
        .into_iter()
        .find(|id| matches!(ast.kind(*id).unwrap(), NodeKind::XmlCharRef(65)))
        .unwrap();
    assert_eq!(ast.rtd(id).unwrap().unwrap().slot(0), Some("&#x41;"));
}
