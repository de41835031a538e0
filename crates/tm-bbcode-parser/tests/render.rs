use pretty_assertions::assert_eq;
use rstest::rstest;
use std::collections::BTreeSet;
use tm_bbcode_parser::{escape_html, BBCodeParser, Node, TagOutput, TagRegistry};

fn wrap(registry: &mut TagRegistry, name: &'static str) {
    registry.register_fn(name, move |tag| {
        Ok(TagOutput::trusted(format!("<{name}>{}</{name}>", tag.content())))
    });
}

fn parser() -> BBCodeParser {
    let mut registry = TagRegistry::new();
    wrap(&mut registry, "b");
    wrap(&mut registry, "i");
    registry
        .register_fn("outer", |tag| {
            Ok(TagOutput::trusted(format!("<div>{}</div>", tag.content())).with_attachment("css-a"))
        })
        .register_fn("inner", |tag| {
            Ok(TagOutput::trusted(format!("<span>{}</span>", tag.content())).with_attachment("css-b"))
        })
        .register_fn("x", |tag| {
            Ok(TagOutput::trusted(tag.attr("key").unwrap_or_default()))
        })
        .declare("missing");
    BBCodeParser::new(registry)
}

fn render(source: &str) -> String {
    parser().render(source).unwrap().html
}

#[rstest]
#[case("[b]A[i]B[/i]C[/b]", "<b>A<i>B</i>C</b>")]
#[case("[b]unmatched", "[b]unmatched")]
#[case("[b]<unmatched>", "[b]&lt;unmatched&gt;")]
#[case("[missing]text[/missing]", "[missing]text[/missing]")]
#[case("[missing][b]x[/b][/missing]", "[missing]<b>x</b>[/missing]")]
#[case("[unknown]text[/unknown]", "[unknown]text[/unknown]")]
#[case("[B]x[/b]", "<b>x</b>")]
#[case("[b][i]x[/b][/i]", "<b>[i]x</b>[/i]")]
#[case("[/b]x[b]", "[/b]x[b]")]
#[case("[b][/b]", "<b></b>")]
#[case("[b]array[0][/b]", "<b>array[0]</b>")]
#[case("a[b]b[/b]c[i]d[/i]e", "a<b>b</b>c<i>d</i>e")]
#[case(r"[x key='a\'b']c[/x]", "a'b")]
#[case("", "")]
fn render_cases(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(render(source), expected);
}

#[test]
fn attachments_bubble_up() {
    let output = parser()
        .render("[outer][b][inner]x[/inner][/b][/outer]")
        .unwrap();
    assert_eq!(output.html, "<div><b><span>x</span></b></div>");
    assert_eq!(
        output.metadata.attachments,
        BTreeSet::from(["css-a".to_string(), "css-b".to_string()])
    );
    assert_eq!(
        output.metadata.tags,
        BTreeSet::from(["b".to_string(), "inner".to_string(), "outer".to_string()])
    );
}

#[test]
fn attachments_of_siblings_merge() {
    let output = parser().render("[inner]1[/inner][inner]2[/inner][outer][/outer]").unwrap();
    assert_eq!(output.metadata.attachments.len(), 2);
}

#[test]
fn attribute_with_escaped_quote() {
    let parser = parser();
    let document = parser.parse(r"[x key='a\'b']c[/x]").unwrap();
    let (_, element) = document.tags().next().unwrap();
    assert_eq!(element.attributes()["key"], "a'b");
}

#[test]
fn tag_free_text_is_escaped_once() {
    let source = r#"<script>alert("&amp;")</script>"#;
    assert_eq!(render(source), escape_html(source));
}

#[test]
fn tree_mirrors_only_paired_markers() {
    let parser = parser();
    let source = "[b]1[i]2[/b]3[/i][i]4";
    let document = parser.parse(source).unwrap();
    for (_, element) in document.tags() {
        let outer = document.outer_source(element);
        assert!(outer.starts_with(document.open_source(element)));
        assert!(outer.ends_with(&format!("[/{}]", element.name())));
    }
    assert_eq!(document.tags().count(), 1);
    let texts = document
        .children(document.root())
        .iter()
        .filter(|x| matches!(document.node(**x), Node::Text(..)))
        .count();
    assert_eq!(texts, 1);
}

#[test]
fn registry_shared_between_threads() {
    let parser = parser();
    let handles = (0..4)
        .map(|i| {
            let parser = parser.clone();
            std::thread::spawn(move || parser.render(&format!("[b]{i}[/b]")).unwrap().html)
        })
        .collect::<Vec<_>>();
    let results = handles
        .into_iter()
        .map(|x| x.join().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(results, vec!["<b>0</b>", "<b>1</b>", "<b>2</b>", "<b>3</b>"]);
}
