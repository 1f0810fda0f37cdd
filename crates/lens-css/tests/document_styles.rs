//! Style resolution over parsed documents

use lens_css::{Color, StyleResolver};
use lens_html::parse;

#[test]
fn test_style_elements_apply() {
    let doc = parse(
        r#"<style>
            body { background: #ffffff; color: #222222 }
            .muted { color: #aaaaaa }
            h2 { font-size: 20px }
        </style>
        <h2 class="muted">Heading</h2>"#,
    )
    .unwrap();
    let resolver = StyleResolver::for_document(&doc);
    let h2 = doc.elements_by_tag_name("h2")[0];
    let style = resolver.compute_style(doc.tree(), h2);

    assert_eq!(style.color, Color::rgb(0xaa, 0xaa, 0xaa));
    assert_eq!(style.font_size, 20.0);
    assert_eq!(style.font_weight, 700);
    assert!(style.background_color.is_transparent());
    assert_eq!(resolver.effective_background(doc.tree(), h2), Color::WHITE);
}

#[test]
fn test_inline_style_wins_over_author() {
    let doc = parse(r#"<style>p { color: red }</style><p style="color: rgb(0, 0, 255)">x</p>"#).unwrap();
    let resolver = StyleResolver::for_document(&doc);
    let p = doc.elements_by_tag_name("p")[0];
    assert_eq!(resolver.compute_style(doc.tree(), p).color, Color::rgb(0, 0, 255));
}

#[test]
fn test_invalid_css_is_tolerated() {
    let doc = parse("<style>p { color: ; } }}} h1 { color: green }</style><h1>x</h1><p>y</p>").unwrap();
    let resolver = StyleResolver::for_document(&doc);
    let p = doc.elements_by_tag_name("p")[0];
    assert_eq!(resolver.compute_style(doc.tree(), p).color, Color::BLACK);
}

#[test]
fn test_em_sizes_compound() {
    let doc = parse(r#"<div style="font-size: 10px"><section style="font-size: 2em"><span style="font-size: 150%">t</span></section></div>"#).unwrap();
    let resolver = StyleResolver::for_document(&doc);
    let span = doc.elements_by_tag_name("span")[0];
    assert_eq!(resolver.compute_style(doc.tree(), span).font_size, 30.0);
}
