//! Customization surface: markup overrides, rewriter installation and
//! removal, callback-only modes, and the diagnostic markup dump.

use pretty_assertions::assert_eq;
use wikiweave_engine::{ChunkKind, Converter, MarkupSide, convert};

#[test]
fn override_markup_replaces_wrapper_tags() {
    let mut converter = Converter::new();
    converter.override_markup(ChunkKind::Strong, MarkupSide::Open, "<b>");
    converter.override_markup(ChunkKind::Strong, MarkupSide::Close, "</b>");

    assert_eq!(converter.convert("**x**"), "<p><b>x</b></p>\n\n");
}

#[test]
fn converters_are_isolated_from_each_other() {
    let mut customized = Converter::new();
    customized.override_markup(ChunkKind::Paragraph, MarkupSide::Open, "<p class=\"wiki\">");

    assert_eq!(customized.convert("x"), "<p class=\"wiki\">x</p>\n\n");
    assert_eq!(Converter::new().convert("x"), "<p>x</p>\n\n");
    assert_eq!(convert("x"), "<p>x</p>\n\n");
}

#[test]
fn link_rewriter_applies_to_targets_only() {
    let mut converter = Converter::new();
    converter.set_link_rewriter(|target| format!("/wiki/{target}"));

    assert_eq!(
        converter.convert("[[Page]]"),
        "<p><a href=\"/wiki/Page\">Page</a></p>\n\n"
    );
    assert_eq!(
        converter.convert("[[Page|read this]]"),
        "<p><a href=\"/wiki/Page\">read this</a></p>\n\n"
    );
}

#[test]
fn clearing_a_rewriter_restores_default_rendering() {
    let mut converter = Converter::new();
    converter.set_link_rewriter(|target| format!("/wiki/{target}"));
    assert_eq!(
        converter.convert("[[Page]]"),
        "<p><a href=\"/wiki/Page\">Page</a></p>\n\n"
    );

    converter.clear_link_rewriter();
    assert_eq!(
        converter.convert("[[Page]]"),
        "<p><a href=\"Page\">Page</a></p>\n\n"
    );
}

#[test]
fn bare_link_rewriter_changes_href_and_text() {
    let mut converter = Converter::new();
    converter.set_bare_link_rewriter(|url| url.replace("http", "hxxp"));

    assert_eq!(
        converter.convert("http://x.com"),
        "<p><a href=\"hxxp://x.com\">hxxp://x.com</a></p>\n\n"
    );
}

#[test]
fn image_rewriter_applies_to_sources() {
    let mut converter = Converter::new();
    converter.set_image_rewriter(|src| format!("/media/{src}"));

    assert_eq!(
        converter.convert("{{a.png|Alt}}"),
        "<p><img src=\"/media/a.png\" alt=\"Alt\" /></p>\n\n"
    );
}

#[test]
fn plugin_rewriter_receives_the_body() {
    let mut converter = Converter::new();
    converter.set_plugin_rewriter(|body| body.to_uppercase());

    assert_eq!(converter.convert("<<hi>>"), "HI");
    assert_eq!(converter.convert("<<<hi>>>"), "HI");

    converter.clear_plugin_rewriter();
    assert_eq!(converter.convert("<<hi>>"), "<<hi>>");
}

#[test]
fn custom_links_delegate_the_raw_span() {
    let mut converter = Converter::new();
    converter.use_custom_links();
    converter.set_link_rewriter(|raw| raw.to_uppercase());

    assert_eq!(converter.convert("[[a|b]]"), "<p>[[A|B]]</p>\n\n");
}

#[test]
fn custom_links_without_a_rewriter_pass_through() {
    let mut converter = Converter::new();
    converter.use_custom_links();

    assert_eq!(converter.convert("[[a|b]]"), "<p>[[a|b]]</p>\n\n");
}

#[test]
fn custom_bare_links_delegate_the_url() {
    let mut converter = Converter::new();
    converter.use_custom_bare_links();
    converter.set_bare_link_rewriter(|url| format!("<url>{url}</url>"));

    assert_eq!(
        converter.convert("http://x.com"),
        "<p><url>http://x.com</url></p>\n\n"
    );
}

#[test]
fn custom_images_delegate_the_raw_span() {
    let mut converter = Converter::new();
    converter.use_custom_images();
    converter.set_image_rewriter(|raw| raw.to_uppercase());

    assert_eq!(converter.convert("{{a.png|alt}}"), "<p>{{A.PNG|ALT}}</p>\n\n");
}

#[test]
fn active_markup_lists_effective_tags() {
    let converter = Converter::new();
    let dump = converter.active_markup();

    assert!(dump.contains("strong: open(<strong>) close(</strong>)\n"));
    assert!(dump.contains("paragraph: open(<p>) close(</p>\\n\\n)\n"));
    // Kinds without a tag of their own are not listed.
    assert!(!dump.contains("link_target:"));
    assert!(!dump.contains("plain:"));
}

#[test]
fn active_markup_reflects_overrides() {
    let mut converter = Converter::new();
    converter.override_markup(ChunkKind::Strong, MarkupSide::Open, "<b>");

    let dump = converter.active_markup();
    assert!(dump.contains("strong: open(<b>) close(</strong>)\n"));
}

#[test]
fn convert_bytes_rejects_non_text() {
    assert_eq!(wikiweave_engine::convert_bytes(b"**ok**"), "<p><strong>ok</strong></p>\n\n");
    assert_eq!(wikiweave_engine::convert_bytes(&[0xff, 0xfe]), "");
    assert_eq!(wikiweave_engine::convert_bytes(b""), "");
}
