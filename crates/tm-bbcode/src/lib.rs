//! Standard bbcode tags, rendered into html.
//!
//! [`standard_tags`] builds a [`TagRegistry`] with all tags below:
//!
//! | tag | output |
//! |-----|--------|
//! | `[b]` `[i]` `[u]` `[s]` `[sub]` `[sup]` | html element of the same name |
//! | `[url]` | `<a>` |
//! | `[color]` `[size]` | styled `<span>` |
//! | `[quote]` | `<blockquote>` with optional `<cite>` |
//! | `[code]` | `<pre><code>`, content protected in the prepare pass |
//! | `[table]` `[tr]` `[td]` | table elements |
//!
//! User defined tags go through [`TemplateTag`].

use tm_bbcode_parser::TagRegistry;

mod code;
mod link;
mod quote;
mod simple;
mod style;
mod table;
mod template;

pub use code::CodeTag;
pub use link::UrlTag;
pub use quote::QuoteTag;
pub use simple::SimpleTag;
pub use style::{ColorTag, SizeTag};
pub use table::{TableCellTag, TableRowTag, TableTag};
pub use template::{Placeholders, TagDefinition, TemplateContext, TemplateEngine, TemplateTag};
pub use tm_bbcode_webcolor::WebColor;

/// Tag names registered by [`standard_tags`].
pub const STANDARD_TAGS: &[&str] = &[
    "b", "i", "u", "s", "sub", "sup", "url", "color", "size", "quote", "code", "table", "tr",
    "td",
];

/// Registry holding every standard tag.
pub fn standard_tags() -> TagRegistry {
    let mut registry = TagRegistry::new();
    registry
        .register("b", SimpleTag::new("b"))
        .register("i", SimpleTag::new("i"))
        .register("u", SimpleTag::new("u"))
        .register("s", SimpleTag::new("s"))
        .register("sub", SimpleTag::new("sub"))
        .register("sup", SimpleTag::new("sup"))
        .register("url", UrlTag)
        .register("color", ColorTag)
        .register("size", SizeTag)
        .register("quote", QuoteTag)
        .register("code", CodeTag)
        .register("table", TableTag)
        .register("tr", TableRowTag)
        .register("td", TableCellTag);
    registry
}

#[cfg(test)]
pub(crate) fn render_standard(text: &str) -> tm_bbcode_parser::RenderOutput {
    tm_bbcode_parser::render_bbcode(text, &standard_tags()).expect("no input limit")
}
