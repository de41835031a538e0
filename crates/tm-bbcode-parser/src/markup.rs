use std::borrow::Cow;

/// Function applied to untrusted text before it reaches the output.
///
/// Documents use [`escape_html`] unless the parser was configured otherwise.
pub type Escaper = fn(&str) -> Cow<'_, str>;

/// Escape `&`, `<`, `>`, `"` and `'` into html entities.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(text)
}

/// Keep text as is.
///
/// Use it when the input was already escaped by an earlier pass, for example
/// when rendering the output of [`Document::prepare`] after it went through a
/// generic html filter.
///
/// [`Document::prepare`]: crate::tree::Document::prepare
pub fn trust_text(text: &str) -> Cow<'_, str> {
    Cow::Borrowed(text)
}

/// Output of a render step, tagged with its safety state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Markup {
    /// Untrusted text, escaped before written to output.
    Raw(String),

    /// Markup that is already safe to output.
    Trusted(String),
}

impl Markup {
    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into())
    }

    pub fn trusted(text: impl Into<String>) -> Self {
        Self::Trusted(text.into())
    }

    pub fn is_trusted(&self) -> bool {
        matches!(self, Self::Trusted(..))
    }

    /// Normalize into output text, escaping [`Markup::Raw`] with `escaper`.
    pub fn escape(self, escaper: Escaper) -> String {
        match self {
            Self::Raw(text) => escaper(&text).into_owned(),
            Self::Trusted(text) => text,
        }
    }
}

impl Default for Markup {
    fn default() -> Self {
        Self::Trusted(String::new())
    }
}
