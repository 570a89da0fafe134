//! Unicode normalization for token text.
//!
//! Page readers do not agree on how they encode the same visual text
//! (composed vs. decomposed accents, full-width digits). Normalizing before
//! assembly keeps numeric detection and cell text stable across sources.

use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;

/// Normalization form applied to token text before assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum UnicodeNorm {
    /// Leave text as the reader produced it.
    #[default]
    None,
    Nfc,
    Nfd,
    /// Folds full-width digits and punctuation to ASCII; the usual choice for
    /// statements typeset with CJK fonts.
    Nfkc,
    Nfkd,
}

impl UnicodeNorm {
    /// Normalize `text`, borrowing it when there is nothing to do.
    pub fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if text.is_ascii() {
            return Cow::Borrowed(text);
        }
        match self {
            UnicodeNorm::None => Cow::Borrowed(text),
            UnicodeNorm::Nfc => Cow::Owned(text.nfc().collect()),
            UnicodeNorm::Nfd => Cow::Owned(text.nfd().collect()),
            UnicodeNorm::Nfkc => Cow::Owned(text.nfkc().collect()),
            UnicodeNorm::Nfkd => Cow::Owned(text.nfkd().collect()),
        }
    }
}
