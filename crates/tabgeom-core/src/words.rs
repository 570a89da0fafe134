//! Positioned text tokens: normalization and reading order.

use crate::geometry::BBox;
use crate::unicode_norm::UnicodeNorm;

/// A recognized unit of text on a page (typically one word).
///
/// Tokens are produced by the page reader and consumed read-only by the
/// inference engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// The text content of this token.
    pub text: String,
    /// Bounding box in page-local coordinates.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub bbox: BBox,
}

impl Token {
    pub fn new(text: impl Into<String>, x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            text: text.into(),
            bbox: BBox::new(x0, top, x1, bottom),
        }
    }

    /// Horizontal center of the token.
    pub fn center_x(&self) -> f64 {
        self.bbox.center_x()
    }
}

/// Apply a normalization form to every token's text.
///
/// Returns the tokens unchanged (cloned) for [`UnicodeNorm::None`].
pub fn normalize_tokens(tokens: &[Token], norm: UnicodeNorm) -> Vec<Token> {
    if norm == UnicodeNorm::None {
        return tokens.to_vec();
    }
    tokens
        .iter()
        .map(|t| Token {
            text: norm.normalize(&t.text).into_owned(),
            bbox: t.bbox,
        })
        .collect()
}

/// Sort tokens top-to-bottom, then left-to-right.
///
/// Uses a total order on the coordinates so repeated runs over the same
/// input always produce the same sequence.
pub fn sort_reading_order(tokens: &mut [&Token]) {
    tokens.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
    });
}
