//! Inline keyboard construction
//!
//! Groups a flat list of buttons into rows of at most `row_limit` buttons.
//! Every row except the last is full; the last row holds the remainder.

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Row limit used when the caller does not pick one
pub const DEFAULT_ROW_LIMIT: usize = 10;

/// A clickable inline button carrying a callback payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl KeyboardButton {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

/// Inline keyboard markup, serialized as `{"inline_keyboard": [[...], ...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    inline_keyboard: Vec<Vec<KeyboardButton>>,
}

impl Keyboard {
    /// Build a keyboard, chunking `buttons` into rows of `row_limit`
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when `row_limit` is zero.
    pub fn new(buttons: Vec<KeyboardButton>, row_limit: usize) -> AppResult<Self> {
        if row_limit == 0 {
            return Err(AppError::Validation(
                "Keyboard row limit must be positive".to_string(),
            ));
        }

        Ok(Self::chunked(&buttons, row_limit))
    }

    /// Build a keyboard with the default row limit
    pub fn from_buttons(buttons: Vec<KeyboardButton>) -> Self {
        Self::chunked(&buttons, DEFAULT_ROW_LIMIT)
    }

    // row_limit must be non-zero
    fn chunked(buttons: &[KeyboardButton], row_limit: usize) -> Self {
        let inline_keyboard = buttons
            .chunks(row_limit)
            .map(|row| row.to_vec())
            .collect();
        Self { inline_keyboard }
    }

    pub fn rows(&self) -> &[Vec<KeyboardButton>] {
        &self.inline_keyboard
    }

    pub fn button_count(&self) -> usize {
        self.inline_keyboard.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.inline_keyboard.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buttons(n: usize) -> Vec<KeyboardButton> {
        (0..n)
            .map(|i| KeyboardButton::new(format!("Button {i}"), format!("btn_{i}")))
            .collect()
    }

    #[test]
    fn test_rows_are_full_except_last() {
        for n in 0..25 {
            for limit in 1..7 {
                let input = buttons(n);
                let keyboard = Keyboard::new(input.clone(), limit).unwrap();
                let rows = keyboard.rows();

                if let Some((last, full)) = rows.split_last() {
                    assert!(full.iter().all(|row| row.len() == limit));
                    assert!(!last.is_empty() && last.len() <= limit);
                }

                let flattened: Vec<KeyboardButton> = rows.concat();
                assert_eq!(flattened, input, "n={n} limit={limit}");
            }
        }
    }

    /// The last button of each row must not be dropped at row boundaries.
    #[test]
    fn test_row_boundary_keeps_every_button() {
        let keyboard = Keyboard::new(buttons(4), 2).unwrap();
        assert_eq!(keyboard.rows().len(), 2);
        assert_eq!(keyboard.rows()[0][1].callback_data, "btn_1");
        assert_eq!(keyboard.rows()[1][1].callback_data, "btn_3");
        assert_eq!(keyboard.button_count(), 4);
    }

    #[test]
    fn test_default_row_limit() {
        let keyboard = Keyboard::from_buttons(buttons(23));
        let lens: Vec<usize> = keyboard.rows().iter().map(Vec::len).collect();
        assert_eq!(lens, vec![10, 10, 3]);
    }

    #[test]
    fn test_from_buttons_matches_explicit_default_limit() {
        for n in [0, 1, 10, 11, 31] {
            assert_eq!(
                Keyboard::from_buttons(buttons(n)),
                Keyboard::new(buttons(n), DEFAULT_ROW_LIMIT).unwrap(),
                "n={n}"
            );
        }
    }

    #[test]
    fn test_zero_row_limit_rejected() {
        let err = Keyboard::new(buttons(3), 0).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_empty_keyboard() {
        let keyboard = Keyboard::new(Vec::new(), 3).unwrap();
        assert!(keyboard.is_empty());
        assert_eq!(
            serde_json::to_value(&keyboard).unwrap(),
            serde_json::json!({"inline_keyboard": []})
        );
    }

    #[test]
    fn test_serialization_shape() {
        let keyboard = Keyboard::new(buttons(3), 2).unwrap();
        let json = serde_json::to_value(&keyboard).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "inline_keyboard": [
                    [
                        {"text": "Button 0", "callback_data": "btn_0"},
                        {"text": "Button 1", "callback_data": "btn_1"}
                    ],
                    [
                        {"text": "Button 2", "callback_data": "btn_2"}
                    ]
                ]
            })
        );
    }
}
