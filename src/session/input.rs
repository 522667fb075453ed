use std::time::{Duration, Instant};

use crate::morse::Symbol;

/// How long the dot/dash button stays highlighted after a press.
const FLASH: Duration = Duration::from_millis(150);

/// Symbols entered so far for the current challenge.
#[derive(Clone, Debug, Default)]
pub struct SymbolInput {
    symbols: Vec<Symbol>,
    last_press: Option<(Symbol, Instant)>,
}

impl SymbolInput {
    pub fn push(&mut self, symbol: Symbol, now: Instant) {
        self.symbols.push(symbol);
        self.last_press = Some((symbol, now));
    }

    pub fn clear(&mut self) {
        self.symbols.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn as_code(&self) -> String {
        self.symbols.iter().map(|s| s.as_char()).collect()
    }

    pub fn matches(&self, expected: &str) -> bool {
        self.symbols.len() == expected.len()
            && self
                .symbols
                .iter()
                .zip(expected.chars())
                .all(|(s, c)| s.as_char() == c)
    }

    /// The button to highlight, if one was pressed within the flash window.
    pub fn flash(&self, now: Instant) -> Option<Symbol> {
        self.last_press
            .filter(|(_, at)| now.saturating_duration_since(*at) < FLASH)
            .map(|(symbol, _)| symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_from(code: &str) -> SymbolInput {
        let now = Instant::now();
        let mut input = SymbolInput::default();
        for ch in code.chars() {
            input.push(Symbol::from_char(ch).unwrap(), now);
        }
        input
    }

    #[test]
    fn test_matches_exact_code_only() {
        assert!(input_from("...---...").matches("...---..."));
        assert!(!input_from("...---..").matches("...---..."));
        assert!(!input_from("...---...-").matches("...---..."));
        assert!(!input_from("..----...").matches("...---..."));
    }

    #[test]
    fn test_empty_input_matches_empty_code() {
        assert!(SymbolInput::default().matches(""));
    }

    #[test]
    fn test_as_code_renders_symbols() {
        assert_eq!(input_from("-.-").as_code(), "-.-");
    }

    #[test]
    fn test_flash_expires() {
        let t0 = Instant::now();
        let mut input = SymbolInput::default();
        input.push(Symbol::Dash, t0);
        assert_eq!(input.flash(t0 + Duration::from_millis(100)), Some(Symbol::Dash));
        assert_eq!(input.flash(t0 + Duration::from_millis(200)), None);
    }

    #[test]
    fn test_clear_keeps_nothing() {
        let mut input = input_from("..");
        input.clear();
        assert!(input.is_empty());
        assert_eq!(input.len(), 0);
    }
}
