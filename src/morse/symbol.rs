#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    Dot,
    Dash,
}

impl Symbol {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Symbol::Dot),
            '-' => Some(Symbol::Dash),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Symbol::Dot => "Dot",
            Symbol::Dash => "Dash",
        }
    }
}

/// Parse a `.`/`-` string, stopping at the first foreign character.
pub fn parse_symbols(code: &str) -> Vec<Symbol> {
    code.chars().map_while(Symbol::from_char).collect()
}
