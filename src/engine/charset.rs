use rand::Rng;

const LETTERS: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];
const NUMBERS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Character subset the trainer draws challenges from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CharSet {
    #[default]
    Letters,
    Numbers,
    All,
}

impl CharSet {
    pub fn chars(self) -> Vec<char> {
        match self {
            CharSet::Letters => LETTERS.to_vec(),
            CharSet::Numbers => NUMBERS.to_vec(),
            CharSet::All => LETTERS.iter().chain(NUMBERS.iter()).copied().collect(),
        }
    }

    /// Uniform pick with replacement.
    pub fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> char {
        let chars = self.chars();
        chars[rng.gen_range(0..chars.len())]
    }

    pub fn label(self) -> &'static str {
        match self {
            CharSet::Letters => "Letters",
            CharSet::Numbers => "Numbers",
            CharSet::All => "All",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            CharSet::Letters => CharSet::Numbers,
            CharSet::Numbers => CharSet::All,
            CharSet::All => CharSet::Letters,
        }
    }
}
