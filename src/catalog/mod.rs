pub mod builder;
pub mod words;

pub use builder::{MIN_LEVELS, build_catalog};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    pub name: String,
    pub challenges: Vec<String>,
}

impl Level {
    pub fn new(name: impl Into<String>, challenges: Vec<String>) -> Self {
        Self {
            name: name.into(),
            challenges,
        }
    }

    /// Comma-separated challenge list for the level select preview.
    pub fn preview(&self) -> String {
        self.challenges.join(", ")
    }
}

/// The ordered level list. Index is the level number; built once at startup.
#[derive(Clone, Debug)]
pub struct Catalog {
    levels: Vec<Level>,
}

impl Catalog {
    pub fn from_levels(levels: Vec<Level>) -> Self {
        Self { levels }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }
}
