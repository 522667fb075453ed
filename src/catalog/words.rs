/// Pedagogical introduction order: short, frequent codes first.
pub const INTRO_ORDER: &str = "ETIANMSURWDKGOHVFLPJBXCYZQ5432167890";

pub const WORDS_3: &[&str] = &[
    "THE", "AND", "FOR", "ARE", "BUT", "NOT", "YOU", "ALL", "ANY", "CAN", "HAD", "HER", "WAS",
    "ONE", "OUR", "OUT", "DAY", "GET", "HAS", "HIM", "HIS", "HOW", "MAN", "NEW", "NOW", "OLD",
    "SEE", "TWO", "WAY", "WHO", "BOY", "DID", "ITS", "LET", "PUT", "SAY", "SHE", "TOO", "USE",
];

pub const WORDS_4: &[&str] = &[
    "THAT", "WITH", "HAVE", "THIS", "WILL", "YOUR", "FROM", "THEY", "KNOW", "WANT", "BEEN",
    "GOOD", "MUCH", "SOME", "TIME", "VERY", "WHEN", "COME", "HERE", "JUST", "LIKE", "LONG",
    "MAKE", "MANY", "MORE", "ONLY", "OVER", "SUCH", "TAKE", "THAN", "THEM", "WELL", "WERE",
];

pub const WORDS_5: &[&str] = &[
    "ABOUT", "ABOVE", "AFTER", "AGAIN", "BELOW", "COULD", "EVERY", "FIRST", "FOUND", "GREAT",
    "HOUSE", "LARGE", "LEARN", "NEVER", "OTHER", "PLACE", "PLANT", "POINT", "RIGHT", "SMALL",
    "SOUND", "SPELL", "STILL", "STUDY", "THEIR", "THERE", "THESE", "THING", "THINK", "THREE",
    "WATER", "WHERE", "WHICH", "WORLD", "WOULD", "WRITE",
];

pub const WORDS_6_PLUS: &[&str] = &[
    "ALWAYS", "ANIMAL", "ANSWER", "BECOME", "BETTER", "BLACK", "BRING", "CARRY", "CHANGE",
    "CREATE", "DIFFER", "ENOUGH", "EXAMPLE", "FAMILY", "FATHER", "FOLLOW", "FRIEND", "GROUND",
    "GROW", "HAPPEN", "HEARD", "IMPORTANT", "KNOWLEDGE", "LETTER", "LIGHT", "LITTLE", "MOTHER",
    "MYSELF", "NEARLY", "NUMBER", "PEOPLE", "PICTURE", "QUESTION", "REMEMBER", "SCHOOL",
    "SECOND", "SENTENCE", "SHOULD", "SOMETHING", "THOUGHT", "TOGETHER", "TURNING", "USUALLY",
    "VOICE", "WALKED", "WHITE", "WITHOUT", "WONDER",
];

/// Word tiers in the order their practice levels are emitted, with the
/// level name prefix for each.
pub const WORD_TIERS: [(&str, &[&str]); 4] = [
    ("3-Letter Word", WORDS_3),
    ("4-Letter Word", WORDS_4),
    ("5-Letter Word", WORDS_5),
    ("Advanced Word", WORDS_6_PLUS),
];

pub fn all_words() -> Vec<&'static str> {
    WORD_TIERS
        .iter()
        .flat_map(|(_, words)| words.iter().copied())
        .collect()
}
