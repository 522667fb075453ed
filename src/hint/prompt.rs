use crate::morse;

pub const MNEMONIC_SYSTEM_INSTRUCTION: &str = "You are an expert Morse code instructor creating clever, visual mnemonics for students. The mnemonic you create must start with the letter it is for. Your response must be ONLY the single mnemonic sentence, without any preamble, explanation, or quotation marks.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintPrompt {
    pub system_instruction: Option<&'static str>,
    pub text: String,
}

/// Build the request text for a challenge: a per-letter breakdown for words,
/// a few-shot mnemonic request for single characters.
pub fn build_prompt(challenge: &str) -> HintPrompt {
    let upper = challenge.to_ascii_uppercase();
    if upper.chars().count() > 1 {
        let breakdown = upper
            .chars()
            .map(|c| format!("{c}: {}", morse::encode_char(c).unwrap_or("")))
            .collect::<Vec<_>>()
            .join(" | ");
        HintPrompt {
            system_instruction: None,
            text: format!(
                "The user is learning Morse code and needs a hint for the word '{upper}'. \
                 The breakdown is: {breakdown}. Provide a simple, encouraging hint. \
                 You could give a mnemonic for the first letter or a tip for breaking down \
                 the word. Keep it to one short sentence."
            ),
        }
    } else {
        let code = morse::encode(&upper);
        HintPrompt {
            system_instruction: Some(MNEMONIC_SYSTEM_INSTRUCTION),
            text: format!(
                "The user needs a memorable mnemonic for the letter '{upper}', which is '{code}' in Morse code.\n\n\
                 Here are some excellent examples to follow:\n\
                 - T (-): \"Tall tree, a single long dash.\"\n\
                 - I (..): \"Insects have two antennae.\"\n\
                 - M (--): \"Mail man, two long letters.\"\n\
                 - A (.-): \"A-bove and below, a dot then a dash.\"\n\
                 - N (-.): \"Na-vy, a dash then a dot.\"\n\n\
                 Now, create a new, similar-quality mnemonic for '{upper}' ('{code}')."
            ),
        }
    }
}
