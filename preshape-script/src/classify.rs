//! Codepoint classification against fixed per-script Unicode tables.

use std::ops::RangeInclusive;

/// Role a codepoint plays in cluster formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptClass {
    /// A base consonant, including extended (nukta-precomposed) consonants.
    Consonant,
    /// A combining modifier: nukta, anusvara, visarga or chandrabindu.
    Modifier,
    /// The vowel-suppressing virama that joins consonants into conjuncts.
    Halant,
    /// A dependent vowel sign attached to a preceding consonant.
    Matra,
    /// An independent vowel or any other in-script character.
    Vowel,
    /// Anything outside the script block (spaces, punctuation, Latin, ...).
    Other,
}

/// Unicode range tables for one script.
///
/// `classify` is total over all scalars: anything outside the script
/// block is `Other`, so segmentation never fails on mixed text.
#[derive(Debug, Clone)]
pub struct ScriptTables {
    block: RangeInclusive<u32>,
    consonants: Vec<RangeInclusive<u32>>,
    halant: u32,
    matras: RangeInclusive<u32>,
    modifiers: Vec<u32>,
}

impl ScriptTables {
    /// Tables for Devanagari (Hindi, Marathi, Nepali, Sanskrit).
    pub fn devanagari() -> Self {
        Self {
            block: 0x0900..=0x097F,
            // Main consonant run plus the nukta-precomposed extensions
            // (qa, khha, ghha, za, dddha, rha, fa, yya).
            consonants: vec![0x0915..=0x0939, 0x0958..=0x095F],
            halant: 0x094D,
            matras: 0x093E..=0x094C,
            // Chandrabindu, anusvara, visarga, nukta.
            modifiers: vec![0x0901, 0x0902, 0x0903, 0x093C],
        }
    }

    /// Classify a single scalar. Pure lookup, no state, no errors.
    pub fn classify(&self, c: char) -> ScriptClass {
        let cp = c as u32;
        if !self.block.contains(&cp) {
            return ScriptClass::Other;
        }
        if cp == self.halant {
            return ScriptClass::Halant;
        }
        if self.consonants.iter().any(|r| r.contains(&cp)) {
            return ScriptClass::Consonant;
        }
        if self.matras.contains(&cp) {
            return ScriptClass::Matra;
        }
        if self.modifiers.contains(&cp) {
            return ScriptClass::Modifier;
        }
        ScriptClass::Vowel
    }

    /// The script's halant/virama scalar.
    pub fn halant(&self) -> char {
        // Table construction only ever stores valid scalars.
        char::from_u32(self.halant).unwrap_or('\u{94D}')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn devanagari_consonants() {
        let t = ScriptTables::devanagari();
        assert_eq!(t.classify('क'), ScriptClass::Consonant);
        assert_eq!(t.classify('ह'), ScriptClass::Consonant);
        // Extended consonant (qa, U+0958)
        assert_eq!(t.classify('\u{958}'), ScriptClass::Consonant);
    }

    #[test]
    fn devanagari_marks() {
        let t = ScriptTables::devanagari();
        assert_eq!(t.classify('\u{94D}'), ScriptClass::Halant);
        assert_eq!(t.classify('ा'), ScriptClass::Matra);
        assert_eq!(t.classify('\u{902}'), ScriptClass::Modifier);
        assert_eq!(t.classify('\u{93C}'), ScriptClass::Modifier);
    }

    #[test]
    fn devanagari_vowels_and_other() {
        let t = ScriptTables::devanagari();
        assert_eq!(t.classify('अ'), ScriptClass::Vowel);
        assert_eq!(t.classify('ई'), ScriptClass::Vowel);
        assert_eq!(t.classify('a'), ScriptClass::Other);
        assert_eq!(t.classify(' '), ScriptClass::Other);
        assert_eq!(t.classify('😀'), ScriptClass::Other);
    }
}
