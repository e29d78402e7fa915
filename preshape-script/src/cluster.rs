//! Greedy left-to-right segmentation of text into orthographic clusters.

use crate::classify::{ScriptClass, ScriptTables};

/// One orthographic cluster: the minimal codepoint sequence that must
/// render as a single visual unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    text: String,
    needs_shaping: bool,
}

impl Cluster {
    /// The cluster's codepoints, in original order.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when the cluster contains an internal halant joining
    /// consonants, i.e. it renders wrong without OpenType shaping and
    /// must be given a synthetic PUA slot.
    pub fn needs_shaping(&self) -> bool {
        self.needs_shaping
    }

    /// Number of scalars in the cluster.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Segment `text` into orthographic clusters.
///
/// Single greedy scan; the produced clusters are a lossless partition
/// of the input (concatenating them reproduces `text` exactly), and
/// segmentation never fails: unrecognized combinations degrade to
/// single-scalar clusters.
pub fn segment(text: &str, tables: &ScriptTables) -> Vec<Cluster> {
    let chars: Vec<char> = text.chars().collect();
    let mut clusters = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let mut cluster = String::from(c);
        i += 1;

        match tables.classify(c) {
            ScriptClass::Consonant => {
                // Nukta directly after the base consonant.
                if i < chars.len() && tables.classify(chars[i]) == ScriptClass::Modifier {
                    cluster.push(chars[i]);
                    i += 1;
                }

                // Chained halant + consonant pairs (conjuncts of any depth),
                // each optionally followed by its own nukta.
                while i + 1 < chars.len()
                    && tables.classify(chars[i]) == ScriptClass::Halant
                    && tables.classify(chars[i + 1]) == ScriptClass::Consonant
                {
                    cluster.push(chars[i]);
                    cluster.push(chars[i + 1]);
                    i += 2;
                    if i < chars.len() && tables.classify(chars[i]) == ScriptClass::Modifier {
                        cluster.push(chars[i]);
                        i += 1;
                    }
                }

                // Lone trailing halant: half-form with no following consonant.
                if i < chars.len() && tables.classify(chars[i]) == ScriptClass::Halant {
                    cluster.push(chars[i]);
                    i += 1;
                }

                // At most one matra, then at most one modifier.
                if i < chars.len() && tables.classify(chars[i]) == ScriptClass::Matra {
                    cluster.push(chars[i]);
                    i += 1;
                }
                if i < chars.len() && tables.classify(chars[i]) == ScriptClass::Modifier {
                    cluster.push(chars[i]);
                    i += 1;
                }
            }
            ScriptClass::Vowel => {
                // Independent vowel, optionally with anusvara/chandrabindu.
                if i < chars.len() && tables.classify(chars[i]) == ScriptClass::Modifier {
                    cluster.push(chars[i]);
                    i += 1;
                }
            }
            // Lone matra/modifier/halant without a base, or anything
            // outside the script: a one-scalar cluster. Malformed text
            // degrades instead of erroring or losing codepoints.
            ScriptClass::Matra
            | ScriptClass::Modifier
            | ScriptClass::Halant
            | ScriptClass::Other => {}
        }

        let needs_shaping = cluster.chars().count() > 1 && cluster.contains(tables.halant());
        clusters.push(Cluster {
            text: cluster,
            needs_shaping,
        });
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(clusters: &[Cluster]) -> Vec<&str> {
        clusters.iter().map(|c| c.text()).collect()
    }

    #[test]
    fn conjunct_pairs_segment_as_single_clusters() {
        let t = ScriptTables::devanagari();
        // क्षत्र: two conjuncts, each consonant + halant + consonant.
        let clusters = segment("क्षत्र", &t);
        assert_eq!(texts(&clusters), vec!["क्ष", "त्र"]);
        assert!(clusters.iter().all(|c| c.needs_shaping()));
    }

    #[test]
    fn matra_clusters_do_not_need_shaping() {
        let t = ScriptTables::devanagari();
        // राम: ra + aa-matra, ma. No halant anywhere.
        let clusters = segment("राम", &t);
        assert_eq!(texts(&clusters), vec!["रा", "म"]);
        assert!(clusters.iter().all(|c| !c.needs_shaping()));
    }

    #[test]
    fn three_consonant_conjunct() {
        let t = ScriptTables::devanagari();
        // स्त्री: sa + halant + ta + halant + ra + ii-matra.
        let clusters = segment("स्त्री", &t);
        assert_eq!(texts(&clusters), vec!["स्त्री"]);
        assert!(clusters[0].needs_shaping());
        assert_eq!(clusters[0].len(), 6);
    }

    #[test]
    fn half_form_absorbs_trailing_halant() {
        let t = ScriptTables::devanagari();
        // Word-final halant (e.g. Sanskrit-style): consonant + halant.
        let clusters = segment("जगत्", &t);
        assert_eq!(texts(&clusters), vec!["ज", "ग", "त्"]);
        assert!(clusters[2].needs_shaping());
    }

    #[test]
    fn mixed_text_is_a_lossless_partition() {
        let t = ScriptTables::devanagari();
        let input = "नमस्ते world! क्या हाल";
        let clusters = segment(input, &t);
        let rebuilt: String = clusters.iter().map(|c| c.text()).collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn degenerate_lone_marks_survive() {
        let t = ScriptTables::devanagari();
        // Matra, modifier and halant with no base consonant.
        let input = "\u{93E}\u{902}\u{94D}";
        let clusters = segment(input, &t);
        assert_eq!(clusters.len(), 3);
        let rebuilt: String = clusters.iter().map(|c| c.text()).collect();
        assert_eq!(rebuilt, input);
        assert!(clusters.iter().all(|c| !c.needs_shaping()));
    }

    #[test]
    fn vowel_absorbs_modifier() {
        let t = ScriptTables::devanagari();
        // अं: independent vowel + anusvara.
        let clusters = segment("अं", &t);
        assert_eq!(texts(&clusters), vec!["अं"]);
        assert!(!clusters[0].needs_shaping());
    }

    #[test]
    fn resegmenting_is_deterministic() {
        let t = ScriptTables::devanagari();
        let input = "क्षत्रिय धर्म";
        assert_eq!(segment(input, &t), segment(input, &t));
    }

    #[test]
    fn ascii_only_text() {
        let t = ScriptTables::devanagari();
        let clusters = segment("abc", &t);
        assert_eq!(texts(&clusters), vec!["a", "b", "c"]);
        assert!(clusters.iter().all(|c| !c.needs_shaping()));
    }

    #[test]
    fn empty_input() {
        let t = ScriptTables::devanagari();
        assert!(segment("", &t).is_empty());
    }
}
