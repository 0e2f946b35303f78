use tuidict_core::language::{LemmaCandidate, Lemmatizer};

const IRREGULAR: &[(&str, &str)] = &[
    ("am", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("has", "have"),
    ("had", "have"),
    ("having", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("goes", "go"),
    ("went", "go"),
    ("gone", "go"),
    ("ate", "eat"),
    ("eaten", "eat"),
    ("began", "begin"),
    ("begun", "begin"),
    ("broke", "break"),
    ("broken", "break"),
    ("brought", "bring"),
    ("bought", "buy"),
    ("caught", "catch"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("came", "come"),
    ("drank", "drink"),
    ("drunk", "drink"),
    ("drove", "drive"),
    ("driven", "drive"),
    ("dying", "die"),
    ("fell", "fall"),
    ("fallen", "fall"),
    ("felt", "feel"),
    ("found", "find"),
    ("flew", "fly"),
    ("flown", "fly"),
    ("gave", "give"),
    ("given", "give"),
    ("got", "get"),
    ("gotten", "get"),
    ("kept", "keep"),
    ("knew", "know"),
    ("known", "know"),
    ("left", "leave"),
    ("lying", "lie"),
    ("made", "make"),
    ("met", "meet"),
    ("paid", "pay"),
    ("ran", "run"),
    ("said", "say"),
    ("sang", "sing"),
    ("sung", "sing"),
    ("sat", "sit"),
    ("saw", "see"),
    ("seen", "see"),
    ("slept", "sleep"),
    ("sold", "sell"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("stood", "stand"),
    ("swam", "swim"),
    ("taught", "teach"),
    ("took", "take"),
    ("taken", "take"),
    ("thought", "think"),
    ("told", "tell"),
    ("tying", "tie"),
    ("understood", "understand"),
    ("wrote", "write"),
    ("written", "write"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("people", "person"),
    ("mice", "mouse"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("better", "good"),
    ("best", "good"),
    ("worse", "bad"),
    ("worst", "bad"),
];

/// Adjectives whose -er/-est forms are folded back
const COMPARABLE: &[&str] = &[
    "big", "bright", "busy", "cheap", "clean", "close", "cold", "dark", "deep", "early", "easy",
    "fast", "fat", "fine", "funny", "great", "happy", "hard", "heavy", "high", "hot", "large",
    "late", "long", "low", "lucky", "nice", "old", "poor", "pretty", "quick", "rich", "sad",
    "safe", "short", "simple", "slow", "small", "soft", "strange", "strong", "tall", "thin",
    "wet", "wide", "young",
];

/// Already dictionary forms despite looking inflected
const KEEP: &[&str] = &[
    "always", "analysis", "bias", "canvas", "chaos", "christmas", "hundred", "means", "news",
    "perhaps", "physics", "series", "species", "thus", "naked", "sacred", "wicked", "ceiling",
    "during", "evening", "morning", "nothing", "something", "anything", "everything", "wedding",
    "pudding", "sibling", "darling",
];

const VOWELS: &[u8] = b"aeiou";

fn is_vowel(b: u8) -> bool {
    VOWELS.contains(&b)
}

fn has_vowel(stem: &str) -> bool {
    stem.bytes().any(|b| is_vowel(b) || b == b'y')
}

fn vowel_groups(stem: &str) -> usize {
    let mut groups = 0;
    let mut in_group = false;
    for b in stem.bytes() {
        let vowel = is_vowel(b);
        if vowel && !in_group {
            groups += 1;
        }
        in_group = vowel;
    }
    groups
}

/// `stopp` → `stop`, but `call` and `miss` keep their double letter
fn undouble(stem: &str) -> Option<&str> {
    let b = stem.as_bytes();
    let n = b.len();
    if n >= 3 && b[n - 1] == b[n - 2] && !is_vowel(b[n - 1]) && !matches!(b[n - 1], b'l' | b's' | b'z' | b'f') {
        Some(&stem[..n - 1])
    } else {
        None
    }
}

/// Whether a stripped stem lost a silent `e`: `hop` → `hope`, `giv` → `give`
fn wants_silent_e(stem: &str) -> bool {
    let b = stem.as_bytes();
    let n = b.len();
    if n < 2 {
        return false;
    }
    let last = b[n - 1];

    if n == 2 && is_vowel(b[0]) && !is_vowel(last) {
        return true;
    }
    if matches!(last, b'v' | b'c' | b'u') || (last == b'z' && b[n - 2] != b'z') {
        return true;
    }

    // consonant-vowel-consonant in a one-syllable stem
    n >= 3
        && !is_vowel(last)
        && !matches!(last, b'w' | b'x' | b'y')
        && is_vowel(b[n - 2])
        && !is_vowel(b[n - 3])
        && vowel_groups(stem) == 1
}

pub struct EnglishLemmatizer;

impl EnglishLemmatizer {
    pub fn new() -> Self {
        Self
    }

    fn irregular(&self, word: &str) -> Vec<LemmaCandidate> {
        IRREGULAR
            .iter()
            .filter(|(form, _)| *form == word)
            .map(|(_, base)| LemmaCandidate {
                base_form: base.to_string(),
                rule: "irregular",
                confidence: 1.0,
            })
            .collect()
    }

    /// -ies → -y (studies → study)
    fn plural_ies(&self, word: &str) -> Vec<LemmaCandidate> {
        match word.strip_suffix("ies") {
            Some(stem) if stem.len() >= 2 => vec![LemmaCandidate {
                base_form: format!("{stem}y"),
                rule: "-ies",
                confidence: 0.85,
            }],
            _ => Vec::new(),
        }
    }

    /// -es after sibilants and o (boxes → box, watches → watch)
    fn plural_es(&self, word: &str) -> Vec<LemmaCandidate> {
        let Some(stem) = word.strip_suffix("es") else {
            return Vec::new();
        };
        let sibilant = ["ss", "x", "z", "ch", "sh", "o"]
            .iter()
            .any(|ending| stem.ends_with(ending));
        if stem.len() >= 2 && sibilant {
            vec![LemmaCandidate {
                base_form: stem.to_string(),
                rule: "-es",
                confidence: 0.8,
            }]
        } else {
            Vec::new()
        }
    }

    /// -s (cats → cat), leaving -ss/-us/-is words alone
    fn plural_s(&self, word: &str) -> Vec<LemmaCandidate> {
        let Some(stem) = word.strip_suffix('s') else {
            return Vec::new();
        };
        if stem.len() < 3 || stem.ends_with('s') || stem.ends_with('u') || stem.ends_with('i') {
            return Vec::new();
        }
        vec![LemmaCandidate {
            base_form: stem.to_string(),
            rule: "-s",
            confidence: 0.7,
        }]
    }

    /// -ied → -y (studied → study)
    fn past_ied(&self, word: &str) -> Vec<LemmaCandidate> {
        match word.strip_suffix("ied") {
            Some(stem) if stem.len() >= 2 => vec![LemmaCandidate {
                base_form: format!("{stem}y"),
                rule: "-ied",
                confidence: 0.85,
            }],
            _ => Vec::new(),
        }
    }

    /// -ed and -ing share stem repair: undouble, else restore silent e
    fn verbal(&self, word: &str, suffix: &'static str, rule: &'static str) -> Vec<LemmaCandidate> {
        let Some(stem) = word.strip_suffix(suffix) else {
            return Vec::new();
        };
        if stem.len() < 2 || !has_vowel(stem) {
            return Vec::new();
        }

        let base_form = if let Some(undoubled) = undouble(stem) {
            undoubled.to_string()
        } else if wants_silent_e(stem) || (suffix == "ed" && stem.ends_with(['a', 'e', 'i', 'o'])) {
            format!("{stem}e")
        } else {
            stem.to_string()
        };

        vec![LemmaCandidate {
            base_form,
            rule,
            confidence: 0.75,
        }]
    }

    /// -er/-est, only for known adjectives
    fn comparative(&self, word: &str) -> Vec<LemmaCandidate> {
        let mut results = Vec::new();

        for (suffix, rule) in [("est", "-est"), ("er", "-er")] {
            let Some(stem) = word.strip_suffix(suffix) else {
                continue;
            };
            let mut options = vec![stem.to_string(), format!("{stem}e")];
            if let Some(undoubled) = undouble(stem) {
                options.push(undoubled.to_string());
            }
            if let Some(root) = stem.strip_suffix('i') {
                options.push(format!("{root}y"));
            }

            if let Some(base) = options.into_iter().find(|o| COMPARABLE.contains(&o.as_str())) {
                results.push(LemmaCandidate {
                    base_form: base,
                    rule,
                    confidence: 0.9,
                });
            }
        }

        results
    }
}

impl Default for EnglishLemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer for EnglishLemmatizer {
    fn lemmatize(&self, word: &str) -> Vec<LemmaCandidate> {
        if !word.bytes().all(|b| b.is_ascii_lowercase()) || KEEP.contains(&word) {
            return Vec::new();
        }

        let irregular = self.irregular(word);
        if !irregular.is_empty() {
            return irregular;
        }
        if word.len() < 4 {
            return Vec::new();
        }

        let mut results = Vec::new();
        results.extend(self.comparative(word));
        results.extend(self.plural_ies(word));
        results.extend(self.past_ied(word));
        results.extend(self.plural_es(word));
        results.extend(self.verbal(word, "ing", "-ing"));
        results.extend(self.verbal(word, "ed", "-ed"));
        results.extend(self.plural_s(word));

        results.retain(|c| c.base_form != word);
        // Stable, so equal confidence keeps rule order
        results.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemma(word: &str) -> String {
        EnglishLemmatizer::new().lemma(word)
    }

    #[test]
    fn irregular_forms() {
        assert_eq!(lemma("went"), "go");
        assert_eq!(lemma("children"), "child");
        assert_eq!(lemma("better"), "good");
        assert_eq!(lemma("was"), "be");
    }

    #[test]
    fn plural_suffixes() {
        assert_eq!(lemma("cats"), "cat");
        assert_eq!(lemma("studies"), "study");
        assert_eq!(lemma("boxes"), "box");
        assert_eq!(lemma("watches"), "watch");
        assert_eq!(lemma("houses"), "house");
        assert_eq!(lemma("ties"), "tie");
    }

    #[test]
    fn past_and_progressive() {
        assert_eq!(lemma("studied"), "study");
        assert_eq!(lemma("stopped"), "stop");
        assert_eq!(lemma("called"), "call");
        assert_eq!(lemma("hoped"), "hope");
        assert_eq!(lemma("walked"), "walk");
        assert_eq!(lemma("played"), "play");
        assert_eq!(lemma("died"), "die");
        assert_eq!(lemma("running"), "run");
        assert_eq!(lemma("making"), "make");
        assert_eq!(lemma("giving"), "give");
        assert_eq!(lemma("reading"), "read");
        assert_eq!(lemma("visiting"), "visit");
        assert_eq!(lemma("using"), "use");
    }

    #[test]
    fn comparatives_only_for_known_adjectives() {
        assert_eq!(lemma("bigger"), "big");
        assert_eq!(lemma("happiest"), "happy");
        assert_eq!(lemma("larger"), "large");
        assert_eq!(lemma("teacher"), "teacher");
    }

    #[test]
    fn lemmas_are_left_alone() {
        for word in ["happy", "bus", "glass", "status", "this", "news", "morning", "sing", "string"] {
            assert_eq!(lemma(word), word, "{word}");
        }
    }
}
