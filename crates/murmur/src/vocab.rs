//! Token-id-to-word vocabulary with Whisper control-token handling.

use std::collections::HashMap;

use tracing::debug;

/// Task marker ids, identical in both vocabulary variants.
pub const TOKEN_TRANSLATE: i32 = 50_358;
pub const TOKEN_TRANSCRIBE: i32 = 50_359;

const BASE_EOT: i32 = 50_256;
const BASE_SOT: i32 = 50_257;
const BASE_PREV: i32 = 50_360;
const BASE_SOLM: i32 = 50_361;
const BASE_NOT: i32 = 50_362;
const BASE_BEG: i32 = 50_363;

const N_VOCAB_ENGLISH: i32 = 51_864;
const N_VOCAB_MULTILINGUAL: i32 = 51_865;

/// Control-token ids. The multilingual table shifts each of these up by
/// one relative to the English-only table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialTokens {
    pub eot: i32,
    pub sot: i32,
    pub prev: i32,
    pub solm: i32,
    pub no_timestamps: i32,
    pub beg: i32,
}

impl SpecialTokens {
    #[must_use]
    pub fn for_table(multilingual: bool) -> Self {
        let shift = i32::from(multilingual);
        Self {
            eot: BASE_EOT + shift,
            sot: BASE_SOT + shift,
            prev: BASE_PREV + shift,
            solm: BASE_SOLM + shift,
            no_timestamps: BASE_NOT + shift,
            beg: BASE_BEG + shift,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Vocabulary {
    words: HashMap<i32, String>,
    special: SpecialTokens,
}

impl Vocabulary {
    /// Build the table from the stored words plus synthetic control labels.
    ///
    /// Ids from `words.len()` up to the language-dependent table size get
    /// placeholder labels so every id the model can emit resolves to
    /// something printable.
    #[must_use]
    pub fn with_control_labels(words: Vec<String>, multilingual: bool) -> Self {
        let special = SpecialTokens::for_table(multilingual);
        let n_total = if multilingual {
            N_VOCAB_MULTILINGUAL
        } else {
            N_VOCAB_ENGLISH
        };

        let n_stored = words.len() as i32;
        let mut map = HashMap::with_capacity(n_total.max(n_stored) as usize);
        for (id, word) in words.into_iter().enumerate() {
            map.insert(id as i32, word);
        }

        for id in n_stored..n_total {
            let label = if id > special.beg {
                format!("[_TT_{}]", id - special.beg)
            } else if id == special.eot {
                "[_EOT_]".to_string()
            } else if id == special.sot {
                "[_SOT_]".to_string()
            } else if id == special.prev {
                "[_PREV_]".to_string()
            } else if id == special.no_timestamps {
                "[_NOT_]".to_string()
            } else if id == special.beg {
                "[_BEG_]".to_string()
            } else {
                format!("[_extra_token_{id}]")
            };
            map.insert(id, label);
        }

        Self {
            words: map,
            special,
        }
    }

    #[must_use]
    pub fn special(&self) -> SpecialTokens {
        self.special
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[must_use]
    pub fn word(&self, id: i32) -> Option<&str> {
        self.words.get(&id).map(String::as_str)
    }

    /// Render a token sequence, stopping at end-of-transcript.
    ///
    /// Ids at or above EOT are control tokens and contribute no text; the
    /// task markers are only noted in the debug log.
    #[must_use]
    pub fn render_transcript(&self, tokens: &[i32]) -> String {
        let mut text = String::new();
        for &token in tokens {
            if token == self.special.eot {
                break;
            }
            if token < self.special.eot {
                if let Some(word) = self.word(token) {
                    text.push_str(word);
                }
            } else {
                if token == TOKEN_TRANSCRIBE {
                    debug!("transcription task marker");
                }
                if token == TOKEN_TRANSLATE {
                    debug!("translation task marker");
                }
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::{SpecialTokens, Vocabulary, TOKEN_TRANSCRIBE};

    #[test]
    fn multilingual_table_shifts_control_ids() {
        let english = SpecialTokens::for_table(false);
        let multilingual = SpecialTokens::for_table(true);

        assert_eq!(english.eot, 50_256);
        assert_eq!(english.sot, 50_257);
        assert_eq!(english.beg, 50_363);
        assert_eq!(multilingual.eot, english.eot + 1);
        assert_eq!(multilingual.sot, english.sot + 1);
        assert_eq!(multilingual.prev, english.prev + 1);
        assert_eq!(multilingual.solm, english.solm + 1);
        assert_eq!(multilingual.no_timestamps, english.no_timestamps + 1);
        assert_eq!(multilingual.beg, english.beg + 1);
    }

    #[test]
    fn control_labels_fill_the_table() {
        let vocab = Vocabulary::with_control_labels(Vec::new(), false);
        assert_eq!(vocab.len(), 51_864);
        assert_eq!(vocab.word(50_256), Some("[_EOT_]"));
        assert_eq!(vocab.word(50_257), Some("[_SOT_]"));
        assert_eq!(vocab.word(50_360), Some("[_PREV_]"));
        assert_eq!(vocab.word(50_362), Some("[_NOT_]"));
        assert_eq!(vocab.word(50_363), Some("[_BEG_]"));
        // task markers and SOLM fall through to the generic label
        assert_eq!(vocab.word(50_359), Some("[_extra_token_50359]"));
        assert_eq!(vocab.word(50_361), Some("[_extra_token_50361]"));
        // timestamp range past BEG
        assert_eq!(vocab.word(50_364), Some("[_TT_1]"));
        assert_eq!(vocab.word(51_863), Some("[_TT_1500]"));
        assert_eq!(vocab.word(51_864), None);
    }

    #[test]
    fn multilingual_labels_land_on_shifted_ids() {
        let vocab = Vocabulary::with_control_labels(Vec::new(), true);
        assert_eq!(vocab.len(), 51_865);
        assert_eq!(vocab.word(50_257), Some("[_EOT_]"));
        assert_eq!(vocab.word(50_258), Some("[_SOT_]"));
        assert_eq!(vocab.word(50_364), Some("[_BEG_]"));
        assert_eq!(vocab.word(51_864), Some("[_TT_1500]"));
    }

    #[test]
    fn transcript_stops_at_eot_and_skips_control_ids() {
        let vocab =
            Vocabulary::with_control_labels(vec!["Hello".to_string(), " world".to_string()], false);
        let eot = vocab.special().eot;

        let text = vocab.render_transcript(&[0, TOKEN_TRANSCRIBE, 1, eot, 0, 0]);
        assert_eq!(text, "Hello world");

        assert_eq!(vocab.render_transcript(&[eot, 0, 1]), "");
    }

    #[test]
    fn stored_words_win_over_synthetic_labels() {
        let words: Vec<String> = (0..4).map(|i| format!("w{i}")).collect();
        let vocab = Vocabulary::with_control_labels(words, false);
        assert_eq!(vocab.word(0), Some("w0"));
        assert_eq!(vocab.word(3), Some("w3"));
        assert_eq!(vocab.word(4), Some("[_extra_token_4]"));
    }
}
