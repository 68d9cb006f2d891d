//! Bank and language detection over full document text.

use satang_core::keywords::{ENGLISH_HEADER_KEYWORDS, THAI_HEADER_KEYWORDS};
use satang_core::{Bank, Language};

/// Thai-script codepoint threshold for the language tie-break. Addresses
/// on an English statement contribute some Thai characters; headers
/// contribute far more.
const THAI_CHAR_THRESHOLD: usize = 200;

/// Classify the issuing bank. Markers are checked in fixed precedence
/// (SCB first, then BBL); text matching neither set is read as KBank.
/// First match wins, there is no confidence score.
pub fn detect_bank(text: &str) -> Bank {
    if text.contains("SIAM COMMERCIAL") || text.contains("ไทยพาณิชย์") || text.contains("SCB") {
        return Bank::Scb;
    }
    if text.contains("Bangkok Bank") || text.contains("ธนาคารกรุงเทพ") || text.contains("Bualuang") {
        return Bank::Bbl;
    }
    Bank::Kbank
}

/// Classify the document as Thai or English.
///
/// Counts header/label vocabulary only: transaction descriptions are
/// bilingual regardless of statement language and would mislead. A tie
/// falls back to counting Thai-script codepoints.
pub fn detect_language(text: &str) -> Language {
    let thai_hits = THAI_HEADER_KEYWORDS
        .iter()
        .filter(|kw| text.contains(*kw))
        .count();
    let english_hits = ENGLISH_HEADER_KEYWORDS
        .iter()
        .filter(|kw| text.contains(*kw))
        .count();

    if thai_hits > english_hits {
        return Language::Th;
    }
    if english_hits > thai_hits {
        return Language::En;
    }

    let thai_chars = text
        .chars()
        .filter(|c| ('\u{0E00}'..='\u{0E7F}').contains(c))
        .count();
    if thai_chars > THAI_CHAR_THRESHOLD {
        Language::Th
    } else {
        Language::En
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scb_markers_take_precedence() {
        // Both banks mentioned; SCB is checked first.
        let text = "SIAM COMMERCIAL BANK ... transfer from Bangkok Bank";
        assert_eq!(detect_bank(text), Bank::Scb);
        assert_eq!(detect_bank("Bualuang iBanking statement"), Bank::Bbl);
    }

    #[test]
    fn test_detect_bank_defaults_to_kbank() {
        assert_eq!(detect_bank("no recognizable markers here"), Bank::Kbank);
        assert_eq!(detect_bank(""), Bank::Kbank);
    }

    #[test]
    fn test_detect_bank_thai_markers() {
        assert_eq!(detect_bank("ธนาคารไทยพาณิชย์ จำกัด"), Bank::Scb);
        assert_eq!(detect_bank("ธนาคารกรุงเทพ จำกัด"), Bank::Bbl);
    }

    #[test]
    fn test_detect_language_by_header_keywords() {
        let th = "ยอดยกมา 1,000.00 ยอดยกไป 2,000.00 ชื่อบัญชี นาย ก";
        assert_eq!(detect_language(th), Language::Th);

        let en = "Beginning Balance 1,000.00 Ending Balance 2,000.00 Account Name";
        assert_eq!(detect_language(en), Language::En);
    }

    #[test]
    fn test_detect_language_tie_falls_back_to_char_count() {
        // No header keywords either way, little Thai text: English.
        assert_eq!(detect_language("just some transaction noise"), Language::En);

        // No header keywords, but a long run of Thai script: Thai.
        let thai_block = "รายการโอนเงินระหว่างบัญชีธนาคารในประเทศไทย".repeat(6);
        assert!(thai_block.chars().count() > 200);
        assert_eq!(detect_language(&thai_block), Language::Th);
    }
}
