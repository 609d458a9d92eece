/*!
 * Tests for dictionary loading and abbreviation expansion
 */

use mdprep::dictionary::{AbbreviationExpander, Vocabulary};
use mdprep::errors::DictionaryError;

use crate::common;

/// Test loading a dictionary file with mixed entries
#[test]
fn test_vocabulary_load_withMixedFile_shouldSeparateTermsAndAbbreviations() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "materials.txt",
        "aço inox\nBRONZE\n\nAI=Aço Inox\nlatão\n",
    )
    .unwrap();

    let vocabulary = Vocabulary::load(&path).unwrap();
    assert_eq!(vocabulary.len(), 3);
    // entries are normalized: uppercased and accent-folded
    assert!(vocabulary.terms.contains("ACO INOX"));
    assert!(vocabulary.terms.contains("LATAO"));
    assert_eq!(
        vocabulary.abbreviations,
        vec![("AI".to_string(), "ACO INOX".to_string())]
    );
}

/// Test that a missing dictionary aborts instead of matching nothing
#[test]
fn test_vocabulary_load_withMissingFile_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let result = Vocabulary::load(dir.path().join("absent.txt"));
    assert!(matches!(result, Err(DictionaryError::Unreadable { .. })));
}

/// Test expansion over the union of several vocabularies
#[test]
fn test_expander_fromVocabularies_withSeveralSources_shouldApplyAllEntries() {
    let materials = Vocabulary::parse("AI=ACO INOX\n");
    let norms = Vocabulary::parse("NBR=NORMA BRASILEIRA\n");
    let expander = AbbreviationExpander::from_vocabularies(&[&materials, &norms]).unwrap();

    assert_eq!(expander.len(), 2);
    assert_eq!(
        expander.expand("PARAFUSO AI NBR 5580"),
        "PARAFUSO ACO INOX NORMA BRASILEIRA 5580"
    );
}

/// Test that expansion never touches fragments of longer words
#[test]
fn test_expander_expand_withEmbeddedKey_shouldLeaveWordIntact() {
    let vocabulary = Vocabulary::parse("CANO=TUBO\n");
    let expander = AbbreviationExpander::from_vocabularies(&[&vocabulary]).unwrap();

    assert_eq!(expander.expand("VULCANO CANO CURVO"), "VULCANO TUBO CURVO");
}

/// Test that replacement text containing '$' is taken literally
#[test]
fn test_expander_expand_withDollarInReplacement_shouldNotExpandCaptures() {
    let vocabulary = Vocabulary::parse("USD=US$ DOLAR\n");
    let expander = AbbreviationExpander::from_vocabularies(&[&vocabulary]).unwrap();

    assert_eq!(expander.expand("VALOR USD 100"), "VALOR US$ DOLAR 100");
}
