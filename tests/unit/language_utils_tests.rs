/*!
 * Tests for language utility functions
 */

use dualdoc::language_utils::{
    contains_source_script, get_language_name, is_source_script_char, language_codes_match, normalize_to_part2t,
    primary_subtag, validate_language_code, LanguageCodeType,
};

/// Test validation of language codes
#[test]
fn test_validate_language_code_withValidCodes_shouldReturnCorrectType() {
    assert!(matches!(validate_language_code("en").unwrap(), LanguageCodeType::Part1));
    assert!(matches!(validate_language_code("zh-TW").unwrap(), LanguageCodeType::Part1));
    assert!(matches!(validate_language_code("zho").unwrap(), LanguageCodeType::Part2T));
    assert!(matches!(validate_language_code("chi").unwrap(), LanguageCodeType::Part2B));
    assert!(matches!(validate_language_code(" EN ").unwrap(), LanguageCodeType::Part1));

    assert!(validate_language_code("xyz").is_err());
    assert!(validate_language_code("e").is_err());
    assert!(validate_language_code("").is_err());
}

/// Test that region subtags are ignored
#[test]
fn test_primary_subtag_withRegion_shouldReturnLanguage() {
    assert_eq!(primary_subtag("zh-TW"), "zh");
    assert_eq!(primary_subtag("pt_BR"), "pt");
    assert_eq!(primary_subtag("EN"), "en");
}

/// Test normalization of language codes to ISO 639-2/T format
#[test]
fn test_normalize_to_part2t_withValidCodes_shouldNormalizeCorrectly() {
    assert_eq!(normalize_to_part2t("zh-TW").unwrap(), "zho");
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
}

/// Test matching of different language code formats
#[test]
fn test_language_codes_match_withMatchingCodes_shouldReturnTrue() {
    assert!(language_codes_match("zh-TW", "zho"));
    assert!(language_codes_match("zh-TW", "zh-CN"));
    assert!(!language_codes_match("zh", "ja"));
}

/// Test that language names come in English
#[test]
fn test_get_language_name_withValidCodes_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("fr").unwrap(), "French");
}

/// Test the source-script predicate on mixed text
#[test]
fn test_contains_source_script_withMixedText_shouldDetectIdeographs() {
    assert!(contains_source_script("Step 1: 開機"));
    assert!(!contains_source_script("Step 1: power on"));
    assert!(!contains_source_script("：　、"));
    assert!(is_source_script_char('中'));
    assert!(!is_source_script_char('あ'));
}
