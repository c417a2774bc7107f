/*!
 * Tests for system prompt construction
 */

use docs_translate::app_config::TranslationRules;
use docs_translate::translation::instructions::{render_guidelines, render_term_mapping};
use docs_translate::translation::build_instructions;
use std::collections::BTreeMap;

fn custom_rules() -> TranslationRules {
    TranslationRules {
        do_not_translate: vec!["Widget".to_string()],
        term_mappings: BTreeMap::from([(
            "ko".to_string(),
            BTreeMap::from([("agent".to_string(), "에이전트".to_string())]),
        )]),
        instructions: BTreeMap::from([
            ("common".to_string(), vec!["* Keep links intact.".to_string()]),
            ("ko".to_string(), vec!["* Use {target_language} honorifics.".to_string()]),
        ]),
        typography: BTreeMap::new(),
    }
}

#[test]
fn test_render_term_mapping_shouldUseArrowLines() {
    assert_eq!(render_term_mapping(&custom_rules(), "ko"), "* agent -> 에이전트");
    assert_eq!(render_term_mapping(&custom_rules(), "ja"), "");
}

#[test]
fn test_render_guidelines_shouldPutCommonFirst() {
    assert_eq!(
        render_guidelines(&custom_rules(), "ko"),
        "* Keep links intact.\n* Use {target_language} honorifics."
    );
}

#[test]
fn test_build_instructions_withCustomRules_shouldSubstituteVariablesInRules() {
    let prompt = build_instructions("Korean", "ko", &custom_rules());

    assert!(prompt.contains("into Korean"));
    assert!(prompt.contains("Widget"));
    assert!(prompt.contains("* agent -> 에이전트"));
    assert!(prompt.contains("* Use Korean honorifics."));
    assert!(prompt.contains(r#"---8<--- "ko/…""#));
    assert!(prompt.contains("/ko/pages/…"));
    assert!(!prompt.contains("LANGUAGE‑SPECIFIC"));
}

#[test]
fn test_build_instructions_shouldMentionPlaceholders() {
    let prompt = build_instructions("Japanese", "ja", &TranslationRules::default());
    assert!(prompt.contains("CODE_BLOCK_*"));
    assert!(prompt.contains("half-width space"));
}
