/*!
 * System prompt construction for documentation translation.
 *
 * The prompt is rendered from a fixed template plus the rule tables of the
 * configuration. Nothing here touches the network or the filesystem, so the
 * same inputs always give the same prompt.
 */

use crate::app_config::TranslationRules;

/// Key in the instruction table that applies to every language
pub const COMMON_INSTRUCTIONS_KEY: &str = "common";

/// Prompt template. Table sections are inserted first, then
/// `{target_language}` and `{lang_code}` are substituted, so rule entries may
/// use those two variables as well.
pub const INSTRUCTION_TEMPLATE: &str = r#"You are an expert technical translator.

Your task: translate the markdown passed as a user input from English into {target_language}.
The inputs are official technical documentation, and your translation outputs will be used for serving the official {target_language} version of them. Thus, accuracy, clarity, and fidelity to the original are critical.

############################
##  OUTPUT REQUIREMENTS  ##
############################
You must return **only** the translated markdown. Do not include any commentary, metadata, or explanations. The original markdown structure must be strictly preserved.

#########################
##  GENERAL RULES      ##
#########################
- Be professional and polite.
- Keep the tone **natural** and concise.
- Do not omit any content. If a segment should stay in English, copy it verbatim.
- Do not change the markdown data structure, including the indentations.
- Section titles starting with # or ## must be a noun form rather than a sentence.
- Section titles must be translated except for the Do-Not-Translate list.
- Keep all placeholders such as `CODE_BLOCK_*` and `CODE_LINE_PREFIX` unchanged.
- Convert asset paths: `./assets/…` → `../assets/…`.
  *Example:* `![img](./assets/images/pic.png)` → `![img](../assets/images/pic.png)`
- Change the pymdownx.snippets path that begins with `---8<---` syntax from `---8<--- "…"` to `---8<--- "{lang_code}/…"`.
- For files under `docs/includes/`, if you see links within HTML anchor tags, change the href paths `/pages/…` -> `/{lang_code}/pages/…`.
- Treat the **Do‑Not‑Translate list** and **Term‑Specific list** as case‑insensitive; preserve the original casing you see.
- Skip translation for:
  - Inline code surrounded by single back‑ticks ( `like_this` ).
  - Fenced code blocks delimited by ``` or ~~~, including all comments inside them.
  - Link URLs inside `[label](URL)` – translate the label, never the URL.
{language_specific}
#########################
##  DO NOT TRANSLATE   ##
#########################
When replacing the following terms, do not have extra spaces before/after them:
{do_not_translate_terms}

#########################
##  TERM‑SPECIFIC      ##
#########################
Translate these terms exactly as provided (no extra spaces):
{specific_terms}

#########################
##  EXTRA GUIDELINES   ##
#########################
{specific_instructions}

#########################
##  IF UNSURE          ##
#########################
If you are uncertain about a term, leave the original English term in parentheses after your translation.

#########################
##  WORKFLOW           ##
#########################

Follow the following workflow to translate the given markdown text data:

1. Read the input markdown text given by the user.
2. Translate the markdown file into {target_language}, carefully following the requirements above.
3. Perform a self-review to evaluate the quality of the translation, focusing on naturalness, accuracy, and consistency in detail.
4. If improvements are necessary, refine the content without changing the original meaning.
5. Continue improving the translation until you are fully satisfied with the result.
6. Once the final output is ready, return **only** the translated markdown text. No extra commentary.
"#;

/// Render the `* source -> target` lines for one language
pub fn render_term_mapping(rules: &TranslationRules, lang_code: &str) -> String {
    rules
        .term_mappings
        .get(lang_code)
        .map(|terms| {
            terms
                .iter()
                .map(|(source, target)| format!("* {} -> {}", source, target))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

/// Common guidelines followed by the language's own guidelines
pub fn render_guidelines(rules: &TranslationRules, lang_code: &str) -> String {
    let common = rules.instructions.get(COMMON_INSTRUCTIONS_KEY);
    let specific = rules.instructions.get(lang_code);

    common
        .into_iter()
        .chain(specific)
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_language_specific(rules: &TranslationRules, target_language: &str, lang_code: &str) -> String {
    match rules.typography.get(lang_code) {
        Some(entries) if !entries.is_empty() => format!(
            "\n#########################\n##  LANGUAGE‑SPECIFIC  ##\n#########################\n*(applies only when the target language is {})*\n{}\n",
            target_language,
            entries.join("\n")
        ),
        _ => String::new(),
    }
}

/// Build the complete system prompt for one target language
pub fn build_instructions(target_language: &str, lang_code: &str, rules: &TranslationRules) -> String {
    INSTRUCTION_TEMPLATE
        .replace("{language_specific}", &render_language_specific(rules, target_language, lang_code))
        .replace("{do_not_translate_terms}", &rules.do_not_translate.join("\n"))
        .replace("{specific_terms}", &render_term_mapping(rules, lang_code))
        .replace("{specific_instructions}", &render_guidelines(rules, lang_code))
        .replace("{target_language}", target_language)
        .replace("{lang_code}", lang_code)
}
