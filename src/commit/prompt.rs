//! Prompt construction for AI-generated commit messages.

use crate::config::Config;

/// Normalize a language code into the closed set of supported languages.
///
/// `ja`, `japanese`, `jp` and `jpn` (any case) map to `"ja"`; everything
/// else, including the empty string, maps to `"en"`.
pub fn normalize_language(lang: &str) -> &'static str {
    match lang.trim().to_ascii_lowercase().as_str() {
        "ja" | "japanese" | "jp" | "jpn" => "ja",
        _ => "en",
    }
}

/// Render the commit prompt for a language, branch and diff.
///
/// Pure function of its inputs: identical arguments always produce a
/// byte-identical prompt.
pub fn render(config: &Config, lang: &str, branch: &str, diff: &str) -> String {
    let lang = normalize_language(lang);
    let template = config.template(lang);

    let guidelines = template
        .guidelines
        .iter()
        .map(|g| format!("- {}", g))
        .collect::<Vec<_>>()
        .join("\n");

    let prefixes = config
        .prefixes()
        .iter()
        .map(|p| {
            format!(
                "- \"{}: {}\" : {}",
                p.prefix_type,
                p.emoji,
                p.description(lang)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    substitute(&template.template, |name| match name {
        "system_instruction" => Some(template.system_instruction.as_str()),
        "guidelines" => Some(guidelines.as_str()),
        "branch" => Some(branch),
        "semantic_release_prefixes" => Some(prefixes.as_str()),
        "diff" => Some(diff),
        "output_format" => Some(template.output_format.as_str()),
        _ => None,
    })
}

/// Replace `{name}` placeholders in a single left-to-right pass.
///
/// Substituted values are copied verbatim and never re-scanned, so a diff
/// that happens to contain `{branch}` stays intact. Unknown placeholders
/// and unmatched braces are kept as-is.
fn substitute<'a, F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let replaced = after.find('}').and_then(|close| {
            let name = &after[..close];
            lookup(name).map(|value| (value, close))
        });

        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
