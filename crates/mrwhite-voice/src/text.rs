//! Text cleanup before text-to-speech.
//!
//! Assistant replies are markdown. The speech proxy reads every character it
//! is given, so formatting has to go before a span is narrated. Offsets are
//! always tracked against the raw text; cleanup only affects what is spoken.

/// Strip markdown formatting from a span, producing plain spoken text.
///
/// Handles:
/// - Fenced code blocks → "Code omitted."
/// - Headings, blockquotes, bullet and numbered list markers → text only
/// - Bold / italic / strikethrough markers → removed
/// - Inline code → unwrapped
/// - Links `[text](url)` → text; images → removed
/// - HTML tags → removed
/// - Whitespace runs → single spaces
#[must_use]
pub fn clean_for_speech(text: &str) -> String {
    let mut spoken = String::with_capacity(text.len());
    let mut in_fence = false;

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            if !in_fence {
                push_words(&mut spoken, "Code omitted.");
            }
            in_fence = !in_fence;
            continue;
        }
        if in_fence || is_rule(trimmed) {
            continue;
        }

        let line = strip_block_markers(trimmed);
        let line = strip_links(line);
        let line = strip_inline(&line);
        push_words(&mut spoken, &line);
    }

    spoken
}

// ── Internal helpers ───────────────────────────────────────────────

fn push_words(out: &mut String, text: &str) {
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
}

fn is_rule(line: &str) -> bool {
    let mut marks = line.chars().filter(|c| !c.is_whitespace());
    let Some(first) = marks.next() else {
        return false;
    };
    matches!(first, '-' | '*' | '_') && line.chars().filter(|c| *c == first).count() >= 3
        && marks.all(|c| c == first)
}

fn strip_block_markers(mut line: &str) -> &str {
    while let Some(rest) = line.strip_prefix('>') {
        line = rest.trim_start();
    }
    if line.starts_with('#') {
        line = line.trim_start_matches('#').trim_start();
    }
    if let Some(rest) = ["- ", "* ", "+ "]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
    {
        return rest;
    }

    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let after = &line[digits..];
        if let Some(rest) = after.strip_prefix(". ").or_else(|| after.strip_prefix(") ")) {
            return rest;
        }
    }
    line
}

/// `[text](url)` → `text`, `![alt](url)` → nothing.
fn strip_links(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open..].find("](").map(|i| open + i) else {
            break;
        };
        let Some(end) = rest[close..].find(')').map(|i| close + i) else {
            break;
        };

        let is_image = rest[..open].ends_with('!');
        let before = if is_image { &rest[..open - 1] } else { &rest[..open] };
        out.push_str(before);
        if !is_image {
            out.push_str(&rest[open + 1..close]);
        }
        rest = &rest[end + 1..];
    }

    out.push_str(rest);
    out
}

fn strip_inline(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_tag = false;

    for c in line.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            '*' | '`' | '~' => {}
            _ => out.push(c),
        }
    }

    out.replace("__", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(clean_for_speech("Dogs can eat carrots."), "Dogs can eat carrots.");
    }

    #[test]
    fn emphasis_and_code_are_unwrapped() {
        assert_eq!(
            clean_for_speech("**Never** give `xylitol` to a ~~cat~~ dog."),
            "Never give xylitol to a cat dog."
        );
    }

    #[test]
    fn links_keep_text_images_vanish() {
        assert_eq!(
            clean_for_speech("See [the AKC guide](https://akc.org) ![chart](c.png) today."),
            "See the AKC guide today."
        );
    }

    #[test]
    fn block_markers_are_removed() {
        let text = "## Feeding\n- Morning: 1 cup\n2. Evening: 1 cup\n> Ask your vet";
        assert_eq!(
            clean_for_speech(text),
            "Feeding Morning: 1 cup Evening: 1 cup Ask your vet"
        );
    }

    #[test]
    fn code_fences_are_summarised() {
        let text = "Try this:\n```\nfeed(dog)\n```\nThen wait.";
        assert_eq!(clean_for_speech(text), "Try this: Code omitted. Then wait.");
    }

    #[test]
    fn rules_and_tags_are_dropped() {
        assert_eq!(clean_for_speech("Hi<br/>\n---\nthere"), "Hi there");
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert_eq!(clean_for_speech("  \n\t "), "");
        assert_eq!(clean_for_speech("**"), "");
    }
}
