use regex::Regex;
use std::sync::OnceLock;

fn markdown_image_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!\[.*?\]\((.*?)\)").unwrap())
}

fn html_image_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)<img[^>]+src=(?:"([^">]+)"|'([^'>]+)')"#).unwrap())
}

/// Returns every image reference in `content`, in document order.
///
/// Both `![alt](target)` and `<img src="target">` are recognised. Duplicates
/// are kept; blank targets are dropped. The text is returned exactly as
/// written so it can be found again for replacement.
pub fn extract_references(content: &str) -> Vec<String> {
    let mut found: Vec<(usize, &str)> = Vec::new();

    for pattern in [markdown_image_pattern(), html_image_pattern()] {
        for captures in pattern.captures_iter(content) {
            // the HTML pattern captures double- and single-quoted values in separate groups
            if let Some(target) = captures.get(1).or_else(|| captures.get(2)) {
                if !target.as_str().trim().is_empty() {
                    found.push((target.start(), target.as_str()));
                }
            }
        }
    }

    found.sort_by_key(|(offset, _)| *offset);
    found.into_iter().map(|(_, raw)| raw.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_syntax() {
        let refs = extract_references("intro ![a](img/a.png) and ![](b.jpg)");
        assert_eq!(refs, vec!["img/a.png", "b.jpg"]);
    }

    #[test]
    fn test_html_syntax() {
        let refs = extract_references(r#"<img alt="x" src="a.png"> <IMG width=3 src='b.gif' />"#);
        assert_eq!(refs, vec!["a.png", "b.gif"]);
    }

    #[test]
    fn test_html_value_keeps_the_other_quote() {
        let refs = extract_references(r#"<img src="it's.png"> <img src='say "hi".png'>"#);
        assert_eq!(refs, vec!["it's.png", r#"say "hi".png"#]);
    }

    #[test]
    fn test_html_quotes_must_pair() {
        let refs = extract_references(r#"<img src="a.png'> <img src="b.png">"#);
        assert_eq!(refs, vec!["b.png"]);
    }

    #[test]
    fn test_mixed_syntax_in_document_order() {
        let content = "<img src=\"first.png\">\n![second](second.png)\n<img src=\"third.png\">";
        assert_eq!(
            extract_references(content),
            vec!["first.png", "second.png", "third.png"]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let refs = extract_references("![a](x.png) ![b](x.png)");
        assert_eq!(refs, vec!["x.png", "x.png"]);
    }

    #[test]
    fn test_blank_targets_are_dropped() {
        assert!(extract_references("![empty]() ![space]( )").is_empty());
    }

    #[test]
    fn test_plain_links_are_ignored() {
        assert!(extract_references("[not an image](x.png) and `x.png`").is_empty());
    }

    #[test]
    fn test_remote_targets_are_returned_verbatim() {
        let refs = extract_references("![r](https://host/x.png)");
        assert_eq!(refs, vec!["https://host/x.png"]);
    }
}
