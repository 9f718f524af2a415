use anyhow::Context;
use scraper::{Html, Node};
use std::path::Path;

const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Visible text content with markup stripped.
pub fn read_html(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(visible_text(&String::from_utf8_lossy(&bytes)))
}

pub fn visible_text(source: &str) -> String {
    let document = Html::parse_document(source);
    let mut text = String::new();

    for node in document.root_element().descendants() {
        if let Node::Text(fragment) = node.value() {
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
            });
            if !hidden {
                text.push_str(fragment);
            }
        }
    }

    text
}
