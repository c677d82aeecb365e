use crate::error::AssistError;
use crate::extract::ExtractedContent;
use htmd::options::{CodeBlockStyle, HeadingStyle, Options};
use htmd::{Element, HtmlToMarkdown};
use markup5ever_rcdom::{Node, NodeData};
use regex::Regex;
use std::rc::Rc;
use std::sync::OnceLock;

fn language_class() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"language-(\w+)").expect("static regex"))
}

fn converter() -> &'static HtmlToMarkdown {
    static CONVERTER: OnceLock<HtmlToMarkdown> = OnceLock::new();
    CONVERTER.get_or_init(|| {
        HtmlToMarkdown::builder()
            .options(Options {
                heading_style: HeadingStyle::Atx,
                code_block_style: CodeBlockStyle::Fenced,
                ..Default::default()
            })
            .add_handler(vec!["i", "em"], emphasis)
            .add_handler(vec!["pre"], code_block)
            .build()
    })
}

pub fn html_to_markdown(content: &ExtractedContent) -> Result<String, AssistError> {
    let md = converter()
        .convert(content.html())
        .map_err(|e| AssistError::ConversionFailed(e.to_string()))?;
    Ok(clean_markdown(&md))
}

/// `*text*`, keeping surrounding whitespace outside the delimiters.
fn emphasis(element: Element) -> Option<String> {
    let inner = element.content.trim();
    if inner.is_empty() {
        return None;
    }
    let start = element.content.len() - element.content.trim_start().len();
    let end = start + inner.len();
    Some(format!(
        "{}*{}*{}",
        &element.content[..start],
        inner,
        &element.content[end..]
    ))
}

/// Fenced block for a `<pre>`, built from the raw DOM text rather than the
/// converted children. With a nested `<code>`, its text is used verbatim and
/// tagged from its `language-*` class; otherwise the block's own text goes
/// into an untagged fence.
fn code_block(element: Element) -> Option<String> {
    let (language, body) = match first_descendant(element.node, "code") {
        Some(code) => {
            let language = class_of(&code)
                .and_then(|class| {
                    language_class()
                        .captures(&class)
                        .map(|caps| caps[1].to_string())
                })
                .unwrap_or_default();
            (language, text_of(&code))
        }
        None => (String::new(), text_of(element.node)),
    };
    Some(format!("\n\n{}\n\n", fence(&language, &body)))
}

fn fence(language: &str, body: &str) -> String {
    let ticks = "`".repeat(longest_backtick_run(body).max(2) + 1);
    let mut fence = format!("{}{}\n{}", ticks, language, body);
    if !body.ends_with('\n') {
        fence.push('\n');
    }
    fence.push_str(&ticks);
    fence
}

fn tag_name(node: &Node) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

fn first_descendant(node: &Rc<Node>, tag: &str) -> Option<Rc<Node>> {
    node.children.borrow().iter().find_map(|child| {
        if tag_name(child) == Some(tag) {
            Some(Rc::clone(child))
        } else {
            first_descendant(child, tag)
        }
    })
}

fn class_of(node: &Node) -> Option<String> {
    let NodeData::Element { attrs, .. } = &node.data else {
        return None;
    };
    let attrs = attrs.borrow();
    attrs
        .iter()
        .find(|attr| &*attr.name.local == "class")
        .map(|attr| attr.value.to_string())
}

fn text_of(node: &Node) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text(node: &Node, out: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        out.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}

fn backtick_prefix(line: &str) -> usize {
    line.trim_start().chars().take_while(|c| *c == '`').count()
}

/// Collapse blank-line runs and trim line ends, leaving fenced code as is.
fn clean_markdown(md: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut open_fence: Option<usize> = None;

    for line in md.lines() {
        let ticks = backtick_prefix(line);
        match open_fence {
            Some(open) => {
                lines.push(line);
                if ticks >= open && line.trim().len() == ticks {
                    open_fence = None;
                }
            }
            None => {
                let line = line.trim_end();
                if ticks >= 3 {
                    open_fence = Some(ticks);
                } else if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
                    continue;
                }
                lines.push(line);
            }
        }
    }

    // Ensure single trailing newline
    let trimmed = lines.join("\n").trim_end().to_string();
    if trimmed.is_empty() {
        String::new()
    } else {
        trimmed + "\n"
    }
}
