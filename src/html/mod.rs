//! HTML serialization.
//!
//! A pure recursive serializer from the document tree to backend-safe HTML.
//! Output is byte-stable for a given tree: mark wrapping follows a fixed
//! order, and every style attribute is assembled only from attributes that
//! are actually present, in a fixed sequence. The translation is one-way;
//! the tree is never parsed back out of the HTML.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::doc::{Document, Element, ElementKind, Node, TableCell, Text};

/// Serializes the document to an HTML fragment.
pub fn to_html(doc: &Document) -> String {
    doc.blocks.iter().map(serialize_element).collect()
}

/// Wraps the serialized fragment in a complete standalone HTML document with
/// the baseline stylesheet, for direct handoff to a storage backend.
pub fn to_html_document(doc: &Document) -> String {
    let content = to_html(doc);
    format!(
        r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Generated Content</title>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; margin: 20px; }}
        .anchor {{ background-color: #fff3cd; padding: 2px 4px; border-radius: 3px; border-left: 2px solid #ffc107; }}
        .hover-area {{ background-color: #e1f5fe; padding: 2px 4px; border-radius: 3px; cursor: pointer; }}
        table {{ border-collapse: collapse; width: 100%; border: 2px solid #333; }}
        table td, table th {{ border: 1px solid #333; padding: 8px; text-align: left; }}
        table td {{ background-color: #fff; }}
        blockquote {{ border-left: 4px solid #ccc; padding-left: 16px; font-style: italic; }}
        code {{ background-color: #f8f9fa; padding: 2px 4px; border-radius: 3px; }}
        img {{ max-width: 100%; height: auto; }}
        .prose {{ max-width: none; }}
        .prose table {{ margin: 1rem 0; }}
        .prose table td, .prose table th {{ border: 1px solid #333; padding: 8px; }}
    </style>
</head>
<body>
    {content}
</body>
</html>"#
    )
}

fn serialize_node(node: &Node) -> String {
    match node {
        Node::Element(element) => serialize_element(element),
        Node::Text(text) => serialize_text(text),
    }
}

/// Mark wrapping applied innermost first, in this fixed order: bold, italic,
/// underline, strikethrough, superscript, subscript, code, then the color,
/// background-color, and font-size spans. The order is part of the output
/// contract.
fn serialize_text(leaf: &Text) -> String {
    let marks = &leaf.marks;
    let mut out = leaf.text.clone();

    if marks.bold {
        out = format!("<strong>{out}</strong>");
    }
    if marks.italic {
        out = format!("<em>{out}</em>");
    }
    if marks.underline {
        out = format!("<u>{out}</u>");
    }
    if marks.strikethrough {
        out = format!("<del>{out}</del>");
    }
    if marks.superscript {
        out = format!("<sup>{out}</sup>");
    }
    if marks.subscript {
        out = format!("<sub>{out}</sub>");
    }
    if marks.code {
        out = format!("<code>{out}</code>");
    }

    if let Some(color) = &marks.color {
        out = format!("<span style=\"color: {color}\">{out}</span>");
    }
    if let Some(background) = &marks.background_color {
        out = format!("<span style=\"background-color: {background}\">{out}</span>");
    }
    if let Some(size) = &marks.font_size {
        out = format!("<span style=\"font-size: {size}\">{out}</span>");
    }

    out
}

fn style_attr(parts: &[String]) -> String {
    if parts.is_empty() {
        String::new()
    } else {
        format!(" style=\"{}\"", parts.join("; "))
    }
}

fn serialize_element(element: &Element) -> String {
    let children: String = element.children.iter().map(serialize_node).collect();

    let mut style = Vec::new();
    if let Some(align) = element.align {
        style.push(format!("text-align: {}", align.as_css()));
    }
    if let Some(size) = &element.font_size {
        style.push(format!("font-size: {size}"));
    }
    let style = style_attr(&style);

    match &element.kind {
        ElementKind::Paragraph => format!("<p{style}>{children}</p>"),
        ElementKind::HeadingOne => format!("<h1{style}>{children}</h1>"),
        ElementKind::HeadingTwo => format!("<h2{style}>{children}</h2>"),
        ElementKind::HeadingThree => format!("<h3{style}>{children}</h3>"),
        ElementKind::BlockQuote => format!("<blockquote{style}>{children}</blockquote>"),
        ElementKind::BulletedList => format!("<ul{style}>{children}</ul>"),
        ElementKind::NumberedList => format!("<ol{style}>{children}</ol>"),
        ElementKind::ListItem => format!("<li{style}>{children}</li>"),
        ElementKind::Image {
            url,
            alt,
            title,
            width,
            height,
        } => {
            let mut img_style = Vec::new();
            if let Some(width) = width {
                img_style.push(format!("width: {width}"));
            }
            if let Some(height) = height {
                img_style.push(format!("height: {height}"));
            }
            let img_style = style_attr(&img_style);
            let title = title.as_deref().unwrap_or("");
            format!("<img src=\"{url}\" alt=\"{alt}\" title=\"{title}\"{img_style} />")
        }
        ElementKind::Table(table) => serialize_table(table),
        ElementKind::Link { href, target } => {
            let href = if href.is_empty() { "#" } else { href };
            // Missing targets default to _blank, including internal #id links.
            let target = target.as_deref().unwrap_or("_blank");
            format!("<a href=\"{href}\" target=\"{target}\">{children}</a>")
        }
        ElementKind::Anchor { id } => {
            format!("<span id=\"{id}\" class=\"anchor\">{children}</span>")
        }
        ElementKind::Abbr { definition } => {
            format!("<abbr title=\"{definition}\">{children}</abbr>")
        }
        ElementKind::HoverArea { hover_content } => {
            format!("<span title=\"{hover_content}\" class=\"hover-area\">{children}</span>")
        }
    }
}

fn serialize_table(table: &crate::doc::Table) -> String {
    let mut style = Vec::new();
    if let Some(width) = &table.width {
        style.push(format!("width: {width}"));
    }
    if let Some(height) = &table.height {
        style.push(format!("height: {height}"));
    }
    style.extend(
        [
            "border-collapse: collapse",
            "width: 100%",
            "border: 2px solid #4a5568",
            "box-shadow: 0 4px 6px -1px rgba(0, 0, 0, 0.1)",
        ]
        .map(String::from),
    );
    let style = format!("{};", style.join("; "));

    let rows: String = table
        .rows
        .iter()
        .map(|row| {
            let cells: String = row
                .children
                .iter()
                .filter(|cell| !cell.is_merged)
                .map(serialize_cell)
                .collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();

    format!(
        "<table border=\"1\" cellpadding=\"8\" cellspacing=\"0\" style=\"{style}\">{rows}</table>"
    )
}

fn serialize_cell(cell: &TableCell) -> String {
    let mut style = Vec::new();
    if let Some(background) = &cell.background_color {
        style.push(format!("background-color: {background}"));
    }
    if let Some(align) = cell.align {
        style.push(format!("text-align: {}", align.as_css()));
    }
    style.push("border: 1px solid #4a5568".to_string());
    style.push("padding: 12px".to_string());
    let style = style_attr(&style);

    let colspan = if cell.col_span > 1 {
        format!(" colspan=\"{}\"", cell.col_span)
    } else {
        String::new()
    };
    let rowspan = if cell.row_span > 1 {
        format!(" rowspan=\"{}\"", cell.row_span)
    } else {
        String::new()
    };

    let content: String = cell.children.iter().map(serialize_text).collect();
    format!("<td{style}{colspan}{rowspan}>{content}</td>")
}

static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b.*?</script>").expect("script pattern"));
static IFRAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<iframe\b.*?</iframe>").expect("iframe pattern"));
static JS_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)javascript:").expect("javascript url pattern"));

/// Strips script and iframe elements and `javascript:` URLs from an HTML
/// string before it is handed to an embedding consumer.
pub fn sanitize(html: &str) -> String {
    let out = SCRIPT_RE.replace_all(html, "");
    let out = IFRAME_RE.replace_all(&out, "");
    JS_URL_RE.replace_all(&out, "").into_owned()
}

/// Black or white, whichever reads better against the given `#rrggbb`
/// background. Unparseable colors get white.
pub fn contrast_color(background: &str) -> &'static str {
    let hex = background.trim_start_matches('#');
    if hex.len() != 6 {
        return "#ffffff";
    }
    let Ok(r) = u32::from_str_radix(&hex[0..2], 16) else {
        return "#ffffff";
    };
    let Ok(g) = u32::from_str_radix(&hex[2..4], 16) else {
        return "#ffffff";
    };
    let Ok(b) = u32::from_str_radix(&hex[4..6], 16) else {
        return "#ffffff";
    };
    let brightness = (r * 299 + g * 587 + b * 114) / 1000;
    if brightness > 128 { "#000000" } else { "#ffffff" }
}
