//! Netscape bookmark file codec.
//!
//! The exchange format is the legacy nested definition-list markup: a `<DL>`
//! holds `<DT>` entries, each a folder heading (`<H3>`, with its contents in
//! a nested `<DL>`) or a hyperlink (`<A HREF=..>`). Parsing tolerates
//! malformed entries by skipping them; only a document without any list root
//! is a hard failure. Serialization reproduces the exact shape browsers
//! emit, so parse(serialize(tree)) is structurally identical to the tree.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{Error, Result};
use crate::ident::IdGenerator;
use crate::model::{Folder, Icon, Link, Node, NodeKind, ROOT_ID};

const HEADER: &str = "<!DOCTYPE NETSCAPE-Bookmark-file-1>\n\
<!-- This is an automatically generated file.\n     \
It will be read and overwritten.\n     \
DO NOT EDIT! -->\n\
<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">\n\
<TITLE>Bookmarks</TITLE>\n\
<H1>Bookmarks</H1>";

/// Parse a bookmark document into a forest of nodes parented at root.
///
/// Every folder and link receives a fresh id; ids are not persisted in the
/// markup. Fails only when the document has no `<dl>` root at all.
pub fn parse(html: &str, ids: &mut IdGenerator) -> Result<Vec<Node>> {
    let document = Html::parse_document(html);
    let dl_selector = Selector::parse("dl").unwrap();
    let root_list = document
        .select(&dl_selector)
        .next()
        .ok_or_else(|| Error::ParseFailure("no bookmark list found in document".to_string()))?;
    Ok(parse_list(root_list, ROOT_ID, ids))
}

fn parse_list(list: ElementRef<'_>, parent_id: &str, ids: &mut IdGenerator) -> Vec<Node> {
    let dl_selector = Selector::parse("dl").unwrap();
    let mut items: Vec<Node> = Vec::new();

    for child in list.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "dt" => {
                let Some(content) = child.children().filter_map(ElementRef::wrap).next() else {
                    debug!("skipping empty dt entry");
                    continue;
                };
                match content.value().name() {
                    "h3" => {
                        let id = ids.next_id(NodeKind::Folder);
                        let mut folder = Folder {
                            id: id.clone(),
                            name: content.text().collect::<String>().trim().to_string(),
                            parent_id: parent_id.to_string(),
                            expanded: false,
                            children: Vec::new(),
                        };
                        // HTML parsers leave the contents list nested inside
                        // the unterminated <DT>.
                        if let Some(nested) = child.select(&dl_selector).next() {
                            folder.children = parse_list(nested, &id, ids);
                        }
                        items.push(Node::Folder(folder));
                    }
                    "a" => {
                        let link = Link {
                            id: ids.next_id(NodeKind::Link),
                            title: content.text().collect::<String>().trim().to_string(),
                            url: content.value().attr("href").unwrap_or("#").to_string(),
                            icon: content.value().attr("icon").and_then(Icon::classify),
                            parent_id: parent_id.to_string(),
                        };
                        items.push(Node::Link(link));
                    }
                    other => {
                        debug!(tag = other, "skipping unrecognized entry");
                    }
                }
            }
            "dl" => {
                // Contents list written as a sibling of an explicitly closed
                // folder heading.
                if let Some(Node::Folder(folder)) = items.last_mut() {
                    if folder.children.is_empty() {
                        let folder_id = folder.id.clone();
                        folder.children = parse_list(child, &folder_id, ids);
                    }
                }
            }
            _ => {}
        }
    }

    items
}

/// Serialize a forest back into the exchange markup, depth-first, children
/// order preserved. Always yields a valid document, even for an empty tree.
pub fn serialize(nodes: &[Node]) -> String {
    let mut body = String::new();
    serialize_list(nodes, 0, &mut body);
    format!("{HEADER}\n<DL><p>\n{body}</DL><p>")
}

fn serialize_list(nodes: &[Node], depth: usize, out: &mut String) {
    let indent = "    ".repeat(depth);
    for node in nodes {
        match node {
            Node::Folder(folder) => {
                out.push_str(&indent);
                out.push_str("<DT><H3>");
                out.push_str(&escape_text(&folder.name));
                out.push_str("</H3>\n");
                // a folder renders a contents list only when it has children
                if !folder.children.is_empty() {
                    out.push_str(&indent);
                    out.push_str("<DL><p>\n");
                    serialize_list(&folder.children, depth + 1, out);
                    out.push_str(&indent);
                    out.push_str("</DL><p>\n");
                }
            }
            Node::Link(link) => {
                let href = if link.url.is_empty() { "#" } else { link.url.as_str() };
                out.push_str(&indent);
                out.push_str("<DT><A HREF=\"");
                out.push_str(&escape_attr(href));
                out.push('"');
                if let Some(Icon::Inline(data)) = &link.icon {
                    out.push_str(" ICON=\"");
                    out.push_str(&escape_attr(data));
                    out.push('"');
                }
                out.push('>');
                out.push_str(&escape_text(&link.title));
                out.push_str("</A>\n");
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>
<DT><H3>Work</H3>
<DL><p>
    <DT><A HREF="https://docs.example.com">Docs</A>
    <DT><A HREF="https://git.example.com" ICON="data:image/png;base64,AAAA">Repo</A>
</DL><p>
<DT><A>No Href</A>
</DL><p>"#;

    #[test]
    fn parses_folders_links_and_defaults() {
        let mut ids = IdGenerator::new();
        let nodes = parse(SAMPLE, &mut ids).unwrap();
        assert_eq!(nodes.len(), 2);

        let folder = nodes[0].as_folder().unwrap();
        assert_eq!(folder.name, "Work");
        assert_eq!(folder.parent_id, ROOT_ID);
        assert_eq!(folder.children.len(), 2);

        let docs = folder.children[0].as_link().unwrap();
        assert_eq!(docs.title, "Docs");
        assert_eq!(docs.url, "https://docs.example.com");
        assert_eq!(docs.parent_id, folder.id);
        assert!(docs.icon.is_none());

        let repo = folder.children[1].as_link().unwrap();
        assert!(matches!(repo.icon, Some(Icon::Inline(_))));

        // missing href falls back to "#"
        let loose = nodes[1].as_link().unwrap();
        assert_eq!(loose.url, "#");
    }

    #[test]
    fn parses_sibling_contents_list() {
        // hand-written files may close the DT before opening the list
        let html = r#"<DL><p>
<DT><H3>Tools</H3></DT>
<DL><p>
    <DT><A HREF="https://example.com/a">A</A>
</DL><p>
</DL><p>"#;
        let mut ids = IdGenerator::new();
        let nodes = parse(html, &mut ids).unwrap();
        assert_eq!(nodes.len(), 1);
        let folder = nodes[0].as_folder().unwrap();
        assert_eq!(folder.name, "Tools");
        assert_eq!(folder.children.len(), 1);
        assert_eq!(folder.children[0].as_link().unwrap().title, "A");
    }

    #[test]
    fn skips_malformed_entries() {
        let html = r#"<DL><p>
<DT><SPAN>not a bookmark</SPAN>
<DT><A HREF="https://example.com">Good</A>
</DL><p>"#;
        let mut ids = IdGenerator::new();
        let nodes = parse(html, &mut ids).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].label(), "Good");
    }

    #[test]
    fn document_without_list_is_a_parse_failure() {
        let mut ids = IdGenerator::new();
        let err = parse("<html><body>just text</body></html>", &mut ids).unwrap_err();
        assert!(matches!(err, Error::ParseFailure(_)));
    }

    #[test]
    fn serializes_inline_icons_only() {
        let nodes = vec![
            Node::Link(Link {
                id: "l1".to_string(),
                title: "Glyph".to_string(),
                url: "https://a.example.com".to_string(),
                icon: Some(Icon::Glyph("fab fa-github".to_string())),
                parent_id: ROOT_ID.to_string(),
            }),
            Node::Link(Link {
                id: "l2".to_string(),
                title: "Inline".to_string(),
                url: "https://b.example.com".to_string(),
                icon: Some(Icon::Inline("data:image/png;base64,AAAA".to_string())),
                parent_id: ROOT_ID.to_string(),
            }),
        ];
        let html = serialize(&nodes);
        assert_eq!(html.matches("ICON=").count(), 1);
        assert!(html.contains("ICON=\"data:image/png;base64,AAAA\""));
    }

    #[test]
    fn empty_folder_renders_without_contents_list() {
        let nodes = vec![Node::Folder(Folder {
            id: "f1".to_string(),
            name: "Empty".to_string(),
            parent_id: ROOT_ID.to_string(),
            expanded: false,
            children: Vec::new(),
        })];
        let html = serialize(&nodes);
        assert!(html.contains("<DT><H3>Empty</H3>"));
        // only the document-level list
        assert_eq!(html.matches("<DL><p>").count(), 1);
    }

    #[test]
    fn empty_tree_serializes_to_valid_document() {
        let html = serialize(&[]);
        let mut ids = IdGenerator::new();
        assert!(parse(&html, &mut ids).unwrap().is_empty());
    }

    #[test]
    fn markup_characters_survive_the_round_trip() {
        let nodes = vec![Node::Link(Link {
            id: "l1".to_string(),
            title: "A <B> & \"C\"".to_string(),
            url: "https://example.com/?q=a&b=<c>".to_string(),
            icon: None,
            parent_id: ROOT_ID.to_string(),
        })];
        let mut ids = IdGenerator::new();
        let reparsed = parse(&serialize(&nodes), &mut ids).unwrap();
        let link = reparsed[0].as_link().unwrap();
        assert_eq!(link.title, "A <B> & \"C\"");
        assert_eq!(link.url, "https://example.com/?q=a&b=<c>");
    }

    mod round_trip {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone, PartialEq)]
        enum Shape {
            Folder(String, Vec<Shape>),
            Link(String, String),
        }

        fn shape_strategy() -> impl Strategy<Value = Shape> {
            let name = "[A-Za-z0-9]{1,12}";
            let url = "https://[a-z]{3,8}\\.example\\.com/[a-z0-9]{0,8}";
            let leaf = (name, url).prop_map(|(t, u)| Shape::Link(t, u));
            leaf.prop_recursive(3, 24, 4, move |inner| {
                ("[A-Za-z0-9]{1,12}", prop::collection::vec(inner, 0..4))
                    .prop_map(|(n, children)| Shape::Folder(n, children))
            })
        }

        fn build(shape: &Shape, parent_id: &str, ids: &mut IdGenerator) -> Node {
            match shape {
                Shape::Link(title, url) => Node::Link(Link {
                    id: ids.next_id(NodeKind::Link),
                    title: title.clone(),
                    url: url.clone(),
                    icon: None,
                    parent_id: parent_id.to_string(),
                }),
                Shape::Folder(name, children) => {
                    let id = ids.next_id(NodeKind::Folder);
                    let children = children
                        .iter()
                        .map(|c| build(c, &id, ids))
                        .collect();
                    Node::Folder(Folder {
                        id,
                        name: name.clone(),
                        parent_id: parent_id.to_string(),
                        expanded: false,
                        children,
                    })
                }
            }
        }

        fn shape_of(node: &Node) -> Shape {
            match node {
                Node::Link(l) => Shape::Link(l.title.clone(), l.url.clone()),
                Node::Folder(f) => {
                    Shape::Folder(f.name.clone(), f.children.iter().map(shape_of).collect())
                }
            }
        }

        proptest! {
            #[test]
            fn parse_inverts_serialize(shapes in prop::collection::vec(shape_strategy(), 0..5)) {
                let mut ids = IdGenerator::new();
                let nodes: Vec<Node> = shapes
                    .iter()
                    .map(|s| build(s, ROOT_ID, &mut ids))
                    .collect();
                let html = serialize(&nodes);
                let reparsed = parse(&html, &mut ids).unwrap();
                let got: Vec<Shape> = reparsed.iter().map(shape_of).collect();
                prop_assert_eq!(got, shapes);
            }
        }
    }
}
