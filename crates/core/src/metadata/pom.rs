//! Project descriptor (POM) surgery.
//!
//! The document is read into a minimal element tree, one `dependency` entry
//! is appended to the root's `dependencies` list and the tree is written back
//! with four-space indentation. Comments, processing instructions and
//! attributes pass through untouched. Whitespace-only text between elements
//! is dropped and re-indented; the text of leaf elements is kept verbatim.

use super::timestamp;
use crate::error::{ExtguardError, Result};
use extguard_api::Coordinate;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::path::Path;

const DEPENDENCIES: &str = "dependencies";
const DEPENDENCY: &str = "dependency";
const GROUP_ID: &str = "groupId";
const ARTIFACT_ID: &str = "artifactId";
const VERSION: &str = "version";

#[derive(Debug, Clone)]
enum Node {
    Element(Element),
    Other(Event<'static>),
}

#[derive(Debug, Clone)]
struct Element {
    start: BytesStart<'static>,
    children: Vec<Node>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            start: BytesStart::new(name),
            children: Vec::new(),
        }
    }

    fn with_text(name: String, text: &str) -> Self {
        let mut element = Self::new(name);
        element
            .children
            .push(Node::Other(Event::Text(BytesText::new(text).into_owned())));
        element
    }

    /// Drop whitespace-only text once the element is known to hold child
    /// nodes besides text.
    fn drop_indentation(&mut self) {
        let text_only = self
            .children
            .iter()
            .all(|node| matches!(node, Node::Other(Event::Text(_) | Event::CData(_))));
        if !text_only {
            self.children.retain(|node| !matches!(node, Node::Other(Event::Text(t)) if is_blank(t)));
        }
    }

    fn local_name_is(&self, name: &str) -> bool {
        self.start.local_name().as_ref() == name.as_bytes()
    }

    fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Other(_) => None,
        })
    }

    fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Other(Event::Text(t)) => Some(
                    t.unescape()
                        .map(|s| s.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&t[..]).into_owned()),
                ),
                Node::Other(Event::CData(c)) => Some(String::from_utf8_lossy(&c[..]).into_owned()),
                _ => None,
            })
            .collect()
    }
}

/// A dependency entry as read back from a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PomDependency {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PomDocument {
    prolog: Vec<Event<'static>>,
    root: Element,
    epilog: Vec<Event<'static>>,
}

impl PomDocument {
    pub fn parse(xml: &str) -> std::result::Result<Self, String> {
        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();

        loop {
            match reader.read_event().map_err(|e| e.to_string())? {
                Event::Start(e) => stack.push(Element {
                    start: e.into_owned(),
                    children: Vec::new(),
                }),
                Event::End(_) => {
                    let mut element = stack.pop().ok_or("unbalanced end tag")?;
                    element.drop_indentation();
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Empty(e) => {
                    let element = Element {
                        start: e.into_owned(),
                        children: Vec::new(),
                    };
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(ref t) if stack.is_empty() && is_blank(t) => {}
                Event::Eof => break,
                other => {
                    let event = other.into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Other(event)),
                        None if root.is_none() => prolog.push(event),
                        None => epilog.push(event),
                    }
                }
            }
        }

        if !stack.is_empty() {
            return Err("unclosed element at end of document".to_string());
        }
        let root = root.ok_or("document has no root element")?;

        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    pub fn to_xml(&self) -> std::result::Result<String, String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);

        for event in &self.prolog {
            writer.write_event(event.clone()).map_err(|e| e.to_string())?;
        }
        write_element(&mut writer, &self.root)?;
        for event in &self.epilog {
            writer.write_event(event.clone()).map_err(|e| e.to_string())?;
        }

        let mut xml = String::from_utf8(writer.into_inner()).map_err(|e| e.to_string())?;
        xml.push('\n');
        Ok(xml)
    }

    /// Append a dependency to the root's `dependencies` list, creating the
    /// list if the document has none.
    pub fn add_dependency(&mut self, group_id: &str, artifact_id: &str, version: &str) {
        let prefix = self.root_prefix();
        let qualified = |local: &str| match &prefix {
            Some(p) => format!("{}:{}", p, local),
            None => local.to_string(),
        };

        let mut dependency = Element::new(qualified(DEPENDENCY));
        for (name, value) in [
            (GROUP_ID, group_id),
            (ARTIFACT_ID, artifact_id),
            (VERSION, version),
        ] {
            dependency
                .children
                .push(Node::Element(Element::with_text(qualified(name), value)));
        }

        let position = self.root.children.iter().position(
            |node| matches!(node, Node::Element(e) if e.local_name_is(DEPENDENCIES)),
        );
        let index = match position {
            Some(index) => index,
            None => {
                self.root
                    .children
                    .push(Node::Element(Element::new(qualified(DEPENDENCIES))));
                self.root.children.len() - 1
            }
        };

        if let Node::Element(list) = &mut self.root.children[index] {
            list.children.push(Node::Element(dependency));
        }
    }

    /// Entries of the root's `dependencies` list, in document order.
    pub fn dependencies(&self) -> Vec<PomDependency> {
        let Some(list) = self
            .root
            .child_elements()
            .find(|e| e.local_name_is(DEPENDENCIES))
        else {
            return Vec::new();
        };

        list.child_elements()
            .filter(|e| e.local_name_is(DEPENDENCY))
            .map(|entry| {
                let field = |name: &str| {
                    entry
                        .child_elements()
                        .find(|e| e.local_name_is(name))
                        .map(Element::text)
                };
                PomDependency {
                    group_id: field(GROUP_ID),
                    artifact_id: field(ARTIFACT_ID),
                    version: field(VERSION),
                }
            })
            .collect()
    }

    fn root_prefix(&self) -> Option<String> {
        self.root
            .start
            .name()
            .prefix()
            .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned())
    }
}

fn is_blank(text: &BytesText<'_>) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> std::result::Result<(), String> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err("document has more than one root element".to_string()),
    }
    Ok(())
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &Element,
) -> std::result::Result<(), String> {
    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(element.start.clone()))
            .map_err(|e| e.to_string());
    }

    writer
        .write_event(Event::Start(element.start.clone()))
        .map_err(|e| e.to_string())?;
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(writer, e)?,
            Node::Other(event) => writer.write_event(event.clone()).map_err(|e| e.to_string())?,
        }
    }
    writer
        .write_event(Event::End(element.start.to_end().into_owned()))
        .map_err(|e| e.to_string())
}

/// Append `dependency` to the descriptor at `path`, keeping the file's
/// modification time.
pub fn inject_pom_dependency(path: &Path, dependency: &Coordinate) -> Result<()> {
    let version = dependency.version().ok_or_else(|| {
        ExtguardError::malformed(path, format!("dependency `{}` has no version", dependency))
    })?;

    let original_mtime = timestamp::modified_time(path);
    let content = std::fs::read_to_string(path).map_err(|e| ExtguardError::io(path, e))?;

    let mut document = PomDocument::parse(&content).map_err(|e| ExtguardError::xml(path, e))?;
    document.add_dependency(dependency.group(), dependency.artifact(), version);
    let rendered = document.to_xml().map_err(|e| ExtguardError::xml(path, e))?;

    std::fs::write(path, rendered).map_err(|e| ExtguardError::io(path, e))?;
    timestamp::restore_modified_time(path, original_mtime);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <!-- generated -->
  <modelVersion>4.0.0</modelVersion>
  <groupId>io.acme</groupId>
  <artifactId>foo-deployment</artifactId>
  <version>1.0</version>
  <dependencies>
    <dependency>
      <groupId>io.quarkus</groupId>
      <artifactId>quarkus-core-deployment</artifactId>
      <version>3.2.0</version>
    </dependency>
  </dependencies>
</project>
"#;

    #[test]
    fn test_appends_to_existing_list() {
        let mut doc = PomDocument::parse(POM).unwrap();
        doc.add_dependency("io.acme", "foo", "1.0");

        let deps = doc.dependencies();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[1].artifact_id.as_deref(), Some("foo"));

        let xml = doc.to_xml().unwrap();
        assert_eq!(xml.matches("<dependencies>").count(), 1);
        assert!(xml.contains("<!-- generated -->"));
        assert!(xml.contains("xmlns=\"http://maven.apache.org/POM/4.0.0\""));
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    }

    #[test]
    fn test_creates_missing_list() {
        let mut doc = PomDocument::parse("<project><artifactId>foo</artifactId></project>").unwrap();
        assert!(doc.dependencies().is_empty());

        doc.add_dependency("io.acme", "foo-spi", "1.0");
        let reparsed = PomDocument::parse(&doc.to_xml().unwrap()).unwrap();
        assert_eq!(
            reparsed.dependencies(),
            vec![PomDependency {
                group_id: Some("io.acme".to_string()),
                artifact_id: Some("foo-spi".to_string()),
                version: Some("1.0".to_string()),
            }]
        );
    }

    #[test]
    fn test_only_direct_children_count() {
        let xml = "<project><dependencyManagement><dependencies/></dependencyManagement></project>";
        let mut doc = PomDocument::parse(xml).unwrap();
        doc.add_dependency("g", "a", "1");

        let out = doc.to_xml().unwrap();
        assert!(out.contains("<dependencyManagement>\n        <dependencies/>"));
        assert_eq!(doc.dependencies().len(), 1);
    }

    #[test]
    fn test_text_is_escaped() {
        let mut doc = PomDocument::parse("<project/>").unwrap();
        doc.add_dependency("a&b", "c<d", "1");
        let xml = doc.to_xml().unwrap();
        assert!(xml.contains("<groupId>a&amp;b</groupId>"));
        let reparsed = PomDocument::parse(&xml).unwrap();
        assert_eq!(reparsed.dependencies()[0].group_id.as_deref(), Some("a&b"));
    }

    #[test]
    fn test_leaf_text_whitespace_survives() {
        let xml = "<project>\n  <description>  keep  me </description>\n  <name> </name>\n</project>";
        let mut doc = PomDocument::parse(xml).unwrap();
        doc.add_dependency("g", "a", "1");

        let out = doc.to_xml().unwrap();
        assert!(out.contains("\n    <description>  keep  me </description>\n"));
        assert!(out.contains("<name> </name>"));
        assert!(out.contains("\n        <dependency>\n            <groupId>g</groupId>"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(PomDocument::parse("").is_err());
        assert!(PomDocument::parse("<project><a></project>").is_err());
    }
}
