//! Path lookups over an [`XmlElement`] tree.

use std::collections::HashSet;

use tracing::debug;

use super::XmlElement;

/// Prefix-to-URI binding shared by every lookup of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    prefix: String,
    uri: String,
}

impl Namespaces {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// URI bound to `prefix`, if any.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        (prefix == self.prefix).then_some(self.uri.as_str())
    }
}

/// One location step: a qualified name, searched among children or all descendants.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    /// `None` when the prefix is not bound; such a step never matches.
    name: Option<(Option<String>, String)>,
    descendant: bool,
}

impl Step {
    fn matches(&self, element: &XmlElement) -> bool {
        match &self.name {
            Some((namespace, local)) => element.is(namespace.as_deref(), local),
            None => false,
        }
    }
}

/// A compiled relative path such as `nfe:ide/nfe:nNF` or `.//nfe:infNFe`.
///
/// Segments are separated by `/`. An empty segment (`//`) turns the next step
/// into a descendant search. A leading `.` refers to the context node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlPath {
    steps: Vec<Step>,
}

impl XmlPath {
    pub fn parse(path: &str, namespaces: &Namespaces) -> Self {
        let mut steps = Vec::new();
        let mut descendant = false;

        for segment in path.split('/') {
            match segment {
                "." => {}
                "" => descendant = true,
                segment => {
                    let name = match segment.split_once(':') {
                        Some((prefix, local)) => match namespaces.resolve(prefix) {
                            Some(uri) => Some((Some(uri.to_string()), local.to_string())),
                            None => {
                                debug!("Prefix '{}' in path '{}' is not bound", prefix, path);
                                None
                            }
                        },
                        None => Some((None, segment.to_string())),
                    };
                    steps.push(Step { name, descendant });
                    descendant = false;
                }
            }
        }

        Self { steps }
    }

    /// All elements reachable from `node` along this path, in document order.
    /// Each element appears once even when reachable from nested contexts.
    pub fn select<'a>(&self, node: &'a XmlElement) -> Vec<&'a XmlElement> {
        let mut current = vec![node];

        for step in &self.steps {
            let mut next = Vec::new();
            let mut seen: HashSet<*const XmlElement> = HashSet::new();
            for element in current {
                let matches: Box<dyn Iterator<Item = &'a XmlElement> + 'a> = if step.descendant {
                    Box::new(element.descendants())
                } else {
                    Box::new(element.children().iter())
                };
                next.extend(
                    matches
                        .filter(|e| step.matches(e))
                        .filter(|e| seen.insert(*e as *const XmlElement)),
                );
            }
            if next.is_empty() {
                return next;
            }
            current = next;
        }

        current
    }

    /// First element reachable from `node` along this path.
    pub fn first<'a>(&self, node: &'a XmlElement) -> Option<&'a XmlElement> {
        self.select(node).into_iter().next()
    }
}

/// Resolves namespace-qualified paths to trimmed text with caller defaults.
///
/// Lookups never fail: a missing element, or one without text, yields the
/// default. The accessor holds no mutable state.
#[derive(Debug, Clone)]
pub struct XmlFieldAccessor {
    namespaces: Namespaces,
}

impl XmlFieldAccessor {
    pub fn new(namespaces: Namespaces) -> Self {
        Self { namespaces }
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    pub fn path(&self, path: &str) -> XmlPath {
        XmlPath::parse(path, &self.namespaces)
    }

    pub fn find<'a>(&self, node: &'a XmlElement, path: &str) -> Option<&'a XmlElement> {
        self.path(path).first(node)
    }

    pub fn find_all<'a>(&self, node: &'a XmlElement, path: &str) -> Vec<&'a XmlElement> {
        self.path(path).select(node)
    }

    /// Trimmed text of the first match of `path` under `node`, or `default`.
    pub fn resolve(&self, node: &XmlElement, path: &str, default: &str) -> String {
        self.find(node, path)
            .map(|element| element.text().trim())
            .filter(|text| !text.is_empty())
            .unwrap_or(default)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlDocument;
    use pretty_assertions::assert_eq;

    const NS: &str = "http://www.portalfiscal.inf.br/nfe";

    fn accessor() -> XmlFieldAccessor {
        XmlFieldAccessor::new(Namespaces::new("nfe", NS))
    }

    fn document() -> XmlDocument {
        XmlDocument::parse(
            br#"<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe">
                  <NFe>
                    <infNFe>
                      <ide><nNF>  000123 </nNF></ide>
                      <emit><xNome>   </xNome></emit>
                      <det><prod><xProd>A</xProd></prod></det>
                      <det><prod><xProd>B</xProd></prod></det>
                    </infNFe>
                  </NFe>
                  <plain>outside</plain>
                </nfeProc>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_trims_text() {
        let doc = document();
        let acc = accessor();
        let info = acc.find(doc.root(), ".//nfe:infNFe").unwrap();

        assert_eq!(acc.resolve(info, "nfe:ide/nfe:nNF", "N/A"), "000123");
    }

    #[test]
    fn test_resolve_defaults() {
        let doc = document();
        let acc = accessor();
        let info = acc.find(doc.root(), ".//nfe:infNFe").unwrap();

        // Blank text and missing element both fall back.
        assert_eq!(acc.resolve(info, "nfe:emit/nfe:xNome", "none"), "none");
        assert_eq!(acc.resolve(info, "nfe:dest/nfe:xNome", "none"), "none");
    }

    #[test]
    fn test_resolve_is_repeatable() {
        let doc = document();
        let acc = accessor();

        let first = acc.resolve(doc.root(), ".//nfe:nNF", "");
        let second = acc.resolve(doc.root(), ".//nfe:nNF", "");
        assert_eq!(first, second);
        assert_eq!(first, "000123");
    }

    #[test]
    fn test_namespace_must_match() {
        let doc = document();
        let acc = accessor();

        // The document binds every element to the NF-e namespace.
        assert!(acc.find(doc.root(), ".//infNFe").is_none());
        assert!(acc.find(doc.root(), ".//other:infNFe").is_none());
        assert_eq!(acc.resolve(doc.root(), "nfe:plain", "-"), "outside");
    }

    #[test]
    fn test_find_all_keeps_document_order() {
        let doc = document();
        let acc = accessor();
        let info = acc.find(doc.root(), ".//nfe:infNFe").unwrap();

        let names: Vec<String> = acc
            .find_all(info, "nfe:det")
            .into_iter()
            .map(|det| acc.resolve(det, "nfe:prod/nfe:xProd", ""))
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_nested_contexts_yield_each_element_once() {
        let doc = XmlDocument::parse(b"<r><a><b>1</b><a><b>2</b></a><b>3</b></a><a><b>4</b></a></r>").unwrap();
        let acc = XmlFieldAccessor::new(Namespaces::new("nfe", NS));

        let texts: Vec<&str> = acc
            .find_all(doc.root(), ".//a//b")
            .into_iter()
            .map(XmlElement::text)
            .collect();
        assert_eq!(texts, vec!["1", "2", "3", "4"]);
    }
}
