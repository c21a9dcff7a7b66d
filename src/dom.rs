//! Parsed panel pages and the depth-first walk every extractor is built on

use scraper::{ElementRef, Html};

/// DOM tree of a single response body.
///
/// Built fresh for every fetch and never cached: the anti-tampering tokens it
/// carries are only valid for the render that produced it.
pub struct ParsedPage {
    html: Html,
}

impl ParsedPage {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// First element, in document order, accepted by `pred`
    pub fn find<'a, F>(&'a self, pred: F) -> Option<ElementRef<'a>>
    where
        F: FnMut(&ElementRef<'a>) -> bool,
    {
        find_element(self.root(), pred)
    }
}

/// Pre-order depth-first search of `scope` (itself included).
///
/// The first match wins. When a page carries several matching elements the
/// one that appears first in the markup is returned.
pub fn find_element<'a, F>(scope: ElementRef<'a>, mut pred: F) -> Option<ElementRef<'a>>
where
    F: FnMut(&ElementRef<'a>) -> bool,
{
    scope
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| pred(el))
}

/// The element `levels` steps above `el`; `levels == 1` is the parent
pub fn ancestor(el: ElementRef<'_>, levels: usize) -> Option<ElementRef<'_>> {
    if levels == 0 {
        return Some(el);
    }
    el.ancestors().nth(levels - 1).and_then(ElementRef::wrap)
}

/// Content of the first child text node that isn't pure whitespace
pub fn first_text(el: ElementRef<'_>) -> Option<&str> {
    el.children()
        .filter_map(|child| child.value().as_text())
        .map(|text| &**text)
        .find(|text| !text.trim().is_empty())
}

pub fn attr<'a>(el: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name)
}
