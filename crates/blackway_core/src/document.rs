//! Retained visual tree
//!
//! Widgets render into a [`Document`]: a tree of elements rooted at a body
//! element, addressed by generational [`ElementId`]s and optionally by a
//! unique DOM id string. Each element's look is an [`ElementStyle`] that can
//! be rendered to CSS declarations for a WebView backend.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use tracing::trace;

new_key_type! {
    /// Generational handle to an element of a [`Document`]
    pub struct ElementId;
}

/// Element kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementTag {
    Div,
    Button,
}

impl ElementTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementTag::Div => "div",
            ElementTag::Button => "button",
        }
    }
}

/// How a background image is sized inside its element
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BackgroundSize {
    /// Explicit size in pixels (used for whole filmstrips)
    Exact(f32, f32),
    Cover,
    Contain,
}

/// Where a background image is placed inside its element
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BackgroundPosition {
    /// Pixel offset of the image's top-left corner
    Offset(f32, f32),
    Center,
}

/// Non-repeating background image
#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    pub image: String,
    pub size: BackgroundSize,
    pub position: BackgroundPosition,
}

impl Background {
    /// Image placed at the top-left corner with an explicit size
    pub fn strip(image: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            image: image.into(),
            size: BackgroundSize::Exact(width, height),
            position: BackgroundPosition::Offset(0.0, 0.0),
        }
    }

    /// Centered image scaled with `size`
    pub fn centered(image: impl Into<String>, size: BackgroundSize) -> Self {
        Self {
            image: image.into(),
            size,
            position: BackgroundPosition::Center,
        }
    }
}

/// Visual properties of an element
#[derive(Clone, Debug, PartialEq)]
pub struct ElementStyle {
    /// Fixed width in pixels
    pub width: Option<f32>,
    /// Fixed height in pixels
    pub height: Option<f32>,
    pub min_width: Option<f32>,
    pub min_height: Option<f32>,
    /// Stretch to the parent's box (overrides width/height)
    pub fill_parent: bool,
    pub background: Option<Background>,
    /// Uniform scale transform, 1.0 when untransformed
    pub scale: f32,
    /// Center inline content horizontally
    pub center_text: bool,
    /// Pointer cursor and no text selection
    pub interactive: bool,
    /// Nearest-neighbour image sampling
    pub pixelated: bool,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            min_width: None,
            min_height: None,
            fill_parent: false,
            background: None,
            scale: 1.0,
            center_text: false,
            interactive: false,
            pixelated: false,
        }
    }
}

impl ElementStyle {
    /// Create a new empty style
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a fixed size
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set a minimum size
    pub fn min_size(mut self, width: f32, height: f32) -> Self {
        self.min_width = Some(width);
        self.min_height = Some(height);
        self
    }

    /// Fill the parent element
    pub fn fill(mut self) -> Self {
        self.fill_parent = true;
        self
    }

    /// Set the background image
    pub fn background(mut self, background: Background) -> Self {
        self.background = Some(background);
        self
    }

    /// Center inline content
    pub fn centered_text(mut self) -> Self {
        self.center_text = true;
        self
    }

    /// Mark as a pointer target
    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    /// Use nearest-neighbour sampling for the background
    pub fn pixelated(mut self) -> Self {
        self.pixelated = true;
        self
    }

    /// Replace the background image, keeping size and position
    pub fn set_background_image(&mut self, image: impl Into<String>) {
        if let Some(background) = self.background.as_mut() {
            background.image = image.into();
        }
    }

    /// Move the background image to a pixel offset
    pub fn set_background_offset(&mut self, x: f32, y: f32) {
        if let Some(background) = self.background.as_mut() {
            background.position = BackgroundPosition::Offset(x, y);
        }
    }

    /// Render as CSS declarations, in a stable order
    pub fn to_css(&self) -> String {
        let mut decls: Vec<String> = Vec::new();

        if self.fill_parent {
            decls.push("width: 100%".to_string());
            decls.push("height: 100%".to_string());
        } else {
            if let Some(width) = self.width {
                decls.push(format!("width: {width}px"));
            }
            if let Some(height) = self.height {
                decls.push(format!("height: {height}px"));
            }
        }
        if let Some(min_width) = self.min_width {
            decls.push(format!("min-width: {min_width}px"));
        }
        if let Some(min_height) = self.min_height {
            decls.push(format!("min-height: {min_height}px"));
        }

        if let Some(background) = &self.background {
            decls.push(format!("background-image: url('{}')", background.image));
            decls.push(match background.size {
                BackgroundSize::Exact(w, h) => format!("background-size: {w}px {h}px"),
                BackgroundSize::Cover => "background-size: cover".to_string(),
                BackgroundSize::Contain => "background-size: contain".to_string(),
            });
            decls.push(match background.position {
                BackgroundPosition::Offset(x, y) => format!("background-position: {x}px {y}px"),
                BackgroundPosition::Center => "background-position: center".to_string(),
            });
            decls.push("background-repeat: no-repeat".to_string());
        }
        if self.pixelated {
            decls.push("image-rendering: pixelated".to_string());
        }
        if self.scale != 1.0 {
            decls.push(format!("transform: scale({})", self.scale));
        }
        if self.center_text {
            decls.push("text-align: center".to_string());
        }
        if self.interactive {
            decls.push("cursor: pointer".to_string());
            decls.push("user-select: none".to_string());
        }

        decls.join("; ")
    }
}

/// A node of the visual tree
#[derive(Clone, Debug)]
pub struct Element {
    pub tag: ElementTag,
    pub class: Option<String>,
    pub text: Option<String>,
    pub style: ElementStyle,
    dom_id: Option<String>,
    parent: Option<ElementId>,
    children: SmallVec<[ElementId; 4]>,
}

impl Element {
    fn new(tag: ElementTag) -> Self {
        Self {
            tag,
            class: None,
            text: None,
            style: ElementStyle::default(),
            dom_id: None,
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// DOM id, if assigned
    pub fn dom_id(&self) -> Option<&str> {
        self.dom_id.as_deref()
    }

    /// Parent element, `None` for the body and detached elements
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Child elements in insertion order
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

/// The visual tree
pub struct Document {
    elements: SlotMap<ElementId, Element>,
    by_dom_id: FxHashMap<String, ElementId>,
    body: ElementId,
}

impl Document {
    /// Create a document holding only the body element
    pub fn new() -> Self {
        let mut elements = SlotMap::with_key();
        let body = elements.insert(Element::new(ElementTag::Div));
        Self {
            elements,
            by_dom_id: FxHashMap::default(),
            body,
        }
    }

    /// Root element of the tree
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: ElementTag) -> ElementId {
        self.elements.insert(Element::new(tag))
    }

    /// Create a `div` with the given DOM id and attach it to the body.
    ///
    /// Returns `None` if the DOM id is already taken.
    pub fn create_container(&mut self, dom_id: &str) -> Option<ElementId> {
        if self.by_dom_id.contains_key(dom_id) {
            return None;
        }
        let container = self.create_element(ElementTag::Div);
        self.set_dom_id(container, dom_id);
        self.append_child(self.body, container);
        Some(container)
    }

    /// Assign a DOM id. Fails if the element is gone or another element
    /// already uses the id.
    pub fn set_dom_id(&mut self, id: ElementId, dom_id: &str) -> bool {
        if let Some(&owner) = self.by_dom_id.get(dom_id) {
            if owner != id {
                return false;
            }
        }
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        if let Some(previous) = element.dom_id.replace(dom_id.to_string()) {
            self.by_dom_id.remove(&previous);
        }
        self.by_dom_id.insert(dom_id.to_string(), id);
        true
    }

    /// Find a connected element by DOM id
    pub fn get_element_by_id(&self, dom_id: &str) -> Option<ElementId> {
        self.by_dom_id
            .get(dom_id)
            .copied()
            .filter(|&id| self.is_connected(id))
    }

    /// Whether any element, connected or detached, holds this DOM id
    pub fn has_dom_id(&self, dom_id: &str) -> bool {
        self.by_dom_id.contains_key(dom_id)
    }

    /// Attach `child` as the last child of `parent`, detaching it from any
    /// previous parent. Refuses cycles and unknown elements.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if child == self.body
            || !self.elements.contains_key(parent)
            || !self.elements.contains_key(child)
            || self.ancestors(parent).any(|a| a == child)
        {
            return false;
        }
        self.detach(child);
        if let Some(element) = self.elements.get_mut(child) {
            element.parent = Some(parent);
        }
        if let Some(element) = self.elements.get_mut(parent) {
            element.children.push(child);
        }
        true
    }

    /// Remove an element and its whole subtree.
    ///
    /// Returns `false` when the element is already gone; the body cannot be
    /// removed.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if id == self.body || !self.elements.contains_key(id) {
            return false;
        }
        self.detach(id);

        let mut stack: SmallVec<[ElementId; 8]> = SmallVec::new();
        let mut removed = 0usize;
        stack.push(id);
        while let Some(next) = stack.pop() {
            if let Some(element) = self.elements.remove(next) {
                if let Some(dom_id) = element.dom_id {
                    self.by_dom_id.remove(&dom_id);
                }
                stack.extend(element.children);
                removed += 1;
            }
        }
        trace!(?id, removed, "subtree removed");
        true
    }

    /// Get an element
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Get an element mutably
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    /// Get an element's style mutably
    pub fn style_mut(&mut self, id: ElementId) -> Option<&mut ElementStyle> {
        self.elements.get_mut(id).map(|e| &mut e.style)
    }

    /// Whether the element still exists
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Whether the element is reachable from the body
    pub fn is_connected(&self, id: ElementId) -> bool {
        self.ancestors(id).any(|a| a == self.body)
    }

    /// The element itself followed by its ancestors up to the root
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let start = self.elements.contains_key(id).then_some(id);
        std::iter::successors(start, move |&current| {
            self.elements.get(current).and_then(|e| e.parent)
        })
    }

    /// Pre-order walk of a subtree as `(depth, element)` pairs
    pub fn walk(&self, root: ElementId) -> Vec<(usize, ElementId)> {
        let mut out = Vec::new();
        let mut stack = vec![(0usize, root)];
        while let Some((depth, id)) = stack.pop() {
            let Some(element) = self.elements.get(id) else {
                continue;
            };
            out.push((depth, id));
            for &child in element.children.iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        out
    }

    /// Number of live elements, including the body
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always false: the body element cannot be removed
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn detach(&mut self, id: ElementId) {
        let parent = self.elements.get_mut(id).and_then(|e| e.parent.take());
        if let Some(parent) = parent.and_then(|p| self.elements.get_mut(p)) {
            parent.children.retain(|c| *c != id);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_lookup() {
        let mut doc = Document::new();
        let panel = doc.create_container("panel").unwrap();

        assert_eq!(doc.get_element_by_id("panel"), Some(panel));
        assert_eq!(doc.get_element_by_id("missing"), None);
        assert!(doc.create_container("panel").is_none());
    }

    #[test]
    fn test_detached_elements_are_not_found_by_id() {
        let mut doc = Document::new();
        let loose = doc.create_element(ElementTag::Div);
        assert!(doc.set_dom_id(loose, "loose"));

        assert_eq!(doc.get_element_by_id("loose"), None);
        assert!(doc.has_dom_id("loose"));
        doc.append_child(doc.body(), loose);
        assert_eq!(doc.get_element_by_id("loose"), Some(loose));
    }

    #[test]
    fn test_remove_subtree_is_idempotent() {
        let mut doc = Document::new();
        let panel = doc.create_container("panel").unwrap();
        let wrapper = doc.create_element(ElementTag::Div);
        let inner = doc.create_element(ElementTag::Div);
        doc.set_dom_id(inner, "inner");
        doc.append_child(panel, wrapper);
        doc.append_child(wrapper, inner);
        assert_eq!(doc.len(), 4);

        assert!(doc.remove(wrapper));
        assert!(!doc.contains(inner));
        assert_eq!(doc.get_element_by_id("inner"), None);
        assert!(doc.element(panel).unwrap().children().is_empty());

        assert!(!doc.remove(wrapper));
        assert!(!doc.remove(doc.body()));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_append_refuses_cycles() {
        let mut doc = Document::new();
        let a = doc.create_container("a").unwrap();
        let b = doc.create_element(ElementTag::Div);
        doc.append_child(a, b);

        assert!(!doc.append_child(b, a));
        assert!(!doc.append_child(a, a));
        assert!(!doc.append_child(b, doc.body()));
    }

    #[test]
    fn test_reparenting_detaches_from_old_parent() {
        let mut doc = Document::new();
        let a = doc.create_container("a").unwrap();
        let b = doc.create_container("b").unwrap();
        let child = doc.create_element(ElementTag::Div);

        doc.append_child(a, child);
        doc.append_child(b, child);

        assert!(doc.element(a).unwrap().children().is_empty());
        assert_eq!(doc.element(b).unwrap().children(), &[child]);
        assert_eq!(doc.element(child).unwrap().parent(), Some(b));
    }

    #[test]
    fn test_walk_is_preorder() {
        let mut doc = Document::new();
        let a = doc.create_container("a").unwrap();
        let a1 = doc.create_element(ElementTag::Div);
        doc.append_child(a, a1);
        let b = doc.create_container("b").unwrap();

        let order: Vec<_> = doc.walk(doc.body()).into_iter().collect();
        assert_eq!(order, vec![(0, doc.body()), (1, a), (2, a1), (1, b)]);
    }

    #[test]
    fn test_style_css() {
        let style = ElementStyle::new()
            .size(80.0, 80.0)
            .background(Background::strip("Assets/knob.png", 10240.0, 80.0))
            .interactive();
        assert_eq!(
            style.to_css(),
            "width: 80px; height: 80px; background-image: url('Assets/knob.png'); \
             background-size: 10240px 80px; background-position: 0px 0px; \
             background-repeat: no-repeat; cursor: pointer; user-select: none"
        );
    }

    #[test]
    fn test_centered_label_css() {
        assert_eq!(ElementStyle::new().to_css(), "");
        assert_eq!(ElementStyle::new().centered_text().to_css(), "text-align: center");
    }

    #[test]
    fn test_style_css_offset_and_scale() {
        let mut style = ElementStyle::new()
            .fill()
            .background(Background::strip("s.png", 3840.0, 30.0));
        style.set_background_offset(0.0, -90.0);
        style.scale = 0.95;

        let css = style.to_css();
        assert!(css.starts_with("width: 100%; height: 100%"));
        assert!(css.contains("background-position: 0px -90px"));
        assert!(css.contains("transform: scale(0.95)"));
    }

    #[test]
    fn test_centered_background() {
        let style = ElementStyle::new().background(Background::centered(
            "Assets/led_on.png",
            BackgroundSize::Contain,
        ));
        let css = style.to_css();
        assert!(css.contains("background-size: contain"));
        assert!(css.contains("background-position: center"));
    }
}
