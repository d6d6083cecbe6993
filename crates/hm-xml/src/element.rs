use crate::Position;

/// A name/value attribute pair. Names keep their namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// An XML element with its attributes, text content and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified name as written (`hm:FBP` keeps its prefix).
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Text content, `None` when the element had none.
    pub text: Option<String>,
    pub children: Vec<Element>,
    pub position: Position,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
            position: Position::UNKNOWN,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name
            .rsplit_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    /// Text content, or the empty string.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Whether the element carries non-whitespace text.
    pub fn has_text(&self) -> bool {
        !self.text().trim().is_empty()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let idx = self.attributes.iter().position(|attr| attr.name == name)?;
        Some(self.attributes.remove(idx).value)
    }

    /// First child with the given local name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.local_name() == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children
            .iter_mut()
            .find(|child| child.local_name() == name)
    }

    /// Remove and return the first child with the given local name.
    pub fn remove_child(&mut self, name: &str) -> Option<Element> {
        let idx = self
            .children
            .iter()
            .position(|child| child.local_name() == name)?;
        Some(self.children.remove(idx))
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }
}
