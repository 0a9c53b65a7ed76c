//! Property references and inputs that may hold either a literal or a reference

use std::borrow::Cow;
use std::fmt;

use serde::{Serialize, Serializer};

/// One step of a property path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// A reference to another resource's property, or to a declared config variable
///
/// Renders in interpolation syntax, e.g. `${appGateway.backendAddressPools[0].id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRef {
    root: String,
    path: Vec<PathSegment>,
}

impl PropertyRef {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            path: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.path.push(PathSegment::Field(name.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.path.push(PathSegment::Index(index));
        self
    }

    /// Resource key or config variable this reference starts from
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Parse an interpolation string such as `${vnet.name}`.
    ///
    /// Returns `None` for anything that is not a single, whole-string interpolation.
    pub fn parse(text: &str) -> Option<Self> {
        let inner = text.strip_prefix("${")?.strip_suffix('}')?;
        if inner.is_empty() || inner.contains("${") {
            return None;
        }

        let root_end = inner.find(['.', '[']).unwrap_or(inner.len());
        let (root, mut rest) = inner.split_at(root_end);
        if root.is_empty() {
            return None;
        }

        let mut reference = PropertyRef::new(root);
        while !rest.is_empty() {
            if let Some(after_dot) = rest.strip_prefix('.') {
                let end = after_dot.find(['.', '[']).unwrap_or(after_dot.len());
                let (name, tail) = after_dot.split_at(end);
                if name.is_empty() {
                    return None;
                }
                reference = reference.field(name);
                rest = tail;
            } else if let Some(after_bracket) = rest.strip_prefix('[') {
                let close = after_bracket.find(']')?;
                let index = after_bracket[..close].parse().ok()?;
                reference = reference.index(index);
                rest = &after_bracket[close + 1..];
            } else {
                return None;
            }
        }
        Some(reference)
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{{}", self.root)?;
        for segment in &self.path {
            match segment {
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        write!(f, "}}")
    }
}

impl Serialize for PropertyRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A resource argument that is either known now or resolved by the engine later
#[derive(Debug, Clone, PartialEq)]
pub enum Input<T> {
    Value(T),
    Ref(PropertyRef),
}

impl<T> Input<T> {
    pub fn reference(&self) -> Option<&PropertyRef> {
        match self {
            Input::Ref(reference) => Some(reference),
            Input::Value(_) => None,
        }
    }
}

/// Literal types an [`Input`] can carry
pub trait Literal {
    fn serialize_literal<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error>;
}

/// Escape `${` so the engine reads literal text instead of an interpolation
pub fn escape_interpolation(text: &str) -> Cow<'_, str> {
    if text.contains("${") {
        Cow::Owned(text.replace("${", "$${"))
    } else {
        Cow::Borrowed(text)
    }
}

impl Literal for String {
    fn serialize_literal<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&escape_interpolation(self))
    }
}

macro_rules! numeric_literal {
    ($($ty:ty),*) => {
        $(
            impl Literal for $ty {
                fn serialize_literal<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    self.serialize(serializer)
                }
            }
        )*
    };
}

numeric_literal!(u16, u32);

impl<T: Literal> Serialize for Input<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Input::Value(value) => value.serialize_literal(serializer),
            Input::Ref(reference) => reference.serialize(serializer),
        }
    }
}

impl<T> From<PropertyRef> for Input<T> {
    fn from(reference: PropertyRef) -> Self {
        Input::Ref(reference)
    }
}

impl From<String> for Input<String> {
    fn from(value: String) -> Self {
        Input::Value(value)
    }
}

impl From<&str> for Input<String> {
    fn from(value: &str) -> Self {
        Input::Value(value.to_string())
    }
}

impl From<u16> for Input<u16> {
    fn from(value: u16) -> Self {
        Input::Value(value)
    }
}

impl From<u32> for Input<u32> {
    fn from(value: u32) -> Self {
        Input::Value(value)
    }
}
