use std::fmt;
use std::rc::Rc;

/// One step of an instance path: either a property name or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Property(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Property(name) => write!(f, ".{}", name),
            PathSegment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Pointer into the instance document being validated, e.g. `$.foo[2].bar`.
///
/// Built as an immutable linked list so a recursive validator can extend the
/// path for a child call without touching the parent's copy.
#[derive(Debug, Clone)]
pub struct Path {
    segment: Option<PathSegment>,
    parent: Option<Rc<Path>>,
}

impl Path {
    pub fn root() -> Self {
        Path {
            segment: None,
            parent: None,
        }
    }

    pub fn child_property(self: &Rc<Self>, name: impl Into<String>) -> Rc<Path> {
        Rc::new(Path {
            segment: Some(PathSegment::Property(name.into())),
            parent: Some(Rc::clone(self)),
        })
    }

    pub fn child_index(self: &Rc<Self>, index: usize) -> Rc<Path> {
        Rc::new(Path {
            segment: Some(PathSegment::Index(index)),
            parent: Some(Rc::clone(self)),
        })
    }

    fn segments(&self) -> Vec<&PathSegment> {
        let mut out = Vec::new();
        let mut cur = self;
        while let Some(segment) = &cur.segment {
            out.push(segment);
            match &cur.parent {
                Some(parent) => cur = parent,
                None => break,
            }
        }
        out.reverse();
        out
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in self.segments() {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl Default for Path {
    fn default() -> Self {
        Path::root()
    }
}

/// `/`-joined, `~0`/`~1`-escaped JSON-Pointer style path, used for schema-side
/// locations (`CompiledSchema::schema_path`) rather than instance-side ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaPath(String);

impl SchemaPath {
    pub fn root() -> Self {
        SchemaPath(String::new())
    }

    pub fn push(&self, segment: &str) -> SchemaPath {
        let mut out = self.0.clone();
        out.push('/');
        for ch in segment.chars() {
            match ch {
                '~' => out.push_str("~0"),
                '/' => out.push_str("~1"),
                other => out.push(other),
            }
        }
        SchemaPath(out)
    }

    pub fn push_index(&self, index: usize) -> SchemaPath {
        self.push(&index.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "#")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_path_displays_as_dollar() {
        assert_eq!(Path::root().to_string(), "$");
    }

    #[test]
    fn nested_path_displays_dotted_bracket_style() {
        let root = Rc::new(Path::root());
        let foo = root.child_property("foo");
        let item = foo.child_index(2);
        assert_eq!(item.to_string(), "$.foo[2]");
    }

    #[test]
    fn schema_path_escapes_tilde_and_slash() {
        let root = SchemaPath::root();
        let nested = root.push("a/b").push("c~d");
        assert_eq!(nested.to_string(), "#/a~1b/c~0d");
    }
}
