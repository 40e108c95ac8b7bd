use std::fmt;

/// Semantic types used by the type checker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ty {
    Int,
    Bool,
    /// The "type" of statements that produce no value.
    Void,
}

/// Surface type names accepted in `val name: <type> = ...`, in declaration order.
pub const TYPE_NAMES: [(&str, Ty); 3] = [("void", Ty::Void), ("int", Ty::Int), ("bool", Ty::Bool)];

impl Ty {
    /// Look up a surface type name.
    pub fn from_name(name: &str) -> Option<Ty> {
        TYPE_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, ty)| *ty)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ty::Int => "int",
            Ty::Bool => "bool",
            Ty::Void => "void",
        }
    }

    /// Whether a value of this type can be stored or printed.
    pub fn has_value(&self) -> bool {
        !matches!(self, Ty::Void)
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
