use rustc_hash::FxHashMap;

use crate::expr::Expression;

/// A parsed GradeLang program: a mapping from category name to its owning expression.
///
/// A `Program` owns its expressions; dropping it drops them. The parser does not enforce
/// that category names are unique — a later definition silently overwrites an earlier one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    categories: FxHashMap<String, Expression>,
}

impl Program {
    /// Creates an empty program
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a category's expression
    pub fn insert(&mut self, name: impl Into<String>, expr: Expression) {
        self.categories.insert(name.into(), expr);
    }

    /// Looks up a category's expression by name
    pub fn get(&self, name: &str) -> Option<&Expression> {
        self.categories.get(name)
    }

    /// The number of categories declared in the program
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// True if the program declares no categories
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Iterates over `(name, expression)` pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expression)> {
        self.categories.iter().map(|(k, v)| (k.as_str(), v))
    }
}
