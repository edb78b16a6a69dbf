use gradelang_eval::{BasicOperationProvider, Context, DataProvider, OperationProvider};
use gradelang_parser::{Parser, Program, Value};

use crate::{error::Result, Error};

/// Settings controlling how a [`Gradebook`] builds its evaluation [`Context`].
pub struct GradebookSettings {
    /// Whether the reference operation dialect (`drop`, `top`, `clamp`, `require`, ...)
    /// from [`gradelang_ops`] should be registered alongside any caller-supplied operation
    /// providers. Enabled by default.
    pub use_reference_dialect: bool,
}

impl Default for GradebookSettings {
    fn default() -> Self {
        Self {
            use_reference_dialect: true,
        }
    }
}

/// A parsed GradeLang program paired with the operation providers it evaluates against.
///
/// This is the facade a host embeds: parse source into a [`Gradebook`], then call
/// [`Gradebook::get`] for each category the host is interested in. Every `get` call runs
/// against a fresh [`Context`], so memoization only lives for the duration of one query;
/// see [`Gradebook::get_many`] to resolve several categories under shared memoization.
///
/// # Example
///
/// ```
/// use gradelang::Gradebook;
///
/// let book = Gradebook::parse("hw: {80% 90% 70%}").unwrap();
/// let hw = book.get("hw").unwrap();
/// assert!(matches!(hw, gradelang::Value::Grade(g) if (g - 0.8).abs() < 1e-9));
/// ```
pub struct Gradebook {
    program: Program,
    reference_ops: Option<BasicOperationProvider>,
}

impl std::fmt::Debug for Gradebook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gradebook")
            .field("program", &self.program)
            .field("reference_ops", &self.reference_ops.is_some())
            .finish()
    }
}

impl Gradebook {
    /// Parses `source` into a program, using the default settings (the reference operation
    /// dialect enabled, no additional data or operation providers).
    pub fn parse(source: &str) -> Result<Self> {
        Self::parse_with_settings(source, GradebookSettings::default())
    }

    /// Parses `source` into a program with explicit settings.
    pub fn parse_with_settings(source: &str, settings: GradebookSettings) -> Result<Self> {
        let program = Parser::parse(source)?;
        let reference_ops = settings.use_reference_dialect.then(gradelang_ops::reference_dialect);
        Ok(Self {
            program,
            reference_ops,
        })
    }

    /// The underlying parsed program, for hosts that want to inspect category names or
    /// compose several programs as a list of [`DataProvider`]s themselves.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Resolves a single category, building a fresh [`Context`] scoped to this one call.
    ///
    /// Additional data providers (e.g. other loaded programs) and operation providers
    /// (beyond the reference dialect) can be supplied via
    /// [`Gradebook::get_with_providers`].
    pub fn get(&self, name: &str) -> Result<Value> {
        self.get_with_providers(name, &[], &[])
    }

    /// Resolves a single category against this program plus caller-supplied providers.
    ///
    /// `extra_data_providers` are searched after this program; `extra_operation_providers`
    /// are searched after the reference dialect (if enabled).
    pub fn get_with_providers(
        &self,
        name: &str,
        extra_data_providers: &[&dyn DataProvider],
        extra_operation_providers: &[&dyn OperationProvider],
    ) -> Result<Value> {
        let ctx = self.build_context(extra_data_providers, extra_operation_providers);
        ctx.get_category_value(name).map_err(Error::from)
    }

    /// Resolves every name in `names` against one shared [`Context`], so repeated
    /// dependencies are only evaluated once.
    pub fn get_many(&self, names: &[&str]) -> Result<Vec<Value>> {
        let ctx = self.build_context(&[], &[]);
        names
            .iter()
            .map(|name| ctx.get_category_value(name).map_err(Error::from))
            .collect()
    }

    fn build_context<'a>(
        &'a self,
        extra_data_providers: &[&'a dyn DataProvider],
        extra_operation_providers: &[&'a dyn OperationProvider],
    ) -> Context<'a> {
        let mut data_providers: Vec<&dyn DataProvider> = vec![&self.program];
        data_providers.extend_from_slice(extra_data_providers);

        let mut operation_providers: Vec<&dyn OperationProvider> = Vec::new();
        if let Some(reference_ops) = &self.reference_ops {
            operation_providers.push(reference_ops);
        }
        operation_providers.extend_from_slice(extra_operation_providers);

        Context::new(data_providers, operation_providers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_resolves_a_simple_category() {
        let book = Gradebook::parse("hw: 80%").unwrap();
        assert_eq!(book.get("hw").unwrap(), Value::Grade(0.8));
    }

    #[test]
    fn unresolved_category_is_undefined_not_an_error() {
        let book = Gradebook::parse("hw: 80%").unwrap();
        assert!(book.get("nope").unwrap().is_undefined());
    }

    #[test]
    fn syntax_error_is_reported_with_byte_offset() {
        let err = Gradebook::parse("hw 80%").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn reference_dialect_can_be_disabled() {
        let settings = GradebookSettings {
            use_reference_dialect: false,
        };
        let book = Gradebook::parse_with_settings("g: require(80% 60%)", settings).unwrap();
        let err = book.get("g").unwrap_err();
        assert!(matches!(err, Error::Eval(gradelang_eval::EvalError::OperationNotFound(_))));
    }

    #[test]
    fn get_many_resolves_several_categories_under_one_context() {
        let book = Gradebook::parse("hw: 80%  final: 90%").unwrap();
        let values = book.get_many(&["hw", "final"]).unwrap();
        assert_eq!(values, vec![Value::Grade(0.8), Value::Grade(0.9)]);
    }
}
