use std::collections::BTreeMap;
use std::fmt::Debug;

/// Per-field error messages produced by validation.
pub type FieldErrors<F> = BTreeMap<F, String>;

/// One page of a wizard: a title and the fields it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<F: 'static> {
    pub title: &'static str,
    pub fields: &'static [F],
}

/// Field values accumulated across every step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormValues<F: Ord> {
    values: BTreeMap<F, String>,
}

impl<F: Ord + Copy> FormValues<F> {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Value of `field`, or `""` if it was never set.
    pub fn get(&self, field: F) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: F, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.values.iter().map(|(field, value)| (*field, value.as_str()))
    }
}

/// Describes a multi-step form: its steps, defaults, rules and result.
///
/// The [`Wizard`](crate::wizard::Wizard) engine is generic over this trait;
/// see [`LaunchpadSchema`](crate::launchpad::LaunchpadSchema) for the
/// launchpad's implementation.
pub trait FormSchema {
    type Field: Copy + Ord + Debug + 'static;
    type Output;

    /// Ordered steps. Every field belongs to exactly one step.
    fn steps(&self) -> &'static [Step<Self::Field>];

    /// Initial value of `field`.
    fn default_value(&self, field: Self::Field) -> &'static str {
        let _ = field;
        ""
    }

    /// Checks one field, with access to every value for cross-field rules.
    ///
    /// Returns the error message, or `None` if the field is valid.
    fn validate_field(&self, field: Self::Field, values: &FormValues<Self::Field>)
        -> Option<String>;

    /// Turns a fully validated set of values into the form's result.
    fn finalize(
        &self,
        values: &FormValues<Self::Field>,
    ) -> Result<Self::Output, FieldErrors<Self::Field>>;

    fn all_fields(&self) -> Vec<Self::Field> {
        self.steps()
            .iter()
            .flat_map(|step| step.fields.iter().copied())
            .collect()
    }
}
