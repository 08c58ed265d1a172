use tracing::debug;

use super::schema::{FieldErrors, FormSchema, FormValues, Step};

/// Result of a successful [`Wizard::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance<T> {
    /// Moved to the given 1-based step.
    Moved(usize),
    /// The last step was submitted; the wizard is back at step 1.
    Finalized(T),
}

/// Multi-step form state machine.
///
/// Steps are numbered from 1. Values persist across steps; validation only
/// runs when advancing, and only for the current step's fields, except on the
/// last step where the whole form is checked before
/// [`FormSchema::finalize`] is called.
#[derive(Debug, Clone)]
pub struct Wizard<S: FormSchema> {
    schema: S,
    current_step: usize,
    values: FormValues<S::Field>,
    errors: FieldErrors<S::Field>,
}

impl<S: FormSchema> Wizard<S> {
    pub fn new(schema: S) -> Self {
        let values = Self::defaults(&schema);
        Self {
            schema,
            current_step: 1,
            values,
            errors: FieldErrors::new(),
        }
    }

    fn defaults(schema: &S) -> FormValues<S::Field> {
        let mut values = FormValues::new();
        for field in schema.all_fields() {
            values.set(field, schema.default_value(field));
        }
        values
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    /// 1-based index of the current step.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn step_count(&self) -> usize {
        self.schema.steps().len()
    }

    pub fn step(&self) -> Option<&'static Step<S::Field>> {
        self.schema.steps().get(self.current_step - 1)
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step >= self.step_count()
    }

    pub fn values(&self) -> &FormValues<S::Field> {
        &self.values
    }

    pub fn value(&self, field: S::Field) -> &str {
        self.values.get(field)
    }

    /// Errors from the last failed [`advance`](Self::advance).
    pub fn errors(&self) -> &FieldErrors<S::Field> {
        &self.errors
    }

    /// Stores a value. Does not validate and does not change the step.
    pub fn update_field(&mut self, field: S::Field, value: impl Into<String>) {
        self.values.set(field, value);
    }

    /// Validates the current step and moves forward.
    ///
    /// On the last step the whole form is validated, the schema's `finalize`
    /// is called once, and the wizard returns to its initial state.
    ///
    /// # Errors
    ///
    /// Returns the field errors and stays on the current step when
    /// validation fails.
    pub fn advance(&mut self) -> Result<Advance<S::Output>, FieldErrors<S::Field>> {
        if !self.is_last_step() {
            let fields = self.step().map(|step| step.fields).unwrap_or(&[]);
            self.check(fields.iter().copied())?;
            self.current_step += 1;
            debug!(step = self.current_step, event = "wizard_advanced");
            return Ok(Advance::Moved(self.current_step));
        }

        self.check(self.schema.all_fields())?;
        let output = self.schema.finalize(&self.values).map_err(|errors| {
            self.errors = errors.clone();
            errors
        })?;

        debug!(event = "wizard_finalized");
        self.reset();
        Ok(Advance::Finalized(output))
    }

    /// Moves back one step; a no-op on step 1.
    pub fn retreat(&mut self) {
        if self.current_step > 1 {
            self.current_step -= 1;
            debug!(step = self.current_step, event = "wizard_retreated");
        }
    }

    /// Returns to step 1 with default values and no errors.
    pub fn reset(&mut self) {
        self.current_step = 1;
        self.values = Self::defaults(&self.schema);
        self.errors.clear();
    }

    fn check(
        &mut self,
        fields: impl IntoIterator<Item = S::Field>,
    ) -> Result<(), FieldErrors<S::Field>> {
        let errors: FieldErrors<S::Field> = fields
            .into_iter()
            .filter_map(|field| {
                self.schema
                    .validate_field(field, &self.values)
                    .map(|message| (field, message))
            })
            .collect();

        if errors.is_empty() {
            self.errors.clear();
            Ok(())
        } else {
            debug!(
                step = self.current_step,
                error_count = errors.len(),
                event = "wizard_validation_failed"
            );
            self.errors = errors.clone();
            Err(errors)
        }
    }
}
