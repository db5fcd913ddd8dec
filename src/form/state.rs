use std::collections::BTreeMap;

use crate::checkout::error::CheckoutError;
use crate::form::template::{FormField, FormTemplate};

/// Field name → current string value.
pub type FormValues = BTreeMap<String, String>;

/// Tracked state of one input: its current value and whether it lost focus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldInput {
    pub value: String,
    pub touched: bool,
}

/// Controlled-value model for one form. Every change goes through
/// `set_value`, so submission reads this state rather than rendered inputs.
#[derive(Debug, Clone)]
pub struct FormState {
    template: FormTemplate,
    inputs: Vec<FieldInput>,
    was_submitted: bool,
}

impl FormState {
    pub fn new(template: FormTemplate) -> Self {
        let inputs = vec![FieldInput::default(); template.fields.len()];
        Self {
            template,
            inputs,
            was_submitted: false,
        }
    }

    /// Start from previously entered values; fields missing from `initial`
    /// start empty.
    pub fn with_initial(template: FormTemplate, initial: Option<&FormValues>) -> Self {
        let mut state = Self::new(template);
        if let Some(values) = initial {
            for (field, input) in state.template.fields.iter().zip(state.inputs.iter_mut()) {
                if let Some(v) = values.get(&field.name) {
                    input.value = v.clone();
                }
            }
        }
        state
    }

    pub fn template(&self) -> &FormTemplate {
        &self.template
    }

    fn index_of(&self, name: &str) -> Result<usize, CheckoutError> {
        self.template
            .fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| CheckoutError::UnknownField {
                form_id: self.template.form_id.clone(),
                field: name.to_string(),
            })
    }

    pub fn set_value(&mut self, name: &str, value: &str) -> Result<(), CheckoutError> {
        let idx = self.index_of(name)?;
        self.inputs[idx].value = value.to_string();
        Ok(())
    }

    pub fn blur(&mut self, name: &str) -> Result<(), CheckoutError> {
        let idx = self.index_of(name)?;
        self.inputs[idx].touched = true;
        Ok(())
    }

    pub fn mark_submitted(&mut self) {
        self.was_submitted = true;
    }

    pub fn was_submitted(&self) -> bool {
        self.was_submitted
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.index_of(name).ok().map(|i| self.inputs[i].value.as_str())
    }

    /// Snapshot of every field value, keyed by field name.
    pub fn values(&self) -> FormValues {
        self.template
            .fields
            .iter()
            .zip(&self.inputs)
            .map(|(field, input)| (field.name.clone(), input.value.clone()))
            .collect()
    }

    /// Live validation result for a field, whether or not it is shown.
    pub fn errors(&self, name: &str) -> Result<Vec<String>, CheckoutError> {
        let idx = self.index_of(name)?;
        Ok(self.template.fields[idx].validate(&self.inputs[idx].value))
    }

    /// Errors the user should see: only once the field was touched or the
    /// form submitted.
    pub fn visible_errors(&self, name: &str) -> Result<Vec<String>, CheckoutError> {
        let idx = self.index_of(name)?;
        if !(self.was_submitted || self.inputs[idx].touched) {
            return Ok(Vec::new());
        }
        Ok(self.template.fields[idx].validate(&self.inputs[idx].value))
    }

    /// Every field with at least one failing rule, in template order.
    pub fn invalid_fields(&self) -> Vec<(&FormField, Vec<String>)> {
        self.template
            .fields
            .iter()
            .zip(&self.inputs)
            .filter_map(|(field, input)| {
                let errors = field.validate(&input.value);
                (!errors.is_empty()).then_some((field, errors))
            })
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.invalid_fields().is_empty()
    }
}
