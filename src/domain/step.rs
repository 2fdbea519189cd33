use crate::domain::StepNumber;
use crate::domain::submission::FieldMap;
use crate::error::{Result, VerificationError};
use serde::Deserialize;

/// A single stage of the verification sequence.
///
/// Step definitions are immutable: they are built once at process start and
/// never change while submissions reference them.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct StepDefinition {
    /// Position in the sequence, starting at 1.
    pub number: StepNumber,
    /// Human-readable name shown by the stepper UI.
    pub name: String,
    /// Field identifiers that must be present and non-empty on submit.
    pub required_fields: Vec<String>,
}

impl StepDefinition {
    /// Checks that every required field is present and non-empty.
    pub fn validate(&self, data: &FieldMap) -> Result<()> {
        let missing: Vec<String> = self
            .required_fields
            .iter()
            .filter(|field| {
                data.get(field.as_str())
                    .map(|value| value.trim().is_empty())
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(VerificationError::MissingFields { fields: missing })
        }
    }
}

/// The ordered list of verification steps.
#[derive(Debug, Clone)]
pub struct StepRegistry {
    steps: Vec<StepDefinition>,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    steps: Vec<StepDefinition>,
}

impl StepRegistry {
    /// Builds a registry, enforcing contiguous numbering from 1 and
    /// non-empty step names.
    pub fn new(mut steps: Vec<StepDefinition>) -> Result<Self> {
        if steps.is_empty() {
            return Err(VerificationError::Validation(
                "step registry cannot be empty".to_string(),
            ));
        }

        steps.sort_by_key(|step| step.number);
        for (index, step) in steps.iter().enumerate() {
            let expected = (index + 1) as StepNumber;
            if step.number != expected {
                return Err(VerificationError::Validation(format!(
                    "step numbers must be contiguous starting at 1, found {} where {} was expected",
                    step.number, expected
                )));
            }
            if step.name.trim().is_empty() {
                return Err(VerificationError::Validation(format!(
                    "step {} has an empty name",
                    step.number
                )));
            }
        }

        Ok(Self { steps })
    }

    /// Parses a registry from its TOML representation (the `--steps` file).
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(content)
            .map_err(|e| VerificationError::Validation(format!("invalid step registry: {e}")))?;
        Self::new(file.steps)
    }

    /// The built-in SilanPay onboarding sequence.
    pub fn default_steps() -> Self {
        let step = |number, name: &str, fields: &[&str]| StepDefinition {
            number,
            name: name.to_string(),
            required_fields: fields.iter().map(|f| f.to_string()).collect(),
        };
        // Constructed directly: the list below is contiguous by inspection.
        Self {
            steps: vec![
                step(1, "Identity", &["full_name", "date_of_birth", "document_id"]),
                step(
                    2,
                    "Business Info",
                    &["business_name", "registration_number", "country"],
                ),
                step(3, "Bank Account", &["account_holder", "iban"]),
                step(4, "Compliance", &["tax_id", "terms_accepted"]),
            ],
        }
    }

    pub fn get(&self, number: StepNumber) -> Option<&StepDefinition> {
        self.steps.iter().find(|step| step.number == number)
    }

    /// Steps in ascending order.
    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The highest step number in the sequence.
    pub fn last_step(&self) -> StepNumber {
        // The registry is never empty, `new` rejects that.
        self.steps.last().map(|step| step.number).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(number: StepNumber, name: &str, fields: &[&str]) -> StepDefinition {
        StepDefinition {
            number,
            name: name.to_string(),
            required_fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_data() {
        let definition = step(1, "Identity", &["full_name", "document_id"]);
        let mut data = FieldMap::new();
        data.insert("full_name".to_string(), "Jane Doe".to_string());
        data.insert("document_id".to_string(), "P1234567".to_string());

        assert!(definition.validate(&data).is_ok());
    }

    #[test]
    fn test_validate_reports_missing_and_blank_fields() {
        let definition = step(1, "Identity", &["full_name", "document_id"]);
        let mut data = FieldMap::new();
        data.insert("document_id".to_string(), "   ".to_string());

        let result = definition.validate(&data);
        match result {
            Err(VerificationError::MissingFields { fields }) => {
                assert_eq!(fields, vec!["full_name", "document_id"]);
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn test_registry_rejects_empty_list() {
        assert!(matches!(
            StepRegistry::new(vec![]),
            Err(VerificationError::Validation(_))
        ));
    }

    #[test]
    fn test_registry_rejects_duplicate_numbers() {
        let result = StepRegistry::new(vec![step(1, "A", &[]), step(1, "B", &[])]);
        assert!(matches!(result, Err(VerificationError::Validation(_))));
    }

    #[test]
    fn test_registry_rejects_gaps() {
        let result = StepRegistry::new(vec![step(1, "A", &[]), step(3, "C", &[])]);
        assert!(matches!(result, Err(VerificationError::Validation(_))));
    }

    #[test]
    fn test_registry_sorts_by_number() {
        let registry = StepRegistry::new(vec![step(2, "B", &[]), step(1, "A", &[])]).unwrap();
        let numbers: Vec<StepNumber> = registry.steps().iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(registry.last_step(), 2);
    }

    #[test]
    fn test_default_steps_are_contiguous() {
        let registry = StepRegistry::default_steps();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.get(1).unwrap().name, "Identity");
        assert_eq!(registry.last_step(), 4);
        for (index, step) in registry.steps().iter().enumerate() {
            assert_eq!(step.number as usize, index + 1);
        }
    }

    #[test]
    fn test_registry_from_toml() {
        let content = r#"
            [[steps]]
            number = 1
            name = "Identity"
            required_fields = ["full_name"]

            [[steps]]
            number = 2
            name = "Bank Account"
            required_fields = ["iban"]
        "#;

        let registry = StepRegistry::from_toml(content).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(2).unwrap().required_fields, vec!["iban"]);
    }

    #[test]
    fn test_registry_from_invalid_toml() {
        assert!(matches!(
            StepRegistry::from_toml("steps = 3"),
            Err(VerificationError::Validation(_))
        ));
    }
}
