use std::collections::HashSet;

use crate::domain::{
    entities::{Action, GeneratorResource},
    error::DomainError,
    value_objects::{ActionKind, BuiltinAction, TemplateKind},
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_generator(generator: &GeneratorResource) -> Result<(), DomainError> {
        let name = generator.name.as_str();

        if generator.actions.is_empty() {
            return Err(DomainError::EmptyGenerator { name: name.into() });
        }

        let mut seen = HashSet::new();
        for prompt in &generator.prompts {
            if prompt.name().trim().is_empty() {
                return Err(DomainError::InvalidGenerator {
                    name: name.into(),
                    reason: "prompt without a name".into(),
                });
            }
            if !seen.insert(prompt.name()) {
                return Err(DomainError::DuplicatePrompt {
                    generator: name.into(),
                    prompt: prompt.name().into(),
                });
            }
        }

        for (index, action) in generator.actions.iter().enumerate() {
            Self::validate_action(name, index, action)?;
        }

        Ok(())
    }

    pub fn validate_action(generator: &str, index: usize, action: &Action) -> Result<(), DomainError> {
        let invalid = |reason: &str| DomainError::InvalidAction {
            generator: generator.into(),
            index,
            reason: reason.into(),
        };

        if action.destination.trim().is_empty() {
            return Err(invalid("destination is empty"));
        }

        let source_empty = action.template.source_or_content.trim().is_empty();
        if action.template.kind == TemplateKind::File && source_empty {
            return Err(invalid("file template without a source"));
        }

        match action.kind {
            ActionKind::Builtin(BuiltinAction::Move) if source_empty => {
                Err(invalid("move needs a source path in `source_or_content`"))
            }
            ActionKind::Builtin(BuiltinAction::Copy) if source_empty => {
                Err(invalid("copy needs a template to copy"))
            }
            _ => Ok(()),
        }
    }
}
