use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeKind {
    Body,
    Eye,
}

/// A challenge template: a fixed XP reward for a described real-world
/// action. Templates are read-only data, never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeTemplate {
    pub kind: ChallengeKind,
    pub description: String,
    /// Experience points awarded on completion.
    pub amount: u32,
}

/// A finite, non-empty, ordered list of challenge templates the engine
/// samples from. Loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    templates: Vec<ChallengeTemplate>,
}

impl Catalog {
    /// Build a catalog from templates.
    ///
    /// # Errors
    ///
    /// An empty catalog is a configuration error: the engine could never
    /// sample from it, so this fails fast instead.
    pub fn new(templates: Vec<ChallengeTemplate>) -> Result<Self, ValidationError> {
        if templates.is_empty() {
            return Err(ValidationError::EmptyCollection(
                "challenge catalog".to_string(),
            ));
        }
        Ok(Self { templates })
    }

    /// The built-in challenge set.
    pub fn builtin() -> Self {
        let body = |description: &str, amount: u32| ChallengeTemplate {
            kind: ChallengeKind::Body,
            description: description.into(),
            amount,
        };
        let eye = |description: &str, amount: u32| ChallengeTemplate {
            kind: ChallengeKind::Eye,
            description: description.into(),
            amount,
        };
        Self {
            templates: vec![
                body("Stand up and stretch your arms over your head for 30 seconds.", 40),
                body("Walk to the farthest corner of the room and back, twice.", 60),
                body("Do 10 slow shoulder rolls, forward then backward.", 50),
                body("Stretch your wrists and fingers for one minute.", 40),
                body("Stand up and do 10 calf raises.", 70),
                eye("Look at something at least 6 meters away for 20 seconds.", 30),
                eye("Close your eyes and slowly roll them 5 times in each direction.", 50),
                eye("Blink deliberately 20 times to rewet your eyes.", 30),
            ],
        }
    }

    /// Parse a catalog from its JSON representation: an array of
    /// `{ "kind": "body" | "eye", "description": ..., "amount": ... }`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the array is empty.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let templates: Vec<ChallengeTemplate> = serde_json::from_str(json)?;
        Ok(Self::new(templates)?)
    }

    pub fn templates(&self) -> &[ChallengeTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ChallengeTemplate> {
        self.templates.get(index)
    }

    pub fn contains(&self, template: &ChallengeTemplate) -> bool {
        self.templates.iter().any(|t| t == template)
    }
}
