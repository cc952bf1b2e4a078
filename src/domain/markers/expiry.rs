//! Deciding whether a block is due

use super::attributes::{Attributes, Directive};
use super::matcher::Block;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Active,
    Expired,
}

/// True once `reference` is past the last millisecond of the `expiry` second
pub fn is_expired(expiry: DateTime<Utc>, reference: DateTime<Utc>) -> bool {
    reference > expiry + Duration::milliseconds(999)
}

/// Classifies blocks against one reference instant
///
/// A block's classification only depends on its own attributes, never on
/// its ancestors or descendants.
#[derive(Debug, Clone)]
pub struct ExpiryEvaluator<'s> {
    reference: DateTime<Utc>,
    removal_names: &'s BTreeSet<String>,
}

impl<'s> ExpiryEvaluator<'s> {
    pub fn new(reference: DateTime<Utc>, removal_names: &'s BTreeSet<String>) -> Self {
        ExpiryEvaluator {
            reference,
            removal_names,
        }
    }

    pub fn classify_attributes(&self, attributes: &Attributes) -> Classification {
        let expired = match &attributes.directive {
            Directive::TimeLimited { expiry } => is_expired(*expiry, self.reference),
            Directive::RemovalMarker { name } => self.removal_names.contains(name),
        };

        if expired {
            Classification::Expired
        } else {
            Classification::Active
        }
    }

    /// Blocks with unusable attributes stay active forever
    pub fn classify(&self, block: &Block<'_>) -> Classification {
        match &block.attributes {
            Ok(attributes) => self.classify_attributes(attributes),
            Err(_) => Classification::Active,
        }
    }
}
