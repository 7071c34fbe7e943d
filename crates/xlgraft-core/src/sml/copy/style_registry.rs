use crate::sml::settings::StyleIdentity;
use crate::sml::style::{CellStyle, StyleId, StylePool};
use std::collections::HashMap;

/// Maps source styles to destination styles for one copy operation.
///
/// A registry is tied to one (source pool, destination pool) pair; its ids
/// mean nothing against any other pool.
#[derive(Debug)]
pub struct StyleRegistry {
    identity: StyleIdentity,
    by_slot: HashMap<StyleId, StyleId>,
    by_value: HashMap<CellStyle, StyleId>,
    created: usize,
}

impl StyleRegistry {
    pub fn new(identity: StyleIdentity) -> Self {
        Self {
            identity,
            by_slot: HashMap::new(),
            by_value: HashMap::new(),
            created: 0,
        }
    }

    /// Destination style for `style`, creating it on first sight.
    ///
    /// `None` in, `None` out. A source id the pool does not know also gives
    /// `None`.
    pub fn resolve(
        &mut self,
        style: Option<StyleId>,
        source: &StylePool,
        destination: &mut StylePool,
    ) -> Option<StyleId> {
        let id = style?;
        if let Some(&mapped) = self.by_slot.get(&id) {
            return Some(mapped);
        }
        let value = source.get(id)?;

        let mapped = match self.identity {
            StyleIdentity::Reference => self.create(value, destination),
            StyleIdentity::Structural => match self.by_value.get(value) {
                Some(&existing) => existing,
                None => {
                    let created = self.create(value, destination);
                    self.by_value.insert(value.clone(), created);
                    created
                }
            },
        };
        self.by_slot.insert(id, mapped);
        Some(mapped)
    }

    fn create(&mut self, value: &CellStyle, destination: &mut StylePool) -> StyleId {
        self.created += 1;
        destination.add(value.clone())
    }

    /// Number of destination styles created so far.
    pub fn created(&self) -> usize {
        self.created
    }
}
