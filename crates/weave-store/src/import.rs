//! Domain import: turning an importer's `DomainDefinition` into catalog
//! entries.
//!
//! Patterns are all-or-nothing: every record is converted and checked for
//! collisions before the first one is registered. Relationships then go
//! through the bulk-import path, where bad records are reported and skipped.

use tracing::{info, warn};

use weave_core::models::DomainDefinition;
use weave_core::{FxHashSet, ValidationError, WeaveError, WeaveResult};

use crate::catalog::{Catalog, CatalogState};
use crate::report::{DomainImportReport, ImportReport, Rejection};

impl Catalog {
    pub fn import_domain(&self, definition: DomainDefinition) -> WeaveResult<DomainImportReport> {
        let max_depth = self.config().max_metadata_depth;
        let domain = definition.domain.clone();

        let mut patterns = Vec::with_capacity(definition.patterns.len());
        let mut seen = FxHashSet::default();
        for record in definition.patterns {
            let pattern = record.into_pattern(domain.as_deref(), max_depth)?;
            if !seen.insert(pattern.id.clone()) {
                return Err(ValidationError::DuplicateInput {
                    id: pattern.id.to_string(),
                }
                .into());
            }
            patterns.push(pattern);
        }

        // Conversion failures keep their input position in the report.
        let mut relationships = Vec::with_capacity(definition.relationships.len());
        for record in definition.relationships {
            let id = record.id.clone();
            match record.into_relationship(max_depth) {
                Ok(rel) => relationships.push(Ok(rel)),
                Err(e) => {
                    let e = WeaveError::from(e);
                    warn!(id = %id, rule = e.rule(), "relationship record rejected during import");
                    relationships.push(Err(Rejection::from_error(id, &e)));
                }
            }
        }

        let mut state = self.write()?;
        let CatalogState {
            registry,
            relationships: store,
        } = &mut *state;

        if let Some(existing) = patterns.iter().find(|p| registry.contains(&p.id)) {
            return Err(WeaveError::duplicate_pattern(&existing.id));
        }

        let mut registered = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            registered.push(pattern.id.clone());
            registry.register(pattern)?;
        }

        let mut report = ImportReport::default();
        for entry in relationships {
            match entry {
                Ok(rel) => store.import_one(rel, registry, &mut report),
                Err(rejection) => report.rejected.push(rejection),
            }
        }

        info!(
            domain = domain.as_deref().unwrap_or("-"),
            patterns = registered.len(),
            relationships = report.imported.len(),
            rejected = report.rejected.len(),
            "domain imported"
        );

        Ok(DomainImportReport {
            domain,
            patterns_registered: registered,
            relationships: report,
        })
    }
}
