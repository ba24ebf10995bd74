//! Merge engine: set union of new domains into one section.

use crate::domain::{MergeOutcome, Section, TargetDocument};
use tracing::debug;

/// Union `domains` into the section named `section_name`, creating it at
/// the end of the document when absent. Membership is boolean, so there is
/// nothing to resolve: the union simply becomes the section's new host
/// set. No other section is touched.
pub fn merge_into_section(
    doc: &mut TargetDocument,
    section_name: &str,
    domains: &[String],
) -> MergeOutcome {
    let created = !doc.sections().any(|s| s.matches(section_name));
    if created {
        debug!("creating section {section_name:?}");
        doc.push_section(Section::managed(section_name));
    }

    let mut outcome = MergeOutcome { created_section: created, ..MergeOutcome::default() };

    if let Some(section) = doc.find_section_mut(section_name) {
        for domain in domains {
            if section.hosts.insert(domain.clone()) {
                outcome.added += 1;
            } else {
                outcome.already_present += 1;
            }
        }
        outcome.total_after = section.hosts.len();
    }

    outcome
}
