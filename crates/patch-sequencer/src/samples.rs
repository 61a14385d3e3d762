//! Bundled sample batches, used by the CLI demo and by tests.

use crate::model::{Classification, Dependency, Impact, Patch};

/// Seven patches without cycles.
///
/// P1, P3 and P6 are Additive with no dependencies. P2, P4 and P7 are
/// Corrective patches built on top of P1 and P3. P5 is a Destructive patch
/// that depends on the very table it drops, so its dependency stays
/// unmatched.
pub fn acyclic_batch() -> Vec<Patch> {
    let user_role = Dependency::new("public", "user_role", "type");
    let user_metadata = Dependency::table("user_metadata");

    vec![
        Patch::new("P1", Classification::Additive, 95, Impact::Low).affecting(user_role.clone()),
        Patch::new("P2", Classification::Corrective, 90, Impact::Medium)
            .depends_on(user_role.clone())
            .affecting(Dependency::new("public", "create_user", "function")),
        Patch::new("P3", Classification::Additive, 80, Impact::Low).affecting(user_metadata.clone()),
        Patch::new("P4", Classification::Corrective, 70, Impact::Medium)
            .depends_on(user_metadata.clone())
            .affecting(Dependency::new("public", "sync_user_meta", "function")),
        Patch::new("P5", Classification::Destructive, 60, Impact::High)
            .depends_on(Dependency::table("old_table"))
            .affecting(Dependency::table("old_table")),
        Patch::new("P6", Classification::Additive, 85, Impact::Low)
            .affecting(Dependency::new("public", "audit_index", "index")),
        Patch::new("P7", Classification::Corrective, 75, Impact::Medium)
            .depends_on(user_role)
            .depends_on(user_metadata)
            .affecting(Dependency::new("public", "reporting_fn", "function")),
    ]
}

/// Two patches that each depend on the other's object.
pub fn cyclic_batch() -> Vec<Patch> {
    vec![
        Patch::new("P8", Classification::Corrective, 80, Impact::Medium)
            .depends_on(Dependency::table("obj9"))
            .affecting(Dependency::table("obj8")),
        Patch::new("P9", Classification::Corrective, 80, Impact::Medium)
            .depends_on(Dependency::table("obj8"))
            .affecting(Dependency::table("obj9")),
    ]
}
