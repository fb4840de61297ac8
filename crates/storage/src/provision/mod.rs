//! Idempotent provisioning of the tarxiv database, table and accounts.
//!
//! The batch is built as a [`ProvisionPlan`] first so it can be printed
//! (with secrets redacted) without touching a server, then executed
//! statement by statement by a [`Provisioner`].

mod plan;
mod principal;
mod runner;

pub use plan::{PlannedStep, ProvisionPlan, ProvisionRequest, ProvisionStep};
pub use principal::{HostScope, Principal, PrivilegeSet};
pub use runner::{ProvisionReport, Provisioner, StepOutcome, StepReport};
