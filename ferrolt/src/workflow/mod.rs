//! Discovery-to-registration workflow.
//!
//! [`Workflow`] owns the only mutable state in the crate: the field sets
//! that become registration, verification and status requests. It moves
//! between states through a small set of transitions:
//!
//! - [`apply_autofind`](Workflow::apply_autofind) - a fresh scan replaces the
//!   discovered list and auto-selects its first record
//! - [`select`](Workflow::select) - the user picks a discovered record
//! - [`set_field`](Workflow::set_field) - the user edits one field
//! - [`registration_succeeded`](Workflow::registration_succeeded) - identity
//!   is copied to the verification form
//! - [`reset_to_defaults`](Workflow::reset_to_defaults)
//!
//! Selection re-derives `serialNumber`, `portId` and `ontId` only.
//! Description and profile ids are never touched by discovery, and a user
//! edit stays in place until the next explicit selection.
//!
//! The workflow never talks to the device.

mod fields;

pub use fields::{Field, OntIdentity, RegistrationFieldSet, StatusQuery, WorkflowDefaults};

use log::debug;

use crate::error::WorkflowError;
use crate::parser::OntRecord;

/// Owned form state for one provisioning session.
#[derive(Debug, Clone)]
pub struct Workflow {
    defaults: WorkflowDefaults,
    registration: RegistrationFieldSet,
    verification: OntIdentity,
    status: StatusQuery,
    info_description: String,
    discovered: Vec<OntRecord>,
    selected: Option<usize>,
}

impl Workflow {
    /// Create a workflow with every form at its defaults.
    pub fn new(defaults: WorkflowDefaults) -> Self {
        Self {
            registration: RegistrationFieldSet::from_defaults(&defaults),
            verification: OntIdentity::from_defaults(&defaults),
            status: StatusQuery::from_defaults(&defaults),
            info_description: defaults.description.clone(),
            discovered: Vec::new(),
            selected: None,
            defaults,
        }
    }

    /// Get the defaults this workflow resets to.
    pub fn defaults(&self) -> &WorkflowDefaults {
        &self.defaults
    }

    /// Get the registration field set.
    pub fn registration(&self) -> &RegistrationFieldSet {
        &self.registration
    }

    /// Get the verification field set.
    pub fn verification(&self) -> &OntIdentity {
        &self.verification
    }

    /// Get the status query form.
    pub fn status_query(&self) -> &StatusQuery {
        &self.status
    }

    /// Get the description used for ONT info lookups.
    pub fn info_description(&self) -> &str {
        &self.info_description
    }

    /// Records from the latest autofind scan.
    pub fn discovered(&self) -> &[OntRecord] {
        &self.discovered
    }

    /// The record the field set was last derived from.
    pub fn selected(&self) -> Option<&OntRecord> {
        self.selected.and_then(|i| self.discovered.get(i))
    }

    /// Index of the selected record.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Take the result of a new autofind scan.
    ///
    /// The discovered list is replaced wholesale. If it is non-empty the
    /// first record is selected and the field sets are derived from it;
    /// otherwise every field keeps its current value.
    pub fn apply_autofind(&mut self, records: Vec<OntRecord>) -> Option<&OntRecord> {
        self.discovered = records;
        self.selected = None;

        if self.discovered.is_empty() {
            debug!("autofind returned no ONTs, keeping current fields");
            return None;
        }
        self.select(0).ok()
    }

    /// Select a discovered record and derive the field sets from it.
    pub fn select(&mut self, index: usize) -> Result<&OntRecord, WorkflowError> {
        let record = self
            .discovered
            .get(index)
            .cloned()
            .ok_or(WorkflowError::NoSuchRecord {
                index,
                available: self.discovered.len(),
            })?;

        self.derive_from_record(&record);
        self.selected = Some(index);
        Ok(&self.discovered[index])
    }

    /// Derive the identity fields from a record and mirror them to the
    /// verification form.
    ///
    /// - `serialNumber` takes the record's serial (empty if it had none)
    /// - `portId` takes the third `F/S/P` segment; a missing or malformed
    ///   path keeps the current port
    /// - `ontId` takes the record's number
    pub fn derive_from_record(&mut self, record: &OntRecord) {
        let identity = &mut self.registration.identity;

        identity.serial_number = record.serial_number.clone().unwrap_or_default();
        match record.port_id() {
            Some(port) => identity.port_id = port.to_string(),
            None => debug!(
                "ONT {} has no usable F/S/P ({:?}), keeping port {}",
                record.number, record.fsp, identity.port_id
            ),
        }
        identity.ont_id = record.number.clone();

        debug!(
            "derived sn={} port={} ont={} from ONT {}",
            identity.serial_number, identity.port_id, identity.ont_id, record.number
        );
        self.mirror_to_verification();
    }

    /// Edit one registration field.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.registration.set(field, value);
    }

    /// Edit one verification field. Only identity fields apply.
    pub fn set_verification_field(
        &mut self,
        field: Field,
        value: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        self.verification.set(field, value)
    }

    /// Edit one status query field. Only `boardId` and `ontId` apply.
    pub fn set_status_field(
        &mut self,
        field: Field,
        value: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        self.status.set(field, value)
    }

    /// Edit the description used for ONT info lookups.
    pub fn set_info_description(&mut self, description: impl Into<String>) {
        self.info_description = description.into();
    }

    /// Record a successful registration: verification now targets what was
    /// just registered.
    pub fn registration_succeeded(&mut self) {
        self.mirror_to_verification();
    }

    /// Put every form back to its defaults and clear the selection.
    ///
    /// The discovered list is kept.
    pub fn reset_to_defaults(&mut self) {
        self.registration = RegistrationFieldSet::from_defaults(&self.defaults);
        self.verification = OntIdentity::from_defaults(&self.defaults);
        self.status = StatusQuery::from_defaults(&self.defaults);
        self.info_description = self.defaults.description.clone();
        self.selected = None;
    }

    /// Build a registration request from the current field set.
    pub fn registration_request(&self) -> Result<RegistrationFieldSet, WorkflowError> {
        self.registration.validate()?;
        Ok(self.registration.clone())
    }

    /// Build a verification request from the current verification form.
    pub fn verification_request(&self) -> Result<OntIdentity, WorkflowError> {
        self.verification.validate()?;
        Ok(self.verification.clone())
    }

    /// Build a status request from the current status form.
    pub fn status_request(&self) -> Result<StatusQuery, WorkflowError> {
        self.status.validate()?;
        Ok(self.status.clone())
    }

    fn mirror_to_verification(&mut self) {
        self.verification = self.registration.identity.clone();
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new(WorkflowDefaults::default())
    }
}
