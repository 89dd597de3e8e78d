use std::collections::{BTreeMap, BTreeSet};

use parking_lot::RwLock;
use shared_types::{Identity, MigrationStatus, NetworkParameters, ResolutionId, VotableEvent};

use crate::domain::{Resolution, Voter};
use crate::error::{VotingError, VotingResult};
use crate::ports::{ParameterStore, ResolutionStore, Savepoint, ValidatorStore};

#[derive(Clone, Debug)]
struct StoredResolution {
    event_type: String,
    body: Vec<u8>,
    proposer: Identity,
    expiry_height: i64,
    approvals: BTreeSet<Identity>,
}

#[derive(Clone, Debug, Default)]
struct Tables {
    validators: BTreeMap<Identity, i64>,
    resolutions: BTreeMap<ResolutionId, StoredResolution>,
    processed: BTreeSet<ResolutionId>,
    events: BTreeMap<ResolutionId, VotableEvent>,
    params: NetworkParameters,
}

impl Tables {
    fn read_resolution(&self, id: &ResolutionId, stored: &StoredResolution) -> Resolution {
        let voters: Vec<Voter> = stored
            .approvals
            .iter()
            .map(|identity| Voter {
                identity: *identity,
                power: self.validators.get(identity).copied().unwrap_or(0),
            })
            .collect();
        let approved_power = voters
            .iter()
            .fold(0i64, |acc, voter| acc.saturating_add(voter.power));

        Resolution {
            id: *id,
            event_type: stored.event_type.clone(),
            body: stored.body.clone(),
            proposer: stored.proposer,
            expiry_height: stored.expiry_height,
            voters,
            approved_power,
        }
    }

    fn select<F>(&self, mut filter: F) -> Vec<Resolution>
    where
        F: FnMut(&Resolution) -> bool,
    {
        self.resolutions
            .iter()
            .map(|(id, stored)| self.read_resolution(id, stored))
            .filter(|res| filter(res))
            .collect()
    }
}

#[derive(Default)]
struct Inner {
    tables: Tables,
    savepoints: Vec<Tables>,
}

/// In-memory vote store for testing and single-node execution.
///
/// Savepoints snapshot every table, so a rollback restores validators,
/// resolutions, processed IDs, buffered events and parameters together.
#[derive(Default)]
pub struct InMemoryVoteStore {
    inner: RwLock<Inner>,
}

impl InMemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: NetworkParameters) -> Self {
        let store = Self::new();
        store.inner.write().tables.params = params;
        store
    }

    /// Seed the validator set, e.g. from genesis.
    pub fn with_validators<I>(self, validators: I) -> VotingResult<Self>
    where
        I: IntoIterator<Item = (Identity, i64)>,
    {
        for (identity, power) in validators {
            self.set_validator_power(&identity, power)?;
        }
        Ok(self)
    }

    /// Number of open savepoints.
    pub fn savepoint_depth(&self) -> usize {
        self.inner.read().savepoints.len()
    }
}

impl Savepoint for InMemoryVoteStore {
    fn savepoint(&self) -> VotingResult<()> {
        let mut inner = self.inner.write();
        let snapshot = inner.tables.clone();
        inner.savepoints.push(snapshot);
        Ok(())
    }

    fn release_savepoint(&self) -> VotingResult<()> {
        self.inner
            .write()
            .savepoints
            .pop()
            .map(|_| ())
            .ok_or(VotingError::NoSavepoint)
    }

    fn rollback_savepoint(&self) -> VotingResult<()> {
        let mut inner = self.inner.write();
        let snapshot = inner.savepoints.pop().ok_or(VotingError::NoSavepoint)?;
        inner.tables = snapshot;
        Ok(())
    }
}

impl ValidatorStore for InMemoryVoteStore {
    fn validator_power(&self, identity: &Identity) -> VotingResult<i64> {
        Ok(self
            .inner
            .read()
            .tables
            .validators
            .get(identity)
            .copied()
            .unwrap_or(0))
    }

    fn set_validator_power(&self, identity: &Identity, power: i64) -> VotingResult<()> {
        if power < 0 {
            return Err(VotingError::NegativePower {
                validator: *identity,
                power,
            });
        }
        let mut inner = self.inner.write();
        if power == 0 {
            inner.tables.validators.remove(identity);
        } else {
            inner.tables.validators.insert(*identity, power);
        }
        Ok(())
    }

    fn validators(&self) -> VotingResult<Vec<Voter>> {
        Ok(self
            .inner
            .read()
            .tables
            .validators
            .iter()
            .map(|(identity, power)| Voter {
                identity: *identity,
                power: *power,
            })
            .collect())
    }

    fn total_power(&self) -> VotingResult<i64> {
        Ok(self
            .inner
            .read()
            .tables
            .validators
            .values()
            .fold(0i64, |acc, p| acc.saturating_add(*p)))
    }
}

impl ResolutionStore for InMemoryVoteStore {
    fn create_resolution(
        &self,
        event: &VotableEvent,
        expiry_height: i64,
        proposer: &Identity,
    ) -> VotingResult<ResolutionId> {
        let id = event.id();
        let mut inner = self.inner.write();
        if inner.tables.resolutions.contains_key(&id) {
            return Err(VotingError::ResolutionExists { id });
        }
        if inner.tables.processed.contains(&id) {
            return Err(VotingError::ResolutionProcessed { id });
        }
        inner.tables.resolutions.insert(
            id,
            StoredResolution {
                event_type: event.event_type.clone(),
                body: event.body.clone(),
                proposer: *proposer,
                expiry_height,
                approvals: BTreeSet::new(),
            },
        );
        Ok(id)
    }

    fn approve_resolution(&self, id: &ResolutionId, voter: &Identity) -> VotingResult<()> {
        let mut inner = self.inner.write();
        if !inner.tables.validators.contains_key(voter) {
            return Err(VotingError::VoterNotFound { voter: *voter });
        }
        let resolution = inner
            .tables
            .resolutions
            .get_mut(id)
            .ok_or(VotingError::ResolutionNotFound { id: *id })?;
        resolution.approvals.insert(*voter);
        Ok(())
    }

    fn resolution_exists(&self, id: &ResolutionId) -> VotingResult<bool> {
        Ok(self.inner.read().tables.resolutions.contains_key(id))
    }

    fn resolution_by_id(&self, id: &ResolutionId) -> VotingResult<Option<Resolution>> {
        let inner = self.inner.read();
        Ok(inner
            .tables
            .resolutions
            .get(id)
            .map(|stored| inner.tables.read_resolution(id, stored)))
    }

    fn resolutions_by_type(&self, event_type: &str) -> VotingResult<Vec<Resolution>> {
        Ok(self
            .inner
            .read()
            .tables
            .select(|res| res.event_type == event_type))
    }

    fn resolutions_by_type_and_proposer(
        &self,
        event_type: &str,
        proposer: &Identity,
    ) -> VotingResult<Vec<Resolution>> {
        Ok(self
            .inner
            .read()
            .tables
            .select(|res| res.event_type == event_type && res.proposer == *proposer))
    }

    fn resolutions_by_threshold(
        &self,
        event_type: &str,
        required_power: i64,
    ) -> VotingResult<Vec<Resolution>> {
        Ok(self
            .inner
            .read()
            .tables
            .select(|res| res.event_type == event_type && res.approved_power >= required_power))
    }

    fn expired_resolutions(&self, height: i64) -> VotingResult<Vec<Resolution>> {
        Ok(self
            .inner
            .read()
            .tables
            .select(|res| res.expiry_height <= height))
    }

    fn delete_resolutions(&self, ids: &[ResolutionId]) -> VotingResult<()> {
        let mut inner = self.inner.write();
        for id in ids {
            inner.tables.resolutions.remove(id);
        }
        Ok(())
    }

    fn mark_processed(&self, ids: &[ResolutionId]) -> VotingResult<()> {
        let mut inner = self.inner.write();
        inner.tables.processed.extend(ids.iter().copied());
        Ok(())
    }

    fn is_processed(&self, id: &ResolutionId) -> VotingResult<bool> {
        Ok(self.inner.read().tables.processed.contains(id))
    }

    fn filter_not_processed(&self, ids: &[ResolutionId]) -> VotingResult<Vec<ResolutionId>> {
        let inner = self.inner.read();
        Ok(ids
            .iter()
            .filter(|id| !inner.tables.processed.contains(*id))
            .copied()
            .collect())
    }

    fn store_event(&self, event: &VotableEvent) -> VotingResult<()> {
        self.inner
            .write()
            .tables
            .events
            .insert(event.id(), event.clone());
        Ok(())
    }

    fn delete_event(&self, id: &ResolutionId) -> VotingResult<()> {
        self.inner.write().tables.events.remove(id);
        Ok(())
    }

    fn local_events(&self) -> VotingResult<Vec<VotableEvent>> {
        Ok(self.inner.read().tables.events.values().cloned().collect())
    }
}

impl ParameterStore for InMemoryVoteStore {
    fn network_parameters(&self) -> VotingResult<NetworkParameters> {
        Ok(self.inner.read().tables.params.clone())
    }

    fn set_migration_status(&self, status: MigrationStatus) -> VotingResult<()> {
        self.inner.write().tables.params.migration_status = status;
        Ok(())
    }
}
