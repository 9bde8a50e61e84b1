//! In-memory document store with multi-document transactions.
//!
//! Holds the academic catalog and the profile and account collections behind
//! a single `tokio::sync::RwLock`. Transactions read from a private copy of
//! the committed state and buffer their writes; commit replays the buffer
//! onto a fresh copy of the latest committed state, re-checking every unique
//! index, and swaps it in only when every write applies. A failed commit
//! leaves the committed state untouched.
//!
//! When a snapshot path is configured, the committed state is written to it
//! through [`AtomicJsonFile`] before it becomes visible. Commits lock the
//! snapshot file and start from its current contents, so several processes
//! can share one snapshot without losing writes or duplicating identifiers.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use registry_core::academic::{
    AcademicDepartment, AcademicFaculty, AcademicRepository, AcademicSemester, EntityId,
    ManagementDepartment, NewAcademicDepartment, NewAcademicFaculty, NewAcademicSemester,
    NewManagementDepartment,
};
use registry_core::account::{Account, AccountRepository, Role};
use registry_core::error::{ReferenceKind, RegistryError, Result};
use registry_core::identifier::ExternalId;
use registry_core::profile::{NewProfile, Profile, ProfileId, ProfileRepository};
use registry_core::transaction::{StoreTransaction, TransactionalStore};

use crate::storage::{AtomicJsonFile, SnapshotError};

const PROFILES: &str = "profiles";
const ACCOUNTS: &str = "accounts";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAccount {
    account: Account,
    /// Commit order, used to break `created_at` ties.
    insert_seq: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreState {
    #[serde(default)]
    semesters: BTreeMap<EntityId, AcademicSemester>,
    #[serde(default)]
    academic_faculties: BTreeMap<EntityId, AcademicFaculty>,
    #[serde(default)]
    departments: BTreeMap<EntityId, AcademicDepartment>,
    #[serde(default)]
    management_departments: BTreeMap<EntityId, ManagementDepartment>,
    #[serde(default)]
    profiles: BTreeMap<ProfileId, Profile>,
    #[serde(default)]
    accounts: BTreeMap<ExternalId, StoredAccount>,
    #[serde(default)]
    next_insert_seq: u64,
}

/// A buffered transaction write.
#[derive(Debug, Clone)]
enum WriteOp {
    InsertProfile(Profile),
    InsertAccount(Account),
    ReplaceProfile(Profile),
    ReplaceAccount(Account),
    DeleteProfile(Profile),
    DeleteAccount(ExternalId),
}

impl StoreState {
    fn profile_by_external_id(&self, external_id: &ExternalId) -> Option<&Profile> {
        self.profiles
            .values()
            .find(|profile| &profile.external_id == external_id)
    }

    fn latest_account(&self, role: Role) -> Option<&Account> {
        self.accounts
            .values()
            .filter(|stored| stored.account.role == role)
            .max_by(|a, b| {
                a.account
                    .created_at
                    .cmp(&b.account.created_at)
                    .then(a.insert_seq.cmp(&b.insert_seq))
            })
            .map(|stored| &stored.account)
    }

    /// Applies one write, enforcing unique indexes and account/profile links.
    fn apply(&mut self, op: WriteOp) -> Result<()> {
        match op {
            WriteOp::InsertProfile(profile) => {
                if self.profiles.contains_key(&profile.id)
                    || self.profile_by_external_id(&profile.external_id).is_some()
                {
                    return Err(RegistryError::duplicate(
                        PROFILES,
                        profile.external_id.as_str(),
                    ));
                }
                self.profiles.insert(profile.id.clone(), profile);
            }
            WriteOp::InsertAccount(account) => {
                if self.accounts.contains_key(&account.external_id) {
                    return Err(RegistryError::duplicate(
                        ACCOUNTS,
                        account.external_id.as_str(),
                    ));
                }
                self.check_profile_link(&account)?;
                let insert_seq = self.next_insert_seq;
                self.next_insert_seq += 1;
                self.accounts.insert(
                    account.external_id.clone(),
                    StoredAccount {
                        account,
                        insert_seq,
                    },
                );
            }
            WriteOp::ReplaceProfile(profile) => {
                let Some(slot) = self.profiles.get_mut(&profile.id) else {
                    return Err(RegistryError::transaction(format!(
                        "profile '{}' was removed by a concurrent transaction",
                        profile.external_id
                    )));
                };
                *slot = profile;
            }
            WriteOp::ReplaceAccount(account) => {
                let Some(slot) = self.accounts.get_mut(&account.external_id) else {
                    return Err(RegistryError::transaction(format!(
                        "account '{}' was removed by a concurrent transaction",
                        account.external_id
                    )));
                };
                slot.account = account;
            }
            WriteOp::DeleteProfile(profile) => {
                if self.profiles.remove(&profile.id).is_none() {
                    return Err(RegistryError::deletion(
                        profile.role().as_str(),
                        profile.external_id.as_str(),
                    ));
                }
            }
            WriteOp::DeleteAccount(external_id) => {
                self.accounts.remove(&external_id);
            }
        }
        Ok(())
    }

    fn check_profile_link(&self, account: &Account) -> Result<()> {
        account.check_invariants()?;
        match self.profiles.get(account.profile_ref.id()) {
            Some(profile)
                if profile.external_id == account.external_id
                    && profile.role() == account.role =>
            {
                Ok(())
            }
            _ => Err(RegistryError::internal(format!(
                "account '{}' does not reference a matching {} profile",
                account.external_id, account.role
            ))),
        }
    }
}

struct Inner {
    state: RwLock<StoreState>,
    snapshot: Option<AtomicJsonFile<StoreState>>,
    next_tx_id: AtomicU64,
}

/// Transactional document store kept in memory, optionally snapshotted to disk.
///
/// Cloning is cheap and every clone shares the same state.
#[derive(Clone)]
pub struct InMemoryDocumentStore {
    inner: Arc<Inner>,
}

impl InMemoryDocumentStore {
    /// Creates an empty store that never touches disk.
    pub fn new() -> Self {
        Self::with_state(StoreState::default(), None)
    }

    /// Opens a store backed by the JSON snapshot at `path`.
    ///
    /// A missing or empty file yields an empty store; the file is created on
    /// the first commit.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let file = AtomicJsonFile::<StoreState>::new(path.into());
        let state = file.load()?.unwrap_or_default();
        tracing::info!(
            "[MemoryStore] Loaded snapshot {:?} ({} profiles, {} accounts)",
            file.path(),
            state.profiles.len(),
            state.accounts.len()
        );
        Ok(Self::with_state(state, Some(file)))
    }

    fn with_state(state: StoreState, snapshot: Option<AtomicJsonFile<StoreState>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(state),
                snapshot,
                next_tx_id: AtomicU64::new(1),
            }),
        }
    }

    /// Runs `f` against a copy of the committed state and publishes the copy
    /// if `f` succeeds and the snapshot (if any) is written.
    ///
    /// With a snapshot, the copy is taken from the file while its lock is
    /// held, so writes from other processes are re-checked by `f` and never
    /// overwritten. File IO runs on the blocking pool.
    async fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut StoreState) -> Result<()> + Send,
    {
        let mut guard = self.inner.state.write().await;
        let Some(snapshot) = self.inner.snapshot.clone() else {
            let mut next = guard.clone();
            f(&mut next)?;
            *guard = next;
            return Ok(());
        };

        let file = snapshot.clone();
        let (lock, on_disk) = blocking(move || {
            let lock = file.lock()?;
            let state = file.load()?;
            Ok((lock, state))
        })
        .await?;

        let base = match on_disk {
            Some(state) => state,
            None => guard.clone(),
        };
        let mut next = base.clone();
        if let Err(e) = f(&mut next) {
            *guard = base;
            return Err(e);
        }

        let next = blocking(move || {
            snapshot.save_locked(&lock, &next)?;
            Ok(next)
        })
        .await?;
        *guard = next;
        Ok(())
    }

    pub async fn insert_semester(&self, request: NewAcademicSemester) -> Result<AcademicSemester> {
        request.validate()?;
        let semester = request.into_semester(EntityId::generate());
        let stored = semester.clone();
        self.mutate(move |state| {
            state.semesters.insert(stored.id.clone(), stored);
            Ok(())
        })
        .await?;
        tracing::info!("[MemoryStore] Added semester {}", semester.id);
        Ok(semester)
    }

    pub async fn insert_academic_faculty(
        &self,
        request: NewAcademicFaculty,
    ) -> Result<AcademicFaculty> {
        request.validate()?;
        let faculty = request.into_faculty(EntityId::generate());
        let stored = faculty.clone();
        self.mutate(move |state| {
            state.academic_faculties.insert(stored.id.clone(), stored);
            Ok(())
        })
        .await?;
        tracing::info!("[MemoryStore] Added academic faculty {}", faculty.id);
        Ok(faculty)
    }

    /// Adds a department; its academic faculty must already exist.
    pub async fn insert_department(
        &self,
        request: NewAcademicDepartment,
    ) -> Result<AcademicDepartment> {
        request.validate()?;
        let department = request.into_department(EntityId::generate());
        let stored = department.clone();
        self.mutate(move |state| {
            if !state
                .academic_faculties
                .contains_key(&stored.academic_faculty)
            {
                return Err(RegistryError::invalid_reference(
                    ReferenceKind::AcademicFaculty,
                    stored.academic_faculty.as_str(),
                ));
            }
            state.departments.insert(stored.id.clone(), stored);
            Ok(())
        })
        .await?;
        tracing::info!("[MemoryStore] Added department {}", department.id);
        Ok(department)
    }

    pub async fn insert_management_department(
        &self,
        request: NewManagementDepartment,
    ) -> Result<ManagementDepartment> {
        request.validate()?;
        let department = request.into_management_department(EntityId::generate());
        let stored = department.clone();
        self.mutate(move |state| {
            state
                .management_departments
                .insert(stored.id.clone(), stored);
            Ok(())
        })
        .await?;
        tracing::info!("[MemoryStore] Added management department {}", department.id);
        Ok(department)
    }
}

async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, SnapshotError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| RegistryError::internal(format!("snapshot task failed: {}", e)))?
        .map_err(RegistryError::from)
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AcademicRepository for InMemoryDocumentStore {
    async fn find_semester(&self, id: &EntityId) -> Result<Option<AcademicSemester>> {
        Ok(self.inner.state.read().await.semesters.get(id).cloned())
    }

    async fn find_department(&self, id: &EntityId) -> Result<Option<AcademicDepartment>> {
        Ok(self.inner.state.read().await.departments.get(id).cloned())
    }

    async fn find_academic_faculty(&self, id: &EntityId) -> Result<Option<AcademicFaculty>> {
        Ok(self
            .inner
            .state
            .read()
            .await
            .academic_faculties
            .get(id)
            .cloned())
    }

    async fn find_management_department(
        &self,
        id: &EntityId,
    ) -> Result<Option<ManagementDepartment>> {
        Ok(self
            .inner
            .state
            .read()
            .await
            .management_departments
            .get(id)
            .cloned())
    }
}

#[async_trait]
impl AccountRepository for InMemoryDocumentStore {
    async fn find_by_external_id(&self, external_id: &ExternalId) -> Result<Option<Account>> {
        Ok(self
            .inner
            .state
            .read()
            .await
            .accounts
            .get(external_id)
            .map(|stored| stored.account.clone()))
    }

    async fn find_latest_by_role(&self, role: Role) -> Result<Option<Account>> {
        Ok(self.inner.state.read().await.latest_account(role).cloned())
    }

    async fn count_by_role(&self, role: Role) -> Result<usize> {
        let state = self.inner.state.read().await;
        Ok(state
            .accounts
            .values()
            .filter(|stored| stored.account.role == role)
            .count())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryDocumentStore {
    async fn find_by_external_id(&self, external_id: &ExternalId) -> Result<Option<Profile>> {
        Ok(self
            .inner
            .state
            .read()
            .await
            .profile_by_external_id(external_id)
            .cloned())
    }

    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>> {
        Ok(self.inner.state.read().await.profiles.get(id).cloned())
    }

    async fn count_by_role(&self, role: Role) -> Result<usize> {
        let state = self.inner.state.read().await;
        Ok(state
            .profiles
            .values()
            .filter(|profile| profile.role() == role)
            .count())
    }
}

#[async_trait]
impl TransactionalStore for InMemoryDocumentStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        let id = self.inner.next_tx_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("[MemoryStore] Transaction {} started", id);
        Ok(Box::new(MemoryTransaction {
            id,
            store: self.clone(),
            working: None,
            ops: Vec::new(),
            finished: false,
        }))
    }
}

/// Transaction over an [`InMemoryDocumentStore`].
///
/// The private working copy is taken on first use, so reads inside the
/// transaction see its own writes and nothing committed afterwards.
pub struct MemoryTransaction {
    id: u64,
    store: InMemoryDocumentStore,
    working: Option<StoreState>,
    ops: Vec<WriteOp>,
    finished: bool,
}

impl MemoryTransaction {
    async fn working(&mut self) -> &mut StoreState {
        let working = match self.working.take() {
            Some(working) => working,
            None => self.store.inner.state.read().await.clone(),
        };
        self.working.insert(working)
    }

    async fn stage(&mut self, op: WriteOp) -> Result<()> {
        self.working().await.apply(op.clone())?;
        self.ops.push(op);
        Ok(())
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn insert_profile(&mut self, profile: NewProfile) -> Result<Option<Profile>> {
        let profile = Profile {
            id: ProfileId::generate(),
            external_id: profile.external_id,
            details: profile.details,
            created_at: profile.created_at,
            updated_at: profile.created_at,
        };
        self.stage(WriteOp::InsertProfile(profile.clone())).await?;
        Ok(Some(profile))
    }

    async fn insert_account(&mut self, account: Account) -> Result<Option<Account>> {
        self.stage(WriteOp::InsertAccount(account.clone())).await?;
        Ok(Some(account))
    }

    async fn replace_profile(&mut self, profile: Profile) -> Result<Option<Profile>> {
        if !self.working().await.profiles.contains_key(&profile.id) {
            return Ok(None);
        }
        self.stage(WriteOp::ReplaceProfile(profile.clone())).await?;
        Ok(Some(profile))
    }

    async fn replace_account(&mut self, account: Account) -> Result<Option<Account>> {
        if !self
            .working()
            .await
            .accounts
            .contains_key(&account.external_id)
        {
            return Ok(None);
        }
        self.stage(WriteOp::ReplaceAccount(account.clone())).await?;
        Ok(Some(account))
    }

    async fn delete_profile(&mut self, external_id: &ExternalId) -> Result<Option<Profile>> {
        let Some(profile) = self
            .working()
            .await
            .profile_by_external_id(external_id)
            .cloned()
        else {
            return Ok(None);
        };
        self.stage(WriteOp::DeleteProfile(profile.clone())).await?;
        Ok(Some(profile))
    }

    async fn delete_account(&mut self, external_id: &ExternalId) -> Result<u64> {
        if !self.working().await.accounts.contains_key(external_id) {
            return Ok(0);
        }
        self.stage(WriteOp::DeleteAccount(external_id.clone()))
            .await?;
        Ok(1)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let mut this = *self;
        this.finished = true;
        let ops = std::mem::take(&mut this.ops);
        let count = ops.len();
        if count == 0 {
            tracing::debug!("[MemoryStore] Transaction {} committed (no writes)", this.id);
            return Ok(());
        }

        let result = this
            .store
            .mutate(move |state| {
                for op in ops {
                    state.apply(op)?;
                }
                Ok(())
            })
            .await;

        match &result {
            Ok(()) => tracing::debug!(
                "[MemoryStore] Transaction {} committed {} writes",
                this.id,
                count
            ),
            Err(e) => tracing::warn!("[MemoryStore] Transaction {} failed to commit: {}", this.id, e),
        }
        result
    }

    async fn abort(self: Box<Self>) -> Result<()> {
        let mut this = *self;
        this.finished = true;
        tracing::debug!(
            "[MemoryStore] Transaction {} aborted, discarding {} writes",
            this.id,
            this.ops.len()
        );
        Ok(())
    }
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(
                "[MemoryStore] Transaction {} dropped without commit or abort, discarding {} writes",
                self.id,
                self.ops.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use registry_core::academic::{Month, SemesterCode, SemesterTitle, SemesterYear};
    use registry_core::account::ProfileRef;
    use registry_core::credential::CredentialHash;
    use registry_core::profile::{
        AdminDetails, Gender, PersonName, PersonalInfo, ProfileDetails,
    };
    use tempfile::TempDir;

    fn personal(first: &str) -> PersonalInfo {
        PersonalInfo {
            name: PersonName {
                first_name: first.to_string(),
                middle_name: None,
                last_name: "Tester".to_string(),
            },
            gender: Gender::Other,
            date_of_birth: None,
            email: format!("{}@example.edu", first.to_lowercase()),
            contact_no: "000".to_string(),
            emergency_contact_no: None,
            blood_group: None,
            present_address: None,
            permanent_address: None,
        }
    }

    fn admin_profile(external_id: &str) -> NewProfile {
        NewProfile {
            external_id: ExternalId::from(external_id),
            details: ProfileDetails::Admin(AdminDetails {
                personal: personal("Ada"),
                designation: "Registrar".to_string(),
                management_department: EntityId::new("mgmt-1"),
            }),
            created_at: Utc::now(),
        }
    }

    fn admin_account(profile: &Profile) -> Account {
        Account {
            external_id: profile.external_id.clone(),
            role: Role::Admin,
            credential_hash: CredentialHash::new("hash"),
            requires_credential_reset: true,
            credential_changed_at: None,
            profile_ref: ProfileRef::new(Role::Admin, profile.id.clone()),
            created_at: profile.created_at,
            updated_at: profile.created_at,
        }
    }

    async fn provision_admin(store: &InMemoryDocumentStore, external_id: &str) -> Profile {
        let mut tx = store.begin().await.unwrap();
        let profile = tx
            .insert_profile(admin_profile(external_id))
            .await
            .unwrap()
            .unwrap();
        tx.insert_account(admin_account(&profile)).await.unwrap();
        tx.commit().await.unwrap();
        profile
    }

    #[tokio::test]
    async fn test_commit_publishes_both_documents() {
        let store = InMemoryDocumentStore::new();
        let profile = provision_admin(&store, "A-00001").await;

        let id = ExternalId::from("A-00001");
        let account = AccountRepository::find_by_external_id(&store, &id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.profile_ref.id(), &profile.id);
        assert!(
            ProfileRepository::find_by_external_id(&store, &id)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_invisible() {
        let store = InMemoryDocumentStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.insert_profile(admin_profile("A-00001")).await.unwrap();

        assert_eq!(ProfileRepository::count_by_role(&store, Role::Admin).await.unwrap(), 0);

        tx.abort().await.unwrap();
        assert_eq!(ProfileRepository::count_by_role(&store, Role::Admin).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_dropped_transaction_discards_writes() {
        let store = InMemoryDocumentStore::new();
        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_profile(admin_profile("A-00001")).await.unwrap();
        }
        assert_eq!(ProfileRepository::count_by_role(&store, Role::Admin).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_rejected_at_insert() {
        let store = InMemoryDocumentStore::new();
        provision_admin(&store, "A-00001").await;

        let mut tx = store.begin().await.unwrap();
        let err = tx
            .insert_profile(admin_profile("A-00001"))
            .await
            .unwrap_err();
        assert!(err.is_duplicate_identifier());
        tx.abort().await.unwrap();
    }

    #[tokio::test]
    async fn test_racing_transactions_conflict_at_commit() {
        let store = InMemoryDocumentStore::new();

        let mut first = store.begin().await.unwrap();
        let mut second = store.begin().await.unwrap();

        let p1 = first
            .insert_profile(admin_profile("A-00001"))
            .await
            .unwrap()
            .unwrap();
        let p2 = second
            .insert_profile(admin_profile("A-00001"))
            .await
            .unwrap()
            .unwrap();
        first.insert_account(admin_account(&p1)).await.unwrap();
        second.insert_account(admin_account(&p2)).await.unwrap();

        first.commit().await.unwrap();
        let err = second.commit().await.unwrap_err();
        assert!(err.is_duplicate_identifier());

        assert_eq!(ProfileRepository::count_by_role(&store, Role::Admin).await.unwrap(), 1);
        assert_eq!(AccountRepository::count_by_role(&store, Role::Admin).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_account_must_reference_its_profile() {
        let store = InMemoryDocumentStore::new();
        let mut tx = store.begin().await.unwrap();
        let profile = tx
            .insert_profile(admin_profile("A-00001"))
            .await
            .unwrap()
            .unwrap();
        let mut account = admin_account(&profile);
        account.profile_ref = ProfileRef::Admin(ProfileId::new("elsewhere"));
        assert!(tx.insert_account(account).await.is_err());
        tx.abort().await.unwrap();
    }

    #[tokio::test]
    async fn test_latest_by_role_breaks_ties_by_insertion() {
        let store = InMemoryDocumentStore::new();
        let now = Utc::now();

        let mut tx = store.begin().await.unwrap();
        for external_id in ["A-00002", "A-00001"] {
            let mut request = admin_profile(external_id);
            request.created_at = now;
            let profile = tx.insert_profile(request).await.unwrap().unwrap();
            tx.insert_account(admin_account(&profile)).await.unwrap();
        }
        tx.commit().await.unwrap();

        let latest = store.find_latest_by_role(Role::Admin).await.unwrap().unwrap();
        assert_eq!(latest.external_id.as_str(), "A-00001");
        assert!(store.find_latest_by_role(Role::Student).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_inside_transaction() {
        let store = InMemoryDocumentStore::new();
        provision_admin(&store, "A-00001").await;
        let id = ExternalId::from("A-00001");

        let mut tx = store.begin().await.unwrap();
        assert!(tx.delete_profile(&id).await.unwrap().is_some());
        assert_eq!(tx.delete_account(&id).await.unwrap(), 1);
        assert_eq!(tx.delete_account(&id).await.unwrap(), 0);
        tx.commit().await.unwrap();

        assert!(AccountRepository::find_by_external_id(&store, &id).await.unwrap().is_none());
        assert!(ProfileRepository::find_by_external_id(&store, &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_delete_of_same_profile_conflicts() {
        let store = InMemoryDocumentStore::new();
        provision_admin(&store, "A-00001").await;
        let id = ExternalId::from("A-00001");

        let mut first = store.begin().await.unwrap();
        let mut second = store.begin().await.unwrap();
        first.delete_profile(&id).await.unwrap();
        second.delete_profile(&id).await.unwrap();

        first.commit().await.unwrap();
        let err = second.commit().await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_department_requires_existing_faculty() {
        let store = InMemoryDocumentStore::new();
        let err = store
            .insert_department(NewAcademicDepartment {
                title: "Physics".to_string(),
                academic_faculty: EntityId::new("missing"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidReference { .. }));

        let faculty = store
            .insert_academic_faculty(NewAcademicFaculty {
                title: "Science".to_string(),
            })
            .await
            .unwrap();
        let department = store
            .insert_department(NewAcademicDepartment {
                title: "Physics".to_string(),
                academic_faculty: faculty.id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(
            store.find_department(&department.id).await.unwrap(),
            Some(department)
        );
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("registry.json");

        let semester_id = {
            let store = InMemoryDocumentStore::open(&path).unwrap();
            let semester = store
                .insert_semester(NewAcademicSemester {
                    title: SemesterTitle::Summer,
                    year: SemesterYear::parse("2024").unwrap(),
                    code: SemesterCode::Second,
                    start_month: Month::May,
                    end_month: Month::August,
                })
                .await
                .unwrap();
            provision_admin(&store, "A-00001").await;
            semester.id
        };

        let reopened = InMemoryDocumentStore::open(&path).unwrap();
        assert!(reopened.find_semester(&semester_id).await.unwrap().is_some());
        let latest = reopened.find_latest_by_role(Role::Admin).await.unwrap().unwrap();
        assert_eq!(latest.external_id.as_str(), "A-00001");
    }

    #[tokio::test]
    async fn test_stores_sharing_a_snapshot_do_not_overwrite_each_other() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("registry.json");

        let first = InMemoryDocumentStore::open(&path).unwrap();
        let second = InMemoryDocumentStore::open(&path).unwrap();

        provision_admin(&first, "A-00001").await;

        let mut tx = second.begin().await.unwrap();
        let profile = tx
            .insert_profile(admin_profile("A-00001"))
            .await
            .unwrap()
            .unwrap();
        tx.insert_account(admin_account(&profile)).await.unwrap();
        let err = tx.commit().await.unwrap_err();
        assert!(err.is_duplicate_identifier());

        // The failed commit left the second store on the file's contents.
        assert_eq!(AccountRepository::count_by_role(&second, Role::Admin).await.unwrap(), 1);

        provision_admin(&second, "A-00002").await;

        let reopened = InMemoryDocumentStore::open(&path).unwrap();
        assert_eq!(AccountRepository::count_by_role(&reopened, Role::Admin).await.unwrap(), 2);
        assert_eq!(ProfileRepository::count_by_role(&reopened, Role::Admin).await.unwrap(), 2);
    }
}
