#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Barrier;

use registry_application::RegistryServices;
use registry_core::academic::{
    AcademicDepartment, AcademicFaculty, AcademicSemester, EntityId, ManagementDepartment, Month,
    NewAcademicDepartment, NewAcademicFaculty, NewAcademicSemester, NewManagementDepartment,
    SemesterCode, SemesterTitle, SemesterYear,
};
use registry_core::account::{Account, AccountRepository, Role};
use registry_core::clock::Clock;
use registry_core::error::{RegistryError, Result};
use registry_core::identifier::ExternalId;
use registry_core::profile::{
    AdminDetails, FacultyDetails, Gender, NewProfile, PersonName, PersonalInfo, Profile,
    ProfileDetails, StudentDetails,
};
use registry_core::transaction::{StoreTransaction, TransactionalStore};
use registry_infrastructure::{InMemoryDocumentStore, Sha256CredentialHasher};

/// Clock that advances one second per reading.
pub struct StepClock {
    next: AtomicI64,
}

impl StepClock {
    pub fn new() -> Self {
        Self {
            // 2024-06-01T00:00:00Z
            next: AtomicI64::new(1_717_200_000),
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let secs = self.next.fetch_add(1, Ordering::SeqCst);
        DateTime::from_timestamp(secs, 0).unwrap()
    }
}

pub struct Catalog {
    pub semester: AcademicSemester,
    pub faculty: AcademicFaculty,
    pub department: AcademicDepartment,
    pub management: ManagementDepartment,
}

/// A store holding one entry of each catalog kind.
///
/// The semester is Summer 2024 (code `02`).
pub async fn seeded_store() -> (Arc<InMemoryDocumentStore>, Catalog) {
    let store = Arc::new(InMemoryDocumentStore::new());
    let catalog = seed_catalog(&store).await;
    (store, catalog)
}

pub async fn seed_catalog(store: &InMemoryDocumentStore) -> Catalog {
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
    let faculty = store
        .insert_academic_faculty(NewAcademicFaculty {
            title: "Faculty of Science".to_string(),
        })
        .await
        .unwrap();
    let department = store
        .insert_department(NewAcademicDepartment {
            title: "Computer Science".to_string(),
            academic_faculty: faculty.id.clone(),
        })
        .await
        .unwrap();
    let management = store
        .insert_management_department(NewManagementDepartment {
            title: "Registry Office".to_string(),
        })
        .await
        .unwrap();

    Catalog {
        semester,
        faculty,
        department,
        management,
    }
}

pub fn services(store: &Arc<InMemoryDocumentStore>) -> RegistryServices {
    RegistryServices::from_store(
        store.clone(),
        Arc::new(Sha256CredentialHasher::new(1)),
        Arc::new(StepClock::new()),
    )
}

pub fn personal(first_name: &str) -> PersonalInfo {
    PersonalInfo {
        name: PersonName {
            first_name: first_name.to_string(),
            middle_name: None,
            last_name: "Example".to_string(),
        },
        gender: Gender::Other,
        date_of_birth: None,
        email: format!("{}@example.edu", first_name.to_lowercase()),
        contact_no: "555-0100".to_string(),
        emergency_contact_no: None,
        blood_group: None,
        present_address: None,
        permanent_address: None,
    }
}

pub fn student(catalog: &Catalog, first_name: &str) -> ProfileDetails {
    ProfileDetails::Student(StudentDetails {
        personal: personal(first_name),
        academic_semester: catalog.semester.id.clone(),
        academic_department: catalog.department.id.clone(),
        academic_faculty: catalog.faculty.id.clone(),
    })
}

pub fn faculty_member(catalog: &Catalog, department: EntityId) -> ProfileDetails {
    ProfileDetails::Faculty(FacultyDetails {
        personal: personal("Lecturer"),
        designation: "Lecturer".to_string(),
        academic_department: department,
        academic_faculty: catalog.faculty.id.clone(),
    })
}

pub fn admin(catalog: &Catalog) -> ProfileDetails {
    ProfileDetails::Admin(AdminDetails {
        personal: personal("Admin"),
        designation: "Registrar".to_string(),
        management_department: catalog.management.id.clone(),
    })
}

/// How a [`ScriptedStore`] transaction misbehaves.
#[derive(Default)]
pub struct Script {
    /// `insert_profile` reports that nothing was written.
    pub drop_profile_insert: bool,
    /// `insert_account` reports that nothing was written.
    pub drop_account_insert: bool,
    /// The first `gated_inserts` profile inserts wait on this barrier.
    pub gate: Option<Arc<Barrier>>,
    pub gated_inserts: AtomicUsize,
}

/// Transactional store delegating to an [`InMemoryDocumentStore`] while
/// following a [`Script`].
pub struct ScriptedStore {
    inner: Arc<InMemoryDocumentStore>,
    script: Arc<Script>,
}

impl ScriptedStore {
    pub fn new(inner: Arc<InMemoryDocumentStore>, script: Script) -> Self {
        Self {
            inner,
            script: Arc::new(script),
        }
    }

    /// Two concurrent provisioning calls both allocate before either inserts.
    pub fn racing(inner: Arc<InMemoryDocumentStore>) -> Self {
        Self::new(
            inner,
            Script {
                gate: Some(Arc::new(Barrier::new(2))),
                gated_inserts: AtomicUsize::new(2),
                ..Default::default()
            },
        )
    }
}

#[async_trait]
impl TransactionalStore for ScriptedStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        Ok(Box::new(ScriptedTransaction {
            inner: self.inner.begin().await?,
            script: self.script.clone(),
        }))
    }
}

struct ScriptedTransaction {
    inner: Box<dyn StoreTransaction>,
    script: Arc<Script>,
}

#[async_trait]
impl StoreTransaction for ScriptedTransaction {
    async fn insert_profile(&mut self, profile: NewProfile) -> Result<Option<Profile>> {
        if let Some(gate) = &self.script.gate {
            let remaining = self
                .script
                .gated_inserts
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
            if remaining.is_ok() {
                gate.wait().await;
            }
        }
        if self.script.drop_profile_insert {
            return Ok(None);
        }
        self.inner.insert_profile(profile).await
    }

    async fn insert_account(&mut self, account: Account) -> Result<Option<Account>> {
        if self.script.drop_account_insert {
            return Ok(None);
        }
        self.inner.insert_account(account).await
    }

    async fn replace_profile(&mut self, profile: Profile) -> Result<Option<Profile>> {
        self.inner.replace_profile(profile).await
    }

    async fn replace_account(&mut self, account: Account) -> Result<Option<Account>> {
        self.inner.replace_account(account).await
    }

    async fn delete_profile(&mut self, external_id: &ExternalId) -> Result<Option<Profile>> {
        self.inner.delete_profile(external_id).await
    }

    async fn delete_account(&mut self, external_id: &ExternalId) -> Result<u64> {
        self.inner.delete_account(external_id).await
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.inner.commit().await
    }

    async fn abort(self: Box<Self>) -> Result<()> {
        self.inner.abort().await
    }
}

/// Account reads that serve allocation from the store but never return an
/// account by identifier.
pub struct BlindAccounts {
    pub inner: Arc<InMemoryDocumentStore>,
    /// Lookups fail instead of coming back empty.
    pub failing: bool,
}

#[async_trait]
impl AccountRepository for BlindAccounts {
    async fn find_by_external_id(&self, _external_id: &ExternalId) -> Result<Option<Account>> {
        if self.failing {
            return Err(RegistryError::data_access("replica unavailable"));
        }
        Ok(None)
    }

    async fn find_latest_by_role(&self, role: Role) -> Result<Option<Account>> {
        self.inner.find_latest_by_role(role).await
    }

    async fn count_by_role(&self, role: Role) -> Result<usize> {
        AccountRepository::count_by_role(self.inner.as_ref(), role).await
    }
}
