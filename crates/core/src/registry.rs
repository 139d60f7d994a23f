//! Registry service: the registration, admission and listing flows.
//!
//! Every operation reads the whole collection from the [`ResidentStore`], works on that copy
//! and, when it changes something, writes the whole collection back. A save only happens when
//! the submitted form has no validation errors; otherwise the store is not touched.

use crate::clock::{Clock, SystemClock};
use crate::config::CoreConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::listing::{self, ListingQuery};
use crate::resident::{age_on, AdmissionForm, Resident, ResidentForm};
use crate::store::ResidentStore;
use crate::validation::{parse_admission, parse_resident, ValidationErrors};
use sata_id::{ResidentId, ResidentIdGenerator};
use std::sync::Arc;

/// Resident registry operations over an injected store and clock.
pub struct RegistryService<S, C = SystemClock> {
    cfg: Arc<CoreConfig>,
    store: S,
    clock: C,
    ids: ResidentIdGenerator,
}

impl<S: ResidentStore> RegistryService<S> {
    /// Creates a service using the system clock.
    pub fn new(cfg: Arc<CoreConfig>, store: S) -> Self {
        Self::with_clock(cfg, store, SystemClock)
    }
}

impl<S: ResidentStore, C: Clock> RegistryService<S, C> {
    pub fn with_clock(cfg: Arc<CoreConfig>, store: S, clock: C) -> Self {
        Self {
            cfg,
            store,
            clock,
            ids: ResidentIdGenerator::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads every resident, in stored order.
    pub fn load(&mut self) -> RegistryResult<Vec<Resident>> {
        Ok(self.store.read_all()?)
    }

    /// Looks up one resident.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no resident has `id`.
    pub fn get(&mut self, id: ResidentId) -> RegistryResult<Resident> {
        self.load()?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(RegistryError::NotFound(id))
    }

    /// A personal-details form pre-filled for editing `id`.
    pub fn form_for(&mut self, id: ResidentId) -> RegistryResult<ResidentForm> {
        Ok(ResidentForm::from_resident(&self.get(id)?))
    }

    /// An admission form pre-filled from the current admission of `id`.
    pub fn admission_form_for(&mut self, id: ResidentId) -> RegistryResult<AdmissionForm> {
        Ok(AdmissionForm::from_resident(&self.get(id)?))
    }

    /// Filters and sorts the stored residents.
    pub fn list(&mut self, query: &ListingQuery) -> RegistryResult<Vec<Resident>> {
        let residents = self.load()?;
        Ok(listing::apply(&residents, query)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Registers a new resident from `form`.
    ///
    /// The new resident gets a fresh time-based identifier, an age computed from the birth
    /// date, and no admission.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Validation`] with every failing field if the form is invalid,
    /// or a store error if reading or writing the collection fails.
    pub fn create(&mut self, form: &ResidentForm) -> RegistryResult<Resident> {
        let today = self.clock.today();
        let (personal, address) = parse_resident(form, today).map_err(rejected)?;

        let mut residents = self.store.read_all()?;
        for existing in &residents {
            self.ids.observe(existing.id);
        }
        let id = self.ids.next_at(self.clock.now());

        let resident = Resident {
            id,
            age: age_on(personal.birth_date, today),
            personal,
            address,
            admission: None,
        };
        residents.push(resident.clone());
        self.store.write_all(&residents)?;

        tracing::info!("registered resident {}", resident.id);
        Ok(resident)
    }

    /// Replaces the personal and address details of `id`, recomputing the age.
    ///
    /// The identifier and any existing admission are kept.
    pub fn update(&mut self, id: ResidentId, form: &ResidentForm) -> RegistryResult<Resident> {
        let today = self.clock.today();
        let (personal, address) = parse_resident(form, today).map_err(rejected)?;

        let mut residents = self.store.read_all()?;
        let slot = residents
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RegistryError::NotFound(id))?;

        slot.age = age_on(personal.birth_date, today);
        slot.personal = personal;
        slot.address = address;
        let updated = slot.clone();

        self.store.write_all(&residents)?;

        tracing::info!("updated resident {}", id);
        Ok(updated)
    }

    /// Records the admission of `id`, marking the resident as admitted.
    ///
    /// Which admission fields are mandatory follows the configured
    /// [`AdmissionRules`](crate::AdmissionRules).
    pub fn admit(&mut self, id: ResidentId, form: &AdmissionForm) -> RegistryResult<Resident> {
        let admission = parse_admission(form, self.clock.today(), self.cfg.admission_rules())
            .map_err(rejected)?;

        let mut residents = self.store.read_all()?;
        let slot = residents
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RegistryError::NotFound(id))?;

        slot.admission = Some(admission);
        let updated = slot.clone();

        self.store.write_all(&residents)?;

        tracing::info!("recorded admission for resident {}", id);
        Ok(updated)
    }

    /// Removes `id` from the registry and returns the removed record.
    pub fn delete(&mut self, id: ResidentId) -> RegistryResult<Resident> {
        let mut residents = self.store.read_all()?;
        let index = residents
            .iter()
            .position(|r| r.id == id)
            .ok_or(RegistryError::NotFound(id))?;

        let removed = residents.remove(index);
        self.store.write_all(&residents)?;

        tracing::info!("deleted resident {}", id);
        Ok(removed)
    }
}

fn rejected(errors: ValidationErrors) -> RegistryError {
    tracing::warn!("save blocked by {} validation error(s)", errors.len());
    RegistryError::Validation(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::listing::SortOrder;
    use crate::resident::Field;
    use crate::store::{JsonFileStore, MemoryStore};
    use crate::validation::AdmissionRules;
    use crate::StoreError;
    use chrono::NaiveDate;
    use sata_types::AdmissionStatus;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_cfg(rules: AdmissionRules) -> Arc<CoreConfig> {
        Arc::new(
            CoreConfig::new(PathBuf::from("unused"), "idosos".into(), rules)
                .expect("CoreConfig::new should succeed"),
        )
    }

    fn service_on(today: NaiveDate) -> RegistryService<MemoryStore, FixedClock> {
        RegistryService::with_clock(
            test_cfg(AdmissionRules::default()),
            MemoryStore::new(),
            FixedClock::on(today),
        )
    }

    fn form(name: &str, birth_date: &str) -> ResidentForm {
        let mut form = ResidentForm::new();
        let entries = [
            (Field::Name, name),
            (Field::BirthDate, birth_date),
            (Field::Gender, "Feminino"),
            (Field::NationalId, "12345678"),
            (Field::TaxId, "52998224725"),
            (Field::HealthCard, "898001234567890"),
            (Field::Phone, "11987654321"),
            (Field::Street, "Rua das Flores"),
            (Field::Number, "120"),
            (Field::City, "São Paulo"),
            (Field::State, "SP"),
            (Field::PostalCode, "01310100"),
        ];
        for (field, value) in entries {
            form.set(field, value).expect("personal field");
        }
        form
    }

    fn admission_form(ward: &str) -> AdmissionForm {
        AdmissionForm {
            entry_date: "2025-05-20".into(),
            ward: ward.into(),
            bed: "B".into(),
            notes: "Needs assistance at night".into(),
        }
    }

    #[test]
    fn create_assigns_id_age_and_masks() {
        let mut service = service_on(date(2025, 6, 1));
        let resident = service
            .create(&form("Maria da Silva", "1945-06-15"))
            .expect("create should succeed");

        assert_eq!(resident.age, 79);
        assert_eq!(resident.status(), AdmissionStatus::NotAdmitted);
        assert_eq!(resident.personal.tax_id, "529.982.247-25");
        assert_eq!(resident.personal.phone, "(11) 98765-4321");
        assert_eq!(resident.address.postal_code, "01310-100");

        let stored = service.load().expect("load");
        assert_eq!(stored, vec![resident]);
    }

    #[test]
    fn create_masks_identifiers_filled_in_directly() {
        let mut service = service_on(date(2025, 6, 1));
        let mut raw = form("Maria da Silva", "1945-06-15");
        raw.tax_id = "52998224725".into();
        raw.phone = "11987654321".into();
        raw.postal_code = "01310100".into();

        let resident = service.create(&raw).expect("create should succeed");
        assert_eq!(resident.personal.tax_id, "529.982.247-25");
        assert_eq!(resident.personal.phone, "(11) 98765-4321");
        assert_eq!(resident.address.postal_code, "01310-100");

        let found = service
            .list(&ListingQuery::new().with_search("529.982"))
            .unwrap();
        assert_eq!(found, vec![resident]);
    }

    #[test]
    fn create_allocates_strictly_increasing_ids() {
        let mut service = service_on(date(2025, 6, 1));
        let first = service.create(&form("Maria da Silva", "1945-06-15")).unwrap();
        let second = service.create(&form("João Pereira", "1938-11-02")).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn invalid_form_is_rejected_without_touching_the_store() {
        let mut service = service_on(date(2025, 6, 1));
        service.create(&form("Maria da Silva", "1945-06-15")).unwrap();
        let before = service.store().raw().map(str::to_owned);

        let mut bad = form("Ana", "1945-06-15");
        bad.tax_id = "111.111.111-11".into();
        let err = service.create(&bad).expect_err("should be rejected");
        match err {
            RegistryError::Validation(errors) => {
                assert!(errors.contains(Field::Name));
                assert!(errors.contains(Field::TaxId));
                assert_eq!(errors.len(), 2);
            }
            other => panic!("expected Validation error, got {other:?}"),
        }

        assert_eq!(service.store().raw().map(str::to_owned), before);
    }

    #[test]
    fn update_recomputes_age_and_keeps_admission() {
        let mut service = service_on(date(2025, 6, 1));
        let created = service.create(&form("Maria da Silva", "1945-06-15")).unwrap();
        assert_eq!(created.age, 79);
        service.admit(created.id, &admission_form("12")).unwrap();

        let mut edit = service.form_for(created.id).expect("form_for");
        edit.set(Field::BirthDate, "1945-05-30").unwrap();
        let updated = service.update(created.id, &edit).expect("update");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.age, 80);
        assert_eq!(updated.status(), AdmissionStatus::Admitted);
        assert_eq!(service.get(created.id).unwrap(), updated);
    }

    #[test]
    fn update_of_unknown_id_is_not_found() {
        let mut service = service_on(date(2025, 6, 1));
        let missing = ResidentId::new(42).unwrap();
        let err = service
            .update(missing, &form("Maria da Silva", "1945-06-15"))
            .expect_err("unknown id");
        assert!(matches!(err, RegistryError::NotFound(id) if id == missing));
    }

    #[test]
    fn admit_sets_admission_and_status() {
        let mut service = service_on(date(2025, 6, 1));
        let created = service.create(&form("Maria da Silva", "1945-06-15")).unwrap();

        let admitted = service.admit(created.id, &admission_form("Ala Norte")).unwrap();
        assert_eq!(admitted.status(), AdmissionStatus::Admitted);
        let admission = admitted.admission.as_ref().expect("admission");
        assert_eq!(admission.ward, "Ala Norte");
        assert_eq!(admission.entry_date, Some(date(2025, 5, 20)));
        assert_eq!(admitted.personal, created.personal);

        let reloaded = service.admission_form_for(created.id).unwrap();
        assert_eq!(reloaded, admission_form("Ala Norte"));
    }

    #[test]
    fn admit_follows_configured_rules() {
        let mut service = RegistryService::with_clock(
            test_cfg(AdmissionRules::strict()),
            MemoryStore::new(),
            FixedClock::on(date(2025, 6, 1)),
        );
        let created = service.create(&form("Maria da Silva", "1945-06-15")).unwrap();

        let err = service
            .admit(created.id, &AdmissionForm::new())
            .expect_err("strict rules require fields");
        match err {
            RegistryError::Validation(errors) => {
                assert!(errors.contains(Field::EntryDate));
                assert!(errors.contains(Field::Ward));
                assert!(errors.contains(Field::Bed));
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
        assert!(service.get(created.id).unwrap().admission.is_none());
    }

    #[test]
    fn delete_removes_exactly_one_record() {
        let mut service = service_on(date(2025, 6, 1));
        let a = service.create(&form("Ana Souza", "1940-01-01")).unwrap();
        let b = service.create(&form("Beatriz Lima", "1941-02-02")).unwrap();
        let c = service.create(&form("Carlos Dias", "1942-03-03")).unwrap();

        let removed = service.delete(b.id).expect("delete");
        assert_eq!(removed, b);
        assert_eq!(service.load().unwrap(), vec![a, c]);

        assert!(matches!(
            service.delete(b.id),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn list_applies_query() {
        let mut service = service_on(date(2025, 6, 1));
        let beatriz = service.create(&form("Beatriz Lima", "1941-02-02")).unwrap();
        service.create(&form("Ana Souza", "1940-01-01")).unwrap();
        service.create(&form("Carlos Dias", "1942-03-03")).unwrap();
        service.admit(beatriz.id, &admission_form("7")).unwrap();

        let all = service.list(&ListingQuery::new()).unwrap();
        let names: Vec<_> = all.iter().map(|r| r.personal.name.to_string()).collect();
        assert_eq!(names, ["Ana Souza", "Beatriz Lima", "Carlos Dias"]);

        let admitted = service
            .list(&ListingQuery::new().with_status(AdmissionStatus::Admitted))
            .unwrap();
        assert_eq!(admitted.len(), 1);
        assert_eq!(admitted[0].id, beatriz.id);

        let oldest_first = service
            .list(&ListingQuery::new().with_sort(SortOrder::AgeDesc))
            .unwrap();
        assert_eq!(oldest_first[0].personal.name.as_str(), "Ana Souza");
    }

    #[test]
    fn corrupt_store_surfaces_parse_error() {
        let mut service = RegistryService::with_clock(
            test_cfg(AdmissionRules::default()),
            MemoryStore::with_raw("{ broken"),
            FixedClock::on(date(2025, 6, 1)),
        );
        let err = service.list(&ListingQuery::new()).expect_err("corrupt data");
        assert!(matches!(err, RegistryError::Store(StoreError::Parse(_))));

        let err = service
            .create(&form("Maria da Silva", "1945-06-15"))
            .expect_err("cannot append to corrupt data");
        assert!(matches!(err, RegistryError::Store(StoreError::Parse(_))));
        assert_eq!(service.store().raw(), Some("{ broken"));
    }

    #[test]
    fn file_store_persists_between_services() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = Arc::new(
            CoreConfig::new(
                temp_dir.path().to_path_buf(),
                "idosos".into(),
                AdmissionRules::default(),
            )
            .unwrap(),
        );
        let clock = FixedClock::on(date(2025, 6, 1));

        let mut first = RegistryService::with_clock(cfg.clone(), JsonFileStore::new(&cfg), clock);
        let created = first.create(&form("Maria da Silva", "1945-06-15")).unwrap();

        let mut second = RegistryService::with_clock(cfg.clone(), JsonFileStore::new(&cfg), clock);
        assert_eq!(second.get(created.id).unwrap(), created);
    }
}
