//! Shipping address page: the contact form, the debounced postal-code lookup
//! and the validated submit.

mod debounce;
mod schema;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::collaborators::{ContactSubmitter, LocalityLookup};
use crate::error::{FormError, SaveError, TransportError};
use crate::form::{
    BindMode, ClearTarget, FieldBinding, FieldChangeEvent, FieldValue, FormController, FormValues,
};
use crate::models::{ContactRecord, Locality};

pub use debounce::Debouncer;
pub use schema::{
    contact_form_options, contact_schema, email_pattern, CITY_FIELD, CODE_FIELD, COLONY_FIELD,
    EMAIL_FIELD, EMAIL_MESSAGE, LAST_NAME_FIELD, LOCALITY_FIELDS, NAME_FIELD, POLICY_FIELD,
    STATE_FIELD, STREET_FIELD, TELEPHONE_FIELD, TOWN_FIELD,
};

pub const LOOKUP_DEBOUNCE: Duration = Duration::from_millis(500);
pub const MIN_POSTAL_CODE: u32 = 11000;
pub const SUBMIT_ERROR_MESSAGE: &str = "Hubo un error al mandar la información!";

/// Which error markers are cleared once a locality lookup resolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LookupClearPolicy {
    /// Clear every marker in the form, whatever the lookup returned.
    #[default]
    AllFields,
    /// Clear only the postal code and the fields the lookup fills.
    LocalityFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressPageConfig {
    pub debounce: Duration,
    pub min_postal_code: u32,
    pub clear_policy: LookupClearPolicy,
    pub defaults: ContactRecord,
}

impl Default for AddressPageConfig {
    fn default() -> Self {
        Self {
            debounce: LOOKUP_DEBOUNCE,
            min_postal_code: MIN_POSTAL_CODE,
            clear_policy: LookupClearPolicy::default(),
            defaults: ContactRecord::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Validation failed; nothing was sent.
    Invalid { missing: Vec<String> },
    Submitted {
        record: ContactRecord,
        response: Value,
    },
}

struct PageState {
    form: FormController,
    colonies: Vec<String>,
    error: String,
    lookup_seq: u64,
    debouncer: Debouncer,
}

struct Shared {
    state: Mutex<PageState>,
    settled: watch::Sender<u64>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn settle(&self, seq: u64) {
        self.settled.send_modify(|settled| *settled = (*settled).max(seq));
    }
}

/// Headless shipping address page.
///
/// All page state sits behind one lock that is never held across an await.
pub struct AddressPage<L, S> {
    shared: Arc<Shared>,
    lookup: Arc<L>,
    submitter: S,
    runtime: Handle,
    min_postal_code: u32,
    clear_policy: LookupClearPolicy,
}

impl<L, S> AddressPage<L, S>
where
    L: LocalityLookup,
    S: ContactSubmitter,
{
    pub fn new(lookup: L, submitter: S) -> Result<Self, FormError> {
        Self::with_config(lookup, submitter, AddressPageConfig::default())
    }

    /// Fails with [`FormError::NoRuntime`] outside a tokio runtime; lookups
    /// are spawned on the runtime current at construction.
    pub fn with_config(
        lookup: L,
        submitter: S,
        config: AddressPageConfig,
    ) -> Result<Self, FormError> {
        let runtime = Handle::try_current().map_err(|_| FormError::NoRuntime)?;
        let form = FormController::new(contact_form_options(&config.defaults)?)?;
        let (settled, _) = watch::channel(0);
        let state = PageState {
            form,
            colonies: Vec::new(),
            error: String::new(),
            lookup_seq: 0,
            debouncer: Debouncer::new(config.debounce, runtime.clone()),
        };

        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                settled,
            }),
            lookup: Arc::new(lookup),
            submitter,
            runtime,
            min_postal_code: config.min_postal_code,
            clear_policy: config.clear_policy,
        })
    }

    pub fn binding(&self, field: &str, mode: BindMode) -> Result<FieldBinding, FormError> {
        self.shared.lock().form.bind(field, mode)
    }

    /// Apply a text/select change. Changing the postal code (re)schedules the
    /// locality lookup.
    pub fn change(&self, event: FieldChangeEvent) -> Result<(), FormError> {
        let mut state = self.shared.lock();
        let field = event.field_name.clone();
        let previous = state.form.value(&field).cloned();
        state.form.on_value_change(event)?;

        if field == CODE_FIELD && state.form.value(&field) != previous.as_ref() {
            self.schedule_lookup(&mut state);
        }
        Ok(())
    }

    pub fn toggle(&self, event: FieldChangeEvent) -> Result<(), FormError> {
        self.shared.lock().form.on_toggle_change(event)
    }

    /// Validate everything and submit the contact when valid.
    ///
    /// Transport failures set the page error to [`SUBMIT_ERROR_MESSAGE`] and
    /// are returned with the underlying error attached.
    pub async fn save(&self) -> Result<SaveOutcome, SaveError> {
        let record = {
            let mut state = self.shared.lock();
            state.error.clear();
            if !state.form.validate_all() {
                let missing = state.form.missing().to_vec();
                debug!(?missing, "address form is incomplete");
                return Ok(SaveOutcome::Invalid { missing });
            }
            state.form.to_record::<ContactRecord>()?
        };

        match self.submitter.submit_contact(&record).await {
            Ok(response) => {
                info!(email = %record.email, "contact submitted");
                Ok(SaveOutcome::Submitted { record, response })
            }
            Err(source) => {
                error!(error = %source, "contact submission failed");
                self.shared.lock().error = SUBMIT_ERROR_MESSAGE.to_string();
                Err(SaveError::Submit {
                    display: SUBMIT_ERROR_MESSAGE.to_string(),
                    source,
                })
            }
        }
    }

    /// Resolve once the most recently scheduled lookup has been applied,
    /// dropped as stale, or cancelled.
    pub async fn wait_for_lookup(&self) {
        let target = self.shared.lock().lookup_seq;
        let mut settled = self.shared.settled.subscribe();
        // The sender lives as long as `self`, so this cannot close early.
        let _ = settled.wait_for(|seq| *seq >= target).await;
    }

    pub fn values(&self) -> FormValues {
        self.shared.lock().form.values().clone()
    }

    pub fn value(&self, field: &str) -> Option<FieldValue> {
        self.shared.lock().form.value(field).cloned()
    }

    pub fn missing(&self) -> Vec<String> {
        self.shared.lock().form.missing().to_vec()
    }

    /// Message from the last live change of `field`, if it was ever edited.
    pub fn field_error(&self, field: &str) -> Option<String> {
        self.shared.lock().form.error(field).map(str::to_string)
    }

    /// Message the field's rule gives for its current value.
    pub fn validation_message(&self, field: &str) -> String {
        let state = self.shared.lock();
        let value = state.form.value(field).cloned().unwrap_or_default();
        state.form.validate_field(field, &value)
    }

    pub fn colonies(&self) -> Vec<String> {
        self.shared.lock().colonies.clone()
    }

    /// User-facing error from the last save, empty when there is none.
    pub fn error_message(&self) -> String {
        self.shared.lock().error.clone()
    }

    pub fn mark_invalid<I, T>(&self, fields: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.shared.lock().form.mark_invalid(fields);
    }

    fn schedule_lookup(&self, state: &mut PageState) {
        state.lookup_seq += 1;
        let seq = state.lookup_seq;
        let code = state
            .form
            .value(CODE_FIELD)
            .map(|value| value.text().trim().to_string())
            .unwrap_or_default();

        let eligible = FieldValue::from(code.as_str())
            .as_number()
            .is_some_and(|number| number >= f64::from(self.min_postal_code));
        if !eligible {
            state.debouncer.cancel();
            self.shared.settle(seq);
            debug!(%code, "postal code below lookup threshold");
            return;
        }

        debug!(%code, seq, "scheduling locality lookup");
        let shared = Arc::clone(&self.shared);
        let lookup = Arc::clone(&self.lookup);
        let runtime = self.runtime.clone();
        let policy = self.clear_policy;
        state.debouncer.schedule(async move {
            // The request runs as its own task so a later reschedule only
            // cancels the timer, never a request already on the wire.
            let request = runtime.spawn(run_lookup(Arc::clone(&shared), lookup, code, seq, policy));
            if let Err(err) = request.await {
                warn!(error = %err, seq, "locality lookup task failed");
                shared.settle(seq);
            }
        });
    }
}

impl<L, S> Drop for AddressPage<L, S> {
    fn drop(&mut self) {
        self.shared.lock().debouncer.cancel();
    }
}

async fn run_lookup<L: LocalityLookup>(
    shared: Arc<Shared>,
    lookup: Arc<L>,
    code: String,
    seq: u64,
    policy: LookupClearPolicy,
) {
    let result = lookup.fetch_localities(&code).await;
    apply_lookup(&shared, &code, seq, policy, result);
    shared.settle(seq);
}

fn apply_lookup(
    shared: &Shared,
    code: &str,
    seq: u64,
    policy: LookupClearPolicy,
    result: Result<Option<Locality>, TransportError>,
) {
    let mut state = shared.lock();
    if seq != state.lookup_seq {
        debug!(%code, seq, latest = state.lookup_seq, "dropping stale locality response");
        return;
    }

    let locality = match result {
        Ok(locality) => locality.filter(Locality::is_resolved),
        Err(err) => {
            warn!(%code, error = %err, "locality lookup failed");
            return;
        }
    };

    let filled = match &locality {
        Some(locality) => fill_locality(&mut state.form, locality),
        None => fill_locality(&mut state.form, &Locality::default()),
    };
    if let Err(err) = filled {
        error!(error = %err, "address form cannot hold locality fields");
        return;
    }
    state.colonies = locality.map(|locality| locality.colonies).unwrap_or_default();

    match policy {
        LookupClearPolicy::AllFields => state.form.clear_invalid(ClearTarget::All),
        LookupClearPolicy::LocalityFields => {
            for field in LOCALITY_FIELDS {
                state.form.clear_invalid(field);
            }
        }
    }
}

fn fill_locality(form: &mut FormController, locality: &Locality) -> Result<(), FormError> {
    form.set_field(CITY_FIELD, locality.city.as_str())?;
    form.set_field(TOWN_FIELD, locality.town.as_str())?;
    form.set_field(STATE_FIELD, locality.state.as_str())?;
    Ok(())
}
