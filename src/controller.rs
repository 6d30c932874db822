//! Local phonebook state kept in sync with the remote contact collection.
//!
//! [`State`] holds everything visible and only changes through its transition methods, which never perform I/O.
//! [`Controller`] drives those transitions from user intents and the outcomes of remote calls.
//! The state lock is never held across an await point, so concurrent responses are applied in the order they arrive.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tokio::{
    task::{spawn, JoinHandle},
    time::{sleep, Duration},
};

use crate::{
    client::{Remote, TransportError},
    contact::{Contact, ContactId, Draft},
    notification::Notification,
};

pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(3);

/// Input rejected before reaching the remote store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in both name and number")]
    MissingField,
    #[error("{0} is already added to phonebook")]
    DuplicateName(String),
}

#[derive(Debug, Default)]
pub struct State {
    contacts: Vec<Contact>,
    name_draft: String,
    number_draft: String,
    filter: String,
    notification: Option<Notification>,
    generation: u64,
}

impl State {
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Contacts whose name contains the filter text ignoring case, in insertion order.
    pub fn persons_to_show(&self) -> impl Iterator<Item = &Contact> {
        let filter = self.filter.to_lowercase();

        self.contacts
            .iter()
            .filter(move |contact| contact.name.to_lowercase().contains(&filter))
    }

    fn loaded(&mut self, contacts: Vec<Contact>) {
        self.contacts = contacts;
    }

    fn validate(&self) -> Result<Draft, ValidationError> {
        if self.name_draft.is_empty() || self.number_draft.is_empty() {
            return Err(ValidationError::MissingField);
        }

        if self
            .contacts
            .iter()
            .any(|contact| contact.name == self.name_draft)
        {
            return Err(ValidationError::DuplicateName(self.name_draft.clone()));
        }

        Ok(Draft {
            name: self.name_draft.clone(),
            number: self.number_draft.clone(),
        })
    }

    fn created(&mut self, contact: Contact) -> Notification {
        let notification = Notification::success(format!("Added {}", contact.name));

        match self
            .contacts
            .iter_mut()
            .find(|existing| existing.id == contact.id)
        {
            Some(existing) => *existing = contact,
            None => self.contacts.push(contact),
        }

        self.name_draft.clear();
        self.number_draft.clear();

        notification
    }

    fn removed(
        &mut self,
        id: &ContactId,
        name: &str,
        res: Result<(), TransportError>,
    ) -> Notification {
        self.contacts.retain(|contact| contact.id != *id);

        match res {
            Ok(()) => Notification::success(format!("Deleted {}", name)),
            Err(_) => {
                Notification::error(format!("Information of {} has already been removed", name))
            }
        }
    }

    fn notify(&mut self, notification: Notification) -> u64 {
        self.notification = Some(notification);
        self.generation += 1;

        self.generation
    }

    fn clear_notification(&mut self, generation: u64) {
        if self.generation == generation {
            self.notification = None;
        }
    }

    fn view(&self) -> View {
        View {
            persons: self.persons_to_show().cloned().collect(),
            name_draft: self.name_draft.clone(),
            number_draft: self.number_draft.clone(),
            filter: self.filter.clone(),
            notification: self.notification.clone(),
        }
    }
}

/// Snapshot of everything the page shows.
#[derive(Debug, Clone, Serialize)]
pub struct View {
    pub persons: Vec<Contact>,
    pub name_draft: String,
    pub number_draft: String,
    pub filter: String,
    pub notification: Option<Notification>,
}

pub struct Controller<R> {
    remote: R,
    state: Arc<Mutex<State>>,
    clear_task: Mutex<Option<JoinHandle<()>>>,
    notification_timeout: Duration,
}

impl<R> Controller<R>
where
    R: Remote,
{
    /// Loads the full contact set once.
    ///
    /// A failed load is logged and leaves the phonebook empty.
    pub async fn start(remote: R, notification_timeout: Duration) -> Self {
        let this = Self {
            remote,
            state: Default::default(),
            clear_task: Mutex::new(None),
            notification_timeout,
        };

        match this.remote.fetch_all().await {
            Ok(contacts) => {
                tracing::info!("Loaded {} contacts", contacts.len());

                this.state.lock().loaded(contacts);
            }
            Err(err) => tracing::warn!("Failed to load contacts: {:#}", err),
        }

        this
    }

    pub fn view(&self) -> View {
        self.state.lock().view()
    }

    pub fn set_name_draft(&self, name: String) {
        self.state.lock().name_draft = name;
    }

    pub fn set_number_draft(&self, number: String) {
        self.state.lock().number_draft = number;
    }

    pub fn set_filter(&self, filter: String) {
        self.state.lock().filter = filter;
    }

    /// Submits the current drafts as a new contact.
    pub async fn add(&self) {
        let res = self.state.lock().validate();

        self.create(res).await;
    }

    /// Stores both drafts and submits them as one step.
    ///
    /// Concurrent submissions never see each other's half-written form.
    pub async fn submit(&self, draft: Draft) {
        let res = {
            let mut state = self.state.lock();

            state.name_draft = draft.name;
            state.number_draft = draft.number;

            state.validate()
        };

        self.create(res).await;
    }

    async fn create(&self, res: Result<Draft, ValidationError>) {
        let draft = match res {
            Ok(draft) => draft,
            Err(err) => {
                tracing::debug!("Rejected draft: {}", err);

                self.notify(Notification::error(err.to_string()));
                return;
            }
        };

        match self.remote.create(&draft).await {
            Ok(contact) => {
                let notification = self.state.lock().created(contact);

                self.notify(notification);
            }
            Err(err) => {
                tracing::error!("Failed to create contact {}: {:#}", draft.name, err);

                self.notify(Notification::error("Error adding person"));
            }
        }
    }

    pub fn delete_prompt(&self, id: &ContactId) -> Option<String> {
        self.contact_name(id).map(|name| format!("Delete {}?", name))
    }

    /// Deletes a contact after `confirm` accepted the prompt.
    ///
    /// The local entry is removed whatever the remote outcome.
    pub async fn delete<C>(&self, id: &ContactId, confirm: C)
    where
        C: FnOnce(&str) -> bool,
    {
        let name = match self.contact_name(id) {
            Some(name) => name,
            None => {
                tracing::debug!("Ignoring deletion of unknown contact {}", id);
                return;
            }
        };

        if !confirm(&format!("Delete {}?", name)) {
            return;
        }

        let res = self.remote.remove(id).await;

        if let Err(err) = &res {
            tracing::error!("Failed to remove contact {}: {:#}", id, err);
        }

        let notification = self.state.lock().removed(id, &name, res);

        self.notify(notification);
    }

    fn contact_name(&self, id: &ContactId) -> Option<String> {
        self.state
            .lock()
            .contacts
            .iter()
            .find(|contact| contact.id == *id)
            .map(|contact| contact.name.clone())
    }

    fn notify(&self, notification: Notification) {
        let mut clear_task = self.clear_task.lock();

        let generation = self.state.lock().notify(notification);

        let state = self.state.clone();
        let timeout = self.notification_timeout;

        let task = spawn(async move {
            sleep(timeout).await;

            state.lock().clear_notification(generation);
        });

        if let Some(task) = clear_task.replace(task) {
            task.abort();
        }
    }
}
