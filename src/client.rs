use anyhow::{ensure, Result};
use async_trait::async_trait;
use reqwest::{Client as HttpClient, Response, StatusCode};
use thiserror::Error;
use url::Url;

use crate::contact::{Contact, ContactId, Draft};

/// Any failure of a remote call.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Contact not found on remote store")]
    NotFound,
    #[error("Remote store responded with status {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Access to the remote contact collection.
///
/// Every call issues exactly one request and is never retried.
#[async_trait]
pub trait Remote: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Contact>, TransportError>;

    /// Returns the stored contact including its assigned identifier.
    async fn create(&self, draft: &Draft) -> Result<Contact, TransportError>;

    /// Fails with [`TransportError::NotFound`] if the contact is already gone.
    async fn remove(&self, id: &ContactId) -> Result<(), TransportError>;
}

pub struct HttpRemote {
    http_client: HttpClient,
    url: Url,
}

impl HttpRemote {
    pub fn start(url: Url) -> Result<Self> {
        ensure!(
            !url.cannot_be_a_base(),
            "Remote URL {} cannot be used as a collection",
            url
        );

        let http_client = HttpClient::builder().user_agent("phonebook").build()?;

        Ok(Self { http_client, url })
    }
}

#[async_trait]
impl Remote for HttpRemote {
    async fn fetch_all(&self) -> Result<Vec<Contact>, TransportError> {
        tracing::debug!("Fetching contacts from {}", self.url);

        let response = self.http_client.get(self.url.clone()).send().await?;

        let contacts = check_status(response)?.json().await?;

        Ok(contacts)
    }

    async fn create(&self, draft: &Draft) -> Result<Contact, TransportError> {
        tracing::debug!("Creating contact {}", draft.name);

        let response = self
            .http_client
            .post(self.url.clone())
            .json(draft)
            .send()
            .await?;

        let contact = check_status(response)?.json().await?;

        Ok(contact)
    }

    async fn remove(&self, id: &ContactId) -> Result<(), TransportError> {
        let url = contact_url(&self.url, id);

        tracing::debug!("Removing contact at {}", url);

        let response = self.http_client.delete(url).send().await?;

        check_status(response)?;

        Ok(())
    }
}

fn check_status(response: Response) -> Result<Response, TransportError> {
    match response.status() {
        StatusCode::NOT_FOUND => Err(TransportError::NotFound),
        status if !status.is_success() => Err(TransportError::Status(status)),
        _ => Ok(response),
    }
}

fn contact_url(base: &Url, id: &ContactId) -> Url {
    let mut url = base.clone();

    // Checked by `HttpRemote::start`.
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(id.as_str());
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_url_appends_id() {
        let base = Url::parse("http://localhost:3001/persons").unwrap();

        assert_eq!(
            contact_url(&base, &ContactId::from(5_u64)).as_str(),
            "http://localhost:3001/persons/5"
        );
    }

    #[test]
    fn contact_url_tolerates_trailing_slash() {
        let base = Url::parse("http://localhost:3001/api/persons/").unwrap();

        assert_eq!(
            contact_url(&base, &ContactId::from("a3f0")).as_str(),
            "http://localhost:3001/api/persons/a3f0"
        );
    }

    #[test]
    fn contact_url_escapes_id() {
        let base = Url::parse("http://localhost:3001/persons").unwrap();

        assert_eq!(
            contact_url(&base, &ContactId::from("a/b")).as_str(),
            "http://localhost:3001/persons/a%2Fb"
        );
    }

    fn response(status: u16) -> Response {
        axum::http::Response::builder()
            .status(status)
            .body("")
            .unwrap()
            .into()
    }

    #[test]
    fn check_status_maps_not_found() {
        assert!(matches!(
            check_status(response(404)),
            Err(TransportError::NotFound)
        ));
    }

    #[test]
    fn check_status_maps_other_failures() {
        assert!(matches!(
            check_status(response(500)),
            Err(TransportError::Status(StatusCode::INTERNAL_SERVER_ERROR))
        ));
        assert!(matches!(
            check_status(response(400)),
            Err(TransportError::Status(StatusCode::BAD_REQUEST))
        ));
    }

    #[test]
    fn check_status_passes_success() {
        let response = check_status(response(201)).unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn start_rejects_opaque_urls() {
        let url = Url::parse("mailto:someone@example.com").unwrap();

        assert!(HttpRemote::start(url).is_err());
    }
}
