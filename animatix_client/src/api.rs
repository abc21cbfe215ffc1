use std::{future::Future, ops::Deref, sync::LazyLock};

use animatix_models::contact::SubmissionResult;
use serde::Serialize;
use url::Url;

use crate::ContactFields;

/// Path of the relay endpoint, relative to the site origin.
const CONTACT_ENDPOINT: &str = "api/contact";

pub static USER_AGENT: LazyLock<String> = LazyLock::new(|| {
    let homepage = env!("CARGO_PKG_HOMEPAGE");
    let version = env!("CARGO_PKG_VERSION");
    format!("Animatix Studio Contact Client ({homepage}, Version {version})")
});

const _: () = {
    assert!(!env!("CARGO_PKG_HOMEPAGE").is_empty());
};

#[cfg_attr(test, mockall::automock)]
pub trait ContactApi: Send + Sync + 'static {
    /// Posts the raw field values to the relay endpoint and decodes its
    /// structured verdict, whatever the response status.
    fn submit(
        &self,
        fields: ContactFields,
    ) -> impl Future<Output = anyhow::Result<SubmissionResult>> + Send;
}

#[derive(Debug, Clone)]
pub struct RestContactApi {
    client: HttpClient,
    endpoint: Url,
}

impl RestContactApi {
    pub fn new(origin: &Url) -> anyhow::Result<Self> {
        Ok(Self {
            client: HttpClient::default(),
            endpoint: origin.join(CONTACT_ENDPOINT)?,
        })
    }
}

impl ContactApi for RestContactApi {
    async fn submit(&self, fields: ContactFields) -> anyhow::Result<SubmissionResult> {
        self.client
            .post(self.endpoint.clone())
            .form(&SubmitRequest {
                name: &fields.name,
                email: &fields.email,
                message: &fields.message,
            })
            .send()
            .await?
            .json::<SubmissionResult>()
            .await
            .map_err(Into::into)
    }
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

#[derive(Debug, Clone)]
pub struct HttpClient(reqwest::Client);

impl Deref for HttpClient {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self(
            reqwest::Client::builder()
                .user_agent(&*USER_AGENT)
                .build()
                .unwrap(),
        )
    }
}

#[cfg(test)]
impl MockContactApi {
    pub fn with_submit(
        mut self,
        fields: ContactFields,
        result: anyhow::Result<SubmissionResult>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(fields))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_resolves_against_the_origin() {
        // Arrange
        let origin = "https://animatix.studio/".parse().unwrap();

        // Act
        let api = RestContactApi::new(&origin).unwrap();

        // Assert
        assert_eq!(api.endpoint.as_str(), "https://animatix.studio/api/contact");
    }
}
