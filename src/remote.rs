//! Seam to a remote translation service.
//!
//! The crate ships no HTTP client. A command layer provides a
//! [`Transport`] and uses [`ResourceTranslation`] to move serialized
//! XLIFF documents between the service and [`TranslationFile`]s.

use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};

use crate::config::Project;
use crate::error::{
    Result,
    SyncError,
};
use crate::translation::{
    FileFormat,
    TranslationFile,
};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Request primitives of the remote service. `command` is the API path
/// relative to the service root.
pub trait Transport {
    /// Sends `body` with POST and returns the raw response body.
    ///
    /// # Errors
    /// Returns [`SyncError::Remote`] when the request fails.
    fn post(&self, command: &str, body: Option<&str>, content_type: &str) -> Result<String>;

    /// Sends `body` with PUT and returns the raw response body.
    ///
    /// # Errors
    /// Returns [`SyncError::Remote`] when the request fails.
    fn put(&self, command: &str, body: Option<&str>, content_type: &str) -> Result<String>;

    /// Fetches `command` and decodes the response as JSON.
    ///
    /// # Errors
    /// Returns [`SyncError::Remote`] when the request fails or the body is not JSON.
    fn get_json(&self, command: &str) -> Result<serde_json::Value>;
}

/// Payload of the translation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TranslationContent {
    content: String,
}

/// One language of one remote resource.
///
/// Every parameter is optional until a request needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceTranslation {
    project: Option<String>,
    resource: Option<String>,
    language: Option<String>,
}

impl ResourceTranslation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Addresses `file` inside `project`: the resource is the prefixed
    /// domain, the language is the file's target language.
    #[must_use]
    pub fn for_file(project: &Project, file: &TranslationFile) -> Self {
        Self {
            project: project.name().map(str::to_string),
            resource: Some(project.resource_name(file.domain())),
            language: file.metadata().target_language.clone(),
        }
    }

    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    fn ensure_parameter<'a>(value: Option<&'a String>, name: &'static str) -> Result<&'a str> {
        value
            .map(String::as_str)
            .ok_or(SyncError::MissingParameter { owner: "ResourceTranslation", name })
    }

    fn command(&self) -> Result<String> {
        let project = Self::ensure_parameter(self.project.as_ref(), "project")?;
        let resource = Self::ensure_parameter(self.resource.as_ref(), "resource")?;
        let language = Self::ensure_parameter(self.language.as_ref(), "language")?;
        Ok(format!("project/{project}/resource/{resource}/translation/{language}/"))
    }

    /// Uploads `file` as the translation content of this resource.
    ///
    /// # Errors
    /// - A parameter is unset
    /// - `file` cannot be serialized
    /// - The transport fails
    pub fn push(&self, transport: &impl Transport, file: &TranslationFile) -> Result<()> {
        let command = self.command()?;
        let payload = TranslationContent { content: file.render()? };
        let body = serde_json::to_string(&payload).map_err(|e| SyncError::Remote(e.to_string()))?;

        tracing::debug!(%command, path = %file.path().display(), "Uploading translation");
        transport.put(&command, Some(&body), JSON_CONTENT_TYPE)?;
        Ok(())
    }

    /// Downloads the translation content and parses it as an XLIFF file
    /// bound to `path`. Nothing is written to disk.
    ///
    /// # Errors
    /// - A parameter is unset
    /// - The transport fails or the response has no `content`
    /// - The content is not a valid XLIFF document
    pub fn pull(
        &self,
        transport: &impl Transport,
        path: impl Into<PathBuf>,
    ) -> Result<TranslationFile> {
        let command = self.command()?;
        tracing::debug!(%command, "Downloading translation");

        let response = transport.get_json(&command)?;
        let payload: TranslationContent = serde_json::from_value(response)
            .map_err(|e| SyncError::Remote(format!("unexpected response for {command}: {e}")))?;
        TranslationFile::from_text(path, FileFormat::Xliff, &payload.content)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::cell::RefCell;
    use std::path::{
        Path,
        PathBuf,
    };

    use googletest::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::error::Result;
    use crate::config::ToolboxSettings;
    use crate::test_utils::xliff_file;

    /// Records requests and replays a canned JSON response.
    #[derive(Default)]
    struct FakeTransport {
        requests: RefCell<Vec<(String, String, Option<String>)>>,
        response: Option<serde_json::Value>,
    }

    impl FakeTransport {
        fn record(&self, method: &str, command: &str, body: Option<&str>) {
            self.requests.borrow_mut().push((
                method.to_string(),
                command.to_string(),
                body.map(str::to_string),
            ));
        }
    }

    impl Transport for FakeTransport {
        fn post(&self, command: &str, body: Option<&str>, _content_type: &str) -> Result<String> {
            self.record("POST", command, body);
            Ok(String::new())
        }

        fn put(&self, command: &str, body: Option<&str>, _content_type: &str) -> Result<String> {
            self.record("PUT", command, body);
            Ok(String::new())
        }

        fn get_json(&self, command: &str) -> Result<serde_json::Value> {
            self.record("GET", command, None);
            self.response.clone().ok_or_else(|| SyncError::Remote("no response".to_string()))
        }
    }

    fn translation() -> ResourceTranslation {
        ResourceTranslation::new().with_project("ext").with_resource("core-default").with_language("de")
    }

    #[rstest]
    fn test_push_puts_rendered_document() {
        let transport = FakeTransport::default();
        let file = xliff_file(&[("MSC.yes", "Yes", Some("Ja"))]);

        translation().push(&transport, &file).unwrap();

        let requests = transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        let (method, command, body) = &requests[0];
        assert_eq!(method, "PUT");
        assert_eq!(command, "project/ext/resource/core-default/translation/de/");
        let body: serde_json::Value = serde_json::from_str(body.as_deref().unwrap()).unwrap();
        assert_that!(body["content"].as_str().unwrap(), contains_substring("<target>Ja</target>"));
    }

    #[rstest]
    fn test_pull_parses_content() {
        let content = xliff_file(&[("MSC.yes", "Yes", Some("Ja"))]).render().unwrap();
        let transport =
            FakeTransport { response: Some(json!({ "content": content })), ..FakeTransport::default() };

        let file = translation().pull(&transport, "/xliff/de/default.xlf").unwrap();

        assert_eq!(file.path(), Path::new("/xliff/de/default.xlf"));
        assert_that!(file.value("MSC.yes"), some(eq("Ja")));
        assert_that!(file.exists_on_disk(), eq(false));
    }

    #[rstest]
    fn test_pull_rejects_response_without_content() {
        let transport =
            FakeTransport { response: Some(json!({ "status": "ok" })), ..FakeTransport::default() };

        let result = translation().pull(&transport, "/xliff/de/default.xlf");

        assert!(matches!(result, Err(SyncError::Remote(_))));
    }

    #[rstest]
    #[case::project(ResourceTranslation::new().with_resource("r").with_language("de"), "project")]
    #[case::resource(ResourceTranslation::new().with_project("p").with_language("de"), "resource")]
    #[case::language(ResourceTranslation::new().with_project("p").with_resource("r"), "language")]
    fn test_missing_parameter(#[case] translation: ResourceTranslation, #[case] missing: &str) {
        let transport = FakeTransport::default();

        let error = translation.pull(&transport, "/x.xlf").unwrap_err();

        assert_eq!(error.to_string(), format!("ResourceTranslation is missing parameter: {missing}"));
        assert_that!(transport.requests.borrow().is_empty(), eq(true));
    }

    #[rstest]
    fn test_for_file_uses_prefixed_domain() {
        let settings = ToolboxSettings {
            project: Some("ext".to_string()),
            prefix: Some("core-".to_string()),
            languages_cto: Some(PathBuf::from("contao")),
            languages_tx: Some(PathBuf::from("xliff")),
            ..ToolboxSettings::default()
        };
        let project = Project::from_settings(Path::new("/work"), settings).unwrap();
        let file = xliff_file(&[]);

        let translation = ResourceTranslation::for_file(&project, &file);

        assert_eq!(translation, translation_for("ext", "core-default", "de"));
    }

    fn translation_for(project: &str, resource: &str, language: &str) -> ResourceTranslation {
        ResourceTranslation::new().with_project(project).with_resource(resource).with_language(language)
    }
}
