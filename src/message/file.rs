use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::draft::{Draft, Message};
use crate::clients::WhatsappClient;
use crate::core::models::{DispatchOutcome, Endpoint, FileKind, Payload};
use crate::errors::SendError;
use crate::utils::mime::guess_mime;

/// Where the bytes of a file message come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// A URL or local path, resolved when the message is sent.
    Reference(String),
    Path(PathBuf),
    Bytes { data: Vec<u8>, file_name: String },
}

/// Media sent through one of the `sendFile<Type>` actions.
///
/// Remote URLs travel as a JSON `url` field; local files and in-memory bytes
/// are uploaded as multipart form data.
#[derive(Debug, Clone)]
pub struct FileMessage {
    draft: Draft,
    kind: FileKind,
    source: Option<FileSource>,
}

enum Upload {
    Remote(String),
    Local { data: Vec<u8>, file_name: String },
}

impl FileMessage {
    #[must_use]
    pub fn new(kind: FileKind) -> Self {
        Self {
            draft: Draft::default(),
            kind,
            source: None,
        }
    }

    #[must_use]
    pub fn image() -> Self {
        Self::new(FileKind::Image)
    }

    #[must_use]
    pub fn video() -> Self {
        Self::new(FileKind::Video)
    }

    #[must_use]
    pub fn audio() -> Self {
        Self::new(FileKind::Audio)
    }

    #[must_use]
    pub fn document() -> Self {
        Self::new(FileKind::Document)
    }

    /// Attach a file by URL or local path.
    #[must_use]
    pub fn file(mut self, reference: impl Into<String>) -> Self {
        self.source = Some(FileSource::Reference(reference.into()));
        self
    }

    #[must_use]
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(FileSource::Path(path.into()));
        self
    }

    #[must_use]
    pub fn file_bytes(mut self, data: Vec<u8>, file_name: impl Into<String>) -> Self {
        self.source = Some(FileSource::Bytes {
            data,
            file_name: file_name.into(),
        });
        self
    }

    #[must_use]
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.draft.set("caption", caption.into());
        self
    }

    #[must_use]
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.draft.set("filename", file_name.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> FileKind {
        self.kind
    }

    #[must_use]
    pub fn source(&self) -> Option<&FileSource> {
        self.source.as_ref()
    }

    async fn resolve(&self) -> Result<Upload, SendError> {
        match &self.source {
            None => Err(SendError::InvalidFileIdentifier(
                "no file attached".to_string(),
            )),
            Some(FileSource::Reference(reference)) => match classify_reference(reference)? {
                Reference::Url => Ok(Upload::Remote(reference.clone())),
                Reference::Path(path) => self.read_local(&path).await,
            },
            Some(FileSource::Path(path)) => self.read_local(path).await,
            Some(FileSource::Bytes { data, file_name }) => Ok(Upload::Local {
                data: data.clone(),
                file_name: file_name.clone(),
            }),
        }
    }

    async fn read_local(&self, path: &Path) -> Result<Upload, SendError> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| SendError::FileAccessFailed(format!("{}: {e}", path.display())))?;
        let file_name = self
            .draft
            .get("filename")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "file".to_string());

        Ok(Upload::Local { data, file_name })
    }
}

enum Reference {
    Url,
    Path(PathBuf),
}

/// Decide whether a reference is a remote URL or a local path.
///
/// Single-letter schemes are Windows drive letters, not URLs.
fn classify_reference(reference: &str) -> Result<Reference, SendError> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(SendError::InvalidFileIdentifier(
            "empty file reference".to_string(),
        ));
    }

    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Reference::Url),
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .map(Reference::Path)
            .map_err(|()| SendError::InvalidFileIdentifier(reference.to_string())),
        Ok(url) if url.scheme().len() > 1 => {
            Err(SendError::InvalidFileIdentifier(reference.to_string()))
        }
        _ => Ok(Reference::Path(PathBuf::from(trimmed))),
    }
}

fn build_form(payload: &Payload, data: Vec<u8>, file_name: String) -> Result<Form, SendError> {
    let mut form = Form::new();
    for (key, value) in payload {
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        form = form.text(key.clone(), text);
    }

    let mime = guess_mime(&file_name);
    let part = Part::bytes(data)
        .file_name(file_name.clone())
        .mime_str(&mime)
        .map_err(|e| SendError::InvalidFileIdentifier(format!("{file_name}: {e}")))?;

    Ok(form.part("file", part))
}

#[async_trait]
impl Message for FileMessage {
    fn draft(&self) -> &Draft {
        &self.draft
    }

    fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    async fn send(&self, client: &WhatsappClient) -> Result<DispatchOutcome, SendError> {
        let Some(payload) = self.draft.prepare()? else {
            return Ok(DispatchOutcome::Suppressed);
        };
        let endpoint = Endpoint::SendFile(self.kind);

        let response = match self.resolve().await? {
            Upload::Remote(url) => {
                let mut payload = payload.clone();
                payload.insert("url".to_string(), Value::String(url));
                client.post_json(endpoint, &payload, self.draft.token()).await?
            }
            Upload::Local { data, file_name } => {
                debug!("Uploading {} ({} bytes) to {}", file_name, data.len(), endpoint);
                let form = build_form(payload, data, file_name)?;
                client
                    .post_multipart(endpoint, form, self.draft.token())
                    .await?
            }
        };

        Ok(DispatchOutcome::Single(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_references_are_remote() {
        assert!(matches!(
            classify_reference("https://cdn.example.com/a.png"),
            Ok(Reference::Url)
        ));
    }

    #[test]
    fn plain_paths_are_local() {
        assert!(matches!(
            classify_reference("/var/tmp/report.pdf"),
            Ok(Reference::Path(_))
        ));
        assert!(matches!(
            classify_reference("relative/photo.jpg"),
            Ok(Reference::Path(_))
        ));
    }

    #[test]
    fn unsupported_schemes_and_blanks_are_invalid() {
        assert!(matches!(
            classify_reference("ftp://files.example.com/a.png"),
            Err(SendError::InvalidFileIdentifier(_))
        ));
        assert!(matches!(
            classify_reference("   "),
            Err(SendError::InvalidFileIdentifier(_))
        ));
    }

    #[test]
    fn builders_set_caption_and_kind() {
        let message = FileMessage::document()
            .file("https://cdn.example.com/invoice.pdf")
            .caption("Your invoice")
            .file_name("invoice.pdf");
        assert_eq!(message.kind(), FileKind::Document);
        assert_eq!(
            message.payload_value("caption").and_then(Value::as_str),
            Some("Your invoice")
        );
        assert!(matches!(message.source(), Some(FileSource::Reference(_))));
    }
}
