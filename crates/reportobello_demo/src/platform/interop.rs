//! Desktop stand-ins for the browser interop actions: the page's preview
//! frame is a PDF on disk, a new tab is the system browser, and a download
//! is a file in the downloads directory.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use report_logging::report_info;
use reportobello_client::{
    pdf_link, safe_pdf_filename, ApiError, AtomicFileWriter, PersistError, ReportApi,
};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub(crate) enum InteropError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("could not write {path:?}: {source}")]
    Write { path: PathBuf, source: PersistError },
    #[error("could not open {target}: {reason}")]
    Launch { target: String, reason: String },
}

/// The page's embedded frame: the document it currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FrameRef {
    document: PathBuf,
}

impl FrameRef {
    pub fn new(document: PathBuf) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Path {
        &self.document
    }
}

#[async_trait::async_trait]
pub(crate) trait BrowserInterop: Send + Sync {
    async fn open_in_frame(&self, url: &Url, frame: &FrameRef) -> Result<(), InteropError>;
    async fn open_in_new_tab(&self, url: &Url, download_as: Option<&str>)
        -> Result<(), InteropError>;
    async fn download(&self, url: &Url, filename: &str) -> Result<PathBuf, InteropError>;
}

/// Hands a URL or file to whatever the desktop uses to show it.
pub(crate) trait UrlOpener: Send + Sync {
    fn open(&self, target: &str) -> Result<(), InteropError>;
}

#[cfg(target_os = "windows")]
const LAUNCHERS: &[(&str, &[&str])] = &[("cmd", &["/C", "start", ""])];
#[cfg(not(target_os = "windows"))]
const LAUNCHERS: &[(&str, &[&str])] = &[("open", &[]), ("xdg-open", &[])];

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&self, target: &str) -> Result<(), InteropError> {
        let mut last_error = String::from("no launcher available");
        for (program, args) in LAUNCHERS {
            match Command::new(program).args(*args).arg(target).status() {
                Ok(status) if status.success() => return Ok(()),
                Ok(status) => last_error = format!("{program} exited with {status}"),
                Err(err) => last_error = format!("{program}: {err}"),
            }
        }
        Err(InteropError::Launch {
            target: target.to_string(),
            reason: last_error,
        })
    }
}

pub(crate) struct DesktopInterop {
    api: Arc<dyn ReportApi>,
    downloads_dir: PathBuf,
    /// `None` leaves opening to the user; the link is only logged.
    opener: Option<Arc<dyn UrlOpener>>,
}

impl DesktopInterop {
    pub fn new(
        api: Arc<dyn ReportApi>,
        downloads_dir: PathBuf,
        opener: Option<Arc<dyn UrlOpener>>,
    ) -> Self {
        Self {
            api,
            downloads_dir,
            opener,
        }
    }

    /// Launchers wait for their child process, so they run on the blocking pool.
    async fn launch(&self, target: String) -> Result<(), InteropError> {
        let Some(opener) = self.opener.clone() else {
            report_info!("Browser launching disabled; open {} manually", target);
            return Ok(());
        };
        let task_target = target.clone();
        tokio::task::spawn_blocking(move || opener.open(&task_target))
            .await
            .map_err(|err| InteropError::Launch {
                target,
                reason: err.to_string(),
            })?
    }
}

#[async_trait::async_trait]
impl BrowserInterop for DesktopInterop {
    async fn open_in_frame(&self, url: &Url, frame: &FrameRef) -> Result<(), InteropError> {
        let bytes = self.api.fetch_pdf(url).await?;
        let document = frame.document();
        let dir = document
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let name = document
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("frame.pdf");
        AtomicFileWriter::new(dir)
            .write(name, &bytes)
            .map_err(|source| InteropError::Write {
                path: document.to_path_buf(),
                source,
            })?;
        report_info!("Frame now shows {} ({} bytes)", url, bytes.len());
        Ok(())
    }

    async fn open_in_new_tab(
        &self,
        url: &Url,
        download_as: Option<&str>,
    ) -> Result<(), InteropError> {
        let link = pdf_link(url, download_as, true);
        report_info!("Opening {} in a new tab", link);
        self.launch(link.into()).await
    }

    async fn download(&self, url: &Url, filename: &str) -> Result<PathBuf, InteropError> {
        let bytes = self.api.fetch_pdf(url).await?;
        let filename = safe_pdf_filename(filename);
        let path = AtomicFileWriter::new(self.downloads_dir.clone())
            .write(&filename, &bytes)
            .map_err(|source| InteropError::Write {
                path: self.downloads_dir.join(&filename),
                source,
            })?;
        report_info!("Downloaded {} to {:?}", url, path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Mutex;
    use std::thread;

    use reportobello_client::{ApiSettings, ReportobelloClient};
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const PDF: &[u8] = b"%PDF-1.7\n%demo\n%%EOF";

    #[derive(Default)]
    struct RecordingOpener {
        opened: Arc<Mutex<Vec<String>>>,
        threads: Arc<Mutex<Vec<thread::ThreadId>>>,
    }

    impl UrlOpener for RecordingOpener {
        fn open(&self, target: &str) -> Result<(), InteropError> {
            self.opened.lock().unwrap().push(target.to_string());
            self.threads.lock().unwrap().push(thread::current().id());
            Ok(())
        }
    }

    async fn pdf_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/files/abc123.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PDF, "application/pdf"))
            .mount(&server)
            .await;
        server
    }

    fn client_for(server: &MockServer) -> Arc<dyn ReportApi> {
        Arc::new(
            ReportobelloClient::new(ApiSettings {
                host: server.uri(),
                ..ApiSettings::default()
            })
            .unwrap(),
        )
    }

    fn file_url(server: &MockServer) -> Url {
        Url::parse(&format!("{}/api/v1/files/abc123.pdf", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn download_writes_sanitized_file() {
        let server = pdf_server().await;
        let temp = TempDir::new().unwrap();
        let downloads = temp.path().join("downloads");
        let interop = DesktopInterop::new(client_for(&server), downloads.clone(), None);

        let saved = interop
            .download(&file_url(&server), "Q1: earnings")
            .await
            .unwrap();

        assert_eq!(saved, downloads.join("Q1_ earnings.pdf"));
        assert_eq!(fs::read(&saved).unwrap(), PDF);
    }

    #[tokio::test]
    async fn frame_document_is_replaced() {
        let server = pdf_server().await;
        let temp = TempDir::new().unwrap();
        let frame = FrameRef::new(temp.path().join("preview").join("frame.pdf"));
        fs::create_dir_all(temp.path().join("preview")).unwrap();
        fs::write(frame.document(), b"old").unwrap();
        let interop = DesktopInterop::new(client_for(&server), temp.path().to_path_buf(), None);

        interop.open_in_frame(&file_url(&server), &frame).await.unwrap();

        assert_eq!(fs::read(frame.document()).unwrap(), PDF);
    }

    #[tokio::test]
    async fn new_tab_opens_link_with_download_hint() {
        let server = pdf_server().await;
        let opener = RecordingOpener::default();
        let opened = opener.opened.clone();
        let interop = DesktopInterop::new(
            client_for(&server),
            PathBuf::from("unused"),
            Some(Arc::new(opener)),
        );

        interop
            .open_in_new_tab(&file_url(&server), Some("q1.pdf"))
            .await
            .unwrap();
        interop.open_in_new_tab(&file_url(&server), None).await.unwrap();

        let opened = opened.lock().unwrap();
        assert_eq!(
            *opened,
            vec![
                format!("{}?downloadAs=q1.pdf&download=", file_url(&server)),
                file_url(&server).to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn fetch_failure_surfaces_as_api_error() {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();
        let interop = DesktopInterop::new(client_for(&server), temp.path().to_path_buf(), None);

        let err = interop
            .download(&file_url(&server), "report.pdf")
            .await
            .unwrap_err();

        assert!(matches!(err, InteropError::Api(ApiError::Rejected { status: 404, .. })));
        assert!(!temp.path().join("report.pdf").exists());
    }

    #[tokio::test]
    async fn launcher_runs_off_the_async_thread() {
        let server = pdf_server().await;
        let opener = RecordingOpener::default();
        let threads = opener.threads.clone();
        let interop = DesktopInterop::new(
            client_for(&server),
            PathBuf::from("unused"),
            Some(Arc::new(opener)),
        );

        interop.open_in_new_tab(&file_url(&server), None).await.unwrap();

        let threads = threads.lock().unwrap();
        assert_eq!(threads.len(), 1);
        assert_ne!(threads[0], thread::current().id());
    }
}
