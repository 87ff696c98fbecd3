use crate::config::Config;
use crate::service::{Language, ServiceStatus, TranslationService};
use crate::ui::window::MainWindow;
use crate::workflow::{ResultOutcome, SubmissionId, UploadWorkflow};

/// Events sent from the tokio runtime to the GTK main thread.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    LanguagesLoaded(Vec<Language>),
    StatusLoaded(ServiceStatus),
    CatalogFailed(String),
    TranslationFinished(SubmissionId, ResultOutcome),
}

/// Central application state. Lives on the GTK main thread inside Rc<RefCell<>>.
pub struct AppState {
    pub config: Config,
    pub tokio_rt: tokio::runtime::Runtime,
    pub backend_sender: async_channel::Sender<BackendEvent>,
    /// `None` when the configured server URL is unusable.
    pub service: Option<TranslationService>,
    pub workflow: UploadWorkflow,
    pub window: MainWindow,
}

impl AppState {
    pub fn new(
        config: Config,
        sender: async_channel::Sender<BackendEvent>,
        workflow: UploadWorkflow,
        window: MainWindow,
    ) -> Self {
        let tokio_rt = tokio::runtime::Runtime::new()
            .expect("Failed to create tokio runtime");

        let service = match TranslationService::new(&config.server_url) {
            Ok(service) => {
                log::info!("Using translation server {}", config.server_url);
                Some(service)
            }
            Err(e) => {
                log::error!("{e}");
                None
            }
        };

        Self {
            config,
            tokio_rt,
            backend_sender: sender,
            service,
            workflow,
            window,
        }
    }
}
