mod app;
mod appsettings;
mod delivery;
mod dialog;
mod form;
mod permission;
mod registrar;
mod terminal;

use std::{sync::Arc, time::Duration};

use app::App;
use appsettings::{AppSettings, NotificationBackendKind};
use delivery::NotificationJobHandler;
use permission::{ConsentFilePlatform, ConsentStore};
use registrar::ReminderRegistrar;
use reminders_notify::{DesktopBackend, LogBackend, NotificationBackend, NotificationRenderer};
use reminders_scheduler::{DeferredJobScheduler, FileJobStore};
use terminal::TerminalUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = AppSettings::new()?;
    let timezone = settings.timezone()?;
    log::info!("Starting reminders. [timezone = {}]", timezone);

    let backend: Arc<dyn NotificationBackend> = match settings.notifications.backend {
        NotificationBackendKind::Desktop => {
            Arc::new(DesktopBackend::new(settings.notifications.app_name.clone()))
        }
        NotificationBackendKind::Log => Arc::new(LogBackend::new()),
    };
    let renderer = Arc::new(NotificationRenderer::new(backend));
    let handler = Arc::new(NotificationJobHandler::new(renderer));

    let store = Arc::new(FileJobStore::new(&settings.scheduler.store_path));
    let scheduler = Arc::new(DeferredJobScheduler::new(
        store,
        handler,
        Duration::from_secs(settings.scheduler.cleanup_interval_secs),
    ));
    scheduler.resume().await?;

    let ui = TerminalUi;
    let platform = ConsentFilePlatform::new(
        settings.notifications.require_consent,
        ConsentStore::new(&settings.notifications.consent_path),
        ui,
    );
    let registrar = ReminderRegistrar::new(scheduler.clone());
    let mut app = App::new(ui, platform, registrar, timezone);

    let runtime = tokio::runtime::Handle::current();
    let result = tokio::task::spawn_blocking(move || runtime.block_on(app.run())).await?;

    scheduler.shutdown();
    log::info!("Pending reminders stay stored and fire on the next start");

    result
}
