use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionResponse {
    Granted,
    Denied { can_ask_again: bool },
}

/// Notification consent as exposed by the platform.
pub trait PermissionPlatform {
    fn requires_runtime_consent(&self) -> bool;
    fn notifications_enabled(&self) -> anyhow::Result<bool>;
    fn request_permission(&mut self) -> anyhow::Result<PermissionResponse>;
    fn open_settings(&mut self) -> anyhow::Result<()>;
}

/// Dialogs shown while asking for consent. `true` means the user pressed OK.
pub trait PermissionDialogs {
    fn confirm_permission_dialog(&mut self) -> anyhow::Result<bool>;
    fn confirm_settings_dialog(&mut self) -> anyhow::Result<bool>;
    fn show_message(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    #[default]
    Unchecked,
    Prompted,
    Granted,
    Dismissed,
    DeniedRedirectToSettings,
}

#[derive(Debug, Default)]
pub struct PermissionFlow {
    state: PermissionState,
}

impl PermissionFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PermissionState {
        self.state
    }

    /// Returns `true` once reminders may be created.
    pub fn ensure_permission(
        &mut self,
        platform: &mut dyn PermissionPlatform,
        dialogs: &mut dyn PermissionDialogs,
    ) -> anyhow::Result<bool> {
        if !platform.requires_runtime_consent() || platform.notifications_enabled()? {
            self.state = PermissionState::Granted;
            return Ok(true);
        }

        loop {
            if !dialogs.confirm_permission_dialog()? {
                self.state = PermissionState::Dismissed;
                return Ok(false);
            }

            self.state = PermissionState::Prompted;
            match platform.request_permission()? {
                PermissionResponse::Granted => {
                    dialogs.show_message("Notification permission granted");
                    self.state = PermissionState::Granted;
                    return Ok(true);
                }
                PermissionResponse::Denied {
                    can_ask_again: true,
                } => continue,
                PermissionResponse::Denied {
                    can_ask_again: false,
                } => {
                    self.state = PermissionState::DeniedRedirectToSettings;
                    if dialogs.confirm_settings_dialog()? {
                        platform.open_settings()?;
                    }
                    return Ok(false);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    Unknown,
    Granted,
    DeniedPermanently,
}

/// Consent persisted as a one-word file: `granted` or `denied`.
pub struct ConsentStore {
    path: PathBuf,
}

impl ConsentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> anyhow::Result<Consent> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Consent::Unknown),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Could not read consent file {}", self.path.display())
                });
            }
        };

        Ok(match contents.trim() {
            "granted" => Consent::Granted,
            "denied" => Consent::DeniedPermanently,
            other => {
                log::warn!(
                    "Ignoring unexpected consent value {:?} in {}",
                    other,
                    self.path.display()
                );
                Consent::Unknown
            }
        })
    }

    pub fn write(&self, consent: Consent) -> anyhow::Result<()> {
        let write = |contents: &str| {
            std::fs::write(&self.path, contents)
                .with_context(|| format!("Could not write consent file {}", self.path.display()))
        };

        match consent {
            Consent::Granted => write("granted"),
            Consent::DeniedPermanently => write("denied"),
            Consent::Unknown => match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e).with_context(|| {
                    format!("Could not remove consent file {}", self.path.display())
                }),
                _ => Ok(()),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentAnswer {
    Allow,
    Deny,
    DenyAndDontAskAgain,
}

pub trait ConsentPrompt {
    fn ask_consent(&mut self) -> anyhow::Result<ConsentAnswer>;
    fn show_settings_location(&mut self, path: &Path);
}

/// Permission platform for hosts without a system consent service: the answer is kept in a
/// [`ConsentStore`] and "system settings" is that file.
pub struct ConsentFilePlatform<P> {
    require_consent: bool,
    store: ConsentStore,
    prompt: P,
}

impl<P: ConsentPrompt> ConsentFilePlatform<P> {
    pub fn new(require_consent: bool, store: ConsentStore, prompt: P) -> Self {
        Self {
            require_consent,
            store,
            prompt,
        }
    }
}

impl<P: ConsentPrompt> PermissionPlatform for ConsentFilePlatform<P> {
    fn requires_runtime_consent(&self) -> bool {
        self.require_consent
    }

    fn notifications_enabled(&self) -> anyhow::Result<bool> {
        Ok(self.store.read()? == Consent::Granted)
    }

    fn request_permission(&mut self) -> anyhow::Result<PermissionResponse> {
        if self.store.read()? == Consent::DeniedPermanently {
            return Ok(PermissionResponse::Denied {
                can_ask_again: false,
            });
        }

        match self.prompt.ask_consent()? {
            ConsentAnswer::Allow => {
                self.store.write(Consent::Granted)?;
                Ok(PermissionResponse::Granted)
            }
            ConsentAnswer::Deny => Ok(PermissionResponse::Denied {
                can_ask_again: true,
            }),
            ConsentAnswer::DenyAndDontAskAgain => {
                self.store.write(Consent::DeniedPermanently)?;
                Ok(PermissionResponse::Denied {
                    can_ask_again: false,
                })
            }
        }
    }

    fn open_settings(&mut self) -> anyhow::Result<()> {
        self.prompt.show_settings_location(self.store.path());
        Ok(())
    }
}
