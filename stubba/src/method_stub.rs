//! # Method stub
//!
//! A [MethodStub] replaces one method of one object by an interceptor forwarding every call to
//! the object mock, and puts the original method back when it is uninstalled.
//!
//! While the stub is active the original method is kept in the object own behavior set under a
//! hidden name (see [MethodName::hidden]). Some objects refuse to rename their methods, in that
//! case the original method is lost: the stub still works but uninstalling it leaves the object
//! without the method. The loss is reported by [OriginalMethodState::Lost] and logged.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use anyhow::Context;
use slog::{Logger, debug, warn};
use strum::{Display, IntoEnumIterator};

use crate::StdResult;
use crate::configuration::{LostOriginalLogLevel, StubbingConfiguration};
use crate::entities::{MethodName, Visibility};
use crate::interceptor::interceptor_for;
use crate::logging::LoggerExtensions;
use crate::method_table::MethodTableError;
use crate::stubbee::Stubbee;

/// What happened to the original method during the last install or uninstall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum OriginalMethodState {
    /// The target had no own method with the stubbed name.
    Absent,

    /// The original method is kept under the hidden name.
    Hidden,

    /// The original method is back under its name.
    Restored,

    /// The target refused to rename the original method, it can't be restored.
    Lost,
}

/// A stub binding a target object to a method name.
pub struct MethodStub {
    target: Arc<dyn Stubbee>,
    method: MethodName,
    original: Option<OriginalMethodState>,
    installed: bool,
    configuration: StubbingConfiguration,
    logger: Logger,
}

impl MethodStub {
    /// Create a stub of `method` on `target`, nothing is changed on the target until
    /// [install][Self::install] is called.
    pub fn new<T: Into<MethodName>>(target: Arc<dyn Stubbee>, method: T) -> Self {
        Self {
            target,
            method: method.into(),
            original: None,
            installed: false,
            configuration: StubbingConfiguration::default(),
            logger: Logger::root(slog::Discard, slog::o!()),
        }
    }

    /// Set the [Logger] to use.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger
            .new_with_component_name::<Self>()
            .new_with_stubbed_method(&self.target.inspect(), &self.method);
        self
    }

    /// Set the [StubbingConfiguration] to use.
    pub fn with_configuration(mut self, configuration: StubbingConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    /// The stubbed object.
    pub fn target(&self) -> &Arc<dyn Stubbee> {
        &self.target
    }

    /// The stubbed method name.
    pub fn method(&self) -> &MethodName {
        &self.method
    }

    /// Name under which the original method is kept while the stub is installed.
    pub fn hidden_method(&self) -> MethodName {
        self.method.hidden()
    }

    /// State of the original method after the last install or uninstall, `None` if the stub was
    /// never installed.
    pub fn original_state(&self) -> Option<OriginalMethodState> {
        self.original
    }

    /// Check if a method is bound on the target own behavior set, whatever its visibility.
    pub fn method_exists(&self, method: &MethodName) -> bool {
        Visibility::iter().any(|visibility| self.target.has_own_method(method, visibility))
    }

    /// Check if the interceptor of this stub is currently defined on the target.
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Hide the original method, if any, and define the interceptor.
    ///
    /// Installing a stub twice without uninstalling it fails, leaving the target untouched.
    /// If the interceptor can't be defined the original method is moved back under its name.
    pub fn install(&mut self) -> StdResult<OriginalMethodState> {
        if self.installed {
            return Err(MethodTableError::MethodAlreadyDefined {
                method: self.method.clone(),
            })
            .with_context(|| format!("Stub `{self}` is already installed"));
        }

        let state = self.hide_original_method()?;
        if let Err(error) = self.define_new_method() {
            if state == OriginalMethodState::Hidden {
                self.unhide_original_method()?;
            }
            return Err(error);
        }
        self.original = Some(state);
        self.installed = true;
        debug!(self.logger, "Stub installed"; "original" => state.to_string());

        Ok(state)
    }

    /// Remove the interceptor, restore the original method, if any, and reset the target mock.
    ///
    /// Fails if the interceptor is not defined, ie: if the stub is not installed.
    pub fn uninstall(&mut self) -> StdResult<OriginalMethodState> {
        self.remove_new_method()?;
        self.installed = false;
        let state = self.restore_original_method()?;
        self.original = Some(state);
        self.target.reset_mocha();
        debug!(self.logger, "Stub uninstalled"; "original" => state.to_string());

        Ok(state)
    }

    fn hide_original_method(&self) -> StdResult<OriginalMethodState> {
        if !self.method_exists(&self.method) {
            return Ok(OriginalMethodState::Absent);
        }

        match self
            .target
            .rename_own_method(&self.method, &self.hidden_method())
        {
            Ok(()) => Ok(OriginalMethodState::Hidden),
            Err(error) if is_rename_unsupported(&error) => {
                self.log_lost_original("Original method could not be hidden", &error);
                Ok(OriginalMethodState::Lost)
            }
            Err(error) => {
                Err(error).with_context(|| format!("Could not hide original method of `{self}`"))
            }
        }
    }

    fn unhide_original_method(&self) -> StdResult<()> {
        self.target
            .rename_own_method(&self.hidden_method(), &self.method)
            .with_context(|| {
                format!("Could not put back original method of `{self}` after a failed install")
            })
    }

    fn define_new_method(&self) -> StdResult<()> {
        self.target
            .define_own_method(
                &self.method,
                interceptor_for(&self.method, &self.configuration),
            )
            .with_context(|| format!("Could not define interceptor of `{self}`"))
    }

    fn remove_new_method(&self) -> StdResult<()> {
        self.target
            .remove_own_method(&self.method)
            .with_context(|| format!("Could not remove interceptor of `{self}`"))?;

        Ok(())
    }

    fn restore_original_method(&self) -> StdResult<OriginalMethodState> {
        let hidden_method = self.hidden_method();
        if !self.method_exists(&hidden_method) {
            return Ok(match self.original {
                Some(OriginalMethodState::Lost) => OriginalMethodState::Lost,
                _ => OriginalMethodState::Absent,
            });
        }

        match self.target.rename_own_method(&hidden_method, &self.method) {
            Ok(()) => {
                // Targets implementing the rename as an alias still bind the hidden name.
                if self.method_exists(&hidden_method) {
                    self.target
                        .remove_own_method(&hidden_method)
                        .with_context(|| format!("Could not unbind hidden method of `{self}`"))?;
                }
                Ok(OriginalMethodState::Restored)
            }
            Err(error) if is_rename_unsupported(&error) => {
                self.log_lost_original("Original method could not be restored", &error);
                Ok(OriginalMethodState::Lost)
            }
            Err(error) => Err(error)
                .with_context(|| format!("Could not restore original method of `{self}`")),
        }
    }

    fn log_lost_original(&self, message: &str, error: &anyhow::Error) {
        match self.configuration.lost_original_log_level {
            LostOriginalLogLevel::Silent => {}
            LostOriginalLogLevel::Debug => {
                debug!(self.logger, "{}", message; "error" => %error);
            }
            LostOriginalLogLevel::Warning => {
                warn!(self.logger, "{}", message; "error" => %error);
            }
        }
    }
}

fn is_rename_unsupported(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<MethodTableError>(),
        Some(MethodTableError::RenameUnsupported { .. })
    )
}

impl PartialEq for MethodStub {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.target), Arc::as_ptr(&other.target))
            && self.method == other.method
    }
}

impl Eq for MethodStub {}

impl Hash for MethodStub {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.target).cast::<()>().hash(state);
        self.method.hash(state);
    }
}

impl fmt::Display for MethodStub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.target.inspect(), self.method)
    }
}

impl fmt::Debug for MethodStub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodStub")
            .field("target", &self.target.inspect())
            .field("method", &self.method)
            .field("original", &self.original)
            .field("installed", &self.installed)
            .finish()
    }
}
