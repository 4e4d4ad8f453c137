use crate::options::RenderOptions;

/// Outcome of the handler as reported by the host framework.
///
/// Handlers (or the framework adapter) insert this into the response
/// extensions. A response without it is treated as a clean success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionState {
    /// The handler raised an exception.
    pub exception: bool,
    /// The exception was handled and the response is a normal one.
    pub exception_handled: bool,
    /// The request was canceled.
    pub canceled: bool,
    /// The input model passed validation.
    pub model_valid: bool,
}

impl Default for ExecutionState {
    fn default() -> Self {
        Self {
            exception: false,
            exception_handled: false,
            canceled: false,
            model_valid: true,
        }
    }
}

/// Why a response is not rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The handler raised an exception nobody handled.
    UnhandledException,
    /// The request was canceled.
    Canceled,
    /// Model validation failed.
    InvalidModel,
    /// Neither the handler nor its group enabled rendering.
    NotEnabled,
}

/// Decision of the eligibility gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    /// Render the response with these options.
    Render(RenderOptions),
    /// Leave the response untouched.
    Skip(SkipReason),
}

/// Decides whether a response is rendered and with which options.
///
/// Failed, canceled and invalid-model responses are never rendered.
/// Otherwise handler options replace group options wholesale.
pub fn resolve(
    state: &ExecutionState,
    group: Option<&RenderOptions>,
    handler: Option<&RenderOptions>,
) -> Eligibility {
    if state.exception && !state.exception_handled {
        return Eligibility::Skip(SkipReason::UnhandledException);
    }
    if state.canceled {
        return Eligibility::Skip(SkipReason::Canceled);
    }
    if !state.model_valid {
        return Eligibility::Skip(SkipReason::InvalidModel);
    }

    match handler.or(group) {
        Some(options) => Eligibility::Render(options.clone()),
        None => Eligibility::Skip(SkipReason::NotEnabled),
    }
}
