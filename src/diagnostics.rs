// ABOUTME: Diagnostics accumulator for failures that are swallowed on purpose.
// ABOUTME: Best-effort steps (kill, rm, close-port) record a warning instead of aborting the hook.

/// Collects non-fatal warnings during one hook invocation.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// A non-fatal warning collected during a hook.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn kill_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::KillFailed,
            message: message.into(),
        }
    }

    pub fn remove_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::RemoveFailed,
            message: message.into(),
        }
    }

    pub fn close_port_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ClosePortFailed,
            message: message.into(),
        }
    }
}

/// Categories of swallowed failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The container could not be killed (often: it does not exist).
    KillFailed,
    /// The container could not be removed.
    RemoveFailed,
    /// The previously opened port could not be closed.
    ClosePortFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_starts_empty() {
        let diag = Diagnostics::default();
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn diagnostics_collects_warnings_in_order() {
        let mut diag = Diagnostics::default();

        diag.warn(Warning::kill_failed("no such container: docker-nginx"));
        diag.warn(Warning::remove_failed("no such container: docker-nginx"));
        diag.warn(Warning::close_port_failed("close-port exited with 1"));

        let kinds: Vec<_> = diag.warnings().iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![
                WarningKind::KillFailed,
                WarningKind::RemoveFailed,
                WarningKind::ClosePortFailed
            ]
        );
    }
}
