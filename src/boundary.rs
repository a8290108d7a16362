// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use log::error;

use crate::error::Result;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Recovery {
    Reload,
    Home,
}

/// Stops a view that fails to render from taking the shell down with it.
///
/// After the first fault every render shows the recovery screen until
/// [`Boundary::reset`] is called.
#[derive(Debug, Default)]
pub(crate) struct Boundary {
    fault: Option<String>,
}

fn describe_panic(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}

impl Boundary {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) const fn is_tripped(&self) -> bool {
        self.fault.is_some()
    }

    pub(crate) fn contain<F: FnOnce() -> Result<String>>(&mut self, render: F) -> String {
        if self.is_tripped() {
            return self.recovery_view();
        }

        let description = match panic::catch_unwind(AssertUnwindSafe(render)) {
            Ok(Ok(output)) => return output,
            Ok(Err(e)) => e.to_string(),
            Err(payload) => describe_panic(payload.as_ref()),
        };
        error!("A view failed to render: {}", description);
        self.fault = Some(description);
        self.recovery_view()
    }

    pub(crate) fn recovery_view(&self) -> String {
        [
            "Something went wrong while showing this page.",
            "",
            "  reload   start over",
            "  home     go back to the dashboard",
            "  details  show what went wrong",
        ]
        .join("\n")
    }

    /// The collapsed diagnostic region of the recovery screen.
    pub(crate) fn details(&self) -> Option<String> {
        self.fault.as_ref().map(|fault| format!("Details: {fault}"))
    }

    /// Clears the fault for `recovery` and reports where to go next.
    pub(crate) fn reset(&mut self, recovery: Recovery) -> Recovery {
        self.fault = None;
        recovery
    }
}
