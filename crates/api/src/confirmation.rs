// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Confirmation code generation and dispatch.
//!
//! Completing a visit requires the customer to read back a short code.
//! Verification happens at the gateway; this module only generates the
//! code and decides whether it goes out over SMS or comes back in the
//! response (development mode).

use serde::Serialize;

/// How confirmation codes leave the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Hand the code to the SMS gateway and keep it out of the response.
    Sms,
    /// Return the code in the response for development and testing.
    DevReturn,
}

/// The result of dispatching a confirmation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationDispatch {
    /// The phone number the code was sent to.
    pub phone: String,
    /// The code itself, present only in development mode.
    pub code: Option<String>,
}

/// Generates a four-digit confirmation code.
#[must_use]
pub fn generate_code() -> String {
    format!("{:04}", rand::random::<u16>() % 10000)
}

/// Dispatches a confirmation code to a customer phone.
///
/// In SMS mode the code is handed to the gateway and only the dispatch
/// record is returned; in development mode the code rides back in the
/// response.
#[must_use]
pub fn dispatch_code(phone: &str, mode: DispatchMode) -> ConfirmationDispatch {
    let code: String = generate_code();
    match mode {
        DispatchMode::Sms => {
            tracing::info!(phone, "dispatched confirmation code over SMS");
            ConfirmationDispatch {
                phone: phone.to_string(),
                code: None,
            }
        }
        DispatchMode::DevReturn => ConfirmationDispatch {
            phone: phone.to_string(),
            code: Some(code),
        },
    }
}
