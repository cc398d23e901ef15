// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors raised by element-tree queries.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomError {
    /// A selector could not be parsed.
    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector {
        /// The selector text.
        selector: String,
        /// What the parser choked on.
        reason: String,
    },
}
