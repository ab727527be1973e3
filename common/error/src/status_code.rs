//! Status codes for error classification.
//!
//! Format: XX_YYY (5-digit)
//! - XX = category (00-99)
//! - YYY = code within category (000-999)

use strum::AsRefStr;
use strum::EnumIter;
use strum::FromRepr;

/// Retry/logging metadata attached to a [`StatusCode`].
#[derive(Debug, Clone, Copy)]
pub struct StatusMeta {
    pub retryable: bool,
    pub log_error: bool,
    pub category: StatusCategory,
}

/// Coarse grouping of [`StatusCode`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    Success,
    Common,
    Input,
    IO,
    Network,
    Auth,
    Config,
    Provider,
    Tool,
    Resource,
}

macro_rules! define_status_codes {
    ($(
        $(#[$attr:meta])*
        $name:ident = $value:expr => {
            retryable: $retry:expr,
            log_error: $log:expr,
            category: $cat:ident $(,)?
        }
    ),* $(,)?) => {
        /// Status codes for error classification across the workspace.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumIter, FromRepr)]
        #[repr(i32)]
        pub enum StatusCode {
            $($(#[$attr])* $name = $value,)*
        }

        impl StatusCode {
            /// Returns the metadata for this status code.
            pub const fn meta(&self) -> StatusMeta {
                match self {
                    $(Self::$name => StatusMeta {
                        retryable: $retry,
                        log_error: $log,
                        category: StatusCategory::$cat,
                    },)*
                }
            }

            /// Returns the string name of this status code.
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Self::$name => stringify!($name),)*
                }
            }
        }

        const _: () = {
            const CODES: &[i32] = &[$($value),*];
            const fn check_unique() {
                let mut i = 0;
                while i < CODES.len() {
                    let mut j = i + 1;
                    while j < CODES.len() {
                        if CODES[i] == CODES[j] {
                            panic!("duplicate status code value");
                        }
                        j += 1;
                    }
                    i += 1;
                }
            }
            check_unique();
        };
    };
}

define_status_codes! {
    // ====== Success (00_xxx) ======
    Success = 00_000 => { retryable: false, log_error: false, category: Success },

    // ====== Common (01_xxx) ======
    Unknown = 01_000 => { retryable: false, log_error: true, category: Common },
    Internal = 01_001 => { retryable: false, log_error: true, category: Common },
    Unsupported = 01_002 => { retryable: false, log_error: false, category: Common },
    Cancelled = 01_003 => { retryable: false, log_error: false, category: Common },

    // ====== Input (02_xxx) ======
    InvalidArguments = 02_000 => { retryable: false, log_error: false, category: Input },
    ParseError = 02_001 => { retryable: false, log_error: false, category: Input },
    InvalidJson = 02_002 => { retryable: false, log_error: false, category: Input },
    SchemaValidation = 02_003 => { retryable: false, log_error: false, category: Input },

    // ====== IO (03_xxx) ======
    IoError = 03_000 => { retryable: false, log_error: false, category: IO },
    FileNotFound = 03_001 => { retryable: false, log_error: false, category: IO },
    CorruptRecord = 03_002 => { retryable: false, log_error: true, category: IO },

    // ====== Network (04_xxx) ======
    NetworkError = 04_000 => { retryable: true, log_error: false, category: Network },
    ConnectionFailed = 04_001 => { retryable: true, log_error: false, category: Network },
    ServiceUnavailable = 04_002 => { retryable: true, log_error: false, category: Network },
    RateLimited = 04_003 => { retryable: true, log_error: false, category: Network },
    ProtocolError = 04_004 => { retryable: true, log_error: true, category: Network },

    // ====== Auth (05_xxx) ======
    AuthenticationFailed = 05_000 => { retryable: false, log_error: false, category: Auth },
    PermissionDenied = 05_001 => { retryable: false, log_error: false, category: Auth },

    // ====== Config (10_xxx) ======
    InvalidConfig = 10_000 => { retryable: false, log_error: false, category: Config },
    ConfigFileError = 10_001 => { retryable: false, log_error: false, category: Config },

    // ====== Provider (11_xxx) ======
    ProviderNotFound = 11_000 => { retryable: false, log_error: false, category: Provider },
    ModelNotFound = 11_001 => { retryable: false, log_error: false, category: Provider },
    ContextWindowExceeded = 11_002 => { retryable: false, log_error: false, category: Provider },
    ProviderError = 11_003 => { retryable: false, log_error: true, category: Provider },

    // ====== Tool (13_xxx) ======
    ToolNotFound = 13_000 => { retryable: false, log_error: false, category: Tool },
    ToolExecutionFailed = 13_001 => { retryable: false, log_error: false, category: Tool },
    ToolRejected = 13_002 => { retryable: false, log_error: false, category: Tool },

    // ====== Resource (12_xxx) ======
    ResourcesExhausted = 12_000 => { retryable: true, log_error: false, category: Resource },
    Timeout = 12_001 => { retryable: true, log_error: false, category: Resource },
    DeadlineExceeded = 12_002 => { retryable: false, log_error: false, category: Resource },
}

impl StatusCode {
    /// Returns true if the error is retryable.
    pub const fn is_retryable(&self) -> bool {
        self.meta().retryable
    }

    /// Returns true if the error should be logged at error level.
    pub const fn should_log_error(&self) -> bool {
        self.meta().log_error
    }

    /// Returns the category of this status code.
    pub const fn category(&self) -> StatusCategory {
        self.meta().category
    }

    /// Converts from the raw i32 representation.
    pub fn from_i32(value: i32) -> Option<Self> {
        Self::from_repr(value)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
#[path = "status_code.test.rs"]
mod tests;
