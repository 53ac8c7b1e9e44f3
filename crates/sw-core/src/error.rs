use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Integer status reported for a successful call.
pub const STATUS_OK: i32 = 0;
/// Parameter or option code not recognized.
pub const ERR_API_OUTBOUNDS: i32 = 501;
/// The object model has not been opened.
pub const ERR_API_INPUTNOTOPEN: i32 = 502;
/// The run state forbids the call (running when it must not be, or vice versa).
pub const ERR_API_SIM_NRUNNING: i32 = 503;
/// The addressed object has the wrong subtype for the call.
pub const ERR_API_WRONG_TYPE: i32 = 504;
/// Object index out of range, or an opening ID that is not registered.
pub const ERR_API_OBJECT_INDEX: i32 = 505;

/// Failure kinds reported across the boundary.
///
/// Every kind is local and non-fatal; the caller decides whether to abort.
/// `code()` yields the stable integer status that scripted callers test for.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Object model is not open")]
    NotOpen,

    #[error("Simulation run is in progress")]
    AlreadyRunning,

    #[error("Simulation run has not started")]
    NotRunning,

    #[error("Object index out of range: {what} (index={index}, len={len})")]
    ObjectIndex {
        what: &'static str,
        index: i64,
        len: usize,
    },

    #[error("Parameter out of range: {what} (code={code})")]
    ParamOutOfRange { what: &'static str, code: i32 },

    #[error("Wrong object type: expected {expected}")]
    WrongType { expected: &'static str },

    #[error("Invalid date/time string: {input:?}")]
    InvalidDateTime { input: String },
}

impl ApiError {
    /// Integer status for this error kind.
    pub fn code(&self) -> i32 {
        match self {
            ApiError::NotOpen => ERR_API_INPUTNOTOPEN,
            ApiError::AlreadyRunning | ApiError::NotRunning => ERR_API_SIM_NRUNNING,
            ApiError::ObjectIndex { .. } => ERR_API_OBJECT_INDEX,
            ApiError::ParamOutOfRange { .. } | ApiError::InvalidDateTime { .. } => {
                ERR_API_OUTBOUNDS
            }
            ApiError::WrongType { .. } => ERR_API_WRONG_TYPE,
        }
    }

    /// Convenience constructor for an out-of-range object index.
    pub fn index(what: &'static str, index: i64, len: usize) -> Self {
        ApiError::ObjectIndex { what, index, len }
    }
}

/// Human-readable message for an integer status code.
pub fn error_message(code: i32) -> &'static str {
    match code {
        STATUS_OK => "",
        ERR_API_OUTBOUNDS => "API Error - parameter or option code out of bounds.",
        ERR_API_INPUTNOTOPEN => "API Error - project input has not been opened.",
        ERR_API_SIM_NRUNNING => "API Error - simulation run state does not permit this call.",
        ERR_API_WRONG_TYPE => "API Error - object is of the wrong type.",
        ERR_API_OBJECT_INDEX => "API Error - object index out of range.",
        _ => "API Error - unknown error code.",
    }
}
