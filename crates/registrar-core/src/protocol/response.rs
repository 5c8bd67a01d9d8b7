//! Reader for inbound EPP responses.
//!
//! ```text
//! <epp>
//!   <response>
//!     <result code="1000"><msg>Command completed successfully</msg></result>
//!     <resData>…</resData>          (optional)
//!     <extension>…</extension>      (optional)
//!     <trID><clTRID>…</clTRID><svTRID>…</svTRID></trID>
//!   </response>
//! </epp>
//! ```

use thiserror::Error;

use crate::tree::{decode, CodecError, TreeValue};

/// Numeric EPP result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResultCode(pub u16);

impl ResultCode {
    /// Command completed successfully.
    pub const SUCCESS: ResultCode = ResultCode(1000);
    /// Command completed successfully; ending session.
    pub const ENDING_SESSION: ResultCode = ResultCode(1500);
    /// Command use error.  Answers a login for a client that is already
    /// logged in, and any other command sent without a session.
    pub const COMMAND_USE_ERROR: ResultCode = ResultCode(2002);

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised while reading a response document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResponseError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A mandatory element such as `<result>` is absent.
    #[error("EPP response is missing <{0}>")]
    MissingElement(&'static str),

    #[error("EPP result code {0:?} is not a number")]
    InvalidCode(String),
}

/// The parts of a response the console acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EppResponse {
    pub code: ResultCode,
    pub message: String,
    /// The `<resData>` element, e.g. `{domain:infData: {…}}`.
    pub res_data: Option<TreeValue>,
    /// The `<extension>` element, kept as decoded.
    pub extension: Option<TreeValue>,
    pub cl_trid: Option<String>,
    pub sv_trid: Option<String>,
}

impl EppResponse {
    /// Decodes `markup` and reads the response out of it.
    pub fn parse(markup: &str) -> Result<Self, ResponseError> {
        let document = decode(markup)?;
        Self::from_document(&document)
    }

    /// Reads a response out of an already decoded document.
    ///
    /// When several `<result>` elements are present the first one decides
    /// the outcome.
    pub fn from_document(document: &TreeValue) -> Result<Self, ResponseError> {
        let response = document
            .descend(&["epp", "response"])
            .ok_or(ResponseError::MissingElement("response"))?;
        let result = response
            .first("result")
            .ok_or(ResponseError::MissingElement("result"))?;
        let raw_code = result
            .attribute("code")
            .ok_or(ResponseError::MissingElement("result code"))?;
        let code = raw_code
            .trim()
            .parse::<u16>()
            .map(ResultCode)
            .map_err(|_| ResponseError::InvalidCode(raw_code.to_string()))?;
        let message = result
            .first("msg")
            .and_then(TreeValue::text)
            .unwrap_or_default()
            .to_string();
        let tr_id = response.first("trID");
        let tr_text = |name: &str| {
            tr_id
                .and_then(|tr| tr.first(name))
                .and_then(TreeValue::text)
                .map(str::to_string)
        };

        Ok(Self {
            code,
            message,
            res_data: response.first("resData").cloned(),
            extension: response.first("extension").cloned(),
            cl_trid: tr_text("clTRID"),
            sv_trid: tr_text("svTRID"),
        })
    }

    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// Returns the named payload inside `<resData>`, e.g. `domain:infData`.
    pub fn payload(&self, element: &str) -> Option<&TreeValue> {
        self.res_data.as_ref().and_then(|data| data.first(element))
    }
}
