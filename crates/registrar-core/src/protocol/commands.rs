//! Builders for outbound EPP commands.
//!
//! Every command has the same envelope:
//!
//! ```text
//! <epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
//!   <command>
//!     <info>                      ← the verb
//!       <domain:info xmlns:domain="…">…</domain:info>
//!     </info>
//!     <clTRID>abc-1234</clTRID>
//!   </command>
//! </epp>
//! ```
//!
//! Only the verb element's content differs between commands, so builders
//! produce a [`Command`] holding a complete document [`TreeValue`] that the
//! codec turns into markup.

use crate::protocol::{ObjectNamespace, EPP_NAMESPACE};
use crate::tree::{encode, CodecError, TreeValue};

/// Text sent as `<pw>` when no password is configured.
pub const MISSING_PASSWORD: &str = "undefined";

/// The command verbs the console issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Login,
    Info,
    Create,
    Update,
}

impl Verb {
    /// Element name of the verb, also used for the object element
    /// (`<info>` wraps `<domain:info>`).
    pub fn element_name(self) -> &'static str {
        match self {
            Verb::Login => "login",
            Verb::Info => "info",
            Verb::Create => "create",
            Verb::Update => "update",
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.element_name())
    }
}

/// One outbound command document together with the metadata needed to
/// correlate its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    verb: Verb,
    cl_trid: String,
    document: TreeValue,
}

impl Command {
    /// Builds a `<login>` command.
    ///
    /// `password` of `None` is sent as the literal text `undefined`, which is
    /// what registrar sessions authenticated by the web front end send.
    pub fn login(client_id: &str, password: Option<&str>, cl_trid: impl Into<String>) -> Self {
        let options = TreeValue::new()
            .child_with("version", TreeValue::with_text("1.0"))
            .child_with("lang", TreeValue::with_text("en"));
        let svcs = ObjectNamespace::LOGIN_SERVICES
            .iter()
            .fold(TreeValue::new(), |svcs, ns| {
                svcs.child_with("objURI", TreeValue::with_text(ns.uri))
            });
        let body = TreeValue::new()
            .child_with("clID", TreeValue::with_text(client_id))
            .child_with(
                "pw",
                TreeValue::with_text(password.unwrap_or(MISSING_PASSWORD)),
            )
            .child_with("options", options)
            .child_with("svcs", svcs);
        Self::wrap(Verb::Login, body, cl_trid.into())
    }

    /// Builds an object command such as `<info><domain:info …>`.
    ///
    /// `payload` is the content of the object element (for an info command,
    /// e.g. `{domain:name: {@hosts: "all", #text: "justine.lol"}}`); the
    /// namespace declaration is added here.
    pub fn object(
        verb: Verb,
        namespace: ObjectNamespace,
        mut payload: TreeValue,
        cl_trid: impl Into<String>,
    ) -> Self {
        payload.set_attribute(namespace.declaration(), namespace.uri);
        let body = TreeValue::new().child_with(namespace.qualify(verb.element_name()), payload);
        Self::wrap(verb, body, cl_trid.into())
    }

    fn wrap(verb: Verb, body: TreeValue, cl_trid: String) -> Self {
        let command = TreeValue::new()
            .child_with(verb.element_name(), body)
            .child_with("clTRID", TreeValue::with_text(cl_trid.clone()));
        let envelope = TreeValue::new()
            .attr("xmlns", EPP_NAMESPACE)
            .child_with("command", command);
        Self {
            verb,
            cl_trid,
            document: TreeValue::document("epp", envelope),
        }
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn cl_trid(&self) -> &str {
        &self.cl_trid
    }

    pub fn document(&self) -> &TreeValue {
        &self.document
    }

    /// Renders the command as markup ready for the transport.
    pub fn encode(&self) -> Result<String, CodecError> {
        encode(&self.document)
    }
}
