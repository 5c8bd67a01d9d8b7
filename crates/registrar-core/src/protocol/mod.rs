//! EPP envelope: command builders, response reader and transaction ids.

pub mod commands;
pub mod response;
pub mod transaction;

pub use commands::{Command, Verb};
pub use response::{EppResponse, ResponseError, ResultCode};
pub use transaction::TransactionIdGenerator;

/// Default namespace of every `<epp>` envelope.
pub const EPP_NAMESPACE: &str = "urn:ietf:params:xml:ns:epp-1.0";

/// An EPP object mapping: element prefix plus namespace URI.
///
/// Element names inside object payloads are qualified with the prefix
/// (`domain:name`) and the payload's top element declares
/// `xmlns:<prefix>="<uri>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectNamespace {
    pub prefix: &'static str,
    pub uri: &'static str,
}

impl ObjectNamespace {
    pub const DOMAIN: ObjectNamespace = ObjectNamespace {
        prefix: "domain",
        uri: "urn:ietf:params:xml:ns:domain-1.0",
    };
    pub const CONTACT: ObjectNamespace = ObjectNamespace {
        prefix: "contact",
        uri: "urn:ietf:params:xml:ns:contact-1.0",
    };
    pub const HOST: ObjectNamespace = ObjectNamespace {
        prefix: "host",
        uri: "urn:ietf:params:xml:ns:host-1.0",
    };

    /// Object URIs announced in `<login><svcs>`, in the order the registry
    /// console has always sent them.
    pub const LOGIN_SERVICES: [ObjectNamespace; 3] = [Self::HOST, Self::DOMAIN, Self::CONTACT];

    /// `qualify("name")` on the domain mapping gives `domain:name`.
    pub fn qualify(&self, local: &str) -> String {
        format!("{}:{}", self.prefix, local)
    }

    /// Attribute name of the namespace declaration, e.g. `xmlns:domain`.
    pub fn declaration(&self) -> String {
        format!("xmlns:{}", self.prefix)
    }
}
