//! The EPP object kinds the console can show and edit.
//!
//! Each kind knows its namespace, the element that carries its key, the form
//! fields of its page, and how to shape a collected form tree into the
//! payload of an `info`, `create` or `update` command.
//!
//! # Update payloads (for beginners)
//!
//! EPP updates are not "replace the object with this".  They list changes:
//!
//! ```text
//! <domain:update>
//!   <domain:name>justine.lol</domain:name>      which object
//!   <domain:add>…</domain:add>                  rows to add to repeated groups
//!   <domain:rem>…</domain:rem>                  rows to remove from them
//!   <domain:chg>…</domain:chg>                  new values of single fields
//! </domain:update>
//! ```
//!
//! [`ObjectKind::update_payload`] derives these sections by comparing the
//! form as it is now with the form as it was when editing started.

use std::fmt;
use std::str::FromStr;

use registrar_core::protocol::ObjectNamespace;
use registrar_core::tree::{FieldPath, Node, PathError, TreeValue};

use crate::domain::form::FieldSpec;

/// Capacity of a contact's `postalInfo` group (one `int`, one `loc`).
pub const POSTAL_INFO_MAX_ROWS: usize = 2;

/// A kind of EPP object with a page in the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Domain,
    Contact,
    Host,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownObjectKind(pub String);

impl FromStr for ObjectKind {
    type Err = UnknownObjectKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domain" => Ok(ObjectKind::Domain),
            "contact" => Ok(ObjectKind::Contact),
            "host" => Ok(ObjectKind::Host),
            other => Err(UnknownObjectKind(other.to_string())),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace().prefix)
    }
}

impl ObjectKind {
    pub fn namespace(self) -> ObjectNamespace {
        match self {
            ObjectKind::Domain => ObjectNamespace::DOMAIN,
            ObjectKind::Contact => ObjectNamespace::CONTACT,
            ObjectKind::Host => ObjectNamespace::HOST,
        }
    }

    /// Element holding the object's key, e.g. `domain:name`.
    pub fn key_element(self) -> &'static str {
        match self {
            ObjectKind::Domain => "domain:name",
            ObjectKind::Contact => "contact:id",
            ObjectKind::Host => "host:name",
        }
    }

    /// Element inside `<resData>` that answers an info command.
    pub fn info_data_element(self) -> String {
        self.namespace().qualify("infData")
    }

    /// Content of the `<x:info>` element for `key`.
    pub fn info_payload(self, key: &str) -> TreeValue {
        let mut name = TreeValue::with_text(key);
        if self == ObjectKind::Domain {
            name.set_attribute("hosts", "all");
        }
        TreeValue::new().child_with(self.key_element(), name)
    }

    /// Form fields of the object's page, in the order EPP lists them.
    pub fn field_specs(self) -> Result<Vec<FieldSpec>, PathError> {
        match self {
            ObjectKind::Domain => Ok(vec![
                FieldSpec::scalar("domain:name")?,
                FieldSpec::scalar("domain:roid")?,
                FieldSpec::scalar("domain:period")?,
                FieldSpec::group("domain:status", &["@s"], None)?,
                FieldSpec::scalar("domain:registrant")?,
                FieldSpec::group("domain:contact", &["value", "@type"], None)?,
                FieldSpec::group("domain:ns.domain:hostObj", &["value"], None)?,
                FieldSpec::group("domain:host", &["value"], None)?,
                FieldSpec::scalar("domain:clID")?,
                FieldSpec::scalar("domain:crID")?,
                FieldSpec::scalar("domain:crDate")?,
                FieldSpec::scalar("domain:upID")?,
                FieldSpec::scalar("domain:upDate")?,
                FieldSpec::scalar("domain:exDate")?,
                FieldSpec::scalar("domain:authInfo.domain:pw")?,
            ]),
            ObjectKind::Contact => Ok(vec![
                FieldSpec::scalar("contact:id")?,
                FieldSpec::scalar("contact:roid")?,
                FieldSpec::group("contact:status", &["@s"], None)?,
                FieldSpec::group(
                    "contact:postalInfo",
                    &[
                        "@type",
                        "contact:name",
                        "contact:org",
                        "contact:addr.contact:street[0]",
                        "contact:addr.contact:street[1]",
                        "contact:addr.contact:street[2]",
                        "contact:addr.contact:city",
                        "contact:addr.contact:sp",
                        "contact:addr.contact:pc",
                        "contact:addr.contact:cc",
                    ],
                    Some(POSTAL_INFO_MAX_ROWS),
                )?,
                FieldSpec::scalar("contact:voice")?,
                FieldSpec::scalar("contact:fax")?,
                FieldSpec::scalar("contact:email")?,
                FieldSpec::scalar("contact:clID")?,
                FieldSpec::scalar("contact:crID")?,
                FieldSpec::scalar("contact:crDate")?,
                FieldSpec::scalar("contact:upID")?,
                FieldSpec::scalar("contact:upDate")?,
                FieldSpec::scalar("contact:authInfo.contact:pw")?,
            ]),
            ObjectKind::Host => Ok(vec![
                FieldSpec::scalar("host:name")?,
                FieldSpec::scalar("host:roid")?,
                FieldSpec::group("host:status", &["@s"], None)?,
                FieldSpec::group("host:addr", &["value", "@ip"], None)?,
                FieldSpec::scalar("host:clID")?,
                FieldSpec::scalar("host:crID")?,
                FieldSpec::scalar("host:crDate")?,
                FieldSpec::scalar("host:upID")?,
                FieldSpec::scalar("host:upDate")?,
            ]),
        }
    }

    /// Top-level elements a create command carries, in schema order.
    fn create_elements(self) -> &'static [&'static str] {
        match self {
            ObjectKind::Domain => &[
                "domain:name",
                "domain:period",
                "domain:ns",
                "domain:registrant",
                "domain:contact",
                "domain:authInfo",
            ],
            ObjectKind::Contact => &[
                "contact:id",
                "contact:postalInfo",
                "contact:voice",
                "contact:fax",
                "contact:email",
                "contact:authInfo",
            ],
            ObjectKind::Host => &["host:name", "host:addr"],
        }
    }

    /// Repeated groups an update changes through `<x:add>`/`<x:rem>`.
    fn add_remove_groups(self) -> &'static [&'static str] {
        match self {
            ObjectKind::Domain => &["domain:ns.domain:hostObj", "domain:contact", "domain:status"],
            ObjectKind::Contact => &["contact:status"],
            ObjectKind::Host => &["host:addr", "host:status"],
        }
    }

    /// Top-level elements an update replaces through `<x:chg>`.
    fn changeable_elements(self) -> &'static [&'static str] {
        match self {
            ObjectKind::Domain => &["domain:registrant", "domain:authInfo"],
            ObjectKind::Contact => &[
                "contact:postalInfo",
                "contact:voice",
                "contact:fax",
                "contact:email",
                "contact:authInfo",
            ],
            ObjectKind::Host => &["host:name"],
        }
    }

    /// Content of the `<x:create>` element built from a collected form.
    ///
    /// Only elements a create accepts are kept.  A domain period is always
    /// expressed in years.
    pub fn create_payload(self, collected: &TreeValue) -> TreeValue {
        let mut payload = TreeValue::new();
        for name in self.create_elements() {
            if let Some(node) = collected.child(name) {
                payload.set_child(*name, node.clone());
            }
        }
        if let Some(period) = payload
            .child_mut("domain:period")
            .and_then(|node| node.get_mut(0))
        {
            period.set_attribute("unit", "y");
        }
        payload
    }

    /// Key the object has once saving `collected` succeeds.
    ///
    /// A create (`key` of `None`) takes the key typed into the form.  An
    /// update keeps `key` unless the kind can be renamed through `<x:chg>`.
    pub fn saved_key(self, key: Option<&str>, collected: &TreeValue) -> Option<String> {
        let typed = collected
            .first(self.key_element())
            .and_then(TreeValue::text)
            .filter(|typed| !typed.is_empty());
        match key {
            None => typed.map(str::to_string),
            Some(key) if self.changeable_elements().contains(&self.key_element()) => {
                Some(typed.unwrap_or(key).to_string())
            }
            Some(key) => Some(key.to_string()),
        }
    }

    /// Content of the `<x:update>` element for the object `key`.
    ///
    /// `before` is the form collected from the edit snapshot and `after` the
    /// form collected now.  Sections with nothing in them are left out.
    pub fn update_payload(
        self,
        key: &str,
        before: &TreeValue,
        after: &TreeValue,
    ) -> Result<TreeValue, PathError> {
        let ns = self.namespace();
        let mut add = TreeValue::new();
        let mut rem = TreeValue::new();
        for group in self.add_remove_groups() {
            let path: FieldPath = group.parse()?;
            let old_rows = path.elements(before);
            let new_rows = path.elements(after);
            let added = unmatched(new_rows, old_rows);
            if !added.is_empty() {
                path.set_elements(&mut add, added)?;
            }
            let removed = unmatched(old_rows, new_rows);
            if !removed.is_empty() {
                path.set_elements(&mut rem, removed)?;
            }
        }

        let mut chg = TreeValue::new();
        for name in self.changeable_elements() {
            match (before.child(name), after.child(name)) {
                (old, Some(new)) if old != Some(new) => chg.set_child(*name, new.clone()),
                // A cleared field is sent empty so the server clears it too.
                (Some(_), None) => chg.set_child(*name, Node::Single(TreeValue::new())),
                _ => {}
            }
        }

        let mut payload =
            TreeValue::new().child_with(self.key_element(), TreeValue::with_text(key));
        for (section, value) in [("add", add), ("rem", rem), ("chg", chg)] {
            if !value.is_empty() {
                payload.set_child(ns.qualify(section), Node::Single(value));
            }
        }
        Ok(payload)
    }
}

/// Rows of `rows` that have no equal partner in `others`.  Each row in
/// `others` can pair with one row only, so duplicates are counted.
fn unmatched(rows: &[TreeValue], others: &[TreeValue]) -> Vec<TreeValue> {
    let mut used = vec![false; others.len()];
    rows.iter()
        .filter(|row| {
            match others
                .iter()
                .enumerate()
                .position(|(i, other)| !used[i] && other == *row)
            {
                Some(i) => {
                    used[i] = true;
                    false
                }
                None => true,
            }
        })
        .cloned()
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
