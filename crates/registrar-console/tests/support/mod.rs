//! Shared helpers for the console integration tests.
//!
//! [`ScriptedTransport`] plays the registrar: it holds a queue of expected
//! requests and canned responses.  Each request is checked against the next
//! entry (endpoint, anti-forgery header and body) and answered with its
//! response.  Bodies are compared as decoded trees, so whitespace and
//! attribute order do not matter; client transaction ids are ignored.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use registrar_console::application::{
    ConsoleController, Transport, TransportError, TransportRequest, TransportResponse,
};
use registrar_console::domain::ConsoleConfig;
use registrar_core::{decode, TreeValue};
use tokio::sync::oneshot;

pub const CLIENT_ID: &str = "jartine";
pub const XSRF_TOKEN: &str = "☢";

struct Exchange {
    request: TreeValue,
    response: String,
    hold: Option<oneshot::Receiver<()>>,
}

#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Exchange>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues one request/response pair.
    pub fn expect(&self, request: &str, response: impl Into<String>) {
        self.push(request, response.into(), None);
    }

    /// Queues a pair whose response is only sent once the returned sender
    /// fires.
    pub fn expect_held(&self, request: &str, response: impl Into<String>) -> oneshot::Sender<()> {
        let (release, hold) = oneshot::channel();
        self.push(request, response.into(), Some(hold));
        release
    }

    /// Number of queued exchanges not requested yet.
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }

    fn push(&self, request: &str, response: String, hold: Option<oneshot::Receiver<()>>) {
        let request = without_cl_trid(decode(request).expect("fixture request must decode"));
        self.script.lock().unwrap().push_back(Exchange {
            request,
            response,
            hold,
        });
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let exchange = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request:\n{}", request.body));

        assert_eq!(request.uri, format!("/registrar-xhr?clientId={CLIENT_ID}"));
        assert_eq!(request.header("X-CSRF-Token"), Some(XSRF_TOKEN));
        let sent = without_cl_trid(decode(&request.body).expect("request must decode"));
        assert_eq!(
            sent, exchange.request,
            "request body differs from the script:\n{}",
            request.body
        );

        if let Some(hold) = exchange.hold {
            let _ = hold.await;
        }
        Ok(TransportResponse::ok(exchange.response))
    }
}

fn without_cl_trid(mut document: TreeValue) -> TreeValue {
    if let Some(command) = document
        .child_mut("epp")
        .and_then(|epp| epp.get_mut(0))
        .and_then(|epp| epp.child_mut("command"))
        .and_then(|command| command.get_mut(0))
    {
        command.remove_child("clTRID");
    }
    document
}

/// A controller for `jartine` whose web session is already established.
pub fn console(transport: &Arc<ScriptedTransport>) -> ConsoleController {
    let config = ConsoleConfig {
        client_id: CLIENT_ID.to_string(),
        xsrf_token: XSRF_TOKEN.to_string(),
        trid_prefix: "abc".to_string(),
        ..ConsoleConfig::default()
    };
    ConsoleController::new(Arc::clone(transport) as Arc<dyn Transport>, &config)
}

// ── Fixtures ──────────────────────────────────────────────────────────────────

pub const LOGIN_REQUEST: &str = r#"<?xml version="1.0"?>
<epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
  <command>
    <login>
      <clID>jartine</clID>
      <pw>undefined</pw>
      <options>
        <version>1.0</version>
        <lang>en</lang>
      </options>
      <svcs>
        <objURI>urn:ietf:params:xml:ns:host-1.0</objURI>
        <objURI>urn:ietf:params:xml:ns:domain-1.0</objURI>
        <objURI>urn:ietf:params:xml:ns:contact-1.0</objURI>
      </svcs>
    </login>
    <clTRID>asdf-1235</clTRID>
  </command>
</epp>"#;

pub const ALREADY_LOGGED_IN: &str = r#"<?xml version="1.0"?>
<epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
  <response>
    <result code="2002">
      <msg>Registrar is already logged in</msg>
    </result>
    <trID>
      <clTRID>asdf-1235</clTRID>
      <svTRID>ytk1RO+8SmaDQxrTIdulnw==-3</svTRID>
    </trID>
  </response>
</epp>"#;

/// `info` request for a domain, with `hosts="all"`.
pub fn domain_info_request(name: &str) -> String {
    format!(
        r#"<epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
  <command>
    <info>
      <domain:info xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
        <domain:name hosts="all">{name}</domain:name>
      </domain:info>
    </info>
    <clTRID>abc-1234</clTRID>
  </command>
</epp>"#
    )
}

/// `infData` for justine.lol with the given registrant and password.
pub fn justine_info(registrant: &str, pw: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
  <response>
    <result code="1000">
      <msg>Command completed successfully</msg>
    </result>
    <resData>
      <domain:infData xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
        <domain:name>justine.lol</domain:name>
        <domain:roid>6-roid</domain:roid>
        <domain:status s="inactive"/>
        <domain:registrant>{registrant}</domain:registrant>
        <domain:contact type="admin">&lt;justine&gt;</domain:contact>
        <domain:contact type="billing">candycrush</domain:contact>
        <domain:contact type="tech">krieger</domain:contact>
        <domain:ns>
          <domain:hostObj>ns1.justine.lol</domain:hostObj>
          <domain:hostObj>ns2.justine.lol</domain:hostObj>
        </domain:ns>
        <domain:host>ns1.justine.lol</domain:host>
        <domain:clID>justine</domain:clID>
        <domain:crID>justine</domain:crID>
        <domain:crDate>2014-07-10T02:17:02Z</domain:crDate>
        <domain:exDate>2015-07-10T02:17:02Z</domain:exDate>
        <domain:authInfo>
          <domain:pw>{pw}</domain:pw>
        </domain:authInfo>
      </domain:infData>
    </resData>
    <trID>
      <clTRID>abc-1234</clTRID>
      <svTRID>ytk1RO+8SmaDQxrTIdulnw==-4</svTRID>
    </trID>
  </response>
</epp>"#
    )
}

/// A success response without data, e.g. to an update.
pub fn completed(message: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
  <response>
    <result code="1000">
      <msg>{message}</msg>
    </result>
    <trID>
      <clTRID>abc-1234</clTRID>
      <svTRID>214CjbYuTsijoP8sgyFUNg==-e</svTRID>
    </trID>
  </response>
</epp>"#
    )
}

/// A failure response with `code`.
pub fn failed(code: u16, message: &str) -> String {
    format!(
        r#"<epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
  <response>
    <result code="{code}"><msg>{message}</msg></result>
    <trID><clTRID>abc-1234</clTRID><svTRID>x-1</svTRID></trID>
  </response>
</epp>"#
    )
}

pub const BOG_CREATE_REQUEST: &str = r#"<?xml version="1.0"?>
<epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
  <command>
    <create>
      <domain:create xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
        <domain:name>bog.lol</domain:name>
        <domain:period unit="y">1</domain:period>
        <domain:registrant>Chris Pohl</domain:registrant>
        <domain:contact type="admin">BlutEngel</domain:contact>
        <domain:contact type="tech">Ravenous</domain:contact>
        <domain:contact type="billing">Dark Angels</domain:contact>
        <domain:authInfo>
          <domain:pw>attorney at lawl</domain:pw>
        </domain:authInfo>
      </domain:create>
    </create>
    <clTRID>abc-1234</clTRID>
  </command>
</epp>"#;

pub const BOG_CREATED: &str = r#"<?xml version="1.0"?>
<epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
  <response>
    <result code="1000">
      <msg>Command completed successfully</msg>
    </result>
    <resData>
      <domain:creData xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
        <domain:name>bog.lol</domain:name>
        <domain:crDate>2014-07-17T08:19:24Z</domain:crDate>
        <domain:exDate>2015-07-17T08:19:24Z</domain:exDate>
      </domain:creData>
    </resData>
    <trID>
      <clTRID>abc-1234</clTRID>
      <svTRID>OBPI6JvEQfOUaO8qGf+IKA==-7</svTRID>
    </trID>
  </response>
</epp>"#;

pub const BOG_INFO: &str = r#"<?xml version="1.0"?>
<epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
  <response>
    <result code="1000">
      <msg>Command completed successfully</msg>
    </result>
    <resData>
      <domain:infData xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
        <domain:name>bog.lol</domain:name>
        <domain:roid>1f-roid</domain:roid>
        <domain:status s="inactive"/>
        <domain:registrant>Chris Pohl</domain:registrant>
        <domain:contact type="admin">BlutEngel</domain:contact>
        <domain:contact type="tech">Ravenous</domain:contact>
        <domain:contact type="billing">Dark Angels</domain:contact>
        <domain:clID>justine</domain:clID>
        <domain:crID>justine</domain:crID>
        <domain:crDate>2014-07-17T08:19:24Z</domain:crDate>
        <domain:exDate>2015-07-17T08:19:24Z</domain:exDate>
        <domain:authInfo>
          <domain:pw>attorney at lawl</domain:pw>
        </domain:authInfo>
      </domain:infData>
    </resData>
    <extension>
      <rgp:infData xmlns:rgp="urn:ietf:params:xml:ns:rgp-1.0">
        <rgp:rgpStatus s="addPeriod"/>
      </rgp:infData>
    </extension>
    <trID>
      <clTRID>abc-1234</clTRID>
      <svTRID>OBPI6JvEQfOUaO8qGf+IKA==-8</svTRID>
    </trID>
  </response>
</epp>"#;

pub const PABLO_INFO_REQUEST: &str = r#"<epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
  <command>
    <info>
      <contact:info xmlns:contact="urn:ietf:params:xml:ns:contact-1.0">
        <contact:id>pabloistrad</contact:id>
      </contact:info>
    </info>
    <clTRID>abc-1234</clTRID>
  </command>
</epp>"#;

/// `infData` for the contact pabloistrad with the given email.
pub fn pablo_info(email: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<epp xmlns:domain="urn:ietf:params:xml:ns:domain-1.0"
     xmlns:contact="urn:ietf:params:xml:ns:contact-1.0"
     xmlns:host="urn:ietf:params:xml:ns:host-1.0"
     xmlns:launch="urn:ietf:params:xml:ns:launch-1.0"
     xmlns:rgp="urn:ietf:params:xml:ns:rgp-1.0"
     xmlns="urn:ietf:params:xml:ns:epp-1.0"
     xmlns:secDNS="urn:ietf:params:xml:ns:secDNS-1.1"
     xmlns:mark="urn:ietf:params:xml:ns:mark-1.0">
  <response>
    <result code="1000">
      <msg>Command completed successfully</msg>
    </result>
    <resData>
      <contact:infData>
        <contact:id>pabloistrad</contact:id>
        <contact:roid>1-roid</contact:roid>
        <contact:status s="ok"/>
        <contact:postalInfo type="int">
          <contact:name>name2</contact:name>
          <contact:addr>
            <contact:street></contact:street>
            <contact:city>city2</contact:city>
            <contact:cc>US</contact:cc>
          </contact:addr>
        </contact:postalInfo>
        <contact:voice/>
        <contact:fax/>
        <contact:email>{email}</contact:email>
        <contact:clID>daddy</contact:clID>
        <contact:crID>daddy</contact:crID>
        <contact:crDate>2014-05-06T22:16:36Z</contact:crDate>
        <contact:upID>daddy</contact:upID>
        <contact:upDate>2014-05-07T16:20:07Z</contact:upDate>
       <contact:authInfo>
          <contact:pw>asdfasdf</contact:pw>
        </contact:authInfo>
      </contact:infData>
    </resData>
    <trID>
      <clTRID>abc-1234</clTRID>
      <svTRID>c4O3B0pRRKKSrrXsJvxP5w==-2</svTRID>
    </trID>
  </response>
</epp>"#
    )
}
