//! ConsoleController: drives one page through navigation, editing and saving.
//!
//! # State machine (for beginners)
//!
//! ```text
//!            navigate
//!   ──────► RESOLVING ──► LOADING ──► VIEW ◄─────────┐
//!                            │          │ edit        │ saved + refreshed
//!                            │ new      ▼             │
//!                            └────────► EDIT ──► SAVING
//!                                       ▲   save     │
//!                                       └────────────┘ rejected
//! ```
//!
//! # Stale responses
//!
//! Each navigation bumps a sequence number.  Work started for one navigation
//! remembers its number and, when its response arrives, applies it only if
//! the number is still current.  A response for a page the user has already
//! left is dropped and reported as [`ConsoleError::Superseded`].
//!
//! # One command at a time
//!
//! Saves queue on an async gate so at most one create/update is in flight.
//! Navigation does not wait on the gate: it abandons whatever the previous
//! page was doing.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use registrar_core::protocol::{
    Command, EppResponse, ResultCode, TransactionIdGenerator, Verb,
};
use registrar_core::tree::TreeValue;
use tracing::{debug, info, warn};

use crate::application::epp_client::EppClient;
use crate::application::form_binder::FormBinder;
use crate::application::session_manager::{AuthState, SessionManager};
use crate::application::transport::Transport;
use crate::domain::config::ConsoleConfig;
use crate::domain::error::{ConsoleError, Notice};
use crate::domain::form::FormError;
use crate::domain::location::Route;
use crate::domain::objects::ObjectKind;
use crate::domain::page::{ConsoleState, Page, PageMode, PageState};

/// First transaction number of a console session.
const FIRST_TRANSACTION: u64 = 1;

struct ControllerState {
    nav_seq: u64,
    state: ConsoleState,
    page: Option<Page>,
    notices: Vec<Notice>,
}

/// What a save sends, captured while the page is locked.
struct PreparedSave {
    kind: ObjectKind,
    binder: FormBinder,
    /// `None` when creating.
    key: Option<String>,
    /// The form at the start of editing, collected.
    before: TreeValue,
    after: TreeValue,
}

pub struct ConsoleController {
    client: Arc<EppClient>,
    session: SessionManager,
    inner: Mutex<ControllerState>,
    command_gate: tokio::sync::Mutex<()>,
}

impl ConsoleController {
    /// Builds a controller talking to the registrar through `transport`.
    ///
    /// A config carrying a client id and an anti-forgery token starts in
    /// transport auth; otherwise the session starts anonymous.
    pub fn new(transport: Arc<dyn Transport>, config: &ConsoleConfig) -> Self {
        let client = Arc::new(EppClient::new(
            transport,
            config.client_id.clone(),
            config.xsrf_token.clone(),
            TransactionIdGenerator::new(config.trid_prefix.clone(), FIRST_TRANSACTION),
        ));
        let initial = if config.has_web_session() {
            AuthState::TransportAuth
        } else {
            AuthState::Anonymous
        };
        let session = SessionManager::new(Arc::clone(&client), config.password.clone(), initial);
        Self {
            client,
            session,
            inner: Mutex::new(ControllerState {
                nav_seq: 0,
                state: ConsoleState::View,
                page: None,
                notices: Vec::new(),
            }),
            command_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn state(&self) -> ConsoleState {
        self.lock().state
    }

    /// A copy of the page currently shown, if any.
    pub fn page(&self) -> Option<Page> {
        self.lock().page.clone()
    }

    /// Removes and returns the notices raised since the last call.
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.lock().notices)
    }

    /// Opens the page at `location`.
    ///
    /// Unknown locations open the dashboard with a warning.  Object pages
    /// log in first; an existing object is then fetched with `info`, a new
    /// one opens in edit mode with an empty form.
    ///
    /// # Errors
    ///
    /// Any login or info failure (also recorded as a notice; the page stays
    /// empty and the console goes back to VIEW) or [`ConsoleError::Superseded`] when another navigation
    /// started before this one finished.
    pub async fn navigate(&self, location: &str) -> Result<(), ConsoleError> {
        let seq = {
            let mut inner = self.lock();
            inner.nav_seq += 1;
            inner.state = ConsoleState::Resolving;
            inner.nav_seq
        };
        info!(location, seq, "navigating");

        let route = match location.parse::<Route>() {
            Ok(route) => route,
            Err(err) => {
                warn!(location, "unknown location, showing dashboard");
                self.lock().notices.push(Notice::warning(err.to_string()));
                Route::Dashboard
            }
        };

        let (kind, key) = match route {
            Route::Dashboard => return self.show(seq, Page::Dashboard, ConsoleState::View),
            Route::Static(page) => return self.show(seq, Page::Static(page), ConsoleState::View),
            Route::Object { kind, key } => (kind, key),
        };

        self.apply(seq, |inner| {
            inner.page = None;
            inner.state = ConsoleState::Loading;
        })?;
        match self.load(kind, key.as_deref()).await {
            Ok(page) => {
                let state = match page.mode {
                    PageMode::Edit => ConsoleState::Edit,
                    PageMode::View => ConsoleState::View,
                };
                self.show(seq, Page::Object(page), state)?;
                debug!(%kind, key = key.as_deref().unwrap_or(""), "page loaded");
                Ok(())
            }
            Err(err) => {
                self.apply(seq, |inner| inner.state = ConsoleState::View)?;
                Err(self.report(seq, err))
            }
        }
    }

    /// Makes the current object page editable.  Does nothing if it already is.
    pub fn edit(&self) -> Result<(), ConsoleError> {
        let mut inner = self.lock();
        let ControllerState { state, page, .. } = &mut *inner;
        let page = object_page(page)?;
        if page.begin_edit() {
            *state = ConsoleState::Edit;
            debug!(kind = %page.kind, key = page.object_key, "editing");
        }
        Ok(())
    }

    /// Sets a field of the page being edited.
    pub fn set_field(&self, field: &str, value: &str) -> Result<(), ConsoleError> {
        self.with_form(|page| Ok(page.form.set(field, value)?))
    }

    /// Appends an empty row to a repeated group and returns its index.
    pub fn add_row(&self, group: &str) -> Result<usize, ConsoleError> {
        self.with_form(|page| Ok(page.form.add_row(group)?))
    }

    pub fn remove_row(&self, group: &str, index: usize) -> Result<(), ConsoleError> {
        self.with_form(|page| Ok(page.form.remove_row(group, index)?))
    }

    /// Leaves edit mode and puts every field back as it was when editing
    /// started.  Sends nothing.
    pub fn cancel(&self) -> Result<(), ConsoleError> {
        let mut inner = self.lock();
        let ControllerState { state, page, .. } = &mut *inner;
        let page = object_page(page)?;
        if *state == ConsoleState::Saving || !page.cancel_edit() {
            return Err(ConsoleError::NotEditing);
        }
        *state = ConsoleState::View;
        debug!(kind = %page.kind, key = page.object_key, "edit cancelled");
        Ok(())
    }

    /// Sends the edited page as a create or update, then fetches the object
    /// again so the page shows what the server stored.
    ///
    /// # Errors
    ///
    /// - A rejected or failed create/update returns the page to edit mode
    ///   with its fields untouched.
    /// - A failed refresh leaves the page in view mode showing the values
    ///   that were sent.
    ///
    /// Every failure is also recorded as a notice.
    pub async fn save(&self) -> Result<(), ConsoleError> {
        let _gate = self.command_gate.lock().await;

        let seq = self.lock().nav_seq;
        let PreparedSave {
            kind,
            binder,
            key,
            before,
            after,
        } = match self.begin_save() {
            Ok(prepared) => prepared,
            Err(err) => return Err(self.report(seq, err)),
        };

        let saved_key = match self.submit(kind, key.as_deref(), &before, &after).await {
            Ok(saved_key) => saved_key,
            Err(err) => {
                self.apply(seq, |inner| inner.state = ConsoleState::Edit)?;
                return Err(self.report(seq, err));
            }
        };

        let refreshed = self.fetch_info(kind, &saved_key).await;
        self.apply(seq, |inner| {
            if let Some(Page::Object(page)) = inner.page.as_mut() {
                page.mode = PageMode::View;
                page.snapshot = None;
                page.is_new = false;
                page.object_key = saved_key.clone();
                match &refreshed {
                    Ok((tree, extension)) => {
                        page.form = binder.project(tree);
                        page.current_tree = tree.clone();
                        page.extension = extension.clone();
                    }
                    // The server accepted `after`; it stands in until a
                    // refresh succeeds.
                    Err(_) => page.current_tree = after,
                }
            }
            inner.state = ConsoleState::View;
        })?;
        match refreshed {
            Ok(_) => {
                info!(%kind, key = saved_key, "saved");
                Ok(())
            }
            Err(err) => Err(self.report(seq, err)),
        }
    }

    /// Collects the edited form and the snapshot it started from, and moves
    /// to SAVING.
    fn begin_save(&self) -> Result<PreparedSave, ConsoleError> {
        let mut inner = self.lock();
        let ControllerState { state, page, .. } = &mut *inner;
        let page = object_page(page)?;
        if !page.is_editing() || *state == ConsoleState::Saving {
            return Err(ConsoleError::NotEditing);
        }
        let binder = binder_for(page.kind)?;
        let after = binder.collect(&page.form)?;
        let before = match &page.snapshot {
            Some(snapshot) if !page.is_new => binder.collect(snapshot.values())?,
            _ => TreeValue::new(),
        };
        let key = (!page.is_new).then(|| page.object_key.clone());
        *state = ConsoleState::Saving;
        Ok(PreparedSave {
            kind: page.kind,
            binder,
            key,
            before,
            after,
        })
    }

    /// Sends the create or update command and returns the object's key.
    async fn submit(
        &self,
        kind: ObjectKind,
        key: Option<&str>,
        before: &TreeValue,
        after: &TreeValue,
    ) -> Result<String, ConsoleError> {
        let saved_key = kind
            .saved_key(key, after)
            .ok_or_else(|| FormError::Required(kind.key_element().to_string()))?;
        let (verb, payload) = match key {
            None => (Verb::Create, kind.create_payload(after)),
            Some(key) => (
                Verb::Update,
                kind.update_payload(key, before, after).map_err(FormError::from)?,
            ),
        };
        self.session.ensure_logged_in().await?;
        let command = Command::object(verb, kind.namespace(), payload, self.client.next_cl_trid());
        info!(%verb, %kind, key = saved_key, "saving");
        self.run(&command).await?;
        Ok(saved_key)
    }

    async fn load(&self, kind: ObjectKind, key: Option<&str>) -> Result<PageState, ConsoleError> {
        self.session.ensure_logged_in().await?;
        let binder = binder_for(kind)?;
        match key {
            None => Ok(PageState::new_object(kind, binder.project(&TreeValue::new()))),
            Some(key) => {
                let (tree, extension) = self.fetch_info(kind, key).await?;
                let form = binder.project(&tree);
                Ok(PageState::loaded(kind, key, tree, extension, form))
            }
        }
    }

    /// Sends `info` for `key` and returns its `infData` and `<extension>`.
    async fn fetch_info(
        &self,
        kind: ObjectKind,
        key: &str,
    ) -> Result<(TreeValue, Option<TreeValue>), ConsoleError> {
        let command = Command::object(
            Verb::Info,
            kind.namespace(),
            kind.info_payload(key),
            self.client.next_cl_trid(),
        );
        let response = self.run(&command).await?;
        let element = kind.info_data_element();
        let data = response.payload(&element).cloned().ok_or_else(|| {
            ConsoleError::MalformedMarkup(format!("info response has no <{element}>"))
        })?;
        Ok((data, response.extension))
    }

    /// Executes a non-login command and turns failure codes into errors.
    async fn run(&self, command: &Command) -> Result<EppResponse, ConsoleError> {
        let response = self.client.execute(command).await?;
        if response.is_success() {
            return Ok(response);
        }
        if response.code == ResultCode::COMMAND_USE_ERROR
            || response.code == ResultCode::ENDING_SESSION
        {
            self.session.reset_protocol_auth();
        }
        warn!(
            verb = %command.verb(),
            code = %response.code,
            message = response.message.as_str(),
            "command rejected"
        );
        Err(ConsoleError::CommandRejected {
            code: response.code.0,
            message: response.message,
        })
    }

    /// Installs `page` if `seq` is still the current navigation.
    fn show(&self, seq: u64, page: Page, state: ConsoleState) -> Result<(), ConsoleError> {
        self.apply(seq, |inner| {
            inner.page = Some(page);
            inner.state = state;
        })
    }

    /// Runs `update` on the state unless a newer navigation has started.
    fn apply(
        &self,
        seq: u64,
        update: impl FnOnce(&mut ControllerState),
    ) -> Result<(), ConsoleError> {
        let mut inner = self.lock();
        if inner.nav_seq != seq {
            debug!(seq, current = inner.nav_seq, "dropping stale response");
            return Err(ConsoleError::Superseded);
        }
        update(&mut inner);
        Ok(())
    }

    /// Records `err` as a notice when it belongs to the current navigation,
    /// and hands it back for the caller.
    fn report(&self, seq: u64, err: ConsoleError) -> ConsoleError {
        let mut inner = self.lock();
        if inner.nav_seq != seq {
            debug!(seq, error = %err, "dropping error of abandoned page");
            return ConsoleError::Superseded;
        }
        inner.notices.push(err.to_notice());
        err
    }

    fn with_form<R>(
        &self,
        edit: impl FnOnce(&mut PageState) -> Result<R, ConsoleError>,
    ) -> Result<R, ConsoleError> {
        let mut inner = self.lock();
        let ControllerState { state, page, .. } = &mut *inner;
        let page = object_page(page)?;
        if !page.is_editing() || *state == ConsoleState::Saving {
            return Err(ConsoleError::NotEditing);
        }
        edit(page)
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn object_page(page: &mut Option<Page>) -> Result<&mut PageState, ConsoleError> {
    match page {
        Some(Page::Object(page)) => Ok(page),
        _ => Err(ConsoleError::NoActivePage),
    }
}

fn binder_for(kind: ObjectKind) -> Result<FormBinder, ConsoleError> {
    let specs = kind.field_specs().map_err(FormError::from)?;
    Ok(FormBinder::new(specs))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::transport::{MockTransport, TransportResponse};
    use crate::domain::error::Severity;
    use crate::domain::location::StaticPage;
    use mockall::Sequence;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const LOGIN_OK: &str = r#"<epp><response>
        <result code="1000"><msg>ok</msg></result>
        <trID><svTRID>s</svTRID></trID></response></epp>"#;

    const HOST_INFO: &str = r#"<epp><response>
        <result code="1000"><msg>ok</msg></result>
        <resData><host:infData>
          <host:name>ns1.justine.lol</host:name>
          <host:addr ip="v4">192.0.2.2</host:addr>
          <host:addr ip="v6">1080::8:800:200c:417a</host:addr>
        </host:infData></resData>
        <trID><svTRID>s</svTRID></trID></response></epp>"#;

    fn config() -> ConsoleConfig {
        ConsoleConfig {
            client_id: "jartine".to_string(),
            xsrf_token: "☢".to_string(),
            trid_prefix: "abc".to_string(),
            ..ConsoleConfig::default()
        }
    }

    fn expect(transport: &mut MockTransport, seq: &mut Sequence, marker: &'static str, body: &'static str) {
        transport
            .expect_send()
            .withf(move |request| request.body.contains(marker))
            .times(1)
            .in_sequence(seq)
            .returning(move |_| Ok(TransportResponse::ok(body)));
    }

    fn controller(transport: MockTransport) -> ConsoleController {
        ConsoleController::new(Arc::new(transport), &config())
    }

    #[tokio::test]
    async fn test_static_page_needs_no_login() {
        // Arrange: no expectations, so any send fails the test
        let console = controller(MockTransport::new());

        // Act
        console.navigate("#resources").await.unwrap();

        // Assert
        assert_eq!(console.page(), Some(Page::Static(StaticPage::Resources)));
        assert_eq!(console.state(), ConsoleState::View);
        assert_eq!(console.session().auth_state(), AuthState::TransportAuth);
    }

    #[tokio::test]
    async fn test_unknown_location_shows_dashboard_with_warning() {
        let console = controller(MockTransport::new());

        console.navigate("nonsense/a/b").await.unwrap();

        assert_eq!(console.page(), Some(Page::Dashboard));
        let notices = console.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Warning);
        assert!(console.take_notices().is_empty());
    }

    #[tokio::test]
    async fn test_navigate_logs_in_then_loads_object() {
        // Arrange
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        expect(&mut transport, &mut seq, "<login>", LOGIN_OK);
        expect(&mut transport, &mut seq, "<host:name>ns1.justine.lol</host:name>", HOST_INFO);
        let console = controller(transport);

        // Act
        console.navigate("host/ns1.justine.lol").await.unwrap();

        // Assert
        let Some(Page::Object(page)) = console.page() else {
            panic!("expected an object page");
        };
        assert_eq!(page.object_key, "ns1.justine.lol");
        assert_eq!(page.mode, PageMode::View);
        assert_eq!(page.form.get("host:addr[1].@ip"), Some("v6"));
        assert_eq!(console.state(), ConsoleState::View);
    }

    #[tokio::test]
    async fn test_new_object_page_opens_in_edit_without_info() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        expect(&mut transport, &mut seq, "<login>", LOGIN_OK);
        let console = controller(transport);

        console.navigate("host").await.unwrap();

        let Some(Page::Object(page)) = console.page() else {
            panic!("expected an object page");
        };
        assert!(page.is_new);
        assert_eq!(console.state(), ConsoleState::Edit);
        assert_eq!(page.form.row_count("host:addr").unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rejected_info_is_reported_and_page_stays_empty() {
        // Arrange
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        expect(&mut transport, &mut seq, "<login>", LOGIN_OK);
        expect(
            &mut transport,
            &mut seq,
            "<host:info",
            r#"<epp><response><result code="2303"><msg>Object does not exist</msg></result>
               <trID><svTRID>s</svTRID></trID></response></epp>"#,
        );
        let console = controller(transport);

        // Act
        let err = console.navigate("host/ns9.justine.lol").await.unwrap_err();

        // Assert
        assert_eq!(
            err,
            ConsoleError::CommandRejected {
                code: 2303,
                message: "Object does not exist".to_string()
            }
        );
        assert_eq!(console.page(), None);
        assert_eq!(console.take_notices()[0].severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_failed_load_does_not_stay_loading() {
        // Arrange
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        expect(&mut transport, &mut seq, "<login>", LOGIN_OK);
        expect(
            &mut transport,
            &mut seq,
            "<host:info",
            r#"<epp><response><result code="2303"><msg>Object does not exist</msg></result>
               <trID><svTRID>s</svTRID></trID></response></epp>"#,
        );
        let console = controller(transport);

        // Act
        assert!(console.navigate("host/ns9.justine.lol").await.is_err());

        // Assert
        assert_ne!(console.state(), ConsoleState::Loading);
        assert_eq!(console.state(), ConsoleState::View);
        assert_eq!(console.page(), None);
    }

    #[tokio::test]
    async fn test_object_page_without_web_session_is_refused() {
        // Arrange: no client id or token, and no expectations
        let console = ConsoleController::new(Arc::new(MockTransport::new()), &ConsoleConfig::default());

        // Act
        let err = console.navigate("host/ns1.justine.lol").await.unwrap_err();

        // Assert
        assert_eq!(err, ConsoleError::NoWebSession);
        assert_eq!(console.session().auth_state(), AuthState::Anonymous);
        assert_eq!(console.state(), ConsoleState::View);
        assert_eq!(console.page(), None);
    }

    #[tokio::test]
    async fn test_failed_login_does_not_stay_loading() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        expect(
            &mut transport,
            &mut seq,
            "<login>",
            r#"<epp><response><result code="2200"><msg>Authentication error</msg></result>
               <trID><svTRID>s</svTRID></trID></response></epp>"#,
        );
        let console = controller(transport);

        let err = console.navigate("host/ns1.justine.lol").await.unwrap_err();

        assert!(matches!(err, ConsoleError::AuthenticationFailed { code: 2200, .. }));
        assert_eq!(console.state(), ConsoleState::View);
    }

    #[tokio::test]
    async fn test_session_ended_response_forces_new_login() {
        // Arrange: the first info is answered as if the session had expired
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| request.body.contains("<login>"))
            .times(2)
            .returning(|_| Ok(TransportResponse::ok(LOGIN_OK)));
        let infos = AtomicUsize::new(0);
        transport
            .expect_send()
            .withf(|request| request.body.contains("<host:info"))
            .times(2)
            .returning(move |_| {
                let body = if infos.fetch_add(1, Ordering::SeqCst) == 0 {
                    r#"<epp><response><result code="2002"><msg>Registrar must be logged in</msg></result>
                       <trID><svTRID>s</svTRID></trID></response></epp>"#
                } else {
                    HOST_INFO
                };
                Ok(TransportResponse::ok(body))
            });
        let console = controller(transport);

        // Act
        assert!(console.navigate("host/ns1.justine.lol").await.is_err());
        assert_eq!(console.session().auth_state(), AuthState::TransportAuth);
        console.navigate("host/ns1.justine.lol").await.unwrap();

        // Assert
        assert_eq!(console.session().auth_state(), AuthState::ProtocolAuth);
    }

    #[tokio::test]
    async fn test_editing_requires_an_object_page() {
        let console = controller(MockTransport::new());
        console.navigate("dashboard").await.unwrap();

        assert_eq!(console.edit(), Err(ConsoleError::NoActivePage));
        assert_eq!(console.set_field("host:name", "x"), Err(ConsoleError::NoActivePage));
    }

    #[tokio::test]
    async fn test_set_field_outside_edit_mode_is_refused() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        expect(&mut transport, &mut seq, "<login>", LOGIN_OK);
        expect(&mut transport, &mut seq, "<host:info", HOST_INFO);
        let console = controller(transport);
        console.navigate("host/ns1.justine.lol").await.unwrap();

        assert_eq!(
            console.set_field("host:addr[0].value", "192.0.2.9"),
            Err(ConsoleError::NotEditing)
        );
        assert_eq!(console.cancel(), Err(ConsoleError::NotEditing));
    }

    #[tokio::test]
    async fn test_cancel_restores_rows_and_values() {
        // Arrange
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        expect(&mut transport, &mut seq, "<login>", LOGIN_OK);
        expect(&mut transport, &mut seq, "<host:info", HOST_INFO);
        let console = controller(transport);
        console.navigate("host/ns1.justine.lol").await.unwrap();
        let before = console.page();

        // Act
        console.edit().unwrap();
        console.set_field("host:addr[0].value", "192.0.2.9").unwrap();
        console.add_row("host:addr").unwrap();
        console.add_row("host:addr").unwrap();
        console.remove_row("host:addr", 1).unwrap();
        console.cancel().unwrap();

        // Assert
        assert_eq!(console.page(), before);
        assert_eq!(console.state(), ConsoleState::View);
    }

    #[tokio::test]
    async fn test_rejected_save_returns_to_edit_with_fields_untouched() {
        // Arrange
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        expect(&mut transport, &mut seq, "<login>", LOGIN_OK);
        expect(&mut transport, &mut seq, "<host:info", HOST_INFO);
        expect(
            &mut transport,
            &mut seq,
            "<host:update",
            r#"<epp><response><result code="2005"><msg>Parameter value syntax error</msg></result>
               <trID><svTRID>s</svTRID></trID></response></epp>"#,
        );
        let console = controller(transport);
        console.navigate("host/ns1.justine.lol").await.unwrap();
        console.edit().unwrap();
        console.set_field("host:addr[0].value", "not an address").unwrap();

        // Act
        let err = console.save().await.unwrap_err();

        // Assert
        assert!(matches!(err, ConsoleError::CommandRejected { code: 2005, .. }));
        assert_eq!(console.state(), ConsoleState::Edit);
        let Some(Page::Object(page)) = console.page() else {
            panic!("expected an object page");
        };
        assert!(page.is_editing());
        assert_eq!(page.form.get("host:addr[0].value"), Some("not an address"));
    }

    #[tokio::test]
    async fn test_failed_refresh_after_create_keeps_sent_tree() {
        // Arrange
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        expect(&mut transport, &mut seq, "<login>", LOGIN_OK);
        expect(&mut transport, &mut seq, "<host:create", LOGIN_OK);
        expect(
            &mut transport,
            &mut seq,
            "<host:info",
            r#"<epp><response><result code="2400"><msg>Command failed</msg></result>
               <trID><svTRID>s</svTRID></trID></response></epp>"#,
        );
        let console = controller(transport);
        console.navigate("host").await.unwrap();
        console.set_field("host:name", "ns2.justine.lol").unwrap();

        // Act
        let err = console.save().await.unwrap_err();

        // Assert
        assert!(matches!(err, ConsoleError::CommandRejected { code: 2400, .. }));
        assert_eq!(console.state(), ConsoleState::View);
        let Some(Page::Object(page)) = console.page() else {
            panic!("expected an object page");
        };
        assert!(!page.is_new);
        assert_eq!(page.object_key, "ns2.justine.lol");
        assert_eq!(
            page.current_tree.first("host:name").and_then(TreeValue::text),
            Some("ns2.justine.lol")
        );
    }

    #[tokio::test]
    async fn test_create_without_key_is_refused_before_sending() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        expect(&mut transport, &mut seq, "<login>", LOGIN_OK);
        let console = controller(transport);
        console.navigate("host").await.unwrap();

        let err = console.save().await.unwrap_err();

        assert_eq!(
            err,
            ConsoleError::Form(FormError::Required("host:name".to_string()))
        );
        assert_eq!(console.state(), ConsoleState::Edit);
    }
}
