//! Page and console state.
//!
//! The console shows at most one page at a time.  [`Page`] is a tagged union
//! of the page kinds; only object pages carry data, in a [`PageState`].

use registrar_core::tree::TreeValue;

use crate::domain::form::{FormSnapshot, FormValues};
use crate::domain::location::StaticPage;
use crate::domain::objects::ObjectKind;

/// Whether an object page's fields can be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    View,
    Edit,
}

/// Where the controller is in handling the current navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleState {
    /// Turning a location into a route.
    Resolving,
    /// Waiting for login or the info response.
    Loading,
    View,
    Edit,
    /// Waiting for a create/update response or the info refresh after it.
    Saving,
}

/// The page currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Static(StaticPage),
    Object(PageState),
}

/// In-memory state of the object page being shown or edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub kind: ObjectKind,
    /// Domain name, contact id or host name; empty for a new object.
    pub object_key: String,
    /// `true` until the object has been created on the server.
    pub is_new: bool,
    pub mode: PageMode,
    /// Last `infData` received for the object.
    pub current_tree: TreeValue,
    /// `<extension>` of the last info response, if any.
    pub extension: Option<TreeValue>,
    pub form: FormValues,
    /// Form values when editing started; `None` outside edit mode.
    pub snapshot: Option<FormSnapshot>,
}

impl PageState {
    /// A page showing an object fetched from the server.
    pub fn loaded(
        kind: ObjectKind,
        object_key: impl Into<String>,
        current_tree: TreeValue,
        extension: Option<TreeValue>,
        form: FormValues,
    ) -> Self {
        Self {
            kind,
            object_key: object_key.into(),
            is_new: false,
            mode: PageMode::View,
            current_tree,
            extension,
            form,
            snapshot: None,
        }
    }

    /// A page for an object that does not exist yet.  It starts in edit
    /// mode; cancelling returns to the empty form.
    pub fn new_object(kind: ObjectKind, form: FormValues) -> Self {
        let snapshot = Some(form.snapshot());
        Self {
            kind,
            object_key: String::new(),
            is_new: true,
            mode: PageMode::Edit,
            current_tree: TreeValue::new(),
            extension: None,
            form,
            snapshot,
        }
    }

    /// Enters edit mode.  Returns `false` if already editing.
    pub fn begin_edit(&mut self) -> bool {
        if self.mode == PageMode::Edit {
            return false;
        }
        self.snapshot = Some(self.form.snapshot());
        self.mode = PageMode::Edit;
        true
    }

    /// Leaves edit mode, putting every field back as it was.  Returns
    /// `false` if not editing.
    pub fn cancel_edit(&mut self) -> bool {
        if self.mode != PageMode::Edit {
            return false;
        }
        if let Some(snapshot) = self.snapshot.take() {
            self.form.restore(snapshot);
        }
        self.mode = PageMode::View;
        true
    }

    pub fn is_editing(&self) -> bool {
        self.mode == PageMode::Edit
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
