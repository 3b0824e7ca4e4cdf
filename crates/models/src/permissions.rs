//! Fine-grained control over actions a caller can take on repository
//! resources.
//!
//! Authorization is a pure function of the caller's role, the requested
//! action, and the resource snapshot. The per-role grants live in a static
//! capability table ([`Role::capabilities`]); two predicates narrow the
//! table further: workflow-state readability and the PDF rendering policy.

use bitflags::bitflags;
use failure::Fail;
use plinth_error::{ApiError, StatusCode};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::models::{
    Collection,
    FileSet,
    Resource,
    ResourceType,
    Visibility,
    WorkflowState,
};

bitflags! {
    /// Capabilities a role holds over a class of resources.
    pub struct ActionBits: i32 {
        /// All bits allocated for read-level capabilities.
        const READ_BITS       = 0x0000_000f;
        /// Holder can view resources and their manifests.
        const READ            = 0x0000_0001;
        /// Holder can download a resource's files.
        const DOWNLOAD        = 0x0000_0002;
        /// All bits allocated for content-editing capabilities.
        const EDIT_BITS       = 0x0000_0ff0;
        /// Holder can modify resources. Implies the per-resource PDF
        /// actions, which follow modification rights.
        const MODIFY          = 0x0000_0010;
        /// Holder can update a resource's descriptive metadata.
        const UPDATE          = 0x0000_0020;
        /// Holder can create new resources of this class.
        const CREATE          = 0x0000_0040;
        /// Holder can use the file manager.
        const FILE_MANAGER    = 0x0000_0100;
        /// Holder can persist a logical structure for the resource.
        const SAVE_STRUCTURE  = 0x0000_0200;
        /// All bits allocated for workflow capabilities.
        const WORKFLOW_BITS   = 0x000f_0000;
        /// Holder can mark resources complete.
        const COMPLETE        = 0x0001_0000;
        /// Holder can flag published resources.
        const FLAG            = 0x0002_0000;
        /// All bits allocated for removal capabilities.
        const DESTROY_BITS    = 0x00f0_0000;
        /// Holder can destroy any resource.
        const DESTROY         = 0x0010_0000;
        /// Holder can destroy resources they deposited, as long as no
        /// external identifier has been minted.
        const DESTROY_OWN     = 0x0020_0000;
    }
}

impl ActionBits {
    /// The full capability set of content staff for a resource class they
    /// manage.
    fn manage() -> ActionBits {
        ActionBits::READ
            | ActionBits::DOWNLOAD
            | ActionBits::MODIFY
            | ActionBits::UPDATE
            | ActionBits::CREATE
            | ActionBits::FILE_MANAGER
            | ActionBits::SAVE_STRUCTURE
            | ActionBits::FLAG
            | ActionBits::DESTROY_OWN
    }
}

/// An action a caller may request on a resource.
///
/// `Show` and `Manifest` are aliases of `Read`; `Pdf`, `ColorPdf`, `Edit`
/// and `BrowseEverythingFiles` are additionally satisfied by the `MODIFY`
/// capability.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Show,
    Manifest,
    Pdf,
    ColorPdf,
    Edit,
    BrowseEverythingFiles,
    Update,
    Destroy,
    FileManager,
    SaveStructure,
    Complete,
    Download,
    Flag,
}

impl fmt::Display for Action {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Action::Read => "read",
            Action::Show => "show",
            Action::Manifest => "manifest",
            Action::Pdf => "pdf",
            Action::ColorPdf => "color_pdf",
            Action::Edit => "edit",
            Action::BrowseEverythingFiles => "browse_everything_files",
            Action::Update => "update",
            Action::Destroy => "destroy",
            Action::FileManager => "file_manager",
            Action::SaveStructure => "save_structure",
            Action::Complete => "complete",
            Action::Download => "download",
            Action::Flag => "flag",
        };
        fmt.write_str(name)
    }
}

/// Roles a caller can hold. Exactly one per caller; [`Role::Admin`] is
/// a superset of everything.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Anonymous,
    CampusPatron,
    Curator,
    Fulfiller,
    Editor,
    Completer,
    ImageEditor,
    EphemeraEditor,
    GeoEditor,
    Admin,
}

/// All roles, in increasing order of privilege.
pub const ROLES: [Role; 10] = [
    Role::Anonymous,
    Role::CampusPatron,
    Role::Curator,
    Role::Fulfiller,
    Role::Editor,
    Role::Completer,
    Role::ImageEditor,
    Role::EphemeraEditor,
    Role::GeoEditor,
    Role::Admin,
];

impl Role {
    /// Static capability table: what this role may do to resources of
    /// a given class, before workflow-state and PDF-policy narrowing.
    pub fn capabilities(self, class: ResourceType) -> ActionBits {
        match self {
            Role::Admin => ActionBits::all(),
            Role::ImageEditor => ActionBits::manage(),
            Role::EphemeraEditor if class.is_ephemera() =>
                ActionBits::manage(),
            Role::EphemeraEditor =>
                ActionBits::READ | ActionBits::DOWNLOAD
                    | ActionBits::DESTROY_OWN,
            Role::GeoEditor if class.is_geo() => ActionBits::manage(),
            Role::GeoEditor =>
                ActionBits::READ | ActionBits::DOWNLOAD
                    | ActionBits::DESTROY_OWN,
            Role::Completer =>
                ActionBits::READ | ActionBits::MODIFY | ActionBits::UPDATE
                    | ActionBits::FILE_MANAGER | ActionBits::SAVE_STRUCTURE
                    | ActionBits::FLAG | ActionBits::COMPLETE,
            Role::Editor =>
                ActionBits::READ | ActionBits::MODIFY | ActionBits::UPDATE
                    | ActionBits::FILE_MANAGER | ActionBits::SAVE_STRUCTURE
                    | ActionBits::FLAG,
            Role::Fulfiller => ActionBits::READ | ActionBits::DOWNLOAD,
            Role::Curator | Role::CampusPatron | Role::Anonymous =>
                ActionBits::READ,
        }
    }

    /// Workflow states in which this role may not read a resource.
    pub fn blocked_states(self) -> &'static [WorkflowState] {
        const REVIEW: [WorkflowState; 4] = [
            WorkflowState::Pending,
            WorkflowState::MetadataReview,
            WorkflowState::FinalReview,
            WorkflowState::Takedown,
        ];
        const PENDING: [WorkflowState; 1] = [WorkflowState::Pending];

        match self {
            Role::Admin
            | Role::ImageEditor
            | Role::EphemeraEditor
            | Role::GeoEditor => &[],
            Role::Curator => &PENDING,
            Role::Anonymous
            | Role::CampusPatron
            | Role::Editor
            | Role::Fulfiller
            | Role::Completer => &REVIEW,
        }
    }

    /// Visibility gate applied to read-level actions.
    fn sees(self, visibility: Visibility, class: ResourceType) -> bool {
        match self {
            Role::Anonymous => visibility == Visibility::Public,
            Role::CampusPatron => visibility != Visibility::Private,
            // Ephemera editors see everything within their own domain,
            // campus-level material elsewhere.
            Role::EphemeraEditor =>
                class.is_ephemera() || visibility != Visibility::Private,
            _ => true,
        }
    }
}

/// An authenticated caller.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct User {
    pub login: String,
    pub role: Role,
}

/// The authorization context of a request: the current user, if any.
#[derive(Clone, Debug)]
pub struct Ability {
    user: Option<User>,
}

impl Ability {
    pub fn new(user: Option<User>) -> Ability {
        Ability { user }
    }

    pub fn anonymous() -> Ability {
        Ability { user: None }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Role {
        self.user.as_ref().map(|user| user.role).unwrap_or(Role::Anonymous)
    }

    /// Decide whether `action` is permitted on `resource`.
    ///
    /// Pure: the outcome depends only on the caller's role and the resource
    /// snapshot. Callers are responsible for turning a denial into
    /// a response (401, redirect, 403).
    pub fn allowed(&self, action: Action, resource: &Resource) -> bool {
        // Ephemera folders awaiting QA never get a manifest, not even for
        // administrators.
        if action == Action::Manifest
            && resource.resource_type == ResourceType::EphemeraFolder
            && resource.workflow_state == Some(WorkflowState::NeedsQa)
        {
            return false;
        }

        let role = self.role();

        if role == Role::Admin {
            return true;
        }

        let caps = role.capabilities(resource.resource_type);

        match action {
            Action::Read | Action::Show | Action::Manifest =>
                caps.contains(ActionBits::READ) && self.readable(resource),
            Action::Pdf => self.readable(resource)
                && (caps.contains(ActionBits::MODIFY)
                    || caps.contains(ActionBits::READ)
                        && resource.pdf_allowed()),
            Action::ColorPdf => self.readable(resource)
                && (caps.contains(ActionBits::MODIFY)
                    || caps.contains(ActionBits::READ)
                        && resource.color_pdf_allowed()),
            Action::Edit | Action::BrowseEverythingFiles =>
                caps.contains(ActionBits::MODIFY),
            Action::Update => caps.contains(ActionBits::UPDATE),
            Action::FileManager => caps.contains(ActionBits::FILE_MANAGER),
            Action::SaveStructure =>
                caps.contains(ActionBits::SAVE_STRUCTURE),
            Action::Complete => caps.contains(ActionBits::COMPLETE),
            Action::Download => caps.contains(ActionBits::DOWNLOAD),
            Action::Flag => caps.contains(ActionBits::FLAG),
            Action::Destroy => caps.contains(ActionBits::DESTROY)
                || caps.contains(ActionBits::DESTROY_OWN)
                    && !resource.has_external_identifier()
                    && self.is_depositor(resource.depositor.as_ref()),
        }
    }

    /// Verify that `action` is permitted on `resource`.
    ///
    /// This is the same check as [`Ability::allowed`], but returns an
    /// [`ApiError`].
    pub fn require(&self, action: Action, resource: &Resource)
    -> Result<(), AccessDeniedError> {
        if self.allowed(action, resource) {
            Ok(())
        } else {
            log::trace!(
                "denied {} on {} for {:?}", action, resource.id, self.role());
            Err(AccessDeniedError {
                action,
                authenticated: self.authenticated(),
            })
        }
    }

    /// May the caller create new works of this class?
    pub fn can_create(&self, class: ResourceType) -> bool {
        self.role().capabilities(class).contains(ActionBits::CREATE)
    }

    /// Collections carry no workflow state; read access is visibility only.
    pub fn can_read_collection(&self, collection: &Collection) -> bool {
        match self.role() {
            Role::Anonymous => collection.visibility == Visibility::Public,
            Role::CampusPatron | Role::EphemeraEditor =>
                collection.visibility != Visibility::Private,
            _ => true,
        }
    }

    /// File sets holding external bibliographic metadata are downloadable
    /// by anyone; everything else requires the `DOWNLOAD` capability and,
    /// for depositing roles, ownership.
    pub fn can_download(&self, file_set: &FileSet) -> bool {
        if file_set.external_metadata() {
            return true;
        }

        match self.role() {
            Role::Admin | Role::Fulfiller => true,
            Role::ImageEditor | Role::EphemeraEditor | Role::GeoEditor =>
                true,
            _ => false,
        }
    }

    /// May the caller remove this file set?
    pub fn can_destroy_file_set(&self, file_set: &FileSet) -> bool {
        match self.role() {
            Role::Admin => true,
            Role::ImageEditor | Role::EphemeraEditor | Role::GeoEditor =>
                self.is_depositor(file_set.depositor.as_ref()),
            _ => false,
        }
    }

    fn readable(&self, resource: &Resource) -> bool {
        let role = self.role();

        if !role.sees(resource.visibility, resource.resource_type) {
            return false;
        }

        match resource.workflow_state {
            Some(state) => !role.blocked_states().contains(&state),
            None => true,
        }
    }

    fn is_depositor(&self, depositor: Option<&String>) -> bool {
        match (self.user.as_ref(), depositor) {
            (Some(user), Some(depositor)) => user.login == *depositor,
            _ => false,
        }
    }
}

/// Denial produced by [`Ability::require`].
#[derive(Debug, Fail)]
#[fail(display = "Not allowed to {}", action)]
pub struct AccessDeniedError {
    action: Action,
    authenticated: bool,
}

impl AccessDeniedError {
    pub fn action(&self) -> Action {
        self.action
    }

    pub fn authenticated(&self) -> bool {
        self.authenticated
    }
}

impl ApiError for AccessDeniedError {
    fn status(&self) -> StatusCode {
        if self.authenticated {
            StatusCode::FORBIDDEN
        } else {
            StatusCode::UNAUTHORIZED
        }
    }

    fn code(&self) -> Option<Cow<str>> {
        Some(Cow::Borrowed("resource:access-denied"))
    }
}
