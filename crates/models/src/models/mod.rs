mod collection;
mod file_set;
mod resource;

pub use self::{
    collection::Collection,
    file_set::FileSet,
    resource::{
        LogicalOrder,
        OrderNode,
        Resource,
        ResourceType,
        Visibility,
        WorkflowState,
    },
};

/// A resolved member of a resource, in order.
///
/// Members of a work are heterogeneous: leaves are file sets, but composite
/// works aggregate other works.
#[derive(Clone, Debug)]
pub enum Member {
    FileSet(FileSet),
    Work(Resource),
}

impl Member {
    pub fn id(&self) -> &str {
        match self {
            Member::FileSet(fs) => &fs.id,
            Member::Work(work) => &work.id,
        }
    }

    /// Discriminant used when deciding whether a member list is homogeneous.
    /// Two works of different types are distinct kinds.
    pub fn kind(&self) -> MemberKind {
        match self {
            Member::FileSet(_) => MemberKind::FileSet,
            Member::Work(work) => MemberKind::Work(work.resource_type),
        }
    }

    pub fn as_work(&self) -> Option<&Resource> {
        match self {
            Member::Work(work) => Some(work),
            Member::FileSet(_) => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MemberKind {
    FileSet,
    Work(ResourceType),
}
