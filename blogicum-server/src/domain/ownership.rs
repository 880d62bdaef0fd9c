use uuid::Uuid;

use crate::domain::comment::Comment;
use crate::domain::post::Post;

/// Anything only its author may change.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for Post {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

impl Owned for Comment {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

pub fn authorize_mutation<E: Owned + ?Sized>(entity: &E, actor: Uuid) -> Access {
    if entity.owner_id() == actor {
        Access::Allow
    } else {
        Access::Deny
    }
}
