//! Domain entities - the core business objects.

use chrono::{DateTime, SubsecRound, Utc};

mod comment;
mod message;
mod post;
mod profile;
mod user;

pub use comment::{Comment, CommentWithAuthor};
pub use message::Message;
pub use post::{Post, PostDetail, PostDraft, PostWithAuthor};
pub use profile::Profile;
pub use user::{AuthorSummary, Role, User, mask_email, normalize_email};

/// Current time at the precision the database stores (microseconds), so a
/// freshly built entity compares equal to its persisted copy.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
