//! Use-case tests of the services running on the in-memory repositories.

use std::collections::HashSet;
use std::sync::Arc;

use quill_core::DomainError;
use quill_core::domain::{Message, PostDraft, Role, User};
use quill_core::ports::{BaseRepository, TokenClaims};
use quill_core::services::{AuthContext, Repositories, Services};
use quill_infra::{Argon2PasswordService, InMemoryStore, PasswordConfig};

struct Blog {
    services: Services,
    repos: Repositories,
}

fn blog() -> Blog {
    let repos = InMemoryStore::new().repositories();
    let passwords = Argon2PasswordService::new(&PasswordConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap();
    let services = Services::new(repos.clone(), Arc::new(passwords));
    Blog { services, repos }
}

impl Blog {
    async fn user(&self, email: &str, role: Role) -> AuthContext {
        let mut user = User::new(email, "Test Writer");
        user.role = role;
        let saved = self.repos.users.save(user).await.unwrap();
        AuthContext::from_user(&saved).unwrap()
    }

    async fn publish(&self, author: &AuthContext, title: &str, content: &str) -> i64 {
        self.services
            .posts
            .save_post(PostDraft {
                id: None,
                title: title.to_string(),
                content: content.to_string(),
                author_id: Some(author.user_id),
            })
            .await
            .unwrap()
            .id
            .unwrap()
    }
}

#[tokio::test]
async fn test_listing_ten_posts_in_pages_of_six() {
    let blog = blog();
    let author = blog.user("writer@example.com", Role::RegularUser).await;
    for i in 0..10 {
        blog.publish(&author, &format!("Post number {i}"), "Body text that is long enough")
            .await;
    }

    let first = blog.services.posts.list_posts(0, 6).await.unwrap();
    let second = blog.services.posts.list_posts(1, 6).await.unwrap();
    let third = blog.services.posts.list_posts(2, 6).await.unwrap();

    assert_eq!(first.items.len(), 6);
    assert_eq!(second.items.len(), 4);
    assert_eq!(third.items.len(), 0);
    assert_eq!(first.total_pages(), 2);
    assert!(first.has_next());
    assert!(!second.has_next());
}

#[tokio::test]
async fn test_search_pages_cover_every_match_once() {
    let blog = blog();
    let author = blog.user("writer@example.com", Role::RegularUser).await;
    let mut expected = HashSet::new();
    for i in 0..7 {
        let id = match i % 3 {
            0 => blog.publish(&author, &format!("Learning RUST {i}"), "Body text that is long enough").await,
            1 => blog.publish(&author, &format!("Notes {i}"), "All about rust ownership rules").await,
            _ => blog.publish(&author, &format!("Gardening {i}"), "Tomatoes need plenty of sun").await,
        };
        if i % 3 != 2 {
            expected.insert(id);
        }
    }

    let mut seen = Vec::new();
    let mut page = 0;
    loop {
        let result = blog
            .services
            .posts
            .search_posts(Some("  Rust "), page, 2)
            .await
            .unwrap();
        assert_eq!(result.total_items, expected.len() as u64);
        seen.extend(result.items.iter().map(|p| p.post.id.unwrap()));
        if !result.has_next() {
            break;
        }
        page += 1;
    }

    let unique: HashSet<i64> = seen.iter().copied().collect();
    assert_eq!(seen.len(), unique.len());
    assert_eq!(unique, expected);

    let mut sorted = seen.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(seen, sorted);
}

#[tokio::test]
async fn test_blank_keyword_lists_everything() {
    let blog = blog();
    let author = blog.user("writer@example.com", Role::RegularUser).await;
    blog.publish(&author, "First post", "Body text that is long enough").await;
    blog.publish(&author, "Second post", "Body text that is long enough").await;

    let result = blog.services.posts.search_posts(Some("   "), 0, 6).await.unwrap();

    assert_eq!(result.total_items, 2);
}

#[tokio::test]
async fn test_new_post_gets_id_and_publication_date() {
    let blog = blog();
    let author = blog.user("writer@example.com", Role::RegularUser).await;

    let saved = blog
        .services
        .posts
        .save_post(PostDraft {
            id: None,
            title: "Hello".into(),
            content: "World content long enough".into(),
            author_id: Some(author.user_id),
        })
        .await
        .unwrap();

    let id = saved.id.expect("generated id");
    let detail = blog.services.posts.get_post(id).await.unwrap();
    assert_eq!(detail.post.published_at, saved.published_at);
    assert_eq!(detail.author.id, author.user_id);
}

#[tokio::test]
async fn test_editing_keeps_publication_date() {
    let blog = blog();
    let author = blog.user("writer@example.com", Role::RegularUser).await;
    let id = blog.publish(&author, "Original title", "Original body text here").await;
    let published_at = blog.services.posts.get_post(id).await.unwrap().post.published_at;

    let edited = blog
        .services
        .posts
        .edit_post(&author, id, "New title".into(), "A rewritten body text".into())
        .await
        .unwrap();

    assert_eq!(edited.title, "New title");
    assert_eq!(edited.published_at, published_at);
}

#[tokio::test]
async fn test_only_author_or_admin_may_edit() {
    let blog = blog();
    let author = blog.user("writer@example.com", Role::RegularUser).await;
    let stranger = blog.user("other@example.com", Role::RegularUser).await;
    let admin = blog.user("admin@example.com", Role::Admin).await;
    let id = blog.publish(&author, "Original title", "Original body text here").await;

    let denied = blog
        .services
        .posts
        .edit_post(&stranger, id, "Hijacked".into(), "Not my post to change".into())
        .await;
    assert!(matches!(denied, Err(DomainError::Forbidden(_))));

    blog.services
        .posts
        .edit_post(&admin, id, "Moderated".into(), "Cleaned up by an admin".into())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_deleting_post_removes_its_comments() {
    let blog = blog();
    let author = blog.user("writer@example.com", Role::RegularUser).await;
    let reader = blog.user("reader@example.com", Role::RegularUser).await;
    let id = blog.publish(&author, "Discussed post", "Body text that is long enough").await;
    blog.services
        .comments
        .add_comment(&reader, id, "Great read, thanks!".into())
        .await
        .unwrap();
    assert_eq!(blog.services.posts.get_post(id).await.unwrap().comments.len(), 1);

    blog.services.posts.delete_post(&author, id).await.unwrap();

    assert_eq!(blog.repos.comments.count().await.unwrap(), 0);
    assert!(matches!(
        blog.services.posts.get_post(id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        blog.services.posts.delete_post(&author, id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_comments_listed_oldest_first() {
    let blog = blog();
    let author = blog.user("writer@example.com", Role::RegularUser).await;
    let id = blog.publish(&author, "Discussed post", "Body text that is long enough").await;
    for text in ["First comment", "Second comment", "Third comment"] {
        blog.services
            .comments
            .add_comment(&author, id, text.into())
            .await
            .unwrap();
    }

    let comments = blog.services.comments.comments_for_post(id).await.unwrap();

    let bodies: Vec<&str> = comments.iter().map(|c| c.comment.content.as_str()).collect();
    assert_eq!(bodies, ["First comment", "Second comment", "Third comment"]);
    assert_eq!(comments[0].author.name, "Test Writer");
}

#[tokio::test]
async fn test_mark_as_read_is_idempotent() {
    let blog = blog();
    let sent = blog
        .services
        .messages
        .send(Message::new(
            "Jane Doe".into(),
            "jane@example.com".into(),
            "Hello there".into(),
            "I enjoyed your latest article".into(),
        ))
        .await
        .unwrap();
    let id = sent.id.unwrap();
    assert!(!sent.read);
    assert_eq!(blog.services.messages.unread_count().await.unwrap(), 1);

    let first = blog.services.messages.mark_as_read(id).await.unwrap();
    let second = blog.services.messages.mark_as_read(id).await.unwrap();

    assert!(first.read);
    assert!(second.read);
    assert_eq!(blog.services.messages.unread_count().await.unwrap(), 0);
    assert!(matches!(
        blog.services.messages.mark_as_read(id + 100).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_invalid_contact_message_is_rejected() {
    let blog = blog();

    let result = blog
        .services
        .messages
        .send(Message::new("J".into(), "nope".into(), "Hi".into(), "".into()))
        .await;

    match result {
        Err(DomainError::Validation(errors)) => assert!(errors.len() >= 3),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_first_token_provisions_account() {
    let blog = blog();
    let claims = TokenClaims {
        subject: "idp-123".into(),
        email: "Ada@Example.com".into(),
        given_name: Some("Ada".into()),
        family_name: Some("Lovelace".into()),
        roles: vec!["admin".into()],
        from_provider: true,
        ..Default::default()
    };

    let first = blog.services.users.resolve_identity(&claims).await.unwrap();
    let again = blog.services.users.resolve_identity(&claims).await.unwrap();

    assert_eq!(first.user_id, again.user_id);
    assert_eq!(first.email, "ada@example.com");
    assert_eq!(first.name, "Ada Lovelace");
    assert!(first.is_admin());
    assert_eq!(blog.repos.users.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_local_register_and_login() {
    let blog = blog();

    let user = blog
        .services
        .users
        .register_local("local@example.com", "Local User", "s3cret-password")
        .await
        .unwrap();
    assert!(user.password_hash.is_some());

    let duplicate = blog
        .services
        .users
        .register_local("LOCAL@example.com", "Someone Else", "another-password")
        .await;
    assert!(matches!(duplicate, Err(DomainError::Duplicate(_))));

    let logged_in = blog
        .services
        .users
        .login_local("local@example.com", "s3cret-password")
        .await
        .unwrap();
    assert_eq!(logged_in.id, user.id);
    assert!(logged_in.last_login_at.is_some());

    let wrong = blog
        .services
        .users
        .login_local("local@example.com", "wrong-password")
        .await;
    assert!(matches!(wrong, Err(DomainError::Unauthorized)));
}

#[tokio::test]
async fn test_user_with_posts_cannot_be_deleted() {
    let blog = blog();
    let admin = blog.user("admin@example.com", Role::Admin).await;
    let author = blog.user("writer@example.com", Role::RegularUser).await;
    blog.publish(&author, "Still here", "Body text that is long enough").await;

    let result = blog.services.users.delete_user(&admin, author.user_id).await;

    assert!(matches!(result, Err(DomainError::Conflict(_))));
}

#[tokio::test]
async fn test_profile_is_upserted_per_user() {
    let blog = blog();
    let user = blog.user("writer@example.com", Role::RegularUser).await;

    let empty = blog.services.profiles.profile_for(user.user_id).await.unwrap();
    assert!(empty.id.is_none());

    let first = blog
        .services
        .profiles
        .save_profile(user.user_id, Some("Writes about Rust".into()), None)
        .await
        .unwrap();
    let second = blog
        .services
        .profiles
        .save_profile(user.user_id, Some("Writes about Rust and tea".into()), Some("  ".into()))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.description, None);
    assert_eq!(blog.repos.profiles.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_rejected_profile_update_keeps_the_name() {
    let blog = blog();
    let user = blog.user("writer@example.com", Role::RegularUser).await;

    let result = blog
        .services
        .profiles
        .update_profile(user.user_id, Some("Renamed Person"), Some("b".repeat(501)), None)
        .await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
    let stored = blog.services.users.get(user.user_id).await.unwrap();
    assert_eq!(stored.name, "Test Writer");
    assert_eq!(blog.repos.profiles.count().await.unwrap(), 0);

    blog.services
        .profiles
        .update_profile(user.user_id, Some("Renamed Person"), Some("Short bio".into()), None)
        .await
        .unwrap();
    let stored = blog.services.users.get(user.user_id).await.unwrap();
    assert_eq!(stored.name, "Renamed Person");
}

#[tokio::test]
async fn test_update_name_validates() {
    let blog = blog();
    let user = blog.user("writer@example.com", Role::RegularUser).await;

    let renamed = blog.services.users.update_name(&user, "  Ada Byron ").await.unwrap();
    assert_eq!(renamed.name, "Ada Byron");

    let rejected = blog.services.users.update_name(&user, "Dr. Who").await;
    assert!(matches!(rejected, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn test_dashboard_counts() {
    let blog = blog();
    let admin = blog.user("admin@example.com", Role::Admin).await;
    let id = blog.publish(&admin, "Announcement", "Body text that is long enough").await;
    blog.services
        .comments
        .add_comment(&admin, id, "Pinned note".into())
        .await
        .unwrap();
    blog.services
        .messages
        .send(Message::new(
            "Jane Doe".into(),
            "jane@example.com".into(),
            "Question".into(),
            "How do I subscribe to updates?".into(),
        ))
        .await
        .unwrap();

    let stats = blog.services.admin.dashboard(&admin).await.unwrap();

    assert_eq!(stats.users, 1);
    assert_eq!(stats.posts, 1);
    assert_eq!(stats.comments, 1);
    assert_eq!(stats.unread_messages, 1);

    let reader = blog.user("reader@example.com", Role::RegularUser).await;
    assert!(matches!(
        blog.services.admin.dashboard(&reader).await,
        Err(DomainError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_locally_signed_admin_claim_grants_nothing() {
    let blog = blog();
    let claims = TokenClaims {
        email: "mallory@example.com".into(),
        roles: vec!["admin".into()],
        ..Default::default()
    };

    let context = blog.services.users.resolve_identity(&claims).await.unwrap();

    assert!(!context.is_admin());
    let stored = blog.services.users.get(context.user_id).await.unwrap();
    assert_eq!(stored.role, Role::RegularUser);
}

#[tokio::test]
async fn test_deactivated_account_is_refused() {
    let blog = blog();
    let admin = blog.user("admin@example.com", Role::Admin).await;
    let member = blog.user("member@example.com", Role::RegularUser).await;

    blog.services
        .users
        .set_active(&admin, member.user_id, false)
        .await
        .unwrap();

    let claims = TokenClaims {
        subject: "idp-9".into(),
        email: "member@example.com".into(),
        ..Default::default()
    };
    assert!(matches!(
        blog.services.users.resolve_identity(&claims).await,
        Err(DomainError::Forbidden(_))
    ));

    let self_demotion = blog
        .services
        .users
        .set_role(&admin, admin.user_id, Role::RegularUser)
        .await;
    assert!(matches!(self_demotion, Err(DomainError::Validation(_))));
}
