//! Domain values to JSON page models.

use quill_core::domain::{AuthorSummary, CommentWithAuthor, Message, PostDetail, PostWithAuthor, User};
use quill_core::pagination::Page;
use quill_shared::dto::{
    ArticleView, AuthorView, CommentView, MessageView, PageView, PostSummary, UserResponse,
};
use quill_shared::text::{clean, excerpt, format_date};

pub fn author(author: AuthorSummary) -> AuthorView {
    AuthorView {
        id: author.id,
        name: author.name,
    }
}

pub fn post_summary(item: PostWithAuthor, excerpt_length: usize) -> PostSummary {
    let PostWithAuthor { post, author: by } = item;
    PostSummary {
        id: post.id.unwrap_or_default(),
        excerpt: excerpt(&clean(&post.content), excerpt_length),
        title: post.title,
        author: author(by),
        published: format_date(&post.published_at),
        published_at: post.published_at,
    }
}

pub fn comment(item: CommentWithAuthor) -> CommentView {
    let CommentWithAuthor { comment, author: by } = item;
    CommentView {
        id: comment.id.unwrap_or_default(),
        post_id: comment.post_id,
        created: format_date(&comment.created_at),
        created_at: comment.created_at,
        content: comment.content,
        author: author(by),
    }
}

pub fn article(detail: PostDetail) -> ArticleView {
    let comments: Vec<CommentView> = detail.comments.into_iter().map(comment).collect();
    ArticleView {
        id: detail.post.id.unwrap_or_default(),
        title: detail.post.title,
        content: detail.post.content,
        author: author(detail.author),
        published: format_date(&detail.post.published_at),
        published_at: detail.post.published_at,
        comment_count: comments.len(),
        comments,
    }
}

pub fn message(message: Message) -> MessageView {
    MessageView {
        id: message.id.unwrap_or_default(),
        sent: format_date(&message.sent_at),
        sent_at: message.sent_at,
        name: message.name,
        email: message.email,
        subject: message.subject,
        content: message.content,
        read: message.read,
    }
}

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id.unwrap_or_default(),
        role: user.role.as_str().to_string(),
        email: user.email,
        name: user.name,
        active: user.active,
        created_at: user.created_at,
        last_login_at: user.last_login_at,
    }
}

pub fn page<T, U>(page: Page<T>, f: impl FnMut(T) -> U) -> PageView<U> {
    let (number, size, total) = (page.page, page.size, page.total_items);
    PageView::new(page.items.into_iter().map(f).collect(), number, size, total)
}
