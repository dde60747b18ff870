//! Literal fixture rows.
//!
//! Posts and comments point at their author and post by index into
//! [`USERS`] and [`POSTS`]; the seeder swaps those indexes for the usernames
//! and ids the store returned earlier in the same run.

use blog::models::NewUser;

#[derive(Debug, Clone, Copy)]
pub struct UserFixture {
    pub username: &'static str,
    pub password: &'static str,
}

impl UserFixture {
    pub fn to_new_user(&self) -> NewUser {
        NewUser::new(self.username, self.password)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PostFixture {
    pub content: &'static str,
    /// Index into [`USERS`].
    pub author: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct CommentFixture {
    pub content: &'static str,
    /// Index into [`USERS`].
    pub author: usize,
    /// Index into [`POSTS`].
    pub post: usize,
}

pub const USERS: [UserFixture; 3] = [
    UserFixture {
        username: "user1",
        password: "password123",
    },
    UserFixture {
        username: "user2",
        password: "password456",
    },
    UserFixture {
        username: "user3",
        password: "password789",
    },
];

pub const POSTS: [PostFixture; 3] = [
    PostFixture {
        content: "Post by user1",
        author: 0,
    },
    PostFixture {
        content: "Another post by user1",
        author: 0,
    },
    PostFixture {
        content: "Post by user2",
        author: 1,
    },
];

pub const COMMENTS: [CommentFixture; 3] = [
    CommentFixture {
        content: "Great post!",
        author: 1,
        post: 0,
    },
    CommentFixture {
        content: "Interesting thoughts.",
        author: 2,
        post: 0,
    },
    CommentFixture {
        content: "Nice work!",
        author: 0,
        post: 2,
    },
];
