//! Database integration for seeding fixture data.
//!
//! The [`Seeder`] writes the fixture rows through a [`SeedStore`]: the blog
//! [`Database`](blog::Database) for real runs, or a [`MemoryStore`] for dry
//! runs and tests.

mod memory;
mod seeder;
mod store;

pub use memory::MemoryStore;
pub use seeder::{SeedError, SeedSummary, Seeder};
pub use store::SeedStore;
