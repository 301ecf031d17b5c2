//! Repository Gateway
//!
//! The order core never touches storage directly: every read and write
//! goes through the [`Gateway`] contract defined in [`gateway`], injected
//! into each component at construction. [`memory`] provides the
//! DashMap-backed backend used by the server and by every test.

pub mod gateway;
pub mod memory;

pub use gateway::{
    CategoryStore, DbError, DbResult, FidelityCardStore, Gateway, GuestStore, IngredientStore,
    OrderStore, PartialOrderStore, ProductStore, TableStore,
};
pub use memory::MemoryGateway;
