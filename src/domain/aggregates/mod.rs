//! Aggregates module
pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{CartError, CartState, LineItem, ProductRef, SellerOrder, UpdateOutcome};
pub use order::{OrderLine, OrderRecord, OrderRequest, OrderStatus};
pub use product::{Category, Photo, Product, ProductQuery, Seller, SortOrder};
pub use user::{UserProfile, UserSummary};
