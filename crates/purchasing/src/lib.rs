//! Purchasing domain module: purchase orders with a spend limit.
//!
//! [`PurchaseOrder`] is the aggregate root and the only owner of the invariant
//! "sum of line item costs <= spend limit". A [`LineItem`] refers to its order
//! by id and validates its own cost changes through a [`CostGuard`]: the order
//! handed in directly, a [`PurchaseOrderRepository`] lookup, or a
//! [`PurchaseOrderService`].
//!
//! Rejections are `false`/`Ok(false)`; only caller misuse is an `Err`.

pub mod line_item;
pub mod money;
pub mod order;
pub mod repository;
pub mod service;

pub use line_item::{CostGuard, LineItem, LineItemId};
pub use money::Money;
pub use order::{PurchaseOrder, PurchaseOrderId};
pub use repository::{InMemoryPurchaseOrderRepository, PurchaseOrderRepository};
pub use service::{PurchaseOrderService, RepositoryBackedService};
