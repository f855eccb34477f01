//! Domain service owning the "would this stay under the spend limit?" decision.
//!
//! With a service in place neither [`PurchaseOrder`] nor [`LineItem`] needs to
//! know how the other validates, and line items never see a repository.

use std::sync::Arc;

use spendguard_core::{DomainError, DomainResult};

use crate::line_item::{CostGuard, LineItem, LineItemId};
use crate::money::Money;
use crate::order::{PurchaseOrder, PurchaseOrderId};
use crate::repository::PurchaseOrderRepository;

pub trait PurchaseOrderService: Send + Sync {
    /// Would `candidate` fit into `order` as it stands?
    fn would_add_be_under_limit(&self, order: &PurchaseOrder, candidate: &LineItem) -> bool;

    /// Would replacing `existing`'s cost with `proposed_cost` keep the order
    /// identified by `order_id` within its limit?
    fn would_update_be_under_limit(
        &self,
        order_id: &PurchaseOrderId,
        existing: &LineItem,
        proposed_cost: Money,
    ) -> DomainResult<bool>;
}

/// [`PurchaseOrderService`] resolving orders through a repository.
///
/// An order that cannot be found is a rejection (`Ok(false)`), matching the
/// repository's own `None` convention. An item the order does not hold is
/// [`DomainError::NotAMember`].
#[derive(Clone)]
pub struct RepositoryBackedService {
    repository: Arc<dyn PurchaseOrderRepository>,
}

impl RepositoryBackedService {
    pub fn new(repository: Arc<dyn PurchaseOrderRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &dyn PurchaseOrderRepository {
        self.repository.as_ref()
    }

    /// Add `item` to a stored order, with the limit decision made by this service.
    ///
    /// Returns `false` if the order is unknown or the item does not fit.
    pub fn try_add_item(&self, order_id: PurchaseOrderId, item: LineItem) -> bool {
        let mut pending = Some(item);
        let mut added = false;
        let found = self
            .repository
            .update(&order_id, &mut |order: &mut PurchaseOrder| {
                if let Some(item) = pending.take() {
                    added = order.try_add_item_with(item, self);
                }
            });

        if !found {
            tracing::warn!(purchase_order_id = %order_id, "purchase order not found");
        }
        added
    }

    /// Update a stored line item's cost; the item consults this service only.
    pub fn try_update_item_cost(
        &self,
        order_id: PurchaseOrderId,
        item_id: LineItemId,
        new_cost: impl Into<Money>,
    ) -> DomainResult<bool> {
        let Some(order) = self.repository.get_by_id(&order_id) else {
            tracing::warn!(purchase_order_id = %order_id, "purchase order not found");
            return Ok(false);
        };
        let mut working = order
            .item(item_id)
            .cloned()
            .ok_or_else(|| DomainError::not_a_member(item_id, order_id))?;

        if !working.try_update_cost(new_cost, &CostGuard::Service(self))? {
            return Ok(false);
        }

        let mut outcome = Ok(false);
        self.repository
            .update(&order_id, &mut |stored: &mut PurchaseOrder| {
                outcome = stored.accept_item_update(&working);
            });
        outcome
    }
}

impl PurchaseOrderService for RepositoryBackedService {
    fn would_add_be_under_limit(&self, order: &PurchaseOrder, candidate: &LineItem) -> bool {
        order
            .total_after_adding(candidate.cost())
            .is_some_and(|total| total <= order.spend_limit())
    }

    fn would_update_be_under_limit(
        &self,
        order_id: &PurchaseOrderId,
        existing: &LineItem,
        proposed_cost: Money,
    ) -> DomainResult<bool> {
        let Some(order) = self.repository.get_by_id(order_id) else {
            tracing::warn!(purchase_order_id = %order_id, "purchase order not found");
            return Ok(false);
        };
        let item_id = existing.id_typed();
        if order.item(item_id).is_none() {
            return Err(DomainError::not_a_member(item_id, order_id));
        }

        Ok(order
            .total_after_replacing(item_id, proposed_cost)
            .is_some_and(|total| total <= order.spend_limit()))
    }
}

impl core::fmt::Debug for RepositoryBackedService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RepositoryBackedService").finish_non_exhaustive()
    }
}
