use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use spendguard_core::{AggregateRoot, DomainError, DomainResult};

use crate::line_item::{CostGuard, LineItemId};
use crate::money::Money;
use crate::order::{PurchaseOrder, PurchaseOrderId};

/// Lookup of purchase orders by id.
///
/// Insertion-only: there is no replace and no delete. Stored orders change
/// only through their own mutation methods, run in place via [`update`].
///
/// [`update`]: PurchaseOrderRepository::update
pub trait PurchaseOrderRepository: Send + Sync {
    /// Insert `order` unless its id is already present. Duplicates are ignored.
    fn add(&self, order: PurchaseOrder);

    /// Snapshot of the stored order, or `None` if absent.
    fn get_by_id(&self, id: &PurchaseOrderId) -> Option<PurchaseOrder>;

    /// Run `apply` against the stored order. Returns `false` if absent.
    fn update(&self, id: &PurchaseOrderId, apply: &mut dyn FnMut(&mut PurchaseOrder)) -> bool;
}

impl<S> PurchaseOrderRepository for Arc<S>
where
    S: PurchaseOrderRepository + ?Sized,
{
    fn add(&self, order: PurchaseOrder) {
        (**self).add(order)
    }

    fn get_by_id(&self, id: &PurchaseOrderId) -> Option<PurchaseOrder> {
        (**self).get_by_id(id)
    }

    fn update(&self, id: &PurchaseOrderId, apply: &mut dyn FnMut(&mut PurchaseOrder)) -> bool {
        (**self).update(id, apply)
    }
}

/// In-memory repository for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryPurchaseOrderRepository {
    inner: RwLock<HashMap<PurchaseOrderId, PurchaseOrder>>,
}

impl InMemoryPurchaseOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PurchaseOrderRepository for InMemoryPurchaseOrderRepository {
    fn add(&self, order: PurchaseOrder) {
        if let Ok(mut map) = self.inner.write() {
            let id = *order.id();
            if map.contains_key(&id) {
                tracing::debug!(purchase_order_id = %id, "purchase order already registered");
                return;
            }
            map.insert(id, order);
        }
    }

    fn get_by_id(&self, id: &PurchaseOrderId) -> Option<PurchaseOrder> {
        let map = self.inner.read().ok()?;
        map.get(id).cloned()
    }

    fn update(&self, id: &PurchaseOrderId, apply: &mut dyn FnMut(&mut PurchaseOrder)) -> bool {
        let Ok(mut map) = self.inner.write() else {
            return false;
        };
        match map.get_mut(id) {
            Some(order) => {
                apply(order);
                true
            }
            None => false,
        }
    }
}

/// Update a stored line item's cost, with the item resolving its owner
/// through `repository`.
///
/// An unknown order is a rejection (`Ok(false)`); an item the order does not
/// hold is [`DomainError::NotAMember`].
pub fn try_update_item_cost(
    repository: &dyn PurchaseOrderRepository,
    order_id: PurchaseOrderId,
    item_id: LineItemId,
    new_cost: impl Into<Money>,
) -> DomainResult<bool> {
    let Some(order) = repository.get_by_id(&order_id) else {
        tracing::warn!(purchase_order_id = %order_id, "purchase order not found");
        return Ok(false);
    };
    let mut working = order
        .item(item_id)
        .cloned()
        .ok_or_else(|| DomainError::not_a_member(item_id, order_id))?;

    if !working.try_update_cost(new_cost, &CostGuard::Repository(repository))? {
        return Ok(false);
    }

    let mut outcome = Ok(false);
    repository.update(&order_id, &mut |stored: &mut PurchaseOrder| {
        outcome = stored.accept_item_update(&working);
    });
    outcome
}
