use serde::{Deserialize, Serialize};

use spendguard_core::{AggregateRoot, DomainError, DomainResult, Entity, EntityId};

use crate::money::Money;
use crate::order::{PurchaseOrder, PurchaseOrderId};
use crate::repository::PurchaseOrderRepository;
use crate::service::PurchaseOrderService;

/// Line item identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(pub EntityId);

impl LineItemId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for LineItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Purchase order line item.
///
/// The owning order is referenced by id only. The id is stamped by
/// [`PurchaseOrder::try_add_item`] and stays `None` for a standalone item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    id: LineItemId,
    purchase_order_id: Option<PurchaseOrderId>,
    cost: Money,
}

impl LineItem {
    /// Standalone item with a fresh id.
    pub fn new(cost: impl Into<Money>) -> Self {
        Self::with_id(LineItemId::new(EntityId::new()), cost)
    }

    pub fn with_id(id: LineItemId, cost: impl Into<Money>) -> Self {
        Self {
            id,
            purchase_order_id: None,
            cost: cost.into(),
        }
    }

    pub fn id_typed(&self) -> LineItemId {
        self.id
    }

    pub fn purchase_order_id(&self) -> Option<PurchaseOrderId> {
        self.purchase_order_id
    }

    pub fn cost(&self) -> Money {
        self.cost
    }

    pub(crate) fn assign_owner(&mut self, order_id: PurchaseOrderId) {
        self.purchase_order_id = Some(order_id);
    }

    pub(crate) fn set_cost(&mut self, cost: Money) {
        self.cost = cost;
    }

    /// Change this item's cost if its owner's spend limit allows it.
    ///
    /// Returns `Ok(false)` when the owner rejects the new cost (or, for the
    /// lookup-based guards, when the owner cannot be resolved). Returns
    /// `Err` only for misuse: a [`CostGuard::Direct`] order that does not
    /// own this item, or an owner that does not list this item.
    ///
    /// Only `self` changes. Called on a copy taken from
    /// [`PurchaseOrder::item`] or a repository snapshot, a successful update
    /// leaves the stored order untouched. To commit the change use
    /// [`PurchaseOrder::try_update_item_cost`],
    /// [`repository::try_update_item_cost`](crate::repository::try_update_item_cost)
    /// or `try_update_item_cost` on [`RepositoryBackedService`].
    ///
    /// [`RepositoryBackedService`]: crate::RepositoryBackedService
    pub fn try_update_cost(
        &mut self,
        new_cost: impl Into<Money>,
        guard: &CostGuard<'_>,
    ) -> DomainResult<bool> {
        let new_cost = new_cost.into();

        if !guard.permits(self, new_cost)? {
            tracing::debug!(
                line_item_id = %self.id,
                current = %self.cost,
                proposed = %new_cost,
                guard = guard.kind(),
                "line item cost update rejected"
            );
            return Ok(false);
        }

        tracing::debug!(
            line_item_id = %self.id,
            from = %self.cost,
            to = %new_cost,
            guard = guard.kind(),
            "line item cost updated"
        );
        self.cost = new_cost;
        Ok(true)
    }
}

impl Entity for LineItem {
    type Id = LineItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// How a line item resolves "would my owner accept this cost?".
///
/// All three variants answer the same question; they differ in what the item
/// has to be handed.
#[derive(Clone, Copy)]
pub enum CostGuard<'a> {
    /// The caller supplies the owning order. Supplying any other order is a
    /// misuse fault.
    Direct(&'a PurchaseOrder),
    /// The owner is looked up by the item's `purchase_order_id`.
    Repository(&'a dyn PurchaseOrderRepository),
    /// Lookup and arithmetic are both left to a service.
    Service(&'a dyn PurchaseOrderService),
}

impl CostGuard<'_> {
    fn kind(&self) -> &'static str {
        match self {
            CostGuard::Direct(_) => "direct",
            CostGuard::Repository(_) => "repository",
            CostGuard::Service(_) => "service",
        }
    }

    /// Whether replacing `item`'s cost with `proposed` keeps its owner within budget.
    pub fn permits(&self, item: &LineItem, proposed: Money) -> DomainResult<bool> {
        match self {
            CostGuard::Direct(order) => {
                let owner = order.id();
                if item.purchase_order_id != Some(*owner) {
                    return Err(match item.purchase_order_id {
                        Some(expected) => DomainError::ownership_mismatch(expected, owner),
                        None => DomainError::ownership_mismatch("<unassigned>", owner),
                    });
                }
                order.evaluate_limit_for_replacement(item, proposed)
            }
            CostGuard::Repository(repository) => {
                let Some(order_id) = item.purchase_order_id else {
                    tracing::warn!(
                        line_item_id = %item.id,
                        "line item has no owning purchase order"
                    );
                    return Ok(false);
                };
                match repository.get_by_id(&order_id) {
                    Some(order) => order.evaluate_limit_for_replacement(item, proposed),
                    None => {
                        tracing::warn!(
                            line_item_id = %item.id,
                            purchase_order_id = %order_id,
                            "owning purchase order not found"
                        );
                        Ok(false)
                    }
                }
            }
            CostGuard::Service(service) => {
                let Some(order_id) = item.purchase_order_id else {
                    tracing::warn!(
                        line_item_id = %item.id,
                        "line item has no owning purchase order"
                    );
                    return Ok(false);
                };
                service.would_update_be_under_limit(&order_id, item, proposed)
            }
        }
    }
}

impl core::fmt::Debug for CostGuard<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CostGuard::Direct(order) => f.debug_tuple("Direct").field(order.id()).finish(),
            CostGuard::Repository(_) => f.write_str("Repository(..)"),
            CostGuard::Service(_) => f.write_str("Service(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryPurchaseOrderRepository;
    use crate::service::RepositoryBackedService;
    use rust_decimal_macros::dec;
    use spendguard_core::AggregateId;
    use std::sync::Arc;

    fn test_order_id() -> PurchaseOrderId {
        PurchaseOrderId::new(AggregateId::new())
    }

    fn money(v: rust_decimal::Decimal) -> Money {
        Money::new(v)
    }

    /// Order with limit 100 holding a 50 and a 25 item; returns the 25 item as
    /// stored (owner id stamped).
    fn order_with_two_items() -> (PurchaseOrder, LineItem) {
        let mut order = PurchaseOrder::new(test_order_id(), money(dec!(100)));
        assert!(order.try_add_item(LineItem::new(money(dec!(50)))));
        let item = LineItem::new(money(dec!(25)));
        let item_id = item.id_typed();
        assert!(order.try_add_item(item));
        let stored = order.item(item_id).cloned().unwrap();
        (order, stored)
    }

    #[test]
    fn standalone_item_has_no_owner() {
        let item = LineItem::new(money(dec!(10)));
        assert_eq!(item.purchase_order_id(), None);
        assert_eq!(item.cost(), money(dec!(10)));
    }

    #[test]
    fn direct_update_within_limit_changes_cost() {
        let (order, mut item) = order_with_two_items();
        assert!(item.try_update_cost(money(dec!(50)), &CostGuard::Direct(&order)).unwrap());
        assert_eq!(item.cost(), money(dec!(50)));
    }

    #[test]
    fn direct_update_above_limit_returns_false() {
        let (order, mut item) = order_with_two_items();
        assert!(!item.try_update_cost(money(dec!(51)), &CostGuard::Direct(&order)).unwrap());
        assert_eq!(item.cost(), money(dec!(25)));
    }

    #[test]
    fn direct_update_with_wrong_order_is_misuse() {
        let (_order, mut item) = order_with_two_items();
        let other = PurchaseOrder::new(test_order_id(), money(dec!(1000)));

        let err = item
            .try_update_cost(money(dec!(1)), &CostGuard::Direct(&other))
            .unwrap_err();
        assert!(matches!(err, DomainError::OwnershipMismatch { .. }));
        assert_eq!(item.cost(), money(dec!(25)));
    }

    #[test]
    fn direct_update_of_unowned_item_is_misuse() {
        let order = PurchaseOrder::new(test_order_id(), money(dec!(100)));
        let mut item = LineItem::new(money(dec!(10)));

        let err = item
            .try_update_cost(money(dec!(5)), &CostGuard::Direct(&order))
            .unwrap_err();
        match err {
            DomainError::OwnershipMismatch { expected, .. } => assert_eq!(expected, "<unassigned>"),
            other => panic!("expected OwnershipMismatch, got {other:?}"),
        }
    }

    #[test]
    fn repository_guard_resolves_owner_by_id() {
        let (order, mut item) = order_with_two_items();
        let repo = InMemoryPurchaseOrderRepository::new();
        repo.add(order);

        assert!(!item.try_update_cost(money(dec!(51)), &CostGuard::Repository(&repo)).unwrap());
        assert_eq!(item.cost(), money(dec!(25)));
        assert!(item.try_update_cost(money(dec!(50)), &CostGuard::Repository(&repo)).unwrap());
        assert_eq!(item.cost(), money(dec!(50)));

        // Only the held copy changed; the stored order still has the old cost.
        let order_id = item.purchase_order_id().unwrap();
        let stored = repo.get_by_id(&order_id).unwrap();
        assert_eq!(stored.item(item.id_typed()).unwrap().cost(), money(dec!(25)));
        assert_eq!(stored.total(), money(dec!(75)));
    }

    #[test]
    fn repository_guard_rejects_when_owner_missing() {
        let (_order, mut item) = order_with_two_items();
        let repo = InMemoryPurchaseOrderRepository::new();

        assert!(!item.try_update_cost(money(dec!(1)), &CostGuard::Repository(&repo)).unwrap());
        assert_eq!(item.cost(), money(dec!(25)));
    }

    #[test]
    fn repository_guard_rejects_unowned_item() {
        let repo = InMemoryPurchaseOrderRepository::new();
        let mut item = LineItem::new(money(dec!(10)));
        assert!(!item.try_update_cost(money(dec!(1)), &CostGuard::Repository(&repo)).unwrap());
    }

    #[test]
    fn service_guard_delegates_to_service() {
        let (order, mut item) = order_with_two_items();
        let repo = Arc::new(InMemoryPurchaseOrderRepository::new());
        repo.add(order);
        let service = RepositoryBackedService::new(repo);

        assert!(!item.try_update_cost(money(dec!(51)), &CostGuard::Service(&service)).unwrap());
        assert!(item.try_update_cost(money(dec!(30)), &CostGuard::Service(&service)).unwrap());
        assert_eq!(item.cost(), money(dec!(30)));
    }
}
