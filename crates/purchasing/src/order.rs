use serde::{Deserialize, Serialize};

use spendguard_core::{AggregateId, AggregateRoot, DomainError, DomainResult};

use crate::line_item::{CostGuard, LineItem, LineItemId};
use crate::money::Money;
use crate::service::PurchaseOrderService;

/// Purchase order identifier. Always assigned by the caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchaseOrderId(pub AggregateId);

impl PurchaseOrderId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PurchaseOrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: PurchaseOrder.
///
/// Invariant: the sum of all line item costs never exceeds `spend_limit`
/// after a successful mutation. Every mutation path checks it before
/// committing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseOrder {
    id: PurchaseOrderId,
    items: Vec<LineItem>,
    spend_limit: Money,
    version: u64,
}

impl PurchaseOrder {
    pub fn new(id: PurchaseOrderId, spend_limit: impl Into<Money>) -> Self {
        Self {
            id,
            items: Vec::new(),
            spend_limit: spend_limit.into(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> PurchaseOrderId {
        self.id
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn item(&self, item_id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id_typed() == item_id)
    }

    pub fn spend_limit(&self) -> Money {
        self.spend_limit
    }

    /// Sum of all line item costs.
    ///
    /// Every committed state folds left to right without overflow (the
    /// `total_after_*` checks guarantee it), so saturation never kicks in.
    pub fn total(&self) -> Money {
        self.items
            .iter()
            .fold(Money::ZERO, |acc, item| acc.saturating_add(item.cost()))
    }

    /// `spend_limit - total`, or `None` if that is not representable.
    pub fn remaining_budget(&self) -> Option<Money> {
        self.spend_limit.checked_sub(self.total())
    }

    fn fold_costs(&self, mut cost_of: impl FnMut(&LineItem) -> Money) -> Option<Money> {
        self.items
            .iter()
            .try_fold(Money::ZERO, |acc, item| acc.checked_add(cost_of(item)))
    }

    /// Total if an item of `cost` were appended; `None` on overflow.
    pub fn total_after_adding(&self, cost: Money) -> Option<Money> {
        self.fold_costs(LineItem::cost)?.checked_add(cost)
    }

    /// Total if item `item_id` cost `cost` instead; `None` on overflow.
    pub fn total_after_replacing(&self, item_id: LineItemId, cost: Money) -> Option<Money> {
        self.fold_costs(|item| {
            if item.id_typed() == item_id {
                cost
            } else {
                item.cost()
            }
        })
    }

    /// Would adding an item of `candidate_cost` stay within the limit?
    ///
    /// A total that overflows does not fit.
    pub fn evaluate_limit_for_new_item(&self, candidate_cost: Money) -> bool {
        self.total_after_adding(candidate_cost)
            .is_some_and(|total| total <= self.spend_limit)
    }

    /// Would replacing `existing`'s cost with `proposed_cost` stay within the limit?
    ///
    /// `existing` must be a member of this order. The replacement is applied to
    /// the stored member, so a stale copy of the item still evaluates against
    /// what the order actually holds. A total that overflows does not fit.
    pub fn evaluate_limit_for_replacement(
        &self,
        existing: &LineItem,
        proposed_cost: Money,
    ) -> DomainResult<bool> {
        let item_id = existing.id_typed();
        if self.item(item_id).is_none() {
            return Err(DomainError::not_a_member(item_id, self.id));
        }

        Ok(self
            .total_after_replacing(item_id, proposed_cost)
            .is_some_and(|total| total <= self.spend_limit))
    }

    /// Add `item` if it fits within the remaining budget.
    ///
    /// On success the item's owner id is set to this order. An item whose id is
    /// already present is rejected.
    pub fn try_add_item(&mut self, item: LineItem) -> bool {
        let fits = self.evaluate_limit_for_new_item(item.cost());
        self.push_if(item, fits)
    }

    /// Like [`try_add_item`](Self::try_add_item), but the limit decision is
    /// made by `service`.
    ///
    /// An addition whose total would overflow is refused whatever the service says.
    pub fn try_add_item_with(
        &mut self,
        item: LineItem,
        service: &dyn PurchaseOrderService,
    ) -> bool {
        let fits = service.would_add_be_under_limit(self, &item)
            && self.total_after_adding(item.cost()).is_some();
        self.push_if(item, fits)
    }

    fn push_if(&mut self, mut item: LineItem, fits: bool) -> bool {
        if self.item(item.id_typed()).is_some() {
            tracing::debug!(
                purchase_order_id = %self.id,
                line_item_id = %item.id_typed(),
                "line item already present"
            );
            return false;
        }

        if !fits {
            tracing::info!(
                purchase_order_id = %self.id,
                line_item_id = %item.id_typed(),
                cost = %item.cost(),
                total = %self.total(),
                spend_limit = %self.spend_limit,
                "line item rejected: spend limit would be exceeded"
            );
            return false;
        }

        item.assign_owner(self.id);
        tracing::debug!(
            purchase_order_id = %self.id,
            line_item_id = %item.id_typed(),
            cost = %item.cost(),
            "line item added"
        );
        self.items.push(item);
        self.version += 1;
        true
    }

    /// Update the cost of a member item, validated directly against this order.
    pub fn try_update_item_cost(
        &mut self,
        item_id: LineItemId,
        new_cost: impl Into<Money>,
    ) -> DomainResult<bool> {
        let mut working = self
            .item(item_id)
            .cloned()
            .ok_or_else(|| DomainError::not_a_member(item_id, self.id))?;

        if !working.try_update_cost(new_cost, &CostGuard::Direct(&*self))? {
            return Ok(false);
        }
        self.commit_cost(item_id, working.cost());
        Ok(true)
    }

    /// Commit a cost change that was validated elsewhere (repository or service).
    ///
    /// The replacement is re-checked against the current state, so a stale
    /// validation cannot break the invariant.
    pub fn accept_item_update(&mut self, updated: &LineItem) -> DomainResult<bool> {
        if !self.evaluate_limit_for_replacement(updated, updated.cost())? {
            return Ok(false);
        }
        self.commit_cost(updated.id_typed(), updated.cost());
        Ok(true)
    }

    fn commit_cost(&mut self, item_id: LineItemId, cost: Money) {
        if let Some(member) = self.items.iter_mut().find(|i| i.id_typed() == item_id) {
            member.set_cost(cost);
            self.version += 1;
        }
    }

    /// Change the spend limit; refused if current spend already exceeds it.
    pub fn try_set_spend_limit(&mut self, new_limit: impl Into<Money>) -> bool {
        let new_limit = new_limit.into();
        if self.total() > new_limit {
            tracing::info!(
                purchase_order_id = %self.id,
                total = %self.total(),
                requested = %new_limit,
                "spend limit change rejected"
            );
            return false;
        }
        self.spend_limit = new_limit;
        self.version += 1;
        true
    }
}

impl AggregateRoot for PurchaseOrder {
    type Id = PurchaseOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
