//! Purchase transaction
//!
//! Validates a basket against one store and applies it only if every line
//! passes. Called with the store's shard write lock held.

use std::collections::HashMap;

use crate::catalog::{normalize, Purchase, PurchaseOutcome, Store};

/// Validate then apply `purchase` to `store`
///
/// Validation stops at the first failing line. Demand is summed per product
/// across the basket, so repeating a product cannot oversell it. On any
/// failure the store is left exactly as it was.
pub(super) fn settle(store: &mut Store, mut purchase: Purchase) -> PurchaseOutcome {
    if purchase.lines.is_empty() {
        return PurchaseOutcome::Empty;
    }

    // Normalized product name -> position in the store's product list
    let mut index: HashMap<String, usize> = HashMap::with_capacity(store.products.len());
    for (position, product) in store.products.iter().enumerate() {
        index.entry(normalize(&product.name)).or_insert(position);
    }

    let mut demand: HashMap<usize, u64> = HashMap::new();
    let mut resolved = Vec::with_capacity(purchase.lines.len());

    for line in &purchase.lines {
        let Some(&position) = index.get(&normalize(&line.product_name)) else {
            return PurchaseOutcome::ProductNotFound(line.product_name.clone());
        };
        let product = &store.products[position];

        if !product.is_visible() {
            return PurchaseOutcome::ProductUnavailable(line.product_name.clone());
        }

        let wanted = demand.entry(position).or_insert(0);
        *wanted += u64::from(line.quantity);
        let in_stock = u64::try_from(product.quantity).unwrap_or(0);
        if in_stock < *wanted {
            return PurchaseOutcome::InsufficientQuantity(line.product_name.clone());
        }

        resolved.push(position);
    }

    for (line, position) in purchase.lines.iter_mut().zip(resolved) {
        let product = &mut store.products[position];
        // Validated above: line.quantity <= stock <= i32::MAX
        product.quantity -= line.quantity as i32;
        line.category = product.category.clone();
        line.price = product.price;
    }

    store.purchases.push(purchase);
    PurchaseOutcome::Completed {
        store_name: store.name.clone(),
    }
}
