use std::collections::{BTreeMap, HashMap};

use tracing::info;

use super::Seeder;
use crate::{
    error::{SeedError, SeedResult},
    fixtures,
    models::{BundleSeed, collections},
};

impl Seeder {
    /// Inserts the inventory items and returns their generated ids.
    pub async fn seed_items(&self) -> SeedResult<Vec<String>> {
        info!("writing items");
        let mut ids = Vec::with_capacity(fixtures::ITEMS.len());
        for item in &fixtures::ITEMS {
            ids.push(
                self.store
                    .add(collections::ITEMS, item.to_document())
                    .await?,
            );
        }
        info!(count = ids.len(), "items written");
        Ok(ids)
    }

    /// Inserts the bundles, linking each to the stored items by name.
    ///
    /// Every reference is resolved before the first bundle is written, so a
    /// missing item leaves the bundles collection untouched.
    pub async fn seed_bundles(&self) -> SeedResult<Vec<String>> {
        info!("writing bundles");
        let item_ids = self.item_ids_by_name().await?;

        let resolved = fixtures::BUNDLES
            .iter()
            .map(|bundle| resolve_items(bundle, &item_ids).map(|items| (bundle, items)))
            .collect::<SeedResult<Vec<_>>>()?;

        let mut ids = Vec::with_capacity(resolved.len());
        for (bundle, items) in resolved {
            ids.push(
                self.store
                    .add(collections::BUNDLES, bundle.to_document(items))
                    .await?,
            );
        }
        info!(count = ids.len(), "bundles written");
        Ok(ids)
    }

    /// Item name to id. When a name is stored more than once the first
    /// document returned wins.
    async fn item_ids_by_name(&self) -> SeedResult<HashMap<String, String>> {
        let mut ids = HashMap::new();
        for item in self.store.list(collections::ITEMS, None).await? {
            if let Some(name) = item.data.get("name").and_then(|name| name.as_str()) {
                ids.entry(name.to_string()).or_insert(item.id);
            }
        }
        Ok(ids)
    }
}

fn resolve_items(
    bundle: &BundleSeed,
    item_ids: &HashMap<String, String>,
) -> SeedResult<BTreeMap<String, u32>> {
    bundle
        .items
        .iter()
        .map(|(name, quantity)| match item_ids.get(*name) {
            Some(id) => Ok((id.clone(), *quantity)),
            None => Err(SeedError::MissingItem {
                bundle: bundle.name.to_string(),
                item: name.to_string(),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::resolve_items;
    use crate::{error::SeedError, fixtures::BUNDLES};

    #[test]
    fn resolve_reports_first_missing_item() {
        let ids: HashMap<String, String> = [("Mesa Redonda 1.5m", "t1")]
            .into_iter()
            .map(|(name, id)| (name.to_string(), id.to_string()))
            .collect();

        let err = resolve_items(&BUNDLES[0], &ids).unwrap_err();
        assert!(matches!(
            err,
            SeedError::MissingItem { ref bundle, ref item }
                if bundle == "Lote Fiesta Basica" && item == "Silla de Banquete"
        ));
    }
}
