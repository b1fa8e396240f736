//! The static service catalog, queryable by id and by category.
pub mod data;
pub mod service;

pub use service::*;

use crate::error::CatalogError;
use ahash::AHashMap;
use itertools::Itertools;

/// A read-only lookup table of every bookable service.
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    services: Vec<Service>,
    index: AHashMap<String, usize>,
}

impl ServiceCatalog {
    /// Builds a catalog, rejecting duplicate service ids.
    pub fn new(services: Vec<Service>) -> Result<Self, CatalogError> {
        let mut index = AHashMap::with_capacity(services.len());
        for (position, service) in services.iter().enumerate() {
            if index.insert(service.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateService(service.id.clone()));
            }
        }
        Ok(Self { services, index })
    }

    /// Parses a JSON array of services.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let services: Vec<Service> = serde_json::from_str(json)
            .map_err(|e| CatalogError::JsonParseError(e.to_string()))?;
        Self::new(services)
    }

    /// The clinic's built-in catalog.
    pub fn clinic() -> Self {
        Self::new(data::clinic_services()).expect("built-in catalog has unique service ids")
    }

    pub fn get(&self, id: &str) -> Option<&Service> {
        self.index.get(id).map(|&i| &self.services[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Service> {
        self.services.iter().filter(move |s| s.category == category)
    }

    /// Services grouped by category, in `Category::ALL` order; empty categories are skipped.
    pub fn grouped(&self) -> Vec<(Category, Vec<&Service>)> {
        let mut groups = self.services.iter().into_group_map_by(|s| s.category);
        Category::ALL
            .iter()
            .filter_map(|c| groups.remove(c).map(|services| (*c, services)))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        self.services.iter()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Localized;

    fn service(id: &str, category: Category) -> Service {
        Service {
            id: id.to_string(),
            name: Localized::new(id, id),
            duration: "30 min".to_string(),
            price: 10_000,
            price_note: None,
            category,
            info_key: None,
        }
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let result = ServiceCatalog::new(vec![
            service("a", Category::Consulta),
            service("a", Category::Ultrasonido),
        ]);
        assert_eq!(result.err(), Some(CatalogError::DuplicateService("a".to_string())));
    }

    #[test]
    fn test_grouped_follows_category_order() {
        let catalog = ServiceCatalog::new(vec![
            service("us", Category::Ultrasonido),
            service("c1", Category::Consulta),
            service("c2", Category::Consulta),
        ])
        .unwrap();
        let groups = catalog.grouped();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Category::Consulta);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, Category::Ultrasonido);
    }

    #[test]
    fn test_by_category_keeps_catalog_order() {
        let catalog = ServiceCatalog::new(vec![
            service("d1", Category::Dispositivos),
            service("c1", Category::Consulta),
            service("d2", Category::Dispositivos),
        ])
        .unwrap();
        let ids: Vec<&str> = catalog
            .by_category(Category::Dispositivos)
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["d1", "d2"]);
        assert_eq!(catalog.by_category(Category::Laboratorio).count(), 0);
    }

    #[test]
    fn test_clinic_catalog_lookup() {
        let catalog = ServiceCatalog::clinic();
        let t_cobre = catalog.get("t-cobre").expect("t-cobre is offered");
        assert_eq!(t_cobre.price, 120_000);
        assert_eq!(t_cobre.category, Category::Dispositivos);
        assert!(catalog.contains("us-embarazo"));
        assert!(catalog.get("does-not-exist").is_none());
    }
}
