//! Product resolver

use crate::errors::{from_rusqlite, Result};
use keelson_core::KeelsonError;
use keelson_domain::Product;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::collections::{BTreeSet, HashMap};

/// Related-aggregate resolver for catalog products
pub struct ProductRepository;

impl ProductRepository {
    /// Resolve a product by id
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such product exists.
    pub fn find_by_id(conn: &Connection, id: &str) -> Result<Product> {
        conn.query_row(
            "SELECT id, name, price FROM products WHERE id = ?1",
            [id],
            |row| {
                Ok(Product {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    price: row.get(2)?,
                })
            },
        )
        .optional()
        .map_err(from_rusqlite)?
        .ok_or_else(|| KeelsonError::not_found("product", id))
    }

    /// Batch-resolve products over a distinct id set with a single
    /// query. Ids with no matching product are simply absent from the
    /// returned map.
    pub fn get_map_by_ids(conn: &Connection, ids: &[String]) -> Result<HashMap<String, Product>> {
        let distinct: BTreeSet<&str> = ids.iter().map(String::as_str).collect();
        if distinct.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; distinct.len()].join(", ");
        let sql = format!(
            "SELECT id, name, price FROM products WHERE id IN ({})",
            placeholders
        );

        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let products = stmt
            .query_map(
                params_from_iter(distinct.iter().map(|id| Value::from(id.to_string()))),
                |row| {
                    Ok(Product {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        price: row.get(2)?,
                    })
                },
            )
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(products.into_iter().map(|p| (p.id.clone(), p)).collect())
    }

    /// Insert a product (seed/test convenience)
    pub fn insert(conn: &Connection, product: &Product) -> Result<()> {
        conn.execute(
            "INSERT INTO products (id, name, price) VALUES (?1, ?2, ?3)",
            params![product.id, product.name, product.price],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations;

    fn setup() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        migrations::apply_migrations(&mut conn).unwrap();
        for (id, price) in [("P1", 2.5), ("P2", 10.0)] {
            ProductRepository::insert(&conn, &Product::new(id, "widget", price)).unwrap();
        }
        conn
    }

    #[test]
    fn test_get_map_by_ids_deduplicates() {
        let conn = setup();
        let ids = vec!["P1".to_string(), "P2".to_string(), "P1".to_string()];

        let map = ProductRepository::get_map_by_ids(&conn, &ids).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["P1"].price, 2.5);
        assert_eq!(map["P2"].price, 10.0);
    }

    #[test]
    fn test_get_map_by_ids_empty_input() {
        let conn = setup();
        assert!(ProductRepository::get_map_by_ids(&conn, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_get_map_by_ids_skips_unknown() {
        let conn = setup();
        let ids = vec!["P1".to_string(), "ghost".to_string()];

        let map = ProductRepository::get_map_by_ids(&conn, &ids).unwrap();
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key("ghost"));
    }

    #[test]
    fn test_find_missing_reports_not_found() {
        let conn = setup();
        let err = ProductRepository::find_by_id(&conn, "ghost").unwrap_err();
        assert!(matches!(err, KeelsonError::NotFound { .. }));
    }
}
